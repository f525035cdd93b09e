use bevy::prelude::*;
use globekit::GeoPoint;
use globekit::hover::CursorRequest;

/// Hover boundary to the host. Enter carries the point and where it sits on
/// screen; leave carries neither.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct GlobeHover {
    pub point: Option<GeoPoint>,
    /// Logical pixels, origin top-left
    pub screen: Option<Vec2>,
    pub cursor: CursorRequest,
}

impl GlobeHover {
    pub fn entered(point: GeoPoint, screen: Option<Vec2>, cursor: CursorRequest) -> Self {
        Self {
            point: Some(point),
            screen,
            cursor,
        }
    }

    pub fn left(cursor: CursorRequest) -> Self {
        Self {
            point: None,
            screen: None,
            cursor,
        }
    }

    pub fn is_leave(&self) -> bool {
        self.point.is_none()
    }
}
