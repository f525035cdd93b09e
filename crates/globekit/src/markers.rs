use crate::animation::approach;
use crate::config::{DeviceClass, MarkerConfig};
use crate::dataset::GeoPoint;
use crate::projection::project;
use glam::Vec3;

/// Resting scale of a marker's core dot.
///
/// `value` (nominally 0..=100) maps linearly into
/// `[min_scale, min_scale + value_scale]`; touch devices get bigger hit targets.
pub fn base_scale(value: f32, device: DeviceClass, config: &MarkerConfig) -> f32 {
    let multiplier = match device {
        DeviceClass::Desktop => 1.0,
        DeviceClass::Mobile => config.touch_multiplier,
    };
    multiplier * (config.min_scale + (value / 100.0) * config.value_scale)
}

/// Marker anchor, lifted slightly off the surface.
pub fn marker_position(point: &GeoPoint, globe_radius: f32, config: &MarkerConfig) -> Vec3 {
    project(point.lat, point.lng, globe_radius + config.surface_offset)
}

/// Hover flag and the displayed scales of one marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    pub hovered: bool,
    pub core_scale: f32,
    pub glow_scale: f32,
}

impl HoverState {
    pub fn new(base: f32, config: &MarkerConfig) -> Self {
        Self {
            hovered: false,
            core_scale: base,
            glow_scale: base * config.glow_scale,
        }
    }

    /// Target `(core, glow)` scales for the current hover flag.
    pub fn targets(&self, base: f32, config: &MarkerConfig) -> (f32, f32) {
        if self.hovered {
            (base * config.hover_scale, base * config.glow_hover_scale)
        } else {
            (base, base * config.glow_scale)
        }
    }

    pub fn advance(self, base: f32, dt: f32, config: &MarkerConfig) -> Self {
        let (core_target, glow_target) = self.targets(base, config);
        Self {
            hovered: self.hovered,
            core_scale: approach(self.core_scale, core_target, config.smoothing, dt),
            glow_scale: approach(self.glow_scale, glow_target, config.smoothing, dt),
        }
    }
}
