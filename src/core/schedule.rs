use bevy::prelude::SystemSet;

/// Per-frame order while mounted: input, hover routing, animation reducers,
/// then material refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum GlobeSet {
    Input,
    Hover,
    Animate,
    Materials,
}
