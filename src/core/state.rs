use bevy::prelude::{StateSet, States, SubStates};

/// Whether the globe engine is on screen. The host mounts and unmounts it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GlobeState {
    #[default]
    Unmounted,
    Mounted,
}

/// Surface material state while mounted. Each variant gets its own material build.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, SubStates)]
#[source(GlobeState = GlobeState::Mounted)]
pub enum SurfacePhase {
    #[default]
    Loading,
    Textured,
    /// Every color candidate failed; flat color
    Fallback,
}
