use bevy::prelude::*;
use globekit::PointId;
use globekit::animation::{ArcPulse, Spin};
use globekit::markers::HoverState;

/// Everything spawned for one mount; despawned on unmount.
#[derive(Component)]
pub struct GlobeEntity;

/// Rotating parent of the surface, shells, markers and arcs.
#[derive(Component, Default)]
pub struct GlobeAssembly {
    pub spin: Spin,
}

#[derive(Component)]
pub struct GlobeSurface;

/// Pulsing stand-in sphere shown until the surface state is final.
#[derive(Component)]
pub struct LoadingPlaceholder {
    pub material: Handle<StandardMaterial>,
}

#[derive(Component)]
pub struct AtmosphereShell;

#[derive(Component)]
pub struct Marker {
    pub point: PointId,
    pub base_scale: f32,
    pub hover: HoverState,
    pub core: Entity,
    pub glow: Entity,
}

#[derive(Component)]
pub struct MarkerCore;

#[derive(Component)]
pub struct MarkerGlow;

#[derive(Component)]
pub struct ArcLine {
    /// Index into the dataset arcs
    pub arc: usize,
    pub pulse: ArcPulse,
    pub material: Handle<StandardMaterial>,
}

#[derive(Component)]
pub struct StarField;

#[derive(Component)]
pub struct SceneLight;
