use bevy::prelude::*;
use bevy::tasks::Task;
use globekit::filter::VisibleSet;
use globekit::hover::HoverRouter;
use globekit::texture::{MaterialKey, SurfaceTextures};
use globekit::{Category, CategoryFilter, Dataset, DeviceClass, GlobeConfig, PointId};
use std::collections::HashMap;

#[derive(Resource, Debug, Clone, Default, Deref)]
pub struct GlobeSettings(pub GlobeConfig);

/// Points and arcs to plot. Validated before it reaches the engine.
#[derive(Resource, Debug, Clone, Default, Deref)]
pub struct GlobeDataset(pub Dataset);

/// Category selection owned by the host, read every frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct ActiveFilter(pub CategoryFilter);

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Deref)]
pub struct DeviceProfile(pub DeviceClass);

/// Texture fetches in flight and the material currently on the surface.
#[derive(Resource)]
pub struct SurfaceLoader {
    pub textures: SurfaceTextures<Handle<Image>>,
    pub color_request: Option<(usize, Handle<Image>)>,
    pub relief_request: Option<Handle<Image>>,
    /// Normal map being baked off the main thread from the loaded heights
    pub relief_bake: Option<Task<Option<Image>>>,
    pub applied: Option<MaterialKey>,
}

#[derive(Resource, Default)]
pub struct HoverTracker {
    pub router: HoverRouter<PointId>,
    /// Last pointer position in logical pixels; taps keep it until the next tap
    pub pointer: Option<Vec2>,
}

/// Marker and arc entities currently on screen, keyed by what they show.
#[derive(Resource, Default)]
pub struct SpawnedObjects {
    /// Filter the current entities were reconciled against
    pub applied: Option<CategoryFilter>,
    pub visible: VisibleSet,
    pub markers: HashMap<PointId, Entity>,
    /// Keyed by index into the dataset arcs
    pub arcs: HashMap<usize, Entity>,
}

/// Assets shared by every marker, built once per mount.
#[derive(Resource)]
pub struct MarkerAssets {
    pub sphere: Handle<Mesh>,
    pub core: HashMap<Category, Handle<StandardMaterial>>,
    pub glow: HashMap<Category, Handle<StandardMaterial>>,
}
