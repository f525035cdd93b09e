mod core;
mod globe;

use crate::core::camera::CameraPlugin;
use crate::globe::GlobeScenePlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;

pub use crate::core::schedule::GlobeSet;
pub use crate::core::state::{GlobeState, SurfacePhase};
pub use crate::globe::events::GlobeHover;
pub use crate::globe::resources::{ActiveFilter, DeviceProfile, GlobeDataset, GlobeSettings};
pub use globekit::hover::CursorRequest;
pub use globekit::{Category, CategoryFilter, ConfigError, Dataset, DatasetError, DeviceClass, GeoPoint, GlobeConfig};

/// The globe engine. The host decides when it is mounted through [`GlobeState`],
/// owns [`ActiveFilter`] and listens for [`GlobeHover`].
pub struct GlobePlugin {
    pub config: GlobeConfig,
    /// Must already be validated
    pub dataset: Dataset,
    pub device: DeviceClass,
}

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobeSettings(self.config.clone()))
            .insert_resource(GlobeDataset(self.dataset.clone()))
            .insert_resource(DeviceProfile(self.device))
            .init_resource::<ActiveFilter>()
            .init_state::<GlobeState>()
            .add_plugins((CameraPlugin, GlobeScenePlugin));

        #[cfg(debug_assertions)]
        {
            app.add_plugins(LogDiagnosticsPlugin::default());
        }
    }
}
