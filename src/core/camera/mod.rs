pub(crate) mod components;
mod logic;
mod systems;

use crate::core::camera::components::*;
use crate::core::camera::systems::*;
use crate::core::schedule::GlobeSet;
use crate::core::state::GlobeState;
use bevy::prelude::*;

pub(crate) struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MainCamera>()
            .add_systems(OnEnter(GlobeState::Mounted), spawn_camera)
            .add_systems(OnExit(GlobeState::Mounted), despawn_camera)
            .add_systems(
                Update,
                orbit_camera_control
                    .in_set(GlobeSet::Input)
                    .run_if(in_state(GlobeState::Mounted)),
            );
    }
}
