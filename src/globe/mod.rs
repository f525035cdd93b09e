mod arcs;
pub(crate) mod components;
pub mod events;
mod hover;
pub(crate) mod logic;
mod markers;
pub mod resources;
mod scene;
mod surface;
mod visibility;

use crate::core::schedule::GlobeSet;
use crate::core::state::{GlobeState, SurfacePhase};
use crate::globe::arcs::animate_arcs;
use crate::globe::events::GlobeHover;
use crate::globe::hover::{close_hover, route_hover};
use crate::globe::markers::{animate_markers, remove_marker_assets, setup_marker_assets};
use crate::globe::resources::{HoverTracker, SpawnedObjects};
use crate::globe::scene::{despawn_scene, rotate_assembly, spawn_scene};
use crate::globe::surface::*;
use crate::globe::visibility::reconcile_visibility;
use bevy::prelude::*;

pub(crate) struct GlobeScenePlugin;

impl Plugin for GlobeScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GlobeHover>()
            .add_sub_state::<SurfacePhase>()
            .init_resource::<HoverTracker>()
            .init_resource::<SpawnedObjects>()
            .configure_sets(
                Update,
                (GlobeSet::Input, GlobeSet::Hover, GlobeSet::Animate, GlobeSet::Materials).chain(),
            )
            .add_systems(
                OnEnter(GlobeState::Mounted),
                (
                    reset_tracking,
                    spawn_scene,
                    spawn_surface,
                    setup_marker_assets,
                    start_texture_loading,
                )
                    .chain(),
            )
            .add_systems(
                OnExit(GlobeState::Mounted),
                (
                    cancel_texture_loading,
                    close_hover,
                    despawn_scene,
                    remove_marker_assets,
                    reset_tracking,
                )
                    .chain(),
            )
            .add_systems(
                OnEnter(SurfacePhase::Textured),
                (despawn_placeholder, log_surface_phase),
            )
            .add_systems(
                OnEnter(SurfacePhase::Fallback),
                (despawn_placeholder, log_surface_phase),
            )
            .add_systems(
                Update,
                (
                    (reconcile_visibility, poll_surface_textures).in_set(GlobeSet::Input),
                    route_hover.in_set(GlobeSet::Hover),
                    (
                        rotate_assembly,
                        animate_markers,
                        animate_arcs,
                        animate_placeholder.run_if(in_state(SurfacePhase::Loading)),
                    )
                        .in_set(GlobeSet::Animate),
                    (sync_surface_phase, refresh_surface_material)
                        .chain()
                        .in_set(GlobeSet::Materials),
                )
                    .run_if(in_state(GlobeState::Mounted)),
            );
    }
}

fn reset_tracking(mut commands: Commands) {
    commands.insert_resource(SpawnedObjects::default());
    commands.insert_resource(HoverTracker::default());
}

fn log_surface_phase(phase: Res<State<SurfacePhase>>) {
    info!("Globe surface settled: {:?}", phase.get());
}
