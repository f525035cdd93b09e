use crate::globe::arcs::spawn_arc;
use crate::globe::components::GlobeAssembly;
use crate::globe::events::GlobeHover;
use crate::globe::markers::spawn_marker;
use crate::globe::resources::{ActiveFilter, DeviceProfile, GlobeDataset, GlobeSettings, HoverTracker, MarkerAssets, SpawnedObjects};
use bevy::log::debug;
use bevy::prelude::*;
use globekit::filter::{VisibilityChange, VisibleSet};

/// Bring spawned markers and arcs in line with the active filter.
///
/// Only the difference is touched; a hovered marker that gets filtered out
/// reports its leave before it disappears.
pub fn reconcile_visibility(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GlobeSettings>,
    dataset: Res<GlobeDataset>,
    device: Res<DeviceProfile>,
    filter: Res<ActiveFilter>,
    assets: Option<Res<MarkerAssets>>,
    mut spawned: ResMut<SpawnedObjects>,
    mut tracker: ResMut<HoverTracker>,
    mut hover_events: MessageWriter<GlobeHover>,
    assembly_q: Query<Entity, With<GlobeAssembly>>,
) {
    // Read ECS state
    if spawned.applied == Some(**filter) {
        return;
    }
    let (Some(assets), Ok(assembly)) = (assets, assembly_q.single()) else {
        return;
    };

    // Call business logic
    let next = VisibleSet::compute(&dataset, **filter);
    let change = VisibilityChange::between(&spawned.visible, &next);

    // Apply results to ECS
    for id in &change.despawn_points {
        if let Some(transition) = tracker.router.remove(*id) {
            hover_events.write(GlobeHover::left(transition.cursor(**device)));
        }
        if let Some(entity) = spawned.markers.remove(id) {
            commands.entity(entity).despawn();
        }
    }
    for index in &change.despawn_arcs {
        if let Some(entity) = spawned.arcs.remove(index) {
            commands.entity(entity).despawn();
        }
    }

    for id in &change.spawn_points {
        if let Some(point) = dataset.point(*id) {
            let entity = spawn_marker(&mut commands, assembly, point, &assets, &settings, **device);
            spawned.markers.insert(*id, entity);
        }
    }
    for index in &change.spawn_arcs {
        if let Some(entity) = spawn_arc(
            &mut commands,
            &mut meshes,
            &mut materials,
            assembly,
            *index,
            &dataset,
            &settings,
        ) {
            spawned.arcs.insert(*index, entity);
        }
    }

    debug!(
        "Filter {:?}: {} markers and {} arcs visible",
        **filter,
        next.points.len(),
        next.arcs.len()
    );
    spawned.visible = next;
    spawned.applied = Some(**filter);
}
