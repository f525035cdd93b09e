use crate::core::camera::components::MainCamera;
use crate::globe::components::{GlobeAssembly, Marker};
use crate::globe::events::GlobeHover;
use crate::globe::resources::{DeviceProfile, GlobeDataset, GlobeSettings, HoverTracker};
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use globekit::hover::HoverTransition;
use globekit::picking::{PickTarget, pick_nearest};
use globekit::projection::ndc_to_screen;

/// Pick the marker under the pointer and report hover changes to the host.
///
/// Desktop follows the cursor. Touch has no hover, so the last tap stands in
/// for the pointer until the next one.
pub fn route_hover(
    touches: Res<Touches>,
    settings: Res<GlobeSettings>,
    dataset: Res<GlobeDataset>,
    device: Res<DeviceProfile>,
    mut tracker: ResMut<HoverTracker>,
    mut hover_events: MessageWriter<GlobeHover>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    marker_q: Query<(&Marker, &GlobalTransform)>,
    assembly_q: Query<&GlobalTransform, With<GlobeAssembly>>,
) {
    // Read ECS state
    let Ok((camera, camera_transform)) = camera_q.single() else {
        return;
    };
    if device.is_touch() {
        if let Some(touch) = touches.iter_just_pressed().last() {
            tracker.pointer = Some(touch.position());
        }
    } else {
        tracker.pointer = windows.single().ok().and_then(|window| window.cursor_position());
    }
    let globe_center = assembly_q
        .single()
        .map(|transform| transform.translation())
        .unwrap_or(Vec3::ZERO);

    // Prepare input for business logic
    let ray = tracker
        .pointer
        .and_then(|pointer| camera.viewport_to_world(camera_transform, pointer).ok());
    let targets = marker_q.iter().map(|(marker, transform)| PickTarget {
        key: marker.point,
        center: transform.translation(),
        radius: marker.hover.core_scale,
    });

    // Call business logic
    let hit = ray.and_then(|ray| {
        pick_nearest(
            ray.origin,
            *ray.direction,
            targets,
            Some((globe_center, settings.globe.radius)),
        )
    });
    let Some(transition) = tracker.router.track(hit) else {
        return;
    };

    // Apply results to ECS
    let cursor = transition.cursor(**device);
    let message = match transition {
        HoverTransition::Entered { marker, .. } => {
            let Some(point) = dataset.point(marker) else {
                return;
            };
            let screen = marker_q
                .iter()
                .find(|(m, _)| m.point == marker)
                .and_then(|(_, transform)| camera.world_to_ndc(camera_transform, transform.translation()))
                .zip(camera.logical_viewport_size())
                .map(|(ndc, viewport)| ndc_to_screen(ndc, viewport));
            GlobeHover::entered(point.clone(), screen, cursor)
        }
        HoverTransition::Left { .. } => GlobeHover::left(cursor),
    };
    hover_events.write(message);
}

/// Close any open hover so the host never keeps a stale tooltip after unmount.
pub fn close_hover(
    device: Res<DeviceProfile>,
    mut tracker: ResMut<HoverTracker>,
    mut hover_events: MessageWriter<GlobeHover>,
) {
    if let Some(transition) = tracker.router.teardown() {
        hover_events.write(GlobeHover::left(transition.cursor(**device)));
    }
    tracker.pointer = None;
}
