use crate::core::camera::components::{MainCamera, OrbitCamera};
use crate::core::camera::logic::{CameraInput, calculate_camera_transform};
use crate::globe::logic::to_color;
use crate::globe::resources::{DeviceProfile, GlobeSettings};
use bevy::input::ButtonInput;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::input::touch::Touches;
use bevy::light::AmbientLight;
use bevy::log::info;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use globekit::orbit::{OrbitState, TouchSample};

pub fn spawn_camera(mut commands: Commands, settings: Res<GlobeSettings>, device: Res<DeviceProfile>) {
    let orbit = OrbitState::new(settings.camera_for(**device));
    let scene = &settings.scene;

    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(to_color(scene.background)),
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: settings.camera.fov_degrees.to_radians(),
            ..default()
        }),
        // keeps the night side from going pure black
        AmbientLight {
            color: to_color(scene.ambient_color),
            brightness: scene.ambient_brightness,
            ..default()
        },
        Transform::from_translation(orbit.camera_position()).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        OrbitCamera { orbit },
    ));

    info!("Orbit camera spawned for {:?} at distance {:.1}", **device, orbit.distance);
}

pub fn despawn_camera(mut commands: Commands, cameras: Query<Entity, With<MainCamera>>) {
    for entity in cameras.iter() {
        commands.entity(entity).despawn();
    }
}

pub fn orbit_camera_control(
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    touches: Res<Touches>,
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    device: Res<DeviceProfile>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &mut OrbitCamera), With<MainCamera>>,
) {
    // Read ECS state
    let Ok((mut transform, mut camera)) = camera_q.single_mut() else {
        return;
    };
    let viewport_height = windows.single().map(|window| window.height()).unwrap_or(0.0);
    let mouse_delta: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    let wheel_deltas = mouse_wheel.read().map(|ev| ev.y).collect();
    let touches = touches
        .iter()
        .map(|touch| TouchSample {
            previous: touch.previous_position(),
            current: touch.position(),
        })
        .collect();

    // Prepare input for business logic
    let input = CameraInput {
        mouse_left_pressed: mouse_input.pressed(MouseButton::Left),
        mouse_delta,
        wheel_deltas,
        touches,
        viewport_height,
    };

    // Call business logic
    let Some(update) = calculate_camera_transform(
        camera.orbit,
        settings.camera_for(**device),
        &input,
        settings.camera.damping,
        time.delta_secs(),
    ) else {
        return;
    };

    // Apply results to ECS
    camera.orbit = update.orbit;
    transform.translation = update.translation;
    transform.rotation = update.rotation;
}
