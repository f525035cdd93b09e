use crate::globe::components::{GlobeAssembly, GlobeEntity, SceneLight, StarField};
use crate::globe::logic::{star_mesh, to_color};
use crate::globe::resources::{DeviceProfile, GlobeSettings};
use bevy::light::{DirectionalLight, PointLight};
use bevy::log::info;
use bevy::prelude::*;
use globekit::config::LightConfig;
use globekit::stars::star_field;

pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GlobeSettings>,
    device: Res<DeviceProfile>,
) {
    let scene = &settings.scene;

    commands.spawn((
        DirectionalLight {
            color: to_color(scene.key_light.color),
            illuminance: scene.key_light.intensity,
            shadows_enabled: false,
            ..default()
        },
        light_transform(&scene.key_light),
        SceneLight,
        GlobeEntity,
    ));
    commands.spawn((
        DirectionalLight {
            color: to_color(scene.fill_light.color),
            illuminance: scene.fill_light.intensity,
            shadows_enabled: false,
            ..default()
        },
        light_transform(&scene.fill_light),
        SceneLight,
        GlobeEntity,
    ));
    commands.spawn((
        PointLight {
            color: to_color(scene.rim_light.color),
            intensity: scene.rim_light.intensity,
            range: 30.0,
            shadows_enabled: false,
            ..default()
        },
        light_transform(&scene.rim_light),
        SceneLight,
        GlobeEntity,
    ));

    let stars_config = &settings.stars;
    let stars = star_field(
        settings.star_count(**device),
        stars_config.radius,
        stars_config.depth,
        stars_config.seed,
    );
    commands.spawn((
        Mesh3d(meshes.add(star_mesh(&stars))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            fog_enabled: false,
            ..default()
        })),
        Transform::default(),
        StarField,
        GlobeEntity,
    ));

    commands.spawn((
        Transform::default(),
        Visibility::default(),
        GlobeAssembly::default(),
        GlobeEntity,
    ));

    info!("Globe scene spawned with {} stars", stars.len());
}

fn light_transform(light: &LightConfig) -> Transform {
    Transform::from_translation(Vec3::from_array(light.position)).looking_at(Vec3::ZERO, Vec3::Y)
}

pub fn rotate_assembly(
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    mut assembly_q: Query<(&mut GlobeAssembly, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut assembly, mut transform) in assembly_q.iter_mut() {
        assembly.spin = assembly.spin.advance(settings.scene.rotation_speed, dt);
        transform.rotation = Quat::from_rotation_y(assembly.spin.angle);
    }
}

pub fn despawn_scene(mut commands: Commands, entities: Query<Entity, With<GlobeEntity>>) {
    let mut count = 0;
    for entity in entities.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    info!("Globe unmounted, despawned {count} root entities");
}
