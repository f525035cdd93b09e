use crate::globe::components::{Marker, MarkerCore, MarkerGlow};
use crate::globe::logic::to_color;
use crate::globe::resources::{GlobeSettings, HoverTracker, MarkerAssets};
use bevy::color::Alpha;
use bevy::prelude::*;
use globekit::GeoPoint;
use globekit::markers::{HoverState, base_scale, marker_position};
use globekit::palette::category_color;
use globekit::{Category, DeviceClass, GlobeConfig};
use std::collections::HashMap;

pub fn setup_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GlobeSettings>,
) {
    let segments = settings.markers.sphere_segments;
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(segments, segments));

    let mut core = HashMap::new();
    let mut glow = HashMap::new();
    for category in Category::ALL {
        let color = to_color(category_color(category));
        core.insert(
            category,
            materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..default()
            }),
        );
        glow.insert(
            category,
            materials.add(StandardMaterial {
                base_color: color.with_alpha(settings.markers.glow_opacity),
                alpha_mode: AlphaMode::Add,
                unlit: true,
                fog_enabled: false,
                ..default()
            }),
        );
    }

    commands.insert_resource(MarkerAssets { sphere, core, glow });
}

pub fn remove_marker_assets(mut commands: Commands) {
    commands.remove_resource::<MarkerAssets>();
}

/// Spawn one marker under `assembly`: a root at the anchor with a solid core
/// and an additive glow halo as children.
pub fn spawn_marker(
    commands: &mut Commands,
    assembly: Entity,
    point: &GeoPoint,
    assets: &MarkerAssets,
    config: &GlobeConfig,
    device: DeviceClass,
) -> Entity {
    let base = base_scale(point.value, device, &config.markers);
    let hover = HoverState::new(base, &config.markers);
    let mesh = Mesh3d(assets.sphere.clone());

    let mut core = commands.spawn((mesh.clone(), Transform::from_scale(Vec3::splat(hover.core_scale)), MarkerCore));
    if let Some(material) = assets.core.get(&point.category) {
        core.insert(MeshMaterial3d(material.clone()));
    }
    let core = core.id();

    let mut glow = commands.spawn((mesh, Transform::from_scale(Vec3::splat(hover.glow_scale)), MarkerGlow));
    if let Some(material) = assets.glow.get(&point.category) {
        glow.insert(MeshMaterial3d(material.clone()));
    }
    let glow = glow.id();

    commands
        .spawn((
            Transform::from_translation(marker_position(point, config.globe.radius, &config.markers)),
            Visibility::default(),
            Marker {
                point: point.id,
                base_scale: base,
                hover,
                core,
                glow,
            },
            ChildOf(assembly),
        ))
        .add_children(&[core, glow])
        .id()
}

/// Ease every marker toward its hovered or resting size.
pub fn animate_markers(
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    tracker: Res<HoverTracker>,
    mut marker_q: Query<&mut Marker>,
    mut part_q: Query<&mut Transform, Or<(With<MarkerCore>, With<MarkerGlow>)>>,
) {
    let dt = time.delta_secs();
    let config = &settings.markers;

    for mut marker in marker_q.iter_mut() {
        let mut hover = marker.hover;
        hover.hovered = tracker.router.is_hovered(marker.point);
        hover = hover.advance(marker.base_scale, dt, config);
        if hover == marker.hover {
            continue;
        }
        marker.hover = hover;

        if let Ok(mut transform) = part_q.get_mut(marker.core) {
            transform.scale = Vec3::splat(hover.core_scale);
        }
        if let Ok(mut transform) = part_q.get_mut(marker.glow) {
            transform.scale = Vec3::splat(hover.glow_scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::resources::DeviceProfile;
    use bevy::ecs::system::RunSystemOnce;
    use globekit::dataset::Dataset;

    fn app_with_assets() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(GlobeSettings::default())
            .insert_resource(DeviceProfile::default())
            .add_systems(Startup, setup_marker_assets);
        app.update();
        app
    }

    fn tokyo() -> GeoPoint {
        let dataset = Dataset::from_toml_str(
            r#"
            [[points]]
            id = 7
            city = "Tokyo"
            country = "Japan"
            lat = 35.68
            lng = 139.69
            value = 80.0
            category = "Frontend"
            "#,
        )
        .unwrap();
        dataset.points[0].clone()
    }

    #[test]
    fn test_assets_cover_every_category() {
        let app = app_with_assets();
        let assets = app.world().resource::<MarkerAssets>();

        assert_eq!(assets.core.len(), Category::ALL.len());
        assert_eq!(assets.glow.len(), Category::ALL.len());
    }

    #[test]
    fn test_marker_spawns_core_and_glow_under_the_assembly() {
        let mut app = app_with_assets();
        let assembly = app.world_mut().spawn((Transform::default(), Visibility::default())).id();
        let point = tokyo();

        let marker = app
            .world_mut()
            .run_system_once(move |mut commands: Commands, assets: Res<MarkerAssets>, settings: Res<GlobeSettings>| {
                spawn_marker(&mut commands, assembly, &point, &assets, &settings, DeviceClass::Desktop)
            })
            .unwrap();

        let world = app.world();
        let component = world.get::<Marker>(marker).unwrap();
        assert_eq!(component.point, 7);
        assert_eq!(world.get::<ChildOf>(marker).map(|c| c.parent()), Some(assembly));

        let core = world.get::<Transform>(component.core).unwrap();
        let glow = world.get::<Transform>(component.glow).unwrap();
        assert!((glow.scale.x - core.scale.x * 3.0).abs() < 1e-6);

        let anchor = world.get::<Transform>(marker).unwrap().translation;
        assert!((anchor.length() - 2.02).abs() < 1e-4);
    }

    #[test]
    fn test_hovered_marker_grows_and_relaxes_back() {
        let mut app = app_with_assets();
        app.add_systems(Update, animate_markers);
        let assembly = app.world_mut().spawn((Transform::default(), Visibility::default())).id();
        let point = tokyo();
        let marker = app
            .world_mut()
            .run_system_once(move |mut commands: Commands, assets: Res<MarkerAssets>, settings: Res<GlobeSettings>| {
                spawn_marker(&mut commands, assembly, &point, &assets, &settings, DeviceClass::Desktop)
            })
            .unwrap();
        app.insert_resource(HoverTracker::default());
        let base = app.world().get::<Marker>(marker).unwrap().base_scale;

        app.world_mut().resource_mut::<HoverTracker>().router.enter(7);
        for _ in 0..200 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(std::time::Duration::from_millis(16));
            app.world_mut().run_schedule(Update);
        }
        let hovered = app.world().get::<Marker>(marker).unwrap().hover;
        assert!(hovered.hovered);
        assert!((hovered.core_scale - base * 2.2).abs() < 1e-3);

        app.world_mut().resource_mut::<HoverTracker>().router.teardown();
        for _ in 0..200 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(std::time::Duration::from_millis(16));
            app.world_mut().run_schedule(Update);
        }
        let rested = app.world().get::<Marker>(marker).unwrap().hover;
        assert!(!rested.hovered);
        assert!((rested.core_scale - base).abs() < 1e-3);
    }
}
