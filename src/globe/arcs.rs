use crate::globe::components::ArcLine;
use crate::globe::logic::{arc_mesh, to_color};
use crate::globe::resources::GlobeSettings;
use bevy::color::Alpha;
use bevy::prelude::*;
use globekit::animation::ArcPulse;
use globekit::arcs::ArcCurve;
use globekit::{Dataset, GlobeConfig};
use rand::Rng;

/// Spawn the arc at `index` as a line strip under `assembly`.
///
/// Returns `None` when the arc does not resolve to two points.
pub fn spawn_arc(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    assembly: Entity,
    index: usize,
    dataset: &Dataset,
    config: &GlobeConfig,
) -> Option<Entity> {
    let arc = dataset.arcs.get(index)?;
    let (from, to) = dataset.endpoints(arc)?;

    let points = ArcCurve::for_points(from, to, config.globe.radius, &config.arcs).sample(config.arcs.samples);
    // random phase so arcs don't pulse in lockstep
    let pulse = ArcPulse::new(rand::rng().random::<f32>());
    let material = materials.add(StandardMaterial {
        base_color: to_color(config.arcs.color_for(from.category))
            .with_alpha(pulse.opacity(config.arcs.base_opacity, config.arcs.opacity_swing)),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(arc_mesh(&points))),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            ArcLine {
                arc: index,
                pulse,
                material,
            },
            ChildOf(assembly),
        ))
        .id();
    Some(entity)
}

pub fn animate_arcs(
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut arc_q: Query<&mut ArcLine>,
) {
    let dt = time.delta_secs();
    let config = &settings.arcs;

    for mut line in arc_q.iter_mut() {
        line.pulse = line.pulse.advance(config.flow_speed, dt);
        let opacity = line.pulse.opacity(config.base_opacity, config.opacity_swing);
        if let Some(material) = materials.get_mut(&line.material) {
            material.base_color.set_alpha(opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::mesh::VertexAttributeValues;
    use globekit::dataset::Arc;

    fn dataset() -> Dataset {
        let mut dataset = Dataset::from_toml_str(
            r#"
            [[points]]
            id = 1
            city = "San Francisco"
            country = "USA"
            lat = 37.77
            lng = -122.42
            value = 95.0
            category = "AI"

            [[points]]
            id = 2
            city = "London"
            country = "UK"
            lat = 51.51
            lng = -0.13
            value = 88.0
            category = "Backend"

            [[arcs]]
            from = 1
            to = 2
            "#,
        )
        .unwrap();
        // dangling arc, never spawned
        dataset.arcs.push(Arc { from: 1, to: 99 });
        dataset
    }

    fn spawn(app: &mut App, index: usize) -> Option<Entity> {
        let assembly = app.world_mut().spawn((Transform::default(), Visibility::default())).id();
        app.world_mut()
            .run_system_once(
                move |mut commands: Commands,
                      mut meshes: ResMut<Assets<Mesh>>,
                      mut materials: ResMut<Assets<StandardMaterial>>,
                      settings: Res<GlobeSettings>| {
                    spawn_arc(
                        &mut commands,
                        &mut meshes,
                        &mut materials,
                        assembly,
                        index,
                        &dataset(),
                        &settings,
                    )
                },
            )
            .unwrap()
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(GlobeSettings::default());
        app
    }

    #[test]
    fn test_arc_is_sampled_above_the_surface() {
        let mut app = app();
        let entity = spawn(&mut app, 0).unwrap();

        let world = app.world();
        let mesh_handle = &world.get::<Mesh3d>(entity).unwrap().0;
        let mesh = world.resource::<Assets<Mesh>>().get(mesh_handle).unwrap();
        let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            panic!("arc positions missing");
        };
        assert_eq!(positions.len(), 64);
        assert!(positions.iter().all(|p| Vec3::from_array(*p).length() >= 2.0));
    }

    #[test]
    fn test_dangling_arc_is_skipped() {
        let mut app = app();
        assert!(spawn(&mut app, 1).is_none());
        assert!(spawn(&mut app, 5).is_none());
    }

    #[test]
    fn test_pulse_keeps_opacity_in_band() {
        let mut app = app();
        app.add_systems(Update, animate_arcs);
        let entity = spawn(&mut app, 0).unwrap();

        for _ in 0..120 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(std::time::Duration::from_millis(50));
            app.world_mut().run_schedule(Update);

            let line = app.world().get::<ArcLine>(entity).unwrap();
            let material = app
                .world()
                .resource::<Assets<StandardMaterial>>()
                .get(&line.material)
                .unwrap();
            let alpha = material.base_color.alpha();
            assert!((0.05 - 1e-4..=0.25 + 1e-4).contains(&alpha));
        }
    }
}
