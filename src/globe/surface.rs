use crate::core::state::SurfacePhase;
use crate::globe::components::{AtmosphereShell, GlobeAssembly, GlobeSurface, LoadingPlaceholder};
use crate::globe::logic::{
    halo_config, mesh_from_data, placeholder_material, relief_normal_map, surface_material,
    texture_sampler,
};
use crate::globe::resources::{GlobeSettings, SurfaceLoader};
use bevy::asset::LoadState;
use bevy::color::Alpha;
use bevy::image::ImageLoaderSettings;
use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, block_on, futures_lite::future};
use bevy_halo::HaloBuilder;
use globekit::animation::LoadingPulse;
use globekit::mesh_data::MeshData;
use globekit::texture::{FetchOutcome, SurfaceState, SurfaceTextures};

pub fn spawn_surface(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GlobeSettings>,
    assembly_q: Query<Entity, With<GlobeAssembly>>,
) {
    let Ok(assembly) = assembly_q.single() else {
        warn!("Globe assembly missing, surface not spawned");
        return;
    };

    let geometry = &settings.globe;
    let mut globe_mesh = mesh_from_data(MeshData::uv_sphere(geometry.radius, geometry.segments, geometry.segments));
    // normal maps need tangents
    if let Err(err) = globe_mesh.generate_tangents() {
        warn!("Could not generate globe tangents, relief will look flat: {err}");
    }
    let globe_mesh = meshes.add(globe_mesh);
    let placeholder = materials.add(placeholder_material(&settings));

    let shells: Vec<_> = HaloBuilder::new(halo_config(geometry.radius, &settings.atmosphere))
        .build()
        .into_iter()
        .map(|shell| (meshes.add(shell.mesh), materials.add(shell.material)))
        .collect();

    commands.entity(assembly).with_children(|parent| {
        // material arrives with the first refresh; hidden until textures settle
        parent.spawn((
            Mesh3d(globe_mesh.clone()),
            Transform::default(),
            Visibility::Hidden,
            GlobeSurface,
        ));
        parent.spawn((
            Mesh3d(globe_mesh),
            MeshMaterial3d(placeholder.clone()),
            Transform::default(),
            LoadingPlaceholder {
                material: placeholder,
            },
        ));
        for (mesh, material) in shells {
            parent.spawn((Mesh3d(mesh), MeshMaterial3d(material), Transform::default(), AtmosphereShell));
        }
    });
}

fn load_image(asset_server: &AssetServer, url: String, is_srgb: bool, anisotropy: u16) -> Handle<Image> {
    asset_server.load_with_settings(url, move |loader_settings: &mut ImageLoaderSettings| {
        loader_settings.is_srgb = is_srgb;
        loader_settings.sampler = texture_sampler(anisotropy);
    })
}

pub fn start_texture_loading(mut commands: Commands, asset_server: Res<AssetServer>, settings: Res<GlobeSettings>) {
    let texture = &settings.texture;
    let mut textures = SurfaceTextures::new(texture.color_urls.clone(), texture.relief_url.clone());
    let (color, relief) = textures.start();

    let color_request = color.map(|(index, url)| {
        info!("Requesting globe texture candidate {index}: {url}");
        (index, load_image(&asset_server, url, true, texture.anisotropy))
    });
    if color_request.is_none() {
        warn!("No globe texture candidates configured, using flat color");
    }
    // heights are linear data
    let relief_request = relief.map(|url| load_image(&asset_server, url, false, texture.anisotropy));

    commands.insert_resource(SurfaceLoader {
        textures,
        color_request,
        relief_request,
        relief_bake: None,
        applied: None,
    });
}

pub fn poll_surface_textures(
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<GlobeSettings>,
    loader: Option<ResMut<SurfaceLoader>>,
) {
    let Some(mut loader) = loader else {
        return;
    };
    let loader = &mut *loader;
    let texture = &settings.texture;

    if let Some((index, handle)) = loader.color_request.clone() {
        match asset_server.get_load_state(&handle) {
            Some(LoadState::Loaded) => {
                info!("Globe texture candidate {index} loaded");
                loader.color_request = None;
                loader.textures.color_completed(index, FetchOutcome::Loaded(handle));
            }
            Some(LoadState::Failed(err)) => {
                warn!("Globe texture candidate {index} failed: {err}");
                loader.color_request = loader
                    .textures
                    .color_completed(index, FetchOutcome::Failed)
                    .map(|(next, url)| {
                        info!("Requesting globe texture candidate {next}: {url}");
                        (next, load_image(&asset_server, url, true, texture.anisotropy))
                    });
                if loader.color_request.is_none() {
                    warn!("All globe texture candidates failed, using flat color");
                }
            }
            _ => {}
        }
    }

    if let Some(handle) = loader.relief_request.clone() {
        match asset_server.get_load_state(&handle) {
            Some(LoadState::Loaded) => {
                loader.relief_request = None;
                match images.get(&handle).cloned() {
                    Some(heights) => {
                        let (strength, anisotropy) = (texture.relief_strength, texture.anisotropy);
                        loader.relief_bake = Some(
                            AsyncComputeTaskPool::get()
                                .spawn(async move { relief_normal_map(&heights, strength, anisotropy) }),
                        );
                    }
                    None => loader.textures.relief_completed(FetchOutcome::Failed),
                }
            }
            Some(LoadState::Failed(err)) => {
                debug!("Relief image failed, continuing without it: {err}");
                loader.relief_request = None;
                loader.textures.relief_completed(FetchOutcome::Failed);
            }
            _ => {}
        }
    }

    finish_relief_bake(loader, &mut images);
}

/// Hand a finished normal map to the surface state. A bake still running is
/// left for a later frame.
fn finish_relief_bake(loader: &mut SurfaceLoader, images: &mut Assets<Image>) {
    let Some(task) = loader.relief_bake.as_mut() else {
        return;
    };
    let Some(normal_map) = block_on(future::poll_once(task)) else {
        return;
    };
    loader.relief_bake = None;

    match normal_map {
        Some(image) => {
            debug!("Relief image converted to normal map");
            loader.textures.relief_completed(FetchOutcome::Loaded(images.add(image)));
        }
        None => {
            debug!("Relief image has no usable 8-bit heights, skipping");
            loader.textures.relief_completed(FetchOutcome::Failed);
        }
    }
}

pub fn sync_surface_phase(
    loader: Option<Res<SurfaceLoader>>,
    phase: Res<State<SurfacePhase>>,
    mut next_phase: ResMut<NextState<SurfacePhase>>,
) {
    let Some(loader) = loader else {
        return;
    };
    let target = match loader.textures.state.surface() {
        SurfaceState::Loading => SurfacePhase::Loading,
        SurfaceState::Textured => SurfacePhase::Textured,
        SurfaceState::Fallback => SurfacePhase::Fallback,
    };
    if *phase.get() != target {
        next_phase.set(target);
    }
}

/// Swap in a newly built material whenever the material key changes.
pub fn refresh_surface_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<GlobeSettings>,
    loader: Option<ResMut<SurfaceLoader>>,
    surface_q: Query<Entity, With<GlobeSurface>>,
) {
    let Some(mut loader) = loader else {
        return;
    };
    let key = loader.textures.state.material_key();
    if loader.applied == Some(key) {
        return;
    }
    let Ok(surface) = surface_q.single() else {
        return;
    };

    let material = materials.add(surface_material(&loader.textures.state, &settings));
    let visibility = match key.surface {
        SurfaceState::Loading => Visibility::Hidden,
        SurfaceState::Textured | SurfaceState::Fallback => Visibility::Inherited,
    };
    commands.entity(surface).insert((MeshMaterial3d(material), visibility));
    loader.applied = Some(key);

    debug!("Globe surface material rebuilt for {key:?}");
}

pub fn animate_placeholder(
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut placeholder_q: Query<(&LoadingPlaceholder, &mut Transform)>,
) {
    let surface = &settings.surface;
    let pulse = LoadingPulse::at(
        time.elapsed_secs() * surface.placeholder_time_scale,
        surface.placeholder_opacity,
        surface.placeholder_opacity_swing,
        surface.placeholder_scale_swing,
    );

    for (placeholder, mut transform) in placeholder_q.iter_mut() {
        transform.scale = Vec3::splat(pulse.scale);
        if let Some(material) = materials.get_mut(&placeholder.material) {
            material.base_color.set_alpha(pulse.opacity);
        }
    }
}

pub fn despawn_placeholder(mut commands: Commands, placeholder_q: Query<Entity, With<LoadingPlaceholder>>) {
    for entity in placeholder_q.iter() {
        commands.entity(entity).despawn();
    }
}

/// Runs first on unmount so no late completion can touch the surface.
pub fn cancel_texture_loading(mut commands: Commands, loader: Option<ResMut<SurfaceLoader>>) {
    if let Some(mut loader) = loader {
        loader.textures.cancel();
        loader.color_request = None;
        loader.relief_request = None;
        // dropping the task cancels the bake
        loader.relief_bake = None;
        debug!("Globe texture loading cancelled");
    }
    commands.remove_resource::<SurfaceLoader>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::GlobeState;
    use bevy::asset::RenderAssetUsages;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .insert_resource(GlobeSettings::default())
            .init_state::<GlobeState>()
            .add_sub_state::<SurfacePhase>()
            .add_systems(OnExit(GlobeState::Mounted), cancel_texture_loading)
            .add_systems(
                Update,
                (poll_surface_textures, sync_surface_phase, refresh_surface_material)
                    .chain()
                    .run_if(in_state(GlobeState::Mounted)),
            );
        app.world_mut()
            .resource_mut::<NextState<GlobeState>>()
            .set(GlobeState::Mounted);
        app.update();
        app
    }

    /// Surface entity plus a loader waiting on one color candidate.
    fn mount_surface(app: &mut App, relief_source: Option<String>) -> Entity {
        let surface = app
            .world_mut()
            .spawn((Transform::default(), Visibility::Hidden, GlobeSurface))
            .id();
        let mut textures = SurfaceTextures::new(vec!["https://cdn.example/earth.jpg".to_string()], relief_source);
        textures.start();
        app.insert_resource(SurfaceLoader {
            textures,
            color_request: None,
            relief_request: None,
            relief_bake: None,
            applied: None,
        });
        app.update();
        surface
    }

    fn surface_material_handle(app: &App, surface: Entity) -> Handle<StandardMaterial> {
        app.world()
            .get::<MeshMaterial3d<StandardMaterial>>(surface)
            .unwrap()
            .0
            .clone()
    }

    fn gray_heights() -> Image {
        Image::new(
            Extent3d {
                width: 8,
                height: 4,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![128; 32],
            TextureFormat::R8Unorm,
            RenderAssetUsages::default(),
        )
    }

    fn start_bake(app: &mut App) {
        let heights = gray_heights();
        let task = AsyncComputeTaskPool::get().spawn(async move { relief_normal_map(&heights, 2.0, 16) });
        app.world_mut().resource_mut::<SurfaceLoader>().relief_bake = Some(task);
    }

    #[test]
    fn loaded_color_texture_shows_the_surface() {
        let mut app = app();
        let surface = mount_surface(&mut app, None);
        let loading_material = surface_material_handle(&app, surface);
        assert_eq!(app.world().get::<Visibility>(surface), Some(&Visibility::Hidden));

        let texture = app.world_mut().resource_mut::<Assets<Image>>().add(Image::default());
        app.world_mut()
            .resource_mut::<SurfaceLoader>()
            .textures
            .color_completed(0, FetchOutcome::Loaded(texture.clone()));
        app.update();

        let textured_material = surface_material_handle(&app, surface);
        assert_ne!(textured_material, loading_material);
        let materials = app.world().resource::<Assets<StandardMaterial>>();
        assert_eq!(
            materials.get(&textured_material).unwrap().base_color_texture,
            Some(texture)
        );
        assert_eq!(app.world().get::<Visibility>(surface), Some(&Visibility::Inherited));

        app.update();
        assert_eq!(*app.world().resource::<State<SurfacePhase>>().get(), SurfacePhase::Textured);
    }

    #[test]
    fn unmount_drops_the_loader_and_late_results() {
        let mut app = app();
        let surface = mount_surface(&mut app, Some("https://cdn.example/relief.png".to_string()));
        let material = surface_material_handle(&app, surface);
        start_bake(&mut app);

        app.world_mut()
            .resource_mut::<NextState<GlobeState>>()
            .set(GlobeState::Unmounted);
        app.update();
        assert!(!app.world().contains_resource::<SurfaceLoader>());

        let images_before = app.world().resource::<Assets<Image>>().len();
        app.world_mut().run_system_once(poll_surface_textures).unwrap();
        app.update();

        assert_eq!(surface_material_handle(&app, surface), material);
        assert_eq!(app.world().get::<Visibility>(surface), Some(&Visibility::Hidden));
        assert_eq!(app.world().resource::<Assets<Image>>().len(), images_before);
    }

    #[test]
    fn relief_bake_finishes_off_the_main_thread() {
        let mut app = app();
        let surface = mount_surface(&mut app, Some("https://cdn.example/relief.png".to_string()));
        start_bake(&mut app);

        for _ in 0..500 {
            app.update();
            if app.world().resource::<SurfaceLoader>().relief_bake.is_none() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        app.update();

        let loader = app.world().resource::<SurfaceLoader>();
        assert!(loader.relief_bake.is_none());
        let relief = loader.textures.state.relief.clone().unwrap();
        let image = app.world().resource::<Assets<Image>>().get(&relief).unwrap();
        assert_eq!(image.texture_descriptor.format, TextureFormat::Rgba8Unorm);

        let materials = app.world().resource::<Assets<StandardMaterial>>();
        let material = materials.get(&surface_material_handle(&app, surface)).unwrap();
        assert_eq!(material.normal_map_texture, Some(relief));
    }
}
