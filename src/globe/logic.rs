//! Conversions from engine-agnostic globe data to Bevy assets.

use bevy::asset::{Handle, RenderAssetUsages};
use bevy::color::{Alpha, Color};
use bevy::image::{Image, ImageSampler, ImageSamplerDescriptor};
use bevy::pbr::StandardMaterial;
use bevy::prelude::AlphaMode;
use bevy::math::Vec3;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_halo::{HaloConfig, HaloShell};
use globekit::config::AtmosphereConfig;
use globekit::mesh_data::MeshData;
use globekit::palette::Rgb;
use globekit::relief::{extract_channel, height_to_normal_map};
use globekit::stars::Star;
use globekit::texture::{SurfaceState, TextureState};
use globekit::GlobeConfig;

pub fn to_color(rgb: Rgb) -> Color {
    Color::srgb(rgb.r, rgb.g, rgb.b)
}

pub fn mesh_from_data(mesh_data: MeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, mesh_data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, mesh_data.normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, mesh_data.uvs);
    mesh.insert_indices(Indices::U32(mesh_data.indices));
    mesh
}

/// Polyline through the sampled arc points.
pub fn arc_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    let normals: Vec<[f32; 3]> = points
        .iter()
        .map(|p| p.normalize_or(Vec3::Y).to_array())
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh
}

/// One point per star, grayscale by brightness.
pub fn star_mesh(stars: &[Star]) -> Mesh {
    let positions: Vec<[f32; 3]> = stars.iter().map(|s| s.position.to_array()).collect();
    let normals: Vec<[f32; 3]> = stars
        .iter()
        .map(|s| (-s.position).normalize_or(Vec3::Y).to_array())
        .collect();
    let colors: Vec<[f32; 4]> = stars
        .iter()
        .map(|s| [s.brightness, s.brightness, s.brightness, 1.0])
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

pub fn texture_sampler(anisotropy: u16) -> ImageSampler {
    // anisotropic filtering is only valid with every filter linear
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        anisotropy_clamp: anisotropy.max(1),
        ..ImageSamplerDescriptor::linear()
    })
}

/// Bake a loaded relief image into a tangent-space normal map.
///
/// Only 8-bit formats carry usable heights; anything else is `None` and the
/// surface simply stays without relief.
pub fn relief_normal_map(source: &Image, strength: f32, anisotropy: u16) -> Option<Image> {
    let bytes_per_pixel = match source.texture_descriptor.format {
        TextureFormat::R8Unorm => 1,
        TextureFormat::Rg8Unorm => 2,
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => 4,
        _ => return None,
    };
    let data = source.data.as_ref()?;
    let (width, height) = (source.width() as usize, source.height() as usize);

    let heights = extract_channel(data, bytes_per_pixel, 0);
    let normals = height_to_normal_map(width, height, &heights, strength);
    if normals.is_empty() {
        return None;
    }

    let mut image = Image::new(
        Extent3d {
            width: source.width(),
            height: source.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        normals,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = texture_sampler(anisotropy);
    Some(image)
}

/// Fresh material for the current texture state. Called once per distinct
/// material key; never patched afterwards.
pub fn surface_material(state: &TextureState<Handle<Image>>, config: &GlobeConfig) -> StandardMaterial {
    let surface = state.surface();
    let base_color_texture = match surface {
        SurfaceState::Textured => state.color.clone(),
        SurfaceState::Loading | SurfaceState::Fallback => None,
    };

    StandardMaterial {
        base_color: to_color(config.surface_color(surface)),
        base_color_texture,
        normal_map_texture: state.relief.clone(),
        perceptual_roughness: config.surface.perceptual_roughness,
        reflectance: config.surface.reflectance,
        metallic: 0.0,
        ..Default::default()
    }
}

/// Translucent, unlit stand-in shown while the surface is loading.
pub fn placeholder_material(config: &GlobeConfig) -> StandardMaterial {
    StandardMaterial {
        base_color: to_color(config.surface.placeholder_color).with_alpha(config.surface.placeholder_opacity),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..Default::default()
    }
}

pub fn halo_config(globe_radius: f32, atmosphere: &AtmosphereConfig) -> HaloConfig {
    HaloConfig {
        shells: atmosphere
            .shells
            .iter()
            .map(|shell| HaloShell {
                radius: globe_radius + shell.offset,
                color: to_color(shell.color),
                opacity: shell.opacity,
            })
            .collect(),
        segments: atmosphere.segments,
    }
}
