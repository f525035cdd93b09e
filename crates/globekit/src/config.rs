use crate::dataset::Category;
use crate::orbit::OrbitSettings;
use crate::palette::{Rgb, category_color};
use crate::texture::SurfaceState;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "globe_config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Form factor the engine tunes its constants for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn is_touch(self) -> bool {
        self == DeviceClass::Mobile
    }
}

impl FromStr for DeviceClass {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceClass::Desktop),
            "mobile" | "touch" => Ok(DeviceClass::Mobile),
            other => Err(ConfigError::Invalid(format!("unknown device class `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobeConfig {
    pub globe: GlobeGeometryConfig,
    pub texture: TextureConfig,
    pub surface: SurfaceConfig,
    pub atmosphere: AtmosphereConfig,
    pub markers: MarkerConfig,
    pub arcs: ArcConfig,
    pub scene: SceneConfig,
    pub stars: StarsConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeGeometryConfig {
    pub radius: f32,
    pub segments: u32,
}

impl Default for GlobeGeometryConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            segments: 48,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Tried in order until one loads
    pub color_urls: Vec<String>,
    pub relief_url: Option<String>,
    pub fallback_color: Rgb,
    /// Height gradient multiplier when baking the relief into a normal map
    pub relief_strength: f32,
    pub anisotropy: u16,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            color_urls: vec![
                "https://unpkg.com/three-globe/example/img/earth-blue-marble.jpg".to_string(),
                "https://cdn.jsdelivr.net/npm/three-globe/example/img/earth-blue-marble.jpg".to_string(),
                "https://raw.githubusercontent.com/mrdoob/three.js/dev/examples/textures/planets/earth_atmos_2048.jpg"
                    .to_string(),
            ],
            relief_url: Some("https://unpkg.com/three-globe/example/img/earth-topology.png".to_string()),
            fallback_color: Rgb::from_hex(0x1a5276),
            relief_strength: 0.05,
            anisotropy: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub textured_tint: Rgb,
    pub perceptual_roughness: f32,
    pub reflectance: f32,
    pub placeholder_color: Rgb,
    pub placeholder_opacity: f32,
    pub placeholder_opacity_swing: f32,
    pub placeholder_scale_swing: f32,
    /// Multiplier from elapsed seconds to pulse time
    pub placeholder_time_scale: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            textured_tint: Rgb::from_hex(0xffffff),
            perceptual_roughness: 0.7,
            reflectance: 0.2,
            placeholder_color: Rgb::from_hex(0x1a5276),
            placeholder_opacity: 0.4,
            placeholder_opacity_swing: 0.2,
            placeholder_scale_swing: 0.01,
            placeholder_time_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Added to the globe radius
    pub offset: f32,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    pub shells: Vec<ShellConfig>,
    pub segments: u32,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            shells: vec![
                ShellConfig {
                    offset: 0.08,
                    color: Rgb::from_hex(0x60B8FF),
                    opacity: 0.12,
                },
                ShellConfig {
                    offset: 0.3,
                    color: Rgb::from_hex(0x1E90FF),
                    opacity: 0.055,
                },
                ShellConfig {
                    offset: 0.6,
                    color: Rgb::from_hex(0x0A4DCC),
                    opacity: 0.02,
                },
            ],
            segments: 48,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub surface_offset: f32,
    /// Scale at value 0
    pub min_scale: f32,
    /// Extra scale at value 100
    pub value_scale: f32,
    pub touch_multiplier: f32,
    pub hover_scale: f32,
    pub glow_scale: f32,
    pub glow_hover_scale: f32,
    pub glow_opacity: f32,
    /// Fraction of the gap closed per 1/60 s
    pub smoothing: f32,
    pub sphere_segments: u32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            surface_offset: 0.02,
            min_scale: 0.015,
            value_scale: 0.025,
            touch_multiplier: 1.3,
            hover_scale: 2.2,
            glow_scale: 3.0,
            glow_hover_scale: 5.0,
            glow_opacity: 0.12,
            smoothing: 0.1,
            sphere_segments: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub surface_offset: f32,
    pub height_factor: f32,
    pub samples: usize,
    /// Phase cycles per second
    pub flow_speed: f32,
    pub base_opacity: f32,
    pub opacity_swing: f32,
    pub color: Rgb,
    /// Ignore `color` and use the `from` point's category color
    pub color_by_category: bool,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            surface_offset: 0.03,
            height_factor: 0.35,
            samples: 64,
            flow_speed: 0.15,
            base_opacity: 0.15,
            opacity_swing: 0.1,
            color: Rgb::from_hex(0x06B6D4),
            color_by_category: false,
        }
    }
}

impl ArcConfig {
    pub fn color_for(&self, from: Category) -> Rgb {
        if self.color_by_category {
            category_color(from)
        } else {
            self.color
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: Rgb,
    /// Lux for directional lights, lumens for point lights
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: Rgb,
    /// Radians per second around +Y
    pub rotation_speed: f32,
    pub ambient_color: Rgb,
    pub ambient_brightness: f32,
    pub key_light: LightConfig,
    pub fill_light: LightConfig,
    pub rim_light: LightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Rgb::from_hex(0x030712),
            rotation_speed: 0.05,
            ambient_color: Rgb::from_hex(0xffffff),
            ambient_brightness: 400.0,
            key_light: LightConfig {
                position: [5.0, 3.0, 5.0],
                color: Rgb::from_hex(0xFFF5E0),
                intensity: 6_000.0,
            },
            fill_light: LightConfig {
                position: [-5.0, -3.0, -5.0],
                color: Rgb::from_hex(0x4488CC),
                intensity: 750.0,
            },
            rim_light: LightConfig {
                position: [-5.0, -3.0, -5.0],
                color: Rgb::from_hex(0x1E90FF),
                intensity: 400_000.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarsConfig {
    pub radius: f32,
    pub depth: f32,
    pub desktop_count: usize,
    pub mobile_count: usize,
    pub seed: u64,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            depth: 80.0,
            desktop_count: 3000,
            mobile_count: 1500,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub desktop: OrbitSettings,
    pub mobile: OrbitSettings,
    pub fov_degrees: f32,
    /// Fraction of pending rotation applied per 1/60 s
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            desktop: OrbitSettings::desktop(),
            mobile: OrbitSettings::mobile(),
            fov_degrees: 45.0,
            damping: 0.05,
        }
    }
}

impl GlobeConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GlobeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.globe.radius <= 0.0 {
            return invalid(format!("globe radius must be positive, got {}", self.globe.radius));
        }
        for (name, segments) in [
            ("globe", self.globe.segments),
            ("atmosphere", self.atmosphere.segments),
            ("marker sphere", self.markers.sphere_segments),
        ] {
            if segments < 3 {
                return invalid(format!("{name} needs at least 3 segments, got {segments}"));
            }
        }
        // sampler limit
        if !(1..=16).contains(&self.texture.anisotropy) {
            return invalid(format!("texture anisotropy {} outside 1..=16", self.texture.anisotropy));
        }
        if self.arcs.samples < 2 {
            return invalid(format!("arcs need at least 2 samples, got {}", self.arcs.samples));
        }
        for (name, orbit) in [("desktop", &self.camera.desktop), ("mobile", &self.camera.mobile)] {
            if orbit.min_distance > orbit.max_distance {
                return invalid(format!(
                    "{name} camera min distance {} exceeds max {}",
                    orbit.min_distance, orbit.max_distance
                ));
            }
            if orbit.min_distance <= self.globe.radius {
                return invalid(format!(
                    "{name} camera min distance {} would enter the globe",
                    orbit.min_distance
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.camera.damping) {
            return invalid(format!("camera damping {} outside 0..=1", self.camera.damping));
        }
        for shell in &self.atmosphere.shells {
            if shell.offset <= 0.0 || !(0.0..=1.0).contains(&shell.opacity) {
                return invalid(format!(
                    "atmosphere shell {:+} / {} out of range",
                    shell.offset, shell.opacity
                ));
            }
        }
        Ok(())
    }

    pub fn camera_for(&self, device: DeviceClass) -> &OrbitSettings {
        match device {
            DeviceClass::Desktop => &self.camera.desktop,
            DeviceClass::Mobile => &self.camera.mobile,
        }
    }

    /// Base color of the surface material for a given state. Textured
    /// surfaces multiply the image by this tint.
    pub fn surface_color(&self, state: SurfaceState) -> Rgb {
        match state {
            SurfaceState::Loading => self.surface.placeholder_color,
            SurfaceState::Textured => self.surface.textured_tint,
            SurfaceState::Fallback => self.texture.fallback_color,
        }
    }

    pub fn star_count(&self, device: DeviceClass) -> usize {
        match device {
            DeviceClass::Desktop => self.stars.desktop_count,
            DeviceClass::Mobile => self.stars.mobile_count,
        }
    }
}
