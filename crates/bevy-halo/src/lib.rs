//! # Bevy Halo Crate
//!
//! Stateless atmosphere shells for Bevy 0.17: nested translucent spheres
//! drawn from the inside with additive blending, so a planet gets a soft
//! glowing rim without a custom shader.
//!
//! ## Usage
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_halo::*;
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//! ) {
//!     let config = HaloConfig {
//!         shells: vec![HaloShell {
//!             radius: 2.08,
//!             color: Color::srgb_u8(0x60, 0xB8, 0xFF),
//!             opacity: 0.12,
//!         }],
//!         segments: 48,
//!     };
//!
//!     for shell in HaloBuilder::new(config).build() {
//!         commands.spawn((
//!             Mesh3d(meshes.add(shell.mesh)),
//!             MeshMaterial3d(materials.add(shell.material)),
//!         ));
//!     }
//! }
//! ```

use bevy::color::{Alpha, Color};
use bevy::math::primitives::Sphere;
use bevy::mesh::{Mesh, Meshable};
use bevy::pbr::StandardMaterial;
use bevy::prelude::AlphaMode;
use bevy::render::render_resource::Face;

/// One translucent layer around the planet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloShell {
    /// Absolute radius of the shell
    pub radius: f32,
    pub color: Color,
    /// Multiplies the added color; keep it small, layers stack
    pub opacity: f32,
}

/// Shells to build, innermost first after sorting
#[derive(Debug, Clone, PartialEq)]
pub struct HaloConfig {
    pub shells: Vec<HaloShell>,
    /// Sectors and stacks of every shell sphere
    pub segments: u32,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            shells: Vec::new(),
            segments: 48,
        }
    }
}

/// One shell ready to render
pub struct HaloOutput {
    pub radius: f32,
    pub mesh: Mesh,
    pub material: StandardMaterial,
}

/// Builder for creating halo shells from external state
pub struct HaloBuilder {
    config: HaloConfig,
}

impl HaloBuilder {
    pub fn new(config: HaloConfig) -> Self {
        Self { config }
    }

    /// Build one mesh and material per shell, innermost first
    pub fn build(self) -> Vec<HaloOutput> {
        let segments = self.config.segments.max(3);
        let mut shells = self.config.shells;
        shells.sort_by(|a, b| a.radius.total_cmp(&b.radius));

        shells
            .into_iter()
            .filter(|shell| shell.radius > 0.0)
            .map(|shell| HaloOutput {
                radius: shell.radius,
                mesh: Sphere::new(shell.radius).mesh().uv(segments, segments),
                material: shell_material(&shell),
            })
            .collect()
    }
}

/// Back faces only, added on top of whatever is behind, never lit.
/// Blended passes do not write depth, so shells never hide each other.
pub fn shell_material(shell: &HaloShell) -> StandardMaterial {
    StandardMaterial {
        base_color: shell.color.with_alpha(shell.opacity.clamp(0.0, 1.0)),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        cull_mode: Some(Face::Front),
        double_sided: false,
        fog_enabled: false,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(radius: f32, opacity: f32) -> HaloShell {
        HaloShell {
            radius,
            color: Color::srgb(0.2, 0.5, 1.0),
            opacity,
        }
    }

    #[test]
    fn builds_one_output_per_shell_innermost_first() {
        let config = HaloConfig {
            shells: vec![shell(2.6, 0.02), shell(2.08, 0.12), shell(2.3, 0.055)],
            segments: 16,
        };

        let radii: Vec<f32> = HaloBuilder::new(config).build().iter().map(|o| o.radius).collect();

        assert_eq!(radii, vec![2.08, 2.3, 2.6]);
    }

    #[test]
    fn material_is_additive_and_renders_the_inside() {
        let material = shell_material(&shell(2.08, 0.12));

        assert!(matches!(material.alpha_mode, AlphaMode::Add));
        assert_eq!(material.cull_mode, Some(Face::Front));
        assert!(material.unlit);
        assert!((material.base_color.alpha() - 0.12).abs() < 1e-6);
    }

    #[test]
    fn degenerate_shells_are_skipped() {
        let config = HaloConfig {
            shells: vec![shell(0.0, 0.1), shell(-1.0, 0.1)],
            segments: 8,
        };
        assert!(HaloBuilder::new(config).build().is_empty());
    }
}
