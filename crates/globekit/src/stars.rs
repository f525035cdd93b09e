use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    /// Grayscale intensity in `0.0..=1.0`
    pub brightness: f32,
}

/// Scatter `count` stars uniformly over directions, in a shell from
/// `radius` to `radius + depth`. Same seed, same sky.
pub fn star_field(count: usize, radius: f32, depth: f32, seed: u64) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let direction = random_direction(&mut rng);
            let distance = radius + rng.random::<f32>() * depth;
            Star {
                position: direction * distance,
                brightness: rng.random_range(0.35..=1.0),
            }
        })
        .collect()
}

fn random_direction(rng: &mut impl Rng) -> Vec3 {
    // uniform on the sphere via z and azimuth
    let z: f32 = rng.random_range(-1.0..=1.0);
    let azimuth: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * azimuth.cos(), r * azimuth.sin(), z)
}
