//! Camera-ray hit testing against marker spheres.

use glam::Vec3;

/// Distance along the ray to the first hit with a sphere, if any.
/// A ray starting inside the sphere hits at distance 0.
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let direction = direction.try_normalize()?;
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;
    if far < 0.0 {
        None
    } else {
        Some(near.max(0.0))
    }
}

/// A pickable sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget<K> {
    pub key: K,
    pub center: Vec3,
    pub radius: f32,
}

/// Nearest target under the ray. Targets behind the occluding sphere
/// (the globe itself) are not reachable.
pub fn pick_nearest<K: Copy>(
    origin: Vec3,
    direction: Vec3,
    targets: impl IntoIterator<Item = PickTarget<K>>,
    occluder: Option<(Vec3, f32)>,
) -> Option<K> {
    let blocked_at = occluder
        .and_then(|(center, radius)| ray_sphere(origin, direction, center, radius))
        .unwrap_or(f32::INFINITY);

    targets
        .into_iter()
        .filter_map(|target| {
            ray_sphere(origin, direction, target.center, target.radius)
                .filter(|distance| *distance <= blocked_at)
                .map(|distance| (distance, target.key))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key)
}
