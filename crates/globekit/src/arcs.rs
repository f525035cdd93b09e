use crate::config::ArcConfig;
use crate::dataset::GeoPoint;
use crate::projection::project;
use glam::Vec3;

/// Quadratic Bézier between two surface points, bulging away from the globe center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCurve {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl ArcCurve {
    /// Build the curve for two already projected endpoints lying on a sphere of `radius`.
    ///
    /// Longer connections arc higher: the control point sits on the midpoint
    /// direction at `radius + height_factor * |end - start|`.
    pub fn between(start: Vec3, end: Vec3, radius: f32, height_factor: f32) -> Self {
        let mid = (start + end) * 0.5;
        // antipodal endpoints have no midpoint direction
        let direction = mid
            .try_normalize()
            .unwrap_or_else(|| start.normalize_or(Vec3::Y).any_orthonormal_vector());
        let control = direction * (radius + start.distance(end) * height_factor);

        Self {
            start,
            control,
            end,
        }
    }

    pub fn for_points(from: &GeoPoint, to: &GeoPoint, globe_radius: f32, config: &ArcConfig) -> Self {
        let radius = globe_radius + config.surface_offset;
        Self::between(
            project(from.lat, from.lng, radius),
            project(to.lat, to.lng, radius),
            radius,
            config.height_factor,
        )
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `count` evenly spaced samples, the first equal to `start` and the last to `end`.
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let last = (count - 1) as f32;
                (0..count)
                    .map(|i| match i {
                        0 => self.start,
                        i if i == count - 1 => self.end,
                        i => self.point_at(i as f32 / last),
                    })
                    .collect()
            }
        }
    }
}
