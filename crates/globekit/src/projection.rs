use glam::{Vec2, Vec3};

/// Convert geographic coordinates (degrees) to a point on a sphere of `radius`.
///
/// Latitude 90 maps to +Y. Longitude is shifted by 180 degrees so that -180
/// lands on the texture seam (`u = 0`) of [`crate::mesh_data::MeshData::uv_sphere`].
pub fn project(lat: f32, lng: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Map normalized device coordinates to top-left origin screen pixels.
pub fn ndc_to_screen(ndc: Vec3, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (-ndc.y * 0.5 + 0.5) * viewport.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f32 = 1e-4;

    #[rstest]
    #[case(-180.0)]
    #[case(-73.5)]
    #[case(0.0)]
    #[case(42.0)]
    #[case(180.0)]
    fn north_pole_ignores_longitude(#[case] lng: f32) {
        let p = project(90.0, lng, 2.0);
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < EPS, "got {p:?}");
    }

    #[rstest]
    #[case(-120.0)]
    #[case(0.0)]
    #[case(97.3)]
    fn south_pole_ignores_longitude(#[case] lng: f32) {
        let p = project(-90.0, lng, 3.5);
        assert!((p - Vec3::new(0.0, -3.5, 0.0)).length() < EPS, "got {p:?}");
    }

    #[test]
    fn projected_points_lie_on_the_sphere() {
        let radius = 2.02;
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lng = -180.0;
            while lng <= 180.0 {
                let p = project(lat, lng, radius);
                assert!(
                    (p.length() - radius).abs() < EPS,
                    "lat {lat} lng {lng} gave norm {}",
                    p.length()
                );
                lng += 15.0;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn prime_meridian_on_equator_faces_positive_x() {
        // theta = 180deg, so x = -r * cos(pi) = r
        let p = project(0.0, 0.0, 1.0);
        assert!((p - Vec3::X).length() < EPS, "got {p:?}");
    }

    #[test]
    fn ndc_center_maps_to_viewport_center() {
        let screen = ndc_to_screen(Vec3::ZERO, Vec2::new(800.0, 600.0));
        assert_eq!(screen, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn ndc_top_left_maps_to_origin() {
        let screen = ndc_to_screen(Vec3::new(-1.0, 1.0, 0.5), Vec2::new(1024.0, 768.0));
        assert_eq!(screen, Vec2::ZERO);
    }
}
