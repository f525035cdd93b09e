use bevy::math::{Quat, Vec2, Vec3};
use bevy::transform::components::Transform;
use globekit::orbit::{OrbitInput, OrbitSettings, OrbitState, TouchSample, touch_input, wheel_steps};

pub struct CameraInput {
    pub mouse_left_pressed: bool,
    pub mouse_delta: Vec2,
    pub wheel_deltas: Vec<f32>,
    pub touches: Vec<TouchSample>,
    pub viewport_height: f32,
}

pub struct CameraTransformUpdate {
    pub orbit: OrbitState,
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Merge mouse and touch gestures into one orbit input.
/// Only the left button rotates; touches override the mouse when present.
pub fn gather_orbit_input(input: &CameraInput) -> OrbitInput {
    let wheel = OrbitInput {
        zoom_steps: wheel_steps(input.wheel_deltas.iter().copied()),
        ..Default::default()
    };

    let gesture = if !input.touches.is_empty() {
        touch_input(&input.touches)
    } else if input.mouse_left_pressed {
        OrbitInput {
            rotate: input.mouse_delta,
            ..Default::default()
        }
    } else {
        OrbitInput::default()
    };

    gesture.merge(wheel)
}

/// Advance the orbit and return where the camera should be, looking at the globe center.
/// `None` when nothing moves: no gesture this frame and no rotation left to drain.
pub fn calculate_camera_transform(
    orbit: OrbitState,
    settings: &OrbitSettings,
    input: &CameraInput,
    damping: f32,
    delta_time: f32,
) -> Option<CameraTransformUpdate> {
    let orbit_input = gather_orbit_input(input);
    if orbit_input.is_idle() && orbit.is_settled() {
        return None;
    }
    let orbit = orbit.advance(&orbit_input, settings, input.viewport_height, damping, delta_time);
    let translation = orbit.camera_position();
    let rotation = look_at_origin(translation);

    Some(CameraTransformUpdate {
        orbit,
        translation,
        rotation,
    })
}

fn look_at_origin(eye: Vec3) -> Quat {
    Transform::from_translation(eye)
        .looking_at(Vec3::ZERO, Vec3::Y)
        .rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn default_input() -> CameraInput {
        CameraInput {
            mouse_left_pressed: false,
            mouse_delta: Vec2::ZERO,
            wheel_deltas: Vec::new(),
            touches: Vec::new(),
            viewport_height: 900.0,
        }
    }

    #[test]
    fn test_no_input_leaves_camera_alone() {
        let settings = OrbitSettings::desktop();
        let result = calculate_camera_transform(OrbitState::new(&settings), &settings, &default_input(), 0.05, 1.0 / 60.0);

        assert!(result.is_none());
    }

    #[test]
    fn test_drag_keeps_easing_after_release() {
        let settings = OrbitSettings::desktop();
        let mut input = default_input();
        input.mouse_left_pressed = true;
        input.mouse_delta = Vec2::new(90.0, 0.0);
        let dragged = calculate_camera_transform(OrbitState::new(&settings), &settings, &input, 0.05, 1.0 / 60.0).unwrap();

        let released = calculate_camera_transform(dragged.orbit, &settings, &default_input(), 0.05, 1.0 / 60.0).unwrap();

        assert!(released.orbit.yaw != dragged.orbit.yaw);
        // looking at the globe from the new position
        let forward = released.rotation * Vec3::NEG_Z;
        assert!((forward + released.translation.normalize()).length() < 1e-3);
    }

    #[test]
    fn test_small_wheel_moves_from_initial_view() {
        let settings = OrbitSettings::desktop();
        let mut input = default_input();
        input.wheel_deltas = vec![1.0];

        let result = calculate_camera_transform(OrbitState::new(&settings), &settings, &input, 0.05, 1.0 / 60.0).unwrap();

        assert!(result.translation.length() < settings.initial_distance);
        assert!((result.translation.normalize() - Vec3::Z).length() < 1e-4);
    }

    #[rstest]
    #[case(true, Vec2::new(40.0, 0.0), true)]
    #[case(false, Vec2::new(40.0, 0.0), false)]
    fn test_mouse_rotation_requires_left_button(
        #[case] pressed: bool,
        #[case] delta: Vec2,
        #[case] rotates: bool,
    ) {
        let mut input = default_input();
        input.mouse_left_pressed = pressed;
        input.mouse_delta = delta;

        assert_eq!(gather_orbit_input(&input).rotate != Vec2::ZERO, rotates);
    }

    #[rstest]
    #[case(vec![120.0], 1.0)]
    #[case(vec![-3.0, -3.0], -2.0)]
    #[case(vec![], 0.0)]
    fn test_wheel_counts_steps(#[case] deltas: Vec<f32>, #[case] steps: f32) {
        let mut input = default_input();
        input.wheel_deltas = deltas;

        assert_eq!(gather_orbit_input(&input).zoom_steps, steps);
    }

    #[test]
    fn test_touch_takes_precedence_over_mouse() {
        let mut input = default_input();
        input.mouse_left_pressed = true;
        input.mouse_delta = Vec2::new(100.0, 0.0);
        input.touches = vec![TouchSample {
            previous: Vec2::ZERO,
            current: Vec2::new(0.0, 10.0),
        }];

        assert_eq!(gather_orbit_input(&input).rotate, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_camera_always_faces_the_globe() {
        let settings = OrbitSettings::mobile();
        let mut orbit = OrbitState::new(&settings);
        let mut input = default_input();
        input.mouse_left_pressed = true;
        input.mouse_delta = Vec2::new(37.0, 21.0);

        for _ in 0..30 {
            let result = calculate_camera_transform(orbit, &settings, &input, 0.0, 1.0 / 60.0).unwrap();
            let forward = result.rotation * Vec3::NEG_Z;
            assert!((forward + result.translation.normalize()).length() < 1e-3);
            assert!(result.translation.length() >= settings.min_distance - 1e-4);
            orbit = result.orbit;
        }
    }
}
