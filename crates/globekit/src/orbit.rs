use crate::animation::smoothing_factor;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Keeps the camera off the exact poles where "up" degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Per-device orbit tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSettings {
    pub min_distance: f32,
    pub max_distance: f32,
    pub initial_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl OrbitSettings {
    pub const fn desktop() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 8.0,
            initial_distance: 4.5,
            rotate_speed: 0.5,
            zoom_speed: 0.5,
        }
    }

    /// Tighter distance bounds and faster turning for touch.
    pub const fn mobile() -> Self {
        Self {
            min_distance: 3.5,
            max_distance: 7.0,
            initial_distance: 5.5,
            rotate_speed: 0.7,
            zoom_speed: 0.5,
        }
    }

    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

/// Gesture deltas gathered over one frame. Pan is not representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitInput {
    /// Drag in pixels
    pub rotate: Vec2,
    /// Positive zooms in
    pub zoom_steps: f32,
    /// Current finger span over previous span, 1.0 when not pinching
    pub pinch: f32,
}

impl Default for OrbitInput {
    fn default() -> Self {
        Self {
            rotate: Vec2::ZERO,
            zoom_steps: 0.0,
            pinch: 1.0,
        }
    }
}

impl OrbitInput {
    pub fn is_idle(&self) -> bool {
        self.rotate == Vec2::ZERO && self.zoom_steps == 0.0 && self.pinch == 1.0
    }

    pub fn merge(self, other: OrbitInput) -> Self {
        Self {
            rotate: self.rotate + other.rotate,
            zoom_steps: self.zoom_steps + other.zoom_steps,
            pinch: self.pinch * other.pinch,
        }
    }
}

/// Only the direction of each wheel event counts, like browser orbit controls.
pub fn wheel_steps(deltas: impl IntoIterator<Item = f32>) -> f32 {
    deltas
        .into_iter()
        .filter(|d| *d != 0.0)
        .map(f32::signum)
        .sum()
}

/// One active touch: where it was last frame and where it is now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub previous: Vec2,
    pub current: Vec2,
}

/// One finger rotates; two fingers dolly and rotate at once.
pub fn touch_input(touches: &[TouchSample]) -> OrbitInput {
    match touches {
        [one] => OrbitInput {
            rotate: one.current - one.previous,
            ..Default::default()
        },
        [a, b] => {
            let previous_mid = (a.previous + b.previous) * 0.5;
            let current_mid = (a.current + b.current) * 0.5;
            let previous_span = a.previous.distance(b.previous);
            let current_span = a.current.distance(b.current);
            let pinch = if previous_span > f32::EPSILON && current_span > f32::EPSILON {
                current_span / previous_span
            } else {
                1.0
            };
            OrbitInput {
                rotate: current_mid - previous_mid,
                zoom_steps: 0.0,
                pinch,
            }
        }
        _ => OrbitInput::default(),
    }
}

/// Camera orbit around the globe center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Azimuth around +Y, 0 looks down -Z from +Z
    pub yaw: f32,
    /// Elevation above the equator plane
    pub pitch: f32,
    pub distance: f32,
    /// Rotation still to be applied, drained by damping
    pending: Vec2,
}

impl OrbitState {
    pub fn new(settings: &OrbitSettings) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: settings.clamp_distance(settings.initial_distance),
            pending: Vec2::ZERO,
        }
    }

    /// Fold one frame of input in and apply the damped share of pending rotation.
    ///
    /// A drag across the full viewport height turns `TAU * rotate_speed`.
    /// With `damping` of 0.05, 5% of the pending rotation lands per 1/60 s.
    pub fn advance(
        self,
        input: &OrbitInput,
        settings: &OrbitSettings,
        viewport_height: f32,
        damping: f32,
        dt: f32,
    ) -> Self {
        let mut next = self;

        if viewport_height > 0.0 {
            let per_pixel = TAU / viewport_height * settings.rotate_speed;
            next.pending += Vec2::new(-input.rotate.x, input.rotate.y) * per_pixel;
        }

        let share = if damping > 0.0 {
            smoothing_factor(damping, dt)
        } else {
            1.0
        };
        let applied = next.pending * share;
        next.pending -= applied;
        next.yaw = (next.yaw + applied.x).rem_euclid(TAU);
        next.pitch = (next.pitch + applied.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let mut distance = next.distance;
        if input.zoom_steps != 0.0 {
            distance *= 0.95_f32.powf(settings.zoom_speed * input.zoom_steps);
        }
        if input.pinch > 0.0 && input.pinch != 1.0 {
            distance /= input.pinch.powf(settings.zoom_speed);
        }
        next.distance = settings.clamp_distance(distance);

        next
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance
    }

    pub fn is_settled(&self) -> bool {
        self.pending.length_squared() < 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::REFERENCE_FRAME;
    use rstest::rstest;

    #[test]
    fn mobile_range_is_tighter_and_turns_faster() {
        let (desktop, mobile) = (OrbitSettings::desktop(), OrbitSettings::mobile());

        assert!(mobile.min_distance > desktop.min_distance);
        assert!(mobile.max_distance < desktop.max_distance);
        assert!(mobile.rotate_speed > desktop.rotate_speed);
    }

    const EPS: f32 = 1e-4;

    #[rstest]
    #[case(OrbitSettings::desktop(), 4.5)]
    #[case(OrbitSettings::mobile(), 5.5)]
    fn starts_on_positive_z_at_initial_distance(#[case] settings: OrbitSettings, #[case] distance: f32) {
        let state = OrbitState::new(&settings);
        assert!((state.camera_position() - Vec3::new(0.0, 0.0, distance)).length() < EPS);
    }

    #[rstest]
    #[case(OrbitSettings::desktop(), 100.0, 3.0)]
    #[case(OrbitSettings::desktop(), -100.0, 8.0)]
    #[case(OrbitSettings::mobile(), 100.0, 3.5)]
    #[case(OrbitSettings::mobile(), -100.0, 7.0)]
    fn zoom_is_clamped_per_device(
        #[case] settings: OrbitSettings,
        #[case] steps: f32,
        #[case] expected: f32,
    ) {
        let input = OrbitInput {
            zoom_steps: steps,
            ..Default::default()
        };
        let state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.0, REFERENCE_FRAME);
        assert!((state.distance - expected).abs() < EPS);
    }

    #[test]
    fn one_wheel_step_scales_distance() {
        let settings = OrbitSettings::desktop();
        let input = OrbitInput {
            zoom_steps: 1.0,
            ..Default::default()
        };
        let state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.0, REFERENCE_FRAME);
        assert!((state.distance - 4.5 * 0.95_f32.powf(0.5)).abs() < EPS);
    }

    #[test]
    fn full_height_drag_turns_by_rotate_speed() {
        let settings = OrbitSettings::desktop();
        let input = OrbitInput {
            rotate: Vec2::new(-400.0, 0.0),
            ..Default::default()
        };
        let state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.0, REFERENCE_FRAME);
        // half the height at speed 0.5 is a quarter of TAU / 2
        assert!((state.yaw - std::f32::consts::FRAC_PI_2).abs() < EPS, "yaw {}", state.yaw);
    }

    #[test]
    fn damping_spreads_rotation_over_frames_without_losing_it() {
        let settings = OrbitSettings::desktop();
        let input = OrbitInput {
            rotate: Vec2::new(-100.0, 0.0),
            ..Default::default()
        };
        let idle = OrbitInput::default();

        let mut state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.05, REFERENCE_FRAME);
        let first = state.yaw;
        for _ in 0..2000 {
            state = state.advance(&idle, &settings, 800.0, 0.05, REFERENCE_FRAME);
        }

        let total = TAU / 800.0 * 0.5 * 100.0;
        assert!((first - total * 0.05).abs() < EPS);
        assert!((state.yaw - total).abs() < EPS);
        assert!(state.is_settled());
    }

    #[test]
    fn pitch_never_flips_over_the_pole() {
        let settings = OrbitSettings::desktop();
        let input = OrbitInput {
            rotate: Vec2::new(0.0, 100_000.0),
            ..Default::default()
        };
        let state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.0, REFERENCE_FRAME);
        assert!(state.pitch <= PITCH_LIMIT);
        assert!(state.camera_position().y < state.distance);
    }

    #[test]
    fn one_finger_rotates_only() {
        let input = touch_input(&[TouchSample {
            previous: Vec2::new(10.0, 10.0),
            current: Vec2::new(25.0, 5.0),
        }]);
        assert_eq!(input.rotate, Vec2::new(15.0, -5.0));
        assert_eq!(input.pinch, 1.0);
    }

    #[test]
    fn two_fingers_dolly_and_rotate_together() {
        let input = touch_input(&[
            TouchSample {
                previous: Vec2::new(0.0, 0.0),
                current: Vec2::new(-10.0, 20.0),
            },
            TouchSample {
                previous: Vec2::new(100.0, 0.0),
                current: Vec2::new(110.0, 20.0),
            },
        ]);
        assert_eq!(input.rotate, Vec2::new(0.0, 20.0));
        assert!((input.pinch - 1.2).abs() < EPS);

        let settings = OrbitSettings::mobile();
        let state = OrbitState::new(&settings).advance(&input, &settings, 800.0, 0.0, REFERENCE_FRAME);
        assert!(state.distance < settings.initial_distance);
        assert!(state.pitch > 0.0);
    }

    #[test]
    fn three_fingers_do_nothing() {
        let touch = TouchSample {
            previous: Vec2::ZERO,
            current: Vec2::ONE,
        };
        assert!(touch_input(&[touch, touch, touch]).is_idle());
    }

    #[test]
    fn wheel_counts_direction_only() {
        assert_eq!(wheel_steps([120.0, 3.0, -0.5, 0.0]), 1.0);
    }
}
