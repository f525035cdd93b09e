//! Per-frame reducers. Every animated quantity advances as
//! `advance(state, dt) -> state` so the frame loop is a plain fold over entities.

use std::f32::consts::TAU;

/// Reference frame length the per-frame smoothing constants were tuned at.
pub const REFERENCE_FRAME: f32 = 1.0 / 60.0;

/// Convert a per-reference-frame lerp factor into one for an arbitrary `dt`.
///
/// `factor` of 0.1 at 60 fps closes 10% of the gap each frame; at 30 fps the
/// same wall-clock convergence needs `1 - 0.9^2 = 0.19`.
pub fn smoothing_factor(factor: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let keep = (1.0 - factor.clamp(0.0, 1.0)).powf(dt / REFERENCE_FRAME);
    1.0 - keep
}

/// Exponentially approach `target`.
pub fn approach(current: f32, target: f32, factor: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(factor, dt)
}

/// Rotation of the whole point/arc/surface assembly around +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spin {
    pub angle: f32,
}

impl Spin {
    /// `speed` is in radians per second.
    pub fn advance(self, speed: f32, dt: f32) -> Self {
        Self {
            angle: (self.angle + speed * dt).rem_euclid(TAU),
        }
    }
}

/// Flowing opacity pulse of one arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPulse {
    /// Always in `[0, 1)`
    pub phase: f32,
}

impl ArcPulse {
    pub fn new(phase: f32) -> Self {
        Self {
            phase: phase.rem_euclid(1.0),
        }
    }

    pub fn advance(self, rate: f32, dt: f32) -> Self {
        Self::new(self.phase + rate * dt)
    }

    pub fn opacity(self, base: f32, swing: f32) -> f32 {
        base + (self.phase * TAU).sin() * swing
    }
}

/// Opacity and scale of the placeholder sphere shown while textures load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingPulse {
    pub opacity: f32,
    pub scale: f32,
}

impl LoadingPulse {
    /// `t` is elapsed seconds multiplied by the configured time scale.
    pub fn at(t: f32, base_opacity: f32, opacity_swing: f32, scale_swing: f32) -> Self {
        Self {
            opacity: base_opacity + t.sin() * opacity_swing,
            scale: 1.0 + (t * 1.5).sin() * scale_swing,
        }
    }
}
