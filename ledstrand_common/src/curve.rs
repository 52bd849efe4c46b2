//! Ramp curve, channel scaling and PWM duty conversion.
//!
//! Commanded brightness is normalized to `n` in `[0.0, 1.0]`, shaped by the
//! ramp curve `f(n) = n^k` and quantized to the PWM range. A root-topic
//! command additionally caps each strand at its root scaling factor; the cap
//! is folded into `n` so that fades stay on the curve.

use crate::consts::{BRIGHTNESS_MAX, PWM_RANGE};

/// Perceptual brightness curve `f(n) = n^coefficient`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampCurve {
    coefficient: f64,
}

impl RampCurve {
    /// Linear: `f(n) = n`.
    pub const LINEAR: Self = Self { coefficient: 1.0 };

    /// Quadratic: `f(n) = n²`.
    pub const QUADRATIC: Self = Self { coefficient: 2.0 };

    /// Square root: `f(n) = √n`.
    pub const SQUARE_ROOT: Self = Self { coefficient: 0.5 };

    /// Create a curve. The coefficient must be finite and > 0; the settings
    /// loader guarantees this for configured curves.
    pub const fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Evaluate the curve for a normalized input, clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn apply(&self, n: f64) -> f64 {
        let n = n.clamp(0.0, 1.0);
        if self.coefficient == 1.0 {
            return n;
        }
        n.powf(self.coefficient)
    }

    /// Input factor `c` with `f(n·c) = ceiling·f(n)`, i.e. `ceiling^(1/k)`.
    ///
    /// Multiplying a normalized level by this factor caps the curve output
    /// at `ceiling` (clamped to `[0.0, 1.0]`).
    #[inline]
    pub fn ceiling_input(&self, ceiling: f64) -> f64 {
        let ceiling = ceiling.clamp(0.0, 1.0);
        if self.coefficient == 1.0 {
            return ceiling;
        }
        ceiling.powf(self.coefficient.recip())
    }
}

impl Default for RampCurve {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// Normalize a 0–255 brightness value.
#[inline]
pub fn normalize_brightness(brightness: u8) -> f64 {
    f64::from(brightness) / f64::from(BRIGHTNESS_MAX)
}

/// Quantize an output level in `[0.0, 1.0]` to a PWM duty value.
#[inline]
pub fn to_duty(level: f64) -> u16 {
    let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
    // in 0.0..=PWM_RANGE after the clamp
    (level * f64::from(PWM_RANGE)).round() as u16
}
