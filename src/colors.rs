//! Indicator light palette.
//!
//! The reference board drives a discrete RGB LED with plain GPIO, so every
//! color here has channels at either 0.0 or 1.0. PWM boards may scale them.

use palette::Srgb;

/// All channels off.
pub const OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);

/// Red and green together; shown while booting.
pub const AMBER: Srgb = Srgb::new(1.0, 1.0, 0.0);

/// Idle and ready to record.
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);

/// Recording.
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);

/// Read-back, missing storage and the per-sample flash.
pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);

/// Red and blue together; shown while in Error.
pub const PURPLE: Srgb = Srgb::new(1.0, 0.0, 1.0);

/// Returns true if the channel should be driven high on a GPIO-only LED.
#[inline]
pub fn channel_on(value: f32) -> bool {
    value >= 0.5
}
