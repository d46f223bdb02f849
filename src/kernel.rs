//! Kernel and threshold sanitization.
//!
//! Every slider-driven parameter goes through this module before it reaches an
//! image operator, so operators never see an even or out-of-range kernel.

/// Valid size range for an odd-kernel parameter.
///
/// Both ends must be odd. Sanitization clamps first and fixes parity second
/// (pushing even values up by one, never down); with odd ends the result can
/// never leave the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelRange {
    pub min: u32,
    pub max: u32,
}

impl KernelRange {
    pub const fn new(min: u32, max: u32) -> Self {
        debug_assert!(min >= 1 && min <= max);
        debug_assert!(min % 2 == 1 && max % 2 == 1);
        Self { min, max }
    }

    /// Nearest valid odd kernel size for a requested size.
    ///
    /// Requests within the range that are already odd come back unchanged.
    pub fn clamp_odd(&self, requested: i64) -> u32 {
        let clamped = requested.clamp(self.min as i64, self.max as i64) as u32;
        if clamped % 2 == 0 { clamped + 1 } else { clamped }
    }
}

/// Range used by most operators in this crate (medians, blurs, morphology).
pub const DEFAULT_KERNEL_RANGE: KernelRange = KernelRange::new(1, 31);

/// Derive a kernel size from a continuous intensity value:
/// `round(base + 2 * intensity * scale)`, then clamp and oddify.
pub fn scaled_kernel(base: f32, scale: f32, intensity: f32, range: KernelRange) -> u32 {
    let requested = (base + 2.0 * intensity * scale).round() as i64;
    range.clamp_odd(requested)
}

/// Scale a threshold linearly with intensity: `round(base * intensity)`,
/// floored at zero.
pub fn scaled_threshold(base: f32, intensity: f32) -> f32 {
    (base * intensity).round().max(0.0)
}

/// Radius of the square window for an odd kernel size.
pub fn kernel_radius(kernel_size: u32) -> u32 {
    kernel_size / 2
}
