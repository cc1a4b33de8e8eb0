//! Viewer Configuration
//!
//! This module defines the configuration options for the viewer engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use loupe::config::{ViewerConfig, DoubleClickMode};
//!
//! let config = ViewerConfig {
//!     initial_scale: 1.0,
//!     min_scale: 0.1,
//!     max_scale: 10.0,
//!     smooth: true,
//!     ..Default::default()
//! };
//! ```

use crate::errors::{LoupeError, Result};

/// What a double-click / double-tap does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleClickMode {
    /// Flip between *fit* and *1:1* pixel parity, anchored at the activation point.
    Toggle,
    /// Apply the configured step factor about the activation point.
    Zoom,
}

/// Mouse wheel behaviour.
#[derive(Debug, Clone, Copy)]
pub struct WheelConfig {
    /// Fractional zoom applied per wheel tick: `deltaY > 0` shrinks by
    /// `1 - step`, `deltaY < 0` grows by `1 + step`.
    pub step: f32,
    /// Ignore wheel events entirely.
    pub disabled: bool,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            disabled: false,
        }
    }
}

/// One-finger / primary-button drag behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanningConfig {
    /// Ignore drag gestures entirely.
    pub disabled: bool,
}

/// Two-finger pinch behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinchConfig {
    /// Ignore pinch gestures entirely.
    pub disabled: bool,
}

/// Double-click / double-tap behaviour.
#[derive(Debug, Clone, Copy)]
pub struct DoubleClickConfig {
    /// Ignore double activations entirely.
    pub disabled: bool,
    /// What a double activation does.
    pub mode: DoubleClickMode,
    /// Zoom factor used in [`DoubleClickMode::Zoom`].
    pub step: f32,
    /// Animation duration for the double-activation ease, in milliseconds.
    pub animation_time: f32,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            mode: DoubleClickMode::Toggle,
            step: 2.0,
            animation_time: 300.0,
        }
    }
}

/// Configuration options for the viewer engine.
///
/// All scale options are expressed *relative to the fit scale* `F`, the scale
/// at which the image exactly fits the viewport along its tighter axis.
///
/// # Fields
///
/// | Field | Description | Default |
/// |-------|-------------|---------|
/// | `initial_scale` | Initial scale relative to fit | `1.0` |
/// | `min_scale` | Lower scale bound relative to fit | `0.5` |
/// | `max_scale` | Upper scale bound relative to fit (floor-overridden so 1:1 stays reachable) | `10.0` |
/// | `wheel` | Wheel step and enablement | step `0.1` |
/// | `panning` | Drag enablement | enabled |
/// | `pinch` | Pinch enablement | enabled |
/// | `double_click` | Double-activation mode, step, duration | toggle, 300 ms |
/// | `smooth` | Eased animations (when `false`, all animations are instant) | `true` |
/// | `center_on_init` | Center the image after `load` | `true` |
/// | `limit_to_bounds` | Keep the image covering / centered in the viewport | `true` |
/// | `debug` | Emit per-frame debug snapshots | `false` |
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Initial scale relative to fit.
    pub initial_scale: f32,
    /// Minimum scale relative to fit.
    pub min_scale: f32,
    /// Maximum scale relative to fit.
    ///
    /// The absolute maximum is `max(F * max_scale, 1.0)` so the user can
    /// always reach 1:1 pixel parity regardless of this value.
    pub max_scale: f32,
    /// Mouse wheel behaviour.
    pub wheel: WheelConfig,
    /// Drag behaviour.
    pub panning: PanningConfig,
    /// Pinch behaviour.
    pub pinch: PinchConfig,
    /// Double-click / double-tap behaviour.
    pub double_click: DoubleClickConfig,
    /// Enable eased animations. When `false`, animation durations are zero.
    pub smooth: bool,
    /// Center the image in the viewport after `load`.
    pub center_on_init: bool,
    /// Constrain translation so the image covers the viewport when zoomed past
    /// fit and is centered when smaller.
    pub limit_to_bounds: bool,
    /// Emit a debug snapshot after every rendered frame.
    pub debug: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_scale: 1.0,
            min_scale: 0.5,
            max_scale: 10.0,
            wheel: WheelConfig::default(),
            panning: PanningConfig::default(),
            pinch: PinchConfig::default(),
            double_click: DoubleClickConfig::default(),
            smooth: true,
            center_on_init: true,
            limit_to_bounds: true,
            debug: false,
        }
    }
}

impl ViewerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoupeError::InvalidConfig`] when a value is out of its legal
    /// range (non-positive scales, inverted min/max, non-positive wheel step).
    pub fn validate(&self) -> Result<()> {
        if self.min_scale <= 0.0 {
            return Err(LoupeError::InvalidConfig(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.max_scale < self.min_scale {
            return Err(LoupeError::InvalidConfig(format!(
                "max_scale ({}) must not be below min_scale ({})",
                self.max_scale, self.min_scale
            )));
        }
        if self.initial_scale < self.min_scale || self.initial_scale > self.max_scale {
            return Err(LoupeError::InvalidConfig(format!(
                "initial_scale ({}) must lie within [min_scale, max_scale]",
                self.initial_scale
            )));
        }
        if self.wheel.step <= 0.0 || self.wheel.step >= 1.0 {
            return Err(LoupeError::InvalidConfig(format!(
                "wheel.step must lie in (0, 1), got {}",
                self.wheel.step
            )));
        }
        if self.double_click.step <= 0.0 {
            return Err(LoupeError::InvalidConfig(format!(
                "double_click.step must be positive, got {}",
                self.double_click.step
            )));
        }
        if self.double_click.animation_time < 0.0 {
            return Err(LoupeError::InvalidConfig(
                "double_click.animation_time must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective animation duration in milliseconds for the default ease.
    ///
    /// Zero when `smooth` is off, which makes every animation finalize on its
    /// first tick.
    #[must_use]
    pub fn animation_duration_ms(&self) -> f32 {
        if self.smooth { 300.0 } else { 0.0 }
    }

    /// Effective animation duration for double activations.
    #[must_use]
    pub fn double_click_duration_ms(&self) -> f32 {
        if self.smooth {
            self.double_click.animation_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_scale_range() {
        let config = ViewerConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_wheel_step() {
        let config = ViewerConfig {
            wheel: WheelConfig {
                step: 1.5,
                disabled: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn smooth_off_zeroes_durations() {
        let config = ViewerConfig {
            smooth: false,
            ..Default::default()
        };
        assert_eq!(config.animation_duration_ms(), 0.0);
        assert_eq!(config.double_click_duration_ms(), 0.0);
    }
}
