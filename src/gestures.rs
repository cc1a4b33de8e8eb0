//! Gesture Decoder
//!
//! Translates platform-agnostic pointer, wheel and multi-touch events into
//! typed pan/zoom intents. The decoder owns all transient gesture state
//! (drag tracking, pinch distance, double-click and double-tap timing) and
//! never touches transform or GPU state; the engine consumes the emitted
//! intents.
//!
//! Concrete platform adapters (e.g. the winit adapter in [`crate::app`]) are
//! responsible for translating window events into [`GestureEvent`]s.

use std::time::Instant;

use glam::Vec2;

use crate::config::ViewerConfig;

/// Two presses within this window count as a double activation.
const DOUBLE_ACTIVATION_MS: u128 = 300;

/// Maximum per-axis distance between two taps of a double-tap, in logical
/// units.
const TAP_SLOP: f32 = 50.0;

/// Touch phase, mirroring the host's touch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Platform-agnostic input event consumed by the decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Primary button pressed at a viewport position.
    PointerPressed { position: Vec2 },
    /// Pointer moved (with or without a press).
    PointerMoved { position: Vec2 },
    /// Primary button released.
    PointerReleased,
    /// Wheel tick at a viewport position. Positive `delta_y` zooms out.
    Wheel { position: Vec2, delta_y: f32 },
    /// A single touch changed.
    Touch {
        id: u64,
        phase: TouchPhase,
        position: Vec2,
    },
}

/// A decoded manipulation intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// User input arrived; any in-flight animation must be cancelled in place.
    Interrupt,
    /// Translate the image by a viewport-space delta.
    Pan { delta: Vec2 },
    /// Zoom by `factor` about a viewport-space anchor, unanimated.
    ZoomAbout { anchor: Vec2, factor: f32 },
    /// Double-click or double-tap at a viewport-space anchor.
    DoubleActivate { anchor: Vec2 },
}

/// Gesture state machine.
///
/// One instance per engine; reset on teardown.
#[derive(Debug, Default)]
pub struct GestureDecoder {
    dragging: bool,
    last_pointer: Vec2,
    touches: Vec<(u64, Vec2)>,
    last_pinch_distance: Option<f32>,
    last_click: Option<Instant>,
    last_tap: Option<(Instant, Vec2)>,
}

impl GestureDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a one-finger / primary-button drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Number of currently tracked touch points.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Clears all gesture state, including pending tap timing. Called on
    /// teardown.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decodes one event into zero or more intents.
    pub fn handle(&mut self, event: GestureEvent, config: &ViewerConfig) -> Vec<GestureIntent> {
        match event {
            GestureEvent::PointerPressed { position } => self.on_pointer_pressed(position, config),
            GestureEvent::PointerMoved { position } => self.on_pointer_moved(position, config),
            GestureEvent::PointerReleased => {
                self.dragging = false;
                Vec::new()
            }
            GestureEvent::Wheel { position, delta_y } => self.on_wheel(position, delta_y, config),
            GestureEvent::Touch {
                id,
                phase,
                position,
            } => self.on_touch(id, phase, position, config),
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    fn on_pointer_pressed(&mut self, position: Vec2, config: &ViewerConfig) -> Vec<GestureIntent> {
        let mut intents = vec![GestureIntent::Interrupt];
        let now = Instant::now();

        // Double-click detection, debounced: a successful activation consumes
        // the stored press so a third click starts a fresh cycle.
        let is_double = self
            .last_click
            .is_some_and(|prev| now.duration_since(prev).as_millis() < DOUBLE_ACTIVATION_MS);
        if is_double && !config.double_click.disabled {
            self.last_click = None;
            intents.push(GestureIntent::DoubleActivate { anchor: position });
        } else {
            self.last_click = Some(now);
        }

        if !config.panning.disabled {
            self.dragging = true;
            self.last_pointer = position;
        }
        intents
    }

    fn on_pointer_moved(&mut self, position: Vec2, config: &ViewerConfig) -> Vec<GestureIntent> {
        if !self.dragging || config.panning.disabled {
            return Vec::new();
        }
        let delta = position - self.last_pointer;
        self.last_pointer = position;
        if delta == Vec2::ZERO {
            return Vec::new();
        }
        vec![GestureIntent::Pan { delta }]
    }

    // ========================================================================
    // Wheel
    // ========================================================================

    fn on_wheel(&mut self, position: Vec2, delta_y: f32, config: &ViewerConfig) -> Vec<GestureIntent> {
        if config.wheel.disabled || delta_y == 0.0 {
            return Vec::new();
        }
        let factor = if delta_y > 0.0 {
            1.0 - config.wheel.step
        } else {
            1.0 + config.wheel.step
        };
        vec![
            GestureIntent::Interrupt,
            GestureIntent::ZoomAbout {
                anchor: position,
                factor,
            },
        ]
    }

    // ========================================================================
    // Touch
    // ========================================================================

    fn on_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: Vec2,
        config: &ViewerConfig,
    ) -> Vec<GestureIntent> {
        match phase {
            TouchPhase::Started => self.on_touch_started(id, position, config),
            TouchPhase::Moved => self.on_touch_moved(id, position, config),
            TouchPhase::Ended | TouchPhase::Cancelled => self.on_touch_ended(id),
        }
    }

    fn on_touch_started(
        &mut self,
        id: u64,
        position: Vec2,
        config: &ViewerConfig,
    ) -> Vec<GestureIntent> {
        let mut intents = vec![GestureIntent::Interrupt];

        if !self.touches.iter().any(|(tid, _)| *tid == id) {
            self.touches.push((id, position));
        }

        match self.touches.len() {
            1 => {
                let now = Instant::now();
                // Strict thresholds: exactly 300 ms or exactly 50 units do
                // not fire. Resetting the stored tap prevents a triple-tap
                // from activating twice.
                let is_double_tap = self.last_tap.is_some_and(|(prev, pos)| {
                    now.duration_since(prev).as_millis() < DOUBLE_ACTIVATION_MS
                        && (position.x - pos.x).abs() < TAP_SLOP
                        && (position.y - pos.y).abs() < TAP_SLOP
                });
                if is_double_tap && !config.double_click.disabled {
                    self.last_tap = None;
                    intents.push(GestureIntent::DoubleActivate { anchor: position });
                } else {
                    self.last_tap = Some((now, position));
                }

                if !config.panning.disabled {
                    self.dragging = true;
                    self.last_pointer = position;
                }
            }
            2 => {
                // Second finger promotes the gesture to a pinch.
                self.dragging = false;
                self.last_pinch_distance = Some(self.pinch_distance());
            }
            _ => {}
        }
        intents
    }

    fn on_touch_moved(
        &mut self,
        id: u64,
        position: Vec2,
        config: &ViewerConfig,
    ) -> Vec<GestureIntent> {
        if let Some(entry) = self.touches.iter_mut().find(|(tid, _)| *tid == id) {
            entry.1 = position;
        } else {
            return Vec::new();
        }

        match self.touches.len() {
            1 => {
                if !self.dragging || config.panning.disabled {
                    return Vec::new();
                }
                let delta = position - self.last_pointer;
                self.last_pointer = position;
                if delta == Vec2::ZERO {
                    return Vec::new();
                }
                vec![GestureIntent::Pan { delta }]
            }
            2 => {
                if config.pinch.disabled {
                    return Vec::new();
                }
                let distance = self.pinch_distance();
                let Some(previous) = self.last_pinch_distance else {
                    self.last_pinch_distance = Some(distance);
                    return Vec::new();
                };
                self.last_pinch_distance = Some(distance);
                if previous <= f32::EPSILON || distance <= f32::EPSILON {
                    return Vec::new();
                }
                vec![GestureIntent::ZoomAbout {
                    anchor: self.pinch_midpoint(),
                    factor: distance / previous,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn on_touch_ended(&mut self, id: u64) -> Vec<GestureIntent> {
        self.touches.retain(|(tid, _)| *tid != id);
        self.last_pinch_distance = None;

        match self.touches.len() {
            0 => {
                self.dragging = false;
            }
            1 => {
                // The surviving finger continues as a drag without a jump.
                self.dragging = true;
                self.last_pointer = self.touches[0].1;
            }
            _ => {}
        }
        Vec::new()
    }

    fn pinch_distance(&self) -> f32 {
        self.touches[0].1.distance(self.touches[1].1)
    }

    fn pinch_midpoint(&self) -> Vec2 {
        (self.touches[0].1 + self.touches[1].1) * 0.5
    }
}
