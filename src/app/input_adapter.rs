//! Winit Input Adapter
//!
//! Translates winit window events into the engine's platform-agnostic
//! [`GestureEvent`]s. Winit reports physical coordinates and does not attach
//! a position to wheel events, so the adapter tracks the cursor and converts
//! everything to logical units before handing it to the gesture decoder.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::gestures::{GestureEvent, TouchPhase};

/// Small stateful translator from winit events to gesture events.
#[derive(Debug, Default)]
pub struct WinitInputAdapter {
    cursor: Vec2,
}

impl WinitInputAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates one window event; returns the gesture event to feed the
    /// engine, if the event is input-relevant.
    pub fn translate(&mut self, event: &WindowEvent, scale_factor: f32) -> Option<GestureEvent> {
        let to_logical = |x: f64, y: f64| Vec2::new(x as f32, y as f32) / scale_factor.max(0.01);

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = to_logical(position.x, position.y);
                Some(GestureEvent::PointerMoved {
                    position: self.cursor,
                })
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => Some(match state {
                ElementState::Pressed => GestureEvent::PointerPressed {
                    position: self.cursor,
                },
                ElementState::Released => GestureEvent::PointerReleased,
            }),

            WindowEvent::MouseWheel { delta, .. } => {
                // DOM convention: positive delta_y zooms out. Winit's y axis
                // is positive when scrolling away from the user, so flip it.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        const PIXEL_SCALE: f32 = 0.01;
                        -(pos.y as f32) * PIXEL_SCALE
                    }
                };
                if delta_y == 0.0 {
                    return None;
                }
                Some(GestureEvent::Wheel {
                    position: self.cursor,
                    delta_y,
                })
            }

            WindowEvent::Touch(touch) => {
                let phase = match touch.phase {
                    winit::event::TouchPhase::Started => TouchPhase::Started,
                    winit::event::TouchPhase::Moved => TouchPhase::Moved,
                    winit::event::TouchPhase::Ended => TouchPhase::Ended,
                    winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
                };
                Some(GestureEvent::Touch {
                    id: touch.id,
                    phase,
                    position: to_logical(touch.location.x, touch.location.y),
                })
            }

            _ => None,
        }
    }
}
