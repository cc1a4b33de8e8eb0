//! Gesture decoder tests
//!
//! Tests for:
//! - Drag lifecycle and pan deltas
//! - Wheel factor directions, disablement, and animation interruption
//! - Double-click debounce and triple-click suppression
//! - Touch double-tap slop and timer reset
//! - Pinch factor/midpoint and one-finger handoff

use glam::Vec2;
use loupe::config::{PanningConfig, PinchConfig, ViewerConfig, WheelConfig};
use loupe::gestures::{GestureDecoder, GestureEvent, GestureIntent, TouchPhase};

// ============================================================================
// Helpers
// ============================================================================

fn config() -> ViewerConfig {
    ViewerConfig::default()
}

fn press(decoder: &mut GestureDecoder, x: f32, y: f32, cfg: &ViewerConfig) -> Vec<GestureIntent> {
    decoder.handle(
        GestureEvent::PointerPressed {
            position: Vec2::new(x, y),
        },
        cfg,
    )
}

fn touch(
    decoder: &mut GestureDecoder,
    id: u64,
    phase: TouchPhase,
    x: f32,
    y: f32,
    cfg: &ViewerConfig,
) -> Vec<GestureIntent> {
    decoder.handle(
        GestureEvent::Touch {
            id,
            phase,
            position: Vec2::new(x, y),
        },
        cfg,
    )
}

fn has_double_activate(intents: &[GestureIntent]) -> bool {
    intents
        .iter()
        .any(|i| matches!(i, GestureIntent::DoubleActivate { .. }))
}

// ============================================================================
// Pointer Drag
// ============================================================================

#[test]
fn drag_emits_pan_deltas() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    press(&mut decoder, 100.0, 100.0, &cfg);
    assert!(decoder.is_dragging());

    let intents = decoder.handle(
        GestureEvent::PointerMoved {
            position: Vec2::new(110.0, 95.0),
        },
        &cfg,
    );
    assert_eq!(
        intents,
        vec![GestureIntent::Pan {
            delta: Vec2::new(10.0, -5.0)
        }]
    );

    decoder.handle(GestureEvent::PointerReleased, &cfg);
    assert!(!decoder.is_dragging());

    // Movement after release pans nothing
    let intents = decoder.handle(
        GestureEvent::PointerMoved {
            position: Vec2::new(200.0, 200.0),
        },
        &cfg,
    );
    assert!(intents.is_empty());
}

#[test]
fn press_interrupts_animation() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();
    let intents = press(&mut decoder, 0.0, 0.0, &cfg);
    assert!(intents.contains(&GestureIntent::Interrupt));
}

#[test]
fn disabled_panning_never_drags() {
    let cfg = ViewerConfig {
        panning: PanningConfig { disabled: true },
        ..config()
    };
    let mut decoder = GestureDecoder::new();
    press(&mut decoder, 100.0, 100.0, &cfg);
    assert!(!decoder.is_dragging());
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn wheel_factors_follow_delta_sign() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    let intents = decoder.handle(
        GestureEvent::Wheel {
            position: Vec2::new(10.0, 20.0),
            delta_y: 1.0,
        },
        &cfg,
    );
    assert!(intents.contains(&GestureIntent::Interrupt));
    assert!(intents.iter().any(|i| matches!(
        i,
        GestureIntent::ZoomAbout { anchor, factor }
            if *anchor == Vec2::new(10.0, 20.0) && (factor - 0.9).abs() < 1e-6
    )));

    let intents = decoder.handle(
        GestureEvent::Wheel {
            position: Vec2::new(10.0, 20.0),
            delta_y: -1.0,
        },
        &cfg,
    );
    assert!(intents.iter().any(|i| matches!(
        i,
        GestureIntent::ZoomAbout { factor, .. } if (factor - 1.1).abs() < 1e-6
    )));
}

#[test]
fn disabled_wheel_is_inert() {
    let cfg = ViewerConfig {
        wheel: WheelConfig {
            step: 0.1,
            disabled: true,
        },
        ..config()
    };
    let mut decoder = GestureDecoder::new();
    let intents = decoder.handle(
        GestureEvent::Wheel {
            position: Vec2::ZERO,
            delta_y: 1.0,
        },
        &cfg,
    );
    assert!(intents.is_empty());
}

// ============================================================================
// Double Click
// ============================================================================

#[test]
fn rapid_double_click_activates_once() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    let first = press(&mut decoder, 50.0, 60.0, &cfg);
    assert!(!has_double_activate(&first));

    let second = press(&mut decoder, 50.0, 60.0, &cfg);
    assert!(has_double_activate(&second));

    // Debounce: a third rapid click starts a fresh cycle
    let third = press(&mut decoder, 50.0, 60.0, &cfg);
    assert!(!has_double_activate(&third));
}

#[test]
fn slow_second_click_does_not_activate() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    press(&mut decoder, 50.0, 60.0, &cfg);
    std::thread::sleep(std::time::Duration::from_millis(320));
    let second = press(&mut decoder, 50.0, 60.0, &cfg);
    assert!(!has_double_activate(&second));
}

// ============================================================================
// Touch: Tap & Double Tap
// ============================================================================

#[test]
fn double_tap_within_slop_activates() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 200.0, 150.0, &cfg);
    touch(&mut decoder, 1, TouchPhase::Ended, 200.0, 150.0, &cfg);

    let second = touch(&mut decoder, 2, TouchPhase::Started, 210.0, 140.0, &cfg);
    assert!(has_double_activate(&second));
}

#[test]
fn distant_second_tap_does_not_activate() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 200.0, 150.0, &cfg);
    touch(&mut decoder, 1, TouchPhase::Ended, 200.0, 150.0, &cfg);

    // 60 units away on x: outside the 50-unit slop
    let second = touch(&mut decoder, 2, TouchPhase::Started, 260.0, 150.0, &cfg);
    assert!(!has_double_activate(&second));
}

#[test]
fn triple_tap_activates_only_once() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    touch(&mut decoder, 1, TouchPhase::Ended, 100.0, 100.0, &cfg);
    let second = touch(&mut decoder, 2, TouchPhase::Started, 100.0, 100.0, &cfg);
    assert!(has_double_activate(&second));
    touch(&mut decoder, 2, TouchPhase::Ended, 100.0, 100.0, &cfg);

    // The stored tap was consumed; a third tap must not cascade
    let third = touch(&mut decoder, 3, TouchPhase::Started, 100.0, 100.0, &cfg);
    assert!(!has_double_activate(&third));
}

// ============================================================================
// Touch: Drag & Pinch
// ============================================================================

#[test]
fn one_finger_drag_pans() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    assert!(decoder.is_dragging());

    let intents = touch(&mut decoder, 1, TouchPhase::Moved, 130.0, 80.0, &cfg);
    assert_eq!(
        intents,
        vec![GestureIntent::Pan {
            delta: Vec2::new(30.0, -20.0)
        }]
    );
}

#[test]
fn second_finger_promotes_to_pinch() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    touch(&mut decoder, 2, TouchPhase::Started, 200.0, 100.0, &cfg);
    assert!(!decoder.is_dragging());
    assert_eq!(decoder.touch_count(), 2);

    // Spread from 100 to 150 apart: factor 1.5 about the midpoint
    let intents = touch(&mut decoder, 2, TouchPhase::Moved, 250.0, 100.0, &cfg);
    assert!(intents.iter().any(|i| matches!(
        i,
        GestureIntent::ZoomAbout { anchor, factor }
            if (factor - 1.5).abs() < 1e-6 && (anchor.x - 175.0).abs() < 1e-6
    )));
}

#[test]
fn disabled_pinch_is_inert() {
    let cfg = ViewerConfig {
        pinch: PinchConfig { disabled: true },
        ..config()
    };
    let mut decoder = GestureDecoder::new();
    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    touch(&mut decoder, 2, TouchPhase::Started, 200.0, 100.0, &cfg);
    let intents = touch(&mut decoder, 2, TouchPhase::Moved, 250.0, 100.0, &cfg);
    assert!(intents.is_empty());
}

#[test]
fn lifting_one_finger_resumes_drag_without_jump() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    touch(&mut decoder, 2, TouchPhase::Started, 200.0, 100.0, &cfg);
    touch(&mut decoder, 1, TouchPhase::Ended, 100.0, 100.0, &cfg);

    assert!(decoder.is_dragging());
    assert_eq!(decoder.touch_count(), 1);

    // The surviving finger pans from its own position, not the lifted one's
    let intents = touch(&mut decoder, 2, TouchPhase::Moved, 205.0, 103.0, &cfg);
    assert_eq!(
        intents,
        vec![GestureIntent::Pan {
            delta: Vec2::new(5.0, 3.0)
        }]
    );
}

#[test]
fn reset_clears_all_state() {
    let cfg = config();
    let mut decoder = GestureDecoder::new();

    touch(&mut decoder, 1, TouchPhase::Started, 100.0, 100.0, &cfg);
    press(&mut decoder, 50.0, 50.0, &cfg);
    decoder.reset();

    assert!(!decoder.is_dragging());
    assert_eq!(decoder.touch_count(), 0);

    // No stale tap survives the reset: the next tap cannot double-activate
    let tap = touch(&mut decoder, 2, TouchPhase::Started, 100.0, 100.0, &cfg);
    assert!(!has_double_activate(&tap));
}
