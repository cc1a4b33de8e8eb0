//! LOD table, selection policy and factory sizing tests
//!
//! Tests for:
//! - Table validation (monotonicity, unit-interval scale factors)
//! - Selection: monotone in relative scale, coarser under pressure
//! - Target-size capping by device dimension and per-texture byte share
//! - Budget classes and pressure effect tables

use loupe::lod::{LodLevel, LodTable};
use loupe::memory::{MemoryMonitor, MemoryPressure};
use loupe::texture::factory::lod_target_size;

// ============================================================================
// Selection Policy
// ============================================================================

#[test]
fn selection_matches_thresholds() {
    let table = LodTable::default();
    assert_eq!(table.select(0.1, MemoryPressure::Low), 0);
    assert_eq!(table.select(0.25, MemoryPressure::Low), 0);
    assert_eq!(table.select(0.3, MemoryPressure::Low), 1);
    assert_eq!(table.select(0.8, MemoryPressure::Low), 2);
    assert_eq!(table.select(10.0, MemoryPressure::Low), 3);
}

#[test]
fn selection_is_monotone_in_relative_scale() {
    let table = LodTable::default();
    for pressure in [
        MemoryPressure::Low,
        MemoryPressure::Medium,
        MemoryPressure::High,
        MemoryPressure::Critical,
    ] {
        let mut previous = 0;
        for step in 0..500 {
            let r = step as f32 * 0.05;
            let level = table.select(r, pressure);
            assert!(
                level >= previous,
                "selection regressed at r={r} under {pressure:?}"
            );
            previous = level;
        }
    }
}

#[test]
fn pressure_settles_for_coarser_levels() {
    let table = LodTable::default();
    // r = 0.4 picks the quarter-size level when relaxed...
    assert_eq!(table.select(0.4, MemoryPressure::Low), 1);
    // ...and the eighth-size level when critical (modifier 0.5)
    assert_eq!(table.select(0.4, MemoryPressure::Critical), 0);

    // Never finer under higher pressure, at any zoom
    for step in 0..200 {
        let r = step as f32 * 0.1;
        let relaxed = table.select(r, MemoryPressure::Low);
        let loaded = table.select(r, MemoryPressure::Critical);
        assert!(loaded <= relaxed, "pressure selected a finer level at r={r}");
    }
}

#[test]
fn oversized_zoom_falls_back_to_finest() {
    let levels = vec![
        LodLevel {
            scale_factor: 0.5,
            max_relative_scale: 1.0,
        },
        LodLevel {
            scale_factor: 1.0,
            max_relative_scale: 4.0,
        },
    ];
    let table = LodTable::new(levels).unwrap();
    assert_eq!(table.select(50.0, MemoryPressure::Low), table.finest());
}

// ============================================================================
// Table Validation
// ============================================================================

#[test]
fn validation_rejects_decreasing_thresholds() {
    let levels = vec![
        LodLevel {
            scale_factor: 0.25,
            max_relative_scale: 1.0,
        },
        LodLevel {
            scale_factor: 0.5,
            max_relative_scale: 0.5,
        },
    ];
    assert!(LodTable::new(levels).is_err());
}

#[test]
fn validation_accepts_equal_neighbors() {
    let levels = vec![
        LodLevel {
            scale_factor: 0.5,
            max_relative_scale: 1.0,
        },
        LodLevel {
            scale_factor: 0.5,
            max_relative_scale: 1.0,
        },
    ];
    assert!(LodTable::new(levels).is_ok());
}

// ============================================================================
// Factory Sizing
// ============================================================================

#[test]
fn full_scale_size_is_source_size() {
    let (w, h) = lod_target_size(8000, 6000, 1.0, 16384, u64::MAX);
    assert_eq!((w, h), (8000, 6000));
}

#[test]
fn critical_pressure_caps_long_side_to_2048() {
    // Scenario: 40 MP image, critical pressure dimension cap
    let max_dim = MemoryPressure::Critical.effective_max_texture_dimension(16384);
    assert_eq!(max_dim, 2048);
    let (w, h) = lod_target_size(8000, 5000, 1.0, max_dim, u64::MAX);
    assert!(w.max(h) <= 2048);
    let aspect = w as f32 / h as f32;
    assert!((aspect - 1.6).abs() < 0.01);
}

#[test]
fn byte_cap_shrinks_by_sqrt_of_ratio() {
    // 2000x1000 target = 8 MB; cap at 2 MB should shrink area 4x, sides 2x
    let cap = 2 * 1000 * 1000;
    let (w, h) = lod_target_size(2000, 1000, 1.0, 16384, cap);
    assert!(4 * u64::from(w) * u64::from(h) <= cap);
    assert!(w >= 990 && w <= 1000);
    assert!(h >= 495 && h <= 500);
}

#[test]
fn degenerate_sizes_stay_positive() {
    let (w, h) = lod_target_size(10, 10, 0.001, 16384, u64::MAX);
    assert!(w >= 1 && h >= 1);
}

// ============================================================================
// Budget & Pressure Tables
// ============================================================================

#[test]
fn pressure_effect_tables() {
    // Pixel ratio caps
    assert_eq!(MemoryPressure::Medium.effective_pixel_ratio(3.0), 2.0);
    assert_eq!(MemoryPressure::High.effective_pixel_ratio(3.0), 1.5);
    assert_eq!(MemoryPressure::Critical.effective_pixel_ratio(3.0), 1.0);

    // LOD modifiers
    assert_eq!(MemoryPressure::Low.lod_modifier(), 1.0);
    assert_eq!(MemoryPressure::Medium.lod_modifier(), 0.9);
    assert_eq!(MemoryPressure::High.lod_modifier(), 0.7);
    assert_eq!(MemoryPressure::Critical.lod_modifier(), 0.5);
}

#[test]
fn monitor_classifies_texture_ratio() {
    let monitor = MemoryMonitor::new(1000);
    assert_eq!(monitor.derive_pressure(400), MemoryPressure::Low);
    assert_eq!(monitor.derive_pressure(600), MemoryPressure::Medium);
    assert_eq!(monitor.derive_pressure(850), MemoryPressure::High);
    assert_eq!(monitor.derive_pressure(950), MemoryPressure::Critical);
}
