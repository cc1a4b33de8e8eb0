//! Level-of-Detail Table & Selection Policy
//!
//! A LOD level is a pre-rescaled texture variant of the source image. Coarse
//! levels bound GPU memory when zoomed out; the finest level preserves detail
//! when zoomed in. The table is a fixed, ordered list: level 0 is the
//! coarsest, the last level the finest.
//!
//! Selection picks the smallest level whose relative-scale threshold covers
//! the current zoom, scaled by the memory-pressure modifier so that a loaded
//! system settles for coarser textures.

use crate::errors::{LoupeError, Result};
use crate::memory::MemoryPressure;

/// One entry of the LOD table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodLevel {
    /// Downscale factor applied to the source dimensions, in `(0, 1]`.
    pub scale_factor: f32,
    /// Maximum relative viewport scale `r = s / F` this level is meant to serve.
    pub max_relative_scale: f32,
}

/// Ordered list of LOD levels, coarsest first.
///
/// Both `scale_factor` and `max_relative_scale` must be non-decreasing across
/// the table; this is validated at construction.
#[derive(Debug, Clone)]
pub struct LodTable {
    levels: Vec<LodLevel>,
}

impl LodTable {
    /// Builds a table from explicit levels.
    ///
    /// # Errors
    ///
    /// Returns [`LoupeError::InvalidConfig`] when the table is empty, a scale
    /// factor leaves `(0, 1]`, or either column is decreasing.
    pub fn new(levels: Vec<LodLevel>) -> Result<Self> {
        if levels.is_empty() {
            return Err(LoupeError::InvalidConfig(
                "LOD table must contain at least one level".to_string(),
            ));
        }
        for (i, level) in levels.iter().enumerate() {
            if level.scale_factor <= 0.0 || level.scale_factor > 1.0 {
                return Err(LoupeError::InvalidConfig(format!(
                    "LOD {i}: scale_factor must lie in (0, 1], got {}",
                    level.scale_factor
                )));
            }
            if i > 0 {
                let prev = &levels[i - 1];
                if level.scale_factor < prev.scale_factor
                    || level.max_relative_scale < prev.max_relative_scale
                {
                    return Err(LoupeError::InvalidConfig(format!(
                        "LOD {i}: table must be monotone non-decreasing"
                    )));
                }
            }
        }
        Ok(Self { levels })
    }

    /// Number of levels `L`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level at `index`.
    #[must_use]
    pub fn level(&self, index: usize) -> &LodLevel {
        &self.levels[index]
    }

    /// Index of the finest level.
    #[must_use]
    pub fn finest(&self) -> usize {
        self.levels.len() - 1
    }

    /// Selects the optimal level for relative scale `r = s / F` under the
    /// given memory pressure.
    ///
    /// Picks the smallest `l` such that `r * m <= max_relative_scale[l]`,
    /// where `m` is the pressure's LOD modifier; falls back to the finest
    /// level when none qualifies. A modifier below one shrinks the effective
    /// zoom, so a loaded system settles for coarser levels.
    #[must_use]
    pub fn select(&self, relative_scale: f32, pressure: MemoryPressure) -> usize {
        let effective = relative_scale * pressure.lod_modifier();
        self.levels
            .iter()
            .position(|level| effective <= level.max_relative_scale)
            .unwrap_or_else(|| self.finest())
    }
}

impl Default for LodTable {
    /// Four levels spanning 1/8x to full resolution.
    ///
    /// The finest level carries an unbounded threshold so it serves every
    /// zoom the coarser levels decline.
    fn default() -> Self {
        Self {
            levels: vec![
                LodLevel {
                    scale_factor: 0.125,
                    max_relative_scale: 0.25,
                },
                LodLevel {
                    scale_factor: 0.25,
                    max_relative_scale: 0.5,
                },
                LodLevel {
                    scale_factor: 0.5,
                    max_relative_scale: 1.0,
                },
                LodLevel {
                    scale_factor: 1.0,
                    max_relative_scale: f32::INFINITY,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = LodTable::default();
        assert!(LodTable::new(table.levels.clone()).is_ok());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn rejects_empty_table() {
        assert!(LodTable::new(Vec::new()).is_err());
    }

    #[test]
    fn rejects_decreasing_scale_factor() {
        let levels = vec![
            LodLevel {
                scale_factor: 0.5,
                max_relative_scale: 1.0,
            },
            LodLevel {
                scale_factor: 0.25,
                max_relative_scale: 2.0,
            },
        ];
        assert!(LodTable::new(levels).is_err());
    }

    #[test]
    fn rejects_scale_factor_outside_unit_interval() {
        let levels = vec![LodLevel {
            scale_factor: 1.5,
            max_relative_scale: 1.0,
        }];
        assert!(LodTable::new(levels).is_err());
    }

    #[test]
    fn selection_falls_back_to_finest() {
        let table = LodTable::default();
        assert_eq!(table.select(100.0, MemoryPressure::Low), table.finest());
    }
}
