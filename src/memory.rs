//! Texture Memory Budget & Pressure Monitor
//!
//! GPU texture memory is the scarce resource of a large-image viewer: a
//! single 40 MP image at full resolution is ~160 MB of RGBA8. The monitor
//! derives an advisory budget from the adapter class at startup, samples the
//! usage ratio once per second, and publishes a four-level pressure signal
//! that the rest of the engine applies uniformly:
//!
//! - effective device pixel ratio (backing-store resolution),
//! - effective max-texture-size cap (LOD texture clamping),
//! - LOD-selection modifier (settle for coarser levels under load).
//!
//! Process memory is observed best-effort through `sysinfo`; the process
//! signal can only raise, never lower, the pressure level.

use std::time::{Duration, Instant};

use sysinfo::{Pid, System};

/// Advisory ceiling for observed process memory.
///
/// Texture bytes drive the signal; the process probe only catches the case
/// where the host as a whole is ballooning.
const PROCESS_ADVISORY_LIMIT: u64 = 4 * 1024 * 1024 * 1024;

/// How often the pressure signal is re-derived.
const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Four-level categorical memory pressure signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    /// Classifies a usage ratio (`used / budget`).
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio <= 0.5 {
            Self::Low
        } else if ratio <= 0.7 {
            Self::Medium
        } else if ratio <= 0.9 {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Caps the device pixel ratio used for the backing store.
    #[must_use]
    pub fn effective_pixel_ratio(self, device_ratio: f32) -> f32 {
        match self {
            Self::Low => device_ratio,
            Self::Medium => device_ratio.min(2.0),
            Self::High => device_ratio.min(1.5),
            Self::Critical => device_ratio.min(1.0),
        }
    }

    /// Caps the maximum texture dimension reported by the device.
    #[must_use]
    pub fn effective_max_texture_dimension(self, device_max: u32) -> u32 {
        match self {
            Self::Low => device_max,
            Self::Medium => device_max.min(8192),
            Self::High => device_max.min(4096),
            Self::Critical => device_max.min(2048),
        }
    }

    /// Modifier `m` applied to LOD thresholds during selection.
    #[must_use]
    pub fn lod_modifier(self) -> f32 {
        match self {
            Self::Low => 1.0,
            Self::Medium => 0.9,
            Self::High => 0.7,
            Self::Critical => 0.5,
        }
    }
}

/// Snapshot of memory state for debugging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryInfo {
    /// Bytes currently held in LOD textures.
    pub texture_bytes: u64,
    /// Best-effort observed process memory; `None` on platforms without a probe.
    pub process_bytes: Option<u64>,
    /// Current pressure label.
    pub pressure: MemoryPressure,
}

/// Derives the advisory texture-memory budget from the adapter class.
///
/// Discrete GPUs get the desktop-class budget; integrated and virtual
/// adapters the mid class; CPU fallbacks the small class. All classes keep a
/// 40% headroom below their nominal pool.
#[must_use]
pub fn budget_for_device(device_type: wgpu::DeviceType) -> u64 {
    const MIB: u64 = 1024 * 1024;
    let pool = match device_type {
        wgpu::DeviceType::DiscreteGpu => 512 * MIB,
        wgpu::DeviceType::IntegratedGpu | wgpu::DeviceType::VirtualGpu => 256 * MIB,
        wgpu::DeviceType::Cpu | wgpu::DeviceType::Other => 128 * MIB,
    };
    pool * 60 / 100
}

/// Periodic monitor over texture bytes and (best-effort) process memory.
pub struct MemoryMonitor {
    budget: u64,
    pressure: MemoryPressure,
    last_sample: Instant,
    process_bytes: Option<u64>,
    system: System,
    pid: Option<Pid>,
}

impl MemoryMonitor {
    /// Creates a monitor with the given advisory budget in bytes.
    #[must_use]
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            pressure: MemoryPressure::Low,
            last_sample: Instant::now(),
            process_bytes: None,
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// The advisory budget in bytes.
    #[must_use]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Per-texture byte cap: 30% of the budget.
    #[must_use]
    pub fn per_texture_cap(&self) -> u64 {
        self.budget * 30 / 100
    }

    /// The most recently derived pressure.
    #[must_use]
    pub fn pressure(&self) -> MemoryPressure {
        self.pressure
    }

    /// Snapshot for the debug overlay.
    #[must_use]
    pub fn info(&self, texture_bytes: u64) -> MemoryInfo {
        MemoryInfo {
            texture_bytes,
            process_bytes: self.process_bytes,
            pressure: self.pressure,
        }
    }

    /// Re-derives the pressure if the sampling interval elapsed.
    ///
    /// Returns `Some(new_pressure)` when the level changed, `None` otherwise.
    pub fn sample(&mut self, texture_bytes: u64) -> Option<MemoryPressure> {
        let now = Instant::now();
        if now.duration_since(self.last_sample) < SAMPLE_INTERVAL {
            return None;
        }
        self.last_sample = now;

        self.process_bytes = self.probe_process_memory();
        let next = self.derive_pressure(texture_bytes);
        if next == self.pressure {
            return None;
        }
        log::debug!(
            "memory pressure {:?} -> {:?} ({} / {} texture bytes)",
            self.pressure,
            next,
            texture_bytes,
            self.budget
        );
        self.pressure = next;
        Some(next)
    }

    /// Pure classification used by `sample` and by tests.
    #[must_use]
    pub fn derive_pressure(&self, texture_bytes: u64) -> MemoryPressure {
        let texture_ratio = texture_bytes as f64 / self.budget as f64;
        let mut pressure = MemoryPressure::from_ratio(texture_ratio);
        if let Some(bytes) = self.process_bytes {
            let process_ratio = bytes as f64 / PROCESS_ADVISORY_LIMIT as f64;
            pressure = pressure.max(MemoryPressure::from_ratio(process_ratio));
        }
        pressure
    }

    fn probe_process_memory(&mut self) -> Option<u64> {
        let pid = self.pid?;
        if !self.system.refresh_process(pid) {
            return None;
        }
        self.system.process(pid).map(sysinfo::Process::memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_thresholds() {
        assert_eq!(MemoryPressure::from_ratio(0.0), MemoryPressure::Low);
        assert_eq!(MemoryPressure::from_ratio(0.5), MemoryPressure::Low);
        assert_eq!(MemoryPressure::from_ratio(0.51), MemoryPressure::Medium);
        assert_eq!(MemoryPressure::from_ratio(0.7), MemoryPressure::Medium);
        assert_eq!(MemoryPressure::from_ratio(0.9), MemoryPressure::High);
        assert_eq!(MemoryPressure::from_ratio(0.91), MemoryPressure::Critical);
    }

    #[test]
    fn pixel_ratio_caps() {
        assert_eq!(MemoryPressure::Low.effective_pixel_ratio(3.0), 3.0);
        assert_eq!(MemoryPressure::Medium.effective_pixel_ratio(3.0), 2.0);
        assert_eq!(MemoryPressure::High.effective_pixel_ratio(3.0), 1.5);
        assert_eq!(MemoryPressure::Critical.effective_pixel_ratio(3.0), 1.0);
        // A low-resolution device is never upscaled
        assert_eq!(MemoryPressure::Critical.effective_pixel_ratio(0.75), 0.75);
    }

    #[test]
    fn texture_dimension_caps() {
        assert_eq!(
            MemoryPressure::Low.effective_max_texture_dimension(16384),
            16384
        );
        assert_eq!(
            MemoryPressure::Medium.effective_max_texture_dimension(16384),
            8192
        );
        assert_eq!(
            MemoryPressure::High.effective_max_texture_dimension(16384),
            4096
        );
        assert_eq!(
            MemoryPressure::Critical.effective_max_texture_dimension(16384),
            2048
        );
    }

    #[test]
    fn budget_classes() {
        const MIB: u64 = 1024 * 1024;
        assert_eq!(
            budget_for_device(wgpu::DeviceType::DiscreteGpu),
            512 * MIB * 60 / 100
        );
        assert_eq!(
            budget_for_device(wgpu::DeviceType::IntegratedGpu),
            256 * MIB * 60 / 100
        );
        assert_eq!(
            budget_for_device(wgpu::DeviceType::Cpu),
            128 * MIB * 60 / 100
        );
    }

    #[test]
    fn per_texture_cap_is_30_percent() {
        let monitor = MemoryMonitor::new(1000);
        assert_eq!(monitor.per_texture_cap(), 300);
    }
}
