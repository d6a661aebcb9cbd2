//! Runtime performance sampler.
//!
//! Four independent measurement processes (frame rate, scroll rate, process
//! memory, capability snapshot) live under one [`PerformanceSampler`]
//! owner. A single [`PerformanceSampler::teardown`] cancels all of them.

use bevy::{
    diagnostic::{DiagnosticsStore, SystemInformationDiagnosticsPlugin},
    log::debug,
    prelude::Component,
    time::{Timer, TimerMode},
};
use std::time::Duration;

use crate::{capability::CapabilitySnapshot, constants::*};

/// Latest values of every sampled metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Frames rendered in the last sample window
    pub fps: u32,
    /// Scroll notifications in the last sample window
    pub scroll_jank: u32,
    /// Process memory in whole megabytes, 0 if unavailable
    pub memory_usage_mb: u32,
    pub device_capabilities: CapabilitySnapshot,
}

/// Health bucket used for color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricHealth {
    Healthy,
    Warning,
    Critical,
}

impl PerformanceMetrics {
    pub fn fps_health(&self) -> MetricHealth {
        if self.fps < FPS_CRITICAL_BELOW {
            MetricHealth::Critical
        } else if self.fps < FPS_WARNING_BELOW {
            MetricHealth::Warning
        } else {
            MetricHealth::Healthy
        }
    }

    pub fn scroll_health(&self) -> MetricHealth {
        if self.scroll_jank > SCROLL_JANK_CRITICAL_ABOVE {
            MetricHealth::Critical
        } else {
            MetricHealth::Healthy
        }
    }

    pub fn memory_health(&self) -> MetricHealth {
        if self.memory_usage_mb > MEMORY_CRITICAL_ABOVE_MB {
            MetricHealth::Critical
        } else {
            MetricHealth::Healthy
        }
    }
}

/// Overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    /// No processes, nothing drawn
    #[default]
    Dormant,
    /// Processes running, overlay hidden
    Armed,
    /// Processes running, overlay drawn
    Visible,
}

/// Counts callbacks and flushes a per-second rate once the window elapsed.
///
/// Shared by the frame and scroll processes; timestamps are milliseconds
/// on any monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct RateWindow {
    count: u32,
    window_start_ms: f64,
}

impl RateWindow {
    pub fn new(now_ms: f64) -> Self {
        Self {
            count: 0,
            window_start_ms: now_ms,
        }
    }

    /// Count one occurrence at `now_ms`.
    ///
    /// Returns the rate `round(count * 1000 / elapsed)` and starts a new
    /// window when at least [`SAMPLE_WINDOW_MS`] have passed.
    pub fn record(&mut self, now_ms: f64) -> Option<u32> {
        self.count += 1;
        let elapsed = now_ms - self.window_start_ms;
        if elapsed < SAMPLE_WINDOW_MS {
            return None;
        }
        let rate = (f64::from(self.count) * 1000.0 / elapsed).round() as u32;
        self.count = 0;
        self.window_start_ms = now_ms;
        Some(rate)
    }

    /// Count one occurrence; returns the raw count when the window elapsed.
    pub fn record_count(&mut self, now_ms: f64) -> Option<u32> {
        self.count += 1;
        if now_ms - self.window_start_ms < SAMPLE_WINDOW_MS {
            return None;
        }
        let count = self.count;
        self.count = 0;
        self.window_start_ms = now_ms;
        Some(count)
    }

    pub fn pending(&self) -> u32 {
        self.count
    }
}

/// Context passed to memory probes.
#[derive(Clone, Copy)]
pub struct ProbeContext<'a> {
    pub diagnostics: Option<&'a DiagnosticsStore>,
}

/// Reads the process heap size.
///
/// Returning `None` means the platform exposes no such API; the sampler
/// then leaves `memory_usage_mb` at its previous value.
pub trait MemoryProbe: Send + Sync + 'static {
    fn heap_bytes(&mut self, ctx: ProbeContext) -> Option<u64>;
}

/// Process memory from Bevy's system information diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticsMemoryProbe;

impl MemoryProbe for DiagnosticsMemoryProbe {
    fn heap_bytes(&mut self, ctx: ProbeContext) -> Option<u64> {
        let diagnostics = ctx.diagnostics?;
        let gib = diagnostics
            .get(&SystemInformationDiagnosticsPlugin::PROCESS_MEM_USAGE)?
            .value()?;
        Some((gib * BYTES_PER_GIB) as u64)
    }
}

/// Convert a byte count to whole megabytes.
pub fn bytes_to_mb(bytes: u64) -> u32 {
    (bytes as f64 / BYTES_PER_MB).round() as u32
}

/// The four measurement processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementProcess {
    FrameRate,
    ScrollRate,
    Memory,
    Capabilities,
}

/// Owner of the four measurement processes and the metrics they produce.
///
/// Lives on the overlay root entity. Despawning the entity drops the
/// sampler, which tears every process down.
#[derive(Component)]
pub struct PerformanceSampler {
    metrics: PerformanceMetrics,
    state: SamplerState,
    frames: Option<RateWindow>,
    scrolls: Option<RateWindow>,
    memory: Option<(Timer, Box<dyn MemoryProbe>)>,
    capabilities_pending: bool,
}

impl PerformanceSampler {
    /// Arm all four processes at `now_ms`.
    pub fn arm<P: MemoryProbe>(now_ms: f64, memory_poll: Duration, probe: P) -> Self {
        Self::arm_boxed(now_ms, memory_poll, Box::new(probe))
    }

    /// Like [`arm`](Self::arm) for an already boxed probe.
    pub fn arm_boxed(now_ms: f64, memory_poll: Duration, probe: Box<dyn MemoryProbe>) -> Self {
        debug!("performance sampler armed");
        Self {
            metrics: PerformanceMetrics::default(),
            state: SamplerState::Armed,
            frames: Some(RateWindow::new(now_ms)),
            scrolls: Some(RateWindow::new(now_ms)),
            memory: Some((
                Timer::new(memory_poll, TimerMode::Repeating),
                probe,
            )),
            capabilities_pending: true,
        }
    }

    /// Sampler that never measures anything.
    pub fn dormant() -> Self {
        Self {
            metrics: PerformanceMetrics::default(),
            state: SamplerState::Dormant,
            frames: None,
            scrolls: None,
            memory: None,
            capabilities_pending: false,
        }
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_running(&self, process: MeasurementProcess) -> bool {
        match process {
            MeasurementProcess::FrameRate => self.frames.is_some(),
            MeasurementProcess::ScrollRate => self.scrolls.is_some(),
            MeasurementProcess::Memory => self.memory.is_some(),
            MeasurementProcess::Capabilities => self.capabilities_pending,
        }
    }

    /// Frame process: call once per rendered frame.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<u32> {
        let fps = self.frames.as_mut()?.record(now_ms)?;
        self.metrics.fps = fps;
        Some(fps)
    }

    /// Scroll process: call once per scroll notification.
    pub fn on_scroll(&mut self, now_ms: f64) -> Option<u32> {
        let scroll_jank = self.scrolls.as_mut()?.record_count(now_ms)?;
        self.metrics.scroll_jank = scroll_jank;
        Some(scroll_jank)
    }

    /// Memory process: advance the poll timer by `delta`, sampling when it fires.
    pub fn on_memory_tick(&mut self, delta: Duration, ctx: ProbeContext) -> Option<u32> {
        let (timer, probe) = self.memory.as_mut()?;
        timer.tick(delta);
        if !timer.just_finished() {
            return None;
        }
        let memory_usage_mb = bytes_to_mb(probe.heap_bytes(ctx)?);
        self.metrics.memory_usage_mb = memory_usage_mb;
        Some(memory_usage_mb)
    }

    /// Capability process: merges the snapshot the first time only.
    pub fn capture_capabilities(&mut self, snapshot: CapabilitySnapshot) -> bool {
        if !self.capabilities_pending {
            return false;
        }
        self.capabilities_pending = false;
        self.metrics.device_capabilities = snapshot;
        true
    }

    /// Flip between armed and visible. No effect once dormant.
    pub fn toggle_visible(&mut self) -> SamplerState {
        self.state = match self.state {
            SamplerState::Armed => SamplerState::Visible,
            SamplerState::Visible => SamplerState::Armed,
            SamplerState::Dormant => SamplerState::Dormant,
        };
        self.state
    }

    /// Cancel every process. Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.state == SamplerState::Dormant {
            return false;
        }
        self.frames = None;
        self.scrolls = None;
        self.memory = None;
        self.capabilities_pending = false;
        self.state = SamplerState::Dormant;
        debug!("performance sampler torn down");
        true
    }
}

impl Drop for PerformanceSampler {
    fn drop(&mut self) {
        self.teardown();
    }
}
