//! Device-capability-aware motion tuning for Bevy apps.
//!
//! The [`AdaptiveMotionPlugin`] classifies the device as low-power (narrow
//! viewport, low pixel density or little memory), tracks the
//! reduced-motion preference, and turns both into a [`MotionProfile`] that
//! visual sections read to pick durations, stagger delays and particle
//! counts. In debug builds it also arms a small performance overlay
//! (frame rate, scroll event rate, process memory) toggled with
//! Ctrl+Shift+P.

pub mod capability;
pub mod components;
pub mod config;
pub mod constants;
pub mod motion;
pub mod plugin;
pub mod sampler;
pub mod systems;

pub use capability::{
    detect, nominal_memory_gb, CapabilityChanged, CapabilityDetector, CapabilityReader, CapabilitySnapshot,
    CapabilitySubscription, EnvironmentSignals, ReducedMotionChanged,
};
pub use components::{OverlayHandles, OverlayRow, PerfOverlayRoot};
pub use config::{AdaptiveMotionSettings, KeyChord, MotionTuning, OverlayStyle, SamplerSettings};
pub use constants::*;
pub use motion::{entrance_progress, EntranceAnimation, MotionProfile};
pub use plugin::{AdaptiveMotionAppExt, AdaptiveMotionPlugin};
pub use sampler::{
    bytes_to_mb, DiagnosticsMemoryProbe, MeasurementProcess, MemoryProbe, MetricHealth,
    PerformanceMetrics, PerformanceSampler, ProbeContext, RateWindow, SamplerState,
};
