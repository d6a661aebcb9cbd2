//! Constants used throughout the bevy_adaptive_motion plugin.
//!
//! This module centralizes the low-power policy thresholds, sampling
//! cadences and overlay health thresholds.

/// Viewports narrower than this (logical pixels) count as a low-power device
pub const LOW_POWER_MAX_VIEWPORT_WIDTH: f32 = 768.0;

/// Device pixel ratios below this count as a low-power device
pub const LOW_POWER_MIN_PIXEL_RATIO: f32 = 1.5;

/// Reported device memory (GB) below this counts as a low-power device
pub const LOW_POWER_MIN_DEVICE_MEMORY_GB: f32 = 4.0;

/// Smallest nominal memory size a device reports, in GB
pub const MIN_NOMINAL_MEMORY_GB: f64 = 0.25;

/// Window over which frame and scroll counters are flushed, in milliseconds
pub const SAMPLE_WINDOW_MS: f64 = 1000.0;

/// Interval between process memory polls, in seconds
pub const MEMORY_POLL_INTERVAL_SECS: f32 = 2.0;

/// Frame rates below this are rendered as critical
pub const FPS_CRITICAL_BELOW: u32 = 30;

/// Frame rates below this (and at or above the critical bound) are rendered as warnings
pub const FPS_WARNING_BELOW: u32 = 50;

/// Scroll notification rates above this are rendered as critical
pub const SCROLL_JANK_CRITICAL_ABOVE: u32 = 10;

/// Memory usage (MB) above this is rendered as critical
pub const MEMORY_CRITICAL_ABOVE_MB: u32 = 100;

/// Bytes in one megabyte, as used when converting heap samples
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes in one gibibyte, as reported by Bevy's system information diagnostics
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
