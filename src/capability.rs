//! Device capability detection.
//!
//! Classifies the runtime as low-power and tracks the reduced-motion
//! preference. Readings come through the [`CapabilityReader`] trait so the
//! platform can be swapped for fixed values in tests or embedders.

use bevy::prelude::{Event, Resource};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::constants::*;

/// Immutable record of inferred device constraints.
///
/// A new snapshot replaces the old one whenever a tracked signal changes;
/// consumers compare values, never identity.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySnapshot {
    /// Any one of the low-power heuristics fired
    pub is_low_power: bool,
    /// The reduced-motion accessibility preference is set
    pub prefers_reduced_motion: bool,
    /// Device memory was reported and is below the threshold
    pub has_limited_memory: bool,
}

/// Source of environment readings used by [`detect`].
///
/// Every method returns `None` when the platform does not expose the
/// signal; detection treats that as "not constrained".
///
/// # Example
/// ```rust
/// use bevy_adaptive_motion::{detect, CapabilityReader};
///
/// struct Phone;
///
/// impl CapabilityReader for Phone {
///     fn viewport_width(&self) -> Option<f32> { Some(390.0) }
///     fn device_pixel_ratio(&self) -> Option<f32> { Some(3.0) }
///     fn device_memory_gb(&self) -> Option<f32> { None }
///     fn prefers_reduced_motion(&self) -> Option<bool> { None }
/// }
///
/// assert!(detect(&Phone).is_low_power);
/// ```
pub trait CapabilityReader: Send + Sync + 'static {
    /// Logical viewport width in pixels
    fn viewport_width(&self) -> Option<f32>;
    /// Ratio of physical to logical pixels
    fn device_pixel_ratio(&self) -> Option<f32>;
    /// Approximate device memory in gigabytes
    fn device_memory_gb(&self) -> Option<f32>;
    /// Current reduced-motion preference
    fn prefers_reduced_motion(&self) -> Option<bool>;
}

/// Plain set of environment readings.
///
/// The plugin keeps the platform's readings in this resource; tests build
/// one by hand and inject it with
/// [`AdaptiveMotionAppExt::set_capability_reader`](crate::AdaptiveMotionAppExt::set_capability_reader).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvironmentSignals {
    pub viewport_width: Option<f32>,
    pub device_pixel_ratio: Option<f32>,
    pub device_memory_gb: Option<f32>,
    pub prefers_reduced_motion: Option<bool>,
}

impl CapabilityReader for EnvironmentSignals {
    fn viewport_width(&self) -> Option<f32> {
        self.viewport_width
    }

    fn device_pixel_ratio(&self) -> Option<f32> {
        self.device_pixel_ratio
    }

    fn device_memory_gb(&self) -> Option<f32> {
        self.device_memory_gb
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.prefers_reduced_motion
    }
}

/// Classify the environment exposed by `reader`.
///
/// `is_low_power` is the OR of three independent heuristics: narrow
/// viewport, low pixel density and limited device memory.
pub fn detect(reader: &dyn CapabilityReader) -> CapabilitySnapshot {
    let narrow_viewport = reader
        .viewport_width()
        .is_some_and(|w| w < LOW_POWER_MAX_VIEWPORT_WIDTH);
    let low_density = reader
        .device_pixel_ratio()
        .is_some_and(|r| r < LOW_POWER_MIN_PIXEL_RATIO);
    let has_limited_memory = reader
        .device_memory_gb()
        .is_some_and(|gb| gb < LOW_POWER_MIN_DEVICE_MEMORY_GB);

    CapabilitySnapshot {
        is_low_power: narrow_viewport || low_density || has_limited_memory,
        prefers_reduced_motion: reader.prefers_reduced_motion().unwrap_or(false),
        has_limited_memory,
    }
}

/// Round a measured memory size to the nominal power-of-two size.
///
/// Installed RAM reads slightly low once firmware and the GPU take their
/// share (a 4 GB machine reports about 3.7 GiB), so readings are bucketed
/// to 0.25, 0.5, 1, 2, 4, 8, ... before the limited-memory check.
pub fn nominal_memory_gb(gib: f64) -> Option<f32> {
    if !gib.is_finite() || gib <= 0.0 {
        return None;
    }
    let bucketed = 2f64.powi(gib.log2().round() as i32).max(MIN_NOMINAL_MEMORY_GB);
    Some(bucketed as f32)
}

/// External signal: the reduced-motion preference was flipped.
///
/// Send this from whatever surfaces the preference (an accessibility menu,
/// a platform hook). It is the only signal re-evaluated after startup.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducedMotionChanged {
    pub prefers_reduced_motion: bool,
}

/// Emitted once for each snapshot replacement after startup.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityChanged {
    pub previous: CapabilitySnapshot,
    pub current: CapabilitySnapshot,
}

type ChangeCallback = Box<dyn FnMut(CapabilitySnapshot) + Send + 'static>;

#[derive(Default)]
struct WatcherRegistry {
    next_id: u64,
    watchers: Vec<(u64, ChangeCallback)>,
}

impl WatcherRegistry {
    fn insert(&mut self, callback: ChangeCallback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.watchers.push((id, callback));
        id
    }

    fn remove(&mut self, id: u64) {
        self.watchers.retain(|(watcher_id, _)| *watcher_id != id);
    }

    fn notify(&mut self, snapshot: CapabilitySnapshot) {
        for (_, callback) in self.watchers.iter_mut() {
            callback(snapshot);
        }
    }
}

/// Handle returned by [`CapabilityDetector::subscribe`].
///
/// The callback stays registered for as long as this handle lives.
#[must_use = "dropping the subscription unregisters the callback"]
pub struct CapabilitySubscription {
    id: u64,
    registry: Weak<Mutex<WatcherRegistry>>,
}

impl CapabilitySubscription {
    /// Unregister the callback now.
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for CapabilitySubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
        }
    }
}

/// Owner of the canonical capability snapshot and its subscribers.
///
/// The plugin publishes a copy as the [`CapabilitySnapshot`] resource after
/// every change; systems should read that resource rather than this one.
#[derive(Resource, Default)]
pub struct CapabilityDetector {
    reader: Option<Box<dyn CapabilityReader>>,
    snapshot: CapabilitySnapshot,
    watchers: Arc<Mutex<WatcherRegistry>>,
}

impl CapabilityDetector {
    /// Detector that reads from `reader` instead of the platform.
    pub fn with_reader<R: CapabilityReader>(reader: R) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            ..Default::default()
        }
    }

    /// Replace the injected reader.
    pub fn set_reader<R: CapabilityReader>(&mut self, reader: R) {
        self.reader = Some(Box::new(reader));
    }

    /// Whether a reader was injected (platform readings are ignored then).
    pub fn has_custom_reader(&self) -> bool {
        self.reader.is_some()
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> CapabilitySnapshot {
        self.snapshot
    }

    /// Run a full detection pass.
    ///
    /// Uses the injected reader if any, `platform` otherwise. Subscribers
    /// are not notified; this is the initial reading.
    pub fn refresh(&mut self, platform: &dyn CapabilityReader) -> CapabilitySnapshot {
        self.snapshot = match self.reader.as_deref() {
            Some(reader) => detect(reader),
            None => detect(platform),
        };
        self.snapshot
    }

    /// Apply a reduced-motion preference flip.
    ///
    /// Returns `true` and notifies every subscriber once when the value
    /// actually changed. `is_low_power` is left untouched.
    pub fn set_reduced_motion(&mut self, prefers_reduced_motion: bool) -> bool {
        if self.snapshot.prefers_reduced_motion == prefers_reduced_motion {
            return false;
        }
        self.snapshot = CapabilitySnapshot {
            prefers_reduced_motion,
            ..self.snapshot
        };
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .notify(self.snapshot);
        true
    }

    /// Register `on_change`, called with the new snapshot after each change.
    ///
    /// Callbacks run while the registry is locked and must not subscribe
    /// or unsubscribe from inside the callback.
    pub fn subscribe<F>(&self, on_change: F) -> CapabilitySubscription
    where
        F: FnMut(CapabilitySnapshot) + Send + 'static,
    {
        let id = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Box::new(on_change));
        CapabilitySubscription {
            id,
            registry: Arc::downgrade(&self.watchers),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watchers
            .len()
    }
}
