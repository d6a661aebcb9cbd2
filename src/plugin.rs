//! Core plugin implementation for bevy_adaptive_motion.
//!
//! This module contains the main [`AdaptiveMotionPlugin`] and the
//! [`AdaptiveMotionAppExt`] injection helpers.

use bevy::{
    app::{App, Plugin, Startup, Update},
    diagnostic::SystemInformationDiagnosticsPlugin,
    prelude::IntoScheduleConfigs,
};

use crate::{
    capability::{
        CapabilityChanged, CapabilityDetector, CapabilityReader, CapabilitySnapshot,
        EnvironmentSignals, ReducedMotionChanged,
    },
    config::AdaptiveMotionSettings,
    motion::MotionProfile,
    sampler::MemoryProbe,
    systems::{
        advance_entrances, apply_reduced_motion_changes, capture_platform_signals,
        detect_capabilities, render_overlay, sample_frame_rate, sample_memory,
        sample_scroll_rate, spawn_performance_overlay, sync_motion_profile, toggle_overlay,
        PendingMemoryProbe,
    },
};

/// Main plugin.
///
/// Detects device capabilities at startup, keeps [`MotionProfile`] in sync
/// with the reduced-motion preference and, in debug builds, arms the
/// performance overlay (toggle with Ctrl+Shift+P). Keyboard and mouse
/// wheel input come from Bevy's `InputPlugin`.
///
/// # Example
///
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_adaptive_motion::{AdaptiveMotionPlugin, MotionProfile};
///
/// fn spawn_particles(profile: Res<MotionProfile>) {
///     for _ in 0..profile.particle_count {
///         // ...
///     }
/// }
///
/// App::new()
///     .add_plugins((DefaultPlugins, AdaptiveMotionPlugin))
///     .add_systems(PostStartup, spawn_particles)
///     .run();
/// ```
#[derive(Default)]
pub struct AdaptiveMotionPlugin;

impl Plugin for AdaptiveMotionPlugin {
    fn build(&self, app: &mut App) {
        // Process memory for the overlay comes from the system information diagnostics
        if !app.is_plugin_added::<SystemInformationDiagnosticsPlugin>() {
            app.add_plugins(SystemInformationDiagnosticsPlugin);
        }

        app.init_resource::<AdaptiveMotionSettings>()
            .init_resource::<EnvironmentSignals>()
            .init_resource::<CapabilityDetector>()
            .init_resource::<CapabilitySnapshot>()
            .init_resource::<MotionProfile>()
            .init_resource::<PendingMemoryProbe>()
            .add_event::<ReducedMotionChanged>()
            .add_event::<CapabilityChanged>()
            .add_systems(
                Startup,
                (
                    capture_platform_signals,
                    detect_capabilities,
                    spawn_performance_overlay,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    apply_reduced_motion_changes,
                    sync_motion_profile,
                    advance_entrances,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    sample_frame_rate,
                    sample_scroll_rate,
                    sample_memory,
                    toggle_overlay,
                    render_overlay,
                )
                    .chain(),
            );
    }
}

/// App extension methods.
pub trait AdaptiveMotionAppExt {
    /// Read capabilities from `reader` instead of the platform.
    fn set_capability_reader<R: CapabilityReader>(&mut self, reader: R) -> &mut Self;

    /// Sample process memory through `probe` instead of Bevy diagnostics.
    fn set_memory_probe<P: MemoryProbe>(&mut self, probe: P) -> &mut Self;
}

impl AdaptiveMotionAppExt for App {
    fn set_capability_reader<R: CapabilityReader>(&mut self, reader: R) -> &mut Self {
        self.init_resource::<CapabilityDetector>();
        self.world_mut()
            .resource_mut::<CapabilityDetector>()
            .set_reader(reader);
        self
    }

    fn set_memory_probe<P: MemoryProbe>(&mut self, probe: P) -> &mut Self {
        self.insert_resource(PendingMemoryProbe(Some(Box::new(probe))));
        self
    }
}
