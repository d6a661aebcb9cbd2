//! Core Bevy systems for capability detection, motion and the overlay.
//!
//! - capture_platform_signals / detect_capabilities: startup detection
//! - apply_reduced_motion_changes / sync_motion_profile: runtime updates
//! - advance_entrances: drives [`EntranceAnimation`]
//! - sample_* / toggle_overlay / render_overlay: performance sampler

use bevy::{
    color::Alpha,
    diagnostic::DiagnosticsStore,
    input::{keyboard::KeyCode, mouse::MouseWheel, ButtonInput},
    log::{debug, info},
    prelude::*,
    text::{TextColor, TextFont},
    ui::{FlexDirection, Node, PositionType, UiRect, Val},
    window::PrimaryWindow,
};
use std::time::Duration;

use crate::{
    capability::{
        nominal_memory_gb, CapabilityChanged, CapabilityDetector, CapabilitySnapshot,
        EnvironmentSignals, ReducedMotionChanged,
    },
    components::{OverlayHandles, OverlayRow, PerfOverlayRoot},
    config::AdaptiveMotionSettings,
    constants::BYTES_PER_GIB,
    motion::{EntranceAnimation, MotionProfile},
    sampler::{DiagnosticsMemoryProbe, MemoryProbe, PerformanceSampler, ProbeContext, SamplerState},
};

/// Memory probe waiting to be handed to the next armed sampler.
#[derive(Resource, Default)]
pub struct PendingMemoryProbe(pub Option<Box<dyn MemoryProbe>>);

/// Read the platform signals into [`EnvironmentSignals`].
pub fn capture_platform_signals(
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<AdaptiveMotionSettings>,
    mut signals: ResMut<EnvironmentSignals>,
) {
    let window = windows.single().ok();
    *signals = EnvironmentSignals {
        viewport_width: window.map(|w| w.width()),
        device_pixel_ratio: window.map(|w| w.scale_factor()),
        device_memory_gb: total_memory_gb(),
        prefers_reduced_motion: settings.reduced_motion_override,
    };
    debug!("captured platform signals: {:?}", *signals);
}

fn total_memory_gb() -> Option<f32> {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return None;
    }
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    nominal_memory_gb(system.total_memory() as f64 / BYTES_PER_GIB)
}

/// Initial detection pass; publishes the snapshot and the motion profile.
pub fn detect_capabilities(
    mut detector: ResMut<CapabilityDetector>,
    signals: Res<EnvironmentSignals>,
    settings: Res<AdaptiveMotionSettings>,
    mut snapshot: ResMut<CapabilitySnapshot>,
    mut profile: ResMut<MotionProfile>,
) {
    let detected = detector.refresh(&*signals);
    *snapshot = detected;
    *profile = MotionProfile::from_snapshot(&detected, &settings.motion);
    info!(
        "device capabilities: low_power={} reduced_motion={} limited_memory={}",
        detected.is_low_power, detected.prefers_reduced_motion, detected.has_limited_memory
    );
}

/// Apply reduced-motion flips sent by the application.
pub fn apply_reduced_motion_changes(
    mut requests: EventReader<ReducedMotionChanged>,
    mut detector: ResMut<CapabilityDetector>,
    mut snapshot: ResMut<CapabilitySnapshot>,
    mut changed: EventWriter<CapabilityChanged>,
) {
    for request in requests.read() {
        let previous = detector.snapshot();
        if !detector.set_reduced_motion(request.prefers_reduced_motion) {
            continue;
        }
        let current = detector.snapshot();
        *snapshot = current;
        changed.write(CapabilityChanged { previous, current });
        info!(
            "reduced motion preference changed: {}",
            current.prefers_reduced_motion
        );
    }
}

/// Re-derive the motion profile when the snapshot or tuning changed.
pub fn sync_motion_profile(
    snapshot: Res<CapabilitySnapshot>,
    settings: Res<AdaptiveMotionSettings>,
    mut profile: ResMut<MotionProfile>,
) {
    if !snapshot.is_changed() && !settings.is_changed() {
        return;
    }
    profile.set_if_neq(MotionProfile::from_snapshot(&snapshot, &settings.motion));
}

/// Advance entrance animations and drop them once finished.
pub fn advance_entrances(
    mut commands: Commands,
    time: Res<Time>,
    mut entrances: Query<(
        Entity,
        &mut EntranceAnimation,
        Option<&mut Node>,
        Option<&mut TextColor>,
    )>,
) {
    for (entity, mut entrance, node, text_color) in entrances.iter_mut() {
        entrance.elapsed += time.delta_secs();
        let progress = entrance.progress();

        if let Some(mut node) = node {
            node.top = Val::Px(entrance.current_offset());
        }
        if let Some(mut color) = text_color {
            color.0.set_alpha(progress);
        }
        if entrance.is_finished() {
            commands.entity(entity).remove::<EntranceAnimation>();
        }
    }
}

/// Arm the sampler and spawn its (hidden) overlay.
///
/// Does nothing when the sampler is disabled, leaving it dormant.
pub fn spawn_performance_overlay(
    mut commands: Commands,
    settings: Res<AdaptiveMotionSettings>,
    snapshot: Res<CapabilitySnapshot>,
    time: Res<Time<Real>>,
    mut pending_probe: ResMut<PendingMemoryProbe>,
) {
    let sampler_settings = &settings.sampler;
    if !sampler_settings.enabled {
        return;
    }
    let style = &sampler_settings.style;

    let memory_poll = Duration::from_secs_f32(sampler_settings.memory_poll_interval.max(0.001));
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let mut sampler = match pending_probe.0.take() {
        Some(probe) => PerformanceSampler::arm_boxed(now_ms, memory_poll, probe),
        None => PerformanceSampler::arm(now_ms, memory_poll, DiagnosticsMemoryProbe),
    };
    sampler.capture_capabilities(*snapshot);

    let visibility = if sampler_settings.start_visible {
        sampler.toggle_visible();
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    if sampler_settings.spawn_ui_camera {
        // Render after the application's cameras
        commands.spawn((
            Camera2d,
            Camera {
                order: 1,
                ..default()
            },
        ));
    }

    let root = commands
        .spawn((
            PerfOverlayRoot,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(style.margin.x),
                bottom: Val::Px(style.margin.y),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(style.background),
            GlobalZIndex(i32::MAX),
            visibility,
        ))
        .id();

    let mut values = Vec::with_capacity(OverlayRow::ALL.len());
    for row in OverlayRow::ALL {
        let line = commands
            .spawn(Node {
                width: Val::Px(style.row_width),
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            })
            .id();
        commands.entity(line).insert(ChildOf(root));

        let label = commands
            .spawn((
                Text::new(row.label()),
                TextColor(style.label_color),
                TextFont {
                    font_size: style.font_size,
                    ..default()
                },
            ))
            .id();
        commands.entity(label).insert(ChildOf(line));

        let value = commands
            .spawn((
                Text::new(row.value_text(&sampler.metrics())),
                TextColor(row.value_color(&sampler.metrics(), style)),
                TextFont {
                    font_size: style.font_size,
                    ..default()
                },
            ))
            .id();
        commands.entity(value).insert(ChildOf(line));
        values.push((row, value));
    }

    let hint = commands
        .spawn((
            Text::new(format!(
                "Press {} to toggle",
                sampler_settings.toggle_chord.describe()
            )),
            TextColor(style.muted),
            TextFont {
                font_size: style.font_size * 0.85,
                ..default()
            },
            Node {
                margin: UiRect {
                    top: Val::Px(6.0),
                    ..default()
                },
                ..default()
            },
        ))
        .id();
    commands.entity(hint).insert(ChildOf(root));

    commands.entity(root).insert((
        sampler,
        OverlayHandles {
            values,
            hint: Some(hint),
        },
    ));
    info!(
        "performance overlay armed, press {} to toggle",
        sampler_settings.toggle_chord.describe()
    );
}

/// Frame process: one tick per rendered frame.
pub fn sample_frame_rate(time: Res<Time<Real>>, mut samplers: Query<&mut PerformanceSampler>) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    for mut sampler in samplers.iter_mut() {
        sampler.on_frame(now_ms);
    }
}

/// Scroll process: one tick per wheel notification.
pub fn sample_scroll_rate(
    mut wheel: EventReader<MouseWheel>,
    time: Res<Time<Real>>,
    mut samplers: Query<&mut PerformanceSampler>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    for _ in wheel.read() {
        for mut sampler in samplers.iter_mut() {
            sampler.on_scroll(now_ms);
        }
    }
}

/// Memory process: polls on the sampler's own interval timer.
pub fn sample_memory(
    time: Res<Time<Real>>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    mut samplers: Query<&mut PerformanceSampler>,
) {
    let ctx = ProbeContext {
        diagnostics: diagnostics.as_deref(),
    };
    for mut sampler in samplers.iter_mut() {
        sampler.on_memory_tick(time.delta(), ctx);
    }
}

/// Flip overlay visibility on the configured key chord.
pub fn toggle_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<AdaptiveMotionSettings>,
    mut overlays: Query<(&mut PerformanceSampler, &mut Visibility), With<PerfOverlayRoot>>,
) {
    if !settings.sampler.toggle_chord.just_triggered(&keys) {
        return;
    }
    for (mut sampler, mut visibility) in overlays.iter_mut() {
        let state = sampler.toggle_visible();
        *visibility = if state == SamplerState::Visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        info!("performance overlay {:?}", state);
    }
}

/// Write the latest metrics into the overlay texts while it is visible.
pub fn render_overlay(
    settings: Res<AdaptiveMotionSettings>,
    overlays: Query<(&PerformanceSampler, &OverlayHandles)>,
    mut texts: Query<(&mut Text, &mut TextColor)>,
) {
    let style = &settings.sampler.style;
    for (sampler, handles) in overlays.iter() {
        if sampler.state() != SamplerState::Visible {
            continue;
        }
        let metrics = sampler.metrics();
        for (row, entity) in &handles.values {
            let Ok((mut text, mut color)) = texts.get_mut(*entity) else {
                continue;
            };
            let value = row.value_text(&metrics);
            if **text != value {
                **text = value;
            }
            let target = row.value_color(&metrics, style);
            if color.0 != target {
                color.0 = target;
            }
        }
    }
}
