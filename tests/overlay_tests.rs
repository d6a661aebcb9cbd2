//! Integration tests for the performance overlay
//!
//! These drive the sampler through a headless app with a manual clock of
//! 100ms per update.

use bevy::{
    input::mouse::{MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_adaptive_motion::{
    AdaptiveMotionAppExt, AdaptiveMotionPlugin, AdaptiveMotionSettings, EnvironmentSignals,
    MemoryProbe, OverlayHandles, OverlayRow, PerfOverlayRoot, PerformanceMetrics, PerformanceSampler, ProbeContext,
    SamplerSettings, SamplerState,
};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

#[derive(Clone, Default)]
struct CountingProbe {
    polls: Arc<AtomicUsize>,
}

impl MemoryProbe for CountingProbe {
    fn heap_bytes(&mut self, _ctx: ProbeContext) -> Option<u64> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Some(120 * 1024 * 1024)
    }
}

fn overlay_app(enabled: bool, probe: CountingProbe) -> App {
    let mut app = App::new();
    app.add_plugins(bevy::MinimalPlugins);
    // Diagnostics store normally comes from DefaultPlugins
    app.add_plugins(bevy::diagnostic::DiagnosticsPlugin);
    // Input normally comes from InputPlugin
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_event::<MouseWheel>();
    app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
        Duration::from_millis(100),
    ));
    app.insert_resource(AdaptiveMotionSettings {
        sampler: SamplerSettings {
            enabled,
            ..default()
        },
        ..default()
    });
    app.add_plugins(AdaptiveMotionPlugin);
    app.set_capability_reader(EnvironmentSignals {
        viewport_width: Some(600.0),
        device_pixel_ratio: Some(2.0),
        device_memory_gb: None,
        prefers_reduced_motion: Some(true),
    });
    app.set_memory_probe(probe);
    app
}

fn metrics(app: &mut App) -> PerformanceMetrics {
    let world = app.world_mut();
    let mut query = world.query::<&PerformanceSampler>();
    query
        .single(world)
        .map(|sampler| sampler.metrics())
        .unwrap_or_default()
}

fn overlay_state(app: &mut App) -> (SamplerState, Visibility) {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(&PerformanceSampler, &Visibility), With<PerfOverlayRoot>>();
    let (sampler, visibility) = query.single(world).expect("overlay root");
    (sampler.state(), *visibility)
}

fn press_chord(app: &mut App, keys: &[KeyCode]) {
    {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        for key in keys {
            input.press(*key);
        }
    }
    app.update();
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.release_all();
    input.clear();
}

fn scroll(app: &mut App, notifications: usize) {
    for _ in 0..notifications {
        app.world_mut().send_event(MouseWheel {
            unit: MouseScrollUnit::Line,
            x: 0.0,
            y: -1.0,
            window: Entity::PLACEHOLDER,
        });
    }
}

#[test]
fn disabled_sampler_stays_dormant() {
    let mut app = overlay_app(false, CountingProbe::default());
    app.update();

    let world = app.world_mut();
    let mut roots = world.query::<&PerfOverlayRoot>();
    assert_eq!(roots.iter(world).count(), 0);
}

#[test]
fn armed_overlay_starts_hidden_with_capabilities() {
    let mut app = overlay_app(true, CountingProbe::default());
    app.update();

    assert_eq!(
        overlay_state(&mut app),
        (SamplerState::Armed, Visibility::Hidden)
    );
    let capabilities = metrics(&mut app).device_capabilities;
    assert!(capabilities.is_low_power);
    assert!(capabilities.prefers_reduced_motion);
}

#[test]
fn frame_rate_flushes_after_one_second() {
    let mut app = overlay_app(true, CountingProbe::default());
    // Frames at 0ms..900ms do not flush
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(metrics(&mut app).fps, 0);

    // 11 frames over exactly 1000ms
    app.update();
    assert_eq!(metrics(&mut app).fps, 11);
}

#[test]
fn scroll_rate_counts_notifications() {
    let mut app = overlay_app(true, CountingProbe::default());
    scroll(&mut app, 14);
    app.update();
    for _ in 0..9 {
        app.update();
    }
    assert_eq!(metrics(&mut app).scroll_jank, 0);

    scroll(&mut app, 1);
    app.update();
    assert_eq!(metrics(&mut app).scroll_jank, 15);
}

#[test]
fn memory_is_polled_every_two_seconds() {
    let probe = CountingProbe::default();
    let polls = probe.polls.clone();
    let mut app = overlay_app(true, probe);

    for _ in 0..21 {
        app.update();
    }
    assert_eq!(polls.load(Ordering::SeqCst), 1);
    assert_eq!(metrics(&mut app).memory_usage_mb, 120);

    for _ in 0..20 {
        app.update();
    }
    assert_eq!(polls.load(Ordering::SeqCst), 2);
}

#[test]
fn chord_toggles_visibility_once() {
    let mut app = overlay_app(true, CountingProbe::default());
    app.update();

    press_chord(&mut app, &[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyP]);
    assert_eq!(
        overlay_state(&mut app),
        (SamplerState::Visible, Visibility::Visible)
    );

    app.update();
    assert_eq!(overlay_state(&mut app).0, SamplerState::Visible);

    press_chord(&mut app, &[KeyCode::ControlLeft, KeyCode::KeyP]);
    press_chord(&mut app, &[KeyCode::ShiftLeft, KeyCode::KeyP]);
    press_chord(&mut app, &[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyO]);
    assert_eq!(overlay_state(&mut app).0, SamplerState::Visible);

    press_chord(&mut app, &[KeyCode::ControlRight, KeyCode::ShiftRight, KeyCode::KeyP]);
    assert_eq!(
        overlay_state(&mut app),
        (SamplerState::Armed, Visibility::Hidden)
    );
}

fn row_value(app: &mut App, row: OverlayRow) -> (String, Color) {
    let world = app.world_mut();
    let mut handles = world.query::<&OverlayHandles>();
    let entity = handles
        .single(world)
        .expect("overlay handles")
        .value_entity(row)
        .expect("row value entity");
    let text = world.get::<Text>(entity).expect("value text");
    let color = world.get::<TextColor>(entity).expect("value color");
    (text.0.clone(), color.0)
}

#[test]
fn visible_overlay_shows_frame_rate_health() {
    let mut app = overlay_app(true, CountingProbe::default());
    app.update();
    press_chord(&mut app, &[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyP]);

    // 11 frames over 1000ms flush at the 11th update
    for _ in 0..9 {
        app.update();
    }
    assert_eq!(metrics(&mut app).fps, 11);

    let critical = AdaptiveMotionSettings::default().sampler.style.critical;
    assert_eq!(row_value(&mut app, OverlayRow::Fps), ("11".to_string(), critical));

    let (low_power, _) = row_value(&mut app, OverlayRow::LowPower);
    assert_eq!(low_power, "Yes");
}

#[test]
fn despawned_overlay_stops_sampling() {
    let probe = CountingProbe::default();
    let polls = probe.polls.clone();
    let mut app = overlay_app(true, probe);
    app.update();

    let root = {
        let world = app.world_mut();
        let mut roots = world.query_filtered::<Entity, With<PerfOverlayRoot>>();
        roots.single(world).expect("overlay root")
    };
    app.world_mut().despawn(root);

    for _ in 0..50 {
        scroll(&mut app, 3);
        app.update();
    }
    assert_eq!(polls.load(Ordering::SeqCst), 0);

    let world = app.world_mut();
    let mut samplers = world.query::<&PerformanceSampler>();
    assert_eq!(samplers.iter(world).count(), 0);
}
