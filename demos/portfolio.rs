//! Single-page portfolio layout whose animations follow the device.
//!
//! Controls:
//! - M: flip the reduced-motion preference
//! - Ctrl+Shift+P: toggle the performance overlay (debug builds)

use bevy::prelude::*;
use bevy_adaptive_motion::{
    AdaptiveMotionPlugin, AdaptiveMotionSettings, CapabilityChanged, CapabilitySnapshot,
    EntranceAnimation, MotionProfile, ReducedMotionChanged, SamplerSettings,
    systems::sync_motion_profile,
};

const SECTIONS: [(&str, &str); 4] = [
    ("About", "Engineer who likes fast, quiet software."),
    ("Projects", "Media server, HUD plugins, a tiny renderer."),
    ("Skills", "Rust, Bevy, WGSL, async services."),
    ("Contact", "hello@example.com"),
];

const SKILLS: [&[&str]; 3] = [
    &["Rust", "C", "TypeScript"],
    &["Bevy", "wgpu", "WGSL"],
    &["Tokio", "Axum", "Postgres"],
];

#[derive(Component)]
struct Particle {
    phase: f32,
    speed: f32,
    base_y: f32,
}

#[derive(Component)]
struct PageRoot;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(AdaptiveMotionSettings {
            sampler: SamplerSettings {
                start_visible: true,
                ..default()
            },
            ..default()
        })
        .add_plugins(AdaptiveMotionPlugin)
        .add_systems(Startup, setup_camera)
        .add_systems(PostStartup, build_page)
        .add_systems(
            Update,
            (
                toggle_reduced_motion,
                rebuild_on_change.after(sync_motion_profile),
                float_particles,
            ),
        )
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn build_page(mut commands: Commands, profile: Res<MotionProfile>) {
    spawn_page(&mut commands, &profile);
}

fn spawn_page(commands: &mut Commands, profile: &MotionProfile) {
    // Hero particles
    for i in 0..profile.particle_count {
        let x = ((i * 97) % 100) as f32 * 12.0 - 600.0;
        let y = ((i * 53) % 100) as f32 * 6.0 - 300.0;
        commands.spawn((
            PageRoot,
            Sprite::from_color(Color::srgba(0.4, 0.5, 1.0, 0.3), Vec2::splat(6.0)),
            Transform::from_xyz(x, y, -1.0),
            Particle {
                phase: i as f32 * 0.7,
                speed: 1.0 + (i % 5) as f32 * 0.2,
                base_y: y,
            },
        ));
    }

    let root = commands
        .spawn((
            PageRoot,
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(24.0)),
                row_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .id();

    for (index, (title, body)) in SECTIONS.iter().enumerate() {
        let section = commands
            .spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                EntranceAnimation::staggered(profile, index),
            ))
            .id();
        commands.entity(section).insert(ChildOf(root));

        let heading = commands
            .spawn((
                Text::new(*title),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                EntranceAnimation::staggered(profile, index),
            ))
            .id();
        commands.entity(heading).insert(ChildOf(section));

        let text = commands
            .spawn((Text::new(*body), TextColor(Color::srgb(0.7, 0.7, 0.75))))
            .id();
        commands.entity(text).insert(ChildOf(section));

        if *title == "Skills" {
            for (group, skills) in SKILLS.iter().enumerate() {
                let row = commands
                    .spawn(Node {
                        column_gap: Val::Px(8.0),
                        ..default()
                    })
                    .id();
                commands.entity(row).insert(ChildOf(section));
                for (item, skill) in skills.iter().enumerate() {
                    let chip = commands
                        .spawn((
                            Text::new(*skill),
                            TextColor(Color::srgb(0.5, 0.8, 1.0)),
                            EntranceAnimation::in_grid(profile, group, item),
                        ))
                        .id();
                    commands.entity(chip).insert(ChildOf(row));
                }
            }
        }
    }
}

fn toggle_reduced_motion(
    keys: Res<ButtonInput<KeyCode>>,
    snapshot: Res<CapabilitySnapshot>,
    mut requests: EventWriter<ReducedMotionChanged>,
) {
    if keys.just_pressed(KeyCode::KeyM) {
        requests.write(ReducedMotionChanged {
            prefers_reduced_motion: !snapshot.prefers_reduced_motion,
        });
    }
}

fn rebuild_on_change(
    mut commands: Commands,
    mut changes: EventReader<CapabilityChanged>,
    profile: Res<MotionProfile>,
    page: Query<Entity, With<PageRoot>>,
) {
    if changes.read().last().is_none() {
        return;
    }
    for entity in page.iter() {
        commands.entity(entity).despawn();
    }
    spawn_page(&mut commands, &profile);
}

fn float_particles(
    time: Res<Time>,
    profile: Res<MotionProfile>,
    mut particles: Query<(&Particle, &mut Transform)>,
) {
    if !profile.looping_motion {
        return;
    }
    let t = time.elapsed_secs();
    for (particle, mut transform) in particles.iter_mut() {
        transform.translation.y = particle.base_y + (t * particle.speed + particle.phase).sin() * 20.0;
    }
}
