//! Configuration structures for bevy_adaptive_motion.
//!
//! Insert [`AdaptiveMotionSettings`] before adding the plugin to customize
//! motion tuning and the performance overlay.

use bevy::{color::Color, input::keyboard::KeyCode, input::ButtonInput, math::Vec2, prelude::Resource};

/// Main configuration resource for the plugin.
///
/// # Example
/// ```rust
/// use bevy::prelude::*;
/// use bevy_adaptive_motion::{AdaptiveMotionSettings, SamplerSettings};
///
/// App::new().insert_resource(AdaptiveMotionSettings {
///     sampler: SamplerSettings {
///         enabled: true,
///         start_visible: true,
///         ..default()
///     },
///     ..default()
/// });
/// ```
#[derive(Debug, Clone, Resource, Default)]
pub struct AdaptiveMotionSettings {
    /// Initial reduced-motion preference when the platform exposes none
    pub reduced_motion_override: Option<bool>,
    /// Animation parameters handed out through [`MotionProfile`](crate::MotionProfile)
    pub motion: MotionTuning,
    /// Performance overlay configuration
    pub sampler: SamplerSettings,
}

/// Animation parameters for full and reduced motion.
///
/// Durations are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionTuning {
    /// Section entrance duration under full motion
    pub entrance_duration: f32,
    /// Section entrance duration under reduced motion
    pub reduced_entrance_duration: f32,
    /// Per-item duration (skill chips, list rows) under full motion
    pub item_duration: f32,
    /// Per-item duration under reduced motion
    pub reduced_item_duration: f32,
    /// Delay between consecutive children of a section
    pub stagger: f32,
    /// Grid delay added per group (e.g. skill category)
    pub group_delay: f32,
    /// Grid delay added per item inside a group
    pub item_delay: f32,
    /// Vertical offset (pixels) entrances travel from
    pub entrance_offset: f32,
    /// Background particle count on capable devices
    pub particle_count: usize,
    /// Background particle count on low-power devices
    pub low_power_particle_count: usize,
    /// Generic eased transition on capable devices
    pub transition_smooth: f32,
    /// Spring-like transition on capable devices
    pub transition_spring: f32,
    /// Generic eased transition on low-power devices
    pub low_power_transition_smooth: f32,
    /// Spring-like transition on low-power devices
    pub low_power_transition_spring: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            entrance_duration: 0.6,
            reduced_entrance_duration: 0.3,
            item_duration: 0.5,
            reduced_item_duration: 0.2,
            stagger: 0.2,
            group_delay: 0.1,
            item_delay: 0.05,
            entrance_offset: 30.0,
            particle_count: 20,
            low_power_particle_count: 8,
            transition_smooth: 0.3,
            transition_spring: 0.5,
            low_power_transition_smooth: 0.2,
            low_power_transition_spring: 0.3,
        }
    }
}

/// Configuration of the performance sampler and its overlay.
#[derive(Debug, Clone)]
pub struct SamplerSettings {
    /// Arm the sampler at startup; defaults to debug builds only
    pub enabled: bool,
    /// Show the overlay immediately instead of waiting for the chord
    pub start_visible: bool,
    /// Key chord toggling overlay visibility
    pub toggle_chord: KeyChord,
    /// Seconds between process memory polls
    pub memory_poll_interval: f32,
    /// Spawn a dedicated UI camera for the overlay
    pub spawn_ui_camera: bool,
    /// Overlay appearance
    pub style: OverlayStyle,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            start_visible: false,
            toggle_chord: KeyChord::default(),
            memory_poll_interval: crate::constants::MEMORY_POLL_INTERVAL_SECS,
            spawn_ui_camera: false,
            style: OverlayStyle::default(),
        }
    }
}

/// Overlay appearance.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Distance (pixels) from the bottom-right corner of the window
    pub margin: Vec2,
    pub font_size: f32,
    pub row_width: f32,
    pub background: Color,
    pub label_color: Color,
    pub healthy: Color,
    pub warning: Color,
    pub critical: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            margin: Vec2::new(16.0, 16.0),
            font_size: 12.0,
            row_width: 180.0,
            background: Color::srgba(0.05, 0.05, 0.08, 0.75),
            label_color: Color::srgb(0.85, 0.85, 0.85),
            healthy: Color::srgb(0.29, 0.87, 0.5),
            warning: Color::srgb(0.98, 0.8, 0.08),
            critical: Color::srgb(0.97, 0.44, 0.44),
            info: Color::srgb(0.38, 0.65, 0.98),
            muted: Color::srgb(0.61, 0.64, 0.69),
        }
    }
}

/// Keyboard chord: optional modifiers plus one trigger key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub key: KeyCode,
}

impl Default for KeyChord {
    /// Ctrl+Shift+P
    fn default() -> Self {
        Self {
            ctrl: true,
            shift: true,
            alt: false,
            key: KeyCode::KeyP,
        }
    }
}

impl KeyChord {
    /// True on the frame the trigger key goes down with exactly the
    /// configured modifiers held.
    pub fn just_triggered(&self, keys: &ButtonInput<KeyCode>) -> bool {
        let ctrl = keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
        let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        let alt = keys.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
        keys.just_pressed(self.key) && ctrl == self.ctrl && shift == self.shift && alt == self.alt
    }

    /// Human-readable form, e.g. `Ctrl+Shift+P`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_owned());
        }
        if self.shift {
            parts.push("Shift".to_owned());
        }
        if self.alt {
            parts.push("Alt".to_owned());
        }
        let key = format!("{:?}", self.key);
        parts.push(key.strip_prefix("Key").unwrap_or(&key).to_owned());
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_with(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keys = ButtonInput::default();
        for key in pressed {
            keys.press(*key);
        }
        keys
    }

    #[test]
    fn default_chord_matches_ctrl_shift_p() {
        let chord = KeyChord::default();
        assert!(chord.just_triggered(&keys_with(&[
            KeyCode::ControlLeft,
            KeyCode::ShiftRight,
            KeyCode::KeyP
        ])));
    }

    #[test]
    fn chord_ignores_other_combinations() {
        let chord = KeyChord::default();
        assert!(!chord.just_triggered(&keys_with(&[KeyCode::KeyP])));
        assert!(!chord.just_triggered(&keys_with(&[KeyCode::ControlLeft, KeyCode::KeyP])));
        assert!(!chord.just_triggered(&keys_with(&[
            KeyCode::ControlLeft,
            KeyCode::ShiftLeft,
            KeyCode::KeyO
        ])));
        assert!(!chord.just_triggered(&keys_with(&[
            KeyCode::ControlLeft,
            KeyCode::ShiftLeft,
            KeyCode::AltLeft,
            KeyCode::KeyP
        ])));
    }

    #[test]
    fn held_chord_does_not_retrigger() {
        let chord = KeyChord::default();
        let mut keys = keys_with(&[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyP]);
        assert!(chord.just_triggered(&keys));
        keys.clear();
        assert!(!chord.just_triggered(&keys));
    }

    #[test]
    fn chord_description() {
        assert_eq!(KeyChord::default().describe(), "Ctrl+Shift+P");
    }
}
