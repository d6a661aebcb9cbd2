//! Motion parameters derived from the capability snapshot.
//!
//! Visual sections read [`MotionProfile`] instead of the raw flags so that
//! every section scales animation cost the same way.

use bevy::prelude::{Component, Resource};

use crate::{capability::CapabilitySnapshot, config::MotionTuning};

/// Concrete animation parameters for the current device.
///
/// Durations and delays are in seconds.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MotionProfile {
    pub reduced_motion: bool,
    pub low_power: bool,
    /// Entrances still play under reduced motion, as a short fade
    pub animate_entrances: bool,
    pub entrance_duration: f32,
    pub item_duration: f32,
    pub stagger: f32,
    pub group_delay: f32,
    pub item_delay: f32,
    /// Distance entrances travel; zero means fade only
    pub entrance_offset: f32,
    pub hover_effects: bool,
    /// Infinite loops (floating particles, spinners, bouncing arrows)
    pub looping_motion: bool,
    pub smooth_scroll: bool,
    pub particle_count: usize,
    pub transition_smooth: f32,
    pub transition_spring: f32,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::from_snapshot(&CapabilitySnapshot::default(), &MotionTuning::default())
    }
}

impl MotionProfile {
    /// Derive the profile for `snapshot`.
    pub fn from_snapshot(snapshot: &CapabilitySnapshot, tuning: &MotionTuning) -> Self {
        let reduced = snapshot.prefers_reduced_motion;
        let low_power = snapshot.is_low_power;

        let (transition_smooth, transition_spring) = if reduced {
            (0.0, 0.0)
        } else if low_power {
            (
                tuning.low_power_transition_smooth,
                tuning.low_power_transition_spring,
            )
        } else {
            (tuning.transition_smooth, tuning.transition_spring)
        };

        let particle_count = if reduced {
            0
        } else if low_power {
            tuning.low_power_particle_count.min(tuning.particle_count)
        } else {
            tuning.particle_count
        };

        Self {
            reduced_motion: reduced,
            low_power,
            animate_entrances: true,
            entrance_duration: if reduced {
                tuning.reduced_entrance_duration
            } else {
                tuning.entrance_duration
            },
            item_duration: if reduced {
                tuning.reduced_item_duration
            } else {
                tuning.item_duration
            },
            stagger: if reduced { 0.0 } else { tuning.stagger },
            group_delay: if reduced { 0.0 } else { tuning.group_delay },
            item_delay: if reduced { 0.0 } else { tuning.item_delay },
            entrance_offset: if reduced { 0.0 } else { tuning.entrance_offset },
            hover_effects: !reduced,
            looping_motion: !reduced,
            smooth_scroll: !reduced,
            particle_count,
            transition_smooth,
            transition_spring,
        }
    }

    /// Delay before the `index`-th child of a section enters.
    pub fn stagger_delay(&self, index: usize) -> f32 {
        self.stagger * index as f32
    }

    /// Delay for `item` inside `group` of a two-level grid.
    pub fn grid_delay(&self, group: usize, item: usize) -> f32 {
        self.group_delay * group as f32 + self.item_delay * item as f32
    }

    /// Hover scale factor, or 1.0 when hover effects are off.
    pub fn hover_scale(&self, scale: f32) -> f32 {
        if self.hover_effects {
            scale
        } else {
            1.0
        }
    }
}

/// Fade-and-rise entrance for a UI node or sprite.
///
/// Driven by [`advance_entrances`](crate::systems::advance_entrances); the
/// component is removed once the entity is in place.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EntranceAnimation {
    pub delay: f32,
    pub duration: f32,
    pub offset: f32,
    pub elapsed: f32,
}

impl EntranceAnimation {
    /// Entrance for the `index`-th child under `profile`.
    pub fn staggered(profile: &MotionProfile, index: usize) -> Self {
        Self {
            delay: profile.stagger_delay(index),
            duration: profile.entrance_duration,
            offset: profile.entrance_offset,
            elapsed: 0.0,
        }
    }

    /// Entrance for `item` inside `group` of a grid.
    pub fn in_grid(profile: &MotionProfile, group: usize, item: usize) -> Self {
        Self {
            delay: profile.grid_delay(group, item),
            duration: profile.item_duration,
            offset: profile.entrance_offset,
            elapsed: 0.0,
        }
    }

    /// Eased progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        entrance_progress(self.elapsed, self.delay, self.duration)
    }

    /// Current vertical offset still to travel.
    pub fn current_offset(&self) -> f32 {
        self.offset * (1.0 - self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Ease-out progress of an animation `elapsed` seconds in.
///
/// Zero until `delay` has passed; a non-positive `duration` completes as
/// soon as the delay is over.
pub fn entrance_progress(elapsed: f32, delay: f32, duration: f32) -> f32 {
    let t = elapsed - delay;
    if t < 0.0 {
        return 0.0;
    }
    if duration <= 0.0 {
        return 1.0;
    }
    let linear = (t / duration).clamp(0.0, 1.0);
    1.0 - (1.0 - linear).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(is_low_power: bool, prefers_reduced_motion: bool) -> MotionProfile {
        MotionProfile::from_snapshot(
            &CapabilitySnapshot {
                is_low_power,
                prefers_reduced_motion,
                has_limited_memory: false,
            },
            &MotionTuning::default(),
        )
    }

    #[test]
    fn full_motion_on_capable_device() {
        let p = profile(false, false);
        assert_eq!(p.entrance_duration, 0.6);
        assert_eq!(p.stagger, 0.2);
        assert_eq!(p.particle_count, 20);
        assert!(p.hover_effects && p.looping_motion && p.smooth_scroll);
        assert_eq!(p.transition_smooth, 0.3);
    }

    #[test]
    fn low_power_shrinks_cost_but_keeps_motion() {
        let p = profile(true, false);
        assert_eq!(p.particle_count, 8);
        assert_eq!(p.transition_smooth, 0.2);
        assert_eq!(p.transition_spring, 0.3);
        assert_eq!(p.stagger, 0.2);
        assert!(p.hover_effects);
    }

    #[test]
    fn reduced_motion_removes_stagger_and_loops() {
        for low_power in [false, true] {
            let p = profile(low_power, true);
            assert_eq!(p.entrance_duration, 0.3);
            assert_eq!(p.item_duration, 0.2);
            assert_eq!(p.stagger_delay(5), 0.0);
            assert_eq!(p.grid_delay(3, 4), 0.0);
            assert_eq!(p.particle_count, 0);
            assert_eq!(p.entrance_offset, 0.0);
            assert!(!p.hover_effects && !p.looping_motion && !p.smooth_scroll);
            assert_eq!(p.hover_scale(1.05), 1.0);
        }
    }

    #[test]
    fn grid_delay_adds_group_and_item() {
        let p = profile(false, false);
        assert!((p.grid_delay(2, 3) - 0.35).abs() < 1e-6);
        assert!((p.stagger_delay(3) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn progress_waits_for_delay_then_eases() {
        assert_eq!(entrance_progress(0.1, 0.2, 0.6), 0.0);
        let mid = entrance_progress(0.5, 0.2, 0.6);
        assert!(mid > 0.5 && mid < 1.0);
        assert_eq!(entrance_progress(2.0, 0.2, 0.6), 1.0);
        assert_eq!(entrance_progress(0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn entrance_offset_shrinks_to_zero() {
        let mut entrance = EntranceAnimation::staggered(&profile(false, false), 0);
        assert_eq!(entrance.current_offset(), 30.0);
        entrance.elapsed = 1.0;
        assert!(entrance.is_finished());
        assert_eq!(entrance.current_offset(), 0.0);
    }
}
