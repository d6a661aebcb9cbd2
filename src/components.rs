//! Overlay component definitions.
//!
//! The overlay root carries the [`PerformanceSampler`](crate::PerformanceSampler)
//! and an [`OverlayHandles`] pointing at one value text per [`OverlayRow`].

use bevy::{
    color::Color,
    ecs::entity::Entity,
    prelude::Component,
};

use crate::{
    config::OverlayStyle,
    sampler::{MetricHealth, PerformanceMetrics},
};

/// Marker for the overlay root node.
#[derive(Component, Debug, Default)]
pub struct PerfOverlayRoot;

/// One line of the overlay.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRow {
    Fps,
    ScrollRate,
    Memory,
    LowPower,
    ReducedMotion,
}

impl OverlayRow {
    pub const ALL: [OverlayRow; 5] = [
        OverlayRow::Fps,
        OverlayRow::ScrollRate,
        OverlayRow::Memory,
        OverlayRow::LowPower,
        OverlayRow::ReducedMotion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OverlayRow::Fps => "FPS:",
            OverlayRow::ScrollRate => "Scroll Events:",
            OverlayRow::Memory => "Memory:",
            OverlayRow::LowPower => "Low Power:",
            OverlayRow::ReducedMotion => "Reduced Motion:",
        }
    }

    pub fn value_text(self, metrics: &PerformanceMetrics) -> String {
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" }.to_owned();
        match self {
            OverlayRow::Fps => metrics.fps.to_string(),
            OverlayRow::ScrollRate => format!("{}/s", metrics.scroll_jank),
            OverlayRow::Memory => format!("{}MB", metrics.memory_usage_mb),
            OverlayRow::LowPower => yes_no(metrics.device_capabilities.is_low_power),
            OverlayRow::ReducedMotion => {
                yes_no(metrics.device_capabilities.prefers_reduced_motion)
            }
        }
    }

    pub fn value_color(self, metrics: &PerformanceMetrics, style: &OverlayStyle) -> Color {
        let by_health = |health: MetricHealth| match health {
            MetricHealth::Healthy => style.healthy,
            MetricHealth::Warning => style.warning,
            MetricHealth::Critical => style.critical,
        };
        match self {
            OverlayRow::Fps => by_health(metrics.fps_health()),
            OverlayRow::ScrollRate => by_health(metrics.scroll_health()),
            OverlayRow::Memory => by_health(metrics.memory_health()),
            OverlayRow::LowPower => {
                if metrics.device_capabilities.is_low_power {
                    style.warning
                } else {
                    style.healthy
                }
            }
            OverlayRow::ReducedMotion => {
                if metrics.device_capabilities.prefers_reduced_motion {
                    style.info
                } else {
                    style.muted
                }
            }
        }
    }
}

/// Entities making up the overlay, stored on its root.
#[derive(Component, Debug, Default)]
pub struct OverlayHandles {
    /// Value text entity for each row
    pub values: Vec<(OverlayRow, Entity)>,
    /// Hint line naming the toggle chord
    pub hint: Option<Entity>,
}

impl OverlayHandles {
    pub fn value_entity(&self, row: OverlayRow) -> Option<Entity> {
        self.values
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, entity)| *entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySnapshot;

    #[test]
    fn value_texts() {
        let metrics = PerformanceMetrics {
            fps: 58,
            scroll_jank: 4,
            memory_usage_mb: 87,
            device_capabilities: CapabilitySnapshot {
                is_low_power: true,
                prefers_reduced_motion: false,
                has_limited_memory: false,
            },
        };
        assert_eq!(OverlayRow::Fps.value_text(&metrics), "58");
        assert_eq!(OverlayRow::ScrollRate.value_text(&metrics), "4/s");
        assert_eq!(OverlayRow::Memory.value_text(&metrics), "87MB");
        assert_eq!(OverlayRow::LowPower.value_text(&metrics), "Yes");
        assert_eq!(OverlayRow::ReducedMotion.value_text(&metrics), "No");
    }

    #[test]
    fn colors_follow_health() {
        let style = OverlayStyle::default();
        let mut metrics = PerformanceMetrics {
            fps: 20,
            ..Default::default()
        };
        assert_eq!(OverlayRow::Fps.value_color(&metrics, &style), style.critical);
        metrics.fps = 45;
        assert_eq!(OverlayRow::Fps.value_color(&metrics, &style), style.warning);
        metrics.fps = 60;
        assert_eq!(OverlayRow::Fps.value_color(&metrics, &style), style.healthy);
        assert_eq!(
            OverlayRow::ReducedMotion.value_color(&metrics, &style),
            style.muted
        );
    }
}
