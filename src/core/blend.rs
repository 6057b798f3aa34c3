//! Statistic Blender
//!
//! Blends a player's season baseline with a recency-weighted rolling-form
//! window into a single per-metric value. Pure function of the catalog
//! snapshot: no side effects, no randomness.

use crate::config::BlendConfig;
use crate::data::catalog::{MetricClass, MetricKey, PositionStats};

/// Per-player, per-metric blend of rolling form and season baseline.
#[derive(Debug, Clone)]
pub struct StatBlender {
    window: usize,
    alpha_form_sensitive: f64,
    alpha_stable: f64,
}

impl StatBlender {
    pub fn from_config(config: &BlendConfig) -> StatBlender {
        StatBlender {
            window: config.form_window,
            alpha_form_sensitive: config.alpha_form_sensitive,
            alpha_stable: config.alpha_stable,
        }
    }

    /// Blended value `alpha * rolling_form + (1 - alpha) * baseline`.
    ///
    /// With fewer observations than the window, rolling form falls back to
    /// the mean of whatever exists; sparse history never fails. A metric with
    /// zero observations (or one foreign to the player's category) returns
    /// `None`, the unknown sentinel, so it can be excluded from cross-player
    /// averaging instead of dragging the average toward zero.
    pub fn blend(&self, stats: &PositionStats, metric: MetricKey) -> Option<f64> {
        let series = stats.series(metric)?;
        if series.is_empty() {
            return None;
        }

        let baseline = series.mean();
        let rolling_form = series.recent_mean(self.window);
        let alpha = match metric.class() {
            MetricClass::FormSensitive => self.alpha_form_sensitive,
            MetricClass::Stable => self.alpha_stable,
        };

        Some(alpha * rolling_form + (1.0 - alpha) * baseline)
    }
}
