//! Engine configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DISPATCH_INTERVAL_MS, TRAVEL_SECS};
use crate::error::OptionsError;

const DEFAULT_LANE_COUNT: usize = 3;
const DEFAULT_LANE_HEIGHT: f64 = 40.0;
const DEFAULT_LANE_GAP: f64 = 10.0;
const DEFAULT_FONT_SIZE: f64 = 18.0;
const DEFAULT_COLOR: &str = "rgb(255, 255, 255)";

/// What happens to new items once `max_queue_len` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Evict the oldest pending item to make room.
    DropOldest,
    /// Discard the incoming item.
    DropNewest,
}

/// Serialized engine configuration.
///
/// Every field falls back to its default when absent from a JSON payload, so
/// partial overrides parse cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrageOptions {
    /// Number of parallel lanes.
    pub lane_count: usize,
    /// Height of one lane (px).
    pub lane_height: f64,
    /// Vertical gap between adjacent lanes (px).
    pub lane_gap: f64,
    /// Offset reserved above the first lane (px). Adjustable at runtime via
    /// `Barrage::update_top_safe_area`.
    pub safe_area: f64,
    /// Wall-clock time for one full traversal (seconds).
    pub travel_secs: f64,
    /// Interval between dispatch ticks (ms).
    pub dispatch_interval_ms: u64,
    /// Font size hint for surfaces that render text (px).
    pub font_size: f64,
    /// Text color hint, CSS-style.
    pub color: String,
    /// Free-form style pass-through for the rendering surface.
    pub extra_style: HashMap<String, String>,
    /// Maximum pending items. Set to `0` to disable this bound.
    pub max_queue_len: usize,
    /// Eviction policy once `max_queue_len` is reached.
    pub overflow: OverflowPolicy,
}

impl Default for BarrageOptions {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            lane_height: DEFAULT_LANE_HEIGHT,
            lane_gap: DEFAULT_LANE_GAP,
            safe_area: 0.0,
            travel_secs: TRAVEL_SECS,
            dispatch_interval_ms: DISPATCH_INTERVAL_MS,
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_COLOR.to_string(),
            extra_style: HashMap::new(),
            max_queue_len: 0,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

impl BarrageOptions {
    /// Replace non-finite or out-of-range numeric values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.lane_height.is_finite() || self.lane_height <= 0.0 {
            self.lane_height = defaults.lane_height;
        }
        if !self.lane_gap.is_finite() || self.lane_gap < 0.0 {
            self.lane_gap = defaults.lane_gap;
        }
        if !self.safe_area.is_finite() {
            self.safe_area = defaults.safe_area;
        }
        if !self.travel_secs.is_finite() || self.travel_secs <= 0.0 {
            self.travel_secs = defaults.travel_secs;
        }
        if self.dispatch_interval_ms == 0 {
            self.dispatch_interval_ms = defaults.dispatch_interval_ms;
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            self.font_size = defaults.font_size;
        }
        self
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &str) -> Result<Self, OptionsError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Pretty-printed default options, for `barrage create options-json`.
    pub fn template_json() -> String {
        serde_json::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_documented_values() {
        let options = BarrageOptions::default();
        assert_eq!(options.lane_count, 3);
        assert_eq!(options.lane_height, 40.0);
        assert_eq!(options.lane_gap, 10.0);
        assert_eq!(options.safe_area, 0.0);
        assert_eq!(options.travel_secs, 6.0);
        assert_eq!(options.dispatch_interval_ms, 2000);
        assert_eq!(options.max_queue_len, 0);
        assert_eq!(options.overflow, OverflowPolicy::DropOldest);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let options =
            BarrageOptions::from_json_str(r#"{"lane_count": 5, "safe_area": 12.5}"#).expect("parse");
        assert_eq!(options.lane_count, 5);
        assert_eq!(options.safe_area, 12.5);
        assert_eq!(options.lane_height, 40.0);
        assert_eq!(options.travel_secs, 6.0);
    }

    #[test]
    fn overflow_policy_parses_snake_case() {
        let options =
            BarrageOptions::from_json_str(r#"{"max_queue_len": 8, "overflow": "drop_newest"}"#)
                .expect("parse");
        assert_eq!(options.max_queue_len, 8);
        assert_eq!(options.overflow, OverflowPolicy::DropNewest);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(BarrageOptions::from_json_str("{not json").is_err());
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let options = BarrageOptions::from_json_str(
            r#"{"lane_height": -4.0, "travel_secs": 0.0, "dispatch_interval_ms": 0}"#,
        )
        .expect("parse");
        assert_eq!(options.lane_height, 40.0);
        assert_eq!(options.travel_secs, 6.0);
        assert_eq!(options.dispatch_interval_ms, 2000);
    }

    #[test]
    fn template_round_trips() {
        let template = BarrageOptions::template_json();
        let options = BarrageOptions::from_json_str(&template).expect("template parses");
        assert_eq!(options.lane_count, BarrageOptions::default().lane_count);
    }
}
