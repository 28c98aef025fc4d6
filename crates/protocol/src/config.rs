use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::types::ViewMode;

/// Recognized timeline options.
///
/// Everything has a default so hosts configure only what they care
/// about. Zoom bounds clamp both pinch gestures and animated
/// transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Active pagination granularity.
    pub view_mode: ViewMode,
    /// Coupled header/body scrolling. When `false`, lists track their
    /// own focus during a drag and reconcile on settle.
    pub synced_lists: bool,
    /// Duration for discrete transitions ("today" jumps, mode switches).
    pub animation_duration_ms: u64,
    /// Pixel floor for rendered event height.
    pub minimum_event_height: f64,
    /// Fill color for events that carry none.
    pub default_event_color: SharedStr,
    /// Border color for events that carry none.
    pub default_border_color: SharedStr,
    /// Starting vertical scale, pixels per hour.
    pub initial_pixels_per_hour: f64,
    /// Lower pinch-zoom bound.
    pub min_pixels_per_hour: f64,
    /// Upper pinch-zoom bound.
    pub max_pixels_per_hour: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Week,
            synced_lists: true,
            animation_duration_ms: 250,
            minimum_event_height: 20.0,
            default_event_color: "#FFFFFF".into(),
            default_border_color: "#FFFFFF".into(),
            initial_pixels_per_hour: 60.0,
            min_pixels_per_hour: 30.0,
            max_pixels_per_hour: 120.0,
        }
    }
}
