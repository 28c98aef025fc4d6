use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::types::Rect;

/// The canonical event IR the engine consumes.
///
/// ```text
///   caller events ──▶ CalendarEvent ──▶ EventPacker ──▶ PackedEvent[] ──▶ FrameDeriver ──▶ EventRect[]
///                        (this)          (columns)      (left/width        (pixels)
///                                                        fractions)
/// ```
///
/// Times are fractional hours from the start of the event's day, so a
/// packed layout is independent of pixel units and survives zoom
/// changes untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Caller-supplied identifier, echoed through packing and callbacks.
    pub id: SharedStr,
    /// Display title.
    pub title: SharedStr,
    /// Start offset from the day start, in fractional hours.
    pub start_hour: f64,
    /// Duration in fractional hours. Zero is a minimum-height marker.
    pub duration_hours: f64,
    /// Fill color, passed through opaquely (e.g. `#RRGGBB`).
    #[serde(default)]
    pub color: Option<SharedStr>,
    /// Left-border accent color, passed through opaquely.
    #[serde(default)]
    pub border_color: Option<SharedStr>,
    /// Arbitrary caller payload, carried untouched into callbacks.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CalendarEvent {
    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration_hours
    }

    /// Clamp malformed fields to the nearest valid value.
    ///
    /// Non-finite start/duration become 0, negative duration becomes 0.
    /// The engine degrades rather than refusing to render a frame.
    pub fn sanitized(&self) -> Self {
        let mut e = self.clone();
        if !e.start_hour.is_finite() {
            e.start_hour = 0.0;
        }
        if !e.duration_hours.is_finite() || e.duration_hours < 0.0 {
            e.duration_hours = 0.0;
        }
        e
    }
}

/// An event annotated with its resolved column position.
///
/// `left` and `width` are fractions of a day-column width. For any two
/// packed events on the same day whose time ranges intersect, the
/// `[left, left + width)` ranges do not; events with disjoint times may
/// both span the full column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedEvent {
    pub event: CalendarEvent,
    /// Column offset as a fraction of the day-column width, in `[0, 1)`.
    pub left: f64,
    /// Column span as a fraction of the day-column width, in `(0, 1]`.
    pub width: f64,
    /// Assigned column index within the event's overlap cluster.
    pub column: usize,
}

impl PackedEvent {
    /// Whether two packed events overlap in time on the same day.
    pub fn overlaps_in_time(&self, other: &PackedEvent) -> bool {
        self.event.start_hour < other.event.end_hour()
            && other.event.start_hour < self.event.end_hour()
    }
}

/// A packed event with final screen geometry and resolved colors.
///
/// This is what press/long-press callbacks receive: the original
/// payload plus the rectangle it was drawn at on the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRect {
    pub event: PackedEvent,
    /// Screen rectangle in logical pixels, relative to the grid origin.
    pub rect: Rect,
    /// Fill color after the default fallback was applied.
    pub color: SharedStr,
    /// Border color after the default fallback was applied.
    pub border_color: SharedStr,
}
