//! Per-frame geometry: packed layouts × live scale → screen rects.
//!
//! The deriver sits at the end of the pipeline and is called once per
//! host frame. Most frames nothing relevant changed, so it fingerprints
//! its inputs and returns `None` instead of rebuilding identical
//! output — the host keeps whatever it rendered last.

use timegrid_protocol::{EventRect, Rect, SharedStr};

use crate::layout::cache::DayLayout;

/// Hours covered by one day column.
const HOURS_PER_DAY: u32 = 24;

/// One horizontal grid line. Quarter-hour lines carry
/// `is_hour == false` so hosts can style them lighter.
#[derive(Debug, Clone, PartialEq)]
pub struct HourLine {
    pub hour: f64,
    pub y: f64,
    pub is_hour: bool,
}

/// Everything one derivation reads. Borrowed, not owned: the deriver
/// copies out only what the fingerprint needs.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub layout: &'a DayLayout,
    /// Position of this day's column within the visible page, 0-based.
    pub day_index: usize,
    /// Live pixels-per-hour factor from [`crate::TimeScale`].
    pub pixels_per_hour: f64,
    /// Version counter of the scale cell, carried into the output so
    /// hosts can correlate frames with scale changes.
    pub scale_version: u64,
    pub column_width: f64,
    /// Left edge of day column 0, after the hour gutter.
    pub grid_left: f64,
    pub minimum_event_height: f64,
    pub default_event_color: &'a SharedStr,
    pub default_border_color: &'a SharedStr,
    /// A pinch gesture is in progress; hosts should apply the new
    /// geometry without transition animations.
    pub pinch_active: bool,
}

/// The rectangles and grid for one day column at one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub rects: Vec<EventRect>,
    pub hour_lines: Vec<HourLine>,
    /// Total scrollable height of the day at this scale.
    pub content_height: f64,
    pub layout_identity: u64,
    pub scale_version: u64,
    /// Whether the host may animate the transition to this frame.
    pub animate: bool,
}

impl FrameOutput {
    /// The event rect under a press at `(x, y)`, if any. When the
    /// minimum-height floor makes rects visually overlap, the
    /// later-drawn one wins (it is on top).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&EventRect> {
        self.rects.iter().rev().find(|r| {
            x >= r.rect.x && x < r.rect.x + r.rect.w && y >= r.rect.y && y < r.rect.y + r.rect.h
        })
    }
}

/// Copy of the inputs that affect geometry, compared to suppress
/// redundant derivations. Floats are compared by bit pattern: any
/// numeric change, however small, is a real change.
#[derive(Debug, Clone, PartialEq)]
struct Fingerprint {
    layout_identity: u64,
    day_index: usize,
    pixels_per_hour: u64,
    column_width: u64,
    grid_left: u64,
    minimum_event_height: u64,
    default_event_color: SharedStr,
    default_border_color: SharedStr,
    pinch_active: bool,
}

impl Fingerprint {
    fn of(inputs: &FrameInputs<'_>) -> Self {
        Self {
            layout_identity: inputs.layout.identity,
            day_index: inputs.day_index,
            pixels_per_hour: inputs.pixels_per_hour.to_bits(),
            column_width: inputs.column_width.to_bits(),
            grid_left: inputs.grid_left.to_bits(),
            minimum_event_height: inputs.minimum_event_height.to_bits(),
            default_event_color: inputs.default_event_color.clone(),
            default_border_color: inputs.default_border_color.clone(),
            pinch_active: inputs.pinch_active,
        }
    }
}

/// Derives [`FrameOutput`]s, suppressing recomputation while inputs are
/// unchanged. One deriver per rendered day column.
#[derive(Debug, Default)]
pub struct FrameDeriver {
    last: Option<Fingerprint>,
}

impl FrameDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive this frame's geometry, or `None` when nothing relevant
    /// changed since the previous call and the host's last frame is
    /// still valid.
    pub fn derive(&mut self, inputs: &FrameInputs<'_>) -> Option<FrameOutput> {
        let fingerprint = Fingerprint::of(inputs);
        if self.last.as_ref() == Some(&fingerprint) {
            return None;
        }
        self.last = Some(fingerprint);
        Some(build(inputs))
    }

    /// Forget the previous fingerprint so the next `derive` recomputes
    /// unconditionally. Used when something outside the inputs changed,
    /// e.g. the theme object was mutated in place.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

fn build(inputs: &FrameInputs<'_>) -> FrameOutput {
    let pph = inputs.pixels_per_hour;
    let column_left = inputs.grid_left + inputs.day_index as f64 * inputs.column_width;

    let rects = inputs
        .layout
        .events
        .iter()
        .map(|packed| {
            let event = &packed.event;
            EventRect {
                event: packed.clone(),
                rect: Rect {
                    x: column_left + packed.left * inputs.column_width,
                    y: event.start_hour * pph,
                    w: packed.width * inputs.column_width,
                    h: (event.duration_hours * pph).max(inputs.minimum_event_height),
                },
                color: event
                    .color
                    .clone()
                    .unwrap_or_else(|| inputs.default_event_color.clone()),
                border_color: event
                    .border_color
                    .clone()
                    .unwrap_or_else(|| inputs.default_border_color.clone()),
            }
        })
        .collect();

    FrameOutput {
        rects,
        hour_lines: hour_lines(pph),
        content_height: f64::from(HOURS_PER_DAY) * pph,
        layout_identity: inputs.layout.identity,
        scale_version: inputs.scale_version,
        animate: !inputs.pinch_active,
    }
}

/// Grid lines for a full day: one per hour, quarter marks between, and
/// the closing line at 24:00.
fn hour_lines(pixels_per_hour: f64) -> Vec<HourLine> {
    let quarters = usize::try_from(HOURS_PER_DAY).unwrap_or(24) * 4;
    let mut lines = Vec::with_capacity(quarters + 1);
    for quarter in 0..=quarters {
        let hour = quarter as f64 / 4.0;
        lines.push(HourLine {
            hour,
            y: hour * pixels_per_hour,
            is_hour: quarter % 4 == 0,
        });
    }
    lines
}
