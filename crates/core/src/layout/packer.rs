//! Interval packing: assign overlapping events to side-by-side columns.
//!
//! Pure and deterministic — same input, same output, no shared state —
//! so days can be packed in any order or in parallel and cached
//! indefinitely.

use timegrid_protocol::{CalendarEvent, PackedEvent};

/// Span given to zero-duration events for clustering and column
/// assignment, so markers still claim a column instead of vanishing.
/// One minute of resolution.
const ZERO_DURATION_EPSILON_HOURS: f64 = 1.0 / 60.0;

/// Pack one day's events into non-overlapping column fractions.
///
/// 1. Sort by start ascending; ties prefer the longer event, then
///    input order, keeping output deterministic for equal inputs.
/// 2. Split into overlap clusters: a cluster closes when the next
///    event starts at or after the latest end seen so far.
/// 3. Within a cluster, greedily assign each event the smallest column
///    whose previous occupant has ended (interval-graph coloring —
///    minimal because events arrive sorted by start).
/// 4. `width = 1/columns`, `left = column/columns`, then widen events
///    rightward across columns no overlapping event occupies.
///
/// Malformed events are clamped, never rejected: the engine prefers
/// degraded output over a missing frame.
pub fn pack(events: &[CalendarEvent]) -> Vec<PackedEvent> {
    if events.is_empty() {
        return Vec::new();
    }

    let sanitized: Vec<CalendarEvent> = events.iter().map(CalendarEvent::sanitized).collect();

    let mut order: Vec<usize> = (0..sanitized.len()).collect();
    order.sort_by(|&a, &b| {
        let ea = &sanitized[a];
        let eb = &sanitized[b];
        ea.start_hour
            .total_cmp(&eb.start_hour)
            .then(eb.duration_hours.total_cmp(&ea.duration_hours))
            .then(a.cmp(&b))
    });

    let mut packed = Vec::with_capacity(sanitized.len());
    let mut cluster: Vec<usize> = Vec::new();
    let mut cluster_max_end = f64::NEG_INFINITY;

    for &idx in &order {
        let start = sanitized[idx].start_hour;
        if !cluster.is_empty() && start >= cluster_max_end {
            pack_cluster(&sanitized, &cluster, &mut packed);
            cluster.clear();
            cluster_max_end = f64::NEG_INFINITY;
        }
        cluster_max_end = cluster_max_end.max(effective_end(&sanitized[idx]));
        cluster.push(idx);
    }
    if !cluster.is_empty() {
        pack_cluster(&sanitized, &cluster, &mut packed);
    }

    packed
}

/// End of an event's claimed span, with the zero-duration floor applied.
fn effective_end(event: &CalendarEvent) -> f64 {
    event.start_hour + event.duration_hours.max(ZERO_DURATION_EPSILON_HOURS)
}

fn spans_overlap(a: &CalendarEvent, b: &CalendarEvent) -> bool {
    a.start_hour < effective_end(b) && b.start_hour < effective_end(a)
}

/// Color one cluster and emit its packed events.
///
/// `members` is in scan order (start ascending), which greedy coloring
/// relies on for column minimality.
fn pack_cluster(events: &[CalendarEvent], members: &[usize], out: &mut Vec<PackedEvent>) {
    // column_end[c] = effective end of the latest event placed in column c.
    let mut column_end: Vec<f64> = Vec::new();
    let mut assigned: Vec<usize> = Vec::with_capacity(members.len());

    for &idx in members {
        let event = &events[idx];
        let column = column_end
            .iter()
            .position(|&end| event.start_hour >= end)
            .unwrap_or_else(|| {
                column_end.push(f64::NEG_INFINITY);
                column_end.len() - 1
            });
        column_end[column] = effective_end(event);
        assigned.push(column);
    }

    let columns = column_end.len();
    for (slot, &idx) in members.iter().enumerate() {
        let column = assigned[slot];
        let span = widened_span(events, members, &assigned, slot, columns);
        out.push(PackedEvent {
            event: events[idx].clone(),
            left: column as f64 / columns as f64,
            width: span as f64 / columns as f64,
            column,
        });
    }
}

/// Fill-gap refinement: how many columns, starting at the event's own,
/// it may span without covering any time-overlapping neighbor.
fn widened_span(
    events: &[CalendarEvent],
    members: &[usize],
    assigned: &[usize],
    slot: usize,
    columns: usize,
) -> usize {
    let event = &events[members[slot]];
    let own = assigned[slot];
    let mut span = 1;
    for column in own + 1..columns {
        let blocked = members.iter().zip(assigned).any(|(&other, &col)| {
            col == column && spans_overlap(event, &events[other])
        });
        if blocked {
            break;
        }
        span += 1;
    }
    span
}
