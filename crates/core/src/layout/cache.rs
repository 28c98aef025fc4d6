//! Cache of packed day layouts, keyed by day and view mode.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use timegrid_protocol::{CalendarEvent, DayKey, PackedEvent, ViewMode};

use crate::layout::packer;

/// One day's packed layout, immutable once produced.
///
/// `identity` is unique per produced layout: the frame deriver compares
/// identities instead of diffing event lists to decide whether the
/// focused page actually changed.
#[derive(Debug, Clone)]
pub struct DayLayout {
    pub day: DayKey,
    pub events: Vec<PackedEvent>,
    pub identity: u64,
}

/// Owns packed layouts and hands out shared references to them.
///
/// Layouts are cached per `(day, view mode)` because packing
/// granularity differs between modes. Invalidation drops entries; the
/// next `get_or_pack` produces a fresh layout with a new identity.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<(DayKey, ViewMode), Arc<DayLayout>>,
    next_identity: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: DayKey, mode: ViewMode) -> Option<Arc<DayLayout>> {
        self.entries.get(&(day, mode)).cloned()
    }

    /// Fetch the cached layout for `day`, packing `events` on a miss.
    pub fn get_or_pack(
        &mut self,
        day: DayKey,
        mode: ViewMode,
        events: &[CalendarEvent],
    ) -> Arc<DayLayout> {
        if let Some(layout) = self.entries.get(&(day, mode)) {
            return Arc::clone(layout);
        }
        let packed = packer::pack(events);
        let identity = self.next_identity;
        self.next_identity += 1;
        debug!(
            "packed {} events for {day} ({mode:?}), identity {identity}",
            packed.len(),
        );
        let layout = Arc::new(DayLayout {
            day,
            events: packed,
            identity,
        });
        self.entries.insert((day, mode), Arc::clone(&layout));
        layout
    }

    /// Drop `day`'s layouts across all view modes (events changed).
    pub fn invalidate_day(&mut self, day: DayKey) {
        self.entries.retain(|(d, _), _| *d != day);
        debug!("invalidated layouts for {day}");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
