//! Rolling page windows: the ordered date sequences paginated lists
//! scroll through.

use std::collections::HashMap;

use timegrid_protocol::{DayKey, ViewMode};

/// How many pages to materialize on each side of the anchor date.
const INITIAL_RADIUS_PAGES: usize = 52;
/// Extra pages added beyond the requested date when the window grows,
/// so nearby jumps don't immediately extend again.
const EXTEND_SLACK_PAGES: usize = 14;

/// An ordered, contiguous window of page keys for one view mode, plus
/// the index currently focused.
///
/// Pages are spaced `days_per_page` apart and the window only ever
/// grows by appending or prepending — existing entries never reshuffle,
/// so an index obtained earlier stays valid (prepends report the shift
/// so held indices can be rebased).
#[derive(Debug, Clone)]
pub struct PageSet {
    first: DayKey,
    len: usize,
    step: u32,
    focused: usize,
}

impl PageSet {
    /// Build a window of `2 × radius + 1` pages centered on `anchor`.
    ///
    /// Week pages snap the anchor to its Monday so every page key is a
    /// week start.
    pub fn around(anchor: DayKey, mode: ViewMode, radius: usize) -> Self {
        let anchor = match mode {
            ViewMode::Week => anchor.week_start(),
            ViewMode::Day | ViewMode::ThreeDay => anchor,
        };
        let step = mode.days_per_page();
        Self {
            first: anchor.offset(-(radius as i64) * i64::from(step)),
            len: radius * 2 + 1,
            step,
            focused: radius,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Days between consecutive page keys.
    pub fn step_days(&self) -> u32 {
        self.step
    }

    /// The date starting the page at `index`.
    pub fn date_at(&self, index: usize) -> Option<DayKey> {
        (index < self.len).then(|| self.first.offset(index as i64 * i64::from(self.step)))
    }

    /// The index of the page containing `date`, or `None` when the date
    /// falls outside the current window. Callers extend and retry.
    pub fn index_of(&self, date: DayKey) -> Option<usize> {
        let days = date.days_since(self.first);
        if days < 0 {
            return None;
        }
        let index = (days / i64::from(self.step)) as usize;
        (index < self.len).then_some(index)
    }

    /// The page `delta` steps away from `index`, clamped to the window.
    pub fn adjacent(&self, index: usize, delta: i64) -> usize {
        let target = index as i64 + delta;
        target.clamp(0, self.len.saturating_sub(1) as i64) as usize
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    /// Focus a page by index (clamped). Returns `true` if focus moved.
    pub fn set_focused(&mut self, index: usize) -> bool {
        let clamped = index.min(self.len.saturating_sub(1));
        let changed = clamped != self.focused;
        self.focused = clamped;
        changed
    }

    pub fn focused_date(&self) -> DayKey {
        self.first.offset(self.focused as i64 * i64::from(self.step))
    }

    /// Append `n` pages after the window's end.
    pub fn extend_future(&mut self, n: usize) {
        self.len += n;
    }

    /// Prepend `n` pages before the window's start. Every existing
    /// index shifts by `n`; the focused index is rebased internally and
    /// the shift is returned so callers can rebase indices they hold.
    pub fn extend_past(&mut self, n: usize) -> usize {
        self.first = self.first.offset(-(n as i64) * i64::from(self.step));
        self.len += n;
        self.focused += n;
        n
    }

    /// Focus the page containing `date`, growing the window when the
    /// date lies outside it. Returns the focused index.
    pub fn focus_date(&mut self, date: DayKey) -> usize {
        if let Some(index) = self.index_of(date) {
            self.set_focused(index);
            return index;
        }
        let days = date.days_since(self.first);
        if days < 0 {
            let deficit = days.unsigned_abs().div_ceil(u64::from(self.step)) as usize;
            self.extend_past(deficit + EXTEND_SLACK_PAGES);
        } else {
            let beyond = (days / i64::from(self.step)) as usize + 1 - self.len;
            self.extend_future(beyond + EXTEND_SLACK_PAGES);
        }
        // The window now covers the date.
        let index = self.index_of(date).unwrap_or(self.focused);
        self.set_focused(index);
        index
    }
}

/// One `PageSet` per view mode, sharing a focused date.
///
/// Mode switches preserve the focused date: switching Day → Week
/// focuses the week containing the day, and Week → Day focuses the
/// week's first day.
#[derive(Debug)]
pub struct ViewPages {
    mode: ViewMode,
    active: PageSet,
    /// Windows for modes not currently showing, kept so switching back
    /// returns to a previously grown window.
    parked: HashMap<ViewMode, PageSet>,
}

impl ViewPages {
    pub fn new(anchor: DayKey, mode: ViewMode) -> Self {
        Self {
            mode,
            active: PageSet::around(anchor, mode, INITIAL_RADIUS_PAGES),
            parked: HashMap::new(),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn active(&self) -> &PageSet {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut PageSet {
        &mut self.active
    }

    pub fn focused_date(&self) -> DayKey {
        self.active.focused_date()
    }

    /// Switch view mode, carrying the focused date over. Returns the
    /// focused index in the new mode's window.
    pub fn set_mode(&mut self, mode: ViewMode) -> usize {
        if mode == self.mode {
            return self.active.focused_index();
        }
        let date = self.focused_date();
        let next = self
            .parked
            .remove(&mode)
            .unwrap_or_else(|| PageSet::around(date, mode, INITIAL_RADIUS_PAGES));
        let previous = std::mem::replace(&mut self.active, next);
        self.parked.insert(self.mode, previous);
        self.mode = mode;
        self.active.focus_date(date)
    }
}
