//! Cross-list focus synchronization.
//!
//! Every paginated list (day header, week header, body) registers here.
//! Scroll reports come in, focus changes go out as [`SyncCommand`]s —
//! the controller never calls back into host machinery, so there is no
//! implicit reactive graph to loop through. Echo suppression is
//! explicit instead: each publish carries a generation token, the
//! originating list is never a publish target, and a follower's report
//! that merely reflects a focus recently pushed to it is consumed
//! without propagating.

use log::debug;
use timegrid_protocol::{DayKey, SharedStr, SyncCommand, TimelineConfig, ViewMode};

use crate::pages::ViewPages;

/// Fraction of a page the raw offset must travel beyond the boundary
/// midpoint before focus moves. Plain rounding would flip focus twice
/// while hovering at a page edge.
const HYSTERESIS: f64 = 0.15;

/// How many generations an outstanding focus push stays recognizable
/// as the source of an echoed scroll report. Beyond this the update is
/// stale either way and gets pruned.
const ECHO_GENERATION_WINDOW: u64 = 2;

/// What a registered list can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCapability {
    /// The list feeds scroll positions into the controller.
    pub reports_scroll: bool,
    /// The list re-centers when told to.
    pub accepts_focus_update: bool,
}

impl Default for ListCapability {
    fn default() -> Self {
        Self {
            reports_scroll: true,
            accepts_focus_update: true,
        }
    }
}

/// Host protocol misuse; never produced by user scrolling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// A report or settle named a list that was never registered.
    #[error("unknown list {id:?}")]
    UnknownList { id: String },
}

#[derive(Debug)]
struct RegisteredList {
    id: SharedStr,
    caps: ListCapability,
    /// Date of the focus most recently pushed to this list, for
    /// follower dedupe (re-applying the same date is a no-op).
    last_pushed: Option<DayKey>,
    /// Focus pushes this list has not yet acknowledged by reporting a
    /// matching scroll. A report landing on one of these dates is the
    /// list's scroll machinery catching up, not a user gesture.
    expected: Vec<(DayKey, u64)>,
}

/// An independent-mode drag in progress.
#[derive(Debug)]
struct DragState {
    list: SharedStr,
    /// Last page index derived from the drag. Settle uses this, not the
    /// release-event position, so out-of-order release still lands on
    /// the last known page.
    last_index: usize,
    last_preview: Option<usize>,
}

/// The coordination core keeping registered lists focused on one date.
pub struct SyncController {
    lists: Vec<RegisteredList>,
    pages: ViewPages,
    synced: bool,
    generation: u64,
    drag: Option<DragState>,
}

impl SyncController {
    pub fn new(config: &TimelineConfig, anchor: DayKey) -> Self {
        Self {
            lists: Vec::new(),
            pages: ViewPages::new(anchor, config.view_mode),
            synced: config.synced_lists,
            generation: 0,
            drag: None,
        }
    }

    /// Add a list to the sync group, or update its capabilities if the
    /// id is already registered.
    pub fn register(&mut self, id: impl Into<SharedStr>, caps: ListCapability) {
        let id = id.into();
        if let Some(existing) = self.lists.iter_mut().find(|l| l.id == id) {
            existing.caps = caps;
            return;
        }
        debug!("registered list {id}");
        self.lists.push(RegisteredList {
            id,
            caps,
            last_pushed: None,
            expected: Vec::new(),
        });
    }

    /// Remove a list on teardown. Its in-progress drag, if any, goes
    /// with it. Returns `false` if the id was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.lists.len();
        self.lists.retain(|l| l.id != id);
        if self.drag.as_ref().is_some_and(|d| d.list == id) {
            self.drag = None;
        }
        self.lists.len() != before
    }

    pub fn view_mode(&self) -> ViewMode {
        self.pages.mode()
    }

    pub fn focused_date(&self) -> DayKey {
        self.pages.focused_date()
    }

    pub fn focused_index(&self) -> usize {
        self.pages.active().focused_index()
    }

    pub fn pages(&self) -> &ViewPages {
        &self.pages
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Flip between coupled and independent scrolling. Entering coupled
    /// mode abandons any in-progress drag preview.
    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
        if synced {
            self.drag = None;
        }
    }

    /// Feed one scroll position from a list.
    ///
    /// `raw_offset` is the list's scroll offset in whatever unit the
    /// host uses, `page_extent` the size of one page in that unit.
    pub fn report_scroll(
        &mut self,
        list_id: &str,
        raw_offset: f64,
        page_extent: f64,
    ) -> Result<Vec<SyncCommand>, SyncError> {
        let list = self.find(list_id)?;
        if !self.lists[list].caps.reports_scroll {
            return Ok(Vec::new());
        }
        if !raw_offset.is_finite() || !page_extent.is_finite() || page_extent <= 0.0 {
            // Degenerate geometry; derive nothing, fail nothing.
            return Ok(Vec::new());
        }

        let position = raw_offset / page_extent;
        let window = self.pages.active();
        let last = window.len().saturating_sub(1);
        let candidate = (position.round().max(0.0) as usize).min(last);
        let date = window.date_at(candidate);
        let current = window.focused_index();

        if let Some(date) = date {
            if self.consume_expected(list, date) {
                debug!("consumed echo from {list_id} for {date}");
                return Ok(Vec::new());
            }
        }

        if !self.synced {
            return Ok(self.preview_drag(list, candidate));
        }

        if candidate == current {
            return Ok(Vec::new());
        }
        // Hysteresis: require real progress past the boundary midpoint.
        if (position - current as f64).abs() < 0.5 + HYSTERESIS {
            return Ok(Vec::new());
        }

        Ok(self.move_focus(candidate, Some(list)))
    }

    /// End an independent-mode drag: commit the last known position and
    /// propagate it to the rest of the group.
    pub fn settle(&mut self, list_id: &str) -> Result<Vec<SyncCommand>, SyncError> {
        let origin = self.find(list_id)?;
        let Some(drag) = self.drag.take_if(|d| d.list == list_id) else {
            return Ok(Vec::new());
        };
        Ok(self.move_focus(drag.last_index, Some(origin)))
    }

    /// Jump the whole group to `date` ("today" button, deep link).
    ///
    /// Always propagates to every accepting list, independent mode or
    /// not, and resets any drag state. Idempotent: a second call with
    /// the same date emits nothing.
    pub fn request_focus(&mut self, date: DayKey) -> Vec<SyncCommand> {
        self.drag = None;
        let index = self.pages.active_mut().focus_date(date);
        self.publish(index, None, false)
    }

    /// Switch pagination granularity, preserving the focused date.
    /// Every accepting list is re-centered since page indices change
    /// wholesale.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<SyncCommand> {
        if mode == self.pages.mode() {
            return Vec::new();
        }
        self.drag = None;
        let index = self.pages.set_mode(mode);
        debug!("view mode now {mode:?}, focused {}", self.focused_date());
        self.publish(index, None, true)
    }

    fn find(&self, list_id: &str) -> Result<usize, SyncError> {
        self.lists
            .iter()
            .position(|l| l.id == list_id)
            .ok_or_else(|| SyncError::UnknownList {
                id: list_id.to_string(),
            })
    }

    /// Check a report against the list's outstanding focus pushes and
    /// consume the match if there is one.
    fn consume_expected(&mut self, list: usize, date: DayKey) -> bool {
        let generation = self.generation;
        let expected = &mut self.lists[list].expected;
        expected.retain(|&(_, g)| generation.saturating_sub(g) <= ECHO_GENERATION_WINDOW);
        if let Some(at) = expected.iter().position(|&(d, _)| d == date) {
            expected.remove(at);
            return true;
        }
        false
    }

    /// Update the drag preview for the initiating list only.
    fn preview_drag(&mut self, list: usize, candidate: usize) -> Vec<SyncCommand> {
        let id = self.lists[list].id.clone();
        let date = self.pages.active().date_at(candidate);
        let drag = self.drag.get_or_insert_with(|| DragState {
            list: id.clone(),
            last_index: candidate,
            last_preview: None,
        });
        if drag.list != id {
            // A second list started dragging; the newer gesture wins.
            *drag = DragState {
                list: id.clone(),
                last_index: candidate,
                last_preview: None,
            };
        }
        drag.last_index = candidate;
        if drag.last_preview == Some(candidate) {
            return Vec::new();
        }
        drag.last_preview = Some(candidate);
        match date {
            Some(date) => vec![SyncCommand::FocusPreview { list: id, date }],
            None => Vec::new(),
        }
    }

    /// Commit a focus change and publish it to followers.
    fn move_focus(&mut self, index: usize, origin: Option<usize>) -> Vec<SyncCommand> {
        if !self.pages.active_mut().set_focused(index) {
            return Vec::new();
        }
        self.publish(index, origin, false)
    }

    /// Emit `SetFocus` to every accepting list except the originator.
    /// `force` bypasses the same-date dedupe (used when page indices
    /// changed wholesale, e.g. a view-mode switch).
    fn publish(&mut self, index: usize, origin: Option<usize>, force: bool) -> Vec<SyncCommand> {
        let date = self.pages.focused_date();
        self.generation += 1;
        let generation = self.generation;
        debug!("focus -> {date} (page {index}, generation {generation})");

        let mut commands = Vec::new();
        for (i, list) in self.lists.iter_mut().enumerate() {
            if Some(i) == origin {
                // Never echo a focus update back at its originator. The
                // originator is already at this position, so no catch-up
                // report is expected from it either.
                list.last_pushed = Some(date);
                continue;
            }
            if !list.caps.accepts_focus_update {
                continue;
            }
            if !force && list.last_pushed == Some(date) {
                // Follower is already there; re-applying is a no-op.
                continue;
            }
            list.last_pushed = Some(date);
            if list.caps.reports_scroll {
                // The host will scroll this list, which reports back.
                list.expected.push((date, generation));
            }
            commands.push(SyncCommand::SetFocus {
                list: list.id.clone(),
                date,
                page_index: index,
                generation,
            });
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DayKey {
        s.parse()
            .unwrap_or_else(|_| DayKey::from(chrono::NaiveDate::MIN))
    }

    fn controller(synced: bool) -> SyncController {
        let config = TimelineConfig {
            synced_lists: synced,
            view_mode: ViewMode::Day,
            ..TimelineConfig::default()
        };
        let mut ctl = SyncController::new(&config, key("2024-03-11"));
        ctl.register("body", ListCapability::default());
        ctl.register(
            "header",
            ListCapability {
                reports_scroll: false,
                accepts_focus_update: true,
            },
        );
        ctl
    }

    /// Raw offset placing a list squarely on `index` (extent 100).
    fn offset(index: usize) -> f64 {
        index as f64 * 100.0
    }

    #[test]
    fn scroll_propagates_to_other_lists_only() {
        let mut ctl = controller(true);
        let start = ctl.focused_index();
        let target = start + 3;

        let commands = ctl
            .report_scroll("body", offset(target), 100.0)
            .unwrap_or_default();
        assert_eq!(commands.len(), 1);
        assert!(matches!(&commands[0], SyncCommand::SetFocus { .. }));
        if let SyncCommand::SetFocus { list, date, page_index, .. } = &commands[0] {
            assert_eq!(list, &SharedStr::from("header"));
            assert_eq!(*page_index, target);
            assert_eq!(Some(*date), ctl.pages().active().date_at(target));
        }
        assert_eq!(ctl.focused_index(), target);
    }

    #[test]
    fn repeated_report_is_idempotent() {
        let mut ctl = controller(true);
        let target = ctl.focused_index() + 2;
        let first = ctl.report_scroll("body", offset(target), 100.0).unwrap_or_default();
        assert!(!first.is_empty());
        let second = ctl.report_scroll("body", offset(target), 100.0).unwrap_or_default();
        assert!(second.is_empty());
        let third = ctl.report_scroll("body", offset(target), 100.0).unwrap_or_default();
        assert!(third.is_empty());
    }

    #[test]
    fn hysteresis_suppresses_boundary_chatter() {
        let mut ctl = controller(true);
        let current = ctl.focused_index();

        // Just past the midpoint: rounding alone would flip, hysteresis holds.
        let nudge = (current as f64 + 0.6) * 100.0;
        assert!(ctl.report_scroll("body", nudge, 100.0).unwrap_or_default().is_empty());
        assert_eq!(ctl.focused_index(), current);

        // Past midpoint + hysteresis margin: focus moves.
        let commit = (current as f64 + 0.7) * 100.0;
        assert!(!ctl.report_scroll("body", commit, 100.0).unwrap_or_default().is_empty());
        assert_eq!(ctl.focused_index(), current + 1);

        // Drifting back to 0.6 does not flip focus back.
        assert!(ctl.report_scroll("body", nudge, 100.0).unwrap_or_default().is_empty());
        assert_eq!(ctl.focused_index(), current + 1);
    }

    #[test]
    fn request_focus_reaches_every_acceptor_and_is_idempotent() {
        let mut ctl = controller(true);
        let date = key("2024-05-01");

        let commands = ctl.request_focus(date);
        assert_eq!(commands.len(), 2, "both body and header re-center");
        assert_eq!(ctl.focused_date(), date);

        assert!(ctl.request_focus(date).is_empty(), "same date is a no-op");
    }

    #[test]
    fn request_focus_outside_window_extends_it() {
        let mut ctl = controller(true);
        let far = key("2030-01-01");
        let commands = ctl.request_focus(far);
        assert!(!commands.is_empty());
        assert_eq!(ctl.focused_date(), far);
    }

    #[test]
    fn independent_mode_previews_without_propagating() {
        let mut ctl = controller(false);
        let target = ctl.focused_index() + 2;

        let commands = ctl.report_scroll("body", offset(target), 100.0).unwrap_or_default();
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            &commands[0],
            SyncCommand::FocusPreview { list, .. } if list == &SharedStr::from("body")
        ));
        // Shared focus has not moved yet.
        assert_ne!(ctl.focused_index(), target);

        // Same position previews nothing new.
        assert!(ctl.report_scroll("body", offset(target), 100.0).unwrap_or_default().is_empty());
    }

    #[test]
    fn settle_commits_the_last_known_position() {
        let mut ctl = controller(false);
        let start = ctl.focused_index();
        ctl.report_scroll("body", offset(start + 2), 100.0).unwrap_or_default();
        ctl.report_scroll("body", offset(start + 4), 100.0).unwrap_or_default();

        let commands = ctl.settle("body").unwrap_or_default();
        assert_eq!(ctl.focused_index(), start + 4);
        // Header is told; body (the originator) is not.
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].list(), &SharedStr::from("header"));

        // Settling again is a no-op; drag state never sticks.
        assert!(ctl.settle("body").unwrap_or_default().is_empty());
    }

    #[test]
    fn settle_without_a_drag_is_harmless() {
        let mut ctl = controller(true);
        assert!(ctl.settle("body").unwrap_or_default().is_empty());
    }

    #[test]
    fn request_focus_resets_drag_state() {
        let mut ctl = controller(false);
        let start = ctl.focused_index();
        ctl.report_scroll("body", offset(start + 2), 100.0).unwrap_or_default();

        let date = key("2024-04-01");
        ctl.request_focus(date);
        assert_eq!(ctl.focused_date(), date);

        // The abandoned drag no longer settles anywhere.
        assert!(ctl.settle("body").unwrap_or_default().is_empty());
        assert_eq!(ctl.focused_date(), date);
    }

    #[test]
    fn stale_echo_is_dropped() {
        let mut ctl = controller(true);
        ctl.register("header", ListCapability::default()); // header now reports too
        let start = ctl.focused_index();

        // Body moves focus; header is pushed to start+2.
        ctl.report_scroll("body", offset(start + 2), 100.0).unwrap_or_default();
        // Body moves again before header's scroll machinery catches up.
        ctl.report_scroll("body", offset(start + 4), 100.0).unwrap_or_default();

        // Header's late report of the old push must not drag the group back.
        let echo = ctl
            .report_scroll("header", offset(start + 2), 100.0)
            .unwrap_or_default();
        assert!(echo.is_empty());
        assert_eq!(ctl.focused_index(), start + 4);

        // Header catching up to the current push is consumed too.
        let catch_up = ctl
            .report_scroll("header", offset(start + 4), 100.0)
            .unwrap_or_default();
        assert!(catch_up.is_empty());
        assert_eq!(ctl.focused_index(), start + 4);
    }

    #[test]
    fn unknown_list_is_an_error() {
        let mut ctl = controller(true);
        assert_eq!(
            ctl.report_scroll("ghost", 0.0, 100.0),
            Err(SyncError::UnknownList { id: "ghost".into() }),
        );
        assert!(ctl.settle("ghost").is_err());
    }

    #[test]
    fn non_reporting_list_is_ignored() {
        let mut ctl = controller(true);
        let commands = ctl.report_scroll("header", offset(3), 100.0).unwrap_or_default();
        assert!(commands.is_empty());
    }

    #[test]
    fn degenerate_extent_derives_nothing() {
        let mut ctl = controller(true);
        assert!(ctl.report_scroll("body", 100.0, 0.0).unwrap_or_default().is_empty());
        assert!(ctl.report_scroll("body", f64::NAN, 100.0).unwrap_or_default().is_empty());
    }

    #[test]
    fn unregister_tears_down_cleanly() {
        let mut ctl = controller(false);
        let start = ctl.focused_index();
        ctl.report_scroll("body", offset(start + 1), 100.0).unwrap_or_default();
        assert!(ctl.unregister("body"));
        assert!(!ctl.unregister("body"));
        assert!(ctl.report_scroll("body", 0.0, 100.0).is_err());
    }

    #[test]
    fn view_mode_switch_recenters_everyone_on_the_same_date() {
        let mut ctl = controller(true);
        // 2024-03-11 is a Monday; switch to week pages.
        let commands = ctl.set_view_mode(ViewMode::Week);
        assert_eq!(ctl.view_mode(), ViewMode::Week);
        assert_eq!(commands.len(), 2, "indices changed wholesale, everyone re-centers");
        assert_eq!(
            ctl.focused_date().to_string(),
            "2024-03-11",
            "focused date survives the switch",
        );
        assert!(ctl.set_view_mode(ViewMode::Week).is_empty());
    }
}
