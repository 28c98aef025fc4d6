use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::types::DayKey;

/// A single, stateless synchronization instruction.
///
/// The sync controller emits a `Vec<SyncCommand>` from each report and
/// never calls back into host lists — hosts apply the commands to
/// whatever scroll machinery they own. Each command carries all the
/// data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncCommand {
    /// Re-center `list` on the page for `date`.
    ///
    /// `generation` identifies the publish cycle that produced the
    /// command; a list that reported the triggering scroll ignores
    /// focus updates echoing its own report within the same token.
    SetFocus {
        list: SharedStr,
        date: DayKey,
        page_index: usize,
        generation: u64,
    },

    /// Continuously-updated drag preview for the initiating list only.
    /// Emitted instead of `SetFocus` while an independent-mode drag is
    /// in progress; carries no generation because it never propagates.
    FocusPreview { list: SharedStr, date: DayKey },
}

impl SyncCommand {
    /// The list this command targets.
    pub fn list(&self) -> &SharedStr {
        match self {
            Self::SetFocus { list, .. } | Self::FocusPreview { list, .. } => list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_list_accessor() {
        let cmd = SyncCommand::FocusPreview {
            list: "body".into(),
            date: "2024-03-11".parse().unwrap_or_else(|_| {
                DayKey::new(chrono::NaiveDate::MIN)
            }),
        };
        assert_eq!(cmd.list(), &SharedStr::from("body"));
    }

    #[test]
    fn serde_roundtrip() {
        let cmd = SyncCommand::SetFocus {
            list: "header".into(),
            date: "2024-03-11".parse().unwrap_or_else(|_| {
                DayKey::new(chrono::NaiveDate::MIN)
            }),
            page_index: 3,
            generation: 7,
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        let back: Result<SyncCommand, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(cmd));
    }
}
