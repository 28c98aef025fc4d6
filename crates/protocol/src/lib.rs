pub mod commands;
pub mod config;
pub mod event;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::SyncCommand;
pub use config::TimelineConfig;
pub use event::{CalendarEvent, EventRect, PackedEvent};
pub use shared_str::SharedStr;
pub use theme::{ResolvedTheme, ThemeProperties};
pub use types::{DayKey, DayKeyError, Rect, ViewMode};
