//! timegrid engine: turns overlapping calendar events into
//! non-overlapping screen rectangles and keeps paginated header/body
//! lists focused on the same date without echo loops.
//!
//! ```text
//!   caller events ──▶ layout::pack ──▶ LayoutCache (per day+mode, immutable)
//!                                           │
//!   pinch/zoom ──▶ TimeScale ──────────────▶ FrameDeriver ──▶ EventRect[] + hour grid
//!                                           ▲
//!   list scrolls ──▶ SyncController ──▶ page focus ──▶ SyncCommand[] to host lists
//! ```
//!
//! Everything is pure computation over in-memory state; the host UI
//! loop drives `TimeScale::tick` and applies the emitted commands.

pub mod frame;
pub mod layout;
pub mod observe;
pub mod pages;
pub mod scale;
pub mod sync;

pub use frame::{FrameDeriver, FrameInputs, FrameOutput, HourLine};
pub use layout::cache::{DayLayout, LayoutCache};
pub use layout::packer::pack;
pub use observe::{Observable, SubscriberId};
pub use pages::{PageSet, ViewPages};
pub use scale::TimeScale;
pub use sync::{ListCapability, SyncController, SyncError};
