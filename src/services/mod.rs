pub mod catalog;
pub mod dwell;
pub mod selector;
pub mod session;
pub mod summary;
pub mod tracker;

pub use catalog::load_catalog;
pub use dwell::{DwellTimer, FocusTimers};
pub use selector::{FeedSelector, SelectorSettings};
pub use session::{FeedSession, FeedSettings, SessionError};
pub use summary::WrappedSummary;
pub use tracker::EngagementTracker;
