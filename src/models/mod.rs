pub mod content;
pub mod engagement;
pub mod profile;
pub mod session;
pub mod snapshot;

pub use content::{normalize_tag, Catalog, CatalogError, ContentItem};
pub use engagement::{EngagementEvent, EngagementKind, EngagementWeights};
pub use profile::InterestProfile;
pub use session::{FeedMode, SessionState};
pub use snapshot::{HistoryEntry, SessionSnapshot};
