mod language;
mod news;
mod profile;
mod watchlist;

pub use language::Language;
pub use news::{DispatchStatus, NewsResult, WebSource, PREDEFINED_SOURCES, WIRE_TOPIC};
pub use profile::{Bureau, UserProfile};
pub use watchlist::TrackedTopic;
