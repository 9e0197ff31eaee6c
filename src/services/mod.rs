mod prompt;
mod scanner;
pub(crate) mod tracker;

pub use scanner::{run_watchlist_scan, ScanProgress, ScanReport};
pub use tracker::{TrackRequest, Tracker};
