use chrono::Utc;

use crate::db::PersistedState;
use crate::error::{AppError, Result};
use crate::models::{Bureau, Language, NewsResult, TrackedTopic, UserProfile};
use crate::services::{ScanProgress, ScanReport};

pub const HISTORY_LIMIT: usize = 50;

/// The live view: what is on the desk right now.
#[derive(Debug, Clone, Default)]
pub struct Desk {
    pub results: Vec<NewsResult>,
    pub error: Option<String>,
    pub pending_requests: usize,
    pub scan_progress: Option<ScanProgress>,
}

impl Desk {
    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0 || self.scan_progress.is_some()
    }
}

/// Which persisted slot a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Profile,
    History,
    Watchlist,
}

/// Application state passed explicitly to whoever needs it.
///
/// Mutators return the slots they changed so the caller can write them
/// through to the store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub profile: Option<UserProfile>,
    pub history: Vec<NewsResult>,
    pub watchlist: Vec<TrackedTopic>,
    pub desk: Desk,
}

impl AppState {
    pub fn from_persisted(persisted: PersistedState) -> Self {
        let mut history = persisted.history;
        history.truncate(HISTORY_LIMIT);
        Self {
            profile: persisted.profile,
            history,
            watchlist: persisted.watchlist,
            desk: Desk::default(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.is_registered)
    }

    pub fn register(&mut self, name: &str, bureau: Bureau) -> Result<Slot> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidRequest("officer name must not be empty".to_string()));
        }
        self.profile = Some(UserProfile::new(name, bureau));
        Ok(Slot::Profile)
    }

    // Watchlist

    pub fn add_topic(&mut self, keyword: &str, context: &str, language: Language) -> Result<Slot> {
        if keyword.trim().is_empty() {
            return Err(AppError::InvalidRequest("keyword must not be empty".to_string()));
        }
        self.watchlist
            .insert(0, TrackedTopic::new(keyword, context, language));
        Ok(Slot::Watchlist)
    }

    pub fn toggle_topic(&mut self, id: &str) -> Option<Slot> {
        let topic = self.watchlist.iter_mut().find(|t| t.id == id)?;
        topic.is_active = !topic.is_active;
        Some(Slot::Watchlist)
    }

    pub fn delete_topic(&mut self, id: &str) -> Option<Slot> {
        let before = self.watchlist.len();
        self.watchlist.retain(|t| t.id != id);
        (self.watchlist.len() != before).then_some(Slot::Watchlist)
    }

    pub fn active_topics(&self) -> usize {
        self.watchlist.iter().filter(|t| t.is_active).count()
    }

    // Ad-hoc requests

    pub fn begin_request(&mut self) {
        self.desk.pending_requests += 1;
        self.desk.error = None;
    }

    pub fn record_result(&mut self, result: NewsResult) -> Slot {
        self.desk.pending_requests = self.desk.pending_requests.saturating_sub(1);
        self.desk.results.insert(0, result.clone());
        self.push_history(vec![result]);
        Slot::History
    }

    pub fn record_failure(&mut self, message: String) {
        self.desk.pending_requests = self.desk.pending_requests.saturating_sub(1);
        self.desk.error = Some(message);
    }

    // Daily dispatch

    /// Returns false when a scan is already running or nothing is active.
    pub fn begin_scan(&mut self) -> bool {
        let total = self.active_topics();
        if total == 0 || self.desk.scan_progress.is_some() {
            return false;
        }
        self.desk.results.clear();
        self.desk.error = None;
        self.desk.scan_progress = Some(ScanProgress { current: 0, total });
        true
    }

    pub fn update_scan(&mut self, progress: ScanProgress) {
        self.desk.scan_progress = Some(progress);
    }

    pub fn finish_scan(&mut self, report: ScanReport) -> Vec<Slot> {
        self.desk.scan_progress = None;

        let checked_at = Utc::now();
        for topic in self
            .watchlist
            .iter_mut()
            .filter(|t| report.checked_topic_ids.contains(&t.id))
        {
            topic.last_checked = Some(checked_at);
        }

        self.desk.results = report.results.clone();
        self.push_history(report.results);

        vec![Slot::History, Slot::Watchlist]
    }

    pub fn fail_scan(&mut self, message: String) {
        self.desk.scan_progress = None;
        self.desk.error = Some(message);
    }

    // Archives

    pub fn load_from_archive(&mut self, index: usize) -> bool {
        let Some(result) = self.history.get(index).cloned() else {
            return false;
        };
        self.desk.results = vec![result];
        self.desk.error = None;
        true
    }

    /// Prepend a batch (already most-recent-first) and enforce the cap.
    fn push_history(&mut self, batch: Vec<NewsResult>) {
        let mut history = batch;
        history.append(&mut self.history);
        history.truncate(HISTORY_LIMIT);
        self.history = history;
    }
}
