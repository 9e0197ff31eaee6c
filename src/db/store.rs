use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{NewsResult, TrackedTopic, UserProfile};

use super::Repository;

pub const PROFILE_KEY: &str = "pressradar_profile";
pub const HISTORY_KEY: &str = "pressradar_history";
pub const WATCHLIST_KEY: &str = "pressradar_watchlist";

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub profile: Option<UserProfile>,
    pub history: Vec<NewsResult>,
    pub watchlist: Vec<TrackedTopic>,
}

/// Profile, history and watchlist slots, each a whole JSON document.
pub struct Store {
    repository: Repository,
}

impl Store {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn open(db_path: &str) -> Result<Self> {
        Ok(Self::new(Repository::new(db_path).await?))
    }

    /// Read all three slots. Missing or unreadable slots come back empty.
    pub async fn load(&self) -> PersistedState {
        PersistedState {
            profile: self.load_slot(PROFILE_KEY).await,
            history: self.load_slot(HISTORY_KEY).await.unwrap_or_default(),
            watchlist: self.load_slot(WATCHLIST_KEY).await.unwrap_or_default(),
        }
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.save_slot(PROFILE_KEY, profile).await
    }

    pub async fn save_history(&self, history: &[NewsResult]) -> Result<()> {
        self.save_slot(HISTORY_KEY, history).await
    }

    pub async fn save_watchlist(&self, watchlist: &[TrackedTopic]) -> Result<()> {
        self.save_slot(WATCHLIST_KEY, watchlist).await
    }

    async fn load_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.repository.get_value(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding corrupt {}: {}", key, e);
                None
            }
        }
    }

    async fn save_slot<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.repository.put_value(key, json).await
    }
}
