use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Language;

/// Topic label given to results of a wire (headline digest) request.
pub const WIRE_TOPIC: &str = "WIRE DISPATCH";

/// Publications offered in the source filter.
pub const PREDEFINED_SOURCES: [&str; 9] = [
    "The Times of India",
    "The Hindu",
    "Hindustan Times",
    "The Indian Express",
    "The Economic Times",
    "Mint",
    "Business Standard",
    "Dainik Jagran",
    "Lokmat",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResult {
    pub id: String,
    pub topic: String,
    pub summary: String,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sources: Vec<WebSource>,
    #[serde(default)]
    pub is_wire: bool,
    #[serde(default)]
    pub is_watchlist_report: bool,
}

impl NewsResult {
    /// First eight characters of the id, upper-cased, as shown on wire cards.
    pub fn short_id(&self) -> String {
        self.id.chars().take(8).collect::<String>().to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchStatus {
    #[default]
    Idle,
    Transmitting,
    Scanning,
    Failed,
    NoApiKey,
}
