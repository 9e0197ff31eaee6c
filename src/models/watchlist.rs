use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Language;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedTopic {
    pub id: String,
    pub keyword: String,
    #[serde(default)]
    pub context: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl TrackedTopic {
    pub fn new(keyword: &str, context: &str, language: Language) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            keyword: keyword.trim().to_string(),
            context: context.trim().to_string(),
            language,
            last_checked: None,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Context used in prompts, `None` when the user left it blank.
    pub fn context_hint(&self) -> Option<&str> {
        let context = self.context.trim();
        (!context.is_empty()).then_some(context)
    }
}
