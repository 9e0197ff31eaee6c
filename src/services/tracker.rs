use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::ai::{Citation, GenerationRequest, GenerationService, GroundedResponse};
use crate::error::{AppError, Result};
use crate::models::{Language, NewsResult, WebSource, WIRE_TOPIC};

use super::prompt::build_prompt;

const EMPTY_DISPATCH: &str = "Dispatch received but empty.";
const SIGNAL_LOST: &str = "Telegraph signal lost.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackRequest {
    pub topic: Option<String>,
    pub language: Language,
    pub selected_sources: Vec<String>,
    pub include_epapers: bool,
    pub is_wire: bool,
    pub context: Option<String>,
}

impl TrackRequest {
    pub fn topic(topic: &str, language: Language) -> Self {
        Self {
            topic: Some(topic.to_string()),
            language,
            ..Default::default()
        }
    }

    pub fn wire(language: Language) -> Self {
        Self {
            language,
            is_wire: true,
            ..Default::default()
        }
    }

    /// Topic to record on the result. Topic-mode requests must not be blank.
    fn checked_topic(&self) -> Result<&str> {
        if self.is_wire {
            return Ok(WIRE_TOPIC);
        }
        match self.topic.as_deref() {
            Some(topic) if !topic.trim().is_empty() => Ok(topic),
            _ => Err(AppError::InvalidRequest("topic must not be empty".to_string())),
        }
    }
}

/// Request orchestrator: one prompt, one backend call, one normalized result.
#[derive(Clone)]
pub struct Tracker {
    service: Arc<dyn GenerationService>,
}

impl Tracker {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub async fn track(&self, request: &TrackRequest) -> Result<NewsResult> {
        let topic = request.checked_topic()?;

        let generation = GenerationRequest {
            prompt: build_prompt(request),
            language: request.language,
            grounded: true,
        };

        tracing::info!(
            "Dispatching {} request ({}) to {}",
            if request.is_wire { "wire" } else { "topic" },
            request.language,
            self.service.model_name()
        );

        let response = self.service.generate(&generation).await.map_err(|e| {
            tracing::error!("Generation failed: {}", e);
            let message = e.to_string();
            if message.trim().is_empty() {
                AppError::Dispatch(SIGNAL_LOST.to_string())
            } else {
                AppError::Dispatch(message)
            }
        })?;

        Ok(normalize(response, topic, request))
    }
}

fn normalize(response: GroundedResponse, topic: &str, request: &TrackRequest) -> NewsResult {
    let summary = response
        .text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| EMPTY_DISPATCH.to_string());

    NewsResult {
        id: Uuid::new_v4().to_string(),
        topic: topic.to_string(),
        summary,
        language: request.language,
        timestamp: Utc::now(),
        sources: dedupe_sources(response.citations),
        is_wire: request.is_wire,
        is_watchlist_report: false,
    }
}

/// Keep citations with a web URI, fill in missing titles, drop repeated URIs.
pub fn dedupe_sources(citations: Vec<Citation>) -> Vec<WebSource> {
    let mut seen = HashSet::new();

    citations
        .into_iter()
        .filter_map(|citation| {
            let uri = citation.uri.filter(|uri| !uri.trim().is_empty())?;
            let title = citation
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| hostname_of(&uri));
            Some(WebSource { uri, title })
        })
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}

fn hostname_of(uri: &str) -> String {
    url::Url::parse(uri)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| uri.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    /// Scripted backend: fails for prompts mentioning any of `fail_on`.
    pub(crate) struct MockService {
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
        pub fail_on: Vec<String>,
        pub citations: Vec<Citation>,
        pub text: Option<String>,
    }

    impl MockService {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                fail_on: Vec::new(),
                citations: Vec::new(),
                text: Some("**Breaking** report".to_string()),
            }
        }

        pub(crate) fn failing_on(keyword: &str) -> Self {
            Self {
                fail_on: vec![keyword.to_string()],
                ..Self::new()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationService for MockService {
        async fn generate(&self, request: &GenerationRequest) -> Result<GroundedResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());

            if self.fail_on.iter().any(|k| request.prompt.contains(k.as_str())) {
                return Err(AppError::GeminiApi("HTTP 503: overloaded".to_string()));
            }

            Ok(GroundedResponse {
                text: self.text.clone(),
                citations: self.citations.clone(),
            })
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }

    fn citation(uri: Option<&str>, title: Option<&str>) -> Citation {
        Citation {
            uri: uri.map(str::to_string),
            title: title.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_without_calling_service() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        for topic in ["", "   ", "\t\n"] {
            let result = tracker.track(&TrackRequest::topic(topic, Language::English)).await;
            assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        }

        let missing = TrackRequest {
            topic: None,
            ..Default::default()
        };
        assert_err!(tracker.track(&missing).await);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn topic_request_keeps_topic_as_typed() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        let result = assert_ok!(
            tracker
                .track(&TrackRequest::topic("  Monsoon  ", Language::Hindi))
                .await
        );

        assert_eq!(result.topic, "  Monsoon  ");
        assert_eq!(result.language, Language::Hindi);
        assert_eq!(result.summary, "**Breaking** report");
        assert!(!result.is_wire);
        assert!(!result.is_watchlist_report);
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn wire_request_uses_sentinel_topic() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        let result = assert_ok!(tracker.track(&TrackRequest::wire(Language::English)).await);
        assert_eq!(result.topic, WIRE_TOPIC);
        assert!(result.is_wire);
    }

    #[tokio::test]
    async fn empty_text_gets_placeholder() {
        let mut service = MockService::new();
        service.text = Some("   ".to_string());
        let tracker = Tracker::new(Arc::new(service));

        let result = assert_ok!(
            tracker
                .track(&TrackRequest::topic("Budget", Language::English))
                .await
        );
        assert_eq!(result.summary, EMPTY_DISPATCH);
    }

    #[tokio::test]
    async fn service_failure_becomes_single_dispatch_error() {
        let service = Arc::new(MockService::failing_on("Budget"));
        let tracker = Tracker::new(service.clone());

        let err = tracker
            .track(&TrackRequest::topic("Budget", Language::English))
            .await
            .unwrap_err();

        match err {
            AppError::Dispatch(message) => assert!(message.contains("overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn fresh_ids_per_result() {
        let tracker = Tracker::new(Arc::new(MockService::new()));
        let request = TrackRequest::topic("Rail", Language::English);

        let a = tracker.track(&request).await.unwrap();
        let b = tracker.track(&request).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn duplicate_uris_keep_first_seen() {
        let sources = dedupe_sources(vec![
            citation(Some("https://a.com/x"), Some("First")),
            citation(Some("https://b.com/y"), Some("Other")),
            citation(Some("https://a.com/x"), Some("Second")),
        ]);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].uri, "https://a.com/x");
        assert_eq!(sources[0].title, "First");
        assert_eq!(sources[1].uri, "https://b.com/y");
    }

    #[test]
    fn citations_without_uri_are_dropped_and_titles_derived() {
        let sources = dedupe_sources(vec![
            citation(None, Some("No link")),
            citation(Some("https://www.thehindu.com/news/article1.ece"), None),
            citation(Some("https://livemint.com/a"), Some("  ")),
            citation(Some("not a url"), None),
        ]);

        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].title, "www.thehindu.com");
        assert_eq!(sources[1].title, "livemint.com");
        assert_eq!(sources[2].title, "not a url");
    }
}
