use futures::stream::{self, StreamExt};

use crate::models::{NewsResult, TrackedTopic};

use super::tracker::{TrackRequest, Tracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub current: usize,
    pub total: usize,
}

impl ScanProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Successful results in watchlist order.
    pub results: Vec<NewsResult>,
    /// Ids of the topics that produced a result.
    pub checked_topic_ids: Vec<String>,
    pub failures: usize,
}

/// Run the daily dispatch over every active topic.
///
/// Entries are processed in watchlist order with at most `concurrency`
/// requests in flight (1 means strictly one after another). A failing topic
/// is logged and skipped. `on_progress` fires as each topic is sent out, so
/// `current` is the 1-based position of the topic now on the wire.
pub async fn run_watchlist_scan<F>(
    tracker: &Tracker,
    topics: &[TrackedTopic],
    concurrency: usize,
    mut on_progress: F,
) -> ScanReport
where
    F: FnMut(ScanProgress),
{
    let active: Vec<TrackedTopic> = topics.iter().filter(|t| t.is_active).cloned().collect();
    let total = active.len();
    let mut report = ScanReport::default();

    if total == 0 {
        return report;
    }

    tracing::info!("Daily dispatch: scanning {} active topics", total);

    let mut started = 0;
    let mut outcomes = stream::iter(active)
        .map(|topic| {
            started += 1;
            on_progress(ScanProgress {
                current: started,
                total,
            });

            let request = TrackRequest {
                topic: Some(topic.keyword.clone()),
                language: topic.language,
                context: topic.context_hint().map(str::to_string),
                ..Default::default()
            };
            async move {
                let outcome = tracker.track(&request).await;
                (topic, outcome)
            }
        })
        .buffered(concurrency.max(1));

    while let Some((topic, outcome)) = outcomes.next().await {
        match outcome {
            Ok(mut result) => {
                result.is_watchlist_report = true;
                report.checked_topic_ids.push(topic.id);
                report.results.push(result);
            }
            Err(e) => {
                tracing::warn!("Failed to scan topic {}: {}", topic.keyword, e);
                report.failures += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::Language;
    use crate::services::tracker::tests::MockService;

    fn topic(keyword: &str, active: bool) -> TrackedTopic {
        let mut topic = TrackedTopic::new(keyword, "", Language::English);
        topic.is_active = active;
        topic
    }

    fn watchlist() -> Vec<TrackedTopic> {
        vec![
            topic("Topic-A", true),
            topic("Topic-X", false),
            topic("Topic-B", true),
            topic("Topic-Y", false),
            topic("Topic-C", true),
        ]
    }

    #[tokio::test]
    async fn skips_inactive_and_isolates_failures() {
        let service = Arc::new(MockService::failing_on("Topic-B"));
        let tracker = Tracker::new(service.clone());
        let topics = watchlist();

        let mut ticks = Vec::new();
        let report = run_watchlist_scan(&tracker, &topics, 1, |p| ticks.push(p)).await;

        assert_eq!(service.call_count(), 3);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.results[0].topic, "Topic-A");
        assert_eq!(report.results[1].topic, "Topic-C");
        assert!(report.results.iter().all(|r| r.is_watchlist_report));
        assert_eq!(report.checked_topic_ids, vec![topics[0].id.clone(), topics[4].id.clone()]);

        let currents: Vec<usize> = ticks.iter().map(|p| p.current).collect();
        assert_eq!(currents, vec![1, 2, 3]);
        assert!(ticks.iter().all(|p| p.total == 3));
    }

    #[tokio::test]
    async fn progress_ticks_before_each_call() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        let mut seen = Vec::new();
        run_watchlist_scan(&tracker, &watchlist(), 1, |p| {
            seen.push((p.current, service.call_count()))
        })
        .await;

        assert_eq!(seen, vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[tokio::test]
    async fn scan_runs_on_a_spawned_task() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());
        let topics = watchlist();

        let handle = tokio::spawn(async move {
            run_watchlist_scan(&tracker, &topics, 1, |_| {}).await
        });

        let report = handle.await.unwrap();
        assert_eq!(report.results.len(), 3);
        assert_eq!(service.call_count(), 3);
    }

    #[tokio::test]
    async fn calls_service_in_watchlist_order() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        run_watchlist_scan(&tracker, &watchlist(), 1, |_| {}).await;

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].contains("Topic-A"));
        assert!(prompts[1].contains("Topic-B"));
        assert!(prompts[2].contains("Topic-C"));
    }

    #[tokio::test]
    async fn bounded_concurrency_keeps_order() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());

        let mut ticks = Vec::new();
        let report = run_watchlist_scan(&tracker, &watchlist(), 4, |p| ticks.push(p.current)).await;

        let topics: Vec<&str> = report.results.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["Topic-A", "Topic-B", "Topic-C"]);
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn no_active_topics_is_a_no_op() {
        let service = Arc::new(MockService::new());
        let tracker = Tracker::new(service.clone());
        let topics = vec![topic("Topic-X", false)];

        let mut ticked = false;
        let report = run_watchlist_scan(&tracker, &topics, 1, |_| ticked = true).await;

        assert!(report.results.is_empty());
        assert!(!ticked);
        assert_eq!(service.call_count(), 0);
    }

    #[test]
    fn progress_ratio() {
        let p = ScanProgress { current: 1, total: 4 };
        assert!((p.ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(ScanProgress { current: 0, total: 0 }.ratio(), 0.0);
    }
}
