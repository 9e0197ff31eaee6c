use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::GeminiClient;
use crate::config::Config;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{
    Bureau, DispatchStatus, Language, NewsResult, WebSource, PREDEFINED_SOURCES,
};
use crate::services::{run_watchlist_scan, ScanProgress, ScanReport, TrackRequest, Tracker};
use crate::state::{AppState, Slot};
use crate::tui::AppAction;

const NO_API_KEY: &str = "Gemini API key not configured. Set gemini_api_key in config.toml or GEMINI_API_KEY.";
const SCAN_ABORTED: &str = "Morning dispatch failed: Wire line cut.";
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Desk,
    Watchlist,
    Archives,
}

impl View {
    pub fn next(&self) -> Self {
        match self {
            View::Desk => View::Watchlist,
            View::Watchlist => View::Archives,
            View::Archives => View::Desk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Desk => "The Desk",
            View::Watchlist => "Watchlist",
            View::Archives => "Archives",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Registration,
    Topic,
    WatchKeyword,
    WatchContext,
    SourcePicker,
}

// Messages from background dispatch tasks
pub enum DeskMessage {
    Completed(std::result::Result<NewsResult, String>),
    ScanProgress(ScanProgress),
    ScanFinished(ScanReport),
    ScanAborted(String),
}

pub struct App {
    // Data
    pub state: AppState,

    // UI State
    pub view: View,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub input: String,
    pub pending_keyword: String,
    pub bureau: Bureau,
    pub language: Language,
    pub selected_sources: Vec<String>,
    pub include_epapers: bool,
    pub picker_index: usize,
    pub desk_index: usize,
    pub source_index: usize,
    pub watch_index: usize,
    pub archive_index: usize,
    pub scroll: u16,
    spinner_frame: usize,

    // Async state
    desk_rx: mpsc::UnboundedReceiver<DeskMessage>,
    desk_tx: mpsc::UnboundedSender<DeskMessage>,

    // Services
    store: Store,
    tracker: Option<Tracker>,
    scan_concurrency: usize,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_path).await?;

        let tracker = match config.api_key() {
            Some(key) => {
                let client = GeminiClient::new(key, config)?;
                Some(Tracker::new(Arc::new(client)))
            }
            None => {
                tracing::warn!("No Gemini API key configured");
                None
            }
        };

        Ok(Self::with_parts(store, tracker, config).await)
    }

    pub async fn with_parts(store: Store, tracker: Option<Tracker>, config: &Config) -> Self {
        let state = AppState::from_persisted(store.load().await);
        let input_mode = if state.is_registered() {
            InputMode::Normal
        } else {
            InputMode::Registration
        };

        let (desk_tx, desk_rx) = mpsc::unbounded_channel();

        Self {
            state,
            view: View::Desk,
            input_mode,
            show_help: false,
            input: String::new(),
            pending_keyword: String::new(),
            bureau: Bureau::default(),
            language: config.default_language,
            selected_sources: Vec::new(),
            include_epapers: false,
            picker_index: 0,
            desk_index: 0,
            source_index: 0,
            watch_index: 0,
            archive_index: 0,
            scroll: 0,
            spinner_frame: 0,
            desk_rx,
            desk_tx,
            store,
            tracker,
            scan_concurrency: config.scan_concurrency,
        }
    }

    pub fn status(&self) -> DispatchStatus {
        if self.state.desk.scan_progress.is_some() {
            DispatchStatus::Scanning
        } else if self.state.desk.pending_requests > 0 {
            DispatchStatus::Transmitting
        } else if self.tracker.is_none() {
            DispatchStatus::NoApiKey
        } else if self.state.desk.error.is_some() {
            DispatchStatus::Failed
        } else {
            DispatchStatus::Idle
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.state.desk.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn selected_result(&self) -> Option<&NewsResult> {
        self.state.desk.results.get(self.desk_index)
    }

    /// Citation under the source cursor on the current news card.
    pub fn selected_source(&self) -> Option<&WebSource> {
        self.selected_result()?.sources.get(self.source_index)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextView => self.switch_view(self.view.next()),
            AppAction::ShowView(view) => self.switch_view(view),

            AppAction::MoveUp => {
                let index = self.current_index_mut();
                *index = index.saturating_sub(1);
                self.scroll = 0;
                self.source_index = 0;
            }

            AppAction::MoveDown => {
                let len = self.current_len();
                let index = self.current_index_mut();
                if len > 0 && *index < len - 1 {
                    *index += 1;
                }
                self.scroll = 0;
                self.source_index = 0;
            }

            AppAction::PrevSource => self.source_index = self.source_index.saturating_sub(1),
            AppAction::NextSource => {
                let count = self.selected_result().map_or(0, |r| r.sources.len());
                if self.source_index + 1 < count {
                    self.source_index += 1;
                }
            }

            AppAction::ScrollUp => self.scroll = self.scroll.saturating_sub(10),
            AppAction::ScrollDown => self.scroll = self.scroll.saturating_add(10),

            AppAction::Select => match self.view {
                View::Desk => self.start_input(InputMode::Topic),
                View::Watchlist => self.toggle_selected_topic().await,
                View::Archives => {
                    if self.state.load_from_archive(self.archive_index) {
                        self.view = View::Desk;
                        self.reset_desk_cursor();
                    }
                }
            },

            AppAction::StartTopicInput => {
                self.view = View::Desk;
                self.start_input(InputMode::Topic);
            }

            AppAction::FetchWire => {
                let mut request = TrackRequest::wire(self.language);
                request.selected_sources = self.selected_sources.clone();
                request.include_epapers = self.include_epapers;
                self.dispatch(request);
            }

            AppAction::CycleLanguage => self.language = self.language.cycle(),

            AppAction::OpenSourcePicker => {
                self.picker_index = 0;
                self.input_mode = InputMode::SourcePicker;
            }

            AppAction::RunDailyDispatch => self.run_daily_dispatch(),

            AppAction::AddTopic => {
                self.view = View::Watchlist;
                self.pending_keyword.clear();
                self.start_input(InputMode::WatchKeyword);
            }

            AppAction::ToggleTopic => {
                if self.view == View::Watchlist {
                    self.toggle_selected_topic().await;
                }
            }

            AppAction::DeleteTopic => {
                if self.view == View::Watchlist {
                    self.delete_selected_topic().await;
                }
            }

            AppAction::OpenInBrowser => {
                if let Some(source) = self.selected_source() {
                    if let Err(e) = open::that(&source.uri) {
                        tracing::warn!("Failed to open {}: {}", source.uri, e);
                    }
                }
            }

            AppAction::ShowHelp => self.show_help = true,
            AppAction::HideHelp => self.show_help = false,

            AppAction::InputChar(c) => self.input.push(c),
            AppAction::InputBackspace => {
                self.input.pop();
            }
            AppAction::InputConfirm => self.confirm_input().await,
            AppAction::InputCancel => {
                self.input.clear();
                self.pending_keyword.clear();
                self.input_mode = InputMode::Normal;
            }
            AppAction::CycleBureau => self.bureau = self.bureau.cycle(),

            AppAction::PickerUp => self.picker_index = self.picker_index.saturating_sub(1),
            AppAction::PickerDown => {
                // Last row is the e-paper toggle
                if self.picker_index < PREDEFINED_SOURCES.len() {
                    self.picker_index += 1;
                }
            }
            AppAction::PickerToggle => self.toggle_picker_row(),
            AppAction::PickerClose => self.input_mode = InputMode::Normal,
        }

        Ok(false)
    }

    fn switch_view(&mut self, view: View) {
        self.view = view;
        self.scroll = 0;
    }

    fn current_len(&self) -> usize {
        match self.view {
            View::Desk => self.state.desk.results.len(),
            View::Watchlist => self.state.watchlist.len(),
            View::Archives => self.state.history.len(),
        }
    }

    fn current_index_mut(&mut self) -> &mut usize {
        match self.view {
            View::Desk => &mut self.desk_index,
            View::Watchlist => &mut self.watch_index,
            View::Archives => &mut self.archive_index,
        }
    }

    fn reset_desk_cursor(&mut self) {
        self.desk_index = 0;
        self.source_index = 0;
        self.scroll = 0;
    }

    /// Keep the archive cursor on the same report after `added` entries are
    /// prepended to history.
    fn shift_archive_cursor(&mut self, added: usize) {
        if self.state.history.is_empty() {
            self.archive_index = 0;
        } else {
            self.archive_index = (self.archive_index + added).min(self.state.history.len() - 1);
        }
    }

    fn start_input(&mut self, mode: InputMode) {
        self.input.clear();
        self.input_mode = mode;
    }

    async fn confirm_input(&mut self) {
        let text = std::mem::take(&mut self.input);

        match self.input_mode {
            InputMode::Registration => match self.state.register(&text, self.bureau) {
                Ok(slot) => {
                    self.persist(&[slot]).await;
                    self.input_mode = InputMode::Normal;
                }
                Err(_) => self.input = text,
            },

            InputMode::Topic => {
                self.input_mode = InputMode::Normal;
                // Blank topics are dropped before anything is dispatched
                if text.trim().is_empty() {
                    return;
                }
                let mut request = TrackRequest::topic(&text, self.language);
                request.selected_sources = self.selected_sources.clone();
                request.include_epapers = self.include_epapers;
                self.dispatch(request);
            }

            InputMode::WatchKeyword => {
                if text.trim().is_empty() {
                    self.input_mode = InputMode::Normal;
                    return;
                }
                self.pending_keyword = text;
                self.input_mode = InputMode::WatchContext;
            }

            InputMode::WatchContext => {
                let keyword = std::mem::take(&mut self.pending_keyword);
                self.input_mode = InputMode::Normal;
                match self.state.add_topic(&keyword, &text, self.language) {
                    Ok(slot) => {
                        self.watch_index = 0;
                        self.persist(&[slot]).await;
                    }
                    Err(e) => tracing::warn!("Topic not added: {}", e),
                }
            }

            InputMode::Normal | InputMode::SourcePicker => {}
        }
    }

    fn toggle_picker_row(&mut self) {
        match PREDEFINED_SOURCES.get(self.picker_index) {
            Some(source) => {
                if let Some(pos) = self.selected_sources.iter().position(|s| s == source) {
                    self.selected_sources.remove(pos);
                } else {
                    self.selected_sources.push(source.to_string());
                }
            }
            None => self.include_epapers = !self.include_epapers,
        }
    }

    async fn toggle_selected_topic(&mut self) {
        let Some(id) = self.state.watchlist.get(self.watch_index).map(|t| t.id.clone()) else {
            return;
        };
        if let Some(slot) = self.state.toggle_topic(&id) {
            self.persist(&[slot]).await;
        }
    }

    async fn delete_selected_topic(&mut self) {
        let Some(id) = self.state.watchlist.get(self.watch_index).map(|t| t.id.clone()) else {
            return;
        };
        if let Some(slot) = self.state.delete_topic(&id) {
            let len = self.state.watchlist.len();
            if len > 0 && self.watch_index >= len {
                self.watch_index = len - 1;
            }
            self.persist(&[slot]).await;
        }
    }

    fn dispatch(&mut self, request: TrackRequest) {
        self.view = View::Desk;

        let Some(tracker) = self.tracker.clone() else {
            self.state.desk.error = Some(NO_API_KEY.to_string());
            return;
        };

        self.state.begin_request();

        // Spawn background task for the request
        let tx = self.desk_tx.clone();
        tokio::spawn(async move {
            let result = tracker.track(&request).await.map_err(|e| e.to_string());
            let _ = tx.send(DeskMessage::Completed(result));
        });
    }

    fn run_daily_dispatch(&mut self) {
        let Some(tracker) = self.tracker.clone() else {
            self.view = View::Desk;
            self.state.desk.error = Some(NO_API_KEY.to_string());
            return;
        };

        if !self.state.begin_scan() {
            return;
        }

        self.view = View::Desk;
        self.reset_desk_cursor();

        let topics = self.state.watchlist.clone();
        let concurrency = self.scan_concurrency;
        let tx = self.desk_tx.clone();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let scan = tokio::spawn(async move {
                run_watchlist_scan(&tracker, &topics, concurrency, |progress| {
                    let _ = progress_tx.send(DeskMessage::ScanProgress(progress));
                })
                .await
            });

            let message = match scan.await {
                Ok(report) => DeskMessage::ScanFinished(report),
                Err(e) => {
                    tracing::error!("Daily dispatch task died: {}", e);
                    DeskMessage::ScanAborted(SCAN_ABORTED.to_string())
                }
            };
            let _ = tx.send(message);
        });
    }

    /// Apply finished background work to the state (non-blocking)
    pub async fn poll_desk_messages(&mut self) {
        while let Ok(message) = self.desk_rx.try_recv() {
            match message {
                DeskMessage::Completed(Ok(result)) => {
                    tracing::info!("Dispatch received for {}", result.topic);
                    let slot = self.state.record_result(result);
                    self.shift_archive_cursor(1);
                    self.reset_desk_cursor();
                    self.persist(&[slot]).await;
                }
                DeskMessage::Completed(Err(e)) => {
                    tracing::error!("Dispatch failed: {}", e);
                    self.state.record_failure(e);
                }
                DeskMessage::ScanProgress(progress) => self.state.update_scan(progress),
                DeskMessage::ScanFinished(report) => {
                    tracing::info!(
                        "Daily dispatch finished: {} reports, {} failures",
                        report.results.len(),
                        report.failures
                    );
                    let added = report.results.len();
                    let slots = self.state.finish_scan(report);
                    self.shift_archive_cursor(added);
                    self.reset_desk_cursor();
                    self.persist(&slots).await;
                }
                DeskMessage::ScanAborted(message) => self.state.fail_scan(message),
            }
        }
    }

    /// Dispatch one request and wait for it (headless mode)
    pub async fn track_blocking(&mut self, request: TrackRequest) -> Result<NewsResult> {
        let tracker = self
            .tracker
            .clone()
            .ok_or_else(|| AppError::Config(NO_API_KEY.to_string()))?;

        let result = tracker.track(&request).await?;
        let slot = self.state.record_result(result.clone());
        self.shift_archive_cursor(1);
        self.persist(&[slot]).await;
        Ok(result)
    }

    /// Run the daily dispatch and wait for it (headless mode)
    pub async fn dispatch_blocking(&mut self) -> Result<ScanReport> {
        let tracker = self
            .tracker
            .clone()
            .ok_or_else(|| AppError::Config(NO_API_KEY.to_string()))?;

        if !self.state.begin_scan() {
            return Ok(ScanReport::default());
        }

        let topics = self.state.watchlist.clone();
        let report = run_watchlist_scan(&tracker, &topics, self.scan_concurrency, |progress| {
            tracing::info!("Scanning {}/{}", progress.current, progress.total);
        })
        .await;

        let slots = self.state.finish_scan(report.clone());
        self.shift_archive_cursor(report.results.len());
        self.persist(&slots).await;
        Ok(report)
    }

    /// Write changed slots through to storage. Failures are logged only.
    async fn persist(&self, slots: &[Slot]) {
        for slot in slots {
            let saved = match slot {
                Slot::Profile => match &self.state.profile {
                    Some(profile) => self.store.save_profile(profile).await,
                    None => Ok(()),
                },
                Slot::History => self.store.save_history(&self.state.history).await,
                Slot::Watchlist => self.store.save_watchlist(&self.state.watchlist).await,
            };

            if let Err(e) = saved {
                tracing::error!("Failed to save {:?}: {}", slot, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ai::Citation;
    use crate::db::Repository;
    use crate::services::tracker::tests::MockService;

    fn test_config() -> Config {
        Config {
            db_path: ":memory:".to_string(),
            ..Config::default()
        }
    }

    async fn app_with(service: Option<Arc<MockService>>) -> App {
        let store = Store::new(Repository::in_memory().await.unwrap());
        let tracker = service.map(|s| Tracker::new(s));
        App::with_parts(store, tracker, &test_config()).await
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::InputChar(c)).await.unwrap();
        }
    }

    async fn drain_until_idle(app: &mut App) {
        for _ in 0..200 {
            app.poll_desk_messages().await;
            if !app.state.desk.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("background work did not finish");
    }

    #[tokio::test]
    async fn first_run_requires_registration() {
        let mut app = app_with(None).await;
        assert_eq!(app.input_mode, InputMode::Registration);

        app.handle_action(AppAction::InputConfirm).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Registration);

        app.handle_action(AppAction::CycleBureau).await.unwrap();
        type_text(&mut app, "Asha").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        let profile = app.state.profile.clone().unwrap();
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.bureau, Bureau::FinancialOversight);
        assert_eq!(app.store.load().await.profile, Some(profile));
    }

    #[tokio::test]
    async fn blank_topic_changes_nothing() {
        let service = Arc::new(MockService::new());
        let mut app = app_with(Some(service.clone())).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::StartTopicInput).await.unwrap();
        type_text(&mut app, "   ").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();

        assert_eq!(service.call_count(), 0);
        assert!(!app.state.desk.is_loading());
        assert!(app.state.history.is_empty());
        assert_eq!(app.state.desk.error, None);
    }

    #[tokio::test]
    async fn topic_dispatch_lands_on_desk_and_in_history() {
        let service = Arc::new(MockService::new());
        let mut app = app_with(Some(service.clone())).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::StartTopicInput).await.unwrap();
        type_text(&mut app, "Monsoon").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();
        assert_eq!(app.status(), DispatchStatus::Transmitting);

        drain_until_idle(&mut app).await;

        assert_eq!(app.state.desk.results.len(), 1);
        assert_eq!(app.state.history[0].topic, "Monsoon");
        assert_eq!(app.store.load().await.history, app.state.history);
        assert_eq!(app.status(), DispatchStatus::Idle);
    }

    #[tokio::test]
    async fn failed_dispatch_shows_error() {
        let service = Arc::new(MockService::failing_on("Wire Service"));
        let mut app = app_with(Some(service)).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::FetchWire).await.unwrap();
        drain_until_idle(&mut app).await;

        assert!(app.state.desk.error.is_some());
        assert!(app.state.history.is_empty());
        assert_eq!(app.status(), DispatchStatus::Failed);
    }

    #[tokio::test]
    async fn missing_key_reports_instead_of_dispatching() {
        let mut app = app_with(None).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::FetchWire).await.unwrap();
        assert_eq!(app.state.desk.error.as_deref(), Some(NO_API_KEY));
        assert_eq!(app.status(), DispatchStatus::NoApiKey);
    }

    #[tokio::test]
    async fn daily_dispatch_runs_active_topics() {
        let service = Arc::new(MockService::failing_on("Topic-B"));
        let mut app = app_with(Some(service.clone())).await;
        app.input_mode = InputMode::Normal;
        for keyword in ["Topic-C", "Topic-B", "Topic-A", "Topic-Z"] {
            app.state.add_topic(keyword, "", Language::English).unwrap();
        }
        // Topic-Z sits first; halt it
        app.view = View::Watchlist;
        app.handle_action(AppAction::ToggleTopic).await.unwrap();

        app.handle_action(AppAction::RunDailyDispatch).await.unwrap();
        assert_eq!(app.status(), DispatchStatus::Scanning);
        drain_until_idle(&mut app).await;

        assert_eq!(service.call_count(), 3);
        let topics: Vec<&str> = app.state.desk.results.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["Topic-A", "Topic-C"]);
        assert_eq!(app.state.history.len(), 2);
        assert_eq!(app.view, View::Desk);

        let stored = app.store.load().await;
        assert_eq!(stored.watchlist, app.state.watchlist);
        assert!(stored.watchlist.iter().any(|t| t.last_checked.is_some()));
    }

    #[tokio::test]
    async fn watchlist_add_toggle_delete_persist() {
        let mut app = app_with(None).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::AddTopic).await.unwrap();
        type_text(&mut app, "Metro").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();
        assert_eq!(app.input_mode, InputMode::WatchContext);
        type_text(&mut app, "Phase 3").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();

        assert_eq!(app.state.watchlist[0].keyword, "Metro");
        assert_eq!(app.state.watchlist[0].context, "Phase 3");

        app.handle_action(AppAction::ToggleTopic).await.unwrap();
        assert!(!app.store.load().await.watchlist[0].is_active);

        app.handle_action(AppAction::DeleteTopic).await.unwrap();
        assert!(app.store.load().await.watchlist.is_empty());
    }

    #[tokio::test]
    async fn archive_selection_replays_result() {
        let service = Arc::new(MockService::new());
        let mut app = app_with(Some(service)).await;
        app.input_mode = InputMode::Normal;

        for topic in ["first", "second"] {
            app.track_blocking(TrackRequest::topic(topic, Language::English))
                .await
                .unwrap();
        }
        app.state.desk.error = Some("old".to_string());

        app.view = View::Archives;
        app.handle_action(AppAction::MoveDown).await.unwrap();
        app.handle_action(AppAction::Select).await.unwrap();

        assert_eq!(app.view, View::Desk);
        assert_eq!(app.state.desk.results.len(), 1);
        assert_eq!(app.state.desk.results[0].topic, "first");
        assert_eq!(app.state.desk.error, None);
    }

    #[tokio::test]
    async fn source_picker_toggles_sources_and_epapers() {
        let mut app = app_with(None).await;
        app.input_mode = InputMode::Normal;

        app.handle_action(AppAction::OpenSourcePicker).await.unwrap();
        app.handle_action(AppAction::PickerDown).await.unwrap();
        app.handle_action(AppAction::PickerToggle).await.unwrap();
        assert_eq!(app.selected_sources, vec![PREDEFINED_SOURCES[1].to_string()]);
        app.handle_action(AppAction::PickerToggle).await.unwrap();
        assert!(app.selected_sources.is_empty());

        for _ in 0..20 {
            app.handle_action(AppAction::PickerDown).await.unwrap();
        }
        assert_eq!(app.picker_index, PREDEFINED_SOURCES.len());
        app.handle_action(AppAction::PickerToggle).await.unwrap();
        assert!(app.include_epapers);

        app.handle_action(AppAction::PickerClose).await.unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn source_cursor_picks_any_citation() {
        let mut service = MockService::new();
        service.citations = ["https://a.com/1", "https://b.com/2", "https://c.com/3"]
            .iter()
            .map(|uri| Citation {
                uri: Some(uri.to_string()),
                title: None,
            })
            .collect();
        let mut app = app_with(Some(Arc::new(service))).await;
        app.input_mode = InputMode::Normal;

        app.track_blocking(TrackRequest::topic("Rail", Language::English))
            .await
            .unwrap();
        assert_eq!(app.selected_source().unwrap().uri, "https://a.com/1");

        app.handle_action(AppAction::NextSource).await.unwrap();
        app.handle_action(AppAction::NextSource).await.unwrap();
        assert_eq!(app.selected_source().unwrap().uri, "https://c.com/3");

        app.handle_action(AppAction::NextSource).await.unwrap();
        assert_eq!(app.source_index, 2);

        app.handle_action(AppAction::PrevSource).await.unwrap();
        assert_eq!(app.selected_source().unwrap().uri, "https://b.com/2");
    }

    #[tokio::test]
    async fn archive_cursor_follows_report_when_history_grows() {
        let service = Arc::new(MockService::new());
        let mut app = app_with(Some(service.clone())).await;
        app.input_mode = InputMode::Normal;

        for topic in ["first", "second"] {
            app.track_blocking(TrackRequest::topic(topic, Language::English))
                .await
                .unwrap();
        }
        app.view = View::Archives;
        app.archive_index = 1;
        assert_eq!(app.state.history[app.archive_index].topic, "first");

        // A dispatch lands while the archive is open
        let late = Tracker::new(service)
            .track(&TrackRequest::topic("third", Language::English))
            .await
            .unwrap();
        app.desk_tx.send(DeskMessage::Completed(Ok(late))).unwrap();
        app.poll_desk_messages().await;

        assert_eq!(app.archive_index, 2);
        app.handle_action(AppAction::Select).await.unwrap();
        assert_eq!(app.state.desk.results[0].topic, "first");
    }
}
