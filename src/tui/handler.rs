use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{InputMode, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextView,
    ShowView(View),
    MoveUp,
    MoveDown,
    ScrollUp,
    ScrollDown,
    Select,
    StartTopicInput,
    FetchWire,
    CycleLanguage,
    OpenSourcePicker,
    RunDailyDispatch,
    AddTopic,
    ToggleTopic,
    DeleteTopic,
    PrevSource,
    NextSource,
    OpenInBrowser,
    ShowHelp,
    HideHelp,
    // Text input actions
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
    CycleBureau,
    // Source picker actions
    PickerUp,
    PickerDown,
    PickerToggle,
    PickerClose,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode, show_help: bool) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match mode {
        InputMode::Normal => normal_mode(key),
        InputMode::Registration => match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Tab => Some(AppAction::CycleBureau),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        },
        InputMode::Topic | InputMode::WatchKeyword | InputMode::WatchContext => match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        },
        InputMode::SourcePicker => match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::PickerDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::PickerUp),
            KeyCode::Char(' ') | KeyCode::Char('x') => Some(AppAction::PickerToggle),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('s') => Some(AppAction::PickerClose),
            _ => None,
        },
    }
}

fn normal_mode(key: KeyEvent) -> Option<AppAction> {
    match key.code {
        KeyCode::Char('q') => Some(AppAction::Quit),

        KeyCode::Tab => Some(AppAction::NextView),
        KeyCode::Char('1') => Some(AppAction::ShowView(View::Desk)),
        KeyCode::Char('2') => Some(AppAction::ShowView(View::Watchlist)),
        KeyCode::Char('3') => Some(AppAction::ShowView(View::Archives)),

        KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
        KeyCode::PageDown => Some(AppAction::ScrollDown),
        KeyCode::PageUp => Some(AppAction::ScrollUp),
        KeyCode::Enter => Some(AppAction::Select),

        KeyCode::Char('/') | KeyCode::Char('t') => Some(AppAction::StartTopicInput),
        KeyCode::Char('w') => Some(AppAction::FetchWire),
        KeyCode::Char('l') => Some(AppAction::CycleLanguage),
        KeyCode::Char('s') => Some(AppAction::OpenSourcePicker),
        KeyCode::Char('D') => Some(AppAction::RunDailyDispatch),

        KeyCode::Char('a') => Some(AppAction::AddTopic),
        KeyCode::Char(' ') | KeyCode::Char('x') => Some(AppAction::ToggleTopic),
        KeyCode::Char('d') => Some(AppAction::DeleteTopic),

        KeyCode::Char('[') => Some(AppAction::PrevSource),
        KeyCode::Char(']') => Some(AppAction::NextSource),
        KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
        KeyCode::Char('?') => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_in_topic_input_does_not_trigger_shortcuts() {
        let action = handle_key_event(key(KeyCode::Char('q')), InputMode::Topic, false);
        assert_eq!(action, Some(AppAction::InputChar('q')));
    }

    #[test]
    fn registration_cannot_be_cancelled() {
        assert_eq!(handle_key_event(key(KeyCode::Esc), InputMode::Registration, false), None);
        assert_eq!(
            handle_key_event(key(KeyCode::Tab), InputMode::Registration, false),
            Some(AppAction::CycleBureau)
        );
    }

    #[test]
    fn help_swallows_next_key() {
        let action = handle_key_event(key(KeyCode::Char('w')), InputMode::Normal, true);
        assert_eq!(action, Some(AppAction::HideHelp));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(event, InputMode::WatchContext, false), Some(AppAction::Quit));
    }

    #[test]
    fn shift_d_runs_daily_dispatch() {
        let event = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(event, InputMode::Normal, false), Some(AppAction::RunDailyDispatch));
    }

    #[test]
    fn brackets_move_source_cursor() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char(']')), InputMode::Normal, false),
            Some(AppAction::NextSource)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('[')), InputMode::Normal, false),
            Some(AppAction::PrevSource)
        );
    }
}
