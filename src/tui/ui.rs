use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, View};
use crate::models::{DispatchStatus, NewsResult, PREDEFINED_SOURCES};

use super::markup::render_summary;

const INK: Color = Color::White;
const MUTED: Color = Color::DarkGray;
const PRESS_RED: Color = Color::Red;

pub fn draw(frame: &mut Frame, app: &App) {
    // Sidebar on the left, the paper on the right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(frame.area());

    render_sidebar(frame, app, main_chunks[0]);

    let progress_height = if app.state.desk.scan_progress.is_some() { 3 } else { 0 };
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(progress_height), // Scan progress
            Constraint::Min(0),                  // Active view
            Constraint::Length(1),               // Status line
        ])
        .split(main_chunks[1]);

    render_scan_progress(frame, app, right_chunks[0]);
    match app.view {
        View::Desk => render_desk(frame, app, right_chunks[1]),
        View::Watchlist => render_watchlist(frame, app, right_chunks[1]),
        View::Archives => render_archives(frame, app, right_chunks[1]),
    }
    render_status(frame, app, right_chunks[2]);

    match app.input_mode {
        InputMode::Registration => render_registration(frame, app),
        InputMode::Topic => render_input(frame, " Ad-Hoc Search: enter subject ", &app.input),
        InputMode::WatchKeyword => render_input(frame, " Primary Keyword ", &app.input),
        InputMode::WatchContext => {
            let title = format!(" Context / Instructions for {} ", app.pending_keyword);
            render_input(frame, &title, &app.input);
        }
        InputMode::SourcePicker => render_source_picker(frame, app),
        InputMode::Normal => {}
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Masthead
            Constraint::Length(5), // Navigation
            Constraint::Min(0),    // Desk settings
        ])
        .split(area);

    let agent = app
        .state
        .profile
        .as_ref()
        .map(|p| p.name.to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let masthead = Paragraph::new(vec![
        Line::from(Span::styled(
            "PRESS RADAR",
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("AGENT: {agent}"), Style::default().fg(MUTED))),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double),
    );
    frame.render_widget(masthead, chunks[0]);

    let nav: Vec<Line> = [View::Desk, View::Watchlist, View::Archives]
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let label = match view {
                View::Watchlist if !app.state.watchlist.is_empty() => {
                    format!("{} {} ({})", i + 1, view.label(), app.state.watchlist.len())
                }
                _ => format!("{} {}", i + 1, view.label()),
            };
            let style = if *view == app.view {
                Style::default().fg(PRESS_RED).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(INK)
            };
            Line::from(Span::styled(label, style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(nav).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let sources = if app.selected_sources.is_empty() {
        "All outlets".to_string()
    } else {
        format!("{} selected", app.selected_sources.len())
    };
    let settings = vec![
        Line::from(format!("Language : {}", app.language)),
        Line::from(format!("Sources  : {sources}")),
        Line::from(format!(
            "E-papers : {}",
            if app.include_epapers { "yes" } else { "no" }
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("Active topics: {}", app.state.active_topics()),
            Style::default().fg(MUTED),
        )),
    ];
    frame.render_widget(
        Paragraph::new(settings).block(Block::default().title(" Newsstand ").borders(Borders::ALL)),
        chunks[2],
    );
}

fn render_scan_progress(frame: &mut Frame, app: &App, area: Rect) {
    let Some(progress) = app.state.desk.scan_progress else {
        return;
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Scanning News Grids... ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double),
        )
        .gauge_style(Style::default().fg(PRESS_RED))
        .ratio(progress.ratio().clamp(0.0, 1.0))
        .label(format!("{} / {}", progress.current, progress.total));
    frame.render_widget(gauge, area);
}

fn render_desk(frame: &mut Frame, app: &App, area: Rect) {
    let desk = &app.state.desk;

    let error_height = if desk.error.is_some() { 3 } else { 0 };
    let list_height = if desk.results.len() > 1 {
        (desk.results.len() as u16 + 2).min(7)
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(error_height),
            Constraint::Length(list_height),
            Constraint::Min(0),
        ])
        .split(area);

    if let Some(error) = &desk.error {
        let paragraph = Paragraph::new(error.as_str())
            .style(Style::default().fg(PRESS_RED))
            .block(Block::default().title(" Wire Error ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, chunks[0]);
    }

    if list_height > 0 {
        let items: Vec<ListItem> = desk
            .results
            .iter()
            .map(|r| ListItem::new(result_label(r)))
            .collect();
        let list = List::new(items)
            .block(Block::default().title(" Dispatches ").borders(Borders::ALL))
            .highlight_style(Style::default().bg(MUTED).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(app.desk_index));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    match app.selected_result() {
        Some(result) => render_news_card(frame, app, result, chunks[2]),
        None => {
            let message = if desk.is_loading() {
                vec![Line::from(format!("TRANSMITTING... {}", app.spinner()))]
            } else {
                vec![
                    Line::from(Span::styled(
                        "BUREAU IS SILENT",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from("Waiting for orders. Press / to dispatch, w for the wire."),
                ]
            };
            let paragraph = Paragraph::new(message)
                .centered()
                .style(Style::default().fg(MUTED))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, chunks[2]);
        }
    }
}

fn result_label(result: &NewsResult) -> Line<'static> {
    let kind = if result.is_wire {
        Span::styled("[WIRE] ", Style::default().fg(Color::Yellow))
    } else if result.is_watchlist_report {
        Span::styled("[WATCH] ", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("[DESK] ", Style::default().fg(Color::Blue))
    };
    let time = result.timestamp.with_timezone(&Local).format("%d %b %H:%M");
    Line::from(vec![
        kind,
        Span::styled(result.topic.clone(), Style::default().fg(INK)),
        Span::styled(format!("  {time}"), Style::default().fg(MUTED)),
    ])
}

fn render_news_card(frame: &mut Frame, app: &App, result: &NewsResult, area: Rect) {
    let captured = result.timestamp.with_timezone(&Local).format("%A, %d %B %Y %H:%M");

    let (title, border) = if result.is_wire {
        (
            format!(" PRIORITY TELEGRAM // SEC: {} ", result.short_id()),
            Color::Yellow,
        )
    } else {
        (format!(" {} ", result.topic.to_uppercase()), Color::Green)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} | {} | {}", result.language, captured, model_label(result)),
            Style::default().fg(MUTED),
        )),
        Line::default(),
    ];
    lines.extend(render_summary(&result.summary));

    if !result.sources.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "SOURCES",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for (i, source) in result.sources.iter().enumerate() {
            let (marker, title_style) = if i == app.source_index {
                ("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(INK))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{:>2}. ", i + 1), Style::default().fg(MUTED)),
                Span::styled(source.title.clone(), title_style),
                Span::styled(format!("  {}", source.uri), Style::default().fg(MUTED)),
            ]));
        }
    }

    if result.is_wire {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "END OF TRANSMISSION",
            Style::default().fg(MUTED),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn model_label(result: &NewsResult) -> &'static str {
    if result.is_wire {
        "WIRE OPS"
    } else if result.is_watchlist_report {
        "DAILY DISPATCH"
    } else {
        "SPECIAL CORRESPONDENT"
    }
}

fn render_watchlist(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Intelligence Ledger ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.state.watchlist.is_empty() {
        let paragraph = Paragraph::new(
            "Ledger is empty. No subjects currently under surveillance.\n\nPress a to add a subject.",
        )
        .centered()
        .style(Style::default().fg(MUTED))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .watchlist
        .iter()
        .map(|topic| {
            let (badge, style) = if topic.is_active {
                ("[ACTIVE] ", Style::default().fg(INK))
            } else {
                ("[HALTED] ", Style::default().fg(MUTED))
            };
            let context = topic.context_hint().unwrap_or("General Surveillance");
            let checked = topic
                .last_checked
                .map(|t| t.with_timezone(&Local).format("%d %b %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            let id: String = topic.id.chars().take(8).collect();

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(badge, style.add_modifier(Modifier::BOLD)),
                    Span::styled(topic.keyword.to_uppercase(), style.add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", topic.language), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(Span::styled(
                    format!("    \"{context}\""),
                    style.add_modifier(Modifier::ITALIC),
                )),
                Line::from(Span::styled(
                    format!(
                        "    ID: {} | CREATED: {} | CHECKED: {}",
                        id,
                        topic.created_at.with_timezone(&Local).format("%d %b %Y"),
                        checked
                    ),
                    Style::default().fg(MUTED),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.watch_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_archives(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Historical Files ({}) ", app.state.history.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let items: Vec<ListItem> = app
        .state
        .history
        .iter()
        .map(|r| ListItem::new(result_label(r)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(MUTED).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.archive_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.status() {
        DispatchStatus::Idle => String::new(),
        DispatchStatus::Transmitting => format!("{} Transmitting... ", app.spinner()),
        DispatchStatus::Scanning => format!("{} Daily dispatch running... ", app.spinner()),
        DispatchStatus::Failed => "Dispatch failed ".to_string(),
        DispatchStatus::NoApiKey => "No API key ".to_string(),
    };

    let hints = match app.view {
        View::Desk => "/:dispatch  w:wire  l:lang  s:sources  [/]:pick source  o:open  D:daily  ?:help",
        View::Watchlist => "a:add  space:toggle  d:delete  D:daily  ?:help",
        View::Archives => "j/k:nav  enter:replay  ?:help",
    };

    let line = Line::from(vec![
        Span::styled(status, Style::default().fg(Color::Yellow)),
        Span::styled(hints, Style::default().fg(MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(frame: &mut Frame, title: &str, input: &str) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {input}_");
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(INK));
    frame.render_widget(paragraph, inner);
}

fn render_registration(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 40, frame.area());

    let lines = vec![
        Line::from(Span::styled(
            "PRESS REGISTRATION",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(Span::styled(
            "BUREAU OF NEWS INTELLIGENCE",
            Style::default().fg(MUTED),
        ))
        .centered(),
        Line::default(),
        Line::from(format!("Officer Name    : {}_", app.input)),
        Line::from(format!("Assigned Bureau : {}", app.bureau.label())),
        Line::default(),
        Line::from(Span::styled(
            "Tab: change bureau   Enter: issue credentials",
            Style::default().fg(MUTED),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(PRESS_RED)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_source_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 60, frame.area());

    let mut items: Vec<ListItem> = PREDEFINED_SOURCES
        .iter()
        .map(|source| {
            let mark = if app.selected_sources.iter().any(|s| s == source) {
                "[x] "
            } else {
                "[ ] "
            };
            ListItem::new(format!("{mark}{source}"))
        })
        .collect();
    let epapers = if app.include_epapers { "[x] " } else { "[ ] " };
    items.push(ListItem::new(format!("{epapers}Include e-papers")));

    let list = List::new(items)
        .block(
            Block::default()
                .title(" The Newsstand (space: toggle, esc: close) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().bg(MUTED).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.picker_index));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / 1-3    Switch view",
        "   j / ↓        Move down",
        "   k / ↑        Move up",
        "   PgUp/PgDn    Scroll dispatch",
        "",
        " The Desk:",
        "   / or t       Dispatch a topic",
        "   w            Fetch the wire",
        "   l            Cycle language",
        "   s            Choose sources",
        "   [ / ]        Previous / next source",
        "   o            Open selected source",
        "",
        " Watchlist:",
        "   a            Add subject",
        "   space        Toggle active",
        "   d            Delete subject",
        "   D            Run daily dispatch",
        "",
        " Archives:",
        "   Enter        Replay onto the desk",
        "",
        " General:",
        "   ?            Toggle this help",
        "   q            Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(INK));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
