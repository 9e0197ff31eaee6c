use std::sync::OnceLock;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

static BOLD_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();

fn bold_re() -> &'static Regex {
    BOLD_RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"))
}

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| Regex::new(r"^\s*[*-]\s+").expect("valid bullet pattern"))
}

/// Turn briefing markup (`###` headers, `-`/`*` bullets, `**bold**`) into lines.
pub fn render_summary(text: &str) -> Vec<Line<'static>> {
    text.lines().map(render_line).collect()
}

fn render_line(raw: &str) -> Line<'static> {
    if raw.trim().is_empty() {
        return Line::default();
    }

    if let Some(header) = raw.trim_start().strip_prefix("###") {
        let style = Style::default()
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let spans = inline_spans(&header.trim().to_uppercase(), style);
        return Line::from(spans);
    }

    if let Some(bullet) = bullet_re().find(raw) {
        let mut spans = vec![Span::styled("  ■ ", Style::default().fg(Color::Red))];
        spans.extend(inline_spans(&raw[bullet.end()..], Style::default()));
        return Line::from(spans);
    }

    Line::from(inline_spans(raw, Style::default()))
}

fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in bold_re().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::styled(text[last..whole.start()].to_string(), base));
        }
        spans.push(Span::styled(
            inner.as_str().to_string(),
            base.add_modifier(Modifier::BOLD),
        ));
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }

    spans
}
