use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use gita_core::{ExplainState, Verse};
use unicode_width::UnicodeWidthStr;
use crate::app::{char_to_byte_index, App, InputMode, StatusKind};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, verse, report box, status, footer
    let [header_area, verse_area, report_area, status_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_verse(app, frame, verse_area);
    render_report_input(app, frame, report_area);
    render_status(app, frame, status_area);
    render_footer(app, frame, footer_area);
}

fn ellipsis(frame: u8) -> &'static str {
    match frame {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let activity = if app.session.is_loading() {
        format!(" loading{}", ellipsis(app.animation_frame))
    } else if app.explain.is_resolving() {
        format!(" checking links{}", ellipsis(app.animation_frame))
    } else if app.report_sending {
        format!(" sending{}", ellipsis(app.animation_frame))
    } else {
        String::new()
    };

    let title = Line::from(vec![
        Span::styled(" Bhagavad Gita ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(activity, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn verse_lines(verse: &Verse) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in verse.text.lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    if !verse.transliteration.is_empty() {
        lines.push(Line::default());
        for line in verse.transliteration.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines.push(Line::default());
    if verse.meaning.is_empty() {
        lines.push(Line::from(Span::styled(
            "No translation available",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for line in verse.meaning.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    lines
}

fn render_verse(app: &App, frame: &mut Frame, area: Rect) {
    let (title, text) = match app.current_verse() {
        Some(verse) => (
            format!(" Chapter {}, Verse {} ", verse.chapter, verse.verse_number),
            Text::from(verse_lines(verse)),
        ),
        None => {
            let hint = if app.session.is_loading() {
                format!("Loading verse{}", ellipsis(app.animation_frame))
            } else {
                "No verse loaded. Press n to load one.".to_string()
            };
            (
                " Verse ".to_string(),
                Text::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            )
        }
    };

    let border_style = match app.explain {
        ExplainState::Resolving(_) => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::Cyan),
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_report_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if app.report_input.is_empty() && !editing {
        Span::styled("Press r to report a problem with this verse", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.report_input.as_str())
    };

    // Keep the cursor visible by scrolling long input horizontally
    let inner_width = area.width.saturating_sub(2);
    let cursor = cursor_column(&app.report_input, app.report_cursor);
    let scroll = cursor.saturating_sub(inner_width.saturating_sub(1));

    let title = format!(
        " Report ({}/{}) ",
        app.report_input.chars().count(),
        gita_core::report::MAX_REPORT_CHARS
    );
    let input = Paragraph::new(Line::from(content))
        .scroll((0, scroll))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((area.x + 1 + cursor - scroll, area.y + 1));
    }
}

/// Terminal columns taken by the first `cursor` chars of `input`
fn cursor_column(input: &str, cursor: usize) -> u16 {
    let width = input[..char_to_byte_index(input, cursor)].width();
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let Some(status) = &app.status else {
        return;
    };

    let style = match status.kind {
        StatusKind::Info => Style::default().fg(Color::White),
        StatusKind::Success => Style::default().fg(Color::Green),
        StatusKind::Warning => Style::default().fg(Color::Yellow),
        StatusKind::Error => Style::default().fg(Color::Red),
    };

    frame.render_widget(Paragraph::new(format!(" {}", status.text)).style(style), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" VERSE ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" REPORT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Normal => &[
            ("n", "new verse"),
            ("e", "explain"),
            ("g", "google"),
            ("y", "youtube"),
            ("r", "report"),
            ("q", "quit"),
        ],
        InputMode::Editing => &[("Enter", "send"), ("Esc", "back")],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
