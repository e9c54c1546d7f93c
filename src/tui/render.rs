//! TUI rendering logic

use genie_matrix::{DrawStatus, NoticeLevel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::{App, InputMode};
use crate::tui::matrix_view::render_matrix;

/// Render the entire application UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Matrix
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    let title = format!(
        " {} - {} ({}) ",
        app.editor.device_name(),
        app.editor.dimensions(),
        app.editor.origin()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);
    if app.editor.buttons().is_empty() {
        frame.render_widget(Paragraph::new("This device has no addressable keys"), inner);
    } else {
        render_matrix(frame, app, inner);
    }

    render_status_bar(frame, app, chunks[1]);

    if app.show_help {
        render_help_overlay(frame, app);
    }
    if let InputMode::Picker { input, error } = &app.input {
        render_picker(frame, input, error.as_deref());
    }
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.editor.draw_status() {
        DrawStatus::Set => Span::styled("SET", Style::default().fg(Color::Green)),
        DrawStatus::Clear => Span::styled("CLEAR", Style::default().fg(Color::Red)),
    };
    let color = app.editor.selected_color();

    let mut spans = vec![
        Span::raw("["),
        mode,
        Span::raw("] "),
        Span::styled("  ", Style::default().bg(Color::Rgb(color.r, color.g, color.b))),
        Span::raw(format!(" {color}")),
    ];
    if let Some(cursor) = app.cursor.and_then(|id| app.editor.button(id)) {
        spans.push(Span::raw(format!(" | {} @ {}", cursor.label, cursor.pos)));
    }
    spans.push(Span::raw(" | "));
    match &app.status {
        Some(status) => {
            let style = match status.notice.level {
                NoticeLevel::Info => Style::default().fg(Color::Cyan),
                NoticeLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            };
            spans.push(Span::styled(status.notice.to_string(), style));
        }
        None => spans.push(Span::styled(
            "? help | q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, frame.area());

    let mut help_text = vec![
        Line::from("Keyboard Shortcuts"),
        Line::from(""),
        Line::from("Arrows / hjkl  Move between keys"),
        Line::from("Enter / Space  Paint or erase the key"),
        Line::from("s              Paint mode"),
        Line::from("c              Erase mode"),
        Line::from("x              Turn every key off"),
        Line::from("p              Pick a color"),
        Line::from("Escape         Dismiss message"),
        Line::from("q              Quit"),
        Line::from("?              Toggle help"),
    ];
    if !app.history.is_empty() {
        help_text.push(Line::from(""));
        help_text.push(Line::from("Recent messages"));
        for notice in app.history.iter().rev() {
            let style = match notice.level {
                NoticeLevel::Info => Style::default(),
                NoticeLevel::Error => Style::default().fg(Color::Red),
            };
            help_text.push(Line::from(Span::styled(notice.to_string(), style)));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, area);
    let widget = Paragraph::new(help_text).block(block);
    frame.render_widget(widget, area);
}

/// Render the color picker popup
fn render_picker(frame: &mut Frame, input: &str, error: Option<&str>) {
    let area = centered_rect(40, 30, frame.area());

    let preview = match input.parse::<genie_transport::RgbColor>() {
        Ok(c) => Span::styled("      ", Style::default().bg(Color::Rgb(c.r, c.g, c.b))),
        Err(_) => Span::styled(" ???? ", Style::default().fg(Color::DarkGray)),
    };
    let mut lines = vec![
        Line::from("#rrggbb, r,g,b or a color name"),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("> {input}_"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            preview,
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter apply | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Color ")
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Helper to create a centered rectangle
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
