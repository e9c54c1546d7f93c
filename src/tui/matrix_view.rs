//! Key cap rendering for the custom matrix
//!
//! Layout rows are drawn left-aligned with key widths scaled from the
//! descriptor units, so wide keys (Space, Enter, ...) keep their proportions.

use genie_matrix::{LayoutCell, DEFAULT_KEY_WIDTH};
use genie_transport::RgbColor;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::App;

/// Terminal columns for a default-width key
const MAX_KEY_COLS: f64 = 7.0;

/// Start offset and width of every cell of a row, in layout units
pub fn cell_spans(row: &[LayoutCell]) -> Vec<(u32, u32)> {
    let mut x = 0;
    row.iter()
        .map(|cell| {
            let span = (x, cell.width());
            x += cell.width();
            span
        })
        .collect()
}

/// Screen rectangles for every cell, parallel to the layout rows
///
/// Cells that do not fit get a zero-sized rectangle.
pub fn key_rects(rows: &[Vec<LayoutCell>], area: Rect) -> Vec<Vec<Rect>> {
    let units = rows
        .iter()
        .map(|row| row.iter().map(LayoutCell::width).sum::<u32>())
        .max()
        .unwrap_or(0);
    if units == 0 || rows.is_empty() {
        return rows.iter().map(|row| vec![Rect::default(); row.len()]).collect();
    }

    let scale = (area.width as f64 / units as f64).min(MAX_KEY_COLS / DEFAULT_KEY_WIDTH as f64);
    let key_height: u16 = if area.height as usize >= rows.len() * 3 {
        3
    } else {
        1
    };

    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let y = area.y + r as u16 * key_height;
            cell_spans(row)
                .into_iter()
                .map(|(start, width)| {
                    let x0 = (start as f64 * scale).round() as u16;
                    let x1 = ((start + width) as f64 * scale).round() as u16;
                    let fits = y + key_height <= area.y + area.height && x1 <= area.width;
                    if fits && x1 > x0 {
                        Rect::new(area.x + x0, y, x1 - x0, key_height)
                    } else {
                        Rect::default()
                    }
                })
                .collect()
        })
        .collect()
}

/// Readable text color on top of a lit key
fn text_on(color: RgbColor) -> Color {
    let luma = 299 * color.r as u32 + 587 * color.g as u32 + 114 * color.b as u32;
    if luma > 128_000 {
        Color::Black
    } else {
        Color::White
    }
}

/// Render the layout of the editor's device
pub fn render_matrix(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.editor.layout().rows();
    let rects = key_rects(rows, area);

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let rect = rects[r][c];
            if rect.width == 0 {
                continue;
            }
            let LayoutCell::Key(key) = cell else {
                continue;
            };

            let button = app.editor.button_in_slot((r, c));
            let selected = button.is_some() && button == app.cursor;
            let lit = button.and_then(|id| app.editor.button_color(id));

            let mut style = match (button, lit) {
                (Some(_), Some(color)) => Style::default()
                    .fg(text_on(color))
                    .bg(Color::Rgb(color.r, color.g, color.b)),
                (Some(_), None) => Style::default().fg(Color::White),
                (None, _) => Style::default().fg(Color::DarkGray),
            };
            let border = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let text_width = if rect.height >= 3 {
                rect.width.saturating_sub(2)
            } else {
                rect.width
            };
            let label: String = key.label.chars().take(text_width as usize).collect();

            let widget = if rect.height >= 3 {
                Paragraph::new(label)
                    .style(style)
                    .block(Block::default().borders(Borders::ALL).border_style(border))
            } else {
                if selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Paragraph::new(label).style(style)
            };
            frame.render_widget(widget, rect);
        }
    }
}
