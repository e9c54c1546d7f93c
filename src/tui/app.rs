//! TUI application state

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use genie_matrix::{ButtonId, CustomEditor, DrawStatus, Notice, NoticeLevel};
use genie_transport::RgbColor;
use tracing::debug;

use crate::tui::matrix_view::cell_spans;

/// How long an info notice stays in the status bar
pub const INFO_TIMEOUT: Duration = Duration::from_secs(8);

/// Notices kept for the help screen
const HISTORY_LEN: usize = 20;

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// What keyboard input currently goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating the matrix
    Normal,
    /// Typing a color into the picker
    Picker { input: String, error: Option<String> },
}

/// Notice shown in the status bar
#[derive(Debug, Clone)]
pub struct StatusNotice {
    pub notice: Notice,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub editor: CustomEditor,
    /// Button under the cursor, `None` when the layout has no buttons
    pub cursor: Option<ButtonId>,
    pub input: InputMode,
    pub status: Option<StatusNotice>,
    pub history: VecDeque<Notice>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(editor: CustomEditor) -> Self {
        let cursor = editor.buttons().first().map(|b| b.id);
        let mut app = Self {
            editor,
            cursor,
            input: InputMode::Normal,
            status: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
            show_help: false,
            should_quit: false,
        };
        app.pull_notices();
        app
    }

    /// Move editor notices into the status bar and history
    pub fn pull_notices(&mut self) {
        for notice in self.editor.drain_notices() {
            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(notice.clone());
            self.status = Some(StatusNotice {
                notice,
                shown_at: Instant::now(),
            });
        }
    }

    /// Drop an info notice once it has been visible long enough
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if status.notice.level == NoticeLevel::Info
                && now.duration_since(status.shown_at) >= INFO_TIMEOUT
            {
                self.status = None;
            }
        }
    }

    fn say(&mut self, message: impl Into<String>) {
        self.status = Some(StatusNotice {
            notice: Notice {
                level: NoticeLevel::Info,
                message: message.into(),
            },
            shown_at: Instant::now(),
        });
    }

    /// Horizontal center of a button in layout units
    fn button_center(&self, id: ButtonId) -> Option<(usize, u32)> {
        let button = self.editor.button(id)?;
        let (row, col) = button.slot;
        let spans = cell_spans(&self.editor.layout().rows()[row]);
        let (start, width) = spans[col];
        Some((row, start + width / 2))
    }

    /// Move the cursor to the neighbouring button
    pub fn move_cursor(&mut self, dir: Move) {
        let Some(current) = self.cursor else {
            return;
        };
        let Some((row, center)) = self.button_center(current) else {
            return;
        };
        let buttons = self.editor.buttons();

        let next = match dir {
            Move::Left | Move::Right => {
                let col = buttons[current.index()].slot.1;
                let same_row = buttons.iter().filter(|b| b.slot.0 == row);
                if dir == Move::Left {
                    same_row
                        .filter(|b| b.slot.1 < col)
                        .max_by_key(|b| b.slot.1)
                        .map(|b| b.id)
                } else {
                    same_row
                        .filter(|b| b.slot.1 > col)
                        .min_by_key(|b| b.slot.1)
                        .map(|b| b.id)
                }
            }
            Move::Up | Move::Down => {
                let target_row = if dir == Move::Up {
                    buttons
                        .iter()
                        .map(|b| b.slot.0)
                        .filter(|&r| r < row)
                        .max()
                } else {
                    buttons
                        .iter()
                        .map(|b| b.slot.0)
                        .filter(|&r| r > row)
                        .min()
                };
                target_row.and_then(|target| {
                    buttons
                        .iter()
                        .filter(|b| b.slot.0 == target)
                        .filter_map(|b| self.button_center(b.id).map(|(_, c)| (b.id, c)))
                        .min_by_key(|&(_, c)| c.abs_diff(center))
                        .map(|(id, _)| id)
                })
            }
        };

        if let Some(id) = next {
            self.cursor = Some(id);
        }
    }

    /// Paint or erase the button under the cursor
    pub async fn activate(&mut self) {
        let Some(id) = self.cursor else {
            return;
        };
        if let Err(e) = self.editor.on_cell_activated(id).await {
            debug!("activation failed: {}", e);
        }
        self.pull_notices();
    }

    pub async fn clear_all(&mut self) {
        if self.editor.clear_all().await.is_ok() {
            self.say("All cells cleared");
        }
        self.pull_notices();
    }

    pub fn set_draw_status(&mut self, status: DrawStatus) {
        self.editor.set_draw_status(status);
    }

    pub fn open_picker(&mut self) {
        self.input = InputMode::Picker {
            input: self.editor.selected_color().to_hex(),
            error: None,
        };
    }

    /// Close the picker, applying the typed color unless cancelled
    pub fn close_picker(&mut self, apply: bool) {
        let InputMode::Picker { input, .. } = &self.input else {
            return;
        };
        if !apply {
            self.editor.choose_color(None);
            self.input = InputMode::Normal;
            return;
        }

        match input.parse::<RgbColor>() {
            Ok(color) => {
                self.editor.choose_color(Some(color));
                self.input = InputMode::Normal;
                self.say(format!("Color set to {color}"));
            }
            Err(e) => {
                self.input = InputMode::Picker {
                    input: input.clone(),
                    error: Some(e),
                };
            }
        }
    }

    /// Handle one key press
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let InputMode::Picker { input, error } = &mut self.input {
            match key.code {
                KeyCode::Esc => self.close_picker(false),
                KeyCode::Enter => self.close_picker(true),
                KeyCode::Backspace => {
                    input.pop();
                    *error = None;
                }
                KeyCode::Char(c) if input.len() < 16 => {
                    input.push(c);
                    *error = None;
                }
                _ => {}
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(Move::Left),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(Move::Right),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(Move::Up),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(Move::Down),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate().await,
            KeyCode::Char('s') => self.set_draw_status(DrawStatus::Set),
            KeyCode::Char('c') => self.set_draw_status(DrawStatus::Clear),
            KeyCode::Char('x') => self.clear_all().await,
            KeyCode::Char('p') => self.open_picker(),
            KeyCode::Esc => self.status = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genie_matrix::{BundledSource, EditorOptions, LayoutLoader, MatrixPos};
    use genie_transport::{DeviceType, MatrixDimensions, SimulatedDevice};
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn app(device: Arc<SimulatedDevice>) -> App {
        let loader = LayoutLoader::empty().with_source(BundledSource);
        let editor = CustomEditor::open(device, &loader, EditorOptions::default())
            .await
            .unwrap();
        App::new(editor)
    }

    fn grid_device(rows: usize, cols: usize) -> Arc<SimulatedDevice> {
        Arc::new(SimulatedDevice::new(
            DeviceType::Mouse,
            MatrixDimensions::new(rows, cols),
        ))
    }

    fn cursor_pos(app: &App) -> MatrixPos {
        app.editor.button(app.cursor.unwrap()).unwrap().pos
    }

    #[tokio::test]
    async fn test_cursor_moves_on_grid() {
        let mut app = app(grid_device(3, 4)).await;
        assert_eq!(cursor_pos(&app), MatrixPos::new(0, 0));

        app.handle_key(press(KeyCode::Right)).await;
        app.handle_key(press(KeyCode::Down)).await;
        assert_eq!(cursor_pos(&app), MatrixPos::new(1, 1));

        // edges stay put
        app.handle_key(press(KeyCode::Left)).await;
        app.handle_key(press(KeyCode::Left)).await;
        assert_eq!(cursor_pos(&app), MatrixPos::new(1, 0));
        app.handle_key(press(KeyCode::Down)).await;
        app.handle_key(press(KeyCode::Down)).await;
        assert_eq!(cursor_pos(&app), MatrixPos::new(2, 0));
    }

    #[tokio::test]
    async fn test_paint_and_erase_keys() {
        let device = grid_device(2, 2);
        let mut app = app(device.clone()).await;

        app.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(device.displayed(0, 0), Some(RgbColor::GREEN));

        app.handle_key(press(KeyCode::Char('c'))).await;
        assert_eq!(app.editor.draw_status(), DrawStatus::Clear);
        app.handle_key(press(KeyCode::Char(' '))).await;
        assert_eq!(device.displayed(0, 0), Some(RgbColor::OFF));
    }

    #[tokio::test]
    async fn test_picker_cancel_and_apply() {
        let mut app = app(grid_device(1, 1)).await;

        app.handle_key(press(KeyCode::Char('p'))).await;
        app.handle_key(press(KeyCode::Backspace)).await;
        app.handle_key(press(KeyCode::Esc)).await;
        assert_eq!(app.input, InputMode::Normal);
        assert_eq!(app.editor.selected_color(), RgbColor::GREEN);

        app.handle_key(press(KeyCode::Char('p'))).await;
        for _ in 0..7 {
            app.handle_key(press(KeyCode::Backspace)).await;
        }
        for c in "#ff0000".chars() {
            app.handle_key(press(KeyCode::Char(c))).await;
        }
        app.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(app.input, InputMode::Normal);
        assert_eq!(app.editor.selected_color(), RgbColor::RED);
    }

    #[tokio::test]
    async fn test_picker_rejects_garbage() {
        let mut app = app(grid_device(1, 1)).await;
        app.handle_key(press(KeyCode::Char('p'))).await;
        app.handle_key(press(KeyCode::Char('z'))).await;
        app.handle_key(press(KeyCode::Enter)).await;

        assert!(matches!(
            app.input,
            InputMode::Picker {
                error: Some(_),
                ..
            }
        ));
        assert_eq!(app.editor.selected_color(), RgbColor::GREEN);
    }

    #[tokio::test]
    async fn test_push_failure_reaches_status_bar() {
        let device = grid_device(1, 2);
        let mut app = app(device.clone()).await;
        device.fail_define(true);

        app.handle_key(press(KeyCode::Enter)).await;
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.notice.level, NoticeLevel::Error);

        // errors do not time out
        app.expire_status(Instant::now() + INFO_TIMEOUT * 2);
        assert!(app.status.is_some());
    }

    #[tokio::test]
    async fn test_unknown_layout_notice_shown() {
        let device = Arc::new(
            SimulatedDevice::new(DeviceType::Keyboard, MatrixDimensions::new(6, 22))
                .with_layout("Klingon"),
        );
        let mut app = app(device).await;
        assert_eq!(app.history.len(), 1);

        app.expire_status(Instant::now() + INFO_TIMEOUT);
        assert!(app.status.is_none());
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app(grid_device(1, 1)).await;
        app.handle_key(press(KeyCode::Char('?'))).await;
        app.handle_key(press(KeyCode::Char('q'))).await;
        assert!(!app.should_quit);
        app.handle_key(press(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }
}
