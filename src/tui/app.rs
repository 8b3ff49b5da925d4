//! Main application logic for the terminal user interface.
//!
//! `App` owns the `TaskList` and a `View`. The view is the list's presenter:
//! after every mutation it receives the full snapshot and summary, and all
//! drawing and all index lookups use that snapshot. Selection is clamped on
//! every render so a selected row always refers to an existing task.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::controller::{Presenter, RemovalRequest, Summary, TaskList};
use crate::error::{StoreError, TaskError};
use crate::store::Store;
use crate::task::Task;
use crate::tui::{
    colors::{BLUE, CLOUD, GREEN, ORANGE, RED, SILVER, SLATE},
    enums::{AppState, StatusKind},
    input::InputField,
    utils::centered_rect,
};

/// Presenter state: the last rendered snapshot plus pending prompts.
#[derive(Default)]
pub struct View {
    tasks: Vec<Task>,
    summary: Summary,
    table_state: TableState,
    pending_removal: Option<RemovalRequest>,
    save_error: Option<String>,
}

impl View {
    /// Index of the highlighted row in the last rendered snapshot.
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.tasks.len())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    fn select_next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }
}

impl Presenter for View {
    fn render(&mut self, tasks: &[Task], summary: Summary) {
        self.tasks = tasks.to_vec();
        self.summary = summary;
        let selected = match (self.table_state.selected(), tasks.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn confirm_removal(&mut self, request: RemovalRequest) {
        self.pending_removal = Some(request);
    }

    fn save_failed(&mut self, error: &StoreError) {
        self.save_error = Some(format!("Error saving: {error}"));
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    tasks: TaskList,
    view: View,
    input: InputField,
    status_message: String,
    status_kind: StatusKind,
}

impl App {
    /// Load the task list from `store` and draw the initial snapshot.
    pub fn new(store: Store) -> Self {
        let tasks = TaskList::initialize(store);
        let mut view = View::default();
        view.render(tasks.tasks(), tasks.summary());
        App {
            state: AppState::TaskList,
            tasks,
            view,
            input: InputField::new(),
            status_message: String::new(),
            status_kind: StatusKind::Info,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn task_list(&self) -> &TaskList {
        &self.tasks
    }

    pub fn status(&self) -> (&str, StatusKind) {
        (&self.status_message, self.status_kind)
    }

    fn set_status(&mut self, kind: StatusKind, msg: impl Into<String>) {
        self.status_kind = kind;
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_kind = StatusKind::Info;
    }

    /// A failed save overrides whatever the operation wanted to report.
    fn report_save_error(&mut self) {
        if let Some(msg) = self.view.save_error.take() {
            self.set_status(StatusKind::Error, msg);
        }
    }

    fn report_task_error(&mut self, err: TaskError) {
        debug!(error = %err, "operation rejected");
        match err {
            TaskError::EmptyText => self.set_status(StatusKind::Warning, "Type a task first!"),
            TaskError::IndexOutOfRange { .. } => {
                self.set_status(StatusKind::Warning, "That task no longer exists")
            }
        }
    }

    fn submit_input(&mut self) {
        match self.tasks.add(&self.input.value, &mut self.view) {
            Ok(index) => {
                self.input.clear();
                self.view.table_state.select(Some(index));
                self.set_status(StatusKind::Success, "Task added");
                self.report_save_error();
            }
            Err(e) => self.report_task_error(e),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(index) = self.view.selected() else {
            return;
        };
        match self.tasks.toggle(index, &mut self.view) {
            Ok(true) => self.set_status(StatusKind::Success, "Task completed"),
            Ok(false) => self.set_status(StatusKind::Info, "Task marked pending"),
            Err(e) => self.report_task_error(e),
        }
        self.report_save_error();
    }

    fn request_remove_selected(&mut self) {
        let Some(index) = self.view.selected() else {
            return;
        };
        match self.tasks.request_remove(index, &mut self.view) {
            Ok(()) if self.view.pending_removal.is_some() => self.state = AppState::Confirm,
            Ok(()) => {}
            Err(e) => self.report_task_error(e),
        }
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return true;
        }
        self.clear_status_message();
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key),
            AppState::Input => self.handle_input_field(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.handle_help_input(key),
        }
        false
    }

    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.view.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.view.select_next(),
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => {
                self.state = AppState::Input;
            }
            KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.request_remove_selected(),
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_input_field(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Tab => self.state = AppState::TaskList,
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(request) = self.view.pending_removal.take() {
                    match self.tasks.confirm_remove(request, &mut self.view) {
                        Ok(task) => self.set_status(StatusKind::Info, format!("Removed \"{}\"", task.text)),
                        Err(e) => self.report_task_error(e),
                    }
                    self.report_save_error();
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.view.pending_removal = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
            self.state = AppState::TaskList;
        }
    }

    fn handle_scroll(&mut self, kind: MouseEventKind) {
        if self.state != AppState::TaskList {
            return;
        }
        match kind {
            MouseEventKind::ScrollDown => self.view.select_next(),
            MouseEventKind::ScrollUp => self.view.select_prev(),
            _ => {}
        }
    }

    /// Poll for and dispatch one terminal event.
    ///
    /// Returns true if the application should quit.
    fn handle_event(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
                Event::Mouse(mouse) => self.handle_scroll(mouse.kind),
                _ => {}
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled(
                "TASK LIST",
                Style::default().fg(CLOUD).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Organise your tasks, one line at a time",
                Style::default().fg(SILVER),
            )),
        ];
        let header = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().bg(SLATE));
        f.render_widget(header, area);
    }

    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let summary = self.view.summary();
        let cards = [
            ("Total", summary.total, BLUE),
            ("Completed", summary.completed, GREEN),
            ("Pending", summary.pending, ORANGE),
        ];
        for ((title, value, color), chunk) in cards.into_iter().zip(chunks.iter()) {
            let card = Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().bg(color).fg(Color::White));
            f.render_widget(card, *chunk);
        }
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let editing = self.state == AppState::Input;
        let border = if editing {
            Style::default().fg(BLUE)
        } else {
            Style::default().fg(SILVER)
        };
        let title = if editing {
            "New task - Enter to add, Esc to leave"
        } else {
            "New task - press 'a' to type"
        };
        let input = Paragraph::new(self.input.value.as_str())
            .style(Style::default().fg(CLOUD))
            .block(Block::default().borders(Borders::ALL).border_style(border).title(title));
        f.render_widget(input, area);

        if editing {
            let x = area.x + 1 + self.input.cursor.min(area.width.saturating_sub(2) as usize) as u16;
            f.set_cursor_position((x, area.y + 1));
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Tasks - Press 'h' for help");

        if self.view.tasks.is_empty() {
            let text = vec![
                Line::from(""),
                Line::from("📋"),
                Line::from(Span::styled(
                    "No tasks yet",
                    Style::default().fg(CLOUD).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Add your first task above!",
                    Style::default().fg(SILVER),
                )),
            ];
            let empty = Paragraph::new(text).alignment(Alignment::Center).block(block);
            f.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .view
            .tasks
            .iter()
            .map(|task| {
                let (mark, style) = if task.completed {
                    (
                        "[x]",
                        Style::default().fg(GREEN).add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    ("[ ]", Style::default().fg(CLOUD))
                };
                Row::new(vec![
                    Cell::from(mark),
                    Cell::from(task.text.clone()).style(style),
                    Cell::from(task.created_at.clone()).style(Style::default().fg(SILVER)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),  // Checkbox
            Constraint::Min(20),    // Text
            Constraint::Length(16), // Created
        ];

        let table = Table::new(rows, widths)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.view.table_state);
    }

    /// Render the help screen with keyboard shortcuts.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Task List Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Task List:", bold)),
            Line::from("  ↑/k, ↓/j     Move selection (mouse wheel works too)"),
            Line::from("  a/i/Tab      Type a new task"),
            Line::from("  Space/c      Toggle completion"),
            Line::from("  d/Delete     Remove selected task (asks first)"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc        Quit"),
            Line::from(""),
            Line::from(Span::styled("New Task Field:", bold)),
            Line::from("  Enter        Add task"),
            Line::from("  ←/→ Home/End Move cursor"),
            Line::from("  Esc/Tab      Back to the list"),
            Line::from(""),
            Line::from("Ctrl+C quits from anywhere. Changes are saved immediately."),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Esc to return"),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }

    /// Render the yes/no prompt for a pending removal.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .style(Style::default().bg(RED).fg(Color::White));

        let area = centered_rect(60, 50, area);
        f.render_widget(Clear, area);

        let task_text = self
            .view
            .pending_removal
            .as_ref()
            .map(|r| r.text.as_str())
            .unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Do you really want to remove this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(task_text),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, bg) = if self.status_message.is_empty() {
            let hint = match self.state {
                AppState::TaskList => format!("{} tasks | Press 'h' for help", self.view.summary.total),
                AppState::Input => "Typing a new task".to_string(),
                AppState::Confirm => "Confirm removal".to_string(),
                AppState::Help => "Help".to_string(),
            };
            (hint, SLATE)
        } else {
            let bg = match self.status_kind {
                StatusKind::Info => SLATE,
                StatusKind::Success => GREEN,
                StatusKind::Warning => ORANGE,
                StatusKind::Error => RED,
            };
            (self.status_message.clone(), bg)
        };
        let status = Paragraph::new(text)
            .style(Style::default().bg(bg).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that lays out every section.
    fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        if self.state == AppState::Help {
            self.render_help(f, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(3), // Stat cards
                Constraint::Length(3), // Input
                Constraint::Min(0),    // Tasks
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        self.render_header(f, chunks[0]);
        self.render_stats(f, chunks[1]);
        self.render_input(f, chunks[2]);
        self.render_task_list(f, chunks[3]);
        self.render_status_bar(f, chunks[4]);
        if self.state == AppState::Confirm {
            self.render_confirm(f, area);
        }
    }

    /// Main event loop. Draws, then handles one event, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_event()? {
                break;
            }
        }
        Ok(())
    }
}
