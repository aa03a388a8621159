// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A parent form listing bound fields; Enter opens the selector popup for the focused field.
//! The popup shows the search form, pagination bar, checkbox table, live preview and the
//! Apply/Cancel buttons.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Row as TableRow, Table},
};

use crate::config::Labels;
use crate::model::{ClassName, FieldName, SelectionMode};
use crate::opener::{Delivery, FormFields, OpenRequest, OpenerBinding, ParentForm};
use crate::popup::{PopupController, PopupError, PopupState};
use crate::query::{Query, TEXT_KEY};
use crate::source::{CandidateSource, ROLE_CLASS};

const FOCUS_COLOR: Color = Color::LightGreen;
const CHECKED_COLOR: Color = Color::LightGreen;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "classhelp";
const DISABLED_COLOR: Color = Color::DarkGray;

/// Runs the interactive terminal UI until `q`.
pub fn run(
    source: Arc<dyn CandidateSource>,
    form: ParentForm,
    fields: Vec<OpenRequest>,
    labels: Labels,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(source, form, fields, labels);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Fields of the tracker's issue form, bound to the demo catalogs.
pub fn demo_form() -> (ParentForm, Vec<OpenRequest>) {
    let specs = [
        ("keyword", "keyword", SelectionMode::Multi, "1,3"),
        ("assignedto", "user", SelectionMode::Single, "3"),
        ("nosy", "user", SelectionMode::Multi, "1,4"),
        ("superseder", "issue", SelectionMode::Multi, ""),
        ("roles", ROLE_CLASS, SelectionMode::Multi, "user"),
    ];

    let mut form = ParentForm::new();
    let mut fields = Vec::with_capacity(specs.len());
    for (field, class, mode, value) in specs {
        let (Ok(field), Ok(class)) = (FieldName::new(field), ClassName::new(class)) else {
            continue;
        };
        form.set_value(&field, value.to_owned());
        fields.push(OpenRequest::new(field, class, mode));
    }
    (form, fields)
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    render_form(frame, app, main_area);
    if app.popup.is_some() {
        render_popup(frame, app, main_area);
    }

    let toast_suffix = app.toast_suffix();
    let status = Paragraph::new(footer_help_line(app, &toast_suffix));
    frame.render_widget(status, status_area);
    let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
    frame.render_widget(brand, status_area);
}

fn render_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let form_has_focus = app.popup.is_none();
    let key_width = app.fields.iter().map(|field| field.field.as_str().len()).max().unwrap_or(0);
    let lines = app
        .fields
        .iter()
        .enumerate()
        .map(|(idx, request)| {
            let value = app.opener.form().value(&request.field).unwrap_or_default();
            let is_cursor = idx == app.field_cursor;
            let marker = if is_cursor { "▸ " } else { "  " };
            let mut line = Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<width$}", request.field.as_str(), width = key_width),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(value.to_owned()),
                Span::styled(
                    format!("  ({}{})", request.class, mode_suffix(request.mode)),
                    Style::default().fg(DISABLED_COLOR),
                ),
            ]);
            if is_cursor && form_has_focus {
                line = line.style(Style::default().fg(FOCUS_COLOR));
            }
            line
        })
        .collect::<Vec<_>>();

    let border_style =
        if form_has_focus { Style::default().fg(FOCUS_COLOR) } else { Style::default() };
    let form = Paragraph::new(lines).block(
        Block::default().borders(Borders::ALL).title(view_title("Form", None)).border_style(border_style),
    );
    frame.render_widget(form, area);
}

fn render_popup(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let Some(popup) = app.popup.as_ref() else {
        return;
    };
    let area = centered_rect(84, 88, main_area);
    frame.render_widget(Clear, area);

    let binding = popup.controller.binding();
    let title = view_title(
        binding.field_name().as_str(),
        Some(&format!("— {}{}", binding.class_name(), mode_suffix(binding.mode()))),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(FOCUS_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let search_height = popup.search.entries.len() as u16 + 1;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(search_height),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let (search_lines, cursor) = search_form_lines(&popup.search, &app.labels, sections[0]);
    frame.render_widget(Paragraph::new(search_lines), sections[0]);
    if let Some(cursor) = cursor {
        frame.set_cursor_position(cursor);
    }

    frame.render_widget(Paragraph::new(pagination_line(popup, &app.labels)), sections[1]);

    let rows = popup.controller.rows();
    let table_rows = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut style = if row.checked {
                Style::default().fg(CHECKED_COLOR)
            } else {
                Style::default()
            };
            if idx == popup.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let mark = if row.checked { "[x]" } else { "[ ]" };
            TableRow::new(vec![
                mark.to_owned(),
                row.entity.id().to_string(),
                row.entity.label().to_owned(),
            ])
            .style(style)
        })
        .collect::<Vec<_>>();
    let table = Table::new(table_rows, [Constraint::Length(3), Constraint::Length(6), Constraint::Min(0)])
        .header(
            TableRow::new(vec!["X", "ID", "Label"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .column_spacing(1);
    frame.render_widget(table, sections[2]);

    frame.render_widget(Paragraph::new(preview_line(popup, &app.labels)), sections[3]);
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Search inputs: the free-text term first, then one per filterable attribute.
#[derive(Debug, Clone, Default)]
struct SearchForm {
    entries: Vec<(String, String)>,
    focus: usize,
    editing: bool,
}

impl SearchForm {
    fn for_popup(controller: &PopupController) -> Self {
        let mut entries = vec![(TEXT_KEY.to_owned(), String::new())];
        entries.extend(controller.filterable().iter().map(|name| (name.clone(), String::new())));
        Self { entries, focus: 0, editing: false }
    }

    fn query(&self) -> Query {
        Query::from_form(self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str())))
    }

    fn focus_next(&mut self) {
        if !self.entries.is_empty() {
            self.focus = (self.focus + 1) % self.entries.len();
        }
    }

    fn focused_value_mut(&mut self) -> Option<&mut String> {
        self.entries.get_mut(self.focus).map(|(_, value)| value)
    }

    fn clear(&mut self) {
        for (_, value) in &mut self.entries {
            value.clear();
        }
        self.editing = false;
    }
}

struct PopupView {
    controller: PopupController,
    cursor: usize,
    search: SearchForm,
}

struct App {
    source: Arc<dyn CandidateSource>,
    opener: OpenerBinding,
    fields: Vec<OpenRequest>,
    field_cursor: usize,
    popup: Option<PopupView>,
    labels: Labels,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(
        source: Arc<dyn CandidateSource>,
        form: ParentForm,
        fields: Vec<OpenRequest>,
        labels: Labels,
    ) -> Self {
        Self {
            source,
            opener: OpenerBinding::new(form),
            fields,
            field_cursor: 0,
            popup: None,
            labels,
            toast: None,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.popup.is_some() {
            return self.handle_popup_key(code);
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_field_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_field_cursor(-1),
            KeyCode::Enter => self.open_focused_field(),
            _ => {}
        }
        false
    }

    fn handle_popup_key(&mut self, code: KeyCode) -> bool {
        let editing = self.popup.as_ref().is_some_and(|popup| popup.search.editing);
        if editing {
            self.handle_search_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => {
                self.cancel_popup();
                return true;
            }
            KeyCode::Esc => self.cancel_popup(),
            KeyCode::Down | KeyCode::Char('j') => self.move_row_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_row_cursor(-1),
            KeyCode::Char(' ') => self.toggle_cursor_row(),
            KeyCode::Char('/') => self.start_search_edit(false),
            KeyCode::Tab => self.start_search_edit(true),
            KeyCode::Enter => self.run_search(),
            KeyCode::Char('r') => self.reset_search(),
            KeyCode::Char('[') => self.change_page(|controller| controller.prev_page()),
            KeyCode::Char(']') => self.change_page(|controller| controller.next_page()),
            KeyCode::Char('a') => self.apply_popup(),
            _ => {}
        }
        false
    }

    fn handle_search_edit_key(&mut self, code: KeyCode) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => popup.search.editing = false,
            KeyCode::Tab => popup.search.focus_next(),
            KeyCode::Enter => {
                popup.search.editing = false;
                self.run_search();
            }
            KeyCode::Backspace => {
                if let Some(value) = popup.search.focused_value_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(value) = popup.search.focused_value_mut() {
                    value.push(ch);
                }
            }
            _ => {}
        }
    }

    fn move_field_cursor(&mut self, delta: isize) {
        if self.fields.is_empty() {
            return;
        }
        let last = self.fields.len() - 1;
        self.field_cursor = self.field_cursor.saturating_add_signed(delta).min(last);
    }

    fn open_focused_field(&mut self) {
        let Some(request) = self.fields.get(self.field_cursor).cloned() else {
            return;
        };
        let mut controller = self.opener.open_popup(request);
        match controller.open(self.source.as_ref()) {
            Ok(()) => {
                let search = SearchForm::for_popup(&controller);
                self.popup = Some(PopupView { controller, cursor: 0, search });
            }
            Err(err) => {
                drop(controller);
                self.pump_deliveries();
                self.set_toast(err.to_string());
            }
        }
    }

    fn move_row_cursor(&mut self, delta: isize) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        let rows = popup.controller.rows().len();
        if rows == 0 {
            popup.cursor = 0;
            return;
        }
        popup.cursor = popup.cursor.saturating_add_signed(delta).min(rows - 1);
    }

    fn toggle_cursor_row(&mut self) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        let Some(id) = popup.controller.rows().get(popup.cursor).map(|row| row.entity.id().clone())
        else {
            return;
        };
        if let Err(err) = popup.controller.toggle_row(&id) {
            self.set_toast(err.to_string());
        }
    }

    fn start_search_edit(&mut self, next_field: bool) {
        if let Some(popup) = self.popup.as_mut() {
            if next_field {
                popup.search.focus_next();
            }
            popup.search.editing = true;
        }
    }

    fn run_search(&mut self) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        let result = popup.controller.search(popup.search.query());
        popup.cursor = 0;
        match result {
            Ok(()) if popup.controller.ignored_filters().is_empty() => {}
            Ok(()) => {
                let ignored = popup.controller.ignored_filters().join(", ");
                self.set_toast(format!("Ignored filters: {ignored}"));
            }
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn reset_search(&mut self) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        popup.search.clear();
        popup.cursor = 0;
        if let Err(err) = popup.controller.reset() {
            self.set_toast(err.to_string());
        }
    }

    fn change_page(
        &mut self,
        step: impl FnOnce(&mut PopupController) -> Result<usize, PopupError>,
    ) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match step(&mut popup.controller) {
            Ok(_) => popup.cursor = 0,
            Err(err) => self.set_toast(err.to_string()),
        }
    }

    fn apply_popup(&mut self) {
        let Some(mut popup) = self.popup.take() else {
            return;
        };
        if let Err(err) = popup.controller.apply() {
            self.set_toast(err.to_string());
            if !popup.controller.state().is_closed() {
                self.popup = Some(popup);
                return;
            }
        }
        drop(popup);
        self.pump_deliveries();
    }

    fn cancel_popup(&mut self) {
        let Some(mut popup) = self.popup.take() else {
            return;
        };
        if let Err(err) = popup.controller.cancel() {
            self.set_toast(err.to_string());
        }
        drop(popup);
        self.pump_deliveries();
    }

    fn pump_deliveries(&mut self) {
        for delivery in self.opener.pump() {
            let message = match delivery {
                Delivery::Written { field, value } => {
                    format!("{field} = {:?}", value.as_str())
                }
                Delivery::Cancelled { field, cause: None } => format!("{field} unchanged"),
                Delivery::Cancelled { field, cause: Some(cause) } => format!("{field}: {cause}"),
                Delivery::Stale { handle } => format!("Ignored stale popup {handle}"),
            };
            self.set_toast(message);
        }
    }

    fn popup_state(&self) -> Option<PopupState> {
        self.popup.as_ref().map(|popup| popup.controller.state())
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });
    }

    fn toast_suffix(&mut self) -> String {
        match self.toast.as_ref() {
            Some(toast) if toast.expires_at > Instant::now() => format!(" | {}", toast.message),
            Some(_) => {
                self.toast = None;
                String::new()
            }
            None => String::new(),
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

// Title, footer and popup section helpers.
include!("chrome.rs");

#[cfg(test)]
pub(crate) mod testing {
    use super::{draw, App};
    use crate::config::Labels;
    use crate::model::FieldName;
    use crate::opener::{FormFields, OpenRequest, ParentForm};
    use crate::popup::PopupState;
    use crate::source::CandidateSource;
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    pub(crate) struct HeadlessTui {
        app: App,
    }

    impl HeadlessTui {
        pub(crate) fn new(
            source: Arc<dyn CandidateSource>,
            form: ParentForm,
            fields: Vec<OpenRequest>,
        ) -> Self {
            Self { app: App::new(source, form, fields, Labels::default()) }
        }

        pub(crate) fn with_labels(mut self, labels: Labels) -> Self {
            self.app.labels = labels;
            self
        }

        pub(crate) fn press(&mut self, code: KeyCode) -> bool {
            self.app.handle_key_code(code)
        }

        pub(crate) fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        pub(crate) fn field_value(&self, field: &str) -> Option<String> {
            let field = FieldName::new(field).ok()?;
            self.app.opener.form().value(&field).map(str::to_owned)
        }

        pub(crate) fn popup_state(&self) -> Option<PopupState> {
            self.app.popup_state()
        }

        pub(crate) fn preview(&self) -> Option<String> {
            self.app.popup.as_ref().map(|popup| popup.controller.preview().into_string())
        }

        pub(crate) fn visible_ids(&self) -> Vec<String> {
            self.app
                .popup
                .as_ref()
                .map(|popup| {
                    popup.controller.rows().iter().map(|row| row.entity.id().to_string()).collect()
                })
                .unwrap_or_default()
        }

        pub(crate) fn toast(&self) -> Option<String> {
            self.app.toast.as_ref().map(|toast| toast.message.clone())
        }

        /// Renders one frame and returns the screen as lines of text.
        pub(crate) fn render(&mut self, width: u16, height: u16) -> String {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            terminal.draw(|frame| draw(frame, &mut self.app)).unwrap();
            let buffer = terminal.backend().buffer();
            let mut out = String::new();
            for line in buffer.content.chunks(usize::from(buffer.area.width.max(1))) {
                for cell in line {
                    out.push_str(cell.symbol());
                }
                out.push('\n');
            }
            out
        }
    }
}
