// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use mirror_app::{
    AppCommand, AppMode, AppState, CloseSignal, DetailView, LoadFailure, LoadRequestId,
    RecordBatch, RecordField, SortSpec, TableCommand, TableController, TableEvent, TableView,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::macros::format_description;
use tracing::{debug, warn};

const HALF_PAGE_ROWS: isize = 10;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Length(6),
    Constraint::Fill(2),
    Constraint::Fill(2),
    Constraint::Fill(3),
    Constraint::Fill(2),
];
const DETAIL_WIDTH_PERCENT: u16 = 60;
const DETAIL_HEIGHT_PERCENT: u16 = 70;
const CLOSE_BUTTON: &str = "[ close ]";
const SEARCH_BUTTON: &str = "[ search ]";
const FILTER_DISABLED: &str = "filter disabled: records failed to load";

/// Source of records for the table. `spawn_load` must eventually send a
/// `LoadFinished` for `request` on `tx`, unless the load was cancelled.
pub trait AppRuntime {
    fn load_records(&mut self) -> std::result::Result<RecordBatch, LoadFailure>;
    fn spawn_load(&mut self, request: LoadRequestId, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.load_records();
        tx.send(InternalEvent::LoadFinished { request, result })
            .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
    fn cancel_load(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    LoadFinished {
        request: LoadRequestId,
        result: std::result::Result<RecordBatch, LoadFailure>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavCommand {
    Quit,
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    SortCursorColumn,
    SortColumn(usize),
    FocusFilter,
    SelectRow,
    ToggleHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    FilterBar,
    Header(RecordField),
    Row(usize),
    OverlayClose,
    OverlayInside,
    OverlayOutside,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    table: TableController,
    status_token: u64,
    screen: Rect,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    start_load(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        match terminal.draw(|frame| render(frame, state, &view_data)) {
            Ok(completed) => view_data.screen = completed.area,
            Err(error) => {
                result = Err(error).context("draw frame");
                break;
            }
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(Event::Mouse(mouse)) => {
                handle_mouse_event(state, &mut view_data, &internal_tx, mouse);
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    if view_data.table.is_loading()
        && let Err(error) = runtime.cancel_load()
    {
        warn!(error = %error, "could not cancel record load");
    }
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    result
}

fn start_load<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = view_data.table.dispatch(TableCommand::BeginLoad);
    let Some(request) = events.iter().find_map(|event| match event {
        TableEvent::LoadStarted(request) => Some(*request),
        _ => None,
    }) else {
        return;
    };
    if let Err(error) = runtime.spawn_load(request, internal_tx.clone()) {
        warn!(error = %error, "could not start record load");
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("load failed: {error}"),
        );
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::LoadFinished { request, result } => {
                let events = view_data
                    .table
                    .dispatch(TableCommand::FinishLoad { request, result });
                state.dispatch(AppCommand::JumpToRow(0));
                apply_table_events(state, view_data, tx, &events);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn apply_table_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[TableEvent],
) {
    if let Some(message) = status_for_events(events) {
        emit_status(state, view_data, internal_tx, message);
    }
}

fn status_for_events(events: &[TableEvent]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        TableEvent::RecordsLoaded { count } => Some(format!("loaded {count} records")),
        TableEvent::LoadFailed { message } => Some(message.clone()),
        TableEvent::Sorted(spec) => Some(format!(
            "sort {} {}",
            spec.field.as_str(),
            spec.direction.as_str()
        )),
        TableEvent::FilterApplied { matched, total } => {
            Some(format!("filter: {matched} of {total} records"))
        }
        TableEvent::FilterUnavailable => Some(FILTER_DISABLED.to_owned()),
        TableEvent::SelectionRejected { .. } => Some("no record on that row".to_owned()),
        TableEvent::LoadStarted(_)
        | TableEvent::LoadAlreadyStarted
        | TableEvent::StaleLoadIgnored(_)
        | TableEvent::FilterTextChanged
        | TableEvent::Selected(_)
        | TableEvent::Deselected => None,
    })
}

fn handle_key_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if view_data.table.selected().is_some() {
        if let Some(signal) = close_signal_for_key(key) {
            close_detail(state, view_data, internal_tx, signal);
        }
        return false;
    }

    if state.help_visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            state.dispatch(AppCommand::ToggleHelp);
        }
        return false;
    }

    if state.mode == AppMode::FilterInput {
        handle_filter_key(state, view_data, internal_tx, key);
        return false;
    }

    let Some(command) = nav_command_for_key(key) else {
        return false;
    };
    apply_nav_command(state, view_data, internal_tx, command)
}

fn close_signal_for_key(key: KeyEvent) -> Option<CloseSignal> {
    match key.code {
        KeyCode::Esc => Some(CloseSignal::Escape),
        KeyCode::Enter | KeyCode::Char('c') => Some(CloseSignal::Button),
        _ => None,
    }
}

fn nav_command_for_key(key: KeyEvent) -> Option<NavCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Some(NavCommand::MoveRow(HALF_PAGE_ROWS)),
            KeyCode::Char('u') => Some(NavCommand::MoveRow(-HALF_PAGE_ROWS)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(NavCommand::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(NavCommand::MoveRow(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(NavCommand::MoveRow(-1)),
        KeyCode::Char('h') | KeyCode::Left => Some(NavCommand::MoveColumn(-1)),
        KeyCode::Char('l') | KeyCode::Right => Some(NavCommand::MoveColumn(1)),
        KeyCode::Char('g') | KeyCode::Home => Some(NavCommand::JumpFirstRow),
        KeyCode::Char('G') | KeyCode::End => Some(NavCommand::JumpLastRow),
        KeyCode::Char('s') => Some(NavCommand::SortCursorColumn),
        KeyCode::Char(digit @ '1'..='5') => {
            Some(NavCommand::SortColumn(usize::from(digit as u8 - b'1')))
        }
        KeyCode::Char('/') => Some(NavCommand::FocusFilter),
        KeyCode::Enter => Some(NavCommand::SelectRow),
        KeyCode::Char('?') => Some(NavCommand::ToggleHelp),
        _ => None,
    }
}

fn apply_nav_command(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: NavCommand,
) -> bool {
    let rows = view_data.table.displayed_len();
    match command {
        NavCommand::Quit => return true,
        NavCommand::MoveRow(delta) => {
            state.dispatch(AppCommand::MoveRow { delta, rows });
        }
        NavCommand::MoveColumn(delta) => {
            state.dispatch(AppCommand::MoveColumn(delta));
        }
        NavCommand::JumpFirstRow => {
            state.dispatch(AppCommand::JumpToRow(0));
        }
        NavCommand::JumpLastRow => {
            state.dispatch(AppCommand::JumpToRow(rows.saturating_sub(1)));
        }
        NavCommand::SortCursorColumn => {
            let field = state.cursor_field();
            sort_by(state, view_data, internal_tx, field);
        }
        NavCommand::SortColumn(index) => {
            if let Some(field) = RecordField::COLUMNS.get(index).copied() {
                sort_by(state, view_data, internal_tx, field);
            }
        }
        NavCommand::FocusFilter => focus_filter(state, view_data, internal_tx),
        NavCommand::SelectRow => {
            let row = state.cursor_row;
            select_row(state, view_data, internal_tx, row);
        }
        NavCommand::ToggleHelp => {
            state.dispatch(AppCommand::ToggleHelp);
        }
    }
    false
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::ExitToNav);
            return;
        }
        KeyCode::Enter => TableCommand::ApplyFilter,
        KeyCode::Backspace => TableCommand::PopFilterChar,
        KeyCode::Char(ch) => TableCommand::PushFilterChar(ch),
        _ => return,
    };

    let applying = command == TableCommand::ApplyFilter;
    let events = view_data.table.dispatch(command);
    if applying || events.contains(&TableEvent::FilterUnavailable) {
        state.dispatch(AppCommand::ExitToNav);
        state.dispatch(AppCommand::JumpToRow(0));
    }
    apply_table_events(state, view_data, internal_tx, &events);
}

fn focus_filter(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if !view_data.table.filter_enabled() {
        emit_status(state, view_data, internal_tx, FILTER_DISABLED);
        return;
    }
    state.dispatch(AppCommand::FocusFilter);
}

fn sort_by(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    field: RecordField,
) {
    let events = view_data.table.dispatch(TableCommand::Sort(field));
    if events.is_empty() {
        return;
    }
    if let Some(column) = RecordField::COLUMNS.iter().position(|column| *column == field) {
        let delta = column as isize - state.cursor_col as isize;
        state.dispatch(AppCommand::MoveColumn(delta));
    }
    apply_table_events(state, view_data, internal_tx, &events);
}

fn select_row(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    row: usize,
) {
    let events = view_data.table.dispatch(TableCommand::Select { row });
    if events
        .iter()
        .any(|event| matches!(event, TableEvent::Selected(_)))
    {
        state.dispatch(AppCommand::JumpToRow(row));
    }
    apply_table_events(state, view_data, internal_tx, &events);
}

fn close_detail(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    signal: CloseSignal,
) {
    let events = view_data.table.dispatch(TableCommand::CloseDetail(signal));
    apply_table_events(state, view_data, internal_tx, &events);
}

fn handle_mouse_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let Some(hit) = hit_test(view_data.screen, state, view_data, mouse.column, mouse.row) else {
        return;
    };
    debug!(?hit, "mouse click");
    match hit {
        Hit::OverlayOutside => close_detail(state, view_data, internal_tx, CloseSignal::OutsideClick),
        Hit::OverlayClose => close_detail(state, view_data, internal_tx, CloseSignal::Button),
        Hit::OverlayInside => {}
        Hit::FilterBar => focus_filter(state, view_data, internal_tx),
        Hit::Header(field) => sort_by(state, view_data, internal_tx, field),
        Hit::Row(row) => select_row(state, view_data, internal_tx, row),
    }
}

fn hit_test(
    screen: Rect,
    state: &AppState,
    view_data: &ViewData,
    column: u16,
    row: u16,
) -> Option<Hit> {
    if view_data.table.selected().is_some() {
        let overlay = centered_rect(DETAIL_WIDTH_PERCENT, DETAIL_HEIGHT_PERCENT, screen);
        if !rect_contains(overlay, column, row) {
            return Some(Hit::OverlayOutside);
        }
        if rect_contains(close_button_area(overlay), column, row) {
            return Some(Hit::OverlayClose);
        }
        return Some(Hit::OverlayInside);
    }
    if state.help_visible {
        return None;
    }

    let [filter_area, body, _] = screen_layout(screen);
    if rect_contains(filter_area, column, row) {
        return Some(Hit::FilterBar);
    }
    let table = &view_data.table;
    if table.is_loading() || table.error().is_some() {
        return None;
    }

    let inner = table_block().inner(body);
    if !rect_contains(inner, column, row) {
        return None;
    }
    if row == inner.y {
        return column_areas(inner)
            .iter()
            .position(|area| column >= area.x && column < area.x.saturating_add(area.width))
            .map(|index| Hit::Header(RecordField::COLUMNS[index]));
    }

    let offset = scroll_offset(state.cursor_row, visible_row_count(inner));
    let index = offset + usize::from(row - inner.y - 1);
    (index < table.displayed_len()).then_some(Hit::Row(index))
}

fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

fn screen_layout(area: Rect) -> [Rect; 3] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .areas(area)
}

fn table_block() -> Block<'static> {
    Block::default().borders(Borders::ALL)
}

fn column_areas(inner: Rect) -> Vec<Rect> {
    let header = Rect {
        height: inner.height.min(1),
        ..inner
    };
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(COLUMN_WIDTHS)
        .spacing(1)
        .split(header)
        .to_vec()
}

fn visible_row_count(inner: Rect) -> usize {
    usize::from(inner.height.saturating_sub(1))
}

fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 || cursor < visible {
        0
    } else {
        cursor + 1 - visible
    }
}

fn close_button_area(overlay: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(overlay);
    Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(1),
        width: inner.width.min(CLOSE_BUTTON.chars().count() as u16),
        height: inner.height.min(1),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let [filter_area, body, status_area] = screen_layout(frame.area());
    let view = view_data.table.view();

    render_filter_bar(frame, filter_area, state, &view);

    if view.is_loading {
        let loading = Paragraph::new("loading records…")
            .style(Style::default().fg(Color::Cyan))
            .block(table_block().title("records"));
        frame.render_widget(loading, body);
    } else if let Some(error) = view.error {
        let banner = Paragraph::new(error)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(table_block().title("records"));
        frame.render_widget(banner, body);
    } else {
        render_table(frame, body, state, &view);
    }

    let status_widget = Paragraph::new(status_text(state, &view))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, status_area);

    if let Some(detail) = view.detail {
        render_detail(frame, detail);
    }

    if state.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_filter_bar(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &TableView<'_>,
) {
    let style = if !view.filter_enabled {
        Style::default().fg(Color::DarkGray)
    } else if state.mode == AppMode::FilterInput {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let bar = Paragraph::new(filter_bar_text(state, view))
        .style(style)
        .block(Block::default().title("mirror").borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn filter_bar_text(state: &AppState, view: &TableView<'_>) -> String {
    if !view.filter_enabled {
        return "filter: (disabled)".to_owned();
    }
    let cursor = if state.mode == AppMode::FilterInput {
        "_"
    } else {
        ""
    };
    format!("filter: {}{cursor}  {SEARCH_BUTTON}", view.filter_text)
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &TableView<'_>,
) {
    let block = table_block().title(table_title(view));
    let inner = block.inner(area);
    let visible = visible_row_count(inner);
    let offset = scroll_offset(state.cursor_row, visible);

    let header_cells = RecordField::COLUMNS
        .iter()
        .enumerate()
        .map(|(column, field)| {
            let mut style = Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD);
            if column == state.cursor_col {
                style = style.fg(Color::Cyan);
            }
            Cell::from(header_label(*field, view.sort)).style(style)
        });
    let header = Row::new(header_cells);

    let rows = view
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(row_index, record)| {
            let selected_row = row_index == state.cursor_row;
            let cells = RecordField::COLUMNS
                .iter()
                .enumerate()
                .map(|(column, field)| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column == state.cursor_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(field.value(record).display()).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        });

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn header_label(field: RecordField, sort: Option<SortSpec>) -> String {
    let mut label = field.label().to_owned();
    if let Some(spec) = sort.filter(|spec| spec.field == field) {
        label.push(' ');
        label.push_str(spec.direction.indicator());
    }
    label
}

fn table_title(view: &TableView<'_>) -> String {
    let mut title = format!("records {}/{}", view.rows.len(), view.total);
    let format = format_description!("[hour]:[minute]:[second]");
    if let Some(fetched) = view.fetched_at.and_then(|at| at.format(format).ok()) {
        title.push_str(" · fetched ");
        title.push_str(&fetched);
    }
    title
}

fn render_detail(frame: &mut ratatui::Frame<'_>, detail: DetailView<'_>) {
    let area = centered_rect(DETAIL_WIDTH_PERCENT, DETAIL_HEIGHT_PERCENT, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title("record details")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let body = Paragraph::new(render_detail_text(detail))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, text_area);

    let button = Paragraph::new(CLOSE_BUTTON).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(button, close_button_area(area));
}

fn render_detail_text(detail: DetailView<'_>) -> String {
    let mut lines = vec!["User".to_owned()];
    lines.extend(
        detail
            .identity()
            .into_iter()
            .map(|(label, value)| format!("  {label}: {value}")),
    );
    lines.push(String::new());
    lines.push("Address".to_owned());
    lines.extend(
        detail
            .address()
            .into_iter()
            .map(|(label, value)| format!("  {label}: {value}")),
    );
    lines.push(String::new());
    lines.push("Description".to_owned());
    lines.push(format!("  {}", detail.description()));
    lines.join("\n")
}

fn status_text(state: &AppState, view: &TableView<'_>) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view.detail.is_some() {
        return "esc close · enter close · click outside to close".to_owned();
    }
    if view.is_loading {
        return "loading records…".to_owned();
    }
    if view.error.is_some() {
        return "load failed · q quit".to_owned();
    }
    match state.mode {
        AppMode::FilterInput => "type to filter · enter search · esc cancel".to_owned(),
        AppMode::Nav => "/ filter · s sort · 1-5 sort column · enter details · ? help · q quit"
            .to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "j/k or ↑/↓   move row\n\
     h/l or ←/→   move column\n\
     g/G          first/last row\n\
     ctrl-d/u     half page down/up\n\
     s            sort by cursor column (again to flip)\n\
     1-5          sort by column\n\
     /            edit filter, enter to search\n\
     enter        open record details\n\
     esc          close details\n\
     ?            toggle help\n\
     q            quit\n\
     \n\
     mouse: click a header to sort, a row to open it,\n\
     outside the details to close them"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
