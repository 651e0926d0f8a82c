// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::RecordField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    FilterInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub help_visible: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            cursor_row: 0,
            cursor_col: 0,
            help_visible: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    FocusFilter,
    ExitToNav,
    MoveRow { delta: isize, rows: usize },
    MoveColumn(isize),
    JumpToRow(usize),
    ToggleHelp,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    CursorMoved { row: usize, col: usize },
    HelpToggled(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::FocusFilter => {
                self.mode = AppMode::FilterInput;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("filter")]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::MoveRow { delta, rows } => {
                self.cursor_row = step_clamped(self.cursor_row, delta, rows);
                self.cursor_moved()
            }
            AppCommand::MoveColumn(delta) => {
                self.cursor_col = step_clamped(self.cursor_col, delta, RecordField::COLUMNS.len());
                self.cursor_moved()
            }
            AppCommand::JumpToRow(row) => {
                self.cursor_row = row;
                self.cursor_moved()
            }
            AppCommand::ToggleHelp => {
                self.help_visible = !self.help_visible;
                vec![AppEvent::HelpToggled(self.help_visible)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn cursor_field(&self) -> RecordField {
        RecordField::COLUMNS[self.cursor_col.min(RecordField::COLUMNS.len() - 1)]
    }

    fn cursor_moved(&self) -> Vec<AppEvent> {
        vec![AppEvent::CursorMoved {
            row: self.cursor_row,
            col: self.cursor_col,
        }]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

fn step_clamped(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
