// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::detail::{CloseSignal, DetailView};
use crate::error::LoadFailure;
use crate::ids::{LoadRequestId, RecordId};
use crate::model::{Record, RecordBatch, RecordField, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading { request: LoadRequestId },
    Loaded { fetched_at: OffsetDateTime },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: RecordField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    BeginLoad,
    FinishLoad {
        request: LoadRequestId,
        result: Result<RecordBatch, LoadFailure>,
    },
    Sort(RecordField),
    SetFilterText(String),
    PushFilterChar(char),
    PopFilterChar,
    ApplyFilter,
    Select {
        row: usize,
    },
    Deselect,
    CloseDetail(CloseSignal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    LoadStarted(LoadRequestId),
    LoadAlreadyStarted,
    StaleLoadIgnored(LoadRequestId),
    RecordsLoaded { count: usize },
    LoadFailed { message: String },
    Sorted(SortSpec),
    FilterTextChanged,
    FilterApplied { matched: usize, total: usize },
    FilterUnavailable,
    Selected(RecordId),
    SelectionRejected { row: usize },
    Deselected,
}

/// Owns the fetched records and derives the displayed set from the active
/// filter and sort.
///
/// `displayed` and `selected` hold indices into `records`, so the displayed
/// set can only ever be a subset or permutation of what was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableController {
    records: Vec<Record>,
    displayed: Vec<usize>,
    filter_text: String,
    sort: Option<SortSpec>,
    selected: Option<usize>,
    load: LoadStatus,
    next_request: i64,
}

impl Default for TableController {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            displayed: Vec::new(),
            filter_text: String::new(),
            sort: None,
            selected: None,
            load: LoadStatus::Idle,
            next_request: 1,
        }
    }
}

/// Everything the renderer needs after a state change.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<'a> {
    pub rows: Vec<&'a Record>,
    pub sort: Option<SortSpec>,
    pub filter_text: &'a str,
    pub filter_enabled: bool,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub fetched_at: Option<OffsetDateTime>,
    pub total: usize,
    pub detail: Option<DetailView<'a>>,
}

impl TableController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::BeginLoad => self.begin_load(),
            TableCommand::FinishLoad { request, result } => self.finish_load(request, result),
            TableCommand::Sort(field) => self.sort(field),
            TableCommand::SetFilterText(text) => self.edit_filter(|current| *current = text),
            TableCommand::PushFilterChar(ch) => self.edit_filter(|current| current.push(ch)),
            TableCommand::PopFilterChar => self.edit_filter(|current| {
                current.pop();
            }),
            TableCommand::ApplyFilter => self.apply_filter(),
            TableCommand::Select { row } => self.select(row),
            TableCommand::Deselect => self.deselect(None),
            TableCommand::CloseDetail(signal) => self.deselect(Some(signal)),
        }
    }

    pub fn displayed(&self) -> impl Iterator<Item = &Record> + '_ {
        self.displayed.iter().map(|index| &self.records[*index])
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn displayed_ids(&self) -> Vec<RecordId> {
        self.displayed().map(|record| record.id).collect()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn selected(&self) -> Option<&Record> {
        self.selected.map(|index| &self.records[index])
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadStatus::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn filter_enabled(&self) -> bool {
        self.error().is_none()
    }

    pub fn view(&self) -> TableView<'_> {
        let fetched_at = match self.load {
            LoadStatus::Loaded { fetched_at } => Some(fetched_at),
            _ => None,
        };
        TableView {
            rows: self.displayed().collect(),
            sort: self.sort,
            filter_text: &self.filter_text,
            filter_enabled: self.filter_enabled(),
            is_loading: self.is_loading(),
            error: self.error(),
            fetched_at,
            total: self.records.len(),
            detail: self.selected().map(DetailView::new),
        }
    }

    fn begin_load(&mut self) -> Vec<TableEvent> {
        if self.load != LoadStatus::Idle {
            return vec![TableEvent::LoadAlreadyStarted];
        }
        let request = LoadRequestId::new(self.next_request);
        self.next_request += 1;
        self.load = LoadStatus::Loading { request };
        info!(request = request.get(), "record load started");
        vec![TableEvent::LoadStarted(request)]
    }

    fn finish_load(
        &mut self,
        request: LoadRequestId,
        result: Result<RecordBatch, LoadFailure>,
    ) -> Vec<TableEvent> {
        if self.load != (LoadStatus::Loading { request }) {
            debug!(request = request.get(), "ignoring stale load completion");
            return vec![TableEvent::StaleLoadIgnored(request)];
        }

        match result {
            Ok(batch) => {
                let count = batch.records.len();
                self.records = batch.records;
                self.displayed = (0..count).collect();
                self.selected = None;
                self.load = LoadStatus::Loaded {
                    fetched_at: batch.fetched_at,
                };
                info!(request = request.get(), count, "records loaded");
                vec![TableEvent::RecordsLoaded { count }]
            }
            Err(failure) => {
                warn!(request = request.get(), error = %failure, "record load failed");
                let message = failure.user_message();
                self.load = LoadStatus::Failed {
                    message: message.clone(),
                };
                vec![TableEvent::LoadFailed { message }]
            }
        }
    }

    // Inert until records are loaded.
    fn sort(&mut self, field: RecordField) -> Vec<TableEvent> {
        if !matches!(self.load, LoadStatus::Loaded { .. }) {
            debug!(field = field.as_str(), "sort ignored; no records loaded");
            return Vec::new();
        }
        let direction = match self.sort {
            Some(current) if current.field == field => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        let spec = SortSpec { field, direction };
        self.sort = Some(spec);

        let records = &self.records;
        self.displayed
            .sort_by(|left, right| field.compare(direction, &records[*left], &records[*right]));
        debug!(
            field = field.as_str(),
            direction = direction.as_str(),
            rows = self.displayed.len(),
            "sorted"
        );
        vec![TableEvent::Sorted(spec)]
    }

    fn edit_filter(&mut self, edit: impl FnOnce(&mut String)) -> Vec<TableEvent> {
        if !self.filter_enabled() {
            return vec![TableEvent::FilterUnavailable];
        }
        edit(&mut self.filter_text);
        vec![TableEvent::FilterTextChanged]
    }

    // Always restarts from the full set; the previous sort order is dropped.
    fn apply_filter(&mut self) -> Vec<TableEvent> {
        if !self.filter_enabled() {
            return vec![TableEvent::FilterUnavailable];
        }
        let query = self.filter_text.as_str();
        self.displayed = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.matches_query(query))
            .map(|(index, _)| index)
            .collect();
        let matched = self.displayed.len();
        let total = self.records.len();
        debug!(query, matched, total, "filter applied");
        vec![TableEvent::FilterApplied { matched, total }]
    }

    fn select(&mut self, row: usize) -> Vec<TableEvent> {
        let Some(index) = self.displayed.get(row).copied() else {
            return vec![TableEvent::SelectionRejected { row }];
        };
        self.selected = Some(index);
        let id = self.records[index].id;
        debug!(record = id.get(), "record selected");
        vec![TableEvent::Selected(id)]
    }

    fn deselect(&mut self, signal: Option<CloseSignal>) -> Vec<TableEvent> {
        if self.selected.take().is_none() {
            return Vec::new();
        }
        debug!(
            signal = signal.map_or("deselect", CloseSignal::as_str),
            "detail closed"
        );
        vec![TableEvent::Deselected]
    }
}
