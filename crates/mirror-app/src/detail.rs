// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Record, RecordField};

/// The three equivalent ways of dismissing the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSignal {
    Button,
    OutsideClick,
    Escape,
}

impl CloseSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::OutsideClick => "outside_click",
            Self::Escape => "escape",
        }
    }
}

const IDENTITY_FIELDS: [RecordField; 5] = [
    RecordField::Id,
    RecordField::FirstName,
    RecordField::LastName,
    RecordField::Email,
    RecordField::Phone,
];

const ADDRESS_FIELDS: [RecordField; 4] = [
    RecordField::StreetAddress,
    RecordField::City,
    RecordField::State,
    RecordField::Zip,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailView<'a> {
    record: &'a Record,
}

impl<'a> DetailView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    pub fn identity(&self) -> Vec<(&'static str, String)> {
        self.section(&IDENTITY_FIELDS)
    }

    pub fn address(&self) -> Vec<(&'static str, String)> {
        self.section(&ADDRESS_FIELDS)
    }

    pub fn description(&self) -> &'a str {
        &self.record.description
    }

    fn section(&self, fields: &[RecordField]) -> Vec<(&'static str, String)> {
        fields
            .iter()
            .map(|field| (field.label(), field.value(self.record).display()))
            .collect()
    }
}
