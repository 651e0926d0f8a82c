// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

use crate::ids::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub description: String,
}

/// A fetched record collection, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub fetched_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Borrowed value of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Text orders by UTF-16 code units, so characters outside the BMP sort
    /// below U+E000..=U+FFFF the way browser string comparison does.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right)) => {
                left.encode_utf16().cmp(right.encode_utf16())
            }
            (Self::Int(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Int(_)) => Ordering::Greater,
        }
    }

    /// `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Self::Int(value) => value.to_string().contains(needle),
            Self::Text(value) => value.to_lowercase().contains(needle),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(value) => (*value).to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordField {
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Description,
    StreetAddress,
    City,
    State,
    Zip,
}

impl RecordField {
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Description,
        Self::StreetAddress,
        Self::City,
        Self::State,
        Self::Zip,
    ];

    /// Fields shown as table columns, in column order.
    pub const COLUMNS: [Self; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Description => "description",
            Self::StreetAddress => "streetAddress",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Description => "Description",
            Self::StreetAddress => "Street",
            Self::City => "City",
            Self::State => "State",
            Self::Zip => "Zip",
        }
    }

    pub fn value(self, record: &Record) -> FieldValue<'_> {
        match self {
            Self::Id => FieldValue::Int(record.id.get()),
            Self::FirstName => FieldValue::Text(&record.first_name),
            Self::LastName => FieldValue::Text(&record.last_name),
            Self::Email => FieldValue::Text(&record.email),
            Self::Phone => FieldValue::Text(&record.phone),
            Self::Description => FieldValue::Text(&record.description),
            Self::StreetAddress => FieldValue::Text(&record.address.street_address),
            Self::City => FieldValue::Text(&record.address.city),
            Self::State => FieldValue::Text(&record.address.state),
            Self::Zip => FieldValue::Text(&record.address.zip),
        }
    }

    pub fn compare(self, direction: SortDirection, left: &Record, right: &Record) -> Ordering {
        direction.apply(self.value(left).compare(&self.value(right)))
    }
}

impl Record {
    /// True when any field contains `query`, ignoring case. Empty queries match.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        RecordField::ALL
            .iter()
            .any(|field| field.value(self).contains_lowercase(&needle))
    }
}
