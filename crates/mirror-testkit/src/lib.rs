// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use mirror_app::{Address, Record, RecordBatch, RecordId};
use time::OffsetDateTime;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const EMAIL_DOMAINS: [&str; 5] = [
    "example.com",
    "example.org",
    "mail.test",
    "inbox.test",
    "post.example",
];

const CITIES: [&str; 14] = [
    "Austin",
    "Seattle",
    "Denver",
    "Madison",
    "Raleigh",
    "Pittsburgh",
    "Portland",
    "Boise",
    "Phoenix",
    "Nashville",
    "Columbus",
    "Minneapolis",
    "Omaha",
    "Tucson",
];
const STATES: [&str; 14] = [
    "TX", "WA", "CO", "WI", "NC", "PA", "OR", "ID", "AZ", "TN", "OH", "MN", "NE", "UT",
];
const STREET_NAMES: [&str; 18] = [
    "Cedar",
    "Maple",
    "Oak",
    "Pine",
    "Willow",
    "Elm",
    "Birch",
    "Juniper",
    "Sunset",
    "Ridge",
    "Valley",
    "Lakeview",
    "Northview",
    "Hillcrest",
    "Brookside",
    "Meadow",
    "Aspen",
    "Canyon",
];
const STREET_SUFFIXES: [&str; 6] = ["St", "Ave", "Rd", "Ln", "Dr", "Ct"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for records shaped like the endpoint's payload.
#[derive(Debug, Clone)]
pub struct RecordFaker {
    rng: DeterministicRng,
    seed: u64,
    next_id: i64,
}

impl RecordFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            next_id: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn record(&mut self) -> Record {
        let id = self.next_id;
        self.next_id += 1;

        let first_name = self.pick(&FIRST_NAMES).to_owned();
        let last_name = self.pick(&LAST_NAMES).to_owned();
        let email = format!(
            "{}.{}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            self.pick(&EMAIL_DOMAINS)
        );
        let phone = format!(
            "({:03}){:03}-{:02}-{:02}",
            self.int_range(200, 999),
            self.int_range(100, 999),
            self.int_range(0, 99),
            self.int_range(0, 99),
        );
        let address = Address {
            street_address: format!(
                "{} {} {}",
                self.int_range(1, 9999),
                self.pick(&STREET_NAMES),
                self.pick(&STREET_SUFFIXES)
            ),
            city: self.pick(&CITIES).to_owned(),
            state: self.pick(&STATES).to_owned(),
            zip: format!("{:05}", self.int_range(10_000, 99_999)),
        };
        let description = self.sentence(6, 14);

        Record {
            id: RecordId::new(id),
            first_name,
            last_name,
            email,
            phone,
            address,
            description,
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.record()).collect()
    }

    pub fn batch(&mut self, count: usize) -> RecordBatch {
        RecordBatch {
            records: self.records(count),
            fetched_at: fixture_datetime(),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.rng.next_u64() % (max - min + 1)
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        const WORDS: [&str; 24] = [
            "lorem",
            "ipsum",
            "dolor",
            "sit",
            "amet",
            "consectetur",
            "adipiscing",
            "elit",
            "sed",
            "tempor",
            "incididunt",
            "labore",
            "magna",
            "aliqua",
            "veniam",
            "nostrud",
            "exercitation",
            "ullamco",
            "laboris",
            "nisi",
            "aliquip",
            "commodo",
            "consequat",
            "fugiat",
        ];

        let count = self.int_range(min_words as u64, max_words as u64) as usize;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// Minimal record with only identity fields populated.
pub fn named_record(id: i64, first_name: &str, last_name: &str) -> Record {
    Record {
        id: RecordId::new(id),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: String::new(),
        phone: String::new(),
        address: Address {
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
        },
        description: String::new(),
    }
}

pub fn fixture_datetime() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH
}
