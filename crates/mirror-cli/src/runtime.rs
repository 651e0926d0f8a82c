// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use mirror_app::{LoadFailure, LoadRequestId, RecordBatch};
use mirror_source::{CancelToken, Client};
use mirror_testkit::RecordFaker;
use mirror_tui::{AppRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use time::OffsetDateTime;
use tracing::{debug, info};

pub const DEMO_SEED: u64 = 20_260_101;
pub const DEMO_RECORD_COUNT: usize = 48;

/// Fetches from the configured endpoint on a worker thread.
pub struct HttpRuntime {
    client: Client,
    in_flight: Option<CancelToken>,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_flight: None,
        }
    }
}

impl AppRuntime for HttpRuntime {
    fn load_records(&mut self) -> Result<RecordBatch, LoadFailure> {
        self.client.fetch_records()
    }

    fn spawn_load(&mut self, request: LoadRequestId, tx: Sender<InternalEvent>) -> Result<()> {
        let token = CancelToken::new();
        self.in_flight = Some(token.clone());
        info!(
            request = request.get(),
            endpoint = self.client.endpoint(),
            "spawning record fetch"
        );
        // Detached: the token keeps a late result from reaching a closed UI.
        let _worker = self.client.spawn_fetch(token, move |result| {
            let _ = tx.send(InternalEvent::LoadFinished { request, result });
        });
        Ok(())
    }

    fn cancel_load(&mut self) -> Result<()> {
        if let Some(token) = self.in_flight.take() {
            debug!("cancelling in-flight record fetch");
            token.cancel();
        }
        Ok(())
    }
}

/// Serves seeded fake records instead of touching the network.
pub struct DemoRuntime {
    faker: RecordFaker,
    count: usize,
}

impl DemoRuntime {
    pub fn new(seed: u64, count: usize) -> Self {
        Self {
            faker: RecordFaker::new(seed),
            count,
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn load_records(&mut self) -> Result<RecordBatch, LoadFailure> {
        Ok(RecordBatch {
            records: self.faker.records(self.count),
            fetched_at: OffsetDateTime::now_utc(),
        })
    }
}
