// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use mirror_app::{LoadFailure, LoadFailureReason, Record, RecordBatch};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://www.filltext.com/?rows=32&id={number|1000}&firstName={firstName}&lastName={lastName}&email={email}&phone={phone|(xxx)xxx-xx-xx}&address={addressObject}&description={lorem|32}";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared flag checked by a load worker before it delivers a result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        if timeout.is_zero() {
            bail!("source timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One GET against the endpoint. Any failure, including a body that is
    /// not a JSON array of records, comes back as a single `LoadFailure`.
    pub fn fetch_records(&self) -> std::result::Result<RecordBatch, LoadFailure> {
        let endpoint = self.endpoint.as_str();
        debug!(endpoint, "fetching records");

        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .map_err(|error| connection_failure(endpoint, &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_failure(endpoint, status, &body));
        }

        let body = response
            .bytes()
            .map_err(|error| connection_failure(endpoint, &error))?;
        let records: Vec<Record> = serde_json::from_slice(&body).map_err(|error| {
            LoadFailure::new(
                LoadFailureReason::Decode,
                endpoint,
                format!("decode record list: {error}"),
            )
        })?;

        info!(endpoint, count = records.len(), "fetched records");
        Ok(RecordBatch {
            records,
            fetched_at: OffsetDateTime::now_utc(),
        })
    }

    /// Runs `fetch_records` on a worker thread. `deliver` is skipped when the
    /// token was cancelled before the fetch finished.
    pub fn spawn_fetch<F>(&self, token: CancelToken, deliver: F) -> JoinHandle<()>
    where
        F: FnOnce(std::result::Result<RecordBatch, LoadFailure>) + Send + 'static,
    {
        let client = self.clone();
        thread::spawn(move || {
            let result = client.fetch_records();
            if token.is_cancelled() {
                debug!(endpoint = client.endpoint(), "load cancelled; dropping result");
                return;
            }
            deliver(result);
        })
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("source endpoint must not be empty");
    }
    let url = Url::parse(trimmed).with_context(|| {
        format!("source endpoint {trimmed:?} is not a valid absolute URL")
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!(
            "source endpoint {trimmed:?} uses unsupported scheme {other:?}; use http or https"
        ),
    }
}

fn connection_failure(endpoint: &str, error: &reqwest::Error) -> LoadFailure {
    LoadFailure::new(
        LoadFailureReason::Connect,
        endpoint,
        format!("cannot reach server: {error}"),
    )
}

fn status_failure(endpoint: &str, status: StatusCode, body: &str) -> LoadFailure {
    let body = body.trim();
    let detail = if !body.is_empty() && body.len() < 100 && !body.contains('{') {
        format!("server error ({}): {}", status.as_u16(), body)
    } else {
        format!("server returned {}", status.as_u16())
    };
    LoadFailure::new(LoadFailureReason::Status(status.as_u16()), endpoint, detail)
}
