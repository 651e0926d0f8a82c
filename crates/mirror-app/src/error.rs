// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailureReason {
    Connect,
    Status(u16),
    Decode,
}

/// Any inability to obtain the record collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("load records from {endpoint}: {detail}")]
pub struct LoadFailure {
    pub reason: LoadFailureReason,
    pub endpoint: String,
    pub detail: String,
}

impl LoadFailure {
    pub fn new(reason: LoadFailureReason, endpoint: &str, detail: impl Into<String>) -> Self {
        Self {
            reason,
            endpoint: endpoint.to_owned(),
            detail: detail.into(),
        }
    }

    pub fn user_message(&self) -> String {
        let cause = match self.reason {
            LoadFailureReason::Connect => "server unreachable".to_owned(),
            LoadFailureReason::Status(code) => format!("server answered {code}"),
            LoadFailureReason::Decode => "response is not a record list".to_owned(),
        };
        format!("could not load records ({cause}); try again later")
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadFailure, LoadFailureReason};

    #[test]
    fn user_message_names_the_status() {
        let failure = LoadFailure::new(
            LoadFailureReason::Status(500),
            "http://127.0.0.1:1/users",
            "internal error",
        );
        let message = failure.user_message();
        assert!(message.contains("500"));
        assert!(message.contains("try again later"));
    }

    #[test]
    fn display_includes_endpoint_and_detail() {
        let failure = LoadFailure::new(LoadFailureReason::Decode, "http://host/x", "bad json");
        assert_eq!(failure.to_string(), "load records from http://host/x: bad json");
    }
}
