// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use mirror_app::{LoadFailureReason, RecordId};
use mirror_source::{CancelToken, Client};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

const TWO_RECORDS: &str = r#"[
  {"id":1,"firstName":"Boris","lastName":"Young","email":"boris@example.com","phone":"(555)100-00-01",
   "address":{"streetAddress":"1 Oak Ave","city":"Boise","state":"ID","zip":"83702"},"description":"First."},
  {"id":2,"firstName":"Ann","lastName":"Diaz","email":"ann@example.com","phone":"(555)100-00-02",
   "address":{"streetAddress":"2 Elm St","city":"Omaha","state":"NE","zip":"68102"},"description":"Second."}
]"#;

fn serve_once(status: u16, body: &'static str) -> Result<(String, thread::JoinHandle<()>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/users", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/users");
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });
    Ok((addr, handle))
}

#[test]
fn fetch_records_returns_server_order() -> Result<()> {
    let (addr, handle) = serve_once(200, TWO_RECORDS)?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let batch = client.fetch_records()?;
    let ids: Vec<RecordId> = batch.records.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![RecordId::new(1), RecordId::new(2)]);
    assert_eq!(batch.records[1].address.city, "Omaha");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_is_a_status_failure() -> Result<()> {
    let (addr, handle) = serve_once(500, "boom")?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let failure = client
        .fetch_records()
        .expect_err("500 should be a load failure");
    assert_eq!(failure.reason, LoadFailureReason::Status(500));
    assert!(failure.detail.contains("boom"));
    assert!(!failure.user_message().is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_json_is_a_decode_failure() -> Result<()> {
    let (addr, handle) = serve_once(200, r#"{"users":[]}"#)?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let failure = client
        .fetch_records()
        .expect_err("object body should not decode as a record list");
    assert_eq!(failure.reason, LoadFailureReason::Decode);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_endpoint_is_a_connect_failure() -> Result<()> {
    let client = Client::new("http://127.0.0.1:1/users", Duration::from_millis(200))?;
    let failure = client
        .fetch_records()
        .expect_err("unreachable endpoint should fail");
    assert_eq!(failure.reason, LoadFailureReason::Connect);
    assert!(failure.to_string().contains("127.0.0.1:1"));
    Ok(())
}

#[test]
fn spawn_fetch_delivers_result() -> Result<()> {
    let (addr, server) = serve_once(200, TWO_RECORDS)?;

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let (tx, rx) = mpsc::channel();
    let worker = client.spawn_fetch(CancelToken::new(), move |result| {
        let _ = tx.send(result);
    });

    let result = rx.recv_timeout(Duration::from_secs(2))?;
    assert_eq!(result.map(|batch| batch.records.len()), Ok(2));

    worker.join().expect("worker should join");
    server.join().expect("server thread should join");
    Ok(())
}

#[test]
fn spawn_fetch_drops_result_after_cancel() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/users", server.server_addr());
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let server_handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        release_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("test should release the response");
        request
            .respond(Response::from_string(TWO_RECORDS).with_status_code(200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(3))?;
    let token = CancelToken::new();
    let (tx, rx) = mpsc::channel();
    let worker = client.spawn_fetch(token.clone(), move |result| {
        let _ = tx.send(result);
    });

    token.cancel();
    release_tx.send(())?;
    worker.join().expect("worker should join");
    assert!(rx.try_recv().is_err());

    server_handle.join().expect("server thread should join");
    Ok(())
}
