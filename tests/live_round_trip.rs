//! End-to-end round trips against a real broker.
//!
//! These tests mirror what the probe does in production and therefore need
//! broker credentials. When `CONNECTION_STRING`/`QUEUE_NAME` are not set
//! they skip, the same way the probe itself refuses to start without them.

use amqp_sockopt_repro::{
    client, generate_session_id, RunConfig, SockoptPolicy,
};

fn live_config() -> Option<RunConfig> {
    let connection_string = std::env::var("CONNECTION_STRING").ok()?;
    let queue_name = std::env::var("QUEUE_NAME").ok()?;
    if connection_string.trim().is_empty() || queue_name.trim().is_empty() {
        return None;
    }
    Some(RunConfig {
        connection_string,
        queue_name,
        num_messages: 1,
        policy: SockoptPolicy::Strict,
    })
}

#[test]
fn sync_round_trip_against_live_broker() {
    let Some(config) = live_config() else {
        eprintln!("skipping: CONNECTION_STRING/QUEUE_NAME not set");
        return;
    };

    let session_id = generate_session_id();
    let outcome = client::amqp_sync::run_sync_test(&config, &session_id);
    assert!(outcome.passed, "sync round trip failed: {:?}", outcome.rationale);
}

#[test]
fn async_round_trip_against_live_broker() {
    let Some(config) = live_config() else {
        eprintln!("skipping: CONNECTION_STRING/QUEUE_NAME not set");
        return;
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let session_id = generate_session_id();
    let outcome = runtime.block_on(client::amqp_async::run_async_test(&config, &session_id));
    assert!(outcome.passed, "async round trip failed: {:?}", outcome.rationale);
}
