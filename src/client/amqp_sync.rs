//! Synchronous round trip through the blocking AMQP client.
//!
//! This is the baseline: it is expected to work everywhere, including the
//! containerized environments where the async path fails. Every call here
//! blocks to completion.

use std::time::{Duration, Instant};

use amiquip::{
    AmqpProperties, Connection, Consumer, ConsumerMessage, ConsumerOptions, Exchange, Publish,
    QueueDeclareOptions,
};
use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::RunConfig;
use crate::client::{belongs_to_session, REDELIVERY_BACKOFF_MS};
use crate::roundtrip::{self, TestOutcome};
use crate::sockopt::{self, BrokerEndpoint};

/// Run the sync test path. Failures never propagate past this function.
pub fn run_sync_test(config: &RunConfig, session_id: &str) -> TestOutcome {
    println!("--- Test 1: sync send/receive (blocking AMQP client) ---");
    roundtrip::contain("sync", sync_round_trip(config, session_id))
}

fn sync_round_trip(config: &RunConfig, session_id: &str) -> Result<()> {
    let endpoint = BrokerEndpoint::parse(&config.connection_string)?;
    sockopt::preflight(&endpoint, config.policy)?;

    let mut connection = Connection::insecure_open(&config.connection_string)
        .context("failed to open blocking AMQP connection")?;
    let result = send_and_receive(&mut connection, config, session_id);
    // Close on every exit path; a close failure only surfaces when the
    // round trip itself held.
    let closed = connection
        .close()
        .context("failed to close blocking AMQP connection");
    result.and(closed)
}

fn send_and_receive(connection: &mut Connection, config: &RunConfig, session_id: &str) -> Result<()> {
    let channel = connection
        .open_channel(None)
        .context("failed to open channel")?;
    let queue = channel
        .queue_declare(config.queue_name.as_str(), QueueDeclareOptions::default())
        .with_context(|| format!("failed to declare queue '{}'", config.queue_name))?;
    let exchange = Exchange::direct(&channel);
    let consumer = queue
        .consume(ConsumerOptions::default())
        .context("failed to open consumer")?;

    for index in 0..config.num_messages {
        let body = roundtrip::message_body("sync", session_id, index, config.num_messages);
        let properties = AmqpProperties::default().with_correlation_id(session_id.to_owned());
        exchange
            .publish(Publish::with_properties(
                body.as_bytes(),
                config.queue_name.as_str(),
                properties,
            ))
            .with_context(|| format!("failed to publish '{}'", body))?;
        debug!("sent '{}'", body);

        let received =
            receive_for_session(&consumer, session_id, crate::defaults::RECEIVE_WAIT)?;
        roundtrip::verify_delivery(&body, received.as_deref())?;
        println!("  round trip ok: '{}'", body);
    }

    Ok(())
}

/// Wait up to `max_wait` for a delivery that belongs to this session.
///
/// Foreign-session deliveries are requeued and the wait continues against
/// the original deadline. `None` means nothing of ours arrived in time.
fn receive_for_session(
    consumer: &Consumer<'_>,
    session_id: &str,
    max_wait: Duration,
) -> Result<Option<String>> {
    let deadline = Instant::now() + max_wait;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        match consumer.receiver().recv_timeout(remaining) {
            Ok(ConsumerMessage::Delivery(delivery)) => {
                let body = String::from_utf8_lossy(&delivery.body).into_owned();
                if belongs_to_session(&body, session_id) {
                    consumer.ack(delivery).context("failed to ack delivery")?;
                    return Ok(Some(body));
                }
                debug!("requeueing foreign-session delivery '{}'", body);
                consumer
                    .nack(delivery, true)
                    .context("failed to requeue delivery")?;
                std::thread::sleep(Duration::from_millis(REDELIVERY_BACKOFF_MS));
            }
            Ok(_) => {
                debug!("consumer signalled a non-delivery event, treating as no delivery");
                return Ok(None);
            }
            // Timed out; the bounded wait yields an empty result.
            Err(_) => return Ok(None),
        }
    }
}
