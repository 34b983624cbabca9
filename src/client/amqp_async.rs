//! Asynchronous round trip through the futures-based AMQP client.
//!
//! Identical sequencing and verification to the sync path, but every
//! network operation is a suspension point. The whole test runs as one
//! cooperative task; nothing here overlaps with anything else.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions,
    QueueDeclareOptions,
};
use lapin::types::{FieldTable, ShortString};
use lapin::{BasicProperties, Connection, ConnectionProperties, Consumer};
use tokio::time::timeout;
use tracing::debug;

use crate::cli::RunConfig;
use crate::client::{belongs_to_session, REDELIVERY_BACKOFF_MS};
use crate::roundtrip::{self, TestOutcome};
use crate::sockopt::{self, BrokerEndpoint, SockoptPolicy};

/// Run the async test path. Failures never propagate past this function.
pub async fn run_async_test(config: &RunConfig, session_id: &str) -> TestOutcome {
    println!("--- Test 2: async send/receive (futures AMQP client) ---");
    roundtrip::contain("async", async_round_trip(config, session_id).await)
}

async fn async_round_trip(config: &RunConfig, session_id: &str) -> Result<()> {
    let endpoint = BrokerEndpoint::parse(&config.connection_string)?;
    preflight_off_thread(endpoint, config.policy).await?;

    let connection = Connection::connect(
        &config.connection_string,
        ConnectionProperties::default(),
    )
    .await
    .context("failed to open async AMQP connection")?;
    let result = send_and_receive(&connection, config, session_id).await;
    let closed = connection
        .close(200, "diagnostic complete")
        .await
        .context("failed to close async AMQP connection");
    result.and(closed)
}

/// The preflight dial blocks; keep it off the cooperative thread.
async fn preflight_off_thread(endpoint: BrokerEndpoint, policy: SockoptPolicy) -> Result<()> {
    tokio::task::spawn_blocking(move || sockopt::preflight(&endpoint, policy))
        .await
        .context("preflight task failed")?
}

async fn send_and_receive(
    connection: &Connection,
    config: &RunConfig,
    session_id: &str,
) -> Result<()> {
    let channel = connection
        .create_channel()
        .await
        .context("failed to open channel")?;
    channel
        .queue_declare(
            &config.queue_name,
            QueueDeclareOptions::default(),
            FieldTable::default(),
        )
        .await
        .with_context(|| format!("failed to declare queue '{}'", config.queue_name))?;
    let consumer_tag = format!("repro-async-{}", session_id);
    let mut consumer = channel
        .basic_consume(
            &config.queue_name,
            &consumer_tag,
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .context("failed to open consumer")?;

    for index in 0..config.num_messages {
        let body = roundtrip::message_body("async", session_id, index, config.num_messages);
        let properties =
            BasicProperties::default().with_correlation_id(ShortString::from(session_id.to_owned()));
        channel
            .basic_publish(
                "",
                &config.queue_name,
                BasicPublishOptions::default(),
                body.as_bytes(),
                properties,
            )
            .await
            .with_context(|| format!("failed to publish '{}'", body))?;
        debug!("sent '{}'", body);

        let received =
            receive_for_session(&mut consumer, session_id, crate::defaults::RECEIVE_WAIT).await?;
        roundtrip::verify_delivery(&body, received.as_deref())?;
        println!("  round trip ok: '{}'", body);
    }

    Ok(())
}

/// Wait up to `max_wait` for a delivery that belongs to this session.
///
/// Mirrors the sync receive loop: foreign-session deliveries are requeued,
/// and an elapsed wait yields an empty result rather than an error.
async fn receive_for_session(
    consumer: &mut Consumer,
    session_id: &str,
    max_wait: Duration,
) -> Result<Option<String>> {
    let deadline = Instant::now() + max_wait;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        match timeout(remaining, consumer.next()).await {
            // Bounded wait elapsed with nothing delivered.
            Err(_) => return Ok(None),
            // Consumer stream ended; nothing more will arrive.
            Ok(None) => return Ok(None),
            Ok(Some(delivery)) => {
                let delivery = delivery.context("consumer stream failed")?;
                let body = String::from_utf8_lossy(&delivery.data).into_owned();
                if belongs_to_session(&body, session_id) {
                    delivery
                        .ack(BasicAckOptions::default())
                        .await
                        .context("failed to ack delivery")?;
                    return Ok(Some(body));
                }
                debug!("requeueing foreign-session delivery '{}'", body);
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..BasicNackOptions::default()
                    })
                    .await
                    .context("failed to requeue delivery")?;
                tokio::time::sleep(Duration::from_millis(REDELIVERY_BACKOFF_MS)).await;
            }
        }
    }
}
