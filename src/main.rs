//! # AMQP Socket-Option Reproduction Probe - Main Entry Point
//!
//! The binary drives one complete diagnostic run:
//!
//! 1. **Initialize logging**: structured logging with tracing, controlled
//!    via `RUST_LOG`
//! 2. **Load configuration**: CLI flags bridged to the documented
//!    environment variables; missing required values are fatal before any
//!    network activity
//! 3. **Report the environment**: the fixed diagnostic block for triage
//! 4. **Run the sync baseline**, then **run the async path** on a dedicated
//!    current-thread runtime entered exactly once
//! 5. **Classify and exit**: 0 = not reproduced, 1 = bug confirmed,
//!    2 = the baseline itself failed (environment/credential problem)
//!
//! Failures inside a test path never abort the process; they are contained
//! there and only influence the final classification.

use std::process;

use amqp_sockopt_repro::{
    cli::{Args, RunConfig},
    client, report, session, verdict,
    roundtrip::TestOutcome,
    Verdict,
};
use anyhow::Result;
use clap::Parser;
use tracing::info;

fn main() {
    // RUST_LOG controls verbosity; the human-facing report goes to stdout
    // regardless of the filter.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            // Configuration absence is fatal and immediate; no socket has
            // been opened at this point.
            eprintln!("ERROR: {err:#}");
            process::exit(Verdict::InfraFailure.exit_code());
        }
    };

    let session_id = session::generate_session_id();
    info!("starting sync/async round-trip comparison, session {}", session_id);
    report::print_environment(&config, &session_id);

    let sync_outcome = client::amqp_sync::run_sync_test(&config, &session_id);
    let async_outcome = run_async_path(&config, &session_id);

    let verdict = verdict::report(&sync_outcome, &async_outcome);
    process::exit(verdict.exit_code());
}

/// Drive the async test to completion on its own single-threaded runtime.
///
/// The runtime exists for exactly this one call; a runtime that cannot
/// start counts against the async path, not the baseline.
fn run_async_path(config: &RunConfig, session_id: &str) -> TestOutcome {
    match async_runtime() {
        Ok(runtime) => runtime.block_on(client::amqp_async::run_async_test(config, session_id)),
        Err(err) => TestOutcome::fail("async", format!("failed to start async runtime: {err:#}")),
    }
}

fn async_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Into::into)
}
