//! Example binary demonstrating the tfc_endpoints library.
//!
//! Queues a run on a workspace, waits for the plan, then either applies or
//! discards it.
//!
//! ## Usage
//!
//! 1. Create a `.env` file with `TFC_TOKEN` and `TFC_WORKSPACE_ID`
//! 2. Run: `cargo run` (discards the plan) or `TFC_APPLY=true cargo run`
//! 3. `RUST_LOG=tfc_endpoints=debug` shows every request and poll attempt

#![allow(clippy::print_stdout)] // Allow println! in the binary example

use tfc_endpoints::tfc_config::parse_bool_env;
use tfc_endpoints::{PageParams, RunCreatePayload, RunTimestamp, Tfc, TfcConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration from environment
    let cfg = TfcConfig::from_env()?;
    let workspace_id = std::env::var("TFC_WORKSPACE_ID")
        .map_err(|_| "missing required env var: TFC_WORKSPACE_ID")?;
    let apply = parse_bool_env("TFC_APPLY", false)?;
    println!("Configuration loaded:");
    println!("  API: {}", cfg.api_url());
    println!("  Workspace: {workspace_id}");

    let api = Tfc::new(cfg)?;

    let payload = RunCreatePayload::new(&workspace_id).message("Queued by tfc_endpoints example");
    let run = api.runs().create(&payload.to_document()).await?;
    let run_id = run.data.id;
    println!("\nRun created: {run_id}");

    let runs = api.runs().list(&workspace_id, PageParams::new(0, 50)).await?;
    println!("  Listed among {} recent runs: {}", runs.data.len(), runs.find(&run_id).is_some());

    println!("\nWaiting on plan...");
    let poller = api.run_poller();
    let planned = poller.wait_until_confirmable(&run_id).await?;
    println!("  Plan finished after {} checks", planned.attempts);

    if apply {
        api.runs().apply(&run_id, Some("Applied by tfc_endpoints example")).await?;
        let at = poller.wait_for_timestamp(&run_id, RunTimestamp::Applying).await?;
        println!("\nApplying since {at}");
    } else {
        api.runs().discard(&run_id, Some("Discarded by tfc_endpoints example")).await?;
        let at = poller.wait_for_timestamp(&run_id, RunTimestamp::Discarded).await?;
        println!("\nDiscarded at {at}");
    }

    Ok(())
}
