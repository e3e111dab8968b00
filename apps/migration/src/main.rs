//! Migration CLI tool.

use pancake_infra::{TelemetryConfig, init_telemetry};
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());
    tracing::info!("Running blog schema migrations");

    cli::run_cli(migration::Migrator).await;
}
