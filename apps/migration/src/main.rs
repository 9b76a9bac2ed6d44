//! Command-line runner for the blog schema migrations.
//!
//! Connects to `DATABASE_URL` (environment or `.env`), for example
//! `cargo run -p migration -- up` or `cargo run -p migration -- status`.

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Running Quill schema migrations");
    cli::run_cli(migration::Migrator).await;
}
