// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use salesmart::{clean, config::StoreSettings, ingest, publish, transform, validate};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Flat-file sales ingestion into a star-schema Postgres mart"
)]
struct Args {
    /// Sales CSV to ingest.
    #[arg(short, long)]
    input: String,

    /// Run every stage except publishing.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    info!(input = %args.input, dry_run = args.dry_run, "startup");

    // ─── 2) read ─────────────────────────────────────────────────────
    let raw = ingest::read_sales_csv(&args.input)?;

    // ─── 3) clean + dedupe ───────────────────────────────────────────
    let cleaned = clean::clean_rows(raw, &clean::REQUIRED_ID_FIELDS)?;

    // ─── 4) re-check identifiers ─────────────────────────────────────
    let validated = validate::validate_records(cleaned);

    // ─── 5) build the star schema ────────────────────────────────────
    let tables = transform::transform_records(&validated)?;
    info!(
        products = tables.product_dim.len(),
        retailers = tables.retailer_dim.len(),
        dates = tables.date_dim.len(),
        facts = tables.sales_fact.len(),
        "star schema built"
    );

    // ─── 6) publish ──────────────────────────────────────────────────
    if args.dry_run {
        info!("dry run; skipping publish");
        return Ok(());
    }
    let settings = StoreSettings::from_env().context("resolving store settings")?;
    publish::publish_tables(&tables, &settings).await?;

    info!("all done");
    Ok(())
}
