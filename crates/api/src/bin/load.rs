//! `superheroes-load [all | id <n>]`
//!
//! Creates the database if needed, applies migrations, then fetches the
//! catalog and writes it to the three hero tables.

use std::process::ExitCode;

use clap::Parser;
use superheroes_api::config::LoadConfig;
use superheroes_api::ingest::{self, IngestError, LoadSummary};
use superheroes_core::types::DbId;
use superheroes_source::{HeroSelector, HeroSourceClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(clap::Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Load the superhero catalog into the database",
    long_about = None
)]
struct Cli {
    /// Catalog endpoint: `all` or `id`.
    #[arg(default_value = "all")]
    endpoint: String,

    /// Hero id, required with `id`.
    id: Option<DbId>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "superheroes_api=debug,superheroes_db=debug,superheroes_source=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = LoadConfig::from_env();

    match run(&cli, &config).await {
        Ok(summary) => {
            tracing::info!(
                heroes = summary.heroes,
                stats = summary.stats,
                affiliations = summary.affiliations,
                "Load complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Load failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &LoadConfig) -> Result<LoadSummary, IngestError> {
    let selector = HeroSelector::from_str(&cli.endpoint, cli.id)?;

    superheroes_db::ensure_database(&config.database_url).await?;
    let pool = superheroes_db::create_pool(&config.database_url).await?;
    superheroes_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let client = HeroSourceClient::new(config.api_url.as_str());
    ingest::load_catalog(&pool, &client, selector).await
}
