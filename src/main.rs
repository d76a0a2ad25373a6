use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use video_case_api::api::{self, AppState};
use video_case_api::checker::ExistenceChecker;
use video_case_api::{config, db};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file. A missing default file means built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(args.config.as_deref(), args.config.is_some())
        .context("failed to load configuration")?;

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database.url.clone());
    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let checker = ExistenceChecker::from_config(&cfg.youtube)?;
    if !checker.has_credential() {
        warn!(
            "{} not set; video checks run in degraded mode",
            config::API_KEY_ENV
        );
    }

    let state = AppState {
        pool,
        checker,
        default_channel_id: cfg.youtube.channel_id.clone(),
    };
    let json_limit = cfg.server.json_limit_bytes;

    info!(host = %cfg.server.host, port = cfg.server.port, "starting case registry API");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(api::json_config(json_limit))
            .app_data(web::Data::new(state.clone()))
            .service(api::configure_routes())
    })
    .bind((cfg.server.host.as_str(), cfg.server.port))
    .with_context(|| format!("failed to bind {}:{}", cfg.server.host, cfg.server.port))?
    .run()
    .await?;

    Ok(())
}
