use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use stock_dashboard::{
    build_dashboard,
    config::DashboardConfig,
    export::FILE_NAME,
    input::DashboardQuery,
    server::{AppState, serve},
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stock indicator dashboard")]
struct Cli {
    /// Path to the config file (dashboard.toml); defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        /// Listen address, overrides [server].bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch a range and write the table to disk
    Export {
        #[arg(long)]
        ticker: Option<String>,

        /// Start date, YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// End date (exclusive), YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,

        /// Output file for xlsx (default `download.xlsx`), output directory for
        /// feather (default `<tmp>/market_data_ingestor`)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Xlsx)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Feather,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = DashboardConfig::load(cli.config.as_deref())
        .context("failed to load dashboard config")?;
    let dashboard = build_dashboard(&config).context("failed to create market data provider")?;

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            serve(listener, AppState::new(dashboard)).await?;
        }
        Commands::Export {
            ticker,
            start,
            end,
            out,
            format,
        } => {
            let req = DashboardQuery::new(ticker, start, end)
                .validate(&config.app, Local::now().date_naive())?;

            match format {
                Format::Xlsx => {
                    let out = out.unwrap_or_else(|| PathBuf::from(FILE_NAME));
                    let bytes = dashboard.export(&req).await?;
                    tokio::fs::write(&out, &bytes)
                        .await
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    info!(ticker = %req.ticker, bytes = bytes.len(), "wrote spreadsheet");
                    println!("{}", out.display());
                }
                Format::Feather => write_feather(&dashboard, &req, out).await?,
            }
        }
    }

    Ok(())
}

#[cfg(feature = "feather")]
async fn write_feather(
    dashboard: &stock_dashboard::dashboard::Dashboard,
    req: &stock_dashboard::input::ValidatedRequest,
    dir: Option<PathBuf>,
) -> Result<()> {
    use market_data_ingestor::io::{dataframe::FeatherSink, sink::DataSink};

    let sink = dir.map(FeatherSink::new).unwrap_or_else(FeatherSink::in_temp_dir);
    let series = dashboard.fetch_series(req).await?;
    let paths = sink.write(&[series]).await?;
    info!(ticker = %req.ticker, dir = %sink.dir().display(), "wrote feather");
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(not(feature = "feather"))]
async fn write_feather(
    _dashboard: &stock_dashboard::dashboard::Dashboard,
    _req: &stock_dashboard::input::ValidatedRequest,
    _dir: Option<PathBuf>,
) -> Result<()> {
    anyhow::bail!("feather output requires building with `--features feather`")
}
