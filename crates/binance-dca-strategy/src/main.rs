/*
[INPUT]:  CLI arguments, JSON rule file, API credentials, OS shutdown signals
[OUTPUT]: Running recurring-order scheduler with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use binance_dca_adapter::{BinanceClient, ClientConfig, Credentials};
use binance_dca_strategy::{SchedulerLoop, StateStore, validate_document};

#[derive(Parser, Debug)]
#[command(name = "binance-dca", version, about = "Recurring Binance market-order scheduler")]
struct Cli {
    #[arg(long = "rules", value_name = "PATH", default_value = "auto_buy_tickers.json")]
    rules_path: PathBuf,
    #[arg(long = "base-url", value_name = "URL", default_value = "https://api.binance.com")]
    base_url: String,
    #[arg(long = "interval", value_name = "SECONDS", default_value_t = 10)]
    quantum_secs: u64,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        rules_path = %args.rules_path.display(),
        base_url = %args.base_url,
        dry_run = args.dry_run,
        "starting binance-dca"
    );

    let mut client =
        BinanceClient::with_config_and_base_url(ClientConfig::default(), &args.base_url)
            .context("build exchange client")?;
    client.ping().await.context("exchange connectivity check")?;

    let store = StateStore::new(args.rules_path.clone());
    let document = store.load_document().await?;

    let exchange_info = client
        .exchange_info()
        .await
        .context("fetch exchange metadata")?;
    let book = validate_document(&document, &exchange_info.tradable_symbols())
        .map_err(|report| anyhow!("rule file rejected:\n{report}"))?;
    info!(rule_count = book.tickers.len(), "rule file validated");

    if args.dry_run {
        info!("dry-run requested; rule file validated");
        return Ok(());
    }

    client.set_credentials(resolve_credentials()?);

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let scheduler = SchedulerLoop::new(
        client,
        store,
        book,
        Duration::from_secs(args.quantum_secs),
        shutdown,
    );
    scheduler.run().await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// Credentials come from the environment when set, otherwise from hidden
/// interactive prompts. They live only in process memory.
fn resolve_credentials() -> Result<Credentials> {
    let api_key = match std::env::var("BINANCE_API_KEY") {
        Ok(value) if !value.is_empty() => value,
        _ => dialoguer::Password::new()
            .with_prompt("API Key")
            .interact()
            .context("read API key")?,
    };
    let api_secret = match std::env::var("BINANCE_SECRET_KEY") {
        Ok(value) if !value.is_empty() => value,
        _ => dialoguer::Password::new()
            .with_prompt("API Secret key")
            .interact()
            .context("read API secret")?,
    };
    Ok(Credentials::new(api_key, api_secret))
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
