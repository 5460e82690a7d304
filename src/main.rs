use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use playerwatch::notify::{LogSink, NotificationSink, WebhookSink};
use playerwatch::{
    Extractor, Scheduler, SchedulerConfig, Settings, TimeSeriesStore, WebDriverLauncher,
};

#[derive(Parser, Debug)]
#[command(name = "playerwatch")]
#[command(about = "Post rolling player count statistics for a game server to a webhook")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "playerwatch.toml")]
    config: PathBuf,

    /// Override the polling interval (e.g., "1h", "15m")
    #[arg(short, long)]
    interval: Option<String>,

    /// Override the stats file location
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Log reports instead of posting them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(&args.config)?;
    if let Some(interval) = args.interval {
        settings.interval = interval;
    }
    if let Some(stats_file) = args.stats_file {
        settings.stats_file = stats_file;
    }

    let scheduler_config = SchedulerConfig {
        interval: settings.interval()?,
        cycle_timeout: settings.cycle_timeout()?,
    };

    let launcher = WebDriverLauncher::builder()
        .webdriver_url(settings.webdriver_url.as_str())
        .user_agent(settings.user_agent.as_str())
        .build();
    let extractor = Extractor::new(Box::new(launcher), settings.extractor_config()?);
    let store = TimeSeriesStore::load(&settings.stats_file);
    let sink = build_sink(&settings, args.dry_run)?;

    info!(
        "playerwatch v{} watching {}",
        env!("CARGO_PKG_VERSION"),
        settings.target_url()
    );

    let mut scheduler = Scheduler::new(
        extractor,
        store,
        sink,
        settings.target_url(),
        settings.server_name.as_str(),
        scheduler_config,
    );

    if args.once {
        scheduler.tick().await;
        scheduler.shutdown().await;
        return Ok(());
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown requested");
        let _ = stop_tx.send(true);
    });

    scheduler.run(stop_rx).await;
    Ok(())
}

/// Pick the webhook sink, or the log sink for dry runs and missing URLs.
fn build_sink(settings: &Settings, dry_run: bool) -> Result<Box<dyn NotificationSink>> {
    if dry_run {
        return Ok(Box::new(LogSink));
    }

    match settings.webhook_url() {
        Some(url) => {
            let sink = WebhookSink::builder()
                .url(url)
                .timeout(settings.delivery_timeout()?)
                .build()?;
            Ok(Box::new(sink))
        }
        None => {
            warn!("No webhook_url configured, reports will only be logged");
            Ok(Box::new(LogSink))
        }
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "Could not listen for SIGTERM"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
