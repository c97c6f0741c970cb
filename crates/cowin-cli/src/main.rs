//! cowin-alert - watches CoWIN for bookable vaccination sessions.

/// Application configuration (JSON or TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cowin_api::CowinClient;
use cowin_watch::{AlertPlayer, AlertSink, Watcher, resolve_region};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::AppConfig;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Config file (JSON, or TOML when the extension is `.toml`).
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Check every window once and exit instead of polling.
    #[arg(long)]
    once: bool,
}

/// Waits for Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Resolves the configured region and polls until interrupted.
///
/// # Errors
///
/// Returns an error if the region cannot be resolved or polling fails.
#[instrument(skip_all)]
async fn run<P: AlertPlayer>(cli: &Cli, config: &AppConfig, sink: &AlertSink<P>) -> Result<()> {
    let settings = config
        .to_settings()
        .context("invalid repeat_after_mins")?;
    let base_url = config.base_url().context("invalid api_base_url")?;

    let client = CowinClient::builder()
        .base_url(base_url)
        .timeout(config.request_timeout())
        .build()
        .context("failed to build CoWIN client")?;

    let region = resolve_region(&client, &config.region())
        .await
        .context("failed to resolve region")?;

    tracing::info!(
        min_age = settings.filter.min_age(),
        weeks = settings.weeks_to_check,
        repeat_after_secs = settings.repeat_after.as_secs_f64(),
        output = %sink.output_file().display(),
        "Watching {}, {}",
        region.region.district_name,
        region.region.state_name
    );

    let mut watcher = Watcher::new(&client, sink, region, settings, Local::now().date_naive());
    if cli.once {
        watcher
            .run_iteration()
            .await
            .context("failed to check vaccine availability")?;
        return Ok(());
    }

    watcher
        .run_until(ctrl_c())
        .await
        .context("failed to check vaccine availability")
}

/// Entry point.
///
/// # Errors
///
/// Returns the first fatal error after it has been reported to the user.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config);
    let sink = AlertSink::new(config.output_file.clone(), config.player());

    if let Err(err) = run(&cli, &config, &sink).await {
        sink.on_fatal_error(&err);
        return Err(err);
    }
    Ok(())
}
