//! Image Exporter binary.
//!
//! Publishes the image behind every running Docker container as a Prometheus gauge.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use image_exporter::{
    config::{debug_enabled, parse_interval},
    DockerRuntime, Driver, ExporterConfig, ImageCollector, ImageInfoMetrics, PublishMode,
    Publisher, RuntimeClient, DEFAULT_HOST, DEFAULT_PORT,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "image_exporter")]
#[command(about = "Docker container image info exporter for Prometheus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Polls the local Docker daemon and publishes the image of every container as a gauge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Metrics server bind address
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on for Prometheus metrics
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory to write docker_metrics.prom into, used verbatim (disables the HTTP listener if non-empty)
    #[arg(long, alias = "metricsFilePath", default_value = "")]
    metrics_file_path: String,

    /// Interval between collections, e.g. 10s, 1.5s, 1m30s, 500ms
    #[arg(short, long, default_value = "10s", value_parser = interval_arg)]
    interval: Duration,

    /// Enable debug logging (also enabled by DEBUG=true)
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect and publish metrics forever (default)
    Serve,

    /// Run a single collection and print the result
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json, pretty, or prometheus
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

fn interval_arg(value: &str) -> Result<Duration, String> {
    parse_interval(value).map_err(|e| e.to_string())
}

impl Cli {
    fn exporter_config(&self) -> ExporterConfig {
        let mode = PublishMode::select(&self.host, self.port, Some(self.metrics_file_path.as_str()));
        ExporterConfig::new(mode)
            .with_interval(self.interval)
            .with_debug(debug_enabled(self.debug))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.exporter_config();

    init_logging(config.debug)?;
    config.validate()?;

    match &cli.command {
        Some(Commands::Snapshot(args)) => snapshot_command(args).await,
        Some(Commands::Serve) | None => serve_command(config).await,
    }
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn connect_runtime() -> anyhow::Result<Arc<DockerRuntime>> {
    let runtime = DockerRuntime::connect()
        .await
        .context("Error creating Docker client")?;
    Ok(Arc::new(runtime))
}

async fn serve_command(config: ExporterConfig) -> anyhow::Result<()> {
    info!(mode = ?config.mode, interval = ?config.interval, "Starting image exporter");

    let metrics = ImageInfoMetrics::new().context("Error registering metric")?;
    let runtime = connect_runtime().await?;
    if let Err(e) = runtime.ping().await {
        error!(error = %e, "Docker daemon did not answer ping, will retry every cycle");
    }

    let collector = ImageCollector::new(runtime, metrics.clone());
    let publisher = Publisher::from_mode(&config.mode, metrics);
    let server = publisher
        .start()
        .await
        .context("Error starting HTTP server")?;

    let driver = Driver::new(collector, publisher, config.interval);
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let driver_task = tokio::spawn(async move { driver.run(shutdown_rx).await });

    let server_exit = async {
        match server {
            Some(handle) => handle.await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
        }
        result = server_exit => {
            result.context("Metrics server task panicked")??;
            anyhow::bail!("Metrics server exited unexpectedly");
        }
    }

    let _ = shutdown_tx.send(());
    driver_task.await.context("Collection loop panicked")?;

    Ok(())
}

async fn snapshot_command(args: &SnapshotArgs) -> anyhow::Result<()> {
    let metrics = ImageInfoMetrics::new()?;
    let collector = ImageCollector::new(connect_runtime().await?, metrics.clone());

    match args.format.as_str() {
        "json" => {
            let records = collector.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "pretty" => {
            let records = collector.snapshot().await?;
            println!("{:<32} {:<24} {}", "CONTAINER", "IMAGE ID", "REPOSITORY");
            for record in &records {
                println!(
                    "{:<32} {:<24} {}",
                    record.container_name,
                    short_id(&record.image_id),
                    record.image_repo
                );
            }
        }
        "prometheus" => {
            collector.collect().await?;
            print!("{}", metrics.render()?);
        }
        other => {
            anyhow::bail!("Unsupported format: {other}. Use 'json', 'pretty' or 'prometheus'");
        }
    }

    Ok(())
}

/// Shorten `sha256:<hex>` ids the way `docker ps` does.
fn short_id(id: &str) -> &str {
    let hex = id.strip_prefix("sha256:").unwrap_or(id);
    hex.get(..12).unwrap_or(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["image_exporter", "--port", "9090", "--interval", "30s"]).unwrap();
        assert_eq!(cli.port, 9090);
        assert_eq!(cli.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["image_exporter"]).unwrap();
        assert_eq!(cli.port, DEFAULT_PORT);
        assert_eq!(cli.interval, Duration::from_secs(10));
        assert_eq!(cli.host, "0.0.0.0");
        assert!(cli.metrics_file_path.is_empty());
        assert!(!cli.exporter_config().mode.is_file());
    }

    #[test]
    fn test_metrics_file_path_selects_file_mode() {
        let cli = Cli::try_parse_from(["image_exporter", "--metricsFilePath", "/tmp/m"]).unwrap();
        let config = cli.exporter_config();
        assert!(config.mode.is_file());
        assert_eq!(
            config.metrics_file_path().unwrap(),
            std::path::PathBuf::from("/tmp/m/docker_metrics.prom")
        );
    }

    #[test]
    fn test_compound_interval_accepted() {
        let cli = Cli::try_parse_from(["image_exporter", "--interval", "1m30s"]).unwrap();
        assert_eq!(cli.interval, Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert!(Cli::try_parse_from(["image_exporter", "--interval", "0s"]).is_err());
    }

    #[test]
    fn test_snapshot_subcommand() {
        let cli = Cli::try_parse_from(["image_exporter", "snapshot", "--format", "json"]).unwrap();
        match cli.command {
            Some(Commands::Snapshot(args)) => assert_eq!(args.format, "json"),
            _ => panic!("expected snapshot subcommand"),
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("sha256:0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }
}
