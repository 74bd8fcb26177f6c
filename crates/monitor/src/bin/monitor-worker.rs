//! monitor-worker: validates weather batches on a fixed interval and reports
//! per-city verdicts to the monitoring service.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;
use tracing::{info, warn};

use wxguard_core::config::{load_dotenv, Config};
use wxguard_monitor::{
    run_monitoring, HttpSink, JsonFileSource, LogSink, MonitoringOrchestrator, ResultSink,
};
use wxguard_validate::RuleConfig;

// ── CLI ─────────────────────────────────────────────────────────────

/// Weather data-quality monitor.
///
/// Batch and rule paths default to the profiled `BATCH_PATH` / `RULES_PATH`
/// keys read by `Config::from_env`; the flags below override them.
#[derive(Parser, Debug)]
#[command(name = "monitor-worker", version, about)]
struct Cli {
    /// JSON batch file read every cycle.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// YAML rule file.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Run a single cycle, print its summary, and exit.
    #[arg(long, env = "MONITOR_ONCE")]
    once: bool,

    /// Log reports instead of sending them to the monitoring service.
    #[arg(long, env = "MONITOR_DRY_RUN")]
    dry_run: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let rules_path = cli.rules.or_else(|| config.monitor.rules_path.clone());
    let rules = RuleConfig::load(rules_path.as_deref())?;

    let batch_path = cli.batch.unwrap_or_else(|| config.source.batch_path.clone());
    let source = Arc::new(JsonFileSource::new(batch_path));

    let sink: Arc<dyn ResultSink> = if cli.dry_run {
        info!("dry run: reports will be logged, not sent");
        Arc::new(LogSink)
    } else {
        Arc::new(HttpSink::new(&config.sink.url, config.sink.timeout())?)
    };

    let orchestrator = Arc::new(
        MonitoringOrchestrator::new(source, sink, rules)
            .with_expected_entities(config.monitor.cities.clone()),
    );

    if cli.once {
        let summary = orchestrator.run_cycle().await;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown requested, finishing current cycle"),
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c, stopping"),
        }
        signal.notify_one();
    });

    info!("monitor-worker starting");
    let cycles = run_monitoring(orchestrator, config.monitor.interval(), shutdown).await;
    info!(cycles, "monitor-worker exited cleanly");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_and_env_fallbacks() {
        let cli = Cli::try_parse_from([
            "monitor-worker",
            "--batch",
            "data/batch.json",
            "--rules",
            "data/rules.yml",
            "--once",
        ])
        .unwrap();
        assert_eq!(cli.batch, Some(PathBuf::from("data/batch.json")));
        assert_eq!(cli.rules, Some(PathBuf::from("data/rules.yml")));
        assert!(cli.once);

        std::env::set_var("MONITOR_DRY_RUN", "true");
        let cli = Cli::try_parse_from(["monitor-worker"]).unwrap();
        std::env::remove_var("MONITOR_DRY_RUN");
        assert!(cli.dry_run);
        assert!(cli.batch.is_none());
    }
}
