use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Split a comma-separated list, trimming blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub monitor: MonitorConfig,
    pub source: SourceConfig,
    pub sink: SinkConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WXGUARD_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WXGUARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            monitor: MonitorConfig::from_env_profiled(p),
            source: SourceConfig::from_env_profiled(p),
            sink: SinkConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  monitor:  cities=[{}], interval={}s",
            self.monitor.cities.join(", "),
            self.monitor.interval_seconds
        );
        tracing::info!(
            "  rules:    {}",
            self.monitor
                .rules_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string())
        );
        tracing::info!("  source:   batch_path={}", self.source.batch_path.display());
        tracing::info!(
            "  sink:     url={}, timeout={}s",
            self.sink.url,
            self.sink.timeout_seconds
        );
    }
}

// ── Monitor loop ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Entities expected in every batch.
    pub cities: Vec<String>,
    pub interval_seconds: u64,
    /// Optional YAML rule file; `None` means built-in defaults.
    pub rules_path: Option<PathBuf>,
}

impl MonitorConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            cities: split_list(&profiled_env_or(p, "MONITORED_CITIES", "London,New York,Tokyo")),
            interval_seconds: profiled_env_u64(p, "MONITORING_INTERVAL_SECONDS", 300),
            rules_path: profiled_env_opt(p, "RULES_PATH").map(PathBuf::from),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }
}

// ── Data source ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub batch_path: PathBuf,
}

impl SourceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            batch_path: PathBuf::from(profiled_env_or(p, "BATCH_PATH", "data/batch.json")),
        }
    }
}

// ── Result sink ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl SinkConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "MONITORING_SERVICE_URL", "http://localhost:8000"),
            timeout_seconds: profiled_env_u64(p, "DISPATCH_TIMEOUT_SECONDS", 10),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}
