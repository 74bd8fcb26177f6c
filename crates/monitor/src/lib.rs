//! Monitoring cycle for per-entity weather data quality.
//!
//! This crate provides:
//! - `DataSource` / `ResultSink` traits for the injected collaborators
//! - `MonitoringOrchestrator` fanning one validation pipeline out per entity
//! - Metrics and report payloads sent to the sink
//! - HTTP and log sinks, a JSON file source, and the interval loop

pub mod metrics;
pub mod orchestrator;
pub mod payload;
pub mod runner;
pub mod sinks;
pub mod sources;
pub mod summary;
pub mod traits;

pub use metrics::{compute_metrics, Metrics};
pub use orchestrator::MonitoringOrchestrator;
pub use payload::ReportPayload;
pub use runner::run_monitoring;
pub use sinks::{HttpSink, LogSink};
pub use sources::JsonFileSource;
pub use summary::{CycleSummary, EntityOutcome};
pub use traits::{DataSource, ResultSink, SinkError, SourceError};
