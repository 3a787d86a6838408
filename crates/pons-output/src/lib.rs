//! `pons-output` — the categorised event log and statistics export for
//! PONS runs.
//!
//! # What lives here
//!
//! | Module            | Contents                                         |
//! |--------------------|--------------------------------------------------|
//! | [`category`]       | `EventCategory` — the closed nine-category set    |
//! | [`record`]         | `LogRecord` — one parsed wire-format line          |
//! | [`event_log`]      | `EventLogWriter`, `LogFilter`, `load`/`load_from`  |
//! | [`observer`]       | `SimOutputObserver` — bridges `pons_sim::SimObserver` |
//! | [`stats_export`]   | `StatsExport` — the JSON statistics object         |
//! | [`stats_backend`]  | `csv`/`sqlite`/`parquet` tabular per-run exports    |
//!
//! `pons-sim` never depends on this crate (see `pons_sim::observer`'s module
//! doc) — `pons-output` is purely a consumer, subscribing to the `SimEvent`
//! stream and the end-of-run stats through the public `SimObserver` trait.

pub mod category;
pub mod error;
pub mod event_log;
pub mod observer;
pub mod record;
pub mod stats_backend;
pub mod stats_export;


pub use category::EventCategory;
pub use error::{OutputError, OutputResult};
pub use event_log::{load, load_from, EventLogWriter, LogFilter};
pub use observer::SimOutputObserver;
pub use record::LogRecord;
pub use stats_backend::StatsTableWriter;
pub use stats_export::{DerivedStatsExport, NetStatsExport, RoutingStatsExport, StatsExport};
pub use stats_backend::csv_backend::CsvStatsWriter;

#[cfg(feature = "sqlite")]
pub use stats_backend::sqlite_backend::SqliteStatsWriter;

#[cfg(feature = "parquet")]
pub use stats_backend::parquet_backend::ParquetStatsWriter;
