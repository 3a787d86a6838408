//! Tabular statistics backends (`csv` / `sqlite` / `parquet` features).
//!
//! A single JSON object per run covers [`crate::stats_export`]; these
//! backends are the multi-run enrichment on top of it: appending one row
//! per run to a shared dataset is how a sweep of seeds/configs gets
//! compared without re-parsing a pile of JSON files.

use crate::error::OutputResult;
use crate::stats_export::StatsExport;

/// Implemented by every tabular statistics backend.
pub trait StatsTableWriter {
    /// Append one run's statistics as a row, tagged with `run_label`.
    fn write_row(&mut self, run_label: &str, stats: &StatsExport) -> OutputResult<()>;

    /// Flush and close all underlying file handles. Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

pub mod csv_backend {
    use std::fs::File;
    use std::path::Path;

    use csv::Writer;

    use super::StatsTableWriter;
    use crate::error::OutputResult;
    use crate::stats_export::StatsExport;

    /// Appends one row per run to `stats.csv` in the given directory.
    pub struct CsvStatsWriter {
        writer: Writer<File>,
        finished: bool,
    }

    impl CsvStatsWriter {
        pub fn new(dir: &Path) -> OutputResult<Self> {
            let mut writer = Writer::from_path(dir.join("stats.csv"))?;
            writer.write_record([
                "run", "tx", "rx", "drop", "loss", "created", "delivered", "dropped", "hops",
                "latency", "started", "relayed", "removed", "aborted", "dups", "latency_avg",
                "hops_avg", "delivery_prob", "overhead_ratio",
            ])?;
            Ok(CsvStatsWriter { writer, finished: false })
        }
    }

    impl StatsTableWriter for CsvStatsWriter {
        fn write_row(&mut self, run_label: &str, stats: &StatsExport) -> OutputResult<()> {
            self.writer.write_record(&[
                run_label.to_string(),
                stats.net.tx.to_string(),
                stats.net.rx.to_string(),
                stats.net.drop.to_string(),
                stats.net.loss.to_string(),
                stats.routing.created.to_string(),
                stats.routing.delivered.to_string(),
                stats.routing.dropped.to_string(),
                stats.routing.hops.to_string(),
                stats.routing.latency.to_string(),
                stats.routing.started.to_string(),
                stats.routing.relayed.to_string(),
                stats.routing.removed.to_string(),
                stats.routing.aborted.to_string(),
                stats.routing.dups.to_string(),
                stats.derived.latency_avg.to_string(),
                stats.derived.hops_avg.to_string(),
                stats.derived.delivery_prob.to_string(),
                stats.derived.overhead_ratio.to_string(),
            ])?;
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            if self.finished {
                return Ok(());
            }
            self.finished = true;
            self.writer.flush()?;
            Ok(())
        }
    }
}

#[cfg(feature = "sqlite")]
pub mod sqlite_backend {
    use std::path::Path;

    use rusqlite::Connection;

    use super::StatsTableWriter;
    use crate::error::OutputResult;
    use crate::stats_export::StatsExport;

    /// Appends one row per run to a `runs` table in `stats.db`.
    pub struct SqliteStatsWriter {
        conn: Connection,
        finished: bool,
    }

    impl SqliteStatsWriter {
        pub fn new(dir: &Path) -> OutputResult<Self> {
            let conn = Connection::open(dir.join("stats.db"))?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS runs (
                    run             TEXT NOT NULL,
                    tx              INTEGER NOT NULL,
                    rx              INTEGER NOT NULL,
                    drop_count      INTEGER NOT NULL,
                    loss            INTEGER NOT NULL,
                    created         INTEGER NOT NULL,
                    delivered       INTEGER NOT NULL,
                    dropped         INTEGER NOT NULL,
                    hops            INTEGER NOT NULL,
                    latency         REAL NOT NULL,
                    started         INTEGER NOT NULL,
                    relayed         INTEGER NOT NULL,
                    removed         INTEGER NOT NULL,
                    aborted         INTEGER NOT NULL,
                    dups            INTEGER NOT NULL,
                    latency_avg     REAL NOT NULL,
                    hops_avg        REAL NOT NULL,
                    delivery_prob   REAL NOT NULL,
                    overhead_ratio  REAL NOT NULL
                );",
            )?;
            Ok(SqliteStatsWriter { conn, finished: false })
        }
    }

    impl StatsTableWriter for SqliteStatsWriter {
        fn write_row(&mut self, run_label: &str, stats: &StatsExport) -> OutputResult<()> {
            self.conn.execute(
                "INSERT INTO runs (run, tx, rx, drop_count, loss, created, delivered, dropped, \
                 hops, latency, started, relayed, removed, aborted, dups, latency_avg, hops_avg, \
                 delivery_prob, overhead_ratio) \
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19)",
                rusqlite::params![
                    run_label,
                    stats.net.tx,
                    stats.net.rx,
                    stats.net.drop,
                    stats.net.loss,
                    stats.routing.created,
                    stats.routing.delivered,
                    stats.routing.dropped,
                    stats.routing.hops,
                    stats.routing.latency,
                    stats.routing.started,
                    stats.routing.relayed,
                    stats.routing.removed,
                    stats.routing.aborted,
                    stats.routing.dups,
                    stats.derived.latency_avg,
                    stats.derived.hops_avg,
                    stats.derived.delivery_prob,
                    stats.derived.overhead_ratio,
                ],
            )?;
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            if self.finished {
                return Ok(());
            }
            self.finished = true;
            self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        }
    }
}

#[cfg(feature = "parquet")]
pub mod parquet_backend {
    use std::fs::File;
    use std::path::Path;
    use std::sync::Arc;

    use arrow::array::{Float64Builder, StringBuilder, UInt64Builder};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use parquet::basic::Compression;
    use parquet::file::properties::WriterProperties;

    use super::StatsTableWriter;
    use crate::error::OutputResult;
    use crate::stats_export::StatsExport;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("run", DataType::Utf8, false),
            Field::new("tx", DataType::UInt64, false),
            Field::new("rx", DataType::UInt64, false),
            Field::new("drop", DataType::UInt64, false),
            Field::new("loss", DataType::UInt64, false),
            Field::new("created", DataType::UInt64, false),
            Field::new("delivered", DataType::UInt64, false),
            Field::new("dropped", DataType::UInt64, false),
            Field::new("hops", DataType::UInt64, false),
            Field::new("latency", DataType::Float64, false),
            Field::new("started", DataType::UInt64, false),
            Field::new("relayed", DataType::UInt64, false),
            Field::new("removed", DataType::UInt64, false),
            Field::new("aborted", DataType::UInt64, false),
            Field::new("dups", DataType::UInt64, false),
            Field::new("latency_avg", DataType::Float64, false),
            Field::new("hops_avg", DataType::Float64, false),
            Field::new("delivery_prob", DataType::Float64, false),
            Field::new("overhead_ratio", DataType::Float64, false),
        ]))
    }

    /// Buffers rows in memory (one per run, runs are infrequent) and writes
    /// a single Parquet file on [`finish`][StatsTableWriter::finish].
    pub struct ParquetStatsWriter {
        path: std::path::PathBuf,
        schema: Arc<Schema>,
        rows: Vec<(String, StatsExport)>,
        finished: bool,
    }

    impl ParquetStatsWriter {
        pub fn new(dir: &Path) -> OutputResult<Self> {
            Ok(ParquetStatsWriter {
                path: dir.join("stats.parquet"),
                schema: schema(),
                rows: Vec::new(),
                finished: false,
            })
        }
    }

    impl StatsTableWriter for ParquetStatsWriter {
        fn write_row(&mut self, run_label: &str, stats: &StatsExport) -> OutputResult<()> {
            self.rows.push((run_label.to_string(), *stats));
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            if self.finished {
                return Ok(());
            }
            self.finished = true;

            let file = File::create(&self.path)?;
            let props = WriterProperties::builder().set_compression(Compression::SNAPPY).build();
            let mut writer = ArrowWriter::try_new(file, Arc::clone(&self.schema), Some(props))?;

            let mut run = StringBuilder::new();
            let mut tx = UInt64Builder::new();
            let mut rx = UInt64Builder::new();
            let mut drop = UInt64Builder::new();
            let mut loss = UInt64Builder::new();
            let mut created = UInt64Builder::new();
            let mut delivered = UInt64Builder::new();
            let mut dropped = UInt64Builder::new();
            let mut hops = UInt64Builder::new();
            let mut latency = Float64Builder::new();
            let mut started = UInt64Builder::new();
            let mut relayed = UInt64Builder::new();
            let mut removed = UInt64Builder::new();
            let mut aborted = UInt64Builder::new();
            let mut dups = UInt64Builder::new();
            let mut latency_avg = Float64Builder::new();
            let mut hops_avg = Float64Builder::new();
            let mut delivery_prob = Float64Builder::new();
            let mut overhead_ratio = Float64Builder::new();

            for (label, s) in &self.rows {
                run.append_value(label);
                tx.append_value(s.net.tx);
                rx.append_value(s.net.rx);
                drop.append_value(s.net.drop);
                loss.append_value(s.net.loss);
                created.append_value(s.routing.created);
                delivered.append_value(s.routing.delivered);
                dropped.append_value(s.routing.dropped);
                hops.append_value(s.routing.hops);
                latency.append_value(s.routing.latency);
                started.append_value(s.routing.started);
                relayed.append_value(s.routing.relayed);
                removed.append_value(s.routing.removed);
                aborted.append_value(s.routing.aborted);
                dups.append_value(s.routing.dups);
                latency_avg.append_value(s.derived.latency_avg);
                hops_avg.append_value(s.derived.hops_avg);
                delivery_prob.append_value(s.derived.delivery_prob);
                overhead_ratio.append_value(s.derived.overhead_ratio);
            }

            let batch = RecordBatch::try_new(
                Arc::clone(&self.schema),
                vec![
                    Arc::new(run.finish()),
                    Arc::new(tx.finish()),
                    Arc::new(rx.finish()),
                    Arc::new(drop.finish()),
                    Arc::new(loss.finish()),
                    Arc::new(created.finish()),
                    Arc::new(delivered.finish()),
                    Arc::new(dropped.finish()),
                    Arc::new(hops.finish()),
                    Arc::new(latency.finish()),
                    Arc::new(started.finish()),
                    Arc::new(relayed.finish()),
                    Arc::new(removed.finish()),
                    Arc::new(aborted.finish()),
                    Arc::new(dups.finish()),
                    Arc::new(latency_avg.finish()),
                    Arc::new(hops_avg.finish()),
                    Arc::new(delivery_prob.finish()),
                    Arc::new(overhead_ratio.finish()),
                ],
            )?;
            writer.write(&batch)?;
            writer.close()?;
            Ok(())
        }
    }
}
