//! Feather (Arrow IPC) output for bar tables.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use polars::prelude::*;
use polars_io::{SerWriter, ipc::IpcWriter};
use snafu::ResultExt;
use tracing::info;
use uuid::Uuid;

use crate::{
    io::sink::{ConversionSnafu, DataSink, IoSnafu, SinkError, WriteSnafu},
    models::bar_table::BarTable,
};

/// Column layout: `timestamp_ms` (UTC epoch millis), `open`, `high`, `low`,
/// `close`, `volume`, nullable `trade_count` and `vwap`.
pub fn bar_table_to_dataframe(table: &BarTable) -> PolarsResult<DataFrame> {
    let bars = table.bars();
    df!(
        "timestamp_ms" => bars.iter().map(|b| b.timestamp.timestamp_millis()).collect::<Vec<i64>>(),
        "open" => bars.iter().map(|b| b.open).collect::<Vec<f64>>(),
        "high" => bars.iter().map(|b| b.high).collect::<Vec<f64>>(),
        "low" => bars.iter().map(|b| b.low).collect::<Vec<f64>>(),
        "close" => bars.iter().map(|b| b.close).collect::<Vec<f64>>(),
        "volume" => bars.iter().map(|b| b.volume).collect::<Vec<f64>>(),
        "trade_count" => bars.iter().map(|b| b.trade_count).collect::<Vec<Option<u64>>>(),
        "vwap" => bars.iter().map(|b| b.vwap).collect::<Vec<Option<f64>>>(),
    )
}

/// Writes `df` into `dir` as `<symbol>_<YYYYmmddHHMMSS>_<uuid>.feather`.
pub fn write_dataframe(df: &mut DataFrame, dir: &Path, symbol: &str) -> Result<PathBuf, SinkError> {
    if !dir.exists() {
        fs::create_dir_all(dir).context(IoSnafu)?;
    }

    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let output_path = dir.join(format!("{symbol}_{timestamp}_{}.feather", Uuid::new_v4()));

    let mut file = File::create(&output_path).context(IoSnafu)?;
    IpcWriter::new(&mut file).finish(df).map_err(|e| {
        WriteSnafu {
            message: format!("{}: {e}", output_path.display()),
        }
        .build()
    })?;

    Ok(output_path)
}

/// Writes each table to its own Feather file under a directory.
pub struct FeatherSink {
    dir: PathBuf,
}

impl FeatherSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DataSink for FeatherSink {
    type Output = Vec<PathBuf>;

    async fn write(&self, data: &[BarTable]) -> Result<Self::Output, SinkError> {
        let mut paths = Vec::with_capacity(data.len());
        for table in data {
            let mut df = bar_table_to_dataframe(table).map_err(|e| {
                ConversionSnafu {
                    message: e.to_string(),
                }
                .build()
            })?;
            let path = write_dataframe(&mut df, &self.dir, table.symbol())?;
            info!(
                symbol = table.symbol(),
                rows = table.len(),
                path = %path.display(),
                "wrote feather file"
            );
            paths.push(path);
        }
        Ok(paths)
    }
}
