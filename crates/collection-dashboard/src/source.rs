//! Data sources and the fallback policy

use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{IngestError, IngestResult};
use crate::fallback::builtin_rows;
use crate::model::RawRow;
use crate::sheet::{csv_grid, SheetClient};
use crate::table::parse_grid;

/// Where the contributor rows are read from
#[derive(Debug, Clone)]
pub enum DataSource {
    Sheet(SheetClient),
    /// Local CSV export of the sheet
    File(PathBuf),
    Builtin,
}

/// Where a set of rows actually came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataOrigin {
    Sheet,
    File { path: String },
    Builtin,
    Fallback { reason: String },
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Sheet => write!(f, "Google Sheet"),
            DataOrigin::File { path } => write!(f, "CSV file {}", path),
            DataOrigin::Builtin => write!(f, "built-in dataset"),
            DataOrigin::Fallback { reason } => write!(f, "built-in dataset (fallback: {})", reason),
        }
    }
}

impl DataSource {
    pub async fn fetch_rows(&self) -> IngestResult<Vec<RawRow>> {
        match self {
            DataSource::Sheet(client) => client.fetch_rows().await,
            DataSource::File(path) => {
                let file = File::open(path).map_err(|source| IngestError::Io {
                    path: path.clone(),
                    source,
                })?;
                let grid = csv_grid(file)?;
                parse_grid(&[], &grid)
            }
            DataSource::Builtin => Ok(builtin_rows()),
        }
    }

    fn origin(&self) -> DataOrigin {
        match self {
            DataSource::Sheet(_) => DataOrigin::Sheet,
            DataSource::File(path) => DataOrigin::File {
                path: path.display().to_string(),
            },
            DataSource::Builtin => DataOrigin::Builtin,
        }
    }
}

/// Rows together with their provenance
#[derive(Debug, Clone)]
pub struct LoadedRows {
    pub rows: Vec<RawRow>,
    pub origin: DataOrigin,
}

/// Drop rows without a family name. The parser keeps them; every consumer
/// of sheet rows filters them out here.
pub fn named_rows(rows: Vec<RawRow>) -> Vec<RawRow> {
    rows.into_iter()
        .filter(|row| !row.family_members.trim().is_empty())
        .collect()
}

/// Fetch rows, substituting the built-in dataset on any ingestion error
pub async fn load_rows(source: &DataSource) -> LoadedRows {
    match source.fetch_rows().await {
        Ok(rows) => {
            info!("Loaded {} rows from {}", rows.len(), source.origin());
            LoadedRows {
                rows,
                origin: source.origin(),
            }
        }
        Err(e) => {
            warn!("Failed to load rows ({:?}): {}. Using built-in dataset.", e.kind(), e);
            LoadedRows {
                rows: builtin_rows(),
                origin: DataOrigin::Fallback { reason: e.to_string() },
            }
        }
    }
}
