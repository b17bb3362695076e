use std::path::PathBuf;

use thiserror::Error;

use crate::model::MonthKey;

pub type IngestResult<T> = Result<T, IngestError>;

/// Failure at the ingestion boundary. Callers fall back to the built-in
/// dataset on any of these.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected response format: {0}")]
    Format(String),
    #[error("no header row with a family column and month columns")]
    HeaderNotFound,
    #[error("header row is missing month columns: {}", join_months(.0))]
    MissingColumns(Vec<MonthKey>),
    #[error("column '{0}' appears more than once in the header row")]
    DuplicateColumn(String),
    #[error("sheet contains no contributor rows")]
    Empty,
}

/// Coarse failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorKind {
    Transport,
    Format,
    Empty,
}

impl IngestError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub fn transport(url: &str, message: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> IngestErrorKind {
        match self {
            IngestError::Transport { .. } | IngestError::Status { .. } | IngestError::Io { .. } => {
                IngestErrorKind::Transport
            }
            IngestError::Format(_)
            | IngestError::HeaderNotFound
            | IngestError::MissingColumns(_)
            | IngestError::DuplicateColumn(_) => IngestErrorKind::Format,
            IngestError::Empty => IngestErrorKind::Empty,
        }
    }
}

fn join_months(months: &[MonthKey]) -> String {
    months.iter().map(|m| m.abbrev()).collect::<Vec<_>>().join(", ")
}
