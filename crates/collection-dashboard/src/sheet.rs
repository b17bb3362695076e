//! Google Sheets ingestion via the gviz export endpoints
//!
//! The CSV export is tried first and the JSON export second; the first one
//! that yields rows wins. Both bodies are reduced to a grid of strings and
//! handed to [`crate::table::parse_grid`].

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::SheetConfig;
use crate::constants;
use crate::error::{IngestError, IngestResult};
use crate::model::RawRow;
use crate::table::parse_grid;

/// Export flavour requested from gviz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn tqx(self) -> &'static str {
        match self {
            ExportFormat::Csv => "out:csv",
            ExportFormat::Json => "out:json",
        }
    }
}

// =============================================================================
// gviz JSON Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizMessage>,
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizMessage {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: serde_json::Value,
    #[serde(default)]
    f: Option<String>,
}

impl GvizCell {
    fn into_text(self) -> String {
        match self.v {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Null => self.f.unwrap_or_default(),
            other => self.f.unwrap_or_else(|| other.to_string()),
        }
    }
}

// =============================================================================
// Sheet Client
// =============================================================================

/// HTTP client for one sheet tab
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    base_url: String,
    sheet_id: String,
    sheet_name: String,
}

impl SheetClient {
    pub fn new(config: &SheetConfig) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(|e| IngestError::transport(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sheet_id: config.sheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
        })
    }

    pub fn export_url(&self, format: ExportFormat) -> IngestResult<Url> {
        let endpoint = format!("{}/spreadsheets/d/{}/gviz/tq", self.base_url, self.sheet_id);
        Url::parse_with_params(&endpoint, &[("tqx", format.tqx()), ("sheet", self.sheet_name.as_str())])
            .map_err(|e| IngestError::format(format!("invalid sheet URL '{}': {}", endpoint, e)))
    }

    /// Fetch and parse the sheet, trying CSV then JSON
    pub async fn fetch_rows(&self) -> IngestResult<Vec<RawRow>> {
        let mut last_error = None;

        for format in [ExportFormat::Csv, ExportFormat::Json] {
            match self.fetch_format(format).await {
                Ok(rows) => {
                    info!("Loaded {} rows from sheet ({:?} export)", rows.len(), format);
                    return Ok(rows);
                }
                Err(e) => {
                    warn!("{:?} export failed: {}", format, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(IngestError::Empty))
    }

    async fn fetch_format(&self, format: ExportFormat) -> IngestResult<Vec<RawRow>> {
        let url = self.export_url(format)?;
        let text = self.fetch_text(&url).await?;
        match format {
            ExportFormat::Csv => parse_csv(&text),
            ExportFormat::Json => parse_gviz(&text),
        }
    }

    async fn fetch_text(&self, url: &Url) -> IngestResult<String> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| IngestError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| IngestError::transport(url.as_str(), e))?;
        debug!("Received {} bytes", text.len());
        Ok(text)
    }
}

// =============================================================================
// Body Parsers
// =============================================================================

/// Read CSV text into a grid. Rows may have differing lengths.
pub fn csv_grid<R: std::io::Read>(reader: R) -> IngestResult<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| IngestError::format(format!("invalid CSV: {}", e)))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

pub fn parse_csv(text: &str) -> IngestResult<Vec<RawRow>> {
    let grid = csv_grid(text.as_bytes())?;
    parse_grid(&[], &grid)
}

/// Parse a gviz JSON body, with or without its `setResponse(...)` wrapper
pub fn parse_gviz(text: &str) -> IngestResult<Vec<RawRow>> {
    let payload = match text.find(constants::GVIZ_RESPONSE_PREFIX) {
        Some(start) => {
            let inner = &text[start + constants::GVIZ_RESPONSE_PREFIX.len()..];
            let end = inner
                .rfind(')')
                .ok_or_else(|| IngestError::format("unterminated gviz response"))?;
            &inner[..end]
        }
        None => text.trim(),
    };

    let response: GvizResponse = serde_json::from_str(payload)
        .map_err(|e| IngestError::format(format!("invalid gviz JSON: {}", e)))?;

    if response.status.as_deref() == Some("error") {
        let detail = response
            .errors
            .into_iter()
            .find_map(|m| m.detailed_message.or(m.message))
            .unwrap_or_else(|| "unknown gviz error".to_string());
        return Err(IngestError::format(detail));
    }

    let table = response
        .table
        .ok_or_else(|| IngestError::format("gviz response has no table"))?;

    let labels: Vec<String> = table.cols.into_iter().map(|c| c.label).collect();
    let grid: Vec<Vec<String>> = table
        .rows
        .into_iter()
        .map(|row| {
            row.c
                .into_iter()
                .map(|cell| cell.map(GvizCell::into_text).unwrap_or_default())
                .collect()
        })
        .collect();

    parse_grid(&[labels], &grid)
}
