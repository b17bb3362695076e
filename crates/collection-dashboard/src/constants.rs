//! Centralized constants for the collection dashboard
//!
//! Fund-specific values (sheet id, balances) live in the `shared` crate.
//! Deployment settings are loaded from config.toml.

// =============================================================================
// Google Sheets
// =============================================================================

/// Google Docs host serving the gviz export endpoints
pub const SHEETS_BASE_URL: &str = "https://docs.google.com";

/// Wrapper the gviz JSON export puts around its payload
pub const GVIZ_RESPONSE_PREFIX: &str = "google.visualization.Query.setResponse(";

/// The export endpoint rejects requests without a browser-like agent
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Default request timeout for sheet fetches
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

// =============================================================================
// HTTP Server
// =============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "config.toml";

/// Per-family ledger CSV filename
pub const COLLECTION_LEDGER_FILENAME: &str = "collection_ledger.csv";

/// Monthly totals CSV filename
pub const MONTHLY_TOTALS_FILENAME: &str = "monthly_totals.csv";

/// KPI summary CSV filename
pub const SUMMARY_FILENAME: &str = "summary.csv";
