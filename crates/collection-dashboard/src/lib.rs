//! AVM family fund collection tracking
//!
//! Reads the monthly collection sheet, derives each family's payment status
//! and builds the dashboard aggregates served over HTTP and written to CSV.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod fallback;
pub mod filters;
pub mod model;
pub mod normalize;
pub mod reports;
pub mod server;
pub mod sheet;
pub mod source;
pub mod statements;
pub mod table;

pub use dashboard::Dashboard;
pub use error::{IngestError, IngestResult};
pub use model::{EnrichedRow, MonthKey, RawRow, Status};
pub use source::{load_rows, named_rows, DataOrigin, DataSource, LoadedRows};
