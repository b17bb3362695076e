//! Grid → RawRow parsing shared by the CSV and gviz readers
//!
//! Header labels are matched against a fixed list of known column names.
//! A header that names the family column but not all twelve months is an
//! error; rows are never returned with guessed columns.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{IngestError, IngestResult};
use crate::model::{MonthKey, MonthValues, RawRow};

/// Meaning of a sheet column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    No,
    FamilyMembers,
    MonthlyAmount,
    TotalYear,
    Month(MonthKey),
}

impl ColumnRole {
    pub fn from_label(label: &str) -> Option<ColumnRole> {
        let label = normalize_label(label);
        match label.as_str() {
            "no" | "#" | "sl no" | "s no" | "sno" | "sr no" => Some(ColumnRole::No),
            "family members" | "family member" | "family" | "name" => Some(ColumnRole::FamilyMembers),
            "monthly amount" | "monthly" | "amount per month" => Some(ColumnRole::MonthlyAmount),
            "total year" | "total for year" | "yearly total" | "total" => Some(ColumnRole::TotalYear),
            other => MonthKey::from_label(other).map(ColumnRole::Month),
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRole::No => write!(f, "No"),
            ColumnRole::FamilyMembers => write!(f, "Family Members"),
            ColumnRole::MonthlyAmount => write!(f, "Monthly Amount"),
            ColumnRole::TotalYear => write!(f, "Total Year"),
            ColumnRole::Month(month) => write!(f, "{}", month),
        }
    }
}

/// Lower-case, trim, collapse inner whitespace, drop trailing `.` and `:`
fn normalize_label(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    collapsed
        .trim_end_matches(['.', ':'])
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Column positions resolved from a header row
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub no: Option<usize>,
    pub family_members: usize,
    pub monthly_amount: Option<usize>,
    pub total_year: Option<usize>,
    pub months: [usize; 12],
}

impl ColumnMap {
    /// Resolve a header row. `Ok(None)` means this row is not a header.
    pub fn from_header(cells: &[String]) -> IngestResult<Option<ColumnMap>> {
        let labelled: Vec<(ColumnRole, usize)> = cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| ColumnRole::from_label(cell).map(|role| (role, index)))
            .collect();

        let has_family = labelled.iter().any(|(role, _)| *role == ColumnRole::FamilyMembers);
        let has_month = labelled.iter().any(|(role, _)| matches!(role, ColumnRole::Month(_)));
        if !has_family || !has_month {
            return Ok(None);
        }

        let mut roles: HashMap<ColumnRole, usize> = HashMap::new();
        for (role, index) in labelled {
            if roles.insert(role, index).is_some() {
                return Err(IngestError::DuplicateColumn(role.to_string()));
            }
        }
        let family_members = roles[&ColumnRole::FamilyMembers];

        let missing: Vec<MonthKey> = MonthKey::ALL
            .into_iter()
            .filter(|&m| !roles.contains_key(&ColumnRole::Month(m)))
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }

        let mut months = [0usize; 12];
        for month in MonthKey::ALL {
            months[month.index()] = roles[&ColumnRole::Month(month)];
        }

        Ok(Some(ColumnMap {
            no: roles.get(&ColumnRole::No).copied(),
            family_members,
            monthly_amount: roles.get(&ColumnRole::MonthlyAmount).copied(),
            total_year: roles.get(&ColumnRole::TotalYear).copied(),
            months,
        }))
    }

    fn parse_row(&self, cells: &[String], sheet_row: usize) -> RawRow {
        let cell = |index: Option<usize>| index.and_then(|i| cells.get(i)).map(String::as_str);

        let months: MonthValues = MonthKey::ALL
            .into_iter()
            .map(|month| (month, cell(Some(self.months[month.index()])).and_then(parse_amount)))
            .collect();

        let no = cell(self.no)
            .and_then(parse_amount)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32)
            .or(u32::try_from(sheet_row).ok());

        RawRow {
            no,
            family_members: cell(Some(self.family_members)).unwrap_or("").trim().to_string(),
            monthly_amount: cell(self.monthly_amount).and_then(parse_amount),
            months,
            total_year: cell(self.total_year).and_then(parse_amount),
        }
    }
}

/// Parse a money cell. Blank, `-` and non-numeric text read as `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    for prefix in ["Rs.", "rs.", "RS.", "Rs", "rs", "RS", "₹", "$"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Locate the header row and parse every row below it.
///
/// `candidate_headers` are tried before the grid itself (gviz puts labels
/// in its column metadata); a candidate that fails validation falls through
/// to the grid scan. Rows with a blank family cell are kept; the
/// dashboard drops them.
pub fn parse_grid(candidate_headers: &[Vec<String>], grid: &[Vec<String>]) -> IngestResult<Vec<RawRow>> {
    // A rejected label row is only reported if the grid has no header either
    let mut candidate_error = None;
    for header in candidate_headers {
        match ColumnMap::from_header(header) {
            Ok(Some(map)) => {
                debug!("Using column labels as header row");
                return parse_data_rows(&map, grid, 0);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Column labels rejected as header row: {}", e);
                candidate_error = Some(e);
            }
        }
    }

    for (index, cells) in grid.iter().enumerate() {
        if let Some(map) = ColumnMap::from_header(cells)? {
            debug!("Found header row at index {}", index);
            return parse_data_rows(&map, &grid[index + 1..], index);
        }
    }

    Err(candidate_error.unwrap_or(IngestError::HeaderNotFound))
}

fn parse_data_rows(map: &ColumnMap, rows: &[Vec<String>], offset: usize) -> IngestResult<Vec<RawRow>> {
    let parsed: Vec<RawRow> = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| map.parse_row(cells, offset + i + 1))
        .collect();

    if parsed.iter().all(|row| row.family_members.is_empty()) {
        return Err(IngestError::Empty);
    }

    Ok(parsed)
}
