//! Report generation (CSV outputs)

use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::dashboard::Dashboard;
use crate::model::{MonthKey, Status};

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn optional_amount(value: Option<f64>) -> String {
    value.map(amount).unwrap_or_default()
}

/// Generate all CSV reports into `output_dir`, creating it if needed
pub fn generate_all_reports(output_dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    Ok(vec![
        write_collection_ledger(output_dir, dashboard)?,
        write_monthly_totals(output_dir, dashboard)?,
        write_summary(output_dir, dashboard)?,
    ])
}

/// Generate collection_ledger.csv (one line per family)
pub fn write_collection_ledger(output_dir: &Path, dashboard: &Dashboard) -> Result<PathBuf> {
    let path = output_dir.join(constants::COLLECTION_LEDGER_FILENAME);
    let mut wtr = Writer::from_path(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    // Header
    let mut header = vec!["No", "Family_Members", "Monthly_Amount"];
    header.extend(MonthKey::ALL.iter().map(|m| m.abbrev()));
    header.extend([
        "Collected",
        "Expected",
        "Outstanding",
        "Paid_Months",
        "Status",
        "Pending_Months",
    ]);
    wtr.write_record(&header)?;

    for row in &dashboard.rows {
        let mut record = vec![
            row.raw.no.map(|n| n.to_string()).unwrap_or_default(),
            row.raw.family_members.clone(),
            optional_amount(row.raw.monthly_amount),
        ];
        record.extend(MonthKey::ALL.iter().map(|&m| optional_amount(row.raw.month(m))));
        record.extend([
            amount(row.collected_year),
            amount(row.expected_year),
            amount(row.outstanding()),
            row.paid_months_count.to_string(),
            row.status.to_string(),
            row.pending_months
                .iter()
                .map(|m| m.abbrev())
                .collect::<Vec<_>>()
                .join(" "),
        ]);
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());

    Ok(path)
}

/// Generate monthly_totals.csv
pub fn write_monthly_totals(output_dir: &Path, dashboard: &Dashboard) -> Result<PathBuf> {
    let path = output_dir.join(constants::MONTHLY_TOTALS_FILENAME);
    let mut wtr = Writer::from_path(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(["Month", "Collected"])?;
    for (month, total) in &dashboard.monthly_totals {
        wtr.write_record([month.full_name(), &amount(*total)])?;
    }

    let year_total: f64 = dashboard.monthly_totals.values().sum();
    wtr.write_record(["Total", &amount(year_total)])?;

    wtr.flush()?;
    println!("  Generated: {}", path.display());

    Ok(path)
}

/// Generate summary.csv (KPIs and status distribution as metric/value pairs)
pub fn write_summary(output_dir: &Path, dashboard: &Dashboard) -> Result<PathBuf> {
    let path = output_dir.join(constants::SUMMARY_FILENAME);
    let mut wtr = Writer::from_path(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let kpis = &dashboard.kpis;

    wtr.write_record(["Metric", "Value"])?;
    wtr.write_record(["Contributors", &kpis.contributors.to_string()])?;
    wtr.write_record(["Fully_Paid", &kpis.fully_paid.to_string()])?;
    wtr.write_record(["Partially_Unpaid", &kpis.partially_unpaid.to_string()])?;
    wtr.write_record(["Fully_Paid_Percentage", &amount(kpis.fully_paid_percentage)])?;
    wtr.write_record(["Expected_Total", &amount(kpis.expected_total)])?;
    wtr.write_record(["Collected_Total", &amount(kpis.collected_total)])?;
    wtr.write_record(["Collected_Percentage", &amount(kpis.collected_percentage)])?;

    for status in Status::ALL {
        let count = dashboard.status_distribution.count(status);
        wtr.write_record([format!("Status: {}", status), count.to_string()])?;
    }

    wtr.write_record(["Data_Origin".to_string(), dashboard.origin.to_string()])?;
    wtr.write_record(["Generated_At".to_string(), dashboard.generated_at.to_rfc3339()])?;

    wtr.flush()?;
    println!("  Generated: {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::builtin_rows;
    use crate::model::RawRow;
    use crate::source::DataOrigin;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_path(path).unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn dashboard() -> Dashboard {
        let mut rows = builtin_rows();
        rows.push(RawRow {
            no: Some(4),
            family_members: "Silva, Family".to_string(),
            monthly_amount: Some(500.0),
            months: MonthKey::ALL
                .iter()
                .map(|&m| (m, (m <= MonthKey::Mar).then_some(500.0)))
                .collect(),
            total_year: None,
        });
        Dashboard::build(rows, DataOrigin::Builtin)
    }

    #[test]
    fn test_generate_all_reports() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        let paths = generate_all_reports(&out, &dashboard()).unwrap();
        assert_eq!(paths.len(), 3);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_collection_ledger_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_collection_ledger(dir.path(), &dashboard()).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].len(), 21);
        assert_eq!(rows[0][3], "Jan");

        let silva = &rows[4];
        assert_eq!(silva[1], "Silva, Family");
        assert_eq!(silva[3], "500.00");
        assert_eq!(silva[6], "");
        assert_eq!(silva[15], "1500.00");
        assert_eq!(silva[16], "6000.00");
        assert_eq!(silva[17], "4500.00");
        assert_eq!(silva[18], "3");
        assert_eq!(silva[19], "Partial");
        assert_eq!(silva[20], "Apr May Jun Jul Aug Sep Oct Nov Dec");
    }

    #[test]
    fn test_monthly_totals_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_monthly_totals(dir.path(), &dashboard()).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows.len(), 14);
        assert_eq!(rows[1], vec!["January", "3500.00"]);
        assert_eq!(rows[4], vec!["April", "3000.00"]);
        assert_eq!(rows[13], vec!["Total", "37500.00"]);
    }

    #[test]
    fn test_summary_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(dir.path(), &dashboard()).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows[1], vec!["Contributors", "4"]);
        assert_eq!(rows[2], vec!["Fully_Paid", "3"]);
        assert_eq!(rows[4], vec!["Fully_Paid_Percentage", "75.00"]);
        assert!(rows.iter().any(|r| r[0] == "Status: Partial" && r[1] == "1"));
        assert!(rows.iter().any(|r| r[0] == "Data_Origin" && r[1] == "built-in dataset"));
    }
}
