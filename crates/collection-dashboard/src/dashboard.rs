//! Dashboard snapshot: enriched rows plus every aggregate the views need

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{calculate_kpis, calculate_monthly_totals, calculate_status_distribution};
use crate::model::{DashboardKpis, EnrichedRow, MonthlyTotals, RawRow, StatusDistribution};
use crate::normalize::normalize_rows;
use crate::source::{named_rows, DataOrigin, LoadedRows};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub rows: Vec<EnrichedRow>,
    pub monthly_totals: MonthlyTotals,
    pub kpis: DashboardKpis,
    pub status_distribution: StatusDistribution,
    pub origin: DataOrigin,
    pub generated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Build from raw rows. Rows without a family name are dropped first.
    pub fn build(rows: Vec<RawRow>, origin: DataOrigin) -> Self {
        let rows = normalize_rows(&named_rows(rows));
        Self {
            monthly_totals: calculate_monthly_totals(&rows),
            kpis: calculate_kpis(&rows),
            status_distribution: calculate_status_distribution(&rows),
            rows,
            origin,
            generated_at: Utc::now(),
        }
    }

    pub fn from_loaded(loaded: LoadedRows) -> Self {
        Self::build(loaded.rows, loaded.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::builtin_rows;
    use crate::model::{MonthKey, Status};

    fn row(name: &str, amount: f64, paid_through: Option<MonthKey>) -> RawRow {
        RawRow {
            no: None,
            family_members: name.to_string(),
            monthly_amount: Some(amount),
            months: MonthKey::ALL
                .iter()
                .map(|&m| (m, paid_through.filter(|&last| m <= last).map(|_| amount)))
                .collect(),
            total_year: None,
        }
    }

    #[test]
    fn test_blank_families_are_dropped() {
        let rows = vec![row("Perera", 100.0, Some(MonthKey::Dec)), row("   ", 100.0, Some(MonthKey::Dec))];
        let dashboard = Dashboard::build(rows, DataOrigin::Builtin);
        assert_eq!(dashboard.rows.len(), 1);
        assert_eq!(dashboard.kpis.contributors, 1);
    }

    #[test]
    fn test_builtin_dashboard() {
        let dashboard = Dashboard::build(builtin_rows(), DataOrigin::Builtin);
        assert_eq!(dashboard.kpis.contributors, 3);
        assert_eq!(dashboard.kpis.fully_paid, 3);
        assert_eq!(dashboard.kpis.collected_total, 36000.0);
        assert_eq!(dashboard.kpis.collected_percentage, 100.0);
        assert_eq!(dashboard.monthly_totals[&MonthKey::Jan], 3000.0);
        assert_eq!(dashboard.status_distribution.count(Status::FullyPaid), 3);
    }

    #[test]
    fn test_mixed_statuses() {
        let rows = vec![
            row("A", 800.0, Some(MonthKey::Dec)),
            row("B", 1200.0, Some(MonthKey::Aug)),
            row("C", 500.0, None),
        ];
        let dashboard = Dashboard::build(rows, DataOrigin::Sheet);
        assert_eq!(dashboard.status_distribution.fully_paid, 1);
        assert_eq!(dashboard.status_distribution.partial, 1);
        assert_eq!(dashboard.status_distribution.unpaid, 1);
        assert_eq!(dashboard.kpis.partially_unpaid, 2);
        assert_eq!(
            dashboard.rows[1].pending_months,
            vec![MonthKey::Sep, MonthKey::Oct, MonthKey::Nov, MonthKey::Dec]
        );
    }

    #[test]
    fn test_json_shape() {
        let dashboard = Dashboard::build(builtin_rows(), DataOrigin::Builtin);
        let value = serde_json::to_value(&dashboard).unwrap();
        for key in ["rows", "monthlyTotals", "kpis", "statusDistribution", "origin", "generatedAt"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["rows"][0]["familyMembers"], "John Doe Family");
        assert_eq!(value["rows"][0]["status"], "Fully Paid");
        assert_eq!(value["monthlyTotals"]["Jan"], 3000.0);
    }
}
