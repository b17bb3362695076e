//! Aggregates over the full set of enriched rows

use crate::model::{DashboardKpis, EnrichedRow, MonthKey, MonthlyTotals, Status, StatusDistribution};
use crate::normalize::clamp_amount;

/// Sum each month across all rows. Unset months contribute 0 and amounts are
/// clamped like the per-row collected total.
pub fn calculate_monthly_totals(rows: &[EnrichedRow]) -> MonthlyTotals {
    MonthKey::ALL
        .into_iter()
        .map(|month| {
            let total: f64 = rows
                .iter()
                .map(|row| row.raw.month(month).map(clamp_amount).unwrap_or(0.0))
                .sum();
            (month, total)
        })
        .collect()
}

pub fn calculate_kpis(rows: &[EnrichedRow]) -> DashboardKpis {
    let contributors = rows.len();
    let fully_paid = rows.iter().filter(|row| row.status == Status::FullyPaid).count();
    let partially_unpaid = contributors - fully_paid;

    let expected_total: f64 = rows.iter().map(|row| row.expected_year).sum();
    let collected_total: f64 = rows.iter().map(|row| row.collected_year).sum();

    DashboardKpis {
        contributors,
        fully_paid,
        partially_unpaid,
        fully_paid_percentage: percentage(fully_paid as f64, contributors as f64),
        expected_total,
        collected_total,
        collected_percentage: percentage(collected_total, expected_total),
    }
}

pub fn calculate_status_distribution(rows: &[EnrichedRow]) -> StatusDistribution {
    let mut distribution = StatusDistribution::default();
    for row in rows {
        match row.status {
            Status::FullyPaid => distribution.fully_paid += 1,
            Status::Partial => distribution.partial += 1,
            Status::Unpaid => distribution.unpaid += 1,
        }
    }
    distribution
}

/// `part / whole * 100`, or 0 when `whole` is not positive
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRow;
    use crate::normalize::normalize_row;

    fn enriched(name: &str, monthly_amount: Option<f64>, paid: &[MonthKey], amount: f64) -> EnrichedRow {
        let raw = RawRow {
            no: None,
            family_members: name.to_string(),
            monthly_amount,
            months: paid.iter().map(|&m| (m, Some(amount))).collect(),
            total_year: None,
        };
        normalize_row(&raw)
    }

    #[test]
    fn test_monthly_totals() {
        let first_quarter = [MonthKey::Jan, MonthKey::Feb, MonthKey::Mar];
        let rows = vec![
            enriched("John Doe", Some(100.0), &first_quarter, 100.0),
            enriched("Jane Smith", Some(100.0), &first_quarter, 100.0),
        ];

        let totals = calculate_monthly_totals(&rows);

        assert_eq!(totals.len(), 12);
        assert_eq!(totals[&MonthKey::Jan], 200.0);
        assert_eq!(totals[&MonthKey::Feb], 200.0);
        assert_eq!(totals[&MonthKey::Mar], 200.0);
        assert_eq!(totals[&MonthKey::Apr], 0.0);
        assert_eq!(totals[&MonthKey::Dec], 0.0);
    }

    #[test]
    fn test_monthly_totals_empty_input_has_all_keys() {
        let totals = calculate_monthly_totals(&[]);
        assert_eq!(totals.keys().copied().collect::<Vec<_>>(), MonthKey::ALL.to_vec());
        assert!(totals.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_monthly_totals_clamp_negative_cells() {
        let mut refund = enriched("Refund", Some(100.0), &[MonthKey::Jan, MonthKey::Feb], 100.0).raw;
        refund.months.insert(MonthKey::Feb, Some(-40.0));
        let rows = vec![
            normalize_row(&refund),
            enriched("Regular", Some(100.0), &[MonthKey::Feb], 100.0),
        ];

        let totals = calculate_monthly_totals(&rows);
        let kpis = calculate_kpis(&rows);

        assert_eq!(totals[&MonthKey::Jan], 100.0);
        assert_eq!(totals[&MonthKey::Feb], 100.0);
        assert_eq!(totals.values().sum::<f64>(), kpis.collected_total);
    }

    #[test]
    fn test_monthly_totals_are_additive() {
        let a = vec![
            enriched("A", Some(10.0), &[MonthKey::Jan, MonthKey::May], 10.0),
            enriched("B", None, &[MonthKey::May], 25.0),
        ];
        let b = vec![enriched("C", Some(5.0), &MonthKey::ALL, 5.0)];
        let union: Vec<_> = a.iter().chain(b.iter()).cloned().collect();

        let totals_a = calculate_monthly_totals(&a);
        let totals_b = calculate_monthly_totals(&b);
        let totals_union = calculate_monthly_totals(&union);

        for month in MonthKey::ALL {
            assert_eq!(totals_union[&month], totals_a[&month] + totals_b[&month]);
        }
    }

    #[test]
    fn test_kpis() {
        let rows = vec![
            enriched("John Doe", Some(100.0), &[MonthKey::Jan, MonthKey::Feb, MonthKey::Mar], 100.0),
            enriched("Jane Smith", Some(100.0), &MonthKey::ALL, 100.0),
        ];

        let kpis = calculate_kpis(&rows);

        assert_eq!(kpis.contributors, 2);
        assert_eq!(kpis.fully_paid, 1);
        assert_eq!(kpis.partially_unpaid, 1);
        assert_eq!(kpis.fully_paid_percentage, 50.0);
        assert_eq!(kpis.expected_total, 2400.0);
        assert_eq!(kpis.collected_total, 1500.0);
        assert_eq!(kpis.collected_percentage, 62.5);
    }

    #[test]
    fn test_kpis_empty_input_is_all_zero() {
        let kpis = calculate_kpis(&[]);
        assert_eq!(kpis, DashboardKpis::default());
        assert!(!kpis.fully_paid_percentage.is_nan());
    }

    #[test]
    fn test_kpis_zero_expected_gives_zero_collected_percentage() {
        let rows = vec![enriched("No Pledge", None, &MonthKey::ALL, 50.0)];
        let kpis = calculate_kpis(&rows);
        assert_eq!(kpis.expected_total, 0.0);
        assert_eq!(kpis.collected_total, 600.0);
        assert_eq!(kpis.collected_percentage, 0.0);
        assert_eq!(kpis.fully_paid_percentage, 100.0);
    }

    #[test]
    fn test_fully_paid_percentage_in_range() {
        let rows = vec![
            enriched("A", Some(1.0), &MonthKey::ALL, 1.0),
            enriched("B", Some(1.0), &[], 1.0),
            enriched("C", Some(1.0), &[MonthKey::Jun], 1.0),
        ];
        let kpis = calculate_kpis(&rows);
        assert!((0.0..=100.0).contains(&kpis.fully_paid_percentage));
        assert!((kpis.fully_paid_percentage - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_status_distribution() {
        let rows = vec![
            enriched("John", Some(1.0), &MonthKey::ALL, 1.0),
            enriched("Jane", Some(1.0), &[MonthKey::Jan], 1.0),
            enriched("Bob", Some(1.0), &[], 1.0),
            enriched("Alice", Some(1.0), &MonthKey::ALL, 1.0),
        ];

        let distribution = calculate_status_distribution(&rows);

        assert_eq!(distribution.fully_paid, 2);
        assert_eq!(distribution.partial, 1);
        assert_eq!(distribution.unpaid, 1);
        assert_eq!(distribution.total(), rows.len());
    }

    #[test]
    fn test_status_distribution_empty_keeps_all_keys() {
        let distribution = calculate_status_distribution(&[]);
        let value = serde_json::to_value(&distribution).unwrap();
        for status in Status::ALL {
            assert_eq!(value[status.to_string()], 0);
        }
    }
}
