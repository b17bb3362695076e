//! Built-in dataset served when the sheet cannot be read

use crate::model::{MonthKey, RawRow};

fn fully_paid_family(no: u32, name: &str, monthly_amount: f64) -> RawRow {
    RawRow {
        no: Some(no),
        family_members: name.to_string(),
        monthly_amount: Some(monthly_amount),
        months: MonthKey::ALL.iter().map(|&m| (m, Some(monthly_amount))).collect(),
        total_year: Some(monthly_amount * 12.0),
    }
}

pub fn builtin_rows() -> Vec<RawRow> {
    vec![
        fully_paid_family(1, "John Doe Family", 1000.0),
        fully_paid_family(2, "Jane Smith Family", 800.0),
        fully_paid_family(3, "Bob Johnson Family", 1200.0),
    ]
}
