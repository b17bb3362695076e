//! Static fund configuration
//!
//! Figures here are maintained by hand from the treasurer's statement and
//! are served as-is; nothing in this crate is computed from the sheet.

pub struct Config {
    pub name: &'static str,
    pub tagline: &'static str,
    /// Currency label used in console output
    pub currency: &'static str,

    // Google Sheet holding the monthly collection table
    pub sheet_id: &'static str,
    pub sheet_name: &'static str,

    pub balances: Balances,
    pub collections: Collections,
}

/// Cash-on-hand components
pub struct Balances {
    pub existing_balance_2024: f64,
    pub art_competition_balance_2025: f64,
    pub monthly_collection_balance: f64,
    pub account_opening_balance: f64,
    pub sadaka: f64,
}

/// Recorded collection totals for the current year
pub struct Collections {
    /// Jan..Dec, calendar order
    pub monthly: [f64; 12],
    /// Pledged total across all families for one month
    pub expected_per_month: f64,
}

pub static CONFIG: Config = Config {
    name: "AVM Family Fund",
    tagline: "Monthly collection tracker",
    currency: "Rs.",

    sheet_id: "1WhSc3ogSSTlSfvp7HlJLPZ4fiKFEyhUDSRhAwz8Cm8w",
    sheet_name: "MONTHLY COLLECTION AVM",

    balances: Balances {
        existing_balance_2024: 27726.57,
        art_competition_balance_2025: 5100.00,
        monthly_collection_balance: 52200.00,
        account_opening_balance: 1000.00,
        sadaka: 18000.00,
    },

    collections: Collections {
        monthly: [
            6200.00, // Jan
            5200.00, // Feb
            4600.00, // Mar
            4600.00, // Apr
            4600.00, // May
            4600.00, // Jun
            4000.00, // Jul
            4000.00, // Aug
            3800.00, // Sep
            3800.00, // Oct
            3400.00, // Nov
            3400.00, // Dec
        ],
        expected_per_month: 8000.00,
    },
};
