//! 月度报表
//!
//! 当前 UTC 年份按月分桶 (JAN..DEC)。

use serde::Serialize;
use shared::util::year_month_of;

pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub name: &'static str,
    #[serde(rename = "totalSales")]
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyUsers {
    pub name: &'static str,
    #[serde(rename = "TotalUsers")]
    pub total_users: u64,
}

/// Sum `amount` per month for rows created in `year`
///
/// Returns `(total over every row, twelve monthly buckets)`.
pub fn sales_by_month(rows: &[(i64, f64)], year: i32) -> (f64, Vec<MonthlySales>) {
    let mut buckets = [0.0f64; 12];
    let mut total = 0.0;
    for &(created_at, amount) in rows {
        total += amount;
        if let Some((y, month)) = year_month_of(created_at)
            && y == year
        {
            buckets[month] += amount;
        }
    }
    let monthly = MONTHS
        .iter()
        .zip(buckets)
        .map(|(name, total_sales)| MonthlySales { name, total_sales })
        .collect();
    (total, monthly)
}

/// Count timestamps per month for `year`
pub fn users_by_month(created: &[i64], year: i32) -> Vec<MonthlyUsers> {
    let mut buckets = [0u64; 12];
    for &created_at in created {
        if let Some((y, month)) = year_month_of(created_at)
            && y == year
        {
            buckets[month] += 1;
        }
    }
    MONTHS
        .iter()
        .zip(buckets)
        .map(|(name, total_users)| MonthlyUsers { name, total_users })
        .collect()
}
