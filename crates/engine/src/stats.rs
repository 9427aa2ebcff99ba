//! Result types for the cash-flow aggregator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Month bucket of the dashboard trend, `month` formatted as `YYYY-MM`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub income_minor: i64,
    pub expenses_minor: i64,
    pub balance_minor: i64,
}

/// Totals for a date range. Income/expenses/balance cover cash-realized
/// transactions only; `transaction_count` counts every transaction in range,
/// credit-funded ones included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub income_minor: i64,
    pub expenses_minor: i64,
    pub balance_minor: i64,
    pub transaction_count: u64,
}

/// Aggregated expense total for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub total_minor: i64,
}

/// An unpaid installment due today or later, joined with its card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingPayment {
    pub installment_id: Uuid,
    pub amount_minor: i64,
    pub due_on: NaiveDate,
    pub description: String,
    pub card_name: String,
    pub card_last_four: Option<String>,
}
