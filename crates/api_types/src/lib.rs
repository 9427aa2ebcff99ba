use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Query parameters for the paged transaction list.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub page: Option<u64>,
        pub page_size: Option<u64>,
        pub category_id: Option<Uuid>,
        /// Substring match over description and note.
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        /// Always a positive magnitude; `kind` carries the direction.
        pub amount_minor: i64,
        pub description: String,
        pub category_id: Uuid,
        pub payment_method_id: Uuid,
        pub occurred_on: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub total: u64,
        pub page: u64,
        pub page_size: u64,
        pub total_pages: u64,
    }

    /// Request body for creating a transaction.
    ///
    /// When the payment method is a credit card and `installments > 1`, the
    /// server routes the request to the installment scheduler instead of
    /// creating a plain transaction.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: String,
        pub category_id: Uuid,
        pub payment_method_id: Uuid,
        pub occurred_on: NaiveDate,
        pub note: Option<String>,
        pub installments: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub category_id: Option<Uuid>,
        pub payment_method_id: Option<Uuid>,
        pub occurred_on: Option<NaiveDate>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
        /// Installment rows created when the scheduler handled the request.
        pub installment_ids: Vec<Uuid>,
    }
}

pub mod purchase {
    use super::*;

    /// Request body for an explicit credit-card purchase.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseNew {
        pub card_id: Uuid,
        pub amount_minor: i64,
        pub description: String,
        pub category_id: Uuid,
        pub purchase_date: NaiveDate,
        pub installments: u32,
        pub note: Option<String>,
    }
}

pub mod card {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardNew {
        pub name: String,
        pub credit_limit_minor: i64,
        pub last_four: Option<String>,
        pub due_day: Option<i16>,
        pub closing_day: Option<i16>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CardUpdate {
        pub name: Option<String>,
        pub credit_limit_minor: Option<i64>,
        pub last_four: Option<String>,
        pub due_day: Option<i16>,
        pub closing_day: Option<i16>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardView {
        pub id: Uuid,
        pub name: String,
        pub credit_limit_minor: i64,
        pub available_credit_minor: i64,
        pub last_four: Option<String>,
        pub due_day: Option<i16>,
        pub closing_day: Option<i16>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvailableCredit {
        pub card_id: Uuid,
        pub available_credit_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpcomingPaymentView {
        pub installment_id: Uuid,
        pub amount_minor: i64,
        pub due_on: NaiveDate,
        pub description: String,
        pub card_name: String,
        pub card_last_four: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UpcomingPaymentsList {
        pub limit: Option<u64>,
    }
}

pub mod payment_method {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethodKind {
        CreditCard,
        DebitCard,
        Cash,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodNew {
        pub name: String,
        pub kind: PaymentMethodKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: Uuid,
        pub name: String,
        pub kind: PaymentMethodKind,
        pub credit_limit_minor: Option<i64>,
        pub available_credit_minor: Option<i64>,
        pub last_four: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub color: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub color: Option<String>,
        pub icon: Option<String>,
    }
}

pub mod stats {
    use super::*;

    /// Query parameters for `GET /stats` and `GET /stats/categories`.
    ///
    /// Absent bounds default to the current calendar month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsRange {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardStats {
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub balance_minor: i64,
        pub transaction_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category_id: Uuid,
        pub name: String,
        pub color: Option<String>,
        pub total_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TrendQuery {
        /// Number of months, clamped server-side to `1..=24`.
        pub months: Option<u32>,
    }

    /// One month of the trend, `month` formatted as `YYYY-MM`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TrendPoint {
        pub month: String,
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub balance_minor: i64,
    }
}
