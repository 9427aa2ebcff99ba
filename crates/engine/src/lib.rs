//! Domain engine for the Cuotas personal-finance service.
//!
//! The engine owns all persistence (sea-orm over sqlite) and exposes three
//! subsystems plus the supporting reference-data operations:
//!
//! - the credit facility ledger (`available_credit`, `refresh_available_credit`),
//! - the installment scheduler (`card_purchase`),
//! - the cash-flow aggregator (`dashboard_stats`, `expenses_by_category`,
//!   `monthly_trend`).
//!
//! Every write that touches more than one row runs inside a single database
//! transaction, so a failed purchase can never leave orphaned installment
//! rows or a stale credit decrement.

pub use commands::{
    CardPurchaseCmd, CategoryNewCmd, CreditCardNewCmd, CreditCardUpdateCmd, PaymentMethodNewCmd,
    PurchaseCreated, TransactionNewCmd, TransactionUpdateCmd,
};
pub use error::EngineError;
pub use installments::Installment;
pub use ops::{Engine, EngineBuilder, TransactionListFilter, TransactionPage};
pub use payment_methods::{PaymentMethod, PaymentMethodKind};
pub use stats::{CategoryTotal, DashboardStats, TrendPoint, UpcomingPayment};
pub use transactions::{Transaction, TransactionKind};

pub mod categories;
mod commands;
mod error;
pub mod installments;
mod ops;
pub mod payment_methods;
pub mod schedule;
mod stats;
pub mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
