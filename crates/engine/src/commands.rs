//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{PaymentMethodKind, TransactionKind};

/// Create a plain (cash-realized) transaction.
#[derive(Clone, Debug)]
pub struct TransactionNewCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: String,
    pub category_id: Uuid,
    pub payment_method_id: Uuid,
    pub occurred_on: NaiveDate,
    pub note: Option<String>,
}

impl TransactionNewCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        description: impl Into<String>,
        category_id: Uuid,
        payment_method_id: Uuid,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount_minor,
            description: description.into(),
            category_id,
            payment_method_id,
            occurred_on,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Update an existing transaction. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdateCmd {
    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub occurred_on: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Record a credit-card purchase split into installments.
#[derive(Clone, Debug)]
pub struct CardPurchaseCmd {
    pub user_id: String,
    pub card_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub category_id: Uuid,
    pub purchase_date: NaiveDate,
    pub installments: u32,
    pub note: Option<String>,
}

impl CardPurchaseCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        card_id: Uuid,
        amount_minor: i64,
        description: impl Into<String>,
        category_id: Uuid,
        purchase_date: NaiveDate,
        installments: u32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            card_id,
            amount_minor,
            description: description.into(),
            category_id,
            purchase_date,
            installments,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Result of a card purchase: the parent transaction plus the installment
/// rows created for it (empty for single-installment purchases).
#[derive(Clone, Debug)]
pub struct PurchaseCreated {
    pub transaction_id: Uuid,
    pub installment_ids: Vec<Uuid>,
}

/// Create a credit card.
#[derive(Clone, Debug)]
pub struct CreditCardNewCmd {
    pub user_id: String,
    pub name: String,
    pub credit_limit_minor: i64,
    pub last_four: Option<String>,
    pub due_day: Option<i16>,
    pub closing_day: Option<i16>,
}

/// Update a credit card. `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct CreditCardUpdateCmd {
    pub name: Option<String>,
    pub credit_limit_minor: Option<i64>,
    pub last_four: Option<String>,
    pub due_day: Option<i16>,
    pub closing_day: Option<i16>,
}

/// Create a non-credit-card payment method (cash, debit card, transfer).
#[derive(Clone, Debug)]
pub struct PaymentMethodNewCmd {
    pub user_id: String,
    pub name: String,
    pub kind: PaymentMethodKind,
}

impl PaymentMethodNewCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, kind: PaymentMethodKind) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Create a category.
#[derive(Clone, Debug)]
pub struct CategoryNewCmd {
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryNewCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            color: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
