//! Payment method registry per user.
//!
//! A payment method is either plain (cash, debit card, transfer) or a credit
//! card. Credit cards additionally carry the credit facility fields: limit,
//! denormalized available credit, billing days.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    CreditCard,
    DebitCard,
    Cash,
    Transfer,
}

impl PaymentMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
            Self::Transfer => "transfer",
        }
    }

    pub fn is_credit_card(self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl TryFrom<&str> for PaymentMethodKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::KeyNotFound(format!(
                "invalid payment method kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: PaymentMethodKind,
    pub credit_limit_minor: Option<i64>,
    /// `None` means the ledger for this card was never initialized; readers
    /// treat it as the full `credit_limit_minor`. A stored `0` is a genuinely
    /// exhausted card and is never masked.
    pub available_credit_minor: Option<i64>,
    pub last_four: Option<String>,
    pub due_day: Option<i16>,
    pub closing_day: Option<i16>,
}

impl PaymentMethod {
    /// Effective available credit for a credit card.
    ///
    /// Returns `None` for non-credit-card methods.
    pub fn effective_available_credit(&self) -> Option<i64> {
        if !self.kind.is_credit_card() {
            return None;
        }
        let limit = self.credit_limit_minor.unwrap_or(0);
        Some(self.available_credit_minor.unwrap_or(limit))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub credit_limit_minor: Option<i64>,
    pub available_credit_minor: Option<i64>,
    pub last_four: Option<String>,
    pub due_day: Option<i16>,
    pub closing_day: Option<i16>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::installments::Entity")]
    Installments,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentMethod> for ActiveModel {
    fn from(method: &PaymentMethod) -> Self {
        Self {
            id: ActiveValue::Set(method.id),
            user_id: ActiveValue::Set(method.user_id.clone()),
            name: ActiveValue::Set(method.name.clone()),
            kind: ActiveValue::Set(method.kind.as_str().to_string()),
            credit_limit_minor: ActiveValue::Set(method.credit_limit_minor),
            available_credit_minor: ActiveValue::Set(method.available_credit_minor),
            last_four: ActiveValue::Set(method.last_four.clone()),
            due_day: ActiveValue::Set(method.due_day),
            closing_day: ActiveValue::Set(method.closing_day),
        }
    }
}

impl TryFrom<Model> for PaymentMethod {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: PaymentMethodKind::try_from(model.kind.as_str())?,
            credit_limit_minor: model.credit_limit_minor,
            available_credit_minor: model.available_credit_minor,
            last_four: model.last_four,
            due_day: model.due_day,
            closing_day: model.closing_day,
        })
    }
}
