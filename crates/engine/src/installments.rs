//! Installment rows for credit-card purchases.
//!
//! A purchase of N installments materializes N rows. Row 1 carries
//! `transaction_id` (the parent transaction); rows 2..N carry
//! `parent_installment_id` pointing at row 1. Each row is `unpaid` until an
//! external reconciliation flips `is_paid`; that transition is terminal.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ResultEngine;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: Uuid,
    pub user_id: String,
    pub card_id: Uuid,
    pub transaction_id: Option<Uuid>,
    pub parent_installment_id: Option<Uuid>,
    pub amount_minor: i64,
    pub description: String,
    pub installment_count: i32,
    pub installment_no: i32,
    pub due_on: NaiveDate,
    pub is_paid: bool,
    pub paid_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "installments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub card_id: Uuid,
    pub transaction_id: Option<Uuid>,
    pub parent_installment_id: Option<Uuid>,
    pub amount_minor: i64,
    pub description: String,
    pub installment_count: i32,
    pub installment_no: i32,
    pub due_on: Date,
    pub is_paid: bool,
    pub paid_on: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::CardId",
        to = "super::payment_methods::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PaymentMethods,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Transactions,
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Installment> for ActiveModel {
    fn from(row: &Installment) -> Self {
        Self {
            id: ActiveValue::Set(row.id),
            user_id: ActiveValue::Set(row.user_id.clone()),
            card_id: ActiveValue::Set(row.card_id),
            transaction_id: ActiveValue::Set(row.transaction_id),
            parent_installment_id: ActiveValue::Set(row.parent_installment_id),
            amount_minor: ActiveValue::Set(row.amount_minor),
            description: ActiveValue::Set(row.description.clone()),
            installment_count: ActiveValue::Set(row.installment_count),
            installment_no: ActiveValue::Set(row.installment_no),
            due_on: ActiveValue::Set(row.due_on),
            is_paid: ActiveValue::Set(row.is_paid),
            paid_on: ActiveValue::Set(row.paid_on),
            created_at: ActiveValue::Set(row.created_at),
        }
    }
}

impl TryFrom<Model> for Installment {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            card_id: model.card_id,
            transaction_id: model.transaction_id,
            parent_installment_id: model.parent_installment_id,
            amount_minor: model.amount_minor,
            description: model.description,
            installment_count: model.installment_count,
            installment_no: model.installment_no,
            due_on: model.due_on,
            is_paid: model.is_paid,
            paid_on: model.paid_on,
            created_at: model.created_at,
        })
    }
}
