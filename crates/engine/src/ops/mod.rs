use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, PaymentMethod, ResultEngine, categories, payment_methods};

mod cards;
mod ledger;
mod purchases;
mod reference;
mod stats;
mod transactions;

pub use transactions::{TransactionListFilter, TransactionPage};

/// Run a block inside a DB transaction, committing on success and rolling back
/// on error (the transaction is dropped un-committed on the error path).
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Loads a payment method owned by `user_id`.
    pub(crate) async fn require_payment_method<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<PaymentMethod> {
        let model = payment_methods::Entity::find_by_id(id)
            .filter(payment_methods::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment method not exists".to_string()))?;
        PaymentMethod::try_from(model)
    }

    /// Loads a payment method owned by `user_id` that is a credit card.
    pub(crate) async fn require_credit_card<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        card_id: Uuid,
    ) -> ResultEngine<PaymentMethod> {
        let method = self.require_payment_method(db, user_id, card_id).await?;
        if !method.kind.is_credit_card() {
            return Err(EngineError::KeyNotFound(
                "credit card not exists".to_string(),
            ));
        }
        Ok(method)
    }

    pub(crate) async fn require_category<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn validate_billing_day(value: Option<i16>, label: &str) -> ResultEngine<()> {
    if let Some(day) = value
        && !(1..=28).contains(&day)
    {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be between 1 and 28"
        )));
    }
    Ok(())
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
