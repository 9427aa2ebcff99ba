//! Credit facility ledger.
//!
//! `available_credit_minor` on a card is denormalized state: the authoritative
//! figure is `credit_limit - sum(unpaid installment principal)`, and
//! [`Engine::refresh_available_credit`] is the reconciliation path that
//! recomputes and persists it.

use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, Statement, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, payment_methods};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the stored available credit for a credit card.
    ///
    /// A card whose ledger was never initialized (`NULL` in storage) reads as
    /// its full credit limit. A stored `0` means genuinely exhausted credit.
    pub async fn available_credit(&self, user_id: &str, card_id: Uuid) -> ResultEngine<i64> {
        let card = self
            .require_credit_card(&self.database, user_id, card_id)
            .await?;
        Ok(card.effective_available_credit().unwrap_or(0))
    }

    /// Recomputes available credit from the installment ledger and persists it.
    ///
    /// `available = credit_limit - sum(unpaid installment principal)`, clamped
    /// to `[0, credit_limit]`. Idempotent: with no intervening purchases or
    /// payments, repeated calls yield the same value.
    pub async fn refresh_available_credit(&self, user_id: &str, card_id: Uuid) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let card = self.require_credit_card(&db_tx, user_id, card_id).await?;
            let available = self.recompute_available(&db_tx, &card).await?;
            Ok(available)
        })
    }

    /// Initializes the ledger of every credit card of `user_id` that has no
    /// stored available credit yet. Cards already initialized are untouched.
    pub async fn initialize_available_credit(&self, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let models = payment_methods::Entity::find()
                .filter(payment_methods::Column::UserId.eq(user_id))
                .filter(
                    payment_methods::Column::Kind
                        .eq(crate::PaymentMethodKind::CreditCard.as_str()),
                )
                .filter(payment_methods::Column::AvailableCreditMinor.is_null())
                .all(&db_tx)
                .await?;

            for model in models {
                let card = crate::PaymentMethod::try_from(model)?;
                self.recompute_available(&db_tx, &card).await?;
            }
            Ok(())
        })
    }

    pub(super) async fn recompute_available<C: ConnectionTrait>(
        &self,
        db: &C,
        card: &crate::PaymentMethod,
    ) -> ResultEngine<i64> {
        let limit = card.credit_limit_minor.unwrap_or(0);
        let outstanding = self.unpaid_principal(db, card.id).await?;
        let available = (limit - outstanding).clamp(0, limit);

        let model = payment_methods::ActiveModel {
            id: ActiveValue::Set(card.id),
            available_credit_minor: ActiveValue::Set(Some(available)),
            ..Default::default()
        };
        model.update(db).await?;

        Ok(available)
    }

    /// Sum of unpaid installment principal for a card.
    pub(super) async fn unpaid_principal<C: ConnectionTrait>(
        &self,
        db: &C,
        card_id: Uuid,
    ) -> ResultEngine<i64> {
        let backend = db.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM installments \
             WHERE card_id = ? AND is_paid = FALSE",
            vec![card_id.into()],
        );
        let row = db.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
    }
}
