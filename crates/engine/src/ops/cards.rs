//! Credit card CRUD and upcoming payments.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    CreditCardNewCmd, CreditCardUpdateCmd, EngineError, PaymentMethod, PaymentMethodKind,
    ResultEngine, UpcomingPayment, installments, payment_methods,
};

use super::{Engine, normalize_optional_text, normalize_required_name, validate_billing_day, with_tx};

impl Engine {
    /// Creates a credit card with its ledger initialized to the full limit.
    pub async fn create_credit_card(&self, cmd: CreditCardNewCmd) -> ResultEngine<PaymentMethod> {
        let name = normalize_required_name(&cmd.name, "card")?;
        if cmd.credit_limit_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "credit_limit_minor must be >= 0".to_string(),
            ));
        }
        validate_billing_day(cmd.due_day, "due_day")?;
        validate_billing_day(cmd.closing_day, "closing_day")?;

        let card = PaymentMethod {
            id: Uuid::new_v4(),
            user_id: cmd.user_id,
            name,
            kind: PaymentMethodKind::CreditCard,
            credit_limit_minor: Some(cmd.credit_limit_minor),
            available_credit_minor: Some(cmd.credit_limit_minor),
            last_four: validate_last_four(cmd.last_four.as_deref())?,
            due_day: cmd.due_day,
            closing_day: cmd.closing_day,
        };
        payment_methods::ActiveModel::from(&card)
            .insert(&self.database)
            .await?;
        Ok(card)
    }

    /// Updates the provided fields of a credit card. Changing the limit
    /// triggers a ledger recompute so available credit stays consistent.
    pub async fn update_credit_card(
        &self,
        user_id: &str,
        card_id: Uuid,
        cmd: CreditCardUpdateCmd,
    ) -> ResultEngine<PaymentMethod> {
        validate_billing_day(cmd.due_day, "due_day")?;
        validate_billing_day(cmd.closing_day, "closing_day")?;
        if let Some(limit) = cmd.credit_limit_minor
            && limit < 0
        {
            return Err(EngineError::InvalidAmount(
                "credit_limit_minor must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_credit_card(&db_tx, user_id, card_id).await?;

            let mut active = payment_methods::ActiveModel {
                id: ActiveValue::Set(card_id),
                ..Default::default()
            };
            if let Some(name) = cmd.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name, "card")?);
            }
            if let Some(limit) = cmd.credit_limit_minor {
                active.credit_limit_minor = ActiveValue::Set(Some(limit));
            }
            if let Some(last_four) = cmd.last_four.as_deref() {
                active.last_four = ActiveValue::Set(validate_last_four(Some(last_four))?);
            }
            if let Some(due_day) = cmd.due_day {
                active.due_day = ActiveValue::Set(Some(due_day));
            }
            if let Some(closing_day) = cmd.closing_day {
                active.closing_day = ActiveValue::Set(Some(closing_day));
            }
            active.update(&db_tx).await?;

            let mut card = self.require_credit_card(&db_tx, user_id, card_id).await?;
            if cmd.credit_limit_minor.is_some() {
                let available = self.recompute_available(&db_tx, &card).await?;
                card.available_credit_minor = Some(available);
            }
            Ok(card)
        })
    }

    /// Deletes a credit card. Its installment rows go with it (cascade);
    /// transactions that referenced it keep their history.
    pub async fn delete_credit_card(&self, user_id: &str, card_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let card = self.require_credit_card(&db_tx, user_id, card_id).await?;
            payment_methods::ActiveModel::from(&card)
                .delete(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists the user's credit cards, sorted by name.
    pub async fn credit_cards(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        let models = payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .filter(payment_methods::Column::Kind.eq(PaymentMethodKind::CreditCard.as_str()))
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(PaymentMethod::try_from).collect()
    }

    /// Unpaid installments due on or after `today`, soonest first, with the
    /// owning card's name and last-four digits attached.
    pub async fn upcoming_payments(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<UpcomingPayment>> {
        let mut query = installments::Entity::find()
            .filter(installments::Column::UserId.eq(user_id))
            .filter(installments::Column::IsPaid.eq(false))
            .filter(installments::Column::DueOn.gte(today))
            .order_by_asc(installments::Column::DueOn)
            .order_by_asc(installments::Column::InstallmentNo);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows: Vec<(installments::Model, Option<payment_methods::Model>)> = query
            .find_also_related(payment_methods::Entity)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(row, card)| UpcomingPayment {
                installment_id: row.id,
                amount_minor: row.amount_minor,
                due_on: row.due_on,
                description: row.description,
                card_name: card.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                card_last_four: card.and_then(|c| c.last_four),
            })
            .collect())
    }
}

fn validate_last_four(value: Option<&str>) -> ResultEngine<Option<String>> {
    let Some(digits) = normalize_optional_text(value) else {
        return Ok(None);
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::InvalidAmount(
            "last_four must be exactly four digits".to_string(),
        ));
    }
    Ok(Some(digits))
}
