//! Installment scheduler.
//!
//! Turns "purchase of amount A on card C, date D, in N installments" into one
//! parent transaction plus N installment rows, and decrements the card's
//! available credit by the full principal exactly once. The whole batch runs
//! inside a single database transaction: a failure anywhere rolls everything
//! back, and the credit check cannot race a concurrent decrement.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CardPurchaseCmd, EngineError, PurchaseCreated, ResultEngine, Transaction, TransactionKind,
    TransactionNewCmd, installments, payment_methods, schedule, transactions,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Records a credit-card purchase.
    ///
    /// A single-installment purchase is a plain expense transaction: no
    /// installment rows are created and the ledger is untouched. For N >= 2
    /// the parent transaction, the N rows, and the credit decrement are
    /// committed atomically; on rejection (unknown card, insufficient credit)
    /// nothing is written.
    pub async fn card_purchase(&self, cmd: CardPurchaseCmd) -> ResultEngine<PurchaseCreated> {
        schedule::validate_installments(cmd.installments)?;

        if cmd.installments == 1 {
            let mut tx_cmd = TransactionNewCmd::new(
                cmd.user_id,
                TransactionKind::Expense,
                cmd.amount_minor,
                cmd.description,
                cmd.category_id,
                cmd.card_id,
                cmd.purchase_date,
            );
            tx_cmd.note = normalize_optional_text(cmd.note.as_deref());
            let tx = self.create_transaction(tx_cmd).await?;
            return Ok(PurchaseCreated {
                transaction_id: tx.id,
                installment_ids: Vec::new(),
            });
        }

        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, &cmd.user_id, cmd.category_id)
                .await?;
            let card = self
                .require_credit_card(&db_tx, &cmd.user_id, cmd.card_id)
                .await?;

            let available = card.effective_available_credit().unwrap_or(0);
            if cmd.amount_minor > available {
                return Err(EngineError::InsufficientCredit {
                    available,
                    required: cmd.amount_minor,
                });
            }

            let due_dates = schedule::due_dates(cmd.purchase_date, cmd.installments)?;
            let amounts = schedule::split_amount(cmd.amount_minor, cmd.installments)?;

            let tx = Transaction::new(
                cmd.user_id.clone(),
                TransactionKind::Expense,
                cmd.amount_minor,
                format!("{} ({} cuotas)", cmd.description, cmd.installments),
                cmd.category_id,
                cmd.card_id,
                cmd.purchase_date,
                normalize_optional_text(cmd.note.as_deref()),
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            // Row 1 links to the parent transaction; rows 2..N link back to
            // row 1 via parent_installment_id.
            let first_id = Uuid::new_v4();
            let mut installment_ids = Vec::with_capacity(due_dates.len());
            for (index, (due_on, amount_minor)) in
                due_dates.iter().zip(amounts.iter()).enumerate()
            {
                let no = index as i32 + 1;
                let row = installments::Installment {
                    id: if index == 0 { first_id } else { Uuid::new_v4() },
                    user_id: cmd.user_id.clone(),
                    card_id: cmd.card_id,
                    transaction_id: (index == 0).then_some(tx.id),
                    parent_installment_id: (index > 0).then_some(first_id),
                    amount_minor: *amount_minor,
                    description: format!(
                        "{} ({}/{})",
                        cmd.description, no, cmd.installments
                    ),
                    installment_count: cmd.installments as i32,
                    installment_no: no,
                    due_on: *due_on,
                    is_paid: false,
                    paid_on: None,
                    created_at: Utc::now(),
                };
                installments::ActiveModel::from(&row).insert(&db_tx).await?;
                installment_ids.push(row.id);
            }

            // One decrement for the whole purchase, never per installment.
            let card_model = payment_methods::ActiveModel {
                id: ActiveValue::Set(cmd.card_id),
                available_credit_minor: ActiveValue::Set(Some(available - cmd.amount_minor)),
                ..Default::default()
            };
            card_model.update(&db_tx).await?;

            Ok(PurchaseCreated {
                transaction_id: tx.id,
                installment_ids,
            })
        })
    }
}
