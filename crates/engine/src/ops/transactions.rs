//! Transaction CRUD and listing.

use sea_orm::{
    ActiveValue, Condition, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionNewCmd, TransactionUpdateCmd, transactions,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

/// Optional filters for the paged transaction list.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub category_id: Option<Uuid>,
    /// Substring match over description and note.
    pub search: Option<String>,
}

/// One page of transactions with the exact total count.
#[derive(Clone, Debug)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl Engine {
    /// Creates a plain transaction after validating that the category and
    /// payment method exist and belong to the user.
    pub async fn create_transaction(&self, cmd: TransactionNewCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, &cmd.user_id, cmd.category_id)
                .await?;
            self.require_payment_method(&db_tx, &cmd.user_id, cmd.payment_method_id)
                .await?;

            let description = normalize_required_name(&cmd.description, "transaction")?;
            let tx = Transaction::new(
                cmd.user_id,
                cmd.kind,
                cmd.amount_minor,
                description,
                cmd.category_id,
                cmd.payment_method_id,
                cmd.occurred_on,
                normalize_optional_text(cmd.note.as_deref()),
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Returns a single transaction owned by the user.
    pub async fn transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<Transaction> {
        let model = self.require_transaction(user_id, id).await?;
        Transaction::try_from(model)
    }

    /// Lists the user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Paged transaction list with an exact total count.
    ///
    /// `page` is 1-based; ordering is always newest first so pages stay
    /// consistent while paginating.
    pub async fn list_transactions_page(
        &self,
        user_id: &str,
        page: u64,
        page_size: u64,
        filter: &TransactionListFilter,
    ) -> ResultEngine<TransactionPage> {
        if page == 0 || page_size == 0 {
            return Err(EngineError::InvalidAmount(
                "page and page_size must be >= 1".to_string(),
            ));
        }

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id));
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim)
            && !term.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::Description.contains(term))
                    .add(transactions::Column::Note.contains(term)),
            );
        }

        let paginator = query
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .paginate(&self.database, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page - 1).await?;
        let items: Vec<Transaction> = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<_>>()?;
        let total_pages = std::cmp::max(1, total.div_ceil(page_size));

        Ok(TransactionPage {
            items,
            total,
            page,
            page_size,
            total_pages,
        })
    }

    /// Updates the provided fields of an existing transaction.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: Uuid,
        cmd: TransactionUpdateCmd,
    ) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = cmd.amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_transaction_on(&db_tx, user_id, id).await?;
            if let Some(category_id) = cmd.category_id {
                self.require_category(&db_tx, user_id, category_id).await?;
            }
            if let Some(payment_method_id) = cmd.payment_method_id {
                self.require_payment_method(&db_tx, user_id, payment_method_id)
                    .await?;
            }

            let mut active = transactions::ActiveModel {
                id: ActiveValue::Set(id),
                ..Default::default()
            };
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description =
                    ActiveValue::Set(normalize_required_name(description, "transaction")?);
            }
            if let Some(category_id) = cmd.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(payment_method_id) = cmd.payment_method_id {
                active.payment_method_id = ActiveValue::Set(payment_method_id);
            }
            if let Some(occurred_on) = cmd.occurred_on {
                active.occurred_on = ActiveValue::Set(occurred_on);
            }
            if let Some(note) = cmd.note.as_deref() {
                active.note = ActiveValue::Set(normalize_optional_text(Some(note)));
            }

            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Deletes a transaction owned by the user.
    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let model = self.require_transaction(user_id, id).await?;
        transactions::ActiveModel::from(&Transaction::try_from(model)?)
            .delete(&self.database)
            .await?;
        Ok(())
    }

    async fn require_transaction(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        self.require_transaction_on(&self.database, user_id, id)
            .await
    }

    async fn require_transaction_on<C: sea_orm::ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
