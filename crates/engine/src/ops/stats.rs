//! Cash-flow aggregator.
//!
//! Credit-card-funded transactions are deferred spending: they move the credit
//! ledger when the purchase happens, but realized cash flow only as the
//! installments get paid. Every aggregate here therefore excludes rows whose
//! payment method is a credit card, while the raw transaction list keeps them.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use sea_orm::{JoinType, QueryFilter, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryTotal, DashboardStats, EngineError, PaymentMethodKind, ResultEngine, TransactionKind,
    TrendPoint, categories, payment_methods, transactions,
};

use super::Engine;

/// Label used when an expense has no resolvable category.
const NO_CATEGORY_NAME: &str = "Sin categoría";

impl Engine {
    /// Dashboard totals for `[from, to]` (inclusive).
    ///
    /// `transaction_count` counts every transaction in range; the money
    /// figures cover cash-realized rows only. An empty range yields all-zero
    /// stats.
    pub async fn dashboard_stats(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<DashboardStats> {
        let rows: Vec<(transactions::Model, Option<payment_methods::Model>)> =
            transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::OccurredOn.gte(from))
                .filter(transactions::Column::OccurredOn.lte(to))
                .find_also_related(payment_methods::Entity)
                .all(&self.database)
                .await?;

        let mut stats = DashboardStats {
            transaction_count: rows.len() as u64,
            ..Default::default()
        };
        for (tx_model, method_model) in rows {
            if is_credit_funded(method_model.as_ref())? {
                continue;
            }
            let kind = TransactionKind::try_from(tx_model.kind.as_str())?;
            match kind {
                TransactionKind::Income => stats.income_minor += tx_model.amount_minor,
                TransactionKind::Expense => stats.expenses_minor += tx_model.amount_minor,
            }
        }
        stats.balance_minor = stats.income_minor - stats.expenses_minor;
        Ok(stats)
    }

    /// Cash-realized expense totals per category for `[from, to]`, sorted by
    /// total descending. Unresolvable categories collapse into a single
    /// "Sin categoría" bucket.
    pub async fn expenses_by_category(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let rows: Vec<(transactions::Model, Option<categories::Model>)> =
            transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .filter(transactions::Column::OccurredOn.gte(from))
                .filter(transactions::Column::OccurredOn.lte(to))
                .join(
                    JoinType::InnerJoin,
                    transactions::Relation::PaymentMethods.def(),
                )
                .filter(payment_methods::Column::Kind.ne(PaymentMethodKind::CreditCard.as_str()))
                .find_also_related(categories::Entity)
                .all(&self.database)
                .await?;

        let mut totals: HashMap<Uuid, CategoryTotal> = HashMap::new();
        for (tx_model, category_model) in rows {
            let entry = totals
                .entry(tx_model.category_id)
                .or_insert_with(|| CategoryTotal {
                    category_id: tx_model.category_id,
                    name: category_model
                        .as_ref()
                        .map(|c| c.name.clone())
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| NO_CATEGORY_NAME.to_string()),
                    color: category_model.as_ref().and_then(|c| c.color.clone()),
                    total_minor: 0,
                });
            entry.total_minor += tx_model.amount_minor;
        }

        let mut out: Vec<CategoryTotal> = totals.into_values().collect();
        out.sort_by(|a, b| b.total_minor.cmp(&a.total_minor));
        Ok(out)
    }

    /// Monthly income/expense/balance series ending at the month of `today`.
    ///
    /// `months` is clamped to `1..=24`. The series is pre-populated with a
    /// zero point for every month of the window, so a K-month request always
    /// yields exactly K points even with no activity.
    pub async fn monthly_trend(
        &self,
        user_id: &str,
        months: u32,
        today: NaiveDate,
    ) -> ResultEngine<Vec<TrendPoint>> {
        let months = months.clamp(1, 24);
        let current_month = first_of_month(today);
        let start = current_month
            .checked_sub_months(Months::new(months - 1))
            .ok_or_else(|| EngineError::InvalidAmount("trend window out of range".to_string()))?;
        let end = last_of_month(current_month)?;

        let mut buckets: Vec<TrendPoint> = Vec::with_capacity(months as usize);
        let mut index_by_month: HashMap<String, usize> = HashMap::new();
        for i in 0..months {
            let month_start = start
                .checked_add_months(Months::new(i))
                .ok_or_else(|| {
                    EngineError::InvalidAmount("trend window out of range".to_string())
                })?;
            let key = month_key(month_start);
            index_by_month.insert(key.clone(), buckets.len());
            buckets.push(TrendPoint {
                month: key,
                income_minor: 0,
                expenses_minor: 0,
                balance_minor: 0,
            });
        }

        let rows: Vec<transactions::Model> = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .filter(transactions::Column::OccurredOn.gte(start))
            .filter(transactions::Column::OccurredOn.lte(end))
            .join(
                JoinType::InnerJoin,
                transactions::Relation::PaymentMethods.def(),
            )
            .filter(payment_methods::Column::Kind.ne(PaymentMethodKind::CreditCard.as_str()))
            .all(&self.database)
            .await?;

        for tx_model in rows {
            let key = month_key(tx_model.occurred_on);
            let Some(&index) = index_by_month.get(&key) else {
                continue;
            };
            let kind = TransactionKind::try_from(tx_model.kind.as_str())?;
            match kind {
                TransactionKind::Income => buckets[index].income_minor += tx_model.amount_minor,
                TransactionKind::Expense => buckets[index].expenses_minor += tx_model.amount_minor,
            }
        }
        for point in &mut buckets {
            point.balance_minor = point.income_minor - point.expenses_minor;
        }

        Ok(buckets)
    }
}

fn is_credit_funded(method: Option<&payment_methods::Model>) -> ResultEngine<bool> {
    match method {
        Some(model) => {
            Ok(PaymentMethodKind::try_from(model.kind.as_str())?.is_credit_card())
        }
        None => Ok(false),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(month_start: NaiveDate) -> ResultEngine<NaiveDate> {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| EngineError::InvalidAmount("trend window out of range".to_string()))
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
