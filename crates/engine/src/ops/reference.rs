//! Reference data: payment methods, categories, default seeding.

use sea_orm::{
    ActiveValue, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    CategoryNewCmd, EngineError, PaymentMethod, PaymentMethodKind, PaymentMethodNewCmd,
    ResultEngine, categories, payment_methods,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

/// Default categories inserted for a fresh user: name, color, icon.
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Alimentación", "#EF4444", "Utensils"),
    ("Transporte", "#3B82F6", "Car"),
    ("Entretenimiento", "#8B5CF6", "Gamepad2"),
    ("Salud", "#10B981", "Heart"),
    ("Educación", "#F59E0B", "BookOpen"),
    ("Ropa", "#EC4899", "Shirt"),
    ("Hogar", "#6B7280", "Home"),
    ("Otros", "#9CA3AF", "MoreHorizontal"),
];

/// Default payment methods inserted for a fresh user.
const DEFAULT_PAYMENT_METHODS: &[(&str, PaymentMethodKind)] = &[
    ("Efectivo", PaymentMethodKind::Cash),
    ("Tarjeta de Débito", PaymentMethodKind::DebitCard),
    ("Tarjeta de Crédito", PaymentMethodKind::CreditCard),
    ("Transferencia", PaymentMethodKind::Transfer),
];

impl Engine {
    /// Lists the user's payment methods, sorted by name.
    pub async fn payment_methods(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        let models = payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(PaymentMethod::try_from).collect()
    }

    /// Returns a single payment method owned by the user.
    pub async fn payment_method(&self, user_id: &str, id: Uuid) -> ResultEngine<PaymentMethod> {
        self.require_payment_method(&self.database, user_id, id).await
    }

    /// Creates a plain payment method. Credit cards go through
    /// [`Engine::create_credit_card`] so the ledger fields are set.
    pub async fn create_payment_method(
        &self,
        cmd: PaymentMethodNewCmd,
    ) -> ResultEngine<PaymentMethod> {
        if cmd.kind.is_credit_card() {
            return Err(EngineError::InvalidAmount(
                "credit cards are created via the cards operation".to_string(),
            ));
        }
        let name = normalize_required_name(&cmd.name, "payment method")?;

        with_tx!(self, |db_tx| {
            let existing = payment_methods::Entity::find()
                .filter(payment_methods::Column::UserId.eq(&cmd.user_id))
                .filter(payment_methods::Column::Name.eq(&name))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "payment method {name} already exists"
                )));
            }

            let method = PaymentMethod {
                id: Uuid::new_v4(),
                user_id: cmd.user_id,
                name,
                kind: cmd.kind,
                credit_limit_minor: None,
                available_credit_minor: None,
                last_four: None,
                due_day: None,
                closing_day: None,
            };
            payment_methods::ActiveModel::from(&method).insert(&db_tx).await?;
            Ok(method)
        })
    }

    /// Deletes a payment method of any kind.
    pub async fn delete_payment_method(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let method = self.require_payment_method(&db_tx, user_id, id).await?;
            payment_methods::ActiveModel::from(&method).delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists the user's categories, sorted by name.
    pub async fn categories(&self, user_id: &str) -> ResultEngine<Vec<categories::Model>> {
        Ok(categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?)
    }

    /// Creates a category, rejecting duplicate names per user.
    pub async fn create_category(&self, cmd: CategoryNewCmd) -> ResultEngine<categories::Model> {
        let name = normalize_required_name(&cmd.name, "category")?;

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(&cmd.user_id))
                .filter(categories::Column::Name.eq(&name))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "category {name} already exists"
                )));
            }

            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(cmd.user_id),
                name: ActiveValue::Set(name),
                color: ActiveValue::Set(normalize_optional_text(cmd.color.as_deref())),
                icon: ActiveValue::Set(normalize_optional_text(cmd.icon.as_deref())),
            };
            Ok(model.insert(&db_tx).await?)
        })
    }

    /// Deletes a category owned by the user.
    pub async fn delete_category(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, id).await?;
            model.into_active_model().delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Seeds the default categories and payment methods for a fresh user.
    ///
    /// Each set is only inserted when the user has no rows of that kind, so
    /// repeated calls are no-ops.
    pub async fn seed_defaults(&self, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let has_categories = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .is_some();
            if !has_categories {
                for (name, color, icon) in DEFAULT_CATEGORIES {
                    let model = categories::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        user_id: ActiveValue::Set(user_id.to_string()),
                        name: ActiveValue::Set((*name).to_string()),
                        color: ActiveValue::Set(Some((*color).to_string())),
                        icon: ActiveValue::Set(Some((*icon).to_string())),
                    };
                    model.insert(&db_tx).await?;
                }
            }

            let has_methods = payment_methods::Entity::find()
                .filter(payment_methods::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .is_some();
            if !has_methods {
                for (name, kind) in DEFAULT_PAYMENT_METHODS {
                    let method = PaymentMethod {
                        id: Uuid::new_v4(),
                        user_id: user_id.to_string(),
                        name: (*name).to_string(),
                        kind: *kind,
                        credit_limit_minor: None,
                        available_credit_minor: None,
                        last_four: None,
                        due_day: None,
                        closing_day: None,
                    };
                    payment_methods::ActiveModel::from(&method).insert(&db_tx).await?;
                }
            }
            Ok(())
        })
    }
}
