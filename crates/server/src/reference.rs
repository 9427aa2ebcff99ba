//! Payment method, category, and seeding API endpoints

use api_types::{
    category::{CategoryNew, CategoryView},
    payment_method::{PaymentMethodKind as ApiKind, PaymentMethodNew, PaymentMethodView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{CategoryNewCmd, PaymentMethodKind, PaymentMethodNewCmd};

fn map_kind(kind: PaymentMethodKind) -> ApiKind {
    match kind {
        PaymentMethodKind::CreditCard => ApiKind::CreditCard,
        PaymentMethodKind::DebitCard => ApiKind::DebitCard,
        PaymentMethodKind::Cash => ApiKind::Cash,
        PaymentMethodKind::Transfer => ApiKind::Transfer,
    }
}

fn map_api_kind(kind: ApiKind) -> PaymentMethodKind {
    match kind {
        ApiKind::CreditCard => PaymentMethodKind::CreditCard,
        ApiKind::DebitCard => PaymentMethodKind::DebitCard,
        ApiKind::Cash => PaymentMethodKind::Cash,
        ApiKind::Transfer => PaymentMethodKind::Transfer,
    }
}

fn map_method(method: engine::PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: method.id,
        name: method.name,
        kind: map_kind(method.kind),
        credit_limit_minor: method.credit_limit_minor,
        available_credit_minor: method.available_credit_minor,
        last_four: method.last_four,
    }
}

pub async fn payment_methods_list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PaymentMethodView>>, ServerError> {
    let methods = state.engine.payment_methods(&user.username).await?;
    Ok(Json(methods.into_iter().map(map_method).collect()))
}

pub async fn payment_method_create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodNew>,
) -> Result<(StatusCode, Json<PaymentMethodView>), ServerError> {
    let cmd = PaymentMethodNewCmd::new(user.username, payload.name, map_api_kind(payload.kind));
    let method = state.engine.create_payment_method(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_method(method))))
}

pub async fn payment_method_remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment_method(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn categories_list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories(&user.username).await?;
    Ok(Json(
        categories
            .into_iter()
            .map(|c| CategoryView {
                id: c.id,
                name: c.name,
                color: c.color,
                icon: c.icon,
            })
            .collect(),
    ))
}

pub async fn category_create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut cmd = CategoryNewCmd::new(user.username, payload.name);
    cmd.color = payload.color;
    cmd.icon = payload.icon;

    let category = state.engine.create_category(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryView {
            id: category.id,
            name: category.name,
            color: category.color,
            icon: category.icon,
        }),
    ))
}

pub async fn category_remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Seeds default categories and payment methods for the authenticated user.
pub async fn seed(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.seed_defaults(&user.username).await?;
    Ok(StatusCode::CREATED)
}
