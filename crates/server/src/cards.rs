//! Credit card and credit facility API endpoints

use api_types::card::{
    AvailableCredit, CardNew, CardUpdate, CardView, UpcomingPaymentView, UpcomingPaymentsList,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{CreditCardNewCmd, CreditCardUpdateCmd, PaymentMethod};

fn map_card(card: PaymentMethod) -> CardView {
    let available_credit_minor = card.effective_available_credit().unwrap_or(0);
    CardView {
        id: card.id,
        name: card.name,
        credit_limit_minor: card.credit_limit_minor.unwrap_or(0),
        available_credit_minor,
        last_four: card.last_four,
        due_day: card.due_day,
        closing_day: card.closing_day,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CardView>>, ServerError> {
    let cards = state.engine.credit_cards(&user.username).await?;
    Ok(Json(cards.into_iter().map(map_card).collect()))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CardNew>,
) -> Result<(StatusCode, Json<CardView>), ServerError> {
    let cmd = CreditCardNewCmd {
        user_id: user.username,
        name: payload.name,
        credit_limit_minor: payload.credit_limit_minor,
        last_four: payload.last_four,
        due_day: payload.due_day,
        closing_day: payload.closing_day,
    };

    let card = state.engine.create_credit_card(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_card(card))))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CardUpdate>,
) -> Result<Json<CardView>, ServerError> {
    let cmd = CreditCardUpdateCmd {
        name: payload.name,
        credit_limit_minor: payload.credit_limit_minor,
        last_four: payload.last_four,
        due_day: payload.due_day,
        closing_day: payload.closing_day,
    };

    let card = state.engine.update_credit_card(&user.username, id, cmd).await?;
    Ok(Json(map_card(card)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_credit_card(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn credit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailableCredit>, ServerError> {
    let available_credit_minor = state.engine.available_credit(&user.username, id).await?;
    Ok(Json(AvailableCredit {
        card_id: id,
        available_credit_minor,
    }))
}

pub async fn refresh_credit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailableCredit>, ServerError> {
    let available_credit_minor = state
        .engine
        .refresh_available_credit(&user.username, id)
        .await?;
    Ok(Json(AvailableCredit {
        card_id: id,
        available_credit_minor,
    }))
}

pub async fn initialize_credit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.initialize_available_credit(&user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upcoming(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<UpcomingPaymentsList>,
) -> Result<Json<Vec<UpcomingPaymentView>>, ServerError> {
    let today = Utc::now().date_naive();
    let payments = state
        .engine
        .upcoming_payments(&user.username, today, payload.limit)
        .await?;

    Ok(Json(
        payments
            .into_iter()
            .map(|p| UpcomingPaymentView {
                installment_id: p.installment_id,
                amount_minor: p.amount_minor,
                due_on: p.due_on,
                description: p.description,
                card_name: p.card_name,
                card_last_four: p.card_last_four,
            })
            .collect(),
    ))
}
