//! Credit-card purchase API endpoint

use api_types::{purchase::PurchaseNew, transaction::TransactionCreated};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};
use engine::CardPurchaseCmd;

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let mut cmd = CardPurchaseCmd::new(
        user.username,
        payload.card_id,
        payload.amount_minor,
        payload.description,
        payload.category_id,
        payload.purchase_date,
        payload.installments,
    );
    cmd.note = payload.note;

    let created = state.engine.card_purchase(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: created.transaction_id,
            installment_ids: created.installment_ids,
        }),
    ))
}
