//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionList, TransactionListResponse,
    TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{CardPurchaseCmd, TransactionNewCmd, TransactionUpdateCmd};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        description: tx.description,
        category_id: tx.category_id,
        payment_method_id: tx.payment_method_id,
        occurred_on: tx.occurred_on,
        note: tx.note,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let page = payload.page.unwrap_or(1);
    let page_size = payload.page_size.unwrap_or(20);
    let filter = engine::TransactionListFilter {
        category_id: payload.category_id,
        search: payload.search,
    };

    let result = state
        .engine
        .list_transactions_page(&user.username, page, page_size, &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: result.items.into_iter().map(map_view).collect(),
        total: result.total,
        page: result.page,
        page_size: result.page_size,
        total_pages: result.total_pages,
    }))
}

/// Creates a transaction.
///
/// When the payment method is a credit card and more than one installment is
/// requested, the request is routed to the installment scheduler instead of
/// creating a plain transaction.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let installments = payload.installments.unwrap_or(1);
    let method = state
        .engine
        .payment_method(&user.username, payload.payment_method_id)
        .await?;

    if method.kind.is_credit_card() && installments > 1 {
        if payload.kind != ApiKind::Expense {
            return Err(ServerError::Generic(
                "installment purchases must be expenses".to_string(),
            ));
        }
        let mut cmd = CardPurchaseCmd::new(
            user.username,
            payload.payment_method_id,
            payload.amount_minor,
            payload.description,
            payload.category_id,
            payload.occurred_on,
            installments,
        );
        cmd.note = payload.note;
        let created = state.engine.card_purchase(cmd).await?;
        return Ok((
            StatusCode::CREATED,
            Json(TransactionCreated {
                id: created.transaction_id,
                installment_ids: created.installment_ids,
            }),
        ));
    }

    let mut cmd = TransactionNewCmd::new(
        user.username,
        map_api_kind(payload.kind),
        payload.amount_minor,
        payload.description,
        payload.category_id,
        payload.payment_method_id,
        payload.occurred_on,
    );
    cmd.note = payload.note;
    let tx = state.engine.create_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: tx.id,
            installment_ids: Vec::new(),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let cmd = TransactionUpdateCmd {
        kind: payload.kind.map(map_api_kind),
        amount_minor: payload.amount_minor,
        description: payload.description,
        category_id: payload.category_id,
        payment_method_id: payload.payment_method_id,
        occurred_on: payload.occurred_on,
        note: payload.note,
    };

    let tx = state.engine.update_transaction(&user.username, id, cmd).await?;
    Ok(Json(map_view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
