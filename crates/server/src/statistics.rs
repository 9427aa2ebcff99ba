//! Statistics API endpoints

use api_types::stats::{CategoryTotal, DashboardStats, StatsRange, TrendPoint, TrendQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::{ServerError, server::ServerState, user};

/// Resolves an optional date range to explicit bounds, defaulting to the
/// current calendar month.
fn resolve_range(range: StatsRange) -> Result<(NaiveDate, NaiveDate), ServerError> {
    let today = Utc::now().date_naive();
    let month_start = today
        .with_day(1)
        .ok_or_else(|| ServerError::Generic("invalid date".to_string()))?;
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| ServerError::Generic("invalid date".to_string()))?;

    let from = range.from.unwrap_or(month_start);
    let to = range.to.unwrap_or(month_end);
    if from > to {
        return Err(ServerError::Generic("from must not exceed to".to_string()));
    }
    Ok((from, to))
}

pub async fn dashboard(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<StatsRange>,
) -> Result<Json<DashboardStats>, ServerError> {
    let (from, to) = resolve_range(payload)?;
    let stats = state.engine.dashboard_stats(&user.username, from, to).await?;

    Ok(Json(DashboardStats {
        income_minor: stats.income_minor,
        expenses_minor: stats.expenses_minor,
        balance_minor: stats.balance_minor,
        transaction_count: stats.transaction_count,
    }))
}

pub async fn by_category(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<StatsRange>,
) -> Result<Json<Vec<CategoryTotal>>, ServerError> {
    let (from, to) = resolve_range(payload)?;
    let totals = state
        .engine
        .expenses_by_category(&user.username, from, to)
        .await?;

    Ok(Json(
        totals
            .into_iter()
            .map(|t| CategoryTotal {
                category_id: t.category_id,
                name: t.name,
                color: t.color,
                total_minor: t.total_minor,
            })
            .collect(),
    ))
}

pub async fn trend(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, ServerError> {
    let months = payload.months.unwrap_or(6);
    let today = Utc::now().date_naive();
    let points = state.engine.monthly_trend(&user.username, months, today).await?;

    Ok(Json(
        points
            .into_iter()
            .map(|p| TrendPoint {
                month: p.month,
                income_minor: p.income_minor,
                expenses_minor: p.expenses_minor,
                balance_minor: p.balance_minor,
            })
            .collect(),
    ))
}
