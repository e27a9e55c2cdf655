//! Handler for the caller's payment history (read-only receipt listing).

use axum::extract::{Query, State};
use axum::Json;
use prepcall_db::models::payment::Payment;
use prepcall_db::repositories::PaymentRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/payments
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let payments =
        PaymentRepo::list_by_user(&state.pool, user.user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: payments }))
}
