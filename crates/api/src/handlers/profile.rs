//! Handler for the caller's own profile (credit balance display).

use axum::extract::State;
use axum::Json;
use prepcall_core::error::CoreError;
use prepcall_db::models::profile::Profile;
use prepcall_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/profile
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", user.user_id))?;
    Ok(Json(DataResponse { data: profile }))
}
