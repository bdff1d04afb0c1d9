//! Weekly schedule endpoints

use axum::{Extension, Json, extract::State};
use shared::models::{ScheduleEntry, ScheduleEntryInput};

use crate::auth::TenantIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> ApiResult<Vec<ScheduleEntry>> {
    let entries = db::schedule::list(&state.pool, identity.profile_id).await?;
    Ok(Json(entries))
}

/// PUT /api/schedule: replaces the whole week
pub async fn replace_schedule(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(inputs): Json<Vec<ScheduleEntryInput>>,
) -> ApiResult<Vec<ScheduleEntry>> {
    let entries = db::schedule::normalize_entries(identity.profile_id, inputs)?;
    db::schedule::replace(&state.pool, identity.profile_id, &entries).await?;

    tracing::info!(
        profile_id = identity.profile_id,
        entries = entries.len(),
        "Schedule replaced"
    );
    Ok(Json(entries))
}
