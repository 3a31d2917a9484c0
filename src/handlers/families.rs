use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::FamilySummary;
use crate::database::models::Family;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::services::NewFamily;
use crate::state::AppState;

/// GET /api/families - public, without join codes
pub async fn list_families(State(state): State<AppState>) -> ApiResult<Json<Vec<FamilySummary>>> {
    let families = state.families.list_families().await?;
    Ok(Json(families.into_iter().map(FamilySummary::from).collect()))
}

/// GET /api/families/:id - public, without the join code
pub async fn get_family(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<FamilySummary>> {
    let Path(id) = path?;
    Ok(Json(state.families.get_family(id).await?.into()))
}

/// POST /api/families - standalone family; the response carries its code
pub async fn create_family(
    State(state): State<AppState>,
    body: Result<Json<NewFamily>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Family>)> {
    let Json(new_family) = body?;
    let family = state.families.create_family(new_family).await?;
    Ok((StatusCode::CREATED, Json(family)))
}

/// GET /api/users/family - the caller's own family, join code included
pub async fn own_family(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<Family>> {
    let family_id = user
        .family_id
        .ok_or_else(|| ApiError::not_found("You do not belong to a family"))?;
    Ok(Json(state.families.get_family(family_id).await?))
}
