use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::api::LoginRequest;
use crate::database::models::{Event, User};
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::services::{NewUser, ProfileUpdate};
use crate::state::AppState;

/// POST /api/users - register and receive a token as plain text
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<String> {
    let Json(new_user) = body?;
    Ok(state.users.create_user(new_user).await?)
}

/// PUT /api/users/login - exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(credentials) = body?;
    Ok(state.users.authenticate(&credentials.email, &credentials.password).await?)
}

/// GET /api/users/authed
pub async fn get_authed(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<User> {
    Json(user)
}

/// PUT /api/users/authed
pub async fn update_authed(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(update) = body?;
    Ok(Json(state.users.update_profile(user.id, update).await?))
}

/// GET /api/users/relationships - the rest of the caller's family
pub async fn relationships(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.find_relationships(user.id).await?))
}

/// GET /api/users/events - events the caller is assigned to
pub async fn assigned_events(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.events.find_assigned_to(user.id).await?))
}
