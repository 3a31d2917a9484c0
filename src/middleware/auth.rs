use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::token_from_header;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The caller, resolved from their token
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Token authentication middleware. Resolves the `authorization` header to a
/// stored user and injects it as [`AuthUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())?;
    let user = state.users.get_by_token(&token).await?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid authorization header format"))?;

    token_from_header(value)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::unauthorized("Empty token"))
}
