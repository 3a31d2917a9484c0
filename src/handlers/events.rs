use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::{CreateEventRequest, InviteRequest, UpdateEventRequest};
use crate::database::models::{Assigned, Event, User};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::services::{EventUpdate, Invite, ServiceError};
use crate::state::AppState;

/// Loads the event if the caller may see it: they own it or share a family
/// with its owner. Anything else reads as missing.
async fn visible_event(state: &AppState, caller: &User, id: Uuid) -> ApiResult<Event> {
    let event = state.events.get_by_id(id).await?;

    let visible = match event.owner_id {
        Some(owner_id) if owner_id == caller.id => true,
        Some(owner_id) => match state.users.get_user(owner_id).await {
            Ok(owner) => caller.shares_family_with(&owner),
            Err(ServiceError::NotFound(_)) => false,
            Err(e) => return Err(e.into()),
        },
        None => false,
    };

    if !visible {
        tracing::debug!(event_id = %id, user_id = %caller.id, "Event outside caller's family");
        return Err(ApiError::not_found(format!("Event {} not found", id)));
    }
    Ok(event)
}

/// GET /api/events - everything owned by the caller's family
pub async fn list_events(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Event>>> {
    let Some(family_id) = user.family_id else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.events.list_for_family(family_id).await?))
}

/// POST /api/events - the caller becomes the owner
pub async fn create_event(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let Json(request) = body?;
    let new_event = request.into_new_event(user.id)?;
    let event = state.events.create(new_event).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Event>> {
    let Path(id) = path?;
    Ok(Json(visible_event(&state, &user, id).await?))
}

/// PUT /api/events/:id - partial update
pub async fn update_event(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> ApiResult<Json<Event>> {
    let Path(id) = path?;
    let Json(request) = body?;
    let update = EventUpdate::try_from(request)?;

    visible_event(&state, &user, id).await?;
    Ok(Json(state.events.update(id, update).await?))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    visible_event(&state, &user, id).await?;
    state.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/events/:id/assignees
pub async fn list_assignees(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<User>>> {
    let Path(id) = path?;
    visible_event(&state, &user, id).await?;
    Ok(Json(state.assignments.find_assignees(id).await?))
}

/// POST /api/events/:id/assignees - invite a family member
pub async fn invite(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<InviteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Assigned>)> {
    let Path(id) = path?;
    let Json(request) = body?;
    visible_event(&state, &user, id).await?;

    if request.user_id != user.id {
        let invitee = match state.users.get_user(request.user_id).await {
            Ok(invitee) => invitee,
            Err(ServiceError::NotFound(_)) => return Err(ApiError::validation_error("User does not exist")),
            Err(e) => return Err(e.into()),
        };
        if !user.shares_family_with(&invitee) {
            return Err(ApiError::validation_error("Only members of your family can be assigned"));
        }
    }

    let assigned = state
        .assignments
        .invite(Invite { event_id: id, user_id: request.user_id })
        .await?;
    Ok((StatusCode::CREATED, Json(assigned)))
}
