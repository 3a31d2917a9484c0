//! Request bodies that need parsing before they reach the services, and
//! response views that differ from the stored rows.
//!
//! Enum fields arrive as plain strings so that an unknown category or status
//! is reported as a validation error rather than a deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{EventCategory, EventStatus, Family};
use crate::services::{double_option, EventUpdate, NewEvent, ServiceError, ServiceResult};

/// Family as shown to anyone. The join code grants membership, so it is only
/// returned to the family's own members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Family> for FamilySummary {
    fn from(family: Family) -> Self {
        Self {
            id: family.id,
            name: family.name,
            created_at: family.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl CreateEventRequest {
    pub fn into_new_event(self, owner_id: Uuid) -> ServiceResult<NewEvent> {
        let category = self
            .category
            .as_deref()
            .ok_or_else(|| ServiceError::validation("Event must have a category."))?
            .parse::<EventCategory>()?;
        let status = self.status.as_deref().map(str::parse::<EventStatus>).transpose()?;

        Ok(NewEvent {
            title: self.title,
            category,
            status,
            deadline: self.deadline,
            description: self.description,
            owner_id: Some(owner_id),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl TryFrom<UpdateEventRequest> for EventUpdate {
    type Error = ServiceError;

    fn try_from(req: UpdateEventRequest) -> ServiceResult<Self> {
        Ok(EventUpdate {
            title: req.title,
            category: req.category.as_deref().map(str::parse::<EventCategory>).transpose()?,
            status: req.status.as_deref().map(str::parse::<EventStatus>).transpose()?,
            deadline: req.deadline,
            description: req.description,
        })
    }
}
