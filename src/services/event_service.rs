use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Event, EventCategory, EventStatus};
use crate::database::Store;

use super::error::{ServiceError, ServiceResult};
use super::validation::require_non_empty;

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub category: EventCategory,
    /// Defaults to `upcoming`.
    pub status: Option<EventStatus>,
    pub deadline: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, category: EventCategory) -> Self {
        Self {
            title: title.into(),
            category,
            status: None,
            deadline: None,
            description: None,
            owner_id: None,
        }
    }
}

/// Partial update; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub description: Option<Option<String>>,
}

#[derive(Clone)]
pub struct EventStore {
    store: Arc<dyn Store>,
}

impl EventStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new_event: NewEvent) -> ServiceResult<Event> {
        let title = require_event_title(&new_event.title)?;
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title,
            deadline: new_event.deadline,
            category: new_event.category,
            status: new_event.status.unwrap_or_default(),
            description: new_event.description,
            owner_id: new_event.owner_id,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert_event(&event).await?;
        tracing::info!(event_id = %created.id, category = %created.category, "Created event");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<Event> {
        self.store
            .find_event(id)
            .await?
            .ok_or_else(|| event_not_found(id))
    }

    pub async fn update(&self, id: Uuid, update: EventUpdate) -> ServiceResult<Event> {
        let mut event = self.get_by_id(id).await?;
        let previous_status = event.status;

        if let Some(title) = update.title {
            event.title = require_event_title(&title)?;
        }
        if let Some(category) = update.category {
            event.category = category;
        }
        if let Some(status) = update.status {
            event.status = status;
        }
        if let Some(deadline) = update.deadline {
            event.deadline = deadline;
        }
        if let Some(description) = update.description {
            event.description = description;
        }
        event.updated_at = Utc::now();

        let updated = self.store.update_event(&event).await?;
        if updated.status != previous_status {
            if previous_status.is_terminal() {
                tracing::info!(event_id = %id, "Reopening completed event as {}", updated.status);
            } else {
                tracing::info!(event_id = %id, from = %previous_status, to = %updated.status, "Event status changed");
            }
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_event(id).await? {
            return Err(event_not_found(id));
        }
        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }

    /// Events the user has been assigned, each listed once.
    pub async fn find_assigned_to(&self, user_id: Uuid) -> ServiceResult<Vec<Event>> {
        Ok(self.store.events_assigned_to(user_id).await?)
    }

    /// Events owned by any member of the family.
    pub async fn list_for_family(&self, family_id: Uuid) -> ServiceResult<Vec<Event>> {
        Ok(self.store.list_family_events(family_id).await?)
    }
}

fn require_event_title(title: &str) -> ServiceResult<String> {
    require_non_empty("title", title).map_err(|_| ServiceError::validation("Event must have a title."))
}

fn event_not_found(id: Uuid) -> ServiceError {
    ServiceError::not_found(format!("Event {} not found", id))
}
