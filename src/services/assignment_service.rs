use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{Assigned, User};
use crate::database::Store;

use super::error::ServiceResult;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub event_id: Uuid,
    pub user_id: Uuid,
}

/// Who is responsible for what.
#[derive(Clone)]
pub struct AssignmentLedger {
    store: Arc<dyn Store>,
}

impl AssignmentLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Assigns the user to the event. Unknown ids are validation errors;
    /// repeating an invite returns the existing assignment.
    pub async fn invite(&self, invite: Invite) -> ServiceResult<Assigned> {
        let assigned = self.store.insert_assigned(invite.event_id, invite.user_id).await?;
        tracing::info!(event_id = %assigned.event_id, user_id = %assigned.user_id, "Assigned user to event");
        Ok(assigned)
    }

    pub async fn find_assignees(&self, event_id: Uuid) -> ServiceResult<Vec<User>> {
        Ok(self.store.assignees_of(event_id).await?)
    }
}
