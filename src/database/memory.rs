use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{normalize_email, Assigned, Event, Family, User};
use super::store::{constraints, Store};

#[derive(Default)]
struct Tables {
    families: HashMap<Uuid, Family>,
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    assigned: Vec<Assigned>,
}

impl Tables {
    fn check_family(&self, family: &Family) -> Result<(), DatabaseError> {
        if family.name.trim().is_empty() {
            return Err(DatabaseError::CheckViolation("families_name_check".to_string()));
        }
        if self.families.values().any(|f| f.code == family.code) {
            return Err(DatabaseError::UniqueViolation(constraints::FAMILY_CODE.to_string()));
        }
        Ok(())
    }

    fn check_user(&self, user: &User, pending_family: Option<Uuid>) -> Result<(), DatabaseError> {
        let email = normalize_email(&user.email);
        if self
            .users
            .values()
            .any(|u| u.id != user.id && normalize_email(&u.email) == email)
        {
            return Err(DatabaseError::UniqueViolation(constraints::USER_EMAIL.to_string()));
        }
        if let Some(family_id) = user.family_id {
            if !self.families.contains_key(&family_id) && pending_family != Some(family_id) {
                return Err(DatabaseError::ForeignKeyViolation(constraints::USER_FAMILY.to_string()));
            }
        }
        Ok(())
    }

    fn check_event(&self, event: &Event) -> Result<(), DatabaseError> {
        if event.title.trim().is_empty() {
            return Err(DatabaseError::CheckViolation(constraints::EVENT_TITLE.to_string()));
        }
        if let Some(owner_id) = event.owner_id {
            if !self.users.contains_key(&owner_id) {
                return Err(DatabaseError::ForeignKeyViolation(constraints::EVENT_OWNER.to_string()));
            }
        }
        Ok(())
    }

    fn sorted_events<'a>(&self, events: impl Iterator<Item = &'a Event>) -> Vec<Event> {
        let mut events: Vec<Event> = events.cloned().collect();
        events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        events
    }

    fn sorted_users<'a>(&self, users: impl Iterator<Item = &'a User>) -> Vec<User> {
        let mut users: Vec<User> = users.cloned().collect();
        users.sort_by(|a, b| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)));
        users
    }
}

/// Process-local `Store`. Every write takes the single table lock, which
/// plays the role of the database's constraint checks.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_families(&self) -> Result<Vec<Family>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut families: Vec<Family> = tables.families.values().cloned().collect();
        families.sort_by(|a, b| (&a.name, a.created_at).cmp(&(&b.name, b.created_at)));
        Ok(families)
    }

    async fn find_family(&self, id: Uuid) -> Result<Option<Family>, DatabaseError> {
        Ok(self.tables.read().await.families.get(&id).cloned())
    }

    async fn find_family_by_code(&self, code: &str) -> Result<Option<Family>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.families.values().find(|f| f.code == code).cloned())
    }

    async fn insert_family(&self, family: &Family) -> Result<Family, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_family(family)?;
        tables.families.insert(family.id, family.clone());
        Ok(family.clone())
    }

    async fn insert_user(&self, user: &User, family: Option<&Family>) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(family) = family {
            tables.check_family(family)?;
        }
        tables.check_user(user, family.map(|f| f.id))?;

        if let Some(family) = family {
            tables.families.insert(family.id, family.clone());
        }
        let mut stored = user.clone();
        stored.email = normalize_email(&user.email);
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| normalize_email(&u.email) == email).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(DatabaseError::NotFound(format!("user {}", user.id)));
        }
        tables.check_user(user, None)?;
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn list_family_members(&self, family_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_users(tables.users.values().filter(|u| u.family_id == Some(family_id))))
    }

    async fn insert_event(&self, event: &Event) -> Result<Event, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_event(event)?;
        tables.events.insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        Ok(self.tables.read().await.events.get(&id).cloned())
    }

    async fn update_event(&self, event: &Event) -> Result<Event, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&event.id) {
            return Err(DatabaseError::NotFound(format!("event {}", event.id)));
        }
        tables.check_event(event)?;
        tables.events.insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let existed = tables.events.remove(&id).is_some();
        tables.assigned.retain(|a| a.event_id != id);
        Ok(existed)
    }

    async fn list_family_events(&self, family_id: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let tables = self.tables.read().await;
        let in_family = |owner: Option<Uuid>| {
            owner
                .and_then(|id| tables.users.get(&id))
                .is_some_and(|u| u.family_id == Some(family_id))
        };
        Ok(tables.sorted_events(tables.events.values().filter(|e| in_family(e.owner_id))))
    }

    async fn insert_assigned(&self, event_id: Uuid, user_id: Uuid) -> Result<Assigned, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&event_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::ASSIGNED_EVENT.to_string()));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(DatabaseError::ForeignKeyViolation(constraints::ASSIGNED_USER.to_string()));
        }
        if let Some(existing) = tables
            .assigned
            .iter()
            .find(|a| a.event_id == event_id && a.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let row = Assigned { event_id, user_id, created_at: Utc::now() };
        tables.assigned.push(row.clone());
        Ok(row)
    }

    async fn events_assigned_to(&self, user_id: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = tables
            .assigned
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.event_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(tables.sorted_events(ids.iter().filter_map(|id| tables.events.get(id))))
    }

    async fn assignees_of(&self, event_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut ids: Vec<Uuid> = tables
            .assigned
            .iter()
            .filter(|a| a.event_id == event_id)
            .map(|a| a.user_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(tables.sorted_users(ids.iter().filter_map(|id| tables.users.get(id))))
    }
}
