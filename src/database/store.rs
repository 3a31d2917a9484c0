use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Assigned, Event, Family, User};

/// Constraint names shared by both stores so error reporting is identical.
pub mod constraints {
    pub const USER_EMAIL: &str = "users_email_key";
    pub const USER_FAMILY: &str = "users_family_id_fkey";
    pub const FAMILY_CODE: &str = "families_code_key";
    pub const EVENT_TITLE: &str = "events_title_check";
    pub const EVENT_OWNER: &str = "events_owner_id_fkey";
    pub const ASSIGNED_EVENT: &str = "assigned_event_id_fkey";
    pub const ASSIGNED_USER: &str = "assigned_user_id_fkey";
}

/// Relational storage for families, users, events and assignments.
///
/// Implementations enforce uniqueness and referential integrity themselves;
/// callers never check-then-insert.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn list_families(&self) -> Result<Vec<Family>, DatabaseError>;
    async fn find_family(&self, id: Uuid) -> Result<Option<Family>, DatabaseError>;
    async fn find_family_by_code(&self, code: &str) -> Result<Option<Family>, DatabaseError>;
    async fn insert_family(&self, family: &Family) -> Result<Family, DatabaseError>;

    /// Inserts the user, and `family` first when given, atomically.
    async fn insert_user(&self, user: &User, family: Option<&Family>) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn update_user(&self, user: &User) -> Result<User, DatabaseError>;
    /// Members ordered by first then last name.
    async fn list_family_members(&self, family_id: Uuid) -> Result<Vec<User>, DatabaseError>;

    async fn insert_event(&self, event: &Event) -> Result<Event, DatabaseError>;
    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError>;
    async fn update_event(&self, event: &Event) -> Result<Event, DatabaseError>;
    /// Returns false when no such event existed.
    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError>;
    /// Events owned by any member of the family.
    async fn list_family_events(&self, family_id: Uuid) -> Result<Vec<Event>, DatabaseError>;

    /// Records the assignment; an existing pair is returned unchanged.
    async fn insert_assigned(&self, event_id: Uuid, user_id: Uuid) -> Result<Assigned, DatabaseError>;
    /// Distinct events assigned to the user.
    async fn events_assigned_to(&self, user_id: Uuid) -> Result<Vec<Event>, DatabaseError>;
    async fn assignees_of(&self, event_id: Uuid) -> Result<Vec<User>, DatabaseError>;
}
