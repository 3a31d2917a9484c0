use async_trait::async_trait;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Assigned, Event, Family, User};
use super::store::Store;

const FAMILY_COLUMNS: &str = "id, name, code, created_at";

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, birthday, img_url, \
     is_admin, family_id, created_at, updated_at";

const EVENT_COLUMNS: &str =
    "id, title, deadline, category, status, description, owner_id, created_at, updated_at";

const EVENT_ORDER: &str = "ORDER BY deadline ASC NULLS LAST, title ASC";

/// `Store` backed by Postgres through sqlx
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseManager,
}

impl PgStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn list_families(&self) -> Result<Vec<Family>, DatabaseError> {
        let sql = format!("SELECT {FAMILY_COLUMNS} FROM families ORDER BY name ASC, created_at ASC");
        Ok(sqlx::query_as::<_, Family>(&sql).fetch_all(self.db.pool()).await?)
    }

    async fn find_family(&self, id: Uuid) -> Result<Option<Family>, DatabaseError> {
        let sql = format!("SELECT {FAMILY_COLUMNS} FROM families WHERE id = $1");
        Ok(sqlx::query_as::<_, Family>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn find_family_by_code(&self, code: &str) -> Result<Option<Family>, DatabaseError> {
        let sql = format!("SELECT {FAMILY_COLUMNS} FROM families WHERE code = $1");
        Ok(sqlx::query_as::<_, Family>(&sql)
            .bind(code)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn insert_family(&self, family: &Family) -> Result<Family, DatabaseError> {
        let sql = format!(
            "INSERT INTO families (id, name, code, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING {FAMILY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Family>(&sql)
            .bind(family.id)
            .bind(&family.name)
            .bind(&family.code)
            .bind(family.created_at)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn insert_user(&self, user: &User, family: Option<&Family>) -> Result<User, DatabaseError> {
        let mut tx = self.db.pool().begin().await?;

        if let Some(family) = family {
            sqlx::query("INSERT INTO families (id, name, code, created_at) VALUES ($1, $2, $3, $4)")
                .bind(family.id)
                .bind(&family.name)
                .bind(&family.code)
                .bind(family.created_at)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.birthday)
            .bind(&user.img_url)
            .bind(user.is_admin)
            .bind(user.family_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn update_user(&self, user: &User) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET first_name = $2, last_name = $3, password_hash = $4, birthday = $5, \
             img_url = $6, is_admin = $7, family_id = $8, updated_at = $9 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.birthday)
            .bind(&user.img_url)
            .bind(user.is_admin)
            .bind(user.family_id)
            .bind(user.updated_at)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))
    }

    async fn list_family_members(&self, family_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE family_id = $1 \
             ORDER BY first_name ASC, last_name ASC"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(family_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn insert_event(&self, event: &Event) -> Result<Event, DatabaseError> {
        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(event.deadline)
            .bind(event.category)
            .bind(event.status)
            .bind(&event.description)
            .bind(event.owner_id)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, DatabaseError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn update_event(&self, event: &Event) -> Result<Event, DatabaseError> {
        let sql = format!(
            "UPDATE events SET title = $2, deadline = $3, category = $4, status = $5, \
             description = $6, owner_id = $7, updated_at = $8 \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(event.deadline)
            .bind(event.category)
            .bind(event.status)
            .bind(&event.description)
            .bind(event.owner_id)
            .bind(event.updated_at)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("event {}", event.id)))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_family_events(&self, family_id: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE owner_id IN (SELECT id FROM users WHERE family_id = $1) {EVENT_ORDER}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(family_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn insert_assigned(&self, event_id: Uuid, user_id: Uuid) -> Result<Assigned, DatabaseError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        Ok(sqlx::query_as::<_, Assigned>(
            "INSERT INTO assigned (event_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (event_id, user_id) DO UPDATE SET event_id = EXCLUDED.event_id \
             RETURNING event_id, user_id, created_at",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?)
    }

    async fn events_assigned_to(&self, user_id: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE id IN (SELECT event_id FROM assigned WHERE user_id = $1) {EVENT_ORDER}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn assignees_of(&self, event_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE id IN (SELECT user_id FROM assigned WHERE event_id = $1) \
             ORDER BY first_name ASC, last_name ASC"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(event_id)
            .fetch_all(self.db.pool())
            .await?)
    }
}
