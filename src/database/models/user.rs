use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub birthday: Option<DateTime<Utc>>,
    pub img_url: Option<String>,
    pub is_admin: bool,
    pub family_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Both users belong to the same (non-null) family.
    pub fn shares_family_with(&self, other: &User) -> bool {
        matches!((self.family_id, other.family_id), (Some(a), Some(b)) if a == b)
    }
}

/// Emails are stored trimmed and lowercased; lookups compare the same form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
