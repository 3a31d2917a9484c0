use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    /// Join code handed to new members at signup.
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl Family {
    /// Generates a twelve character upper-case join code.
    pub fn generate_code() -> String {
        Uuid::new_v4().simple().to_string()[..12].to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_short_and_distinct() {
        let a = Family::generate_code();
        let b = Family::generate_code();
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(a, b);
    }
}
