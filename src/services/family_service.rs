use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::Family;
use crate::database::Store;

use super::error::{ServiceError, ServiceResult};
use super::validation::require_non_empty;

/// Payload for a new family, standalone or inline at signup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFamily {
    pub name: String,
    pub code: Option<String>,
}

impl NewFamily {
    /// Validates the fields and builds the row; the code is generated when
    /// not supplied.
    pub fn into_family(self) -> ServiceResult<Family> {
        let name = require_non_empty("Family name", &self.name)?;
        let code = match self.code.as_deref().map(str::trim) {
            Some("") => return Err(ServiceError::validation("Family code cannot be blank")),
            Some(code) => code.to_string(),
            None => Family::generate_code(),
        };
        Ok(Family {
            id: Uuid::new_v4(),
            name,
            code,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone)]
pub struct FamilyRegistry {
    store: Arc<dyn Store>,
}

impl FamilyRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_families(&self) -> ServiceResult<Vec<Family>> {
        Ok(self.store.list_families().await?)
    }

    pub async fn get_family(&self, id: Uuid) -> ServiceResult<Family> {
        self.store
            .find_family(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Family {} not found", id)))
    }

    pub async fn find_by_code(&self, code: &str) -> ServiceResult<Family> {
        self.store
            .find_family_by_code(code.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("No family matches that code"))
    }

    pub async fn create_family(&self, new_family: NewFamily) -> ServiceResult<Family> {
        let family = new_family.into_family()?;
        let created = self.store.insert_family(&family).await?;
        tracing::info!(family_id = %created.id, "Created family {}", created.name);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn registry() -> FamilyRegistry {
        FamilyRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn creates_and_fetches_a_family() {
        let families = registry();
        let created = families
            .create_family(NewFamily { name: " Smith ".into(), code: Some("SMITH-1".into()) })
            .await
            .unwrap();
        assert_eq!(created.name, "Smith");

        assert_eq!(families.get_family(created.id).await.unwrap(), created);
        assert_eq!(families.find_by_code("SMITH-1").await.unwrap().id, created.id);
        assert_eq!(families.list_families().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn generates_a_code_when_missing() {
        let created = registry()
            .create_family(NewFamily { name: "Smith".into(), code: None })
            .await
            .unwrap();
        assert_eq!(created.code.len(), 12);
    }

    #[tokio::test]
    async fn duplicate_code_is_a_validation_error() {
        let families = registry();
        let new = || NewFamily { name: "Smith".into(), code: Some("X".into()) };
        families.create_family(new()).await.unwrap();
        assert!(matches!(families.create_family(new()).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_ids_and_codes_are_not_found() {
        let families = registry();
        assert!(matches!(families.get_family(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(families.find_by_code("nope").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let result = registry().create_family(NewFamily { name: "  ".into(), code: None }).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
