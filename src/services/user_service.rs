use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::auth::TokenService;
use crate::database::models::{normalize_email, User};
use crate::database::Store;

use super::error::{ServiceError, ServiceResult};
use super::family_service::{FamilyRegistry, NewFamily};
use super::validation::{require_non_empty, validate_email, validate_password};
use super::double_option;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Signup payload. Either `family_code` joins an existing family or
/// `family` creates one inline; never both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub birthday: Option<DateTime<Utc>>,
    pub img_url: Option<String>,
    pub family_code: Option<String>,
    pub family: Option<NewFamily>,
}

/// Partial profile update. `null` clears `birthday` / `imgUrl`; an absent
/// field is left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub birthday: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "double_option")]
    pub img_url: Option<Option<String>>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn Store>,
    families: FamilyRegistry,
    tokens: TokenService,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self {
            families: FamilyRegistry::new(store.clone()),
            store,
            tokens,
        }
    }

    /// Registers the user and returns their bearer token.
    pub async fn create_user(&self, new_user: NewUser) -> ServiceResult<String> {
        let first_name = require_non_empty("First name", &new_user.first_name)?;
        let last_name = require_non_empty("Last name", &new_user.last_name)?;
        validate_email(&new_user.email)?;
        validate_password(&new_user.password)?;

        let (family, inline) = match (new_user.family_code.as_deref(), new_user.family) {
            (Some(_), Some(_)) => {
                return Err(ServiceError::validation(
                    "Provide either a family code or a new family, not both",
                ))
            }
            (Some(code), None) => (Some(self.families.find_by_code(code).await?), false),
            (None, Some(new_family)) => (Some(new_family.into_family()?), true),
            (None, None) => (None, false),
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email: normalize_email(&new_user.email),
            password_hash: hash_password(&new_user.password)?,
            birthday: new_user.birthday,
            img_url: new_user.img_url.filter(|url| !url.trim().is_empty()),
            // Whoever creates a family administers it.
            is_admin: inline,
            family_id: family.as_ref().map(|f| f.id),
            created_at: now,
            updated_at: now,
        };

        let inline_family = if inline { family.as_ref() } else { None };
        let created = self.store.insert_user(&user, inline_family).await?;
        tracing::info!(user_id = %created.id, family_id = ?created.family_id, "Registered user");

        Ok(self.tokens.issue(created.id)?)
    }

    /// Verifies credentials and returns the user's token.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<String> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            // Same hashing cost as a wrong password.
            verify_against_dummy(password);
            tracing::warn!("Login failed: unknown email");
            return Err(ServiceError::auth(INVALID_CREDENTIALS));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ServiceError::auth(INVALID_CREDENTIALS));
        }

        tracing::debug!(user_id = %user.id, "Login succeeded");
        Ok(self.tokens.issue(user.id)?)
    }

    /// Resolves a bearer token to the full profile.
    pub async fn get_by_token(&self, token: &str) -> ServiceResult<User> {
        let user_id = self.tokens.verify(token).map_err(|e| {
            tracing::warn!("Rejected token: {}", e);
            ServiceError::auth("Invalid token")
        })?;

        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::auth("Token refers to an unknown user"))
    }

    pub async fn get_user(&self, id: Uuid) -> ServiceResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User {} not found", id)))
    }

    /// Everyone else in the user's family. Empty when the user has none.
    pub async fn find_relationships(&self, user_id: Uuid) -> ServiceResult<Vec<User>> {
        let user = self.get_user(user_id).await?;
        let Some(family_id) = user.family_id else {
            return Ok(Vec::new());
        };

        let mut members = self.store.list_family_members(family_id).await?;
        members.retain(|member| member.id != user_id);
        Ok(members)
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> ServiceResult<User> {
        let mut user = self.get_user(user_id).await?;

        if let Some(first_name) = update.first_name {
            user.first_name = require_non_empty("First name", &first_name)?;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = require_non_empty("Last name", &last_name)?;
        }
        if let Some(birthday) = update.birthday {
            user.birthday = birthday;
        }
        if let Some(img_url) = update.img_url {
            user.img_url = img_url.filter(|url| !url.trim().is_empty());
        }
        if let Some(password) = update.password {
            validate_password(&password)?;
            user.password_hash = hash_password(&password)?;
        }
        user.updated_at = Utc::now();

        let updated = self.store.update_user(&user).await?;
        tracing::debug!(user_id = %updated.id, "Updated profile");
        Ok(updated)
    }
}
