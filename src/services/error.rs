use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::TokenError;
use crate::database::models::UnknownVariant;
use crate::database::store::constraints;
use crate::database::DatabaseError;

/// Errors raised by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        ServiceError::Auth(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

impl From<DatabaseError> for ServiceError {
    /// Constraint failures are the caller's fault and surface as validation
    /// errors; everything else stays a storage failure.
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(constraint) => ServiceError::Validation(
                match constraint.as_str() {
                    constraints::USER_EMAIL => "An account with this email already exists",
                    constraints::FAMILY_CODE => "That family code is already in use",
                    _ => "Record already exists",
                }
                .to_string(),
            ),
            DatabaseError::ForeignKeyViolation(constraint) => ServiceError::Validation(
                match constraint.as_str() {
                    constraints::ASSIGNED_EVENT => "Event does not exist",
                    constraints::ASSIGNED_USER => "User does not exist",
                    constraints::EVENT_OWNER => "Owner does not exist",
                    constraints::USER_FAMILY => "Family does not exist",
                    _ => "Referenced record does not exist",
                }
                .to_string(),
            ),
            DatabaseError::CheckViolation(constraint) => ServiceError::Validation(
                match constraint.as_str() {
                    constraints::EVENT_TITLE => "Event must have a title.",
                    _ => "Invalid field value",
                }
                .to_string(),
            ),
            DatabaseError::NotFound(what) => ServiceError::NotFound(format!("Not found: {}", what)),
            other => ServiceError::Database(other),
        }
    }
}

impl From<UnknownVariant> for ServiceError {
    fn from(err: UnknownVariant) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_become_validation_errors() {
        let err: ServiceError = DatabaseError::UniqueViolation(constraints::USER_EMAIL.to_string()).into();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("email")));

        let err: ServiceError = DatabaseError::ForeignKeyViolation(constraints::ASSIGNED_EVENT.to_string()).into();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Event does not exist"));
    }

    #[test]
    fn connection_failures_stay_internal() {
        let err: ServiceError = DatabaseError::ConfigMissing("DATABASE_URL").into();
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
