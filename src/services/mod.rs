pub mod assignment_service;
pub mod error;
pub mod event_service;
pub mod family_service;
pub mod user_service;
pub mod validation;

use serde::{Deserialize, Deserializer};

pub use assignment_service::{AssignmentLedger, Invite};
pub use error::{ServiceError, ServiceResult};
pub use event_service::{EventStore, EventUpdate, NewEvent};
pub use family_service::{FamilyRegistry, NewFamily};
pub use user_service::{NewUser, ProfileUpdate, UserDirectory};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
