pub mod assigned;
pub mod event;
pub mod family;
pub mod user;

pub use assigned::Assigned;
pub use event::{Event, EventCategory, EventStatus, UnknownVariant};
pub use family::Family;
pub use user::{normalize_email, User};
