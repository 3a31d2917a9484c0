pub mod dto;

pub use dto::{CreateEventRequest, FamilySummary, InviteRequest, LoginRequest, UpdateEventRequest};
