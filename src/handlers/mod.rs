pub mod events;
pub mod families;
pub mod health;
pub mod users;
