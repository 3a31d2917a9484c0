use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
pub enum EventCategory {
    Chore,
    Errand,
    Appointment,
    Event,
}

/// Lifecycle of an event. Transitions are client-driven; any member may
/// follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "event_status", rename_all = "kebab-case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Overdue,
    Missed,
    CompletedPending,
    Completed,
}

/// Raised when a string does not name a category or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Chore,
        EventCategory::Errand,
        EventCategory::Appointment,
        EventCategory::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Chore => "chore",
            EventCategory::Errand => "errand",
            EventCategory::Appointment => "appointment",
            EventCategory::Event => "event",
        }
    }
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Upcoming,
        EventStatus::Overdue,
        EventStatus::Missed,
        EventStatus::CompletedPending,
        EventStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Overdue => "overdue",
            EventStatus::Missed => "missed",
            EventStatus::CompletedPending => "completed-pending",
            EventStatus::Completed => "completed",
        }
    }

    /// No further transitions are expected once completed.
    pub fn is_terminal(&self) -> bool {
        match self {
            EventStatus::Completed => true,
            EventStatus::Upcoming
            | EventStatus::Overdue
            | EventStatus::Missed
            | EventStatus::CompletedPending => false,
        }
    }
}

impl FromStr for EventCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "category", value: s.to_string() })
    }
}

impl FromStr for EventStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "status", value: s.to_string() })
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub deadline: Option<DateTime<Utc>>,
    pub category: EventCategory,
    pub status: EventStatus,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Ordering used by list queries: earliest deadline first, undated last.
    pub fn sort_key(&self) -> (bool, Option<DateTime<Utc>>, &str) {
        (self.deadline.is_none(), self.deadline, self.title.as_str())
    }
}
