use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::models::{EventCategory, EventStatus};
use crate::database::{DatabaseManager, PgStore, Store};
use crate::services::{Invite, NewEvent, NewFamily, NewUser, ServiceResult};
use crate::state::AppState;

pub const DEMO_FAMILY_CODE: &str = "DOE-FAMILY";
pub const DEMO_PASSWORD: &str = "p@ssWord!2";

const MEMBERS: [(&str, &str); 4] = [
    ("Jane", "janedoe@email.com"),
    ("John", "johndoe@email.com"),
    ("Jimmy", "jimmydoe@email.com"),
    ("Judy", "judydoe@email.com"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub family_id: Option<Uuid>,
    pub users: usize,
    pub events: usize,
    pub assignments: usize,
    pub skipped: bool,
}

pub async fn handle(config: &AppConfig, migrate: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config.database).await?;
    if migrate {
        db.migrate().await?;
    }

    let store: Arc<dyn Store> = Arc::new(PgStore::new(db.clone()));
    let summary = seed_demo(&AppState::new(store, config)).await?;
    db.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!(summary)),
        OutputFormat::Text if summary.skipped => println!("Demo data already present, nothing to do"),
        OutputFormat::Text => println!(
            "✓ Seeded the Doe family: {} users, {} events, {} assignments",
            summary.users, summary.events, summary.assignments
        ),
    }
    Ok(())
}

/// Creates the Doe family of four with a handful of events. Does nothing if
/// the first member already exists.
pub async fn seed_demo(state: &AppState) -> ServiceResult<SeedSummary> {
    let (_, first_email) = MEMBERS[0];
    if state.store.find_user_by_email(first_email).await?.is_some() {
        tracing::info!("Demo data already present");
        return Ok(SeedSummary { family_id: None, users: 0, events: 0, assignments: 0, skipped: true });
    }

    let mut user_ids = Vec::with_capacity(MEMBERS.len());
    for (i, (first_name, email)) in MEMBERS.into_iter().enumerate() {
        let (family_code, family) = if i == 0 {
            (None, Some(NewFamily { name: "Doe".into(), code: Some(DEMO_FAMILY_CODE.into()) }))
        } else {
            (Some(DEMO_FAMILY_CODE.to_string()), None)
        };

        let token = state
            .users
            .create_user(NewUser {
                first_name: first_name.into(),
                last_name: "Doe".into(),
                email: email.into(),
                password: DEMO_PASSWORD.into(),
                family_code,
                family,
                ..Default::default()
            })
            .await?;
        user_ids.push(state.users.get_by_token(&token).await?.id);
    }

    let now = Utc::now();
    let drafts = [
        (NewEvent { deadline: Some(now + Duration::days(1)), ..NewEvent::new("Take out the trash", EventCategory::Chore) }, 2),
        (NewEvent { deadline: Some(now + Duration::days(3)), ..NewEvent::new("Dentist appointment", EventCategory::Appointment) }, 3),
        (NewEvent { description: Some("Milk, eggs, bread".into()), ..NewEvent::new("Grocery run", EventCategory::Errand) }, 1),
        (
            NewEvent {
                deadline: Some(now - Duration::days(2)),
                status: Some(EventStatus::Overdue),
                ..NewEvent::new("Mow the lawn", EventCategory::Chore)
            },
            2,
        ),
        (NewEvent { deadline: Some(now + Duration::days(14)), ..NewEvent::new("School play", EventCategory::Event) }, 0),
    ];

    let mut events = 0;
    let mut assignments = 0;
    for (draft, assignee) in drafts {
        let event = state.events.create(NewEvent { owner_id: Some(user_ids[0]), ..draft }).await?;
        events += 1;
        state.assignments.invite(Invite { event_id: event.id, user_id: user_ids[assignee] }).await?;
        assignments += 1;
    }

    let family_id = state.users.get_user(user_ids[0]).await?.family_id;
    tracing::info!(family_id = ?family_id, "Seeded demo family");
    Ok(SeedSummary { family_id, users: user_ids.len(), events, assignments, skipped: false })
}
