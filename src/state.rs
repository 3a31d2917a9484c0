use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{AssignmentLedger, EventStore, FamilyRegistry, UserDirectory};

/// Shared handles for every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: UserDirectory,
    pub families: FamilyRegistry,
    pub events: EventStore,
    pub assignments: AssignmentLedger,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        let tokens = TokenService::new(&config.security);
        Self {
            users: UserDirectory::new(store.clone(), tokens),
            families: FamilyRegistry::new(store.clone()),
            events: EventStore::new(store.clone()),
            assignments: AssignmentLedger::new(store.clone()),
            store,
        }
    }
}
