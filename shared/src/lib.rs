pub mod config;
pub mod error;
pub mod items;
pub mod responses;
pub mod router;
pub mod schema;
pub mod store;
pub mod types;
pub mod users;

use config::GatewayConfig;
use store::{Collection, RecordStore};
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup and handed to every request. Holds no record state,
/// only the store handle and the collections it serves.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub users: Collection,
    pub items: Collection,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &GatewayConfig) -> Arc<Self> {
        Arc::new(Self {
            store,
            users: Collection::new(&config.user_table, "userId"),
            items: Collection::new(&config.item_table, "itemId"),
        })
    }
}
