//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use bloom_app_core::{DailyQuoteCache, GuestbookService, OpenAiGenerator, SqliteStore};

use crate::config::Config;

pub type Guestbook = GuestbookService<SqliteStore>;
pub type QuoteCache = DailyQuoteCache<SqliteStore, OpenAiGenerator>;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Backing store; held here so shutdown can close the pool.
    pub store: Arc<SqliteStore>,
    pub guestbook: Arc<Guestbook>,
    pub quotes: Arc<QuoteCache>,
}

impl AppState {
    /// Wire the services onto one store and one generator.
    pub fn new(config: Config, store: SqliteStore, generator: OpenAiGenerator) -> Self {
        let store = Arc::new(store);
        let guestbook = GuestbookService::new(store.clone(), config.message_max_chars);
        let quotes =
            DailyQuoteCache::new(store.clone(), Arc::new(generator), config.generation_timeout());
        Self {
            config: Arc::new(config),
            store,
            guestbook: Arc::new(guestbook),
            quotes: Arc::new(quotes),
        }
    }
}
