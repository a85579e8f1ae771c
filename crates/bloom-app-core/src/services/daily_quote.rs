//! Read-through cache for the quote of the day.
//!
//! One row per calendar date. On a miss the generator is called outside any
//! lock and the result is inserted under the store's unique `quote_date`
//! key. A caller whose insert loses that race drops its own text and returns
//! the row that won, so every caller for a date sees the same quote even when
//! several server processes share the database.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::entities::{DailyQuoteRecord, QuoteStore};
use crate::error::{AppCoreError, GenerationError, StoreError};
use crate::generator::{DAILY_QUOTE_PROMPT, TextGenerator};

/// Stored when the generator answers with empty text.
pub const FALLBACK_QUOTE: &str = "You are the light of my life.";

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct DailyQuoteCache<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    timeout: Duration,
}

impl<S: QuoteStore, G: TextGenerator> DailyQuoteCache<S, G> {
    pub fn new(store: Arc<S>, generator: Arc<G>, timeout: Duration) -> Self {
        Self { store, generator, timeout }
    }

    /// Quote for the current UTC calendar date.
    pub async fn quote_for_today(&self) -> Result<DailyQuoteRecord, AppCoreError> {
        self.get_or_create_for_date(Utc::now().date_naive()).await
    }

    /// Return the stored quote for `date`, generating and storing one first
    /// if the date has none.
    ///
    /// Generation failures persist nothing, so the next call retries.
    pub async fn get_or_create_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<DailyQuoteRecord, AppCoreError> {
        if let Some(existing) = self.store.find_quote_by_date(date).await? {
            debug!(%date, id = existing.id, "daily quote hit");
            return Ok(existing);
        }

        info!(%date, "daily quote miss; generating");
        let content = self.generate().await?;

        match self.store.insert_quote(&content, date).await {
            Ok(created) => {
                info!(%date, id = created.id, "daily quote stored");
                Ok(created)
            }
            Err(StoreError::UniqueViolation { .. }) => {
                info!(%date, "daily quote already stored by a concurrent request; discarding local generation");
                self.store.find_quote_by_date(date).await?.ok_or_else(|| {
                    AppCoreError::from(StoreError::RowNotFound(format!("daily quote for {date}")))
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn generate(&self) -> Result<String, GenerationError> {
        let text = tokio::time::timeout(self.timeout, self.generator.generate(&DAILY_QUOTE_PROMPT))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            warn!("generator returned empty text; using fallback quote");
            return Ok(FALLBACK_QUOTE.to_owned());
        }
        Ok(text.to_owned())
    }
}
