use std::future::Future;

use chrono::{NaiveDate, Utc};

use super::{DailyQuoteRecord, SqliteStore, parse_timestamp};
use crate::error::StoreError;

/// Date-keyed quote persistence.
///
/// `quote_date` is unique: [`QuoteStore::insert_quote`] must fail with
/// [`StoreError::UniqueViolation`] when the date already has a row, and must
/// decide that atomically.
pub trait QuoteStore: Send + Sync + 'static {
    fn find_quote_by_date(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<DailyQuoteRecord>, StoreError>> + Send;

    fn insert_quote(
        &self,
        content: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DailyQuoteRecord, StoreError>> + Send;
}

impl QuoteStore for SqliteStore {
    async fn find_quote_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyQuoteRecord>, StoreError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            "SELECT id, content, created_at FROM daily_quotes WHERE quote_date = ?1",
        )
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, content, created_at)| DailyQuoteRecord {
            id,
            content,
            quote_date: date,
            created_at: parse_timestamp(&created_at, "daily_quotes.created_at"),
        }))
    }

    async fn insert_quote(
        &self,
        content: &str,
        date: NaiveDate,
    ) -> Result<DailyQuoteRecord, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO daily_quotes (content, quote_date, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(content)
        .bind(date.to_string())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(DailyQuoteRecord {
                id: done.last_insert_rowid(),
                content: content.to_owned(),
                quote_date: date,
                created_at,
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::UniqueViolation {
                    key: format!("daily_quotes.quote_date = {date}"),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
