use chrono::{DateTime, NaiveDate, Utc};

/// A row in the `daily_quotes` table. At most one exists per `quote_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuoteRecord {
    pub id: i64,
    pub content: String,
    pub quote_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<DailyQuoteRecord> for bloom_types::DailyQuoteResponse {
    fn from(record: DailyQuoteRecord) -> Self {
        Self { content: record.content }
    }
}
