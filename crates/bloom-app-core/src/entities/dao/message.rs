use chrono::{DateTime, Utc};

/// A row in the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRecord> for bloom_types::Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            content: record.content,
            created_at: record.created_at,
        }
    }
}
