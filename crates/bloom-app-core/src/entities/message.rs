use std::future::Future;

use chrono::Utc;

use super::{MessageRecord, SqliteStore, parse_timestamp};
use crate::error::StoreError;

/// Append-only guestbook persistence.
pub trait MessageStore: Send + Sync + 'static {
    /// Insert a message and return it with its store-assigned id and timestamp.
    fn insert_message(
        &self,
        content: &str,
    ) -> impl Future<Output = Result<MessageRecord, StoreError>> + Send;

    /// All messages in insertion order.
    fn list_messages(&self) -> impl Future<Output = Result<Vec<MessageRecord>, StoreError>> + Send;
}

impl MessageStore for SqliteStore {
    async fn insert_message(&self, content: &str) -> Result<MessageRecord, StoreError> {
        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO messages (content, created_at) VALUES (?1, ?2)")
            .bind(content)
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(MessageRecord {
            id: result.last_insert_rowid(),
            content: content.to_owned(),
            created_at,
        })
    }

    async fn list_messages(&self) -> Result<Vec<MessageRecord>, StoreError> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, content, created_at FROM messages ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, content, created_at)| MessageRecord {
                id,
                content,
                created_at: parse_timestamp(&created_at, "messages.created_at"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        assert!(store.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn messages_list_in_insertion_order() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let first = store.insert_message("first").await.unwrap();
        let second = store.insert_message("second").await.unwrap();
        let dup = store.insert_message("first").await.unwrap();

        assert!(first.id < second.id && second.id < dup.id);

        let listed = store.list_messages().await.unwrap();
        let contents: Vec<_> = listed.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "first"]);
        assert_eq!(listed[1], second);
    }
}
