use std::sync::Arc;

use tracing::{debug, info};

use crate::entities::{MessageRecord, MessageStore};
use crate::error::AppCoreError;

/// Default upper bound on a guestbook entry, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 500;

/// Append-only guestbook on top of a [`MessageStore`].
#[derive(Debug)]
pub struct GuestbookService<S> {
    store: Arc<S>,
    max_chars: usize,
}

impl<S: MessageStore> GuestbookService<S> {
    pub fn new(store: Arc<S>, max_chars: usize) -> Self {
        Self { store, max_chars }
    }

    /// Validate and persist one entry. Content is stored exactly as given;
    /// duplicates are allowed.
    pub async fn append(&self, content: &str) -> Result<MessageRecord, AppCoreError> {
        if content.trim().is_empty() {
            return Err(AppCoreError::Validation("content must not be empty".into()));
        }
        let chars = content.chars().count();
        if chars > self.max_chars {
            return Err(AppCoreError::Validation(format!(
                "content is {chars} characters; maximum is {}",
                self.max_chars
            )));
        }

        let message = self.store.insert_message(content).await?;
        info!(id = message.id, chars, "guestbook message stored");
        Ok(message)
    }

    /// Snapshot of every entry in insertion order.
    pub async fn list_all(&self) -> Result<Vec<MessageRecord>, AppCoreError> {
        let messages = self.store.list_messages().await?;
        debug!(count = messages.len(), "guestbook listed");
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SqliteStore;

    async fn guestbook(max_chars: usize) -> GuestbookService<SqliteStore> {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        GuestbookService::new(Arc::new(store), max_chars)
    }

    #[tokio::test]
    async fn appended_content_is_listed_with_unique_ids() {
        let book = guestbook(DEFAULT_MAX_MESSAGE_CHARS).await;
        let mut ids = Vec::new();
        for text in ["Happy birthday!", "  spaces kept  ", "Happy birthday!"] {
            let msg = book.append(text).await.unwrap();
            assert_eq!(msg.content, text);
            assert!(!ids.contains(&msg.id));
            ids.push(msg.id);
        }

        let listed = book.list_all().await.unwrap();
        assert_eq!(listed.iter().map(|m| m.id).collect::<Vec<_>>(), ids);
        assert_eq!(listed[1].content, "  spaces kept  ");
    }

    #[tokio::test]
    async fn empty_guestbook_lists_nothing() {
        let book = guestbook(DEFAULT_MAX_MESSAGE_CHARS).await;
        assert!(book.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_content_is_rejected_and_not_stored() {
        let book = guestbook(DEFAULT_MAX_MESSAGE_CHARS).await;
        for text in ["", "   ", "\n\t"] {
            let err = book.append(text).await.unwrap_err();
            assert!(matches!(err, AppCoreError::Validation(_)), "got {err:?}");
        }
        assert!(book.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn length_limit_counts_characters() {
        let book = guestbook(3).await;
        // Three multi-byte characters fit.
        book.append("♥♥♥").await.unwrap();

        let err = book.append("abcd").await.unwrap_err();
        match err {
            AppCoreError::Validation(msg) => assert!(msg.contains("maximum is 3")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(book.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn storage_failure_is_storage_error() {
        let store = Arc::new(SqliteStore::connect_in_memory().await.unwrap());
        let book = GuestbookService::new(store.clone(), DEFAULT_MAX_MESSAGE_CHARS);
        store.close().await;

        let err = book.append("hello").await.unwrap_err();
        assert!(matches!(err, AppCoreError::Storage(_)), "got {err:?}");
    }
}
