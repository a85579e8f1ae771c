//! bloom-app-core – persistence, text generation and the two services the
//! greeting site needs: the guestbook and the daily quote cache.
//!
//! The HTTP layer lives in `bloom-server`; nothing in this crate depends on
//! axum.

pub mod entities;
pub mod error;
pub mod generator;
pub mod services;

pub use entities::{DailyQuoteRecord, MessageRecord, MessageStore, QuoteStore, SqliteStore};
pub use error::{AppCoreError, GenerationError, StoreError};
pub use generator::{OpenAiConfig, OpenAiGenerator, PromptTemplate, TextGenerator};
pub use services::{DailyQuoteCache, GuestbookService};
