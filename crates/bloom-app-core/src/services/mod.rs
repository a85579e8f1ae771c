//! Request-scoped services. Both are stateless apart from their handles to
//! the store (and generator); every call goes to the store.

pub mod daily_quote;
pub mod guestbook;

pub use daily_quote::{DEFAULT_GENERATION_TIMEOUT, DailyQuoteCache, FALLBACK_QUOTE};
pub use guestbook::{DEFAULT_MAX_MESSAGE_CHARS, GuestbookService};
