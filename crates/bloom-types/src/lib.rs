//! Wire types exchanged between the bloom server and the greeting-site client.
//!
//! Field names follow the camelCase JSON the client already consumes.

pub mod error;
pub mod health;
pub mod message;
pub mod quote;

pub use error::ErrorBody;
pub use health::HealthResponse;
pub use message::{CreateMessageRequest, Message};
pub use quote::DailyQuoteResponse;
