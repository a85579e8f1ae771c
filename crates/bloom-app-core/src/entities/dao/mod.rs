pub mod message;
pub mod quote;

pub use message::MessageRecord;
pub use quote::DailyQuoteRecord;
