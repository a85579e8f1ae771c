use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A guestbook entry as returned by `GET /api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Store-assigned, strictly increasing identifier.
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn message_serializes_with_camel_case_keys() {
        let msg = Message {
            id: 7,
            content: "happy birthday".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["content"], "happy birthday");
        assert_eq!(v["createdAt"], "2025-01-01T10:00:00Z");
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn empty_content_fails_validation() {
        let req = CreateMessageRequest { content: String::new() };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("content"));
    }

    #[test]
    fn non_empty_content_passes_validation() {
        let req: CreateMessageRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
