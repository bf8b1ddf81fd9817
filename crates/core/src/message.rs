//! Chat message entity and its wire encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::format_date;
use crate::error::{RelayError, RelayResult};
use crate::id::MessageId;

/// A message that has been built from a request but not yet numbered.
///
/// Becomes a [`Message`] exactly once, through [`NewMessage::with_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub content: String,
    pub date: String,
}

impl NewMessage {
    /// Build a draft stamped with `at` in the message date format.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        topic: impl Into<String>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            topic: topic.into(),
            content: content.into(),
            date: format_date(at),
        }
    }

    /// Same as [`NewMessage::new`], stamped with the current time.
    pub fn now(
        name: impl Into<String>,
        email: impl Into<String>,
        topic: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(name, email, topic, content, Utc::now())
    }

    pub fn with_id(self, id: MessageId) -> Message {
        Message {
            id,
            name: self.name,
            email: self.email,
            date: self.date,
            topic: self.topic,
            content: self.content,
        }
    }
}

/// One chat post. Immutable once numbered.
///
/// Field order here is the JSON field order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub date: String,
    pub topic: String,
    pub content: String,
}

impl Message {
    pub fn to_json(&self) -> RelayResult<String> {
        serde_json::to_string(self).map_err(|e| RelayError::decode(e.to_string()))
    }

    pub fn from_json(data: &str) -> RelayResult<Self> {
        serde_json::from_str(data).map_err(|e| RelayError::decode(e.to_string()))
    }
}

/// Encode messages as the JSON array pushed to viewers (`[{...},...]`).
pub fn encode_batch(messages: &[Message]) -> RelayResult<String> {
    serde_json::to_string(messages).map_err(|e| RelayError::decode(e.to_string()))
}

/// Decode a pushed batch. Used by clients and tests.
pub fn decode_batch(payload: &str) -> RelayResult<Vec<Message>> {
    serde_json::from_str(payload).map_err(|e| RelayError::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Message {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        NewMessage::new("Alice", "a@x.com", "chat", "hi", at).with_id(MessageId::new(1))
    }

    #[test]
    fn wire_shape_has_fixed_field_order() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Alice","email":"a@x.com","date":"01/02/2024 03:04:05","topic":"chat","content":"hi"}"#
        );
    }

    #[test]
    fn content_with_quotes_stays_valid_json() {
        let mut m = sample();
        m.content = r#"she said "hi" \o/"#.to_string();
        let back = Message::from_json(&m.to_json().unwrap()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn single_message_batch_is_a_one_element_array() {
        let payload = encode_batch(&[sample()]).unwrap();
        assert!(payload.starts_with("[{") && payload.ends_with("}]"));
        assert_eq!(decode_batch(&payload).unwrap(), vec![sample()]);
    }

    #[test]
    fn empty_fields_are_accepted() {
        let m = NewMessage::now("", "", "", "").with_id(MessageId::new(9));
        assert_eq!(m.id, MessageId::new(9));
        assert!(crate::date::is_message_date(&m.date));
    }

    #[test]
    fn malformed_entry_is_a_decode_error() {
        let err = Message::from_json("{not json").unwrap_err();
        assert!(matches!(err, RelayError::DecodeError(_)));
    }
}
