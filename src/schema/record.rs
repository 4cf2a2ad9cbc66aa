use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::fruit::{Fruit, FruitType};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Newtype wrapper for record IDs: `<unix millis>-<9 random base36 chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Self {
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}-{}", now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: RecordId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Completed,
    Error,
}

/// A chat transcript about one newly arrived fruit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub fruit_type: FruitType,
    pub fruit_id: RecordId,
    pub fruit: Option<Fruit>,
    pub messages: Vec<ConversationMessage>,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// A proposed pairing between one apple and one orange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: RecordId,
    pub apple_id: RecordId,
    pub orange_id: RecordId,
    /// Compatibility in [0, 1].
    pub score: f64,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

/// A fruit held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fruit: Fruit,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn record_id_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let id = RecordId::generate(&mut rng, now);

        let (millis, suffix) = id.as_str().split_once('-').unwrap();
        assert_eq!(millis, "1700000000000");
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn record_ids_differ_within_same_millisecond() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let a = RecordId::generate(&mut rng, now);
        let b = RecordId::generate(&mut rng, now);
        assert_ne!(a, b);
    }

    #[test]
    fn conversation_json_uses_camel_case() {
        let now = Utc::now();
        let conv = Conversation {
            id: RecordId::from("conv-1"),
            fruit_type: FruitType::Apple,
            fruit_id: RecordId::from("fruit-1"),
            fruit: None,
            messages: vec![ConversationMessage {
                id: RecordId::from("msg-1"),
                role: Role::System,
                content: "A new apple has arrived!".to_string(),
                timestamp: now,
            }],
            status: ConversationStatus::Active,
            created_at: now,
        };
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(json["id"], "conv-1");
        assert_eq!(json["type"], "apple");
        assert_eq!(json["fruitId"], "fruit-1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json.get("createdAt").is_some());
    }
}
