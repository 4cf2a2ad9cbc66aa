/// Matchmaking store — in-memory fruits, conversations, and matches.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::matching::compatibility;
use crate::schema::fruit::{Fruit, FruitType};
use crate::schema::record::{
    Conversation, ConversationMessage, FruitRecord, Match, MatchStatus, RecordId,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    ConversationNotFound(RecordId),
    #[error("fruit not found: {0}")]
    FruitNotFound(RecordId),
    #[error("a fruit with id {0} is already stored")]
    DuplicateFruit(RecordId),
    #[error("fruit {id} is an {actual}, expected an {expected}")]
    WrongFruitType {
        id: RecordId,
        expected: FruitType,
        actual: FruitType,
    },
    #[error("match not found: {0}")]
    MatchNotFound(RecordId),
}

/// Number of stored fruits per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitCounts {
    pub apples: usize,
    pub oranges: usize,
}

/// Everything the dashboard displays. Records are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MatchmakingStore {
    fruits: Vec<FruitRecord>,
    fruit_index: FxHashMap<RecordId, usize>,
    conversations: Vec<Conversation>,
    matches: Vec<Match>,
    active_conversation_id: Option<RecordId>,
}

impl MatchmakingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- fruits ----

    /// Store a fruit under `id`. Ids are unique; an existing id is an error.
    pub fn add_fruit(
        &mut self,
        id: RecordId,
        fruit: Fruit,
        now: DateTime<Utc>,
    ) -> Result<&FruitRecord, StoreError> {
        if self.fruit_index.contains_key(&id) {
            return Err(StoreError::DuplicateFruit(id));
        }
        Ok(self.insert_fruit(id, fruit, now))
    }

    fn insert_fruit(&mut self, id: RecordId, fruit: Fruit, now: DateTime<Utc>) -> &FruitRecord {
        debug!(%id, fruit_type = fruit.fruit_type.name(), "storing fruit");
        let index = self.fruits.len();
        self.fruit_index.insert(id.clone(), index);
        self.fruits.push(FruitRecord {
            id,
            fruit,
            created_at: now,
        });
        &self.fruits[index]
    }

    pub fn fruit(&self, id: &RecordId) -> Option<&FruitRecord> {
        self.fruit_index.get(id).map(|&i| &self.fruits[i])
    }

    pub fn fruits(&self) -> &[FruitRecord] {
        &self.fruits
    }

    /// Fruits of one type, newest first.
    pub fn fruits_by_type(&self, kind: FruitType) -> Vec<&FruitRecord> {
        let mut found: Vec<&FruitRecord> = self
            .fruits
            .iter()
            .filter(|record| record.fruit.fruit_type == kind)
            .collect();
        found.reverse();
        found
    }

    pub fn fruit_counts(&self) -> FruitCounts {
        let apples = self
            .fruits
            .iter()
            .filter(|record| record.fruit.fruit_type == FruitType::Apple)
            .count();
        FruitCounts {
            apples,
            oranges: self.fruits.len() - apples,
        }
    }

    // ---- conversations ----

    /// Store a conversation. Its fruit, if any, is stored under `fruit_id`.
    pub fn add_conversation(&mut self, conversation: Conversation) {
        if let Some(fruit) = &conversation.fruit {
            if !self.fruit_index.contains_key(&conversation.fruit_id) {
                self.insert_fruit(conversation.fruit_id.clone(), fruit.clone(), conversation.created_at);
            }
        }
        debug!(id = %conversation.id, "storing conversation");
        self.conversations.push(conversation);
    }

    pub fn add_message(
        &mut self,
        conversation_id: &RecordId,
        message: ConversationMessage,
    ) -> Result<(), StoreError> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| &c.id == conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.clone()))?;
        conversation.messages.push(message);
        Ok(())
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &RecordId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// Select a conversation, or clear the selection with `None`.
    ///
    /// The id is not checked; selecting a missing conversation simply
    /// makes [`Self::active_conversation`] return `None`.
    pub fn set_active_conversation(&mut self, id: Option<RecordId>) {
        self.active_conversation_id = id;
    }

    pub fn active_conversation_id(&self) -> Option<&RecordId> {
        self.active_conversation_id.as_ref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_ref()
            .and_then(|id| self.conversation(id))
    }

    // ---- matches ----

    /// Score an apple against an orange and record a pending match.
    pub fn propose_match(
        &mut self,
        id: RecordId,
        apple_id: &RecordId,
        orange_id: &RecordId,
        now: DateTime<Utc>,
    ) -> Result<&Match, StoreError> {
        let apple = self.typed_fruit(apple_id, FruitType::Apple)?;
        let orange = self.typed_fruit(orange_id, FruitType::Orange)?;
        let score = compatibility(apple, orange);

        debug!(%id, %apple_id, %orange_id, score, "proposing match");
        self.add_match(Match {
            id,
            apple_id: apple_id.clone(),
            orange_id: orange_id.clone(),
            score,
            status: MatchStatus::Pending,
            created_at: now,
        });
        Ok(&self.matches[self.matches.len() - 1])
    }

    pub fn add_match(&mut self, record: Match) {
        self.matches.push(record);
    }

    pub fn set_match_status(&mut self, id: &RecordId, status: MatchStatus) -> Result<(), StoreError> {
        let record = self
            .matches
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::MatchNotFound(id.clone()))?;
        debug!(%id, ?status, "updating match status");
        record.status = status;
        Ok(())
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Percentage of matches confirmed, rounded. 0 when there are none.
    pub fn success_rate(&self) -> u32 {
        if self.matches.is_empty() {
            return 0;
        }
        let confirmed = self
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Confirmed)
            .count();
        (confirmed as f64 / self.matches.len() as f64 * 100.0).round() as u32
    }

    /// Drop everything.
    pub fn reset(&mut self) {
        debug!("resetting store");
        *self = Self::default();
    }

    fn typed_fruit(&self, id: &RecordId, expected: FruitType) -> Result<&Fruit, StoreError> {
        let record = self
            .fruit(id)
            .ok_or_else(|| StoreError::FruitNotFound(id.clone()))?;
        if record.fruit.fruit_type != expected {
            return Err(StoreError::WrongFruitType {
                id: id.clone(),
                expected,
                actual: record.fruit.fruit_type,
            });
        }
        Ok(&record.fruit)
    }
}
