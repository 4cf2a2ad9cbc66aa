/// Conversation builder — turns a freshly generated fruit into a transcript.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::core::generator::FruitGenerator;
use crate::core::narrator::Narrator;
use crate::schema::fruit::{Fruit, FruitType};
use crate::schema::record::{
    Conversation, ConversationMessage, ConversationStatus, RecordId, Role,
};

impl Conversation {
    /// Generate a fruit of `kind` and open a conversation introducing it.
    ///
    /// The transcript is: an arrival notice, the fruit describing itself,
    /// the fruit stating its preferences, and a "searching" notice.
    pub fn start<R: Rng + ?Sized>(
        kind: FruitType,
        generator: &FruitGenerator,
        narrator: &Narrator,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Conversation {
        let fruit = generator.generate(kind, rng);
        Self::for_fruit(fruit, RecordId::generate(rng, now), narrator, rng, now)
    }

    /// Open a conversation for an existing fruit.
    pub fn for_fruit<R: Rng + ?Sized>(
        fruit: Fruit,
        fruit_id: RecordId,
        narrator: &Narrator,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Conversation {
        let kind = fruit.fruit_type;
        let lines = [
            (
                Role::System,
                format!("A new {} has arrived! Let's hear what they have to say...", kind),
            ),
            (Role::User, narrator.describe_attributes(&fruit)),
            (Role::User, narrator.describe_preferences(&fruit)),
            (
                Role::System,
                format!(
                    "Profile recorded. Searching for compatible {}...",
                    kind.counterpart().plural()
                ),
            ),
        ];

        let messages = lines
            .into_iter()
            .map(|(role, content)| ConversationMessage {
                id: RecordId::generate(rng, now),
                role,
                content,
                timestamp: now,
            })
            .collect();

        let conversation = Conversation {
            id: RecordId::generate(rng, now),
            fruit_type: kind,
            fruit_id,
            fruit: Some(fruit),
            messages,
            status: ConversationStatus::Active,
            created_at: now,
        };
        debug!(id = %conversation.id, fruit_type = kind.name(), "started conversation");
        conversation
    }
}
