//! WASM bindings for fruit-matchmaker — powers the matchmaking dashboard.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use fruit_matchmaker::core::generator::{generate_fruit, FruitGenerator};
use fruit_matchmaker::core::narrator::{describe_attributes, describe_preferences, Narrator};
use fruit_matchmaker::core::store::{FruitCounts, MatchmakingStore};
use fruit_matchmaker::schema::fruit::{Fruit, FruitType};
use fruit_matchmaker::schema::record::{Conversation, RecordId};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStats {
    fruit_counts: FruitCounts,
    conversation_count: usize,
    match_count: usize,
    success_rate: u32,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------
fn parse_kind(s: &str) -> Result<FruitType, JsError> {
    s.parse::<FruitType>()
        .map_err(|e| JsError::new(&e.to_string()))
}

fn parse_fruit(json: &str) -> Result<Fruit, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid fruit JSON: {e}")))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Stateless entry points
// ---------------------------------------------------------------------------

/// Generate a fruit of the given kind (`"apple"` or `"orange"`) as JSON.
#[wasm_bindgen(js_name = generateFruit)]
pub fn generate_fruit_json(kind: &str) -> Result<String, JsError> {
    to_json(&generate_fruit(parse_kind(kind)?))
}

/// Describe a fruit's attributes. Takes the fruit as JSON.
#[wasm_bindgen(js_name = describeAttributes)]
pub fn describe_attributes_json(fruit_json: &str) -> Result<String, JsError> {
    Ok(describe_attributes(&parse_fruit(fruit_json)?))
}

/// Describe a fruit's preferences. Takes the fruit as JSON.
#[wasm_bindgen(js_name = describePreferences)]
pub fn describe_preferences_json(fruit_json: &str) -> Result<String, JsError> {
    Ok(describe_preferences(&parse_fruit(fruit_json)?))
}

// ---------------------------------------------------------------------------
// MatchmakingDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct MatchmakingDemo {
    store: MatchmakingStore,
    generator: FruitGenerator,
    narrator: Narrator,
    rng: StdRng,
}

#[wasm_bindgen]
impl MatchmakingDemo {
    /// Create an empty dashboard whose fruits are drawn from `seed`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> MatchmakingDemo {
        MatchmakingDemo {
            store: MatchmakingStore::new(),
            generator: FruitGenerator::default(),
            narrator: Narrator::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a fruit, open a conversation for it, and make that
    /// conversation active. Returns the conversation as JSON.
    #[wasm_bindgen(js_name = startConversation)]
    pub fn start_conversation(&mut self, kind: &str) -> Result<String, JsError> {
        let conversation = Conversation::start(
            parse_kind(kind)?,
            &self.generator,
            &self.narrator,
            &mut self.rng,
            Utc::now(),
        );
        let json = to_json(&conversation)?;
        self.store.set_active_conversation(Some(conversation.id.clone()));
        self.store.add_conversation(conversation);
        Ok(json)
    }

    /// All conversations as a JSON array, oldest first.
    pub fn conversations(&self) -> Result<String, JsError> {
        to_json(self.store.conversations())
    }

    /// Select a conversation by id; an empty string clears the selection.
    #[wasm_bindgen(js_name = setActive)]
    pub fn set_active(&mut self, id: &str) {
        let id = (!id.is_empty()).then(|| RecordId::from(id));
        self.store.set_active_conversation(id);
    }

    /// The active conversation as JSON, or `null`.
    #[wasm_bindgen(js_name = activeConversation)]
    pub fn active_conversation(&self) -> Result<String, JsError> {
        to_json(&self.store.active_conversation())
    }

    /// Counts and success rate for the dashboard header, as JSON.
    pub fn stats(&self) -> Result<String, JsError> {
        to_json(&DashboardStats {
            fruit_counts: self.store.fruit_counts(),
            conversation_count: self.store.conversations().len(),
            match_count: self.store.match_count(),
            success_rate: self.store.success_rate(),
        })
    }

    /// Clear every conversation, fruit, and match.
    pub fn reset(&mut self) {
        self.store.reset();
    }
}
