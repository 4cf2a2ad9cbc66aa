//! Fruit Matchmaker — randomized fruit profiles and the chat that introduces them.
//!
//! Generates apples and oranges with partially-known attributes and optional
//! preferences, narrates them in the first person from a RON phrasebook,
//! scores how well two fruits suit each other, and keeps conversations and
//! matches in an in-memory store.

pub mod core;
pub mod schema;
