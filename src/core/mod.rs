pub mod conversation;
pub mod generator;
pub mod matching;
pub mod narrator;
pub mod phrasebook;
pub mod store;
pub mod summary;
pub mod template;
