//! Plain data types shared by the generator, narrator, and store.

pub mod fruit;
pub mod preference;
pub mod record;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown fruit type: {0}")]
    UnknownFruitType(String),
    #[error("unknown shine factor: {0}")]
    UnknownShineFactor(String),
    #[error("{attribute} value {value} is outside its valid range")]
    OutOfRange { attribute: &'static str, value: f64 },
    #[error("range preference needs at least one of min or max")]
    EmptyRange,
    #[error("range preference has min {min} greater than max {max}")]
    InvertedRange { min: f64, max: f64 },
    #[error("shine preference needs at least one acceptable label")]
    EmptyShineChoice,
}
