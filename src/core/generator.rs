/// Fruit profile generator — randomized attributes and partial preferences.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::schema::fruit::{
    AttributeName, Attributes, Fruit, FruitType, ShineFactor, SIZE_RANGE, WEIGHT_RANGE,
};
use crate::schema::preference::{NumericRange, Preferences, ShineChoice};

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("probability '{name}' must be within 0.0..=1.0, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Fixed probabilities the generator samples with.
///
/// Every probability is applied independently per field per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Chance that any single attribute comes out unknown.
    pub unknown_probability: f64,
    /// Chance that any single attribute gets a preference entry.
    pub preference_probability: f64,
    /// Chance of `true` for each boolean attribute when known.
    pub stem_bias: f64,
    pub leaf_bias: f64,
    pub worm_bias: f64,
    pub chemicals_bias: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unknown_probability: 0.15,
            preference_probability: 0.3,
            stem_bias: 0.7,
            leaf_bias: 0.4,
            worm_bias: 0.2,
            chemicals_bias: 0.35,
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load_from_ron(path: &Path) -> Result<GeneratorConfig, GeneratorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<GeneratorConfig, GeneratorError> {
        let config: GeneratorConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        let probabilities = [
            ("unknown_probability", self.unknown_probability),
            ("preference_probability", self.preference_probability),
            ("stem_bias", self.stem_bias),
            ("leaf_bias", self.leaf_bias),
            ("worm_bias", self.worm_bias),
            ("chemicals_bias", self.chemicals_bias),
        ];
        for (name, value) in probabilities {
            // NaN fails the range check too
            if !(0.0..=1.0).contains(&value) {
                return Err(GeneratorError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }

    fn bias(&self, name: AttributeName) -> f64 {
        match name {
            AttributeName::HasStem => self.stem_bias,
            AttributeName::HasLeaf => self.leaf_bias,
            AttributeName::HasWorm => self.worm_bias,
            AttributeName::HasChemicals => self.chemicals_bias,
            _ => 0.5,
        }
    }
}

/// Builds fresh `Fruit` values from an injected random source.
///
/// Holds only its configuration, so one generator can serve any number
/// of callers; each call draws only from the RNG it is handed.
#[derive(Debug, Clone, Default)]
pub struct FruitGenerator {
    config: GeneratorConfig,
}

impl FruitGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a fruit of the given kind.
    pub fn generate<R: Rng + ?Sized>(&self, kind: FruitType, rng: &mut R) -> Fruit {
        let attributes = self.generate_attributes(rng);
        let preferences = self.generate_preferences(rng);
        debug!(
            fruit_type = kind.name(),
            preferences = preferences.len(),
            all_unknown = attributes.is_all_unknown(),
            "generated fruit"
        );
        Fruit::new(kind, attributes, preferences)
    }

    pub fn generate_apple<R: Rng + ?Sized>(&self, rng: &mut R) -> Fruit {
        self.generate(FruitType::Apple, rng)
    }

    pub fn generate_orange<R: Rng + ?Sized>(&self, rng: &mut R) -> Fruit {
        self.generate(FruitType::Orange, rng)
    }

    fn generate_attributes<R: Rng + ?Sized>(&self, rng: &mut R) -> Attributes {
        Attributes {
            size: self
                .known(rng)
                .then(|| sample_in_range(rng, SIZE_RANGE, 1)),
            weight: self
                .known(rng)
                .then(|| sample_in_range(rng, WEIGHT_RANGE, 0)),
            has_stem: self.known_flag(rng, AttributeName::HasStem),
            has_leaf: self.known_flag(rng, AttributeName::HasLeaf),
            has_worm: self.known_flag(rng, AttributeName::HasWorm),
            shine_factor: self.known(rng).then(|| sample_shine(rng)),
            has_chemicals: self.known_flag(rng, AttributeName::HasChemicals),
        }
    }

    fn generate_preferences<R: Rng + ?Sized>(&self, rng: &mut R) -> Preferences {
        Preferences {
            size: self.wants(rng).then(|| sample_range(rng, SIZE_RANGE, 1)),
            weight: self.wants(rng).then(|| sample_range(rng, WEIGHT_RANGE, 0)),
            has_stem: self.wanted_flag(rng, AttributeName::HasStem),
            has_leaf: self.wanted_flag(rng, AttributeName::HasLeaf),
            has_worm: self.wanted_flag(rng, AttributeName::HasWorm),
            shine_factor: self.wants(rng).then(|| sample_shine_choice(rng)),
            has_chemicals: self.wanted_flag(rng, AttributeName::HasChemicals),
        }
    }

    fn known<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        !rng.gen_bool(self.config.unknown_probability)
    }

    fn wants<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.config.preference_probability)
    }

    fn known_flag<R: Rng + ?Sized>(&self, rng: &mut R, name: AttributeName) -> Option<bool> {
        let bias = self.config.bias(name);
        self.known(rng).then(|| rng.gen_bool(bias))
    }

    // A preferred flag leans the same way as the attribute itself.
    fn wanted_flag<R: Rng + ?Sized>(&self, rng: &mut R, name: AttributeName) -> Option<bool> {
        let bias = self.config.bias(name);
        self.wants(rng).then(|| rng.gen_bool(bias))
    }
}

/// Generate a fruit with the thread-local RNG and default config.
pub fn generate_fruit(kind: FruitType) -> Fruit {
    FruitGenerator::default().generate(kind, &mut rand::thread_rng())
}

pub fn generate_apple() -> Fruit {
    generate_fruit(FruitType::Apple)
}

pub fn generate_orange() -> Fruit {
    generate_fruit(FruitType::Orange)
}

/// Uniform sample in a closed range, rounded to `decimals` places.
///
/// The range ends are whole numbers, so rounding never leaves the range.
fn sample_in_range<R: Rng + ?Sized>(
    rng: &mut R,
    range: RangeInclusive<f64>,
    decimals: i32,
) -> f64 {
    let raw = rng.gen_range(range.clone());
    let scale = 10f64.powi(decimals);
    let rounded = (raw * scale).round() / scale;
    rounded.clamp(*range.start(), *range.end())
}

fn sample_range<R: Rng + ?Sized>(
    rng: &mut R,
    range: RangeInclusive<f64>,
    decimals: i32,
) -> NumericRange {
    match rng.gen_range(0..3) {
        0 => NumericRange::AtLeast(sample_in_range(rng, range, decimals)),
        1 => NumericRange::AtMost(sample_in_range(rng, range, decimals)),
        _ => {
            let a = sample_in_range(rng, range.clone(), decimals);
            let b = sample_in_range(rng, range, decimals);
            NumericRange::Between(a.min(b), a.max(b))
        }
    }
}

fn sample_shine<R: Rng + ?Sized>(rng: &mut R) -> ShineFactor {
    ShineFactor::ALL[rng.gen_range(0..ShineFactor::ALL.len())]
}

fn sample_shine_choice<R: Rng + ?Sized>(rng: &mut R) -> ShineChoice {
    let count = rng.gen_range(1..=2);
    let mut labels: Vec<ShineFactor> = ShineFactor::ALL
        .choose_multiple(rng, count)
        .copied()
        .collect();
    labels.sort();
    match ShineChoice::new(labels) {
        Ok(choice) => choice,
        Err(_) => ShineChoice::single(sample_shine(rng)),
    }
}
