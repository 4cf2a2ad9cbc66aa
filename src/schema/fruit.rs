use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::preference::Preferences;
use super::SchemaError;

/// Valid range for `size`.
pub const SIZE_RANGE: RangeInclusive<f64> = 2.0..=14.0;
/// Valid range for `weight`.
pub const WEIGHT_RANGE: RangeInclusive<f64> = 50.0..=350.0;

/// The two kinds of fruit the matchmaker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitType {
    Apple,
    Orange,
}

impl FruitType {
    pub const ALL: [FruitType; 2] = [FruitType::Apple, FruitType::Orange];

    /// Lowercase name: "apple", "orange".
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Orange => "orange",
        }
    }

    /// Plural name: "apples", "oranges".
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Apple => "apples",
            Self::Orange => "oranges",
        }
    }

    /// The kind of fruit this one is matched with.
    pub fn counterpart(&self) -> FruitType {
        match self {
            Self::Apple => Self::Orange,
            Self::Orange => Self::Apple,
        }
    }
}

impl fmt::Display for FruitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FruitType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apple" => Ok(Self::Apple),
            "orange" => Ok(Self::Orange),
            _ => Err(SchemaError::UnknownFruitType(s.to_string())),
        }
    }
}

/// How much a fruit's skin shines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShineFactor {
    Dull,
    Neutral,
    Shiny,
    ExtraShiny,
}

impl ShineFactor {
    pub const ALL: [ShineFactor; 4] = [
        ShineFactor::Dull,
        ShineFactor::Neutral,
        ShineFactor::Shiny,
        ShineFactor::ExtraShiny,
    ];

    /// The serialized label: "dull", "neutral", "shiny", "extraShiny".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dull => "dull",
            Self::Neutral => "neutral",
            Self::Shiny => "shiny",
            Self::ExtraShiny => "extraShiny",
        }
    }
}

impl fmt::Display for ShineFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShineFactor {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|shine| shine.label() == s)
            .ok_or_else(|| SchemaError::UnknownShineFactor(s.to_string()))
    }
}

/// Names of the seven attributes, in the order they are generated,
/// narrated, and summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    Size,
    Weight,
    HasStem,
    HasLeaf,
    HasWorm,
    ShineFactor,
    HasChemicals,
}

impl AttributeName {
    pub const ALL: [AttributeName; 7] = [
        AttributeName::Size,
        AttributeName::Weight,
        AttributeName::HasStem,
        AttributeName::HasLeaf,
        AttributeName::HasWorm,
        AttributeName::ShineFactor,
        AttributeName::HasChemicals,
    ];

    /// The record key, e.g. "hasStem".
    pub fn key(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Weight => "weight",
            Self::HasStem => "hasStem",
            Self::HasLeaf => "hasLeaf",
            Self::HasWorm => "hasWorm",
            Self::ShineFactor => "shineFactor",
            Self::HasChemicals => "hasChemicals",
        }
    }

    /// Declared range for the numeric attributes.
    pub fn numeric_range(&self) -> Option<RangeInclusive<f64>> {
        match self {
            Self::Size => Some(SIZE_RANGE),
            Self::Weight => Some(WEIGHT_RANGE),
            _ => None,
        }
    }
}

/// A single observed attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Flag(bool),
    Shine(ShineFactor),
}

/// Observable characteristics of a fruit. `None` means unknown.
///
/// Unknown values serialize as `null`, so all seven keys are always present.
/// Deserialization rejects numeric values outside their declared range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawAttributes")]
pub struct Attributes {
    pub size: Option<f64>,
    pub weight: Option<f64>,
    pub has_stem: Option<bool>,
    pub has_leaf: Option<bool>,
    pub has_worm: Option<bool>,
    pub shine_factor: Option<ShineFactor>,
    pub has_chemicals: Option<bool>,
}

// Wire shape before range checks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttributes {
    #[serde(default)]
    size: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    has_stem: Option<bool>,
    #[serde(default)]
    has_leaf: Option<bool>,
    #[serde(default)]
    has_worm: Option<bool>,
    #[serde(default)]
    shine_factor: Option<ShineFactor>,
    #[serde(default)]
    has_chemicals: Option<bool>,
}

impl TryFrom<RawAttributes> for Attributes {
    type Error = SchemaError;

    fn try_from(raw: RawAttributes) -> Result<Self, Self::Error> {
        let attributes = Attributes {
            size: raw.size,
            weight: raw.weight,
            has_stem: raw.has_stem,
            has_leaf: raw.has_leaf,
            has_worm: raw.has_worm,
            shine_factor: raw.shine_factor,
            has_chemicals: raw.has_chemicals,
        };
        attributes.validate()?;
        Ok(attributes)
    }
}

impl Attributes {
    /// Look up one attribute by name. `None` if unknown.
    pub fn get(&self, name: AttributeName) -> Option<AttributeValue> {
        match name {
            AttributeName::Size => self.size.map(AttributeValue::Number),
            AttributeName::Weight => self.weight.map(AttributeValue::Number),
            AttributeName::HasStem => self.has_stem.map(AttributeValue::Flag),
            AttributeName::HasLeaf => self.has_leaf.map(AttributeValue::Flag),
            AttributeName::HasWorm => self.has_worm.map(AttributeValue::Flag),
            AttributeName::ShineFactor => self.shine_factor.map(AttributeValue::Shine),
            AttributeName::HasChemicals => self.has_chemicals.map(AttributeValue::Flag),
        }
    }

    /// Returns true if no attribute is known.
    pub fn is_all_unknown(&self) -> bool {
        AttributeName::ALL.iter().all(|name| self.get(*name).is_none())
    }

    /// Checks that every known numeric value lies in its declared range.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in [AttributeName::Size, AttributeName::Weight] {
            if let (Some(AttributeValue::Number(v)), Some(range)) =
                (self.get(name), name.numeric_range())
            {
                if !range.contains(&v) {
                    return Err(SchemaError::OutOfRange {
                        attribute: name.key(),
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A generated fruit profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    #[serde(rename = "type")]
    pub fruit_type: FruitType,
    pub attributes: Attributes,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Fruit {
    pub fn new(fruit_type: FruitType, attributes: Attributes, preferences: Preferences) -> Self {
        Self {
            fruit_type,
            attributes,
            preferences,
        }
    }
}
