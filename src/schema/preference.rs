use serde::{Deserialize, Serialize};

use super::fruit::{AttributeName, ShineFactor};
use super::SchemaError;

/// A numeric constraint with at least one bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub enum NumericRange {
    AtLeast(f64),
    AtMost(f64),
    Between(f64, f64),
}

// Wire shape: `{ "min": 5, "max": 10 }` with either bound optional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

impl NumericRange {
    /// Build a range from optional bounds, rejecting empty or inverted ranges.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Result<Self, SchemaError> {
        match (min, max) {
            (Some(min), Some(max)) if min <= max => Ok(Self::Between(min, max)),
            (Some(min), Some(max)) => Err(SchemaError::InvertedRange { min, max }),
            (Some(min), None) => Ok(Self::AtLeast(min)),
            (None, Some(max)) => Ok(Self::AtMost(max)),
            (None, None) => Err(SchemaError::EmptyRange),
        }
    }

    pub fn min(&self) -> Option<f64> {
        match self {
            Self::AtLeast(min) | Self::Between(min, _) => Some(*min),
            Self::AtMost(_) => None,
        }
    }

    pub fn max(&self) -> Option<f64> {
        match self {
            Self::AtMost(max) | Self::Between(_, max) => Some(*max),
            Self::AtLeast(_) => None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min().map_or(true, |min| value >= min) && self.max().map_or(true, |max| value <= max)
    }
}

impl TryFrom<RawRange> for NumericRange {
    type Error = SchemaError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::from_bounds(raw.min, raw.max)
    }
}

impl From<NumericRange> for RawRange {
    fn from(range: NumericRange) -> Self {
        RawRange {
            min: range.min(),
            max: range.max(),
        }
    }
}

/// A set of acceptable shine labels. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ShineFactor>", into = "Vec<ShineFactor>")]
pub struct ShineChoice(Vec<ShineFactor>);

impl ShineChoice {
    /// Build a choice from labels; duplicates are dropped, order is kept.
    pub fn new(labels: impl IntoIterator<Item = ShineFactor>) -> Result<Self, SchemaError> {
        let mut choice = Vec::new();
        for label in labels {
            if !choice.contains(&label) {
                choice.push(label);
            }
        }
        if choice.is_empty() {
            return Err(SchemaError::EmptyShineChoice);
        }
        Ok(Self(choice))
    }

    pub fn single(label: ShineFactor) -> Self {
        Self(vec![label])
    }

    pub fn labels(&self) -> &[ShineFactor] {
        &self.0
    }

    pub fn accepts(&self, shine: ShineFactor) -> bool {
        self.0.contains(&shine)
    }
}

impl TryFrom<Vec<ShineFactor>> for ShineChoice {
    type Error = SchemaError;

    fn try_from(labels: Vec<ShineFactor>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<ShineChoice> for Vec<ShineFactor> {
    fn from(choice: ShineChoice) -> Self {
        choice.0
    }
}

/// A borrowed view of one preference entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint<'a> {
    Range(NumericRange),
    Flag(bool),
    Shine(&'a ShineChoice),
}

/// What a fruit wants from a match. Absent keys mean "no preference".
///
/// Deserialization rejects range bounds outside the attribute's valid range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPreferences")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<NumericRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_stem: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_leaf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_worm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shine_factor: Option<ShineChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_chemicals: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPreferences {
    #[serde(default)]
    size: Option<NumericRange>,
    #[serde(default)]
    weight: Option<NumericRange>,
    #[serde(default)]
    has_stem: Option<bool>,
    #[serde(default)]
    has_leaf: Option<bool>,
    #[serde(default)]
    has_worm: Option<bool>,
    #[serde(default)]
    shine_factor: Option<ShineChoice>,
    #[serde(default)]
    has_chemicals: Option<bool>,
}

impl TryFrom<RawPreferences> for Preferences {
    type Error = SchemaError;

    fn try_from(raw: RawPreferences) -> Result<Self, Self::Error> {
        let preferences = Preferences {
            size: raw.size,
            weight: raw.weight,
            has_stem: raw.has_stem,
            has_leaf: raw.has_leaf,
            has_worm: raw.has_worm,
            shine_factor: raw.shine_factor,
            has_chemicals: raw.has_chemicals,
        };
        preferences.validate()?;
        Ok(preferences)
    }
}

impl Preferences {
    /// Checks that every range bound lies in its attribute's declared range.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in [AttributeName::Size, AttributeName::Weight] {
            if let (Some(Constraint::Range(range)), Some(valid)) = (self.get(name), name.numeric_range()) {
                for bound in range.min().into_iter().chain(range.max()) {
                    if !valid.contains(&bound) {
                        return Err(SchemaError::OutOfRange {
                            attribute: name.key(),
                            value: bound,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: AttributeName) -> Option<Constraint<'_>> {
        match name {
            AttributeName::Size => self.size.map(Constraint::Range),
            AttributeName::Weight => self.weight.map(Constraint::Range),
            AttributeName::HasStem => self.has_stem.map(Constraint::Flag),
            AttributeName::HasLeaf => self.has_leaf.map(Constraint::Flag),
            AttributeName::HasWorm => self.has_worm.map(Constraint::Flag),
            AttributeName::ShineFactor => self.shine_factor.as_ref().map(Constraint::Shine),
            AttributeName::HasChemicals => self.has_chemicals.map(Constraint::Flag),
        }
    }

    /// Present entries in attribute order.
    pub fn entries(&self) -> Vec<(AttributeName, Constraint<'_>)> {
        AttributeName::ALL
            .iter()
            .filter_map(|name| self.get(*name).map(|c| (*name, c)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bounds_shapes() {
        assert_eq!(
            NumericRange::from_bounds(Some(5.0), Some(10.0)).unwrap(),
            NumericRange::Between(5.0, 10.0)
        );
        assert_eq!(
            NumericRange::from_bounds(Some(5.0), None).unwrap(),
            NumericRange::AtLeast(5.0)
        );
        assert_eq!(
            NumericRange::from_bounds(None, Some(10.0)).unwrap(),
            NumericRange::AtMost(10.0)
        );
        assert!(matches!(
            NumericRange::from_bounds(None, None),
            Err(SchemaError::EmptyRange)
        ));
        assert!(matches!(
            NumericRange::from_bounds(Some(10.0), Some(5.0)),
            Err(SchemaError::InvertedRange { .. })
        ));
    }

    #[test]
    fn range_contains() {
        let range = NumericRange::Between(5.0, 10.0);
        assert!(range.contains(5.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.1));
        assert!(NumericRange::AtLeast(100.0).contains(350.0));
        assert!(!NumericRange::AtMost(100.0).contains(100.5));
    }

    #[test]
    fn range_json_shape() {
        let json = serde_json::to_value(NumericRange::AtLeast(5.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "min": 5.0 }));

        let parsed: NumericRange = serde_json::from_str(r#"{"min": 5, "max": 10}"#).unwrap();
        assert_eq!(parsed, NumericRange::Between(5.0, 10.0));

        assert!(serde_json::from_str::<NumericRange>("{}").is_err());
        assert!(serde_json::from_str::<NumericRange>(r#"{"min": 9, "max": 3}"#).is_err());
    }

    #[test]
    fn shine_choice_dedups_and_rejects_empty() {
        let choice = ShineChoice::new([ShineFactor::Shiny, ShineFactor::Shiny, ShineFactor::Dull])
            .unwrap();
        assert_eq!(choice.labels(), &[ShineFactor::Shiny, ShineFactor::Dull]);
        assert!(choice.accepts(ShineFactor::Dull));
        assert!(!choice.accepts(ShineFactor::ExtraShiny));
        assert!(ShineChoice::new(Vec::<ShineFactor>::new()).is_err());
        assert!(serde_json::from_str::<ShineChoice>("[]").is_err());
    }

    #[test]
    fn entries_follow_attribute_order() {
        let prefs = Preferences {
            has_chemicals: Some(false),
            size: Some(NumericRange::AtMost(8.0)),
            shine_factor: Some(ShineChoice::single(ShineFactor::Shiny)),
            ..Default::default()
        };
        let names: Vec<AttributeName> = prefs.entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                AttributeName::Size,
                AttributeName::ShineFactor,
                AttributeName::HasChemicals
            ]
        );
        assert_eq!(prefs.len(), 3);
        assert!(Preferences::default().is_empty());
    }

    #[test]
    fn absent_preferences_are_omitted_from_json() {
        let prefs = Preferences {
            size: Some(NumericRange::Between(5.0, 10.0)),
            has_worm: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "size": { "min": 5.0, "max": 10.0 }, "hasWorm": false })
        );

        let back: Preferences = serde_json::from_value(json).unwrap();
        assert_eq!(back, prefs);
    }

    #[test]
    fn out_of_range_bounds_rejected_from_json() {
        let wide = serde_json::from_str::<Preferences>(r#"{"size": {"min": -50, "max": 1000}}"#);
        assert!(wide.is_err());
        let heavy = serde_json::from_str::<Preferences>(r#"{"weight": {"min": 400}}"#);
        assert!(heavy.is_err());

        let prefs: Preferences =
            serde_json::from_str(r#"{"size": {"min": 2, "max": 14}, "weight": {"max": 350}}"#).unwrap();
        assert!(prefs.validate().is_ok());
        assert_eq!(prefs.weight, Some(NumericRange::AtMost(350.0)));
    }
}
