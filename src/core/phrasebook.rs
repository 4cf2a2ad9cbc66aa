/// Phrasebook — the narrator's wording, loaded from RON and validated.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::template::{Template, TemplateError};

/// The phrasebook compiled into the crate.
pub const DEFAULT_PHRASEBOOK: &str = include_str!("../../narration_data/default/phrasebook.ron");

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("in phrase '{phrase}': {source}")]
    Template {
        phrase: String,
        #[source]
        source: TemplateError,
    },
    #[error("phrase '{phrase}' uses slot '{{{slot}}}', which it cannot fill")]
    UnknownSlot { phrase: String, slot: String },
    #[error("phrase '{phrase}' must use slot '{{{slot}}}'")]
    MissingSlot { phrase: String, slot: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Phrases for a boolean attribute.
#[derive(Debug, Clone)]
pub struct FlagPhrases {
    pub yes: Template,
    pub no: Template,
}

/// Phrases for a numeric range preference.
#[derive(Debug, Clone)]
pub struct RangePhrases {
    pub at_least: Template,
    pub at_most: Template,
    pub between: Template,
}

/// Every phrase the narrator needs, parsed.
#[derive(Debug, Clone)]
pub struct Phrasebook {
    pub intro: Template,
    pub nothing_notable: Template,
    pub size: Template,
    pub weight: Template,
    pub has_stem: FlagPhrases,
    pub has_leaf: FlagPhrases,
    pub has_worm: FlagPhrases,
    pub shine_factor: Template,
    pub has_chemicals: FlagPhrases,
    pub open_to_anything: Template,
    pub preferences_intro: Template,
    pub size_pref: RangePhrases,
    pub weight_pref: RangePhrases,
    pub has_stem_pref: FlagPhrases,
    pub has_leaf_pref: FlagPhrases,
    pub has_worm_pref: FlagPhrases,
    pub shine_factor_pref: Template,
    pub has_chemicals_pref: FlagPhrases,
}

// RON deserialization helpers: phrases arrive as plain strings and are
// parsed into templates once, at load time.

#[derive(Debug, Deserialize)]
struct RonFlag {
    yes: String,
    no: String,
}

#[derive(Debug, Deserialize)]
struct RonRange {
    at_least: String,
    at_most: String,
    between: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Phrasebook")]
struct RonPhrasebook {
    intro: String,
    nothing_notable: String,
    size: String,
    weight: String,
    has_stem: RonFlag,
    has_leaf: RonFlag,
    has_worm: RonFlag,
    shine_factor: String,
    has_chemicals: RonFlag,
    open_to_anything: String,
    preferences_intro: String,
    size_pref: RonRange,
    weight_pref: RonRange,
    has_stem_pref: RonFlag,
    has_leaf_pref: RonFlag,
    has_worm_pref: RonFlag,
    shine_factor_pref: String,
    has_chemicals_pref: RonFlag,
}

/// Which slots a phrase may use, and which it must use.
struct SlotRule {
    allowed: &'static [&'static str],
    required: &'static [&'static str],
}

const TYPE_REQUIRED: SlotRule = SlotRule {
    allowed: &["type", "partner"],
    required: &["type"],
};
const FREE_TEXT: SlotRule = SlotRule {
    allowed: &["type", "partner"],
    required: &[],
};
const VALUE: SlotRule = SlotRule {
    allowed: &["type", "partner", "value"],
    required: &["value"],
};
const MIN: SlotRule = SlotRule {
    allowed: &["type", "partner", "min"],
    required: &["min"],
};
const MAX: SlotRule = SlotRule {
    allowed: &["type", "partner", "max"],
    required: &["max"],
};
const MIN_MAX: SlotRule = SlotRule {
    allowed: &["type", "partner", "min", "max"],
    required: &["min", "max"],
};
const VALUES: SlotRule = SlotRule {
    allowed: &["type", "partner", "values"],
    required: &["values"],
};

fn compile(phrase: &str, text: &str, rule: &SlotRule) -> Result<Template, NarratorError> {
    let template = Template::parse(text).map_err(|source| NarratorError::Template {
        phrase: phrase.to_string(),
        source,
    })?;

    let slots = template.slots();
    if let Some(slot) = slots
        .iter()
        .find(|slot| !rule.allowed.iter().any(|allowed| *allowed == **slot))
    {
        return Err(NarratorError::UnknownSlot {
            phrase: phrase.to_string(),
            slot: slot.to_string(),
        });
    }
    if let Some(slot) = rule.required.iter().find(|slot| !slots.contains(**slot)) {
        return Err(NarratorError::MissingSlot {
            phrase: phrase.to_string(),
            slot: slot.to_string(),
        });
    }
    Ok(template)
}

fn compile_flag(phrase: &str, raw: &RonFlag) -> Result<FlagPhrases, NarratorError> {
    Ok(FlagPhrases {
        yes: compile(&format!("{}.yes", phrase), &raw.yes, &FREE_TEXT)?,
        no: compile(&format!("{}.no", phrase), &raw.no, &FREE_TEXT)?,
    })
}

fn compile_range(phrase: &str, raw: &RonRange) -> Result<RangePhrases, NarratorError> {
    Ok(RangePhrases {
        at_least: compile(&format!("{}.at_least", phrase), &raw.at_least, &MIN)?,
        at_most: compile(&format!("{}.at_most", phrase), &raw.at_most, &MAX)?,
        between: compile(&format!("{}.between", phrase), &raw.between, &MIN_MAX)?,
    })
}

impl Phrasebook {
    /// Load a phrasebook from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Phrasebook, NarratorError> {
        let contents = std::fs::read_to_string(path)?;
        let phrasebook = Self::parse_ron(&contents)?;
        debug!(path = %path.display(), "loaded phrasebook");
        Ok(phrasebook)
    }

    /// Parse and validate a phrasebook from a RON string.
    pub fn parse_ron(input: &str) -> Result<Phrasebook, NarratorError> {
        let raw: RonPhrasebook = ron::from_str(input)?;

        Ok(Phrasebook {
            intro: compile("intro", &raw.intro, &TYPE_REQUIRED)?,
            nothing_notable: compile("nothing_notable", &raw.nothing_notable, &FREE_TEXT)?,
            size: compile("size", &raw.size, &VALUE)?,
            weight: compile("weight", &raw.weight, &VALUE)?,
            has_stem: compile_flag("has_stem", &raw.has_stem)?,
            has_leaf: compile_flag("has_leaf", &raw.has_leaf)?,
            has_worm: compile_flag("has_worm", &raw.has_worm)?,
            shine_factor: compile("shine_factor", &raw.shine_factor, &VALUE)?,
            has_chemicals: compile_flag("has_chemicals", &raw.has_chemicals)?,
            open_to_anything: compile("open_to_anything", &raw.open_to_anything, &FREE_TEXT)?,
            preferences_intro: compile("preferences_intro", &raw.preferences_intro, &FREE_TEXT)?,
            size_pref: compile_range("size_pref", &raw.size_pref)?,
            weight_pref: compile_range("weight_pref", &raw.weight_pref)?,
            has_stem_pref: compile_flag("has_stem_pref", &raw.has_stem_pref)?,
            has_leaf_pref: compile_flag("has_leaf_pref", &raw.has_leaf_pref)?,
            has_worm_pref: compile_flag("has_worm_pref", &raw.has_worm_pref)?,
            shine_factor_pref: compile("shine_factor_pref", &raw.shine_factor_pref, &VALUES)?,
            has_chemicals_pref: compile_flag("has_chemicals_pref", &raw.has_chemicals_pref)?,
        })
    }

    /// The built-in phrasebook.
    pub fn builtin() -> Result<Phrasebook, NarratorError> {
        Self::parse_ron(DEFAULT_PHRASEBOOK)
    }
}
