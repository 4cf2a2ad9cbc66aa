/// Narrator — renders a fruit's attributes and preferences as chat text.
///
/// Rendering is deterministic: the same fruit and phrasebook always give
/// the same text. Unknown attributes are left out rather than described.

use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::phrasebook::{FlagPhrases, NarratorError, Phrasebook, RangePhrases};
use crate::core::template::Template;
use crate::schema::fruit::{AttributeName, AttributeValue, Fruit};
use crate::schema::preference::{Constraint, NumericRange};

/// Renders fruits with a phrasebook.
#[derive(Debug, Clone)]
pub struct Narrator {
    phrasebook: Phrasebook,
}

impl Narrator {
    pub fn new(phrasebook: Phrasebook) -> Self {
        Self { phrasebook }
    }

    /// Build a narrator from a phrasebook RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, NarratorError> {
        Ok(Self::new(Phrasebook::load_from_ron(path)?))
    }

    /// The shared narrator using the built-in phrasebook.
    pub fn builtin() -> &'static Narrator {
        static BUILTIN: OnceLock<Narrator> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            // Covered by phrasebook::tests::builtin_phrasebook_parses.
            Narrator::new(Phrasebook::builtin().expect("built-in phrasebook is valid"))
        })
    }

    pub fn phrasebook(&self) -> &Phrasebook {
        &self.phrasebook
    }

    /// Describe what is known about the fruit. Always names its type.
    pub fn describe_attributes(&self, fruit: &Fruit) -> String {
        let book = &self.phrasebook;
        let slots = base_slots(fruit);
        let mut sentences = vec![book.intro.render(&slots)];

        for name in AttributeName::ALL {
            let Some(value) = fruit.attributes.get(name) else {
                continue;
            };
            let sentence = match value {
                AttributeValue::Number(n) => {
                    let template = match name {
                        AttributeName::Size => &book.size,
                        _ => &book.weight,
                    };
                    render_with(template, &slots, &[("value", format_number(n))])
                }
                AttributeValue::Flag(flag) => {
                    let phrases = match name {
                        AttributeName::HasStem => &book.has_stem,
                        AttributeName::HasLeaf => &book.has_leaf,
                        AttributeName::HasWorm => &book.has_worm,
                        _ => &book.has_chemicals,
                    };
                    render_flag(phrases, flag, &slots)
                }
                AttributeValue::Shine(shine) => render_with(
                    &book.shine_factor,
                    &slots,
                    &[("value", shine.label().to_string())],
                ),
            };
            sentences.push(sentence);
        }

        if fruit.attributes.is_all_unknown() {
            sentences.push(book.nothing_notable.render(&slots));
        }

        join_sentences(&sentences)
    }

    /// Describe what the fruit wants from a match.
    pub fn describe_preferences(&self, fruit: &Fruit) -> String {
        let book = &self.phrasebook;
        let slots = base_slots(fruit);
        let entries = fruit.preferences.entries();

        if entries.is_empty() {
            return book.open_to_anything.render(&slots);
        }

        let clauses: Vec<String> = entries
            .into_iter()
            .map(|(name, constraint)| match constraint {
                Constraint::Range(range) => {
                    let phrases = match name {
                        AttributeName::Size => &book.size_pref,
                        _ => &book.weight_pref,
                    };
                    render_range(phrases, range, &slots)
                }
                Constraint::Flag(flag) => {
                    let phrases = match name {
                        AttributeName::HasStem => &book.has_stem_pref,
                        AttributeName::HasLeaf => &book.has_leaf_pref,
                        AttributeName::HasWorm => &book.has_worm_pref,
                        _ => &book.has_chemicals_pref,
                    };
                    render_flag(phrases, flag, &slots)
                }
                Constraint::Shine(choice) => {
                    let labels: Vec<&str> = choice.labels().iter().map(|s| s.label()).collect();
                    render_with(
                        &book.shine_factor_pref,
                        &slots,
                        &[("values", labels.join(" or "))],
                    )
                }
            })
            .collect();

        format!(
            "{} {}.",
            book.preferences_intro.render(&slots),
            clauses.join("; ")
        )
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Describe a fruit's attributes with the built-in phrasebook.
pub fn describe_attributes(fruit: &Fruit) -> String {
    Narrator::builtin().describe_attributes(fruit)
}

/// Describe a fruit's preferences with the built-in phrasebook.
pub fn describe_preferences(fruit: &Fruit) -> String {
    Narrator::builtin().describe_preferences(fruit)
}

/// Render a number with its natural magnitude: `7.2`, `180`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn base_slots(fruit: &Fruit) -> FxHashMap<&'static str, String> {
    let mut slots = FxHashMap::default();
    slots.insert("type", fruit.fruit_type.name().to_string());
    slots.insert("partner", fruit.fruit_type.counterpart().plural().to_string());
    slots
}

fn render_with(
    template: &Template,
    base: &FxHashMap<&'static str, String>,
    extra: &[(&'static str, String)],
) -> String {
    let mut slots = base.clone();
    for (name, value) in extra {
        slots.insert(*name, value.clone());
    }
    template.render(&slots)
}

fn render_flag(phrases: &FlagPhrases, flag: bool, slots: &FxHashMap<&'static str, String>) -> String {
    if flag {
        phrases.yes.render(slots)
    } else {
        phrases.no.render(slots)
    }
}

fn render_range(
    phrases: &RangePhrases,
    range: NumericRange,
    slots: &FxHashMap<&'static str, String>,
) -> String {
    match range {
        NumericRange::AtLeast(min) => render_with(&phrases.at_least, slots, &[("min", format_number(min))]),
        NumericRange::AtMost(max) => render_with(&phrases.at_most, slots, &[("max", format_number(max))]),
        NumericRange::Between(min, max) => render_with(
            &phrases.between,
            slots,
            &[("min", format_number(min)), ("max", format_number(max))],
        ),
    }
}

fn join_sentences(sentences: &[String]) -> String {
    sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
