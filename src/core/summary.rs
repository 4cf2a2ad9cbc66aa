/// Profile summary — a key/value card of everything known and wanted.

use std::fmt;

use crate::core::narrator::format_number;
use crate::schema::fruit::{AttributeName, AttributeValue, Fruit};
use crate::schema::preference::Constraint;

/// Shown when a fruit has no preference entries.
pub const OPEN_TO_ANYTHING: &str = "Open to anything";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub key: &'static str,
    pub value: String,
}

/// Rows for a fruit's profile card. Unlike the narrator, unknown
/// attributes are listed explicitly as `unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub fruit_type: &'static str,
    pub attributes: Vec<SummaryRow>,
    pub preferences: Vec<SummaryRow>,
}

impl ProfileSummary {
    pub fn of(fruit: &Fruit) -> Self {
        let attributes = AttributeName::ALL
            .iter()
            .map(|name| SummaryRow {
                key: name.key(),
                value: format_attribute(*name, fruit.attributes.get(*name)),
            })
            .collect();

        let preferences = fruit
            .preferences
            .entries()
            .into_iter()
            .map(|(name, constraint)| SummaryRow {
                key: name.key(),
                value: format_constraint(constraint),
            })
            .collect();

        Self {
            fruit_type: fruit.fruit_type.name(),
            attributes,
            preferences,
        }
    }
}

fn format_attribute(name: AttributeName, value: Option<AttributeValue>) -> String {
    match value {
        None => "unknown".to_string(),
        Some(AttributeValue::Number(n)) if name == AttributeName::Weight => {
            format!("{}g", format_number(n))
        }
        Some(AttributeValue::Number(n)) => format_number(n),
        Some(AttributeValue::Flag(flag)) => yes_no(flag).to_string(),
        Some(AttributeValue::Shine(shine)) => shine.label().to_string(),
    }
}

fn format_constraint(constraint: Constraint<'_>) -> String {
    match constraint {
        Constraint::Range(range) => {
            let mut parts = Vec::new();
            if let Some(min) = range.min() {
                parts.push(format!("min {}", format_number(min)));
            }
            if let Some(max) = range.max() {
                parts.push(format!("max {}", format_number(max)));
            }
            parts.join(", ")
        }
        Constraint::Flag(flag) => yes_no(flag).to_string(),
        Constraint::Shine(choice) => choice
            .labels()
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile Summary ({})", self.fruit_type)?;
        writeln!(f, "  Attributes")?;
        for row in &self.attributes {
            writeln!(f, "    {:<14}{}", row.key, row.value)?;
        }
        writeln!(f, "  Preferences")?;
        if self.preferences.is_empty() {
            writeln!(f, "    {}", OPEN_TO_ANYTHING)?;
        }
        for row in &self.preferences {
            writeln!(f, "    {:<14}{}", row.key, row.value)?;
        }
        Ok(())
    }
}
