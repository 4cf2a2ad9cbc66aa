/// Slot templates — parsing and rendering of `{slot}` phrases.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Named value interpolation: `{value}`, `{min}`, `{type}`.
    Slot(String),
}

/// A parsed template: a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{slot_name}` → `Slot` (lowercase letters and underscores)
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '{' if i + 1 < len && chars[i + 1] == '{' => {
                    literal_buf.push('{');
                    i += 2;
                }
                '{' => {
                    if !literal_buf.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                    }

                    let start = i + 1;
                    let mut end = start;
                    while end < len && chars[end] != '}' {
                        if chars[end] == '{' {
                            return Err(TemplateError::Parse(
                                "nested braces are not allowed".to_string(),
                            ));
                        }
                        end += 1;
                    }
                    if end == len {
                        return Err(TemplateError::Parse("unclosed brace".to_string()));
                    }

                    let name: String = chars[start..end].iter().collect();
                    if name.is_empty() {
                        return Err(TemplateError::Parse("empty braces".to_string()));
                    }
                    if !name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
                        return Err(TemplateError::Parse(format!(
                            "invalid slot name '{}'",
                            name
                        )));
                    }

                    segments.push(TemplateSegment::Slot(name));
                    i = end + 1;
                }
                '}' if i + 1 < len && chars[i + 1] == '}' => {
                    literal_buf.push('}');
                    i += 2;
                }
                '}' => {
                    return Err(TemplateError::Parse(
                        "unmatched closing brace".to_string(),
                    ));
                }
                c => {
                    literal_buf.push(c);
                    i += 1;
                }
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    /// Names of all slots this template references.
    pub fn slots(&self) -> FxHashSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                TemplateSegment::Slot(name) => Some(name.as_str()),
                TemplateSegment::Literal(_) => None,
            })
            .collect()
    }

    /// Render the template, filling slots from `values`.
    ///
    /// Slots with no value render as nothing; phrasebooks are validated
    /// at load time so this only happens for hand-built templates.
    pub fn render(&self, values: &FxHashMap<&str, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(name) => {
                    if let Some(value) = values.get(name.as_str()) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}
