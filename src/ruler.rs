/**
This module holds the US state gazetteer. It is exported as token patterns for the entity ruler
of the downstream pipeline, and can also tag state names in a normalized address.
*/
use crate::span::{FieldLabel, Span};
use fancy_regex::Regex;
use itertools::Itertools;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_jsonlines::write_json_lines;
use std::io;
use std::path::Path;

pub const US_STATES: [&str; 50] = [
    "alabama",
    "alaska",
    "arizona",
    "arkansas",
    "california",
    "colorado",
    "connecticut",
    "delaware",
    "florida",
    "georgia",
    "hawaii",
    "idaho",
    "illinois",
    "indiana",
    "iowa",
    "kansas",
    "kentucky",
    "louisiana",
    "maine",
    "maryland",
    "massachusetts",
    "michigan",
    "minnesota",
    "mississippi",
    "missouri",
    "montana",
    "nebraska",
    "nevada",
    "new hampshire",
    "new jersey",
    "new mexico",
    "new york",
    "north carolina",
    "north dakota",
    "ohio",
    "oklahoma",
    "oregon",
    "pennsylvania",
    "rhode island",
    "south carolina",
    "south dakota",
    "tennessee",
    "texas",
    "utah",
    "vermont",
    "virginia",
    "washington",
    "west virginia",
    "wisconsin",
    "wyoming",
];

/// Any state name, case-insensitive, whitespace between words collapsed to `\s+`.
static STATE_NAME: Lazy<Regex> = Lazy::new(|| {
    let alternatives = US_STATES
        .iter()
        .map(|state| state.split(' ').map(|w| fancy_regex::escape(w)).join(r"\s+"))
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).unwrap()
});

/// A single token of a ruler pattern, matched on its lower-cased text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPattern {
    #[serde(rename = "LOWER")]
    pub lower: String,
}

/// An entity-ruler pattern: a label and the sequence of tokens it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulerPattern {
    pub label: FieldLabel,
    pub pattern: Vec<TokenPattern>,
}

impl RulerPattern {
    /// One token per whitespace-separated word of `phrase`.
    pub fn from_phrase(label: FieldLabel, phrase: &str) -> Self {
        RulerPattern {
            label,
            pattern: phrase
                .split_whitespace()
                .map(|w| TokenPattern {
                    lower: w.to_lowercase(),
                })
                .collect(),
        }
    }
}

/// The `STATE` patterns of the gazetteer, one per state.
pub fn state_patterns() -> Vec<RulerPattern> {
    US_STATES
        .iter()
        .map(|state| RulerPattern::from_phrase(FieldLabel::State, state))
        .collect()
}

/// Writes the `STATE` patterns as JSON lines, the format read by the entity ruler.
pub fn write_state_patterns<P: AsRef<Path>>(path: P) -> io::Result<()> {
    write_json_lines(path, state_patterns())
}

/// Every state name of `address`, as `STATE` spans in order of appearance.
pub fn tag_states(address: &str) -> Vec<Span> {
    STATE_NAME
        .find_iter(address)
        .filter_map(|m| m.ok())
        .map(|m| {
            let start = address[..m.start()].chars().count();
            Span::new(start, start + m.as_str().chars().count(), FieldLabel::State)
        })
        .collect()
}
