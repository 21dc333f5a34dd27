/**
This module locates the value of an address field inside its normalized address.
*/
use crate::normalize::normalize_field;
use crate::span::{FieldLabel, Span};
use fancy_regex::Regex;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// How is the value of a field turned into a search pattern? By default the value is searched as
/// plain text. With `Pattern`, the value is pasted verbatim into a regular expression.
pub enum SearchMode {
    /// The value is escaped. It must not be directly preceded or followed by a word character
    /// in the address, which is equivalent to `\b` for values starting and ending with a word
    /// character and still lets values such as `Doe (c/o)` match.
    #[default]
    Literal,
    /// The value is interpolated raw into `\b(?:VALUE)\b`. Parentheses, brackets and the like
    /// change the meaning of the search and may make it invalid.
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not parse the {0} into a `SearchMode`")]
pub struct SearchModeParsingError(String);

impl FromStr for SearchMode {
    type Err = SearchModeParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "literal" | "text" => Ok(SearchMode::Literal),
            "pattern" | "regex" => Ok(SearchMode::Pattern),
            _ => Err(SearchModeParsingError(String::from(s))),
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Literal => write!(f, "literal"),
            SearchMode::Pattern => write!(f, "pattern"),
        }
    }
}

impl SearchMode {
    fn build_pattern(&self, value: &str) -> String {
        match self {
            SearchMode::Literal => format!(r"(?<!\w){}(?!\w)", fancy_regex::escape(value)),
            SearchMode::Pattern => format!(r"\b(?:{})\b", value),
        }
    }
}

/// Why a field holding a value did not produce a span.
#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("{label} value {value:?} could not be located in {address:?}")]
    FieldNotLocated {
        label: FieldLabel,
        value: String,
        address: String,
    },
    #[error("{label} value {value:?} is not a valid search pattern: {source}")]
    InvalidSearchPattern {
        label: FieldLabel,
        value: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

impl TaggingError {
    pub fn label(&self) -> FieldLabel {
        match self {
            Self::FieldNotLocated { label, .. } | Self::InvalidSearchPattern { label, .. } => {
                *label
            }
        }
    }

    fn invalid_pattern(label: FieldLabel, value: &str, source: fancy_regex::Error) -> Self {
        Self::InvalidSearchPattern {
            label,
            value: String::from(value),
            source: Box::new(source),
        }
    }
}

/// Finds the first occurrence of `value` in `address` and returns its span, labelled with
/// `label`.
///
/// `address` must already be normalized; `value` is normalized here with
/// [`normalize_field`](crate::normalize_field). A value that is absent, blank, or blank once
/// normalized yields `Ok(None)`: it never produces an empty span. A value that cannot be found
/// yields [`TaggingError::FieldNotLocated`].
///
/// # Example
/// ```rust
/// use addrner::{locate, FieldLabel, SearchMode};
///
/// let address = "100 Main St, Springfield, IL 62701";
/// let span = locate(address, Some("Springfield"), FieldLabel::City, SearchMode::Literal)
///     .unwrap()
///     .unwrap();
/// assert_eq!(span.text(address), Some("Springfield"));
/// ```
pub fn locate(
    address: &str,
    value: Option<&str>,
    label: FieldLabel,
    mode: SearchMode,
) -> Result<Option<Span>, TaggingError> {
    let value = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return Ok(None),
    };
    let normalized = normalize_field(value);
    if normalized.trim().is_empty() {
        return Ok(None);
    }
    let regex = Regex::new(&mode.build_pattern(&normalized))
        .map_err(|e| TaggingError::invalid_pattern(label, value, e))?;
    let found = regex
        .find(address)
        .map_err(|e| TaggingError::invalid_pattern(label, value, e))?;
    match found {
        // An empty match can only come from a pattern such as `a|`; it is not a location.
        Some(m) if m.start() < m.end() => {
            let start = address[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            let span = Span::new(start, end, label);
            debug!(%label, start, end, "located field");
            Ok(Some(span))
        }
        _ => Err(TaggingError::FieldNotLocated {
            label,
            value: String::from(value),
            address: String::from(address),
        }),
    }
}
