use enum_iterator::Sequence;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::iter::once;
use std::str::FromStr;
use thiserror::Error;

mod tagger;

// Re-exporting
pub use tagger::{locate, SearchMode, SearchModeParsingError, TaggingError};

/// The category of an address component. Labels are written in upper snake case (`ZIP_CODE`) when
/// displayed or serialized, which is the form expected by the downstream trainer.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Sequence, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldLabel {
    Recipient,
    BuildingName,
    BuildingNumber,
    Street,
    City,
    State,
    ZipCode,
    Country,
}

impl FieldLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recipient => "RECIPIENT",
            Self::BuildingName => "BUILDING_NAME",
            Self::BuildingNumber => "BUILDING_NUMBER",
            Self::Street => "STREET",
            Self::City => "CITY",
            Self::State => "STATE",
            Self::ZipCode => "ZIP_CODE",
            Self::Country => "COUNTRY",
        }
    }

    /// Name of the column holding this field in the labeled address datasets.
    pub fn default_column(&self) -> &'static str {
        match self {
            Self::Recipient => "Recipient",
            Self::BuildingName => "Building_Name",
            Self::BuildingNumber => "Building_Number",
            Self::Street => "Street_Name",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "Zip_Code",
            Self::Country => "Country",
        }
    }
}

impl Display for FieldLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Impossible to parse the string ({0}) into a FieldLabel")]
pub struct LabelParsingError(String);

impl FromStr for FieldLabel {
    type Err = LabelParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<FieldLabel>()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LabelParsingError(String::from(s)))
    }
}

/// A located address component. `start` and `end` are half-open *character* offsets (not byte
/// offsets) into the normalized address the span was found in.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: FieldLabel,
}

impl Span {
    pub fn new(start: usize, end: usize, label: FieldLabel) -> Self {
        Span { start, end, label }
    }

    /// Returns the slice of `text` covered by this span, or `None` if the offsets do not fall on
    /// `text`.
    pub fn text<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.end < self.start {
            return None;
        }
        let mut boundaries = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(once(text.len()));
        let start = boundaries.nth(self.start)?;
        let end = match self.end - self.start {
            0 => start,
            n => boundaries.nth(n - 1)?,
        };
        text.get(start..end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn as_tuple(&self) -> (usize, usize, FieldLabel) {
        (self.start, self.end, self.label)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.start, self.end, self.label)
    }
}

/// Spans are serialized as `[start, end, "LABEL"]` triples.
impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_tuple().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (start, end, label) = <(usize, usize, FieldLabel)>::deserialize(deserializer)?;
        Ok(Span::new(start, end, label))
    }
}

/// A normalized address and the spans of its components, in the order the components were
/// processed. This is the unit handed to the trainer; it serializes as
/// `{"text": "...", "entities": [[0, 8, "RECIPIENT"], ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingExample {
    text: String,
    entities: Vec<Span>,
}

impl TrainingExample {
    pub fn new(text: String, entities: Vec<Span>) -> Self {
        TrainingExample { text, entities }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.entities
    }

    /// Iterates over the located components as `(text, label)` pairs.
    pub fn entity_texts(&self) -> impl Iterator<Item = (&str, FieldLabel)> + '_ {
        self.entities
            .iter()
            .filter_map(|span| span.text(&self.text).map(|t| (t, span.label)))
    }

    /// Every pair of spans sharing at least one character. The trainer refuses examples with
    /// overlapping entities.
    pub fn overlapping_spans(&self) -> Vec<(Span, Span)> {
        self.entities
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| a.overlaps(b))
            .map(|(a, b)| (*a, *b))
            .collect()
    }

    pub fn has_overlaps(&self) -> bool {
        self.entities
            .iter()
            .tuple_combinations()
            .any(|(a, b): (&Span, &Span)| a.overlaps(b))
    }

    pub(crate) fn push(&mut self, span: Span) {
        self.entities.push(span)
    }
}

impl From<TrainingExample> for (String, Vec<Span>) {
    fn from(value: TrainingExample) -> Self {
        (value.text, value.entities)
    }
}

impl Display for TrainingExample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?}, [{}])",
            self.text,
            self.entities.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enum_iterator::all;
    use rstest::rstest;

    #[test]
    fn test_label_round_trips_through_display() {
        for label in all::<FieldLabel>() {
            assert_eq!(label.to_string().parse::<FieldLabel>().unwrap(), label)
        }
    }

    #[rstest]
    #[case("zip_code", FieldLabel::ZipCode)]
    #[case("Building_Number", FieldLabel::BuildingNumber)]
    #[case("STREET", FieldLabel::Street)]
    fn test_label_from_str(#[case] input: &str, #[case] expected: FieldLabel) {
        assert_eq!(input.parse::<FieldLabel>().unwrap(), expected)
    }

    #[test]
    fn test_misspelled_label_is_rejected() {
        assert_eq!(
            "BUILDING_No".parse::<FieldLabel>(),
            Err(LabelParsingError(String::from("BUILDING_No")))
        );
    }

    #[test]
    fn test_span_text_uses_char_offsets() {
        let text = "Café Noir, Montréal";
        let span = Span::new(11, 19, FieldLabel::City);
        assert_eq!(span.text(text), Some("Montréal"));
        assert_eq!(Span::new(0, 4, FieldLabel::Recipient).text(text), Some("Café"));
        assert_eq!(Span::new(11, 25, FieldLabel::City).text(text), None);
        assert_eq!(Span::new(19, 19, FieldLabel::City).text(text), Some(""));
        assert_eq!(Span::new(19, 20, FieldLabel::City).text(text), None);
        assert_eq!(Span::new(4, 2, FieldLabel::City).text(text), None);
    }

    #[test]
    fn test_overlapping_spans() {
        let example = TrainingExample::new(
            String::from("Washington, Washington DC"),
            vec![
                Span::new(0, 10, FieldLabel::Street),
                Span::new(12, 22, FieldLabel::City),
                Span::new(0, 10, FieldLabel::State),
            ],
        );
        assert!(example.has_overlaps());
        assert_eq!(
            example.overlapping_spans(),
            vec![(
                Span::new(0, 10, FieldLabel::Street),
                Span::new(0, 10, FieldLabel::State)
            )]
        );
    }

    #[test]
    fn test_display_example() {
        let example = TrainingExample::new(
            String::from("Austin, TX"),
            vec![
                Span::new(0, 6, FieldLabel::City),
                Span::new(8, 10, FieldLabel::State),
            ],
        );
        assert_eq!(
            example.to_string(),
            "(\"Austin, TX\", [(0, 6, CITY), (8, 10, STATE)])"
        );
        let texts: Vec<_> = example.entity_texts().collect();
        assert_eq!(
            texts,
            vec![("Austin", FieldLabel::City), ("TX", FieldLabel::State)]
        );
    }
}
