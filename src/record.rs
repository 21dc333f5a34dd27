/**
This module turns a single address record into a training example.
*/
use crate::config::PrepConfig;
use crate::normalize::normalize_address;
use crate::reporter::CoverageReport;
use crate::ruler::tag_states;
use crate::span::{locate, FieldLabel, TaggingError, TrainingExample};
use ahash::AHashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// What do we do with a field holding a value that can't be found in its address (or that is not
/// a valid search pattern)? Skipping the field keeps the example, but the text of the field will
/// then be taught as "not an entity". Failing the row drops the example instead.
pub enum NotLocatedStrat {
    /// Log the field, count it in the report and carry on with the next field
    SkipField,
    /// Stop processing the row and return the error
    #[default]
    FailRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Could not parse the {0} into a `NotLocatedStrat`")]
pub struct NotLocatedStratParsingError(String);

impl FromStr for NotLocatedStrat {
    type Err = NotLocatedStratParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "skipfield" | "skip" => Ok(NotLocatedStrat::SkipField),
            "failrow" | "fail" => Ok(NotLocatedStrat::FailRow),
            _ => Err(NotLocatedStratParsingError(String::from(s))),
        }
    }
}

impl Display for NotLocatedStrat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotLocatedStrat::SkipField => write!(f, "skipfield"),
            NotLocatedStrat::FailRow => write!(f, "failrow"),
        }
    }
}

/// One address of a labeled dataset: the raw address, its normalized form and the raw value of
/// every field column. A field can be absent, which is not the same as being empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    raw: String,
    normalized: String,
    fields: AHashMap<String, Option<String>>,
}

impl AddressRecord {
    /// Builds a record without any field. The address is normalized right away.
    pub fn new<S: Into<String>>(raw: S) -> Self {
        let raw = raw.into();
        let normalized = normalize_address(&raw);
        AddressRecord {
            raw,
            normalized,
            fields: AHashMap::new(),
        }
    }

    pub fn with_field<C: Into<String>, V: Into<String>>(mut self, column: C, value: V) -> Self {
        self.insert_field(column, Some(value.into()));
        self
    }

    pub fn with_absent_field<C: Into<String>>(mut self, column: C) -> Self {
        self.insert_field(column, None);
        self
    }

    pub fn insert_field<C: Into<String>>(&mut self, column: C, value: Option<String>) {
        self.fields.insert(column.into(), value);
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Raw value of a column. Unknown columns and absent values both give `None`.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }
}

impl Display for AddressRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Tags every configured field of `record` and pairs the spans with the normalized address. The
/// spans follow the order of the fields in the configuration.
///
/// # Example
/// ```rust
/// use addrner::{assemble_example, AddressRecord, FieldLabel, PrepConfig};
///
/// let record = AddressRecord::new("John Doe, 123 Main St, Austin, TX 73301")
///     .with_field("Recipient", "John Doe")
///     .with_field("City", "Austin")
///     .with_field("Zip_Code", "73301");
/// let config = PrepConfig::builder()
///     .labels([FieldLabel::Recipient, FieldLabel::City, FieldLabel::ZipCode])
///     .build();
/// let example = assemble_example(&record, &config).unwrap();
/// let texts: Vec<_> = example.entity_texts().map(|(text, _)| text).collect();
/// assert_eq!(texts, vec!["John Doe", "Austin", "73301"]);
/// ```
pub fn assemble_example(
    record: &AddressRecord,
    config: &PrepConfig,
) -> Result<TrainingExample, TaggingError> {
    assemble_into(record, config, &mut CoverageReport::default())
}

/// Same as [`assemble_example`], recording the outcome of every field in `report`. The counts of
/// a failed row are not kept: only the field that failed it is recorded, as not located.
pub(crate) fn assemble_into(
    record: &AddressRecord,
    config: &PrepConfig,
    report: &mut CoverageReport,
) -> Result<TrainingExample, TaggingError> {
    let mut row_report = CoverageReport::default();
    let example = assemble_row(record, config, &mut row_report).inspect_err(|e| {
        report.record_not_located(e.label());
    })?;
    report.merge_fields(row_report);
    Ok(example)
}

fn assemble_row(
    record: &AddressRecord,
    config: &PrepConfig,
    report: &mut CoverageReport,
) -> Result<TrainingExample, TaggingError> {
    let address = record.normalized();
    let mut example = TrainingExample::new(String::from(address), Vec::new());
    for field in config.fields() {
        let value = record.field(&field.column).filter(|v| !config.is_missing(v));
        match locate(address, value, field.label, config.search_mode()) {
            Ok(Some(span)) => {
                report.record_located(field.label);
                example.push(span);
            }
            Ok(None) => report.record_absent(field.label),
            Err(e) => match config.not_located() {
                NotLocatedStrat::FailRow => return Err(e),
                NotLocatedStrat::SkipField => {
                    report.record_not_located(field.label);
                    warn!("skipping field: {}", e)
                }
            },
        }
    }
    if config.state_gazetteer() && !example.spans().iter().any(|s| s.label == FieldLabel::State)
    {
        let free_state = tag_states(address)
            .into_iter()
            .find(|state| !example.spans().iter().any(|s| s.overlaps(state)));
        if let Some(state) = free_state {
            report.record_gazetteer(FieldLabel::State);
            example.push(state);
        }
    }
    Ok(example)
}
