/*
 * This modules contains the configuration of a labeling run. Most importantly, it contains the
 * `PrepConfig` struct, which implements the default trait and matches the column layout of the
 * labeled address datasets. The config is passed to the batch driver and to the example
 * assembler; nothing else holds configuration.
*/
use crate::record::NotLocatedStrat;
use crate::span::{FieldLabel, SearchMode};
use enum_iterator::all;
use itertools::Itertools;
use std::fmt::Display;

/// Name of the column holding the free-text address in the labeled datasets.
pub const DEFAULT_ADDRESS_COLUMN: &str = "Address";

/// Values standing for a missing field. Empty cells are always missing.
pub const DEFAULT_MISSING_MARKERS: [&str; 2] = ["nan", "NaN"];

/// A dataset column and the label given to the spans found from its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldColumn {
    pub column: String,
    pub label: FieldLabel,
}

impl FieldColumn {
    pub fn new<S: Into<String>>(column: S, label: FieldLabel) -> Self {
        FieldColumn {
            column: column.into(),
            label,
        }
    }
}

impl From<FieldLabel> for FieldColumn {
    fn from(value: FieldLabel) -> Self {
        FieldColumn::new(value.default_column(), value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Config struct used to simplify the inputs of the batch driver and the example assembler. It
/// implements the default trait.
pub struct PrepConfig {
    /// Column holding the raw address.
    address_column: String,
    /// Columns to tag, in order. The spans of an example follow this order.
    fields: Vec<FieldColumn>,
    /// How field values are searched in their address. See `SearchMode`.
    search_mode: SearchMode,
    /// What to do with a field holding a value that can't be located.
    not_located: NotLocatedStrat,
    /// Does a failed row stop the whole batch? If not, the row is dropped and reported.
    abort_on_row_error: bool,
    /// Cell values treated as a missing field, compared after trimming.
    missing_markers: Vec<String>,
    /// Should rows without a located `STATE` be tagged with the US state gazetteer?
    state_gazetteer: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            address_column: String::from(DEFAULT_ADDRESS_COLUMN),
            fields: all::<FieldLabel>().map(FieldColumn::from).collect(),
            search_mode: SearchMode::default(),
            not_located: NotLocatedStrat::default(),
            abort_on_row_error: false,
            missing_markers: DEFAULT_MISSING_MARKERS.map(String::from).to_vec(),
            state_gazetteer: false,
        }
    }
}

impl PrepConfig {
    pub fn builder() -> PrepConfigBuilder {
        PrepConfigBuilder::new()
    }
    pub fn address_column(&self) -> &str {
        &self.address_column
    }
    pub fn fields(&self) -> &[FieldColumn] {
        &self.fields
    }
    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }
    pub fn not_located(&self) -> NotLocatedStrat {
        self.not_located
    }
    pub fn abort_on_row_error(&self) -> bool {
        self.abort_on_row_error
    }
    pub fn missing_markers(&self) -> &[String] {
        &self.missing_markers
    }
    pub fn state_gazetteer(&self) -> bool {
        self.state_gazetteer
    }

    /// Is `value` a missing-value marker (or blank)?
    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.missing_markers.iter().any(|m| m == trimmed)
    }

    /// Every column the dataset must provide: the address column first, then the field columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.address_column.as_str())
            .chain(self.fields.iter().map(|f| f.column.as_str()))
    }
}

impl Display for PrepConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|c| format!("{}={}", c.column, c.label))
            .join(", ");
        let string = format!("Address column: {}\n Fields: {}\n Search mode: {:?}\n Strategy when a field is not located: {:?}\n Abort on row error: {}\n Missing markers: {:?}\n Using state gazetteer: {}", self.address_column, fields, self.search_mode, self.not_located, self.abort_on_row_error, self.missing_markers, self.state_gazetteer);
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize a `PrepConfig` structure.
#[derive(Debug, Clone)]
pub struct PrepConfigBuilder {
    address_column: Option<String>,
    fields: Option<Vec<FieldColumn>>,
    search_mode: SearchMode,
    not_located: NotLocatedStrat,
    abort_on_row_error: bool,
    missing_markers: Option<Vec<String>>,
    state_gazetteer: bool,
}

impl Default for PrepConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrepConfigBuilder {
    pub fn new() -> Self {
        Self {
            address_column: None,
            fields: None,
            search_mode: SearchMode::default(),
            not_located: NotLocatedStrat::default(),
            abort_on_row_error: false,
            missing_markers: None,
            state_gazetteer: false,
        }
    }
    pub fn address_column<S: Into<String>>(mut self, column: S) -> Self {
        self.address_column = Some(column.into());
        self
    }
    /// Appends a field column. The first call discards the default columns.
    pub fn field<S: Into<String>>(mut self, column: S, label: FieldLabel) -> Self {
        self.fields
            .get_or_insert_with(Vec::new)
            .push(FieldColumn::new(column, label));
        self
    }
    /// Replaces the field columns with the default column of each label, in the given order.
    pub fn labels<I: IntoIterator<Item = FieldLabel>>(mut self, labels: I) -> Self {
        self.fields = Some(labels.into_iter().map(FieldColumn::from).collect());
        self
    }
    pub fn search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }
    pub fn not_located(mut self, not_located: NotLocatedStrat) -> Self {
        self.not_located = not_located;
        self
    }
    pub fn abort_on_row_error(mut self, abort: bool) -> Self {
        self.abort_on_row_error = abort;
        self
    }
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }
    pub fn state_gazetteer(mut self, state_gazetteer: bool) -> Self {
        self.state_gazetteer = state_gazetteer;
        self
    }
    pub fn build(self) -> PrepConfig {
        let default = PrepConfig::default();
        PrepConfig {
            address_column: self.address_column.unwrap_or(default.address_column),
            fields: self.fields.unwrap_or(default.fields),
            search_mode: self.search_mode,
            not_located: self.not_located,
            abort_on_row_error: self.abort_on_row_error,
            missing_markers: self.missing_markers.unwrap_or(default.missing_markers),
            state_gazetteer: self.state_gazetteer,
        }
    }
}
