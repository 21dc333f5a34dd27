/*!
This library prepares training data for a named entity recognition (NER) address parser. It takes
a labeled dataset, where every row holds a free-text address and the value of each of its
components (recipient, building, street, city, ...), and produces the character spans of these
components inside the address.

# Pipeline
* The address is normalized: commas and hyphens are spaced, escaped line breaks (`\n`) become
    commas and periods are removed. See [`normalize_address`].
* Every field value goes through the same hyphen and period rules and is searched in the
    normalized address, bounded by word boundaries. See [`locate`].
* The spans found for a row are paired with the normalized address into a [`TrainingExample`],
    in the order of the configured fields. See [`assemble_example`].
* A whole dataset is labeled with [`prepare_dataset`] (or [`prepare`] for in-memory records) and
    the examples are written as JSON lines with [`write_jsonl`].

# Terminology
* A label is the category of an address component, such as `CITY` or `ZIP_CODE`. The set of labels
    is fixed, see [`FieldLabel`].
* A span is a `(start, end, label)` triple. `start` and `end` are half-open *character* offsets
    into the normalized address.
* A field is *absent* when the dataset has no value for it (empty cell or a marker such as
    `nan`); it then produces no span. A field holding a value that can't be found in the address is
    *not located*; what happens next is decided by the [`NotLocatedStrat`] of the [`PrepConfig`].

# Example
```rust
use addrner::{prepare, AddressRecord, PrepConfig};

let record = AddressRecord::new("John Doe, 123 Main St, Austin, TX 73301")
    .with_field("Recipient", "John Doe")
    .with_field("City", "Austin")
    .with_field("Zip_Code", "73301");
let batch = prepare(vec![record], &PrepConfig::default()).unwrap();
assert_eq!(
    batch.examples[0].to_string(),
    "(\"John Doe, 123 Main St, Austin, TX 73301\", [(0, 8, RECIPIENT), (23, 29, CITY), (34, 39, ZIP_CODE)])"
);
```
*/

mod batch;
mod config;
mod dataset;
mod normalize;
mod record;
mod reporter;
mod ruler;
mod span;

// The public api starts here
pub use normalize::{normalize_address, normalize_field};

pub use span::{
    locate, FieldLabel, LabelParsingError, SearchMode, SearchModeParsingError, Span, TaggingError,
    TrainingExample,
};

pub use record::{assemble_example, AddressRecord, NotLocatedStrat, NotLocatedStratParsingError};

pub use config::{
    FieldColumn, PrepConfig, PrepConfigBuilder, DEFAULT_ADDRESS_COLUMN, DEFAULT_MISSING_MARKERS,
};

pub use batch::{prepare, prepare_dataset, Batch, RowFailure};

pub use dataset::{read_dataset, read_records, write_jsonl, write_jsonl_to, write_template, DatasetError};

pub use reporter::{CoverageReport, LabelCoverage};

pub use ruler::{
    state_patterns, tag_states, write_state_patterns, RulerPattern, TokenPattern, US_STATES,
};
