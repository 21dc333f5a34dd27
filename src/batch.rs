/**
This module drives the labeling of a whole dataset: every row is assembled into a training example
on its own, and the failures are collected instead of stopping the batch (unless configured
otherwise).
*/
use crate::config::PrepConfig;
use crate::dataset::{read_dataset, DatasetError};
use crate::record::{assemble_into, AddressRecord};
use crate::reporter::CoverageReport;
use crate::span::{TaggingError, TrainingExample};
use std::path::Path;
use tracing::{info, warn};

/// A row that could not be turned into an example.
#[derive(Debug)]
pub struct RowFailure {
    /// Index of the row among the data rows, starting at 0.
    pub row: usize,
    pub error: TaggingError,
}

/// Everything produced by a batch.
#[derive(Debug)]
pub struct Batch {
    /// One example per kept row, in row order.
    pub examples: Vec<TrainingExample>,
    pub failures: Vec<RowFailure>,
    pub report: CoverageReport,
}

impl Batch {
    /// The `(text, spans)` pairs handed over to the trainer.
    pub fn into_training_data(self) -> Vec<TrainingExample> {
        self.examples
    }
}

/// Labels every record. Rows are independent: a failed row is dropped and reported in
/// `Batch::failures`, unless `config.abort_on_row_error()` is set, in which case the first failure
/// is returned as [`DatasetError::RowFailed`].
pub fn prepare<I>(records: I, config: &PrepConfig) -> Result<Batch, DatasetError>
where
    I: IntoIterator<Item = AddressRecord>,
{
    let mut examples = Vec::new();
    let mut failures = Vec::new();
    let mut report = CoverageReport::default();
    for (row, record) in records.into_iter().enumerate() {
        match assemble_into(&record, config, &mut report) {
            Ok(example) => {
                let has_overlaps = example.has_overlaps();
                if has_overlaps {
                    warn!(row, "example holds overlapping spans: {}", example);
                }
                report.record_row(false, has_overlaps);
                examples.push(example);
            }
            Err(error) => {
                report.record_row(true, false);
                if config.abort_on_row_error() {
                    return Err(DatasetError::RowFailed { row, source: error });
                }
                warn!(row, "dropping row: {}", error);
                failures.push(RowFailure { row, error });
            }
        }
    }
    info!(
        rows = report.rows(),
        kept = examples.len(),
        failed = failures.len(),
        "labeled batch"
    );
    Ok(Batch {
        examples,
        failures,
        report,
    })
}

/// Reads the CSV dataset at `path` and labels it. This is the main entrypoint of the library.
pub fn prepare_dataset<P: AsRef<Path>>(path: P, config: &PrepConfig) -> Result<Batch, DatasetError> {
    let records = read_dataset(path, config)?;
    prepare(records, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NotLocatedStrat;
    use crate::span::FieldLabel;

    fn records() -> Vec<AddressRecord> {
        vec![
            AddressRecord::new("Jane Roe, 5 Elm St, Reno")
                .with_field("Recipient", "Jane Roe")
                .with_field("City", "Reno"),
            AddressRecord::new("1 Main St, Austin")
                .with_field("Recipient", "John Doe")
                .with_field("City", "Austin"),
            AddressRecord::new("Washington, Washington").with_field("City", "Washington"),
        ]
    }

    fn config() -> PrepConfig {
        PrepConfig::builder()
            .labels([FieldLabel::Recipient, FieldLabel::City])
            .build()
    }

    #[test]
    fn test_failed_row_does_not_stop_the_batch() {
        let batch = prepare(records(), &config()).unwrap();
        assert_eq!(batch.examples.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].row, 1);
        assert_eq!(batch.failures[0].error.label(), FieldLabel::Recipient);
        assert_eq!(batch.report.rows(), 3);
        assert_eq!(batch.report.failed_rows(), 1);
    }

    #[test]
    fn test_dropped_row_is_left_out_of_label_counts() {
        let records = vec![
            AddressRecord::new("John Doe, 123 Main St, Austin, TX 73301")
                .with_field("Recipient", "John Doe")
                .with_field("City", "Dallas")
                .with_field("Zip_Code", "73301"),
            AddressRecord::new("Jane Roe, 5 Elm St, Reno, NV 89501")
                .with_field("Recipient", "Jane Roe")
                .with_field("City", "Reno")
                .with_field("Zip_Code", "89501"),
        ];
        let config = PrepConfig::builder()
            .labels([FieldLabel::Recipient, FieldLabel::City, FieldLabel::ZipCode])
            .build();
        let batch = prepare(records, &config).unwrap();
        assert_eq!(batch.examples.len(), 1);
        let expected = "Label, Located, Absent, NotLocated
RECIPIENT, 1, 0, 0
CITY, 1, 0, 1
ZIP_CODE, 1, 0, 0
Total, 3, 0, 1\n";
        assert_eq!(batch.report.to_string(), expected);
        assert_eq!(batch.report.failed_rows(), 1);
    }

    #[test]
    fn test_abort_on_row_error() {
        let config = PrepConfig::builder()
            .labels([FieldLabel::Recipient, FieldLabel::City])
            .abort_on_row_error(true)
            .build();
        let err = prepare(records(), &config).unwrap_err();
        assert!(matches!(err, DatasetError::RowFailed { row: 1, .. }));
    }

    #[test]
    fn test_skipped_fields_keep_the_row() {
        let config = PrepConfig::builder()
            .labels([FieldLabel::Recipient, FieldLabel::City])
            .not_located(NotLocatedStrat::SkipField)
            .build();
        let batch = prepare(records(), &config).unwrap();
        assert_eq!(batch.examples.len(), 3);
        assert!(batch.failures.is_empty());
        assert_eq!(batch.examples[1].spans().len(), 1);
        let recipient = batch.report.get(FieldLabel::Recipient).unwrap();
        assert_eq!((recipient.located, recipient.absent, recipient.not_located), (1, 1, 1));
    }

    #[test]
    fn test_overlaps_are_counted() {
        let records = vec![AddressRecord::new("Washington, Washington")
            .with_field("Street_Name", "Washington")
            .with_field("City", "Washington")];
        let config = PrepConfig::builder()
            .labels([FieldLabel::Street, FieldLabel::City])
            .build();
        let batch = prepare(records, &config).unwrap();
        assert_eq!(batch.report.rows_with_overlaps(), 1);
        assert_eq!(batch.into_training_data().len(), 1);
    }
}
