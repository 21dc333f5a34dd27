/**
This module reads labeled address datasets (CSV with a header row) and writes what the labeling
produces: JSON-lines training examples and empty dataset templates.
*/
use crate::config::PrepConfig;
use crate::record::AddressRecord;
use crate::span::{TaggingError, TrainingExample};
use ahash::AHashMap;
use csv::{ReaderBuilder, Writer};
use serde_jsonlines::JsonLinesWriter;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Error type for reading, labeling and writing a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("The dataset has no `{0}` column")]
    MissingColumn(String),
    #[error("Row {row} could not be labeled: {source}")]
    RowFailed {
        row: usize,
        #[source]
        source: TaggingError,
    },
}

/// Reads the dataset at `path`. See [`read_records`].
pub fn read_dataset<P: AsRef<Path>>(
    path: P,
    config: &PrepConfig,
) -> Result<Vec<AddressRecord>, DatasetError> {
    let file = File::open(path)?;
    read_records(file, config)
}

/// Reads every row of a CSV dataset into an [`AddressRecord`]. The first line must be a header
/// naming the address column and every field column of `config`; other columns are ignored.
/// Empty cells become absent fields.
pub fn read_records<R: Read>(
    reader: R,
    config: &PrepConfig,
) -> Result<Vec<AddressRecord>, DatasetError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let index: AHashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let column_index = |column: &str| {
        index
            .get(column)
            .copied()
            .ok_or_else(|| DatasetError::MissingColumn(String::from(column)))
    };
    let address_index = column_index(config.address_column())?;
    let field_indices = config
        .fields()
        .iter()
        .map(|f| Ok((f.column.as_str(), column_index(&f.column)?)))
        .collect::<Result<Vec<_>, DatasetError>>()?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = AddressRecord::new(row.get(address_index).unwrap_or_default());
        for (column, i) in field_indices.iter() {
            let value = row.get(*i).filter(|v| !v.is_empty()).map(String::from);
            record.insert_field(*column, value);
        }
        records.push(record);
    }
    info!(rows = records.len(), "read dataset");
    Ok(records)
}

/// Writes one training example per line, as `{"text": ..., "entities": [[start, end, label]]}`.
pub fn write_jsonl<P: AsRef<Path>>(path: P, examples: &[TrainingExample]) -> Result<(), DatasetError> {
    let file = BufWriter::new(File::create(path)?);
    write_jsonl_to(file, examples)
}

/// Same as [`write_jsonl`], on any writer.
pub fn write_jsonl_to<W: Write>(writer: W, examples: &[TrainingExample]) -> Result<(), DatasetError> {
    let mut writer = JsonLinesWriter::new(writer);
    writer.write_all(examples)?;
    writer.flush()?;
    Ok(())
}

/// Writes a dataset holding only the header row of `config`, ready to be filled in by hand.
pub fn write_template<P: AsRef<Path>>(path: P, config: &PrepConfig) -> Result<(), DatasetError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(config.columns())?;
    writer.flush()?;
    Ok(())
}
