/**
This modules gives a few tools to prettyprint how well the fields of a batch were located.
*/
use crate::span::FieldLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

/// The reporter holds, for every label, how many fields were located, absent or not located. It
/// can be displayed as if it were collected into a dataframe and can be consumed to obtain a
/// `HashSet` of `LabelCoverage`. A report is returned by the batch driver.
///
/// # Example
///
/// ```rust
/// use addrner::{prepare, AddressRecord, FieldLabel, PrepConfig};
///
/// let records = vec![
///     AddressRecord::new("Austin, TX").with_field("City", "Austin").with_field("State", "TX"),
///     AddressRecord::new("Reno, NV").with_field("City", "Reno"),
/// ];
/// let config = PrepConfig::builder().labels([FieldLabel::City, FieldLabel::State]).build();
/// let batch = prepare(records, &config).unwrap();
///
/// let expected_report = "Label, Located, Absent, NotLocated
/// CITY, 2, 0, 0
/// STATE, 1, 1, 0
/// Total, 3, 1, 0\n";
///
/// assert_eq!(expected_report, batch.report.to_string());
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CoverageReport {
    labels: BTreeMap<FieldLabel, LabelCoverage>,
    rows: usize,
    failed_rows: usize,
    rows_with_overlaps: usize,
}

/// Counts of a single label.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelCoverage {
    /// The label, such as `CITY`
    pub label: FieldLabel,
    /// Fields found in their address
    pub located: usize,
    /// Fields without a value
    pub absent: usize,
    /// Fields holding a value that could not be found
    pub not_located: usize,
    /// Spans added by the state gazetteer rather than read from a column
    pub from_gazetteer: usize,
}

impl LabelCoverage {
    fn new(label: FieldLabel) -> Self {
        LabelCoverage {
            label,
            located: 0,
            absent: 0,
            not_located: 0,
            from_gazetteer: 0,
        }
    }
}

/// The LabelCoverage struct acts as a line in a dataframe when displayed.
impl Display for LabelCoverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.label,
            self.located + self.from_gazetteer,
            self.absent,
            self.not_located
        )
    }
}

/// By converting the report into a `HashSet` of `LabelCoverage`, you lose the ordering of the
/// labels and the row counts.
impl From<CoverageReport> for HashSet<LabelCoverage> {
    fn from(value: CoverageReport) -> Self {
        value.labels.into_values().collect()
    }
}

impl CoverageReport {
    fn entry(&mut self, label: FieldLabel) -> &mut LabelCoverage {
        self.labels
            .entry(label)
            .or_insert_with(|| LabelCoverage::new(label))
    }
    pub(crate) fn record_located(&mut self, label: FieldLabel) {
        self.entry(label).located += 1
    }
    pub(crate) fn record_absent(&mut self, label: FieldLabel) {
        self.entry(label).absent += 1
    }
    pub(crate) fn record_not_located(&mut self, label: FieldLabel) {
        self.entry(label).not_located += 1
    }
    pub(crate) fn record_gazetteer(&mut self, label: FieldLabel) {
        self.entry(label).from_gazetteer += 1
    }
    /// Adds the per-label counts of `other` to this report. Row counts are left untouched.
    pub(crate) fn merge_fields(&mut self, other: CoverageReport) {
        for (label, coverage) in other.labels {
            let entry = self.entry(label);
            entry.located += coverage.located;
            entry.absent += coverage.absent;
            entry.not_located += coverage.not_located;
            entry.from_gazetteer += coverage.from_gazetteer;
        }
    }
    pub(crate) fn record_row(&mut self, failed: bool, has_overlaps: bool) {
        self.rows += 1;
        if failed {
            self.failed_rows += 1
        }
        if has_overlaps {
            self.rows_with_overlaps += 1
        }
    }

    pub fn get(&self, label: FieldLabel) -> Option<&LabelCoverage> {
        self.labels.get(&label)
    }
    /// Rows processed, including the failed ones.
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn failed_rows(&self) -> usize {
        self.failed_rows
    }
    /// Kept rows whose example holds at least two overlapping spans.
    pub fn rows_with_overlaps(&self) -> usize {
        self.rows_with_overlaps
    }

    fn total(&self) -> (usize, usize, usize) {
        self.labels.values().fold((0, 0, 0), |acc, c| {
            (
                acc.0 + c.located + c.from_gazetteer,
                acc.1 + c.absent,
                acc.2 + c.not_located,
            )
        })
    }
}

/// The report acts as a dataframe when displayed.
impl Display for CoverageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Label, Located, Absent, NotLocated")?;
        for v in self.labels.values() {
            writeln!(f, "{}", v)?
        }
        let (located, absent, not_located) = self.total();
        writeln!(f, "Total, {}, {}, {}", located, absent, not_located)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_displayed_in_label_order() {
        let mut report = CoverageReport::default();
        report.record_located(FieldLabel::ZipCode);
        report.record_not_located(FieldLabel::Recipient);
        report.record_absent(FieldLabel::City);
        report.record_gazetteer(FieldLabel::State);
        let expected = "Label, Located, Absent, NotLocated
RECIPIENT, 0, 0, 1
CITY, 0, 1, 0
STATE, 1, 0, 0
ZIP_CODE, 1, 0, 0
Total, 2, 1, 1\n";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_row_counts() {
        let mut report = CoverageReport::default();
        report.record_row(false, false);
        report.record_row(true, false);
        report.record_row(false, true);
        assert_eq!(report.rows(), 3);
        assert_eq!(report.failed_rows(), 1);
        assert_eq!(report.rows_with_overlaps(), 1);
    }

    #[test]
    fn test_merge_fields() {
        let mut report = CoverageReport::default();
        report.record_located(FieldLabel::City);
        report.record_row(false, false);
        let mut row = CoverageReport::default();
        row.record_located(FieldLabel::City);
        row.record_absent(FieldLabel::Country);
        row.record_row(false, false);
        report.merge_fields(row);
        assert_eq!(report.get(FieldLabel::City).unwrap().located, 2);
        assert_eq!(report.get(FieldLabel::Country).unwrap().absent, 1);
        assert_eq!(report.rows(), 1);
    }

    #[test]
    fn test_into_hashset() {
        let mut report = CoverageReport::default();
        report.record_located(FieldLabel::City);
        report.record_located(FieldLabel::City);
        let set: HashSet<LabelCoverage> = report.into();
        let mut expected = LabelCoverage::new(FieldLabel::City);
        expected.located = 2;
        assert_eq!(set, HashSet::from([expected]));
    }
}
