//! Data-block detection.
//!
//! DPR files carry no marker for where the sample table starts. The block is
//! taken to be the longest contiguous run of rows that look like numeric
//! samples; the first such run wins a tie.

use serde::{Deserialize, Serialize};

use super::fields::{is_numeric, Record};
use super::types::{ParseError, NUM_CHANNELS};

/// Thresholds used to qualify rows and accept a data block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockDetection {
    /// Minimum number of fields in a data row
    pub min_cols: usize,
    /// Minimum number of numeric non-empty fields in a data row
    pub min_numeric: usize,
    /// Minimum numeric share of the non-empty fields
    pub numeric_ratio: f64,
    /// Minimum number of records in the whole file
    pub min_records: usize,
    /// Minimum length of the accepted block
    pub min_block_rows: usize,
}

impl Default for BlockDetection {
    fn default() -> Self {
        Self {
            min_cols: 20,
            min_numeric: 10,
            numeric_ratio: 0.9,
            min_records: 42,
            min_block_rows: 50,
        }
    }
}

/// Inclusive row range of the sample table and its column width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataBlock {
    pub start: usize,
    pub end: usize,
    /// Widest row in the block, capped at the catalog size
    pub width: usize,
}

impl DataBlock {
    /// Number of sample rows in the block
    pub fn rows(&self) -> usize {
        self.end - self.start + 1
    }
}

impl BlockDetection {
    /// Check whether a record looks like a row of samples
    pub fn is_data_row(&self, row: &[String]) -> bool {
        if row.len() < self.min_cols {
            return false;
        }

        let (non_empty, numeric) = row
            .iter()
            .filter(|f| !f.is_empty())
            .fold((0usize, 0usize), |(ne, nu), f| {
                (ne + 1, nu + usize::from(is_numeric(f)))
            });

        non_empty > 0
            && numeric >= self.min_numeric
            && numeric as f64 / non_empty as f64 >= self.numeric_ratio
    }

    /// Longest run of consecutive data rows as an inclusive `(start, end)`
    /// range, or `None` when no row qualifies.
    pub fn longest_run(&self, records: &[Record]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut best_len = 0;
        let mut open: Option<usize> = None;

        // A trailing `false` closes a run that reaches the end of input
        let flags = records
            .iter()
            .map(|r| self.is_data_row(r))
            .chain(std::iter::once(false));

        for (i, qualifies) in flags.enumerate() {
            match (qualifies, open) {
                (true, None) => open = Some(i),
                (false, Some(start)) => {
                    let len = i - start;
                    if len > best_len {
                        best = Some((start, i - 1));
                        best_len = len;
                    }
                    open = None;
                }
                _ => {}
            }
        }

        best
    }

    /// Locate the sample table within the tokenized records
    pub fn locate(&self, records: &[Record]) -> Result<DataBlock, ParseError> {
        if records.len() < self.min_records {
            return Err(ParseError::TooFewRecords {
                found: records.len(),
                required: self.min_records,
            });
        }

        let (start, end) = match self.longest_run(records) {
            Some((start, end)) if end - start + 1 >= self.min_block_rows => (start, end),
            other => {
                let longest = other.map_or(0, |(s, e)| e - s + 1);
                tracing::debug!("Longest data run is {} rows", longest);
                return Err(ParseError::NoDataBlockFound {
                    longest,
                    required: self.min_block_rows,
                });
            }
        };

        let width = records[start..=end]
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .min(NUM_CHANNELS);

        tracing::debug!(
            "Data block at rows {}..={} ({} columns)",
            start,
            end,
            width
        );

        Ok(DataBlock { start, end, width })
    }
}
