//! DPR chassis-dynamometer run parser.
//!
//! DPR files are comma separated text tables with quoted fields. A preamble
//! of variable length carries the run header at fixed positions, followed by
//! one unlabeled block of samples. The block is found from the shape of the
//! rows (see [`BlockDetection`]), the header is read from the rows above it.

use rayon::prelude::*;
use std::path::Path;

use super::block::{BlockDetection, DataBlock};
use super::fields::{parse_f64_or, tokenize, Record};
use super::header::extract_header;
use super::types::{Header, ParseError, Parseable, Run};

/// DPR log file parser
#[derive(Clone, Debug, Default)]
pub struct Dpr {
    pub detection: BlockDetection,
}

impl Dpr {
    /// Parser with custom block-detection thresholds
    pub fn with_detection(detection: BlockDetection) -> Self {
        Self { detection }
    }

    /// Check if a file path looks like a DPR run file
    pub fn is_dpr_path(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("dpr"))
    }

    /// Read and parse a DPR file from disk
    pub fn parse_file(&self, path: &Path) -> Result<Run, ParseError> {
        let bytes = std::fs::read(path).map_err(|source| ParseError::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        // Stray non-UTF-8 bytes in text fields must not reject the file
        let contents = String::from_utf8_lossy(&bytes);
        self.parse(&contents)
    }

    /// Parse already tokenized records
    pub fn parse_records(&self, records: &[Record]) -> Result<Run, ParseError> {
        let block = self.detection.locate(records)?;
        let header = extract_header(&records[..block.start]);
        let run = assemble_run(records, &block, header);

        tracing::info!(
            "Parsed DPR run: {} rows, {} channels (block at row {})",
            run.num_rows,
            run.num_columns,
            block.start
        );

        Ok(run)
    }
}

impl Parseable for Dpr {
    fn parse(&self, contents: &str) -> Result<Run, ParseError> {
        let records = tokenize(contents);
        tracing::debug!("Tokenized {} records", records.len());
        self.parse_records(&records)
    }
}

/// Transpose the located block into column-major channel arrays.
///
/// Cells beyond the end of a short row, and cells that do not parse, are 0.0.
pub fn assemble_run(records: &[Record], block: &DataBlock, header: Header) -> Run {
    let rows = &records[block.start..=block.end];
    let num_columns = block.width;

    let mut data: Vec<Vec<f64>> = vec![Vec::new(); num_columns];
    data.par_iter_mut().enumerate().for_each(|(col, values)| {
        *values = rows
            .iter()
            .map(|row| row.get(col).map_or(0.0, |f| parse_f64_or(f, 0.0)))
            .collect();
    });

    Run {
        header,
        num_rows: rows.len(),
        num_columns,
        data,
    }
}
