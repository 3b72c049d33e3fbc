//! DynoView - chassis-dynamometer run analysis
//!
//! This library parses DPR dynamometer run files and derives engine torque
//! and power curves from the recorded roller motion.
//!
//! ## Module Structure
//!
//! - [`parsers`] - DPR tokenizer, data-block detection, header extraction
//! - [`analysis`] - Torque/power derivation and curve summaries
//! - [`series`] - Curve columns, axis labels and fitted axis limits
//! - [`units`] - Unit constants, preferences and conversions
//! - [`export`] - CSV/JSON export of curves and raw channel tables
//! - [`settings`] - User settings persistence

pub mod analysis;
pub mod export;
pub mod parsers;
pub mod series;
pub mod settings;
pub mod units;
