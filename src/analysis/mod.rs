//! Derivations over a parsed dynamometer run.
//!
//! - [`torque`] turns roller motion into an engine torque/power curve
//! - [`summary`] condenses a curve and the header's rated peaks for display

pub mod summary;
pub mod torque;

pub use summary::{CurveSummary, HeaderPeaks};
pub use torque::{derive, TorqueCurve, DEFAULT_WINDOW_SIZE};

use std::time::Instant;

/// Helper function to measure analysis execution time
pub fn timed_analyze<F, T>(f: F) -> (T, u64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed().as_millis() as u64;
    (result, elapsed)
}
