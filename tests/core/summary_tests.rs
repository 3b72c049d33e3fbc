//! Tests for curve and header summaries

use crate::common::float_cmp::*;
use crate::common::synthetic::*;
use dynoview::analysis::{derive, CurveSummary, HeaderPeaks, DEFAULT_WINDOW_SIZE};
use dynoview::parsers::{Dpr, Parseable};

#[test]
fn test_header_peaks_from_parsed_file() {
    let header = HeaderSpec {
        peaks: [200.0, 6800.0, 150.0, 5000.0],
        ..Default::default()
    };
    let run = Dpr::default()
        .parse(&dpr_file(&header, &steady_run(60, 30.0)))
        .unwrap();
    let peaks = HeaderPeaks::from_header(&run.header);
    assert_approx_eq(peaks.power_kw, 149.14, 1e-9);
    assert_eq!(peaks.power_rpm, 6800.0);
    assert_approx_eq(peaks.torque_nm, 150.0 / 0.7375621, 1e-9);
    assert_eq!(peaks.torque_rpm, 5000.0);
}

#[test]
fn test_curve_summary_of_accelerating_run() {
    let header = HeaderSpec {
        inertia: 2.0,
        ..Default::default()
    };
    let run = Dpr::default()
        .parse(&dpr_file(&header, &linear_run(100, 5.0)))
        .unwrap();
    let curve = derive(&run, DEFAULT_WINDOW_SIZE);
    let summary = CurveSummary::from_curve(&curve).unwrap();

    assert_eq!(summary.samples, 50);
    assert_approx_eq(summary.duration_s, 4.9, 1e-9);
    assert_approx_eq(summary.peak_rpm, 2490.0, 1e-6);
    // Constant torque, so power peaks with RPM
    assert_approx_eq(summary.max_torque_nm, 10.0, 1e-6);
    assert_approx_eq(summary.max_power_rpm, 2490.0, 1e-6);
    assert_approx_eq(summary.max_power_kw, 10.0 * 2490.0 / 9549.2968, 1e-6);
}

#[test]
fn test_no_summary_without_curve() {
    assert!(CurveSummary::from_curve(&Default::default()).is_none());
}
