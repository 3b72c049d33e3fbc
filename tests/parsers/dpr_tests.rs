//! Tests for whole-file DPR parsing
//!
//! Tests cover:
//! - Channel assembly from a synthetic run file
//! - Header and data living side by side
//! - Placeholder and malformed cells
//! - Structural failures

use crate::common::assertions::*;
use crate::common::synthetic::*;
use dynoview::parsers::types::{ELAPSED_TIME, ENGINE_RPM, ROLLER_OMEGA, WHEEL_SPEED};
use dynoview::parsers::{BlockDetection, Dpr, ParseError, Parseable};

// ============================================
// Basic Parsing Tests
// ============================================

#[test]
fn test_parse_synthetic_run() {
    let samples = linear_run(80, 4.0);
    let text = dpr_file(&HeaderSpec::default(), &samples);
    let run = Dpr::default().parse(&text).unwrap();

    assert_valid_run_structure(&run);
    assert_eq!(run.num_rows, 80);
    assert_eq!(run.num_columns, SAMPLE_COLUMNS);
    assert_eq!(run.header.run_name, "Baseline pull");

    let time = run.channel(ELAPSED_TIME).unwrap();
    let rpm = run.channel(ENGINE_RPM).unwrap();
    let omega = run.channel(ROLLER_OMEGA).unwrap();
    let speed = run.channel(WHEEL_SPEED).unwrap();
    for (i, s) in samples.iter().enumerate() {
        assert_eq!(time[i], s.time);
        assert_eq!(rpm[i], s.rpm);
        assert_eq!(omega[i], s.omega);
        assert_eq!(speed[i], s.speed);
    }
}

#[test]
fn test_untouched_slots_are_carried() {
    let text = dpr_file(&HeaderSpec::default(), &steady_run(60, 30.0));
    let run = Dpr::default().parse(&text).unwrap();
    assert!(run.channel(0).unwrap().iter().all(|&v| v == 0.0));
    assert!(run.channel(23).unwrap().iter().all(|&v| v == 23.0));
    assert_eq!(run.channel(24), None);
}

#[test]
fn test_find_channel_by_name() {
    let text = dpr_file(&HeaderSpec::default(), &steady_run(60, 30.0));
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.find_channel("roller_omega"), Some(ROLLER_OMEGA));
    assert_eq!(run.find_channel("cooler_temp"), None);
}

#[test]
fn test_placeholder_cells_become_zero() {
    let mut text = preamble(&HeaderSpec::default());
    for i in 0..60 {
        let mut fields: Vec<String> = (0..SAMPLE_COLUMNS).map(|c| (i + c).to_string()).collect();
        fields[3] = "#TRUE#".to_string();
        fields[4] = "-".to_string();
        fields[6] = String::new();
        text.push_str(&fields.join(","));
        text.push('\n');
    }
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.num_rows, 60);
    assert!(run.data[3].iter().all(|&v| v == 0.0));
    assert!(run.data[4].iter().all(|&v| v == 0.0));
    assert!(run.data[6].iter().all(|&v| v == 0.0));
    assert_eq!(run.data[7][10], 17.0);
}

#[test]
fn test_ragged_rows_zero_filled() {
    let mut text = preamble(&HeaderSpec::default());
    for i in 0..60 {
        let cols = if i % 2 == 0 { 24 } else { 21 };
        let fields: Vec<String> = (0..cols).map(|c| c.to_string()).collect();
        text.push_str(&fields.join(","));
        text.push('\n');
    }
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.num_columns, 24);
    assert_valid_run_structure(&run);
    assert_eq!(run.data[22][0], 22.0);
    assert_eq!(run.data[22][1], 0.0);
}

#[test]
fn test_crlf_and_quoted_samples() {
    let mut text = preamble(&HeaderSpec::default()).replace('\n', "\r\n");
    for s in steady_run(55, 42.0) {
        let line = sample_line(&s)
            .split(',')
            .map(|f| format!("\"{}\"", f))
            .collect::<Vec<_>>()
            .join(",");
        text.push_str(&line);
        text.push_str("\r\n");
    }
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.num_rows, 55);
    assert_eq!(run.header.run_number, 12);
    assert!(run.channel(WHEEL_SPEED).unwrap().iter().all(|&v| v == 42.0));
}

#[test]
fn test_longer_of_two_blocks_is_parsed() {
    let mut text = preamble(&HeaderSpec::default());
    for s in steady_run(50, 10.0) {
        text.push_str(&sample_line(&s));
        text.push('\n');
    }
    text.push_str("\"Second pull\"\n");
    for s in steady_run(70, 20.0) {
        text.push_str(&sample_line(&s));
        text.push('\n');
    }
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.num_rows, 70);
    assert!(run.channel(WHEEL_SPEED).unwrap().iter().all(|&v| v == 20.0));
}

#[test]
fn test_header_ignores_rows_between_blocks() {
    // Header comes from the rows above the chosen block, here the first block
    let mut text = preamble(&HeaderSpec::default());
    for s in steady_run(60, 10.0) {
        text.push_str(&sample_line(&s));
        text.push('\n');
    }
    text.push_str("\"trailer\"\n");
    for s in steady_run(50, 20.0) {
        text.push_str(&sample_line(&s));
        text.push('\n');
    }
    let run = Dpr::default().parse(&text).unwrap();
    assert_eq!(run.num_rows, 60);
    assert_eq!(run.header.filename, "RUN12.DPR");
}

// ============================================
// Error Handling Tests
// ============================================

#[test]
fn test_short_file_rejected() {
    let text = dpr_file(&HeaderSpec::default(), &steady_run(20, 1.0));
    match Dpr::default().parse(&text) {
        Err(ParseError::TooFewRecords { found, required }) => {
            assert_eq!(found, 30);
            assert_eq!(required, 42);
        }
        other => panic!("expected TooFewRecords, got {:?}", other),
    }
}

#[test]
fn test_short_block_rejected() {
    let mut text = dpr_file(&HeaderSpec::default(), &steady_run(45, 1.0));
    for i in 0..10 {
        text.push_str(&format!("\"note {}\"\n", i));
    }
    let err = Dpr::default().parse(&text).unwrap_err();
    assert!(matches!(
        err,
        ParseError::NoDataBlockFound {
            longest: 45,
            required: 50
        }
    ));
    assert!(err.to_string().contains("45"));
}

#[test]
fn test_empty_input_rejected() {
    assert!(matches!(
        Dpr::default().parse(""),
        Err(ParseError::TooFewRecords { found: 0, .. })
    ));
}

#[test]
fn test_relaxed_detection_accepts_small_run() {
    let detection = BlockDetection {
        min_records: 10,
        min_block_rows: 5,
        ..Default::default()
    };
    let text = dpr_file(&HeaderSpec::default(), &steady_run(8, 1.0));
    let run = Dpr::with_detection(detection).parse(&text).unwrap();
    assert_eq!(run.num_rows, 8);
}
