//! Common test utilities shared across all test modules
//!
//! DPR files are built synthetically: a preamble carrying the header at the
//! fixed layout positions, followed by a block of sample rows.

#![allow(dead_code)]

/// Synthetic DPR file generators
pub mod synthetic {
    /// Width of generated sample rows
    pub const SAMPLE_COLUMNS: usize = 24;

    /// One logged sample of the four channels torque derivation reads
    #[derive(Clone, Copy, Debug)]
    pub struct Sample {
        pub time: f64,
        pub rpm: f64,
        pub omega: f64,
        pub speed: f64,
    }

    /// Header values to place in the preamble
    #[derive(Clone, Debug)]
    pub struct HeaderSpec {
        pub date: String,
        pub time: String,
        pub filename: String,
        pub run_number: i32,
        pub run_name: String,
        pub ambient: [f64; 4],
        pub roller_circ_ft: f64,
        pub roller_diam_in: f64,
        pub wheel_circ_m: f64,
        pub gear_ratio: f64,
        pub machine_sub: String,
        pub friction: [f64; 4],
        pub manufacturer: String,
        pub model: String,
        pub machine_type: String,
        pub opto_slots: i32,
        pub software_version: String,
        pub peaks: [f64; 4],
        pub inertia: f64,
    }

    impl Default for HeaderSpec {
        fn default() -> Self {
            Self {
                date: "2024-05-01".to_string(),
                time: "14:22:05".to_string(),
                filename: "RUN12.DPR".to_string(),
                run_number: 12,
                run_name: "Baseline pull".to_string(),
                ambient: [21.5, 1013.2, 45.0, 1.012],
                roller_circ_ft: 14.5,
                roller_diam_in: 24.0,
                wheel_circ_m: 1.95,
                gear_ratio: 3.42,
                machine_sub: "2WD".to_string(),
                friction: [0.0; 4],
                manufacturer: "Acme Dyno".to_string(),
                model: "D500".to_string(),
                machine_type: "Inertia".to_string(),
                opto_slots: 60,
                software_version: "4.2.1".to_string(),
                peaks: [150.0, 6500.0, 140.0, 4800.0],
                inertia: 0.0,
            }
        }
    }

    /// Uppercase ASCII-hex encoding of text
    pub fn hex_encode(text: &str) -> String {
        text.bytes().map(|b| format!("{:02X}", b)).collect()
    }

    /// The eight preamble rows (title plus header rows 1..=7)
    pub fn preamble(h: &HeaderSpec) -> String {
        let [f0, f1, f2, f3] = h.friction;
        let [a0, a1, a2, a3] = h.ambient;
        let [p0, p1, p2, p3] = h.peaks;
        let mut out = String::new();
        out.push_str("\"DYNO RUN FILE\"\n");
        out.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"\",\"{}\"\n",
            h.date, h.time, h.filename, h.run_number, h.run_name
        ));
        out.push_str(&format!("{},{},{},{}\n", a0, a1, a2, a3));
        out.push_str("\"--\"\n");
        out.push_str(&format!(
            "\"{}\",\"{}\",,,\"{}\",,{},\"{}\",,,{},{},{},{}\n",
            hex_encode(&h.roller_circ_ft.to_string()),
            hex_encode(&h.roller_diam_in.to_string()),
            hex_encode(&h.wheel_circ_m.to_string()),
            h.gear_ratio,
            h.machine_sub,
            f0,
            f1,
            f2,
            f3
        ));
        out.push_str(&format!(
            "\"{}\",\"{}\",\"{}\",{},,,\"{}\"\n",
            h.manufacturer, h.model, h.machine_type, h.opto_slots, h.software_version
        ));
        out.push_str(&format!("{},{},{},{}\n", p0, p1, p2, p3));
        out.push_str(&format!(",,,,,,,{}\n", h.inertia));
        out
    }

    /// One comma separated sample row; unused slots hold their index
    pub fn sample_line(s: &Sample) -> String {
        (0..SAMPLE_COLUMNS)
            .map(|c| match c {
                2 => s.time.to_string(),
                5 => s.rpm.to_string(),
                8 => s.omega.to_string(),
                9 => s.speed.to_string(),
                _ => c.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Complete DPR file text
    pub fn dpr_file(header: &HeaderSpec, samples: &[Sample]) -> String {
        let mut out = preamble(header);
        out.push_str("\"Channel data\"\n");
        for s in samples {
            out.push_str(&sample_line(s));
            out.push('\n');
        }
        out.push_str("\"End of run\"\n");
        out
    }

    /// Linear run: omega = `alpha` × t + 10 with RPM and speed ramps.
    ///
    /// Every timestamp is logged twice, so `count` rows give `count / 2`
    /// unique samples 0.1 s apart.
    pub fn linear_run(count: usize, alpha: f64) -> Vec<Sample> {
        (0..count)
            .map(|i| {
                let t = (i / 2) as f64 * 0.1;
                Sample {
                    time: t,
                    rpm: 2000.0 + 100.0 * t,
                    omega: alpha * t + 10.0,
                    speed: 20.0 + 2.0 * t,
                }
            })
            .collect()
    }

    /// Constant-speed run with strictly increasing timestamps
    pub fn steady_run(count: usize, speed: f64) -> Vec<Sample> {
        (0..count)
            .map(|i| Sample {
                time: i as f64 * 0.05,
                rpm: 3000.0,
                omega: 25.0,
                speed,
            })
            .collect()
    }
}

/// Assertion helpers for common test patterns
pub mod assertions {
    use dynoview::analysis::TorqueCurve;
    use dynoview::parsers::Run;

    /// Assert that every populated column holds `num_rows` samples
    pub fn assert_valid_run_structure(run: &Run) {
        assert_eq!(run.data.len(), run.num_columns, "one vector per column");
        for (i, column) in run.data.iter().enumerate() {
            assert_eq!(
                column.len(),
                run.num_rows,
                "Column {} should have {} values, got {}",
                i,
                run.num_rows,
                column.len()
            );
        }
    }

    /// Assert that all curve vectors share one length and time increases
    pub fn assert_valid_curve(curve: &TorqueCurve) {
        let n = curve.time.len();
        assert_eq!(curve.rpm.len(), n);
        assert_eq!(curve.speed_mph.len(), n);
        assert_eq!(curve.torque_nm.len(), n);
        assert_eq!(curve.power_kw.len(), n);
        for (i, w) in curve.time.windows(2).enumerate() {
            assert!(
                w[1] > w[0],
                "Curve time at index {} should strictly increase: {} > {}",
                i,
                w[1],
                w[0]
            );
        }
        if n > 0 {
            let idx = curve.peak_rpm_idx.expect("non-empty curve has a peak");
            assert!(curve.rpm.iter().all(|&r| r <= curve.rpm[idx]));
        }
    }
}

/// Float comparison helpers for testing
pub mod float_cmp {
    /// Check if two floats are approximately equal within a tolerance
    pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    /// Assert that two floats are approximately equal
    pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
        assert!(
            approx_eq(a, b, tolerance),
            "Values not approximately equal: {} vs {} (tolerance: {})",
            a,
            b,
            tolerance
        );
    }

    /// Default tolerance for float comparisons (0.0001)
    pub const DEFAULT_TOLERANCE: f64 = 0.0001;
}
