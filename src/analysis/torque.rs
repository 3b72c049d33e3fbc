//! Torque and power derivation.
//!
//! Turns the roller angular velocity of a run into an engine torque/power
//! curve:
//! 1. Samples sharing an elapsed-time value are averaged into one point
//! 2. Angular acceleration is a central difference over a clamped window
//! 3. Roller friction comes from the header's cubic in wheel speed
//! 4. Torque = friction + inertia × acceleration, power from torque and RPM

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::timed_analyze;
use crate::parsers::types::{Run, ELAPSED_TIME, ENGINE_RPM, ROLLER_OMEGA, WHEEL_SPEED};
use crate::units::{NM_TO_FTLB, RPM_NM_PER_KW};

/// Default differentiation window (samples)
pub const DEFAULT_WINDOW_SIZE: usize = 51;

/// Slots a run must populate for a curve to be derived
pub const REQUIRED_CHANNELS: [usize; 4] = [ELAPSED_TIME, ENGINE_RPM, ROLLER_OMEGA, WHEEL_SPEED];

/// Derived torque/power curve, one point per unique timestamp.
///
/// An empty curve means the run lacked the channels needed to derive one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TorqueCurve {
    pub time: Vec<f64>,
    pub rpm: Vec<f64>,
    pub speed_mph: Vec<f64>,
    pub torque_nm: Vec<f64>,
    pub power_kw: Vec<f64>,
    /// Index of the highest RPM sample, `None` for an empty curve
    pub peak_rpm_idx: Option<usize>,
}

impl TorqueCurve {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Channel samples averaged per unique timestamp, ascending in time
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniqueSeries {
    pub time: Vec<f64>,
    pub omega: Vec<f64>,
    pub rpm: Vec<f64>,
    pub speed: Vec<f64>,
}

/// Timestamp key with a total order. `-0.0` and `0.0` share a bucket, as do
/// all NaNs, which sort after every number.
#[derive(Clone, Copy, Debug)]
struct TimeKey(f64);

impl TimeKey {
    fn new(t: f64) -> Self {
        if t.is_nan() {
            Self(f64::NAN)
        } else if t == 0.0 {
            Self(0.0)
        } else {
            Self(t)
        }
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Default)]
struct Bucket {
    omega: f64,
    rpm: f64,
    speed: f64,
    count: usize,
}

/// Average omega, RPM and speed across rows that share a timestamp.
///
/// The source logs faster than its timer resolution, so repeated timestamps
/// are normal. Slices are read up to the shortest length.
pub fn resample_unique(time: &[f64], omega: &[f64], rpm: &[f64], speed: &[f64]) -> UniqueSeries {
    let mut buckets: BTreeMap<TimeKey, Bucket> = BTreeMap::new();
    for (((&t, &w), &r), &s) in time.iter().zip(omega).zip(rpm).zip(speed) {
        let b = buckets.entry(TimeKey::new(t)).or_default();
        b.omega += w;
        b.rpm += r;
        b.speed += s;
        b.count += 1;
    }

    let mut out = UniqueSeries::default();
    for (key, b) in buckets {
        let n = b.count as f64;
        out.time.push(key.0);
        out.omega.push(b.omega / n);
        out.rpm.push(b.rpm / n);
        out.speed.push(b.speed / n);
    }
    out
}

/// Windowed central difference of `omega` over `time`.
///
/// Each index uses the endpoints of a window of radius `window_size / 2`,
/// clamped to the series bounds. A non-positive time span gives 0.
pub fn windowed_acceleration(time: &[f64], omega: &[f64], window_size: usize) -> Vec<f64> {
    let n = time.len().min(omega.len());
    let half = window_size / 2;

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(n - 1);
            let dt = time[hi] - time[lo];
            if dt > 0.0 {
                (omega[hi] - omega[lo]) / dt
            } else {
                0.0
            }
        })
        .collect()
}

/// Evaluate the friction cubic (highest degree first) at a speed, in ft-lb
pub fn friction_torque_ftlb(coeffs: &[f64; 4], speed: f64) -> f64 {
    let [c0, c1, c2, c3] = *coeffs;
    c0 * speed * speed * speed + c1 * speed * speed + c2 * speed + c3
}

/// Index of the first maximum; NaN entries never replace the running max
pub(crate) fn first_max_index(values: &[f64]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if values[best] < v {
            best = i;
        }
    }
    Some(best)
}

/// Derive the torque/power curve of a run.
///
/// Returns an empty curve when any of elapsed time, engine RPM, roller omega
/// or wheel speed is missing.
pub fn derive(run: &Run, window_size: usize) -> TorqueCurve {
    let missing: Vec<&str> = REQUIRED_CHANNELS
        .iter()
        .filter(|&&slot| !run.has_channel(slot))
        .filter_map(|&slot| Run::channel_def(slot).map(|def| def.name))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            "Run lacks {} ({} channels), no torque curve",
            missing.join(", "),
            run.num_columns
        );
        return TorqueCurve::default();
    }
    let (Some(time), Some(rpm), Some(omega), Some(speed)) = (
        run.channel(ELAPSED_TIME),
        run.channel(ENGINE_RPM),
        run.channel(ROLLER_OMEGA),
        run.channel(WHEEL_SPEED),
    ) else {
        return TorqueCurve::default();
    };

    let (curve, elapsed_ms) = timed_analyze(|| {
        let series = resample_unique(time, omega, rpm, speed);
        let alpha = windowed_acceleration(&series.time, &series.omega, window_size);
        let inertia = run.header.roller_inertia;
        let friction = &run.header.friction_poly;

        let torque_nm: Vec<f64> = series
            .speed
            .iter()
            .zip(&alpha)
            .map(|(&v, &a)| friction_torque_ftlb(friction, v) / NM_TO_FTLB + inertia * a)
            .collect();
        let power_kw: Vec<f64> = torque_nm
            .iter()
            .zip(&series.rpm)
            .map(|(&t, &r)| t * r / RPM_NM_PER_KW)
            .collect();
        let peak_rpm_idx = first_max_index(&series.rpm);

        TorqueCurve {
            time: series.time,
            rpm: series.rpm,
            speed_mph: series.speed,
            torque_nm,
            power_kw,
            peak_rpm_idx,
        }
    });

    tracing::info!(
        "Derived torque curve: {} unique samples from {} rows (window {}, {} ms)",
        curve.len(),
        run.num_rows,
        window_size,
        elapsed_ms
    );

    curve
}
