//! Plottable series of a derived torque curve.
//!
//! Each series is one column of a [`TorqueCurve`]. Any pair of series can be
//! tabulated or exported against each other.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::analysis::TorqueCurve;
use crate::units::UnitPreferences;

/// A column of a torque curve
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Series {
    Rpm,
    Time,
    Speed,
    Torque,
    Power,
}

impl Series {
    /// Axis label in the native units of the curve
    pub fn label(&self) -> &'static str {
        match self {
            Series::Rpm => "RPM",
            Series::Time => "Time (s)",
            Series::Speed => "Speed (mph)",
            Series::Torque => "Torque (Nm)",
            Series::Power => "Power (kW)",
        }
    }

    /// Axis label in the preferred display units
    pub fn display_label(&self, prefs: &UnitPreferences) -> String {
        match self {
            Series::Rpm | Series::Time => self.label().to_string(),
            Series::Speed => format!("Speed ({})", prefs.speed.symbol()),
            Series::Torque => format!("Torque ({})", prefs.torque.symbol()),
            Series::Power => format!("Power ({})", prefs.power.symbol()),
        }
    }

    /// Native-unit samples of this series
    pub fn data<'a>(&self, curve: &'a TorqueCurve) -> &'a [f64] {
        match self {
            Series::Rpm => &curve.rpm,
            Series::Time => &curve.time,
            Series::Speed => &curve.speed_mph,
            Series::Torque => &curve.torque_nm,
            Series::Power => &curve.power_kw,
        }
    }

    /// Convert one native sample to the preferred display unit
    pub fn convert(&self, value: f64, prefs: &UnitPreferences) -> f64 {
        match self {
            Series::Rpm | Series::Time => value,
            Series::Speed => prefs.speed.convert_from_mph(value),
            Series::Torque => prefs.torque.convert_from_nm(value),
            Series::Power => prefs.power.convert_from_kw(value),
        }
    }

    /// Samples of this series in the preferred display units
    pub fn values(&self, curve: &TorqueCurve, prefs: &UnitPreferences) -> Vec<f64> {
        self.data(curve)
            .iter()
            .map(|&v| self.convert(v, prefs))
            .collect()
    }
}

/// Fitted axis range: data extent padded by 5% of the span, at least 1.0.
///
/// Returns `None` for an empty slice. NaN samples are skipped.
pub fn axis_limits(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    let pad = ((max - min) * 0.05).max(1.0);
    Some((min - pad, max + pad))
}
