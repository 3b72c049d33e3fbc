//! Curve and header summaries.

use serde::Serialize;

use super::torque::{first_max_index, TorqueCurve};
use crate::parsers::types::Header;
use crate::units::{KW_PER_HP, NM_TO_FTLB};

/// Rated peaks stored in the header, converted to metric
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HeaderPeaks {
    pub power_kw: f64,
    pub power_rpm: f64,
    pub torque_nm: f64,
    pub torque_rpm: f64,
}

impl HeaderPeaks {
    pub fn from_header(header: &Header) -> Self {
        Self {
            power_kw: header.peak_power_hp * KW_PER_HP,
            power_rpm: header.peak_power_rpm,
            torque_nm: header.peak_torque_ftlb / NM_TO_FTLB,
            torque_rpm: header.peak_torque_rpm,
        }
    }
}

/// Headline figures of a derived curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurveSummary {
    pub samples: usize,
    pub duration_s: f64,
    pub max_torque_nm: f64,
    pub max_torque_rpm: f64,
    pub max_power_kw: f64,
    pub max_power_rpm: f64,
    pub peak_rpm: f64,
}

impl CurveSummary {
    /// Summarize a curve, `None` when it is empty
    pub fn from_curve(curve: &TorqueCurve) -> Option<Self> {
        let torque_idx = first_max_index(&curve.torque_nm)?;
        let power_idx = first_max_index(&curve.power_kw)?;
        let rpm_idx = curve.peak_rpm_idx?;

        let first = *curve.time.first()?;
        let last = *curve.time.last()?;

        Some(Self {
            samples: curve.len(),
            duration_s: last - first,
            max_torque_nm: curve.torque_nm[torque_idx],
            max_torque_rpm: curve.rpm[torque_idx],
            max_power_kw: curve.power_kw[power_idx],
            max_power_rpm: curve.rpm[power_idx],
            peak_rpm: curve.rpm[rpm_idx],
        })
    }
}
