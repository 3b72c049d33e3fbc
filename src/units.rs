//! Unit constants, display preferences and conversions.
//!
//! Derived curves are kept in newton-metres, kilowatts and mph (the speed
//! unit the dyno logs). Preferences only affect presentation and export.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Foot-pounds per newton-metre
pub const NM_TO_FTLB: f64 = 0.7375621;

/// RPM × N·m per kW (60000 / 2π)
pub const RPM_NM_PER_KW: f64 = 9549.2968;

/// Kilowatts per mechanical horsepower
pub const KW_PER_HP: f64 = 0.7457;

/// km/h per mph
pub const KMH_PER_MPH: f64 = 1.609344;

/// Torque unit preference
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TorqueUnit {
    #[default]
    Nm,
    FtLb,
}

impl TorqueUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TorqueUnit::Nm => "Nm",
            TorqueUnit::FtLb => "ft-lb",
        }
    }

    /// Convert from N·m to the selected unit
    pub fn convert_from_nm(&self, nm: f64) -> f64 {
        match self {
            TorqueUnit::Nm => nm,
            TorqueUnit::FtLb => nm * NM_TO_FTLB,
        }
    }
}

/// Power unit preference
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PowerUnit {
    #[default]
    Kw,
    Hp,
}

impl PowerUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUnit::Kw => "kW",
            PowerUnit::Hp => "hp",
        }
    }

    /// Convert from kW to the selected unit
    pub fn convert_from_kw(&self, kw: f64) -> f64 {
        match self {
            PowerUnit::Kw => kw,
            PowerUnit::Hp => kw / KW_PER_HP,
        }
    }
}

/// Speed unit preference
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpeedUnit {
    #[default]
    Mph,
    KmH,
}

impl SpeedUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::Mph => "mph",
            SpeedUnit::KmH => "km/h",
        }
    }

    /// Convert from mph to the selected unit
    pub fn convert_from_mph(&self, mph: f64) -> f64 {
        match self {
            SpeedUnit::Mph => mph,
            SpeedUnit::KmH => mph * KMH_PER_MPH,
        }
    }
}

/// Display units for derived curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    pub torque: TorqueUnit,
    pub power: PowerUnit,
    pub speed: SpeedUnit,
}
