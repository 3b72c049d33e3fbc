//! Positional header extraction.
//!
//! The rows above the data block hold the run header at fixed (row, column)
//! positions. The layout lives in [`HEADER_LAYOUT`] and a single routine
//! applies it, so positions can be audited and tested on their own.

use super::fields::{parse_f64_or, parse_i32_or, try_hex_decode, Record};
use super::types::Header;

/// How the raw text of a header cell is turned into a value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decode {
    /// Kept as text
    Text,
    /// Best-effort float, 0.0 when nothing numeric
    Number,
    /// Best-effort float truncated to an integer
    Integer,
    /// ASCII-hex encoded decimal text, then parsed as [`Decode::Number`]
    HexNumber,
}

/// Header attributes addressable by the layout table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderField {
    Date,
    Time,
    Filename,
    RunNumber,
    RunName,
    AmbientTemp,
    AmbientPressure,
    AmbientHumidity,
    CorrectionFactor,
    RollerCircumference,
    RollerDiameter,
    WheelCircumference,
    GearRatio,
    MachineSub,
    FrictionCoeff(usize),
    Manufacturer,
    Model,
    MachineType,
    OptoSlots,
    SoftwareVersion,
    PeakPowerHp,
    PeakPowerRpm,
    PeakTorqueFtLb,
    PeakTorqueRpm,
    RollerInertia,
}

/// One positional header cell
#[derive(Clone, Copy, Debug)]
pub struct HeaderCell {
    pub row: usize,
    pub column: usize,
    pub field: HeaderField,
    pub decode: Decode,
}

const fn cell(row: usize, column: usize, field: HeaderField, decode: Decode) -> HeaderCell {
    HeaderCell {
        row,
        column,
        field,
        decode,
    }
}

use Decode::*;
use HeaderField::*;

/// Header positions relative to the first record of the file
pub const HEADER_LAYOUT: &[HeaderCell] = &[
    // Run identification
    cell(1, 0, Date, Text),
    cell(1, 1, Time, Text),
    cell(1, 2, Filename, Text),
    cell(1, 3, RunNumber, Integer),
    cell(1, 5, RunName, Text),
    // Ambient conditions
    cell(2, 0, AmbientTemp, Number),
    cell(2, 1, AmbientPressure, Number),
    cell(2, 2, AmbientHumidity, Number),
    cell(2, 3, CorrectionFactor, Number),
    // Machine geometry
    cell(4, 0, RollerCircumference, HexNumber),
    cell(4, 1, RollerDiameter, HexNumber),
    cell(4, 4, WheelCircumference, HexNumber),
    cell(4, 6, GearRatio, Number),
    cell(4, 7, MachineSub, Text),
    cell(4, 10, FrictionCoeff(0), Number),
    cell(4, 11, FrictionCoeff(1), Number),
    cell(4, 12, FrictionCoeff(2), Number),
    cell(4, 13, FrictionCoeff(3), Number),
    // Machine identity
    cell(5, 0, Manufacturer, Text),
    cell(5, 1, Model, Text),
    cell(5, 2, MachineType, Text),
    cell(5, 3, OptoSlots, Integer),
    cell(5, 6, SoftwareVersion, Text),
    // Rated peaks
    cell(6, 0, PeakPowerHp, Number),
    cell(6, 1, PeakPowerRpm, Number),
    cell(6, 2, PeakTorqueFtLb, Number),
    cell(6, 3, PeakTorqueRpm, Number),
    // Roller
    cell(7, 7, RollerInertia, Number),
];

/// A decoded header cell value
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Text(String),
    Number(f64),
    Integer(i32),
}

impl HeaderValue {
    fn number(&self) -> f64 {
        match self {
            HeaderValue::Number(v) => *v,
            HeaderValue::Integer(v) => *v as f64,
            HeaderValue::Text(s) => parse_f64_or(s, 0.0),
        }
    }

    fn integer(&self) -> i32 {
        match self {
            HeaderValue::Integer(v) => *v,
            HeaderValue::Number(v) => *v as i32,
            HeaderValue::Text(s) => parse_i32_or(s, 0),
        }
    }

    fn text(self) -> String {
        match self {
            HeaderValue::Text(s) => s,
            HeaderValue::Number(v) => v.to_string(),
            HeaderValue::Integer(v) => v.to_string(),
        }
    }
}

impl Decode {
    /// Decode the raw text of a cell
    pub fn apply(self, raw: &str) -> HeaderValue {
        match self {
            Text => HeaderValue::Text(raw.to_string()),
            Number => HeaderValue::Number(parse_f64_or(raw, 0.0)),
            Integer => HeaderValue::Integer(parse_i32_or(raw, 0)),
            HexNumber => {
                let decoded = try_hex_decode(raw).unwrap_or_else(|| {
                    tracing::warn!("Header value {:?} is not hex, using it as-is", raw);
                    raw.to_string()
                });
                HeaderValue::Number(parse_f64_or(&decoded, 0.0))
            }
        }
    }
}

impl Header {
    /// Store a decoded value in the attribute it belongs to
    pub fn set(&mut self, field: HeaderField, value: HeaderValue) {
        match field {
            Date => self.date = value.text(),
            Time => self.time = value.text(),
            Filename => self.filename = value.text(),
            RunNumber => self.run_number = value.integer(),
            RunName => self.run_name = value.text(),
            AmbientTemp => self.ambient_temp_c = value.number(),
            AmbientPressure => self.ambient_press_mb = value.number(),
            AmbientHumidity => self.ambient_humid_pct = value.number(),
            CorrectionFactor => self.correction_factor = value.number(),
            RollerCircumference => self.roller_circ_ft = value.number(),
            RollerDiameter => self.roller_diam_in = value.number(),
            WheelCircumference => self.wheel_circ_m = value.number(),
            GearRatio => self.gear_ratio = value.number(),
            MachineSub => self.machine_sub = value.text(),
            FrictionCoeff(i) => {
                if let Some(c) = self.friction_poly.get_mut(i) {
                    *c = value.number();
                }
            }
            Manufacturer => self.manufacturer = value.text(),
            Model => self.model = value.text(),
            MachineType => self.machine_type = value.text(),
            OptoSlots => self.opto_slots = value.integer(),
            SoftwareVersion => self.software_version = value.text(),
            PeakPowerHp => self.peak_power_hp = value.number(),
            PeakPowerRpm => self.peak_power_rpm = value.number(),
            PeakTorqueFtLb => self.peak_torque_ftlb = value.number(),
            PeakTorqueRpm => self.peak_torque_rpm = value.number(),
            RollerInertia => self.roller_inertia = value.number(),
        }
    }
}

/// Build a header from the records that precede the data block.
///
/// Cells outside the available rows/columns leave their attribute at its
/// default.
pub fn extract_header(rows: &[Record]) -> Header {
    extract_with_layout(rows, HEADER_LAYOUT)
}

/// [`extract_header`] with an explicit layout table
pub fn extract_with_layout(rows: &[Record], layout: &[HeaderCell]) -> Header {
    let mut header = Header::default();
    for cell in layout {
        let Some(raw) = rows.get(cell.row).and_then(|r| r.get(cell.column)) else {
            continue;
        };
        header.set(cell.field, cell.decode.apply(raw));
    }
    tracing::debug!(
        "Header: run {} '{}' on {} {}",
        header.run_number,
        header.run_name,
        header.date,
        header.time
    );
    header
}
