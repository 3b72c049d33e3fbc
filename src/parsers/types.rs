use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Number of channel slots a run can carry
pub const NUM_CHANNELS: usize = 41;

/// Elapsed time slot (seconds)
pub const ELAPSED_TIME: usize = 2;
/// Engine speed slot (RPM)
pub const ENGINE_RPM: usize = 5;
/// Roller angular velocity slot (rad/s)
pub const ROLLER_OMEGA: usize = 8;
/// Wheel speed slot (mph)
pub const WHEEL_SPEED: usize = 9;

/// A named, unit-tagged channel slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChannelDef {
    pub name: &'static str,
    pub unit: &'static str,
}

const fn def(name: &'static str, unit: &'static str) -> ChannelDef {
    ChannelDef { name, unit }
}

/// Fixed channel layout of a dynamometer run, addressed by column position.
///
/// Only the elapsed time, engine RPM, roller omega and wheel speed slots are
/// consumed downstream. Raw counters, expansion and reserved slots are carried
/// through untouched.
pub const CHANNEL_CATALOG: [ChannelDef; NUM_CHANNELS] = [
    def("raw_enc_counter", "counts"),
    def("raw_enc2_pos", "counts"),
    def("elapsed_time", "s"),
    def("raw_hw_counter3", "counts"),
    def("raw_hw_counter4", "counts"),
    def("engine_rpm", "RPM"),
    def("raw_hw_counter6", "counts"),
    def("roller_distance", "m"),
    def("roller_omega", "rad/s"),
    def("wheel_speed_mph", "mph"),
    def("expansion_1", ""),
    def("expansion_2", ""),
    def("expansion_3", ""),
    def("expansion_4", ""),
    def("expansion_5", ""),
    def("expansion_6", ""),
    def("expansion_7", ""),
    def("expansion_8", ""),
    def("expansion_9", ""),
    def("expansion_10", ""),
    def("expansion_11", ""),
    def("expansion_12", ""),
    def("air_temp", "C"),
    def("baro_pressure", "mbar"),
    def("humidity", "%"),
    def("aux_channel", ""),
    def("cooler_temp", "C"),
    def("load_cell_temp", "C"),
    def("load_cell_torque", "ft-lb"),
    def("tacho_rpm", "RPM"),
    def("brake_load_cmd", "%"),
    def("raw_enc_delta", "counts"),
    def("load_cell_state", ""),
    def("brake_active", ""),
    def("reserved_34", ""),
    def("reserved_35", ""),
    def("reserved_36", ""),
    def("reserved_37", ""),
    def("reserved_38", ""),
    def("reserved_39", ""),
    def("reserved_40", ""),
];

/// Run header extracted from the rows preceding the data block.
///
/// Every attribute defaults to zero/empty when the file is too short to
/// contain it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    // Run identification
    pub date: String,
    pub time: String,
    pub filename: String,
    pub run_number: i32,
    pub run_name: String,

    // Ambient conditions
    pub ambient_temp_c: f64,
    pub ambient_press_mb: f64,
    pub ambient_humid_pct: f64,
    pub correction_factor: f64,

    // Machine geometry
    pub roller_circ_ft: f64,
    pub roller_diam_in: f64,
    pub wheel_circ_m: f64,
    pub gear_ratio: f64,
    /// Opaque machine sub-model code
    pub machine_sub: String,
    /// Friction torque polynomial in ft-lb, highest degree first
    pub friction_poly: [f64; 4],

    // Machine identity
    pub manufacturer: String,
    pub model: String,
    pub machine_type: String,
    pub opto_slots: i32,
    pub software_version: String,

    // Rated peaks
    pub peak_power_hp: f64,
    pub peak_power_rpm: f64,
    pub peak_torque_ftlb: f64,
    pub peak_torque_rpm: f64,

    /// Roller mass moment of inertia (kg·m²)
    pub roller_inertia: f64,
}

/// A parsed dynamometer run.
///
/// Samples are stored column-major: `data[slot][row]`. Every populated column
/// holds exactly `num_rows` values.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Run {
    pub header: Header,
    pub num_rows: usize,
    pub num_columns: usize,
    pub data: Vec<Vec<f64>>,
}

impl Run {
    /// Samples for a catalog slot, if the run populated it
    pub fn channel(&self, slot: usize) -> Option<&[f64]> {
        if slot < self.num_columns {
            self.data.get(slot).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// True when the slot is within the populated width and carries samples
    pub fn has_channel(&self, slot: usize) -> bool {
        self.channel(slot).is_some_and(|c| !c.is_empty())
    }

    /// Catalog entry for a slot
    pub fn channel_def(slot: usize) -> Option<&'static ChannelDef> {
        CHANNEL_CATALOG.get(slot)
    }

    /// Populated channels paired with their catalog entries
    pub fn channels(&self) -> impl Iterator<Item = (&'static ChannelDef, &[f64])> + '_ {
        CHANNEL_CATALOG
            .iter()
            .zip(self.data.iter())
            .take(self.num_columns)
            .map(|(def, values)| (def, values.as_slice()))
    }

    /// Find a populated channel's slot by catalog name
    pub fn find_channel(&self, name: &str) -> Option<usize> {
        CHANNEL_CATALOG
            .iter()
            .take(self.num_columns)
            .position(|c| c.name == name)
    }
}

/// Structural parse failures. Field-level noise never produces one of these.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source file could not be opened or read
    #[error("cannot open {}: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not enough records to hold a preamble and a data block
    #[error("file too short ({found} rows, need {required})")]
    TooFewRecords { found: usize, required: usize },

    /// No run of qualifying rows reached the minimum block length
    #[error("no data block found (longest run {longest} rows, need {required})")]
    NoDataBlockFound { longest: usize, required: usize },
}

/// Trait for dynamometer log parsers
pub trait Parseable {
    fn parse(&self, contents: &str) -> Result<Run, ParseError>;
}
