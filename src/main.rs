//! DynoView - chassis-dynamometer run analysis
//!
//! Loads a DPR run file, derives the torque/power curve and prints the run
//! header, a curve summary and optional tables or exports.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dynoview::analysis::{self, CurveSummary, HeaderPeaks, TorqueCurve};
use dynoview::export::{export_curve, export_run_csv, ExportFormat};
use dynoview::parsers::{Dpr, Run};
use dynoview::series::{axis_limits, Series};
use dynoview::settings::UserSettings;
use dynoview::units::{PowerUnit, SpeedUnit, TorqueUnit, UnitPreferences};

#[derive(Parser, Debug)]
#[command(name = "dynoview", version, about = "Chassis-dynamometer run analysis")]
struct Cli {
    /// DPR run file to analyze
    file: PathBuf,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Differentiation window in samples
    #[arg(long)]
    window: Option<usize>,

    /// Print a two-column table of the curve, e.g. `--table rpm torque`
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    table: Option<Vec<Series>>,

    /// Write the curve (or raw channels with --raw) to a file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export format, inferred from the export path when omitted
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Export the raw channel table instead of the derived curve
    #[arg(long)]
    raw: bool,

    /// List the populated channels with their ranges
    #[arg(long)]
    channels: bool,

    #[arg(long)]
    torque_unit: Option<TorqueUnit>,

    #[arg(long)]
    power_unit: Option<PowerUnit>,

    #[arg(long)]
    speed_unit: Option<SpeedUnit>,

    /// Persist the window and unit choices to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // Settings that may be written back must load cleanly
    let strict_path = cli
        .config
        .clone()
        .or_else(|| cli.save_settings.then(UserSettings::get_settings_path).flatten());
    let mut settings = match &strict_path {
        Some(path) => UserSettings::load_from(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => UserSettings::load(),
    };
    apply_overrides(&cli, &mut settings);

    if cli.save_settings {
        match &cli.config {
            Some(path) => settings.save_to(path)?,
            None => settings.save()?,
        }
    }

    let parser = Dpr::with_detection(settings.detection.clone());
    let run = parser
        .parse_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;

    let curve = analysis::derive(&run, settings.effective_window());

    print_header(&run);
    print_summary(&run, &curve, &settings.units);

    if cli.channels {
        print_channels(&run);
    }

    if let Some(pair) = &cli.table {
        let [x, y] = pair.as_slice() else {
            return Err(anyhow!("--table needs exactly two series"));
        };
        print_table(&curve, *x, *y, &settings.units);
    }

    if let Some(path) = &cli.export {
        let format = cli
            .format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or_default();
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let writer = BufWriter::new(file);
        if cli.raw {
            if format != ExportFormat::Csv {
                tracing::warn!("Raw channel export is CSV only");
            }
            export_run_csv(&run, writer)?;
        } else {
            export_curve(&curve, &settings.units, writer, format)?;
        }
        tracing::info!("Wrote {}", path.display());
    }

    Ok(())
}

fn apply_overrides(cli: &Cli, settings: &mut UserSettings) {
    if let Some(window) = cli.window {
        settings.window_size = window;
    }
    if let Some(unit) = cli.torque_unit {
        settings.units.torque = unit;
    }
    if let Some(unit) = cli.power_unit {
        settings.units.power = unit;
    }
    if let Some(unit) = cli.speed_unit {
        settings.units.speed = unit;
    }
}

fn print_header(run: &Run) {
    let h = &run.header;
    println!("Run {} \"{}\" ({})", h.run_number, h.run_name, h.filename);
    println!("  Recorded:    {} {}", h.date, h.time);
    println!(
        "  Machine:     {} {} {} (software {})",
        h.manufacturer, h.model, h.machine_type, h.software_version
    );
    println!(
        "  Ambient:     {:.1} C, {:.1} mb, {:.1} %, CF {:.3}",
        h.ambient_temp_c, h.ambient_press_mb, h.ambient_humid_pct, h.correction_factor
    );
    println!(
        "  Roller:      circ {:.3} ft, diam {:.3} in, inertia {:.4}, {} opto slots",
        h.roller_circ_ft, h.roller_diam_in, h.roller_inertia, h.opto_slots
    );
    println!(
        "  Vehicle:     wheel circ {:.3} m, gear ratio {:.3}",
        h.wheel_circ_m, h.gear_ratio
    );

    let peaks = HeaderPeaks::from_header(h);
    println!(
        "  Rated peaks: {:.1} kW @ {:.0} RPM, {:.1} Nm @ {:.0} RPM",
        peaks.power_kw, peaks.power_rpm, peaks.torque_nm, peaks.torque_rpm
    );
    println!("  Data:        {} rows x {} channels", run.num_rows, run.num_columns);
}

fn print_summary(run: &Run, curve: &TorqueCurve, prefs: &UnitPreferences) {
    let Some(s) = CurveSummary::from_curve(curve) else {
        println!(
            "No torque curve: run has {} channels, needs time, RPM, roller omega and wheel speed",
            run.num_columns
        );
        return;
    };

    println!(
        "Curve: {} samples over {:.2} s, peak {:.0} RPM",
        s.samples, s.duration_s, s.peak_rpm
    );
    println!(
        "  Max torque: {:.1} {} @ {:.0} RPM",
        prefs.torque.convert_from_nm(s.max_torque_nm),
        prefs.torque.symbol(),
        s.max_torque_rpm
    );
    println!(
        "  Max power:  {:.1} {} @ {:.0} RPM",
        prefs.power.convert_from_kw(s.max_power_kw),
        prefs.power.symbol(),
        s.max_power_rpm
    );
}

fn print_channels(run: &Run) {
    println!("Channels:");
    for (slot, (def, values)) in run.channels().enumerate() {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  [{:2}] {:<20} {:<8} {:.3} .. {:.3}",
            slot, def.name, def.unit, min, max
        );
    }
}

fn print_table(curve: &TorqueCurve, x: Series, y: Series, prefs: &UnitPreferences) {
    if curve.is_empty() {
        println!("No curve to tabulate");
        return;
    }
    let xs = x.values(curve, prefs);
    let ys = y.values(curve, prefs);
    println!("{:>16} {:>16}", x.display_label(prefs), y.display_label(prefs));
    for (a, b) in xs.iter().zip(&ys) {
        println!("{:>16.3} {:>16.3}", a, b);
    }
    if let (Some((x0, x1)), Some((y0, y1))) = (axis_limits(&xs), axis_limits(&ys)) {
        println!("Axis limits: x [{:.3}, {:.3}], y [{:.3}, {:.3}]", x0, x1, y0, y1);
    }
}
