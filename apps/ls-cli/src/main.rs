mod error;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use error::{CliError, CliResult};
use ls_core::{mps_to_mph, newtons_to_lbf};
use ls_save::SaveFile;
use ls_steam::{
    ControllerInputs, Environment, FiringMode, SimOptions, SimRecord, StartProfile, SteamOutputs,
    SteamParams, SteamPowerPlant, Weather, run_sim,
};

#[derive(Parser)]
#[command(name = "ls-cli")]
#[command(about = "Steam locomotive power plant simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    MixedTraffic,
    SaturatedTank,
    GearedLogger,
}

impl Preset {
    fn params(self) -> SteamParams {
        match self {
            Preset::MixedTraffic => SteamParams::mixed_traffic(),
            Preset::SaturatedTank => SteamParams::saturated_tank(),
            Preset::GearedLogger => SteamParams::geared_logger(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeatherArg {
    Dry,
    Wet,
    Snow,
}

impl From<WeatherArg> for Weather {
    fn from(w: WeatherArg) -> Self {
        match w {
            WeatherArg::Dry => Weather::Dry,
            WeatherArg::Wet => Weather::Wet,
            WeatherArg::Snow => Weather::Snow,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fixed-control scenario and print a summary
    Run {
        /// Built-in locomotive
        #[arg(long, value_enum, default_value = "mixed-traffic")]
        preset: Preset,
        /// YAML parameter file (overrides --preset)
        #[arg(long)]
        params: Option<PathBuf>,
        /// Start from two thirds of working pressure
        #[arg(long)]
        cold: bool,
        /// Simulated time in seconds
        #[arg(long, default_value_t = 600.0)]
        duration: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.5)]
        dt: f64,
        #[arg(long, default_value_t = 0.5)]
        throttle: f64,
        /// Signed cutoff; negative runs in reverse
        #[arg(long, default_value_t = 0.35, allow_hyphen_values = true)]
        cutoff: f64,
        /// Train speed in m/s
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        speed: f64,
        /// Gear position for geared locomotives (0 = neutral)
        #[arg(long, default_value_t = 1)]
        gear: u32,
        #[arg(long, value_enum, default_value = "dry")]
        weather: WeatherArg,
        /// Fire by hand instead of the automatic fireman
        #[arg(long)]
        manual: bool,
        /// Manual firing rate (0..1)
        #[arg(long, default_value_t = 0.3)]
        firing_rate: f64,
        /// Manual injector setting (0..1), both injectors
        #[arg(long, default_value_t = 0.0)]
        injectors: f64,
        /// Record every N-th step to the CSV
        #[arg(long, default_value_t = 10)]
        record_every: usize,
        /// Write the recorded series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Resume from a save (.json, .yaml or legacy binary)
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write the final state (.json, .yaml or legacy binary)
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the contents of a save file
    Inspect {
        save_path: PathBuf,
    },
    /// Convert a save between formats, chosen by file extension
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// List the built-in locomotives, or dump one as YAML
    Presets {
        #[arg(long, value_enum)]
        dump: Option<Preset>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            preset,
            params,
            cold,
            duration,
            dt,
            throttle,
            cutoff,
            speed,
            gear,
            weather,
            manual,
            firing_rate,
            injectors,
            record_every,
            csv,
            load,
            save,
        } => {
            let params = match params {
                Some(path) => load_params(&path)?,
                None => preset.params(),
            };
            let controls = ControllerInputs {
                throttle,
                reverser: cutoff,
                gear,
                damper: 1.0,
                firing_rate,
                injector1: injectors,
                injector2: injectors,
                firing_mode: if manual {
                    FiringMode::Manual
                } else {
                    FiringMode::Automatic
                },
                ..ControllerInputs::default()
            };
            let env = Environment {
                speed_mps: speed,
                weather: weather.into(),
                sanding: false,
            };
            let profile = if cold { StartProfile::Cold } else { StartProfile::Hot };
            let opts = SimOptions {
                dt,
                t_end: duration,
                record_every,
                ..SimOptions::default()
            };
            cmd_run(params, profile, &controls, &env, &opts, load.as_deref(), csv.as_deref(), save.as_deref())
        }
        Commands::Inspect { save_path } => cmd_inspect(&save_path),
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Presets { dump } => cmd_presets(dump),
    }
}

fn load_params(path: &Path) -> CliResult<SteamParams> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ParamsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let params: SteamParams = serde_yaml::from_str(&content).map_err(|source| CliError::ParamsParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(params)
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    params: SteamParams,
    profile: StartProfile,
    controls: &ControllerInputs,
    env: &Environment,
    opts: &SimOptions,
    load: Option<&Path>,
    csv: Option<&Path>,
    save: Option<&Path>,
) -> CliResult<()> {
    println!("Running {} for {} s (dt = {} s)", params.name, opts.t_end, opts.dt);
    let mut plant = SteamPowerPlant::new(params, profile)?;
    if let Some(path) = load {
        let saved = ls_save::load_any(path)?;
        saved.apply(&mut plant);
        println!("✓ Resumed from {}", path.display());
    }

    let mut events = Vec::new();
    let record = run_sim(&mut plant, opts, |_, last| {
        events.extend(last.events.iter().copied());
        (controls.clone(), env.clone())
    })?;
    events.extend(plant.outputs().events.iter().copied());

    print_summary(&plant, &record, env.speed_mps);
    if !events.is_empty() {
        println!("Events:");
        for e in &events {
            println!("  {}", e.describe());
        }
    }

    if let Some(path) = csv {
        write_csv(path, &record)?;
        println!("✓ Exported {} data points to {}", record.t.len(), path.display());
    }
    if let Some(path) = save {
        ls_save::save_any(path, &SaveFile::capture(&plant))?;
        println!("✓ Saved state to {}", path.display());
    }
    Ok(())
}

fn print_summary(plant: &SteamPowerPlant, record: &SimRecord, speed_mps: f64) {
    let out = plant.outputs();
    let elapsed = record.t.last().copied().unwrap_or(0.0);
    let min_pressure = record
        .x
        .iter()
        .map(|o| o.boiler_pressure_psi)
        .fold(f64::INFINITY, f64::min);

    println!("After {:.1} s:", elapsed);
    println!(
        "  boiler pressure   {:7.1} psi (min {:.1})",
        out.boiler_pressure_psi, min_pressure
    );
    println!(
        "  water level       {:7.1} % of glass ({:.3} of boiler)",
        out.water_gauge_level * 100.0,
        out.water_fraction
    );
    println!(
        "  tractive effort   {:7.0} lbf ({:.0} N)",
        newtons_to_lbf(out.motive_force_n),
        out.motive_force_n
    );
    println!(
        "  indicated power   {:7.0} hp at {:.1} mph",
        out.indicated_hp,
        mps_to_mph(speed_mps)
    );
    println!("  cylinder MEP      {:7.1} psi", out.mean_effective_pressure_psi);
    println!(
        "  steam usage       {:7.0} lb/h (cylinders {:.0})",
        out.usage.total() * 3600.0,
        out.usage.cylinders * 3600.0
    );
    println!(
        "  coal burn         {:7.0} lb/h, fire {:.0} lb",
        out.burn_rate_lb_s * 3600.0,
        out.fire_mass_lb
    );
    println!(
        "  tender            {:7.0} lb coal, {:.0} gal water",
        out.tender_coal_lb, out.tender_water_gal
    );
    if out.safety_valve_active {
        println!("  safety valves lifting ({:.2} lb/s)", out.safety_valve_discharge_lb_s);
    }
    if out.wheel_slip {
        println!("  wheels slipping");
    }
}

fn write_csv(path: &Path, record: &SimRecord) -> CliResult<()> {
    let mut csv = String::from(
        "time_s,pressure_psi,water_fraction,motive_force_n,indicated_hp,mep_psi,steam_lb_h,burn_lb_h,fire_lb,coal_lb,water_gal\n",
    );
    for (t, o) in record.t.iter().zip(&record.x) {
        csv.push_str(&csv_row(*t, o));
    }
    std::fs::write(path, csv)?;
    Ok(())
}

fn csv_row(t: f64, o: &SteamOutputs) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}\n",
        t,
        o.boiler_pressure_psi,
        o.water_fraction,
        o.motive_force_n,
        o.indicated_hp,
        o.mean_effective_pressure_psi,
        o.usage.total() * 3600.0,
        o.burn_rate_lb_s * 3600.0,
        o.fire_mass_lb,
        o.tender_coal_lb,
        o.tender_water_gal
    )
}

fn cmd_inspect(path: &Path) -> CliResult<()> {
    let save = ls_save::load_any(path)?;
    println!("Save file: {}", path.display());
    println!("  version      {}", save.version);
    if save.locomotive.is_empty() {
        println!("  locomotive   (unknown, legacy layout)");
    } else {
        println!("  locomotive   {}", save.locomotive);
    }
    println!("  tick         {}", save.saved_at_tick);
    print!("{}", serde_yaml::to_string(&save.state)?);
    Ok(())
}

fn cmd_convert(input: &Path, output: &Path) -> CliResult<()> {
    let save = ls_save::load_any(input)?;
    ls_save::save_any(output, &save)?;
    println!("✓ Converted {} -> {}", input.display(), output.display());
    Ok(())
}

fn cmd_presets(dump: Option<Preset>) -> CliResult<()> {
    if let Some(preset) = dump {
        print!("{}", serde_yaml::to_string(&preset.params())?);
        return Ok(());
    }
    for preset in [Preset::MixedTraffic, Preset::SaturatedTank, Preset::GearedLogger] {
        let p = preset.params();
        let name = preset
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        println!(
            "  {:<15} {} ({} cyl {}x{} in, {} psi, {} in wheels{})",
            name,
            p.name,
            p.num_cylinders,
            p.cylinder_bore_in,
            p.cylinder_stroke_in,
            p.max_boiler_pressure_psi,
            p.drive_wheel_diameter_in,
            if p.is_geared() { ", geared" } else { "" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_reverse_cutoff() {
        let cli = Cli::try_parse_from(["ls-cli", "run", "--cutoff", "-0.4", "--cold"]).unwrap();
        match cli.command {
            Commands::Run { cutoff, cold, .. } => {
                assert_eq!(cutoff, -0.4);
                assert!(cold);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn presets_are_valid() {
        for preset in [Preset::MixedTraffic, Preset::SaturatedTank, Preset::GearedLogger] {
            preset.params().validate().unwrap();
        }
    }

    #[test]
    fn csv_row_has_one_value_per_column() {
        let plant = SteamPowerPlant::new(SteamParams::saturated_tank(), StartProfile::Hot).unwrap();
        let row = csv_row(0.0, plant.outputs());
        assert_eq!(row.trim_end().split(',').count(), 11);
    }
}
