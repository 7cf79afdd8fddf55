use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use structopt::StructOpt;

use traj_core::{SolverKind, StepSettings};

mod export;
mod systems;

use export::TrajectoryExport;
use systems::{SystemConfig, SystemName};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "traj",
    about = "Integrates a sample ODE system and exports its trajectory as JSON"
)]
struct CommandlineArgs {
    #[structopt(
        short = "-s",
        long = "--system",
        default_value = "lorenz",
        help = "Sample system to integrate (lorenz, aizawa, pendulum)"
    )]
    system: SystemName,
    #[structopt(long, default_value = "rk4", help = "Solver to use (euler, rk4, leapfrog)")]
    solver: SolverKind,
    #[structopt(long, default_value = "100", help = "Time horizon")]
    time: f64,
    #[structopt(long = "--dt", default_value = "0.001", help = "Fixed step size")]
    dt: f64,
    #[structopt(long, default_value = "10", help = "Export one sample per this many steps")]
    every: usize,
    #[structopt(short = "-o", long, parse(from_os_str), help = "Output file, stdout if omitted")]
    output: Option<PathBuf>,
    #[structopt(
        long,
        parse(from_os_str),
        help = "JSON file with system coefficients and initial conditions, overrides --system"
    )]
    config_file: Option<PathBuf>,
    #[structopt(
        long,
        default_value = "info",
        help = "Log filter level (off, error, warn, info, debug, trace)"
    )]
    log_level: String,
}

fn main() {
    let args = CommandlineArgs::from_args();
    if let Err(err) = initialize_logging(&args) {
        eprintln!("{:#}", err);
        std::process::exit(2);
    }

    if let Err(err) = run(&args) {
        error!("{:#}", err);
        error!("Aborting.");
        std::process::exit(1);
    }
    info!("Exiting.");
}

fn run(args: &CommandlineArgs) -> Result<()> {
    let config = match &args.config_file {
        Some(path) => {
            let config = SystemConfig::load(path)?;
            info!(
                "Loaded {} configuration from '{}'.",
                config.name(),
                path.display()
            );
            config
        }
        None => SystemConfig::preset(args.system),
    };
    let system = config.name();

    let mut integrator = config
        .build()
        .with_context(|| format!("Unable to set up system {}", system))?;
    let settings = StepSettings::new(args.time, args.dt);
    info!(
        "Integrating {} with {} (time {}, dt {}).",
        system, args.solver, settings.time, settings.step
    );

    let outcome = integrator.solve(args.solver, settings).map(|trajectory| trajectory.len());
    match outcome {
        Ok(len) => info!("Computed {} points.", len),
        Err(err) if err.is_divergence() => {
            warn!("{}. Exporting the points computed before it.", err);
            if let Some(trajectory) = integrator.trajectory() {
                TrajectoryExport::new(system, trajectory, args.every)
                    .write_to(args.output.as_deref())?;
            }
            bail!("Integration of {} diverged: {}", system, err);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Unable to integrate {} with {}", system, args.solver));
        }
    }

    if let Some(trajectory) = integrator.trajectory() {
        TrajectoryExport::new(system, trajectory, args.every).write_to(args.output.as_deref())?;
        if let Some(path) = &args.output {
            info!("Wrote trajectory to '{}'.", path.display());
        }
    }
    Ok(())
}

fn parse_log_level(level: &str) -> Result<log::LevelFilter> {
    Ok(match level.to_ascii_lowercase().as_str() {
        "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        other => bail!("Unknown log filter level '{}'", other),
    })
}

fn initialize_logging(args: &CommandlineArgs) -> Result<()> {
    let log_filter_level = parse_log_level(&args.log_level)?;

    // Logs go to stderr so the JSON on stdout stays clean.
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log_filter_level)
        .chain(std::io::stderr())
        .apply()
        .context("Unable to apply logger configuration")?;

    Ok(())
}
