use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use orrery::{
    ForceAccumulator, PairwiseSum, SampleExchange, Simulation,
    constants::{AU, SEC_PER_DAY},
    format_elapsed,
    presets::{self, Scenario},
    run_sim_loop,
};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(about = "Newtonian N-body integrator for small planetary systems")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    List,

    /// Run a preset to its horizon and print the validation report
    Run {
        #[arg(short, long, default_value = "solar-system")]
        preset: String,

        /// Override the preset's step, in seconds
        #[arg(long)]
        time_step: Option<f64>,

        /// Override the preset's horizon, in days
        #[arg(long)]
        horizon_days: Option<f64>,

        /// Compute each pair once instead of every ordered pair
        #[arg(long, default_value = "false")]
        pairwise: bool,
    },

    /// Run a preset indefinitely on a worker thread and sample it periodically
    Watch {
        #[arg(short, long, default_value = "solar-system")]
        preset: String,

        #[arg(long, default_value = "10")]
        samples: usize,

        #[arg(long, default_value = "200")]
        interval_ms: u64,
    },
}

fn load(
    name: &str,
    time_step: Option<f64>,
    horizon_days: Option<f64>,
) -> anyhow::Result<Scenario> {
    let mut scenario =
        presets::by_name(name).with_context(|| format!("loading preset '{name}'"))?;
    if let Some(dt) = time_step {
        scenario.parameters = scenario.parameters.with_time_step(dt);
    }
    if let Some(days) = horizon_days {
        scenario.parameters = scenario.parameters.with_time_horizon(days * SEC_PER_DAY);
    }
    Ok(scenario)
}

fn run<F: ForceAccumulator + Send>(mut sim: Simulation<F>) -> anyhow::Result<()> {
    let initial_energy = sim.total_energy();
    let initial_momentum = sim.total_momentum();

    let report = sim.run_to_horizon().context("simulation aborted")?;

    let drift = (sim.total_energy() - initial_energy) / initial_energy.abs();
    info!("Relative energy drift: {drift:.3e}");
    info!(
        "Momentum drift: {:?} kg m/s",
        sim.total_momentum() - initial_momentum
    );
    println!("{report}");
    if let Some(worst) = report.max_deviation() {
        println!(
            "Largest deviation: {} at {:.4}%",
            worst.name, worst.deviation_percent
        );
    }
    Ok(())
}

fn watch(scenario: Scenario, samples: usize, interval: Duration) -> anyhow::Result<()> {
    let names: Vec<String> = scenario.bodies.iter().map(|b| b.name().to_owned()).collect();
    let delta = scenario.parameters.time_step;
    let sim = Simulation::new(scenario.bodies, scenario.parameters)?;

    let exchange = Arc::new(SampleExchange::new(sim.bodies()));
    let token = Arc::new(AtomicBool::new(false));

    let handle = {
        let exchange = exchange.clone();
        let token = token.clone();
        std::thread::spawn(move || run_sim_loop(sim, &exchange, &token))
    };

    let mut batch = Vec::with_capacity(names.len());
    for _ in 0..samples {
        std::thread::sleep(interval);
        let tick = exchange.sample(&mut batch);
        info!("step {} ({})", tick, format_elapsed(tick as f64 * delta));
        for (name, s) in names.iter().zip(&batch) {
            info!(
                "  {:<10} r = ({:>9.4}, {:>9.4}, {:>9.4}) AU",
                name,
                s.pos.x / AU,
                s.pos.y / AU,
                s.pos.z / AU
            );
        }
    }

    token.store(true, Ordering::Relaxed);
    let sim = handle
        .join()
        .map_err(|_| anyhow::anyhow!("simulation thread panicked"))??;
    info!("Stopped at {}", sim.clock());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List => {
            for name in presets::PRESETS {
                println!("{name}");
            }
        }
        Commands::Run {
            preset,
            time_step,
            horizon_days,
            pairwise,
        } => {
            let scenario = load(&preset, time_step, horizon_days)?;
            info!(
                "Running '{}' with {} bodies, dt = {} s, horizon = {} days",
                scenario.name,
                scenario.bodies.len(),
                scenario.parameters.time_step,
                scenario.parameters.time_horizon / SEC_PER_DAY
            );
            if pairwise {
                run(Simulation::with_accumulator(
                    scenario.bodies,
                    scenario.parameters,
                    PairwiseSum,
                )?)?;
            } else {
                run(Simulation::new(scenario.bodies, scenario.parameters)?)?;
            }
        }
        Commands::Watch {
            preset,
            samples,
            interval_ms,
        } => {
            let scenario = load(&preset, None, None)?;
            watch(scenario, samples, Duration::from_millis(interval_ms))?;
        }
    }
    Ok(())
}
