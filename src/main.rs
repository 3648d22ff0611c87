use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use plotters::style::{BLUE, RED};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cvm::config::SimulationConfig;
use cvm::data;
use cvm::geometry::{extract, HeadingWrap};
use cvm::mapping::g2o;
use cvm::simulation::{
    circle_scenario, imu, square_scenario, stochastic, PoseGraphScenario, StationaryImu,
    StochasticProcess,
};
use cvm::utils::plot::{plot_imu, plot_trajectories, TrajectorySeries};

#[derive(Parser)]
#[command(name = "cvm")]
#[command(about = "Pose-graph and IMU noise simulations")]
struct Args {
    /// TOML configuration, defaults are used for anything missing
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory receiving figures and g2o files
    #[arg(short, long, global = true, default_value = "img")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Square loop pose graph with hand-picked initial guesses
    Square,
    /// Circle pose graph initialized from a noisy copy of the ground truth
    Circle {
        /// Overrides the perturbation seed of the configuration
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Stationary IMU readings with constant bias and white noise
    Imu,
    /// Odometry of a trajectory CSV (columns x,y,heading)
    Extract {
        input: PathBuf,
        /// Output CSV, stdout when absent
        #[arg(long)]
        output: Option<PathBuf>,
        /// Wrap heading differences into (-pi, pi]
        #[arg(long)]
        normalize: bool,
    },
    /// Reads a g2o pose graph back and reports its size and chi2
    Inspect { input: PathBuf },
    /// White noise process and its sample statistics
    Noise {
        #[arg(long, default_value = "1000")]
        len: usize,
        #[arg(long, default_value = "42")]
        seed: u64,
        #[arg(long, default_value = "10")]
        window: usize,
    },
}

fn pose_graph(scenario: &PoseGraphScenario, output_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("\n Factor graph : \n{}", scenario.graph);
    log::info!(
        "{}: initial chi2 = {:.5}",
        scenario.name,
        scenario.chi2()?
    );

    let g2o_path = output_dir.join(format!("{}.g2o", scenario.name));
    g2o::write_g2o_file(&scenario.graph, &g2o_path)?;

    plot_trajectories(
        &output_dir.join(format!("{}.png", scenario.name)),
        &format!("{} pose graph", scenario.name),
        &[
            TrajectorySeries {
                label: "ground truth",
                poses: &scenario.ground_truth,
                color: BLUE,
            },
            TrajectorySeries {
                label: "initial estimate",
                poses: &scenario.initial,
                color: RED,
            },
        ],
    )?;
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    std::fs::create_dir_all(&args.output_dir)?;

    match args.command {
        Command::Square => {
            let scenario = square_scenario(&config)?;
            pose_graph(&scenario, &args.output_dir)?;
        }
        Command::Circle { seed } => {
            let seed = seed.unwrap_or(config.perturbation.seed);
            let mut rng = StdRng::seed_from_u64(seed);
            let scenario = circle_scenario(&config, &mut rng)?;
            pose_graph(&scenario, &args.output_dir)?;
        }
        Command::Imu => {
            let sensor = StationaryImu::from_config(&config.imu)?;
            let mut rng = StdRng::seed_from_u64(config.imu.seed);
            let noise = sensor.noise();
            log::info!(
                "noise densities gyro {} accel {} integration {}",
                noise.gyro_sigma,
                noise.accel_sigma,
                noise.integration_sigma
            );
            let samples = sensor.simulate(config.imu.duration, &mut rng);
            let ([gyro_mean, gyro_std], [accel_mean, accel_std]) = imu::summarize(&samples);
            log::info!("gyro mean {:?} std {:?}", gyro_mean.as_slice(), gyro_std.as_slice());
            log::info!("accel mean {:?} std {:?}", accel_mean.as_slice(), accel_std.as_slice());
            plot_imu(&args.output_dir.join("imu.png"), &samples)?;
        }
        Command::Extract {
            input,
            output,
            normalize,
        } => {
            let wrap = if normalize {
                HeadingWrap::Normalized
            } else {
                config.wrap
            };
            let trajectory = data::read_trajectory_file(&input)?;
            let odometry = extract(&trajectory, wrap)?;
            match output {
                Some(path) => data::write_odometry_file(&odometry, &path)?,
                None => data::write_odometry(&odometry, std::io::stdout().lock())?,
            }
        }
        Command::Inspect { input } => {
            let graph = g2o::read_g2o_file(&input)?;
            println!(
                "{}: {} nodes, {} edges, chi2 = {:.5}",
                input.display(),
                graph.num_nodes(),
                graph.edges().len(),
                graph.chi2()?
            );
        }
        Command::Noise { len, seed, window } => {
            let x = StochasticProcess::new(len)?.seeded(seed).generate();
            println!("mean      : {:.5}", stochastic::mean(&x));
            println!("variance  : {:.5}", stochastic::variance(&x));
            println!("power     : {:.5}", stochastic::output_power(&x));
            let moving = stochastic::moving_std(&x, window);
            println!("moving std: {:.5} (last window of {window})", moving[moving.len() - 1]);
            let r = stochastic::auto_correlation(&x, 5);
            println!("autocorr  : {:?}", r.as_slice());
            let psd = stochastic::power_spectral_density(&x);
            println!("mean psd  : {:.5} over {} bins", stochastic::mean(&psd), psd.len());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
