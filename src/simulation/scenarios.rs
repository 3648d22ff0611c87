use rand::Rng;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::geometry::{Pose2D, Trajectory};
use crate::mapping::PoseGraph;
use crate::simulation::generators;

/// A pose graph together with the trajectories it was built from.
#[derive(Debug, Clone)]
pub struct PoseGraphScenario {
    pub name: &'static str,
    pub ground_truth: Trajectory,
    pub initial: Vec<Pose2D>,
    pub graph: PoseGraph,
}

impl PoseGraphScenario {
    pub fn chi2(&self) -> Result<f64> {
        self.graph.chi2()
    }
}

/// Square loop with odometry given directly and hand-picked initial guesses.
pub fn square_scenario(config: &SimulationConfig) -> Result<PoseGraphScenario> {
    let ground_truth = generators::square()?;
    let initial = generators::square_initial_guess();
    let graph = PoseGraph::from_odometry(
        Pose2D::default(),
        &generators::square_odometry(),
        &initial,
        &config.noise,
    )?;
    Ok(PoseGraphScenario {
        name: "square",
        ground_truth,
        initial,
        graph,
    })
}

/// Circle sampled from its parametric curve; the initial estimate is the
/// ground truth perturbed by Gaussian noise and the prior pins the first
/// position with a zero heading.
pub fn circle_scenario<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<PoseGraphScenario> {
    let ground_truth = generators::circle(&config.circle)?;
    let noisy = generators::perturb(&ground_truth, config.perturbation.scale, rng)?;
    let first = ground_truth.first();
    let prior = Pose2D::new(first.x, first.y, 0.0);
    let graph = PoseGraph::build(&ground_truth, prior, &noisy, &config.noise, config.wrap)?;
    let initial = graph.initial_values().into_iter().map(|(_, p)| p).collect();
    Ok(PoseGraphScenario {
        name: "circle",
        ground_truth,
        initial,
        graph,
    })
}
