pub mod generators;
pub mod imu;
pub mod scenarios;
pub mod stochastic;

pub use imu::{ImuBias, ImuNoise, ImuSample, StationaryImu};
pub use scenarios::{circle_scenario, square_scenario, PoseGraphScenario};
pub use stochastic::{BaseDistribution, StochasticProcess};
