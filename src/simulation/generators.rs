use std::f64::consts::FRAC_PI_2;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::CircleConfig;
use crate::error::{Error, Result};
use crate::geometry::{Pose2D, RelativePose, Trajectory};

/// Poses sampled on a circle centred at the origin.
///
/// Sample `k` sits at angle `theta_k = k * sweep / (n - 1)` and uses that angle
/// as its heading, so a full sweep produces headings running from 0 to 2pi.
pub fn circle(config: &CircleConfig) -> Result<Trajectory> {
    let n = config.num_poses;
    if n < 2 {
        return Err(Error::InvalidConfig(format!(
            "a circle needs at least 2 poses, got {n}"
        )));
    }
    let step = config.sweep / (n - 1) as f64;
    let poses = (0..n)
        .map(|k| {
            let theta = k as f64 * step;
            Pose2D::new(
                config.radius * theta.cos(),
                config.radius * theta.sin(),
                theta,
            )
        })
        .collect();
    Trajectory::new(poses)
}

/// Odometry of the square loop scenario, one move per edge of the figure.
///
/// ```text
/// *(5)----*(4)----*(3)
/// |                 |
/// *(0)----*(1)----*(2)
/// |
/// *(6)
/// ```
pub fn square_odometry() -> Vec<RelativePose> {
    vec![
        RelativePose::new(2.0, 0.0, 0.0),
        RelativePose::new(2.0, 0.0, FRAC_PI_2),
        RelativePose::new(2.0, 0.0, FRAC_PI_2),
        RelativePose::new(2.0, 0.0, 0.0),
        RelativePose::new(2.0, 0.0, 0.0),
        RelativePose::new(0.0, 3.0, FRAC_PI_2),
        RelativePose::new(0.0, 2.0, FRAC_PI_2),
    ]
}

/// Ground truth of the square loop starting at the origin.
pub fn square() -> Result<Trajectory> {
    Trajectory::from_relative(Pose2D::default(), &square_odometry())
}

/// Hand-picked initial guesses for the square loop, deliberately off the
/// ground truth.
pub fn square_initial_guess() -> Vec<Pose2D> {
    use std::f64::consts::PI;
    vec![
        Pose2D::new(0.5, 0.0, 0.2),
        Pose2D::new(2.3, 0.1, -0.2),
        Pose2D::new(4.1, 0.1, FRAC_PI_2),
        Pose2D::new(4.0, 2.0, PI),
        Pose2D::new(2.1, 2.1, PI),
        Pose2D::new(0.0, 2.1, PI),
        Pose2D::new(0.0, 1.5, -3.0 * FRAC_PI_2),
        Pose2D::new(2.5, 0.5, 0.0),
    ]
}

/// Copy of `trajectory` with independent `N(0, scale^2)` noise added to every
/// coordinate, heading included.
pub fn perturb<R: Rng + ?Sized>(
    trajectory: &Trajectory,
    scale: f64,
    rng: &mut R,
) -> Result<Trajectory> {
    // Normal::new mirrors a negative std dev instead of rejecting it
    if !(scale.is_finite() && scale >= 0.0) {
        return Err(Error::InvalidConfig(format!(
            "perturbation scale must be finite and non-negative, got {scale}"
        )));
    }
    let normal = Normal::new(0.0, scale)
        .map_err(|e| Error::InvalidConfig(format!("perturbation scale {scale}: {e}")))?;
    let poses = trajectory
        .iter()
        .map(|pose| {
            Pose2D::new(
                pose.x + normal.sample(rng),
                pose.y + normal.sample(rng),
                pose.heading + normal.sample(rng),
            )
        })
        .collect();
    Trajectory::new(poses)
}
