//! Simulation configuration.
//!
//! Every scenario reads its noise models and sizes from a [`SimulationConfig`]
//! handed in by the caller. Missing sections in a TOML file fall back to the
//! defaults below, which reproduce the reference scenarios.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::HeadingWrap;
use crate::utils::deg2rad;

/// Standard deviations of the Gaussian noise models of a pose graph,
/// ordered `[x, y, heading]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub odometry_sigmas: [f64; 3],
    pub prior_sigmas: [f64; 3],
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            odometry_sigmas: [0.02, 0.02, 0.01],
            prior_sigmas: [0.01, 0.01, 0.01],
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<()> {
        check_sigmas("odometry_sigmas", &self.odometry_sigmas)?;
        check_sigmas("prior_sigmas", &self.prior_sigmas)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleConfig {
    pub num_poses: usize,
    pub radius: f64,
    /// Angle swept by the samples, in radians.
    pub sweep: f64,
}

impl Default for CircleConfig {
    fn default() -> Self {
        CircleConfig {
            num_poses: 11,
            radius: 1.0,
            sweep: std::f64::consts::TAU,
        }
    }
}

/// Perturbation applied to ground truth to obtain an initial estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationConfig {
    pub scale: f64,
    pub seed: u64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        PerturbationConfig {
            scale: 1.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImuConfig {
    pub gravity: f64,
    pub gyro_sigma: f64,
    pub accel_sigma: f64,
    pub integration_sigma: f64,
    pub accel_bias: [f64; 3],
    pub gyro_bias: [f64; 3],
    pub sample_time: f64,
    pub duration: f64,
    pub seed: u64,
}

impl Default for ImuConfig {
    fn default() -> Self {
        ImuConfig {
            gravity: 9.81,
            gyro_sigma: deg2rad(0.5) / 60.0,
            accel_sigma: 0.1 / 60.0,
            integration_sigma: 1e-7,
            accel_bias: [0.0, 0.1, 0.1],
            gyro_bias: [0.0, 0.0, 0.0],
            sample_time: 0.01,
            duration: 10.0,
            seed: 42,
        }
    }
}

impl ImuConfig {
    pub fn accel_bias(&self) -> Vector3<f64> {
        Vector3::from(self.accel_bias)
    }

    pub fn gyro_bias(&self) -> Vector3<f64> {
        Vector3::from(self.gyro_bias)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub noise: NoiseConfig,
    pub wrap: HeadingWrap,
    pub circle: CircleConfig,
    pub perturbation: PerturbationConfig,
    pub imu: ImuConfig,
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<SimulationConfig> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<SimulationConfig> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.noise.validate()?;
        if self.circle.num_poses < 2 {
            return Err(Error::InvalidConfig(format!(
                "circle.num_poses must be at least 2, got {}",
                self.circle.num_poses
            )));
        }
        if !(self.circle.radius.is_finite() && self.circle.radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "circle.radius must be positive, got {}",
                self.circle.radius
            )));
        }
        if !(self.perturbation.scale.is_finite() && self.perturbation.scale >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "perturbation.scale must be non-negative, got {}",
                self.perturbation.scale
            )));
        }
        let imu = &self.imu;
        for (name, value) in [
            ("imu.gravity", imu.gravity),
            ("imu.sample_time", imu.sample_time),
            ("imu.duration", imu.duration),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        check_sigmas("imu sigmas", &[imu.gyro_sigma, imu.accel_sigma, imu.integration_sigma])
    }
}

fn check_sigmas(name: &str, sigmas: &[f64]) -> Result<()> {
    match sigmas.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        Some(bad) => Err(Error::InvalidConfig(format!(
            "{name} must be positive and finite, got {bad}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let config = SimulationConfig::from_toml("")?;
        assert_eq!(SimulationConfig::default(), config);
        assert_eq!([0.02, 0.02, 0.01], config.noise.odometry_sigmas);
        assert_eq!(HeadingWrap::Raw, config.wrap);
        Ok(())
    }

    #[test]
    fn partial_sections_are_merged() -> Result<()> {
        let config = SimulationConfig::from_toml(
            r#"
            wrap = "normalized"

            [noise]
            prior_sigmas = [0.1, 0.1, 0.05]

            [circle]
            num_poses = 25
            "#,
        )?;
        assert_eq!(HeadingWrap::Normalized, config.wrap);
        assert_eq!([0.1, 0.1, 0.05], config.noise.prior_sigmas);
        assert_eq!([0.02, 0.02, 0.01], config.noise.odometry_sigmas);
        assert_eq!(25, config.circle.num_poses);
        approx::assert_abs_diff_eq!(config.circle.radius, 1.0);
        Ok(())
    }

    #[test]
    fn shipped_scenario_matches_defaults() -> Result<()> {
        let config = SimulationConfig::from_toml(include_str!("../scenarios/default.toml"))?;
        let defaults = SimulationConfig::default();
        assert_eq!(defaults.noise, config.noise);
        assert_eq!(defaults.circle.num_poses, config.circle.num_poses);
        approx::assert_relative_eq!(config.circle.sweep, defaults.circle.sweep);
        approx::assert_relative_eq!(config.imu.gyro_sigma, defaults.imu.gyro_sigma);
        approx::assert_relative_eq!(config.imu.accel_sigma, defaults.imu.accel_sigma);
        assert_eq!(defaults.imu.accel_bias, config.imu.accel_bias);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad = [
            "[noise]\nodometry_sigmas = [0.0, 0.1, 0.1]",
            "[circle]\nnum_poses = 1",
            "[imu]\nsample_time = -0.01",
            "wrap = \"sometimes\"",
        ];
        for content in bad {
            assert!(SimulationConfig::from_toml(content).is_err(), "{content}");
        }
    }
}
