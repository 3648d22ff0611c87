//! Measurements of an IMU resting level on the ground.
//!
//! The body frame coincides with a z-up navigation frame, so the true angular
//! velocity is zero and the accelerometer senses the reaction to gravity,
//! `(0, 0, g)`. Biases are constant and the white noise densities are
//! discretized at the sample time (`sigma / sqrt(dt)`).

use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::ImuConfig;
use crate::error::{Error, Result};

/// Continuous-time noise densities of the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuNoise {
    pub gyro_sigma: f64,
    pub accel_sigma: f64,
    /// Integration uncertainty used by preintegration, carried for the
    /// downstream consumer only.
    pub integration_sigma: f64,
}

impl ImuNoise {
    pub fn validate(&self) -> Result<()> {
        let sigmas = [
            ("gyro", self.gyro_sigma),
            ("accel", self.accel_sigma),
            ("integration", self.integration_sigma),
        ];
        for (name, sigma) in sigmas {
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} sigma must be finite and non-negative, got {sigma}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuBias {
    pub accel: Vector3<f64>,
    pub gyro: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    pub t: f64,
    pub gyro: Vector3<f64>,
    pub accel: Vector3<f64>,
}

pub struct StationaryImu {
    noise: ImuNoise,
    bias: ImuBias,
    gravity: f64,
    sample_time: f64,
    gyro_noise: Normal<f64>,
    accel_noise: Normal<f64>,
}

impl StationaryImu {
    pub fn new(noise: ImuNoise, bias: ImuBias, gravity: f64, sample_time: f64) -> Result<Self> {
        if !(sample_time.is_finite() && sample_time > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "IMU sample time must be positive, got {sample_time}"
            )));
        }
        noise.validate()?;
        let sqrt_dt = sample_time.sqrt();
        let gyro_noise = Normal::new(0.0, noise.gyro_sigma / sqrt_dt)
            .map_err(|e| Error::InvalidConfig(format!("gyro sigma: {e}")))?;
        let accel_noise = Normal::new(0.0, noise.accel_sigma / sqrt_dt)
            .map_err(|e| Error::InvalidConfig(format!("accel sigma: {e}")))?;
        Ok(StationaryImu {
            noise,
            bias,
            gravity,
            sample_time,
            gyro_noise,
            accel_noise,
        })
    }

    pub fn from_config(config: &ImuConfig) -> Result<Self> {
        let noise = ImuNoise {
            gyro_sigma: config.gyro_sigma,
            accel_sigma: config.accel_sigma,
            integration_sigma: config.integration_sigma,
        };
        let bias = ImuBias {
            accel: config.accel_bias(),
            gyro: config.gyro_bias(),
        };
        StationaryImu::new(noise, bias, config.gravity, config.sample_time)
    }

    pub fn noise(&self) -> &ImuNoise {
        &self.noise
    }

    pub fn actual_angular_velocity(&self) -> Vector3<f64> {
        Vector3::zeros()
    }

    /// Specific force in the body frame, gravity vector is `(0, 0, -g)`.
    pub fn actual_specific_force(&self) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, self.gravity)
    }

    pub fn measured_angular_velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f64> {
        self.actual_angular_velocity() + self.bias.gyro + sample3(&self.gyro_noise, rng)
    }

    pub fn measured_specific_force<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3<f64> {
        self.actual_specific_force() + self.bias.accel + sample3(&self.accel_noise, rng)
    }

    /// One sample every `sample_time` over `[0, duration]`.
    pub fn simulate<R: Rng + ?Sized>(&self, duration: f64, rng: &mut R) -> Vec<ImuSample> {
        let steps = (duration / self.sample_time).round() as usize;
        let samples: Vec<ImuSample> = (0..=steps)
            .map(|k| ImuSample {
                t: k as f64 * self.sample_time,
                gyro: self.measured_angular_velocity(rng),
                accel: self.measured_specific_force(rng),
            })
            .collect();
        log::debug!(
            "simulated {} stationary IMU samples over {duration} s",
            samples.len()
        );
        samples
    }
}

fn sample3<R: Rng + ?Sized>(normal: &Normal<f64>, rng: &mut R) -> Vector3<f64> {
    Vector3::new(normal.sample(rng), normal.sample(rng), normal.sample(rng))
}

/// Per-axis sample mean and standard deviation of gyro and accel readings.
pub fn summarize(samples: &[ImuSample]) -> ([Vector3<f64>; 2], [Vector3<f64>; 2]) {
    let n = samples.len().max(1) as f64;
    let gyro_mean = samples.iter().map(|s| s.gyro).sum::<Vector3<f64>>() / n;
    let accel_mean = samples.iter().map(|s| s.accel).sum::<Vector3<f64>>() / n;
    let gyro_var = samples
        .iter()
        .map(|s| (s.gyro - gyro_mean).component_mul(&(s.gyro - gyro_mean)))
        .sum::<Vector3<f64>>()
        / n;
    let accel_var = samples
        .iter()
        .map(|s| (s.accel - accel_mean).component_mul(&(s.accel - accel_mean)))
        .sum::<Vector3<f64>>()
        / n;
    (
        [gyro_mean, gyro_var.map(f64::sqrt)],
        [accel_mean, accel_var.map(f64::sqrt)],
    )
}
