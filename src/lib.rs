//! Simulation toolkit for covariance modeling: planar pose graphs built from
//! ground-truth trajectories, stationary IMU noise scenarios and simple
//! stochastic processes.
//!
//! The central computation is [`geometry::extract`], which turns an absolute
//! trajectory into odometry expressed in the frame of each earlier pose.
//! Optimizing the resulting [`mapping::PoseGraph`] is left to an external
//! solver, reached through the g2o text format.

pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod simulation;
pub mod utils;

pub use error::{Error, Result};
