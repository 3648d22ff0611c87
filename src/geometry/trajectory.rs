use std::ops::Deref;

use crate::error::{Error, Result};
use crate::geometry::{extract, HeadingWrap, Pose2D, RelativePose};

/// Ordered, non-empty sequence of finite poses indexed by step.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    poses: Vec<Pose2D>,
}

impl Trajectory {
    pub fn new(poses: Vec<Pose2D>) -> Result<Trajectory> {
        if poses.is_empty() {
            return Err(Error::invalid_input(0, "a trajectory needs at least one pose"));
        }
        if let Some(index) = poses.iter().position(|pose| !pose.is_finite()) {
            return Err(Error::invalid_input(
                index,
                format!("non-finite coordinate in {:?}", poses[index]),
            ));
        }
        Ok(Trajectory { poses })
    }

    /// Forward composition of `steps` starting at `start`.
    pub fn from_relative(start: Pose2D, steps: &[RelativePose]) -> Result<Trajectory> {
        let mut poses = Vec::with_capacity(steps.len() + 1);
        poses.push(start);
        let mut current = start;
        for step in steps {
            current = current.compose(step);
            poses.push(current);
        }
        Trajectory::new(poses)
    }

    pub fn poses(&self) -> &[Pose2D] {
        &self.poses
    }

    pub fn first(&self) -> Pose2D {
        // non-empty by construction
        self.poses[0]
    }

    pub fn odometry(&self, wrap: HeadingWrap) -> Result<Vec<RelativePose>> {
        extract(&self.poses, wrap)
    }
}

impl Deref for Trajectory {
    type Target = [Pose2D];

    fn deref(&self) -> &Self::Target {
        &self.poses
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Pose2D;
    type IntoIter = std::slice::Iter<'a, Pose2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}
