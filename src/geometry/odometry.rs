use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Pose2D, RelativePose};
use crate::utils::normalize_angle;

/// How heading differences are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingWrap {
    /// `theta_{i+1} - theta_i` as is, may leave (-pi, pi] for unwrapped headings
    #[default]
    Raw,
    /// wrapped into (-pi, pi]
    Normalized,
}

impl HeadingWrap {
    pub fn apply(self, angle: f64) -> f64 {
        match self {
            HeadingWrap::Raw => angle,
            HeadingWrap::Normalized => normalize_angle(angle),
        }
    }
}

/// Odometry between consecutive poses of an absolute trajectory.
///
/// Each relative pose is expressed in the local frame of the earlier pose:
/// the world displacement is rotated by `R(theta_i)^T`. Returns one entry per
/// adjacent pair, so `poses.len() - 1` entries.
///
/// Fails when fewer than two poses are given or when a pose has a non-finite
/// coordinate, in which case the error carries the index of that pose. A pair
/// of finite poses so far apart that their difference overflows is reported
/// with the index of its earlier pose.
pub fn extract(poses: &[Pose2D], wrap: HeadingWrap) -> Result<Vec<RelativePose>> {
    if poses.len() < 2 {
        return Err(Error::invalid_input(
            poses.len(),
            format!(
                "at least 2 poses are needed to define odometry, got {}",
                poses.len()
            ),
        ));
    }
    if let Some(index) = poses.iter().position(|pose| !pose.is_finite()) {
        return Err(Error::invalid_input(
            index,
            format!("non-finite coordinate in {:?}", poses[index]),
        ));
    }

    poses
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let (from, to) = (&pair[0], &pair[1]);
            let delta_global = Vector2::new(to.x - from.x, to.y - from.y);
            let delta_local = Rotation2::new(from.heading).transpose() * delta_global;
            let step = RelativePose::new(
                delta_local.x,
                delta_local.y,
                wrap.apply(to.heading - from.heading),
            );
            if step.is_finite() {
                Ok(step)
            } else {
                Err(Error::invalid_input(
                    index,
                    format!("displacement to pose {} overflows: {step:?}", index + 1),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::error::Error as StdError;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn assert_relative_eq(expected: &RelativePose, actual: &RelativePose) {
        approx::assert_abs_diff_eq!(expected.to_vector(), actual.to_vector(), epsilon = 1e-9);
    }

    #[test]
    fn count_is_length_minus_one() -> Result<()> {
        for n in 2..20 {
            let poses: Vec<Pose2D> = (0..n)
                .map(|i| Pose2D::new(i as f64, (i * i) as f64, 0.1 * i as f64))
                .collect();
            assert_eq!(n - 1, extract(&poses, HeadingWrap::Raw)?.len());
        }
        Ok(())
    }

    #[test]
    fn identical_poses_give_zero_motion() -> Result<()> {
        let poses = vec![Pose2D::new(1.5, -2.0, 0.7); 5];
        for wrap in [HeadingWrap::Raw, HeadingWrap::Normalized] {
            for odom in extract(&poses, wrap)? {
                assert_eq!(RelativePose::identity(), odom);
            }
        }
        Ok(())
    }

    #[test]
    fn recovers_composed_steps() -> std::result::Result<(), Box<dyn StdError>> {
        let mut rng = StdRng::seed_from_u64(7);
        let steps: Vec<RelativePose> = (0..50)
            .map(|_| {
                RelativePose::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-PI..PI),
                )
            })
            .collect();
        let mut poses = vec![Pose2D::new(0.3, -0.2, 1.1)];
        for step in &steps {
            let last = *poses.last().ok_or("empty")?;
            poses.push(last.compose(step));
        }

        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_eq!(steps.len(), odometry.len());
        for (expected, actual) in steps.iter().zip(odometry.iter()) {
            assert_relative_eq(expected, actual);
        }
        // steps are already in (-pi, pi) so normalizing changes nothing
        let normalized = extract(&poses, HeadingWrap::Normalized)?;
        for (expected, actual) in steps.iter().zip(normalized.iter()) {
            assert_relative_eq(expected, actual);
        }
        Ok(())
    }

    #[test]
    fn rotation_only() -> Result<()> {
        let poses = [Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(0.0, 0.0, FRAC_PI_2)];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_eq!(1, odometry.len());
        assert_relative_eq(&RelativePose::new(0.0, 0.0, FRAC_PI_2), &odometry[0]);
        Ok(())
    }

    #[test]
    fn translation_along_local_x() -> Result<()> {
        let poses = [Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(2.0, 0.0, 0.0)];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_relative_eq(&RelativePose::new(2.0, 0.0, 0.0), &odometry[0]);

        // turn in place, then drive along the new local x-axis (world +y)
        let poses = [
            Pose2D::new(2.0, 0.0, 0.0),
            Pose2D::new(2.0, 0.0, FRAC_PI_2),
            Pose2D::new(2.0, 2.0, FRAC_PI_2),
        ];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_relative_eq(&RelativePose::new(0.0, 0.0, FRAC_PI_2), &odometry[0]);
        assert_relative_eq(&RelativePose::new(2.0, 0.0, 0.0), &odometry[1]);
        Ok(())
    }

    #[test]
    fn world_displacement_is_rotated_into_local_frame() -> Result<()> {
        // facing -x, a world step of -1 in x is forward motion
        let poses = [Pose2D::new(0.0, 0.0, PI), Pose2D::new(-1.0, 0.0, PI)];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_relative_eq(&RelativePose::new(1.0, 0.0, 0.0), &odometry[0]);

        // facing +y, a world step of +1 in x is to the right
        let poses = [Pose2D::new(0.0, 0.0, FRAC_PI_2), Pose2D::new(1.0, 0.0, FRAC_PI_2)];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        assert_relative_eq(&RelativePose::new(0.0, -1.0, 0.0), &odometry[0]);
        Ok(())
    }

    #[test]
    fn two_poses_give_one_step() -> Result<()> {
        let poses = [Pose2D::new(1.0, 1.0, 0.0), Pose2D::new(3.0, 4.0, 0.5)];
        assert_eq!(1, extract(&poses, HeadingWrap::Normalized)?.len());
        Ok(())
    }

    #[test]
    fn too_short_is_rejected() {
        for poses in [vec![], vec![Pose2D::default()]] {
            match extract(&poses, HeadingWrap::Raw) {
                Err(Error::InvalidInput { index, .. }) => assert_eq!(poses.len(), index),
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_finite_is_rejected_with_index() {
        for bad in 0..4 {
            let mut poses: Vec<Pose2D> = (0..4).map(|i| Pose2D::new(i as f64, 0.0, 0.0)).collect();
            match bad % 3 {
                0 => poses[bad].x = f64::NAN,
                1 => poses[bad].y = f64::NAN,
                _ => poses[bad].heading = f64::INFINITY,
            }
            match extract(&poses, HeadingWrap::Raw) {
                Err(Error::InvalidInput { index, .. }) => assert_eq!(bad, index),
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn overflowing_displacement_is_rejected() {
        let poses = [
            Pose2D::new(0.0, 0.0, 0.0),
            Pose2D::new(-1e308, 0.0, 0.0),
            Pose2D::new(1e308, 0.0, 0.0),
        ];
        match extract(&poses, HeadingWrap::Raw) {
            Err(Error::InvalidInput { index, .. }) => assert_eq!(1, index),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn matches_relative_isometry() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let poses: Vec<Pose2D> = (0..30)
            .map(|_| {
                Pose2D::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-PI..PI),
                )
            })
            .collect();
        let odometry = extract(&poses, HeadingWrap::Normalized)?;
        for (pair, actual) in poses.windows(2).zip(odometry.iter()) {
            let expected =
                RelativePose::from(pair[0].to_isometry().inverse() * pair[1].to_isometry());
            assert_relative_eq(&expected, actual);
        }
        Ok(())
    }

    #[test]
    fn full_revolution_wrap_modes() -> Result<()> {
        // headings recorded in (-pi, pi]: the step from 3pi/4 to -3pi/4 crosses the seam
        let poses = [
            Pose2D::new(0.0, 0.0, 3.0 * PI / 4.0),
            Pose2D::new(0.0, 0.0, -3.0 * PI / 4.0),
        ];
        let raw = extract(&poses, HeadingWrap::Raw)?;
        approx::assert_abs_diff_eq!(raw[0].dtheta, -3.0 * PI / 2.0, epsilon = 1e-12);
        let normalized = extract(&poses, HeadingWrap::Normalized)?;
        approx::assert_abs_diff_eq!(normalized[0].dtheta, FRAC_PI_2, epsilon = 1e-12);

        // unwrapped headings running past 2pi keep raw deltas small either way
        let poses: Vec<Pose2D> = (0..=8)
            .map(|i| Pose2D::new(0.0, 0.0, i as f64 * TAU / 8.0 + 1.0))
            .collect();
        for wrap in [HeadingWrap::Raw, HeadingWrap::Normalized] {
            for odom in extract(&poses, wrap)? {
                approx::assert_abs_diff_eq!(odom.dtheta, TAU / 8.0, epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn input_is_untouched() -> Result<()> {
        let poses = vec![Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(1.0, 2.0, 3.0)];
        let copy = poses.clone();
        let _ = extract(&poses, HeadingWrap::Normalized)?;
        assert_eq!(copy, poses);
        Ok(())
    }
}
