use nalgebra::{Isometry2, Rotation2, Translation2, UnitComplex, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Planar rigid-body configuration, heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

/// Transform from one pose to the next, expressed in the frame of the first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelativePose {
    pub dx: f64,
    pub dy: f64,
    pub dtheta: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, heading: f64) -> Pose2D {
        Pose2D { x, y, heading }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_finite()
    }

    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Apply a relative motion given in the local frame of `self`.
    ///
    /// The heading is accumulated without wrapping so that composing and then
    /// extracting with raw headings is lossless.
    pub fn compose(&self, step: &RelativePose) -> Pose2D {
        let world = Rotation2::new(self.heading) * Vector2::new(step.dx, step.dy);
        Pose2D {
            x: self.x + world.x,
            y: self.y + world.y,
            heading: self.heading + step.dtheta,
        }
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::from_parts(
            Translation2::new(self.x, self.y),
            UnitComplex::from_angle(self.heading),
        )
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.heading)
    }
}

impl From<Isometry2<f64>> for Pose2D {
    fn from(iso: Isometry2<f64>) -> Self {
        Pose2D::new(iso.translation.x, iso.translation.y, iso.rotation.angle())
    }
}

impl RelativePose {
    pub fn new(dx: f64, dy: f64, dtheta: f64) -> RelativePose {
        RelativePose { dx, dy, dtheta }
    }

    pub fn identity() -> RelativePose {
        RelativePose::default()
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.dtheta.is_finite()
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::from_parts(
            Translation2::new(self.dx, self.dy),
            UnitComplex::from_angle(self.dtheta),
        )
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.dx, self.dy, self.dtheta)
    }
}

impl From<Isometry2<f64>> for RelativePose {
    fn from(iso: Isometry2<f64>) -> Self {
        RelativePose::new(iso.translation.x, iso.translation.y, iso.rotation.angle())
    }
}
