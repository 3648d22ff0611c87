use std::fmt;

use nalgebra::{Isometry2, Matrix3, Vector3};
use rustc_hash::FxHashMap;

use crate::config::NoiseConfig;
use crate::error::{Error, Result};
use crate::geometry::{extract, HeadingWrap, Pose2D, RelativePose};

/// Absolute measurement anchoring one pose.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePriorSE2 {
    pub key: u32,
    pub measurement: Pose2D,
    pub information: Matrix3<f64>,
}

/// Relative measurement between two poses, in the frame of `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSE2 {
    pub from: u32,
    pub to: u32,
    pub measurement: RelativePose,
    pub information: Matrix3<f64>,
}

impl EdgePriorSE2 {
    pub fn new(key: u32, measurement: Pose2D, information: Matrix3<f64>) -> EdgePriorSE2 {
        EdgePriorSE2 {
            key,
            measurement,
            information,
        }
    }
}

impl EdgeSE2 {
    pub fn new(
        from: u32,
        to: u32,
        measurement: RelativePose,
        information: Matrix3<f64>,
    ) -> EdgeSE2 {
        EdgeSE2 {
            from,
            to,
            measurement,
            information,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edge {
    Prior(EdgePriorSE2),
    SE2(EdgeSE2),
}

/// `diag(1 / sigma^2)`
pub fn information_from_sigmas(sigmas: &[f64; 3]) -> Matrix3<f64> {
    Matrix3::from_diagonal(&Vector3::from(*sigmas).map(|s| 1.0 / (s * s)))
}

/// Factor graph of planar poses ready to be handed to an optimizer: a set of
/// prior and between edges plus an initial value per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseGraph {
    edges: Vec<Edge>,
    initial: FxHashMap<u32, Pose2D>,
}

impl PoseGraph {
    pub fn new() -> PoseGraph {
        PoseGraph::default()
    }

    /// Graph of a ground-truth trajectory: a prior on key 0, one between edge
    /// per consecutive pair (odometry extracted in the frame of the earlier
    /// pose) and `initial[k]` as the starting value of key `k`.
    ///
    /// `wrap` is applied both to the odometry headings and to the initial
    /// headings.
    pub fn build(
        trajectory: &[Pose2D],
        prior: Pose2D,
        initial: &[Pose2D],
        noise: &NoiseConfig,
        wrap: HeadingWrap,
    ) -> Result<PoseGraph> {
        let odometry = extract(trajectory, wrap)?;
        if initial.len() != trajectory.len() {
            return Err(Error::invalid_input(
                initial.len().min(trajectory.len()),
                format!(
                    "{} initial values for a trajectory of {} poses",
                    initial.len(),
                    trajectory.len()
                ),
            ));
        }
        let initial: Vec<Pose2D> = initial
            .iter()
            .map(|pose| Pose2D::new(pose.x, pose.y, wrap.apply(pose.heading)))
            .collect();
        PoseGraph::from_odometry(prior, &odometry, &initial, noise)
    }

    /// Graph of a chain whose odometry is known directly.
    pub fn from_odometry(
        prior: Pose2D,
        odometry: &[RelativePose],
        initial: &[Pose2D],
        noise: &NoiseConfig,
    ) -> Result<PoseGraph> {
        noise.validate()?;
        if initial.len() != odometry.len() + 1 {
            return Err(Error::invalid_input(
                initial.len(),
                format!(
                    "{} initial values for {} odometry steps",
                    initial.len(),
                    odometry.len()
                ),
            ));
        }
        if let Some(index) = initial.iter().position(|pose| !pose.is_finite()) {
            return Err(Error::invalid_input(index, "non-finite initial value"));
        }
        if !prior.is_finite() {
            return Err(Error::invalid_input(0, format!("non-finite prior {prior:?}")));
        }
        if let Some(index) = odometry.iter().position(|step| !step.is_finite()) {
            return Err(Error::invalid_input(
                index,
                format!("non-finite odometry {:?}", odometry[index]),
            ));
        }

        let mut graph = PoseGraph::new();
        graph.add_prior(0, prior, information_from_sigmas(&noise.prior_sigmas));
        let odometry_information = information_from_sigmas(&noise.odometry_sigmas);
        for (i, odom) in odometry.iter().enumerate() {
            let from = i as u32;
            graph.add_between(from, from + 1, *odom, odometry_information);
        }
        for (key, pose) in initial.iter().enumerate() {
            graph.insert(key as u32, *pose);
        }
        graph.validate()?;
        log::info!(
            "built pose graph with {} nodes and {} edges",
            graph.initial.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    pub fn add_prior(&mut self, key: u32, measurement: Pose2D, information: Matrix3<f64>) {
        self.edges
            .push(Edge::Prior(EdgePriorSE2::new(key, measurement, information)));
    }

    pub fn add_between(
        &mut self,
        from: u32,
        to: u32,
        measurement: RelativePose,
        information: Matrix3<f64>,
    ) {
        self.edges
            .push(Edge::SE2(EdgeSE2::new(from, to, measurement, information)));
    }

    /// Set the initial value of `key`, returning the previous one.
    pub fn insert(&mut self, key: u32, pose: Pose2D) -> Option<Pose2D> {
        self.initial.insert(key, pose)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn initial(&self, key: u32) -> Option<&Pose2D> {
        self.initial.get(&key)
    }

    /// Keys with an initial value, ascending.
    pub fn keys(&self) -> Vec<u32> {
        let mut keys: Vec<u32> = self.initial.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Initial values ordered by key.
    pub fn initial_values(&self) -> Vec<(u32, Pose2D)> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.initial.get(&key).map(|pose| (key, *pose)))
            .collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.initial.len()
    }

    /// Every edge must reference keys that have an initial value.
    pub fn validate(&self) -> Result<()> {
        for edge in &self.edges {
            match edge {
                Edge::Prior(edge) => {
                    self.node(edge.key)?;
                }
                Edge::SE2(edge) => {
                    self.node(edge.from)?;
                    self.node(edge.to)?;
                }
            }
        }
        Ok(())
    }

    fn node(&self, key: u32) -> Result<Isometry2<f64>> {
        self.initial
            .get(&key)
            .map(Pose2D::to_isometry)
            .ok_or(Error::MissingKey(key))
    }

    /// Sum of `e^T * omega * e` over all edges, evaluated at the initial values.
    pub fn chi2(&self) -> Result<f64> {
        self.edges
            .iter()
            .map(|edge| -> Result<f64> {
                let (e, omega) = match edge {
                    Edge::Prior(edge) => {
                        let x = self.node(edge.key)?;
                        let z = edge.measurement.to_isometry();
                        (v3(&(z.inverse() * x)), &edge.information)
                    }
                    Edge::SE2(edge) => {
                        let x1 = self.node(edge.from)?;
                        let x2 = self.node(edge.to)?;
                        let z = edge.measurement.to_isometry();
                        (v3(&pose_pose_constraint(&x1, &x2, &z)), &edge.information)
                    }
                };
                Ok((e.transpose() * omega * e).x)
            })
            .sum()
    }
}

fn v3(iso2: &Isometry2<f64>) -> Vector3<f64> {
    Vector3::new(
        iso2.translation.x,
        iso2.translation.y,
        iso2.rotation.angle(),
    )
}

fn pose_pose_constraint(
    x1: &Isometry2<f64>,
    x2: &Isometry2<f64>,
    z: &Isometry2<f64>,
) -> Isometry2<f64> {
    z.inverse() * x1.inverse() * x2
}

impl fmt::Display for PoseGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "size: {}", self.edges.len())?;
        for (i, edge) in self.edges.iter().enumerate() {
            match edge {
                Edge::Prior(edge) => {
                    let z = &edge.measurement;
                    writeln!(
                        f,
                        "factor {i}: prior on {} ({:.4}, {:.4}, {:.4}) sigmas {}",
                        edge.key,
                        z.x,
                        z.y,
                        z.heading,
                        sigmas(&edge.information)
                    )?;
                }
                Edge::SE2(edge) => {
                    let z = &edge.measurement;
                    writeln!(
                        f,
                        "factor {i}: between {} -> {} ({:.4}, {:.4}, {:.4}) sigmas {}",
                        edge.from,
                        edge.to,
                        z.dx,
                        z.dy,
                        z.dtheta,
                        sigmas(&edge.information)
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn sigmas(information: &Matrix3<f64>) -> String {
    let d = information.diagonal().map(|i| 1.0 / i.sqrt());
    format!("[{:.4}, {:.4}, {:.4}]", d.x, d.y, d.z)
}
