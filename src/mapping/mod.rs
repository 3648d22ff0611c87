pub mod g2o;
pub mod pose_graph;

pub use pose_graph::{information_from_sigmas, Edge, EdgePriorSE2, EdgeSE2, PoseGraph};
