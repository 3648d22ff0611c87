mod odometry;
mod pose;
mod trajectory;

pub use odometry::{extract, HeadingWrap};
pub use pose::{Pose2D, RelativePose};
pub use trajectory::Trajectory;
