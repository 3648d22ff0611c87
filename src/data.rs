//! CSV import/export of trajectories (`x,y,heading`) and odometry
//! (`dx,dy,dtheta`).

use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::geometry::{Pose2D, RelativePose, Trajectory};

fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let records = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(records)
}

fn write_records<T: Serialize, W: Write>(records: &[T], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_trajectory<R: Read>(reader: R) -> Result<Trajectory> {
    Trajectory::new(read_records::<Pose2D, R>(reader)?)
}

pub fn read_trajectory_file(path: &Path) -> Result<Trajectory> {
    let trajectory = read_trajectory(std::fs::File::open(path)?)?;
    log::info!("read {} poses from {}", trajectory.len(), path.display());
    Ok(trajectory)
}

pub fn write_trajectory<W: Write>(poses: &[Pose2D], writer: W) -> Result<()> {
    write_records(poses, writer)
}

pub fn read_odometry<R: Read>(reader: R) -> Result<Vec<RelativePose>> {
    read_records(reader)
}

pub fn write_odometry<W: Write>(odometry: &[RelativePose], writer: W) -> Result<()> {
    write_records(odometry, writer)
}

pub fn write_odometry_file(odometry: &[RelativePose], path: &Path) -> Result<()> {
    write_odometry(odometry, std::fs::File::create(path)?)?;
    log::info!("wrote {} relative poses to {}", odometry.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::{extract, HeadingWrap};

    #[test]
    fn read_trajectory_with_header() -> Result<()> {
        let input = "x, y, heading\n0, 0, 0\n2, 0, 0\n2, 0, 1.5707963267948966\n";
        let trajectory = read_trajectory(input.as_bytes())?;
        assert_eq!(3, trajectory.len());
        approx::assert_abs_diff_eq!(trajectory[2].heading, std::f64::consts::FRAC_PI_2);
        Ok(())
    }

    #[test]
    fn non_finite_rows_are_reported_by_index() {
        let input = "x,y,heading\n0,0,0\nNaN,0,0\n";
        assert!(matches!(
            read_trajectory(input.as_bytes()),
            Err(Error::InvalidInput { index: 1, .. })
        ));
    }

    #[test]
    fn malformed_rows_are_csv_errors() {
        let input = "x,y,heading\n0,zero,0\n";
        assert!(matches!(read_trajectory(input.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn odometry_written_with_header() -> Result<()> {
        let poses = [Pose2D::new(0.0, 0.0, 0.0), Pose2D::new(2.0, 0.0, 0.0)];
        let odometry = extract(&poses, HeadingWrap::Raw)?;
        let mut buffer = Vec::new();
        write_odometry(&odometry, &mut buffer)?;
        let text = String::from_utf8_lossy(&buffer);
        assert_eq!("dx,dy,dtheta\n2.0,0.0,0.0\n", text);
        assert_eq!(odometry, read_odometry(buffer.as_slice())?);
        Ok(())
    }
}
