//! g2o text format for planar pose graphs.
//!
//! Supported records:
//! - `VERTEX_SE2 id x y theta`
//! - `EDGE_SE2 from to dx dy dtheta i11 i12 i13 i22 i23 i33`
//! - `EDGE_PRIOR_SE2 id x y theta i11 i12 i13 i22 i23 i33`
//!
//! Information matrices are stored as their upper triangle, row major.

use core::str::FromStr;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Matrix3;

use crate::error::{Error, Result};
use crate::geometry::{Pose2D, RelativePose};
use crate::mapping::pose_graph::{Edge, PoseGraph};

fn values<T: FromStr>(fields: &[&str], count: usize, line: usize) -> Result<Vec<T>>
where
    <T as FromStr>::Err: Display,
{
    if fields.len() != count {
        return Err(Error::parse(
            line,
            format!("expected {count} values, found {}", fields.len()),
        ));
    }
    fields
        .iter()
        .map(|x| {
            x.parse::<T>()
                .map_err(|e| Error::parse(line, format!("'{x}': {e}")))
        })
        .collect()
}

fn information(i: &[f64]) -> Matrix3<f64> {
    #[rustfmt::skip]
    let information = Matrix3::new(
        i[0], i[1], i[2],
        i[1], i[3], i[4],
        i[2], i[4], i[5]
    );
    information
}

fn upper_triangle(m: &Matrix3<f64>) -> [f64; 6] {
    [m.m11, m.m12, m.m13, m.m22, m.m23, m.m33]
}

pub fn parse_g2o<R: BufRead>(reader: R) -> Result<PoseGraph> {
    let mut graph = PoseGraph::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some((tag, rest)) = fields.split_first() else {
            continue;
        };
        match *tag {
            "VERTEX_SE2" => {
                let (ids, rest) = rest.split_at(1.min(rest.len()));
                let id = values::<u32>(ids, 1, number)?[0];
                let v = values::<f64>(rest, 3, number)?;
                if graph.insert(id, Pose2D::new(v[0], v[1], v[2])).is_some() {
                    return Err(Error::parse(number, format!("duplicate vertex {id}")));
                }
            }
            "EDGE_SE2" => {
                let (ids, rest) = rest.split_at(2.min(rest.len()));
                let ids = values::<u32>(ids, 2, number)?;
                let v = values::<f64>(rest, 9, number)?;
                graph.add_between(
                    ids[0],
                    ids[1],
                    RelativePose::new(v[0], v[1], v[2]),
                    information(&v[3..]),
                );
            }
            "EDGE_PRIOR_SE2" => {
                let (ids, rest) = rest.split_at(1.min(rest.len()));
                let id = values::<u32>(ids, 1, number)?[0];
                let v = values::<f64>(rest, 9, number)?;
                graph.add_prior(id, Pose2D::new(v[0], v[1], v[2]), information(&v[3..]));
            }
            other => {
                return Err(Error::parse(number, format!("unsupported record '{other}'")));
            }
        }
    }
    graph.validate()?;
    log::debug!(
        "parsed g2o graph with {} nodes and {} edges",
        graph.num_nodes(),
        graph.edges().len()
    );
    Ok(graph)
}

pub fn read_g2o_file(path: &Path) -> Result<PoseGraph> {
    parse_g2o(BufReader::new(File::open(path)?))
}

pub fn write_g2o<W: Write>(graph: &PoseGraph, mut writer: W) -> Result<()> {
    for (id, pose) in graph.initial_values() {
        writeln!(writer, "VERTEX_SE2 {id} {} {} {}", pose.x, pose.y, pose.heading)?;
    }
    for edge in graph.edges() {
        match edge {
            Edge::Prior(edge) => {
                let z = &edge.measurement;
                let [i11, i12, i13, i22, i23, i33] = upper_triangle(&edge.information);
                writeln!(
                    writer,
                    "EDGE_PRIOR_SE2 {} {} {} {} {i11} {i12} {i13} {i22} {i23} {i33}",
                    edge.key, z.x, z.y, z.heading
                )?;
            }
            Edge::SE2(edge) => {
                let z = &edge.measurement;
                let [i11, i12, i13, i22, i23, i33] = upper_triangle(&edge.information);
                writeln!(
                    writer,
                    "EDGE_SE2 {} {} {} {} {} {i11} {i12} {i13} {i22} {i23} {i33}",
                    edge.from, edge.to, z.dx, z.dy, z.dtheta
                )?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_g2o_file(graph: &PoseGraph, path: &Path) -> Result<()> {
    write_g2o(graph, BufWriter::new(File::create(path)?))?;
    log::info!("wrote pose graph to {}", path.display());
    Ok(())
}
