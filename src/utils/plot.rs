use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::Result;
use crate::geometry::Pose2D;
use crate::simulation::ImuSample;

pub struct TrajectorySeries<'a> {
    pub label: &'a str,
    pub poses: &'a [Pose2D],
    pub color: RGBColor,
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"))
}

/// Square window around every pose so that both axes share one scale.
fn equal_axes(series: &[TrajectorySeries]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for pose in series.iter().flat_map(|s| s.poses.iter()) {
        min_x = min_x.min(pose.x);
        max_x = max_x.max(pose.x);
        min_y = min_y.min(pose.y);
        max_y = max_y.max(pose.y);
    }
    if min_x > max_x {
        return (-1.0..1.0, -1.0..1.0);
    }
    let half = 0.5 * (max_x - min_x).max(max_y - min_y).max(1.0) * 1.15;
    let (cx, cy) = (0.5 * (min_x + max_x), 0.5 * (min_y + max_y));
    (cx - half..cx + half, cy - half..cy + half)
}

/// Poses as markers joined in order, with a short tick along each heading.
pub fn plot_trajectories(path: &Path, title: &str, series: &[TrajectorySeries]) -> Result<()> {
    let drawn = if is_svg(path) {
        draw_trajectories(SVGBackend::new(path, (800, 800)).into_drawing_area(), title, series)
    } else {
        draw_trajectories(BitMapBackend::new(path, (800, 800)).into_drawing_area(), title, series)
    };
    drawn?;
    log::info!("saved {}", path.display());
    Ok(())
}

fn draw_trajectories<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    title: &str,
    series: &[TrajectorySeries],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (x_range, y_range) = equal_axes(series);
    let tick = 0.04 * (x_range.end - x_range.start);

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(title, ("sans-serif", 30))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)?;

    chart.configure_mesh().draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.poses.iter().map(|p| (p.x, p.y)),
                color.stroke_width(1),
            ))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            s.poses
                .iter()
                .map(|p| Circle::new((p.x, p.y), 3, color.filled())),
        )?;
        chart.draw_series(s.poses.iter().map(|p| {
            PathElement::new(
                vec![
                    (p.x, p.y),
                    (p.x + tick * p.heading.cos(), p.y + tick * p.heading.sin()),
                ],
                color.stroke_width(2),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// 3x2 grid of readings against time, gyro axes on the left, accel on the right.
pub fn plot_imu(path: &Path, samples: &[ImuSample]) -> Result<()> {
    let drawn = if is_svg(path) {
        draw_imu(SVGBackend::new(path, (1200, 900)).into_drawing_area(), samples)
    } else {
        draw_imu(BitMapBackend::new(path, (1200, 900)).into_drawing_area(), samples)
    };
    drawn?;
    log::info!("saved {}", path.display());
    Ok(())
}

fn draw_imu<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, samples: &[ImuSample]) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let t_max = samples.last().map_or(1.0, |s| s.t).max(f64::EPSILON);
    const AXES: [&str; 3] = ["x", "y", "z"];

    for (idx, area) in root.split_evenly((3, 2)).iter().enumerate() {
        let (axis, is_accel) = (idx / 2, idx % 2 == 1);
        let values: Vec<(f64, f64)> = samples
            .iter()
            .map(|s| {
                let v = if is_accel { s.accel } else { s.gyro };
                (s.t, v[axis])
            })
            .collect();
        let (lo, hi) = values
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
        let pad = ((hi - lo) * 0.1).max(1e-6);
        let (lo, hi) = if lo > hi { (-1.0, 1.0) } else { (lo - pad, hi + pad) };

        let caption = if is_accel {
            format!("accel {} [m/s^2]", AXES[axis])
        } else {
            format!("gyro {} [rad/s]", AXES[axis])
        };
        let color = if is_accel { RED } else { BLUE };

        let mut chart = ChartBuilder::on(area)
            .margin(5)
            .caption(caption, ("sans-serif", 18))
            .x_label_area_size(25)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..t_max, lo..hi)?;
        chart.configure_mesh().max_light_lines(2).draw()?;
        chart.draw_series(
            values
                .iter()
                .map(|(t, v)| Circle::new((*t, *v), 1, color.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}
