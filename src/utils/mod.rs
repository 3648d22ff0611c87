pub mod plot;

use std::f64::consts::{PI, TAU};

pub fn deg2rad(x: f64) -> f64 {
    const DEG2RAD_FACTOR: f64 = PI / 180.0;
    x * DEG2RAD_FACTOR
}

pub fn rad2deg(x: f64) -> f64 {
    const RAD2DEG_FACTOR: f64 = 180.0 / PI;
    x * RAD2DEG_FACTOR
}

/// Wrap an angle into (-pi, pi].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +pi onto -pi, keep the closed end of the interval
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deg_rad_conversion() {
        approx::assert_abs_diff_eq!(deg2rad(180.0), PI, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(rad2deg(PI / 2.0), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_angle_interval() {
        approx::assert_abs_diff_eq!(normalize_angle(PI), PI, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(normalize_angle(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(normalize_angle(TAU + 0.1), 0.1, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(normalize_angle(0.0), 0.0, epsilon = 1e-12);
    }
}
