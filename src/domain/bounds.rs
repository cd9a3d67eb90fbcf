// Value axis bounds and scale
use super::reading::PlotPoint;
use serde::Serialize;

/// Fixed padding added above and below the data on the value axis.
pub const AXIS_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
}

/// Returns `None` for an empty series so that no NaN or infinite bound ever
/// reaches the renderer.
///
/// `mid` is the midpoint rounded half away from zero, clamped into
/// `[min, max]` so that fractional ranges such as `0.2..0.4` still keep
/// `min <= mid <= max`.
pub fn compute_bounds(points: &[PlotPoint]) -> Option<AxisBounds> {
    let (first, rest) = points.split_first()?;

    let (min, max) = rest.iter().fold((first.value, first.value), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    });
    let mid = (min / 2.0 + max / 2.0).round().clamp(min, max);

    Some(AxisBounds { min, mid, max })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScale {
    pub range: [f64; 2],
    pub ticks: [f64; 3],
}

impl AxisScale {
    pub fn from_bounds(bounds: &AxisBounds) -> Self {
        Self {
            range: [bounds.min - AXIS_PADDING, bounds.max + AXIS_PADDING],
            ticks: [bounds.min, bounds.mid, bounds.max],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::RgbColor;

    fn points(values: &[f64]) -> Vec<PlotPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| PlotPoint::new(i as i64 * 1000, v, RgbColor::new(0, 0, 0)))
            .collect()
    }

    #[test]
    fn test_min_mid_max() {
        let bounds = compute_bounds(&points(&[5.0, 7.0, 3.0, 9.0])).unwrap();
        assert_eq!(bounds, AxisBounds { min: 3.0, mid: 6.0, max: 9.0 });
    }

    #[test]
    fn test_empty_has_no_bounds() {
        assert_eq!(compute_bounds(&[]), None);
    }

    #[test]
    fn test_single_point() {
        let bounds = compute_bounds(&points(&[12.0])).unwrap();
        assert_eq!(bounds, AxisBounds { min: 12.0, mid: 12.0, max: 12.0 });
    }

    #[test]
    fn test_midpoint_rounds_half_away_from_zero() {
        assert_eq!(compute_bounds(&points(&[3.0, 4.0])).unwrap().mid, 4.0);
        assert_eq!(compute_bounds(&points(&[5.0, 4.0])).unwrap().mid, 5.0);
        assert_eq!(compute_bounds(&points(&[-4.0, -3.0])).unwrap().mid, -4.0);
        assert_eq!(compute_bounds(&points(&[-1.0, 0.0])).unwrap().mid, -1.0);
    }

    #[test]
    fn test_midpoint_stays_inside_fractional_range() {
        let bounds = compute_bounds(&points(&[0.2, 0.4])).unwrap();
        assert_eq!(bounds.mid, 0.2);
        assert!(bounds.min <= bounds.mid && bounds.mid <= bounds.max);
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let bounds = compute_bounds(&points(&[f64::MAX, f64::MAX])).unwrap();
        assert_eq!(bounds.mid, f64::MAX);
    }

    #[test]
    fn test_scale_is_padded() {
        let bounds = AxisBounds { min: 3.0, mid: 4.0, max: 5.0 };
        let scale = AxisScale::from_bounds(&bounds);
        assert_eq!(scale.range, [-7.0, 15.0]);
        assert_eq!(scale.ticks, [3.0, 4.0, 5.0]);
    }
}
