// Series normalization - raw readings to chart-ready points
use super::reading::{PlotPoint, RawReading};
use super::status::StatusColorMap;
use serde::Serialize;

const MILLIS_PER_SECOND: i64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub points: Vec<PlotPoint>,
    /// Records that made it into `points`.
    pub retained: usize,
    /// Records filtered out because their value was not a finite number.
    pub dropped: usize,
}

pub fn normalize(readings: &[RawReading]) -> NormalizedSeries {
    normalize_with(readings, &StatusColorMap::standard())
}

/// Sorts readings by time (stable for equal timestamps), converts seconds to
/// milliseconds, resolves colors and drops records without a finite value.
pub fn normalize_with(readings: &[RawReading], colors: &StatusColorMap) -> NormalizedSeries {
    let mut ordered: Vec<&RawReading> = readings.iter().collect();
    ordered.sort_by_key(|reading| reading.time);

    let points: Vec<PlotPoint> = ordered
        .into_iter()
        .filter_map(|reading| {
            let value = reading.value.as_finite()?;
            Some(PlotPoint::new(
                reading.time.saturating_mul(MILLIS_PER_SECOND),
                value,
                colors.resolve(&reading.status_id),
            ))
        })
        .collect();

    let retained = points.len();
    let dropped = readings.len() - retained;
    if dropped > 0 {
        tracing::debug!(retained, dropped, "Dropped readings without a numeric value");
    }

    NormalizedSeries {
        points,
        retained,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::RgbColor;

    fn times(series: &NormalizedSeries) -> Vec<i64> {
        series.points.iter().map(|p| p.time_millis).collect()
    }

    #[test]
    fn test_end_to_end_example() {
        let readings = vec![
            RawReading::new(1704240000, 3.0, "red"),
            RawReading::new(1704067200, 5.0, "green"),
        ];

        let series = normalize(&readings);

        assert_eq!(
            series.points,
            vec![
                PlotPoint::new(1704067200000, 5.0, RgbColor::new(0x00, 0xFF, 0x00)),
                PlotPoint::new(1704240000000, 3.0, RgbColor::new(0xFF, 0x00, 0x00)),
            ]
        );
        assert_eq!(series.retained, 2);
        assert_eq!(series.dropped, 0);
    }

    #[test]
    fn test_sorted_and_converted() {
        let readings = vec![
            RawReading::new(30, 1.0, "green"),
            RawReading::new(10, 2.0, "green"),
            RawReading::new(20, 3.0, "green"),
            RawReading::new(10, 4.0, "green"),
            RawReading::new(-5, 5.0, "green"),
        ];

        let series = normalize(&readings);
        let millis = times(&series);

        assert!(millis.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(millis, vec![-5000, 10000, 10000, 20000, 30000]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let readings = vec![
            RawReading::new(100, 1.0, "red"),
            RawReading::new(50, 9.0, "green"),
            RawReading::new(100, 2.0, "amber"),
            RawReading::new(100, 3.0, "yellow"),
        ];

        let series = normalize(&readings);
        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();

        assert_eq!(values, vec![9.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_numeric_values_are_dropped() {
        let readings = vec![
            RawReading::new(1, "N/A", "green"),
            RawReading::new(2, "42", "green"),
            RawReading::new(3, f64::INFINITY, "green"),
            RawReading::new(4, 7.5, "amber"),
        ];

        let series = normalize(&readings);

        assert_eq!(times(&series), vec![2000, 4000]);
        assert_eq!(series.points[0].value, 42.0);
        assert_eq!(series.retained, 2);
        assert_eq!(series.dropped, 2);
    }

    #[test]
    fn test_unknown_status_gets_default_color() {
        let series = normalize(&[RawReading::new(1, 1.0, "teal")]);
        assert_eq!(series.points[0].color, StatusColorMap::standard().default_color());
    }

    #[test]
    fn test_shuffled_input_gives_same_output() {
        let readings = vec![
            RawReading::new(1704067200, 5.0, "green"),
            RawReading::new(1704070800, "8", "yellow"),
            RawReading::new(1704074400, 13.0, "amber"),
            RawReading::new(1704078000, "bad", "red"),
            RawReading::new(1704081600, 2.0, "teal"),
        ];
        let expected = normalize(&readings);

        let shuffles: [[usize; 5]; 3] = [[4, 3, 2, 1, 0], [2, 0, 4, 1, 3], [1, 4, 0, 3, 2]];
        for order in shuffles {
            let shuffled: Vec<RawReading> = order.iter().map(|&i| readings[i].clone()).collect();
            assert_eq!(normalize(&shuffled), expected);
        }
    }

    #[test]
    fn test_empty_input() {
        let series = normalize(&[]);
        assert!(series.points.is_empty());
        assert_eq!(series.dropped, 0);
    }

    #[test]
    fn test_extreme_time_saturates() {
        let series = normalize(&[RawReading::new(i64::MAX, 1.0, "red")]);
        assert_eq!(series.points[0].time_millis, i64::MAX);
    }
}
