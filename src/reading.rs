//! Degree day reading data structure and derivation logic.

use chrono::{DateTime, Utc};

/// Standard heating degree days baseline (°C).
pub const DEFAULT_BASELINE_TEMP: f64 = 15.5;

/// One day's collected weather observation with its derived degree day metrics.
///
/// Constructed once per collection run and appended to the CSV log as a single
/// row; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DegreeDayReading {
    /// Observation timestamp exactly as the provider returned it.
    pub date: String,
    /// Coordinate key, `"lat,lon"`.
    pub location_id: String,
    /// Resolved place name, or the coordinate text if the provider has none.
    pub location_name: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: f64,
    /// Baseline in effect when the metrics were derived (°C).
    pub baseline_temp: f64,
    pub heating_degree_days: f64,
    pub cooling_degree_days: f64,
    pub weather_code: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub visibility: Option<f64>,
    pub humidity: Option<f64>,
    pub uv_index: Option<f64>,
    pub precip_probability: Option<f64>,
    /// When this record was produced, not the observation date.
    pub collected_at: DateTime<Utc>,
}

/// Metrics derived from a day's screen temperature range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeDays {
    pub avg_temp: f64,
    pub heating: f64,
    pub cooling: f64,
}

impl DegreeDays {
    /// Derives average temperature and heating/cooling degree days.
    ///
    /// HDD is how far the day average fell below the baseline, CDD how far it
    /// rose above it; at most one of the two is nonzero.
    pub fn derive(max_temp: f64, min_temp: f64, baseline_temp: f64) -> Self {
        let avg = (max_temp + min_temp) / 2.0;

        DegreeDays {
            avg_temp: round2(avg),
            heating: round2((baseline_temp - avg).max(0.0)),
            cooling: round2((avg - baseline_temp).max(0.0)),
        }
    }
}

/// Rounds to 2 decimal places for storage.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_derive_heating_degree_days() {
        let dd = DegreeDays::derive(10.0, 2.0, DEFAULT_BASELINE_TEMP);

        assert_eq!(dd.avg_temp, 6.0);
        assert_eq!(dd.heating, 9.5);
        assert_eq!(dd.cooling, 0.0);
    }

    #[test]
    fn should_derive_cooling_degree_days() {
        let dd = DegreeDays::derive(20.0, 18.0, DEFAULT_BASELINE_TEMP);

        assert_eq!(dd.avg_temp, 19.0);
        assert_eq!(dd.heating, 0.0);
        assert_eq!(dd.cooling, 3.5);
    }

    #[test]
    fn should_handle_negative_temperatures() {
        let dd = DegreeDays::derive(-5.0, -15.0, DEFAULT_BASELINE_TEMP);

        assert_eq!(dd.avg_temp, -10.0);
        assert_eq!(dd.heating, 25.5);
        assert_eq!(dd.cooling, 0.0);
    }

    #[test]
    fn should_split_degree_days_around_baseline() {
        for (max, min) in [(10.0, 2.0), (20.0, 18.0), (-5.0, -15.0), (16.0, 15.0)] {
            let dd = DegreeDays::derive(max, min, DEFAULT_BASELINE_TEMP);
            let deviation = round2((DEFAULT_BASELINE_TEMP - dd.avg_temp).abs());

            assert_eq!(round2(dd.heating + dd.cooling), deviation);
            assert!(dd.heating >= 0.0 && dd.cooling >= 0.0);
            assert!(dd.heating == 0.0 || dd.cooling == 0.0);
        }
    }

    #[test]
    fn should_respect_custom_baseline() {
        let dd = DegreeDays::derive(20.0, 18.0, 21.0);

        assert_eq!(dd.heating, 2.0);
        assert_eq!(dd.cooling, 0.0);
    }

    #[test]
    fn should_round_to_two_decimals() {
        assert_eq!(round2(9.3335), 9.33);
        assert_eq!(round2(9.335), 9.34);
        assert_eq!(round2(-10.005), -10.01);
        assert_eq!(round2(6.0), 6.0);
    }

    #[test]
    fn should_round_average_of_odd_range() {
        let dd = DegreeDays::derive(10.333, 2.0, DEFAULT_BASELINE_TEMP);

        assert_eq!(dd.avg_temp, 6.17);
        assert_eq!(dd.heating, 9.33);
    }
}
