use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::format::parse_as_utc;

/// Weekday labels in API index order (0 = Sunday).
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Aggregation window for statistics queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Day,
        Period::Week,
        Period::Month,
        Period::Year,
        Period::All,
    ];

    /// Query-string value used by the hub API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One sampled player count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Sample time (UTC, may lack a zone suffix).
    pub timestamp: String,

    /// Player count; fractional when the backend averages a bucket.
    pub players: f64,
}

/// Aggregated player statistics for one period, either per server or
/// hub-wide.
///
/// All fields default so that a sparse payload (a brand-new server with
/// zero records, say) still deserializes; [`PeriodStats::normalize`] brings
/// the aggregate arrays to their nominal lengths afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    #[serde(default)]
    pub period: Period,

    #[serde(default)]
    pub total_records: u64,

    #[serde(default)]
    pub avg_players: f64,

    #[serde(default)]
    pub max_players: u32,

    #[serde(default)]
    pub min_players: u32,

    /// Average players per weekday, indexed 0 = Sunday.
    #[serde(default)]
    pub weekday_averages: Vec<f64>,

    /// Average players per UTC hour of day, indexed 0..24.
    #[serde(default)]
    pub hourly_averages: Vec<f64>,

    /// Sampled player counts over the period, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
}

impl PeriodStats {
    /// Pad or truncate the aggregate arrays to their nominal lengths
    /// (7 weekdays, 24 hours). Backends occasionally drop trailing
    /// zero buckets.
    pub fn normalize(mut self) -> Self {
        self.weekday_averages.resize(7, 0.0);
        self.hourly_averages.resize(24, 0.0);
        self
    }
}

/// Round to one decimal, half away from zero, matching how averages are
/// displayed on the charts.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Viewer's UTC offset in hours; fractional for half-hour zones.
pub fn local_utc_offset_hours() -> f64 {
    chrono::Local::now().offset().local_minus_utc() as f64 / 3600.0
}

/// Reproject a UTC hour-of-day profile into a viewer timezone.
///
/// Output index `i` is local hour `i`. Integer offsets rotate the array;
/// fractional offsets blend the two straddling UTC buckets linearly.
/// Inputs shorter than 24 are read as zero-padded; output is always 24
/// values.
pub fn to_local_hourly(hourly: &[f64], offset_hours: f64) -> Vec<f64> {
    let bucket = |i: usize| hourly.get(i).copied().unwrap_or(0.0);

    (0..24)
        .map(|i| {
            let utc_hour = (i as f64 - offset_hours).rem_euclid(24.0);
            let whole = utc_hour.floor() as usize;
            let next = (whole + 1) % 24;
            let fraction = utc_hour - utc_hour.floor();
            if fraction == 0.0 {
                bucket(whole)
            } else {
                bucket(whole) * (1.0 - fraction) + bucket(next) * fraction
            }
        })
        .collect()
}

/// `(label, value)` bars for the weekday chart.
pub fn weekday_points(weekday_averages: &[f64]) -> Vec<(String, f64)> {
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let avg = weekday_averages.get(i).copied().unwrap_or(0.0);
            (day.to_string(), round1(avg))
        })
        .collect()
}

/// `(label, value)` bars for the hour-of-day chart, reprojected to the
/// given UTC offset. Labels are local hours, `"0:00"` through `"23:00"`.
pub fn hourly_points(hourly_averages: &[f64], offset_hours: f64) -> Vec<(String, f64)> {
    to_local_hourly(hourly_averages, offset_hours)
        .into_iter()
        .enumerate()
        .map(|(i, avg)| (format!("{}:00", i), round1(avg)))
        .collect()
}

/// `(label, players)` points for the history chart, labelled in the
/// viewer's local time.
pub fn history_points(history: &[HistoryPoint]) -> Vec<(String, f64)> {
    history_points_at(history, *chrono::Local::now().offset())
}

/// Offset-parameterised core of [`history_points`].
///
/// Timestamps are parsed as UTC; a sample whose timestamp will not parse
/// is dropped from the series. Player counts are rounded to whole players.
pub fn history_points_at(history: &[HistoryPoint], offset: FixedOffset) -> Vec<(String, f64)> {
    history
        .iter()
        .filter_map(|point| {
            let utc = parse_as_utc(&point.timestamp).ok()?;
            let label = utc.with_timezone(&offset).format("%b %d %H:%M").to_string();
            Some((label, point.players.round()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<f64> {
        (0..24).map(|h| h as f64).collect()
    }

    #[test]
    fn test_period_serde() {
        assert_eq!(serde_json::to_string(&Period::Week).unwrap(), "\"week\"");
        let p: Period = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(p, Period::All);
        assert_eq!(Period::default(), Period::Week);
    }

    #[test]
    fn test_stats_deserialize_sparse_payload() {
        let stats: PeriodStats = serde_json::from_str(r#"{"period": "day"}"#).unwrap();
        let stats = stats.normalize();

        assert_eq!(stats.period, Period::Day);
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.weekday_averages.len(), 7);
        assert_eq!(stats.hourly_averages.len(), 24);
        assert!(stats.history.is_empty());
    }

    #[test]
    fn test_normalize_pads_and_truncates() {
        let stats = PeriodStats {
            weekday_averages: vec![1.0, 2.0, 3.0],
            hourly_averages: (0..30).map(|h| h as f64).collect(),
            ..PeriodStats::default()
        }
        .normalize();

        assert_eq!(stats.weekday_averages, vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(stats.hourly_averages.len(), 24);
        assert_eq!(stats.hourly_averages[23], 23.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(24.26), 24.3);
        assert_eq!(round1(24.24), 24.2);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round1(-1.35), -1.4);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_local_hourly_identity_at_zero_offset() {
        assert_eq!(to_local_hourly(&ramp(), 0.0), ramp());
    }

    #[test]
    fn test_local_hourly_rotates_for_integer_offsets() {
        // Local hour 0 at UTC+2 is UTC hour 22.
        let local = to_local_hourly(&ramp(), 2.0);
        assert_eq!(local[0], 22.0);
        assert_eq!(local[2], 0.0);
        assert_eq!(local[23], 21.0);

        let west = to_local_hourly(&ramp(), -5.0);
        assert_eq!(west[0], 5.0);
        assert_eq!(west[19], 0.0);
    }

    #[test]
    fn test_local_hourly_blends_fractional_offsets() {
        // UTC+5:30 lands halfway between two buckets.
        let local = to_local_hourly(&ramp(), 5.5);
        assert_eq!(local.len(), 24);
        assert!((local[6] - 0.5).abs() < 1e-9);

        // Every blended value stays within the bucket range.
        for value in &local {
            assert!((0.0..=23.0).contains(value));
        }
    }

    #[test]
    fn test_local_hourly_handles_short_input() {
        let local = to_local_hourly(&[4.0, 8.0], 0.0);
        assert_eq!(local.len(), 24);
        assert_eq!(local[0], 4.0);
        assert_eq!(local[1], 8.0);
        assert_eq!(local[2], 0.0);
    }

    #[test]
    fn test_weekday_points_labels_and_padding() {
        let points = weekday_points(&[10.04, 20.06]);

        assert_eq!(points.len(), 7);
        assert_eq!(points[0], ("Sun".to_string(), 10.0));
        assert_eq!(points[1], ("Mon".to_string(), 20.1));
        assert_eq!(points[6], ("Sat".to_string(), 0.0));
    }

    #[test]
    fn test_hourly_points_labels() {
        let points = hourly_points(&ramp(), 0.0);

        assert_eq!(points.len(), 24);
        assert_eq!(points[0].0, "0:00");
        assert_eq!(points[23].0, "23:00");
        assert_eq!(points[13].1, 13.0);
    }

    #[test]
    fn test_history_points_rounding_and_labels() {
        let history = vec![
            HistoryPoint {
                timestamp: "2024-01-15T12:30:00".to_string(),
                players: 41.6,
            },
            HistoryPoint {
                timestamp: "garbage".to_string(),
                players: 12.0,
            },
        ];

        let utc = FixedOffset::east_opt(0).unwrap();
        let points = history_points_at(&history, utc);

        // The unparseable sample is dropped from the series.
        assert_eq!(points.len(), 1);
        assert_eq!(points[0], ("Jan 15 12:30".to_string(), 42.0));
    }

    #[test]
    fn test_history_points_respect_offset() {
        let history = vec![HistoryPoint {
            timestamp: "2024-01-15T23:30:00".to_string(),
            players: 5.0,
        }];

        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let points = history_points_at(&history, plus_one);

        assert_eq!(points[0].0, "Jan 16 00:30");
    }
}
