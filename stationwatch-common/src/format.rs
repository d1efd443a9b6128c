use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Round durations above this are assumed to be deciseconds rather than
/// seconds (three hours; almost no round runs longer).
const DECISECOND_THRESHOLD: f64 = 10_800.0;

/// Format a round duration reported by the hub.
///
/// Negative values are a lobby countdown in seconds and come out as
/// `"Lobby M:SS"`. Positive values are usually seconds, but some codebases
/// report deciseconds; anything above 10800 is divided by ten first. See
/// [`format_duration_deciseconds`] for the variant without the heuristic.
pub fn format_duration(duration: f64) -> String {
    if duration < 0.0 {
        let seconds = (-duration) as i64;
        return format!("Lobby {}:{:02}", seconds / 60, seconds % 60);
    }

    let total_seconds = if duration > DECISECOND_THRESHOLD {
        (duration / 10.0).floor() as i64
    } else {
        duration.floor() as i64
    };

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a round duration known to be deciseconds.
///
/// The topic port of the codebases we track always reports deciseconds,
/// so the server detail panel uses this variant instead of guessing from
/// the magnitude. Values under a minute come out as `"0m"`.
pub fn format_duration_deciseconds(deciseconds: f64) -> String {
    let total_seconds = (deciseconds / 10.0).floor() as i64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a shuttle countdown (seconds) as `M:SS`.
///
/// Negative timers are clamped to zero.
pub fn format_shuttle_timer(seconds: f64) -> String {
    let seconds = seconds.max(0.0).floor() as i64;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Human-readable "time ago" for a past instant.
pub fn format_relative_time(instant: DateTime<Utc>) -> String {
    format_relative_time_at(instant, Utc::now())
}

/// Clock-parameterised core of [`format_relative_time`].
///
/// Seconds under a minute, then minutes, hours, days. An instant in the
/// future comes out with a negative count rather than being clamped.
pub fn format_relative_time_at(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - instant).num_seconds();
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Parse a hub timestamp as UTC.
///
/// The API emits UTC timestamps without a zone suffix; a trailing `Z` is
/// appended before parsing unless the string already ends in `Z` or
/// carries a `+` offset.
pub fn parse_as_utc(timestamp: &str) -> Result<DateTime<Utc>> {
    let owned;
    let candidate = if !timestamp.ends_with('Z') && !timestamp.contains('+') {
        owned = format!("{}Z", timestamp);
        owned.as_str()
    } else {
        timestamp
    };

    DateTime::parse_from_rfc3339(candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(timestamp.to_string()))
}

/// Group digits in thousands, the way record totals are displayed.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
