//! Relative "time ago" phrasing for timestamps

use chrono::{DateTime, Utc};

/// Whole-unit distance between two instants, truncated toward zero
#[derive(Debug, Clone, Copy)]
struct Delta {
    days: i64,
    seconds: i64,
}

struct Rule {
    applies: fn(Delta) -> bool,
    render: fn(Delta) -> String,
}

fn weeks(d: Delta) -> String {
    format!("{} weeks ago", (d.days as f64 / 7.0).ceil() as i64)
}

fn just_now(_: Delta) -> String {
    "just now".to_string()
}

fn one_minute(_: Delta) -> String {
    "1 minute ago".to_string()
}

fn minutes(d: Delta) -> String {
    format!("{} minutes ago", d.seconds / 60)
}

fn one_hour(_: Delta) -> String {
    "1 hour ago".to_string()
}

fn hours(d: Delta) -> String {
    format!("{} hours ago", d.seconds / 3600)
}

fn yesterday(_: Delta) -> String {
    "yesterday".to_string()
}

fn days(d: Delta) -> String {
    format!("{} days ago", d.days)
}

fn same_day_within(d: Delta, seconds: i64) -> bool {
    d.days == 0 && d.seconds < seconds
}

/// Evaluated top to bottom, first match wins.
///
/// Timestamps in the future (negative day delta) fall into the first rule and
/// produce a non-positive week count. Commit dates are never ahead of the
/// server clock by more than skew, so this only matters in theory.
static RULES: [Rule; 9] = [
    Rule {
        applies: |d| d.days < 0 || d.days >= 31,
        render: weeks,
    },
    Rule {
        applies: |d| same_day_within(d, 60),
        render: just_now,
    },
    Rule {
        applies: |d| same_day_within(d, 120),
        render: one_minute,
    },
    Rule {
        applies: |d| same_day_within(d, 3600),
        render: minutes,
    },
    Rule {
        applies: |d| same_day_within(d, 7200),
        render: one_hour,
    },
    Rule {
        applies: |d| same_day_within(d, 86400),
        render: hours,
    },
    Rule {
        applies: |d| d.days == 1,
        render: yesterday,
    },
    Rule {
        applies: |d| d.days > 1 && d.days < 7,
        render: days,
    },
    Rule {
        applies: |d| d.days >= 7 && d.days < 31,
        render: weeks,
    },
];

/// Describe how long before `now` the instant `past` was
pub fn humanize(now: DateTime<Utc>, past: DateTime<Utc>) -> String {
    let elapsed = now - past;
    let delta = Delta {
        days: elapsed.num_days(),
        seconds: elapsed.num_seconds(),
    };

    RULES
        .iter()
        .find(|rule| (rule.applies)(delta))
        .map(|rule| (rule.render)(delta))
        // day == 0 with seconds >= 86400 cannot happen
        .unwrap_or_else(|| weeks(delta))
}
