use chrono::{DateTime, NaiveDateTime, Utc};

const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;

pub fn parse(timestamp: &str) -> Option<DateTime<Utc>> {
    let timestamp = timestamp.trim();
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|t| t.and_utc())
        })
}

/// "3 minutes ago", "about 2 hours ago", "in 5 days".
pub fn relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse(timestamp) else {
        return "unknown time".to_string();
    };
    let seconds = (now - then).num_seconds();
    let phrase = distance(seconds.abs());
    if seconds < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

pub fn relative_opt(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    timestamp.map_or_else(|| "unknown time".to_string(), |t| relative(t, now))
}

fn rounded(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

fn distance(seconds: i64) -> String {
    let minutes = rounded(seconds, 60);
    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..=44 => format!("{minutes} minutes"),
        45..=89 => "about 1 hour".to_string(),
        90..=1_439 => format!("about {} hours", rounded(minutes, 60)),
        1_440..=2_519 => "1 day".to_string(),
        2_520..=43_199 => format!("{} days", rounded(minutes, MINUTES_PER_DAY)),
        43_200..=64_799 => "about 1 month".to_string(),
        64_800..=86_399 => "about 2 months".to_string(),
        _ => {
            let months = minutes / MINUTES_PER_MONTH;
            if months < 12 {
                return format!("{months} months");
            }
            let (years, rest) = (months / 12, months % 12);
            let unit = |n: i64| if n == 1 { "year" } else { "years" };
            match rest {
                0..=2 => format!("about {years} {}", unit(years)),
                3..=8 => format!("over {years} {}", unit(years)),
                _ => format!("almost {} {}", years + 1, unit(years + 1)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        relative(&(now() - d).to_rfc3339(), now())
    }

    #[test]
    fn phrases_by_distance() {
        assert_eq!(ago(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(ago(Duration::minutes(3)), "3 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "about 1 hour ago");
        assert_eq!(ago(Duration::hours(2)), "about 2 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(5)), "5 days ago");
        assert_eq!(ago(Duration::days(40)), "about 1 month ago");
        assert_eq!(ago(Duration::days(200)), "6 months ago");
        assert_eq!(ago(Duration::days(370)), "about 1 year ago");
        assert_eq!(ago(Duration::days(365 * 2 + 150)), "over 2 years ago");
    }

    #[test]
    fn future_and_naive_timestamps() {
        assert_eq!(
            relative(&(now() + Duration::minutes(5)).to_rfc3339(), now()),
            "in 5 minutes"
        );
        assert_eq!(relative("2024-06-01T11:00:00.000", now()), "about 1 hour ago");
    }

    #[test]
    fn garbage_is_unknown() {
        assert_eq!(relative("yesterday-ish", now()), "unknown time");
        assert_eq!(relative_opt(None, now()), "unknown time");
    }
}
