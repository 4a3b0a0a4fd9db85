use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};

use crate::point::Point;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

/// Format used by the edit form date inputs.
pub const DATE_INPUT_FORMAT: &str = "%d/%m/%y %H:%M";

/// Compact duration: `05M`, `02H 05M`, `01D 02H 05M`.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    if minutes < MINUTES_PER_HOUR {
        format!("{minutes:02}M")
    } else if minutes < MINUTES_PER_DAY {
        let hours = minutes / MINUTES_PER_HOUR;
        let rest = minutes % MINUTES_PER_HOUR;
        format!("{hours:02}H {rest:02}M")
    } else {
        let days = minutes / MINUTES_PER_DAY;
        let hours = (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        let rest = minutes % MINUTES_PER_HOUR;
        format!("{days:02}D {hours:02}H {rest:02}M")
    }
}

/// `Mar 18`
pub fn format_day(time: DateTime<Utc>) -> String {
    time.format("%b %-d").to_string()
}

/// `09:45`
pub fn format_clock(time: DateTime<Utc>) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_input_date(time: DateTime<Utc>, format: &str) -> String {
    time.format(format).to_string()
}

/// Parse a form date; `None` on malformed input.
pub fn parse_input_date(value: &str, format: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), format)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Escape text for interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Route title for the info panel: `A — B — C`, or `A — ... — Z` when the
/// route has more than `limit` stops. Points must be chronological.
pub fn trip_title(points: &[Point], limit: usize) -> String {
    let names: Vec<String> = points
        .iter()
        .map(|p| escape_html(&p.destination.name))
        .collect();
    match names.as_slice() {
        [] => String::new(),
        [first, .., last] if names.len() > limit => format!("{first} &mdash; ... &mdash; {last}"),
        _ => names.join(" &mdash; "),
    }
}

/// Date range for the info panel: `MAR 18&nbsp;&mdash;&nbsp;20` within one
/// month, `MAR 18&nbsp;&mdash;&nbsp;APR 2` otherwise.
pub fn trip_dates(points: &[Point]) -> String {
    let start = points.iter().map(|p| p.start_time).min();
    let end = points.iter().map(|p| p.end_time).max();
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let from = start.format("%b %-d").to_string().to_uppercase();
    let to = if start.year() == end.year() && start.month() == end.month() {
        end.format("%-d").to_string()
    } else {
        end.format("%b %-d").to_string().to_uppercase()
    };
    format!("{from}&nbsp;&mdash;&nbsp;{to}")
}

pub fn trip_cost(points: &[Point]) -> u64 {
    points.iter().map(Point::total_price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, PointId, PointType};
    use chrono::TimeZone;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, month, day, 10, 0, 0).unwrap()
    }

    fn point(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Point {
        Point {
            id: PointId(name.into()),
            kind: PointType::Drive,
            destination: Destination {
                name: name.into(),
                ..Default::default()
            },
            offers: vec![],
            price: 100,
            start_time: start,
            end_time: end,
            is_favorite: false,
        }
    }

    #[test]
    fn test_format_duration_buckets() {
        assert_eq!(format_duration(Duration::minutes(5)), "05M");
        assert_eq!(format_duration(Duration::minutes(125)), "02H 05M");
        assert_eq!(format_duration(Duration::minutes(1440 + 65)), "01D 01H 05M");
        assert_eq!(format_duration(Duration::minutes(-3)), "00M");
    }

    #[test]
    fn test_input_date_roundtrip() {
        let time = Utc.with_ymd_and_hms(2021, 3, 18, 9, 5, 0).unwrap();
        let text = format_input_date(time, DATE_INPUT_FORMAT);
        assert_eq!(text, "18/03/21 09:05");
        assert_eq!(parse_input_date(&text, DATE_INPUT_FORMAT), Some(time));
        assert_eq!(parse_input_date("yesterday", DATE_INPUT_FORMAT), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_trip_title_shortens_long_routes() {
        let p = |n: &str| point(n, at(3, 1), at(3, 2));
        assert_eq!(trip_title(&[], 3), "");
        assert_eq!(trip_title(&[p("Oslo")], 3), "Oslo");
        assert_eq!(
            trip_title(&[p("Oslo"), p("Rome"), p("Paris")], 3),
            "Oslo &mdash; Rome &mdash; Paris"
        );
        assert_eq!(
            trip_title(&[p("Oslo"), p("Rome"), p("Paris"), p("Kyiv")], 3),
            "Oslo &mdash; ... &mdash; Kyiv"
        );
    }

    #[test]
    fn test_trip_dates() {
        let same_month = [point("a", at(3, 18), at(3, 19)), point("b", at(3, 19), at(3, 20))];
        assert_eq!(trip_dates(&same_month), "MAR 18&nbsp;&mdash;&nbsp;20");

        let spanning = [point("a", at(3, 18), at(3, 19)), point("b", at(4, 1), at(4, 2))];
        assert_eq!(trip_dates(&spanning), "MAR 18&nbsp;&mdash;&nbsp;APR 2");
        assert_eq!(trip_dates(&[]), "");
    }

    #[test]
    fn test_trip_cost() {
        let points = [point("a", at(3, 1), at(3, 2)), point("b", at(3, 2), at(3, 3))];
        assert_eq!(trip_cost(&points), 200);
    }
}
