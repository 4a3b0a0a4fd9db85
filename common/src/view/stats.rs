use super::Template;
use crate::format::format_duration;
use crate::stats::{TripStats, TypeStat};

/// Statistics screen: one bar list per metric.
pub struct StatsView {
    stats: TripStats,
}

impl StatsView {
    pub fn new(stats: TripStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &TripStats {
        &self.stats
    }
}

fn chart<T>(
    name: &str,
    title: &str,
    stats: &[TypeStat<T>],
    weight: impl Fn(&T) -> i64,
    label: impl Fn(&T) -> String,
) -> String {
    let max = stats.iter().map(|s| weight(&s.value)).max().unwrap_or(0).max(1);
    let bars: String = stats
        .iter()
        .map(|stat| {
            let width = weight(&stat.value).max(0) * 100 / max;
            format!(
                "<li class=\"statistics__bar\">\
                 <span class=\"statistics__type\">{kind}</span>\
                 <span class=\"statistics__fill\" style=\"width: {width}%\"></span>\
                 <span class=\"statistics__value\">{value}</span></li>",
                kind = stat.kind.label().to_uppercase(),
                value = label(&stat.value),
            )
        })
        .collect();
    format!(
        "<div class=\"statistics__item statistics__item--{name}\">\
         <h3 class=\"statistics__title\">{title}</h3>\
         <ul class=\"statistics__chart\">{bars}</ul></div>"
    )
}

impl Template for StatsView {
    fn template(&self) -> String {
        let money = chart(
            "money",
            "Money",
            &self.stats.money,
            |v| i64::try_from(*v).unwrap_or(i64::MAX),
            |v| format!("&euro; {v}"),
        );
        let count = chart(
            "transport",
            "Type",
            &self.stats.count,
            |v| i64::try_from(*v).unwrap_or(i64::MAX),
            |v| format!("{v}x"),
        );
        let time = chart(
            "time-spend",
            "Time-spend",
            &self.stats.time_spent,
            |v| v.num_minutes(),
            |v| format_duration(*v),
        );
        format!(
            "<section class=\"statistics\">\
             <h2 class=\"visually-hidden\">Trip statistics</h2>\
             {money}{count}{time}</section>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{Destination, Point, PointId, PointType};
    use chrono::{Duration, TimeZone, Utc};

    fn point(kind: PointType, price: u32, hours: i64) -> Point {
        let start = Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).unwrap();
        Point {
            id: PointId::generate(),
            kind,
            destination: Destination::default(),
            offers: vec![],
            price,
            start_time: start,
            end_time: start + Duration::hours(hours),
            is_favorite: false,
        }
    }

    #[test]
    fn test_bars_scale_to_largest_value() {
        let stats = TripStats::collect(&[
            point(PointType::Taxi, 50, 1),
            point(PointType::Flight, 200, 3),
        ]);
        let markup = StatsView::new(stats).template();
        assert!(markup.contains("FLIGHT</span><span class=\"statistics__fill\" style=\"width: 100%\""));
        assert!(markup.contains("TAXI</span><span class=\"statistics__fill\" style=\"width: 25%\""));
        assert!(markup.contains("&euro; 200"));
        assert!(markup.contains("03H 00M"));
        assert!(markup.contains("1x"));
    }

    #[test]
    fn test_empty_stats_render_empty_charts() {
        let markup = StatsView::new(TripStats::default()).template();
        assert_eq!(markup.matches("<ul class=\"statistics__chart\"></ul>").count(), 3);
    }
}
