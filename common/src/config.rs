use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::filter::FilterType;
use crate::format::DATE_INPUT_FORMAT;
use crate::sort::SortType;

/// Source of "now" for filters and new-point defaults.
pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

/// Destinations shown in the route title before it collapses to `A — ... — Z`.
pub const DEFAULT_TITLE_LIMIT: usize = 3;

/// Presentation settings for a trip screen.
#[derive(Clone)]
pub struct TripConfig {
    pub info_title_limit: usize,
    /// `chrono` format string for the edit form date inputs.
    pub date_format: &'static str,
    pub initial_filter: FilterType,
    pub initial_sort: SortType,
    pub clock: Clock,
}

impl TripConfig {
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            info_title_limit: DEFAULT_TITLE_LIMIT,
            date_format: DATE_INPUT_FORMAT,
            initial_filter: FilterType::Everything,
            initial_sort: SortType::Default,
            clock,
        }
    }

    /// Config whose clock always reads `now`.
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self::with_clock(Rc::new(move || now))
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

#[cfg(feature = "std")]
impl Default for TripConfig {
    fn default() -> Self {
        Self::with_clock(Rc::new(Utc::now))
    }
}

impl fmt::Debug for TripConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripConfig")
            .field("info_title_limit", &self.info_title_limit)
            .field("date_format", &self.date_format)
            .field("initial_filter", &self.initial_filter)
            .field("initial_sort", &self.initial_sort)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock() {
        let now = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let config = TripConfig::fixed(now);
        assert_eq!(config.now(), now);
        assert_eq!(config.info_title_limit, 3);
        assert_eq!(config.initial_sort, SortType::Default);
    }
}
