//! Browser-side settings for the demo build.
//!
//! Defaults come from compile-time env vars (`TRIP_POINTS`, `TRIP_LATENCY_MS`,
//! `TRIP_FAIL_RATE`, `TRIP_FILTER`); the page query string
//! (`?points=&latency=&fail=&filter=`) overrides them at load.

use trip_common::filter::FilterType;

const DEFAULT_POINTS: usize = 4;
const DEFAULT_LATENCY_MS: u32 = 400;

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Number of generated mock points.
    pub point_count: usize,
    /// Simulated round trip of every backend call.
    pub latency_ms: u32,
    /// Chance in `0.0..=1.0` that a write is rejected.
    pub failure_rate: f64,
    pub initial_filter: FilterType,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            point_count: DEFAULT_POINTS,
            latency_ms: DEFAULT_LATENCY_MS,
            failure_rate: 0.0,
            initial_filter: FilterType::Everything,
        }
    }
}

impl UiConfig {
    /// Compile-time defaults, then the current page's query string.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply(|key| {
            match key {
                "points" => option_env!("TRIP_POINTS"),
                "latency" => option_env!("TRIP_LATENCY_MS"),
                "fail" => option_env!("TRIP_FAIL_RATE"),
                "filter" => option_env!("TRIP_FILTER"),
                _ => None,
            }
            .filter(|v| !v.is_empty())
            .map(String::from)
        });

        #[cfg(target_family = "wasm")]
        if let Some(params) = query_params() {
            config.apply(|key| params.get(key));
        }

        config
    }

    /// Override fields from a key lookup. Unparseable values are ignored.
    pub fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(n) = lookup("points").and_then(|v| v.trim().parse().ok()) {
            self.point_count = n;
        }
        if let Some(ms) = lookup("latency").and_then(|v| v.trim().parse().ok()) {
            self.latency_ms = ms;
        }
        if let Some(rate) = lookup("fail").and_then(|v| v.trim().parse::<f64>().ok()) {
            if rate.is_finite() {
                self.failure_rate = rate.clamp(0.0, 1.0);
            }
        }
        if let Some(filter) = lookup("filter").and_then(|v| FilterType::from_input_value(v.trim())) {
            self.initial_filter = filter;
        }
    }
}

#[cfg(target_family = "wasm")]
fn query_params() -> Option<web_sys::UrlSearchParams> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = UiConfig::default();
        config.apply(lookup(&[
            ("points", "12"),
            ("latency", "0"),
            ("fail", "0.25"),
            ("filter", "future"),
        ]));
        assert_eq!(config.point_count, 12);
        assert_eq!(config.latency_ms, 0);
        assert_eq!(config.failure_rate, 0.25);
        assert_eq!(config.initial_filter, FilterType::Future);
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let mut config = UiConfig::default();
        config.apply(lookup(&[("points", "many"), ("filter", "someday"), ("fail", "NaN")]));
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn test_failure_rate_is_clamped() {
        let mut config = UiConfig::default();
        config.apply(lookup(&[("fail", "3")]));
        assert_eq!(config.failure_rate, 1.0);
    }
}
