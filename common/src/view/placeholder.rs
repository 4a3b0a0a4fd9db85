use super::Template;
use crate::filter::FilterType;

/// Shown instead of the list when nothing passes the filter.
pub struct ListEmptyView {
    pub filter: FilterType,
}

impl ListEmptyView {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Template for ListEmptyView {
    fn template(&self) -> String {
        format!(
            "<p class=\"trip-events__msg\">{}</p>",
            self.filter.empty_message()
        )
    }
}

#[derive(Default)]
pub struct LoadingView;

impl Template for LoadingView {
    fn template(&self) -> String {
        "<p class=\"trip-events__msg trip-events__msg--loading\">Loading...</p>".to_string()
    }
}

#[derive(Default)]
pub struct LoadingErrorView;

impl Template for LoadingErrorView {
    fn template(&self) -> String {
        "<p class=\"trip-events__msg trip-events__msg--error\">\
         Could not load destinations and offers. Try again later.</p>"
            .to_string()
    }
}
