use super::Template;
use crate::filter::{FilterItem, FilterType};

pub struct FiltersView {
    pub items: Vec<FilterItem>,
    pub active: FilterType,
}

impl FiltersView {
    pub fn new(items: Vec<FilterItem>, active: FilterType) -> Self {
        Self { items, active }
    }
}

impl Template for FiltersView {
    fn template(&self) -> String {
        let items: String = self
            .items
            .iter()
            .map(|item| {
                let value = item.filter.input_value();
                let checked = if item.filter == self.active { " checked" } else { "" };
                let disabled = if item.count == 0 { " disabled" } else { "" };
                format!(
                    "<div class=\"trip-filters__filter\">\
                     <input id=\"filter-{value}\" class=\"trip-filters__filter-input visually-hidden\" \
                     type=\"radio\" name=\"trip-filter\" value=\"{value}\"{checked}{disabled}>\
                     <label class=\"trip-filters__filter-label\" for=\"filter-{value}\">{}</label>\
                     </div>",
                    item.filter.label()
                )
            })
            .collect();
        format!(
            "<form class=\"trip-filters\" action=\"#\" method=\"get\">{items}\
             <button class=\"visually-hidden\" type=\"submit\">Accept filter</button></form>"
        )
    }
}
