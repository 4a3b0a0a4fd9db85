use super::Template;
use crate::sort::SortType;

pub struct SortView {
    pub active: SortType,
}

impl SortView {
    pub fn new(active: SortType) -> Self {
        Self { active }
    }
}

impl Template for SortView {
    fn template(&self) -> String {
        let items: String = SortType::all()
            .iter()
            .map(|&sort| {
                let value = sort.input_value();
                let checked = if sort == self.active { " checked" } else { "" };
                format!(
                    "<div class=\"trip-sort__item trip-sort__item--{value}\">\
                     <input id=\"{value}\" class=\"trip-sort__input visually-hidden\" type=\"radio\" \
                     name=\"trip-sort\" value=\"{value}\"{checked}>\
                     <label class=\"trip-sort__btn\" for=\"{value}\">{}</label></div>",
                    sort.label()
                )
            })
            .collect();
        format!(
            "<form class=\"trip-events__trip-sort trip-sort\" action=\"#\" method=\"get\">\
             <span class=\"trip-sort__item trip-sort__item--event\">Event</span>{items}\
             <span class=\"trip-sort__item trip-sort__item--offer\">Offers</span></form>"
        )
    }
}
