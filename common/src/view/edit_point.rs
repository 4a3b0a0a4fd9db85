use super::Template;
use crate::catalog::Catalogs;
use crate::dom::DomEvent;
use crate::format::{escape_html, format_input_date, parse_input_date};
use crate::point::{Destination, Point, PointType};

/// Whether the form edits an existing point or creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Editing,
    Creating,
}

/// A single field edit coming from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormChange {
    Type(PointType),
    Destination(String),
    StartTime(String),
    EndTime(String),
    Price(String),
    Offer { id: u32, checked: bool },
}

impl FormChange {
    const OFFER_PREFIX: &'static str = "event-offer-";

    /// Map a `change` event from the form to a field edit.
    pub fn from_event(event: &DomEvent) -> Option<FormChange> {
        let name = event.target_name.as_deref()?;
        let value = event.value.clone().unwrap_or_default();
        match name {
            "event-type" => PointType::from_slug(&value).map(FormChange::Type),
            "event-destination" => Some(FormChange::Destination(value)),
            "event-start-time" => Some(FormChange::StartTime(value)),
            "event-end-time" => Some(FormChange::EndTime(value)),
            "event-price" => Some(FormChange::Price(value)),
            _ => {
                let id = name.strip_prefix(Self::OFFER_PREFIX)?.parse().ok()?;
                Some(FormChange::Offer {
                    id,
                    checked: event.checked,
                })
            }
        }
    }
}

/// Edit form with a local draft of the point.
pub struct EditPointView {
    draft: Point,
    catalogs: Catalogs,
    mode: FormMode,
    date_format: &'static str,
}

impl EditPointView {
    pub const FORM: &'static str = ".event--edit";
    pub const ROLLUP: &'static str = ".event__rollup-btn";
    pub const RESET: &'static str = ".event__reset-btn";

    pub fn new(point: Point, catalogs: Catalogs, mode: FormMode, date_format: &'static str) -> Self {
        Self {
            draft: point,
            catalogs,
            mode,
            date_format,
        }
    }

    pub fn draft(&self) -> &Point {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Drop unsaved edits.
    pub fn reset(&mut self, point: &Point) {
        self.draft = point.clone();
    }

    /// The draft can be saved once it names a known destination.
    pub fn is_submittable(&self) -> bool {
        self.catalogs
            .destinations
            .find(&self.draft.destination.name)
            .is_some()
    }

    /// Apply a field edit to the draft. Returns `true` when the form must be
    /// re-rendered to show the result.
    pub fn apply(&mut self, change: FormChange) -> bool {
        match change {
            FormChange::Type(kind) => {
                if kind == self.draft.kind {
                    return false;
                }
                self.draft.kind = kind;
                self.draft.offers.clear();
                true
            }
            FormChange::Destination(name) => {
                self.draft.destination = match self.catalogs.destinations.find(&name) {
                    Some(destination) => destination.clone(),
                    None => Destination {
                        name,
                        ..Default::default()
                    },
                };
                true
            }
            FormChange::StartTime(value) => {
                let Some(start) = parse_input_date(&value, self.date_format) else {
                    tracing::warn!("ignoring malformed start time {value:?}");
                    return true;
                };
                self.draft.start_time = start;
                if self.draft.end_time < start {
                    self.draft.end_time = start;
                    return true;
                }
                false
            }
            FormChange::EndTime(value) => {
                let Some(end) = parse_input_date(&value, self.date_format) else {
                    tracing::warn!("ignoring malformed end time {value:?}");
                    return true;
                };
                if end < self.draft.start_time {
                    self.draft.end_time = self.draft.start_time;
                    return true;
                }
                self.draft.end_time = end;
                false
            }
            FormChange::Price(value) => match value.trim().parse::<u32>() {
                Ok(price) => {
                    self.draft.price = price;
                    false
                }
                Err(_) => {
                    tracing::warn!("ignoring malformed price {value:?}");
                    true
                }
            },
            FormChange::Offer { id, checked } => {
                if checked {
                    if !self.draft.has_offer(id) {
                        if let Some(offer) = self.catalogs.offers.find(self.draft.kind, id) {
                            self.draft.offers.push(offer.clone());
                        }
                    }
                } else {
                    self.draft.offers.retain(|o| o.id != id);
                }
                false
            }
        }
    }

    fn type_list(&self) -> String {
        PointType::all()
            .iter()
            .map(|&kind| {
                let slug = kind.slug();
                let checked = if kind == self.draft.kind { " checked" } else { "" };
                format!(
                    "<div class=\"event__type-item\">\
                     <input id=\"event-type-{slug}\" class=\"event__type-input visually-hidden\" \
                     type=\"radio\" name=\"event-type\" value=\"{slug}\"{checked}>\
                     <label class=\"event__type-label event__type-label--{slug}\" for=\"event-type-{slug}\">{}</label>\
                     </div>",
                    kind.label()
                )
            })
            .collect()
    }

    fn offers_section(&self) -> String {
        let available = self.catalogs.offers.for_type(self.draft.kind);
        if available.is_empty() {
            return String::new();
        }
        let items: String = available
            .iter()
            .map(|offer| {
                let checked = if self.draft.has_offer(offer.id) { " checked" } else { "" };
                format!(
                    "<div class=\"event__offer-selector\">\
                     <input class=\"event__offer-checkbox visually-hidden\" id=\"event-offer-{id}\" \
                     type=\"checkbox\" name=\"event-offer-{id}\"{checked}>\
                     <label class=\"event__offer-label\" for=\"event-offer-{id}\">\
                     <span class=\"event__offer-title\">{title}</span>\
                     &plus;&euro;&nbsp;<span class=\"event__offer-price\">{price}</span></label></div>",
                    id = offer.id,
                    title = escape_html(&offer.title),
                    price = offer.price,
                )
            })
            .collect();
        format!(
            "<section class=\"event__section event__section--offers\">\
             <h3 class=\"event__section-title event__section-title--offers\">Offers</h3>\
             <div class=\"event__available-offers\">{items}</div></section>"
        )
    }

    fn destination_section(&self) -> String {
        let destination = &self.draft.destination;
        if destination.description.is_empty() && destination.pictures.is_empty() {
            return String::new();
        }
        let pictures: String = destination
            .pictures
            .iter()
            .map(|p| {
                format!(
                    "<img class=\"event__photo\" src=\"{}\" alt=\"{}\">",
                    escape_html(&p.src),
                    escape_html(&p.description)
                )
            })
            .collect();
        format!(
            "<section class=\"event__section event__section--destination\">\
             <h3 class=\"event__section-title event__section-title--destination\">Destination</h3>\
             <p class=\"event__destination-description\">{}</p>\
             <div class=\"event__photos-container\"><div class=\"event__photos-tape\">{pictures}</div></div>\
             </section>",
            escape_html(&destination.description)
        )
    }
}

impl Template for EditPointView {
    fn template(&self) -> String {
        let draft = &self.draft;
        let slug = draft.kind.slug();
        let options: String = self
            .catalogs
            .destinations
            .names()
            .map(|name| format!("<option value=\"{}\"></option>", escape_html(name)))
            .collect();
        let (reset_label, rollup) = match self.mode {
            FormMode::Editing => (
                "Delete",
                "<button class=\"event__rollup-btn\" type=\"button\"><span class=\"visually-hidden\">Close event</span></button>",
            ),
            FormMode::Creating => ("Cancel", ""),
        };
        format!(
            "<li class=\"trip-events__item\">\
             <form class=\"event event--edit\" action=\"#\" method=\"post\">\
             <header class=\"event__header\">\
             <div class=\"event__type-wrapper\">\
             <label class=\"event__type event__type-btn\" for=\"event-type-toggle\">\
             <span class=\"visually-hidden\">Choose event type</span>\
             <img class=\"event__type-icon\" width=\"17\" height=\"17\" src=\"img/icons/{slug}.png\" alt=\"Event type icon\">\
             </label>\
             <input class=\"event__type-toggle visually-hidden\" id=\"event-type-toggle\" type=\"checkbox\">\
             <div class=\"event__type-list\"><fieldset class=\"event__type-group\">\
             <legend class=\"visually-hidden\">Event type</legend>{types}</fieldset></div>\
             </div>\
             <div class=\"event__field-group event__field-group--destination\">\
             <label class=\"event__label event__type-output\" for=\"event-destination\">{label}</label>\
             <input class=\"event__input event__input--destination\" id=\"event-destination\" type=\"text\" \
             name=\"event-destination\" value=\"{destination}\" list=\"destination-list\">\
             <datalist id=\"destination-list\">{options}</datalist>\
             </div>\
             <div class=\"event__field-group event__field-group--time\">\
             <input class=\"event__input event__input--time\" id=\"event-start-time\" type=\"text\" \
             name=\"event-start-time\" value=\"{start}\">&mdash;\
             <input class=\"event__input event__input--time\" id=\"event-end-time\" type=\"text\" \
             name=\"event-end-time\" value=\"{end}\">\
             </div>\
             <div class=\"event__field-group event__field-group--price\">\
             <label class=\"event__label\" for=\"event-price\"><span class=\"visually-hidden\">Price</span>&euro;</label>\
             <input class=\"event__input event__input--price\" id=\"event-price\" type=\"number\" min=\"0\" \
             name=\"event-price\" value=\"{price}\">\
             </div>\
             <button class=\"event__save-btn btn btn--blue\" type=\"submit\"{save_disabled}>Save</button>\
             <button class=\"event__reset-btn\" type=\"reset\">{reset_label}</button>\
             {rollup}\
             </header>\
             <section class=\"event__details\">{offers}{destination_section}</section>\
             </form></li>",
            types = self.type_list(),
            label = draft.kind.label(),
            destination = escape_html(&draft.destination.name),
            start = format_input_date(draft.start_time, self.date_format),
            end = format_input_date(draft.end_time, self.date_format),
            price = draft.price,
            save_disabled = if self.is_submittable() { "" } else { " disabled" },
            offers = self.offers_section(),
            destination_section = self.destination_section(),
        )
    }
}
