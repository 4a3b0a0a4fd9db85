use super::Template;

/// The "New event" trigger in the page header.
pub struct NewButtonView {
    pub disabled: bool,
}

impl NewButtonView {
    pub fn new(disabled: bool) -> Self {
        Self { disabled }
    }
}

impl Template for NewButtonView {
    fn template(&self) -> String {
        let disabled = if self.disabled { " disabled" } else { "" };
        format!(
            "<button class=\"trip-main__event-add-btn btn btn--big btn--yellow\" type=\"button\"{disabled}>New event</button>"
        )
    }
}
