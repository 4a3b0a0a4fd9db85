use super::Template;

/// Mount point for point cards and forms.
#[derive(Default)]
pub struct ListView;

impl Template for ListView {
    fn template(&self) -> String {
        "<ul class=\"trip-events__list\"></ul>".to_string()
    }
}
