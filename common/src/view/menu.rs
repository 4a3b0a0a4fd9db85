use super::Template;

/// Top-level screens reachable from the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MenuItem {
    #[default]
    Table,
    Stats,
}

impl MenuItem {
    pub fn value(self) -> &'static str {
        match self {
            MenuItem::Table => "table",
            MenuItem::Stats => "stats",
        }
    }

    pub fn from_value(value: &str) -> Option<MenuItem> {
        match value {
            "table" => Some(MenuItem::Table),
            "stats" => Some(MenuItem::Stats),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuItem::Table => "Table",
            MenuItem::Stats => "Stats",
        }
    }
}

pub struct MenuView {
    pub active: MenuItem,
}

impl MenuView {
    pub fn new(active: MenuItem) -> Self {
        Self { active }
    }
}

impl Template for MenuView {
    fn template(&self) -> String {
        let tabs: String = [MenuItem::Table, MenuItem::Stats]
            .iter()
            .map(|&item| {
                let active = if item == self.active {
                    " trip-tabs__btn--active"
                } else {
                    ""
                };
                format!(
                    "<a class=\"trip-tabs__btn{active}\" href=\"#\" data-value=\"{}\">{}</a>",
                    item.value(),
                    item.label()
                )
            })
            .collect();
        format!("<nav class=\"trip-controls__trip-tabs trip-tabs\">{tabs}</nav>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_tab_is_marked() {
        let markup = MenuView::new(MenuItem::Stats).template();
        assert!(markup.contains("trip-tabs__btn trip-tabs__btn--active\" href=\"#\" data-value=\"stats\""));
        assert!(markup.contains("trip-tabs__btn\" href=\"#\" data-value=\"table\""));
    }
}
