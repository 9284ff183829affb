use ratatui::style::Style;

/// One line of command feedback in the messages pane.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub style: Style,
}

impl Notice {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}
