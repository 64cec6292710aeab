use iced::{
    widget::{column, text, Space},
    Element, Length,
};

/// The loading screen: a heading, the status line the loader writes into, and
/// a detail line for the final outcome.
pub struct LoadingView {
    pub status_message: String,
    pub detail: String,
    pub failed: bool,
}

impl Default for LoadingView {
    fn default() -> Self {
        Self {
            status_message: "Preparing download...".to_string(),
            detail: String::new(),
            failed: false,
        }
    }
}

impl LoadingView {
    pub fn view<'a, Message: 'a>(&'a self) -> Element<'a, Message> {
        let heading = if self.failed {
            "Loading failed"
        } else {
            "Loading"
        };

        column![
            text(heading).size(32),
            Space::new().height(Length::Fixed(20.0)),
            text(&self.status_message).size(16),
            text(&self.detail).size(12),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
