//! Global statistics view, aggregated across every server on the hub.

use iced::widget::{button, column, scrollable, text};
use iced::{Element, Length};

use crate::message::Message;
use crate::view::overview::{StatsSectionState, stats_section};

/// Render the global statistics view.
pub fn global_stats_view(state: &StatsSectionState) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::OpenDashboard)
        .style(iced::widget::button::secondary);

    let title = text("Global Statistics").size(24);

    let content = column![back_button, title, stats_section(state)]
        .spacing(10)
        .padding(20);

    scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
