//! Liveness LED shown at the head of each dashboard row.

use iced::widget::{container, row};
use iced::{Element, Length, Theme};

/// LED diameter in logical pixels.
const DIAMETER: f32 = 12.0;

/// How a server's hub record reads at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLedState {
    /// Online and recently polled.
    Online,
    /// Marked down or missing from the hub.
    Offline,
    /// Still listed, but the last update is older than the stale threshold.
    Stale,
    /// The hub record carries an unreadable timestamp.
    Unknown,
}

impl StatusLedState {
    /// LED color, resolved from the role palette.
    fn color(self, theme: &Theme) -> iced::Color {
        let colors = crate::view::theme::colors(theme);
        match self {
            StatusLedState::Online => colors.status_online(),
            StatusLedState::Offline => colors.status_offline(),
            StatusLedState::Stale => colors.status_stale(),
            StatusLedState::Unknown => colors.text_muted(),
        }
    }
}

/// A round liveness indicator, filled with the state color and ringed by
/// the standard border hairline.
pub fn status_led<'a, Message: 'a>(state: StatusLedState) -> Element<'a, Message> {
    container(row![])
        .width(Length::Fixed(DIAMETER))
        .height(Length::Fixed(DIAMETER))
        .style(move |theme: &Theme| container::Style {
            background: Some(iced::Background::Color(state.color(theme))),
            border: iced::Border {
                color: crate::view::theme::colors(theme).border(),
                width: 1.0,
                radius: (DIAMETER / 2.0).into(),
            },
            ..Default::default()
        })
        .into()
}
