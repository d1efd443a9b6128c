//! Server detail view: live round info plus per-server player stats.

use iced::widget::{Column, Row, button, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use stationwatch_common::{
    GameServer, TopicStatus, format_duration_deciseconds, format_shuttle_timer,
};

use crate::message::{Message, ServerTarget};
use crate::view::formatting::capitalize_first;
use crate::view::overview::{StatsSectionState, stats_section};

/// Server detail view state.
#[derive(Debug)]
pub struct ServerDetailState {
    /// How this server was addressed (row click or address lookup).
    pub target: ServerTarget,
    /// The fetched server record, if it arrived.
    pub server: Option<GameServer>,
    /// Last server fetch error, if any.
    pub error: Option<String>,
    /// Whether the raw topic data panel is expanded.
    pub show_raw_topic: bool,
    /// Period-driven stats section.
    pub stats: StatsSectionState,
}

impl ServerDetailState {
    /// Create a detail view for the given target.
    pub fn new(target: ServerTarget) -> Self {
        Self {
            target,
            server: None,
            error: None,
            show_raw_topic: false,
            stats: StatsSectionState::new(),
        }
    }

    /// Apply a server fetch result.
    pub fn apply_server(&mut self, result: Result<GameServer, String>) {
        match result {
            Ok(server) => {
                self.error = None;
                self.server = Some(server);
            }
            Err(error) => {
                self.error = Some(error);
            }
        }
    }

    /// Flip the raw topic data panel.
    pub fn toggle_raw_topic(&mut self) {
        self.show_raw_topic = !self.show_raw_topic;
    }
}

/// Render the server detail view.
pub fn server_view(state: &ServerDetailState) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::OpenDashboard)
        .style(iced::widget::button::secondary);

    let mut content = Column::new()
        .push(back_button)
        .push(render_header(state))
        .spacing(10)
        .padding(20);

    if let Some(topic) = state.server.as_ref().and_then(|s| s.topic_status.as_ref()) {
        if topic.has_round_info() {
            content = content.push(render_topic_panel(topic, state.show_raw_topic));
        }
    }

    content = content
        .push(rule::horizontal(1))
        .push(stats_section(&state.stats));

    scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the name header and player/admin lines.
fn render_header(state: &ServerDetailState) -> Element<'_, Message> {
    let name = state
        .server
        .as_ref()
        .map(|s| s.name.as_str())
        .unwrap_or("Server Info");

    let mut header = Column::new().push(text(name).size(24)).spacing(4);

    if let Some(server) = &state.server {
        let popcap = server
            .topic_status
            .as_ref()
            .and_then(|t| t.popcap)
            .map(|cap| format!("/{}", cap))
            .unwrap_or_default();
        let players_line = text(format!("{}{} players online", server.players, popcap))
            .size(13)
            .style(dim_text);
        header = header.push(players_line);

        let admins = server.topic_status.as_ref().and_then(|t| t.admins);
        if let Some(admins) = admins.filter(|&n| n != 0) {
            let admins_line = text(format!("{} admins online", admins))
                .size(13)
                .style(dim_text);
            header = header.push(admins_line);
        }

        let connect_button = button(text("Connect").size(12))
            .on_press(Message::CopyConnectUrl(server.connect_url()))
            .style(iced::widget::button::primary);
        header = header.push(connect_button);
    }

    if let Some(error) = &state.error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|theme: &Theme| text::Style {
                color: Some(crate::view::theme::colors(theme).danger()),
            });
        header = header.push(error_text);
    }

    header.into()
}

/// Render the round info panel with the raw data toggle.
fn render_topic_panel(topic: &TopicStatus, show_raw: bool) -> Element<'_, Message> {
    let mut items: Vec<Element<'_, Message>> = Vec::new();

    for badge in version_badges(topic) {
        items.push(render_badge(badge));
    }

    if let Some(mode) = topic.mode.as_deref().filter(|m| !m.is_empty()) {
        items.push(stat_item("Mode", capitalize_first(mode)));
    }

    if let Some(map) = topic.map_display() {
        items.push(stat_item("Map", map.to_string()));
    }

    if let Some(round_id) = topic.round_id.filter(|&id| id != 0) {
        items.push(stat_item("Round", format!("#{}", round_id)));
    }

    if let Some(duration) = topic.round_duration {
        items.push(stat_item("Duration", format_duration_deciseconds(duration)));
    }

    if let Some(level) = topic.security_level {
        let value = text(level.label())
            .size(13)
            .style(move |theme: &Theme| text::Style {
                color: Some(crate::view::theme::colors(theme).security(level)),
            });
        items.push(
            row![
                text("Security").size(13).style(dim_text),
                value,
            ]
            .spacing(6)
            .into(),
        );
    }

    if let Some(shuttle) = topic.shuttle_mode {
        let mut label = shuttle.label().to_string();
        if shuttle.has_timer() {
            if let Some(timer) = topic.shuttle_timer {
                label = format!("{} {}", label, format_shuttle_timer(timer));
            }
        }
        items.push(stat_item("Shuttle", label));
    }

    let stats_row = Row::with_children(items)
        .spacing(25)
        .align_y(Alignment::Center);

    let raw_toggle = button(text(if show_raw { "Hide raw" } else { "Raw" }).size(11))
        .on_press(Message::ToggleRawTopic)
        .style(iced::widget::button::secondary);

    let top_row = row![stats_row, raw_toggle]
        .spacing(15)
        .align_y(Alignment::Center);

    let mut panel = Column::new().push(top_row).spacing(10);

    if show_raw {
        panel = panel.push(render_raw_topic(topic));
    }

    container(panel)
        .padding(15)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let colors = crate::view::theme::colors(theme);
            container::Style {
                background: Some(iced::Background::Color(colors.card_background())),
                border: iced::Border {
                    color: colors.border(),
                    width: 1.0,
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// Render the pretty-printed topic payload.
fn render_raw_topic(topic: &TopicStatus) -> Element<'_, Message> {
    let raw = serde_json::to_string_pretty(topic)
        .unwrap_or_else(|_| "<unserializable topic data>".to_string());

    container(text(raw).size(11))
        .padding(10)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let colors = crate::view::theme::colors(theme);
            container::Style {
                background: Some(iced::Background::Color(colors.background_weak())),
                border: iced::Border {
                    color: colors.border_subtle(),
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// Codebase badges recognised from the reported version string.
fn version_badges(topic: &TopicStatus) -> Vec<&'static str> {
    let mut badges = Vec::new();
    if let Some(version) = topic.version.as_deref() {
        if version.contains("/tg/") {
            badges.push("tg");
        }
        if version.contains("Goonstation 13") {
            badges.push("goon");
        }
    }
    badges
}

/// A small bordered codebase badge.
fn render_badge(label: &'static str) -> Element<'static, Message> {
    container(text(label).size(11))
        .padding([2, 8])
        .style(|theme: &Theme| {
            let colors = crate::view::theme::colors(theme);
            container::Style {
                background: Some(iced::Background::Color(colors.background_weak())),
                border: iced::Border {
                    color: colors.primary(),
                    width: 1.0,
                    radius: 10.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// A labeled value in the round info panel.
fn stat_item(label: &'static str, value: String) -> Element<'static, Message> {
    row![
        text(label).size(13).style(dim_text),
        text(value).size(13),
    ]
    .spacing(6)
    .into()
}

fn dim_text(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(crate::view::theme::colors(theme).text_dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stationwatch_common::{SecurityLevel, ShuttleMode};

    fn topic() -> TopicStatus {
        TopicStatus {
            mode: Some("extended".to_string()),
            map_name: Some("MetaStation".to_string()),
            map: None,
            public_address: None,
            round_id: Some(4821),
            round_duration: Some(54000.0),
            security_level: Some(SecurityLevel::Blue),
            version: Some("/tg/station revision 1234".to_string()),
            popcap: Some(90),
            admins: Some(3),
            shuttle_mode: Some(ShuttleMode::Called),
            shuttle_timer: Some(125.0),
        }
    }

    #[test]
    fn badges_detected_from_version() {
        let mut t = topic();
        assert_eq!(version_badges(&t), vec!["tg"]);

        t.version = Some("Goonstation 13 build".to_string());
        assert_eq!(version_badges(&t), vec!["goon"]);

        t.version = None;
        assert!(version_badges(&t).is_empty());
    }

    #[test]
    fn apply_server_keeps_data_on_error() {
        let mut state = ServerDetailState::new(ServerTarget::Id(7));
        state.apply_server(Ok(GameServer {
            address: "game.example.com:2506".to_string(),
            world_id: 7,
            name: "Box".to_string(),
            description: String::new(),
            status: String::new(),
            topic_status: Some(topic()),
            players: 42,
            updated_at: "2026-02-03T12:00:00Z".to_string(),
            online: true,
        }));
        state.apply_server(Err("gateway timeout".to_string()));

        assert!(state.server.is_some());
        assert_eq!(state.error.as_deref(), Some("gateway timeout"));
    }

    #[test]
    fn raw_topic_toggles() {
        let mut state = ServerDetailState::new(ServerTarget::Id(7));
        assert!(!state.show_raw_topic);
        state.toggle_raw_topic();
        assert!(state.show_raw_topic);
        state.toggle_raw_topic();
        assert!(!state.show_raw_topic);
    }
}
