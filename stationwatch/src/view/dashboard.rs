//! Dashboard view showing every server listed on the hub.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use iced::widget::{Column, button, column, container, row, rule, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use stationwatch_common::{GameServer, Preferences, format_relative_time, parse_as_utc};

use crate::message::{Message, ServerTarget};
use crate::view::components::{StatusLedState, Trend, status_led};

/// How many per-refresh player samples to keep for the row sparklines.
const TREND_CAP: usize = 120;

/// Dashboard view state.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Servers from the last successful fetch, hub order.
    pub servers: Vec<GameServer>,
    /// True until the first fetch resolves.
    pub loading: bool,
    /// Last fetch error, if any. Stale data stays visible underneath.
    pub last_error: Option<String>,
    /// Address lookup input buffer ("host:port").
    pub lookup_input: String,
    /// Session player samples per world id, fed by each refresh.
    trends: HashMap<u64, Vec<f64>>,
}

impl DashboardState {
    /// Create a dashboard in its initial loading state.
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Apply a server list fetch result.
    pub fn apply(&mut self, result: Result<Vec<GameServer>, String>) {
        self.loading = false;
        match result {
            Ok(servers) => {
                self.last_error = None;
                self.record_trends(&servers);
                self.servers = servers;
            }
            Err(error) => {
                self.last_error = Some(error);
            }
        }
    }

    /// Append the fetched player counts to the per-server trends.
    fn record_trends(&mut self, servers: &[GameServer]) {
        for server in servers {
            let trend = self.trends.entry(server.world_id).or_default();
            trend.push(server.players as f64);
            if trend.len() > TREND_CAP {
                trend.remove(0);
            }
        }

        // Servers that fell off the hub list take their trend with them
        self.trends
            .retain(|id, _| servers.iter().any(|s| s.world_id == *id));
    }

    /// Session trend samples for one server.
    pub fn trend(&self, world_id: u64) -> Option<&[f64]> {
        self.trends.get(&world_id).map(Vec::as_slice)
    }

    /// Servers to display, busiest first. Rank is the index plus one.
    pub fn visible_servers(&self, show_offline: bool) -> Vec<&GameServer> {
        let mut servers: Vec<_> = self
            .servers
            .iter()
            .filter(|s| s.online || show_offline)
            .collect();
        servers.sort_by(|a, b| b.players.cmp(&a.players));
        servers
    }

    /// Total players across all listed servers.
    pub fn total_players(&self) -> u64 {
        self.servers.iter().map(|s| s.players as u64).sum()
    }
}

/// Classify a server for its status LED.
pub fn liveness(server: &GameServer, stale_secs: i64) -> StatusLedState {
    liveness_at(server, stale_secs, Utc::now())
}

/// Clock-parameterised core of [`liveness`].
fn liveness_at(server: &GameServer, stale_secs: i64, now: DateTime<Utc>) -> StatusLedState {
    if !server.online {
        return StatusLedState::Offline;
    }
    match parse_as_utc(&server.updated_at) {
        Ok(updated) if (now - updated).num_seconds() > stale_secs => StatusLedState::Stale,
        Ok(_) => StatusLedState::Online,
        Err(_) => StatusLedState::Unknown,
    }
}

/// Render the dashboard view.
pub fn dashboard_view<'a>(
    state: &'a DashboardState,
    prefs: &Preferences,
    stale_secs: i64,
) -> Element<'a, Message> {
    let header = render_header(state);
    let totals = render_totals(state);
    let controls = render_controls(state, prefs);
    let servers = render_server_list(state, prefs, stale_secs);

    let content = column![header, totals, controls, rule::horizontal(1), servers]
        .spacing(10)
        .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the header with navigation and the error line.
fn render_header(state: &DashboardState) -> Element<'_, Message> {
    let title = text("StationWatch").size(24);

    let stats_button = button(text("Global Stats").size(14))
        .on_press(Message::OpenGlobalStats)
        .style(iced::widget::button::secondary);

    let settings_button = button(text("Settings").size(14))
        .on_press(Message::OpenSettings)
        .style(iced::widget::button::secondary);

    let refresh_button = button(text("Refresh").size(14))
        .on_press(Message::Refresh)
        .style(iced::widget::button::secondary);

    let header_row = row![title, refresh_button, stats_button, settings_button]
        .spacing(20)
        .align_y(Alignment::Center);

    let mut header_col = Column::new().push(header_row);

    if let Some(ref error) = state.last_error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|_theme: &Theme| text::Style {
                color: Some(iced::Color::from_rgb(0.8, 0.2, 0.2)),
            });
        header_col = header_col.push(error_text);
    }

    header_col.spacing(5).into()
}

/// Render the Servers / Players totals.
fn render_totals(state: &DashboardState) -> Element<'_, Message> {
    let value = |value: String| text(value).size(13);
    let label = |label: &'static str| {
        text(label).size(13).style(|theme: &Theme| text::Style {
            color: Some(crate::view::theme::colors(theme).text_dimmed()),
        })
    };

    let (servers, players) = if state.loading {
        ("—".to_string(), "—".to_string())
    } else {
        (
            state.servers.len().to_string(),
            state.total_players().to_string(),
        )
    };

    row![
        row![label("Servers"), value(servers)].spacing(6),
        row![label("Players"), value(players)].spacing(6),
    ]
    .spacing(30)
    .into()
}

/// Render the preference toggles and the address lookup field.
fn render_controls<'a>(state: &'a DashboardState, prefs: &Preferences) -> Element<'a, Message> {
    let toggle = |label: &'static str, active: bool, message: Message| {
        button(text(label).size(12)).on_press(message).style(if active {
            iced::widget::button::primary
        } else {
            iced::widget::button::secondary
        })
    };

    let show_status = toggle(
        "Show hub status",
        prefs.show_status,
        Message::SetShowStatus(!prefs.show_status),
    );
    let show_offline = toggle(
        "Show offline",
        prefs.show_offline,
        Message::SetShowOffline(!prefs.show_offline),
    );

    let lookup = text_input("host:port", &state.lookup_input)
        .on_input(Message::SetAddressLookup)
        .on_submit(Message::SubmitAddressLookup)
        .size(13)
        .padding(6)
        .width(Length::Fixed(200.0));

    let lookup_button = button(text("Open").size(12))
        .on_press(Message::SubmitAddressLookup)
        .style(iced::widget::button::secondary);

    row![show_status, show_offline, lookup, lookup_button]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
}

/// Render the ranked server rows.
fn render_server_list<'a>(
    state: &'a DashboardState,
    prefs: &Preferences,
    stale_secs: i64,
) -> Element<'a, Message> {
    if state.loading {
        return dim_panel("Loading servers...");
    }

    let servers = state.visible_servers(prefs.show_offline);
    if servers.is_empty() {
        return dim_panel("No servers online");
    }

    let mut rows = Column::new().spacing(8);
    for (index, server) in servers.into_iter().enumerate() {
        rows = rows.push(render_server_row(
            state,
            server,
            index + 1,
            prefs.show_status,
            stale_secs,
        ));
    }

    scrollable(rows)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render a single ranked server row.
fn render_server_row<'a>(
    state: &'a DashboardState,
    server: &'a GameServer,
    rank: usize,
    show_status: bool,
    stale_secs: i64,
) -> Element<'a, Message> {
    let rank_text = text(format!("{}", rank))
        .size(14)
        .style(|theme: &Theme| text::Style {
            color: Some(crate::view::theme::colors(theme).text_dimmed()),
        })
        .width(Length::Fixed(28.0));

    let led = status_led(liveness(server, stale_secs));

    // The hub status line carries markup; strip it before display
    let display_name = if show_status {
        let cleaned = crate::view::formatting::clean_status(&server.status);
        if cleaned.is_empty() {
            server.name.clone()
        } else {
            cleaned
        }
    } else {
        server.name.clone()
    };
    let name = text(display_name).size(14).width(Length::Fill);

    let players = text(format!("{} players", server.players)).size(13);

    let trend: Element<'_, Message> = match state.trend(server.world_id) {
        Some(samples) if samples.len() >= 2 => Trend::new(samples.to_vec()).view(),
        _ => text("").width(Length::Fixed(80.0)).into(),
    };

    let updated = parse_as_utc(&server.updated_at)
        .map(format_relative_time)
        .unwrap_or_else(|_| "?".to_string());
    let updated_text = text(updated).size(11).style(|theme: &Theme| text::Style {
        color: Some(crate::view::theme::colors(theme).text_dimmed()),
    });

    let history_button = button(text("History").size(12))
        .on_press(Message::OpenServer(ServerTarget::from_server(server)))
        .style(iced::widget::button::secondary);

    let connect_button = button(text("Connect").size(12))
        .on_press(Message::CopyConnectUrl(server.connect_url()))
        .style(iced::widget::button::primary);

    let content = row![
        rank_text,
        led,
        name,
        players,
        trend,
        updated_text,
        history_button,
        connect_button,
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(content)
        .padding(10)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let colors = crate::view::theme::colors(theme);
            container::Style {
                background: Some(iced::Background::Color(colors.row_background())),
                border: iced::Border {
                    color: colors.border_subtle(),
                    width: 1.0,
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

/// A dim placeholder panel for the list area.
fn dim_panel(message: &str) -> Element<'_, Message> {
    container(
        text(message).size(14).style(|theme: &Theme| text::Style {
            color: Some(crate::view::theme::colors(theme).text_dimmed()),
        }),
    )
    .padding(15)
    .width(Length::Fill)
    .style(|theme: &Theme| {
        let colors = crate::view::theme::colors(theme);
        container::Style {
            background: Some(iced::Background::Color(colors.row_background())),
            border: iced::Border {
                color: colors.border_subtle(),
                width: 1.0,
                radius: 6.0.into(),
            },
            ..Default::default()
        }
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn server(world_id: u64, players: u32, online: bool) -> GameServer {
        GameServer {
            address: format!("game{}.example.com:2506", world_id),
            world_id,
            name: format!("Server {}", world_id),
            description: String::new(),
            status: String::new(),
            topic_status: None,
            players,
            updated_at: "2026-02-03T12:00:00Z".to_string(),
            online,
        }
    }

    #[test]
    fn apply_sorts_and_ranks_by_players() {
        let mut state = DashboardState::new();
        assert!(state.loading);

        state.apply(Ok(vec![server(1, 5, true), server(2, 80, true), server(3, 12, true)]));

        assert!(!state.loading);
        let visible = state.visible_servers(true);
        let ids: Vec<u64> = visible.iter().map(|s| s.world_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn offline_servers_hidden_unless_requested() {
        let mut state = DashboardState::new();
        state.apply(Ok(vec![server(1, 5, true), server(2, 0, false)]));

        assert_eq!(state.visible_servers(false).len(), 1);
        assert_eq!(state.visible_servers(true).len(), 2);
    }

    #[test]
    fn totals_count_all_listed_servers() {
        let mut state = DashboardState::new();
        state.apply(Ok(vec![server(1, 5, true), server(2, 7, false)]));

        assert_eq!(state.total_players(), 12);
    }

    #[test]
    fn fetch_error_keeps_previous_servers() {
        let mut state = DashboardState::new();
        state.apply(Ok(vec![server(1, 5, true)]));
        state.apply(Err("timed out".to_string()));

        assert_eq!(state.servers.len(), 1);
        assert_eq!(state.last_error.as_deref(), Some("timed out"));
    }

    #[test]
    fn trends_accumulate_and_prune() {
        let mut state = DashboardState::new();
        state.apply(Ok(vec![server(1, 5, true), server(2, 9, true)]));
        state.apply(Ok(vec![server(1, 6, true)]));

        assert_eq!(state.trend(1), Some(&[5.0, 6.0][..]));
        assert!(state.trend(2).is_none());
    }

    #[test]
    fn liveness_tracks_age_and_online_flag() {
        let now = chrono::Utc.with_ymd_and_hms(2026, 2, 3, 12, 4, 0).unwrap();

        let fresh = server(1, 5, true);
        assert_eq!(liveness_at(&fresh, 300, now), StatusLedState::Online);

        // 240 s old at a 120 s threshold
        assert_eq!(liveness_at(&fresh, 120, now), StatusLedState::Stale);

        let offline = server(2, 0, false);
        assert_eq!(liveness_at(&offline, 300, now), StatusLedState::Offline);

        let mut garbled = server(3, 1, true);
        garbled.updated_at = "not a timestamp".to_string();
        assert_eq!(liveness_at(&garbled, 300, now), StatusLedState::Unknown);
    }
}
