//! UI tests using iced_test Simulator.
//!
//! These tests verify the view behavior without any hub connection.

use iced_test::simulator;

use stationwatch::message::{Message, ServerTarget};
use stationwatch::mock;
use stationwatch::view::dashboard::{DashboardState, dashboard_view};
use stationwatch::view::overview::StatsSectionState;
use stationwatch::view::server::{ServerDetailState, server_view};
use stationwatch::view::settings::{SettingsState, settings_view};
use stationwatch::view::stats::global_stats_view;

use stationwatch_common::{GameServer, Period, Preferences};

/// Two fixed servers so counts and totals are predictable.
fn sample_servers() -> Vec<GameServer> {
    vec![
        mock::game_server(1, "Paradise Station", 64),
        mock::game_server(2, "Goonstation Classic", 41),
    ]
}

fn loaded_dashboard() -> DashboardState {
    let mut state = DashboardState::new();
    state.apply(Ok(sample_servers()));
    state
}

/// Test that the dashboard shows its loading placeholder at first.
#[test]
fn test_dashboard_loading() {
    let state = DashboardState::new();
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    assert!(ui.find("Loading servers...").is_ok());
}

/// Test that an empty server list shows the placeholder panel.
#[test]
fn test_dashboard_empty() {
    let mut state = DashboardState::new();
    state.apply(Ok(vec![]));
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    assert!(ui.find("No servers online").is_ok());
}

/// Test that the dashboard shows servers and totals when populated.
#[test]
fn test_dashboard_with_servers() {
    let state = loaded_dashboard();
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    // Server rows
    assert!(ui.find("Paradise Station").is_ok());
    assert!(ui.find("Goonstation Classic").is_ok());
    assert!(ui.find("64 players").is_ok());
    // Totals row sums both servers
    assert!(ui.find("105").is_ok());
}

/// Test that a fetch error is shown while stale data stays up.
#[test]
fn test_dashboard_error_line() {
    let mut state = loaded_dashboard();
    state.apply(Err("connection refused".to_string()));
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    assert!(ui.find("Error: connection refused").is_ok());
    // Previous data is still listed
    assert!(ui.find("Paradise Station").is_ok());
}

/// Test that the status preference swaps names for hub status lines.
#[test]
fn test_dashboard_status_lines() {
    let mut state = DashboardState::new();
    let mut server = mock::game_server(3, "CM-SS13", 88);
    server.status = "<b>Colonial Marines</b> | Distress: LV-624".to_string();
    state.apply(Ok(vec![server]));

    let prefs = Preferences {
        show_status: true,
        show_offline: true,
    };
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    // Markup is stripped and the status replaces the name
    assert!(ui.find("Colonial Marines | Distress: LV-624").is_ok());
    assert!(ui.find("CM-SS13").is_err());
}

/// Test clicking the Global Stats button.
#[test]
fn test_dashboard_global_stats_button() {
    let state = loaded_dashboard();
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    let _ = ui.click("Global Stats");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::OpenGlobalStats)));
}

/// Test clicking the Settings button.
#[test]
fn test_dashboard_settings_button() {
    let state = loaded_dashboard();
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    let _ = ui.click("Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::OpenSettings)));
}

/// Test clicking a row's History button.
#[test]
fn test_dashboard_history_button() {
    let mut state = DashboardState::new();
    state.apply(Ok(vec![mock::game_server(1, "Paradise Station", 64)]));
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    let _ = ui.click("History");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::OpenServer(ServerTarget::Id(1))))
    );
}

/// Test clicking a row's Connect button copies the byond:// URL.
#[test]
fn test_dashboard_connect_button() {
    let mut state = DashboardState::new();
    state.apply(Ok(vec![mock::game_server(1, "Paradise Station", 64)]));
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    let _ = ui.click("Connect");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| {
        matches!(m, Message::CopyConnectUrl(url) if url == "byond://BYOND.world.1")
    }));
}

/// Test the offline toggle emits the flipped preference.
#[test]
fn test_dashboard_offline_toggle() {
    let state = loaded_dashboard();
    let prefs = Preferences::default();
    let mut ui = simulator(dashboard_view(&state, &prefs, 300));

    let _ = ui.click("Show offline");

    // Default is on, so clicking turns it off
    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::SetShowOffline(false)))
    );
}

/// Test the server detail header before any data arrives.
#[test]
fn test_server_view_placeholder() {
    let state = ServerDetailState::new(ServerTarget::Id(1));
    let mut ui = simulator(server_view(&state));

    assert!(ui.find("Server Info").is_ok());
    assert!(ui.find("<- Back").is_ok());
    assert!(ui.find("Loading stats...").is_ok());
}

/// Test the round info panel once a server with topic data arrives.
#[test]
fn test_server_view_round_info() {
    let mut state = ServerDetailState::new(ServerTarget::Id(1));
    let mut server = mock::game_server(1, "Paradise Station", 64);
    let mut topic = mock::tg_topic(90);
    topic.round_id = Some(4821);
    topic.shuttle_timer = Some(125.0);
    topic.shuttle_mode = Some(stationwatch_common::ShuttleMode::Called);
    server.topic_status = Some(topic);
    state.apply_server(Ok(server));

    let mut ui = simulator(server_view(&state));

    assert!(ui.find("Paradise Station").is_ok());
    // popcap 90 from the tg topic
    assert!(ui.find("64/90 players online").is_ok());
    assert!(ui.find("3 admins online").is_ok());
    assert!(ui.find("MetaStation").is_ok());
    assert!(ui.find("Dynamic").is_ok());
    assert!(ui.find("#4821").is_ok());
    // 90 minutes reported as deciseconds
    assert!(ui.find("1h 30m").is_ok());
    assert!(ui.find("Blue").is_ok());
    assert!(ui.find("Called 2:05").is_ok());
    // Codebase badge from the version string
    assert!(ui.find("tg").is_ok());
}

/// Test clicking Back in the server view.
#[test]
fn test_server_view_back_button() {
    let state = ServerDetailState::new(ServerTarget::Id(1));
    let mut ui = simulator(server_view(&state));

    let _ = ui.click("<- Back");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::OpenDashboard)));
}

/// Test toggling the raw topic panel.
#[test]
fn test_server_view_raw_toggle() {
    let mut state = ServerDetailState::new(ServerTarget::Id(1));
    let mut server = mock::game_server(1, "Paradise Station", 64);
    server.topic_status = Some(mock::tg_topic(90));
    state.apply_server(Ok(server));

    let mut ui = simulator(server_view(&state));

    let _ = ui.click("Raw");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::ToggleRawTopic)));
}

/// Test clicking a period button in the stats section.
#[test]
fn test_server_view_period_button() {
    let state = ServerDetailState::new(ServerTarget::Id(1));
    let mut ui = simulator(server_view(&state));

    let _ = ui.click("month");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(
        messages
            .iter()
            .any(|m| matches!(m, Message::SetPeriod(Period::Month)))
    );
}

/// Test the global stats screen while loading.
#[test]
fn test_global_stats_loading() {
    let state = StatsSectionState::new();
    let mut ui = simulator(global_stats_view(&state));

    assert!(ui.find("Global Statistics").is_ok());
    assert!(ui.find("Loading stats...").is_ok());
}

/// Test the global stats screen with data.
#[test]
fn test_global_stats_populated() {
    let mut state = StatsSectionState::new();
    state.apply(Ok(mock::period_stats(Period::Week, 40.0)));

    let mut ui = simulator(global_stats_view(&state));

    assert!(ui.find("Avg Players").is_ok());
    assert!(ui.find("Records").is_ok());
    assert!(ui.find("Player History").is_ok());
    assert!(ui.find("Players by Day").is_ok());
    assert!(ui.find("Players by Hour").is_ok());
}

/// Test the global stats screen after a fetch failure.
#[test]
fn test_global_stats_error() {
    let mut state = StatsSectionState::new();
    state.apply(Err("service unavailable".to_string()));

    let mut ui = simulator(global_stats_view(&state));

    assert!(ui.find("Error: service unavailable").is_ok());
    assert!(ui.find("No data available").is_ok());
}

/// Test settings view renders correctly.
#[test]
fn test_settings_view() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    assert!(ui.find("Settings").is_ok());
    assert!(ui.find("Hub Connection").is_ok());
    assert!(ui.find("Display Settings").is_ok());
    assert!(ui.find("Save Settings").is_ok());
}

/// Test clicking Save Settings button.
#[test]
fn test_settings_save_button() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    let _ = ui.click("Save Settings");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::SaveSettings)));
}

/// Test clicking Reset to Defaults button.
#[test]
fn test_settings_reset_button() {
    let state = SettingsState::default();
    let mut ui = simulator(settings_view(&state));

    let _ = ui.click("Reset to Defaults");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert!(messages.iter().any(|m| matches!(m, Message::ResetSettings)));
}

/// Test the unsaved changes marker appears after an edit.
#[test]
fn test_settings_unsaved_marker() {
    let mut state = SettingsState::default();
    state.set_hub_url("https://hub.example.com".to_string());

    let mut ui = simulator(settings_view(&state));

    assert!(ui.find("(unsaved changes)").is_ok());
}
