//! StationWatch Iced application.

use std::path::PathBuf;
use std::time::Duration;

use iced::{Element, Subscription, Task, Theme};

use stationwatch_common::{
    AppConfig, HubClient, HubConfig, Period, Preferences, load_config, save_config,
};

use crate::demo::DemoSimulator;
use crate::fetch;
use crate::message::{Message, ServerTarget};
use crate::view::dashboard::{DashboardState, dashboard_view};
use crate::view::overview::StatsSectionState;
use crate::view::server::{ServerDetailState, server_view};
use crate::view::settings::{SettingsState, settings_view};
use crate::view::stats::global_stats_view;

/// Shown when the hub client could not be constructed at startup.
const NO_CLIENT: &str = "hub client unavailable, check the hub URL in Settings";

/// Which screen is currently shown.
enum Screen {
    Dashboard,
    Server(ServerDetailState),
    GlobalStats(StatsSectionState),
    Settings(SettingsState),
}

/// The main StationWatch application.
pub struct StationWatch {
    /// Loaded configuration.
    config: AppConfig,
    /// Where the configuration is persisted, when a config dir exists.
    config_path: Option<PathBuf>,
    /// Hub API client.
    client: Option<HubClient>,
    /// Demo simulator, when running with --demo.
    demo: Option<DemoSimulator>,
    /// Current screen.
    screen: Screen,
    /// Dashboard state, kept alive across navigation.
    dashboard: DashboardState,
    /// Display preferences.
    prefs: Preferences,
    /// Fetch generation. Responses tagged with an older generation are
    /// dropped, so a slow fetch cannot overwrite a newer screen.
    generation: u64,
}

impl StationWatch {
    /// Boot the StationWatch application (called by iced::application).
    pub fn boot() -> (Self, Task<Message>) {
        let demo = std::env::args().any(|arg| arg == "--demo");

        let config_path = default_config_path();
        let config = match &config_path {
            Some(path) if path.exists() => match load_config(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load config, using defaults");
                    AppConfig::default()
                }
            },
            _ => AppConfig::default(),
        };

        let (mut app, task) = Self::with_config(config, demo);
        app.config_path = config_path;
        (app, task)
    }

    /// Build the application from an explicit configuration.
    ///
    /// Nothing is persisted until a config path is attached, which makes
    /// this the entry point for tests.
    pub fn with_config(config: AppConfig, demo: bool) -> (Self, Task<Message>) {
        let client = match build_client(&config.hub) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create hub client");
                None
            }
        };

        let prefs = config.prefs;
        let mut app = Self {
            config,
            config_path: None,
            client,
            demo: demo.then(DemoSimulator::new),
            screen: Screen::Dashboard,
            dashboard: DashboardState::new(),
            prefs,
            generation: 0,
        };

        let task = app.fetch_servers();
        (app, task)
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        let server_count = self.dashboard.servers.len();
        if server_count > 0 {
            format!("StationWatch - {} servers", server_count)
        } else {
            "StationWatch".to_string()
        }
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ServersFetched(generation, result) => {
                // The dashboard stays warm even while another screen is up
                if !self.stale(generation) {
                    self.dashboard.apply(result);
                }
                Task::none()
            }

            Message::ServerFetched(generation, result) => {
                if !self.stale(generation)
                    && let Screen::Server(state) = &mut self.screen
                {
                    state.apply_server(result);
                }
                Task::none()
            }

            Message::StatsFetched(generation, result) => {
                if !self.stale(generation) {
                    match &mut self.screen {
                        Screen::Server(state) => state.stats.apply(result),
                        Screen::GlobalStats(state) => state.apply(result),
                        _ => {}
                    }
                }
                Task::none()
            }

            Message::OpenServer(target) => self.open_server(target),

            Message::OpenGlobalStats => {
                self.generation += 1;
                let state = StatsSectionState::new();
                let period = state.period();
                self.screen = Screen::GlobalStats(state);
                self.fetch_global_stats(period)
            }

            Message::OpenDashboard => self.open_dashboard(),

            Message::SetPeriod(period) => self.set_period(period),

            Message::ToggleRawTopic => {
                if let Screen::Server(state) = &mut self.screen {
                    state.toggle_raw_topic();
                }
                Task::none()
            }

            Message::SetShowStatus(value) => {
                match &mut self.screen {
                    Screen::Settings(state) => state.set_show_status(value),
                    _ => {
                        self.prefs.show_status = value;
                        self.persist_prefs();
                    }
                }
                Task::none()
            }

            Message::SetShowOffline(value) => {
                match &mut self.screen {
                    Screen::Settings(state) => state.set_show_offline(value),
                    _ => {
                        self.prefs.show_offline = value;
                        self.persist_prefs();
                    }
                }
                Task::none()
            }

            Message::SetAddressLookup(input) => {
                self.dashboard.lookup_input = input;
                Task::none()
            }

            Message::SubmitAddressLookup => {
                let input = self.dashboard.lookup_input.trim().to_string();
                match ServerTarget::parse_address(&input) {
                    Some(target) => self.open_server(target),
                    None => {
                        if !input.is_empty() {
                            self.dashboard.last_error = Some(format!(
                                "Invalid address '{}', expected host:port",
                                input
                            ));
                        }
                        Task::none()
                    }
                }
            }

            Message::CopyConnectUrl(url) => {
                tracing::info!(url = %url, "Copied connect URL");
                iced::clipboard::write(url)
            }

            Message::Refresh => self.refresh_current(),

            // Relative timestamps and stale markers redraw on their own
            Message::Tick => Task::none(),

            Message::OpenSettings => {
                self.screen = Screen::Settings(SettingsState::from_config(
                    &self.config.hub,
                    &self.prefs,
                ));
                Task::none()
            }

            Message::CloseSettings => self.open_dashboard(),

            Message::SetHubUrl(value) => {
                if let Screen::Settings(state) = &mut self.screen {
                    state.set_hub_url(value);
                }
                Task::none()
            }

            Message::SetRefreshInterval(value) => {
                if let Screen::Settings(state) = &mut self.screen {
                    state.set_refresh_interval(value);
                }
                Task::none()
            }

            Message::SetStaleThreshold(value) => {
                if let Screen::Settings(state) = &mut self.screen {
                    state.set_stale_threshold(value);
                }
                Task::none()
            }

            Message::SaveSettings => self.save_settings(),

            Message::ResetSettings => {
                if let Screen::Settings(state) = &mut self.screen {
                    *state =
                        SettingsState::from_config(&HubConfig::default(), &Preferences::default());
                    state.modified = true;
                }
                Task::none()
            }
        }
    }

    /// Create subscriptions for periodic refresh and redraw ticks.
    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            fetch::refresh_subscription(self.config.hub.refresh_secs),
            fetch::tick_subscription(),
        ])
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        match &self.screen {
            Screen::Dashboard => {
                dashboard_view(&self.dashboard, &self.prefs, self.config.hub.stale_secs)
            }
            Screen::Server(state) => server_view(state),
            Screen::GlobalStats(state) => global_stats_view(state),
            Screen::Settings(state) => settings_view(state),
        }
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// True when a response belongs to an older fetch generation.
    fn stale(&self, generation: u64) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Dropping stale response"
            );
            return true;
        }
        false
    }

    /// Switch to the server detail screen and fetch its data.
    fn open_server(&mut self, target: ServerTarget) -> Task<Message> {
        tracing::info!(server = %target, "Opening server view");
        self.generation += 1;

        let state = ServerDetailState::new(target.clone());
        let period = state.stats.period();
        self.screen = Screen::Server(state);

        let info = self.fetch_server(target.clone());
        let stats = self.fetch_server_stats(target, period);
        Task::batch([info, stats])
    }

    /// Return to the dashboard and refresh the server list.
    fn open_dashboard(&mut self) -> Task<Message> {
        self.screen = Screen::Dashboard;
        self.generation += 1;
        self.fetch_servers()
    }

    /// Change the stats period on whichever stats screen is active.
    fn set_period(&mut self, period: Period) -> Task<Message> {
        match &mut self.screen {
            Screen::Server(state) => {
                if !state.stats.set_period(period) {
                    return Task::none();
                }
                let target = state.target.clone();
                self.generation += 1;
                self.fetch_server_stats(target, period)
            }
            Screen::GlobalStats(state) => {
                if !state.set_period(period) {
                    return Task::none();
                }
                self.generation += 1;
                self.fetch_global_stats(period)
            }
            _ => Task::none(),
        }
    }

    /// Refetch whatever the current screen shows, keeping the generation.
    fn refresh_current(&mut self) -> Task<Message> {
        match &self.screen {
            Screen::Dashboard => self.fetch_servers(),
            Screen::Server(state) => {
                let target = state.target.clone();
                let period = state.stats.period();
                let info = self.fetch_server(target.clone());
                let stats = self.fetch_server_stats(target, period);
                Task::batch([info, stats])
            }
            Screen::GlobalStats(state) => {
                let period = state.period();
                self.fetch_global_stats(period)
            }
            Screen::Settings(_) => Task::none(),
        }
    }

    /// Validate, apply and persist the settings form.
    fn save_settings(&mut self) -> Task<Message> {
        let Screen::Settings(state) = &mut self.screen else {
            return Task::none();
        };

        if let Err(message) = state.validate() {
            state.save_failed(message);
            return Task::none();
        }

        let hub = state.to_hub_config();
        let prefs = state.to_preferences();

        let client = match build_client(&hub) {
            Ok(client) => client,
            Err(e) => {
                state.save_failed(format!("Invalid hub URL: {}", e));
                return Task::none();
            }
        };

        self.client = Some(client);
        self.prefs = prefs;
        self.config.hub = hub;
        self.config.prefs = prefs;

        match &self.config_path {
            Some(path) => match save_config(path, &self.config) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Saved configuration");
                    state.save_succeeded();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to save configuration");
                    state.save_failed(format!("Failed to save: {}", e));
                    return Task::none();
                }
            },
            None => state.save_succeeded(),
        }

        // The hub may have changed; anything in flight is for the old one
        self.generation += 1;
        self.fetch_servers()
    }

    /// Persist preference toggles made outside the settings screen.
    fn persist_prefs(&mut self) {
        self.config.prefs = self.prefs;
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = save_config(path, &self.config) {
            tracing::warn!(error = %e, "Failed to save preferences");
        }
    }

    /// Fetch the server list, from the demo simulator or the hub.
    fn fetch_servers(&mut self) -> Task<Message> {
        let generation = self.generation;
        if let Some(demo) = self.demo.as_mut() {
            return Task::done(Message::ServersFetched(generation, Ok(demo.servers())));
        }
        match &self.client {
            Some(client) => fetch::fetch_servers(client.clone(), generation),
            None => Task::done(Message::ServersFetched(
                generation,
                Err(NO_CLIENT.to_string()),
            )),
        }
    }

    /// Fetch one server's hub entry.
    fn fetch_server(&mut self, target: ServerTarget) -> Task<Message> {
        let generation = self.generation;
        if let Some(demo) = self.demo.as_mut() {
            let result = demo.server(&target);
            return Task::done(Message::ServerFetched(generation, result));
        }
        match &self.client {
            Some(client) => fetch::fetch_server(client.clone(), target, generation),
            None => Task::done(Message::ServerFetched(
                generation,
                Err(NO_CLIENT.to_string()),
            )),
        }
    }

    /// Fetch one server's player stats.
    fn fetch_server_stats(&mut self, target: ServerTarget, period: Period) -> Task<Message> {
        let generation = self.generation;
        if let Some(demo) = self.demo.as_mut() {
            let result = demo.server_stats(&target, period);
            return Task::done(Message::StatsFetched(generation, result));
        }
        match &self.client {
            Some(client) => fetch::fetch_server_stats(client.clone(), target, period, generation),
            None => Task::done(Message::StatsFetched(
                generation,
                Err(NO_CLIENT.to_string()),
            )),
        }
    }

    /// Fetch hub-wide player stats.
    fn fetch_global_stats(&mut self, period: Period) -> Task<Message> {
        let generation = self.generation;
        if let Some(demo) = self.demo.as_mut() {
            let stats = demo.global_stats(period);
            return Task::done(Message::StatsFetched(generation, Ok(stats)));
        }
        match &self.client {
            Some(client) => fetch::fetch_global_stats(client.clone(), period, generation),
            None => Task::done(Message::StatsFetched(
                generation,
                Err(NO_CLIENT.to_string()),
            )),
        }
    }
}

/// Platform config file location, `stationwatch/config.json5` under the
/// user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stationwatch").join("config.json5"))
}

/// Construct a hub client from the hub section of the configuration.
fn build_client(hub: &HubConfig) -> stationwatch_common::Result<HubClient> {
    HubClient::with_timeout(&hub.url, Duration::from_secs(hub.timeout_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stationwatch_common::GameServer;

    fn test_app() -> StationWatch {
        let (app, _task) = StationWatch::with_config(AppConfig::default(), false);
        app
    }

    fn server(world_id: u64, players: u32) -> GameServer {
        crate::mock::game_server(world_id, "Test Station", players)
    }

    #[test]
    fn current_generation_response_is_applied() {
        let mut app = test_app();
        let generation = app.generation;

        let _ = app.update(Message::ServersFetched(generation, Ok(vec![server(1, 10)])));

        assert_eq!(app.dashboard.servers.len(), 1);
        assert!(!app.dashboard.loading);
    }

    #[test]
    fn stale_generation_response_is_dropped() {
        let mut app = test_app();
        let old = app.generation;

        // Navigating bumps the generation
        let _ = app.update(Message::OpenGlobalStats);
        assert!(app.generation > old);

        let _ = app.update(Message::ServersFetched(old, Ok(vec![server(1, 10)])));
        assert!(app.dashboard.servers.is_empty());
    }

    #[test]
    fn refresh_keeps_the_current_generation() {
        let mut app = test_app();
        let generation = app.generation;

        let _ = app.update(Message::Refresh);
        assert_eq!(app.generation, generation);

        let _ = app.update(Message::ServersFetched(generation, Ok(vec![server(2, 7)])));
        assert_eq!(app.dashboard.servers.len(), 1);
    }

    #[test]
    fn preference_toggle_outside_settings_applies_immediately() {
        let mut app = test_app();
        assert!(!app.prefs.show_status);

        let _ = app.update(Message::SetShowStatus(true));
        assert!(app.prefs.show_status);
    }

    #[test]
    fn preference_toggle_inside_settings_only_buffers() {
        let mut app = test_app();

        let _ = app.update(Message::OpenSettings);
        let _ = app.update(Message::SetShowStatus(true));

        // Buffered in the form, not yet applied
        assert!(!app.prefs.show_status);
        match &app.screen {
            Screen::Settings(state) => {
                assert!(state.show_status);
                assert!(state.modified);
            }
            _ => panic!("expected settings screen"),
        }

        let _ = app.update(Message::SaveSettings);
        assert!(app.prefs.show_status);
    }

    #[test]
    fn invalid_lookup_sets_dashboard_error() {
        let mut app = test_app();

        let _ = app.update(Message::SetAddressLookup("not an address".to_string()));
        let _ = app.update(Message::SubmitAddressLookup);

        assert!(app.dashboard.last_error.is_some());
        assert!(matches!(app.screen, Screen::Dashboard));
    }

    #[test]
    fn valid_lookup_opens_server_screen() {
        let mut app = test_app();
        let generation = app.generation;

        let _ = app.update(Message::SetAddressLookup("play.example.com:1234".to_string()));
        let _ = app.update(Message::SubmitAddressLookup);

        assert!(app.generation > generation);
        match &app.screen {
            Screen::Server(state) => match &state.target {
                ServerTarget::Address { host, port } => {
                    assert_eq!(host, "play.example.com");
                    assert_eq!(*port, 1234);
                }
                other => panic!("unexpected target {:?}", other),
            },
            _ => panic!("expected server screen"),
        }
    }

    #[test]
    fn set_period_on_stats_screen_bumps_generation() {
        let mut app = test_app();
        let _ = app.update(Message::OpenGlobalStats);
        let generation = app.generation;

        let _ = app.update(Message::SetPeriod(Period::Month));
        assert!(app.generation > generation);

        // Selecting the same period again is a no-op
        let after = app.generation;
        let _ = app.update(Message::SetPeriod(Period::Month));
        assert_eq!(app.generation, after);
    }

    #[test]
    fn demo_mode_answers_without_a_hub() {
        let (mut app, _task) = StationWatch::with_config(AppConfig::default(), true);
        let generation = app.generation;

        // In demo mode the refresh task resolves immediately via Task::done,
        // so drive the exchange by hand here.
        let Some(demo) = app.demo.as_mut() else {
            panic!("expected demo simulator");
        };
        let servers = demo.servers();
        let _ = app.update(Message::ServersFetched(generation, Ok(servers)));

        assert!(!app.dashboard.servers.is_empty());
        assert!(app.title().starts_with("StationWatch - "));
    }
}
