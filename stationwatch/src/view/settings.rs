//! Settings view for application configuration.

use iced::widget::{Column, button, column, container, row, rule, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Theme};

use stationwatch_common::{HubConfig, Preferences};

use crate::message::Message;

/// Outcome of the last save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Settings were written out.
    Saved,
    /// Validation or persistence failed.
    Failed(String),
}

/// Application settings state.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// Hub API base URL.
    pub hub_url: String,
    /// Server list refresh interval in seconds (edit buffer).
    pub refresh_secs: String,
    /// Stale threshold in seconds (servers not updated are flagged).
    pub stale_secs: String,
    /// Hub request timeout, carried through unedited.
    pub timeout_secs: u64,
    /// Render hub status lines instead of server names.
    pub show_status: bool,
    /// Keep offline servers visible on the dashboard.
    pub show_offline: bool,
    /// Whether settings have been modified.
    pub modified: bool,
    /// Result of the last save, cleared on the next edit.
    pub feedback: Option<Feedback>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::from_config(&HubConfig::default(), &Preferences::default())
    }
}

impl SettingsState {
    /// Create settings from current app configuration.
    pub fn from_config(hub: &HubConfig, prefs: &Preferences) -> Self {
        Self {
            hub_url: hub.url.clone(),
            refresh_secs: hub.refresh_secs.to_string(),
            stale_secs: hub.stale_secs.to_string(),
            timeout_secs: hub.timeout_secs,
            show_status: prefs.show_status,
            show_offline: prefs.show_offline,
            modified: false,
            feedback: None,
        }
    }

    /// Update the hub URL.
    pub fn set_hub_url(&mut self, url: String) {
        self.hub_url = url;
        self.edited();
    }

    /// Update the refresh interval.
    pub fn set_refresh_interval(&mut self, secs: String) {
        self.refresh_secs = secs;
        self.edited();
    }

    /// Update the stale threshold.
    pub fn set_stale_threshold(&mut self, secs: String) {
        self.stale_secs = secs;
        self.edited();
    }

    /// Update the status line preference.
    pub fn set_show_status(&mut self, value: bool) {
        self.show_status = value;
        self.edited();
    }

    /// Update the offline visibility preference.
    pub fn set_show_offline(&mut self, value: bool) {
        self.show_offline = value;
        self.edited();
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.hub_url.trim();
        if url.is_empty() {
            return Err("Hub URL cannot be empty".to_string());
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err("Hub URL must start with http:// or https://".to_string());
        }

        let refresh: u64 = self
            .refresh_secs
            .trim()
            .parse()
            .map_err(|_| "Refresh interval must be a number".to_string())?;
        if refresh < 5 {
            return Err("Refresh interval must be at least 5 seconds".to_string());
        }
        if refresh > 3600 {
            return Err("Refresh interval cannot exceed 1 hour".to_string());
        }

        let stale: i64 = self
            .stale_secs
            .trim()
            .parse()
            .map_err(|_| "Stale threshold must be a number".to_string())?;
        if stale < 1 {
            return Err("Stale threshold must be at least 1 second".to_string());
        }
        if stale > 86400 {
            return Err("Stale threshold cannot exceed 24 hours".to_string());
        }

        Ok(())
    }

    /// Hub configuration from the edited values.
    pub fn to_hub_config(&self) -> HubConfig {
        HubConfig {
            url: self.hub_url.trim().trim_end_matches('/').to_string(),
            refresh_secs: self.refresh_secs.trim().parse().unwrap_or(30),
            stale_secs: self.stale_secs.trim().parse().unwrap_or(300),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Display preferences from the edited values.
    pub fn to_preferences(&self) -> Preferences {
        Preferences {
            show_status: self.show_status,
            show_offline: self.show_offline,
        }
    }

    /// Record a successful save.
    pub fn save_succeeded(&mut self) {
        self.modified = false;
        self.feedback = Some(Feedback::Saved);
    }

    /// Record a failed save or a validation error.
    pub fn save_failed(&mut self, message: String) {
        self.feedback = Some(Feedback::Failed(message));
    }

    /// An edit invalidates whatever the last save attempt reported.
    fn edited(&mut self) {
        self.modified = true;
        self.feedback = None;
    }
}

/// Render the settings view.
pub fn settings_view(state: &SettingsState) -> Element<'_, Message> {
    let content = column![
        render_header(state),
        rule::horizontal(1),
        render_hub_section(state),
        rule::horizontal(1),
        render_display_section(state),
        rule::horizontal(1),
        render_actions(state),
    ]
    .spacing(20)
    .padding(20);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render header with back button.
fn render_header(state: &SettingsState) -> Element<'_, Message> {
    let back_button = button(text("<- Back").size(14))
        .on_press(Message::CloseSettings)
        .style(iced::widget::button::secondary);

    let mut header = row![back_button, text("Settings").size(24)]
        .spacing(15)
        .align_y(Alignment::Center);

    if state.modified {
        header = header.push(
            text("(unsaved changes)")
                .size(12)
                .style(|theme: &Theme| text::Style {
                    color: Some(crate::view::theme::colors(theme).warning()),
                }),
        );
    }

    header.into()
}

/// Render hub connection section.
fn render_hub_section(state: &SettingsState) -> Element<'_, Message> {
    let section_title = text("Hub Connection").size(18);

    let url_label = text("Hub URL:").size(14);
    let url_input = text_input("https://hub.cm-ss13.com", &state.hub_url)
        .on_input(Message::SetHubUrl)
        .padding(8)
        .width(Length::Fixed(400.0));

    let url_help = text("Base URL of the hub API")
        .size(11)
        .style(dim_text);

    let refresh_label = text("Refresh interval (seconds):").size(14);
    let refresh_input = text_input("30", &state.refresh_secs)
        .on_input(Message::SetRefreshInterval)
        .padding(8)
        .width(Length::Fixed(100.0));

    let refresh_help = text("How often the current view refetches from the hub")
        .size(11)
        .style(dim_text);

    let refresh_row = row![refresh_label, refresh_input]
        .spacing(10)
        .align_y(Alignment::Center);

    column![
        section_title,
        url_label,
        url_input,
        url_help,
        refresh_row,
        refresh_help,
    ]
    .spacing(8)
    .into()
}

/// Render display settings section.
fn render_display_section(state: &SettingsState) -> Element<'_, Message> {
    let section_title = text("Display Settings").size(18);

    let threshold_label = text("Stale threshold (seconds):").size(14);
    let threshold_input = text_input("300", &state.stale_secs)
        .on_input(Message::SetStaleThreshold)
        .padding(8)
        .width(Length::Fixed(100.0));

    let threshold_help = text("Servers not updated within this time are marked as stale")
        .size(11)
        .style(dim_text);

    let threshold_row = row![threshold_label, threshold_input]
        .spacing(10)
        .align_y(Alignment::Center);

    let toggle = |label: &'static str, active: bool, message: Message| {
        button(text(label).size(12)).on_press(message).style(if active {
            iced::widget::button::primary
        } else {
            iced::widget::button::secondary
        })
    };

    let toggles = row![
        toggle(
            "Show hub status",
            state.show_status,
            Message::SetShowStatus(!state.show_status),
        ),
        toggle(
            "Show offline",
            state.show_offline,
            Message::SetShowOffline(!state.show_offline),
        ),
    ]
    .spacing(10);

    let toggles_help = text("Status lines replace server names on the dashboard")
        .size(11)
        .style(dim_text);

    column![
        section_title,
        threshold_row,
        threshold_help,
        toggles,
        toggles_help,
    ]
    .spacing(8)
    .into()
}

/// Render action buttons and messages.
fn render_actions(state: &SettingsState) -> Element<'_, Message> {
    let mut content = Column::new().spacing(10);

    match &state.feedback {
        Some(Feedback::Failed(message)) => {
            let line = text(format!("Error: {}", message))
                .size(14)
                .style(|theme: &Theme| text::Style {
                    color: Some(crate::view::theme::colors(theme).danger()),
                });
            content = content.push(line);
        }
        Some(Feedback::Saved) => {
            let line = text("Settings saved").size(14).style(|theme: &Theme| {
                text::Style {
                    color: Some(crate::view::theme::colors(theme).success()),
                }
            });
            content = content.push(line);
        }
        None => {}
    }

    let save_button = button(text("Save Settings").size(14))
        .on_press(Message::SaveSettings)
        .style(iced::widget::button::primary);

    let reset_button = button(text("Reset to Defaults").size(14))
        .on_press(Message::ResetSettings)
        .style(iced::widget::button::secondary);

    let buttons = row![save_button, reset_button].spacing(10);

    content = content.push(buttons);

    let note = text("Settings are stored as config.json5 in the platform config directory")
        .size(11)
        .style(dim_text);

    content = content.push(note);

    content.into()
}

/// Dimmed helper-text style.
fn dim_text(theme: &Theme) -> text::Style {
    text::Style {
        color: Some(crate::view::theme::colors(theme).text_dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = SettingsState::default();

        // Defaults are valid
        assert!(settings.validate().is_ok());

        settings.hub_url = String::new();
        assert!(settings.validate().is_err());

        settings.hub_url = "ftp://hub.example.com".to_string();
        assert!(settings.validate().is_err());

        settings.hub_url = "https://hub.example.com".to_string();
        assert!(settings.validate().is_ok());

        settings.refresh_secs = "abc".to_string();
        assert!(settings.validate().is_err());

        settings.refresh_secs = "2".to_string();
        assert!(settings.validate().is_err());

        settings.refresh_secs = "60".to_string();
        assert!(settings.validate().is_ok());

        settings.stale_secs = "0".to_string();
        assert!(settings.validate().is_err());

        settings.stale_secs = "100000".to_string();
        assert!(settings.validate().is_err());

        settings.stale_secs = "600".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_config() {
        let hub = HubConfig {
            url: "https://hub.example.com".to_string(),
            refresh_secs: 45,
            stale_secs: 200,
            timeout_secs: 15,
        };
        let prefs = Preferences {
            show_status: true,
            show_offline: false,
        };

        let settings = SettingsState::from_config(&hub, &prefs);
        assert!(!settings.modified);
        assert_eq!(settings.to_hub_config(), hub);
        assert_eq!(settings.to_preferences(), prefs);
    }

    #[test]
    fn test_edits_mark_modified_and_clear_feedback() {
        let mut settings = SettingsState::default();
        settings.save_succeeded();
        assert_eq!(settings.feedback, Some(Feedback::Saved));
        assert!(!settings.modified);

        settings.set_show_offline(false);
        assert!(settings.modified);
        assert!(settings.feedback.is_none());

        settings.save_failed("disk full".to_string());
        assert_eq!(
            settings.feedback,
            Some(Feedback::Failed("disk full".to_string()))
        );
        assert!(settings.modified);
    }

    #[test]
    fn test_trailing_slash_trimmed_on_save() {
        let mut settings = SettingsState::default();
        settings.set_hub_url("https://hub.example.com/".to_string());
        assert_eq!(settings.to_hub_config().url, "https://hub.example.com");
    }
}
