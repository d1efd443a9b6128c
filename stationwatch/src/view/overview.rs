//! Shared stats section: period selector, overview panel and player charts.
//!
//! The server detail view and the global stats view show the same block,
//! fed from different hub endpoints. The section keeps its own chart
//! states so geometry is only rebuilt when a fetch lands.

use iced::widget::{Column, Row, button, column, container, row, text};
use iced::{Element, Length, Theme};

use stationwatch_common::{
    Period, PeriodStats, format_count, history_points, hourly_points, local_utc_offset_hours,
    round1, weekday_points,
};

use crate::message::Message;
use crate::view::chart::{
    AreaChartState, BarChartState, LabeledPoint, area_chart_view, bar_chart_view,
};

/// State behind a period-driven stats section.
#[derive(Debug)]
pub struct StatsSectionState {
    /// Selected aggregation period.
    period: Period,
    /// Last stats payload that arrived, if any.
    stats: Option<PeriodStats>,
    /// True until the first response for this section arrives.
    loading: bool,
    /// Last fetch error, if any.
    error: Option<String>,
    /// Player history chart.
    history_chart: AreaChartState,
    /// Weekday averages chart.
    weekday_chart: BarChartState,
    /// Hour-of-day averages chart.
    hourly_chart: BarChartState,
}

impl StatsSectionState {
    /// Create a fresh section in its initial loading state.
    pub fn new() -> Self {
        Self {
            period: Period::default(),
            stats: None,
            loading: true,
            error: None,
            history_chart: AreaChartState::new(),
            weekday_chart: BarChartState::new(),
            // 24 bars; label every sixth hour to keep the axis readable
            hourly_chart: BarChartState::new().with_label_interval(6),
        }
    }

    /// Currently selected period.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Change the period. Returns true when it actually changed and a
    /// refetch is due. Existing charts stay visible until new data lands.
    pub fn set_period(&mut self, period: Period) -> bool {
        if self.period == period {
            return false;
        }
        self.period = period;
        true
    }

    /// Apply a fetch result for this section.
    pub fn apply(&mut self, result: Result<PeriodStats, String>) {
        self.loading = false;
        match result {
            Ok(stats) => {
                self.error = None;
                self.rebuild_charts(&stats);
                self.stats = Some(stats);
            }
            Err(error) => {
                self.error = Some(error);
                self.stats = None;
                self.history_chart.clear();
                self.weekday_chart.set_points([]);
                self.hourly_chart.set_points([]);
            }
        }
    }

    fn rebuild_charts(&mut self, stats: &PeriodStats) {
        let offset = local_utc_offset_hours();

        self.history_chart.set_points(
            history_points(&stats.history)
                .into_iter()
                .map(LabeledPoint::from),
        );
        self.weekday_chart.set_points(
            weekday_points(&stats.weekday_averages)
                .into_iter()
                .map(LabeledPoint::from),
        );
        self.hourly_chart.set_points(
            hourly_points(&stats.hourly_averages, offset)
                .into_iter()
                .map(LabeledPoint::from),
        );
    }
}

impl Default for StatsSectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the full stats section for the current period.
pub fn stats_section(state: &StatsSectionState) -> Element<'_, Message> {
    let mut section = Column::new().spacing(15).push(period_selector(state.period));

    if let Some(error) = &state.error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|theme: &Theme| text::Style {
                color: Some(crate::view::theme::colors(theme).danger()),
            });
        section = section.push(error_text);
    }

    let body: Element<'_, Message> = if state.loading {
        dim_panel("Loading stats...")
    } else if let Some(stats) = &state.stats {
        let mut sections = Column::new().spacing(15);
        sections = sections.push(stats_overview(stats));
        sections = sections.push(chart_section(
            "Player History",
            area_chart_view(&state.history_chart),
        ));
        sections = sections.push(chart_section(
            "Players by Day",
            bar_chart_view(&state.weekday_chart),
        ));
        sections = sections.push(chart_section(
            "Players by Hour",
            bar_chart_view(&state.hourly_chart),
        ));
        sections.into()
    } else {
        dim_panel("No data available")
    };

    section.push(body).into()
}

/// Render the day/week/month/year/all selector row.
pub fn period_selector(current: Period) -> Element<'static, Message> {
    let buttons: Element<'_, Message> = Row::with_children(
        Period::ALL
            .iter()
            .map(|&period| {
                let btn = button(text(period.as_str()).size(12))
                    .on_press(Message::SetPeriod(period))
                    .style(if period == current {
                        iced::widget::button::primary
                    } else {
                        iced::widget::button::secondary
                    });
                btn.into()
            })
            .collect::<Vec<_>>(),
    )
    .spacing(5)
    .into();

    buttons
}

/// Render the Avg Players / Max / Min / Records panel.
pub fn stats_overview(stats: &PeriodStats) -> Element<'_, Message> {
    let items = row![
        stat_item("Avg Players", format!("{:.1}", round1(stats.avg_players))),
        stat_item("Max", stats.max_players.to_string()),
        stat_item("Min", stats.min_players.to_string()),
        stat_item("Records", format_count(stats.total_records)),
    ]
    .spacing(30);

    panel(items.into())
}

/// A single labeled value in the overview panel.
fn stat_item(label: &str, value: String) -> Element<'_, Message> {
    row![
        text(label).size(13).style(|theme: &Theme| text::Style {
            color: Some(crate::view::theme::colors(theme).text_dimmed()),
        }),
        text(value).size(13),
    ]
    .spacing(6)
    .into()
}

/// A dim headline above a chart canvas.
fn chart_section<'a>(title: &'a str, chart: Element<'a, Message>) -> Element<'a, Message> {
    let heading = text(title).size(16).style(|theme: &Theme| text::Style {
        color: Some(crate::view::theme::colors(theme).text_muted()),
    });

    column![heading, chart].spacing(8).into()
}

/// Wrap content in a bordered card.
fn panel(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
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

/// A dim placeholder panel ("Loading stats...", "No data available").
fn dim_panel(message: &str) -> Element<'_, Message> {
    panel(
        text(message)
            .size(14)
            .style(|theme: &Theme| text::Style {
                color: Some(crate::view::theme::colors(theme).text_dimmed()),
            })
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> PeriodStats {
        PeriodStats {
            period: Period::Week,
            total_records: 1000,
            avg_players: 24.26,
            max_players: 80,
            min_players: 2,
            weekday_averages: vec![10.0; 7],
            hourly_averages: vec![5.0; 24],
            history: vec![],
        }
    }

    #[test]
    fn starts_loading_with_default_period() {
        let state = StatsSectionState::new();
        assert_eq!(state.period(), Period::Week);
        assert!(state.loading);
        assert!(state.stats.is_none());
    }

    #[test]
    fn set_period_reports_changes_only() {
        let mut state = StatsSectionState::new();
        assert!(!state.set_period(Period::Week));
        assert!(state.set_period(Period::Month));
        assert_eq!(state.period(), Period::Month);
    }

    #[test]
    fn apply_ok_fills_charts() {
        let mut state = StatsSectionState::new();
        state.apply(Ok(sample_stats()));

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.stats.is_some());
        assert!(!state.weekday_chart.is_empty());
        assert!(!state.hourly_chart.is_empty());
        // No history samples were supplied
        assert!(state.history_chart.is_empty());
    }

    #[test]
    fn apply_error_clears_stats() {
        let mut state = StatsSectionState::new();
        state.apply(Ok(sample_stats()));
        state.apply(Err("connection refused".to_string()));

        assert!(state.stats.is_none());
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        assert!(state.weekday_chart.is_empty());
    }
}
