//! Player count charts rendered with the Iced canvas.
//!
//! Two chart kinds cover the stats views: an area chart for the raw
//! player history and a bar chart for the weekday and hour-of-day
//! averages. Both cache their geometry and redraw only when data changes.

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use super::formatting::format_axis_value;

/// A labeled value on a player chart.
#[derive(Debug, Clone)]
pub struct LabeledPoint {
    /// Axis label ("Wed", "14:00", "Feb 03 18:30").
    pub label: String,
    /// Player count, possibly a fractional average.
    pub value: f64,
}

impl LabeledPoint {
    /// Create a new labeled point.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl From<(String, f64)> for LabeledPoint {
    fn from((label, value): (String, f64)) -> Self {
        Self { label, value }
    }
}

/// State for the player history area chart.
#[derive(Debug)]
pub struct AreaChartState {
    /// The points to display, in axis order.
    points: Vec<LabeledPoint>,
    /// Cache for the chart geometry.
    cache: Cache,
    /// Upper bound of the value axis.
    max_value: f64,
}

impl AreaChartState {
    /// Create an empty chart state.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            cache: Cache::new(),
            max_value: 1.0,
        }
    }

    /// Replace all points and rescale the value axis.
    pub fn set_points(&mut self, points: impl IntoIterator<Item = LabeledPoint>) {
        self.points = points.into_iter().collect();
        self.recalculate_bounds();
        self.cache.clear();
    }

    /// Drop all points.
    pub fn clear(&mut self) {
        self.points.clear();
        self.recalculate_bounds();
        self.cache.clear();
    }

    /// Whether the chart has anything to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Recalculate the value axis upper bound.
    fn recalculate_bounds(&mut self) {
        let max = self
            .points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max);

        // Counts start at zero; pad the top so the line never touches the frame
        self.max_value = if max.is_finite() && max > 0.0 {
            max * 1.1
        } else {
            1.0
        };
    }
}

impl Default for AreaChartState {
    fn default() -> Self {
        Self::new()
    }
}

/// State for the weekday/hourly averages bar chart.
#[derive(Debug)]
pub struct BarChartState {
    /// One bar per point, in axis order.
    points: Vec<LabeledPoint>,
    /// Show every n-th axis label (1 shows all).
    label_interval: usize,
    /// Cache for the chart geometry.
    cache: Cache,
    /// Upper bound of the value axis.
    max_value: f64,
}

impl BarChartState {
    /// Create an empty bar chart showing every axis label.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            label_interval: 1,
            cache: Cache::new(),
            max_value: 1.0,
        }
    }

    /// Show only every n-th axis label (the 24-hour chart uses 6).
    pub fn with_label_interval(mut self, interval: usize) -> Self {
        self.label_interval = interval.max(1);
        self
    }

    /// Replace all bars and rescale the value axis.
    pub fn set_points(&mut self, points: impl IntoIterator<Item = LabeledPoint>) {
        self.points = points.into_iter().collect();
        self.recalculate_bounds();
        self.cache.clear();
    }

    /// Whether the chart has anything to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn recalculate_bounds(&mut self) {
        let max = self
            .points
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max);

        self.max_value = if max.is_finite() && max > 0.0 {
            max * 1.1
        } else {
            1.0
        };
    }
}

impl Default for BarChartState {
    fn default() -> Self {
        Self::new()
    }
}

/// Area chart widget borrowing its state.
pub struct AreaChart<'a> {
    state: &'a AreaChartState,
}

impl<'a> AreaChart<'a> {
    /// Create a new area chart widget.
    pub fn new(state: &'a AreaChartState) -> Self {
        Self { state }
    }
}

impl<'a> canvas::Program<crate::message::Message> for AreaChart<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        vec![self.state.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size());
        })]
    }
}

impl<'a> AreaChart<'a> {
    /// Paint the frame, grid and series.
    fn draw_chart(&self, frame: &mut Frame, size: Size) {
        let chart_width = size.width - GUTTER * 2.0;
        let chart_height = size.height - GUTTER * 2.0;

        if chart_width <= 0.0 || chart_height <= 0.0 {
            return;
        }

        draw_chart_frame(frame, size, chart_width, chart_height);

        let points = &self.state.points;
        if points.is_empty() {
            draw_no_data(frame, size);
            return;
        }

        let max_value = self.state.max_value;
        draw_value_grid(frame, chart_width, chart_height, max_value);
        if points.len() >= 2 {
            self.draw_time_axis(frame, chart_width, chart_height);
        }

        let position = |i: usize, value: f64| -> Point {
            let x = if points.len() > 1 {
                GUTTER + (i as f32 / (points.len() - 1) as f32) * chart_width
            } else {
                GUTTER + chart_width / 2.0
            };
            let y = GUTTER + chart_height - ((value / max_value) as f32 * chart_height);
            Point::new(x, y)
        };

        // Shade the area below the line, then stroke the line on top
        if points.len() >= 2 {
            let mut area = canvas::path::Builder::new();
            area.move_to(Point::new(GUTTER, GUTTER + chart_height));
            for (i, point) in points.iter().enumerate() {
                area.line_to(position(i, point.value));
            }
            area.line_to(Point::new(GUTTER + chart_width, GUTTER + chart_height));
            area.close();
            frame.fill(&area.build(), Color { a: 0.2, ..ACCENT });

            let mut line = canvas::path::Builder::new();
            for (i, point) in points.iter().enumerate() {
                let pos = position(i, point.value);
                if i == 0 {
                    line.move_to(pos);
                } else {
                    line.line_to(pos);
                }
            }
            frame.stroke(
                &line.build(),
                Stroke::default().with_color(ACCENT).with_width(2.0),
            );
        } else {
            // A single sample gets a dot instead of a line
            let dot = Path::circle(position(0, points[0].value), 3.0);
            frame.fill(&dot, ACCENT);
        }
    }

    /// Draw vertical grid lines with timestamp labels sampled from the data.
    fn draw_time_axis(&self, frame: &mut Frame, chart_width: f32, chart_height: f32) {
        let points = &self.state.points;
        let num_v_lines = 4;

        for i in 0..=num_v_lines {
            let x = GUTTER + (i as f32 / num_v_lines as f32) * chart_width;

            let line = Path::line(Point::new(x, GUTTER), Point::new(x, GUTTER + chart_height));
            frame.stroke(
                &line,
                Stroke::default().with_color(GRID_COLOR).with_width(1.0),
            );

            let index = (i * (points.len() - 1)) / num_v_lines;
            if let Some(point) = points.get(index) {
                let label = Text {
                    content: point.label.clone(),
                    position: Point::new(x - 30.0, GUTTER + chart_height + 15.0),
                    color: LABEL_COLOR,
                    size: 10.0.into(),
                    ..Text::default()
                };
                frame.fill_text(label);
            }
        }
    }
}

/// Bar chart widget borrowing its state.
pub struct BarChart<'a> {
    state: &'a BarChartState,
}

impl<'a> BarChart<'a> {
    /// Create a new bar chart widget.
    pub fn new(state: &'a BarChartState) -> Self {
        Self { state }
    }
}

impl<'a> canvas::Program<crate::message::Message> for BarChart<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        vec![self.state.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size());
        })]
    }
}

impl<'a> BarChart<'a> {
    /// Paint the frame, grid and bars.
    fn draw_chart(&self, frame: &mut Frame, size: Size) {
        let chart_width = size.width - GUTTER * 2.0;
        let chart_height = size.height - GUTTER * 2.0;

        if chart_width <= 0.0 || chart_height <= 0.0 {
            return;
        }

        draw_chart_frame(frame, size, chart_width, chart_height);

        let points = &self.state.points;
        if points.is_empty() {
            draw_no_data(frame, size);
            return;
        }

        let max_value = self.state.max_value;
        draw_value_grid(frame, chart_width, chart_height, max_value);

        let slot = chart_width / points.len() as f32;
        let bar_width = slot * 0.7;

        for (i, point) in points.iter().enumerate() {
            let x = GUTTER + i as f32 * slot + (slot - bar_width) / 2.0;
            let bar_height = ((point.value / max_value) as f32 * chart_height).max(0.0);
            let y = GUTTER + chart_height - bar_height;

            let bar = Path::rectangle(Point::new(x, y), Size::new(bar_width, bar_height));
            frame.fill(&bar, ACCENT);

            if i % self.state.label_interval == 0 {
                let label = Text {
                    content: point.label.clone(),
                    position: Point::new(x + bar_width / 2.0 - 12.0, GUTTER + chart_height + 15.0),
                    color: LABEL_COLOR,
                    size: 10.0.into(),
                    ..Text::default()
                };
                frame.fill_text(label);
            }
        }
    }
}

/// Gutter reserved around the plot area for axis labels.
const GUTTER: f32 = 50.0;

/// Series color shared by all player charts.
const ACCENT: Color = Color {
    r: 0.6,
    g: 0.6,
    b: 1.0,
    a: 1.0,
};

const GRID_COLOR: Color = Color {
    r: 0.2,
    g: 0.2,
    b: 0.25,
    a: 1.0,
};

const LABEL_COLOR: Color = Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

/// Fill the canvas and chart area backgrounds.
fn draw_chart_frame(frame: &mut Frame, size: Size, width: f32, height: f32) {
    let background = Path::rectangle(Point::ORIGIN, size);
    frame.fill(&background, Color::from_rgb(0.1, 0.1, 0.12));

    let chart_bg = Path::rectangle(Point::new(GUTTER, GUTTER), Size::new(width, height));
    frame.fill(&chart_bg, Color::from_rgb(0.08, 0.08, 0.1));
}

/// Draw horizontal grid lines with value labels (zero baseline to max).
fn draw_value_grid(frame: &mut Frame, chart_width: f32, chart_height: f32, max: f64) {
    let num_h_lines = 5;

    for i in 0..=num_h_lines {
        let y = GUTTER + (i as f32 / num_h_lines as f32) * chart_height;
        let value = max - (i as f64 / num_h_lines as f64) * max;

        let line = Path::line(Point::new(GUTTER, y), Point::new(GUTTER + chart_width, y));
        frame.stroke(
            &line,
            Stroke::default().with_color(GRID_COLOR).with_width(1.0),
        );

        let label = Text {
            content: format_axis_value(value.round()),
            position: Point::new(5.0, y - 6.0),
            color: LABEL_COLOR,
            size: 10.0.into(),
            ..Text::default()
        };
        frame.fill_text(label);
    }
}

/// Draw a centered placeholder when there is nothing to chart.
fn draw_no_data(frame: &mut Frame, size: Size) {
    let no_data = Text {
        content: "No data available".to_string(),
        position: Point::new(size.width / 2.0 - 55.0, size.height / 2.0),
        color: LABEL_COLOR,
        size: 16.0.into(),
        ..Text::default()
    };
    frame.fill_text(no_data);
}

/// Create the player history chart element.
pub fn area_chart_view(state: &AreaChartState) -> Element<'_, crate::message::Message> {
    Canvas::new(AreaChart::new(state))
        .width(Length::Fill)
        .height(Length::Fixed(200.0))
        .into()
}

/// Create a weekday/hourly averages chart element.
pub fn bar_chart_view(state: &BarChartState) -> Element<'_, crate::message::Message> {
    Canvas::new(BarChart::new(state))
        .width(Length::Fill)
        .height(Length::Fixed(160.0))
        .into()
}
