//! Inline player trend drawn on dashboard rows.

use iced::widget::Canvas;
use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

/// Fixed footprint of a row trend, in logical pixels.
const TREND_WIDTH: f32 = 80.0;
const TREND_HEIGHT: f32 = 20.0;

/// Inset keeping the stroke and the end dot inside the canvas.
const INSET: f32 = 2.0;

/// Same accent as the full-size player charts.
const LINE: Color = Color {
    r: 0.6,
    g: 0.6,
    b: 1.0,
    a: 1.0,
};

/// Session player trend for one dashboard row.
///
/// Samples are per-refresh player counts in arrival order. The y axis
/// runs from zero to the session peak, so a busy-but-steady server draws
/// level instead of amplifying a few players of noise across the full
/// height.
pub struct Trend {
    samples: Vec<f64>,
    cache: Cache,
}

impl Trend {
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            cache: Cache::new(),
        }
    }

    /// Wrap the trend in a fixed-size canvas element.
    pub fn view<'a, Message: 'a>(self) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fixed(TREND_WIDTH))
            .height(Length::Fixed(TREND_HEIGHT))
            .into()
    }

    /// Canvas position of sample `i`, scaled against the session peak.
    fn plot(&self, i: usize, value: f64, size: Size, peak: f64) -> Point {
        let span = (self.samples.len() - 1).max(1) as f32;
        let x = INSET + (size.width - INSET * 2.0) * i as f32 / span;
        let rise = (value / peak).clamp(0.0, 1.0) as f32;
        let y = size.height - INSET - (size.height - INSET * 2.0) * rise;
        Point::new(x, y)
    }

    fn plot_samples(&self, frame: &mut Frame, size: Size) {
        if self.samples.len() < 2 {
            return;
        }

        // Headroom so the peak sample does not touch the top edge.
        let peak = self.samples.iter().fold(0.0_f64, |a, &b| a.max(b)) * 1.1;

        // An empty server all session long draws a resting line.
        if peak <= 0.0 {
            let y = size.height - INSET;
            let floor = Path::line(Point::new(INSET, y), Point::new(size.width - INSET, y));
            frame.stroke(&floor, Stroke::default().with_color(LINE).with_width(1.0));
            return;
        }

        let mut line = canvas::path::Builder::new();
        let mut area = canvas::path::Builder::new();
        area.move_to(Point::new(INSET, size.height - INSET));
        for (i, &value) in self.samples.iter().enumerate() {
            let point = self.plot(i, value, size, peak);
            if i == 0 {
                line.move_to(point);
            } else {
                line.line_to(point);
            }
            area.line_to(point);
        }
        area.line_to(Point::new(size.width - INSET, size.height - INSET));
        area.close();

        // Shade first so the stroke stays on top.
        frame.fill(&area.build(), Color { a: 0.15, ..LINE });
        frame.stroke(
            &line.build(),
            Stroke::default().with_color(LINE).with_width(1.5),
        );

        // Mark the newest sample.
        let last = self.samples.len() - 1;
        let tip = self.plot(last, self.samples[last], size, peak);
        frame.fill(&Path::circle(tip, 2.0), LINE);
    }
}

impl<Message> canvas::Program<Message, Theme, Renderer> for Trend {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry<Renderer>> {
        vec![self.cache.draw(renderer, bounds.size(), |frame| {
            self.plot_samples(frame, bounds.size());
        })]
    }
}
