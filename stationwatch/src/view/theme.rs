//! Semantic colors for StationWatch views.
//!
//! Wraps the active iced theme so views ask for roles ("card surface",
//! "stale status") rather than raw RGB values. Roles the stock palette
//! does not model, like station alert levels, use fixed colors chosen
//! to read well on both theme families.

use iced::theme::palette::Extended;
use iced::{Color, Theme};

use stationwatch_common::SecurityLevel;

/// Role-based palette resolved from the active theme.
pub struct Palette<'a> {
    ext: &'a Extended,
}

/// Resolve the role palette for the given theme.
pub fn colors(theme: &Theme) -> Palette<'_> {
    Palette {
        ext: theme.extended_palette(),
    }
}

impl Palette<'_> {
    // surfaces

    /// Raised surface behind toggles and interactive rows.
    pub fn background_weak(&self) -> Color {
        self.ext.background.weak.color
    }

    /// Server card surface.
    pub fn card_background(&self) -> Color {
        self.pick(Color::from_rgb(0.11, 0.12, 0.15), Color::WHITE)
    }

    /// List row surface, a step apart from the card behind it.
    pub fn row_background(&self) -> Color {
        self.pick(
            Color::from_rgb(0.13, 0.14, 0.17),
            Color::from_rgb(0.97, 0.98, 0.99),
        )
    }

    // text

    /// Body text.
    pub fn text(&self) -> Color {
        self.ext.background.base.text
    }

    /// Secondary text, for labels sitting next to values.
    pub fn text_muted(&self) -> Color {
        self.ext.background.weak.text
    }

    /// Tertiary text, for timestamps and helper lines.
    pub fn text_dimmed(&self) -> Color {
        self.text().scale_alpha(0.55)
    }

    // accents

    /// Accent for the selected filter and primary actions.
    pub fn primary(&self) -> Color {
        self.ext.primary.base.color
    }

    /// Error text and failed-fetch banners.
    pub fn danger(&self) -> Color {
        self.ext.danger.base.color
    }

    /// Confirmation text after a successful save.
    pub fn success(&self) -> Color {
        self.ext.success.base.color
    }

    /// Unsaved-changes hint and other soft cautions.
    pub fn warning(&self) -> Color {
        self.pick(
            Color::from_rgb(0.91, 0.72, 0.25),
            Color::from_rgb(0.78, 0.58, 0.05),
        )
    }

    // borders

    /// Card and panel outline.
    pub fn border(&self) -> Color {
        self.pick(
            Color::from_rgb(0.24, 0.26, 0.31),
            Color::from_rgb(0.80, 0.81, 0.84),
        )
    }

    /// Hairline between rows.
    pub fn border_subtle(&self) -> Color {
        self.pick(
            Color::from_rgb(0.19, 0.20, 0.24),
            Color::from_rgb(0.86, 0.87, 0.89),
        )
    }

    // status

    /// Server reachable and recently polled.
    pub fn status_online(&self) -> Color {
        Color::from_rgb(0.25, 0.78, 0.35)
    }

    /// Server absent from the hub or marked down.
    pub fn status_offline(&self) -> Color {
        Color::from_rgb(0.86, 0.24, 0.22)
    }

    /// Server still listed but its hub record has gone quiet.
    pub fn status_stale(&self) -> Color {
        Color::from_rgb(0.89, 0.68, 0.21)
    }

    /// Color for a reported station alert level. Unrecognized levels take
    /// the muted text color so bogus topic data stays unobtrusive.
    pub fn security(&self, level: SecurityLevel) -> Color {
        match level {
            SecurityLevel::Red => Color::from_rgb(0.95, 0.42, 0.40),
            SecurityLevel::Blue => Color::from_rgb(0.40, 0.64, 0.97),
            SecurityLevel::Green | SecurityLevel::NoWarning => {
                Color::from_rgb(0.31, 0.84, 0.49)
            }
            SecurityLevel::Unknown => self.text_muted(),
        }
    }

    /// Pick the dark or light variant of a fixed color.
    fn pick(&self, dark: Color, light: Color) -> Color {
        if self.ext.is_dark { dark } else { light }
    }
}
