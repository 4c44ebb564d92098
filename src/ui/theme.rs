use ratatui::{prelude::*, symbols::Marker};

use crate::core::config::{PlotMarker, Theme};

/// Colors used to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub border: Color,
    pub axis: Color,
    /// First and second series of each panel
    pub primary: Color,
    pub secondary: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Pro => Palette {
            background: Color::Reset,
            text: Color::White,
            border: Color::DarkGray,
            axis: Color::Gray,
            primary: Color::Cyan,
            secondary: Color::LightMagenta,
        },
        Theme::Dark => Palette {
            background: Color::Rgb(15, 15, 25),
            text: Color::Gray,
            border: Color::Rgb(60, 60, 80),
            axis: Color::DarkGray,
            primary: Color::Rgb(60, 130, 180),
            secondary: Color::Rgb(180, 160, 60),
        },
        Theme::Clear => Palette {
            background: Color::Reset,
            text: Color::Reset,
            border: Color::Reset,
            axis: Color::Reset,
            primary: Color::Reset,
            secondary: Color::Reset,
        },
        Theme::Matrix => Palette {
            background: Color::Black,
            text: Color::Rgb(0, 160, 50),
            border: Color::Rgb(30, 130, 30),
            axis: Color::Rgb(30, 130, 30),
            primary: Color::Rgb(0, 200, 60),
            secondary: Color::Rgb(0, 150, 160),
        },
    }
}

pub fn marker(marker: Option<PlotMarker>) -> Marker {
    match marker {
        None | Some(PlotMarker::Braille) => Marker::Braille,
        Some(PlotMarker::Dot) => Marker::Dot,
        Some(PlotMarker::Block) => Marker::Block,
        Some(PlotMarker::Bar) => Marker::Bar,
        Some(PlotMarker::HalfBlock) => Marker::HalfBlock,
    }
}

/// Gauge color by fill level
pub fn level_color(percent: f64) -> Color {
    match percent {
        v if v < 50.0 => Color::Cyan,
        v if v < 75.0 => Color::LightYellow,
        v if v < 90.0 => Color::LightRed,
        _ => Color::Red,
    }
}
