// Shared palette and container styles for every screen
use iced::widget::container::Appearance;
use iced::{Background, Border, Color, Font, Shadow, Theme, Vector};

use crate::common::models::AppointmentStatus;

pub const BG_MAIN: Color = Color::from_rgb(0.95, 0.97, 0.99);
pub const CARD_BG: Color = Color::WHITE;
pub const INPUT_BG: Color = Color::from_rgb(0.97, 0.98, 1.0);
pub const HEADER_BG: Color = Color::from_rgb(0.09, 0.36, 0.62);
pub const ACCENT_COLOR: Color = Color::from_rgb(0.05, 0.58, 0.53); // teal
pub const ERROR_COLOR: Color = Color::from_rgb(0.86, 0.2, 0.2);
pub const TEXT_PRIMARY: Color = Color::from_rgb(0.12, 0.16, 0.22);
pub const TEXT_SECONDARY: Color = Color::from_rgb(0.42, 0.47, 0.55);
pub const TEXT_ON_DARK: Color = Color::WHITE;

pub const BOLD_FONT: Font = Font {
    family: iced::font::Family::SansSerif,
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub const EMOJI_FONT: Font = Font::with_name("Segoe UI Emoji");

fn flat(background: Color, text: Color, radius: f32, border: Option<Color>) -> Appearance {
    Appearance {
        background: Some(Background::Color(background)),
        text_color: Some(text),
        border: Border {
            width: if border.is_some() { 1.0 } else { 0.0 },
            color: border.unwrap_or(Color::TRANSPARENT),
            radius: radius.into(),
        },
        shadow: Shadow::default(),
    }
}

pub fn bg_main_appearance(_: &Theme) -> Appearance {
    flat(BG_MAIN, TEXT_PRIMARY, 0.0, None)
}

pub fn header_appearance(_: &Theme) -> Appearance {
    flat(HEADER_BG, TEXT_ON_DARK, 0.0, None)
}

pub fn card_appearance(_: &Theme) -> Appearance {
    Appearance {
        shadow: Shadow {
            offset: Vector::new(0.0, 2.0),
            blur_radius: 10.0,
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.08),
        },
        ..flat(CARD_BG, TEXT_PRIMARY, 14.0, Some(Color::from_rgb(0.89, 0.91, 0.94)))
    }
}

pub fn input_appearance(_: &Theme) -> Appearance {
    flat(INPUT_BG, TEXT_PRIMARY, 10.0, Some(Color::from_rgb(0.8, 0.84, 0.9)))
}

pub fn modal_appearance(_: &Theme) -> Appearance {
    Appearance {
        shadow: Shadow {
            offset: Vector::new(0.0, 8.0),
            blur_radius: 24.0,
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
        },
        ..flat(CARD_BG, TEXT_PRIMARY, 16.0, Some(ACCENT_COLOR))
    }
}

pub fn error_box_appearance(_: &Theme) -> Appearance {
    flat(Color::from_rgb(0.99, 0.93, 0.93), ERROR_COLOR, 10.0, Some(ERROR_COLOR))
}

pub fn status_color(status: AppointmentStatus) -> Color {
    match status {
        AppointmentStatus::Pending => Color::from_rgb(0.85, 0.6, 0.0),
        AppointmentStatus::Confirmed => Color::from_rgb(0.15, 0.45, 0.85),
        AppointmentStatus::Completed => Color::from_rgb(0.1, 0.6, 0.3),
        AppointmentStatus::Cancelled => ERROR_COLOR,
    }
}

/// Rounded pill in the status colour.
pub fn badge_style(status: AppointmentStatus) -> iced::theme::Container {
    let color = status_color(status);
    iced::theme::Container::Custom(Box::new(move |_: &Theme| flat(color, TEXT_ON_DARK, 12.0, None)))
}

pub fn container(style: fn(&Theme) -> Appearance) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(style))
}
