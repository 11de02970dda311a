use iced::widget::container::Appearance;
use iced::widget::{Container, Row, Space, Text};
use iced::{Element, Length};

use crate::client::gui::style::EMOJI_FONT;
use crate::client::models::messages::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

impl LogMessage {
    pub fn emoji(&self) -> &'static str {
        match self.level {
            LogLevel::Success => "✅",
            LogLevel::Error => "❌",
            LogLevel::Info => "ℹ️",
            LogLevel::Warning => "⚠️",
        }
    }

    pub fn color(&self) -> iced::Color {
        match self.level {
            LogLevel::Success => iced::Color::from_rgb(0.2, 0.7, 0.4),
            LogLevel::Error => iced::Color::from_rgb(0.9, 0.25, 0.25),
            LogLevel::Info => iced::Color::from_rgb(0.2, 0.55, 0.95),
            LogLevel::Warning => iced::Color::from_rgb(0.95, 0.7, 0.0),
        }
    }
}

/// Toast bar with the most recent message only.
pub fn logger_view(messages: &[LogMessage]) -> Element<'_, Message> {
    let Some(log) = messages.last() else {
        return Space::new(Length::Fill, Length::Fixed(0.0)).into();
    };
    let bg_color = log.color();
    Container::new(
        Row::new()
            .spacing(12)
            .push(Text::new(log.emoji()).font(EMOJI_FONT).size(18).style(iced::Color::WHITE))
            .push(Text::new(&log.message).size(16).style(iced::Color::WHITE)),
    )
    .padding([10, 16])
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| Appearance {
        background: Some(iced::Background::Color(bg_color)),
        text_color: Some(iced::Color::WHITE),
        border: iced::Border { radius: 8.0.into(), ..Default::default() },
        shadow: iced::Shadow {
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 12.0,
            color: iced::Color::from_rgba(0.0, 0.0, 0.0, 0.2),
        },
    })))
    .into()
}
