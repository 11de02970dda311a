use iced::widget::{scrollable, Button, Column, Container, Row, Text, TextInput};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::gui::views::navigation;
use crate::client::gui::views::patient_appointments::{appointment_list, status_picker};
use crate::client::models::app_state::ClientState;
use crate::client::models::messages::Message;
use crate::common::models::Role;

fn date_filter(state: &ClientState) -> Element<Message> {
    let active = state
        .date_filter
        .map(|d| format!("Showing {}", d.format("%d %B %Y")))
        .unwrap_or_else(|| "All dates".to_string());

    let mut clear = Button::new(Text::new("Clear").size(14))
        .style(iced::theme::Button::Secondary)
        .padding([8, 12]);
    if state.date_filter.is_some() || !state.date_input.is_empty() {
        clear = clear.on_press(Message::ClearDateFilter);
    }

    Row::new()
        .spacing(10)
        .align_items(Alignment::Center)
        .push(Text::new("Date").size(14).style(TEXT_SECONDARY))
        .push(
            Container::new(
                TextInput::new("YYYY-MM-DD", &state.date_input)
                    .on_input(Message::DateFilterChanged)
                    .on_submit(Message::ApplyDateFilter)
                    .padding(10)
                    .size(14),
            )
            .width(Length::Fixed(160.0))
            .style(style::container(style::input_appearance)),
        )
        .push(
            Button::new(Text::new("Apply").size(14))
                .on_press(Message::ApplyDateFilter)
                .style(iced::theme::Button::Primary)
                .padding([8, 12]),
        )
        .push(clear)
        .push(Text::new(active).size(13).style(TEXT_SECONDARY))
        .into()
}

pub fn view(state: &ClientState) -> Element<Message> {
    let name = state.session.as_ref().map(|s| s.user.name.as_str()).unwrap_or("Doctor");

    let filters = Container::new(
        Column::new()
            .spacing(12)
            .push(Text::new("Filter Appointments").font(BOLD_FONT).size(16).style(TEXT_PRIMARY))
            .push(
                Row::new()
                    .spacing(20)
                    .align_items(Alignment::Center)
                    .push(date_filter(state))
                    .push(Text::new("Status").size(14).style(TEXT_SECONDARY))
                    .push(status_picker(state)),
            ),
    )
    .padding(16)
    .width(Length::Fill)
    .style(style::container(style::card_appearance));

    let content = Column::new()
        .spacing(16)
        .push(Text::new(format!("Welcome, Dr. {}", name)).font(BOLD_FONT).size(26).style(TEXT_PRIMARY))
        .push(filters)
        .push(Text::new("Your Appointments").font(BOLD_FONT).size(18).style(TEXT_PRIMARY))
        .push(appointment_list(state, Role::Doctor));

    navigation::frame(state, scrollable(content).height(Length::Fill).into())
}
