use iced::widget::{Button, Column, Container, Row, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, ACCENT_COLOR, BOLD_FONT, EMOJI_FONT, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::models::messages::Message;
use crate::common::models::Doctor;

pub fn view<'a>(doctor: &'a Doctor, booking_enabled: bool) -> Element<'a, Message> {
    let mut book = Button::new(Text::new("Book Appointment").size(14))
        .style(iced::theme::Button::Primary)
        .padding([8, 14])
        .width(Length::Fill);
    if booking_enabled {
        book = book.on_press(Message::OpenBooking(doctor.clone()));
    }

    let specialization = if doctor.specialization.is_empty() {
        "General practice"
    } else {
        doctor.specialization.as_str()
    };

    Container::new(
        Column::new()
            .spacing(10)
            .push(
                Row::new()
                    .spacing(10)
                    .align_items(Alignment::Center)
                    .push(Text::new("🩺").font(EMOJI_FONT).size(24))
                    .push(
                        Column::new()
                            .spacing(2)
                            .push(Text::new(format!("Dr. {}", doctor.name)).font(BOLD_FONT).size(16).style(TEXT_PRIMARY))
                            .push(Text::new(specialization).size(13).style(ACCENT_COLOR)),
                    ),
            )
            .push(
                Text::new(doctor.photo_url.as_deref().unwrap_or("No photo on file"))
                    .size(11)
                    .style(TEXT_SECONDARY),
            )
            .push(book),
    )
    .padding(16)
    .width(Length::Fill)
    .style(style::container(style::card_appearance))
    .into()
}
