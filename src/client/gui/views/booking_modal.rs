// Booking panel: one step of the workflow at a time
use iced::widget::{Button, Column, Container, Row, Text, TextInput};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, ACCENT_COLOR, BOLD_FONT, ERROR_COLOR, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::models::app_state::ClientState;
use crate::client::models::booking::{available_slots, BookingStep, BookingWorkflow};
use crate::client::models::messages::Message;

fn button<'a>(label: &'a str, style: iced::theme::Button, on_press: Option<Message>) -> Button<'a, Message> {
    let button = Button::new(Text::new(label).size(14)).style(style).padding([8, 16]);
    match on_press {
        Some(message) => button.on_press(message),
        None => button,
    }
}

fn summary_lines<'a>(booking: &BookingWorkflow) -> Column<'a, Message> {
    let mut column = Column::new().spacing(4);
    if let Some(summary) = booking.summary() {
        column = column
            .push(Text::new(format!("Doctor: Dr. {}", summary.doctor)).size(14).style(TEXT_PRIMARY))
            .push(Text::new(format!("Specialization: {}", summary.specialization)).size(14).style(TEXT_SECONDARY))
            .push(Text::new(format!("Date: {}", summary.date.format("%A, %d %B %Y"))).size(14).style(TEXT_PRIMARY))
            .push(Text::new(format!("Time: {} UTC", summary.time)).size(14).style(TEXT_PRIMARY))
            .push(Text::new(format!("Duration: {} minutes", summary.duration_minutes)).size(14).style(TEXT_SECONDARY));
    }
    column
}

pub fn view<'a>(state: &'a ClientState, booking: &'a BookingWorkflow) -> Element<'a, Message> {
    let body: Element<Message> = match booking.step() {
        BookingStep::SelectingDate => {
            let mut column = Column::new()
                .spacing(10)
                .push(Text::new("Pick a date (YYYY-MM-DD)").size(14).style(TEXT_SECONDARY))
                .push(
                    Container::new(
                        TextInput::new("2025-06-10", &state.booking_date_input)
                            .on_input(Message::BookingDateChanged)
                            .on_submit(Message::BookingDateSubmitted)
                            .padding(10)
                            .size(14),
                    )
                    .style(style::container(style::input_appearance)),
                );
            if let Some(err) = &state.booking_input_error {
                column = column.push(Text::new(err.as_str()).size(13).style(ERROR_COLOR));
            }
            column
                .push(button("Next", iced::theme::Button::Primary, Some(Message::BookingDateSubmitted)))
                .into()
        }
        BookingStep::SelectingTime { date } => {
            let mut grid = Column::new().spacing(6);
            for chunk in available_slots().chunks(3) {
                let mut row = Row::new().spacing(6);
                for slot in chunk {
                    row = row.push(
                        Button::new(
                            Container::new(Text::new(slot.label()).size(14))
                                .width(Length::Fill)
                                .center_x(),
                        )
                        .on_press(Message::BookingSlotSelected(*slot))
                        .style(iced::theme::Button::Secondary)
                        .width(Length::Fill)
                        .padding([8, 10]),
                    );
                }
                grid = grid.push(row);
            }
            Column::new()
                .spacing(10)
                .push(Text::new(format!("Available times on {}", date.format("%d %B %Y"))).size(14).style(TEXT_SECONDARY))
                .push(grid)
                .push(button("Back", iced::theme::Button::Secondary, Some(Message::BookingBack)))
                .into()
        }
        BookingStep::Confirming { .. } => Column::new()
            .spacing(12)
            .push(summary_lines(booking))
            .push(
                Row::new()
                    .spacing(8)
                    .push(button("Back", iced::theme::Button::Secondary, Some(Message::BookingBack)))
                    .push(button("Confirm Booking", iced::theme::Button::Positive, Some(Message::BookingConfirm))),
            )
            .into(),
        BookingStep::Submitting { .. } => Column::new()
            .spacing(12)
            .push(summary_lines(booking))
            .push(
                Row::new()
                    .spacing(8)
                    .push(button("Back", iced::theme::Button::Secondary, None))
                    .push(button("Booking...", iced::theme::Button::Positive, None)),
            )
            .into(),
        BookingStep::Succeeded { .. } => Column::new()
            .spacing(12)
            .push(Text::new("Appointment booked!").font(BOLD_FONT).size(18).style(ACCENT_COLOR))
            .push(summary_lines(booking))
            .push(Text::new("This window closes automatically.").size(12).style(TEXT_SECONDARY))
            .into(),
        BookingStep::Failed { message, .. } => Column::new()
            .spacing(12)
            .push(Text::new(message.as_str()).size(14).style(ERROR_COLOR))
            .push(summary_lines(booking))
            .push(button("Try Again", iced::theme::Button::Primary, Some(Message::BookingRetry)))
            .into(),
    };

    let close = button(
        "Close",
        iced::theme::Button::Text,
        booking.can_close().then_some(Message::CloseBooking),
    );

    Container::new(
        Column::new()
            .spacing(16)
            .push(
                Row::new()
                    .align_items(Alignment::Center)
                    .push(
                        Text::new(format!("Book with Dr. {}", booking.doctor.name))
                            .font(BOLD_FONT)
                            .size(20)
                            .style(TEXT_PRIMARY)
                            .width(Length::Fill),
                    )
                    .push(close),
            )
            .push(body),
    )
    .padding(24)
    .max_width(520.0)
    .style(style::container(style::modal_appearance))
    .into()
}
