// Inline error box and confirmation dialog
use iced::widget::{Button, Column, Container, Row, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, ERROR_COLOR, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::models::messages::Message;

/// Error text with an optional retry button.
pub fn error_box<'a>(text: String, retry: Option<Message>) -> Element<'a, Message> {
    let mut row = Row::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .push(Text::new(text).size(14).style(ERROR_COLOR).width(Length::Fill));
    if let Some(message) = retry {
        row = row.push(
            Button::new(Text::new("Retry").size(14))
                .on_press(message)
                .style(iced::theme::Button::Secondary)
                .padding([6, 14]),
        );
    }
    Container::new(row)
        .padding(12)
        .width(Length::Fill)
        .style(style::container(style::error_box_appearance))
        .into()
}

/// Yes/no dialog; both buttons are disabled while `busy`.
pub fn confirm_dialog<'a>(
    title: &'a str,
    detail: String,
    confirm_label: &'a str,
    busy: bool,
    on_confirm: Message,
    on_dismiss: Message,
) -> Element<'a, Message> {
    let mut confirm = Button::new(Text::new(if busy { "Working..." } else { confirm_label }).size(14))
        .style(iced::theme::Button::Destructive)
        .padding([8, 18]);
    let mut dismiss = Button::new(Text::new("Keep").size(14))
        .style(iced::theme::Button::Secondary)
        .padding([8, 18]);
    if !busy {
        confirm = confirm.on_press(on_confirm);
        dismiss = dismiss.on_press(on_dismiss);
    }

    Container::new(
        Column::new()
            .spacing(12)
            .push(Text::new(title).font(BOLD_FONT).size(18).style(TEXT_PRIMARY))
            .push(Text::new(detail).size(14).style(TEXT_SECONDARY))
            .push(Row::new().spacing(10).push(dismiss).push(confirm)),
    )
    .padding(20)
    .width(Length::Fill)
    .style(style::container(style::modal_appearance))
    .into()
}
