use iced::widget::{Button, Row, Space, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::TEXT_SECONDARY;
use crate::client::models::messages::Message;
use crate::client::models::pagination::{has_next, has_previous, page_window, PAGE_WINDOW};

/// Previous / numbered window / Next. Every button is inert while `loading`.
pub fn view<'a, F>(current: u32, total_pages: u32, caption: String, loading: bool, on_select: F) -> Element<'a, Message>
where
    F: Fn(u32) -> Message,
{
    let mut previous = Button::new(Text::new("Previous").size(14))
        .style(iced::theme::Button::Secondary)
        .padding([6, 12]);
    if has_previous(current) && !loading {
        previous = previous.on_press(on_select(current - 1));
    }

    let mut numbers = Row::new().spacing(4);
    for page in page_window(current, total_pages, PAGE_WINDOW) {
        let style = if page == current {
            iced::theme::Button::Primary
        } else {
            iced::theme::Button::Secondary
        };
        let mut button = Button::new(Text::new(page.to_string()).size(14))
            .style(style)
            .padding([6, 12]);
        if !loading {
            button = button.on_press(on_select(page));
        }
        numbers = numbers.push(button);
    }

    let mut next = Button::new(Text::new("Next").size(14))
        .style(iced::theme::Button::Secondary)
        .padding([6, 12]);
    if has_next(current, total_pages) && !loading {
        next = next.on_press(on_select(current + 1));
    }

    Row::new()
        .spacing(8)
        .align_items(Alignment::Center)
        .push(Text::new(caption).size(13).style(TEXT_SECONDARY))
        .push(Space::new(Length::Fill, Length::Shrink))
        .push(previous)
        .push(numbers)
        .push(next)
        .into()
}
