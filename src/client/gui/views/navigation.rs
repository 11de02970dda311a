use iced::widget::{Button, Column, Container, Row, Space, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, TEXT_ON_DARK};
use crate::client::gui::views::logger::logger_view;
use crate::client::models::app_state::ClientState;
use crate::client::models::messages::Message;
use crate::client::routing::Route;
use crate::common::models::Role;

fn nav_button<'a>(label: &'a str, target: Route, current: Option<Route>) -> Button<'a, Message> {
    let style = if current == Some(target) {
        iced::theme::Button::Primary
    } else {
        iced::theme::Button::Text
    };
    Button::new(Text::new(label).size(14).style(TEXT_ON_DARK))
        .on_press(Message::Navigate(target))
        .style(style)
        .padding([6, 12])
}

/// Header bar for signed-in screens plus the toast bar, wrapped around `body`.
pub fn frame<'a>(state: &'a ClientState, body: Element<'a, Message>) -> Element<'a, Message> {
    let current = state.route();
    let mut links = Row::new().spacing(6).align_items(Alignment::Center);
    match state.role() {
        Some(Role::Patient) => {
            links = links
                .push(nav_button("Find Doctors", Route::PatientDashboard, current))
                .push(nav_button("My Appointments", Route::PatientAppointments, current));
        }
        Some(Role::Doctor) => {
            links = links.push(nav_button("Appointments", Route::DoctorDashboard, current));
        }
        None => {}
    }

    let who = state
        .session
        .as_ref()
        .map(|s| format!("{} · {}", s.user.name, s.user.role))
        .unwrap_or_default();

    let header = Container::new(
        Row::new()
            .spacing(16)
            .align_items(Alignment::Center)
            .push(Text::new("MediBook").font(BOLD_FONT).size(22).style(TEXT_ON_DARK))
            .push(links)
            .push(Space::new(Length::Fill, Length::Shrink))
            .push(Text::new(who).size(13).style(TEXT_ON_DARK))
            .push(
                Button::new(Text::new("Logout").size(14))
                    .on_press(Message::Logout)
                    .style(iced::theme::Button::Destructive)
                    .padding([6, 12]),
            ),
    )
    .padding([12, 20])
    .width(Length::Fill)
    .style(style::container(style::header_appearance));

    Container::new(
        Column::new()
            .push(header)
            .push(Container::new(logger_view(&state.logger)).padding([8, 20, 0, 20]))
            .push(Container::new(body).padding(20).width(Length::Fill).height(Length::Fill)),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(style::container(style::bg_main_appearance))
    .into()
}
