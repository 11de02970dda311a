use iced::widget::{Button, Column, Container, Row, Text, TextInput};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, ERROR_COLOR, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::gui::views::logger::logger_view;
use crate::client::gui::views::login::{field_error, labelled};
use crate::client::models::app_state::ClientState;
use crate::client::models::forms::Field;
use crate::client::models::messages::Message;
use crate::client::routing::Route;
use crate::common::models::Role;

fn role_tab<'a>(label: &'a str, role: Role, selected: Role) -> Button<'a, Message> {
    let button = Button::new(
        Container::new(Text::new(label).size(15).horizontal_alignment(iced::alignment::Horizontal::Center))
            .width(Length::Fill)
            .center_x(),
    )
    .width(Length::Fill)
    .padding([10, 16]);
    if role == selected {
        button.style(iced::theme::Button::Primary)
    } else {
        button
            .on_press(Message::RegisterRoleSelected(role))
            .style(iced::theme::Button::Secondary)
    }
}

fn input<'a>(placeholder: &'a str, value: &'a str, on_input: fn(String) -> Message) -> Element<'a, Message> {
    TextInput::new(placeholder, value)
        .on_input(on_input)
        .on_submit(Message::SubmitRegistration)
        .padding(12)
        .size(14)
        .into()
}

pub fn view(state: &ClientState) -> Element<Message> {
    let form = &state.registration;
    let errors = &state.registration_errors;
    let pending = state.registration_mutation.is_pending;

    let tabs = Row::new()
        .spacing(2)
        .push(role_tab("Patient", Role::Patient, form.role))
        .push(role_tab("Doctor", Role::Doctor, form.role));

    let password: Element<Message> = TextInput::new("At least 6 characters", &form.password)
        .on_input(Message::RegisterPasswordChanged)
        .on_submit(Message::SubmitRegistration)
        .secure(true)
        .padding(12)
        .size(14)
        .into();

    let mut card = Column::new()
        .spacing(16)
        .push(Text::new("Create your account").font(BOLD_FONT).size(28).style(TEXT_PRIMARY))
        .push(tabs)
        .push(labelled(
            "👤",
            "Full name",
            input("Jane Doe", &form.name, Message::RegisterNameChanged),
            field_error(errors, Field::Name),
        ))
        .push(labelled(
            "✉️",
            "Email",
            input("you@example.com", &form.email, Message::RegisterEmailChanged),
            field_error(errors, Field::Email),
        ))
        .push(labelled("🔒", "Password", password, field_error(errors, Field::Password)));

    if form.role == Role::Doctor {
        card = card.push(labelled(
            "🩺",
            "Specialization",
            input("e.g. Cardiology", &form.specialization, Message::RegisterSpecializationChanged),
            field_error(errors, Field::Specialization),
        ));
    }

    card = card.push(labelled(
        "🖼️",
        "Photo URL (optional)",
        input("https://...", &form.photo_url, Message::RegisterPhotoUrlChanged),
        field_error(errors, Field::PhotoUrl),
    ));

    if let Some(err) = &state.registration_mutation.error {
        card = card.push(Text::new(err.user_message("Registration failed")).size(14).style(ERROR_COLOR));
    }

    let mut submit = Button::new(
        Container::new(
            Text::new(if pending { "Creating account..." } else { "Create Account" })
                .font(BOLD_FONT)
                .size(16),
        )
        .width(Length::Fill)
        .center_x(),
    )
    .style(iced::theme::Button::Primary)
    .width(Length::Fill)
    .padding([12, 16]);
    if !pending {
        submit = submit.on_press(Message::SubmitRegistration);
    }

    card = card.push(submit).push(
        Row::new()
            .spacing(6)
            .align_items(Alignment::Center)
            .push(Text::new("Already registered?").size(14).style(TEXT_SECONDARY))
            .push(
                Button::new(Text::new("Sign in").size(14))
                    .on_press(Message::Navigate(Route::Login))
                    .style(iced::theme::Button::Text),
            ),
    );

    Container::new(
        Column::new()
            .spacing(16)
            .align_items(Alignment::Center)
            .push(Container::new(logger_view(&state.logger)).width(Length::Fixed(480.0)))
            .push(
                Container::new(card)
                    .padding(32)
                    .width(Length::Fixed(480.0))
                    .style(style::container(style::card_appearance)),
            ),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x()
    .center_y()
    .style(style::container(style::bg_main_appearance))
    .into()
}
