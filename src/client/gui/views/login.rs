use iced::widget::{Button, Column, Container, PickList, Row, Text, TextInput};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, EMOJI_FONT, ERROR_COLOR, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::gui::views::logger::logger_view;
use crate::client::models::app_state::ClientState;
use crate::client::models::forms::{Field, FieldErrors};
use crate::client::models::messages::Message;
use crate::client::routing::Route;
use crate::common::models::Role;

pub(crate) fn field_error<'a>(errors: &FieldErrors, field: Field) -> Option<Element<'a, Message>> {
    errors
        .get(field)
        .map(|msg| Text::new(msg).size(12).style(ERROR_COLOR).into())
}

pub(crate) fn labelled<'a>(
    icon: &'a str,
    label: &'a str,
    input: Element<'a, Message>,
    error: Option<Element<'a, Message>>,
) -> Element<'a, Message> {
    let mut column = Column::new()
        .spacing(6)
        .push(
            Row::new()
                .spacing(8)
                .align_items(Alignment::Center)
                .push(Text::new(icon).font(EMOJI_FONT).size(14).style(TEXT_SECONDARY))
                .push(Text::new(label).size(14).style(TEXT_SECONDARY)),
        )
        .push(Container::new(input).style(style::container(style::input_appearance)));
    if let Some(error) = error {
        column = column.push(error);
    }
    column.into()
}

pub fn view(state: &ClientState) -> Element<Message> {
    let form = &state.login;
    let pending = state.login_mutation.is_pending;

    let email = TextInput::new("you@example.com", &form.email)
        .on_input(Message::LoginEmailChanged)
        .on_submit(Message::SubmitLogin)
        .padding(12)
        .size(14);

    let password = Row::new()
        .align_items(Alignment::Center)
        .push(
            TextInput::new("Your password", &form.password)
                .on_input(Message::LoginPasswordChanged)
                .on_submit(Message::SubmitLogin)
                .secure(!state.show_password)
                .padding(12)
                .size(14)
                .width(Length::Fill),
        )
        .push(
            Button::new(Text::new(if state.show_password { "🙈" } else { "👁️" }).font(EMOJI_FONT).size(16))
                .on_press(Message::ToggleShowPassword)
                .style(iced::theme::Button::Text)
                .padding([8, 12]),
        );

    let role = PickList::new(Role::ALL.to_vec(), form.role, Message::LoginRoleSelected)
        .placeholder("Select your role")
        .width(Length::Fill)
        .padding(10);

    let mut submit = Button::new(
        Container::new(Text::new(if pending { "Signing in..." } else { "Sign In" }).font(BOLD_FONT).size(16))
            .width(Length::Fill)
            .center_x(),
    )
    .style(iced::theme::Button::Primary)
    .width(Length::Fill)
    .padding([12, 16]);
    if !pending {
        submit = submit.on_press(Message::SubmitLogin);
    }

    let mut card = Column::new()
        .spacing(18)
        .push(Text::new("Welcome to MediBook").font(BOLD_FONT).size(30).style(TEXT_PRIMARY))
        .push(Text::new("Sign in to manage your appointments").size(15).style(TEXT_SECONDARY))
        .push(labelled("✉️", "Email", email.into(), field_error(&state.login_errors, Field::Email)))
        .push(labelled("🔒", "Password", password.into(), field_error(&state.login_errors, Field::Password)))
        .push(labelled("🧑‍⚕️", "I am a", role.into(), field_error(&state.login_errors, Field::Role)));

    if let Some(err) = &state.login_mutation.error {
        card = card.push(Text::new(err.user_message("Login failed")).size(14).style(ERROR_COLOR));
    }

    card = card.push(submit).push(
        Row::new()
            .spacing(6)
            .align_items(Alignment::Center)
            .push(Text::new("No account yet?").size(14).style(TEXT_SECONDARY))
            .push(
                Button::new(Text::new("Register").size(14))
                    .on_press(Message::Navigate(Route::Register))
                    .style(iced::theme::Button::Text),
            ),
    );

    Container::new(
        Column::new()
            .spacing(16)
            .align_items(Alignment::Center)
            .push(Container::new(logger_view(&state.logger)).width(Length::Fixed(440.0)))
            .push(
                Container::new(card)
                    .padding(32)
                    .width(Length::Fixed(440.0))
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
