use iced::widget::{scrollable, Column, Container, PickList, Row, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{BOLD_FONT, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::gui::views::navigation;
use crate::client::gui::widgets::{alert, appointment_card, pagination_bar};
use crate::client::models::app_state::ClientState;
use crate::client::models::messages::Message;
use crate::client::models::pagination::showing_label;
use crate::common::models::{Role, StatusFilter};

/// Shared list body for the patient and doctor screens.
pub(crate) fn appointment_list<'a>(state: &'a ClientState, viewer: Role) -> Element<'a, Message> {
    let mut content = Column::new().spacing(12);

    if let Some(pending) = &state.pending_action {
        content = content.push(alert::confirm_dialog(
            pending.action.prompt(),
            format!("Appointment with {}", pending.counterpart),
            pending.action.label(),
            state.status_mutation.is_pending,
            Message::ConfirmAction,
            Message::DismissAction,
        ));
    }

    if let Some(err) = &state.appointments.error {
        content = content.push(alert::error_box(
            err.user_message("Failed to fetch appointments"),
            Some(Message::RetryAppointments),
        ));
    }

    let items = state.appointments.data.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[]);
    if items.is_empty() {
        let text = if state.appointments.is_loading {
            "Loading appointments..."
        } else {
            "No appointments found."
        };
        content = content.push(
            Container::new(Text::new(text).size(15).style(TEXT_SECONDARY))
                .padding(30)
                .width(Length::Fill)
                .center_x(),
        );
    }

    let actions_enabled = !state.status_mutation.is_pending && state.pending_action.is_none();
    for appointment in items {
        content = content.push(appointment_card::view(appointment, viewer, actions_enabled));
    }

    if let Some(page) = &state.appointments.data {
        if page.total > 0 {
            content = content.push(pagination_bar::view(
                state.appointments_page,
                page.total_pages.max(1),
                showing_label(page.items.len(), page.total, "appointments"),
                state.appointments.is_loading,
                Message::AppointmentsPageSelected,
            ));
        }
    }

    content.into()
}

pub(crate) fn status_picker(state: &ClientState) -> Element<'_, Message> {
    PickList::new(StatusFilter::OPTIONS.to_vec(), Some(state.status_filter), Message::StatusFilterSelected)
        .padding(10)
        .width(Length::Fixed(180.0))
        .into()
}

pub fn view(state: &ClientState) -> Element<Message> {
    let header = Row::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .push(
            Text::new("My Appointments")
                .font(BOLD_FONT)
                .size(26)
                .style(TEXT_PRIMARY)
                .width(Length::Fill),
        )
        .push(Text::new("Status").size(14).style(TEXT_SECONDARY))
        .push(status_picker(state));

    let content = Column::new()
        .spacing(16)
        .push(header)
        .push(appointment_list(state, Role::Patient));

    navigation::frame(state, scrollable(content).height(Length::Fill).into())
}
