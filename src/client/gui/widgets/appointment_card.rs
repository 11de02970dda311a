use iced::widget::{Button, Column, Container, Row, Space, Text};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, TEXT_ON_DARK, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::models::appointment_rules::{allowed_actions, AppointmentAction};
use crate::client::models::messages::Message;
use crate::common::models::{Appointment, Role};

fn when(appointment: &Appointment) -> String {
    appointment.date.format("%a %d %b %Y at %H:%M UTC").to_string()
}

/// One appointment row. Only the actions allowed for `viewer` are rendered,
/// and they are inert while a status update is pending.
pub fn view<'a>(appointment: &'a Appointment, viewer: Role, actions_enabled: bool) -> Element<'a, Message> {
    let mut details = Column::new()
        .spacing(4)
        .push(
            Text::new(appointment.counterpart_name(viewer).to_string())
                .font(BOLD_FONT)
                .size(16)
                .style(TEXT_PRIMARY),
        )
        .push(Text::new(when(appointment)).size(13).style(TEXT_SECONDARY));
    if viewer == Role::Patient && !appointment.doctor_specialization().is_empty() {
        details = details.push(Text::new(appointment.doctor_specialization()).size(13).style(TEXT_SECONDARY));
    }
    if let Some(symptoms) = appointment.symptoms.as_deref().filter(|s| !s.is_empty()) {
        details = details.push(Text::new(format!("Symptoms: {}", symptoms)).size(12).style(TEXT_SECONDARY));
    }
    if let Some(notes) = appointment.notes.as_deref().filter(|s| !s.is_empty()) {
        details = details.push(Text::new(format!("Notes: {}", notes)).size(12).style(TEXT_SECONDARY));
    }

    let badge = Container::new(Text::new(appointment.status.as_str()).size(11).style(TEXT_ON_DARK))
        .padding([4, 10])
        .style(style::badge_style(appointment.status));

    let mut buttons = Row::new().spacing(6);
    for action in allowed_actions(appointment.status, viewer) {
        let look = match action {
            AppointmentAction::Cancel => iced::theme::Button::Destructive,
            AppointmentAction::Complete => iced::theme::Button::Positive,
            AppointmentAction::Confirm => iced::theme::Button::Primary,
        };
        let mut button = Button::new(Text::new(action.label()).size(13)).style(look).padding([6, 12]);
        if actions_enabled {
            button = button.on_press(Message::RequestAction {
                appointment_id: appointment.id.clone(),
                action: *action,
            });
        }
        buttons = buttons.push(button);
    }

    Container::new(
        Row::new()
            .spacing(12)
            .align_items(Alignment::Center)
            .push(details)
            .push(Space::new(Length::Fill, Length::Shrink))
            .push(Column::new().spacing(8).align_items(Alignment::End).push(badge).push(buttons)),
    )
    .padding(14)
    .width(Length::Fill)
    .style(style::container(style::card_appearance))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_in_utc() {
        let appointment = Appointment {
            id: "a1".into(),
            doctor_id: "d1".into(),
            patient_id: "p1".into(),
            date: "2025-06-10T11:00:00Z".parse().unwrap(),
            status: crate::common::models::AppointmentStatus::Pending,
            symptoms: None,
            notes: None,
            created_at: None,
            updated_at: None,
            doctor: None,
            patient: None,
        };
        assert_eq!(when(&appointment), "Tue 10 Jun 2025 at 11:00 UTC");
    }
}
