use iced::widget::{scrollable, Column, Container, PickList, Row, Space, Text, TextInput};
use iced::{Alignment, Element, Length};

use crate::client::gui::style::{self, BOLD_FONT, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::client::gui::views::{booking_modal, navigation};
use crate::client::gui::widgets::{alert, doctor_card, pagination_bar};
use crate::client::models::app_state::ClientState;
use crate::client::models::doctor_search::specialization_options;
use crate::client::models::messages::Message;
use crate::client::models::pagination::showing_label;

const CARDS_PER_ROW: usize = 3;

fn filters(state: &ClientState) -> Element<Message> {
    let known = state.specializations.data.clone().unwrap_or_default();
    let options = specialization_options(&known);
    let selected = Some(state.doctor_search.specialization().to_string());

    Row::new()
        .spacing(12)
        .align_items(Alignment::Center)
        .push(
            Container::new(
                TextInput::new("Search doctors by name", state.doctor_search.query())
                    .on_input(Message::DoctorSearchChanged)
                    .padding(10)
                    .size(14),
            )
            .width(Length::FillPortion(2))
            .style(style::container(style::input_appearance)),
        )
        .push(
            PickList::new(options, selected, Message::SpecializationSelected)
                .placeholder("Specialization")
                .padding(10)
                .width(Length::FillPortion(1)),
        )
        .into()
}

fn doctor_grid(state: &ClientState) -> Element<Message> {
    let visible = state.visible_doctors();
    if visible.is_empty() {
        let text = if state.doctors.is_loading {
            "Loading doctors..."
        } else {
            "No doctors match your search."
        };
        return Container::new(Text::new(text).size(15).style(TEXT_SECONDARY))
            .padding(30)
            .width(Length::Fill)
            .center_x()
            .into();
    }

    let booking_enabled = state.booking.is_none();
    let mut grid = Column::new().spacing(12);
    for chunk in visible.chunks(CARDS_PER_ROW) {
        let mut row = Row::new().spacing(12);
        for doctor in chunk {
            row = row.push(doctor_card::view(*doctor, booking_enabled));
        }
        for _ in chunk.len()..CARDS_PER_ROW {
            row = row.push(Space::new(Length::Fill, Length::Shrink));
        }
        grid = grid.push(row);
    }
    grid.into()
}

pub fn view(state: &ClientState) -> Element<Message> {
    let mut content = Column::new()
        .spacing(16)
        .push(Text::new("Find a Doctor").font(BOLD_FONT).size(26).style(TEXT_PRIMARY))
        .push(filters(state));

    if let Some(booking) = &state.booking {
        content = content.push(
            Container::new(booking_modal::view(state, booking))
                .width(Length::Fill)
                .center_x(),
        );
    }

    if let Some(err) = &state.doctors.error {
        content = content.push(alert::error_box(
            err.user_message("Failed to fetch doctors"),
            Some(Message::RetryDoctors),
        ));
    }

    content = content.push(doctor_grid(state));

    let filtered = state.doctor_search.filter(state.all_doctors()).len();
    let pages = state.doctor_page_count() as u32;
    if pages > 0 {
        content = content.push(pagination_bar::view(
            state.doctor_search.page() as u32,
            pages,
            showing_label(state.visible_doctors().len(), filtered as u64, "doctors"),
            state.doctors.is_loading,
            |page| Message::DoctorsPageSelected(page as usize),
        ));
    }

    navigation::frame(state, scrollable(content).height(Length::Fill).into())
}
