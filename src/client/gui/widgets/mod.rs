pub mod alert;
pub mod appointment_card;
pub mod doctor_card;
pub mod pagination_bar;
