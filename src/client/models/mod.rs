pub mod app_state;
pub mod appointment_rules;
pub mod booking;
pub mod doctor_search;
pub mod forms;
pub mod messages;
pub mod pagination;
