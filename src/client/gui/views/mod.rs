pub mod booking_modal;
pub mod doctor_dashboard;
pub mod logger;
pub mod login;
pub mod navigation;
pub mod patient_appointments;
pub mod patient_dashboard;
pub mod registration;
