use std::fmt;

use crate::common::models::{AppointmentStatus, Role, StatusUpdate};

/// Status change a user can request from a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentAction {
    Confirm,
    Complete,
    Cancel,
}

impl AppointmentAction {
    pub fn target_status(&self) -> StatusUpdate {
        match self {
            AppointmentAction::Confirm => StatusUpdate::Confirmed,
            AppointmentAction::Complete => StatusUpdate::Completed,
            AppointmentAction::Cancel => StatusUpdate::Cancelled,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppointmentAction::Confirm => "Confirm",
            AppointmentAction::Complete => "Mark Completed",
            AppointmentAction::Cancel => "Cancel",
        }
    }

    /// Question shown in the confirmation dialog.
    pub fn prompt(&self) -> &'static str {
        match self {
            AppointmentAction::Confirm => "Confirm this appointment?",
            AppointmentAction::Complete => "Mark this appointment as completed?",
            AppointmentAction::Cancel => "Are you sure you want to cancel this appointment?",
        }
    }
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const PATIENT_PENDING: &[AppointmentAction] = &[AppointmentAction::Cancel];
const DOCTOR_PENDING: &[AppointmentAction] =
    &[AppointmentAction::Confirm, AppointmentAction::Complete, AppointmentAction::Cancel];
const DOCTOR_CONFIRMED: &[AppointmentAction] = &[AppointmentAction::Complete, AppointmentAction::Cancel];

/// Actions the UI offers for `status` to a user with `role`.
/// The server stays the authority; this only decides which controls exist.
pub fn allowed_actions(status: AppointmentStatus, role: Role) -> &'static [AppointmentAction] {
    match (status, role) {
        (AppointmentStatus::Pending, Role::Patient) => PATIENT_PENDING,
        (AppointmentStatus::Pending, Role::Doctor) => DOCTOR_PENDING,
        (AppointmentStatus::Confirmed, Role::Doctor) => DOCTOR_CONFIRMED,
        (AppointmentStatus::Confirmed, Role::Patient) => &[],
        (AppointmentStatus::Completed | AppointmentStatus::Cancelled, _) => &[],
    }
}

pub fn is_allowed(status: AppointmentStatus, role: Role, action: AppointmentAction) -> bool {
    allowed_actions(status, role).contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_offer_nothing() {
        for role in Role::ALL {
            assert!(allowed_actions(AppointmentStatus::Completed, role).is_empty());
            assert!(allowed_actions(AppointmentStatus::Cancelled, role).is_empty());
        }
    }

    #[test]
    fn patients_may_only_cancel_pending() {
        assert!(is_allowed(AppointmentStatus::Pending, Role::Patient, AppointmentAction::Cancel));
        assert!(!is_allowed(AppointmentStatus::Pending, Role::Patient, AppointmentAction::Confirm));
        assert!(!is_allowed(AppointmentStatus::Pending, Role::Patient, AppointmentAction::Complete));
        assert!(allowed_actions(AppointmentStatus::Confirmed, Role::Patient).is_empty());
    }

    #[test]
    fn doctors_drive_pending_and_confirmed() {
        assert!(is_allowed(AppointmentStatus::Pending, Role::Doctor, AppointmentAction::Confirm));
        assert!(is_allowed(AppointmentStatus::Pending, Role::Doctor, AppointmentAction::Complete));
        assert!(is_allowed(AppointmentStatus::Confirmed, Role::Doctor, AppointmentAction::Complete));
        assert!(is_allowed(AppointmentStatus::Confirmed, Role::Doctor, AppointmentAction::Cancel));
        assert!(!is_allowed(AppointmentStatus::Confirmed, Role::Doctor, AppointmentAction::Confirm));
    }

    #[test]
    fn every_action_targets_a_later_status() {
        for status in AppointmentStatus::ALL {
            for role in Role::ALL {
                for action in allowed_actions(status, role) {
                    assert_ne!(action.target_status().status(), status);
                    assert_ne!(action.target_status().status(), AppointmentStatus::Pending);
                }
            }
        }
    }
}
