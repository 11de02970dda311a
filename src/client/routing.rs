use std::fmt;

use crate::common::models::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    PatientDashboard,
    PatientAppointments,
    DoctorDashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/auth/login",
            Route::Register => "/auth/registration",
            Route::PatientDashboard => "/patient/dashboard",
            Route::PatientAppointments => "/patient/appointments",
            Route::DoctorDashboard => "/doctor/dashboard",
        }
    }

    /// `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login | Route::Register => None,
            Route::PatientDashboard | Route::PatientAppointments => Some(Role::Patient),
            Route::DoctorDashboard => Some(Role::Doctor),
        }
    }

    pub fn is_public(&self) -> bool {
        self.required_role().is_none()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub fn home_route(role: Role) -> Route {
    match role {
        Role::Patient => Route::PatientDashboard,
        Role::Doctor => Route::DoctorDashboard,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

impl GuardDecision {
    /// The route that ends up on screen.
    pub fn resolve(self, requested: Route) -> Route {
        match self {
            GuardDecision::Allow => requested,
            GuardDecision::Redirect(to) => to,
        }
    }
}

/// Gatekeeper for every navigation.
///
/// No session on a protected route goes to login. A session of the wrong role
/// goes to its own home. Signed-in users are also kept off the auth screens.
pub fn guard(route: Route, session: Option<&Session>) -> GuardDecision {
    match (route.required_role(), session) {
        (None, None) => GuardDecision::Allow,
        (None, Some(session)) => GuardDecision::Redirect(home_route(session.user.role)),
        (Some(_), None) => GuardDecision::Redirect(Route::Login),
        (Some(required), Some(session)) if session.user.role == required => GuardDecision::Allow,
        (Some(_), Some(session)) => GuardDecision::Redirect(home_route(session.user.role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::models::User;

    fn session(role: Role) -> Session {
        Session {
            user: User {
                id: "u1".into(),
                name: "Sam".into(),
                email: "sam@example.com".into(),
                role,
                photo_url: None,
            },
            token: "t".into(),
        }
    }

    #[test]
    fn roles_map_to_their_dashboards() {
        assert_eq!(home_route(Role::Patient).path(), "/patient/dashboard");
        assert_eq!(home_route(Role::Doctor).path(), "/doctor/dashboard");
    }

    #[test]
    fn anonymous_users_are_sent_to_login() {
        for route in [Route::PatientDashboard, Route::PatientAppointments, Route::DoctorDashboard] {
            assert_eq!(guard(route, None), GuardDecision::Redirect(Route::Login));
        }
        assert_eq!(guard(Route::Register, None), GuardDecision::Allow);
    }

    #[test]
    fn foreign_role_pages_redirect_home() {
        let doctor = session(Role::Doctor);
        assert_eq!(
            guard(Route::PatientAppointments, Some(&doctor)),
            GuardDecision::Redirect(Route::DoctorDashboard)
        );
        let patient = session(Role::Patient);
        assert_eq!(
            guard(Route::DoctorDashboard, Some(&patient)).resolve(Route::DoctorDashboard),
            Route::PatientDashboard
        );
        assert_eq!(guard(Route::PatientAppointments, Some(&patient)), GuardDecision::Allow);
    }

    #[test]
    fn signed_in_users_skip_login() {
        let patient = session(Role::Patient);
        assert_eq!(guard(Route::Login, Some(&patient)), GuardDecision::Redirect(Route::PatientDashboard));
    }
}
