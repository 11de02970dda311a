// Login and registration forms with per-field validation
use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::common::error::ApiError;
use crate::common::models::{DoctorRegistration, LoginRequest, PatientRegistration, Role};

pub const MSG_NAME: &str = "Name is required";
pub const MSG_EMAIL: &str = "Invalid email";
pub const MSG_PASSWORD: &str = "Password must be at least 6 characters";
pub const MSG_SPECIALIZATION: &str = "Specialization is required";
pub const MSG_URL: &str = "Invalid URL";
pub const MSG_ROLE: &str = "Please select a role";

const MIN_PASSWORD: usize = 6;
const MIN_NAME: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    Role,
    Specialization,
    PhotoUrl,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Role => "role",
            Field::Specialization => "specialization",
            Field::PhotoUrl => "photo_url",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    fn check(&mut self, field: Field, ok: bool, message: &'static str) {
        if !ok {
            self.0.insert(field, message);
        }
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Empty is allowed; anything else must parse as an absolute URL.
pub fn is_valid_optional_url(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || Url::parse(value).is_ok()
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Email, is_valid_email(&self.email), MSG_EMAIL);
        errors.check(Field::Password, self.password.chars().count() >= MIN_PASSWORD, MSG_PASSWORD);
        errors.check(Field::Role, self.role.is_some(), MSG_ROLE);
        let role = self.role.unwrap_or(Role::Patient);
        errors.into_result(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role,
        })
    }
}

/// A validated registration, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Patient(PatientRegistration),
    Doctor(DoctorRegistration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub photo_url: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            role: Role::Patient,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            specialization: String::new(),
            photo_url: String::new(),
        }
    }
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.check(Field::Name, self.name.trim().chars().count() >= MIN_NAME, MSG_NAME);
        errors.check(Field::Email, is_valid_email(&self.email), MSG_EMAIL);
        errors.check(Field::Password, self.password.chars().count() >= MIN_PASSWORD, MSG_PASSWORD);
        errors.check(Field::PhotoUrl, is_valid_optional_url(&self.photo_url), MSG_URL);
        if self.role == Role::Doctor {
            errors.check(
                Field::Specialization,
                self.specialization.trim().chars().count() >= MIN_NAME,
                MSG_SPECIALIZATION,
            );
        }

        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let photo_url = optional(&self.photo_url);
        let registration = match self.role {
            Role::Patient => Registration::Patient(PatientRegistration {
                name,
                email,
                password: self.password.clone(),
                photo_url,
            }),
            Role::Doctor => Registration::Doctor(DoctorRegistration {
                name,
                email,
                password: self.password.clone(),
                specialization: self.specialization.trim().to_string(),
                photo_url,
            }),
        };
        errors.into_result(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email(" jane.doe@mail.example.org "));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@example..com"));
    }

    #[test]
    fn login_requires_role_and_long_password() {
        let form = LoginForm { email: "bad".into(), password: "123".into(), role: None };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(MSG_EMAIL));
        assert_eq!(errors.get(Field::Password), Some(MSG_PASSWORD));
        assert_eq!(errors.get(Field::Role), Some(MSG_ROLE));

        let form = LoginForm {
            email: "doc@example.com".into(),
            password: "secret1".into(),
            role: Some(Role::Doctor),
        };
        assert_eq!(form.validate().unwrap().role, Role::Doctor);
    }

    #[test]
    fn doctor_registration_needs_specialization() {
        let mut form = RegistrationForm {
            role: Role::Doctor,
            name: "Gregory House".into(),
            email: "house@example.com".into(),
            password: "vicodin".into(),
            specialization: "".into(),
            photo_url: "".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Specialization), Some(MSG_SPECIALIZATION));
        assert_eq!(errors.iter().count(), 1);

        form.specialization = "Diagnostics".into();
        match form.validate().unwrap() {
            Registration::Doctor(request) => {
                assert_eq!(request.specialization, "Diagnostics");
                assert_eq!(request.photo_url, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn patient_photo_url_must_parse_when_present() {
        let mut form = RegistrationForm {
            name: "Jo".into(),
            email: "jo@example.com".into(),
            password: "abcdef".into(),
            photo_url: "not a url".into(),
            ..RegistrationForm::default()
        };
        assert_eq!(form.validate().unwrap_err().get(Field::PhotoUrl), Some(MSG_URL));

        form.photo_url = "https://cdn.example.com/jo.png".into();
        match form.validate().unwrap() {
            Registration::Patient(request) => {
                assert_eq!(request.photo_url.as_deref(), Some("https://cdn.example.com/jo.png"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn single_letter_name_is_rejected() {
        let form = RegistrationForm {
            name: "J".into(),
            email: "j@example.com".into(),
            password: "abcdef".into(),
            ..RegistrationForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Name), Some(MSG_NAME));
        assert_eq!(ApiError::from(errors).to_string(), "validation failed: name: Name is required");
    }
}
