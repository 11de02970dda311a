use anyhow::{anyhow, bail, Context};
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;

use medibook::client::config::ClientConfig;
use medibook::client::models::appointment_rules::{allowed_actions, is_allowed, AppointmentAction};
use medibook::client::models::booking::{available_slots, parse_date_input, BookingError, TimeSlot};
use medibook::client::models::doctor_search::DoctorSearch;
use medibook::client::models::forms::{LoginForm, RegistrationForm};
use medibook::client::models::pagination::showing_label;
use medibook::client::services::Services;
use medibook::client::utils::session_store::SessionStore;
use medibook::common::error::ApiError;
use medibook::common::models::{
    Appointment, CreateAppointmentRequest, DoctorAppointmentsQuery, PatientAppointmentsQuery, Role,
    Session, StatusFilter,
};

#[derive(Parser)]
#[command(name = "medibook-cli")]
#[command(about = "Book and manage medical appointments from the terminal")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// PATIENT or DOCTOR
        #[arg(short, long)]
        role: Role,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List doctors, optionally filtered
    Doctors {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// List the known specializations
    Specializations,
    /// List your appointments
    Appointments {
        /// PENDING, CONFIRMED, COMPLETED, CANCELLED or ALL
        #[arg(short, long, default_value = "PENDING")]
        status: StatusFilter,
        /// Only for doctors: YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Book a 30 minute slot with a doctor
    Book {
        #[arg(long)]
        doctor: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM, on the hour between 09:00 and 17:00
        #[arg(long)]
        time: String,
    },
    /// Cancel a pending appointment
    Cancel { id: String },
    /// Mark an appointment as completed (doctors only)
    Complete { id: String },
    /// Confirm a pending appointment (doctors only)
    Confirm { id: String },
    /// Create a patient account
    RegisterPatient {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// Create a doctor account
    RegisterDoctor {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        specialization: String,
        #[arg(long)]
        photo_url: Option<String>,
    },
}

fn require_session(services: &Services) -> anyhow::Result<Session> {
    services
        .session()
        .rehydrate()
        .ok_or_else(|| anyhow!("You are not signed in. Run `medibook-cli login` first."))
}

fn print_appointment(appointment: &Appointment, viewer: Role) {
    let actions: Vec<&str> = allowed_actions(appointment.status, viewer)
        .iter()
        .map(|a| a.label())
        .collect();
    println!(
        "{}  {}  {:<10}  {}{}",
        appointment.id,
        appointment.date.format("%Y-%m-%d %H:%M UTC"),
        appointment.status.as_str(),
        appointment.counterpart_name(viewer),
        if actions.is_empty() {
            String::new()
        } else {
            format!("  [{}]", actions.join(", "))
        }
    );
}

/// Walks every page of the viewer's appointments until `id` turns up.
async fn find_appointment(services: &Services, session: &Session, id: &str) -> anyhow::Result<Appointment> {
    let mut page = 1;
    loop {
        let result = match session.user.role {
            Role::Patient => {
                services
                    .appointments
                    .patient_appointments(PatientAppointmentsQuery { status: StatusFilter::All, page })
                    .await?
            }
            Role::Doctor => {
                services
                    .appointments
                    .doctor_appointments(DoctorAppointmentsQuery { date: None, status: StatusFilter::All, page })
                    .await?
            }
        };
        if let Some(found) = result.items.iter().find(|a| a.id == id) {
            return Ok(found.clone());
        }
        if page >= result.total_pages || result.items.is_empty() {
            bail!("No appointment with id {} in your list", id);
        }
        page += 1;
    }
}

async fn change_status(services: &Services, id: &str, action: AppointmentAction) -> anyhow::Result<()> {
    let session = require_session(services)?;
    let appointment = find_appointment(services, &session, id).await?;
    if !is_allowed(appointment.status, session.user.role, action) {
        bail!(
            "Cannot {} an appointment that is {} as a {}",
            action.label().to_lowercase(),
            appointment.status.as_str().to_lowercase(),
            session.user.role
        );
    }
    let message = services
        .appointments
        .update_status(&appointment.id, action.target_status())
        .await
        .map_err(|e| anyhow!(e.user_message("Failed to update appointment")))?;
    println!("{}", message);
    Ok(())
}

fn booking_request(doctor: &str, date: &str, time: &str) -> anyhow::Result<CreateAppointmentRequest> {
    let date = parse_date_input(date)?;
    if date < Utc::now().date_naive() {
        return Err(BookingError::PastDate(date).into());
    }
    let slot = TimeSlot::parse(time).ok_or_else(|| BookingError::InvalidSlot(time.to_string()))?;
    Ok(CreateAppointmentRequest::at(doctor, NaiveDateTime::new(date, slot.start())))
}

async fn run(command: Commands, services: Services) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password, role } => {
            let request = LoginForm { email, password, role: Some(role) }
                .validate()
                .map_err(ApiError::from)?;
            let session = services
                .auth
                .login(request)
                .await
                .map_err(|e| anyhow!(e.user_message("Login failed")))?;
            println!("Signed in as {} ({})", session.user.name, session.user.role);
        }
        Commands::Logout => {
            services.auth.logout();
            println!("Signed out");
        }
        Commands::Whoami => match services.session().rehydrate() {
            Some(session) => println!(
                "{} <{}> ({})",
                session.user.name, session.user.email, session.user.role
            ),
            None => println!("Not signed in"),
        },
        Commands::Doctors { search, specialization } => {
            require_session(&services)?;
            let doctors = services
                .doctors
                .doctors()
                .await
                .map_err(|e| anyhow!(e.user_message("Failed to fetch doctors")))?;
            let mut filter = DoctorSearch::new(usize::MAX);
            if let Some(search) = search {
                filter.set_query(search);
            }
            if let Some(specialization) = specialization {
                filter.set_specialization(specialization);
            }
            let matching = filter.filter(&doctors);
            for doctor in &matching {
                println!("{}  Dr. {}  {}", doctor.id, doctor.name, doctor.specialization);
            }
            println!("{}", showing_label(matching.len(), matching.len() as u64, "doctors"));
        }
        Commands::Specializations => {
            require_session(&services)?;
            let specializations = services
                .doctors
                .specializations()
                .await
                .map_err(|e| anyhow!(e.user_message("Failed to fetch specializations")))?;
            for specialization in specializations {
                println!("{}", specialization);
            }
        }
        Commands::Appointments { status, date, page } => {
            let session = require_session(&services)?;
            let viewer = session.user.role;
            let page = page.max(1);
            let result = match viewer {
                Role::Patient => {
                    if date.is_some() {
                        bail!("Filtering by date is only available to doctors");
                    }
                    services
                        .appointments
                        .patient_appointments(PatientAppointmentsQuery { status, page })
                        .await
                }
                Role::Doctor => {
                    let date = date.as_deref().map(parse_date_input).transpose()?;
                    services
                        .appointments
                        .doctor_appointments(DoctorAppointmentsQuery { date, status, page })
                        .await
                }
            }
            .map_err(|e| anyhow!(e.user_message("Failed to fetch appointments")))?;

            if result.items.is_empty() {
                println!("No appointments found.");
            }
            for appointment in &result.items {
                print_appointment(appointment, viewer);
            }
            println!(
                "{} (page {} of {})",
                showing_label(result.items.len(), result.total, "appointments"),
                page,
                result.total_pages.max(1)
            );
        }
        Commands::Book { doctor, date, time } => {
            let session = require_session(&services)?;
            if session.user.role != Role::Patient {
                bail!("Only patients can book appointments");
            }
            let request = booking_request(&doctor, &date, &time).with_context(|| {
                let slots: Vec<String> = available_slots().iter().map(TimeSlot::label).collect();
                format!("Available times: {}", slots.join(", "))
            })?;
            info!("[BOOKING] Booking {} with doctor {}", request.date, request.doctor_id);
            services
                .appointments
                .create(request)
                .await
                .map_err(|e| anyhow!(e.user_message("Failed to book appointment")))?;
            println!("Appointment booked successfully!");
        }
        Commands::Cancel { id } => change_status(&services, &id, AppointmentAction::Cancel).await?,
        Commands::Complete { id } => change_status(&services, &id, AppointmentAction::Complete).await?,
        Commands::Confirm { id } => change_status(&services, &id, AppointmentAction::Confirm).await?,
        Commands::RegisterPatient { name, email, password, photo_url } => {
            let form = RegistrationForm {
                role: Role::Patient,
                name,
                email,
                password,
                specialization: String::new(),
                photo_url: photo_url.unwrap_or_default(),
            };
            let message = services
                .auth
                .register(form.validate().map_err(ApiError::from)?)
                .await
                .map_err(|e| anyhow!(e.user_message("Registration failed")))?;
            println!("{}", message);
        }
        Commands::RegisterDoctor { name, email, password, specialization, photo_url } => {
            let form = RegistrationForm {
                role: Role::Doctor,
                name,
                email,
                password,
                specialization,
                photo_url: photo_url.unwrap_or_default(),
            };
            let message = services
                .auth
                .register(form.validate().map_err(ApiError::from)?)
                .await
                .map_err(|e| anyhow!(e.user_message("Registration failed")))?;
            println!("{}", message);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = ClientConfig::from_env()?;
    let session = SessionStore::from_config(&config);
    let services = Services::connect(&config, session)?;
    run(args.command, services).await
}
