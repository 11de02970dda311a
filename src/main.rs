use iced::Application;
use log::info;

use medibook::client::config::ClientConfig;
use medibook::client::gui::app::{AppFlags, MedibookApp};
use medibook::client::services::Services;
use medibook::client::utils::session_store::SessionStore;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from_env()?;
    let session = SessionStore::from_config(&config);
    let services = Services::connect(&config, session)?;

    info!("[APP] Starting MediBook against {}", config.api_base_url);
    let mut settings = iced::Settings::with_flags(AppFlags { config, services });
    settings.window.size = iced::Size::new(1100.0, 760.0);
    MedibookApp::run(settings)?;
    Ok(())
}
