use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which collections get written to the database.
///
/// `Core` persists reports, news and documents only; authorities, slider
/// items, site texts and the logo are reseeded on every start. `All` persists
/// every collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistencePolicy {
    #[default]
    Core,
    All,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    pub listen_addr: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IntakeSettings {
    pub relay_url: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_name: String,
    pub db_compression_enabled: bool,
    pub persistence: PersistencePolicy,
    pub relay: RelaySettings,
    #[serde(default)]
    pub intake: IntakeSettings,
}

impl Settings {
    /// Defaults, then `Settings.toml` if present, then `PORTAL_*` env vars.
    /// A bare `PORT` variable overrides the relay listen port.
    pub fn new() -> Result<Self, ConfigError> {
        let port_override = std::env::var("PORT")
            .ok()
            .map(|port| format!("0.0.0.0:{}", port));
        Config::builder()
            .set_default("database_name", "portal_db")?
            .set_default("db_compression_enabled", false)?
            .set_default("persistence", "core")?
            .set_default("relay.listen_addr", "0.0.0.0:3000")?
            .set_default("relay.smtp_host", "smtp.yandex.com")?
            .set_default("relay.smtp_port", 465)?
            .set_default("relay.smtp_user", "")?
            .set_default("relay.smtp_password", "")?
            .set_default("relay.from_address", "portal@localhost")?
            .add_source(File::with_name("Settings").required(false))
            .add_source(
                Environment::with_prefix("PORTAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("relay.listen_addr", port_override)?
            .build()?
            .try_deserialize()
    }
}
