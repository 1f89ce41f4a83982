//! src/configuration.rs

use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub activation: ActivationSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Process-wide activation settings, loaded once at startup and handed to
/// [`ActivationTokenManager::new`](crate::activation::ActivationTokenManager::new).
#[derive(serde::Deserialize, Clone, Debug)]
pub struct ActivationSettings {
    pub secret_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub expiration_hours: u32,
    #[serde(default)]
    pub hashing: HashingSettings,
}

/// Argon2 work factor used for hashed activation records.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HashingSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub memory_kib: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub iterations: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: 15000,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl ActivationSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.secret_key.expose_secret().trim().is_empty() {
            return Err(ConfigurationError::Missing("SECRET_KEY"));
        }
        if self.expiration_hours == 0 {
            return Err(ConfigurationError::Missing("EXPIRATION_HOURS"));
        }
        Ok(())
    }

    pub fn validity(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.expiration_hours))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration value `{0}` is missing or invalid")]
    Missing(&'static str),
    #[error("Failed to load configuration")]
    Load(#[from] config::ConfigError),
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigurationError::Load(config::ConfigError::Foreign(Box::new(e))))?;
    load_configuration(&base_path.join("configuration"), |key| std::env::var(key).ok())
}

/// Layers `base.yaml`, the environment file, `APP_*` variables and finally the
/// bare `SECRET_KEY` / `EXPIRATION_HOURS` values returned by `lookup`.
pub fn load_configuration<F>(
    configuration_directory: &std::path::Path,
    lookup: F,
) -> Result<Settings, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    // Detect the running environment, default to `local` if unspecified.
    let environment: Environment = lookup("APP_ENVIRONMENT")
        .unwrap_or_else(|| "local".into())
        .try_into()
        .map_err(|_| ConfigurationError::Missing("APP_ENVIRONMENT"))?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("activation.secret_key", lookup("SECRET_KEY"))?
        .set_override_option("activation.expiration_hours", lookup("EXPIRATION_HOURS"))?
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.activation.validate()?;
    Ok(settings)
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
