use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::ApiKey;
use crate::error::MailchimpError;
use crate::mailchimp_client::MailchimpClient;

/// Global configuration, loaded from `configuration/*.yaml`. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub mailchimp: MailchimpSettings,
}

/// Api client configuration
#[derive(Deserialize, Clone)]
pub struct MailchimpSettings {
    /// `<key>-<datacenter>`; should only ever be supplied via env var
    /// (`APP_MAILCHIMP__API_KEY`), never committed
    pub api_key: Secret<String>,

    /// Overrides the datacenter url derived from `api_key`. Only useful for
    /// pointing the client at a mock server.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Applies to the whole request, from connecting to reading the body
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl MailchimpSettings {
    pub fn api_key(&self) -> Result<ApiKey, String> { ApiKey::try_from(self.api_key.clone()) }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    pub fn client(&self) -> Result<MailchimpClient, MailchimpError> {
        let api_key = self.api_key().map_err(MailchimpError::InvalidApiKey)?;
        match &self.base_url {
            Some(base_url) => MailchimpClient::with_base_url(base_url.clone(), api_key, self.timeout()),
            None => MailchimpClient::new(api_key, self.timeout()),
        }
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )?;
        Ok(())
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`:
/// `base.yaml`, then `local.yaml` or `production.yaml` (per
/// `APP_ENVIRONMENT`, default `local`), then `APP_*` env vars.
///
/// All fields must be present after merging, otherwise loading fails
/// immediately. The api key itself is only validated when a client is built.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    tracing::info!("loading config for {env} env");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars are -always- parsed as String, `serde-aux` is required to parse other
            // types.
            //
            // `APP_MAILCHIMP__TIMEOUT_MILLISECONDS=5000` -> `Settings.mailchimp.timeout_milliseconds`
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
