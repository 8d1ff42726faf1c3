use std::{path::PathBuf, time::Duration};

use crate::error::AmpError;

use super::args::Args;
use super::config::ConfigFile;

/// Environment variable consulted when the config file carries no secret
pub const SECRET_ENV: &str = "AMP_CLIENT_SECRET";

/// Resolved run settings, built once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub client_id: String,
    pub client_secret: String,
    pub limit: u32,
    pub timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

/// Merge the config file, command line overrides and credentials
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load complete settings from CLI arguments
    pub fn load(args: &Args) -> Result<Settings, AmpError> {
        let config = ConfigFile::load(&args.config)?;
        Self::resolve(args, config, std::env::var(SECRET_ENV).ok())
    }

    /// Build settings from an already loaded config file
    ///
    /// `env_secret` is used only when the config file has no `client_secret`.
    pub fn resolve(
        args: &Args,
        config: ConfigFile,
        env_secret: Option<String>,
    ) -> Result<Settings, AmpError> {
        let amp = config.amp;
        if amp.client_id.trim().is_empty() {
            return Err(AmpError::MissingClientId);
        }

        let client_secret = amp
            .client_secret
            .or(env_secret)
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AmpError::MissingSecret {
                client_id: amp.client_id.clone(),
            })?;

        let mut host = amp.host;
        if !host.ends_with('/') {
            host.push('/');
        }

        Ok(Settings {
            host,
            client_id: amp.client_id,
            client_secret,
            limit: args.limit.unwrap_or(amp.limit),
            timeout: amp.timeout_secs.map(Duration::from_secs),
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or(config.output.dir),
        })
    }
}
