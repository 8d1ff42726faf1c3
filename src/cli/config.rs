use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::AmpError;

pub const DEFAULT_HOST: &str = "https://api.amp.cisco.com/v1/";
pub const DEFAULT_LIMIT: u32 = 500;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub amp: AmpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AmpConfig {
    /// API base URL, including the version path and trailing slash
    #[serde(default = "default_host")]
    pub host: String,
    /// API client ID
    #[serde(default)]
    pub client_id: String,
    /// API client secret (falls back to the AMP_CLIENT_SECRET environment variable)
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Maximum number of policies returned by the listing call
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Per-request timeout in seconds (client default when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            client_id: String::new(),
            client_secret: None,
            limit: DEFAULT_LIMIT,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl ConfigFile {
    /// Load configuration file
    pub fn load(path: &Path) -> Result<Self, AmpError> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, AmpError> {
        toml::from_str(content).map_err(|source| AmpError::ConfigParse {
            path: PathBuf::from(path),
            source,
        })
    }
}
