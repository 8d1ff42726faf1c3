pub mod args;
pub mod config;
pub mod loader;

pub use args::Args;
pub use config::{AmpConfig, ConfigFile, OutputConfig};
pub use loader::{Settings, SettingsLoader};
