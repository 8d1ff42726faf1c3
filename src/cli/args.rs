use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Count path and process exclusions per AMP for Endpoints policy"
)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(long = "config", value_name = "PATH", default_value = "config/api.toml")]
    pub config: PathBuf,

    /// Maximum number of policies to request (overrides amp.limit)
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<u32>,

    /// Directory for policy XML files and CSV summaries (overrides output.dir)
    #[arg(long = "output-dir", value_name = "PATH")]
    pub output_dir: Option<PathBuf>,
}
