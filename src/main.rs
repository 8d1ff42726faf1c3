use std::sync::Arc;

use amp_exclusions::{
    amp::AmpClient,
    cli::{Args, SettingsLoader},
    collector::{PolicyArchive, collect},
    error::AmpError,
    report::Report,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), AmpError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Run initiated");

    let settings = SettingsLoader::load(&args)?;
    let client = Arc::new(AmpClient::new(&settings)?);
    let archive = Arc::new(PolicyArchive::create(&settings.output_dir)?);

    let collection = collect(client, archive).await;

    let report = Report::from_collection(&collection);
    let (path_csv, process_csv) = report.write_csv(&settings.output_dir)?;
    log::info!(
        "Wrote {} and {}",
        path_csv.display(),
        process_csv.display()
    );

    print!("{}", report.render());

    log::info!("Run completed");
    Ok(())
}
