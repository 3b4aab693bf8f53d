use crate::config::{load_application_config, ApplicationConfig, DatasetSettings};
use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_application_config(matches)?;
    let settings = DatasetSettings::resolve(matches, &config)?;

    let dataset = settings.load()?;
    info!(
        "File has {} rows and {} columns.",
        dataset.num_rows(),
        dataset.num_columns()
    );

    for column in dataset.columns() {
        println!(
            "# {}: {} distinct, {} missing",
            column.name(),
            column.distinct(),
            column.missing()
        );
    }

    let starter = ApplicationConfig::starter(&settings.input, &dataset, &settings.identifiers);
    println!("{}", toml::to_string(&starter)?);

    Ok(())
}
