use crate::config::{load_application_config, RunSettings};
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::sync::Arc;
use tracing::info;
use traitscan_report::{Report, ReportOptions};
use traitscan_runner::Runner;

pub async fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_application_config(matches)?;
    let settings = RunSettings::resolve(matches, &config)?;

    run(&settings).await
}

async fn run(settings: &RunSettings) -> Result<()> {
    let input = &settings.dataset.input;
    info!("Reading from {}", input.display());

    let dataset = Arc::new(settings.dataset.load()?);
    info!(
        "File has {} rows and {} columns.",
        dataset.num_rows(),
        dataset.num_columns()
    );

    let runner = Runner::new(settings.runner.clone())?;
    let results = runner.run(dataset).await?;

    info!(
        "Finished all rows. Writing results to {}",
        settings.output.display()
    );

    let report = Report::build(
        &results.trait_dictionaries,
        &results.remaining_counts,
        &ReportOptions {
            threshold: settings.threshold,
            ..Default::default()
        },
    );

    std::fs::write(&settings.output, report.render(&input.display().to_string()))
        .with_context(|| format!("could not write report to {}", settings.output.display()))?;

    info!("All done here.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[tokio::test]
    async fn writes_report_for_csv() {
        let dir = TempDir::new("traitscan").unwrap();
        let input = dir.path().join("people.csv");
        let output = dir.path().join("report.txt");

        fs::write(&input, "id,A,B,C\n1,x,1,DE\n2,x,2,DE\n3,y,1,DE\n4,y,2,DE\n").unwrap();

        let input_arg = input.display().to_string();
        let output_arg = output.display().to_string();
        let matches = crate::cli()
            .try_get_matches_from(vec![
                "traitscan",
                "-i",
                input_arg.as_str(),
                "-o",
                output_arg.as_str(),
                "-x",
                "id",
                "-n",
                "2",
            ])
            .unwrap();

        execute(&matches).await.unwrap();

        let report = fs::read_to_string(&output).unwrap();

        assert!(report.starts_with(&format!("Input file = {}\n", input_arg)));
        assert!(report.contains("Count above threshold = 0\n"));
        assert!(report.contains("Max = 2\n"));
        assert!(report.contains("A\t100.00%\n"));
        assert!(report.contains("(A, B)\t100.00%\n"));
        assert!(!report.contains("C\t"));
        assert!(!report.contains("id\t"));
    }

    #[tokio::test]
    async fn empty_input_writes_no_report() {
        let dir = TempDir::new("traitscan").unwrap();
        let input = dir.path().join("empty.csv");
        let output = dir.path().join("report.txt");
        fs::write(&input, "A,B\n").unwrap();

        let input_arg = input.display().to_string();
        let output_arg = output.display().to_string();
        let matches = crate::cli()
            .try_get_matches_from(vec![
                "traitscan",
                "-i",
                input_arg.as_str(),
                "-o",
                output_arg.as_str(),
            ])
            .unwrap();

        assert!(execute(&matches).await.is_err());
        assert!(!output.exists());
    }
}
