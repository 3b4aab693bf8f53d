use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use ::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};
use traitscan_core::{read_csv, Dataset, DEFAULT_CUTOFF};
use traitscan_runner::{RunnerConfig, DEFAULT_CHECKPOINT};

pub const DEFAULT_CONFIG_PATH: &str = "./traitscan.toml";
const DEFAULT_THRESHOLD: usize = 1;

#[derive(Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ColumnConfiguration {
    Identifier { name: String },
    QuasiIdentifier { name: String },
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApplicationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<usize>,
    #[serde(default)]
    pub columns: Vec<ColumnConfiguration>,
}

impl ApplicationConfig {
    /// A config listing every column of `dataset` as a quasi identifier and every excluded
    /// column as an identifier.
    pub fn starter(input: &Path, dataset: &Dataset, identifiers: &[String]) -> Self {
        let columns = identifiers
            .iter()
            .map(|name| ColumnConfiguration::Identifier { name: name.clone() })
            .chain(
                dataset
                    .column_names()
                    .into_iter()
                    .map(|name| ColumnConfiguration::QuasiIdentifier {
                        name: name.to_string(),
                    }),
            )
            .collect();

        Self {
            input: Some(input.to_path_buf()),
            output: None,
            workers: None,
            cutoff: Some(DEFAULT_CUTOFF),
            checkpoint: Some(DEFAULT_CHECKPOINT),
            threshold: Some(DEFAULT_THRESHOLD),
            columns,
        }
    }
}

pub fn load_config(path: &Path) -> Result<ApplicationConfig, ConfigError> {
    let mut s = config::Config::default();
    s.merge(config::File::from(path))?;
    s.try_into()
}

/// Loads the file given by `--config`, or `./traitscan.toml` when it exists.
pub fn load_application_config(matches: &ArgMatches) -> Result<ApplicationConfig> {
    let path = match matches.value_of("config") {
        Some(path) => PathBuf::from(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => PathBuf::from(DEFAULT_CONFIG_PATH),
        None => return Ok(ApplicationConfig::default()),
    };

    load_config(&path).with_context(|| format!("could not load config {}", path.display()))
}

fn parse_value<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match matches.value_of(name) {
        Some(value) => match value.parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => bail!("invalid value '{}' for --{}: {}", value, name, err),
        },
        None => Ok(None),
    }
}

#[derive(Debug)]
pub struct DatasetSettings {
    pub input: PathBuf,
    pub identifiers: Vec<String>,
    pub quasi_identifiers: Vec<String>,
}

impl DatasetSettings {
    pub fn resolve(matches: &ArgMatches, config: &ApplicationConfig) -> Result<Self> {
        let input = match (matches.value_of("input"), &config.input) {
            (Some(input), _) => PathBuf::from(input),
            (None, Some(input)) => input.clone(),
            (None, None) => bail!("missing input file, pass -i or set `input` in the config"),
        };

        let mut identifiers = vec![];
        let mut quasi_identifiers = vec![];

        for column in &config.columns {
            match column {
                ColumnConfiguration::Identifier { name } => identifiers.push(name.clone()),
                ColumnConfiguration::QuasiIdentifier { name } => {
                    quasi_identifiers.push(name.clone())
                }
            }
        }

        if let Some(excluded) = matches.values_of("exclude") {
            identifiers.extend(excluded.map(str::to_string));
        }

        quasi_identifiers.retain(|name| !identifiers.contains(name));

        Ok(Self {
            input,
            identifiers,
            quasi_identifiers,
        })
    }

    pub fn load(&self) -> Result<Dataset> {
        let mut dataset = read_csv(&self.input)
            .with_context(|| format!("could not read {}", self.input.display()))?;

        if !self.identifiers.is_empty() {
            dataset = dataset.without_columns(&self.identifiers)?;
        }

        if !self.quasi_identifiers.is_empty() {
            dataset = dataset.with_columns(&self.quasi_identifiers)?;
        }

        Ok(dataset)
    }
}

#[derive(Debug)]
pub struct RunSettings {
    pub dataset: DatasetSettings,
    pub output: PathBuf,
    pub runner: RunnerConfig,
    pub threshold: usize,
}

impl RunSettings {
    pub fn resolve(matches: &ArgMatches, config: &ApplicationConfig) -> Result<Self> {
        let dataset = DatasetSettings::resolve(matches, config)?;

        let output = match (matches.value_of("output"), &config.output) {
            (Some(output), _) => PathBuf::from(output),
            (None, Some(output)) => output.clone(),
            (None, None) => bail!("missing output file, pass -o or set `output` in the config"),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("output directory {} does not exist", parent.display());
            }
        }

        let defaults = RunnerConfig::default();
        let runner = RunnerConfig {
            workers: parse_value(matches, "workers")?
                .or(config.workers)
                .unwrap_or(defaults.workers),
            cutoff: parse_value(matches, "cutoff")?
                .or(config.cutoff)
                .unwrap_or(defaults.cutoff),
            checkpoint: parse_value(matches, "checkpoint")?
                .or(config.checkpoint)
                .unwrap_or(defaults.checkpoint),
        };

        let threshold = parse_value(matches, "threshold")?
            .or(config.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);

        Ok(Self {
            dataset,
            output,
            runner,
            threshold,
        })
    }
}
