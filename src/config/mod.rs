//! Configuration management

use crate::types::{CopyError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Command-line arguments of the demo binary
#[derive(Debug, Parser)]
#[command(name = "objkopy")]
#[command(about = "Structural object copies: clone records and project them into other shapes")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Extra fields never copied into a type, as TYPE=field,field.
    /// Fields are Rust identifiers (foo_id, not fooId), matched ignoring case
    #[arg(long = "exclude", value_name = "TYPE=FIELDS")]
    pub exclude: Vec<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Global configuration for objkopy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pretty-print serialized output
    pub pretty_json: bool,

    /// Maximum log level
    pub log_level: String,

    pub log_format: LogFormat,

    /// Destination type name -> fields never copied into it
    ///
    /// Field names are the Rust identifiers of the destination's fields,
    /// matched ignoring case. Serialized names such as `fooId` match
    /// nothing; unmatched names are logged as warnings.
    pub exclusions: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty_json: false,
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            exclusions: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    /// ```
    /// use objkopy::Config;
    ///
    /// let config = Config::from_toml_str(r#"
    ///     log_level = "debug"
    ///
    ///     [exclusions]
    ///     Foo = ["foo_id"]
    /// "#)?;
    /// assert_eq!(config.exclusions["Foo"], vec!["foo_id".to_string()]);
    /// # Ok::<(), objkopy::CopyError>(())
    /// ```
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| CopyError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.level()?;

        for (type_name, fields) in &self.exclusions {
            if type_name.trim().is_empty() {
                return Err(CopyError::Config(
                    "Exclusion type name cannot be empty".to_string(),
                ));
            }
            if fields.iter().any(|field| field.trim().is_empty()) {
                return Err(CopyError::Config(format!(
                    "Empty field name in exclusions for {}",
                    type_name
                )));
            }
        }

        Ok(())
    }

    /// Configured log level
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| CopyError::Config(format!("Unknown log level: {}", self.log_level)))
    }

    /// Add exclusions for `type_name`, keeping any already configured
    pub fn add_exclusions<I, S>(&mut self, type_name: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions
            .entry(type_name.to_string())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
    }
}

impl TryFrom<Cli> for Config {
    type Error = CopyError;

    fn try_from(cli: Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if cli.pretty {
            config.pretty_json = true;
        }
        if let Some(level) = cli.log_level {
            config.log_level = level;
        }
        if let Some(format) = cli.log_format {
            config.log_format = format;
        }
        for arg in &cli.exclude {
            let (type_name, fields) = parse_exclusion(arg)?;
            config.add_exclusions(&type_name, fields);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a `TYPE=field,field` exclusion argument
fn parse_exclusion(arg: &str) -> Result<(String, Vec<String>)> {
    let (type_name, fields) = arg.split_once('=').ok_or_else(|| {
        CopyError::Config(format!("Exclusion must look like TYPE=field,field: {}", arg))
    })?;

    let fields: Vec<String> = fields
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        return Err(CopyError::Config(format!(
            "Exclusion for {} lists no fields",
            type_name.trim()
        )));
    }

    Ok((type_name.trim().to_string(), fields))
}
