// ABOUTME: Run configuration for schema comparisons
// ABOUTME: Loads optional TOML settings and resolves report output paths

use crate::error::{CompareError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How the per-table outcome column is written to the CSV report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StatusEncoding {
    /// `status` column holding the status label
    #[default]
    Status,
    /// `counts_match` column holding `true` / `false`
    CountsMatch,
}

impl StatusEncoding {
    /// Name of the last CSV column for this encoding
    pub fn column_name(&self) -> &'static str {
        match self {
            StatusEncoding::Status => "status",
            StatusEncoding::CountsMatch => "counts_match",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_password_attempts() -> u32 {
    3
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_csv_file_name() -> String {
    "comparison_results.csv".to_string()
}

fn default_html_file_name() -> String {
    "report.html".to_string()
}

/// Settings for a single comparison run
///
/// Every field has a default, so an empty TOML file (or none at all) yields
/// the interactive behavior: exclusion prompt enabled, CSV with a `status`
/// column, no HTML report, three password attempts per database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Tables removed from both sides before comparison
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Ask the operator for additional exclusions
    #[serde(default = "default_true")]
    pub prompt_for_exclusions: bool,
    #[serde(default)]
    pub emit_html: bool,
    #[serde(default)]
    pub status_encoding: StatusEncoding,
    #[serde(default = "default_max_password_attempts")]
    pub max_password_attempts: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_csv_file_name")]
    pub csv_file_name: String,
    #[serde(default = "default_html_file_name")]
    pub html_file_name: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            exclusions: Vec::new(),
            prompt_for_exclusions: true,
            emit_html: false,
            status_encoding: StatusEncoding::default(),
            max_password_attempts: default_max_password_attempts(),
            output_dir: default_output_dir(),
            csv_file_name: default_csv_file_name(),
            html_file_name: default_html_file_name(),
        }
    }
}

impl CompareConfig {
    /// Reject settings that cannot produce a run
    pub fn validate(&self) -> Result<()> {
        if self.max_password_attempts == 0 {
            return Err(CompareError::Config(
                "max_password_attempts must be at least 1".to_string(),
            ));
        }
        if self.csv_file_name.trim().is_empty() {
            return Err(CompareError::Config(
                "csv_file_name cannot be empty".to_string(),
            ));
        }
        if self.emit_html && self.html_file_name.trim().is_empty() {
            return Err(CompareError::Config(
                "html_file_name cannot be empty when emit_html is set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_file_name)
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file_name)
    }
}

/// Parse comparison settings from TOML text
pub fn parse_config(contents: &str) -> Result<CompareConfig> {
    let config: CompareConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load comparison settings from a TOML file
pub fn load_from_file(path: impl AsRef<Path>) -> Result<CompareConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CompareError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_config(&contents)
}
