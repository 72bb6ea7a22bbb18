//! Configuration settings for the N-Queens enumerator

use crate::error::QueensError;
use crate::queens::{encoder::check_board_size, EnumeratorOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub symmetry_expansion: bool,
    pub timeout_seconds: Option<u64>,
    pub max_solutions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig { size: 8 },
            solver: SolverConfig {
                symmetry_expansion: true,
                timeout_seconds: None,
                max_solutions: None,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        check_board_size(self.board.size)?;

        if self.solver.max_solutions == Some(0) {
            return Err(QueensError::InvalidConfiguration(
                "maximum solutions must be positive".to_string(),
            )
            .into());
        }

        if self.solver.timeout_seconds == Some(0) {
            return Err(QueensError::InvalidConfiguration(
                "timeout must be positive".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.board.size = size;
        }
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = Some(max_solutions);
        }
        if let Some(timeout_seconds) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout_seconds);
        }
        if cli_overrides.no_symmetry {
            self.solver.symmetry_expansion = false;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = Some(output_dir.clone());
        }
    }

    /// Options for a [`crate::queens::SolutionEnumerator`]
    pub fn enumerator_options(&self) -> EnumeratorOptions {
        EnumeratorOptions {
            symmetry_expansion: self.solver.symmetry_expansion,
            timeout: self.solver.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<usize>,
    pub max_solutions: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub no_symmetry: bool,
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.board.size, 8);
        assert!(settings.solver.symmetry_expansion);
    }

    #[test]
    fn test_invalid_board_size() {
        let mut settings = Settings::default();
        settings.board.size = 0;
        let error = settings.validate().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<QueensError>(),
            Some(QueensError::InvalidConfiguration(_))
        ));

        settings.board.size = 65;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut settings = Settings::default();
        settings.solver.max_solutions = Some(0);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/queens.yaml");

        let mut settings = Settings::default();
        settings.board.size = 6;
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queens.yaml");
        std::fs::write(
            &path,
            "board:\n  size: 5\nsolver:\n  symmetry_expansion: false\n  timeout_seconds: 30\n  max_solutions: null\noutput:\n  format: text\n  output_directory: null\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.board.size, 5);
        let options = settings.enumerator_options();
        assert!(!options.symmetry_expansion);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            size: Some(10),
            max_solutions: Some(3),
            no_symmetry: true,
            format: Some(OutputFormat::Json),
            ..Default::default()
        });

        assert_eq!(settings.board.size, 10);
        assert_eq!(settings.solver.max_solutions, Some(3));
        assert!(!settings.solver.symmetry_expansion);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.solver.timeout_seconds, None);
    }
}
