//! Planner Configuration
//!
//! Configuration is loaded once and passed explicitly to whoever needs it.
//! CLI flags override values read from a YAML config file.

use crate::domain::ports::Provider;
use crate::error::{Error, Result};
use crate::matrix::{aws_matrix, gce_matrix, DecisionMatrix, MatrixParser};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Log levels accepted by the subscriber
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Cloud provider whose adapter plans storage
    pub provider: Provider,

    /// Decision matrix spec file (YAML or JSON)
    pub matrix_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Output logs as JSON
    pub log_json: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Azure,
            matrix_path: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: PlannerConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::Configuration(format!(
                "invalid log level '{}', expected one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Load the configured matrix, or generate one for providers that have a
    /// generator
    pub fn load_matrix(&self) -> Result<DecisionMatrix> {
        if let Some(path) = &self.matrix_path {
            return MatrixParser::new().load(path);
        }

        let matrix = generated_matrix(self.provider)?;
        info!(
            "Using generated {} decision matrix with {} rows",
            self.provider,
            matrix.len()
        );
        Ok(matrix)
    }
}

/// Generated matrix for `provider`
pub fn generated_matrix(provider: Provider) -> Result<DecisionMatrix> {
    match provider {
        Provider::Gce => Ok(gce_matrix()),
        Provider::Aws => Ok(aws_matrix()),
        Provider::Azure | Provider::Vsphere => Err(Error::Configuration(format!(
            "no generated decision matrix for provider {}, a matrix file is required",
            provider
        ))),
    }
}
