//! Decision Matrix Parser
//!
//! Loads storage decision matrices from YAML or JSON spec files and writes
//! them back as YAML. Every matrix handed out by the parser has been validated.

use super::row::DecisionMatrix;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reads and writes decision matrix spec files
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixParser;

impl MatrixParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse and validate a matrix from YAML
    pub fn from_yaml_str(&self, contents: &str) -> Result<DecisionMatrix> {
        let matrix: DecisionMatrix = serde_yaml::from_str(contents)?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Parse and validate a matrix from JSON
    pub fn from_json_str(&self, contents: &str) -> Result<DecisionMatrix> {
        let matrix: DecisionMatrix = serde_json::from_str(contents)?;
        matrix.validate()?;
        Ok(matrix)
    }

    /// Load a matrix file, choosing the format from its extension
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DecisionMatrix> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let matrix = match extension.as_str() {
            "yaml" | "yml" => self.from_yaml_str(&contents)?,
            "json" => self.from_json_str(&contents)?,
            other => {
                return Err(Error::Configuration(format!(
                    "unsupported decision matrix format '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };

        info!(
            "Loaded storage decision matrix with {} rows from {}",
            matrix.len(),
            path.display()
        );
        Ok(matrix)
    }

    pub fn to_yaml_string(&self, matrix: &DecisionMatrix) -> Result<String> {
        Ok(serde_yaml::to_string(matrix)?)
    }

    /// Write a matrix to a YAML file
    pub fn save_yaml(&self, matrix: &DecisionMatrix, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_yaml_string(matrix)?)?;
        debug!("Wrote {} matrix rows to {}", matrix.len(), path.display());
        Ok(())
    }
}
