//! Decision Matrix Rows
//!
//! A storage decision matrix lists the drive configurations a cloud provider
//! supports. Each row bounds the IOPS, drive size and per-instance drive count
//! a drive type can deliver; the planner only ever reads it.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn wildcard() -> String {
    "*".to_string()
}

// =============================================================================
// Decision Matrix Row
// =============================================================================

/// One supported drive configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionMatrixRow {
    /// Drive type identifier (e.g. "Premium_LRS", "pd-ssd")
    pub drive_type: String,
    /// Lowest IOPS this configuration serves (inclusive)
    pub min_iops: u64,
    /// Highest IOPS this configuration serves (inclusive)
    pub max_iops: u64,
    /// Smallest drive size in GiB (inclusive)
    pub min_size: u64,
    /// Largest drive size in GiB (inclusive)
    pub max_size: u64,
    /// Fewest drives of this type on one instance
    pub instance_min_drives: u64,
    /// Most drives of this type on one instance
    pub instance_max_drives: u64,
    /// Tie-break preference, lower wins
    #[serde(default)]
    pub priority: i32,
    /// Instance type this row applies to
    #[serde(default = "wildcard")]
    pub instance_type: String,
    /// Region this row applies to
    #[serde(default = "wildcard")]
    pub region: String,
    #[serde(default)]
    pub thin_provisioning: bool,
}

impl Default for DecisionMatrixRow {
    fn default() -> Self {
        Self {
            drive_type: String::new(),
            min_iops: 0,
            max_iops: 0,
            min_size: 0,
            max_size: 0,
            instance_min_drives: 1,
            instance_max_drives: 8,
            priority: 0,
            instance_type: wildcard(),
            region: wildcard(),
            thin_provisioning: false,
        }
    }
}

impl DecisionMatrixRow {
    /// Create a row for a drive type with the common defaults
    pub fn new(drive_type: impl Into<String>) -> Self {
        Self {
            drive_type: drive_type.into(),
            ..Default::default()
        }
    }

    pub fn with_iops(mut self, min: u64, max: u64) -> Self {
        self.min_iops = min;
        self.max_iops = max;
        self
    }

    pub fn with_size(mut self, min: u64, max: u64) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    pub fn with_drives(mut self, min: u64, max: u64) -> Self {
        self.instance_min_drives = min;
        self.instance_max_drives = max;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn serves_iops(&self, iops: u64) -> bool {
        self.min_iops <= iops && iops <= self.max_iops
    }

    #[inline]
    pub fn fits_size(&self, size: u64) -> bool {
        self.min_size <= size && size <= self.max_size
    }

    #[inline]
    pub fn fits_drive_count(&self, count: u64) -> bool {
        self.instance_min_drives <= count && count <= self.instance_max_drives
    }

    /// Check the row's range bounds
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.drive_type.is_empty() {
            return Err("drive type is empty".into());
        }
        if self.min_iops > self.max_iops {
            return Err(format!(
                "min IOPS {} is greater than max IOPS {}",
                self.min_iops, self.max_iops
            ));
        }
        if self.min_size > self.max_size {
            return Err(format!(
                "min size {} GiB is greater than max size {} GiB",
                self.min_size, self.max_size
            ));
        }
        if self.instance_min_drives > self.instance_max_drives {
            return Err(format!(
                "instance min drives {} is greater than instance max drives {}",
                self.instance_min_drives, self.instance_max_drives
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Decision Matrix
// =============================================================================

/// Ordered table of supported drive configurations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionMatrix {
    pub rows: Vec<DecisionMatrixRow>,
}

impl DecisionMatrix {
    pub fn new(rows: Vec<DecisionMatrixRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&DecisionMatrixRow> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecisionMatrixRow> {
        self.rows.iter()
    }

    /// Validate every row, reporting the first one out of bounds
    pub fn validate(&self) -> Result<()> {
        for (index, row) in self.rows.iter().enumerate() {
            row.validate()
                .map_err(|reason| Error::InvalidMatrixRow { index, reason })?;
        }
        Ok(())
    }
}

impl FromIterator<DecisionMatrixRow> for DecisionMatrix {
    fn from_iter<I: IntoIterator<Item = DecisionMatrixRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DecisionMatrix {
    type Item = &'a DecisionMatrixRow;
    type IntoIter = std::slice::Iter<'a, DecisionMatrixRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
