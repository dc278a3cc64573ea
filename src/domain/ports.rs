//! Domain Ports - Core type and trait definitions for the planner
//!
//! These types carry storage requests into the planner and concrete drive
//! plans back out. Provider adapters implement [`StorageManager`] to expose
//! the planner to cluster orchestration code.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Cloud Providers
// =============================================================================

/// Cloud providers with a storage decision matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Azure,
    Gce,
    Aws,
    Vsphere,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Azure => write!(f, "azure"),
            Provider::Gce => write!(f, "gce"),
            Provider::Aws => write!(f, "aws"),
            Provider::Vsphere => write!(f, "vsphere"),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Provider::Azure),
            "gce" | "gcp" => Ok(Provider::Gce),
            "aws" => Ok(Provider::Aws),
            "vsphere" => Ok(Provider::Vsphere),
            other => Err(Error::Configuration(format!("unknown provider: {}", other))),
        }
    }
}

// =============================================================================
// Resize Operation
// =============================================================================

/// How a storage pool should grow to reach its desired capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResizeOperationType {
    /// Try resizing existing drives first, then fall back to adding drives
    #[default]
    Auto,
    /// Enlarge every existing drive, keeping the drive count
    ResizeDisk,
    /// Attach more drives of the existing size
    AddDisk,
}

impl std::fmt::Display for ResizeOperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeOperationType::Auto => write!(f, "auto"),
            ResizeOperationType::ResizeDisk => write!(f, "resize-disk"),
            ResizeOperationType::AddDisk => write!(f, "add-disk"),
        }
    }
}

impl FromStr for ResizeOperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "auto" | "" => Ok(ResizeOperationType::Auto),
            "resize-disk" | "resize" => Ok(ResizeOperationType::ResizeDisk),
            "add-disk" | "add" => Ok(ResizeOperationType::AddDisk),
            other => Err(Error::Configuration(format!(
                "unknown resize operation type: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Distribution Request/Response
// =============================================================================

/// One user-requested storage shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageSpec {
    /// Target IOPS
    pub iops: u64,
    /// Minimum capacity in GiB across the cluster
    pub min_capacity: u64,
    /// Maximum capacity in GiB across the cluster
    pub max_capacity: u64,
    /// Drive type hint; empty means any drive type
    #[serde(default)]
    pub drive_type: String,
}

/// Request for a drive layout covering one or more storage specs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageDistributionRequest {
    /// Storage shapes to plan, each independently
    pub user_storage_spec: Vec<StorageSpec>,
    /// Compute instance type of the cluster nodes
    #[serde(default)]
    pub instance_type: String,
    /// Requested number of storage-bearing instances per zone
    pub instances_per_zone: u64,
    /// Number of availability zones
    pub zone_count: u64,
}

/// Concrete drive plan for a storage pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoragePoolSpec {
    /// Drive type to provision
    pub drive_type: String,
    /// Capacity of each drive in GiB
    pub drive_capacity_gib: u64,
    /// Number of drives per instance
    pub drive_count: u64,
    /// Number of storage-bearing instances per zone
    pub instances_per_zone: u64,
    /// Estimated IOPS of each drive
    pub iops: u64,
}

/// Drive plans for every spec of a [`StorageDistributionRequest`], in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageDistributionResponse {
    pub instance_storage: Vec<StoragePoolSpec>,
}

// =============================================================================
// Pool Update Request/Response
// =============================================================================

/// Existing pool state plus the capacity it should grow to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoragePoolUpdateRequest {
    /// Desired pool capacity in GiB
    pub desired_capacity: u64,
    /// Requested operation, or auto-select
    #[serde(default)]
    pub resize_operation_type: ResizeOperationType,
    /// Number of drives currently in the pool
    pub current_drive_count: u64,
    /// Size of each current drive in GiB
    pub current_drive_size: u64,
    /// Type of the current drives; required when drives exist
    #[serde(default)]
    pub current_drive_type: String,
    /// IOPS of the current drives
    #[serde(default)]
    pub current_iops: u64,
    /// Drives attached to the node across all pools
    #[serde(default)]
    pub total_drives_on_node: u64,
}

impl StoragePoolUpdateRequest {
    /// Capacity currently provisioned in the pool
    pub fn current_capacity(&self) -> Result<u64> {
        self.current_drive_count
            .checked_mul(self.current_drive_size)
            .ok_or_else(|| self.invalid("current drive count times drive size overflows u64"))
    }

    /// `InvalidUpdateRequest` carrying this request
    pub fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidUpdateRequest {
            request: Box::new(self.clone()),
            reason: reason.into(),
        }
    }
}

/// Chosen update operation and the resulting pool layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StoragePoolUpdateResponse {
    pub resize_operation_type: ResizeOperationType,
    pub instance_storage: Vec<StoragePoolSpec>,
}

// =============================================================================
// Storage Manager Port
// =============================================================================

/// Provider-specific entry point into the planner
pub trait StorageManager: Send + Sync {
    /// Provider this manager plans for
    fn provider(&self) -> Provider;

    /// Plan drives for every spec in the request; fails if any spec fails
    fn get_storage_distribution(
        &self,
        request: &StorageDistributionRequest,
    ) -> Result<StorageDistributionResponse>;

    /// Plan how an existing pool grows to its desired capacity
    fn recommend_storage_pool_update(
        &self,
        request: &StoragePoolUpdateRequest,
    ) -> Result<StoragePoolUpdateResponse>;
}
