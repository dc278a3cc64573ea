//! Cloud Storage Planner
//!
//! Plans cloud drive layouts for storage clusters. Given capacity and IOPS
//! requirements it picks a drive type, drive size, drive count and instances
//! per zone from a storage decision matrix, and it recommends how to grow an
//! existing storage pool by resizing or adding drives.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                          Provider Adapters                                   │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────────┐  │
//! │  │     Azure       │  │      GCE        │  │           AWS               │  │
//! │  │ (row max IOPS)  │  │ (URL drive type)│  │      (gp2 / io1)            │  │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────┬───────────────┘  │
//! │           └────────────────────┼─────────────────────────┘                   │
//! ├────────────────────────────────┼────────────────────────────────────────────┤
//! │                             Planner                                          │
//! │  ┌─────────────────────────────┴──┐  ┌─────────────────────────────────┐    │
//! │  │     Distribution Planner       │  │      Pool-Update Planner        │    │
//! │  │  (type, size, count, zones)    │  │   (resize disk / add disk)      │    │
//! │  └───────────────┬────────────────┘  └───────────────┬─────────────────┘    │
//! │                  └──────────────┬────────────────────┘                       │
//! ├─────────────────────────────────┼───────────────────────────────────────────┤
//! │                       Storage Decision Matrix                                │
//! │  ┌──────────────────────┐  ┌────┴─────────────────┐  ┌──────────────────┐   │
//! │  │  Parser (YAML/JSON)  │  │   Filters / Sorts    │  │    Generators    │   │
//! │  └──────────────────────┘  └──────────────────────┘  └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`providers`]: Cloud-specific storage managers, factory and registry
//! - [`planner`]: Distribution and pool-update search
//! - [`matrix`]: Decision matrix rows, filters, parser and generators
//! - [`domain`]: Request/response types and the `StorageManager` trait
//! - [`config`]: Planner configuration
//! - [`error`]: Error types and handling

pub mod config;
pub mod domain;
pub mod error;
pub mod matrix;
pub mod planner;
pub mod providers;

// Re-export commonly used types
pub use config::PlannerConfig;

pub use domain::ports::{
    Provider, ResizeOperationType, StorageDistributionRequest, StorageDistributionResponse,
    StorageManager, StoragePoolSpec, StoragePoolUpdateRequest, StoragePoolUpdateResponse,
    StorageSpec,
};

pub use error::{Error, ErrorClass, Result};

pub use matrix::{aws_matrix, gce_matrix, DecisionMatrix, DecisionMatrixRow, MatrixParser};

pub use planner::{
    add_disk, get_storage_distribution_for_pool, get_storage_update_config, resize_disk,
    PoolDistribution, PoolUpdate,
};

pub use providers::{
    AwsStorageManager, AzureStorageManager, GceStorageManager, ProviderFactory, ProviderRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
