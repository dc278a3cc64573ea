//! Cloud Storage Planner CLI
//!
//! Plans drive layouts and pool updates against a storage decision matrix
//! and prints the result as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cloud_storage_planner::config::generated_matrix;
use cloud_storage_planner::{
    DecisionMatrix, MatrixParser, PlannerConfig, Provider, ProviderFactory, ResizeOperationType,
    StorageDistributionRequest, StoragePoolUpdateRequest, StorageSpec,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Cloud Storage Planner - drive layouts from a storage decision matrix
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Planner config file (YAML)
    #[arg(long, env = "PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Cloud provider (azure, gce, aws)
    #[arg(long, env = "PROVIDER", global = true)]
    provider: Option<Provider>,

    /// Decision matrix spec file (YAML or JSON)
    #[arg(long, env = "DECISION_MATRIX", global = true)]
    matrix: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan drives for a new storage pool
    Distribute {
        /// Required IOPS per drive
        #[arg(long)]
        iops: u64,

        /// Minimum cluster capacity in GiB
        #[arg(long)]
        min_capacity: u64,

        /// Maximum cluster capacity in GiB
        #[arg(long)]
        max_capacity: u64,

        /// Drive type to restrict the search to
        #[arg(long, default_value = "")]
        drive_type: String,

        /// Instance type of the storage nodes
        #[arg(long, default_value = "")]
        instance_type: String,

        /// Maximum storage instances per zone
        #[arg(long, default_value = "1")]
        instances_per_zone: u64,

        /// Number of zones
        #[arg(long, default_value = "1")]
        zones: u64,
    },

    /// Recommend how to grow an existing storage pool
    Update {
        /// Desired pool capacity in GiB
        #[arg(long)]
        desired_capacity: u64,

        /// Size of each existing drive in GiB
        #[arg(long, default_value = "0")]
        current_drive_size: u64,

        /// Number of drives in the pool
        #[arg(long, default_value = "0")]
        current_drive_count: u64,

        /// Drive type of the existing drives
        #[arg(long, default_value = "")]
        current_drive_type: String,

        /// IOPS of the existing drives
        #[arg(long, default_value = "0")]
        current_iops: u64,

        /// Drives attached to the node across all pools (defaults to the pool's drive count)
        #[arg(long)]
        total_drives_on_node: Option<u64>,

        /// auto, resize-disk or add-disk
        #[arg(long, default_value = "auto")]
        operation: ResizeOperationType,
    },

    /// Write the generated decision matrix for the provider as YAML
    Generate {
        /// Output file (stdout when absent)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Load and validate the configured decision matrix
    Validate,

    /// Print the JSON schema of a decision matrix
    Schema,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    init_logging(&config)?;

    info!("Cloud Storage Planner {}", cloud_storage_planner::VERSION);
    info!("  Provider: {}", config.provider);

    match args.command {
        Command::Distribute {
            iops,
            min_capacity,
            max_capacity,
            drive_type,
            instance_type,
            instances_per_zone,
            zones,
        } => {
            let manager = ProviderFactory::create(config.provider, Arc::new(load_matrix(&config)?))?;
            let request = StorageDistributionRequest {
                user_storage_spec: vec![StorageSpec {
                    iops,
                    min_capacity,
                    max_capacity,
                    drive_type,
                }],
                instance_type,
                instances_per_zone,
                zone_count: zones,
            };
            let response = manager.get_storage_distribution(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Update {
            desired_capacity,
            current_drive_size,
            current_drive_count,
            current_drive_type,
            current_iops,
            total_drives_on_node,
            operation,
        } => {
            let manager = ProviderFactory::create(config.provider, Arc::new(load_matrix(&config)?))?;
            let request = StoragePoolUpdateRequest {
                desired_capacity,
                resize_operation_type: operation,
                current_drive_count,
                current_drive_size,
                current_drive_type,
                current_iops,
                total_drives_on_node: total_drives_on_node.unwrap_or(current_drive_count),
            };
            let response = manager.recommend_storage_pool_update(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Generate { output } => {
            let parser = MatrixParser::new();
            let matrix = generated_matrix(config.provider)?;
            match output {
                Some(path) => {
                    parser
                        .save_yaml(&matrix, &path)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Wrote {} rows to {}", matrix.len(), path.display());
                }
                None => print!("{}", parser.to_yaml_string(&matrix)?),
            }
        }

        Command::Validate => {
            let matrix = load_matrix(&config)?;
            println!("decision matrix is valid: {} rows", matrix.len());
        }

        Command::Schema => {
            let schema = schemars::schema_for!(DecisionMatrix);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

fn load_config(args: &Args) -> anyhow::Result<PlannerConfig> {
    let mut config = match &args.config {
        Some(path) => PlannerConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(matrix) = &args.matrix {
        config.matrix_path = Some(matrix.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.log_json |= args.log_json;

    config.validate()?;
    Ok(config)
}

fn load_matrix(config: &PlannerConfig) -> anyhow::Result<DecisionMatrix> {
    match &config.matrix_path {
        Some(path) => config
            .load_matrix()
            .with_context(|| format!("failed to load decision matrix {}", path.display())),
        None => Ok(config.load_matrix()?),
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(config: &PlannerConfig) -> anyhow::Result<()> {
    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the plan, logs go to stderr
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}
