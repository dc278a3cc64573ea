//! Storage Distribution Planner
//!
//! Translates a storage request (IOPS, capacity bounds, zone and instance
//! counts) into a concrete drive layout for one storage pool.
//!
//! The search walks the filtered matrix in priority order and, for each row,
//! tries instances per zone from the requested count down to one and drive
//! counts from the row's maximum down to its minimum. The first layout whose
//! drive size fits the row wins, so more storage-bearing instances are
//! preferred first and then more drives per instance. Once a layout is found
//! the instance count is trimmed to the fewest instances that still hold the
//! minimum capacity per zone.

use crate::domain::ports::{StoragePoolSpec, StorageSpec};
use crate::error::{Error, Result};
use crate::matrix::{DecisionMatrix, DecisionMatrixRow};
use tracing::{debug, info};

// =============================================================================
// Distribution Result
// =============================================================================

/// Drive layout chosen for one storage spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDistribution {
    /// Drive plan; `instances_per_zone` holds the optimized count and `iops`
    /// the row's baseline IOPS
    pub pool: StoragePoolSpec,
    /// Optimized number of storage-bearing instances per zone
    pub instances_per_zone: u64,
    /// Matrix row the plan was derived from
    pub row: DecisionMatrixRow,
}

/// Layout found inside a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowLayout {
    instances_per_zone: u64,
    drive_count: u64,
    drive_size: u64,
}

// =============================================================================
// Planner
// =============================================================================

/// Find a drive type, size, count and instances per zone satisfying `request`
pub fn get_storage_distribution_for_pool(
    matrix: &DecisionMatrix,
    request: &StorageSpec,
    requested_instances_per_zone: u64,
    zone_count: u64,
) -> Result<PoolDistribution> {
    log_distribution_request(request, requested_instances_per_zone, zone_count);

    if zone_count == 0 {
        return Err(Error::NumOfZonesCannotBeZero);
    }

    let candidates = matrix
        .filter_by_drive_type(&request.drive_type)
        .filter_by_iops(request.iops)
        .sort_by_iops()
        .sort_by_priority();

    if candidates.is_empty() {
        return Err(Error::not_found(format!(
            "found no candidates which provide {} IOPS{}",
            request.iops,
            drive_type_suffix(&request.drive_type)
        )));
    }

    let min_capacity_per_zone = request.min_capacity / zone_count;
    let max_capacity_per_zone = request.max_capacity / zone_count;

    let (row, layout) = candidates
        .iter()
        .find_map(|row| {
            search_row(
                row,
                requested_instances_per_zone,
                min_capacity_per_zone,
                max_capacity_per_zone,
            )
            .map(|layout| (row, layout))
        })
        .ok_or_else(|| {
            Error::not_found(format!(
                "none of {} candidate rows{} fit {} - {} GiB per zone on at most {} instances per zone",
                candidates.len(),
                drive_type_suffix(&request.drive_type),
                min_capacity_per_zone,
                max_capacity_per_zone,
                requested_instances_per_zone
            ))
        })?;

    let instances_per_zone = optimize_instances_per_zone(min_capacity_per_zone, &layout);

    let pool = StoragePoolSpec {
        drive_type: row.drive_type.clone(),
        drive_capacity_gib: layout.drive_size,
        drive_count: layout.drive_count,
        instances_per_zone,
        iops: row.min_iops,
    };
    pretty_print_pool_spec(&pool, "getStorageDistributionCandidate returning");

    Ok(PoolDistribution {
        pool,
        instances_per_zone,
        row: row.clone(),
    })
}

/// Try instances per zone from the requested count down to one
fn search_row(
    row: &DecisionMatrixRow,
    requested_instances_per_zone: u64,
    min_capacity_per_zone: u64,
    max_capacity_per_zone: u64,
) -> Option<RowLayout> {
    (1..=requested_instances_per_zone)
        .rev()
        .find_map(|instances_per_zone| {
            let capacity_per_node = min_capacity_per_zone / instances_per_zone;
            print_candidate("Candidate", row, instances_per_zone, capacity_per_node);

            fit_drives(row, instances_per_zone, capacity_per_node, max_capacity_per_zone).map(
                |(drive_count, drive_size)| RowLayout {
                    instances_per_zone,
                    drive_count,
                    drive_size,
                },
            )
        })
}

/// Split a node's capacity over the most drives whose size fits the row
///
/// When even the fewest drives are smaller than the row's minimum size, the
/// minimum size is used instead as long as the zone stays under its maximum
/// capacity.
fn fit_drives(
    row: &DecisionMatrixRow,
    instances_per_zone: u64,
    capacity_per_node: u64,
    max_capacity_per_zone: u64,
) -> Option<(u64, u64)> {
    // a zero drive count would divide by zero
    let min_drives = row.instance_min_drives.max(1);
    if min_drives > row.instance_max_drives {
        return None;
    }

    for drive_count in (min_drives..=row.instance_max_drives).rev() {
        let drive_size = capacity_per_node / drive_count;
        if row.fits_size(drive_size) {
            return Some((drive_count, drive_size));
        }
    }

    let largest_drive = capacity_per_node / min_drives;
    if largest_drive < row.min_size
        && row.min_size.saturating_mul(instances_per_zone) < max_capacity_per_zone
    {
        return Some((min_drives, row.min_size));
    }

    None
}

/// Fewest instances per zone that still hold the minimum zone capacity
fn optimize_instances_per_zone(min_capacity_per_zone: u64, layout: &RowLayout) -> u64 {
    (1..layout.instances_per_zone)
        .find(|&instances| {
            min_capacity_per_zone
                <= instances
                    .saturating_mul(layout.drive_count)
                    .saturating_mul(layout.drive_size)
        })
        .unwrap_or(layout.instances_per_zone)
}

fn drive_type_suffix(drive_type: &str) -> String {
    if drive_type.is_empty() {
        String::new()
    } else {
        format!(" with drive type {}", drive_type)
    }
}

// =============================================================================
// Logging
// =============================================================================

pub(crate) fn pretty_print_pool_spec(pool: &StoragePoolSpec, prefix: &str) {
    info!(
        "{} instStorage: {} X {} GiB {} drives",
        prefix, pool.drive_count, pool.drive_capacity_gib, pool.drive_type
    );
}

pub(crate) fn print_candidate(
    msg: &str,
    row: &DecisionMatrixRow,
    instances_per_zone: u64,
    capacity_per_node: u64,
) {
    debug!(
        min_iops = row.min_iops,
        max_iops = row.max_iops,
        min_size = row.min_size,
        max_size = row.max_size,
        drive_type = %row.drive_type,
        priority = row.priority,
        instance_min_drives = row.instance_min_drives,
        instance_max_drives = row.instance_max_drives,
        "{} for {} instances per zone with a total capacity per node {}",
        msg,
        instances_per_zone,
        capacity_per_node
    );
}

fn log_distribution_request(
    request: &StorageSpec,
    requested_instances_per_zone: u64,
    zone_count: u64,
) {
    debug!(
        iops = request.iops,
        min_capacity = request.min_capacity,
        max_capacity = request.max_capacity,
        drive_type = %request.drive_type,
        instances_per_zone = requested_instances_per_zone,
        zone_count,
        "-- Storage Distribution Pool Request --"
    );
}
