//! Storage Pool Update Planner
//!
//! Plans how an existing storage pool grows to a new capacity, either by
//! enlarging its drives (resize) or by attaching more drives of the same
//! size (add). In auto mode a resize is tried first and adding drives is the
//! fallback.

use super::distribution::{pretty_print_pool_spec, print_candidate};
use crate::domain::ports::{
    ResizeOperationType, StoragePoolSpec, StoragePoolUpdateRequest, StoragePoolUpdateResponse,
};
use crate::error::{Error, Result};
use crate::matrix::{DecisionMatrix, DecisionMatrixRow};
use std::collections::BTreeSet;
use tracing::debug;

/// Update plan plus the matrix row it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolUpdate {
    pub response: StoragePoolUpdateResponse,
    pub row: DecisionMatrixRow,
}

impl PoolUpdate {
    fn new(
        operation: ResizeOperationType,
        pool: StoragePoolSpec,
        row: &DecisionMatrixRow,
    ) -> Self {
        Self {
            response: StoragePoolUpdateResponse {
                resize_operation_type: operation,
                instance_storage: vec![pool],
            },
            row: row.clone(),
        }
    }
}

/// Plan a pool update using the requested operation, or resize-then-add
pub fn get_storage_update_config(
    request: &StoragePoolUpdateRequest,
    matrix: &DecisionMatrix,
) -> Result<PoolUpdate> {
    log_update_request(request);

    match request.resize_operation_type {
        ResizeOperationType::AddDisk => add_disk(request, matrix),
        ResizeOperationType::ResizeDisk => resize_disk(request, matrix),
        ResizeOperationType::Auto => resize_disk(request, matrix).or_else(|err| {
            debug!("resize not possible ({}), trying to add disks", err);
            add_disk(request, matrix)
        }),
    }
}

/// Reject requests that cannot grow the pool
pub fn validate_update_request(request: &StoragePoolUpdateRequest) -> Result<()> {
    let current_capacity = request.current_capacity()?;
    if current_capacity > request.desired_capacity {
        return Err(Error::CurrentCapacityHigherThanDesired {
            current: current_capacity,
            desired: request.desired_capacity,
        });
    }

    if request.desired_capacity == current_capacity {
        return Err(Error::CurrentCapacitySameAsDesired);
    }

    if request.current_drive_count > 0 && request.current_drive_type.is_empty() {
        return Err(request.invalid(
            "for storage update operation, current drive type is required to be \
             provided if drives already exist",
        ));
    }

    Ok(())
}

/// Grow the pool by attaching drives of the existing size
///
/// A pool without drives uses the whole missing capacity as its drive size.
pub fn add_disk(
    request: &StoragePoolUpdateRequest,
    matrix: &DecisionMatrix,
) -> Result<PoolUpdate> {
    validate_update_request(request)?;

    let delta_capacity = request.desired_capacity - request.current_capacity()?;
    debug!("check if we can add drive(s) for at least: {} GiB", delta_capacity);

    let drive_size = if request.current_drive_size == 0 {
        delta_capacity
    } else {
        request.current_drive_size
    };

    let required_drive_count = delta_capacity.div_ceil(drive_size);
    let updated_total_drives_on_node = required_drive_count
        .checked_add(request.total_drives_on_node)
        .ok_or_else(|| request.invalid("total drives on node overflows u64"))?;

    let by_type = matrix.filter_by_drive_type(&request.current_drive_type);
    if by_type.is_empty() {
        return Err(Error::not_found(format!(
            "found no candidates which have current drive type: {}",
            request.current_drive_type
        )));
    }

    let by_size = by_type.filter_by_drive_size_range(drive_size);
    if by_size.is_empty() {
        let ranges: BTreeSet<String> = by_type
            .iter()
            .map(|row| format!("[{} GiB -> {} GiB ({})]", row.min_size, row.max_size, row.drive_type))
            .collect();
        return Err(Error::not_found(format!(
            "found no candidates for adding a new disk of existing size: {} GiB. \
             Only drives in following size ranges are supported: [{}]",
            drive_size,
            ranges.into_iter().collect::<Vec<_>>().join(" ")
        )));
    }

    let candidates = by_size.filter_by_drive_count(updated_total_drives_on_node);
    let Some(row) = candidates.first() else {
        let max_drive_count = by_type.max_instance_drives().unwrap_or_default();
        return Err(Error::not_found(format!(
            "node has reached it's maximum supported drive count: {}",
            max_drive_count
        )));
    };
    print_candidate("AddDisk Candidate", row, 0, 0);

    let pool = StoragePoolSpec {
        drive_type: row.drive_type.clone(),
        drive_capacity_gib: drive_size,
        drive_count: required_drive_count,
        instances_per_zone: 0,
        iops: row.min_iops,
    };
    pretty_print_pool_spec(&pool, "AddDisk");

    Ok(PoolUpdate::new(ResizeOperationType::AddDisk, pool, row))
}

/// Grow the pool by enlarging every existing drive by the same amount
pub fn resize_disk(
    request: &StoragePoolUpdateRequest,
    matrix: &DecisionMatrix,
) -> Result<PoolUpdate> {
    validate_update_request(request)?;

    if request.current_drive_count == 0 {
        return Err(request.invalid(
            "requested resize operation type cannot be accomplished as no existing \
             drives were provided",
        ));
    }

    let delta_capacity_per_drive = delta_capacity_per_drive(request)?;
    debug!("Delta capacity per drive: {}", delta_capacity_per_drive);

    let by_type = matrix.filter_by_drive_type(&request.current_drive_type);
    if by_type.is_empty() {
        return Err(Error::not_found(format!(
            "found no candidates which have current drive type: {}",
            request.current_drive_type
        )));
    }

    let by_iops = by_type.filter_by_iops(request.current_iops);
    if by_iops.is_empty() {
        return Err(Error::not_found(format!(
            "found no drive candidates that match current IOPS of drives on node: {}",
            request.current_iops
        )));
    }

    let candidates = by_iops
        .filter_by_drive_size(request.current_drive_size)
        .sort_by_iops();
    if candidates.is_empty() {
        return Err(Error::not_found(format!(
            "found no drive candidates that match current drive size: {}",
            request.current_drive_size
        )));
    }

    let new_drive_size = request
        .current_drive_size
        .checked_add(delta_capacity_per_drive)
        .ok_or_else(|| request.invalid("resized drive size overflows u64"))?;
    for row in &candidates {
        print_candidate("ResizeDisk Candidate", row, 0, 0);
        if new_drive_size > row.max_size {
            continue;
        }

        let pool = StoragePoolSpec {
            drive_type: row.drive_type.clone(),
            drive_capacity_gib: new_drive_size,
            drive_count: request.current_drive_count,
            instances_per_zone: 0,
            iops: row.min_iops,
        };
        pretty_print_pool_spec(&pool, "ResizeDisk");

        return Ok(PoolUpdate::new(ResizeOperationType::ResizeDisk, pool, row));
    }

    Err(Error::not_found(""))
}

/// Extra GiB each drive needs, rounded up so the pool never falls short
fn delta_capacity_per_drive(request: &StoragePoolUpdateRequest) -> Result<u64> {
    let delta_capacity = request.desired_capacity - request.current_capacity()?;
    Ok(delta_capacity.div_ceil(request.current_drive_count))
}

fn log_update_request(request: &StoragePoolUpdateRequest) {
    debug!(
        desired_capacity = request.desired_capacity,
        operation_type = %request.resize_operation_type,
        current_drive_count = request.current_drive_count,
        current_drive_size = request.current_drive_size,
        current_drive_type = %request.current_drive_type,
        "-- Storage Distribution Pool Update Request --"
    );
}
