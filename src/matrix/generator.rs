//! Decision Matrix Generators
//!
//! Builds the AWS and GCE decision matrices programmatically from each
//! provider's published IOPS-per-GiB ratios, in 50 IOPS steps.

use super::row::{DecisionMatrix, DecisionMatrixRow};
use crate::providers::aws::{DRIVE_TYPE_GP2, DRIVE_TYPE_IO1, GP2_IOPS_MULTIPLIER};
use crate::providers::gce::{
    DRIVE_TYPE_SSD, DRIVE_TYPE_STANDARD, SSD_IOPS_MULTIPLIER, STANDARD_IOPS_MULTIPLIER,
};

/// Step between consecutive generated IOPS bands
const IOPS_STEP: usize = 50;

/// AWS caps provisioned IOPS per volume
const AWS_MAX_IOPS: u64 = 32_000;

fn common_row(drive_type: &str, priority: i32) -> DecisionMatrixRow {
    DecisionMatrixRow::new(drive_type)
        .with_drives(1, 8)
        .with_priority(priority)
}

fn size_for_iops(iops: u64, multiplier: f64) -> u64 {
    (iops as f64 / multiplier).ceil() as u64
}

// =============================================================================
// GCE
// =============================================================================

/// Full GCE matrix: pd-standard rows followed by pd-ssd rows
pub fn gce_matrix() -> DecisionMatrix {
    let mut rows = gce_standard_rows();
    rows.extend(gce_ssd_rows());
    DecisionMatrix::new(rows)
}

fn gce_standard_rows() -> Vec<DecisionMatrixRow> {
    // 100 IOPS floor for anything up to 134 GiB
    let mut rows = vec![common_row(DRIVE_TYPE_STANDARD, 0)
        .with_iops(100, 100)
        .with_size(0, 134)];

    // 7500 IOPS is the max read IOPS for zonal standard persistent disks
    for iops in (100..=7500u64).step_by(IOPS_STEP) {
        rows.push(
            common_row(DRIVE_TYPE_STANDARD, 0)
                .with_iops(iops, iops + 50)
                .with_size(
                    size_for_iops(iops, STANDARD_IOPS_MULTIPLIER),
                    size_for_iops(iops + 50, STANDARD_IOPS_MULTIPLIER),
                ),
        );
    }

    rows.push(
        common_row(DRIVE_TYPE_STANDARD, 0)
            .with_iops(7500, 7500)
            .with_size(10_000, 10_000),
    );
    rows
}

fn gce_ssd_rows() -> Vec<DecisionMatrixRow> {
    let mut rows = Vec::new();

    // 15000 IOPS is the max read IOPS for ssd persistent disks
    for iops in (100..=15_000u64).step_by(IOPS_STEP) {
        rows.push(
            common_row(DRIVE_TYPE_SSD, 1)
                .with_iops(iops, iops + 50)
                .with_size(
                    size_for_iops(iops, SSD_IOPS_MULTIPLIER),
                    size_for_iops(iops + 50, SSD_IOPS_MULTIPLIER),
                ),
        );
    }

    rows.push(
        common_row(DRIVE_TYPE_SSD, 1)
            .with_iops(15_000, 15_000)
            .with_size(500, 500),
    );
    rows
}

// =============================================================================
// AWS
// =============================================================================

/// Full AWS matrix: gp2 rows followed by io1 rows
pub fn aws_matrix() -> DecisionMatrix {
    let mut rows = aws_gp2_rows();
    rows.extend(aws_io1_rows());
    DecisionMatrix::new(rows)
}

fn aws_gp2_rows() -> Vec<DecisionMatrixRow> {
    // 100 IOPS floor for anything up to 33 GiB
    let mut rows = vec![common_row(DRIVE_TYPE_GP2, 0)
        .with_iops(100, 100)
        .with_size(0, 33)];

    for iops in (100..=16_000u64).step_by(IOPS_STEP) {
        rows.push(
            common_row(DRIVE_TYPE_GP2, 0)
                .with_iops(iops, iops + 50)
                .with_size(iops / GP2_IOPS_MULTIPLIER, (iops + 50) / GP2_IOPS_MULTIPLIER),
        );
    }

    rows.push(
        common_row(DRIVE_TYPE_GP2, 0)
            .with_iops(16_000, 16_000)
            .with_size(5334, 16_000),
    );
    rows
}

/// io1 rows double in size. The minimum IOPS keeps a 4:1 IOPS to GiB ratio
/// against the largest size and the maximum allows 50:1 against the smallest.
fn aws_io1_rows() -> Vec<DecisionMatrixRow> {
    let mut rows = Vec::new();

    let mut start_size = 50u64;
    while start_size < 6400 {
        let max_size = start_size * 2;
        rows.push(
            common_row(DRIVE_TYPE_IO1, 1)
                .with_size(start_size, max_size)
                .with_iops(
                    (max_size * 4).min(AWS_MAX_IOPS),
                    (start_size * 50).min(AWS_MAX_IOPS),
                ),
        );
        start_size = max_size;
    }

    rows.push(
        common_row(DRIVE_TYPE_IO1, 1)
            .with_iops(AWS_MAX_IOPS, AWS_MAX_IOPS)
            .with_size(6400, 16_000),
    );
    rows
}
