//! AWS Storage Manager
//!
//! gp2 volumes earn baseline IOPS per GiB, io1 volumes deliver whatever IOPS
//! were provisioned.

use super::single_pool;
use crate::domain::ports::{
    Provider, StorageDistributionRequest, StorageDistributionResponse, StorageManager,
    StoragePoolSpec, StoragePoolUpdateRequest, StoragePoolUpdateResponse,
};
use crate::error::Result;
use crate::matrix::{DecisionMatrix, DecisionMatrixRow};
use crate::planner::{get_storage_distribution_for_pool, get_storage_update_config};
use std::sync::Arc;

/// General purpose SSD (gp2)
pub const DRIVE_TYPE_GP2: &str = "gp2";
/// General purpose SSD (gp3)
pub const DRIVE_TYPE_GP3: &str = "gp3";
/// Provisioned IOPS SSD (io1)
pub const DRIVE_TYPE_IO1: &str = "io1";
/// Baseline IOPS per GiB of a gp2 volume
pub const GP2_IOPS_MULTIPLIER: u64 = 3;

/// AWS implementation of [`StorageManager`]
pub struct AwsStorageManager {
    matrix: Arc<DecisionMatrix>,
}

impl AwsStorageManager {
    pub fn new(matrix: Arc<DecisionMatrix>) -> Self {
        Self { matrix }
    }
}

impl StorageManager for AwsStorageManager {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    fn get_storage_distribution(
        &self,
        request: &StorageDistributionRequest,
    ) -> Result<StorageDistributionResponse> {
        let instance_storage = request
            .user_storage_spec
            .iter()
            .map(|spec| {
                let planned = get_storage_distribution_for_pool(
                    &self.matrix,
                    spec,
                    request.instances_per_zone,
                    request.zone_count,
                )?;

                Ok(StoragePoolSpec {
                    iops: determine_iops_for_pool(&planned.pool, &planned.row, spec.iops),
                    instances_per_zone: planned.instances_per_zone,
                    ..planned.pool
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StorageDistributionResponse { instance_storage })
    }

    fn recommend_storage_pool_update(
        &self,
        request: &StoragePoolUpdateRequest,
    ) -> Result<StoragePoolUpdateResponse> {
        let update = get_storage_update_config(request, &self.matrix)?;
        let mut response = update.response;

        let pool = single_pool(&mut response)?;
        pool.iops = determine_iops_for_pool(pool, &update.row, request.current_iops);

        Ok(response)
    }
}

/// IOPS delivered by a pool. `provisioned_iops` is what the caller asked for.
fn determine_iops_for_pool(
    pool: &StoragePoolSpec,
    row: &DecisionMatrixRow,
    provisioned_iops: u64,
) -> u64 {
    match pool.drive_type.as_str() {
        DRIVE_TYPE_GP2 => pool.drive_capacity_gib * GP2_IOPS_MULTIPLIER,
        DRIVE_TYPE_IO1 => provisioned_iops,
        _ => row.min_iops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ResizeOperationType, StorageSpec};
    use crate::error::Error;
    use assert_matches::assert_matches;

    fn small_matrix() -> DecisionMatrix {
        DecisionMatrix::new(vec![
            DecisionMatrixRow::new(DRIVE_TYPE_GP2)
                .with_iops(100, 16_000)
                .with_size(33, 5333)
                .with_priority(0),
            DecisionMatrixRow::new(DRIVE_TYPE_IO1)
                .with_iops(400, 32_000)
                .with_size(100, 16_000)
                .with_priority(1),
        ])
    }

    fn distribution_request(spec: StorageSpec) -> StorageDistributionRequest {
        StorageDistributionRequest {
            user_storage_spec: vec![spec],
            instance_type: "m5.large".into(),
            instances_per_zone: 1,
            zone_count: 3,
        }
    }

    #[test]
    fn test_gp2_iops_scale_with_size() {
        let manager = AwsStorageManager::new(Arc::new(small_matrix()));
        let request = distribution_request(StorageSpec {
            iops: 1000,
            min_capacity: 600,
            max_capacity: 6000,
            drive_type: String::new(),
        });

        let pool = &manager.get_storage_distribution(&request).unwrap().instance_storage[0];
        assert_eq!(pool.drive_type, DRIVE_TYPE_GP2);
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (6, 33));
        assert_eq!(pool.instances_per_zone, 1);
        assert_eq!(pool.iops, 99);
    }

    #[test]
    fn test_io1_reports_provisioned_iops() {
        let manager = AwsStorageManager::new(Arc::new(small_matrix()));
        let request = distribution_request(StorageSpec {
            iops: 5000,
            min_capacity: 600,
            max_capacity: 6000,
            drive_type: DRIVE_TYPE_IO1.into(),
        });

        let pool = &manager.get_storage_distribution(&request).unwrap().instance_storage[0];
        assert_eq!(pool.drive_type, DRIVE_TYPE_IO1);
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (2, 100));
        assert_eq!(pool.iops, 5000);
    }

    #[test]
    fn test_io1_resize_keeps_current_iops() {
        let manager = AwsStorageManager::new(Arc::new(small_matrix()));
        let request = StoragePoolUpdateRequest {
            desired_capacity: 300,
            resize_operation_type: ResizeOperationType::Auto,
            current_drive_count: 2,
            current_drive_size: 100,
            current_drive_type: DRIVE_TYPE_IO1.into(),
            current_iops: 5000,
            total_drives_on_node: 2,
        };

        let response = manager.recommend_storage_pool_update(&request).unwrap();
        assert_eq!(response.resize_operation_type, ResizeOperationType::ResizeDisk);
        let pool = &response.instance_storage[0];
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (2, 150));
        assert_eq!(pool.iops, 5000);
    }

    #[test]
    fn test_gp2_add_disk() {
        let manager = AwsStorageManager::new(Arc::new(small_matrix()));
        let request = StoragePoolUpdateRequest {
            desired_capacity: 500,
            resize_operation_type: ResizeOperationType::AddDisk,
            current_drive_count: 3,
            current_drive_size: 100,
            current_drive_type: DRIVE_TYPE_GP2.into(),
            current_iops: 300,
            total_drives_on_node: 3,
        };

        let response = manager.recommend_storage_pool_update(&request).unwrap();
        assert_eq!(response.resize_operation_type, ResizeOperationType::AddDisk);
        let pool = &response.instance_storage[0];
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (2, 100));
        assert_eq!(pool.iops, 300);
    }

    #[test]
    fn test_unknown_drive_type_is_not_found() {
        let manager = AwsStorageManager::new(Arc::new(small_matrix()));
        let request = distribution_request(StorageSpec {
            iops: 1000,
            min_capacity: 600,
            max_capacity: 6000,
            drive_type: DRIVE_TYPE_GP3.into(),
        });

        assert_matches!(
            manager.get_storage_distribution(&request),
            Err(Error::CandidateNotFound { .. })
        );
    }
}
