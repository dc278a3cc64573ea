//! GCE Storage Manager
//!
//! GCE reports drive types as resource URLs such as
//! `https://www.googleapis.com/compute/v1/projects/p/zones/us-east1-b/diskTypes/pd-ssd`.
//! The planner works on the trailing segment and the caller gets its original
//! form back. Persistent disk IOPS scale linearly with size, so the delivered
//! IOPS are recomputed from the chosen capacity.

use super::single_pool;
use crate::domain::ports::{
    Provider, StorageDistributionRequest, StorageDistributionResponse, StorageManager,
    StoragePoolSpec, StoragePoolUpdateRequest, StoragePoolUpdateResponse,
};
use crate::error::Result;
use crate::matrix::{DecisionMatrix, DecisionMatrixRow};
use crate::planner::{get_storage_distribution_for_pool, get_storage_update_config};
use std::sync::Arc;

/// Standard persistent disk
pub const DRIVE_TYPE_STANDARD: &str = "pd-standard";
/// SSD persistent disk
pub const DRIVE_TYPE_SSD: &str = "pd-ssd";
/// Baseline IOPS per GiB of a pd-standard drive
pub const STANDARD_IOPS_MULTIPLIER: f64 = 0.75;
/// Baseline IOPS per GiB of a pd-ssd drive
pub const SSD_IOPS_MULTIPLIER: f64 = 30.0;

/// GCE implementation of [`StorageManager`]
pub struct GceStorageManager {
    matrix: Arc<DecisionMatrix>,
}

impl GceStorageManager {
    pub fn new(matrix: Arc<DecisionMatrix>) -> Self {
        Self { matrix }
    }
}

impl StorageManager for GceStorageManager {
    fn provider(&self) -> Provider {
        Provider::Gce
    }

    fn get_storage_distribution(
        &self,
        request: &StorageDistributionRequest,
    ) -> Result<StorageDistributionResponse> {
        let instance_storage = request
            .user_storage_spec
            .iter()
            .map(|user_spec| {
                let mut spec = user_spec.clone();
                spec.drive_type = short_drive_type(&user_spec.drive_type);

                let planned = get_storage_distribution_for_pool(
                    &self.matrix,
                    &spec,
                    request.instances_per_zone,
                    request.zone_count,
                )?;

                let drive_type = if user_spec.drive_type.is_empty() {
                    planned.pool.drive_type.clone()
                } else {
                    user_spec.drive_type.clone()
                };

                Ok(StoragePoolSpec {
                    iops: determine_iops_for_pool(&planned.pool, &planned.row),
                    drive_type,
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
        let mut short_request = request.clone();
        short_request.current_drive_type = short_drive_type(&request.current_drive_type);

        let update = get_storage_update_config(&short_request, &self.matrix)?;
        let mut response = update.response;

        let pool = single_pool(&mut response)?;
        pool.iops = determine_iops_for_pool(pool, &update.row);
        if !request.current_drive_type.is_empty() {
            pool.drive_type = request.current_drive_type.clone();
        }

        Ok(response)
    }
}

/// Trailing path segment of a drive type URL, percent-decoded
///
/// Compute API resource URLs may percent-encode path segments, while matrix
/// rows carry the plain type name. A segment that does not decode as UTF-8 is
/// returned as is.
pub fn short_drive_type(drive_type: &str) -> String {
    let segment = drive_type.rsplit('/').next().unwrap_or(drive_type);
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn determine_iops_for_pool(pool: &StoragePoolSpec, row: &DecisionMatrixRow) -> u64 {
    let capacity = pool.drive_capacity_gib as f64;
    match pool.drive_type.as_str() {
        DRIVE_TYPE_STANDARD => (capacity * STANDARD_IOPS_MULTIPLIER).ceil() as u64,
        DRIVE_TYPE_SSD => (capacity * SSD_IOPS_MULTIPLIER).ceil() as u64,
        _ => row.min_iops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ResizeOperationType, StorageSpec};
    use crate::matrix::generator::gce_matrix;

    const SSD_URL: &str =
        "https://www.googleapis.com/compute/v1/projects/portworx-eng/zones/us-east1-b/diskTypes/pd-ssd";
    const STANDARD_URL: &str =
        "https://www.googleapis.com/compute/v1/projects/portworx-eng/zones/us-east1-b/diskTypes/pd-standard";

    fn small_matrix() -> DecisionMatrix {
        DecisionMatrix::new(vec![
            DecisionMatrixRow::new(DRIVE_TYPE_STANDARD)
                .with_iops(100, 7500)
                .with_size(10, 10_000)
                .with_priority(0),
            DecisionMatrixRow::new(DRIVE_TYPE_SSD)
                .with_iops(100, 15_000)
                .with_size(10, 500)
                .with_priority(1),
        ])
    }

    fn distribution_request(spec: StorageSpec, instances_per_zone: u64, zone_count: u64) -> StorageDistributionRequest {
        StorageDistributionRequest {
            user_storage_spec: vec![spec],
            instance_type: "n1-standard-4".into(),
            instances_per_zone,
            zone_count,
        }
    }

    #[test]
    fn test_short_drive_type() {
        assert_eq!(short_drive_type(SSD_URL), "pd-ssd");
        assert_eq!(short_drive_type("pd-standard"), "pd-standard");
        assert_eq!(short_drive_type("zones/a/diskTypes/pd%2Dbalanced"), "pd-balanced");
        assert_eq!(short_drive_type(""), "");
    }

    #[test]
    fn test_distribution_restores_drive_type_url() {
        let manager = GceStorageManager::new(Arc::new(small_matrix()));
        let request = distribution_request(
            StorageSpec {
                iops: 3000,
                min_capacity: 1200,
                max_capacity: 9000,
                drive_type: SSD_URL.into(),
            },
            2,
            3,
        );

        let response = manager.get_storage_distribution(&request).unwrap();
        assert_eq!(
            response.instance_storage,
            vec![StoragePoolSpec {
                drive_type: SSD_URL.into(),
                drive_capacity_gib: 25,
                drive_count: 8,
                instances_per_zone: 2,
                iops: 750,
            }]
        );
    }

    #[test]
    fn test_distribution_without_drive_type() {
        let manager = GceStorageManager::new(Arc::new(small_matrix()));
        let request = distribution_request(
            StorageSpec {
                iops: 120,
                min_capacity: 300,
                max_capacity: 3000,
                drive_type: String::new(),
            },
            1,
            1,
        );

        let pool = &manager.get_storage_distribution(&request).unwrap().instance_storage[0];
        assert_eq!(pool.drive_type, DRIVE_TYPE_STANDARD);
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (8, 37));
        // 37 GiB * 0.75 rounds up
        assert_eq!(pool.iops, 28);
    }

    #[test]
    fn test_distribution_on_generated_matrix() {
        let manager = GceStorageManager::new(Arc::new(gce_matrix()));
        let request = distribution_request(
            StorageSpec {
                iops: 3000,
                min_capacity: 1200,
                max_capacity: 9000,
                drive_type: DRIVE_TYPE_SSD.into(),
            },
            2,
            3,
        );

        let pool = &manager.get_storage_distribution(&request).unwrap().instance_storage[0];
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (2, 100));
        assert_eq!(pool.instances_per_zone, 2);
        assert_eq!(pool.iops, 3000);
    }

    #[test]
    fn test_update_restores_drive_type_url() {
        let manager = GceStorageManager::new(Arc::new(small_matrix()));
        let request = StoragePoolUpdateRequest {
            desired_capacity: 400,
            resize_operation_type: ResizeOperationType::Auto,
            current_drive_count: 2,
            current_drive_size: 100,
            current_drive_type: STANDARD_URL.into(),
            current_iops: 100,
            total_drives_on_node: 2,
        };

        let response = manager.recommend_storage_pool_update(&request).unwrap();
        assert_eq!(response.resize_operation_type, ResizeOperationType::ResizeDisk);

        let pool = &response.instance_storage[0];
        assert_eq!(pool.drive_type, STANDARD_URL);
        assert_eq!((pool.drive_count, pool.drive_capacity_gib), (2, 200));
        assert_eq!(pool.iops, 150);
        assert_eq!(request.current_drive_type, STANDARD_URL);
    }

    #[test]
    fn test_update_with_encoded_drive_type_url() {
        let encoded = STANDARD_URL.replace("pd-standard", "pd%2Dstandard");
        let manager = GceStorageManager::new(Arc::new(small_matrix()));
        let request = StoragePoolUpdateRequest {
            desired_capacity: 400,
            resize_operation_type: ResizeOperationType::ResizeDisk,
            current_drive_count: 2,
            current_drive_size: 100,
            current_drive_type: encoded.clone(),
            current_iops: 100,
            total_drives_on_node: 2,
        };

        let response = manager.recommend_storage_pool_update(&request).unwrap();
        let pool = &response.instance_storage[0];
        assert_eq!(pool.drive_type, encoded);
        assert_eq!(pool.drive_capacity_gib, 200);
        // IOPS rule keyed on the decoded pd-standard type
        assert_eq!(pool.iops, 150);
    }
}
