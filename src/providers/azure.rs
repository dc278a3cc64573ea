//! Azure Storage Manager
//!
//! Azure managed disks come in fixed performance tiers, so the pool reports
//! the upper IOPS bound of the matrix row that was chosen.

use super::single_pool;
use crate::domain::ports::{
    Provider, StorageDistributionRequest, StorageDistributionResponse, StorageManager,
    StoragePoolSpec, StoragePoolUpdateRequest, StoragePoolUpdateResponse,
};
use crate::error::Result;
use crate::matrix::{DecisionMatrix, DecisionMatrixRow};
use crate::planner::{get_storage_distribution_for_pool, get_storage_update_config};
use std::sync::Arc;

/// Azure implementation of [`StorageManager`]
pub struct AzureStorageManager {
    matrix: Arc<DecisionMatrix>,
}

impl AzureStorageManager {
    pub fn new(matrix: Arc<DecisionMatrix>) -> Self {
        Self { matrix }
    }
}

impl StorageManager for AzureStorageManager {
    fn provider(&self) -> Provider {
        Provider::Azure
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
                    iops: determine_iops_for_pool(&planned.row),
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
        pool.iops = determine_iops_for_pool(&update.row);

        Ok(response)
    }
}

fn determine_iops_for_pool(row: &DecisionMatrixRow) -> u64 {
    row.max_iops
}
