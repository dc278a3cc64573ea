//! Provider Adapters
//!
//! Cloud-specific [`StorageManager`] implementations for:
//! - Azure managed disks
//! - GCE persistent disks
//! - AWS EBS volumes

pub mod aws;
pub mod azure;
pub mod gce;

pub use aws::AwsStorageManager;
pub use azure::AzureStorageManager;
pub use gce::GceStorageManager;

use crate::domain::ports::{Provider, StorageManager, StoragePoolSpec, StoragePoolUpdateResponse};
use crate::error::{Error, Result};
use crate::matrix::DecisionMatrix;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Factory for creating storage managers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a storage manager for `provider` backed by `matrix`
    pub fn create(provider: Provider, matrix: Arc<DecisionMatrix>) -> Result<Arc<dyn StorageManager>> {
        match provider {
            Provider::Azure => Ok(Arc::new(AzureStorageManager::new(matrix))),
            Provider::Gce => Ok(Arc::new(GceStorageManager::new(matrix))),
            Provider::Aws => Ok(Arc::new(AwsStorageManager::new(matrix))),
            Provider::Vsphere => Err(Error::UnsupportedProvider {
                provider: provider.to_string(),
            }),
        }
    }
}

/// Storage managers keyed by provider
///
/// Managers are shared; each one holds an immutable matrix, so lookups hand
/// out clones of the `Arc`.
#[derive(Default)]
pub struct ProviderRegistry {
    managers: RwLock<HashMap<Provider, Arc<dyn StorageManager>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manager, replacing any previous one for the same provider
    pub fn register(&self, manager: Arc<dyn StorageManager>) {
        let provider = manager.provider();
        if self.managers.write().insert(provider, manager).is_some() {
            info!("Replaced storage manager for provider {}", provider);
        } else {
            info!("Registered storage manager for provider {}", provider);
        }
    }

    /// Create a manager through [`ProviderFactory`] and register it
    pub fn register_with_matrix(
        &self,
        provider: Provider,
        matrix: Arc<DecisionMatrix>,
    ) -> Result<Arc<dyn StorageManager>> {
        let manager = ProviderFactory::create(provider, matrix)?;
        self.register(Arc::clone(&manager));
        Ok(manager)
    }

    pub fn get(&self, provider: Provider) -> Result<Arc<dyn StorageManager>> {
        self.managers
            .read()
            .get(&provider)
            .cloned()
            .ok_or_else(|| Error::UnsupportedProvider {
                provider: provider.to_string(),
            })
    }

    /// Registered providers in stable order
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.managers.read().keys().copied().collect();
        providers.sort();
        providers
    }
}

/// The one pool spec an update response must carry
pub(crate) fn single_pool(response: &mut StoragePoolUpdateResponse) -> Result<&mut StoragePoolSpec> {
    match response.instance_storage.as_mut_slice() {
        [pool] => Ok(pool),
        _ => Err(Error::InvalidResponse(
            "could not find a valid instance storage object".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ResizeOperationType, StorageDistributionRequest, StorageSpec};
    use crate::matrix::{aws_matrix, gce_matrix, DecisionMatrixRow};
    use assert_matches::assert_matches;

    fn premium_matrix() -> Arc<DecisionMatrix> {
        Arc::new(DecisionMatrix::new(vec![DecisionMatrixRow::new("Premium_LRS")
            .with_iops(500, 5000)
            .with_size(128, 1024)
            .with_drives(1, 8)]))
    }

    #[test]
    fn test_factory_creates_each_provider() {
        for provider in [Provider::Azure, Provider::Gce, Provider::Aws] {
            let manager = ProviderFactory::create(provider, premium_matrix()).unwrap();
            assert_eq!(manager.provider(), provider);
        }
    }

    #[test]
    fn test_factory_rejects_vsphere() {
        assert_matches!(
            ProviderFactory::create(Provider::Vsphere, premium_matrix()).err(),
            Some(Error::UnsupportedProvider { provider }) if provider == "vsphere"
        );
    }

    #[test]
    fn test_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.providers().is_empty());
        assert_matches!(
            registry.get(Provider::Aws).err(),
            Some(Error::UnsupportedProvider { .. })
        );

        registry
            .register_with_matrix(Provider::Gce, Arc::new(gce_matrix()))
            .unwrap();
        registry
            .register_with_matrix(Provider::Aws, Arc::new(aws_matrix()))
            .unwrap();
        registry.register(Arc::new(AzureStorageManager::new(premium_matrix())));

        assert_eq!(
            registry.providers(),
            vec![Provider::Azure, Provider::Gce, Provider::Aws]
        );
        assert_eq!(registry.get(Provider::Aws).unwrap().provider(), Provider::Aws);
        assert!(registry
            .register_with_matrix(Provider::Vsphere, premium_matrix())
            .is_err());
    }

    #[test]
    fn test_single_pool() {
        let mut response = StoragePoolUpdateResponse {
            resize_operation_type: ResizeOperationType::AddDisk,
            instance_storage: vec![],
        };
        assert_matches!(single_pool(&mut response), Err(Error::InvalidResponse(_)));

        response.instance_storage = vec![StoragePoolSpec::default(), StoragePoolSpec::default()];
        assert_matches!(single_pool(&mut response), Err(Error::InvalidResponse(_)));

        response.instance_storage.truncate(1);
        single_pool(&mut response).unwrap().iops = 42;
        assert_eq!(response.instance_storage[0].iops, 42);
    }

    #[test]
    fn test_concurrent_planning_shares_one_matrix() {
        let manager = ProviderFactory::create(Provider::Azure, premium_matrix()).unwrap();
        let request = StorageDistributionRequest {
            user_storage_spec: vec![StorageSpec {
                iops: 1000,
                min_capacity: 1024,
                max_capacity: 4096,
                drive_type: String::new(),
            }],
            instance_type: "Standard_D4s_v3".into(),
            instances_per_zone: 2,
            zone_count: 2,
        };
        let expected = manager.get_storage_distribution(&request).unwrap();
        let (manager, request) = (&manager, &request);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(move || manager.get_storage_distribution(request).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
