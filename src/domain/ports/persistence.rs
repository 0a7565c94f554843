use alloc::vec::Vec;

use crate::domain::error::StorageError;

/// Storage for the config file
///
/// An interrupted `store` must leave the previous copy loadable.
#[allow(async_fn_in_trait)]
pub trait ConfigStore {
    /// Read the whole stored file
    async fn load(&mut self) -> Result<Vec<u8>, StorageError>;

    /// Replace the stored file
    async fn store(&mut self, data: &[u8]) -> Result<(), StorageError>;
}
