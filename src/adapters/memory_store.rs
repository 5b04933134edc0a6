//! In-memory storage adapter.
//!
//! Implements both [`ConfigPort`] and [`StoragePort`] over a `HashMap`.
//! Used by tests and by the simulator when no data directory is given.
//! Nothing survives the process.

use std::cell::RefCell;
use std::collections::HashMap;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::PetConfig;

const CONFIG_NAMESPACE: &str = "fitpet";
const CONFIG_KEY: &str = "config";

#[derive(Debug, Default)]
pub struct MemoryStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Number of stored keys across all namespaces.
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }
}

impl ConfigPort for MemoryStore {
    fn load(&self) -> Result<PetConfig, ConfigError> {
        let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
        let store = self.store.borrow();
        let bytes = store.get(&key).ok_or(ConfigError::NotFound)?;
        let cfg: PetConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("MemoryStore: loaded config");
        Ok(cfg)
    }

    fn save(&self, config: &PetConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.store.borrow_mut().insert(key, bytes);
        info!("MemoryStore: config saved");
        Ok(())
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let composite = Self::composite_key(namespace, key);
        match self.store.borrow().get(&composite) {
            Some(data) if data.len() > buf.len() => Err(StorageError::Full),
            Some(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().insert(composite, data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow_mut().remove(&composite);
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        let composite = Self::composite_key(namespace, key);
        self.store.borrow().contains_key(&composite)
    }
}
