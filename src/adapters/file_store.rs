//! Directory-backed storage adapter for the host.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/config.json           PetConfig (pretty JSON, hand-editable)
//! <root>/<namespace>/<key>.bin StoragePort blobs
//! ```
//!
//! Writes go to a `.tmp` sibling first and are renamed into place, so a
//! crash mid-write leaves the previous value intact.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::PetConfig;

const CONFIG_FILE: &str = "config.json";
const BLOB_EXT: &str = "bin";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("FileStore: using {}", root.display());
        Ok(Self { root })
    }

    fn blob_path(&self, namespace: &str, key: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_component(namespace) || !is_safe_component(key) {
            warn!("FileStore: rejected key {namespace}::{key}");
            return Err(StorageError::IoError);
        }
        Ok(self
            .root
            .join(namespace)
            .join(key)
            .with_extension(BLOB_EXT))
    }
}

/// Only plain names: no separators, no dots, nothing empty.
fn is_safe_component(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn map_io(e: &io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        io::ErrorKind::StorageFull => StorageError::Full,
        _ => StorageError::IoError,
    }
}

/// Write `data` next to `path` and rename over it.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        writer.write_all(data)?;
        writer.flush()?;
    }
    fs::rename(&temp_path, path)
}

impl StoragePort for FileStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let path = self.blob_path(namespace, key)?;
        let data = fs::read(&path).map_err(|e| map_io(&e))?;
        if data.len() > buf.len() {
            return Err(StorageError::Full);
        }
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.blob_path(namespace, key)?;
        write_atomic(&path, data).map_err(|e| {
            warn!("FileStore: write {} failed: {e}", path.display());
            map_io(&e)
        })?;
        debug!("FileStore: wrote {} bytes to {namespace}::{key}", data.len());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let path = self.blob_path(namespace, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(&e)),
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.blob_path(namespace, key)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }
}

impl ConfigPort for FileStore {
    fn load(&self) -> Result<PetConfig, ConfigError> {
        let path = self.root.join(CONFIG_FILE);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError,
        })?;
        let cfg: PetConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("FileStore: loaded config from {}", path.display());
        Ok(cfg)
    }

    fn save(&self, config: &PetConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::IoError)?;
        write_atomic(&self.root.join(CONFIG_FILE), &json).map_err(|_| ConfigError::IoError)?;
        info!("FileStore: config saved");
        Ok(())
    }
}
