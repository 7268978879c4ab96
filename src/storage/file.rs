use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStorage;
use crate::{Result, SakhaError};

/// Key-value store persisted as a single JSON object on disk.
///
/// Every call re-reads the file so several processes pointed at the same
/// path see each other's writes. A missing file reads as an empty store.
/// A corrupt file reads as [`SakhaError::CorruptStorage`] and is replaced
/// by the next write. Any other read failure is [`SakhaError::Storage`] and
/// leaves the file alone.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        self.read_raw()?.map_or(Ok(HashMap::new()), |data| self.parse(&data))
    }

    /// File contents; `None` when the file is missing or blank.
    fn read_raw(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(None),
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SakhaError::Storage(format!(
                "failed to read storage file {:?}: {e}",
                self.path
            ))),
        }
    }

    fn parse(&self, data: &str) -> Result<HashMap<String, String>> {
        serde_json::from_str(data)
            .map_err(|e| SakhaError::CorruptStorage(format!("{:?}: {e}", self.path)))
    }

    /// Contents to modify. A corrupt file starts over empty; a file that
    /// cannot be read at all is an error so it is never overwritten blind.
    fn load_for_update(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .read_raw()?
            .and_then(|data| self.parse(&data).ok())
            .unwrap_or_default())
    }

    fn save(&self, items: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SakhaError::Storage(format!("failed to create {parent:?}: {e}"))
                })?;
            }
        }
        let data = serde_json::to_string_pretty(items)?;

        // Write to tmp file first, then rename so readers never see a partial file
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, data).map_err(|e| {
            SakhaError::Storage(format!("failed to write storage file {tmp_path:?}: {e}"))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            SakhaError::Storage(format!(
                "failed to rename {tmp_path:?} to {:?}: {e}",
                self.path
            ))
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SakhaError::Storage("file storage lock poisoned".to_string()))?;
        f()
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.locked(|| {
            let mut items = self.load_for_update()?;
            items.insert(key.to_string(), value.to_string());
            self.save(&items)
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.locked(|| {
            let Some(data) = self.read_raw()? else {
                return Ok(());
            };
            match self.parse(&data) {
                Ok(mut items) => {
                    if items.remove(key).is_none() {
                        return Ok(());
                    }
                    self.save(&items)
                }
                // Nothing recoverable in a corrupt file; start over.
                Err(_) => self.save(&HashMap::new()),
            }
        })
    }
}
