// Key-value storage backends.
//
// Values are opaque strings; callers decide the encoding. `FileStore` keeps
// every key in one JSON object file so the layout mirrors a browser-style
// local storage area.
use anyhow::{Context, Result};
use fs2::FileExt;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default quota for a `FileStore`, in bytes of the encoded file.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// The store file is readable but does not hold a JSON object of strings.
#[derive(Debug)]
pub struct MalformedStore {
    path: PathBuf,
    source: serde_json::Error,
}

impl fmt::Display for MalformedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store file {:?} is not a JSON object of strings: {}",
            self.path, self.source
        )
    }
}

impl std::error::Error for MalformedStore {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// True when the store could be read but its contents are corrupted.
/// Any other read error (permissions, I/O, locking) is not.
pub fn is_malformed_store_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<MalformedStore>().is_some()
}

/// A string-keyed durable store.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores all keys in a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    quota_bytes: u64,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = file_path.extension() {
            let mut ext = ext.to_os_string();
            ext.push(".lock");
            lock_path.set_extension(ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on the sidecar lock file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file {:?}", self.path))?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json).map_err(|source| {
            anyhow::Error::new(MalformedStore {
                path: self.path.clone(),
                source,
            })
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::with_lock(&self.path, || Ok(self.read_map()?.get(key).cloned()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path.clone();
        Self::with_lock(&path, || {
            let mut map = match self.read_map() {
                Ok(map) => map,
                Err(e) if is_malformed_store_error(&e) => {
                    log::warn!("Discarding corrupted store file {:?}: {:#}", path, e);
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            map.insert(key.to_string(), value.to_string());

            let json = serde_json::to_string_pretty(&map)?;
            if json.len() as u64 > self.quota_bytes {
                anyhow::bail!(
                    "Storage quota exceeded: {} bytes needed, {} allowed",
                    json.len(),
                    self.quota_bytes
                );
            }
            Self::atomic_write(&path, json)
                .with_context(|| format!("Failed to write store file {:?}", path))
        })
    }
}

/// In-memory store. Writes can be made to fail to simulate a full or disabled
/// storage area.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
    fail_reads: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            anyhow::bail!("Storage is unavailable");
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("Storage is disabled");
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

// Lets the owner keep a handle on a store it lends to the gateway.
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<std::cell::RefCell<S>> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.borrow_mut().set(key, value)
    }
}
