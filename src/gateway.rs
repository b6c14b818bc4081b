// Translates between the in-memory task list and the key-value store.
use crate::store::{KeyValueStore, is_malformed_store_error};
use anyhow::{Context, Result};

/// Fixed, versioned key the task list lives under.
pub const STORAGE_KEY: &str = "stellar_tasks_v1";

pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the task list.
    ///
    /// A stored value that is not a JSON array of strings is replaced by an
    /// empty list on the spot. Errors are a failed repair write, or a store
    /// that could not be read at all; the latter is left untouched.
    pub fn load(&mut self) -> Result<Vec<String>> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Ok(Vec::new()),
            Err(e) if is_malformed_store_error(&e) => {
                log::error!("Error reading tasks from storage: {:#}", e);
                self.repair()?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.context("Failed to read task storage")),
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => match serde_json::from_value::<Vec<String>>(value) {
                Ok(items) => {
                    log::debug!("Loaded {} tasks from '{}'", items.len(), STORAGE_KEY);
                    Ok(items)
                }
                Err(e) => {
                    log::warn!("Stored data is not a list of strings ({}). Resetting.", e);
                    self.repair()?;
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                log::error!("Error parsing tasks from storage: {}", e);
                self.repair()?;
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&mut self, items: &[String]) -> Result<()> {
        let encoded = serde_json::to_string(items)?;
        self.store
            .set(STORAGE_KEY, &encoded)
            .with_context(|| format!("Failed to save {} tasks", items.len()))
    }

    /// Returns the stored value untouched, for export.
    pub fn raw(&self) -> Result<Option<String>> {
        self.store.get(STORAGE_KEY)
    }

    fn repair(&mut self) -> Result<()> {
        self.save(&[]).context("Failed to reset corrupted task storage")?;
        log::info!("Reset corrupted storage under '{}'", STORAGE_KEY);
        Ok(())
    }
}
