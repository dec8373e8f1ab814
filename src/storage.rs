//! Persistence adapter mirroring engine slices into sled, one JSON blob per slot
use super::error::StorageError;
use serde::{Serialize, de::DeserializeOwned};
use sled::Batch;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Named slots the engine mirrors. Each is loaded and written independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Cart,
    Wishlist,
    User,
    Orders,
    DarkMode,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Cart,
        Slot::Wishlist,
        Slot::User,
        Slot::Orders,
        Slot::DarkMode,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            Slot::Cart => "cart",
            Slot::Wishlist => "wishlist",
            Slot::User => "user",
            Slot::Orders => "orders",
            Slot::DarkMode => "darkmode",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

pub struct Persistence {
    instance: Arc<sled::Db>,
    prefix: String,
}

/// Writes to several slots applied atomically.
pub struct SlotBatch {
    prefix: String,
    batch: Batch,
}

impl Persistence {
    pub fn new(instance: Arc<sled::Db>, prefix: &str) -> Self {
        Self {
            instance,
            prefix: prefix.to_string(),
        }
    }

    /// Full storage key of a slot, e.g. `ecommerce_cart`.
    pub fn key(&self, slot: Slot) -> String {
        slot_key(&self.prefix, slot)
    }

    /// Reads a slot. `Ok(None)` means nothing is stored; a blob that doesn't
    /// decode is an error.
    pub fn try_load<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, StorageError> {
        let Some(blob) = self.instance.get(self.key(slot))? else {
            return Ok(None);
        };
        serde_json::from_slice(&blob)
            .map(Some)
            .map_err(|source| StorageError::Decode { slot, source })
    }

    /// Reads a slot, falling back to `default` when it is absent or unreadable.
    pub fn load<T: DeserializeOwned>(&self, slot: Slot, default: T) -> T {
        match self.try_load(slot) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(%slot, "slot absent, using default");
                default
            }
            Err(err) => {
                warn!(%slot, error = %err, "slot unreadable, using default");
                default
            }
        }
    }

    pub fn try_save<T: Serialize>(&self, slot: Slot, value: &T) -> Result<(), StorageError> {
        let blob = encode(slot, value)?;
        self.instance.insert(self.key(slot), blob)?;
        Ok(())
    }

    /// Best-effort write; failures are logged and dropped.
    pub fn save<T: Serialize>(&self, slot: Slot, value: &T) {
        if let Err(err) = self.try_save(slot, value) {
            warn!(%slot, error = %err, "failed to persist slot");
        }
    }

    pub fn batch(&self) -> SlotBatch {
        SlotBatch {
            prefix: self.prefix.clone(),
            batch: Batch::default(),
        }
    }

    pub fn try_apply(&self, batch: SlotBatch) -> Result<(), StorageError> {
        self.instance.apply_batch(batch.batch)?;
        Ok(())
    }

    /// Stores raw bytes under a slot without encoding them.
    pub fn write_raw(&self, slot: Slot, bytes: &[u8]) -> Result<(), StorageError> {
        self.instance.insert(self.key(slot), bytes)?;
        Ok(())
    }

    pub fn remove(&self, slot: Slot) -> Result<(), StorageError> {
        self.instance.remove(self.key(slot))?;
        Ok(())
    }

    pub fn flush(&self) -> Result<usize, StorageError> {
        Ok(self.instance.flush()?)
    }
}

impl SlotBatch {
    pub fn insert<T: Serialize>(&mut self, slot: Slot, value: &T) -> Result<(), StorageError> {
        let blob = encode(slot, value)?;
        self.batch.insert(slot_key(&self.prefix, slot).as_bytes(), blob);
        Ok(())
    }
}

fn slot_key(prefix: &str, slot: Slot) -> String {
    format!("{}{}", prefix, slot.suffix())
}

fn encode<T: Serialize>(slot: Slot, value: &T) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|source| StorageError::Encode { slot, source })
}
