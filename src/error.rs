use crate::storage::Slot;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage backend failed: {0}")]
    Backend(#[from] sled::Error),
    #[error("slot '{slot}' holds a blob that failed to decode: {source}")]
    Decode {
        slot: Slot,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for slot '{slot}' failed to encode: {source}")]
    Encode {
        slot: Slot,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("{consumer} must be used within a StorefrontProvider")]
    OutsideProvider { consumer: &'static str },
    #[error("storefront is already borrowed mutably by another consumer")]
    Reentrant,
    #[error("storefront is still in use by a consumer at teardown")]
    InUse,
}

#[derive(thiserror::Error, Debug)]
pub enum TeardownError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum OrderError {
    #[error("failed to encode order items to cbor: {0}")]
    Encode(String),
}
