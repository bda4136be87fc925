//! Object storage collaborator: contract, path layout, and bundled backends.

pub mod contract;
pub mod layout;
pub mod local;
pub mod memory;

pub use contract::{Listing, ObjectEntry, ObjectMetadata, ObjectStorage, ProgressFn};
pub use layout::{StorageLayout, DEFAULT_ROOT_PREFIX, MARKER_FILE};
pub use local::LocalStorage;
pub use memory::MemoryStorage;
