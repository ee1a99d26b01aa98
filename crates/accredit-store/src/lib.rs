//! # Accredit Store
//!
//! Storage abstraction for the Accredit registry. The two registry
//! components share one [`Store`], constructed once by the host, and each
//! touches only its own maps.
//!
//! ## Key Types
//!
//! - [`Store`] - The trait for all record reads and writes
//! - [`MemoryStore`] - In-memory store guarded by a `RwLock`
//! - [`InsertResult`] - Outcome of writing a record
//! - [`WriteMode`] - Whether an existing key may be replaced
//! - [`Snapshot`] - Canonical CBOR export/import of the whole store
//!
//! ## Usage
//!
//! ```rust
//! use accredit_core::{BlockHeight, Institution};
//! use accredit_store::{InsertResult, MemoryStore, Store, WriteMode};
//!
//! let store = MemoryStore::new();
//! let inst = Institution::new("mit-001".into(), "MIT", "https://mit.edu");
//!
//! let result = store.insert_institution(&inst, WriteMode::Upsert).unwrap();
//! assert_eq!(result, InsertResult::Inserted);
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic check-and-write**: `WriteMode::InsertOnly` and the `update_*`
//!   methods read and write under one lock; `Store::snapshot` reads all three
//!   maps under one lock
//! - **Ordering between calls is the host's job**: two separate calls are
//!   not a transaction
//! - **Never deletes**: no operation removes a record
//! - **Persistence is the host's job**: take a [`Snapshot`] and store its bytes

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use traits::{InsertResult, Store, WriteMode};
