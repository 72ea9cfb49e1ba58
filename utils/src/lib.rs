//! Shared infrastructure utilities for DEEP hosts.
//!
//! Kept out of the IO-free `deep-types` and `deep-core` crates:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename) for result records

pub mod atomic_write;

pub use atomic_write::{
    FileSyncPolicy, PersistMode, WriteOptions, atomic_write, atomic_write_new, write_unique,
};
