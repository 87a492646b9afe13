//! Cache module for persisting parsed rosters to disk
//!
//! This module provides a cache store that persists the last successfully
//! parsed employee list to the filesystem, keyed by the identity of the
//! source spreadsheet (path + modification time). An unchanged source file
//! loads from cache without re-parsing; any mismatch or unreadable cache
//! state counts as a miss, never as an error.

mod manager;

pub use manager::{CacheError, CacheStore};
