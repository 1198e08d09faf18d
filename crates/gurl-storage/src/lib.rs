//! Link storage for gurl.
//!
//! [`LinkStore`] keeps links in a single redb table and exposes
//! create/resolve/delete as atomic transactions. [`ExpirySweeper`] evicts
//! links that outlive their TTL, and [`AccessController`] gates deletion on
//! the per-link secret issued at creation.

pub mod access;
pub mod error;
pub mod store;
pub mod sweeper;

pub use access::{AccessController, DeletionToken};
pub use error::{Result, StorageError};
pub use store::{LinkStore, ScanSummary, Visit};
pub use sweeper::{ExpirySweeper, SweeperHandle, MIN_SWEEP_INTERVAL};
