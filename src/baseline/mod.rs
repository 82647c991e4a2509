//! Named baseline snapshots.
//!
//! A baseline is a persisted copy of an inventory's component list plus
//! metadata, stored one-file-per-name and used as the reference point for
//! drift detection. Storage is whole-file read/overwrite with no locking;
//! concurrent writers to the same name race with last-writer-wins.

mod store;

pub use store::{Baseline, BaselineMeta, BaselineStore, DEFAULT_BASELINE_NAME};
