//! rdfview-store — graph store contract and in-memory quad store.
//!
//! The entity engine reads and writes statements exclusively through the
//! [`GraphStore`] trait. [`MemoryStore`] is the reference implementation
//! used by tests and tooling.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{GraphStore, SharedStore, StoreError, StorePattern};
