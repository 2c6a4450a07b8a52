//! Mapping store backends.
//!
//! [`RedbRepository`] is the durable on-disk store; [`InMemoryRepository`]
//! has the same semantics without persistence.

pub mod disk;
pub mod memory;

pub use burrow_core::error::Result;
pub use burrow_core::{ReadRepository, Repository, StorageError};
pub use disk::RedbRepository;
pub use memory::InMemoryRepository;
