//! Schema metadata - per-table column and conflict descriptors
//!
//! A `TableDescriptor` is built once at registration time and stays immutable
//! afterwards. Adapters hang off a descriptor for column order, cache-key
//! lookup, and generated SQL text.

pub mod conflict;
pub mod descriptor;
pub mod property;

pub use conflict::ConflictAction;
pub use descriptor::{TableDescriptor, TableDescriptorBuilder};
pub use property::{ColumnType, Property};
