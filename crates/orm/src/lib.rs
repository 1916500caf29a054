//! # pocket-orm: Cache-Aware ORM Layer for Embedded SQL Databases
//!
//! Per-table adapters translate between in-memory model objects and database
//! rows; a model cache avoids redundant materialization when the same
//! primary key is loaded again. The centerpiece is the cache-aware
//! cursor-to-object loading pipeline: for each row of a forward-only cursor
//! the loader either reuses an already-materialized instance (refreshing
//! only its relationship fields) or constructs and caches a new one, always
//! producing a result list in cursor order.
//!
//! Statement compilation, transaction demarcation, and connection handling
//! live behind the `backends` traits; the crate ships an in-memory executor
//! and, with the `sqlite` feature, a rusqlite-backed one.

pub mod adapter;
pub mod backends;
pub mod cache;
pub mod error;
pub mod loader;
pub mod saver;
pub mod schema;
pub mod sql;
pub mod value;

// Re-export core traits and types
pub use adapter::{bind_property, model_ref, LazyStatement, ModelAdapter, ModelRef, ModelStatements};
pub use backends::{Cursor, Database, DatabaseStatement};
pub use cache::{CacheKey, LruModelCache, MapModelCache, ModelCache};
pub use error::{OrmError, OrmResult};
pub use loader::{CacheableModelLoader, ModelLoader};
pub use saver::{ListModelSaver, ModelSaver};
pub use schema::{ColumnType, ConflictAction, Property, TableDescriptor, TableDescriptorBuilder};
pub use value::SqlValue;
