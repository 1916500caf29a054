//! Model adapters - per-entity-type translation between models and rows
//!
//! An adapter is the generated-code seam of the ORM: it knows the table
//! descriptor, how to bind one model instance into a prepared statement, and
//! how to populate one from the current cursor row. Hooks with default
//! implementations (`reload_relationships`, `update_auto_increment`,
//! `save_foreign_keys`, `delete_foreign_keys`) are opted into by entities
//! that need them.

pub mod statements;

pub use statements::{LazyStatement, ModelStatements};

use std::cell::RefCell;
use std::rc::Rc;

use crate::backends::{Cursor, Database, DatabaseStatement};
use crate::error::{OrmError, OrmResult};
use crate::schema::{Property, TableDescriptor};
use crate::value::SqlValue;

/// Shared handle to a model instance
///
/// The cache and every result list share these handles; a cache hit appends
/// the same `Rc` again, which is what makes identity-preserving loads
/// observable through `Rc::ptr_eq`. The layer is single-threaded by design,
/// so the handle is deliberately not `Send`.
pub type ModelRef<M> = Rc<RefCell<M>>;

/// Wrap a freshly constructed model instance.
pub fn model_ref<M>(model: M) -> ModelRef<M> {
    Rc::new(RefCell::new(model))
}

/// Per-entity-type descriptor and row translation contract
pub trait ModelAdapter {
    /// The model type this adapter maps.
    type Model;

    /// Immutable table metadata backing this adapter.
    fn descriptor(&self) -> &TableDescriptor;

    /// Construct an empty model instance ready for `load_from_cursor`.
    fn new_model(&self) -> Self::Model;

    /// Populate every declared column of `model` from the current cursor
    /// row, reading positionally in declaration order. SQL NULL leaves the
    /// field at its default or `None`.
    fn load_from_cursor(&self, cursor: &dyn Cursor, model: &mut Self::Model) -> OrmResult<()>;

    /// Bind every declared column of `model` starting at `start_index`
    /// (1-based), in declaration order.
    fn bind_to_insert(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &Self::Model,
        start_index: usize,
    ) -> OrmResult<()>;

    /// Bind the UPDATE SET columns followed by the primary key columns.
    fn bind_to_update(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &Self::Model,
        start_index: usize,
    ) -> OrmResult<()>;

    /// Bind the primary key columns.
    fn bind_to_delete(
        &self,
        statement: &mut dyn DatabaseStatement,
        model: &Self::Model,
        start_index: usize,
    ) -> OrmResult<()>;

    /// Extract the caching column value from the current row without
    /// materializing the model. Used for the cheap cache probe.
    fn caching_column_value(&self, cursor: &dyn Cursor) -> OrmResult<SqlValue> {
        cursor.get_value(self.descriptor().caching_column_index())
    }

    /// Whether instances of this type participate in the model cache.
    fn caching_enabled(&self) -> bool {
        false
    }

    /// Refresh foreign-key-derived fields from the current row, leaving
    /// base fields untouched. Invoked on cache hits; no-op by default.
    fn reload_relationships(
        &self,
        _cursor: &dyn Cursor,
        _model: &mut Self::Model,
    ) -> OrmResult<()> {
        Ok(())
    }

    /// Read the autoincrement id of `model`, `None` when unset. Errors with
    /// `UnsupportedOperation` unless the entity declares an autoincrement
    /// column.
    fn auto_increment_id(&self, _model: &Self::Model) -> OrmResult<Option<i64>> {
        Err(OrmError::UnsupportedOperation(format!(
            "table '{}' has no autoincrement column",
            self.descriptor().table()
        )))
    }

    /// Whether `model` already carries a database-assigned id.
    ///
    /// Errors with `InvalidState` when the id is unset; true only for a
    /// strictly positive id.
    fn has_auto_increment(&self, model: &Self::Model) -> OrmResult<bool> {
        match self.auto_increment_id(model)? {
            Some(id) => Ok(id > 0),
            None => Err(OrmError::InvalidState(format!(
                "autoincrement id on table '{}' is null",
                self.descriptor().table()
            ))),
        }
    }

    /// Write a database-assigned row id back into `model`. No-op by
    /// default; autoincrement entities override.
    fn update_auto_increment(&self, _model: &mut Self::Model, _id: i64) {}

    /// Cascade-save referenced entities. Runs before the primary insert or
    /// update; no-op by default.
    fn save_foreign_keys(&self, _db: &dyn Database, _model: &Self::Model) -> OrmResult<()> {
        Ok(())
    }

    /// Cascade-delete referenced entities. Runs after the primary delete;
    /// no-op by default.
    fn delete_foreign_keys(&self, _db: &dyn Database, _model: &Self::Model) -> OrmResult<()> {
        Ok(())
    }
}

/// Bind one column value, enforcing the NOT NULL declaration.
///
/// Adapters route their binds through this so a null value in a required
/// column surfaces as `OrmError::Binding` naming the table and column.
pub fn bind_property(
    statement: &mut dyn DatabaseStatement,
    index: usize,
    value: &SqlValue,
    table: &str,
    property: &Property,
) -> OrmResult<()> {
    if value.is_null() && !property.is_nullable() {
        return Err(OrmError::binding(
            table,
            property.name(),
            "cannot bind NULL to a NOT NULL column",
        ));
    }
    statement.bind(index, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryDatabase;
    use crate::schema::{ColumnType, Property};

    #[test]
    fn test_bind_property_rejects_null_in_not_null_column() {
        let db = MemoryDatabase::new();
        let mut stmt = db.compile_statement("INSERT").unwrap();
        let property = Property::new("name", ColumnType::Text).not_null();
        let err =
            bind_property(stmt.as_mut(), 1, &SqlValue::Null, "users", &property).unwrap_err();
        assert!(matches!(err, OrmError::Binding { .. }));
        assert!(err.to_string().contains("users.name"));
    }

    #[test]
    fn test_bind_property_allows_null_in_nullable_column() {
        let db = MemoryDatabase::new();
        let mut stmt = db.compile_statement("INSERT").unwrap();
        let property = Property::new("age", ColumnType::Integer);
        bind_property(stmt.as_mut(), 1, &SqlValue::Null, "users", &property).unwrap();
    }
}
