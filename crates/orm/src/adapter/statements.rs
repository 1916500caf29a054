//! Lazily compiled statement handles
//!
//! A `LazyStatement` holds either nothing or an owned compiled handle: the
//! handle is acquired on first access, can be closed at any time, and the
//! next access recompiles it. Closing while another reference to the SQL
//! text exists is safe; only the handle is dropped.

use tracing::trace;

use crate::backends::{Database, DatabaseStatement};
use crate::error::{OrmError, OrmResult};
use crate::schema::TableDescriptor;

/// Optional owned statement handle with lazy acquisition
pub struct LazyStatement<'db> {
    sql: String,
    handle: Option<Box<dyn DatabaseStatement + 'db>>,
}

impl<'db> LazyStatement<'db> {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            handle: None,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn is_compiled(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the compiled handle, compiling it through `db` on first use.
    pub fn acquire(&mut self, db: &'db dyn Database) -> OrmResult<&mut (dyn DatabaseStatement + 'db)> {
        if self.handle.is_none() {
            trace!(sql = %self.sql, "compiling lazy statement");
            self.handle = Some(db.compile_statement(&self.sql)?);
        }
        self.handle
            .as_deref_mut()
            .ok_or_else(|| OrmError::InvalidState("statement handle vanished during acquire".into()))
    }

    /// Drop the compiled handle. The next `acquire` recompiles.
    pub fn close(&mut self) {
        self.handle = None;
    }
}

impl std::fmt::Debug for LazyStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyStatement")
            .field("sql", &self.sql)
            .field("compiled", &self.handle.is_some())
            .finish()
    }
}

/// The three mutating statements of one adapter, compiled lazily
pub struct ModelStatements<'db> {
    db: &'db dyn Database,
    insert: LazyStatement<'db>,
    update: LazyStatement<'db>,
    delete: LazyStatement<'db>,
}

impl<'db> ModelStatements<'db> {
    pub fn new(db: &'db dyn Database, descriptor: &TableDescriptor) -> Self {
        Self {
            db,
            insert: LazyStatement::new(descriptor.insert_query()),
            update: LazyStatement::new(descriptor.update_query()),
            delete: LazyStatement::new(descriptor.delete_query()),
        }
    }

    pub fn insert(&mut self) -> OrmResult<&mut (dyn DatabaseStatement + 'db)> {
        self.insert.acquire(self.db)
    }

    pub fn update(&mut self) -> OrmResult<&mut (dyn DatabaseStatement + 'db)> {
        self.update.acquire(self.db)
    }

    pub fn delete(&mut self) -> OrmResult<&mut (dyn DatabaseStatement + 'db)> {
        self.delete.acquire(self.db)
    }

    /// Close all compiled handles; they recompile on next use.
    pub fn close_all(&mut self) {
        self.insert.close();
        self.update.close();
        self.delete.close();
    }
}

impl std::fmt::Debug for ModelStatements<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStatements")
            .field("insert", &self.insert)
            .field("update", &self.update)
            .field("delete", &self.delete)
            .finish()
    }
}
