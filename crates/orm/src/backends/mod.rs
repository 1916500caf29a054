//! Database backend traits
//!
//! These traits define the interface the ORM core needs from its
//! collaborators: statement compilation and execution, and forward-only row
//! cursors. Everything is synchronous and blocking; an operation runs to
//! completion on the calling thread before returning.

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::error::{OrmError, OrmResult};
use crate::value::SqlValue;

pub use memory::{BufferedCursor, MemoryDatabase};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteCursor, SqliteDatabase};

/// Statement executor owned by the database layer
pub trait Database {
    /// Compile a SQL string into an executable statement handle.
    fn compile_statement<'a>(&'a self, sql: &str) -> OrmResult<Box<dyn DatabaseStatement + 'a>>;

    /// Execute a statement that returns no rows (DDL, transaction control).
    fn execute_raw(&self, sql: &str) -> OrmResult<()>;
}

/// A compiled, bindable, executable statement
///
/// Bind positions are 1-based, matching the positional `?` placeholders of
/// the generated SQL. Executing a statement resets it for reuse.
pub trait DatabaseStatement {
    /// Bind a scalar value at the given 1-based position.
    fn bind(&mut self, index: usize, value: &SqlValue) -> OrmResult<()>;

    /// Execute an INSERT and return the generated row id.
    fn execute_insert(&mut self) -> OrmResult<i64>;

    /// Execute an UPDATE or DELETE and return the affected row count.
    fn execute_update_delete(&mut self) -> OrmResult<u64>;
}

/// Forward-only row cursor over a query result
///
/// A cursor starts positioned before the first row. The loader assumes
/// exclusive ownership for the duration of a load; concurrent iteration from
/// multiple threads is unsupported. Releasing the underlying result is the
/// caller's responsibility once the cursor is exhausted.
pub trait Cursor {
    /// Position the cursor at the first row. Returns false for an empty
    /// result.
    fn move_to_first(&mut self) -> OrmResult<bool>;

    /// Advance to the next row. Returns false once the result is exhausted.
    fn move_to_next(&mut self) -> OrmResult<bool>;

    /// Number of columns in the result.
    fn column_count(&self) -> usize;

    /// Read the raw value of a column of the current row.
    fn get_value(&self, index: usize) -> OrmResult<SqlValue>;

    /// Read an integer column; SQL NULL reads as 0.
    fn get_integer(&self, index: usize) -> OrmResult<i64> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(0),
            value => value.as_integer(),
        }
    }

    /// Read a real column; SQL NULL reads as 0.0.
    fn get_real(&self, index: usize) -> OrmResult<f64> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(0.0),
            value => value.as_real(),
        }
    }

    /// Read a text column; SQL NULL reads as the empty string.
    fn get_text(&self, index: usize) -> OrmResult<String> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(String::new()),
            value => value.as_text().map(str::to_string),
        }
    }

    /// Read a blob column; SQL NULL reads as an empty buffer.
    fn get_blob(&self, index: usize) -> OrmResult<Vec<u8>> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(Vec::new()),
            value => value.as_blob().map(<[u8]>::to_vec),
        }
    }

    /// Read a nullable integer column.
    fn get_optional_integer(&self, index: usize) -> OrmResult<Option<i64>> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(None),
            value => value.as_integer().map(Some),
        }
    }

    /// Read a nullable real column.
    fn get_optional_real(&self, index: usize) -> OrmResult<Option<f64>> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(None),
            value => value.as_real().map(Some),
        }
    }

    /// Read a nullable text column.
    fn get_optional_text(&self, index: usize) -> OrmResult<Option<String>> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(None),
            value => value.as_text().map(str::to_string).map(Some),
        }
    }

    /// Read a nullable blob column.
    fn get_optional_blob(&self, index: usize) -> OrmResult<Option<Vec<u8>>> {
        match self.get_value(index)? {
            SqlValue::Null => Ok(None),
            value => value.as_blob().map(<[u8]>::to_vec).map(Some),
        }
    }
}

pub(crate) fn column_out_of_range(index: usize, count: usize) -> OrmError {
    OrmError::Database(format!(
        "column index {index} out of range for {count}-column row"
    ))
}
