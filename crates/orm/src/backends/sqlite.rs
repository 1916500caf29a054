//! SQLite backend
//!
//! Thin synchronous wrapper over `rusqlite`. Statement handles bind with the
//! raw 1-based parameter API and cursors stream rows forward-only, copying
//! the current row out of the driver so no borrow of the row outlives a
//! step.

use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection, Rows, Statement};
use tracing::debug;

use crate::backends::{Cursor, Database, DatabaseStatement};
use crate::error::{OrmError, OrmResult};
use crate::value::SqlValue;

fn to_sqlite(value: &SqlValue) -> SqliteValue {
    match value {
        SqlValue::Null => SqliteValue::Null,
        SqlValue::Integer(i) => SqliteValue::Integer(*i),
        SqlValue::Real(f) => SqliteValue::Real(*f),
        SqlValue::Text(s) => SqliteValue::Text(s.clone()),
        SqlValue::Blob(b) => SqliteValue::Blob(b.clone()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Real(f),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}

/// Statement executor backed by a rusqlite connection
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    pub fn open(path: &str) -> OrmResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> OrmResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Borrow the underlying connection, e.g. to prepare query statements
    /// for a `SqliteCursor`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Database for SqliteDatabase {
    fn compile_statement<'a>(&'a self, sql: &str) -> OrmResult<Box<dyn DatabaseStatement + 'a>> {
        debug!(sql, "compiling statement");
        let stmt = self.conn.prepare(sql)?;
        Ok(Box::new(SqliteStatement {
            conn: &self.conn,
            stmt,
        }))
    }

    fn execute_raw(&self, sql: &str) -> OrmResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

struct SqliteStatement<'conn> {
    conn: &'conn Connection,
    stmt: Statement<'conn>,
}

impl DatabaseStatement for SqliteStatement<'_> {
    fn bind(&mut self, index: usize, value: &SqlValue) -> OrmResult<()> {
        self.stmt.raw_bind_parameter(index, to_sqlite(value))?;
        Ok(())
    }

    fn execute_insert(&mut self) -> OrmResult<i64> {
        self.stmt.raw_execute()?;
        Ok(self.conn.last_insert_rowid())
    }

    fn execute_update_delete(&mut self) -> OrmResult<u64> {
        Ok(self.stmt.raw_execute()? as u64)
    }
}

/// Forward-only streaming cursor over a rusqlite query
///
/// The current row is copied into owned values on every step. Rewinding is
/// not supported; `move_to_first` is only valid before iteration starts.
pub struct SqliteCursor<'stmt> {
    rows: Rows<'stmt>,
    current: Option<Vec<SqlValue>>,
    column_count: usize,
    started: bool,
}

impl<'stmt> SqliteCursor<'stmt> {
    /// Bind `params` and start the query on a prepared statement.
    pub fn new(stmt: &'stmt mut Statement<'_>, params: &[SqlValue]) -> OrmResult<Self> {
        for (offset, value) in params.iter().enumerate() {
            stmt.raw_bind_parameter(offset + 1, to_sqlite(value))?;
        }
        let column_count = stmt.column_count();
        Ok(Self {
            rows: stmt.raw_query(),
            current: None,
            column_count,
            started: false,
        })
    }

    fn advance(&mut self) -> OrmResult<bool> {
        self.started = true;
        match self.rows.next()? {
            Some(row) => {
                let mut values = Vec::with_capacity(self.column_count);
                for index in 0..self.column_count {
                    values.push(from_sqlite(row.get_ref(index)?));
                }
                self.current = Some(values);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }
}

impl Cursor for SqliteCursor<'_> {
    fn move_to_first(&mut self) -> OrmResult<bool> {
        if self.started {
            return Err(OrmError::InvalidState(
                "forward-only cursor cannot rewind".into(),
            ));
        }
        self.advance()
    }

    fn move_to_next(&mut self) -> OrmResult<bool> {
        self.advance()
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    fn get_value(&self, index: usize) -> OrmResult<SqlValue> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| OrmError::InvalidState("cursor is not positioned on a row".into()))?;
        row.get(index)
            .cloned()
            .ok_or_else(|| super::column_out_of_range(index, row.len()))
    }
}
