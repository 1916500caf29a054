//! In-memory backend
//!
//! `BufferedCursor` replays pre-materialized rows and `MemoryDatabase`
//! records every bind and execution. Both serve as test doubles for the
//! loader and saver, and `BufferedCursor` doubles as the cursor type for any
//! executor that materializes its result set up front.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::backends::{column_out_of_range, Cursor, Database, DatabaseStatement};
use crate::error::{OrmError, OrmResult};
use crate::value::SqlValue;

/// Cursor over a pre-materialized row buffer
#[derive(Debug, Clone, Default)]
pub struct BufferedCursor {
    rows: Vec<Vec<SqlValue>>,
    position: Option<usize>,
}

impl BufferedCursor {
    pub fn new(rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            rows,
            position: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn current_row(&self) -> OrmResult<&[SqlValue]> {
        let position = self
            .position
            .ok_or_else(|| OrmError::InvalidState("cursor is not positioned on a row".into()))?;
        Ok(&self.rows[position])
    }
}

impl Cursor for BufferedCursor {
    fn move_to_first(&mut self) -> OrmResult<bool> {
        if self.rows.is_empty() {
            self.position = None;
            return Ok(false);
        }
        self.position = Some(0);
        Ok(true)
    }

    fn move_to_next(&mut self) -> OrmResult<bool> {
        match self.position {
            Some(current) if current + 1 < self.rows.len() => {
                self.position = Some(current + 1);
                Ok(true)
            }
            _ => {
                self.position = None;
                Ok(false)
            }
        }
    }

    fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn get_value(&self, index: usize) -> OrmResult<SqlValue> {
        let row = self.current_row()?;
        row.get(index)
            .cloned()
            .ok_or_else(|| column_out_of_range(index, row.len()))
    }
}

/// One recorded statement execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub bindings: Vec<SqlValue>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_rowid: i64,
    affected_rows: u64,
    executed: Vec<ExecutedStatement>,
}

/// Recording statement executor
///
/// INSERTs hand out sequential row ids; UPDATE/DELETE report a configurable
/// affected-row count. Every execution is logged with its bound values so
/// tests can assert on binding order.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Affected-row count reported by subsequent UPDATE/DELETE executions.
    pub fn set_affected_rows(&self, affected: u64) {
        self.state.borrow_mut().affected_rows = affected;
    }

    /// Every statement executed so far, in execution order.
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.state.borrow().executed.clone()
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.state.borrow().next_rowid
    }
}

impl Database for MemoryDatabase {
    fn compile_statement<'a>(&'a self, sql: &str) -> OrmResult<Box<dyn DatabaseStatement + 'a>> {
        Ok(Box::new(MemoryStatement {
            sql: sql.to_string(),
            bindings: Vec::new(),
            state: Rc::clone(&self.state),
        }))
    }

    fn execute_raw(&self, sql: &str) -> OrmResult<()> {
        debug!(sql, "executing raw statement");
        self.state.borrow_mut().executed.push(ExecutedStatement {
            sql: sql.to_string(),
            bindings: Vec::new(),
        });
        Ok(())
    }
}

struct MemoryStatement {
    sql: String,
    bindings: Vec<SqlValue>,
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStatement {
    fn record(&mut self) -> ExecutedStatement {
        ExecutedStatement {
            sql: self.sql.clone(),
            bindings: std::mem::take(&mut self.bindings),
        }
    }
}

impl DatabaseStatement for MemoryStatement {
    fn bind(&mut self, index: usize, value: &SqlValue) -> OrmResult<()> {
        if index == 0 {
            return Err(OrmError::InvalidState(
                "bind positions are 1-based".into(),
            ));
        }
        if self.bindings.len() < index {
            self.bindings.resize(index, SqlValue::Null);
        }
        self.bindings[index - 1] = value.clone();
        Ok(())
    }

    fn execute_insert(&mut self) -> OrmResult<i64> {
        let record = self.record();
        let mut state = self.state.borrow_mut();
        state.next_rowid += 1;
        state.executed.push(record);
        Ok(state.next_rowid)
    }

    fn execute_update_delete(&mut self) -> OrmResult<u64> {
        let record = self.record();
        let mut state = self.state.borrow_mut();
        state.executed.push(record);
        Ok(state.affected_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<SqlValue>> {
        vec![
            vec![SqlValue::Integer(1), SqlValue::Text("a".into())],
            vec![SqlValue::Integer(2), SqlValue::Text("b".into())],
        ]
    }

    #[test]
    fn test_cursor_iteration() {
        let mut cursor = BufferedCursor::new(rows());
        assert!(cursor.move_to_first().unwrap());
        assert_eq!(cursor.get_integer(0).unwrap(), 1);
        assert!(cursor.move_to_next().unwrap());
        assert_eq!(cursor.get_text(1).unwrap(), "b");
        assert!(!cursor.move_to_next().unwrap());
        // Exhausted cursors stay exhausted.
        assert!(!cursor.move_to_next().unwrap());
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = BufferedCursor::new(Vec::new());
        assert!(!cursor.move_to_first().unwrap());
        assert!(cursor.get_value(0).is_err());
    }

    #[test]
    fn test_unpositioned_read_is_invalid_state() {
        let cursor = BufferedCursor::new(rows());
        assert!(matches!(
            cursor.get_value(0),
            Err(OrmError::InvalidState(_))
        ));
    }

    #[test]
    fn test_statement_records_bindings_in_order() {
        let db = MemoryDatabase::new();
        let mut stmt = db.compile_statement("INSERT INTO \"t\"(\"a\") VALUES (?)").unwrap();
        stmt.bind(1, &SqlValue::Text("x".into())).unwrap();
        let rowid = stmt.execute_insert().unwrap();
        drop(stmt);
        assert_eq!(rowid, 1);
        let executed = db.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].bindings, vec![SqlValue::Text("x".into())]);
    }

    #[test]
    fn test_affected_rows_configurable() {
        let db = MemoryDatabase::new();
        db.set_affected_rows(3);
        let mut stmt = db.compile_statement("DELETE FROM \"t\"").unwrap();
        assert_eq!(stmt.execute_update_delete().unwrap(), 3);
    }
}
