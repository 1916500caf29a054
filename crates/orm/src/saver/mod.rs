//! Model savers - insert/update/delete orchestration
//!
//! A `ModelSaver` owns the lazily compiled mutating statements for one
//! adapter and drives single-model writes; `ListModelSaver` iterates
//! collections and reports aggregate counts. Transaction demarcation around
//! batch writes belongs to the database layer, not here.

use tracing::debug;

use crate::adapter::{ModelAdapter, ModelStatements};
use crate::backends::Database;
use crate::error::OrmResult;

/// Write path for single model instances
pub struct ModelSaver<'db, 'a, A: ModelAdapter> {
    db: &'db dyn Database,
    adapter: &'a A,
    statements: ModelStatements<'db>,
}

impl<'db, 'a, A: ModelAdapter> ModelSaver<'db, 'a, A> {
    pub fn new(db: &'db dyn Database, adapter: &'a A) -> Self {
        Self {
            db,
            adapter,
            statements: ModelStatements::new(db, adapter.descriptor()),
        }
    }

    /// Insert `model`, returning the generated row id. Foreign keys are
    /// cascade-saved first; an autoincrement id is written back into the
    /// model.
    pub fn insert(&mut self, model: &mut A::Model) -> OrmResult<i64> {
        self.adapter.save_foreign_keys(self.db, model)?;
        let statement = self.statements.insert()?;
        self.adapter.bind_to_insert(statement, model, 1)?;
        let id = statement.execute_insert()?;
        debug!(
            table = self.adapter.descriptor().table(),
            id, "inserted model"
        );
        if self.adapter.descriptor().auto_increment().is_some() {
            self.adapter.update_auto_increment(model, id);
        }
        Ok(id)
    }

    /// Update the row matching `model`'s primary key. True when a row was
    /// affected.
    pub fn update(&mut self, model: &A::Model) -> OrmResult<bool> {
        self.adapter.save_foreign_keys(self.db, model)?;
        let statement = self.statements.update()?;
        self.adapter.bind_to_update(statement, model, 1)?;
        let affected = statement.execute_update_delete()?;
        debug!(
            table = self.adapter.descriptor().table(),
            affected, "updated model"
        );
        Ok(affected > 0)
    }

    /// Update, falling back to insert when no existing row matched.
    pub fn save(&mut self, model: &mut A::Model) -> OrmResult<bool> {
        if self.update(model)? {
            return Ok(true);
        }
        self.insert(model)?;
        Ok(true)
    }

    /// Delete the row matching `model`'s primary key, then cascade-delete
    /// foreign keys. True when a row was affected.
    pub fn delete(&mut self, model: &A::Model) -> OrmResult<bool> {
        let statement = self.statements.delete()?;
        self.adapter.bind_to_delete(statement, model, 1)?;
        let affected = statement.execute_update_delete()?;
        self.adapter.delete_foreign_keys(self.db, model)?;
        debug!(
            table = self.adapter.descriptor().table(),
            affected, "deleted model"
        );
        Ok(affected > 0)
    }

    /// Close the compiled statement handles; they recompile on next use.
    pub fn close_statements(&mut self) {
        self.statements.close_all();
    }
}

/// Write path for collections of models
///
/// Counts report the number of models actually written. Callers wanting
/// atomicity wrap the calls in a transaction via the database layer.
pub struct ListModelSaver<'db, 'a, A: ModelAdapter> {
    saver: ModelSaver<'db, 'a, A>,
}

impl<'db, 'a, A: ModelAdapter> ListModelSaver<'db, 'a, A> {
    pub fn new(db: &'db dyn Database, adapter: &'a A) -> Self {
        Self {
            saver: ModelSaver::new(db, adapter),
        }
    }

    pub fn insert_all(&mut self, models: &mut [A::Model]) -> OrmResult<u64> {
        let mut count = 0;
        for model in models.iter_mut() {
            self.saver.insert(model)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn update_all(&mut self, models: &[A::Model]) -> OrmResult<u64> {
        let mut count = 0;
        for model in models {
            if self.saver.update(model)? {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn save_all(&mut self, models: &mut [A::Model]) -> OrmResult<u64> {
        let mut count = 0;
        for model in models.iter_mut() {
            if self.saver.save(model)? {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn delete_all(&mut self, models: &[A::Model]) -> OrmResult<u64> {
        let mut count = 0;
        for model in models {
            if self.saver.delete(model)? {
                count += 1;
            }
        }
        Ok(count)
    }
}
