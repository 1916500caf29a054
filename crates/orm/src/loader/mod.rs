//! Model loaders - cursor-to-object materialization
//!
//! `ModelLoader` always constructs fresh instances; `CacheableModelLoader`
//! consults a model cache per row and reuses already-materialized instances
//! for repeated keys. Both consume the cursor fully and preserve row order
//! in the result list; releasing the cursor afterwards is the caller's
//! concern.

use std::rc::Rc;

use tracing::trace;

use crate::adapter::{model_ref, ModelAdapter, ModelRef};
use crate::backends::Cursor;
use crate::cache::{CacheKey, ModelCache};
use crate::error::OrmResult;

/// Loader that materializes a fresh instance for every row
pub struct ModelLoader<'a, A: ModelAdapter> {
    adapter: &'a A,
}

impl<'a, A: ModelAdapter> ModelLoader<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self { adapter }
    }

    /// Materialize every remaining row of `cursor`, appending to
    /// `existing` when given. The result preserves cursor order.
    pub fn load(
        &self,
        cursor: &mut dyn Cursor,
        existing: Option<Vec<ModelRef<A::Model>>>,
    ) -> OrmResult<Vec<ModelRef<A::Model>>> {
        let mut results = existing.unwrap_or_default();
        if !cursor.move_to_first()? {
            return Ok(results);
        }
        loop {
            results.push(materialize(self.adapter, cursor)?);
            if !cursor.move_to_next()? {
                break;
            }
        }
        Ok(results)
    }

    /// Materialize only the first row, if any.
    pub fn load_single(&self, cursor: &mut dyn Cursor) -> OrmResult<Option<ModelRef<A::Model>>> {
        if !cursor.move_to_first()? {
            return Ok(None);
        }
        materialize(self.adapter, cursor).map(Some)
    }
}

/// Cache-aware loader
///
/// For each row the caching column is probed first; a non-null key that hits
/// the cache reuses the cached instance and only refreshes its relationship
/// fields. Base fields of a cached instance are trusted to match the row
/// because the key uniquely identifies it; if rows can change underneath the
/// cache without invalidation, that assumption does not hold and the stale
/// fields are the caller's to manage.
pub struct CacheableModelLoader<'a, A, C>
where
    A: ModelAdapter,
    C: ModelCache<A::Model>,
{
    adapter: &'a A,
    cache: C,
}

impl<'a, A, C> CacheableModelLoader<'a, A, C>
where
    A: ModelAdapter,
    C: ModelCache<A::Model>,
{
    pub fn new(adapter: &'a A, cache: C) -> Self {
        Self { adapter, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Materialize every remaining row of `cursor`, reusing cached
    /// instances for repeated non-null keys. Appends to `existing` when
    /// given; the result preserves cursor order and may contain the same
    /// handle at several positions.
    pub fn load(
        &mut self,
        cursor: &mut dyn Cursor,
        existing: Option<Vec<ModelRef<A::Model>>>,
    ) -> OrmResult<Vec<ModelRef<A::Model>>> {
        let mut results = existing.unwrap_or_default();
        if !cursor.move_to_first()? {
            return Ok(results);
        }
        loop {
            results.push(self.materialize_row(cursor)?);
            if !cursor.move_to_next()? {
                break;
            }
        }
        Ok(results)
    }

    /// Materialize only the first row, if any, through the cache.
    pub fn load_single(&mut self, cursor: &mut dyn Cursor) -> OrmResult<Option<ModelRef<A::Model>>> {
        if !cursor.move_to_first()? {
            return Ok(None);
        }
        self.materialize_row(cursor).map(Some)
    }

    fn materialize_row(&mut self, cursor: &dyn Cursor) -> OrmResult<ModelRef<A::Model>> {
        if !self.adapter.caching_enabled() {
            return materialize(self.adapter, cursor);
        }

        let key_value = self.adapter.caching_column_value(cursor)?;
        let Some(key) = CacheKey::from_value(&key_value) else {
            // NULL caching column: always a miss, never stored.
            trace!(table = self.adapter.descriptor().table(), "null cache key");
            return materialize(self.adapter, cursor);
        };

        if let Some(cached) = self.cache.get(&key) {
            trace!(table = self.adapter.descriptor().table(), ?key, "cache hit");
            let mut model = cached.borrow_mut();
            self.adapter.reload_relationships(cursor, &mut *model)?;
            drop(model);
            return Ok(cached);
        }

        trace!(table = self.adapter.descriptor().table(), ?key, "cache miss");
        let instance = materialize(self.adapter, cursor)?;
        self.cache.put(key, Rc::clone(&instance));
        Ok(instance)
    }
}

fn materialize<A: ModelAdapter>(adapter: &A, cursor: &dyn Cursor) -> OrmResult<ModelRef<A::Model>> {
    let mut model = adapter.new_model();
    adapter.load_from_cursor(cursor, &mut model)?;
    Ok(model_ref(model))
}
