//! Hook chain types

use crate::normalize::PageRecord;
use std::fmt;
use std::sync::Arc;

type EntityFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;
type EntityUpdateFn<T> = Arc<dyn Fn(&T, T) -> T + Send + Sync>;
type RecordUpdateFn<T> =
    Arc<dyn Fn(Option<&PageRecord<T>>, PageRecord<T>) -> PageRecord<T> + Send + Sync>;

/// Ordered transform chains applied on the cache-write path
pub struct StoreHooks<T> {
    pre_add_entity: Vec<EntityFn<T>>,
    pre_update_entity: Vec<EntityUpdateFn<T>>,
    pre_update: Vec<RecordUpdateFn<T>>,
}

impl<T> Default for StoreHooks<T> {
    fn default() -> Self {
        Self {
            pre_add_entity: Vec::new(),
            pre_update_entity: Vec::new(),
            pre_update: Vec::new(),
        }
    }
}

impl<T> Clone for StoreHooks<T> {
    fn clone(&self) -> Self {
        Self {
            pre_add_entity: self.pre_add_entity.clone(),
            pre_update_entity: self.pre_update_entity.clone(),
            pre_update: self.pre_update.clone(),
        }
    }
}

impl<T> fmt::Debug for StoreHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHooks")
            .field("pre_add_entity", &self.pre_add_entity.len())
            .field("pre_update_entity", &self.pre_update_entity.len())
            .field("pre_update", &self.pre_update.len())
            .finish()
    }
}

impl<T> StoreHooks<T> {
    /// Create an empty hook set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform for entities entering the cache
    #[must_use]
    pub fn pre_add_entity<F>(mut self, hook: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.pre_add_entity.push(Arc::new(hook));
        self
    }

    /// Append a transform for entities replacing a cached entity
    ///
    /// The first argument is the entity being replaced.
    #[must_use]
    pub fn pre_update_entity<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T, T) -> T + Send + Sync + 'static,
    {
        self.pre_update_entity.push(Arc::new(hook));
        self
    }

    /// Append a transform for the whole record about to be committed
    ///
    /// The first argument is the record currently cached for the page, if any.
    #[must_use]
    pub fn pre_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&PageRecord<T>>, PageRecord<T>) -> PageRecord<T> + Send + Sync + 'static,
    {
        self.pre_update.push(Arc::new(hook));
        self
    }

    /// Check if no hook is registered
    pub fn is_empty(&self) -> bool {
        self.pre_add_entity.is_empty()
            && self.pre_update_entity.is_empty()
            && self.pre_update.is_empty()
    }

    /// Run the `pre_add_entity` chain
    pub fn apply_add(&self, entity: T) -> T {
        self.pre_add_entity
            .iter()
            .fold(entity, |entity, hook| hook(entity))
    }

    /// Run the `pre_update_entity` chain
    pub fn apply_update_entity(&self, previous: &T, next: T) -> T {
        self.pre_update_entity
            .iter()
            .fold(next, |next, hook| hook(previous, next))
    }

    /// Run every chain over a record about to replace `previous`
    ///
    /// Entities are paired with the previous record by position. Entities
    /// without a counterpart count as additions.
    pub fn apply(
        &self,
        previous: Option<&PageRecord<T>>,
        mut next: PageRecord<T>,
    ) -> PageRecord<T> {
        if self.is_empty() {
            return next;
        }

        let prior: &[T] = previous.map_or(&[], |record| record.data.as_slice());
        next.data = next
            .data
            .into_iter()
            .enumerate()
            .map(|(index, entity)| match prior.get(index) {
                Some(old) => self.apply_update_entity(old, entity),
                None => self.apply_add(entity),
            })
            .collect();

        self.pre_update
            .iter()
            .fold(next, |record, hook| hook(previous, record))
    }
}
