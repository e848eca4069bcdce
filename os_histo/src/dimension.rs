//! Crossfilter-style dimensions
//!
//! A dimension views a fixed item list through a key accessor and can be
//! narrowed to the items with one key.

use crate::key::BinKey;
use std::fmt;
use std::sync::Arc;

pub type KeyAccessor<T> = Arc<dyn Fn(&T) -> BinKey + Send + Sync>;

pub trait Dimension {
    type Item;

    /// Keep only the items whose key equals `key`
    fn filter_exact(&mut self, key: &BinKey);

    /// Remove any filter
    fn filter_all(&mut self);

    /// Up to `k` filtered items in descending key order; `usize::MAX` for all of them
    fn top(&self, k: usize) -> Vec<Arc<Self::Item>>;
}

pub struct KeyedDimension<T> {
    items: Vec<Arc<T>>,
    accessor: KeyAccessor<T>,
    filter: Option<BinKey>,
}

impl<T> KeyedDimension<T> {
    pub fn new(items: Vec<Arc<T>>, accessor: KeyAccessor<T>) -> Self {
        Self {
            items,
            accessor,
            filter: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_filter(&self) -> Option<&BinKey> {
        self.filter.as_ref()
    }

    pub fn key(&self, item: &T) -> BinKey {
        (self.accessor)(item)
    }

    fn passes(&self, item: &T) -> bool {
        match &self.filter {
            Some(key) => self.key(item) == *key,
            None => true,
        }
    }
}

impl<T> fmt::Debug for KeyedDimension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedDimension")
            .field("items", &self.items.len())
            .field("filter", &self.filter)
            .finish()
    }
}

impl<T> Dimension for KeyedDimension<T> {
    type Item = T;

    fn filter_exact(&mut self, key: &BinKey) {
        self.filter = Some(key.clone());
    }

    fn filter_all(&mut self) {
        self.filter = None;
    }

    fn top(&self, k: usize) -> Vec<Arc<T>> {
        let mut keyed: Vec<(BinKey, &Arc<T>)> = self
            .items
            .iter()
            .filter(|item| self.passes(item))
            .map(|item| (self.key(item), item))
            .collect();

        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed
            .into_iter()
            .take(k)
            .map(|(_, item)| Arc::clone(item))
            .collect()
    }
}
