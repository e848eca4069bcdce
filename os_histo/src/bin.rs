use crate::key::BinKey;
use serde::Serialize;
use std::sync::Arc;

/// A group of items sharing a bin key
///
/// Membership is by identity: an item is the `Arc` it was added with, so two
/// equal records are still two members.
#[derive(Debug)]
pub struct Bin<T> {
    key: BinKey,
    label: String,
    id: String,
    items: Vec<Arc<T>>,
    children: Option<Vec<Bin<T>>>,
}

impl<T> Bin<T> {
    pub fn new(key: BinKey, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key,
            id: label.clone(),
            label,
            items: Vec::new(),
            children: None,
        }
    }

    pub fn key(&self) -> &BinKey {
        &self.key
    }

    pub fn set_key(&mut self, key: BinKey) {
        self.key = key;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the label; the identity token follows it
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.id = self.label.clone();
    }

    /// Identity token, equal to the last label set
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn items(&self) -> &[Arc<T>] {
        &self.items
    }

    pub fn add_item(&mut self, item: Arc<T>) {
        self.items.push(item);
    }

    /// Remove the first occurrence of `item`; returns false when it was not a member
    pub fn remove_item(&mut self, item: &Arc<T>) -> bool {
        match self.items.iter().position(|i| Arc::ptr_eq(i, item)) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every item; children are left alone
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn children(&self) -> Option<&[Bin<T>]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Bin<T>>> {
        self.children.as_mut()
    }

    pub fn set_children(&mut self, children: Option<Vec<Bin<T>>>) {
        self.children = children;
    }

    /// Serializable view without the items themselves
    pub fn summary(&self) -> BinSummary {
        BinSummary {
            key: self.key.clone(),
            label: self.label.clone(),
            count: self.count(),
            children: self
                .children
                .as_ref()
                .map(|children| children.iter().map(Bin::summary).collect()),
        }
    }
}

// Items are shared, so cloning a bin never needs `T: Clone`
impl<T> Clone for Bin<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            id: self.id.clone(),
            items: self.items.clone(),
            children: self.children.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSummary {
    pub key: BinKey,
    pub label: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BinSummary>>,
}
