//! Copy-on-write lists.

use parking_lot::RwLock;
use std::sync::Arc;

/// A list whose readers iterate over stable snapshots while writers replace the backing store.
///
/// Mutation clones the current vector, so this is meant for small, rarely changing lists that are
/// read a lot (listeners, assigned zones).
#[derive(Debug)]
pub struct CowList<T> {
    items: RwLock<Arc<Vec<T>>>,
}

impl<T> Default for CowList<T> {
    fn default() -> Self {
        CowList {
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<T: Clone> CowList<T> {
    pub fn new() -> CowList<T> {
        CowList::default()
    }

    /// Returns the current contents. Later mutation does not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items.read())
    }

    /// Appends `item` unless an element matching `exists` is already present.
    ///
    /// Returns true if the item was added.
    pub fn push_unless(&self, item: T, exists: impl Fn(&T) -> bool) -> bool {
        let mut items = self.items.write();
        if items.iter().any(exists) {
            return false;
        }
        let mut next = Vec::clone(&items);
        next.push(item);
        *items = Arc::new(next);
        true
    }

    /// Removes every element matching `pred`. Returns true if anything was removed.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> bool {
        let mut items = self.items.write();
        if !items.iter().any(&pred) {
            return false;
        }
        let next = items.iter().filter(|i| !pred(*i)).cloned().collect();
        *items = Arc::new(next);
        true
    }

    pub fn contains(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.items.read().iter().any(pred)
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
