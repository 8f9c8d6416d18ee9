//! OrderedMap: unique keys mapped to values, ordered by key, with
//! read-only epoch-checked cursors over `(key, value)` pairs.

use crate::cursor::{Const, Cursor, Forward, Reverse, Storage};
use crate::error::{Error, Result};
use crate::repr;
use crate::tokens::Tokenizer;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use std::rc::Rc;

pub type Iter<K, V> = Cursor<(K, V), Forward, Const>;
pub type ReverseIter<K, V> = Cursor<(K, V), Reverse, Const>;

pub struct OrderedMap<K, V> {
    storage: Storage<(K, V)>,
    tokenizer: Tokenizer,
}

impl<K, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::from_sorted(Vec::new())
    }

    fn from_sorted(raw: Vec<(K, V)>) -> Self {
        Self {
            storage: Rc::new(RefCell::new(raw)),
            tokenizer: Tokenizer::new(),
        }
    }

    fn raw(&self) -> Ref<'_, Vec<(K, V)>> {
        self.storage.borrow()
    }

    fn raw_mut(&mut self) -> RefMut<'_, Vec<(K, V)>> {
        self.storage.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.raw().len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }

    /// Borrowed view of the entries in key order.
    pub fn as_slice(&self) -> Ref<'_, [(K, V)]> {
        Ref::map(self.raw(), |raw| raw.as_slice())
    }

    /// Entries in key order.
    pub fn to_state(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.raw().clone()
    }

    pub fn clear(&mut self) {
        self.tokenizer.retire();
        let previous = core::mem::take(&mut *self.raw_mut());
        drop(previous);
    }

    pub fn begin(&self) -> Iter<K, V> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn end(&self) -> Iter<K, V> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn rbegin(&self) -> ReverseIter<K, V> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn rend(&self) -> ReverseIter<K, V> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn cbegin(&self) -> Iter<K, V> {
        self.begin()
    }

    pub fn cend(&self) -> Iter<K, V> {
        self.end()
    }

    pub fn crbegin(&self) -> ReverseIter<K, V> {
        self.rbegin()
    }

    pub fn crend(&self) -> ReverseIter<K, V> {
        self.rend()
    }

    /// `(key, value)` clones in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        self.begin()
    }

    pub fn iter_rev(&self) -> ReverseIter<K, V> {
        self.rbegin()
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Rebuild from `(key, value)` pairs by replaying inserts; a later
    /// pair overwrites an earlier one with the same key.
    pub fn from_state<I: IntoIterator<Item = (K, V)>>(state: I) -> Self {
        state.into_iter().collect()
    }

    fn search(&self, key: &K) -> core::result::Result<usize, usize> {
        self.raw().binary_search_by(|(existing, _)| existing.cmp(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    pub fn get(&self, key: &K) -> Result<V>
    where
        V: Clone,
    {
        let index = self.search(key).map_err(|_| Error::KeyNotFound)?;
        let value = self.raw()[index].1.clone();
        Ok(value)
    }

    /// Insert or overwrite. Always invalidates cursors, even when the key
    /// was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let found = self.search(&key);
        self.tokenizer.retire();
        match found {
            Ok(index) => Some(core::mem::replace(&mut self.raw_mut()[index].1, value)),
            Err(index) => {
                self.raw_mut().insert(index, (key, value));
                None
            }
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let index = self.search(key).map_err(|_| Error::KeyNotFound)?;
        self.tokenizer.retire();
        let (_key, value) = self.raw_mut().remove(index);
        Ok(value)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    /// Deep copy with its own storage and epoch.
    fn clone(&self) -> Self {
        Self::from_sorted(self.raw().clone())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs: Vec<(K, V)> = iter.into_iter().collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        let mut raw: Vec<(K, V)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            match raw.last_mut() {
                // Stable sort: the later pair wins.
                Some(last) if last.0 == key => last.1 = value,
                _ => raw.push((key, value)),
            }
        }
        Self::from_sorted(raw)
    }
}

impl<K: Clone, V: Clone> IntoIterator for &OrderedMap<K, V> {
    type Item = Result<(K, V)>;
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        *self.raw() == *other.raw()
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = Rc::as_ptr(&self.storage) as *const () as usize;
        repr::write_guarded(f, "OrderedMap", address, |f| {
            repr::write_list(f, self.raw().iter())
        })
    }
}
