//! Vector: a dynamic array with Python-style indexing and slicing and
//! epoch-checked cursors.
//!
//! Element code (`PartialEq`, `Clone`, iterators passed in by the caller)
//! runs before the epoch is retired and never while the storage is
//! mutably borrowed. Elements removed by a mutation are dropped after the
//! storage borrow is released.

use crate::cursor::{Const, Cursor, Forward, Mutable, Reverse, Storage};
use crate::error::{Error, Result};
use crate::repr;
use crate::slice::{clamp_insertion_index, normalize_index, Slice};
use crate::tokens::Tokenizer;
use core::cell::{Ref, RefCell, RefMut};
use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

/// Mutable forward cursor.
pub type Iter<T> = Cursor<T, Forward, Mutable>;
/// Mutable reverse cursor.
pub type ReverseIter<T> = Cursor<T, Reverse, Mutable>;
/// Read-only forward cursor.
pub type ConstIter<T> = Cursor<T, Forward, Const>;
/// Read-only reverse cursor.
pub type ConstReverseIter<T> = Cursor<T, Reverse, Const>;

pub struct Vector<T> {
    storage: Storage<T>,
    tokenizer: Tokenizer,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    fn from_vec(raw: Vec<T>) -> Self {
        Self {
            storage: Rc::new(RefCell::new(raw)),
            tokenizer: Tokenizer::new(),
        }
    }

    /// Rebuild from a state sequence by replaying appends.
    pub fn from_state<I: IntoIterator<Item = T>>(state: I) -> Self {
        let mut vector = Self::new();
        for value in state {
            vector.raw_mut().push(value);
        }
        vector
    }

    /// Elements in forward order.
    pub fn to_state(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.raw().clone()
    }

    fn raw(&self) -> Ref<'_, Vec<T>> {
        self.storage.borrow()
    }

    fn raw_mut(&mut self) -> RefMut<'_, Vec<T>> {
        self.storage.borrow_mut()
    }

    pub fn len(&self) -> usize {
        self.raw().len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw().capacity()
    }

    /// Borrowed view of the elements.
    pub fn as_slice(&self) -> Ref<'_, [T]> {
        Ref::map(self.raw(), |raw| raw.as_slice())
    }

    pub fn get(&self, index: isize) -> Result<T>
    where
        T: Clone,
    {
        let raw = self.raw();
        let index = normalize_index(index, raw.len())?;
        Ok(raw[index].clone())
    }

    /// Overwrite one element in place; outstanding cursors stay valid.
    pub fn set(&mut self, index: isize, value: T) -> Result<()> {
        let index = normalize_index(index, self.len())?;
        let previous = core::mem::replace(&mut self.raw_mut()[index], value);
        drop(previous);
        Ok(())
    }

    pub fn push_back(&mut self, value: T) {
        self.tokenizer.retire();
        self.raw_mut().push(value);
    }

    pub fn append(&mut self, value: T) {
        self.push_back(value);
    }

    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::EmptyCollection {
                container: "Vector",
            });
        }
        self.tokenizer.retire();
        self.raw_mut().pop().ok_or(Error::EmptyCollection {
            container: "Vector",
        })
    }

    /// Remove and return the element at a normalized index.
    pub fn pop(&mut self, index: isize) -> Result<T> {
        let index = normalize_index(index, self.len())?;
        self.tokenizer.retire();
        let value = self.raw_mut().remove(index);
        Ok(value)
    }

    pub fn delete(&mut self, index: isize) -> Result<()> {
        self.pop(index).map(drop)
    }

    /// Insert before `index`; out-of-range indices clamp to either end.
    pub fn insert(&mut self, index: isize, value: T) {
        let index = clamp_insertion_index(index, self.len());
        self.tokenizer.retire();
        self.raw_mut().insert(index, value);
    }

    /// Remove the first element equal to `value`.
    pub fn remove(&mut self, value: &T) -> Result<()>
    where
        T: PartialEq,
    {
        let index = self.index_of(value)?;
        self.tokenizer.retire();
        let removed = self.raw_mut().remove(index);
        drop(removed);
        Ok(())
    }

    pub fn index_of(&self, value: &T) -> Result<usize>
    where
        T: PartialEq,
    {
        self.raw()
            .iter()
            .position(|item| item == value)
            .ok_or(Error::ValueNotFound)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.raw().contains(value)
    }

    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.raw().iter().filter(|item| *item == value).count()
    }

    pub fn reverse(&mut self) {
        self.tokenizer.retire();
        self.raw_mut().reverse();
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        let mut values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        self.tokenizer.retire();
        self.raw_mut().append(&mut values);
    }

    /// Make room for at least `capacity` elements in total. Never shrinks
    /// and never invalidates cursors.
    pub fn reserve(&mut self, capacity: usize) {
        let mut raw = self.raw_mut();
        if capacity > raw.capacity() {
            let additional = capacity - raw.len();
            raw.reserve_exact(additional);
        }
    }

    /// Truncate to `size`, or pad with clones of `value`.
    pub fn resize(&mut self, size: usize, value: T)
    where
        T: Clone,
    {
        let len = self.len();
        // Clone the padding before the epoch is retired.
        let mut padding = if size > len {
            vec![value; size - len]
        } else {
            Vec::new()
        };
        self.tokenizer.retire();
        let mut raw = self.raw_mut();
        let tail = if size < len {
            raw.split_off(size)
        } else {
            Vec::new()
        };
        raw.append(&mut padding);
        drop(raw);
        drop(tail);
    }

    pub fn clear(&mut self) {
        self.tokenizer.retire();
        let previous = core::mem::take(&mut *self.raw_mut());
        drop(previous);
    }

    /// Copy of the addressed elements, in slice order.
    pub fn get_slice(&self, slice: impl Into<Slice>) -> Result<Vector<T>>
    where
        T: Clone,
    {
        let raw = self.raw();
        let bounds = slice.into().indices(raw.len())?;
        let values = bounds.positions().map(|p| raw[p].clone()).collect();
        Ok(Vector::from_vec(values))
    }

    /// Assign `values` to a slice.
    ///
    /// Contiguous slices (step 1 or -1) accept any number of values and
    /// resize the vector; extended slices require exactly as many values
    /// as they address.
    pub fn set_slice<I>(&mut self, slice: impl Into<Slice>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let bounds = slice.into().indices(self.len())?;
        tracing::trace!(
            start = bounds.start,
            stop = bounds.stop,
            step = bounds.step,
            count = bounds.count,
            assigned = values.len(),
            "assigning vector slice"
        );
        if bounds.is_contiguous() {
            if bounds.count == 0 && values.is_empty() {
                return Ok(());
            }
            let range = bounds.contiguous_range();
            self.tokenizer.retire();
            // `splice` moves the tail once and then fills the gap.
            let removed: Vec<T> = if bounds.step > 0 {
                self.raw_mut().splice(range, values).collect()
            } else {
                self.raw_mut().splice(range, values.into_iter().rev()).collect()
            };
            drop(removed);
        } else {
            if values.len() != bounds.count {
                return Err(Error::SliceLengthMismatch {
                    expected: bounds.count,
                    actual: values.len(),
                });
            }
            if bounds.count == 0 {
                return Ok(());
            }
            self.tokenizer.retire();
            let mut previous = Vec::with_capacity(bounds.count);
            {
                let mut raw = self.raw_mut();
                for (position, value) in bounds.positions().zip(values) {
                    previous.push(core::mem::replace(&mut raw[position], value));
                }
            }
            drop(previous);
        }
        Ok(())
    }

    pub fn delete_slice(&mut self, slice: impl Into<Slice>) -> Result<()> {
        let bounds = slice.into().indices(self.len())?;
        tracing::trace!(
            start = bounds.start,
            stop = bounds.stop,
            step = bounds.step,
            count = bounds.count,
            "deleting vector slice"
        );
        if bounds.count == 0 {
            return Ok(());
        }
        self.tokenizer.retire();
        let removed: Vec<T> = if bounds.is_contiguous() {
            self.raw_mut().drain(bounds.contiguous_range()).collect()
        } else {
            let mut raw = self.raw_mut();
            let mut doomed = vec![false; raw.len()];
            for position in bounds.positions() {
                doomed[position] = true;
            }
            let old = core::mem::take(&mut *raw);
            raw.reserve_exact(old.len() - bounds.count);
            let mut removed = Vec::with_capacity(bounds.count);
            for (item, doomed) in old.into_iter().zip(doomed) {
                if doomed {
                    removed.push(item);
                } else {
                    raw.push(item);
                }
            }
            removed
        };
        drop(removed);
        Ok(())
    }

    pub fn begin(&mut self) -> Iter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn end(&mut self) -> Iter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn rbegin(&mut self) -> ReverseIter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn rend(&mut self) -> ReverseIter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn cbegin(&self) -> ConstIter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn cend(&self) -> ConstIter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn crbegin(&self) -> ConstReverseIter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn crend(&self) -> ConstReverseIter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    /// Front-to-back clones of the elements; a structural mutation during
    /// iteration surfaces as one `Err(InvalidatedHandle)`.
    pub fn iter(&self) -> ConstIter<T> {
        self.cbegin()
    }

    pub fn iter_rev(&self) -> ConstReverseIter<T> {
        self.crbegin()
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Deep copy with its own storage and epoch.
    fn clone(&self) -> Self {
        Self::from_vec(self.raw().clone())
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(raw: Vec<T>) -> Self {
        Self::from_vec(raw)
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> IntoIterator for &Vector<T> {
    type Item = Result<T>;
    type IntoIter = ConstIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.raw() == *other.raw()
    }
}

impl<T: Eq> Eq for Vector<T> {}

/// Lexicographic order.
impl<T: PartialOrd> PartialOrd for Vector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.raw().as_slice().partial_cmp(other.raw().as_slice())
    }
}

impl<T: Ord> Ord for Vector<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw().as_slice().cmp(other.raw().as_slice())
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = Rc::as_ptr(&self.storage) as *const () as usize;
        repr::write_guarded(f, "Vector", address, |f| {
            repr::write_list(f, self.raw().iter())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(values: &[i32]) -> Vector<i32> {
        values.iter().copied().collect()
    }

    fn generation(v: &Vector<i32>) -> u64 {
        v.tokenizer.generation()
    }

    #[test]
    fn reads_and_in_place_writes_do_not_retire() {
        let mut v = vector(&[1, 2, 3]);
        let _ = v.get(-1).unwrap();
        let _ = v.contains(&2);
        let _ = v.count(&2);
        let _ = v.get_slice(..).unwrap();
        v.set(0, 10).unwrap();
        v.reserve(100);
        assert_eq!(generation(&v), 0);
    }

    #[test]
    fn structural_mutations_retire() {
        let mut v = vector(&[1, 2, 3]);
        v.push_back(4);
        v.pop_back().unwrap();
        v.insert(0, 0);
        v.pop(0).unwrap();
        v.remove(&2).unwrap();
        v.reverse();
        v.extend([7]);
        v.resize(2, 0);
        v.clear();
        assert_eq!(generation(&v), 9);
    }

    #[test]
    fn failed_and_empty_mutations_do_not_retire() {
        let mut v = vector(&[1, 2, 3]);
        assert_eq!(v.remove(&9), Err(Error::ValueNotFound));
        assert!(v.pop(5).is_err());
        v.extend(Vec::new());
        v.delete_slice(Slice::range(2, 1)).unwrap();
        v.set_slice(Slice::range(1, 1), Vec::new()).unwrap();
        assert_eq!(
            v.set_slice(Slice::full().with_step(2), vec![1]),
            Err(Error::SliceLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(generation(&v), 0);
        assert_eq!(v.to_state(), vec![1, 2, 3]);
    }

    thread_local! {
        static WATCHED: RefCell<Option<ConstIter<Padding>>> = RefCell::new(None);
        static CLONE_SAW_VALID: RefCell<Vec<bool>> = RefCell::new(Vec::new());
    }

    /// Records, on every clone, whether the watched cursor could still
    /// read its container.
    #[derive(Debug)]
    struct Padding;

    impl Clone for Padding {
        fn clone(&self) -> Self {
            let readable = WATCHED.with(|w| w.borrow().as_ref().map(|c| c.is_end().is_ok()));
            if let Some(readable) = readable {
                CLONE_SAW_VALID.with(|seen| seen.borrow_mut().push(readable));
            }
            Padding
        }
    }

    #[test]
    fn resize_clones_padding_before_retiring() {
        let mut v: Vector<Padding> = Vector::new();
        v.push_back(Padding);
        WATCHED.with(|w| *w.borrow_mut() = Some(v.cbegin()));
        v.resize(4, Padding);
        WATCHED.with(|w| *w.borrow_mut() = None);
        assert_eq!(v.len(), 4);
        let seen = CLONE_SAW_VALID.with(|seen| seen.borrow().clone());
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|readable| *readable));
    }

    #[test]
    fn resize_truncates_and_retires() {
        let mut v = vector(&[1, 2, 3, 4]);
        let c = v.cbegin();
        v.resize(2, 0);
        assert_eq!(v.to_state(), vec![1, 2]);
        assert!(!c.is_valid());
        v.resize(2, 9);
        assert_eq!(v.to_state(), vec![1, 2]);
        assert_eq!(generation(&v), 2);
    }

    #[test]
    fn iteration_detects_mutation() {
        let mut v = vector(&[1, 2, 3]);
        let mut it = v.iter();
        assert_eq!(it.next(), Some(Ok(1)));
        v.push_back(4);
        assert_eq!(it.next(), Some(Err(Error::InvalidatedHandle)));
        assert_eq!(it.next(), None);
        let all: Result<Vec<i32>> = v.iter().collect();
        assert_eq!(all, Ok(vec![1, 2, 3, 4]));
        let backwards: Result<Vec<i32>> = v.iter_rev().collect();
        assert_eq!(backwards, Ok(vec![4, 3, 2, 1]));
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut v = vector(&[1, 2, 3]);
        v.reserve(64);
        let capacity = v.capacity();
        assert!(capacity >= 64);
        v.reserve(1);
        assert_eq!(v.capacity(), capacity);
    }

    #[test]
    fn strided_delete_keeps_order() {
        let mut v = vector(&[0, 1, 2, 3, 4, 5, 6]);
        v.delete_slice(Slice::full().with_step(3)).unwrap();
        assert_eq!(v.to_state(), vec![1, 2, 4, 5]);

        let mut v = vector(&[0, 1, 2, 3, 4, 5, 6]);
        v.delete_slice(Slice::new(None, None, Some(-2))).unwrap();
        assert_eq!(v.to_state(), vec![1, 3, 5]);
    }

    #[test]
    fn reversed_contiguous_assignment() {
        let mut v = vector(&[0, 1, 2, 3, 4]);
        // Indices 3, 2, 1 receive 10, 20, 30, 40 in that order; the
        // extra value grows the vector.
        v.set_slice(Slice::new(Some(3), Some(0), Some(-1)), vec![10, 20, 30, 40])
            .unwrap();
        assert_eq!(v.to_state(), vec![0, 40, 30, 20, 10, 4]);

        let mut v = vector(&[0, 1, 2]);
        v.set_slice(Slice::new(Some(0), Some(2), Some(-1)), vec![8, 9])
            .unwrap();
        assert_eq!(v.to_state(), vec![0, 9, 8, 1, 2]);
    }

    #[test]
    fn debug_lists_elements() {
        assert_eq!(format!("{:?}", vector(&[1, 2])), "Vector(1, 2)");
        assert_eq!(format!("{:?}", vector(&[])), "Vector()");
    }
}
