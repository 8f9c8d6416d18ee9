//! OrderedSet: unique elements kept in ascending order, with the set
//! algebra and read-only epoch-checked cursors.
//!
//! Elements live in a sorted `Vec`, so membership is a binary search and
//! a cursor position maps directly onto a storage index. Binary set
//! operations are linear merges of the two sorted sequences.

use crate::cursor::{Const, Cursor, Forward, Reverse, Storage};
use crate::error::{Error, Result};
use crate::repr;
use crate::tokens::Tokenizer;
use core::cell::{Ref, RefCell, RefMut};
use core::cmp::Ordering;
use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};
use std::rc::Rc;

pub type Iter<T> = Cursor<T, Forward, Const>;
pub type ReverseIter<T> = Cursor<T, Reverse, Const>;

/// Which parts of a two-way merge survive.
#[derive(Copy, Clone)]
struct Keep {
    left_only: bool,
    both: bool,
    right_only: bool,
}

const UNION: Keep = Keep {
    left_only: true,
    both: true,
    right_only: true,
};
const INTERSECTION: Keep = Keep {
    left_only: false,
    both: true,
    right_only: false,
};
const DIFFERENCE: Keep = Keep {
    left_only: true,
    both: false,
    right_only: false,
};
const SYMMETRIC_DIFFERENCE: Keep = Keep {
    left_only: true,
    both: false,
    right_only: true,
};

fn combine<T: Ord + Clone>(left: &[T], right: &[T], keep: Keep) -> Vec<T> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => {
                if keep.left_only {
                    result.push(left[i].clone());
                }
                i += 1;
            }
            Ordering::Greater => {
                if keep.right_only {
                    result.push(right[j].clone());
                }
                j += 1;
            }
            Ordering::Equal => {
                if keep.both {
                    result.push(left[i].clone());
                }
                i += 1;
                j += 1;
            }
        }
    }
    if keep.left_only {
        result.extend_from_slice(&left[i..]);
    }
    if keep.right_only {
        result.extend_from_slice(&right[j..]);
    }
    result
}

/// One element of an in-place merge result.
enum Merged<T> {
    /// Element `index` of the set being updated, moved over.
    Kept(usize),
    /// Clone taken from the other set.
    Added(T),
}

/// Like `combine`, but only clones what comes from `right`.
fn merge_plan<T: Ord + Clone>(left: &[T], right: &[T], keep: Keep) -> Vec<Merged<T>> {
    let mut plan = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => {
                if keep.left_only {
                    plan.push(Merged::Kept(i));
                }
                i += 1;
            }
            Ordering::Greater => {
                if keep.right_only {
                    plan.push(Merged::Added(right[j].clone()));
                }
                j += 1;
            }
            Ordering::Equal => {
                if keep.both {
                    plan.push(Merged::Kept(i));
                }
                i += 1;
                j += 1;
            }
        }
    }
    if keep.left_only {
        plan.extend((i..left.len()).map(Merged::Kept));
    }
    if keep.right_only {
        plan.extend(right[j..].iter().cloned().map(Merged::Added));
    }
    plan
}

pub struct OrderedSet<T> {
    storage: Storage<T>,
    tokenizer: Tokenizer,
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self::from_sorted(Vec::new())
    }

    fn from_sorted(raw: Vec<T>) -> Self {
        Self {
            storage: Rc::new(RefCell::new(raw)),
            tokenizer: Tokenizer::new(),
        }
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

    /// Borrowed view of the elements in ascending order.
    pub fn as_slice(&self) -> Ref<'_, [T]> {
        Ref::map(self.raw(), |raw| raw.as_slice())
    }

    /// Elements in ascending order.
    pub fn to_state(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.raw().clone()
    }

    pub fn clear(&mut self) {
        self.tokenizer.retire();
        let previous = core::mem::take(&mut *self.raw_mut());
        drop(previous);
    }

    fn empty_error() -> Error {
        Error::EmptyCollection {
            container: "OrderedSet",
        }
    }

    pub fn min(&self) -> Result<T>
    where
        T: Clone,
    {
        self.raw().first().cloned().ok_or_else(Self::empty_error)
    }

    pub fn max(&self) -> Result<T>
    where
        T: Clone,
    {
        self.raw().last().cloned().ok_or_else(Self::empty_error)
    }

    /// Remove and return the smallest element.
    pub fn pop(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Self::empty_error());
        }
        self.tokenizer.retire();
        let value = self.raw_mut().remove(0);
        Ok(value)
    }

    pub fn begin(&self) -> Iter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn end(&self) -> Iter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn rbegin(&self) -> ReverseIter<T> {
        Cursor::new(&self.storage, 0, self.tokenizer.issue())
    }

    pub fn rend(&self) -> ReverseIter<T> {
        Cursor::new(&self.storage, self.len(), self.tokenizer.issue())
    }

    pub fn cbegin(&self) -> Iter<T> {
        self.begin()
    }

    pub fn cend(&self) -> Iter<T> {
        self.end()
    }

    pub fn crbegin(&self) -> ReverseIter<T> {
        self.rbegin()
    }

    pub fn crend(&self) -> ReverseIter<T> {
        self.rend()
    }

    /// Ascending clones of the elements.
    pub fn iter(&self) -> Iter<T> {
        self.begin()
    }

    /// Descending clones of the elements.
    pub fn iter_rev(&self) -> ReverseIter<T> {
        self.rbegin()
    }
}

impl<T: Ord> OrderedSet<T> {
    /// Rebuild from a state sequence; later duplicates are ignored, as if
    /// each element had been added in turn.
    pub fn from_state<I: IntoIterator<Item = T>>(state: I) -> Self {
        state.into_iter().collect()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.raw().binary_search(value).is_ok()
    }

    /// Insert `value` unless an equal element is present. Cursors are
    /// invalidated only when the set actually grows.
    pub fn add(&mut self, value: T) -> bool {
        let found = self.raw().binary_search(&value);
        match found {
            Ok(_) => false,
            Err(index) => {
                self.tokenizer.retire();
                self.raw_mut().insert(index, value);
                true
            }
        }
    }

    /// Remove `value` if present; returns whether it was.
    pub fn discard(&mut self, value: &T) -> bool {
        self.remove(value).is_ok()
    }

    pub fn remove(&mut self, value: &T) -> Result<T> {
        let found = self.raw().binary_search(value);
        let index = found.map_err(|_| Error::ValueNotFound)?;
        self.tokenizer.retire();
        let removed = self.raw_mut().remove(index);
        Ok(removed)
    }

    /// Scans the smaller set and searches the larger one.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (left, right) = (self.raw(), other.raw());
        let (small, large) = if left.len() <= right.len() {
            (&left, &right)
        } else {
            (&right, &left)
        };
        small.iter().all(|value| large.binary_search(value).is_err())
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        let (left, right) = (self.raw(), other.raw());
        left.len() <= right.len() && left.iter().all(|value| right.binary_search(value).is_ok())
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    fn combined(&self, other: &Self, keep: Keep) -> Vec<T>
    where
        T: Clone,
    {
        combine(&self.raw(), &other.raw(), keep)
    }

    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self::from_sorted(self.combined(other, UNION))
    }

    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self::from_sorted(self.combined(other, INTERSECTION))
    }

    pub fn difference(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self::from_sorted(self.combined(other, DIFFERENCE))
    }

    pub fn symmetric_difference(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        Self::from_sorted(self.combined(other, SYMMETRIC_DIFFERENCE))
    }

    /// Comparisons and clones run against the untouched storage; the
    /// epoch is retired only if membership changes.
    fn update_with(&mut self, other: &Self, keep: Keep)
    where
        T: Clone,
    {
        let plan = merge_plan(&self.raw(), &other.raw(), keep);
        let kept = plan
            .iter()
            .filter(|step| matches!(step, Merged::Kept(_)))
            .count();
        if kept == self.len() && kept == plan.len() {
            return;
        }
        self.tokenizer.retire();
        let previous = core::mem::take(&mut *self.raw_mut());
        let mut previous = previous.into_iter().enumerate();
        let mut merged = Vec::with_capacity(plan.len());
        let mut removed = Vec::new();
        for step in plan {
            match step {
                Merged::Added(value) => merged.push(value),
                Merged::Kept(index) => {
                    for (position, value) in previous.by_ref() {
                        if position == index {
                            merged.push(value);
                            break;
                        }
                        removed.push(value);
                    }
                }
            }
        }
        removed.extend(previous.map(|(_, value)| value));
        *self.raw_mut() = merged;
        drop(removed);
    }

    pub fn union_update(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.update_with(other, UNION);
    }

    pub fn intersection_update(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.update_with(other, INTERSECTION);
    }

    pub fn difference_update(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.update_with(other, DIFFERENCE);
    }

    pub fn symmetric_difference_update(&mut self, other: &Self)
    where
        T: Clone,
    {
        self.update_with(other, SYMMETRIC_DIFFERENCE);
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for OrderedSet<T> {
    /// Deep copy with its own storage and epoch.
    fn clone(&self) -> Self {
        Self::from_sorted(self.raw().clone())
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut raw: Vec<T> = iter.into_iter().collect();
        // Stable sort keeps the first of equal elements in front.
        raw.sort();
        raw.dedup();
        Self::from_sorted(raw)
    }
}

impl<T: Clone> IntoIterator for &OrderedSet<T> {
    type Item = Result<T>;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.raw() == *other.raw()
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

/// Inclusion order: `a < b` is a proper subset, `a <= b` a subset.
/// Sets where neither contains the other are unordered.
impl<T: Ord> PartialOrd for OrderedSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.len().cmp(&other.len()) {
            Ordering::Less => self.is_subset(other).then_some(Ordering::Less),
            Ordering::Greater => other.is_subset(self).then_some(Ordering::Greater),
            Ordering::Equal => (self == other).then_some(Ordering::Equal),
        }
    }
}

macro_rules! set_operator {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $set:ident, $update:ident) => {
        impl<'a, T: Ord + Clone> $op<&'a OrderedSet<T>> for &OrderedSet<T> {
            type Output = OrderedSet<T>;

            fn $method(self, other: &'a OrderedSet<T>) -> OrderedSet<T> {
                self.$set(other)
            }
        }

        impl<'a, T: Ord + Clone> $assign_op<&'a OrderedSet<T>> for OrderedSet<T> {
            fn $assign_method(&mut self, other: &'a OrderedSet<T>) {
                self.$update(other)
            }
        }
    };
}

set_operator!(BitOr, bitor, BitOrAssign, bitor_assign, union, union_update);
set_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection, intersection_update);
set_operator!(Sub, sub, SubAssign, sub_assign, difference, difference_update);
set_operator!(
    BitXor,
    bitxor,
    BitXorAssign,
    bitxor_assign,
    symmetric_difference,
    symmetric_difference_update
);

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = Rc::as_ptr(&self.storage) as *const () as usize;
        repr::write_guarded(f, "OrderedSet", address, |f| {
            repr::write_list(f, self.raw().iter())
        })
    }
}
