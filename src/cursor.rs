//! Cursors: weak, epoch-checked positions inside a container.
//!
//! A cursor stores a `Weak` reference to the container's storage, a
//! traversal position and the `Token` of the epoch it was created in. It
//! never keeps the storage alive. Every access re-resolves both weak
//! references, so a cursor outliving its container, or surviving a
//! structural mutation, reports `Error::InvalidatedHandle` instead of
//! reading a stale position.
//!
//! Positions count traversal steps from the cursor's own `begin`: for a
//! `Reverse` cursor position 0 is the last stored element. The end
//! sentinel sits at position `len`.
//!
//! A cursor is also an `Iterator` over `Result<T>`: it yields clones from
//! its position up to the sentinel. If the container is mutated or
//! dropped mid-way, the next call yields one `Err(InvalidatedHandle)` and
//! iteration ends there.

use crate::error::{Error, PlaceholderAccess, Result};
use crate::tokens::Token;
use core::cell::RefCell;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, Sub};
use std::rc::{Rc, Weak};

/// Shared ownership cell of a container's elements.
pub(crate) type Storage<T> = Rc<RefCell<Vec<T>>>;

mod sealed {
    pub trait Sealed {}
}

/// Traversal direction of a cursor.
pub trait Direction: sealed::Sealed {
    /// Storage index of the element at traversal `position` (`position < len`).
    fn raw_index(position: usize, len: usize) -> usize;
}

/// Front-to-back traversal.
#[derive(Debug)]
pub enum Forward {}

/// Back-to-front traversal.
#[derive(Debug)]
pub enum Reverse {}

impl sealed::Sealed for Forward {}
impl sealed::Sealed for Reverse {}

impl Direction for Forward {
    #[inline]
    fn raw_index(position: usize, _len: usize) -> usize {
        position
    }
}

impl Direction for Reverse {
    #[inline]
    fn raw_index(position: usize, len: usize) -> usize {
        len - 1 - position
    }
}

/// Whether a cursor may write through its position.
pub trait Access: sealed::Sealed {}

/// Read-only cursor.
#[derive(Debug)]
pub enum Const {}

/// Cursor that may overwrite the element it denotes.
#[derive(Debug)]
pub enum Mutable {}

impl sealed::Sealed for Const {}
impl sealed::Sealed for Mutable {}
impl Access for Const {}
impl Access for Mutable {}

pub struct Cursor<T, D = Forward, A = Const> {
    storage: Weak<RefCell<Vec<T>>>,
    position: usize,
    token: Token,
    // Set once iteration has reported an invalidation.
    exhausted: bool,
    _marker: PhantomData<fn() -> (D, A)>,
}

impl<T, D: Direction, A: Access> Cursor<T, D, A> {
    pub(crate) fn new(storage: &Storage<T>, position: usize, token: Token) -> Self {
        Self {
            storage: Rc::downgrade(storage),
            position,
            token,
            exhausted: false,
            _marker: PhantomData,
        }
    }

    fn with_position(&self, position: usize) -> Self {
        Self {
            storage: self.storage.clone(),
            position,
            token: self.token.clone(),
            exhausted: false,
            _marker: PhantomData,
        }
    }

    /// Traversal steps from `begin`. Does not validate the cursor.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True while the issuing epoch is current and the container alive.
    pub fn is_valid(&self) -> bool {
        !self.token.is_expired() && self.storage.strong_count() > 0
    }

    fn resolve(&self) -> Result<Storage<T>> {
        if self.token.is_expired() {
            return Err(Error::InvalidatedHandle);
        }
        self.storage.upgrade().ok_or(Error::InvalidatedHandle)
    }

    fn len(&self) -> Result<usize> {
        let storage = self.resolve()?;
        let len = storage
            .try_borrow()
            .map(|raw| raw.len())
            .map_err(|_| Error::InvalidatedHandle)?;
        Ok(len)
    }

    /// Whether the cursor sits on the end sentinel.
    pub fn is_end(&self) -> Result<bool> {
        Ok(self.position == self.len()?)
    }

    /// Run `f` on the denoted element.
    ///
    /// # Panics
    ///
    /// The storage stays borrowed while `f` runs; mutating the same
    /// container from inside `f` panics.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let storage = self.resolve()?;
        let raw = storage
            .try_borrow()
            .map_err(|_| Error::InvalidatedHandle)?;
        let len = raw.len();
        if self.position >= len {
            return Err(Error::PlaceholderDereference(PlaceholderAccess::Read));
        }
        let result = f(&raw[D::raw_index(self.position, len)]);
        Ok(result)
    }

    /// Clone of the denoted element.
    pub fn value(&self) -> Result<T>
    where
        T: Clone,
    {
        self.with_value(T::clone)
    }

    fn advanced_position(&self, offset: isize) -> Result<usize> {
        let len = self.len()? as isize;
        let position = self.position as isize;
        let (min, max) = (-position, len - position);
        if offset < min || offset > max {
            return Err(if position == len {
                Error::PlaceholderDereference(PlaceholderAccess::Advance)
            } else {
                Error::OutOfRangeAdvance { min, max, offset }
            });
        }
        Ok((position + offset) as usize)
    }

    /// A cursor `offset` steps away in this cursor's direction.
    pub fn advance(&self, offset: isize) -> Result<Self> {
        Ok(self.with_position(self.advanced_position(offset)?))
    }

    /// A cursor `offset` steps back against this cursor's direction.
    pub fn retreat(&self, offset: isize) -> Result<Self> {
        self.advance(offset.saturating_neg())
    }

    /// In-place `advance`; the cursor is unchanged on error.
    pub fn advance_by(&mut self, offset: isize) -> Result<()> {
        self.position = self.advanced_position(offset)?;
        Ok(())
    }

    /// In-place `retreat`; the cursor is unchanged on error.
    pub fn retreat_by(&mut self, offset: isize) -> Result<()> {
        self.advance_by(offset.saturating_neg())
    }

    /// Step forward by one (`++it`).
    pub fn increment(&mut self) -> Result<()> {
        if self.position == self.len()? {
            return Err(Error::PlaceholderDereference(
                PlaceholderAccess::PreIncrement,
            ));
        }
        self.position += 1;
        Ok(())
    }

    /// Step forward by one and return the previous position (`it++`).
    pub fn post_increment(&mut self) -> Result<Self> {
        if self.position == self.len()? {
            return Err(Error::PlaceholderDereference(
                PlaceholderAccess::PostIncrement,
            ));
        }
        let previous = self.clone();
        self.position += 1;
        Ok(previous)
    }

    fn check_comparable(&self, other: &Self) -> Result<()> {
        self.resolve()?;
        other.resolve()?;
        if Weak::ptr_eq(&self.storage, &other.storage) {
            Ok(())
        } else {
            Err(Error::CrossContainerComparison)
        }
    }

    /// Order of two cursors over the same container, in traversal order.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        self.check_comparable(other)?;
        Ok(self.position.cmp(&other.position))
    }

    pub fn try_eq(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }

    pub fn try_ne(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Equal)
    }

    pub fn try_lt(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn try_le(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Greater)
    }

    pub fn try_gt(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    pub fn try_ge(&self, other: &Self) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }

    /// Signed number of steps from `other` to `self`.
    pub fn offset_from(&self, other: &Self) -> Result<isize> {
        self.check_comparable(other)?;
        Ok(self.position as isize - other.position as isize)
    }
}

impl<T, D: Direction> Cursor<T, D, Mutable> {
    /// Overwrite the denoted element. Does not relocate storage, so other
    /// cursors stay valid.
    pub fn set_value(&self, value: T) -> Result<()> {
        let storage = self.resolve()?;
        let mut raw = storage
            .try_borrow_mut()
            .map_err(|_| Error::InvalidatedHandle)?;
        let len = raw.len();
        if self.position >= len {
            return Err(Error::PlaceholderDereference(PlaceholderAccess::Write));
        }
        let previous = core::mem::replace(&mut raw[D::raw_index(self.position, len)], value);
        // Run the old element's destructor with the storage released.
        drop(raw);
        drop(previous);
        Ok(())
    }

    /// Read-only view of the same position and epoch.
    pub fn to_const(&self) -> Cursor<T, D, Const> {
        Cursor {
            storage: self.storage.clone(),
            position: self.position,
            token: self.token.clone(),
            exhausted: self.exhausted,
            _marker: PhantomData,
        }
    }
}

impl<T, D, A> Clone for Cursor<T, D, A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            position: self.position,
            token: self.token.clone(),
            exhausted: self.exhausted,
            _marker: PhantomData,
        }
    }
}

impl<T, D, A> fmt::Debug for Cursor<T, D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("expired", &self.token.is_expired())
            .finish()
    }
}

impl<T: Clone, D: Direction, A: Access> Iterator for Cursor<T, D, A> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.exhausted {
            return None;
        }
        match self.value() {
            Ok(value) => {
                self.position += 1;
                Some(Ok(value))
            }
            Err(Error::PlaceholderDereference(_)) => None,
            Err(error) => {
                self.exhausted = true;
                Some(Err(error))
            }
        }
    }
}

impl<T, D: Direction, A: Access> Add<isize> for &Cursor<T, D, A> {
    type Output = Result<Cursor<T, D, A>>;

    fn add(self, offset: isize) -> Self::Output {
        self.advance(offset)
    }
}

impl<T, D: Direction, A: Access> Sub<isize> for &Cursor<T, D, A> {
    type Output = Result<Cursor<T, D, A>>;

    fn sub(self, offset: isize) -> Self::Output {
        self.retreat(offset)
    }
}

impl<T, D: Direction, A: Access> Add<isize> for Cursor<T, D, A> {
    type Output = Result<Cursor<T, D, A>>;

    fn add(self, offset: isize) -> Self::Output {
        self.advance(offset)
    }
}

impl<T, D: Direction, A: Access> Sub<isize> for Cursor<T, D, A> {
    type Output = Result<Cursor<T, D, A>>;

    fn sub(self, offset: isize) -> Self::Output {
        self.retreat(offset)
    }
}
