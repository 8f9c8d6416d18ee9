//! epoch-collections: single-threaded containers whose cursors detect
//! structural invalidation instead of reading stale positions.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: make it impossible to observe undefined behavior through a
//!   cursor, even when the container was mutated or dropped after the
//!   cursor was created.
//! - Layers:
//!   - Tokenizer/Token (`tokens`): one `Rc<Epoch>` per container; cursors
//!     hold a `Weak` to it. Retiring the epoch replaces the `Rc`, so every
//!     outstanding token expires in O(1) regardless of how many exist.
//!   - Cursor (`cursor`): a `Weak` to the container storage, a traversal
//!     position and a token. One generic type covers forward/reverse and
//!     const/mutable variants through marker parameters.
//!   - Containers: `Vector` (Python-style indexing and slicing),
//!     `OrderedSet` (sorted unique elements with set algebra) and
//!     `OrderedMap` (sorted unique keys). Each owns its storage and its
//!     tokenizer.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync`; no atomics.
//! - Every operation that can relocate or reorder elements retires the
//!   container's epoch before the cursor could observe the new layout.
//!   In-place overwrites (`Vector::set`, `Cursor::set_value`) do not.
//! - Failed operations leave both the contents and the epoch untouched.
//! - Cursors never keep storage alive; outliving the container yields
//!   `Error::InvalidatedHandle`.
//!
//! Reentrancy policy
//! - User code (`Clone`, `Ord`, `PartialEq`, `Debug`, `Drop`) only runs
//!   under shared borrows of the storage, or after a mutable borrow has
//!   been released. Removed elements are dropped last.
//! - A cursor that finds the storage mutably borrowed reports
//!   `Error::InvalidatedHandle`; `Cursor::with_value` documents the one
//!   case that panics instead.
//! - `Debug` output guards against containers that (transitively) contain
//!   themselves and prints `...` for the nested occurrence.
//!
//! Error model
//! - All fallible operations return `Result<_, Error>`; nothing panics on
//!   bad indices, empty containers or invalidated cursors.
//!
//! Notes and non-goals
//! - No thread safety and no concurrent-modification detection across
//!   threads.
//! - Cursors of an `OrderedSet`/`OrderedMap` are read-only; keys never
//!   change in place.
//! - Cursor comparison is fallible (`try_eq`, `try_cmp`, ...) rather than
//!   `PartialEq`/`PartialOrd`, because comparing cursors of different
//!   containers is an error, not `false`.

mod cursor;
mod error;
pub mod ordered_map;
pub mod ordered_set;
mod repr;
#[cfg(feature = "serde")]
mod serde_support;
mod slice;
pub mod tokens;
pub mod vector;

// Public surface
pub use cursor::{Access, Const, Cursor, Direction, Forward, Mutable, Reverse};
pub use error::{Error, PlaceholderAccess, Result};
pub use ordered_map::OrderedMap;
pub use ordered_set::OrderedSet;
pub use slice::{clamp_insertion_index, normalize_index, Slice, SliceBounds};
pub use tokens::{Token, Tokenizer};
pub use vector::Vector;
