//! Error type shared by containers, cursors and the slice normalizer.

use core::fmt;
use thiserror::Error;

/// Which placeholder (end sentinel) operation was attempted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlaceholderAccess {
    Read,
    Write,
    Advance,
    PreIncrement,
    PostIncrement,
}

impl fmt::Display for PlaceholderAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaceholderAccess::Read => "Reading value",
            PlaceholderAccess::Write => "Setting value",
            PlaceholderAccess::Advance => "Advancing",
            PlaceholderAccess::PreIncrement => "Pre-incrementing",
            PlaceholderAccess::PostIncrement => "Post-incrementing",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The cursor's epoch was retired or its container dropped.
    #[error("Iterator is invalidated.")]
    InvalidatedHandle,

    #[error("{0} of placeholder iterators is undefined.")]
    PlaceholderDereference(PlaceholderAccess),

    /// `max` is inclusive; the message reports it as an exclusive bound.
    #[error(
        "Advancing of iterators out-of-bound is undefined: offset should be in range({min}, {}), but found {offset}.",
        .max + 1
    )]
    OutOfRangeAdvance { min: isize, max: isize, offset: isize },

    #[error("Comparing iterators from different collections is undefined.")]
    CrossContainerComparison,

    /// `index` is the caller-supplied index, before normalization.
    #[error("{}", describe_index(.index, .len))]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Slice step cannot be zero.")]
    ZeroStepSlice,

    #[error(
        "Attempt to assign sequence of size {actual} to extended slice of size {expected}."
    )]
    SliceLengthMismatch { expected: usize, actual: usize },

    #[error("Value is not found.")]
    ValueNotFound,

    #[error("Key is not found.")]
    KeyNotFound,

    #[error("{container} is empty.")]
    EmptyCollection { container: &'static str },
}

fn describe_index(index: &isize, len: &usize) -> String {
    if *len == 0 {
        "Sequence is empty.".to_string()
    } else {
        format!(
            "Index should be in range(-{len}, {len}), but found {index}."
        )
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
