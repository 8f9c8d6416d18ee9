//! Index and slice normalization with Python sequence semantics.

use crate::error::{Error, Result};

/// Map a possibly negative index onto `[0, len)`.
///
/// Errors report the index as supplied by the caller.
pub fn normalize_index(index: isize, len: usize) -> Result<usize> {
    let size = len as isize;
    let normalized = if index >= 0 { index } else { index + size };
    if normalized < 0 || normalized >= size {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(normalized as usize)
}

/// Map a possibly negative insertion point onto `[0, len]`, clamping the
/// way `list.insert` does.
pub fn clamp_insertion_index(index: isize, len: usize) -> usize {
    let size = len as isize;
    let normalized = if index >= 0 { index } else { index + size };
    normalized.clamp(0, size) as usize
}

/// A `start:stop:step` descriptor; `None` fields take their defaults.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `::`
    pub fn full() -> Self {
        Self::default()
    }

    pub fn with_step(self, step: isize) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }

    /// Resolve against a sequence of `len` elements.
    pub fn indices(&self, len: usize) -> Result<SliceBounds> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::ZeroStepSlice);
        }
        let size = len as isize;
        let (lower, upper) = if step < 0 { (-1, size - 1) } else { (0, size) };
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + size).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = match self.start {
            Some(bound) => clamp(bound),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match self.stop {
            Some(bound) => clamp(bound),
            None if step < 0 => lower,
            None => upper,
        };
        // Unsigned arithmetic: `-isize::MIN` does not fit in `isize`.
        let nonempty = (step > 0 && start < stop) || (step < 0 && stop < start);
        let count = if nonempty {
            (start.abs_diff(stop) - 1) / step.unsigned_abs() + 1
        } else {
            0
        };
        Ok(SliceBounds {
            start,
            stop,
            step,
            count,
        })
    }
}

impl From<core::ops::Range<isize>> for Slice {
    fn from(r: core::ops::Range<isize>) -> Self {
        Slice::range(r.start, r.end)
    }
}

impl From<core::ops::RangeFull> for Slice {
    fn from(_: core::ops::RangeFull) -> Self {
        Slice::full()
    }
}

impl From<core::ops::RangeFrom<isize>> for Slice {
    fn from(r: core::ops::RangeFrom<isize>) -> Self {
        Slice::new(Some(r.start), None, None)
    }
}

impl From<core::ops::RangeTo<isize>> for Slice {
    fn from(r: core::ops::RangeTo<isize>) -> Self {
        Slice::new(None, Some(r.end), None)
    }
}

/// Canonical bounds of a slice.
///
/// For positive steps `start`/`stop` lie in `[0, len]`; for negative steps
/// in `[-1, len - 1]`, where `-1` stands for "before the first element".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SliceBounds {
    pub start: isize,
    pub stop: isize,
    pub step: isize,
    pub count: usize,
}

impl SliceBounds {
    pub fn is_contiguous(&self) -> bool {
        self.step == 1 || self.step == -1
    }

    /// Addressed indices, in slice order.
    pub fn positions(&self) -> impl Iterator<Item = usize> {
        let SliceBounds {
            start, step, count, ..
        } = *self;
        (0..count).map(move |i| (start + i as isize * step) as usize)
    }

    /// The half-open range of storage touched by a contiguous slice.
    ///
    /// An empty negative-step slice yields the empty range just after
    /// `start`.
    pub(crate) fn contiguous_range(&self) -> core::ops::Range<usize> {
        debug_assert!(self.is_contiguous());
        if self.step > 0 {
            let start = self.start as usize;
            start..start + self.count
        } else {
            let end = (self.start + 1) as usize;
            end - self.count..end
        }
    }
}
