//! Re-entrant rendering guard.
//!
//! A container whose elements (transitively) render the same container
//! would recurse forever in `Debug`. Rendering registers the storage
//! address in a thread-local set for the duration of the call; a nested
//! attempt to render the same address gets no guard and prints `...`.

use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;
use hashbrown::HashSet;

thread_local! {
    static RENDERING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// RAII guard returned by `ReprGuard::enter`.
pub(crate) struct ReprGuard {
    address: usize,
    // Thread-local bookkeeping; never leaves the thread.
    _nosend: PhantomData<*mut ()>,
}

impl ReprGuard {
    /// Mark `address` as being rendered; `None` if it already is.
    pub(crate) fn enter(address: usize) -> Option<Self> {
        let inserted = RENDERING.with(|set| set.borrow_mut().insert(address));
        inserted.then(|| ReprGuard {
            address,
            _nosend: PhantomData,
        })
    }
}

impl Drop for ReprGuard {
    fn drop(&mut self) {
        RENDERING.with(|set| {
            let removed = set.borrow_mut().remove(&self.address);
            debug_assert!(removed);
        });
    }
}

/// Write `name(e1, e2, ...)`, or `name(...)` when re-entered.
pub(crate) fn write_guarded<F>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    address: usize,
    entries: F,
) -> fmt::Result
where
    F: FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    f.write_str(name)?;
    f.write_str("(")?;
    match ReprGuard::enter(address) {
        Some(_guard) => entries(f)?,
        None => f.write_str("...")?,
    }
    f.write_str(")")
}

/// Write items separated by `, `.
pub(crate) fn write_list<'a, T, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    T: fmt::Debug + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item:?}")?;
    }
    Ok(())
}
