//! Liveness tokens.
//!
//! A `Tokenizer` owns the current epoch of a container. Every cursor
//! carries a `Token`, a weak reference to the epoch it was issued in.
//! Retiring the tokenizer drops that epoch, so all tokens issued before
//! the retirement report themselves expired. Tokens never keep an epoch
//! alive.

use core::marker::PhantomData;
use std::rc::{Rc, Weak};

#[derive(Debug)]
struct Epoch {
    generation: u64,
}

/// Owner of a container's current epoch.
#[derive(Debug)]
pub struct Tokenizer {
    epoch: Rc<Epoch>,
    // !Send + !Sync, matching the containers that embed it.
    _nosend: PhantomData<*mut ()>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            epoch: Rc::new(Epoch { generation: 0 }),
            _nosend: PhantomData,
        }
    }

    /// Invalidate every token issued so far and start a new epoch.
    #[inline]
    pub fn retire(&mut self) {
        let generation = self.epoch.generation + 1;
        // Replacing the only strong reference drops the old epoch.
        self.epoch = Rc::new(Epoch { generation });
        tracing::trace!(generation, "retired liveness epoch");
    }

    /// Issue a token valid until the next `retire`.
    #[inline]
    pub fn issue(&self) -> Token {
        Token {
            epoch: Rc::downgrade(&self.epoch),
        }
    }

    /// Number of epochs retired so far.
    pub fn generation(&self) -> u64 {
        self.epoch.generation
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak marker of the epoch a cursor was created in.
#[derive(Clone, Debug)]
pub struct Token {
    epoch: Weak<Epoch>,
}

impl Token {
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.epoch.strong_count() == 0
    }
}
