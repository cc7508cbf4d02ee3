//! Debug-only guard against reentering a table while it probes.
//!
//! Probing is the one place the table calls user code (`K: Eq`) in the
//! middle of an operation. A key whose `eq` reaches back into the same
//! table through a raw pointer would observe a half-finished probe. In debug
//! builds such nesting panics; in release builds the guard is a no-op.
//!
//! The `Cell` makes every table `!Sync`, matching the single-owner model.
//! Tables stay `Send`: moving one to another thread hands over ownership.

use core::cell::Cell;

#[derive(Debug, Default)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    #[cfg(not(debug_assertions))]
    _unsync: core::marker::PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            #[cfg(not(debug_assertions))]
            _unsync: core::marker::PhantomData,
        }
    }

    /// Mark the table busy until the returned guard drops.
    #[inline]
    #[track_caller]
    pub fn enter(&self) -> ProbeGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrancy detected: table accessed from inside a key comparison"
            );
            return ProbeGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ProbeGuard {
                _owner: core::marker::PhantomData,
            };
        }
    }
}

impl Clone for DebugReentrancy {
    // A clone is a different table; it starts idle.
    fn clone(&self) -> Self {
        Self::new()
    }
}

pub struct ProbeGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: core::marker::PhantomData<&'a ()>,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}
