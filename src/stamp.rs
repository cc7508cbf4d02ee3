//! Change stamps and table identity.
//!
//! A stamp is bumped once per structural mutation. Cursors remember the
//! `(TableId, stamp)` pair they were synchronized at and refuse to read
//! once either side has moved on.

use core::sync::atomic::{AtomicU64, Ordering};

/// Monotonic mutation counter owned by one table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeStamp {
    value: u64,
}

impl ChangeStamp {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.value
    }

    /// Record one structural mutation.
    #[inline]
    pub fn bump(&mut self) {
        // Stamps are only compared for equality; wrapping after 2^64
        // mutations cannot alias a snapshot still in use.
        self.value = self.value.wrapping_add(1);
    }
}

/// Process-unique identity of a table instance. Clones get a fresh id.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TableId(u64);

impl TableId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TableId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a cursor remembers about the table it walks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub(crate) table: TableId,
    pub(crate) stamp: u64,
}
