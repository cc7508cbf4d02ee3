//! RawCursor: a detached, fail-fast scan over a `SlotTable`.
//!
//! A cursor does not borrow the table; like a handle it is passed the table
//! on every call. In exchange it checks on every call that the table is the
//! one it was created from and that no mutation happened behind its back.
//! Its own `remove_current` and `current_mut` are the sanctioned mutation
//! paths: they bump the table stamp and re-synchronize the cursor.

use crate::error::TableError;
use crate::stamp::Snapshot;
use crate::table::SlotTable;
use core::fmt;

/// Where a cursor stands in its scan.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CursorState {
    NotStarted,
    /// Positioned on the live slot at this index.
    At(usize),
    /// The entry at this index was removed through the cursor.
    Removed(usize),
    Exhausted,
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorState::NotStarted => f.write_str("cursor has not been advanced"),
            CursorState::At(i) => write!(f, "cursor is on slot {i}"),
            CursorState::Removed(i) => write!(f, "entry at slot {i} was already removed"),
            CursorState::Exhausted => f.write_str("cursor is exhausted"),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct RawCursor {
    snapshot: Snapshot,
    state: CursorState,
}

impl RawCursor {
    pub(crate) fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            state: CursorState::NotStarted,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    fn check<T>(&self, table: &SlotTable<T>) -> Result<(), TableError> {
        let live = table.snapshot();
        if live == self.snapshot {
            Ok(())
        } else {
            Err(TableError::ConcurrentMutation {
                expected: self.snapshot.stamp,
                found: live.stamp,
            })
        }
    }

    fn scan_from(&self) -> Option<usize> {
        match self.state {
            CursorState::NotStarted => Some(0),
            CursorState::At(i) | CursorState::Removed(i) => Some(i + 1),
            CursorState::Exhausted => None,
        }
    }

    fn position(&self) -> Result<usize, TableError> {
        match self.state {
            CursorState::At(i) => Ok(i),
            other => Err(TableError::InvalidCursorState(other)),
        }
    }

    /// Whether `advance` would land on another entry.
    pub fn has_next<T>(&self, table: &SlotTable<T>) -> Result<bool, TableError> {
        self.check(table)?;
        Ok(self
            .scan_from()
            .and_then(|from| table.next_occupied(from))
            .is_some())
    }

    /// Move to the next live slot. Returns `false` once the scan is exhausted.
    pub fn advance<T>(&mut self, table: &SlotTable<T>) -> Result<bool, TableError> {
        self.check(table)?;
        self.state = match self.scan_from().and_then(|from| table.next_occupied(from)) {
            Some(i) => CursorState::At(i),
            None => CursorState::Exhausted,
        };
        Ok(matches!(self.state, CursorState::At(_)))
    }

    pub fn current<'t, T>(&self, table: &'t SlotTable<T>) -> Result<&'t T, TableError> {
        self.check(table)?;
        let i = self.position()?;
        table
            .entry(i)
            .ok_or(TableError::InvalidCursorState(self.state))
    }

    /// Mutable view of the current entry. Bumps the table stamp, which
    /// invalidates every other cursor, and keeps this one in sync.
    pub fn current_mut<'t, T>(
        &mut self,
        table: &'t mut SlotTable<T>,
    ) -> Result<&'t mut T, TableError> {
        self.check(table)?;
        let i = self.position()?;
        if table.entry(i).is_none() {
            return Err(TableError::InvalidCursorState(self.state));
        }
        table.touch();
        self.snapshot = table.snapshot();
        table
            .entry_mut_untracked(i)
            .ok_or(TableError::InvalidCursorState(self.state))
    }

    /// Tombstone the current entry and return it. The cursor stays usable:
    /// the next `advance` continues after the removed slot.
    pub fn remove_current<T>(&mut self, table: &mut SlotTable<T>) -> Result<T, TableError> {
        self.check(table)?;
        let i = self.position()?;
        let entry = table
            .remove_at(i)
            .ok_or(TableError::InvalidCursorState(self.state))?;
        self.snapshot = table.snapshot();
        self.state = CursorState::Removed(i);
        Ok(entry)
    }
}
