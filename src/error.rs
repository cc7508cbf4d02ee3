//! Error taxonomy shared by the slot table, its cursors and the adapters.

use crate::cursor::CursorState;
use thiserror::Error;

/// Errors reported by [`SlotTable`](crate::table::SlotTable) and the
/// map/set adapters built on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A construction parameter was rejected; nothing was built.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    /// The table changed structurally since the cursor last synchronized.
    #[error(
        "table was modified while a cursor was open (cursor stamp {expected}, table stamp {found})"
    )]
    ConcurrentMutation { expected: u64, found: u64 },

    /// A cursor accessor was called with no current entry.
    #[error("cursor has no current entry: {0}")]
    InvalidCursorState(CursorState),

    /// The probe visited every slot without a match or a usable slot.
    /// The resize policy guarantees this cannot happen; the table can no
    /// longer be trusted once it does.
    #[error("probe exhausted all {capacity} slots holding {len} live entries")]
    CapacityInvariantViolation { capacity: usize, len: usize },
}

/// Rejected construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ArgumentError {
    #[error("load factor must lie strictly between 0 and 1, got {0}")]
    LoadFactorOutOfRange(f64),

    #[error("capacity {0} exceeds the number of addressable slots")]
    CapacityOverflow(usize),
}

#[cold]
#[track_caller]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

#[cold]
#[track_caller]
pub(crate) fn invariant_violated(err: TableError) -> ! {
    panic!("slot table integrity lost: {err}")
}
