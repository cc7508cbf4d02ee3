//! oa-hashmap: an open-addressing hash map and set with linear probing,
//! tombstone deletion and fail-fast cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one slot-table engine, reasoned about once, behind two thin
//!   adapters.
//! - Layers:
//!   - SlotTable<T>: the slot array, probe resolver, resize policy and
//!     change stamp. Takes precomputed `u64` hashes and equality closures;
//!     never hashes on its own.
//!   - RawCursor: detached, stamped scan over a SlotTable. Passed the
//!     table on every call, like a handle.
//!   - OaHashMap<K, V, S> / OaHashSet<T, S>: public API. The map stores
//!     `(K, V)` per slot, the set stores `T`.
//!
//! Constraints
//! - Single owner: tables are `Send` but `!Sync`.
//! - Load factor lies strictly between 0 and 1, so a probe always meets a
//!   match, an empty slot or a tombstone.
//! - Each occupied slot stores its hash; `K: Hash` is never invoked after
//!   insertion, including during rebuilds.
//!
//! Slot states
//! - `Empty` ends a probe. `Tombstone` keeps a probe chain alive after a
//!   removal and is reused by the next insert that passes it. Only a
//!   rebuild turns tombstones back into empty slots.
//!
//! Resize policy
//! - Before a new entry is written the table checks
//!   `(len + pending) / capacity` against the load factor and grows by
//!   `pending + floor(capacity * load_factor)` slots, at least
//!   `MIN_GROWTH`, until the batch fits. One rebuild, one stamp bump.
//! - `reserve(n)` and `Extend` pass the batch size as `pending`.
//!
//! Change stamp and cursors
//! - The stamp is bumped by every insert, overwrite, removal, clear and
//!   rebuild, and by handing out mutable views of entries (`get_mut`,
//!   `iter_mut`). Reads and absent removals leave it alone.
//! - A cursor records the table identity and stamp. Any call on a table
//!   that changed behind its back returns `TableError::ConcurrentMutation`.
//!   Its own `remove` and `value_mut` bump the stamp and resynchronize it.
//!
//! Reentrancy policy
//! - User `Eq` runs only inside `SlotTable::resolve`. A debug-only guard
//!   panics if that code reaches back into the same table.
//!
//! Notes and non-goals
//! - No thread safety, no iteration-order guarantee beyond slot order.
//! - `CapacityInvariantViolation` means the table can no longer be trusted;
//!   adapters panic on it rather than retry.

pub mod config;
pub mod cursor;
pub mod error;
pub mod map;
mod probe;
mod reentrancy;
pub mod set;
mod slot;
mod stamp;
pub mod table;
mod table_proptest;

// Public surface
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MIN_GROWTH};
pub use cursor::CursorState;
pub use error::{ArgumentError, TableError};
pub use map::{MapCursor, OaHashMap};
pub use set::{OaHashSet, SetCursor};
pub use table::TableStats;
