//! SlotTable: the open-addressed slot array behind both adapters.
//!
//! The map stores `T = (K, V)` per slot, the set stores `T = K`. The table
//! never hashes or compares keys itself: callers pass the `u64` hash and an
//! equality predicate, the same split `hashbrown::HashTable` uses. Each
//! occupied slot keeps the hash it was inserted with, so a rebuild places
//! entries without calling user `Hash` code.
//!
//! Invariants
//! - `len` counts occupied slots, `tombstones` counts tombstoned slots.
//! - Before a new entry is written the resize policy leaves at least one
//!   free slot, so `len < capacity` holds after every insert and a probe
//!   always finds a match, an empty slot or a tombstone.
//! - The stamp is bumped once per structural mutation: new entry, overwrite,
//!   removal, clear, rebuild.

use crate::config::{TableConfig, MIN_GROWTH};
use crate::cursor::RawCursor;
use crate::error::{capacity_overflow, invariant_violated, ArgumentError, TableError};
use crate::probe::ProbeSeq;
use crate::reentrancy::DebugReentrancy;
use crate::slot::Slot;
use crate::stamp::{ChangeStamp, Snapshot, TableId};
use core::iter::FusedIterator;

/// Outcome of walking a probe sequence for one key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Probe {
    /// The key lives in this slot.
    Found(usize),
    /// The key is absent; this is the first usable slot on its chain.
    InsertAt(usize),
}

/// Point-in-time counters for a table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TableStats {
    pub capacity: usize,
    pub len: usize,
    pub tombstones: usize,
    /// Rebuilds since construction.
    pub resizes: u64,
    pub stamp: u64,
}

#[derive(Debug)]
pub struct SlotTable<T> {
    slots: Box<[Slot<T>]>,
    len: usize,
    tombstones: usize,
    load_factor: f64,
    stamp: ChangeStamp,
    resizes: u64,
    id: TableId,
    reentrancy: DebugReentrancy,
}

fn empty_slots<T>(n: usize) -> Box<[Slot<T>]> {
    (0..n).map(|_| Slot::Empty).collect()
}

fn max_slots<T>() -> usize {
    isize::MAX as usize / core::mem::size_of::<Slot<T>>().max(1)
}

impl<T> SlotTable<T> {
    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        let capacity = config.capacity();
        if capacity > max_slots::<T>() {
            return Err(ArgumentError::CapacityOverflow(capacity).into());
        }
        Ok(Self {
            slots: empty_slots(capacity),
            len: 0,
            tombstones: 0,
            load_factor: config.load_factor(),
            stamp: ChangeStamp::new(),
            resizes: 0,
            id: TableId::next(),
            reentrancy: DebugReentrancy::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }
    pub fn stamp(&self) -> u64 {
        self.stamp.get()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            capacity: self.slots.len(),
            len: self.len,
            tombstones: self.tombstones,
            resizes: self.resizes,
            stamp: self.stamp.get(),
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            table: self.id,
            stamp: self.stamp.get(),
        }
    }

    fn exhausted(&self) -> TableError {
        TableError::CapacityInvariantViolation {
            capacity: self.slots.len(),
            len: self.len,
        }
    }

    /// Walk the probe sequence for `hash`.
    ///
    /// Stops at the first occupied slot whose stored hash equals `hash` and
    /// whose entry satisfies `eq`, or at the first empty slot. The insertion
    /// point is the first tombstone passed on the way, else that empty slot.
    /// A full wrap with no match and no tombstone is an invariant violation.
    pub fn resolve<F>(&self, hash: u64, mut eq: F) -> Result<Probe, TableError>
    where
        F: FnMut(&T) -> bool,
    {
        let _g = self.reentrancy.enter();
        let mut first_tombstone = None;
        for i in ProbeSeq::new(hash, self.slots.len()) {
            match &self.slots[i] {
                Slot::Empty => return Ok(Probe::InsertAt(first_tombstone.unwrap_or(i))),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(i);
                }
                Slot::Occupied { hash: h, entry } => {
                    if *h == hash && eq(entry) {
                        return Ok(Probe::Found(i));
                    }
                }
            }
        }
        first_tombstone
            .map(Probe::InsertAt)
            .ok_or_else(|| self.exhausted())
    }

    /// Read-only lookup. Never mutates the table or its stamp.
    pub fn find<F>(&self, hash: u64, eq: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        if self.len == 0 {
            return None;
        }
        match self.resolve(hash, eq) {
            Ok(Probe::Found(i)) => Some(i),
            Ok(Probe::InsertAt(_)) => None,
            Err(e) => invariant_violated(e),
        }
    }

    pub fn entry(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.entry()
    }

    /// Mutable access to a live entry. Counts as a mutation: the stamp is
    /// bumped so cursors holding a view of this entry are invalidated.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut T> {
        let entry = self.slots.get_mut(index)?.entry_mut()?;
        self.stamp.bump();
        Some(entry)
    }

    pub(crate) fn entry_mut_untracked(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.entry_mut()
    }

    pub(crate) fn touch(&mut self) {
        self.stamp.bump();
    }

    /// Write a new entry into a free slot. The caller has already run the
    /// resize policy and resolved `index` as an insertion point.
    pub(crate) fn insert_at(&mut self, index: usize, hash: u64, entry: T) {
        let slot = &mut self.slots[index];
        debug_assert!(!slot.is_occupied(), "insert_at over a live entry");
        if slot.is_tombstone() {
            self.tombstones -= 1;
        }
        *slot = Slot::Occupied { hash, entry };
        self.len += 1;
        self.stamp.bump();
    }

    /// First non-occupied slot on the chain for `hash`. Only valid when the
    /// key is known to be absent.
    fn first_free(&self, hash: u64) -> Option<usize> {
        ProbeSeq::new(hash, self.slots.len()).find(|&i| !self.slots[i].is_occupied())
    }

    /// Insert an entry whose key `resolve` reported absent at `point`.
    ///
    /// Runs the resize policy first; a rebuild invalidates `point`, in which
    /// case the slot is found again in the new array. Returns the slot used.
    pub(crate) fn insert_new(
        &mut self,
        point: usize,
        hash: u64,
        entry: T,
    ) -> Result<usize, TableError> {
        let point = if self.reserve(1) {
            self.first_free(hash).ok_or_else(|| self.exhausted())?
        } else {
            point
        };
        self.insert_at(point, hash, entry);
        Ok(point)
    }

    /// Insert or overwrite.
    ///
    /// `eq(existing, &entry)` decides key equality. When the key is present
    /// `on_found(existing, entry)` performs the overwrite and its result is
    /// returned; the stamp is bumped either way.
    pub fn put_with<F, G, R>(
        &mut self,
        hash: u64,
        entry: T,
        mut eq: F,
        on_found: G,
    ) -> Result<Option<R>, TableError>
    where
        F: FnMut(&T, &T) -> bool,
        G: FnOnce(&mut T, T) -> R,
    {
        if self.slots.is_empty() {
            // Nothing to overwrite in a table without slots.
            self.reserve(1);
        }
        match self.resolve(hash, |e| eq(e, &entry))? {
            Probe::Found(i) => {
                let Slot::Occupied { entry: existing, .. } = &mut self.slots[i] else {
                    unreachable!("resolve reported a live slot at {i}");
                };
                let out = on_found(existing, entry);
                self.stamp.bump();
                Ok(Some(out))
            }
            Probe::InsertAt(point) => {
                self.insert_new(point, hash, entry)?;
                Ok(None)
            }
        }
    }

    /// Insert unless an equal entry is present, in which case `entry` is
    /// handed back and nothing changes.
    pub fn insert_absent<F>(
        &mut self,
        hash: u64,
        entry: T,
        mut eq: F,
    ) -> Result<Result<usize, T>, TableError>
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.slots.is_empty() {
            self.reserve(1);
        }
        match self.resolve(hash, |e| eq(e, &entry))? {
            Probe::Found(_) => Ok(Err(entry)),
            Probe::InsertAt(point) => self.insert_new(point, hash, entry).map(Ok),
        }
    }

    pub fn remove<F>(&mut self, hash: u64, eq: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let i = self.find(hash, eq)?;
        self.remove_at(i)
    }

    /// Tombstone the slot at `index` and return its entry.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        let (_, entry) = self.slots.get_mut(index)?.bury()?;
        self.len -= 1;
        self.tombstones += 1;
        self.stamp.bump();
        Some(entry)
    }

    /// Empty every slot; capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
        self.stamp.bump();
    }

    /// Tombstone every entry for which `keep` returns false.
    ///
    /// `keep` sees every entry mutably, so the call counts as one mutation
    /// whether or not anything is dropped.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.stamp.bump();
        for slot in self.slots.iter_mut() {
            let drop_it = match slot {
                Slot::Occupied { entry, .. } => !keep(entry),
                _ => false,
            };
            if drop_it {
                slot.bury();
                self.len -= 1;
                self.tombstones += 1;
            }
        }
    }

    fn fits(&self, capacity: usize, pending: usize) -> bool {
        if capacity <= self.len {
            return false;
        }
        let wanted = self.len.saturating_add(pending);
        // Fill fraction once the pending entries land:
        // 1 - (capacity - wanted) / capacity.
        (wanted as f64) / (capacity as f64) < self.load_factor
    }

    fn grown(&self, capacity: usize, pending: usize) -> usize {
        let scaled = (capacity as f64 * self.load_factor) as usize;
        let growth = pending.saturating_add(scaled).max(MIN_GROWTH);
        capacity
            .checked_add(growth)
            .filter(|&c| c <= max_slots::<T>())
            .unwrap_or_else(|| capacity_overflow())
    }

    /// Resize policy. Make room for `pending` more entries, rebuilding once
    /// if the fill fraction would reach the load factor. Returns whether a
    /// rebuild happened.
    pub fn reserve(&mut self, pending: usize) -> bool {
        if pending == 0 || self.fits(self.slots.len(), pending) {
            return false;
        }
        let mut capacity = self.slots.len();
        while !self.fits(capacity, pending) {
            capacity = self.grown(capacity, pending);
        }
        self.rebuild(capacity);
        true
    }

    /// Move every live entry into a fresh array of `capacity` slots. This is
    /// the only place tombstones disappear.
    fn rebuild(&mut self, capacity: usize) {
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.len = 0;
        self.tombstones = 0;
        for slot in old.into_vec() {
            let Some((hash, entry)) = slot.into_occupied() else {
                continue;
            };
            let i = self
                .first_free(hash)
                .unwrap_or_else(|| invariant_violated(self.exhausted()));
            self.slots[i] = Slot::Occupied { hash, entry };
            self.len += 1;
        }
        self.stamp.bump();
        self.resizes += 1;
        debug_assert!(self.check_invariants());
    }

    /// Recount the slot array against the tracked counters.
    pub fn check_invariants(&self) -> bool {
        let live = self.slots.iter().filter(|s| s.is_occupied()).count();
        let dead = self.slots.iter().filter(|s| s.is_tombstone()).count();
        live == self.len
            && dead == self.tombstones
            && (self.slots.is_empty() || self.len < self.slots.len())
    }

    pub(crate) fn next_occupied(&self, from: usize) -> Option<usize> {
        let tail = self.slots.get(from..)?;
        tail.iter().position(Slot::is_occupied).map(|i| from + i)
    }

    pub fn cursor(&self) -> RawCursor {
        RawCursor::new(self.snapshot())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Mutable iteration counts as one mutation of every entry.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.stamp.bump();
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }
}

impl<T: Clone> Clone for SlotTable<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            tombstones: self.tombstones,
            load_factor: self.load_factor,
            stamp: self.stamp,
            resizes: self.resizes,
            id: TableId::next(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

/// Live entries in slot order.
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

pub struct IterMut<'a, T> {
    slots: core::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        let entry = self.slots.by_ref().find_map(Slot::entry_mut)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator; consumes the table.
pub struct IntoIter<T> {
    slots: std::vec::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let (_, entry) = self.slots.by_ref().find_map(Slot::into_occupied)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for SlotTable<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            remaining: self.len,
            slots: self.slots.into_vec().into_iter(),
        }
    }
}
