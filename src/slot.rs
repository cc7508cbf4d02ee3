//! Slot states of the open-addressed array.

/// One cell of the slot array.
///
/// A tombstone marks a removed entry so probe chains that ran through it
/// stay intact. It accepts a new entry but never matches a lookup.
#[derive(Clone, Debug)]
pub enum Slot<T> {
    Empty,
    Tombstone,
    Occupied { hash: u64, entry: T },
}

impl<T> Slot<T> {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    #[inline]
    pub fn entry(&self) -> Option<&T> {
        match self {
            Slot::Occupied { entry, .. } => Some(entry),
            _ => None,
        }
    }

    #[inline]
    pub fn entry_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Occupied { entry, .. } => Some(entry),
            _ => None,
        }
    }

    /// Take the live entry out, leaving a tombstone behind.
    pub fn bury(&mut self) -> Option<(u64, T)> {
        if !self.is_occupied() {
            return None;
        }
        match core::mem::replace(self, Slot::Tombstone) {
            Slot::Occupied { hash, entry } => Some((hash, entry)),
            _ => unreachable!("checked occupied above"),
        }
    }

    pub fn into_occupied(self) -> Option<(u64, T)> {
        match self {
            Slot::Occupied { hash, entry } => Some((hash, entry)),
            _ => None,
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Empty
    }
}
