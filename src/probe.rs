//! Linear probe order over a table of `len` slots.

/// Slot where the probe for `hash` starts. `len` must be non-zero.
///
/// Hashes are unsigned, so the remainder is already in `[0, len)`.
#[inline]
pub fn start_slot(hash: u64, len: usize) -> usize {
    debug_assert!(len > 0, "probe over an empty slot array");
    (hash % len as u64) as usize
}

/// Indices `[start, len)` followed by `[0, start)`: every slot exactly once.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    len: usize,
    pos: usize,
    remaining: usize,
}

impl ProbeSeq {
    pub fn new(hash: u64, len: usize) -> Self {
        if len == 0 {
            return Self {
                len,
                pos: 0,
                remaining: 0,
            };
        }
        Self {
            len,
            pos: start_slot(hash, len),
            remaining: len,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.pos;
        self.remaining -= 1;
        self.pos += 1;
        if self.pos == self.len {
            self.pos = 0;
        }
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
impl core::iter::FusedIterator for ProbeSeq {}
