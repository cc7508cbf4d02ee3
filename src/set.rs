//! OaHashSet: the element adapter over `SlotTable<T>`.
//!
//! Same engine as the map with one element per slot and no value. Adding an
//! element that is already present leaves the table, including its stamp,
//! untouched; `replace` is the explicit overwrite.

use crate::config::TableConfig;
use crate::cursor::{CursorState, RawCursor};
use crate::error::{capacity_overflow, invariant_violated, TableError};
use crate::table::{self, SlotTable, TableStats};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_map::DefaultHashBuilder;

pub struct OaHashSet<T, S = DefaultHashBuilder> {
    hasher: S,
    table: SlotTable<T>,
}

impl<T> OaHashSet<T> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self, TableError> {
        Self::with_config(TableConfig::new(capacity, load_factor)?)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<T> Default for OaHashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> OaHashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(TableConfig::default().capacity(), hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let config = TableConfig::default().with_capacity(capacity);
        Self::with_config_and_hasher(config, hasher).unwrap_or_else(|_| capacity_overflow())
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, TableError> {
        Ok(Self {
            hasher,
            table: SlotTable::with_config(config)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }
    pub fn hasher(&self) -> &S {
        &self.hasher
    }
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.table.retain(|e| f(e))
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn cursor(&self) -> SetCursor {
        SetCursor {
            raw: self.table.cursor(),
        }
    }
}

impl<T, S> OaHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn find<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(value);
        self.table.find(hash, |e| value == e.borrow())
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(value).is_some()
    }

    /// The stored element equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(value)?;
        self.table.entry(i)
    }

    /// Add `value`. Returns `false`, and changes nothing, if an equal
    /// element is already present.
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hasher.hash_one(&value);
        self.table
            .insert_absent(hash, value, |a, b| a == b)
            .unwrap_or_else(|e| invariant_violated(e))
            .is_ok()
    }

    /// Add `value`, overwriting and returning an equal stored element.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hasher.hash_one(&value);
        self.table
            .put_with(hash, value, |a, b| a == b, core::mem::replace)
            .unwrap_or_else(|e| invariant_violated(e))
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(value).is_some()
    }

    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(value);
        self.table.remove(hash, |e| value == e.borrow())
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|v| !large.contains(v))
    }
}

/// Detached cursor over an [`OaHashSet`]; see [`crate::MapCursor`] for the
/// fail-fast rules.
#[derive(Copy, Clone, Debug)]
pub struct SetCursor {
    raw: RawCursor,
}

impl SetCursor {
    pub fn state(&self) -> CursorState {
        self.raw.state()
    }

    pub fn has_next<T, S>(&self, set: &OaHashSet<T, S>) -> Result<bool, TableError> {
        self.raw.has_next(&set.table)
    }

    pub fn advance<T, S>(&mut self, set: &OaHashSet<T, S>) -> Result<bool, TableError> {
        self.raw.advance(&set.table)
    }

    pub fn get<'s, T, S>(&self, set: &'s OaHashSet<T, S>) -> Result<&'s T, TableError> {
        self.raw.current(&set.table)
    }

    pub fn remove<T, S>(&mut self, set: &mut OaHashSet<T, S>) -> Result<T, TableError> {
        self.raw.remove_current(&mut set.table)
    }
}

pub struct Iter<'a, T> {
    inner: table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

pub struct IntoIter<T> {
    inner: table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T, S> IntoIterator for OaHashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a OaHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> Extend<T> for OaHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for v in iter {
            self.insert(v);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for OaHashSet<T, S>
where
    T: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T, S> FromIterator<T> for OaHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T: Clone, S: Clone> Clone for OaHashSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for OaHashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for OaHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T, S> Eq for OaHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut s = OaHashSet::new();
        assert!(s.insert("a"));
        assert!(!s.insert("a"));
        assert!(s.insert("b"));
        assert_eq!(s.len(), 2);
        assert!(s.contains("a"));
        assert!(!s.contains("z"));
    }

    /// Invariant: adding an element that is already present is not a
    /// mutation; open cursors survive it.
    #[test]
    fn duplicate_insert_does_not_invalidate_cursors() {
        let mut s: OaHashSet<u32> = (0..5).collect();
        let stamp = s.stats().stamp;
        let mut c = s.cursor();
        assert!(!s.insert(3));
        assert_eq!(s.stats().stamp, stamp);
        assert!(c.advance(&s).unwrap());
    }

    /// Invariant: `replace` overwrites the stored element and counts as a
    /// mutation.
    #[test]
    fn replace_overwrites_equal_element() {
        #[derive(Debug, Clone)]
        struct Tagged(u32, &'static str);
        impl PartialEq for Tagged {
            fn eq(&self, o: &Self) -> bool {
                self.0 == o.0
            }
        }
        impl Eq for Tagged {}
        impl Hash for Tagged {
            fn hash<H: core::hash::Hasher>(&self, h: &mut H) {
                self.0.hash(h)
            }
        }

        let mut s = OaHashSet::new();
        assert!(s.replace(Tagged(1, "old")).is_none());
        let stamp = s.stats().stamp;
        let prev = s.replace(Tagged(1, "new")).unwrap();
        assert_eq!(prev.1, "old");
        assert_eq!(s.get(&Tagged(1, "")).unwrap().1, "new");
        assert_eq!(s.stats().stamp, stamp + 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_and_take() {
        let mut s: OaHashSet<String> = ["x", "y"].iter().map(|v| v.to_string()).collect();
        assert!(s.remove("x"));
        assert!(!s.remove("x"));
        assert_eq!(s.take("y"), Some("y".to_string()));
        assert!(s.is_empty());
        assert_eq!(s.stats().tombstones, 2);
    }

    /// Invariant: an element that shares its slot chain with a removed one
    /// is still found after the removal.
    #[test]
    fn lookups_cross_tombstones() {
        let mut s: OaHashSet<u32> = OaHashSet::with_capacity(8);
        s.extend(0..5);
        for v in 0..5 {
            if v % 2 == 0 {
                assert!(s.remove(&v));
            }
        }
        for v in 0..5 {
            assert_eq!(s.contains(&v), v % 2 == 1);
        }
    }

    #[test]
    fn cursor_drains_the_set() {
        let mut s: OaHashSet<u32> = (0..20).collect();
        let mut c = s.cursor();
        let mut count = 0;
        while c.advance(&s).unwrap() {
            assert!(*c.get(&s).unwrap() < 20);
            c.remove(&mut s).unwrap();
            count += 1;
        }
        assert_eq!(count, 20);
        assert!(s.is_empty());
    }

    #[test]
    fn equality_subset_disjoint() {
        let a: OaHashSet<u32> = (0..10).collect();
        let b: OaHashSet<u32> = (0..10).rev().collect();
        let c: OaHashSet<u32> = (0..5).collect();
        let d: OaHashSet<u32> = (100..105).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(c.is_subset(&a));
        assert!(!a.is_subset(&c));
        assert!(a.is_disjoint(&d));
        assert!(!a.is_disjoint(&c));
    }

    #[test]
    fn retain_clone_debug() {
        let mut s: OaHashSet<u32> = (0..10).collect();
        s.retain(|v| *v < 2);
        let mut all: Vec<u32> = s.iter().copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1]);

        let single: OaHashSet<u32> = std::iter::once(7).collect();
        assert_eq!(format!("{single:?}"), "{7}");
        let mut copy = single.clone();
        copy.insert(8);
        assert_eq!(single.len(), 1);
        assert_eq!(copy.into_iter().count(), 2);
    }

    #[test]
    fn extend_from_borrowed_elements() {
        let src = [1u8, 2, 3, 2];
        let mut s: OaHashSet<u8> = OaHashSet::new();
        s.extend(src.iter());
        assert_eq!(s.len(), 3);
    }
}
