//! OaHashMap: the key → value adapter over `SlotTable<(K, V)>`.
//!
//! Key and value share one slot and are written, overwritten and cleared
//! together. All probing, growth and stamping happens in the table; this
//! layer only hashes keys and translates between `(K, V)` and std-style
//! map calls.

use crate::config::TableConfig;
use crate::cursor::{CursorState, RawCursor};
use crate::error::{capacity_overflow, invariant_violated, TableError};
use crate::table::{self, SlotTable, TableStats};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;

pub struct OaHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: SlotTable<(K, V)>,
}

impl<K, V> OaHashMap<K, V> {
    /// Empty map with 16 slots and a 0.70 load factor.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// # Panics
    /// If `capacity` slots could not be addressed.
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

impl<K, V> Default for OaHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OaHashMap<K, V, S> {
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
    /// Number of slots, live or not.
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

    /// Remove every entry, keeping the slot array.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Grow once, if needed, so `additional` more entries fit under the
    /// load factor.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Remove every entry for which `f` returns false.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|e| f(&e.0, &mut e.1))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Mutable iteration invalidates open cursors.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// A fail-fast cursor positioned before the first entry.
    pub fn cursor(&self) -> MapCursor {
        MapCursor {
            raw: self.table.cursor(),
        }
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.iter().any(|(_, v)| v == value)
    }
}

impl<K, V, S> OaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find<Q>(&self, k: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(k);
        self.table.find(hash, |e| k == e.0.borrow())
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(k).is_some()
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(k).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(k)?;
        self.table.entry(i).map(|(k, v)| (k, v))
    }

    /// Mutable access to a value. Counts as an overwrite: open cursors are
    /// invalidated.
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.find(k)?;
        self.table.entry_mut(i).map(|(_, v)| v)
    }

    /// Insert or overwrite. On overwrite the stored key is kept, the value
    /// is replaced and the previous value returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        self.table
            .put_with(
                hash,
                (key, value),
                |a, b| a.0 == b.0,
                |slot, (_, v)| core::mem::replace(&mut slot.1, v),
            )
            .unwrap_or_else(|e| invariant_violated(e))
    }

    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(k);
        self.table.remove(hash, |e| k == e.0.borrow())
    }
}

/// Detached cursor over an [`OaHashMap`].
///
/// Every call takes the map and fails with
/// [`TableError::ConcurrentMutation`] if the map changed through anything
/// but this cursor since it was created or last mutated through.
#[derive(Copy, Clone, Debug)]
pub struct MapCursor {
    raw: RawCursor,
}

impl MapCursor {
    pub fn state(&self) -> CursorState {
        self.raw.state()
    }

    pub fn has_next<K, V, S>(&self, map: &OaHashMap<K, V, S>) -> Result<bool, TableError> {
        self.raw.has_next(&map.table)
    }

    pub fn advance<K, V, S>(&mut self, map: &OaHashMap<K, V, S>) -> Result<bool, TableError> {
        self.raw.advance(&map.table)
    }

    pub fn entry<'m, K, V, S>(
        &self,
        map: &'m OaHashMap<K, V, S>,
    ) -> Result<(&'m K, &'m V), TableError> {
        self.raw.current(&map.table).map(|(k, v)| (k, v))
    }

    pub fn key<'m, K, V, S>(&self, map: &'m OaHashMap<K, V, S>) -> Result<&'m K, TableError> {
        self.entry(map).map(|(k, _)| k)
    }

    pub fn value<'m, K, V, S>(&self, map: &'m OaHashMap<K, V, S>) -> Result<&'m V, TableError> {
        self.entry(map).map(|(_, v)| v)
    }

    /// Entry-view mutation. Other cursors over `map` are invalidated; this
    /// one stays valid.
    pub fn value_mut<'m, K, V, S>(
        &mut self,
        map: &'m mut OaHashMap<K, V, S>,
    ) -> Result<&'m mut V, TableError> {
        self.raw.current_mut(&mut map.table).map(|(_, v)| v)
    }

    /// Remove the current entry. The cursor stays valid; `advance` moves on
    /// to the entry after it.
    pub fn remove<K, V, S>(&mut self, map: &mut OaHashMap<K, V, S>) -> Result<(K, V), TableError> {
        self.raw.remove_current(&mut map.table)
    }
}

pub struct Iter<'a, K, V> {
    inner: table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

pub struct IterMut<'a, K, V> {
    inner: table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

pub struct IntoIter<K, V> {
    inner: table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for OaHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OaHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OaHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for OaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Pre-sizes once from the iterator's lower size bound, then inserts.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for OaHashMap<K, V, S>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(k, v)| (*k, *v)))
    }
}

impl<K, V, S> FromIterator<(K, V)> for OaHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Clone for OaHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            table: self.table.clone(),
        }
    }
}

impl<K, V, S> fmt::Debug for OaHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for OaHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V, S> Eq for OaHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for OaHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    /// If the key is absent.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
