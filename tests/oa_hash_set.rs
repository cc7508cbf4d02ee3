// OaHashSet integration suite.
//
// Same engine as the map with one element per slot. Exercised here:
// - add reports novelty and is not a mutation when the element exists.
// - Growth keeps every element; collisions resolve by equality.
// - Cursors drain the set and fail fast on foreign removals.
use oa_hashmap::{OaHashSet, TableError, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use std::hash::{Hash, Hasher};

// Elements that all hash alike but are equal only to themselves.
#[derive(Debug)]
struct HashCollisionsButNotEqual(u32);
impl PartialEq for HashCollisionsButNotEqual {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for HashCollisionsButNotEqual {}
impl Hash for HashCollisionsButNotEqual {
    fn hash<H: Hasher>(&self, state: &mut H) {
        42u32.hash(state);
    }
}

fn default_set() -> OaHashSet<String> {
    OaHashSet::with_capacity_and_load_factor(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR).unwrap()
}

// Test: add then re-add.
// Verifies: only the first add of an element reports it as new.
#[test]
fn add_and_readd() {
    let mut s = default_set();
    assert!(s.insert("test".into()));
    assert!(!s.insert("test".into()));
    assert_eq!(s.len(), 1);
}

// Test: fill without expansion.
// Assumes: 16 slots, load factor 0.70.
// Verifies: 11 elements fit without a rebuild.
#[test]
fn fill_without_expansion() {
    let mut s = default_set();
    for i in 0..11 {
        s.insert(i.to_string());
    }
    assert_eq!(s.capacity(), 16);
    assert_eq!(s.stats().resizes, 0);
    for i in 0..11 {
        assert!(s.contains(&i.to_string()));
    }
}

// Test: fill with expansion.
// Verifies: 100 elements force a rebuild and all remain members.
#[test]
fn fill_with_expansion() {
    let mut s = default_set();
    for i in 0..100 {
        s.insert(i.to_string());
    }
    assert_eq!(s.len(), 100);
    assert!(s.stats().resizes >= 1);
    for i in 0..100 {
        assert!(s.contains(i.to_string().as_str()));
    }
}

// Test: heavy hash collisions.
// Verifies: 100 distinct elements with one shared hash are all kept.
#[test]
fn heavy_hash_collisions() {
    let mut s = OaHashSet::new();
    for i in 0..100 {
        assert!(s.insert(HashCollisionsButNotEqual(i)));
    }
    assert_eq!(s.len(), 100);
    assert!(s.contains(&HashCollisionsButNotEqual(63)));
    assert!(s.remove(&HashCollisionsButNotEqual(63)));
    assert!(!s.contains(&HashCollisionsButNotEqual(63)));
    assert!(s.contains(&HashCollisionsButNotEqual(99)));
    assert_eq!(s.len(), 99);
}

// Test: counting and deleting cursor.
// Verifies: 20 elements are counted, then removed one by one through a
// cursor, leaving the set empty.
#[test]
fn counting_and_deleting_cursor() {
    let mut s = default_set();
    for i in 0..20 {
        s.insert(i.to_string());
    }

    let mut count = 0;
    let mut c = s.cursor();
    while c.advance(&s).unwrap() {
        count += 1;
    }
    assert_eq!(count, 20);

    let mut c = s.cursor();
    while c.has_next(&s).unwrap() {
        c.advance(&s).unwrap();
        c.remove(&mut s).unwrap();
    }
    assert_eq!(s.len(), 0);
}

// Test: fail-fast cursor.
// Verifies: removing another element through the set while a cursor is
// open makes the cursor fail with ConcurrentMutation.
#[test]
fn cursor_fails_fast_on_foreign_removal() {
    let mut s = default_set();
    for i in 0..20 {
        s.insert(i.to_string());
    }

    let mut c = s.cursor();
    assert!(c.advance(&s).unwrap());
    let current = c.remove(&mut s).unwrap();
    let victim = if current == "10" { "11" } else { "10" };
    assert!(s.remove(victim));
    assert!(matches!(
        c.has_next(&s),
        Err(TableError::ConcurrentMutation { .. })
    ));
}

// Test: add of an existing element is not a mutation.
// Verifies: the cursor stays valid; replace on the other hand invalidates.
#[test]
fn readd_keeps_cursor_replace_invalidates() {
    let mut s: OaHashSet<u32> = (0..5).collect();
    let mut c = s.cursor();
    assert!(!s.insert(2));
    assert!(c.advance(&s).unwrap());
    assert!(c.get(&s).is_ok());

    assert_eq!(s.replace(2), Some(2));
    assert!(matches!(
        c.get(&s),
        Err(TableError::ConcurrentMutation { .. })
    ));
}

// Test: clear.
// Verifies: capacity is kept and the set is reusable.
#[test]
fn clear_keeps_capacity() {
    let mut s: OaHashSet<u32> = (0..40).collect();
    let cap = s.capacity();
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.capacity(), cap);
    assert!(s.insert(7));
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![7]);
}

// Test: invalid configuration.
// Verifies: the set constructors reject a load factor outside (0, 1).
#[test]
fn invalid_load_factor() {
    assert!(OaHashSet::<u8>::with_capacity_and_load_factor(4, 1.0).is_err());
    assert!(OaHashSet::<u8>::with_capacity_and_load_factor(4, 0.0).is_err());
    assert!(OaHashSet::<u8>::with_capacity_and_load_factor(0, 0.3).is_ok());
}
