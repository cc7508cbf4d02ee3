// Reentrancy from user `Eq` code.
//
// The only user code a table runs mid-operation is `Eq` while probing. A
// key that reaches back into the same table from there must panic in
// debug builds. Drops of removed entries happen after the table is
// consistent again and may touch the table freely.
use oa_hashmap::{OaHashMap, OaHashSet};
use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

// Element whose `eq` peeks into the set it lives in when armed.
struct Peeker {
    id: u32,
    set: Cell<*const OaHashSet<Peeker>>,
}

impl Peeker {
    fn new(id: u32) -> Self {
        Peeker {
            id,
            set: Cell::new(std::ptr::null()),
        }
    }
}

impl PartialEq for Peeker {
    fn eq(&self, other: &Self) -> bool {
        let s = self.set.get();
        if !s.is_null() {
            unsafe {
                let _ = (*s).contains(&Peeker::new(0));
            }
        }
        self.id == other.id
    }
}
impl Eq for Peeker {}
impl Hash for Peeker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // One shared chain so every probe compares.
        0u8.hash(state);
    }
}

#[cfg(debug_assertions)]
#[test]
fn eq_reentering_during_lookup_panics() {
    let mut s = OaHashSet::new();
    s.insert(Peeker::new(1));
    let probe = Peeker::new(2);
    probe.set.set(&s as *const _);
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = s.contains(&probe);
    }));
    assert!(res.is_err(), "expected reentrancy to panic in debug builds");
}

#[cfg(debug_assertions)]
#[test]
fn eq_reentering_during_insert_panics() {
    let mut s = OaHashSet::new();
    s.insert(Peeker::new(1));
    // Arm the stored element: inserts compare stored against incoming.
    let stored = s.get(&Peeker::new(1)).expect("just inserted");
    stored.set.set(&s as *const _);
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        s.insert(Peeker::new(2));
    }));
    assert!(res.is_err(), "expected reentrancy to panic in debug builds");
}

// Test: the guard is released after a panic unwinds out of a probe.
// Verifies: the set remains usable once the offending call returned.
#[cfg(debug_assertions)]
#[test]
fn guard_released_after_unwind() {
    let mut s = OaHashSet::new();
    s.insert(Peeker::new(1));
    let probe = Peeker::new(2);
    probe.set.set(&s as *const _);
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = s.contains(&probe);
    }));
    assert!(s.contains(&Peeker::new(1)));
    assert!(s.insert(Peeker::new(3)));
}

// Value whose drop records how many entries the map held at that point.
struct Witness {
    map: Rc<RefCell<Option<*const OaHashMap<u32, Witness>>>>,
    seen: Rc<Cell<usize>>,
}

impl Drop for Witness {
    fn drop(&mut self) {
        if let Some(m) = *self.map.borrow() {
            unsafe {
                self.seen.set((*m).len());
                let _ = (*m).get(&1);
            }
        }
    }
}

// Test: dropping a removed value may read the map.
// Verifies: the drop runs after the removal completed, so it observes the
// updated length and a lookup from inside it does not panic.
#[test]
fn drop_of_removed_value_may_read_the_map() {
    let slot = Rc::new(RefCell::new(None));
    let seen = Rc::new(Cell::new(usize::MAX));
    let mut m: OaHashMap<u32, Witness> = OaHashMap::new();
    m.insert(
        1,
        Witness {
            map: slot.clone(),
            seen: seen.clone(),
        },
    );
    m.insert(
        2,
        Witness {
            map: Rc::new(RefCell::new(None)),
            seen: Rc::new(Cell::new(0)),
        },
    );
    *slot.borrow_mut() = Some(&m as *const _);
    drop(m.remove(&1));
    assert_eq!(seen.get(), 1);
    *slot.borrow_mut() = None;
}
