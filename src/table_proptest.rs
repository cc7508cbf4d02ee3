#![cfg(test)]

// Property tests for SlotTable kept inside the crate so they can check the
// counters and stamp accounting the adapters do not expose.

use crate::config::TableConfig;
use crate::table::SlotTable;
use hashbrown::hash_map::DefaultHashBuilder;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    CursorRemove(usize),
    Reserve(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (TableConfig, Vec<String>, Vec<OpI>)> {
    let config = (0usize..24, 0.05f64..0.95)
        .prop_map(|(capacity, lf)| TableConfig::new(capacity, lf).unwrap());
    (config, proptest::collection::vec("[a-z]{0,5}", 1..=12)).prop_flat_map(|(config, pool)| {
        let idx = 0..pool.len();
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}".prop_map(|s| s)].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => idx.clone().prop_map(OpI::CursorRemove),
            1 => (0usize..40).prop_map(OpI::Reserve),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (config, pool.clone(), ops))
    })
}

fn run<S: BuildHasher>(
    hasher: S,
    config: TableConfig,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut sut: SlotTable<(String, i32)> = SlotTable::with_config(config).unwrap();
    let mut model: HashMap<String, i32> = HashMap::new();
    let hash = |k: &str| hasher.hash_one(k);

    for op in ops {
        let before = sut.stats();
        let mut read_only = false;
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut
                    .put_with(hash(&k), (k.clone(), v), |a, b| a.0 == b.0, |slot, (_, nv)| {
                        std::mem::replace(&mut slot.1, nv)
                    })
                    .unwrap();
                prop_assert_eq!(prev, model.insert(k, v));
                // One bump for the write, one per rebuild it triggered.
                let rebuilds = sut.stats().resizes - before.resizes;
                prop_assert!(rebuilds <= 1);
                prop_assert_eq!(sut.stamp(), before.stamp + 1 + rebuilds);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let got = sut.remove(hash(k), |e| &e.0 == k).map(|(_, v)| v);
                let want = model.remove(k);
                prop_assert_eq!(got, want);
                let bumps = u64::from(want.is_some());
                prop_assert_eq!(sut.stamp(), before.stamp + bumps, "absent removal must not bump");
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let got = sut
                    .find(hash(k), |e| &e.0 == k)
                    .and_then(|idx| sut.entry(idx))
                    .map(|e| e.1);
                prop_assert_eq!(got, model.get(k).copied());
                read_only = true;
            }
            OpI::Contains(s) => {
                let has = sut.find(hash(&s), |e| e.0 == s).is_some();
                prop_assert_eq!(has, model.contains_key(&s));
                read_only = true;
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match sut.find(hash(k), |e| &e.0 == k) {
                    Some(idx) => {
                        let e = sut.entry_mut(idx).expect("found slot is live");
                        e.1 = e.1.wrapping_add(d);
                        let mv = model.get_mut(k).expect("present in model");
                        *mv = mv.wrapping_add(d);
                        prop_assert_eq!(sut.stamp(), before.stamp + 1);
                    }
                    None => prop_assert!(!model.contains_key(k)),
                }
            }
            OpI::Iterate => {
                let s_entries: BTreeSet<_> = sut.iter().cloned().collect();
                let m_entries: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s_entries, m_entries);
                read_only = true;
            }
            OpI::CursorRemove(i) => {
                let k = &pool[i];
                let mut c = sut.cursor();
                let mut removed = None;
                while c.advance(&sut).unwrap() {
                    if &c.current(&sut).unwrap().0 == k {
                        removed = Some(c.remove_current(&mut sut).unwrap().1);
                    }
                }
                prop_assert_eq!(removed, model.remove(k));
            }
            OpI::Reserve(n) => {
                sut.reserve(n);
                if n > 0 {
                    let fill = (sut.len() + n) as f64 / sut.capacity() as f64;
                    prop_assert!(fill < sut.load_factor(), "reserve({}) left fill at {}", n, fill);
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), before.capacity);
            }
        }

        // Post-conditions after each op
        // 1) Size parity and recounted slot states
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.check_invariants());
        // 2) A rebuild leaves no tombstones behind
        let after = sut.stats();
        if after.resizes > before.resizes {
            prop_assert_eq!(after.tombstones, 0);
        }
        // 3) Reads change nothing, not even the stamp
        if read_only {
            prop_assert_eq!(after, before);
        }
        // 4) The stamp only moves forward
        prop_assert!(after.stamp >= before.stamp);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - put returns the previous value; get/contains parity with the model.
// - Absent removals and reads never bump the stamp; writes bump it once,
//   plus once per rebuild.
// - Cursor self-removal never trips the fail-fast check.
// - Rebuilds purge tombstones; reserve leaves room for the whole batch.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((config, pool, ops) in arb_scenario()) {
        run(DefaultHashBuilder::default(), config, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        42
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher). Every key shares one probe chain,
// so tombstones sit between live entries on every lookup.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((config, pool, ops) in arb_scenario()) {
        run(ConstBuildHasher, config, &pool, ops)?;
    }
}
