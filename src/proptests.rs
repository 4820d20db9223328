// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Property tests that replay random edit traces against a `Vec` and check
//! the tree's structural invariants after every step.

use proptest::prelude::*;

use crate::{BTreeVec, Config};

#[derive(Clone, Debug)]
enum Op {
    Insert { pos_pct: f64, value: u32 },
    Remove { pos_pct: f64 },
    Set { pos_pct: f64, value: u32 },
    Get { pos_pct: f64 },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        // Weighted towards inserts so traces build up a few levels
        4 => (0.0..=1.0f64, any::<u32>()).prop_map(|(pos_pct, value)| Op::Insert { pos_pct, value }),
        3 => (0.0..=1.0f64).prop_map(|pos_pct| Op::Remove { pos_pct }),
        1 => (0.0..=1.0f64, any::<u32>()).prop_map(|(pos_pct, value)| Op::Set { pos_pct, value }),
        1 => (0.0..=1.0f64).prop_map(|pos_pct| Op::Get { pos_pct }),
    ]
}

fn capacities() -> impl Strategy<Value = (usize, usize)> {
    let even = prop_oneof![Just(4usize), Just(6), Just(8), Just(16)];
    return (even.clone(), even);
}

/// Scale a fraction to a position in `[0, len]`, or `[0, len)` when `strict`.
fn scale(pct: f64, len: usize, strict: bool) -> usize {
    let bound = if strict { len } else { len + 1 };
    return ((pct * bound as f64) as usize).min(bound - 1);
}

fn apply(list: &mut BTreeVec<u32>, reference: &mut Vec<u32>, op: &Op) {
    let len = reference.len();
    match op {
        Op::Insert { pos_pct, value } => {
            let pos = scale(*pos_pct, len, false);
            list.insert(pos, *value);
            reference.insert(pos, *value);
        }
        Op::Remove { pos_pct } => {
            if len == 0 {
                return;
            }
            let pos = scale(*pos_pct, len, true);
            assert_eq!(list.remove(pos), reference.remove(pos));
        }
        Op::Set { pos_pct, value } => {
            if len == 0 {
                return;
            }
            let pos = scale(*pos_pct, len, true);
            let old = std::mem::replace(&mut reference[pos], *value);
            assert_eq!(list.set(pos, *value), old);
        }
        Op::Get { pos_pct } => {
            if len == 0 {
                return;
            }
            let pos = scale(*pos_pct, len, true);
            assert_eq!(*list.get(pos), reference[pos]);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every trace leaves the tree equal to the reference and structurally valid.
    #[test]
    fn matches_reference_and_keeps_invariants(
        (fanout, leaf) in capacities(),
        ops in prop::collection::vec(arbitrary_op(), 1..400),
    ) {
        let mut list = BTreeVec::with_config(Config::new(fanout, leaf)).unwrap();
        let mut reference = Vec::new();
        for op in &ops {
            apply(&mut list, &mut reference, op);
            prop_assert_eq!(list.len(), reference.len());
            list.check_invariants();
        }
        for (i, value) in reference.iter().enumerate() {
            prop_assert_eq!(list.get(i), value);
        }
    }

    /// Turning the path cache off changes nothing observable.
    #[test]
    fn cache_is_transparent(
        (fanout, leaf) in capacities(),
        ops in prop::collection::vec(arbitrary_op(), 1..300),
    ) {
        let mut cached = BTreeVec::with_config(Config::new(fanout, leaf)).unwrap();
        let mut uncached = BTreeVec::with_config(Config::new(fanout, leaf).with_path_cache(false)).unwrap();
        let mut reference_a = Vec::new();
        let mut reference_b = Vec::new();
        for op in &ops {
            apply(&mut cached, &mut reference_a, op);
            apply(&mut uncached, &mut reference_b, op);
        }
        prop_assert_eq!(cached.len(), uncached.len());
        prop_assert_eq!(cached.height(), uncached.height());
        for i in 0..cached.len() {
            prop_assert_eq!(cached.get(i), uncached.get(i));
        }
    }

    /// Inserting then removing at the same position restores the sequence.
    #[test]
    fn insert_then_remove_round_trips(
        len in 0usize..300,
        pos_pct in 0.0..=1.0f64,
        value in any::<u32>(),
    ) {
        let mut list = BTreeVec::with_config(Config::new(4, 4)).unwrap();
        for i in 0..len {
            list.push(i as u32);
        }
        let pos = scale(pos_pct, len, false);
        list.insert(pos, value);
        prop_assert_eq!(*list.get(pos), value);
        prop_assert_eq!(list.remove(pos), value);
        list.check_invariants();
        prop_assert_eq!(list.len(), len);
        for i in 0..len {
            prop_assert_eq!(*list.get(i), i as u32);
        }
    }

    /// The root is never an internal node with a single child, however the
    /// tree is drained.
    #[test]
    fn height_stays_minimal(
        len in 1usize..500,
        picks in prop::collection::vec(0.0..=1.0f64, 500),
    ) {
        let mut list = BTreeVec::with_config(Config::new(4, 4)).unwrap();
        for i in 0..len {
            list.push(i as u32);
        }
        for pct in picks.iter().take(len) {
            let pos = scale(*pct, list.len(), true);
            list.remove(pos);
            list.check_invariants();
            // Two root children, half-full nodes below: at least 2^h elements
            if list.height() >= 2 {
                prop_assert!(list.len() >= 1 << list.height());
            }
        }
        prop_assert!(list.is_empty());
        prop_assert_eq!(list.height(), 1);
    }
}
