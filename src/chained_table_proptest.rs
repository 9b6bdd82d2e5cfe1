#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can inspect
// chain layout alongside the public operations.

use crate::chained_table::ChainedTable;
use crate::strategy::{builtin_strategies, HashStrategy};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i64),
    Delete(usize),
    Search(usize),
    SearchFresh(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=13, proptest::collection::vec("[a-z]{0,5}", 1..=8)).prop_flat_map(|(buckets, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Search),
            1 => "[a-z]{0,5}".prop_map(OpI::SearchFresh),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (buckets, pool.clone(), ops))
    })
}

// Model: each key maps to a stack of bindings, newest last.
fn run_scenario<S>(strategy: &S, buckets: usize, pool: &[String], ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: HashStrategy + ?Sized,
{
    let mut sut = ChainedTable::new(buckets).expect("positive bucket count");
    let mut model: HashMap<String, Vec<i64>> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                sut.insert(k, v, strategy);
                model.entry(k.clone()).or_default().push(v);
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let removed = sut.delete(k, strategy).map(|e| e.into_parts());
                let expected = model.get_mut(k).and_then(|stack| stack.pop());
                prop_assert_eq!(removed, expected.map(|v| (k.clone(), v)));
            }
            OpI::Search(i) => {
                let k = &pool[i];
                let expected = model.get(k).and_then(|stack| stack.last().copied());
                prop_assert_eq!(sut.search(k, strategy), expected);
                let mut all: Vec<i64> = model.get(k).cloned().unwrap_or_default();
                all.reverse();
                prop_assert_eq!(sut.search_all(k, strategy), all);
            }
            OpI::SearchFresh(s) => {
                let expected = model.get(&s).and_then(|stack| stack.last().copied());
                prop_assert_eq!(sut.search(&s, strategy), expected);
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<&str> = sut.iter().map(|(k, _)| k).collect();
                let m_keys: BTreeSet<&str> = model
                    .iter()
                    .filter(|(_, stack)| !stack.is_empty())
                    .map(|(k, _)| k.as_str())
                    .collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        // Post-conditions after each op
        // 1) Entry count matches the model's binding count.
        let bindings: usize = model.values().map(Vec::len).sum();
        prop_assert_eq!(sut.len(), bindings);
        // 2) No node is lost or orphaned: chains account for every entry.
        prop_assert_eq!(sut.chain_lengths().iter().sum::<usize>(), bindings);
        prop_assert_eq!(sut.iter().count(), bindings);
    }
    Ok(())
}

// Property: State-machine equivalence against a stack-of-bindings model under
// every built-in strategy. Exercises shadowing, head relinking on delete and
// search on empty buckets.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, pool, ops) in arb_scenario()) {
        for (_name, strategy) in builtin_strategies() {
            run_scenario(strategy, buckets, &pool, ops.clone())?;
        }
    }
}

// Property: Same invariants with a constant strategy, so every key shares one
// chain and lookups are resolved purely by key comparison.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((buckets, pool, ops) in arb_scenario()) {
        let constant = |_: &str| 0u32;
        run_scenario(&constant, buckets, &pool, ops)?;
    }
}

// Property: Every built-in strategy is deterministic and its bucket index is
// always in range.
proptest! {
    #[test]
    fn prop_strategies_deterministic(key in ".{0,24}", buckets in 1usize..1000) {
        let t = ChainedTable::new(buckets).expect("positive bucket count");
        for (name, strategy) in builtin_strategies() {
            prop_assert_eq!(strategy.digest(&key), strategy.digest(&key), "strategy {}", name);
            prop_assert!(t.bucket_index(&key, strategy) < buckets);
        }
    }
}
