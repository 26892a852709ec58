use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeSet, HashSet};

/// Checks every structural invariant of the trie from scratch.
fn validate_trie(t: &CompactTrie) {
    let root = &t.nodes[NodeId::ROOT];
    assert!(root.label.is_none(), "root must be unlabeled");
    assert!(root.word.is_none(), "root must not end a word");
    assert!(root.next_sibling.is_none(), "root has no siblings");

    let mut seen_words: HashSet<WordId> = HashSet::new();
    let mut reachable = 1usize;
    // (node, concatenated path labels up to and including the node)
    let mut stack: Vec<(NodeId, String)> = vec![(NodeId::ROOT, String::new())];

    while let Some((id, path)) = stack.pop() {
        let mut first_chars: HashSet<char> = HashSet::new();
        for child in t.nodes.children(id) {
            reachable += 1;
            let node = &t.nodes[child];
            let label_ref = node.label.expect("non-root node without label");
            assert!(
                label_ref.word().index() < t.words.len(),
                "label points past the word store"
            );
            let label = t.words.materialize(label_ref);
            assert!(!label.is_empty());

            let first = label.chars().next().unwrap();
            assert!(
                first_chars.insert(first),
                "siblings under {path:?} share first char {first:?}"
            );

            if node.is_leaf() {
                assert!(node.word.is_some(), "leaf {path:?}+{label:?} ends no word");
            } else if node.word.is_none() {
                assert!(
                    t.nodes.children(child).count() >= 2,
                    "non-word branch {path:?}+{label:?} has a single child"
                );
            }

            let child_path = format!("{path}{label}");
            if let Some(word) = node.word {
                assert!(seen_words.insert(word), "word {word:?} has two termini");
                assert_eq!(t.words.get(word), child_path, "terminus path mismatch");
            }
            stack.push((child, child_path));
        }
    }

    assert_eq!(reachable, t.nodes.len(), "unreachable nodes in arena");
    assert_eq!(seen_words.len(), t.len(), "every stored word needs a terminus");
    let distinct: HashSet<&str> = t.words().collect();
    assert_eq!(distinct.len(), t.len(), "word store holds duplicates");
}

fn expected_completions(model: &BTreeSet<String>, prefix: &str) -> Vec<String> {
    let prefix = normalize(prefix);
    model
        .iter()
        .filter(|w| w.starts_with(&prefix))
        .cloned()
        .collect()
}

fn sorted_query(t: &CompactTrie, prefix: &str) -> Vec<String> {
    let mut got: Vec<String> = t.completions(prefix).map(str::to_owned).collect();
    got.sort_unstable();
    got
}

fn word_strategy() -> impl Strategy<Value = String> {
    // Tiny alphabet so words share prefixes constantly; mixed case and padding
    // exercise normalization.
    "[ ]{0,1}[a-cA-C]{1,6}[ ]{0,1}"
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    "[a-cA-C]{0,4}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Insert(#[proptest(strategy = "word_strategy()")] String),
    Query(#[proptest(strategy = "prefix_strategy()")] String),
    Contains(#[proptest(strategy = "word_strategy()")] String),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=400)) {
        let mut t = CompactTrie::new();
        let mut m: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(word) => {
                    let added = t.insert(&word);
                    prop_assert_eq!(added, Ok(m.insert(normalize(&word))));
                }
                Op::Query(prefix) => {
                    prop_assert_eq!(sorted_query(&t, &prefix), expected_completions(&m, &prefix));
                }
                Op::Contains(word) => {
                    prop_assert_eq!(t.contains(&word), m.contains(&normalize(&word)));
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_trie(&t);
        let all: BTreeSet<String> = t.query("").into_iter().map(str::to_owned).collect();
        prop_assert_eq!(all, m);
    }

    #[test]
    fn prop_order_independent(
        (words, shuffled) in prop::collection::vec(word_strategy(), 0..40)
            .prop_flat_map(|w| (Just(w.clone()), Just(w).prop_shuffle()))
    ) {
        let mut a = CompactTrie::new();
        let mut b = CompactTrie::new();
        for w in &words {
            a.insert(w).unwrap();
        }
        for w in &shuffled {
            b.insert(w).unwrap();
        }
        validate_trie(&a);
        validate_trie(&b);
        prop_assert_eq!(a.len(), b.len());

        for w in &words {
            let w = normalize(w);
            for (end, _) in w.char_indices().chain(std::iter::once((w.len(), ' '))) {
                let prefix = &w[..end];
                prop_assert_eq!(sorted_query(&a, prefix), sorted_query(&b, prefix));
            }
        }
    }

    #[test]
    fn prop_round_trip_and_monotonic(words in prop::collection::vec(word_strategy(), 1..40)) {
        let mut t = CompactTrie::new();
        for w in &words {
            t.insert(w).unwrap();
        }

        for w in &words {
            let w = normalize(w);
            prop_assert!(t.query(&w).contains(&w.as_str()), "{} not found by itself", w);

            // Each longer prefix narrows the result set.
            let mut wider: Option<HashSet<String>> = None;
            for end in 0..=w.len() {
                let narrower: HashSet<String> = sorted_query(&t, &w[..end]).into_iter().collect();
                if let Some(wider) = &wider {
                    prop_assert!(narrower.is_subset(wider));
                }
                wider = Some(narrower);
            }
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["a", "ab", "abc", "abd", "b", "ba"];
    let model: BTreeSet<String> = words.iter().map(|w| w.to_string()).collect();
    let prefixes = ["", "a", "ab", "abc", "abd", "abe", "b", "ba", "bb", "c"];

    for_each_permutation(&words, |perm| {
        let mut t = CompactTrie::new();
        for w in &perm {
            assert_eq!(t.insert(w), Ok(true));
        }
        validate_trie(&t);
        for p in prefixes {
            assert_eq!(
                sorted_query(&t, p),
                expected_completions(&model, p),
                "prefix {p:?} after inserting {perm:?}"
            );
        }
    });
}

#[test]
fn validator_accepts_known_shapes() {
    for words in [
        &["bear", "bull", "stock", "bell"][..],
        &["car", "card"][..],
        &["card", "car"][..],
        &["test", "team"][..],
    ] {
        let mut t = CompactTrie::new();
        for w in words {
            t.insert(w).unwrap();
        }
        validate_trie(&t);
    }
}
