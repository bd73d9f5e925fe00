// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::conditional::ConditionalPatternBase;
use crate::fptree::FPTree;
use crate::frequent_pattern::FrequentPattern;
use crate::item::Item;
use crate::itemset::Itemset;
use log::debug;
use rayon::prelude::*;
use std::cmp;
use std::rc::Rc;

/// Above this many frequent items the work-stack miner is used instead of
/// the recursive one.
pub const MAX_RECURSION_DEPTH: usize = 256;

/// The frequent itemsets (of two or more items) found while mining one
/// node-link-table item. Every itemset ends with `item`.
#[derive(Clone, Debug)]
pub struct MinedItem {
    pub item: Item,
    pub itemsets: Vec<Itemset>,
}

/// Mines every item with a non-empty node-link chain, least frequent first.
/// Items are mined in parallel; items that yield no itemsets are omitted.
pub fn fp_growth(
    fptree: &FPTree,
    frequent_pattern: &FrequentPattern,
    min_support: u32,
) -> Vec<MinedItem> {
    let iterative = frequent_pattern.len() > MAX_RECURSION_DEPTH;
    frequent_pattern
        .items()
        .par_iter()
        .rev()
        .filter(|item| fptree.node_links().head(item).is_some())
        .map(|&item| {
            if iterative {
                mine_item_iterative(fptree, frequent_pattern, item, min_support)
            } else {
                mine_item(fptree, frequent_pattern, item, min_support)
            }
        })
        .filter(|mined| !mined.itemsets.is_empty())
        .collect()
}

/// Mines the itemsets ending in `item` by recursing over conditional
/// pattern bases.
pub fn mine_item(
    fptree: &FPTree,
    frequent_pattern: &FrequentPattern,
    item: Item,
    min_support: u32,
) -> MinedItem {
    let mut itemsets: Vec<Itemset> = vec![];
    let item_count = fptree.chain_support(item);
    let base = fptree.conditional_pattern_base(item);
    if !base.is_empty() {
        let suffix = Itemset::new(vec![item], item_count);
        for (j, count) in base.f_list(min_support, frequent_pattern) {
            let support = cmp::min(item_count, count);
            let itemset = suffix.extended_front(j, support);
            itemsets.push(itemset.clone());
            grow(
                &base,
                &itemset,
                support,
                frequent_pattern,
                min_support,
                &mut itemsets,
            );
        }
    }
    debug!(
        "Mined {} itemsets from {} prefix paths of item {:?}",
        itemsets.len(),
        base.len(),
        item
    );
    MinedItem { item, itemsets }
}

// Extends `suffix` with every item frequent in `base` conditioned on the
// suffix's first item. Depth is bounded by the number of frequent items, as
// each level only keeps items earlier in the global order.
fn grow(
    base: &ConditionalPatternBase,
    suffix: &Itemset,
    count: u32,
    frequent_pattern: &FrequentPattern,
    min_support: u32,
    itemsets: &mut Vec<Itemset>,
) {
    debug_assert!(suffix.len() <= frequent_pattern.len());
    let first = match suffix.first() {
        Some(first) => first,
        None => return,
    };
    let narrowed = base.narrow(first, frequent_pattern);
    if narrowed.is_empty() {
        return;
    }
    for (i, i_count) in narrowed.f_list(min_support, frequent_pattern) {
        let support = cmp::min(count, i_count);
        let itemset = suffix.extended_front(i, support);
        itemsets.push(itemset.clone());
        grow(
            &narrowed,
            &itemset,
            support,
            frequent_pattern,
            min_support,
            itemsets,
        );
    }
}

/// Same as `mine_item`, driven by an explicit work stack rather than the
/// call stack. Produces the itemsets in the same order.
pub fn mine_item_iterative(
    fptree: &FPTree,
    frequent_pattern: &FrequentPattern,
    item: Item,
    min_support: u32,
) -> MinedItem {
    let mut itemsets: Vec<Itemset> = vec![];
    let item_count = fptree.chain_support(item);
    let base = Rc::new(fptree.conditional_pattern_base(item));

    // Each entry is an itemset still to be emitted, and the base it was
    // found in. Pushed in reverse so pops follow f-list order.
    let mut stack: Vec<(Rc<ConditionalPatternBase>, Itemset)> = vec![];
    if !base.is_empty() {
        let suffix = Itemset::new(vec![item], item_count);
        for (j, count) in base.f_list(min_support, frequent_pattern).into_iter().rev() {
            let itemset = suffix.extended_front(j, cmp::min(item_count, count));
            stack.push((Rc::clone(&base), itemset));
        }
    }

    while let Some((base, itemset)) = stack.pop() {
        let support = itemset.support().unwrap_or(0);
        if let Some(first) = itemset.first() {
            let narrowed = base.narrow(first, frequent_pattern);
            if !narrowed.is_empty() {
                let f_list = narrowed.f_list(min_support, frequent_pattern);
                let narrowed = Rc::new(narrowed);
                for (i, count) in f_list.into_iter().rev() {
                    let extended = itemset.extended_front(i, cmp::min(support, count));
                    stack.push((Rc::clone(&narrowed), extended));
                }
            }
        }
        itemsets.push(itemset);
    }

    debug!(
        "Mined {} itemsets from item {:?} without recursion",
        itemsets.len(),
        item
    );
    MinedItem { item, itemsets }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{fp_growth, mine_item, mine_item_iterative};
    use crate::fptree::FPTree;
    use crate::frequent_pattern::FrequentPattern;
    use crate::item::Item;
    use crate::item_counter::ItemCounter;
    use crate::itemizer::Itemizer;
    use fnv::FnvHashMap;

    pub(crate) struct Mined {
        pub(crate) itemizer: Itemizer,
        pub(crate) pattern: FrequentPattern,
        pub(crate) tree: FPTree,
    }

    pub(crate) fn build(transactions: &[Vec<String>], min_support: u32) -> Mined {
        let mut itemizer = Itemizer::new();
        let transactions: Vec<Vec<Item>> = transactions
            .iter()
            .map(|t| t.iter().map(|s| itemizer.id_of(s)).collect())
            .collect();
        let counter = ItemCounter::from_transactions(&transactions);
        let pattern = FrequentPattern::new(&counter, min_support, &itemizer);
        let mut tree = FPTree::new();
        for transaction in &transactions {
            tree.insert(&pattern.project(transaction), 1);
        }
        Mined {
            itemizer,
            pattern,
            tree,
        }
    }

    pub(crate) fn to_strings(transactions: &[&[&str]]) -> Vec<Vec<String>> {
        transactions
            .iter()
            .map(|t| t.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    // All frequent itemsets, singletons included, keyed by sorted tokens.
    pub(crate) fn all_itemsets(mined: &Mined, min_support: u32) -> FnvHashMap<Vec<String>, u32> {
        let mut result: FnvHashMap<Vec<String>, u32> = FnvHashMap::default();
        for item in mined.pattern.items() {
            let support = mined.pattern.support(item).unwrap();
            result.insert(vec![mined.itemizer.str_of(*item).to_owned()], support);
        }
        for mined_item in fp_growth(&mined.tree, &mined.pattern, min_support) {
            for itemset in mined_item.itemsets {
                let mut key: Vec<String> = itemset
                    .items()
                    .iter()
                    .map(|&i| mined.itemizer.str_of(i).to_owned())
                    .collect();
                key.sort();
                let previous = result.insert(key, itemset.support().unwrap());
                assert!(previous.is_none(), "itemset mined twice");
            }
        }
        result
    }

    fn key(items: &[&str]) -> Vec<String> {
        let mut key: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        key.sort();
        key
    }

    #[test]
    fn test_small_fixture() {
        let transactions = to_strings(&[
            &["a", "b", "c"],
            &["a", "b"],
            &["a", "c"],
            &["a"],
            &["b", "c"],
        ]);
        let mined = build(&transactions, 2);
        let itemsets = all_itemsets(&mined, 2);

        let mut expected: FnvHashMap<Vec<String>, u32> = FnvHashMap::default();
        expected.insert(key(&["a"]), 4);
        expected.insert(key(&["b"]), 3);
        expected.insert(key(&["c"]), 3);
        expected.insert(key(&["a", "b"]), 2);
        expected.insert(key(&["a", "c"]), 2);
        expected.insert(key(&["b", "c"]), 2);
        assert_eq!(itemsets, expected);
    }

    #[test]
    fn test_three_itemsets() {
        // HARM's census2.csv test dataset.
        let transactions = to_strings(&[
            &["a", "b", "c"],
            &["d", "b", "c"],
            &["a", "b", "e"],
            &["f", "g", "c"],
            &["d", "g", "e"],
            &["f", "b", "c"],
            &["f", "b", "c"],
            &["a", "b", "e"],
            &["a", "b", "c"],
            &["a", "b", "e"],
            &["a", "b", "e"],
        ]);
        let mined = build(&transactions, 2);
        let itemsets = all_itemsets(&mined, 2);
        assert_eq!(itemsets[&key(&["a", "b", "e"])], 4);
        assert_eq!(itemsets[&key(&["a", "b", "c"])], 2);
        assert_eq!(itemsets[&key(&["b", "c", "f"])], 2);
        assert_eq!(itemsets[&key(&["a", "b"])], 6);
        assert_eq!(itemsets[&key(&["b", "c"])], 5);
        assert!(!itemsets.contains_key(&key(&["d", "e"])));
        assert!(!itemsets.contains_key(&key(&["a", "b", "c", "e"])));
    }

    #[test]
    fn test_itemsets_end_with_mined_item() {
        let transactions = to_strings(&[&["x", "y", "z"], &["x", "y", "z"], &["x", "y"]]);
        let mined = build(&transactions, 1);
        let results = fp_growth(&mined.tree, &mined.pattern, 1);
        // Least frequent item is mined first.
        assert_eq!(mined.itemizer.str_of(results[0].item), "z");
        for mined_item in &results {
            for itemset in &mined_item.itemsets {
                assert_eq!(itemset.items().last(), Some(&mined_item.item));
            }
        }
        let rendered: Vec<String> = results[0]
            .itemsets
            .iter()
            .map(|i| format!("{}:{}", i.render(&mined.itemizer), i.support().unwrap()))
            .collect();
        assert_eq!(rendered, vec!["[x, z]:2", "[y, z]:2", "[x, y, z]:2"]);
    }

    #[test]
    fn test_empty_dataset() {
        let mined = build(&[], 2);
        assert!(mined.pattern.is_empty());
        assert!(fp_growth(&mined.tree, &mined.pattern, 2).is_empty());
    }

    #[test]
    fn test_iterative_matches_recursive() {
        let transactions = to_strings(&[
            &["a", "b", "c", "d"],
            &["a", "b", "c"],
            &["a", "c", "d"],
            &["b", "c", "d"],
            &["a", "b", "d"],
        ]);
        let mined = build(&transactions, 1);
        for &item in mined.pattern.items() {
            let recursive = mine_item(&mined.tree, &mined.pattern, item, 1);
            let iterative = mine_item_iterative(&mined.tree, &mined.pattern, item, 1);
            let recursive: Vec<(Vec<Item>, Option<u32>)> = recursive
                .itemsets
                .iter()
                .map(|i| (i.items().to_vec(), i.support()))
                .collect();
            let iterative: Vec<(Vec<Item>, Option<u32>)> = iterative
                .itemsets
                .iter()
                .map(|i| (i.items().to_vec(), i.support()))
                .collect();
            assert_eq!(recursive, iterative);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::tests::{all_itemsets, build};
    use super::{mine_item, mine_item_iterative};
    use fnv::FnvHashMap;
    use proptest::prelude::*;

    fn transactions_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]), 0..6),
            0..16,
        )
        .prop_map(|ts| {
            ts.into_iter()
                .map(|t| t.into_iter().map(|s| s.to_owned()).collect())
                .collect()
        })
    }

    fn brute_force(transactions: &[Vec<String>], min_support: u32) -> FnvHashMap<Vec<String>, u32> {
        let alphabet = ["a", "b", "c", "d", "e", "f"];
        let mut result: FnvHashMap<Vec<String>, u32> = FnvHashMap::default();
        for mask in 1u32..(1 << alphabet.len()) {
            let candidate: Vec<String> = alphabet
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| s.to_string())
                .collect();
            let support = transactions
                .iter()
                .filter(|t| candidate.iter().all(|item| t.contains(item)))
                .count() as u32;
            if support > 0 && support >= min_support {
                result.insert(candidate, support);
            }
        }
        result
    }

    proptest! {
        /// Property: mining agrees exactly with enumerating every candidate.
        #[test]
        fn matches_brute_force(
            transactions in transactions_strategy(),
            min_support in 1u32..5
        ) {
            let mined = build(&transactions, min_support);
            let itemsets = all_itemsets(&mined, min_support);
            prop_assert_eq!(itemsets, brute_force(&transactions, min_support));
        }

        /// Property: no itemset has more support than any of its subsets.
        #[test]
        fn support_is_anti_monotone(
            transactions in transactions_strategy(),
            min_support in 1u32..4
        ) {
            let mined = build(&transactions, min_support);
            let itemsets = all_itemsets(&mined, min_support);
            for (items, support) in &itemsets {
                if items.len() < 2 {
                    continue;
                }
                for skip in 0..items.len() {
                    let mut subset = items.clone();
                    subset.remove(skip);
                    let subset_support = itemsets.get(&subset);
                    prop_assert!(subset_support.is_some());
                    prop_assert!(*subset_support.unwrap() >= *support);
                }
            }
        }

        /// Property: the work-stack miner emits exactly what the recursive one does.
        #[test]
        fn iterative_matches_recursive(
            transactions in transactions_strategy(),
            min_support in 1u32..4
        ) {
            let mined = build(&transactions, min_support);
            for &item in mined.pattern.items() {
                let recursive = mine_item(&mined.tree, &mined.pattern, item, min_support);
                let iterative = mine_item_iterative(&mined.tree, &mined.pattern, item, min_support);
                prop_assert_eq!(recursive.itemsets.len(), iterative.itemsets.len());
                for (r, i) in recursive.itemsets.iter().zip(iterative.itemsets.iter()) {
                    prop_assert_eq!(r.items(), i.items());
                    prop_assert_eq!(r.support(), i.support());
                }
            }
        }
    }
}
