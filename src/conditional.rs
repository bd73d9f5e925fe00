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

use crate::frequent_pattern::FrequentPattern;
use crate::item::Item;
use crate::item_counter::ItemCounter;
use crate::itemset::Itemset;

/// Weighted prefix paths, each read root to parent. The support of each
/// pattern is the count of the occurrence it was collected from.
#[derive(Clone, Debug, Default)]
pub struct ConditionalPatternBase {
    patterns: Vec<Itemset>,
}

fn weight(pattern: &Itemset) -> u32 {
    debug_assert!(pattern.support().is_some());
    pattern.support().unwrap_or(0)
}

impl ConditionalPatternBase {
    pub fn new(patterns: Vec<Itemset>) -> ConditionalPatternBase {
        ConditionalPatternBase { patterns }
    }

    pub fn patterns(&self) -> &[Itemset] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The items whose summed pattern weight reaches `min_support`, with that
    /// weight. Sorted by weight descending, then by global order.
    pub fn f_list(&self, min_support: u32, frequent_pattern: &FrequentPattern) -> Vec<(Item, u32)> {
        let mut item_count = ItemCounter::new();
        for pattern in &self.patterns {
            let count = weight(pattern);
            for item in pattern.items() {
                item_count.add(item, count);
            }
        }

        let mut f_list: Vec<(Item, u32)> = item_count
            .items_with_count_at_least(min_support)
            .into_iter()
            .map(|item| (item, item_count.get(&item)))
            .collect();
        f_list.sort_by(|&(a, a_count), &(b, b_count)| {
            b_count.cmp(&a_count).then_with(|| {
                let a_rank = frequent_pattern.rank(&a).unwrap_or(usize::MAX);
                let b_rank = frequent_pattern.rank(&b).unwrap_or(usize::MAX);
                a_rank.cmp(&b_rank)
            })
        });
        f_list
    }

    /// The base conditioned further on `item`: only patterns containing
    /// `item`, each cut down to the items that precede `item` in the global
    /// order. Patterns left empty are dropped.
    pub fn narrow(&self, item: Item, frequent_pattern: &FrequentPattern) -> ConditionalPatternBase {
        let end = match frequent_pattern.rank(&item) {
            Some(rank) => rank,
            None => return ConditionalPatternBase::default(),
        };
        let patterns = self
            .patterns
            .iter()
            .filter(|pattern| pattern.contains(&item))
            .filter_map(|pattern| {
                let prefix: Vec<Item> = pattern
                    .items()
                    .iter()
                    .cloned()
                    .filter(|i| frequent_pattern.rank(i).map_or(false, |rank| rank < end))
                    .collect();
                if prefix.is_empty() {
                    None
                } else {
                    Some(Itemset::new(prefix, weight(pattern)))
                }
            })
            .collect();
        ConditionalPatternBase::new(patterns)
    }
}
