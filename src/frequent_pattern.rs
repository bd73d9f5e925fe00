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

use crate::item::Item;
use crate::item_counter::ItemCounter;
use crate::itemizer::Itemizer;
use itertools::Itertools;

/// The global order of frequent items: support descending, ties broken by
/// the item's token in lexical order. Read-only once built.
pub struct FrequentPattern {
    order: Vec<Item>,
    ranks: Vec<Option<usize>>,
    supports: ItemCounter,
}

impl FrequentPattern {
    pub fn new(item_count: &ItemCounter, min_support: u32, itemizer: &Itemizer) -> FrequentPattern {
        let mut order = item_count.items_with_count_at_least(min_support);
        order.sort_by(|a, b| {
            item_count
                .get(b)
                .cmp(&item_count.get(a))
                .then_with(|| itemizer.str_of(*a).cmp(itemizer.str_of(*b)))
        });

        let mut ranks: Vec<Option<usize>> = vec![];
        let mut supports = ItemCounter::new();
        for (rank, item) in order.iter().enumerate() {
            let index = item.as_index();
            if index >= ranks.len() {
                ranks.resize(index + 1, None);
            }
            ranks[index] = Some(rank);
            supports.add(item, item_count.get(item));
        }

        FrequentPattern {
            order,
            ranks,
            supports,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `item` in the global order, or None if it's infrequent.
    pub fn rank(&self, item: &Item) -> Option<usize> {
        self.ranks.get(item.as_index()).cloned().flatten()
    }

    /// Singleton support of a frequent item.
    pub fn support(&self, item: &Item) -> Option<u32> {
        self.rank(item).map(|_| self.supports.get(item))
    }

    /// Reduces a raw transaction to its frequent items, deduplicated and
    /// emitted in global order. An empty result must not be inserted.
    pub fn project(&self, transaction: &[Item]) -> Vec<Item> {
        transaction
            .iter()
            .filter_map(|item| self.rank(item).map(|rank| (rank, *item)))
            .sorted()
            .dedup()
            .map(|(_, item)| item)
            .collect()
    }
}
