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
use fnv::FnvHashSet;

/// Dense per-item counter, indexed by item id.
#[derive(Clone, Debug, Default)]
pub struct ItemCounter {
    counter: Vec<u32>,
}

impl ItemCounter {
    pub fn new() -> ItemCounter {
        ItemCounter { counter: vec![] }
    }

    /// Counts the number of transactions each item appears in. An item
    /// repeated within one transaction is counted once for it.
    pub fn from_transactions<'a, I>(transactions: I) -> ItemCounter
    where
        I: IntoIterator<Item = &'a Vec<Item>>,
    {
        let mut item_count = ItemCounter::new();
        let mut seen: FnvHashSet<Item> = FnvHashSet::default();
        for transaction in transactions {
            seen.clear();
            for item in transaction {
                if seen.insert(*item) {
                    item_count.add(item, 1);
                }
            }
        }
        item_count
    }

    pub fn add(&mut self, item: &Item, count: u32) {
        let index = item.as_index();
        if self.counter.len() <= index {
            self.counter.resize(index + 1, 0);
        }
        self.counter[index] += count;
    }

    pub fn get(&self, item: &Item) -> u32 {
        let index = item.as_index();
        if index >= self.counter.len() {
            0
        } else {
            self.counter[index]
        }
    }

    /// Items with a non-zero count of at least `min_count`, in id order.
    pub fn items_with_count_at_least(&self, min_count: u32) -> Vec<Item> {
        let mut v: Vec<Item> = vec![];
        for i in 1..self.counter.len() {
            let count = self.counter[i];
            if count > 0 && count >= min_count {
                v.push(Item::with_id(i as u32));
            }
        }
        v
    }
}
