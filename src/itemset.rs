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

use crate::error::{MiningError, Result};
use crate::item::Item;
use crate::itemizer::Itemizer;
use fnv::FnvHashSet;
use itertools::Itertools;
use std::hash::{Hash, Hasher};

/// An ordered list of distinct items with an optional support count.
///
/// Order is significant when building and rendering, but equality and
/// hashing only consider which items are present, so `[a, b]` and `[b, a]`
/// find each other in a lookup table.
#[derive(Clone, Debug)]
pub struct Itemset {
    items: Vec<Item>,
    support: Option<u32>,
}

impl PartialEq for Itemset {
    fn eq(&self, other: &Itemset) -> bool {
        self.len() == other.len() && self.key() == other.key()
    }
}

impl Eq for Itemset {}

impl Hash for Itemset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

fn has_unique_items(items: &[Item]) -> bool {
    items.iter().collect::<FnvHashSet<_>>().len() == items.len()
}

impl Itemset {
    pub fn new(items: Vec<Item>, support: u32) -> Itemset {
        debug_assert!(has_unique_items(&items));
        Itemset {
            items,
            support: Some(support),
        }
    }

    /// An itemset whose support has not been determined.
    pub fn with_items(items: Vec<Item>) -> Itemset {
        debug_assert!(has_unique_items(&items));
        Itemset {
            items,
            support: None,
        }
    }

    pub fn empty() -> Itemset {
        Itemset::with_items(vec![])
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn support(&self) -> Option<u32> {
        self.support
    }

    pub fn set_support(&mut self, support: u32) {
        self.support = Some(support);
    }

    pub fn first(&self) -> Option<Item> {
        self.items.first().cloned()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    /// A new itemset with `item` placed in front of this one's items.
    pub fn extended_front(&self, item: Item, support: u32) -> Itemset {
        debug_assert!(!self.contains(&item));
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend_from_slice(&self.items);
        Itemset::new(items, support)
    }

    /// Splits into the first item and the remaining items, both with
    /// unknown support. None for itemsets with fewer than two items.
    pub fn split_first(&self) -> Option<(Itemset, Itemset)> {
        if self.items.len() < 2 {
            return None;
        }
        let (first, rest) = self.items.split_at(1);
        Some((Itemset::with_items(first.to_vec()), Itemset::with_items(rest.to_vec())))
    }

    /// Items in id order; the identity used for equality and lookup.
    pub fn key(&self) -> Vec<Item> {
        self.items.iter().cloned().sorted().collect()
    }

    /// Renders as `[a, b, c]`; the empty itemset renders as `[]`.
    pub fn render(&self, itemizer: &Itemizer) -> String {
        format!(
            "[{}]",
            self.items.iter().map(|&item| itemizer.str_of(item)).join(", ")
        )
    }

    /// Parses the `render` format back into an itemset with unknown support.
    /// `line` is only used for error reporting.
    pub fn parse(text: &str, itemizer: &mut Itemizer, line: usize) -> Result<Itemset> {
        let text = text.trim();
        if !text.starts_with('[') || !text.ends_with(']') || text.len() < 2 {
            return Err(MiningError::MalformedRecord {
                line,
                reason: format!("itemset '{}' is not enclosed in brackets", text),
            });
        }
        let inner = text[1..text.len() - 1].trim();
        if inner.is_empty() {
            return Ok(Itemset::empty());
        }
        let mut items: Vec<Item> = Vec::new();
        for token in inner.split(',').map(|s| s.trim()) {
            if token.is_empty() {
                return Err(MiningError::MalformedRecord {
                    line,
                    reason: format!("itemset '{}' has an empty item", text),
                });
            }
            let item = itemizer.id_of(token);
            if items.contains(&item) {
                return Err(MiningError::MalformedRecord {
                    line,
                    reason: format!("itemset '{}' repeats item '{}'", text, token),
                });
            }
            items.push(item);
        }
        Ok(Itemset::with_items(items))
    }
}


#[cfg(test)]
mod property_tests {
    use super::Itemset;
    use crate::itemizer::Itemizer;
    use proptest::prelude::*;

    proptest! {
        /// Property: parsing a rendered itemset gives back an equal itemset.
        #[test]
        fn render_parse_round_trip(
            tokens in prop::collection::hash_set("[a-z0-9_]{1,6}", 0..8)
        ) {
            let mut itemizer = Itemizer::new();
            let tokens: Vec<&str> = tokens.iter().map(|s| s.as_str()).collect();
            let itemset = Itemset::with_items(itemizer.to_id_vec(&tokens));
            let rendered = itemset.render(&itemizer);
            let parsed = Itemset::parse(&rendered, &mut itemizer, 1).unwrap();
            prop_assert_eq!(parsed.items(), itemset.items());
            prop_assert_eq!(parsed, itemset);
        }
    }
}
