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
use crate::frequent_pattern::FrequentPattern;
use crate::item::Item;
use crate::itemizer::Itemizer;
use crate::itemset::Itemset;
use fnv::FnvHashMap;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;

/// Support of every known frequent itemset, singletons included, looked up
/// by item-set identity.
#[derive(Debug, Default)]
pub struct ItemsetSupport {
    supports: FnvHashMap<Vec<Item>, u32>,
}

impl ItemsetSupport {
    pub fn new() -> ItemsetSupport {
        ItemsetSupport {
            supports: FnvHashMap::default(),
        }
    }

    /// Builds the table from the singleton supports and groups of frequent
    /// itemsets. Itemsets with unknown support are left out.
    pub fn from_itemsets(frequent_pattern: &FrequentPattern, groups: &[Vec<Itemset>]) -> ItemsetSupport {
        let mut table = ItemsetSupport::new();
        for item in frequent_pattern.items() {
            if let Some(support) = frequent_pattern.support(item) {
                table.insert_singleton(*item, support);
            }
        }
        for itemset in groups.iter().flatten() {
            table.insert(itemset);
        }
        table
    }

    pub fn insert_singleton(&mut self, item: Item, support: u32) {
        self.supports.insert(vec![item], support);
    }

    pub fn insert(&mut self, itemset: &Itemset) {
        if let Some(support) = itemset.support() {
            self.supports.insert(itemset.key(), support);
        }
    }

    pub fn get(&self, itemset: &Itemset) -> Option<u32> {
        self.supports.get(&itemset.key()).cloned()
    }

    pub fn len(&self) -> usize {
        self.supports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }
}

/// `antecedent -> consequent`, where `support` is the support of the union
/// and confidence is `support / support(antecedent)`.
#[derive(Clone, Debug)]
pub struct AssociationRule {
    antecedent: Itemset,
    consequent: Itemset,
    support: u32,
    confidence: f64,
}

impl AssociationRule {
    // Looks up the antecedent's support and scores the rule. A missing or
    // zero antecedent support, or one below the rule's support, means the
    // frequent itemset table is corrupt.
    fn make(
        antecedent: Itemset,
        consequent: Itemset,
        support: u32,
        itemset_support: &ItemsetSupport,
        itemizer: &Itemizer,
    ) -> Result<AssociationRule> {
        let antecedent_support = match itemset_support.get(&antecedent) {
            Some(s) if s > 0 => s,
            _ => {
                return Err(MiningError::MissingSupport {
                    itemset: antecedent.render(itemizer),
                })
            }
        };
        if support > antecedent_support {
            let union = Itemset::with_items(
                antecedent
                    .items()
                    .iter()
                    .chain(consequent.items())
                    .cloned()
                    .collect(),
            );
            return Err(MiningError::InconsistentSupport {
                itemset: union.render(itemizer),
                support,
                subset: antecedent.render(itemizer),
                subset_support: antecedent_support,
            });
        }
        let mut antecedent = antecedent;
        antecedent.set_support(antecedent_support);
        Ok(AssociationRule {
            antecedent,
            consequent,
            support,
            confidence: f64::from(support) / f64::from(antecedent_support),
        })
    }

    pub fn antecedent(&self) -> &Itemset {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Itemset {
        &self.consequent
    }

    pub fn support(&self) -> u32 {
        self.support
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// `[a] -> [b, c]:<support>`
    pub fn to_string(&self, itemizer: &Itemizer) -> String {
        format!(
            "{} -> {}:{}",
            self.antecedent.render(itemizer),
            self.consequent.render(itemizer),
            self.support
        )
    }
}

/// Generates the two rules of every itemset with at least two items: its
/// first item against the rest, in both directions. Rules below
/// `min_confidence` are dropped. The result is sorted by confidence,
/// highest first, then by rendered rule text.
///
/// Fails on the first itemset whose parts can't be looked up in
/// `itemset_support`.
pub fn generate_rules(
    groups: &[Vec<Itemset>],
    itemset_support: &ItemsetSupport,
    min_confidence: f64,
    itemizer: &Itemizer,
) -> Result<Vec<AssociationRule>> {
    let per_group: Vec<Vec<AssociationRule>> = groups
        .par_iter()
        .map(|itemsets| -> Result<Vec<AssociationRule>> {
            let mut rules: Vec<AssociationRule> = vec![];
            for itemset in itemsets {
                let (first, rest) = match itemset.split_first() {
                    Some(split) => split,
                    None => continue,
                };
                let support = match itemset.support() {
                    Some(support) => support,
                    None => {
                        return Err(MiningError::MissingSupport {
                            itemset: itemset.render(itemizer),
                        })
                    }
                };
                let forward = AssociationRule::make(
                    first.clone(),
                    rest.clone(),
                    support,
                    itemset_support,
                    itemizer,
                )?;
                let backward =
                    AssociationRule::make(rest, first, support, itemset_support, itemizer)?;
                rules.extend(
                    vec![forward, backward]
                        .into_iter()
                        .filter(|rule| rule.confidence >= min_confidence),
                );
            }
            Ok(rules)
        })
        .collect::<Result<Vec<Vec<AssociationRule>>>>()?;

    let mut rules: Vec<AssociationRule> = per_group.into_iter().flatten().collect();
    rules.sort_by_cached_key(|rule| {
        (
            Reverse(OrderedFloat(rule.confidence)),
            rule.to_string(itemizer),
        )
    });
    Ok(rules)
}
