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

use crate::config::MiningConfig;
use crate::error::Result;
use crate::fpgrowth::{fp_growth, MinedItem};
use crate::fptree::FPTree;
use crate::frequent_pattern::FrequentPattern;
use crate::generate_rules::{generate_rules, AssociationRule, ItemsetSupport};
use crate::item::Item;
use crate::item_counter::ItemCounter;
use crate::itemizer::Itemizer;
use crate::itemset::Itemset;
use crate::record::read_frequent_itemsets;
use crate::transaction_reader::TransactionReader;
use fnv::FnvHashMap;
use log::info;
use std::io::BufRead;
use std::time::Instant;

pub struct MiningOutput {
    pub frequent_pattern: FrequentPattern,
    pub mined: Vec<MinedItem>,
    /// Raw lines skipped as malformed.
    pub malformed: usize,
}

/// Accumulates projected transactions into (projection, multiplicity)
/// groups. Transactions with no frequent items are dropped.
#[derive(Default)]
pub struct ProjectedTransactions {
    counts: FnvHashMap<Vec<Item>, u32>,
}

impl ProjectedTransactions {
    pub fn new() -> ProjectedTransactions {
        ProjectedTransactions {
            counts: FnvHashMap::default(),
        }
    }

    pub fn add(&mut self, frequent_pattern: &FrequentPattern, transaction: &[Item]) {
        let projected = frequent_pattern.project(transaction);
        if projected.is_empty() {
            return;
        }
        *self.counts.entry(projected).or_insert(0) += 1;
    }

    /// The groups in a stable order.
    pub fn into_groups(self) -> Vec<(Vec<Item>, u32)> {
        let mut groups: Vec<(Vec<Item>, u32)> = self.counts.into_iter().collect();
        groups.sort();
        groups
    }
}

/// Mines frequent itemsets from in-memory transactions.
pub fn mine_transactions(
    transactions: &[Vec<Item>],
    itemizer: &Itemizer,
    config: &MiningConfig,
) -> Result<MiningOutput> {
    let item_count = ItemCounter::from_transactions(transactions);
    let frequent_pattern = FrequentPattern::new(&item_count, config.min_support(), itemizer);

    let mut projected = ProjectedTransactions::new();
    for transaction in transactions {
        projected.add(&frequent_pattern, transaction);
    }
    let fptree = FPTree::build_parallel(&projected.into_groups());

    let mined = mine_tree(&fptree, &frequent_pattern, config);
    Ok(MiningOutput {
        frequent_pattern,
        mined,
        malformed: 0,
    })
}

/// Mines frequent itemsets from a transaction file, reading it twice: once
/// to count item supports and once to build the tree.
pub fn mine_file(path: &str, itemizer: &mut Itemizer, config: &MiningConfig) -> Result<MiningOutput> {
    info!("Making first pass of dataset to count item frequencies...");
    let timer = Instant::now();
    let (item_count, malformed) = {
        let mut reader = TransactionReader::open(path, itemizer, config.offset())?;
        let mut item_count = ItemCounter::new();
        for transaction in reader.by_ref() {
            for item in transaction? {
                item_count.add(&item, 1);
            }
        }
        (item_count, reader.malformed_count())
    };
    if malformed > 0 {
        info!("Skipped {} malformed lines.", malformed);
    }
    info!("First pass took {} seconds.", timer.elapsed().as_secs());

    let frequent_pattern = FrequentPattern::new(&item_count, config.min_support(), itemizer);
    info!(
        "Found {} items with support at least {}.",
        frequent_pattern.len(),
        config.min_support()
    );

    info!("Building FPTree based on item frequencies...");
    let timer = Instant::now();
    let mut projected = ProjectedTransactions::new();
    for transaction in TransactionReader::open(path, itemizer, config.offset())? {
        projected.add(&frequent_pattern, &transaction?);
    }
    let fptree = FPTree::build_parallel(&projected.into_groups());
    info!(
        "Building FPTree of {} nodes from {} transactions took {} seconds.",
        fptree.num_nodes(),
        fptree.num_transactions(),
        timer.elapsed().as_secs()
    );

    let mined = mine_tree(&fptree, &frequent_pattern, config);
    Ok(MiningOutput {
        frequent_pattern,
        mined,
        malformed,
    })
}

fn mine_tree(
    fptree: &FPTree,
    frequent_pattern: &FrequentPattern,
    config: &MiningConfig,
) -> Vec<MinedItem> {
    info!("Starting recursive FPGrowth...");
    let timer = Instant::now();
    let mined = fp_growth(fptree, frequent_pattern, config.min_support());
    info!(
        "FPGrowth generated {} frequent itemsets in {} seconds.",
        mined.iter().map(|m| m.itemsets.len()).sum::<usize>(),
        timer.elapsed().as_secs()
    );
    mined
}

/// Rule pass over itemsets still held in memory.
pub fn generate_rules_from_mined(
    mined: &[MinedItem],
    frequent_pattern: &FrequentPattern,
    itemizer: &Itemizer,
    config: &MiningConfig,
) -> Result<Vec<AssociationRule>> {
    let groups: Vec<Vec<Itemset>> = mined.iter().map(|m| m.itemsets.clone()).collect();
    rules_for_groups(&groups, frequent_pattern, itemizer, config)
}

/// Rule pass over persisted frequent-itemset records, as written by
/// `record::write_frequent_itemsets`. Singleton supports come from
/// `frequent_pattern`; every other support comes from the records.
pub fn generate_rules_from_itemsets<R: BufRead>(
    input: R,
    frequent_pattern: &FrequentPattern,
    itemizer: &mut Itemizer,
    config: &MiningConfig,
) -> Result<Vec<AssociationRule>> {
    let groups = read_frequent_itemsets(input, itemizer)?;
    info!("Read {} frequent itemset records.", groups.len());
    rules_for_groups(&groups, frequent_pattern, itemizer, config)
}

fn rules_for_groups(
    groups: &[Vec<Itemset>],
    frequent_pattern: &FrequentPattern,
    itemizer: &Itemizer,
    config: &MiningConfig,
) -> Result<Vec<AssociationRule>> {
    info!("Generating rules...");
    let timer = Instant::now();
    let itemset_support = ItemsetSupport::from_itemsets(frequent_pattern, groups);
    let rules = generate_rules(groups, &itemset_support, config.min_confidence(), itemizer)?;
    info!(
        "Generated {} rules in {} seconds.",
        rules.len(),
        timer.elapsed().as_secs()
    );
    Ok(rules)
}
