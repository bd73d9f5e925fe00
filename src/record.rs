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

// Text records handed from the miner to the rule pass, and from the rule
// pass to the output file.
//
// Frequent itemsets: one line per mined item, made of `[i1, i2]:<support>;`
// segments. An unknown support is written as -1.
// Rules: `[antecedent] -> [consequent]:<support>\t<confidence>`.

use crate::error::{MiningError, Result};
use crate::fpgrowth::MinedItem;
use crate::generate_rules::AssociationRule;
use crate::itemizer::Itemizer;
use crate::itemset::Itemset;
use std::io::{BufRead, Write};

pub fn render_frequent_itemsets_line(itemsets: &[Itemset], itemizer: &Itemizer) -> String {
    let mut line = String::new();
    for itemset in itemsets {
        let support = itemset.support().map_or(-1, i64::from);
        line.push_str(&format!("{}:{};", itemset.render(itemizer), support));
    }
    line
}

pub fn parse_frequent_itemsets_line(
    line: &str,
    line_number: usize,
    itemizer: &mut Itemizer,
) -> Result<Vec<Itemset>> {
    let mut itemsets: Vec<Itemset> = vec![];
    for segment in line.split(';').map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let mut parts = segment.rsplitn(2, ':');
        let support_text = parts.next().unwrap_or("");
        let itemset_text = match parts.next() {
            Some(text) => text,
            None => {
                return Err(MiningError::MalformedRecord {
                    line: line_number,
                    reason: format!("segment '{}' has no support", segment),
                })
            }
        };
        let support: i64 = support_text.trim().parse().map_err(|_| MiningError::MalformedRecord {
            line: line_number,
            reason: format!("segment '{}' has a non-numeric support", segment),
        })?;
        let mut itemset = Itemset::parse(itemset_text, itemizer, line_number)?;
        if support >= 0 {
            if support > i64::from(u32::max_value()) {
                return Err(MiningError::MalformedRecord {
                    line: line_number,
                    reason: format!("segment '{}' has an out of range support", segment),
                });
            }
            itemset.set_support(support as u32);
        } else if support != -1 {
            return Err(MiningError::MalformedRecord {
                line: line_number,
                reason: format!("segment '{}' has a negative support", segment),
            });
        }
        itemsets.push(itemset);
    }
    Ok(itemsets)
}

/// Writes one line per mined item.
pub fn write_frequent_itemsets<W: Write>(
    output: &mut W,
    mined: &[MinedItem],
    itemizer: &Itemizer,
) -> Result<()> {
    for mined_item in mined.iter().filter(|m| !m.itemsets.is_empty()) {
        writeln!(
            output,
            "{}",
            render_frequent_itemsets_line(&mined_item.itemsets, itemizer)
        )?;
    }
    Ok(())
}

/// Reads back what `write_frequent_itemsets` wrote, one group per line.
/// Blank lines are skipped; any malformed segment fails the whole read.
pub fn read_frequent_itemsets<R: BufRead>(
    input: R,
    itemizer: &mut Itemizer,
) -> Result<Vec<Vec<Itemset>>> {
    let mut groups: Vec<Vec<Itemset>> = vec![];
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        groups.push(parse_frequent_itemsets_line(&line, index + 1, itemizer)?);
    }
    Ok(groups)
}

pub fn render_rule(rule: &AssociationRule, itemizer: &Itemizer) -> String {
    format!("{}\t{}", rule.to_string(itemizer), rule.confidence())
}

pub fn write_rules<W: Write>(
    output: &mut W,
    rules: &[AssociationRule],
    itemizer: &Itemizer,
) -> Result<()> {
    for rule in rules {
        writeln!(output, "{}", render_rule(rule, itemizer))?;
    }
    Ok(())
}
