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
use crate::item::Item;
use crate::itemset::Itemset;
use rayon::prelude::*;

/// One item's accumulated occurrence along one prefix path. Parent, child
/// and node-link references are ids into the owning tree's arena.
#[derive(Debug)]
pub struct FPNode {
    id: usize,
    item: Item,
    count: u32,
    children: Vec<usize>,
    parent: Option<usize>,
    next: Option<usize>,
}

impl FPNode {
    fn new(id: usize, item: Item, parent: Option<usize>) -> FPNode {
        FPNode {
            id,
            item,
            count: 0,
            children: Vec::with_capacity(1),
            parent,
            next: None,
        }
    }

    pub fn item(&self) -> Item {
        self.item
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Head and tail of every item's node-link chain, indexed by item id.
/// Chains only grow at the tail, so chain order is node creation order.
#[derive(Debug, Default)]
pub struct NodeLinkTable {
    heads: Vec<Option<usize>>,
    tails: Vec<Option<usize>>,
}

impl NodeLinkTable {
    fn new() -> NodeLinkTable {
        NodeLinkTable {
            heads: vec![],
            tails: vec![],
        }
    }

    // Records `id` as the new tail of `item`'s chain, and returns the
    // previous tail, which must be linked to `id`.
    fn append(&mut self, item: Item, id: usize) -> Option<usize> {
        let index = item.as_index();
        if index >= self.heads.len() {
            self.heads.resize(index + 1, None);
            self.tails.resize(index + 1, None);
        }
        if self.heads[index].is_none() {
            self.heads[index] = Some(id);
        }
        self.tails[index].replace(id)
    }

    pub fn head(&self, item: &Item) -> Option<usize> {
        self.heads.get(item.as_index()).cloned().flatten()
    }

    /// Items with a non-empty chain, in id order.
    #[cfg(test)]
    pub fn items(&self) -> Vec<Item> {
        self.heads
            .iter()
            .enumerate()
            .filter(|(_, head)| head.is_some())
            .map(|(index, _)| Item::with_id(index as u32))
            .collect()
    }
}

pub struct FPTree {
    nodes: Vec<Vec<FPNode>>,
    next_node_id: usize,
    node_links: NodeLinkTable,
    num_transactions: u32,
}

static FPTREE_SPLAY: usize = 32;

/// Walks one item's node-link chain.
pub struct NodeLinkChain<'a> {
    tree: &'a FPTree,
    next: Option<usize>,
}

impl<'a> Iterator for NodeLinkChain<'a> {
    type Item = &'a FPNode;
    fn next(&mut self) -> Option<&'a FPNode> {
        let node = self.tree.get_node(self.next?);
        self.next = node.next;
        Some(node)
    }
}

impl FPTree {
    pub fn new() -> FPTree {
        let mut tree = FPTree {
            nodes: vec![],
            next_node_id: 0,
            node_links: NodeLinkTable::new(),
            num_transactions: 0,
        };
        // Add root.
        tree.add_node(None, Item::null());
        tree
    }

    /// Builds a tree from grouped projected transactions. Groups are inserted
    /// into per-worker partial trees which are then merged.
    pub fn build_parallel(transactions: &[(Vec<Item>, u32)]) -> FPTree {
        transactions
            .par_iter()
            .fold(FPTree::new, |mut tree, (items, count)| {
                tree.insert(items, *count);
                tree
            })
            .reduce(FPTree::new, FPTree::merge)
    }

    fn add_node(&mut self, parent: Option<usize>, item: Item) -> usize {
        let id = self.next_node_id;
        self.next_node_id += 1;
        let (cohort, element) = self.sub_indicies_of(id);
        // Should only be at most 1 element too small.
        debug_assert!(cohort <= self.nodes.len());
        if self.nodes.len() <= cohort {
            self.nodes.push(Vec::with_capacity(FPTREE_SPLAY));
        }
        debug_assert_eq!(element, self.nodes[cohort].len());
        self.nodes[cohort].push(FPNode::new(id, item, parent));
        if let Some(parent) = parent {
            self.get_node_mut(parent).children.push(id);
            if let Some(tail) = self.node_links.append(item, id) {
                self.get_node_mut(tail).next = Some(id);
            }
        }
        id
    }

    fn sub_indicies_of(&self, id: usize) -> (usize, usize) {
        (id / FPTREE_SPLAY, id % FPTREE_SPLAY)
    }

    fn get_node_mut(&mut self, id: usize) -> &mut FPNode {
        let (cohort, index) = self.sub_indicies_of(id);
        &mut self.nodes[cohort][index]
    }

    pub fn get_node(&self, id: usize) -> &FPNode {
        let (cohort, index) = self.sub_indicies_of(id);
        &self.nodes[cohort][index]
    }

    pub fn root(&self) -> &FPNode {
        self.get_node(0)
    }

    pub fn child_of(&self, id: usize, item: Item) -> Option<usize> {
        for &node_id in &self.get_node(id).children {
            if self.get_node(node_id).item == item {
                return Some(node_id);
            }
        }
        None
    }

    #[cfg(test)]
    pub fn children_of(&self, id: usize) -> impl Iterator<Item = &FPNode> {
        self.get_node(id)
            .children
            .iter()
            .map(move |&child| self.get_node(child))
    }

    fn insert_child(&mut self, id: usize, item: Item, count: u32) -> usize {
        let child_id = match self.child_of(id, item) {
            Some(child_id) => child_id,
            None => self.add_node(Some(id), item),
        };
        self.get_node_mut(child_id).count += count;
        child_id
    }

    /// Inserts a projected transaction `count` times. Items must be distinct
    /// and in global order. Inserting an empty transaction is a no-op.
    pub fn insert(&mut self, transaction: &[Item], count: u32) {
        if transaction.is_empty() {
            return;
        }
        self.num_transactions += count;
        // Start iterating at the root node.
        let mut id = 0;
        for &item in transaction {
            debug_assert!(!item.is_null());
            id = self.insert_child(id, item, count);
        }
    }

    /// Merges `other` into this tree: children are matched by item, counts
    /// summed, and new nodes appended to their node-link chains.
    pub fn merge(self, other: FPTree) -> FPTree {
        let (mut into, from) = if self.num_nodes() >= other.num_nodes() {
            (self, other)
        } else {
            (other, self)
        };
        into.merge_subtree(0, &from, 0);
        into.num_transactions += from.num_transactions;
        into
    }

    fn merge_subtree(&mut self, id: usize, other: &FPTree, other_id: usize) {
        for &other_child_id in &other.get_node(other_id).children {
            let other_child = other.get_node(other_child_id);
            let child_id = self.insert_child(id, other_child.item, other_child.count);
            self.merge_subtree(child_id, other, other_child_id);
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.next_node_id
    }

    pub fn num_transactions(&self) -> u32 {
        self.num_transactions
    }

    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    pub fn node_links(&self) -> &NodeLinkTable {
        &self.node_links
    }

    pub fn node_link_chain(&self, item: Item) -> NodeLinkChain<'_> {
        NodeLinkChain {
            tree: self,
            next: self.node_links.head(&item),
        }
    }

    /// Sum of node counts along `item`'s chain; its support in the tree.
    pub fn chain_support(&self, item: Item) -> u32 {
        self.node_link_chain(item).map(|node| node.count).sum()
    }

    /// Collects the weighted prefix path above every occurrence of `item`.
    /// Occurrences directly under the root contribute no pattern.
    pub fn conditional_pattern_base(&self, item: Item) -> ConditionalPatternBase {
        let mut patterns: Vec<Itemset> = vec![];
        for node in self.node_link_chain(item) {
            let path = self.path_from_root_to_excluding(node.id);
            if !path.is_empty() {
                patterns.push(Itemset::new(path, node.count));
            }
        }
        ConditionalPatternBase::new(patterns)
    }

    fn path_from_root_to_excluding(&self, node_id: usize) -> Vec<Item> {
        let mut path = vec![];
        let mut id = self.get_node(node_id).parent;
        while let Some(parent_id) = id {
            let node = self.get_node(parent_id);
            if node.is_root() {
                break;
            }
            path.push(node.item);
            id = node.parent;
        }
        path.reverse();
        path
    }
}

impl Default for FPTree {
    fn default() -> FPTree {
        FPTree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::FPTree;
    use crate::item::Item;
    use crate::itemizer::Itemizer;

    fn build(itemizer: &mut Itemizer, transactions: &[&[&str]]) -> FPTree {
        let mut tree = FPTree::new();
        for transaction in transactions {
            tree.insert(&itemizer.to_id_vec(transaction), 1);
        }
        tree
    }

    #[test]
    fn test_insert_shares_prefixes() {
        let mut itemizer = Itemizer::new();
        let tree = build(
            &mut itemizer,
            &[&["a", "b", "c"], &["a", "b"], &["a", "c"], &["a"], &["b", "c"]],
        );
        // root, a, a-b, a-b-c, a-c, b, b-c
        assert_eq!(tree.num_nodes(), 7);
        assert_eq!(tree.num_transactions(), 5);

        let a = itemizer.id_of("a");
        let b = itemizer.id_of("b");
        let c = itemizer.id_of("c");
        assert_eq!(tree.node_link_chain(a).count(), 1);
        assert_eq!(tree.chain_support(a), 4);
        assert_eq!(tree.node_link_chain(b).count(), 2);
        assert_eq!(tree.chain_support(b), 3);
        assert_eq!(tree.chain_support(c), 3);

        // Chain order follows node creation order.
        let c_counts: Vec<u32> = tree.node_link_chain(c).map(|n| n.count()).collect();
        assert_eq!(c_counts, vec![1, 1, 1]);
        let b_counts: Vec<u32> = tree.node_link_chain(b).map(|n| n.count()).collect();
        assert_eq!(b_counts, vec![2, 1]);
        assert_eq!(tree.node_links().items(), vec![a, b, c]);
    }

    #[test]
    fn test_insert_with_count() {
        let mut itemizer = Itemizer::new();
        let mut tree = FPTree::new();
        tree.insert(&itemizer.to_id_vec(&["x", "y"]), 3);
        tree.insert(&itemizer.to_id_vec(&["x"]), 2);
        tree.insert(&[], 7);
        assert_eq!(tree.num_transactions(), 5);
        assert_eq!(tree.chain_support(itemizer.id_of("x")), 5);
        assert_eq!(tree.chain_support(itemizer.id_of("y")), 3);
        assert_eq!(tree.chain_support(Item::with_id(99)), 0);
    }

    #[test]
    fn test_conditional_pattern_base() {
        let mut itemizer = Itemizer::new();
        let tree = build(
            &mut itemizer,
            &[&["a", "b", "c"], &["a", "b"], &["a", "c"], &["a"], &["b", "c"]],
        );
        let base = tree.conditional_pattern_base(itemizer.id_of("c"));
        let patterns: Vec<(Vec<Item>, Option<u32>)> = base
            .patterns()
            .iter()
            .map(|p| (p.items().to_vec(), p.support()))
            .collect();
        assert_eq!(
            patterns,
            vec![
                (itemizer.to_id_vec(&["a", "b"]), Some(1)),
                (itemizer.to_id_vec(&["a"]), Some(1)),
                (itemizer.to_id_vec(&["b"]), Some(1)),
            ]
        );
        // Only occurrence of a is directly under the root.
        assert!(tree.conditional_pattern_base(itemizer.id_of("a")).is_empty());
    }

    #[test]
    fn test_merge() {
        let mut itemizer = Itemizer::new();
        let left = build(&mut itemizer, &[&["a", "b"], &["a", "c"]]);
        let right = build(&mut itemizer, &[&["a", "b", "c"], &["b", "c"]]);
        let whole = build(
            &mut itemizer,
            &[&["a", "b"], &["a", "c"], &["a", "b", "c"], &["b", "c"]],
        );
        let merged = left.merge(right);
        assert_eq!(merged.num_nodes(), whole.num_nodes());
        assert_eq!(merged.num_transactions(), 4);
        for item in whole.node_links().items() {
            assert_eq!(merged.chain_support(item), whole.chain_support(item));
            assert_eq!(
                merged.node_link_chain(item).count(),
                whole.node_link_chain(item).count()
            );
        }
        let a = itemizer.id_of("a");
        let a_node = merged.child_of(0, a).unwrap();
        assert_eq!(merged.get_node(a_node).count(), 3);
        assert_eq!(merged.children_of(a_node).count(), 2);
    }

    #[test]
    fn test_build_parallel() {
        let mut itemizer = Itemizer::new();
        let groups = vec![
            (itemizer.to_id_vec(&["a", "b"]), 2),
            (itemizer.to_id_vec(&["a"]), 1),
            (itemizer.to_id_vec(&["b", "c"]), 4),
        ];
        let tree = FPTree::build_parallel(&groups);
        assert_eq!(tree.num_transactions(), 7);
        assert_eq!(tree.chain_support(itemizer.id_of("a")), 3);
        assert_eq!(tree.chain_support(itemizer.id_of("b")), 6);
        assert_eq!(tree.chain_support(itemizer.id_of("c")), 4);
        assert!(FPTree::build_parallel(&[]).is_empty());
    }
}
