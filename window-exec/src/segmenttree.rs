// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! A fanout-`F` segment tree over associative-aggregate states,
//! answering half-open range queries in `O(F log_F P)` instead of the
//! `O(P)` a naive fold would cost per query.

use std::collections::VecDeque;
use std::ops::Range;

use log::debug;
use window_common::Value;

use crate::aggregate::AssociativeAggregate;
use crate::bitset::BitSet;
use crate::indextree;

/// Default fanout used when a caller has no reason to pick another.
pub const DEFAULT_FANOUT: usize = 4;

/// Build the flat array of aggregate states for `leaf_arguments`.
///
/// Traverses bottom-up breadth-first: each node, the first time it is
/// visited, is combined into its parent and the parent is enqueued.
/// `seen` guarantees each interior node is combined into its parent
/// exactly once, even though a fanout-`F` parent would otherwise be
/// reachable from up to `F` children.
fn build<A: AssociativeAggregate>(leaf_arguments: &[Vec<Value>], fanout: usize) -> Vec<A> {
    assert!(fanout >= 2, "fanout must be at least 2, got {fanout}");
    let height = indextree::height_for_leaves(leaf_arguments.len(), fanout);
    let node_count = indextree::node_count(height, fanout);
    debug!(
        "segment tree build: {} leaf(ves), fanout={fanout}, height={height}, {node_count} node slot(s)",
        leaf_arguments.len()
    );
    let mut nodes: Vec<A> = (0..node_count).map(|_| A::default()).collect();

    let leaf_range = indextree::leaves(height, fanout);
    let mut queue: VecDeque<usize> = leaf_range.clone().collect();
    for (leaf_index, args) in leaf_range.zip(leaf_arguments.iter()) {
        nodes[leaf_index].step(args);
    }

    let mut seen = BitSet::with_capacity(node_count);
    while let Some(node) = queue.pop_front() {
        if seen.contains(node) {
            continue;
        }
        seen.insert(node).expect("node index is never negative");
        let parent = indextree::parent(node, fanout);
        if parent == node {
            // Only the single-node tree (one leaf, which is also the
            // root) reaches this; there is nothing left to fold.
            continue;
        }
        let (left, right) = nodes.split_at_mut(node);
        left[parent].combine(&right[0]);
        queue.push_back(parent);
    }
    nodes
}

/// A segment tree for window aggregation over a fixed partition of
/// leaves.
pub struct SegmentTree<A: AssociativeAggregate> {
    levels: Vec<Range<usize>>,
    nodes: Vec<A>,
    fanout: usize,
    leaf_count: usize,
}

impl<A: AssociativeAggregate> SegmentTree<A> {
    pub fn new(leaf_arguments: &[Vec<Value>], fanout: usize) -> Self {
        let height = indextree::height_for_leaves(leaf_arguments.len(), fanout);
        let levels = (0..height)
            .map(|level| indextree::first_node(level, fanout)..indextree::last_node(level, fanout))
            .collect();
        SegmentTree {
            levels,
            nodes: build(leaf_arguments, fanout),
            fanout,
            leaf_count: leaf_arguments.len(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Aggregate the half-open range `[begin, end)` of leaves using the
    /// Leis ascent: walk the tree bottom-up, each level folding in only
    /// the partial buckets at the range's edges, until the range
    /// collapses into a single parent bucket.
    pub fn query(&self, begin: usize, end: usize) -> Option<Value> {
        assert!(begin <= end && end <= self.leaf_count, "invalid range [{begin}, {end})");
        if begin == end {
            return A::default().finalize();
        }

        let fanout = self.fanout;
        let mut aggregate = A::default();
        let (mut begin, mut end) = (begin, end);

        for level in self.levels.iter().rev() {
            let mut parent_begin = begin / fanout;
            let parent_end = end / fanout;
            if parent_begin == parent_end {
                self.fold_range(level, begin, end, &mut aggregate);
                return aggregate.finalize();
            }

            let group_begin = parent_begin * fanout;
            if begin != group_begin {
                self.fold_range(level, begin, group_begin + fanout, &mut aggregate);
                parent_begin += 1;
            }
            let group_end = parent_end * fanout;
            if end != group_end {
                self.fold_range(level, group_end, end, &mut aggregate);
            }
            begin = parent_begin;
            end = parent_end;
        }
        unreachable!("a valid [begin, end) range always collapses before the root level")
    }

    fn fold_range(&self, level: &Range<usize>, begin: usize, end: usize, aggregate: &mut A) {
        let start = level.start + begin;
        let stop = level.start + end;
        for node in &self.nodes[start..stop] {
            aggregate.combine(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rstest::rstest;

    use super::*;
    use crate::aggregate::associative::{Count, Max, Min, Sum};

    fn leaves(values: &[i64]) -> Vec<Vec<Value>> {
        values.iter().map(|v| vec![Value::Int(*v)]).collect()
    }

    fn naive_sum(values: &[i64], begin: usize, end: usize) -> Option<Value> {
        let mut agg = Sum::default();
        for v in &values[begin..end] {
            agg.step(&[Value::Int(*v)]);
        }
        agg.finalize()
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    fn query_matches_naive_fold_for_every_fanout(#[case] fanout: usize) {
        let values: Vec<i64> = (1..=20).collect();
        let tree: SegmentTree<Sum> = SegmentTree::new(&leaves(&values), fanout);
        for begin in 0..values.len() {
            for end in begin..=values.len() {
                assert_eq!(
                    tree.query(begin, end),
                    naive_sum(&values, begin, end),
                    "fanout={fanout} begin={begin} end={end}"
                );
            }
        }
    }

    /// Property from the testable-properties list: query must agree with
    /// a naive fold over many random leaf sequences and random fanouts,
    /// not just the fixed fixtures above.
    #[test]
    fn query_matches_naive_fold_for_random_leaf_sequences() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(0usize..30);
            let values: Vec<i64> = (0..len).map(|_| rng.gen_range(-100i64..100)).collect();
            let fanout = [2usize, 3, 4, 5][rng.gen_range(0usize..4)];
            let tree: SegmentTree<Sum> = SegmentTree::new(&leaves(&values), fanout);
            let begin = rng.gen_range(0..=len);
            let end = rng.gen_range(begin..=len);
            assert_eq!(
                tree.query(begin, end),
                naive_sum(&values, begin, end),
                "len={len} fanout={fanout} begin={begin} end={end}"
            );
        }
    }

    #[test]
    fn empty_range_is_identity_finalize() {
        let tree: SegmentTree<Sum> = SegmentTree::new(&leaves(&[1, 2, 3]), DEFAULT_FANOUT);
        assert_eq!(tree.query(1, 1), Sum::default().finalize());
    }

    #[test]
    fn full_range_query_equals_root() {
        let tree: SegmentTree<Count> = SegmentTree::new(&leaves(&[1, 2, 3, 4, 5]), 2);
        assert_eq!(tree.query(0, 5), Some(Value::Int(5)));
    }

    #[test]
    fn sum_fanout_two_three_leaves_matches_documented_shape() {
        // Sum, fanout=2, leaves (1,), (2,), (3,): root total=6; left
        // child covers leaves 0..2 (total=3, count=2); right child
        // covers leaf 2 and an empty identity slot (total=3, count=1).
        let tree: SegmentTree<Sum> = SegmentTree::new(&leaves(&[1, 2, 3]), 2);
        assert_eq!(tree.query(0, 3), Some(Value::float(6.0)));
        assert_eq!(tree.query(0, 2), Some(Value::float(3.0)));
        assert_eq!(tree.query(2, 3), Some(Value::float(3.0)));
    }

    #[test]
    fn min_and_max_over_full_range() {
        let values = [5, 1, 9, 2, 7];
        let min_tree: SegmentTree<Min> = SegmentTree::new(&leaves(&values), 3);
        let max_tree: SegmentTree<Max> = SegmentTree::new(&leaves(&values), 3);
        assert_eq!(min_tree.query(0, 5), Some(Value::Int(1)));
        assert_eq!(max_tree.query(0, 5), Some(Value::Int(9)));
    }

    #[test]
    fn build_is_deterministic() {
        let values: Vec<i64> = (0..17).collect();
        let a: SegmentTree<Sum> = SegmentTree::new(&leaves(&values), 4);
        let b: SegmentTree<Sum> = SegmentTree::new(&leaves(&values), 4);
        assert_eq!(a.query(0, 17), b.query(0, 17));
        assert_eq!(a.query(3, 11), b.query(3, 11));
    }
}
