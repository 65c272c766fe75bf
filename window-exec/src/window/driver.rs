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

//! The window driver (C7): partitions rows, sorts each partition by its
//! order key, builds the aggregator the function calls for, and emits one
//! result per input row in the row stream's original order.

use indexmap::IndexMap;
use log::debug;

use window_common::{compare_key_tuples, PartitionKey, Result, Row, Value, WindowError};

use crate::aggregate::associative as assoc;
use crate::aggregate::AssociativeAggregate;
use crate::navigation::{self, NavigationAggregator};
use crate::ranking::{self, RankingAggregator};
use crate::segmenttree::SegmentTree;

use super::frame;
use super::{AggregatorPath, WindowExpr, WindowFunction};

/// Type-erases a `SegmentTree<A>` behind a single object-safe query method
/// so the driver can hold one aggregator per partition regardless of which
/// concrete associative aggregate the window function picked.
trait RangeQuery {
    fn query_range(&self, begin: usize, end: usize) -> Option<Value>;
}

impl<A: AssociativeAggregate> RangeQuery for SegmentTree<A> {
    fn query_range(&self, begin: usize, end: usize) -> Option<Value> {
        self.query(begin, end)
    }
}

enum PartitionAggregator {
    Associative(Box<dyn RangeQuery>),
    Navigation(NavigationAggregator),
    Ranking(RankingAggregator),
}

impl PartitionAggregator {
    /// Called exactly once per partition row, in sorted order, matching
    /// the monotonic-cursor invariant navigation and ranking aggregators
    /// document. The associative path ignores call order entirely: a
    /// segment-tree query is a pure function of `(begin, end)`.
    fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        match self {
            PartitionAggregator::Associative(tree) => tree.query_range(begin, end),
            PartitionAggregator::Navigation(nav) => nav.execute(begin, end),
            PartitionAggregator::Ranking(rank) => Some(rank.execute()),
        }
    }
}

/// Build the segment tree for one of the associative [`WindowFunction`]
/// variants. Returns [`WindowError::UnsupportedOperation`] if `function`
/// does not name an associative aggregate — the segment-tree path is not
/// reachable for navigation or ranking functions through any other route
/// in this driver, but a caller resolving a function dynamically (e.g.
/// via [`WindowFunction::parse`]) can still ask for it by mistake.
fn associative_aggregator(
    function: WindowFunction,
    fanout: usize,
    leaf_arguments: &[Vec<Value>],
) -> Result<Box<dyn RangeQuery>> {
    use WindowFunction::*;
    let tree: Box<dyn RangeQuery> = match function {
        Count => Box::new(SegmentTree::<assoc::Count>::new(leaf_arguments, fanout)),
        Sum => Box::new(SegmentTree::<assoc::Sum>::new(leaf_arguments, fanout)),
        Total => Box::new(SegmentTree::<assoc::Total>::new(leaf_arguments, fanout)),
        Mean => Box::new(SegmentTree::<assoc::Mean>::new(leaf_arguments, fanout)),
        Min => Box::new(SegmentTree::<assoc::Min>::new(leaf_arguments, fanout)),
        Max => Box::new(SegmentTree::<assoc::Max>::new(leaf_arguments, fanout)),
        SampleCovariance => {
            Box::new(SegmentTree::<assoc::SampleCovariance>::new(leaf_arguments, fanout))
        }
        PopulationCovariance => {
            Box::new(SegmentTree::<assoc::PopulationCovariance>::new(leaf_arguments, fanout))
        }
        SampleVariance => Box::new(SegmentTree::<assoc::SampleVariance>::new(leaf_arguments, fanout)),
        PopulationVariance => {
            Box::new(SegmentTree::<assoc::PopulationVariance>::new(leaf_arguments, fanout))
        }
        SampleStddev => Box::new(SegmentTree::<assoc::SampleStddev>::new(leaf_arguments, fanout)),
        PopulationStddev => {
            Box::new(SegmentTree::<assoc::PopulationStddev>::new(leaf_arguments, fanout))
        }
        other => return Err(WindowError::UnsupportedOperation(other.name().to_string())),
    };
    Ok(tree)
}

/// The `i`-th argument column, transposed out of the per-row
/// `leaf_arguments` so navigation aggregators can own a flat `Vec<Value>`
/// per column rather than per row.
fn column(leaf_arguments: &[Vec<Value>], i: usize) -> Vec<Value> {
    leaf_arguments.iter().map(|row| row[i].clone()).collect()
}

fn navigation_aggregator(function: WindowFunction, leaf_arguments: &[Vec<Value>]) -> NavigationAggregator {
    use WindowFunction::*;
    match function {
        First => NavigationAggregator::First(navigation::First::new(column(leaf_arguments, 0))),
        Last => NavigationAggregator::Last(navigation::Last::new(column(leaf_arguments, 0))),
        Nth => NavigationAggregator::Nth(navigation::Nth::new(
            column(leaf_arguments, 0),
            column(leaf_arguments, 1),
        )),
        Lead => NavigationAggregator::Lead(navigation::Lead::new(
            column(leaf_arguments, 0),
            column(leaf_arguments, 1),
            column(leaf_arguments, 2),
        )),
        Lag => NavigationAggregator::Lag(navigation::Lag::new(
            column(leaf_arguments, 0),
            column(leaf_arguments, 1),
            column(leaf_arguments, 2),
        )),
        other => unreachable!("{} is not a navigation function", other.name()),
    }
}

fn ranking_aggregator(function: WindowFunction, order_by_values: Vec<Vec<Value>>) -> RankingAggregator {
    use WindowFunction::*;
    match function {
        RowNumber => RankingAggregator::RowNumber(ranking::RowNumber::new()),
        Rank => RankingAggregator::Rank(ranking::Rank::new(order_by_values)),
        DenseRank => RankingAggregator::DenseRank(ranking::DenseRank::new(order_by_values)),
        other => unreachable!("{} is not a ranking function", other.name()),
    }
}

fn build_aggregator(
    expr: &WindowExpr,
    leaf_arguments: &[Vec<Value>],
    order_by_values: &[Vec<Value>],
) -> Result<PartitionAggregator> {
    Ok(match expr.function.path() {
        AggregatorPath::Associative => PartitionAggregator::Associative(associative_aggregator(
            expr.function,
            expr.fanout,
            leaf_arguments,
        )?),
        AggregatorPath::Navigation => {
            PartitionAggregator::Navigation(navigation_aggregator(expr.function, leaf_arguments))
        }
        AggregatorPath::Ranking => {
            PartitionAggregator::Ranking(ranking_aggregator(expr.function, order_by_values.to_vec()))
        }
    })
}

/// Evaluate `expr` over `rows`, returning one result per row aligned to
/// `rows`' original order.
///
/// Partitioning and sorting materialize the full input eagerly, as the
/// concurrency model documents; per partition, rows are visited in sorted
/// order so navigation/ranking cursors advance monotonically, and each
/// result is written into the output slot of the row it belongs to. This
/// achieves the same alignment the spec describes via a second, identity-
/// keyed pass over the original row order, without the O(P) position
/// lookup that a literal re-implementation of that pass would require.
pub fn compute(rows: &[Row], expr: &WindowExpr) -> Result<Vec<Option<Value>>> {
    expr.validate()?;

    let mut partitions: IndexMap<PartitionKey, Vec<usize>> = IndexMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let key: PartitionKey = expr.frame.partition_by.iter().map(|f| f(row)).collect();
        partitions.entry(key).or_default().push(idx);
    }
    debug!("window driver: {} partition(s) over {} row(s)", partitions.len(), rows.len());

    let mut results: Vec<Option<Value>> = vec![None; rows.len()];

    for indices in partitions.values() {
        let order_keys: Vec<Vec<Value>> = indices
            .iter()
            .map(|&i| expr.frame.order_by.iter().map(|f| f(&rows[i])).collect())
            .collect();

        let mut order: Vec<usize> = (0..indices.len()).collect();
        order.sort_by(|&a, &b| compare_key_tuples(&order_keys[a], &order_keys[b], expr.frame.nulls));

        let sorted_indices: Vec<usize> = order.iter().map(|&o| indices[o]).collect();
        let sorted_order_keys: Vec<Vec<Value>> = order.iter().map(|&o| order_keys[o].clone()).collect();

        let leaf_arguments: Vec<Vec<Value>> = sorted_indices
            .iter()
            .map(|&i| expr.args.iter().map(|f| f(&rows[i])).collect())
            .collect();

        let mut aggregator = build_aggregator(expr, &leaf_arguments, &sorted_order_keys)?;

        for (pos, &original_index) in sorted_indices.iter().enumerate() {
            let original_row = &rows[original_index];
            let preceding = expr.frame.preceding.as_ref().map(|f| f(original_row));
            let following = expr.frame.following.as_ref().map(|f| f(original_row));
            let (begin, end) = frame::resolve(
                expr.frame.mode,
                &sorted_order_keys,
                pos,
                preceding.as_ref(),
                following.as_ref(),
            );
            results[original_index] = aggregator.execute(begin, end);
        }
    }

    Ok(results)
}
