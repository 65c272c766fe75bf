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

//! Segment-tree based window aggregation.
//!
//! Evaluating a window function over every row of a partition naively
//! costs `O(N)` per row and `O(N^2)` per partition. This crate instead
//! builds a fanout-`F` segment tree over each partition's associative
//! aggregates ([`aggregate`], [`segmenttree`]), so any contiguous frame
//! resolves in `O(log N)`. Functions that are not associative reductions
//! — the navigation functions (`first_value`, `last_value`, `nth_value`,
//! `lead`, `lag`) and the ranking functions (`row_number`, `rank`,
//! `dense_rank`) — are evaluated by their own whole-partition,
//! cursor-based aggregators ([`navigation`], [`ranking`]) instead of
//! through the tree.
//!
//! [`window`] ties these together: [`window::FrameSpec`] resolves each
//! row's `[start, stop)` frame, and [`window::compute`] partitions,
//! sorts, builds the right aggregator per partition and evaluates it
//! row by row.

pub mod aggregate;
pub mod bitset;
pub mod indextree;
pub mod navigation;
pub mod ranking;
pub mod segmenttree;
pub mod window;

pub use aggregate::associative;
pub use aggregate::AssociativeAggregate;
pub use bitset::BitSet;
pub use navigation::NavigationAggregator;
pub use ranking::RankingAggregator;
pub use segmenttree::SegmentTree;
pub use window::{compute, AggregatorPath, FrameMode, FrameSpec, WindowExpr, WindowFunction};
