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

//! The associative-aggregate contract and its concrete implementations.

pub mod associative;

use window_common::Value;

/// Step/combine/finalize contract for aggregates eligible for
/// segment-tree evaluation.
///
/// `Default::default()` is the factory for a fresh identity state
/// (`combine(identity(), x) == x`); every concrete aggregate below is a
/// zero-argument-constructible type for exactly that reason.
///
/// `combine` must be associative: `combine(a, combine(b, c)) ==
/// combine(combine(a, b), c)`. It need not be commutative in general,
/// though every aggregate implemented here happens to be.
pub trait AssociativeAggregate: Default + Clone {
    /// Fold one leaf's arguments into the state. Implementations ignore
    /// a leaf whose relevant argument is null.
    fn step(&mut self, args: &[Value]);

    /// In-place associative merge of `other`'s state into `self`.
    fn combine(&mut self, other: &Self);

    /// Read the current reduction.
    fn finalize(&self) -> Option<Value>;
}
