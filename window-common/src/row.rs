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

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::value::Value;

/// A stable identifier assigned to a row at partitioning time.
///
/// The source row stream is not assumed to offer object identity or a
/// stable hash, so the driver mints one of these per row when it tees
/// the input; it is the only thing partition-position lookup relies on,
/// which keeps value-equal rows distinguishable (see
/// [`crate::row::Row`] equality, which is value-based).
pub type RowId = u64;

/// An immutable, labelled tuple of values.
///
/// Two rows are equal iff their column maps are equal; `id` is excluded
/// from equality and hashing; it exists purely to recover original
/// ordering and to disambiguate value-equal rows during partitioning.
#[derive(Debug, Clone)]
pub struct Row {
    id: RowId,
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new(id: RowId, columns: IndexMap<String, Value>) -> Self {
        Row { id, columns }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

/// An ordered tuple of values produced by applying the partition-key
/// functions to a row; used as the key of the driver's partition map.
pub type PartitionKey = Vec<Value>;

/// Where a `null` order-key value sorts relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsPlacement {
    First,
    Last,
}

/// Compare two (possibly null) values for sort purposes.
///
/// Two nulls compare equal; a null compares before or after every
/// non-null value according to `nulls`. Non-null values of the same
/// variant use the natural order from [`Value`]'s `PartialOrd`; a
/// mismatched non-null pairing (which should not occur within a single
/// column) is treated as equal rather than panicking, since sort
/// stability then preserves the rows' relative input order.
pub fn compare_values(a: &Value, b: &Value, nulls: NullsPlacement) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => match nulls {
            NullsPlacement::First => Ordering::Less,
            NullsPlacement::Last => Ordering::Greater,
        },
        (false, true) => match nulls {
            NullsPlacement::First => Ordering::Greater,
            NullsPlacement::Last => Ordering::Less,
        },
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Lexicographically compare two order-key tuples component-wise.
pub fn compare_key_tuples(a: &[Value], b: &[Value], nulls: NullsPlacement) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match compare_values(x, y, nulls) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}
