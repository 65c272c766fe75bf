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

//! Whole-partition aggregators for the ranking functions: `row_number`,
//! `rank` and `dense_rank`. All three are driven purely by the ordered
//! sequence of order-key tuples computed for the sorted partition; they
//! take no aggregate arguments.
//!
//! `Option<Vec<Value>>` doubles as the "no previous row yet" sentinel:
//! `None` is never equal to `Some(tuple)`, including a tuple of all
//! nulls, which is exactly the distinguished-sentinel property `rank`
//! and `dense_rank` need.

use window_common::Value;

pub struct RowNumber {
    next: i64,
}

impl RowNumber {
    pub fn new() -> Self {
        RowNumber { next: 0 }
    }

    pub fn execute(&mut self) -> i64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl Default for RowNumber {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-dense ranking: repeats the previous rank while the order-key
/// tuple is unchanged, otherwise jumps to the current row number.
pub struct Rank {
    order_by_values: Vec<Vec<Value>>,
    row_number: RowNumber,
    previous: Option<Vec<Value>>,
    previous_rank: i64,
}

impl Rank {
    pub fn new(order_by_values: Vec<Vec<Value>>) -> Self {
        Rank { order_by_values, row_number: RowNumber::new(), previous: None, previous_rank: -1 }
    }

    pub fn execute(&mut self) -> i64 {
        let row_number = self.row_number.execute();
        let current = self.order_by_values[row_number as usize].clone();
        let rank = if self.previous.as_ref() == Some(&current) { self.previous_rank } else { row_number };
        self.previous_rank = rank;
        self.previous = Some(current);
        rank
    }
}

/// Dense ranking: a counter that advances by exactly one each time the
/// order-key tuple changes, regardless of how many row numbers were
/// skipped by ties.
pub struct DenseRank {
    order_by_values: Vec<Vec<Value>>,
    row_number: RowNumber,
    previous: Option<Vec<Value>>,
    current_rank: i64,
}

impl DenseRank {
    pub fn new(order_by_values: Vec<Vec<Value>>) -> Self {
        DenseRank { order_by_values, row_number: RowNumber::new(), previous: None, current_rank: -1 }
    }

    pub fn execute(&mut self) -> i64 {
        let row_number = self.row_number.execute();
        let current = self.order_by_values[row_number as usize].clone();
        if self.previous.as_ref() != Some(&current) {
            self.current_rank += 1;
        }
        self.previous = Some(current);
        self.current_rank
    }
}

/// The sealed set of ranking aggregators a window driver can construct.
pub enum RankingAggregator {
    RowNumber(RowNumber),
    Rank(Rank),
    DenseRank(DenseRank),
}

impl RankingAggregator {
    pub fn execute(&mut self) -> Value {
        let n = match self {
            RankingAggregator::RowNumber(a) => a.execute(),
            RankingAggregator::Rank(a) => a.execute(),
            RankingAggregator::DenseRank(a) => a.execute(),
        };
        Value::Int(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<Vec<Value>> {
        names.iter().map(|n| vec![Value::utf8(*n)]).collect()
    }

    #[test]
    fn row_number_counts_from_zero() {
        let mut rn = RowNumber::new();
        let values: Vec<_> = (0..5).map(|_| rn.execute()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rank_and_dense_rank_match_documented_sequence() {
        let names = ["apple", "apple", "grapes", "grapes", "orange", "watermelon"];
        let mut rank = Rank::new(keys(&names));
        let ranks: Vec<_> = (0..names.len()).map(|_| rank.execute()).collect();
        assert_eq!(ranks, vec![0, 0, 2, 2, 4, 5]);

        let mut dense = DenseRank::new(keys(&names));
        let dense_ranks: Vec<_> = (0..names.len()).map(|_| dense.execute()).collect();
        assert_eq!(dense_ranks, vec![0, 0, 1, 1, 2, 3]);
    }

    #[test]
    fn dense_rank_never_exceeds_rank_which_never_exceeds_row_number() {
        let names = ["a", "a", "b", "c", "c", "c", "d"];
        let mut rank = Rank::new(keys(&names));
        let mut dense = DenseRank::new(keys(&names));
        for i in 0..names.len() as i64 {
            let r = rank.execute();
            let d = dense.execute();
            assert!(d <= r);
            assert!(r <= i);
        }
    }

    #[test]
    fn two_null_order_keys_in_a_row_do_not_advance_rank() {
        let keys = vec![vec![Value::Null], vec![Value::Null], vec![Value::int(1)]];
        let mut rank = Rank::new(keys);
        assert_eq!(rank.execute(), 0);
        assert_eq!(rank.execute(), 0);
        assert_eq!(rank.execute(), 2);
    }
}
