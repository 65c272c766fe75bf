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

//! Whole-partition aggregators for the navigation functions: `first`,
//! `last`, `nth`, `lead` and `lag`. Unlike the associative aggregates,
//! these hold the full per-column input for the partition up front and
//! answer each call against it directly; there is no tree to query.

use std::collections::HashMap;

use window_common::Value;

#[derive(Debug, Default)]
struct RangeCache {
    entries: HashMap<(usize, usize), Option<Value>>,
}

impl RangeCache {
    fn get_or_compute(&mut self, key: (usize, usize), compute: impl FnOnce() -> Option<Value>) -> Option<Value> {
        self.entries.entry(key).or_insert_with(compute).clone()
    }
}

/// Shared forward-scan logic behind `first` and (via a reversed view)
/// `last`: the leftmost non-null value in `[begin, end)`.
pub struct FirstLast {
    inputs: Vec<Value>,
    cache: RangeCache,
}

impl FirstLast {
    pub fn new(inputs: Vec<Value>) -> Self {
        FirstLast { inputs, cache: RangeCache::default() }
    }

    pub fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        let inputs = &self.inputs;
        self.cache.get_or_compute((begin, end), || {
            (begin..end).map(|i| &inputs[i]).find(|v| !v.is_null()).cloned()
        })
    }
}

pub struct First {
    inner: FirstLast,
}

impl First {
    pub fn new(inputs: Vec<Value>) -> Self {
        First { inner: FirstLast::new(inputs) }
    }

    pub fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        self.inner.execute(begin, end)
    }
}

/// `last` is first over the reversed sequence: construction reverses
/// the input once, and every `(begin, end)` query is translated into
/// the matching window over the reversed indexing.
pub struct Last {
    inner: FirstLast,
    len: usize,
}

impl Last {
    pub fn new(inputs: Vec<Value>) -> Self {
        let len = inputs.len();
        let reversed: Vec<Value> = inputs.into_iter().rev().collect();
        Last { inner: FirstLast::new(reversed), len }
    }

    pub fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        self.inner.execute(self.len - end, self.len - begin)
    }
}

/// Returns the `inputs1` value at the partition-relative offset found
/// in `inputs2` at the current cursor position.
pub struct Nth {
    inputs1: Vec<Value>,
    inputs2: Vec<Value>,
    cursor: usize,
    cache: RangeCache,
}

impl Nth {
    pub fn new(inputs1: Vec<Value>, inputs2: Vec<Value>) -> Self {
        Nth { inputs1, inputs2, cursor: 0, cache: RangeCache::default() }
    }

    pub fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        let cursor = self.cursor;
        self.cursor += 1;

        let inputs1 = &self.inputs1;
        let k = self.inputs2.get(cursor).and_then(Value::to_i64);
        self.cache.get_or_compute((begin, end), || {
            let frame_width = (end - begin) as i64;
            let k = k?;
            if k < -frame_width || k >= frame_width {
                return None;
            }
            let n = inputs1.len() as i64;
            let idx = if k < 0 { n + k } else { k };
            if idx < 0 || idx >= n {
                None
            } else {
                Some(inputs1[idx as usize].clone())
            }
        })
    }
}

/// Shared logic for `lead`/`lag`: shift the cursor by a per-row offset,
/// falling back to a per-row default when the offset is null or lands
/// outside the partition.
pub struct LeadLag {
    inputs1: Vec<Value>,
    offsets: Vec<Value>,
    defaults: Vec<Value>,
    cursor: usize,
    sign: i64,
}

impl LeadLag {
    fn new(inputs1: Vec<Value>, offsets: Vec<Value>, defaults: Vec<Value>, sign: i64) -> Self {
        LeadLag { inputs1, offsets, defaults, cursor: 0, sign }
    }

    pub fn execute(&mut self) -> Option<Value> {
        let i = self.cursor;
        self.cursor += 1;

        let default = self.defaults.get(i).cloned().unwrap_or(Value::Null);
        let fallback = || (!default.is_null()).then_some(default.clone());

        match self.offsets.get(i).and_then(Value::to_i64) {
            None => fallback(),
            Some(d) => {
                let target = i as i64 + self.sign * d;
                let n = self.inputs1.len() as i64;
                if target < 0 || target >= n {
                    fallback()
                } else {
                    Some(self.inputs1[target as usize].clone())
                }
            }
        }
    }
}

pub struct Lead(LeadLag);

impl Lead {
    pub fn new(inputs1: Vec<Value>, offsets: Vec<Value>, defaults: Vec<Value>) -> Self {
        Lead(LeadLag::new(inputs1, offsets, defaults, 1))
    }

    pub fn execute(&mut self, _begin: usize, _end: usize) -> Option<Value> {
        self.0.execute()
    }
}

pub struct Lag(LeadLag);

impl Lag {
    pub fn new(inputs1: Vec<Value>, offsets: Vec<Value>, defaults: Vec<Value>) -> Self {
        Lag(LeadLag::new(inputs1, offsets, defaults, -1))
    }

    pub fn execute(&mut self, _begin: usize, _end: usize) -> Option<Value> {
        self.0.execute()
    }
}

/// The sealed set of navigation aggregators a window driver can
/// construct; it switches on this enum once per window rather than
/// dispatching through a trait object per row.
pub enum NavigationAggregator {
    First(First),
    Last(Last),
    Nth(Nth),
    Lead(Lead),
    Lag(Lag),
}

impl NavigationAggregator {
    pub fn execute(&mut self, begin: usize, end: usize) -> Option<Value> {
        match self {
            NavigationAggregator::First(a) => a.execute(begin, end),
            NavigationAggregator::Last(a) => a.execute(begin, end),
            NavigationAggregator::Nth(a) => a.execute(begin, end),
            NavigationAggregator::Lead(a) => a.execute(begin, end),
            NavigationAggregator::Lag(a) => a.execute(begin, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|v| Value::Int(*v)).collect()
    }

    #[test]
    fn first_skips_leading_nulls_in_frame() {
        let mut first = First::new(vec![Value::Null, Value::Null, Value::int(7), Value::int(8)]);
        assert_eq!(first.execute(0, 4), Some(Value::Int(7)));
    }

    #[test]
    fn last_equals_first_over_reversed_sequence() {
        let values = vec![Value::int(1), Value::Null, Value::int(3), Value::int(4)];
        let mut last = Last::new(values.clone());
        assert_eq!(last.execute(0, 4), Some(Value::Int(4)));

        let mut manual = First::new(values.into_iter().rev().collect());
        assert_eq!(manual.execute(0, 4), Some(Value::Int(4)));
    }

    #[test]
    fn nth_offset_is_cached_per_range() {
        let mut nth = Nth::new(ints(&[10, 20, 30, 40]), vec![Value::int(1); 4]);
        assert_eq!(nth.execute(0, 4), Some(Value::Int(20)));
        assert_eq!(nth.execute(0, 4), Some(Value::Int(20)));
    }

    #[test]
    fn nth_out_of_frame_width_is_null() {
        let mut nth = Nth::new(ints(&[1, 2, 3, 4]), vec![Value::int(4000); 4]);
        assert_eq!(nth.execute(0, 4), None);
    }

    #[test]
    fn lead_lag_shift_by_one_with_null_edges() {
        let values = ints(&[1, 2, 3, 4]);
        let offsets = vec![Value::int(1); 4];
        let defaults = vec![Value::Null; 4];

        let mut lead = Lead::new(values.clone(), offsets.clone(), defaults.clone());
        let lead_values: Vec<_> = (0..4).map(|_| lead.execute(0, 0)).collect();
        assert_eq!(lead_values, vec![Some(Value::Int(2)), Some(Value::Int(3)), Some(Value::Int(4)), None]);

        let mut lag = Lag::new(values, offsets, defaults);
        let lag_values: Vec<_> = (0..4).map(|_| lag.execute(0, 0)).collect();
        assert_eq!(lag_values, vec![None, Some(Value::Int(1)), Some(Value::Int(2)), Some(Value::Int(3))]);
    }
}
