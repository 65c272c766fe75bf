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

//! Frame resolution: given a sorted partition and the 0-based position
//! of the row currently being evaluated, compute the half-open
//! `[start, stop)` range the aggregator should be queried over.

use std::cmp::Ordering;

use window_common::{NullsPlacement, Row, Value, WindowError};

pub type RowFn = Box<dyn Fn(&Row) -> Value + Send + Sync>;
pub type DeltaFn = Box<dyn Fn(&Row) -> Value + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Rows,
    Range,
}

/// An immutable, per-window frame specification.
pub struct FrameSpec {
    pub mode: FrameMode,
    pub partition_by: Vec<RowFn>,
    pub order_by: Vec<RowFn>,
    pub preceding: Option<DeltaFn>,
    pub following: Option<DeltaFn>,
    pub nulls: NullsPlacement,
}

impl FrameSpec {
    /// RANGE mode requires exactly one order-by column; surfaced as an
    /// error at window construction rather than at first query.
    pub fn validate(&self) -> Result<(), WindowError> {
        if self.mode == FrameMode::Range && self.order_by.len() != 1 {
            return Err(WindowError::InvalidFrame(self.order_by.len()));
        }
        Ok(())
    }
}

/// Resolve the `[start, stop)` frame for the row at position `i` in a
/// partition of `order_values` (one order-key tuple per sorted row),
/// given the current row's own `preceding`/`following` deltas already
/// evaluated into `Value`s.
///
/// `start`/`stop` are always normalized to `0 <= start <= stop <= n`:
/// a delta that would invert the range (a negative `preceding`/
/// `following`) collapses to an empty range rather than panicking, per
/// the frame resolver's documented tie-break rule.
pub fn resolve(
    mode: FrameMode,
    order_values: &[Vec<Value>],
    i: usize,
    preceding: Option<&Value>,
    following: Option<&Value>,
) -> (usize, usize) {
    let n = order_values.len();
    let (start, stop) = match mode {
        FrameMode::Rows => resolve_rows(n, i, preceding, following),
        FrameMode::Range => resolve_range(order_values, i, preceding, following),
    };
    let start = start.clamp(0, n as i64);
    let mut stop = stop.clamp(0, n as i64);
    if stop < start {
        stop = start;
    }
    (start as usize, stop as usize)
}

fn resolve_rows(n: usize, i: usize, preceding: Option<&Value>, following: Option<&Value>) -> (i64, i64) {
    let i = i as i64;
    let n = n as i64;
    let start = match preceding {
        Some(delta) => i - delta.to_i64().unwrap_or(0),
        None => 0,
    };
    let stop = match following {
        Some(delta) => i + delta.to_i64().unwrap_or(0) + 1,
        None => n,
    };
    (start, stop)
}

fn resolve_range(
    order_values: &[Vec<Value>],
    i: usize,
    preceding: Option<&Value>,
    following: Option<&Value>,
) -> (i64, i64) {
    let v = &order_values[i][0];
    let start = match preceding {
        Some(delta) => scan_backward(order_values, i, v, delta),
        None => 0,
    };
    let n = order_values.len();
    let last = match following {
        Some(delta) => scan_forward(order_values, i, v, delta),
        None => (n - 1) as i64,
    };
    (start, last + 1)
}

/// The smallest `j <= i` with `v - order_values[j] <= delta`. Since the
/// partition is sorted ascending, `v - order_values[j]` only grows as
/// `j` decreases from `i`, so the first failure fixes the boundary.
fn scan_backward(order_values: &[Vec<Value>], i: usize, v: &Value, delta: &Value) -> i64 {
    let mut j = i as i64;
    loop {
        let candidate = v
            .checked_sub(&order_values[j as usize][0])
            .expect("RANGE order column must support subtraction");
        if candidate.partial_cmp(delta) == Some(Ordering::Greater) {
            return j + 1;
        }
        if j == 0 {
            return 0;
        }
        j -= 1;
    }
}

/// The largest `j >= i` with `order_values[j] - v <= delta`.
fn scan_forward(order_values: &[Vec<Value>], i: usize, v: &Value, delta: &Value) -> i64 {
    let n = order_values.len();
    let mut j = i;
    loop {
        let candidate = order_values[j][0]
            .checked_sub(v)
            .expect("RANGE order column must support subtraction");
        if candidate.partial_cmp(delta) == Some(Ordering::Greater) {
            return j as i64 - 1;
        }
        if j + 1 >= n {
            return j as i64;
        }
        j += 1;
    }
}
