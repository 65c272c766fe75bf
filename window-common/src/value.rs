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
use std::fmt;

use chrono::{Duration, NaiveDate};
use ordered_float::OrderedFloat;

/// A dynamically typed scalar, the unit of the row value domain.
///
/// `Value` is intentionally small: just enough variants to drive the
/// associative, navigation and ranking aggregators and the RANGE-mode
/// frame resolver. It is not a general-purpose columnar scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Float(OrderedFloat<f64>),
    Utf8(String),
    Date(NaiveDate),
    Duration(Duration),
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }

    pub fn utf8(v: impl Into<String>) -> Self {
        Value::Utf8(v.into())
    }

    pub fn date(v: NaiveDate) -> Self {
        Value::Date(v)
    }

    pub fn duration(v: Duration) -> Self {
        Value::Duration(v)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a numeric value to `f64`. Returns `None` for non-numeric
    /// variants, including `Null`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.0),
            _ => None,
        }
    }

    /// Extract an exact integer, used for row offsets (`nth`'s `k`,
    /// `lead`/`lag`'s `d`). Unlike `to_f64`, this does not coerce
    /// floating values, since offsets are inherently discrete.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Subtract `other` from `self`, yielding a delta that is comparable
    /// to the value returned by a `preceding`/`following` function.
    ///
    /// Numeric variants yield a numeric delta; two dates yield a
    /// duration. Any other pairing has no defined subtraction and
    /// returns `None`, which callers surface as `WindowError::InvalidFrame`.
    pub fn checked_sub(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a - b)),
            (Value::Float(a), Value::Float(b)) => Some(Value::float(a.0 - b.0)),
            (Value::Int(a), Value::Float(b)) => Some(Value::float(*a as f64 - b.0)),
            (Value::Float(a), Value::Int(b)) => Some(Value::float(a.0 - *b as f64)),
            (Value::Date(a), Value::Date(b)) => Some(Value::Duration(*a - *b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", v.0),
            Value::Utf8(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v}"),
        }
    }
}

/// Ordering between two values of the value domain, used wherever the
/// natural (non-null-aware) order is needed: `min`/`max` aggregation,
/// RANGE-mode delta comparison, and as a building block for row
/// comparisons that additionally need nulls-first/last placement.
///
/// `Null` does not participate in this order; mixed numeric variants are
/// compared after promotion to `f64`. Any other mismatched pairing is
/// incomparable.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(&b.0),
            (Value::Float(a), Value::Int(b)) => a.0.partial_cmp(&(*b as f64)),
            (Value::Utf8(a), Value::Utf8(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::Duration(a), Value::Duration(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}
