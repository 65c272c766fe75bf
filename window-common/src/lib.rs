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

//! Row, value and error types shared across the window-aggregation engine.

pub mod error;
pub mod row;
pub mod value;

pub use error::{Result, WindowError};
pub use row::{compare_key_tuples, compare_values, NullsPlacement, PartitionKey, Row, RowId};
pub use value::Value;

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    #[test]
    fn value_equality_ignores_variant_mixing() {
        assert_eq!(Value::int(2), Value::int(2));
        assert_ne!(Value::int(2), Value::float(2.0));
    }

    #[test]
    fn value_ordering_promotes_int_to_float() {
        assert_eq!(Value::int(2).partial_cmp(&Value::float(2.5)), Some(Ordering::Less));
    }

    #[test]
    fn date_subtraction_yields_duration() {
        let a = Value::date(NaiveDate::from_ymd_opt(2018, 1, 7).unwrap());
        let b = Value::date(NaiveDate::from_ymd_opt(2018, 1, 4).unwrap());
        assert_eq!(
            a.checked_sub(&b),
            Some(Value::duration(chrono::Duration::days(3)))
        );
    }

    #[rstest]
    #[case(Value::Null, Value::int(1), NullsPlacement::First, Ordering::Less)]
    #[case(Value::Null, Value::int(1), NullsPlacement::Last, Ordering::Greater)]
    #[case(Value::Null, Value::Null, NullsPlacement::First, Ordering::Equal)]
    #[case(Value::int(1), Value::int(2), NullsPlacement::First, Ordering::Less)]
    fn compare_values_respects_nulls_placement(
        #[case] a: Value,
        #[case] b: Value,
        #[case] nulls: NullsPlacement,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_values(&a, &b, nulls), expected);
    }

    #[test]
    fn row_equality_is_value_based_not_identity_based() {
        let mut cols1 = indexmap::IndexMap::new();
        cols1.insert("x".to_string(), Value::int(1));
        let mut cols2 = indexmap::IndexMap::new();
        cols2.insert("x".to_string(), Value::int(1));
        let a = Row::new(0, cols1);
        let b = Row::new(1, cols2);
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
    }
}
