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

//! Concrete associative aggregates: count, sum, total, mean, min, max,
//! covariance, variance and standard deviation (sample and population
//! variants of the last three).

use std::cmp::Ordering;
use std::marker::PhantomData;

use window_common::Value;

use super::AssociativeAggregate;

#[derive(Debug, Clone, Default)]
pub struct Count {
    n: i64,
}

impl AssociativeAggregate for Count {
    fn step(&mut self, args: &[Value]) {
        let arg = args.first().unwrap_or(&Value::Null);
        self.n += !arg.is_null() as i64;
    }

    fn combine(&mut self, other: &Self) {
        self.n += other.n;
    }

    fn finalize(&self) -> Option<Value> {
        Some(Value::Int(self.n))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sum {
    total: f64,
    count: i64,
}

impl AssociativeAggregate for Sum {
    fn step(&mut self, args: &[Value]) {
        let arg = args.first().unwrap_or(&Value::Null);
        if let Some(v) = arg.to_f64() {
            self.total += v;
            self.count += 1;
        }
    }

    fn combine(&mut self, other: &Self) {
        self.total += other.total;
        self.count += other.count;
    }

    fn finalize(&self) -> Option<Value> {
        (self.count > 0).then(|| Value::float(self.total))
    }
}

/// Like [`Sum`], but never null: an empty frame finalizes to `0`.
#[derive(Debug, Clone, Default)]
pub struct Total {
    inner: Sum,
}

impl AssociativeAggregate for Total {
    fn step(&mut self, args: &[Value]) {
        self.inner.step(args);
    }

    fn combine(&mut self, other: &Self) {
        self.inner.combine(&other.inner);
    }

    fn finalize(&self) -> Option<Value> {
        Some(Value::float(self.inner.total))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mean {
    inner: Sum,
}

impl AssociativeAggregate for Mean {
    fn step(&mut self, args: &[Value]) {
        self.inner.step(args);
    }

    fn combine(&mut self, other: &Self) {
        self.inner.combine(&other.inner);
    }

    fn finalize(&self) -> Option<Value> {
        (self.inner.count > 0).then(|| Value::float(self.inner.total / self.inner.count as f64))
    }
}

/// Chooses which of two candidate values `MinMax` should keep.
pub trait Extremum {
    fn better(candidate: &Value, current: &Value) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinOrdering;

impl Extremum for MinOrdering {
    fn better(candidate: &Value, current: &Value) -> bool {
        candidate.partial_cmp(current) == Some(Ordering::Less)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxOrdering;

impl Extremum for MaxOrdering {
    fn better(candidate: &Value, current: &Value) -> bool {
        candidate.partial_cmp(current) == Some(Ordering::Greater)
    }
}

#[derive(Debug)]
pub struct MinMax<E: Extremum> {
    current: Option<Value>,
    _marker: PhantomData<E>,
}

impl<E: Extremum> Default for MinMax<E> {
    fn default() -> Self {
        MinMax { current: None, _marker: PhantomData }
    }
}

impl<E: Extremum> Clone for MinMax<E> {
    fn clone(&self) -> Self {
        MinMax { current: self.current.clone(), _marker: PhantomData }
    }
}

impl<E: Extremum> AssociativeAggregate for MinMax<E> {
    fn step(&mut self, args: &[Value]) {
        let arg = args.first().unwrap_or(&Value::Null);
        if arg.is_null() {
            return;
        }
        match &self.current {
            None => self.current = Some(arg.clone()),
            Some(current) if E::better(arg, current) => self.current = Some(arg.clone()),
            Some(_) => {}
        }
    }

    fn combine(&mut self, other: &Self) {
        if let Some(candidate) = &other.current {
            self.step(std::slice::from_ref(candidate));
        }
    }

    fn finalize(&self) -> Option<Value> {
        self.current.clone()
    }
}

pub type Min = MinMax<MinOrdering>;
pub type Max = MinMax<MaxOrdering>;

/// The divisor subtracted from the sample count when finalizing
/// covariance/variance: 1 for the sample estimator, 0 for the
/// population estimator.
pub trait Ddof {
    const DDOF: f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDdof;

impl Ddof for SampleDdof {
    const DDOF: f64 = 1.0;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationDdof;

impl Ddof for PopulationDdof {
    const DDOF: f64 = 0.0;
}

/// Online (Welford-style) covariance, mergeable across partial
/// reductions via the parallel-variance merge formula.
pub struct Covariance<D: Ddof> {
    count: f64,
    mean_x: f64,
    mean_y: f64,
    co_moment: f64,
    _marker: PhantomData<D>,
}

impl<D: Ddof> Default for Covariance<D> {
    fn default() -> Self {
        Covariance { count: 0.0, mean_x: 0.0, mean_y: 0.0, co_moment: 0.0, _marker: PhantomData }
    }
}

impl<D: Ddof> Clone for Covariance<D> {
    fn clone(&self) -> Self {
        Covariance {
            count: self.count,
            mean_x: self.mean_x,
            mean_y: self.mean_y,
            co_moment: self.co_moment,
            _marker: PhantomData,
        }
    }
}

impl<D: Ddof> AssociativeAggregate for Covariance<D> {
    fn step(&mut self, args: &[Value]) {
        let x_arg = args.first().unwrap_or(&Value::Null);
        let y_arg = args.get(1).unwrap_or(&Value::Null);
        let (Some(x), Some(y)) = (x_arg.to_f64(), y_arg.to_f64()) else {
            return;
        };
        self.count += 1.0;
        let dx = x - self.mean_x;
        self.mean_x += dx / self.count;
        let dy = y - self.mean_y;
        self.mean_y += dy / self.count;
        self.co_moment += dx * (y - self.mean_y);
    }

    fn combine(&mut self, other: &Self) {
        if other.count == 0.0 {
            return;
        }
        if self.count == 0.0 {
            *self = other.clone();
            return;
        }
        let (n_a, n_b) = (self.count, other.count);
        let n = n_a + n_b;
        let delta_x = self.mean_x - other.mean_x;
        let delta_y = self.mean_y - other.mean_y;
        self.co_moment = self.co_moment + other.co_moment + delta_x * delta_y * n_a * n_b / n;
        self.mean_x = (n_a * self.mean_x + n_b * other.mean_x) / n;
        self.mean_y = (n_a * self.mean_y + n_b * other.mean_y) / n;
        self.count = n;
    }

    fn finalize(&self) -> Option<Value> {
        let denom = self.count - D::DDOF;
        (denom > 0.0).then(|| Value::float(self.co_moment / denom))
    }
}

pub type SampleCovariance = Covariance<SampleDdof>;
pub type PopulationCovariance = Covariance<PopulationDdof>;

/// Variance expressed as the covariance of a column with itself.
pub struct Variance<D: Ddof> {
    inner: Covariance<D>,
}

impl<D: Ddof> Default for Variance<D> {
    fn default() -> Self {
        Variance { inner: Covariance::default() }
    }
}

impl<D: Ddof> Clone for Variance<D> {
    fn clone(&self) -> Self {
        Variance { inner: self.inner.clone() }
    }
}

impl<D: Ddof> AssociativeAggregate for Variance<D> {
    fn step(&mut self, args: &[Value]) {
        let x = args.first().cloned().unwrap_or(Value::Null);
        self.inner.step(&[x.clone(), x]);
    }

    fn combine(&mut self, other: &Self) {
        self.inner.combine(&other.inner);
    }

    fn finalize(&self) -> Option<Value> {
        self.inner.finalize()
    }
}

pub type SampleVariance = Variance<SampleDdof>;
pub type PopulationVariance = Variance<PopulationDdof>;

/// Standard deviation, the square root of variance.
pub struct Stddev<D: Ddof> {
    inner: Variance<D>,
}

impl<D: Ddof> Default for Stddev<D> {
    fn default() -> Self {
        Stddev { inner: Variance::default() }
    }
}

impl<D: Ddof> Clone for Stddev<D> {
    fn clone(&self) -> Self {
        Stddev { inner: self.inner.clone() }
    }
}

impl<D: Ddof> AssociativeAggregate for Stddev<D> {
    fn step(&mut self, args: &[Value]) {
        self.inner.step(args);
    }

    fn combine(&mut self, other: &Self) {
        self.inner.combine(&other.inner);
    }

    fn finalize(&self) -> Option<Value> {
        self.inner.finalize().and_then(|v| v.to_f64()).map(|v| Value::float(v.sqrt()))
    }
}

pub type SampleStddev = Stddev<SampleDdof>;
pub type PopulationStddev = Stddev<PopulationDdof>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<A: AssociativeAggregate>(values: &[Value]) -> A {
        let mut agg = A::default();
        for v in values {
            agg.step(std::slice::from_ref(v));
        }
        agg
    }

    #[test]
    fn count_ignores_nulls() {
        let agg: Count = fold(&[Value::int(1), Value::Null, Value::int(3)]);
        assert_eq!(agg.finalize(), Some(Value::Int(2)));
    }

    #[test]
    fn sum_is_null_when_empty() {
        let agg = Sum::default();
        assert_eq!(agg.finalize(), None);
    }

    #[test]
    fn total_is_zero_when_empty() {
        let agg = Total::default();
        assert_eq!(agg.finalize(), Some(Value::float(0.0)));
    }

    #[test]
    fn mean_divides_by_non_null_count() {
        let agg: Mean = fold(&[Value::int(2), Value::int(4), Value::Null]);
        assert_eq!(agg.finalize(), Some(Value::float(3.0)));
    }

    #[test]
    fn min_max_skip_nulls() {
        let min: Min = fold(&[Value::int(3), Value::Null, Value::int(1), Value::int(2)]);
        let max: Max = fold(&[Value::int(3), Value::Null, Value::int(1), Value::int(2)]);
        assert_eq!(min.finalize(), Some(Value::Int(1)));
        assert_eq!(max.finalize(), Some(Value::Int(3)));
    }

    #[test]
    fn covariance_combine_matches_sequential_step() {
        let pairs = [(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0)];
        let mut sequential = SampleCovariance::default();
        for (x, y) in pairs {
            sequential.step(&[Value::float(x), Value::float(y)]);
        }

        let mut a = SampleCovariance::default();
        for (x, y) in &pairs[..2] {
            a.step(&[Value::float(*x), Value::float(*y)]);
        }
        let mut b = SampleCovariance::default();
        for (x, y) in &pairs[2..] {
            b.step(&[Value::float(*x), Value::float(*y)]);
        }
        a.combine(&b);

        let expected = sequential.finalize().unwrap().to_f64().unwrap();
        let actual = a.finalize().unwrap().to_f64().unwrap();
        assert!((expected - actual).abs() < 1e-9, "{expected} vs {actual}");
    }

    #[test]
    fn population_variance_matches_known_value() {
        let agg: PopulationVariance = fold(&[
            Value::float(2.0),
            Value::float(4.0),
            Value::float(4.0),
            Value::float(4.0),
            Value::float(5.0),
            Value::float(5.0),
            Value::float(7.0),
            Value::float(9.0),
        ]);
        let variance = agg.finalize().unwrap().to_f64().unwrap();
        assert!((variance - 4.0).abs() < 1e-9, "got {variance}");
    }

    #[test]
    fn stddev_is_sqrt_of_variance() {
        let agg: PopulationStddev = fold(&[
            Value::float(2.0),
            Value::float(4.0),
            Value::float(4.0),
            Value::float(4.0),
            Value::float(5.0),
            Value::float(5.0),
            Value::float(7.0),
            Value::float(9.0),
        ]);
        let sd = agg.finalize().unwrap().to_f64().unwrap();
        assert!((sd - 2.0).abs() < 1e-9, "got {sd}");
    }
}
