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

//! The window specification (C6's [`frame::FrameSpec`] plus the function
//! being evaluated) and the driver (C7) that partitions, sorts and
//! evaluates it over a row stream.

pub mod driver;
pub mod frame;

pub use driver::compute;
pub use frame::{DeltaFn, FrameMode, FrameSpec, RowFn};

use window_common::WindowError;

/// The sealed set of window functions this engine evaluates.
///
/// Each variant picks one of the three aggregator paths described in the
/// component design: [`AggregatorPath::Associative`] functions are
/// evaluated through the segment tree (C3); [`AggregatorPath::Navigation`]
/// and [`AggregatorPath::Ranking`] functions carry their own cursor-based
/// state (C4, C5) and bypass the tree entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFunction {
    Count,
    Sum,
    Total,
    Mean,
    Min,
    Max,
    SampleCovariance,
    PopulationCovariance,
    SampleVariance,
    PopulationVariance,
    SampleStddev,
    PopulationStddev,
    First,
    Last,
    Nth,
    Lead,
    Lag,
    RowNumber,
    Rank,
    DenseRank,
}

/// Which of the three evaluation strategies a [`WindowFunction`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorPath {
    Associative,
    Navigation,
    Ranking,
}

impl WindowFunction {
    pub fn path(self) -> AggregatorPath {
        use WindowFunction::*;
        match self {
            Count | Sum | Total | Mean | Min | Max | SampleCovariance | PopulationCovariance
            | SampleVariance | PopulationVariance | SampleStddev | PopulationStddev => {
                AggregatorPath::Associative
            }
            First | Last | Nth | Lead | Lag => AggregatorPath::Navigation,
            RowNumber | Rank | DenseRank => AggregatorPath::Ranking,
        }
    }

    /// Number of row-argument getters [`WindowExpr::args`] must supply for
    /// this function: the aggregate's own arity for associative functions,
    /// the positional arguments for navigation functions (`nth`'s `k`,
    /// `lead`/`lag`'s offset and default), and none for ranking functions,
    /// which are driven entirely by the order-by tuple.
    pub fn arity(self) -> usize {
        use WindowFunction::*;
        match self {
            SampleCovariance | PopulationCovariance => 2,
            Count | Sum | Total | Mean | Min | Max | SampleVariance | PopulationVariance
            | SampleStddev | PopulationStddev => 1,
            First | Last => 1,
            Nth => 2,
            Lead | Lag => 3,
            RowNumber | Rank | DenseRank => 0,
        }
    }

    pub fn name(self) -> &'static str {
        use WindowFunction::*;
        match self {
            Count => "count",
            Sum => "sum",
            Total => "total",
            Mean => "mean",
            Min => "min",
            Max => "max",
            SampleCovariance => "covar_samp",
            PopulationCovariance => "covar_pop",
            SampleVariance => "var_samp",
            PopulationVariance => "var_pop",
            SampleStddev => "stddev_samp",
            PopulationStddev => "stddev_pop",
            First => "first_value",
            Last => "last_value",
            Nth => "nth_value",
            Lead => "lead",
            Lag => "lag",
            RowNumber => "row_number",
            Rank => "rank",
            DenseRank => "dense_rank",
        }
    }

    /// Parse a SQL-style function name, as the external interface in
    /// the spec's aggregate factory would do for a dynamically named
    /// aggregate request.
    pub fn parse(name: &str) -> Result<Self, WindowError> {
        use WindowFunction::*;
        Ok(match name {
            "count" => Count,
            "sum" => Sum,
            "total" => Total,
            "mean" | "avg" => Mean,
            "min" => Min,
            "max" => Max,
            "covar_samp" => SampleCovariance,
            "covar_pop" => PopulationCovariance,
            "var_samp" => SampleVariance,
            "var_pop" => PopulationVariance,
            "stddev_samp" => SampleStddev,
            "stddev_pop" => PopulationStddev,
            "first_value" => First,
            "last_value" => Last,
            "nth_value" => Nth,
            "lead" => Lead,
            "lag" => Lag,
            "row_number" => RowNumber,
            "rank" => Rank,
            "dense_rank" => DenseRank,
            other => return Err(WindowError::UnsupportedOperation(other.to_string())),
        })
    }
}

/// A fully specified window function call: which function, the row-value
/// getters supplying its arguments, and the frame it is evaluated over.
pub struct WindowExpr {
    pub function: WindowFunction,
    pub args: Vec<RowFn>,
    pub frame: FrameSpec,
    pub fanout: usize,
}

impl WindowExpr {
    pub fn validate(&self) -> Result<(), WindowError> {
        self.frame.validate()?;
        let expected = self.function.arity();
        if self.args.len() != expected {
            return Err(WindowError::DomainError(format!(
                "`{}` takes {expected} argument(s), got {}",
                self.function.name(),
                self.args.len()
            )));
        }
        Ok(())
    }
}
