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

use thiserror::Error;

/// Errors surfaced by the window-aggregation engine.
///
/// Propagation policy: these are reported synchronously at window
/// construction or at first use. Internal invariant violations (`begin >
/// end` into a segment-tree query, a navigation cursor running past the
/// partition) are programmer errors and panic rather than returning here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WindowError {
    /// RANGE mode was requested with a number of order-by columns other
    /// than one.
    #[error("RANGE frame requires exactly one order-by column, got {0}")]
    InvalidFrame(usize),

    /// A limit or offset supplied by an external pipeline stage was
    /// negative.
    #[error("limit/offset must be non-negative, got {0}")]
    InvalidLimit(i64),

    /// A non-associative window function was routed through the
    /// segment-tree evaluation path.
    #[error("`{0}` is not associative and cannot be evaluated through the segment-tree path")]
    UnsupportedOperation(String),

    /// A value outside its documented domain was supplied (e.g. a
    /// negative element passed to the segment-tree build's bitset).
    #[error("domain error: {0}")]
    DomainError(String),

    /// A joined row was addressed by a column name present on more than
    /// one side of the join.
    #[error("ambiguous column `{0}` present on more than one side of the join")]
    OverlappingJoinKeys(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;
