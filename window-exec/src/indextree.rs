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

//! Pure index arithmetic for a complete fanout-`F` tree laid out as a
//! flat array, index 0 being the root.
//!
//! These are the only formulas the segment tree is allowed to use for
//! translating between `(level, fanout)` and flat array positions; the
//! tree itself never reimplements them.

/// First (inclusive) flat index of `level`, where the root is level 0.
pub fn first_node(level: u32, fanout: usize) -> usize {
    (pow(fanout, level) - 1) / (fanout - 1)
}

/// Last (exclusive) flat index of `level`.
pub fn last_node(level: u32, fanout: usize) -> usize {
    (pow(fanout, level + 1) - 1) / (fanout - 1)
}

/// The flat index of the `i`-th child (0-based) of `node`.
pub fn child(node: usize, i: usize, fanout: usize) -> usize {
    fanout * node + i + 1
}

/// The flat indices of all `fanout` children of `node`.
pub fn children(node: usize, fanout: usize) -> impl Iterator<Item = usize> {
    (0..fanout).map(move |i| child(node, i, fanout))
}

/// The parent of `node`. The parent of the root (0) is defined to be 0,
/// a sentinel that lets the segment-tree build stop ascending without a
/// special case.
pub fn parent(node: usize, fanout: usize) -> usize {
    if node == 0 {
        0
    } else {
        (node - 1) / fanout
    }
}

/// The flat indices of the leaf level of a tree of the given `height`.
pub fn leaves(height: u32, fanout: usize) -> std::ops::Range<usize> {
    first_node(height - 1, fanout)..last_node(height - 1, fanout)
}

/// Total number of node slots in a complete fanout-`F` tree of `height`
/// levels: `(F^H - 1) / (F - 1)`.
pub fn node_count(height: u32, fanout: usize) -> usize {
    last_node(height - 1, fanout)
}

/// The height (number of levels, including the root) of the smallest
/// complete fanout-`F` tree with at least `leaf_count` leaves.
///
/// Always at least 1 so that a zero-leaf tree still has a root.
pub fn height_for_leaves(leaf_count: usize, fanout: usize) -> u32 {
    if leaf_count <= 1 {
        return 1;
    }
    let mut height = 0u32;
    while pow(fanout, height) < leaf_count {
        height += 1;
    }
    height + 1
}

fn pow(base: usize, exp: u32) -> usize {
    base.checked_pow(exp).expect("segment tree height overflowed usize")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn level_bounds_match_closed_form_for_binary_fanout() {
        assert_eq!(first_node(0, 2), 0);
        assert_eq!(last_node(0, 2), 1);
        assert_eq!(first_node(1, 2), 1);
        assert_eq!(last_node(1, 2), 3);
        assert_eq!(first_node(2, 2), 3);
        assert_eq!(last_node(2, 2), 7);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn children_and_parent_round_trip(#[case] fanout: usize) {
        for node in 0..20 {
            for (i, c) in children(node, fanout).enumerate() {
                assert_eq!(parent(c, fanout), node, "child {i} of node {node}");
            }
        }
    }

    #[test]
    fn root_parent_is_sentinel_zero() {
        assert_eq!(parent(0, 4), 0);
    }

    #[rstest]
    #[case(1, 4, 1)]
    #[case(3, 2, 3)] // 2^1=2 < 3 <= 2^2=4
    #[case(4, 2, 3)]
    #[case(5, 2, 4)]
    fn height_for_leaves_covers_all_leaves(#[case] leaf_count: usize, #[case] fanout: usize, #[case] expected: u32) {
        assert_eq!(height_for_leaves(leaf_count, fanout), expected);
    }
}
