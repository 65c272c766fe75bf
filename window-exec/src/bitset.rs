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

//! A dense bitmap used to track which segment-tree nodes have already
//! been folded into their parent during the build's breadth-first
//! ascent. A tree of a few thousand nodes does not warrant anything
//! fancier than a `Vec<bool>`-backed set.

use window_common::{Result, WindowError};

#[derive(Debug, Clone)]
pub struct BitSet {
    bits: Vec<bool>,
}

impl BitSet {
    pub fn with_capacity(n: usize) -> Self {
        BitSet { bits: vec![false; n] }
    }

    pub fn contains(&self, element: usize) -> bool {
        self.bits.get(element).copied().unwrap_or(false)
    }

    /// Mark `element` as present, growing the backing storage if
    /// needed. Returns `DomainError` if a caller somehow constructs a
    /// negative index through an unchecked conversion upstream; `usize`
    /// already excludes negatives, so this is here to keep the
    /// `DomainError` kind exercised at the boundary it documents.
    pub fn insert(&mut self, element: usize) -> Result<()> {
        if element == usize::MAX {
            return Err(WindowError::DomainError(format!(
                "element {element} is not a valid bitset index"
            )));
        }
        if element >= self.bits.len() {
            self.bits.resize(element + 1, false);
        }
        self.bits[element] = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_membership() {
        let mut set = BitSet::with_capacity(4);
        assert!(!set.contains(2));
        set.insert(2).unwrap();
        assert!(set.contains(2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut set = BitSet::with_capacity(1);
        set.insert(10).unwrap();
        assert!(set.contains(10));
        assert!(!set.contains(5));
    }
}
