// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A cursor naming one element of a table by its block and in-block offset.
///
/// Positions order lexicographically on `(block, offset)`. The one-past-the-end
/// position of a table is `(live_blocks, 0)`, see [`Extents::end`].
///
/// A position carries no reference to its table: comparing or using positions
/// taken from different tables is a logic error the library does not detect.
///
/// [`Extents::end`]: crate::Extents::end
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TablePosition {
    /// The index of the block (extent) holding the element.
    pub block: usize,
    /// The offset of the element inside its block.
    pub offset: usize,
}

impl TablePosition {
    /// Creates the position of `offset` within `block`.
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}
