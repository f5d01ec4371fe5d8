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

//! The capability shared by flat and blocked tables.

use std::iter::FusedIterator;

use aosoa_core::FieldList;

use crate::position::TablePosition;
use crate::table::{ExtentMut, Iter, Table};

/// A table seen as an ordered sequence of flat extents.
///
/// A flat table is a single extent. A blocked table is one extent per block,
/// every extent but the last holding exactly [`block_len`](Self::block_len)
/// elements. Element `i` therefore lives at offset `i % block_len` of extent
/// `i / block_len`.
///
/// The traversal functions of [`traverse`](crate::traverse) are written once
/// against this trait.
pub trait Extents {
    /// The record type stored in the table.
    type Record: FieldList;

    /// The storage kind of each extent.
    type Storage: aosoa_core::Storage;

    /// Returns the number of live elements across all extents.
    fn len(&self) -> usize;

    /// Returns the number of elements in every extent but the last.
    fn block_len(&self) -> usize;

    /// Returns the extents in order.
    fn extents(&self) -> &[Table<Self::Record, Self::Storage>];

    /// Returns exclusive access to the elements of extent `index`.
    ///
    /// The view cannot resize, replace or reorder the extent.
    ///
    /// # Panics
    ///
    /// Panics if `index >= live_blocks()`.
    fn extent_mut(&mut self, index: usize) -> ExtentMut<'_, Self::Record, Self::Storage>;

    /// Returns `true` if the table holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of extents.
    fn live_blocks(&self) -> usize {
        self.extents().len()
    }

    /// Returns the position of the first element, or [`end`](Self::end) if
    /// the table is empty.
    fn begin(&self) -> TablePosition {
        self.position_of(0)
    }

    /// Returns the one-past-the-end position, `(live_blocks, 0)`.
    fn end(&self) -> TablePosition {
        TablePosition::new(self.live_blocks(), 0)
    }

    /// Returns the position of the element at `index`.
    ///
    /// Any `index >= len()` maps to [`end`](Self::end).
    fn position_of(&self, index: usize) -> TablePosition {
        if index >= self.len() {
            return self.end();
        }
        let block_len = self.block_len();
        TablePosition::new(index / block_len, index % block_len)
    }

    /// Returns the logical index of `position`, clamped to `len()`.
    ///
    /// [`end`](Self::end) maps to `len()`.
    fn index_of(&self, position: TablePosition) -> usize {
        position
            .block
            .saturating_mul(self.block_len())
            .saturating_add(position.offset)
            .min(self.len())
    }

    /// Advances `position` by one element.
    ///
    /// Leaving the last element, or stepping from `end`, yields `end`.
    fn next_position(&self, position: TablePosition) -> TablePosition {
        self.position_of(self.index_of(position).saturating_add(1))
    }

    /// Returns the positions of the elements in `[begin, end)`.
    fn positions(&self, begin: TablePosition, end: TablePosition) -> Positions {
        Positions {
            next: self.index_of(begin),
            end: self.index_of(end),
            block_len: self.block_len(),
        }
    }

    /// Returns a shared proxy aliasing the element at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` names no live element.
    fn at_position(
        &self,
        position: TablePosition,
    ) -> <Self::Record as FieldList>::Ref<'_> {
        self.extents()[position.block].at(position.offset)
    }

    /// Returns an exclusive proxy aliasing the element at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` names no live element.
    fn at_position_mut(
        &mut self,
        position: TablePosition,
    ) -> <Self::Record as FieldList>::Mut<'_> {
        self.extent_mut(position.block).into_at_mut(position.offset)
    }

    /// Returns an iterator over shared proxies of every live element, in
    /// increasing index order.
    fn iter(&self) -> Iter<'_, Self::Record, Self::Storage> {
        Iter::new(self.extents())
    }
}

/// An iterator over the positions of a range of elements, in order.
///
/// Created by [`Extents::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    next: usize,
    end: usize,
    block_len: usize,
}

impl Iterator for Positions {
    type Item = TablePosition;

    fn next(&mut self) -> Option<TablePosition> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(TablePosition::new(
            index / self.block_len,
            index % self.block_len,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

impl FusedIterator for Positions {}
