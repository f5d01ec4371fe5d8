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

use std::iter::FusedIterator;

use aosoa_core::{FieldList, Storage};

use super::Table;

/// An iterator over shared proxies of every live element of a table.
///
/// Walks the extents in order, and each extent from offset `0` to its length.
/// Created by [`Table::iter`] and [`Extents::iter`](crate::Extents::iter).
pub struct Iter<'a, R: FieldList, S: Storage> {
    /// The extents being walked.
    extents: &'a [Table<R, S>],
    /// The index of the current extent.
    block: usize,
    /// The next offset to yield within the current extent.
    offset: usize,
    /// The number of elements left to yield, counted from the extents.
    remaining: usize,
}

impl<'a, R: FieldList, S: Storage> Iter<'a, R, S> {
    pub(crate) fn new(extents: &'a [Table<R, S>]) -> Self {
        Self {
            extents,
            block: 0,
            offset: 0,
            remaining: extents.iter().map(Table::len).sum(),
        }
    }
}

impl<'a, R: FieldList, S: Storage> Iterator for Iter<'a, R, S> {
    type Item = R::Ref<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let extents = self.extents;
        while let Some(extent) = extents.get(self.block) {
            if self.offset < extent.len() {
                let item = extent.at(self.offset);
                self.offset += 1;
                self.remaining -= 1;
                return Some(item);
            }

            // The current extent is exhausted, move on to the next one.
            self.block += 1;
            self.offset = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: FieldList, S: Storage> ExactSizeIterator for Iter<'_, R, S> {}

impl<R: FieldList, S: Storage> FusedIterator for Iter<'_, R, S> {}
