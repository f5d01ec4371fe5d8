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

use std::fmt;
use std::ops::Deref;

use aosoa_core::{FieldList, Storage};

use super::Table;

/// Exclusive access to the elements of one extent, without access to its
/// length.
///
/// Dereferences to the extent's [`Table`] for reading. Writes go through
/// [`at_mut`](Self::at_mut), [`set`](Self::set) and
/// [`columns_mut`](Self::columns_mut), none of which can resize, replace or
/// reorder the extent, so the owning table's shape stays intact.
pub struct ExtentMut<'a, R: FieldList, S: Storage> {
    table: &'a mut Table<R, S>,
}

impl<'a, R: FieldList, S: Storage> ExtentMut<'a, R, S> {
    pub(crate) fn new(table: &'a mut Table<R, S>) -> Self {
        Self { table }
    }

    /// Returns an exclusive proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> R::Mut<'_> {
        self.table.at_mut(index)
    }

    /// Writes `value` into the extent at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, value: R) {
        self.table.set(index, value);
    }

    /// Returns mutable slices of the live part of every column.
    pub fn columns_mut(&mut self) -> R::SlicesMut<'_> {
        self.table.columns_mut()
    }

    /// Converts the view into a proxy of the element at `index`, borrowing
    /// for the whole lifetime of the view.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn into_at_mut(self, index: usize) -> R::Mut<'a> {
        let table = self.table;
        table.at_mut(index)
    }
}

impl<R: FieldList, S: Storage> Deref for ExtentMut<'_, R, S> {
    type Target = Table<R, S>;

    fn deref(&self) -> &Self::Target {
        self.table
    }
}

impl<R: FieldList, S: Storage> fmt::Debug for ExtentMut<'_, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtentMut").field(&*self.table).finish()
    }
}
