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

//! Flat SoA tables: one column per leaf field, all of the same length.

mod extent;
mod iter;

pub use extent::ExtentMut;
pub use iter::Iter;

use std::fmt;
use std::ops::Range;

use aosoa_core::{ColumnInfo, FieldList, Heap, Inline, Storage, TableError};

use crate::extents::Extents;

/// A flat table storing records of type `R` as one column per leaf field.
///
/// `S` decides how the columns are held. Most code uses one of the aliases:
///
/// - [`FlatTable<R, N>`]: `N` elements in inline arrays, infallible to build.
/// - [`FlatDynamicTable<R>`]: a run-time number of elements in `Vec`s.
///
/// Every live element `0..len()` is reachable through [`at`](Self::at) and
/// [`at_mut`](Self::at_mut), which return proxies aliasing one slot of each
/// column.
pub struct Table<R: FieldList, S: Storage> {
    columns: R::Columns<S>,
    len: usize,
}

/// A flat table of exactly `N` elements held in inline arrays.
pub type FlatTable<R, const N: usize> = Table<R, Inline<N>>;

/// A flat table whose length is chosen and changed at run time.
pub type FlatDynamicTable<R> = Table<R, Heap>;

impl<R: FieldList, S: Storage> Table<R, S> {
    /// Allocates `capacity` slots per column, of which the first `len` are live.
    pub(crate) fn try_allocate(capacity: usize, len: usize) -> Result<Self, S::Error> {
        debug_assert!(len <= capacity);
        Ok(Self {
            columns: R::try_allocate::<S>(capacity)?,
            len,
        })
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a shared proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn at(&self, index: usize) -> R::Ref<'_> {
        self.check_index(index);
        R::get::<S>(&self.columns, index)
    }

    /// Returns an exclusive proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> R::Mut<'_> {
        self.check_index(index);
        R::get_mut::<S>(&mut self.columns, index)
    }

    /// Copies the element at `index` out of the columns.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> R {
        R::load(self.at(index))
    }

    /// Writes `value` into the columns at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, value: R) {
        R::store(self.at_mut(index), value);
    }

    /// Returns slices of the live part of every column, nested like the
    /// record's composition.
    pub fn columns(&self) -> R::Slices<'_> {
        R::slices::<S>(&self.columns, 0..self.len)
    }

    /// Returns mutable slices of the live part of every column, for tight
    /// per-column loops.
    pub fn columns_mut(&mut self) -> R::SlicesMut<'_> {
        R::slices_mut::<S>(&mut self.columns, 0..self.len)
    }

    /// Describes every allocated column in flattened leaf order, bases first.
    pub fn column_info(&self) -> Vec<ColumnInfo> {
        let mut out = Vec::with_capacity(R::LEN);
        R::describe::<S>(&self.columns, &mut out);
        out
    }

    /// Returns an iterator over shared proxies of every live element.
    pub fn iter(&self) -> Iter<'_, R, S> {
        Iter::new(std::slice::from_ref(self))
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Resets the slots in `range` of every column to their default value.
    pub(crate) fn reset(&mut self, range: Range<usize>) {
        R::reset::<S>(&mut self.columns, range);
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index out of bounds: the len is {} but the index is {}",
            self.len,
            index
        );
    }
}

impl<R: FieldList, const N: usize> Table<R, Inline<N>> {
    /// Creates a table of `N` default elements.
    pub fn new() -> Self {
        match Self::try_allocate(N, N) {
            Ok(table) => table,
            Err(never) => match never {},
        }
    }
}

impl<R: FieldList, const N: usize> Default for Table<R, Inline<N>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FieldList> Table<R, Heap> {
    /// Creates a table of `len` default elements.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] if any column cannot be
    /// allocated. No column outlives a failed call.
    pub fn try_new(len: usize) -> Result<Self, TableError> {
        let table = Self::try_allocate(len, len)?;
        log::debug!(
            "Allocated flat table of {len} elements over {} columns",
            R::LEN
        );
        Ok(table)
    }

    /// Creates a table holding the records yielded by `records`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] if the columns cannot be
    /// allocated.
    pub fn try_from_records<I>(records: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = R>,
        I::IntoIter: ExactSizeIterator,
    {
        let records = records.into_iter();
        let mut table = Self::try_new(records.len())?;
        for (index, record) in (0..table.len).zip(records) {
            table.set(index, record);
        }
        Ok(table)
    }

    /// Resizes every column to `len` elements. New elements are default.
    ///
    /// The resize is atomic: every column reserves room first, and only when
    /// all reservations succeed is any column resized.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] if a reservation fails. The
    /// table keeps its previous length and contents.
    pub fn try_resize(&mut self, len: usize) -> Result<(), TableError> {
        R::try_reserve::<Heap>(&mut self.columns, len)?;
        R::resize::<Heap>(&mut self.columns, len);
        log::debug!("Resized flat table from {} to {len} elements", self.len);
        self.len = len;
        Ok(())
    }
}

impl<R: FieldList, S: Storage> Extents for Table<R, S> {
    type Record = R;
    type Storage = S;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn block_len(&self) -> usize {
        self.len
    }

    #[inline]
    fn extents(&self) -> &[Table<R, S>] {
        std::slice::from_ref(self)
    }

    #[inline]
    fn extent_mut(&mut self, index: usize) -> ExtentMut<'_, R, S> {
        assert_eq!(index, 0, "a flat table has a single extent");
        ExtentMut::new(self)
    }
}

impl<'a, R: FieldList, S: Storage> IntoIterator for &'a Table<R, S> {
    type Item = R::Ref<'a>;
    type IntoIter = Iter<'a, R, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<R: FieldList, S: Storage> fmt::Debug for Table<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("record", &std::any::type_name::<R>())
            .field("len", &self.len)
            .field("columns", &R::LEN)
            .finish()
    }
}

#[cfg(test)]
mod tests;
