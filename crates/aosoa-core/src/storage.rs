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

//! Storage kinds deciding how a single leaf column is held in memory.
//!
//! A [`FieldList`](crate::FieldList) describes *which* columns a record needs.
//! A [`Storage`] describes *how* each of those columns is allocated:
//!
//! - [`Inline<N>`]: a plain `[T; N]` array living inside the table itself.
//! - [`Boxed<N>`]: a heap slice of exactly `N` elements, allocated fallibly.
//! - [`Heap`]: a `Vec<T>` whose length is chosen (and changed) at run time.

use std::convert::Infallible;

use crate::error::TableError;

/// A strategy for holding one column of leaf values.
pub trait Storage: 'static {
    /// The concrete container holding the values of a leaf column of type `T`.
    type Column<T>;

    /// The error returned when a column cannot be allocated.
    type Error: std::error::Error + 'static;

    /// Allocates a column of `len` default values.
    ///
    /// Fixed storages always allocate their own length; `len` must match it.
    fn try_allocate<T: Default>(len: usize) -> Result<Self::Column<T>, Self::Error>;

    /// Views the column as a slice.
    fn as_slice<T>(column: &Self::Column<T>) -> &[T];

    /// Views the column as a mutable slice.
    fn as_mut_slice<T>(column: &mut Self::Column<T>) -> &mut [T];
}

/// A storage whose column length is a compile-time constant.
pub trait FixedStorage: Storage {
    /// The number of slots in every column.
    const LEN: usize;
}

/// A storage whose columns can change length after allocation.
pub trait GrowableStorage: Storage<Error = TableError> {
    /// Ensures the column can hold `len` elements without reallocating.
    fn try_reserve<T>(column: &mut Self::Column<T>, len: usize) -> Result<(), TableError>;

    /// Sets the column length to `len`, filling new slots with `T::default()`.
    ///
    /// Never allocates if [`try_reserve`](Self::try_reserve) succeeded for the
    /// same `len` beforehand.
    fn resize<T: Default>(column: &mut Self::Column<T>, len: usize);
}

/// Columns stored as inline `[T; N]` arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline<const N: usize>;

impl<const N: usize> Storage for Inline<N> {
    type Column<T> = [T; N];
    type Error = Infallible;

    fn try_allocate<T: Default>(len: usize) -> Result<Self::Column<T>, Self::Error> {
        debug_assert_eq!(len, N, "inline columns always hold {N} elements");
        Ok(std::array::from_fn(|_| T::default()))
    }

    #[inline]
    fn as_slice<T>(column: &Self::Column<T>) -> &[T] {
        column
    }

    #[inline]
    fn as_mut_slice<T>(column: &mut Self::Column<T>) -> &mut [T] {
        column
    }
}

impl<const N: usize> FixedStorage for Inline<N> {
    const LEN: usize = N;
}

/// Columns stored as heap slices of exactly `N` elements.
///
/// Used for the blocks of a growable blocked table: each block has a
/// statically known size but is allocated separately, and its data never
/// moves once allocated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boxed<const N: usize>;

impl<const N: usize> Storage for Boxed<N> {
    type Column<T> = Box<[T]>;
    type Error = TableError;

    fn try_allocate<T: Default>(len: usize) -> Result<Self::Column<T>, Self::Error> {
        debug_assert_eq!(len, N, "boxed columns always hold {N} elements");
        allocate_vec(N).map(Vec::into_boxed_slice)
    }

    #[inline]
    fn as_slice<T>(column: &Self::Column<T>) -> &[T] {
        column
    }

    #[inline]
    fn as_mut_slice<T>(column: &mut Self::Column<T>) -> &mut [T] {
        column
    }
}

impl<const N: usize> FixedStorage for Boxed<N> {
    const LEN: usize = N;
}

/// Columns stored as `Vec<T>` with a run-time length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heap;

impl Storage for Heap {
    type Column<T> = Vec<T>;
    type Error = TableError;

    fn try_allocate<T: Default>(len: usize) -> Result<Self::Column<T>, Self::Error> {
        allocate_vec(len)
    }

    #[inline]
    fn as_slice<T>(column: &Self::Column<T>) -> &[T] {
        column
    }

    #[inline]
    fn as_mut_slice<T>(column: &mut Self::Column<T>) -> &mut [T] {
        column
    }
}

impl GrowableStorage for Heap {
    fn try_reserve<T>(column: &mut Self::Column<T>, len: usize) -> Result<(), TableError> {
        let additional = len.saturating_sub(column.len());
        column
            .try_reserve_exact(additional)
            .map_err(|source| reservation_failed::<T>(len, source))
    }

    fn resize<T: Default>(column: &mut Self::Column<T>, len: usize) {
        column.resize_with(len, T::default);
    }
}

/// Allocates a vector of exactly `len` default values, reporting failure.
fn allocate_vec<T: Default>(len: usize) -> Result<Vec<T>, TableError> {
    let mut column = Vec::new();
    column
        .try_reserve_exact(len)
        .map_err(|source| reservation_failed::<T>(len, source))?;
    column.resize_with(len, T::default);
    Ok(column)
}

fn reservation_failed<T>(len: usize, source: std::collections::TryReserveError) -> TableError {
    let field = std::any::type_name::<T>();
    log::warn!("Column allocation failed: {len} elements of `{field}`: {source}");
    TableError::AllocationFailed { field, len, source }
}
