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

//! The field-list composer: turns a nested list of fields into parallel
//! columns and into proxies aliasing one slot of each column.

use std::ops::Range;

use crate::error::TableError;
use crate::leaf::{ColumnInfo, LeafField};
use crate::storage::{GrowableStorage, Storage};

/// A compile-time description of a record's (possibly nested) fields.
///
/// A `FieldList` is one of:
///
/// - a **leaf** scalar (every primitive number, `bool`, `char`, or a type
///   declared with [`impl_leaf_field!`](crate::impl_leaf_field)), stored in
///   exactly one column;
/// - a **tuple** of 1 to 16 entries, each itself a `FieldList`;
/// - a **record** struct deriving `Record`, which delegates to the tuple of
///   its field types.
///
/// Nested entries never flatten their *types*: the columns of `((f32, f32), u8)`
/// are `((C<f32>, C<f32>), C<u8>)`. The *leaf order* is still the flattened,
/// bases-first order, so a base composition always owns a prefix of the leaf
/// columns of anything built on top of it.
///
/// The [`Ref`](Self::Ref) and [`Mut`](Self::Mut) proxies follow the same
/// shape. For a tuple they are the tuple of the entries' proxies: the first
/// element is the already composed proxy of the leading entry, the remaining
/// elements are the handles for the rest. A record proxy is built from exactly
/// that tuple.
///
/// # Examples
///
/// ```
/// use aosoa_core::{FieldList, Heap};
///
/// type Base = (f32, f32);
/// type Derived = (Base, u32);
///
/// let mut columns = <Derived as FieldList>::try_allocate::<Heap>(4).unwrap();
/// {
///     let ((x, y), id) = <Derived as FieldList>::get_mut::<Heap>(&mut columns, 2);
///     *x = 1.0;
///     *y = 2.0;
///     *id = 7;
/// }
/// assert_eq!(<Derived as FieldList>::LEN, 3);
/// assert_eq!(columns.0 .1[2], 2.0);
/// assert_eq!(columns.1[2], 7);
/// ```
pub trait FieldList: Sized + 'static {
    /// The number of leaf fields after flattening.
    const LEN: usize;

    /// One column per leaf, nested the same way as the composition.
    type Columns<S: Storage>;

    /// A shared proxy aliasing one slot of every leaf column.
    type Ref<'a>: Copy
    where
        Self: 'a;

    /// An exclusive proxy aliasing one slot of every leaf column.
    type Mut<'a>
    where
        Self: 'a;

    /// Shared slices of every leaf column, nested like the composition.
    type Slices<'a>
    where
        Self: 'a;

    /// Exclusive slices of every leaf column, nested like the composition.
    type SlicesMut<'a>
    where
        Self: 'a;

    /// Allocates every leaf column with `len` default values.
    ///
    /// Either all columns are allocated or none: on failure the columns that
    /// were already allocated are dropped before the error is returned.
    fn try_allocate<S: Storage>(len: usize) -> Result<Self::Columns<S>, S::Error>;

    /// Ensures every column can grow to `len` elements without reallocating.
    fn try_reserve<S: GrowableStorage>(
        columns: &mut Self::Columns<S>,
        len: usize,
    ) -> Result<(), TableError>;

    /// Sets every column to `len` elements.
    fn resize<S: GrowableStorage>(columns: &mut Self::Columns<S>, len: usize);

    /// Resets the slots in `range` of every column to their default value.
    fn reset<S: Storage>(columns: &mut Self::Columns<S>, range: Range<usize>);

    /// Binds the slot at `index` of every column into a shared proxy.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the columns.
    fn get<'a, S: Storage>(columns: &'a Self::Columns<S>, index: usize) -> Self::Ref<'a>;

    /// Binds the slot at `index` of every column into an exclusive proxy.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the columns.
    fn get_mut<'a, S: Storage>(columns: &'a mut Self::Columns<S>, index: usize)
        -> Self::Mut<'a>;

    /// Views the slots in `range` of every column as slices.
    ///
    /// # Panics
    ///
    /// Panics if `range` is outside the columns.
    fn slices<'a, S: Storage>(columns: &'a Self::Columns<S>, range: Range<usize>)
        -> Self::Slices<'a>;

    /// Views the slots in `range` of every column as mutable slices.
    ///
    /// # Panics
    ///
    /// Panics if `range` is outside the columns.
    fn slices_mut<'a, S: Storage>(
        columns: &'a mut Self::Columns<S>,
        range: Range<usize>,
    ) -> Self::SlicesMut<'a>;

    /// Copies the aliased values out into an owned record.
    fn load(reference: Self::Ref<'_>) -> Self;

    /// Moves every field of `value` into the aliased slots.
    fn store(reference: Self::Mut<'_>, value: Self);

    /// Appends the flattened leaf fields, bases first.
    fn leaves(out: &mut Vec<LeafField>);

    /// Appends a description of every allocated column, in leaf order.
    fn describe<S: Storage>(columns: &Self::Columns<S>, out: &mut Vec<ColumnInfo>);

    /// Returns the flattened leaf fields, bases first.
    fn leaf_fields() -> Vec<LeafField> {
        let mut out = Vec::with_capacity(Self::LEN);
        Self::leaves(&mut out);
        out
    }
}

/// A named record declared with `#[derive(Record)]`.
///
/// Records are the only compositions that may appear as a `#[record(base)]`
/// field: the derive checks this bound on the base type, so composing on top
/// of a bare scalar or tuple is rejected at compile time.
pub trait Record: FieldList {}

/// Implements [`FieldList`] for one or more leaf scalar types.
///
/// A leaf is stored in a single column; its proxies are plain `&T` and
/// `&mut T`. The type must implement `Default` (new slots) and `Clone`
/// (loading values out of a table).
///
/// ```
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// struct Meters(f64);
///
/// aosoa_core::impl_leaf_field!(Meters);
///
/// assert_eq!(<Meters as aosoa_core::FieldList>::LEN, 1);
/// ```
#[macro_export]
macro_rules! impl_leaf_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldList for $ty {
                const LEN: usize = 1;

                type Columns<S: $crate::Storage> = <S as $crate::Storage>::Column<$ty>;
                type Ref<'a> = &'a $ty where Self: 'a;
                type Mut<'a> = &'a mut $ty where Self: 'a;
                type Slices<'a> = &'a [$ty] where Self: 'a;
                type SlicesMut<'a> = &'a mut [$ty] where Self: 'a;

                #[inline]
                fn try_allocate<S: $crate::Storage>(
                    len: usize,
                ) -> ::core::result::Result<Self::Columns<S>, <S as $crate::Storage>::Error> {
                    <S as $crate::Storage>::try_allocate::<$ty>(len)
                }

                #[inline]
                fn try_reserve<S: $crate::GrowableStorage>(
                    columns: &mut Self::Columns<S>,
                    len: usize,
                ) -> ::core::result::Result<(), $crate::TableError> {
                    <S as $crate::GrowableStorage>::try_reserve::<$ty>(columns, len)
                }

                #[inline]
                fn resize<S: $crate::GrowableStorage>(columns: &mut Self::Columns<S>, len: usize) {
                    <S as $crate::GrowableStorage>::resize::<$ty>(columns, len)
                }

                #[inline]
                fn reset<S: $crate::Storage>(
                    columns: &mut Self::Columns<S>,
                    range: ::core::ops::Range<usize>,
                ) {
                    <S as $crate::Storage>::as_mut_slice::<$ty>(columns)[range]
                        .fill_with(<$ty as ::core::default::Default>::default);
                }

                #[inline]
                fn get<'a, S: $crate::Storage>(
                    columns: &'a Self::Columns<S>,
                    index: usize,
                ) -> Self::Ref<'a> {
                    &<S as $crate::Storage>::as_slice::<$ty>(columns)[index]
                }

                #[inline]
                fn get_mut<'a, S: $crate::Storage>(
                    columns: &'a mut Self::Columns<S>,
                    index: usize,
                ) -> Self::Mut<'a> {
                    &mut <S as $crate::Storage>::as_mut_slice::<$ty>(columns)[index]
                }

                #[inline]
                fn slices<'a, S: $crate::Storage>(
                    columns: &'a Self::Columns<S>,
                    range: ::core::ops::Range<usize>,
                ) -> Self::Slices<'a> {
                    &<S as $crate::Storage>::as_slice::<$ty>(columns)[range]
                }

                #[inline]
                fn slices_mut<'a, S: $crate::Storage>(
                    columns: &'a mut Self::Columns<S>,
                    range: ::core::ops::Range<usize>,
                ) -> Self::SlicesMut<'a> {
                    &mut <S as $crate::Storage>::as_mut_slice::<$ty>(columns)[range]
                }

                #[inline]
                fn load(reference: Self::Ref<'_>) -> Self {
                    <$ty as ::core::clone::Clone>::clone(reference)
                }

                #[inline]
                fn store(reference: Self::Mut<'_>, value: Self) {
                    *reference = value;
                }

                fn leaves(out: &mut ::std::vec::Vec<$crate::LeafField>) {
                    out.push($crate::LeafField::of::<$ty>());
                }

                fn describe<S: $crate::Storage>(
                    columns: &Self::Columns<S>,
                    out: &mut ::std::vec::Vec<$crate::ColumnInfo>,
                ) {
                    out.push($crate::ColumnInfo::of::<$ty>(
                        <S as $crate::Storage>::as_slice::<$ty>(columns),
                    ));
                }
            }
        )+
    };
}

impl_leaf_field!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char
);

// Tuples compose their entries in order. The leading entry is the "base":
// its columns and proxy sit at index 0 and stay intact under further nesting.
macro_rules! impl_field_list_tuple {
    ($($E:ident $idx:tt),+) => {
        impl<$($E: FieldList),+> FieldList for ($($E,)+) {
            const LEN: usize = 0 $(+ $E::LEN)+;

            type Columns<S: Storage> = ($($E::Columns<S>,)+);
            type Ref<'a> = ($($E::Ref<'a>,)+) where Self: 'a;
            type Mut<'a> = ($($E::Mut<'a>,)+) where Self: 'a;
            type Slices<'a> = ($($E::Slices<'a>,)+) where Self: 'a;
            type SlicesMut<'a> = ($($E::SlicesMut<'a>,)+) where Self: 'a;

            fn try_allocate<S: Storage>(len: usize) -> Result<Self::Columns<S>, S::Error> {
                Ok(($($E::try_allocate::<S>(len)?,)+))
            }

            fn try_reserve<S: GrowableStorage>(
                columns: &mut Self::Columns<S>,
                len: usize,
            ) -> Result<(), TableError> {
                $($E::try_reserve::<S>(&mut columns.$idx, len)?;)+
                Ok(())
            }

            fn resize<S: GrowableStorage>(columns: &mut Self::Columns<S>, len: usize) {
                $($E::resize::<S>(&mut columns.$idx, len);)+
            }

            fn reset<S: Storage>(columns: &mut Self::Columns<S>, range: Range<usize>) {
                $($E::reset::<S>(&mut columns.$idx, range.clone());)+
            }

            #[inline]
            fn get<'a, S: Storage>(columns: &'a Self::Columns<S>, index: usize) -> Self::Ref<'a> {
                ($($E::get::<S>(&columns.$idx, index),)+)
            }

            #[inline]
            fn get_mut<'a, S: Storage>(
                columns: &'a mut Self::Columns<S>,
                index: usize,
            ) -> Self::Mut<'a> {
                ($($E::get_mut::<S>(&mut columns.$idx, index),)+)
            }

            #[inline]
            fn slices<'a, S: Storage>(
                columns: &'a Self::Columns<S>,
                range: Range<usize>,
            ) -> Self::Slices<'a> {
                ($($E::slices::<S>(&columns.$idx, range.clone()),)+)
            }

            #[inline]
            fn slices_mut<'a, S: Storage>(
                columns: &'a mut Self::Columns<S>,
                range: Range<usize>,
            ) -> Self::SlicesMut<'a> {
                ($($E::slices_mut::<S>(&mut columns.$idx, range.clone()),)+)
            }

            fn load(reference: Self::Ref<'_>) -> Self {
                ($($E::load(reference.$idx),)+)
            }

            fn store(reference: Self::Mut<'_>, value: Self) {
                $($E::store(reference.$idx, value.$idx);)+
            }

            fn leaves(out: &mut Vec<LeafField>) {
                $($E::leaves(out);)+
            }

            fn describe<S: Storage>(columns: &Self::Columns<S>, out: &mut Vec<ColumnInfo>) {
                $($E::describe::<S>(&columns.$idx, out);)+
            }
        }
    };
}

impl_field_list_tuple!(E0 0);
impl_field_list_tuple!(E0 0, E1 1);
impl_field_list_tuple!(E0 0, E1 1, E2 2);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9);
impl_field_list_tuple!(E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10);
impl_field_list_tuple!(
    E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10, E11 11
);
impl_field_list_tuple!(
    E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10, E11 11, E12 12
);
impl_field_list_tuple!(
    E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10, E11 11, E12 12, E13 13
);
impl_field_list_tuple!(
    E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10, E11 11, E12 12, E13 13,
    E14 14
);
impl_field_list_tuple!(
    E0 0, E1 1, E2 2, E3 3, E4 4, E5 5, E6 6, E7 7, E8 8, E9 9, E10 10, E11 11, E12 12, E13 13,
    E14 14, E15 15
);
