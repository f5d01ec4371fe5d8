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

//! Traversal of every element of a table, flat or blocked, in one protocol.
//!
//! All functions visit elements in strictly increasing index order, exactly
//! once each. They are written against [`Extents`], so a flat table is
//! visited in a single pass and a blocked table in one pass per block.
//!
//! Three levels are offered, each in a shared and a `_mut` flavour:
//!
//! - [`for_each_range`]: per extent, hands over the extent table (an
//!   [`ExtentMut`] view in the `_mut` flavour), the local range to process and
//!   the logical index of its first element, for tight per-column loops;
//! - [`indexed_for_each`]: per element, with its logical index;
//! - [`for_each`]: per element.
//!
//! The `_between` forms restrict any of them to `[begin, end)` positions.
//! Indices they report are relative to `begin`: the first visited element
//! reports `0`, so the full range `[table.begin(), table.end())` reports the
//! same indices as the unbounded form.
//!
//! Traversal borrows the table, so resizing it mid-traversal is rejected by
//! the compiler.

use std::ops::Range;

use aosoa_core::FieldList;

use crate::extents::Extents;
use crate::position::TablePosition;
use crate::table::{ExtentMut, Table};

/// The shared proxy type of the records in table `T`.
pub type RefOf<'a, T> = <<T as Extents>::Record as FieldList>::Ref<'a>;

/// The exclusive proxy type of the records in table `T`.
pub type MutOf<'a, T> = <<T as Extents>::Record as FieldList>::Mut<'a>;

/// The flat extent type of table `T`.
pub type ExtentOf<T> = Table<<T as Extents>::Record, <T as Extents>::Storage>;

/// The exclusive extent view of table `T`.
pub type ExtentMutOf<'a, T> = ExtentMut<'a, <T as Extents>::Record, <T as Extents>::Storage>;

// --- WHOLE TABLE ---

/// Calls `action` once per non-empty extent with the extent, the local range
/// `0..extent.len()` and the logical index of the extent's first element.
pub fn for_each_range<T, F>(table: &T, mut action: F)
where
    T: Extents,
    F: FnMut(&ExtentOf<T>, Range<usize>, usize),
{
    let stride = table.block_len();
    for (block, extent) in table.extents().iter().enumerate() {
        if !extent.is_empty() {
            action(extent, 0..extent.len(), block * stride);
        }
    }
}

/// Mutable form of [`for_each_range`].
pub fn for_each_range_mut<T, F>(table: &mut T, mut action: F)
where
    T: Extents,
    F: FnMut(ExtentMutOf<'_, T>, Range<usize>, usize),
{
    let stride = table.block_len();
    for block in 0..table.live_blocks() {
        let extent = table.extent_mut(block);
        if !extent.is_empty() {
            let range = 0..extent.len();
            action(extent, range, block * stride);
        }
    }
}

/// Calls `action` with the index and a shared proxy of every element.
///
/// ```
/// use aosoa_data::{traverse, BlockedTableVector};
///
/// let table = BlockedTableVector::<(u32, u32), 2>::try_new(5).unwrap();
/// let mut visited = Vec::new();
/// traverse::indexed_for_each(&table, |index, _| visited.push(index));
/// assert_eq!(visited, [0, 1, 2, 3, 4]);
/// ```
pub fn indexed_for_each<'a, T, F>(table: &'a T, mut action: F)
where
    T: Extents,
    F: FnMut(usize, RefOf<'a, T>),
{
    let stride = table.block_len();
    for (block, extent) in table.extents().iter().enumerate() {
        let first = block * stride;
        for offset in 0..extent.len() {
            action(first + offset, extent.at(offset));
        }
    }
}

/// Calls `action` with a shared proxy of every element.
pub fn for_each<'a, T, F>(table: &'a T, mut action: F)
where
    T: Extents,
    F: FnMut(RefOf<'a, T>),
{
    indexed_for_each(table, |_, element| action(element));
}

/// Calls `action` with the index and an exclusive proxy of every element.
pub fn indexed_for_each_mut<T, F>(table: &mut T, mut action: F)
where
    T: Extents,
    F: FnMut(usize, MutOf<'_, T>),
{
    let stride = table.block_len();
    for block in 0..table.live_blocks() {
        let mut extent = table.extent_mut(block);
        let first = block * stride;
        for offset in 0..extent.len() {
            action(first + offset, extent.at_mut(offset));
        }
    }
}

/// Calls `action` with an exclusive proxy of every element.
pub fn for_each_mut<T, F>(table: &mut T, mut action: F)
where
    T: Extents,
    F: FnMut(MutOf<'_, T>),
{
    indexed_for_each_mut(table, |_, element| action(element));
}

// --- POSITION RANGES ---

/// One piece of a position range: the extent, the local range inside it, and
/// the index of its first element relative to the start of the range.
type Span = (usize, Range<usize>, usize);

/// Splits the logical range `[start, stop)` into per-extent spans.
///
/// The first and last spans may be partial. A range inside one extent yields
/// a single span.
fn spans(start: usize, stop: usize, stride: usize) -> impl Iterator<Item = Span> {
    let blocks = if start < stop {
        start / stride..(stop - 1) / stride + 1
    } else {
        0..0
    };

    blocks.map(move |block| {
        let base = block * stride;
        let low = start.max(base) - base;
        let high = stop.min(base + stride) - base;
        (block, low..high, base + low - start)
    })
}

fn spans_between<T: Extents>(
    table: &T,
    begin: TablePosition,
    end: TablePosition,
) -> impl Iterator<Item = Span> {
    let (start, stop) = (table.index_of(begin), table.index_of(end));
    spans(start, stop, table.block_len())
}

/// [`for_each_range`] restricted to the elements in `[begin, end)`.
///
/// The index handed to `action` is that of the span's first element,
/// relative to `begin`.
pub fn for_each_range_between<T, F>(
    table: &T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(&ExtentOf<T>, Range<usize>, usize),
{
    let extents = table.extents();
    for (block, range, first) in spans_between(table, begin, end) {
        action(&extents[block], range, first);
    }
}

/// Mutable form of [`for_each_range_between`].
pub fn for_each_range_mut_between<T, F>(
    table: &mut T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(ExtentMutOf<'_, T>, Range<usize>, usize),
{
    for (block, range, first) in spans_between(table, begin, end) {
        action(table.extent_mut(block), range, first);
    }
}

/// [`indexed_for_each`] restricted to the elements in `[begin, end)`, with
/// indices relative to `begin`.
pub fn indexed_for_each_between<'a, T, F>(
    table: &'a T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(usize, RefOf<'a, T>),
{
    let extents = table.extents();
    for (block, range, first) in spans_between(table, begin, end) {
        let extent = &extents[block];
        let start = range.start;
        for offset in range {
            action(first + offset - start, extent.at(offset));
        }
    }
}

/// [`for_each`] restricted to the elements in `[begin, end)`.
pub fn for_each_between<'a, T, F>(
    table: &'a T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(RefOf<'a, T>),
{
    indexed_for_each_between(table, begin, end, |_, element| action(element));
}

/// [`indexed_for_each_mut`] restricted to the elements in `[begin, end)`,
/// with indices relative to `begin`.
pub fn indexed_for_each_mut_between<T, F>(
    table: &mut T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(usize, MutOf<'_, T>),
{
    for_each_range_mut_between(table, begin, end, |mut extent, range, first| {
        let start = range.start;
        for offset in range {
            action(first + offset - start, extent.at_mut(offset));
        }
    });
}

/// [`for_each_mut`] restricted to the elements in `[begin, end)`.
pub fn for_each_mut_between<T, F>(
    table: &mut T,
    begin: TablePosition,
    end: TablePosition,
    mut action: F,
) where
    T: Extents,
    F: FnMut(MutOf<'_, T>),
{
    indexed_for_each_mut_between(table, begin, end, |_, element| action(element));
}
