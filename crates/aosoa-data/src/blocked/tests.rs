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

use std::cell::Cell;

use aosoa_core::{ColumnInfo, Storage};

use super::*;
use crate::{traverse, Record, TablePosition};

// --- RECORDS FOR TESTING ---

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Sample {
    value: i32,
    weight: f64,
}

fn sample(index: usize) -> Sample {
    Sample {
        value: index as i32,
        weight: index as f64 * 0.5,
    }
}

thread_local! {
    /// Column allocations `Rationed` still grants on this thread.
    static ALLOCATIONS_LEFT: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// Fixed boxed columns that fail once the thread's allocation budget runs out.
struct Rationed<const N: usize>;

impl<const N: usize> Storage for Rationed<N> {
    type Column<T> = Box<[T]>;
    type Error = TableError;

    fn try_allocate<T: Default>(len: usize) -> Result<Box<[T]>, TableError> {
        let left = ALLOCATIONS_LEFT.with(Cell::get);
        if left == 0 {
            let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
            return Err(TableError::AllocationFailed {
                field: std::any::type_name::<T>(),
                len,
                source,
            });
        }
        ALLOCATIONS_LEFT.with(|budget| budget.set(left - 1));
        Ok((0..len).map(|_| T::default()).collect())
    }

    fn as_slice<T>(column: &Box<[T]>) -> &[T] {
        column
    }

    fn as_mut_slice<T>(column: &mut Box<[T]>) -> &mut [T] {
        column
    }
}

impl<const N: usize> FixedStorage for Rationed<N> {
    const LEN: usize = N;
}

fn block_sizes<R: FieldList, S: FixedStorage>(table: &BlockedTable<R, S>) -> Vec<usize> {
    (0..table.block_count())
        .map(|block| table.block_size(block))
        .collect()
}

// --- TESTS ---

#[test]
fn test_vector_splits_into_blocks() {
    let table = BlockedTableVector::<Sample, 2>::try_new(5).unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(table.block_count(), 3);
    assert_eq!(block_sizes(&table), [2, 2, 1]);
}

#[test]
fn test_exact_multiple_has_full_last_block() {
    let table = BlockedTableVector::<Sample, 4>::try_new(8).unwrap();

    assert_eq!(table.block_count(), 2);
    assert_eq!(block_sizes(&table), [4, 4]);
}

#[test]
fn test_block_count_is_ceiling_for_any_length() {
    for len in 0..40 {
        let table = BlockedTableVector::<u8, 3>::try_new(len).unwrap();
        assert_eq!(table.block_count(), len.div_ceil(3), "len = {len}");
        if len > 0 {
            let last = table.block_count() - 1;
            assert_eq!(table.block_size(last), len - last * 3, "len = {len}");
        }
    }
}

#[test]
fn test_global_index_maps_to_block_and_offset() {
    // --- 1. SETUP ---
    let mut table = BlockedTableVector::<Sample, 3>::try_new(7).unwrap();

    // --- 2. ACTION ---
    for index in 0..7 {
        table.set(index, sample(index));
    }

    // --- 3. ASSERTIONS ---
    assert_eq!(*table.block(1).at(2).value, 5);
    assert_eq!(*table.block(2).at(0).value, 6);
    for index in 0..7 {
        assert_eq!(table.get(index), sample(index));
    }
}

#[test]
fn test_growth_never_relocates_blocks() {
    // --- 1. SETUP ---
    let mut table = BlockedTableVector::<Sample, 4>::try_new(6).unwrap();
    table.set(5, sample(5));
    let before: Vec<ColumnInfo> = (0..table.block_count())
        .flat_map(|block| table.block(block).column_info())
        .collect();

    // --- 2. ACTION ---
    table.try_grow(11).unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(table.len(), 17);
    assert_eq!(block_sizes(&table), [4, 4, 4, 4, 1]);
    assert_eq!(table.get(5), sample(5));
    let after: Vec<ColumnInfo> = (0..2)
        .flat_map(|block| table.block(block).column_info())
        .collect();
    let addresses = |info: &[ColumnInfo]| info.iter().map(|c| c.addr).collect::<Vec<_>>();
    assert_eq!(addresses(&before), addresses(&after));
    assert_eq!(table.get(16), Sample::default());
}

#[test]
fn test_shrink_then_grow_exposes_defaults() {
    // --- 1. SETUP ---
    let mut table = BlockedTableVector::<Sample, 4>::try_new(8).unwrap();
    for index in 0..8 {
        table.set(index, sample(index));
    }

    // --- 2. ACTION ---
    table.try_resize(5).unwrap();
    assert_eq!(block_sizes(&table), [4, 1]);
    table.try_resize(8).unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(table.get(4), sample(4));
    for index in 5..8 {
        assert_eq!(table.get(index), Sample::default(), "slot {index} was released");
    }
}

#[test]
fn test_resize_to_zero_drops_all_blocks() {
    let mut table = BlockedTableVector::<Sample, 2>::try_new(5).unwrap();
    table.try_resize(0).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.block_count(), 0);
    assert_eq!(table.begin(), table.end());
}

#[test]
fn test_grow_overflow_is_reported() {
    let mut table = BlockedTableVector::<u8, 2>::try_new(3).unwrap();

    match table.try_grow(usize::MAX) {
        Err(TableError::CapacityOverflow { len, additional }) => {
            assert_eq!(len, 3);
            assert_eq!(additional, usize::MAX);
        }
        other => panic!("expected an overflow, got {other:?}"),
    }
    assert_eq!(table.len(), 3);
}

#[test]
fn test_failed_growth_leaves_table_untouched() {
    let mut table = BlockedTableVector::<u64, 8>::try_new(10).unwrap();

    let result = table.try_resize(usize::MAX / 2);
    assert!(matches!(result, Err(TableError::AllocationFailed { .. })));
    assert_eq!(table.len(), 10);
    assert_eq!(block_sizes(&table), [8, 2]);
}

#[test]
fn test_partial_block_growth_rolls_back() {
    // --- 1. SETUP ---
    ALLOCATIONS_LEFT.with(|budget| budget.set(usize::MAX));
    let mut table = BlockedTable::<(u32, u16), Rationed<4>>::try_new(6).unwrap();
    table.set(5, (7, 8));

    // --- 2. ACTION ---
    // Two columns per block: the first new block fits, the second does not.
    ALLOCATIONS_LEFT.with(|budget| budget.set(3));
    let result = table.try_grow(8);

    // --- 3. ASSERTIONS ---
    assert!(matches!(
        result,
        Err(TableError::AllocationFailed { field: "u16", len: 4, .. })
    ));
    assert_eq!(table.len(), 6);
    assert_eq!(block_sizes(&table), [4, 2]);
    assert_eq!(table.get(5), (7, 8));

    ALLOCATIONS_LEFT.with(|budget| budget.set(usize::MAX));
    table.try_grow(8).unwrap();
    assert_eq!(block_sizes(&table), [4, 4, 4, 2]);
    assert_eq!(table.get(5), (7, 8));
}

#[test]
fn test_block_views_keep_block_lengths() {
    // --- 1. SETUP ---
    let mut array = BlockedTableArray::<u32, 4, 10>::new();
    let mut vector = BlockedTableVector::<u32, 4>::try_new(5).unwrap();

    // --- 2. ACTION ---
    {
        let mut last = array.block_mut(2);
        assert_eq!(last.columns_mut().len(), 2, "Only live slots are exposed");
        last.columns_mut().fill(9);
        last.set(0, 1);
    }
    vector.block_mut(1).columns_mut().fill(3);
    traverse::for_each_range_mut(&mut vector, |mut extent, range, _| {
        assert_eq!(extent.columns_mut().len(), range.len());
    });

    // --- 3. ASSERTIONS ---
    assert_eq!(array.len(), 10);
    assert_eq!(block_sizes(&array), [4, 4, 2]);
    assert_eq!(array.iter().count(), 10);
    assert_eq!(array.get(8), 1);
    assert_eq!(array.get(9), 9);

    assert_eq!(vector.len(), 5);
    assert_eq!(block_sizes(&vector), [4, 1]);
    assert_eq!(vector.iter().len(), 5);
    assert_eq!(vector.get(4), 3);

    let mut visited = 0;
    traverse::for_each(&vector, |_| visited += 1);
    assert_eq!(visited, 5);
}

#[test]
fn test_array_holds_fixed_blocks() {
    let mut table = BlockedTableArray::<Sample, 4, 10>::new();

    assert_eq!(table.len(), 10);
    assert_eq!(block_sizes(&table), [4, 4, 2]);

    table.set(9, sample(9));
    *table.at_mut(0).weight = 3.5;
    assert_eq!(table.get(9), sample(9));
    assert_eq!(*table.at(0).weight, 3.5);
}

#[test]
fn test_positions_span_blocks() {
    let table = BlockedTableVector::<u8, 2>::try_new(5).unwrap();

    assert_eq!(table.begin(), TablePosition::new(0, 0));
    assert_eq!(table.end(), TablePosition::new(3, 0));
    assert_eq!(table.position_of(3), TablePosition::new(1, 1));
    assert_eq!(table.position_of(5), table.end());

    // Stepping past the end of a block moves to the next block.
    assert_eq!(
        table.next_position(TablePosition::new(0, 1)),
        TablePosition::new(1, 0)
    );
    // Leaving the last element yields the end position.
    assert_eq!(table.next_position(TablePosition::new(2, 0)), table.end());
    assert_eq!(table.next_position(table.end()), table.end());

    let all: Vec<TablePosition> = table.positions(table.begin(), table.end()).collect();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(all[4], TablePosition::new(2, 0));
}

#[test]
fn test_iter_walks_blocks_in_order() {
    let mut table = BlockedTableVector::<Sample, 3>::try_new(0).unwrap();
    table.try_grow(7).unwrap();
    table.set(6, sample(6));

    assert_eq!(table.iter().len(), 7);
    assert_eq!((&table).into_iter().count(), 7);
    assert_eq!(*table.at_position(TablePosition::new(2, 0)).value, 6);
    let values: Vec<i32> = table.iter().map(|element| *element.value).collect();
    assert_eq!(values, [0, 0, 0, 0, 0, 0, 6]);
}

#[test]
#[should_panic(expected = "index out of bounds: the len is 5 but the index is 5")]
fn test_at_past_len_panics() {
    let table = BlockedTableVector::<Sample, 2>::try_new(5).unwrap();
    // Slot 5 exists in the last block but is not live.
    let _ = table.at(5);
}
