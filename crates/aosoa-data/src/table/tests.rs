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

use super::*;
use crate::{Record, TablePosition};

// --- RECORDS FOR TESTING ---

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Point {
    x: f32,
    y: f32,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Tagged {
    #[record(base)]
    point: Point,
    id: u32,
    alive: bool,
}

fn tagged(index: usize) -> Tagged {
    Tagged {
        point: Point {
            x: index as f32,
            y: -(index as f32),
        },
        id: index as u32 + 100,
        alive: index % 2 == 0,
    }
}

// --- TESTS ---

#[test]
fn test_flat_table_is_default_initialised() {
    let table = FlatTable::<Tagged, 4>::new();

    assert_eq!(table.len(), 4);
    assert!(!table.is_empty());
    for index in 0..4 {
        assert_eq!(table.get(index), Tagged::default());
    }
}

#[test]
fn test_proxy_writes_alias_columns() {
    // --- 1. SETUP ---
    let mut table = FlatTable::<Tagged, 3>::new();

    // --- 2. ACTION ---
    {
        let mut element = table.at_mut(1);
        *element.x = 4.0;
        *element.y = 5.0;
        *element.id = 6;
        *element.alive = true;
    }

    // --- 3. ASSERTIONS ---
    let element = table.at(1);
    assert_eq!(*element.x, 4.0);
    assert_eq!(*element.point.y, 5.0, "Base members are reachable by name too");
    assert_eq!(*element.id, 6);
    assert!(*element.alive);

    let ((x, y), id, alive) = table.columns();
    assert_eq!(x, &[0.0, 4.0, 0.0]);
    assert_eq!(y, &[0.0, 5.0, 0.0]);
    assert_eq!(id, &[0, 6, 0]);
    assert_eq!(alive, &[false, true, false]);
}

#[test]
fn test_derived_proxy_truncates_to_base() {
    let mut table = FlatTable::<Tagged, 2>::new();
    table.set(0, tagged(7));

    let base: PointRef<'_> = table.at(0).into_base();
    assert_eq!(Point::load(base), Point { x: 7.0, y: -7.0 });
}

#[test]
fn test_get_set_round_trip() {
    let mut table = FlatDynamicTable::<Tagged>::try_new(5).unwrap();
    for index in 0..5 {
        table.set(index, tagged(index));
    }
    for index in 0..5 {
        assert_eq!(table.get(index), tagged(index));
    }
}

#[test]
fn test_from_records_keeps_order() {
    let table = FlatDynamicTable::try_from_records((0..6).map(tagged)).unwrap();

    assert_eq!(table.len(), 6);
    let ids: Vec<u32> = table.iter().map(|element| *element.id).collect();
    assert_eq!(ids, [100, 101, 102, 103, 104, 105]);
}

#[test]
fn test_resize_keeps_prefix_and_defaults_new_slots() {
    // --- 1. SETUP ---
    let mut table = FlatDynamicTable::try_from_records((0..3).map(tagged)).unwrap();

    // --- 2. ACTION ---
    table.try_resize(5).unwrap();

    // --- 3. ASSERTIONS ---
    assert_eq!(table.len(), 5);
    assert_eq!(table.get(2), tagged(2));
    assert_eq!(table.get(4), Tagged::default());
    assert!(table.column_info().iter().all(|column| column.len == 5));

    table.try_resize(1).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0), tagged(0));
}

#[test]
fn test_failed_resize_leaves_table_untouched() {
    let mut table = FlatDynamicTable::try_from_records((0..2).map(tagged)).unwrap();

    let result = table.try_resize(usize::MAX / 4);
    assert!(matches!(result, Err(TableError::AllocationFailed { .. })));

    assert_eq!(table.len(), 2);
    assert_eq!(table.get(1), tagged(1));
    assert!(table.column_info().iter().all(|column| column.len == 2));
}

#[test]
fn test_columns_follow_bases_first_order() {
    let table = FlatDynamicTable::<Tagged>::try_new(2).unwrap();
    let info = table.column_info();

    let names: Vec<&str> = info.iter().map(|column| column.field.type_name).collect();
    assert_eq!(names, ["f32", "f32", "u32", "bool"]);

    // The columns of a record and of the equivalent tuple are laid out alike.
    let tuple = FlatDynamicTable::<((f32, f32), u32, bool)>::try_new(2).unwrap();
    let tuple_fields: Vec<_> = tuple.column_info().iter().map(|c| c.field).collect();
    let record_fields: Vec<_> = info.iter().map(|c| c.field).collect();
    assert_eq!(record_fields, tuple_fields);
}

#[test]
fn test_proxy_slots_are_column_slots() {
    let mut table = FlatDynamicTable::<Point>::try_new(4).unwrap();
    let info = table.column_info();

    let element = table.at_mut(3);
    assert_eq!(element.x as *mut f32 as usize, info[0].slot_addr(3));
    assert_eq!(element.y as *mut f32 as usize, info[1].slot_addr(3));
}

#[test]
fn test_flat_table_is_a_single_extent() {
    let table = FlatTable::<Point, 3>::new();

    assert_eq!(table.extents().len(), 1);
    assert_eq!(table.begin(), TablePosition::new(0, 0));
    assert_eq!(table.end(), TablePosition::new(1, 0));
    assert_eq!(table.position_of(2), TablePosition::new(0, 2));
    assert_eq!(table.index_of(table.end()), 3);
}

#[test]
fn test_empty_dynamic_table() {
    let table = FlatDynamicTable::<Point>::try_new(0).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.begin(), table.end());
    assert_eq!(table.iter().count(), 0);
}

#[test]
fn test_iter_is_exact_size() {
    let table = FlatTable::<u8, 7>::new();
    let mut iter = table.iter();

    assert_eq!(iter.len(), 7);
    iter.next();
    assert_eq!(iter.len(), 6);
    assert_eq!((&table).into_iter().count(), 7);
}

#[test]
#[should_panic(expected = "index out of bounds: the len is 2 but the index is 2")]
fn test_at_past_len_panics() {
    let table = FlatTable::<Point, 2>::new();
    let _ = table.at(2);
}
