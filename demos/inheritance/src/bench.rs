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

//! The benchmark kernels: one update pass and one reduction pass per repeat.

use std::time::{Duration, Instant};

use aosoa_data::prelude::*;
use aosoa_data::{Storage, Table};

/// The innermost base record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Record)]
pub struct A {
    pub x: f32,
    pub y: f32,
}

/// A record built on top of [`A`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Record)]
pub struct B {
    #[record(base)]
    pub a: A,
    pub u: f32,
    pub v: f32,
}

/// A record built on top of [`B`], so three levels deep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Record)]
pub struct C {
    #[record(base)]
    pub b: B,
    pub p: f32,
    pub q: f32,
}

/// The sums accumulated by one benchmark and how long the repeats took.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub x: f32,
    pub y: f32,
    pub elapsed: Duration,
}

fn initial(index: usize) -> C {
    let i = index as f32;
    C {
        b: B {
            a: A { x: i, y: i + 1.0 },
            u: i + 2.0,
            v: i + 3.0,
        },
        p: i + 4.0,
        q: i + 5.0,
    }
}

/// Indexed passes over a plain slice of records.
#[allow(clippy::needless_range_loop)]
pub fn flat_aos(array: &mut [C], repeat: usize) -> Outcome {
    for (index, element) in array.iter_mut().enumerate() {
        *element = initial(index);
    }

    let (mut global_x, mut global_y) = (0.0, 0.0);
    let start = Instant::now();

    for _ in 0..repeat {
        for i in 0..array.len() {
            array[i].b.a.x += array[i].b.u * array[i].p;
            array[i].b.a.y += array[i].b.v * array[i].q;
        }

        let (mut local_x, mut local_y) = (0.0, 0.0);
        for i in 0..array.len() {
            local_x += array[i].b.a.x;
            local_y += array[i].b.a.y;
        }

        global_x += local_x;
        global_y += local_y;
    }

    Outcome {
        x: global_x,
        y: global_y,
        elapsed: start.elapsed(),
    }
}

/// Indexed passes over a flat table, through `at` / `at_mut` proxies.
pub fn flat_soa<S: Storage>(table: &mut Table<C, S>, repeat: usize) -> Outcome {
    for index in 0..table.len() {
        table.set(index, initial(index));
    }

    let (mut global_x, mut global_y) = (0.0, 0.0);
    let start = Instant::now();

    for _ in 0..repeat {
        for i in 0..table.len() {
            let mut element = table.at_mut(i);
            let (dx, dy) = (*element.u * *element.p, *element.v * *element.q);
            *element.x += dx;
            *element.y += dy;
        }

        let (mut local_x, mut local_y) = (0.0, 0.0);
        for i in 0..table.len() {
            let element = table.at(i);
            local_x += *element.x;
            local_y += *element.y;
        }

        global_x += local_x;
        global_y += local_y;
    }

    Outcome {
        x: global_x,
        y: global_y,
        elapsed: start.elapsed(),
    }
}

/// Traversal passes over a vector of records, the AoS counterpart of [`nested`].
pub fn nested_aos(array: &mut [C], repeat: usize) -> Outcome {
    for (index, element) in array.iter_mut().enumerate() {
        *element = initial(index);
    }

    let (mut global_x, mut global_y) = (0.0, 0.0);
    let start = Instant::now();

    for _ in 0..repeat {
        for element in array.iter_mut() {
            element.b.a.x += element.b.u * element.p;
            element.b.a.y += element.b.v * element.q;
        }

        let (mut local_x, mut local_y) = (0.0, 0.0);
        for element in array.iter() {
            local_x += element.b.a.x;
            local_y += element.b.a.y;
        }

        global_x += local_x;
        global_y += local_y;
    }

    Outcome {
        x: global_x,
        y: global_y,
        elapsed: start.elapsed(),
    }
}

/// Traversal passes over any table, flat or blocked.
pub fn nested<T: Extents<Record = C>>(table: &mut T, repeat: usize) -> Outcome {
    traverse::indexed_for_each_mut(table, |index, element| C::store(element, initial(index)));

    let (mut global_x, mut global_y) = (0.0, 0.0);
    let start = Instant::now();

    for _ in 0..repeat {
        traverse::for_each_mut(table, |mut element| {
            let (dx, dy) = (*element.u * *element.p, *element.v * *element.q);
            *element.x += dx;
            *element.y += dy;
        });

        let (mut local_x, mut local_y) = (0.0, 0.0);
        traverse::for_each(table, |element| {
            local_x += *element.x;
            local_y += *element.y;
        });

        global_x += local_x;
        global_y += local_y;
    }

    Outcome {
        x: global_x,
        y: global_y,
        elapsed: start.elapsed(),
    }
}
