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

//! # AoSoA Data
//!
//! Tables storing records as structures of arrays, flat or split into
//! fixed-size blocks, and the traversal utilities that visit them.
//!
//! - [`table`]: the flat tables, [`FlatTable`] (inline, fixed length) and
//!   [`FlatDynamicTable`] (heap, run-time length).
//! - [`blocked`]: the blocked tables, [`BlockedTableArray`] and
//!   [`BlockedTableVector`], made of flat blocks of `B` elements.
//! - [`Extents`]: the capability shared by every table, describing it as a
//!   sequence of flat extents addressed by [`TablePosition`]s.
//! - [`traverse`]: `for_each` and friends, written once against [`Extents`].
//!
//! The derive macros generate code naming `::aosoa_core`, so crates declaring
//! records depend on `aosoa-core` next to this crate.
//!
//! ```
//! use aosoa_data::prelude::*;
//!
//! #[derive(Debug, Default, Clone, PartialEq, Record)]
//! struct Point {
//!     x: f32,
//!     y: f32,
//! }
//!
//! #[derive(Debug, Default, Clone, PartialEq, Record)]
//! struct Particle {
//!     #[record(base)]
//!     point: Point,
//!     mass: f32,
//! }
//!
//! let mut particles = BlockedTableVector::<Particle, 4>::try_new(10).unwrap();
//! traverse::indexed_for_each_mut(&mut particles, |index, mut particle| {
//!     *particle.x = index as f32;
//!     *particle.mass = 2.0;
//! });
//!
//! let total: f32 = particles.iter().map(|particle| *particle.x * *particle.mass).sum();
//! assert_eq!(total, 90.0);
//! assert_eq!(particles.block_count(), 3);
//! ```

#![warn(missing_docs)]

pub mod blocked;
mod extents;
mod position;
pub mod table;
pub mod traverse;

pub use aosoa_core::{
    Boxed, ColumnInfo, FieldList, FixedStorage, GrowableStorage, Heap, Inline, LeafField, Record,
    Storage, TableError,
};
pub use aosoa_macros::{Field, Record};

pub use blocked::{BlockedTable, BlockedTableArray, BlockedTableVector};
pub use extents::{Extents, Positions};
pub use position::TablePosition;
pub use table::{ExtentMut, FlatDynamicTable, FlatTable, Iter, Table};

/// The items needed to declare records and work with their tables.
pub mod prelude {
    pub use crate::traverse;
    pub use crate::{
        BlockedTableArray, BlockedTableVector, Extents, Field, FieldList, FlatDynamicTable,
        FlatTable, Record, TableError, TablePosition,
    };
}
