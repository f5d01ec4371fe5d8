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

//! # AoSoA Core
//!
//! Foundational crate containing the contracts shared by every SoA table:
//!
//! - [`FieldList`]: the compile-time composition of a record's leaf fields,
//!   producing both the column layout and the aliasing proxies.
//! - [`Storage`] and its kinds ([`Inline`], [`Boxed`], [`Heap`]): how each
//!   leaf column is held in memory.
//! - [`LeafField`] / [`ColumnInfo`]: metadata about flattened fields and the
//!   allocated columns.
//! - [`TableError`]: the failures a table constructor can report.

#![warn(missing_docs)]

mod error;
mod field_list;
mod leaf;
mod storage;

pub use error::TableError;
pub use field_list::{FieldList, Record};
pub use leaf::{ColumnInfo, LeafField};
pub use storage::{Boxed, FixedStorage, GrowableStorage, Heap, Inline, Storage};
