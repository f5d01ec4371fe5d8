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

//! Metadata describing the flattened leaf fields of a composition.

use std::any::TypeId;

/// Identifies one leaf scalar field in the flattened field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafField {
    /// The type name of the leaf, as reported by [`std::any::type_name`].
    pub type_name: &'static str,
    /// The `TypeId` of the leaf type.
    pub type_id: TypeId,
    /// `size_of` the leaf type.
    pub size: usize,
    /// `align_of` the leaf type.
    pub align: usize,
}

impl LeafField {
    /// Describes the leaf type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }
}

/// Describes one allocated column: which leaf it holds, where it starts, and
/// how many slots it has.
///
/// `addr` is the address of the first slot. It identifies the array for
/// comparisons and is never dereferenced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    /// The leaf field stored in this column.
    pub field: LeafField,
    /// The address of the first element of the column.
    pub addr: usize,
    /// The number of slots in the column.
    pub len: usize,
}

impl ColumnInfo {
    /// Describes a column from its backing slice.
    pub fn of<T: 'static>(column: &[T]) -> Self {
        Self {
            field: LeafField::of::<T>(),
            addr: column.as_ptr() as usize,
            len: column.len(),
        }
    }

    /// Returns the address of the slot at `index`.
    pub fn slot_addr(&self, index: usize) -> usize {
        self.addr + index * self.field.size
    }
}
