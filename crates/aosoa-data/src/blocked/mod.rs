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

//! Blocked (AoSoA) tables: a sequence of flat blocks of `B` elements each.
//!
//! Every block is itself a SoA [`Table`]. All blocks but the last are full;
//! the last holds the remainder, or a full `B` when the length is a multiple
//! of `B`. There is never an empty trailing block.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use aosoa_core::{Boxed, FieldList, FixedStorage, Inline, TableError};

use crate::extents::Extents;
use crate::table::{ExtentMut, Iter, Table};

/// A table split into blocks of `S::LEN` elements.
///
/// Element `i` lives at offset `i % B` of block `i / B`. Use one of:
///
/// - [`BlockedTableArray<R, B, N>`]: `N` elements in inline blocks.
/// - [`BlockedTableVector<R, B>`]: a run-time number of elements in
///   separately allocated blocks that never move once allocated.
pub struct BlockedTable<R: FieldList, S: FixedStorage> {
    blocks: Vec<Table<R, S>>,
    len: usize,
}

/// A blocked table whose length is chosen and changed at run time.
///
/// Growing only appends blocks and extends the last block in place; no
/// existing element is ever relocated.
pub type BlockedTableVector<R, const B: usize> = BlockedTable<R, Boxed<B>>;

impl<R: FieldList, S: FixedStorage> BlockedTable<R, S> {
    /// The number of elements in a full block.
    pub const BLOCK_LEN: usize = {
        assert!(S::LEN > 0, "blocks must hold at least one element");
        S::LEN
    };

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

    /// Returns the number of blocks, `ceil(len / B)`.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of live elements in block `block`: `B` for all but
    /// the last block, which holds `len - (block_count - 1) * B`.
    ///
    /// # Panics
    ///
    /// Panics if `block >= block_count()`.
    pub fn block_size(&self, block: usize) -> usize {
        self.blocks[block].len()
    }

    /// Returns block `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block >= block_count()`.
    pub fn block(&self, block: usize) -> &Table<R, S> {
        &self.blocks[block]
    }

    /// Returns exclusive access to the elements of block `block`.
    ///
    /// The view cannot change the block's length, so every block but the
    /// last keeps exactly `B` elements.
    ///
    /// # Panics
    ///
    /// Panics if `block >= block_count()`.
    pub fn block_mut(&mut self, block: usize) -> ExtentMut<'_, R, S> {
        ExtentMut::new(&mut self.blocks[block])
    }

    /// Returns every block in order.
    pub fn blocks(&self) -> &[Table<R, S>] {
        &self.blocks
    }

    /// Returns a shared proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn at(&self, index: usize) -> R::Ref<'_> {
        self.check_index(index);
        self.blocks[index / Self::BLOCK_LEN].at(index % Self::BLOCK_LEN)
    }

    /// Returns an exclusive proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> R::Mut<'_> {
        self.check_index(index);
        self.blocks[index / Self::BLOCK_LEN].at_mut(index % Self::BLOCK_LEN)
    }

    /// Copies the element at `index` out of its block.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> R {
        R::load(self.at(index))
    }

    /// Writes `value` into its block at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, value: R) {
        R::store(self.at_mut(index), value);
    }

    /// Returns an iterator over shared proxies of every live element.
    pub fn iter(&self) -> Iter<'_, R, S> {
        Iter::new(&self.blocks)
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

impl<R: FieldList, S: FixedStorage<Error = TableError>> BlockedTable<R, S> {
    /// Creates a table of `len` default elements in `ceil(len / B)` blocks.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] if a block cannot be
    /// allocated. Blocks allocated before the failure are released.
    pub fn try_new(len: usize) -> Result<Self, TableError> {
        let mut table = Self {
            blocks: Vec::new(),
            len: 0,
        };
        table.try_resize(len)?;
        Ok(table)
    }

    /// Appends `additional` default elements.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityOverflow`] if the new length overflows
    /// `usize`, or [`TableError::AllocationFailed`] if a block cannot be
    /// allocated. The table is left unchanged on error.
    pub fn try_grow(&mut self, additional: usize) -> Result<(), TableError> {
        let len = self
            .len
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow {
                len: self.len,
                additional,
            })?;
        self.try_resize(len)
    }

    /// Resizes the table to `len` elements. New elements are default.
    ///
    /// Growing appends blocks and extends the last block in place. Shrinking
    /// drops trailing blocks and resets the released slots of the new last
    /// block, so later growth only ever exposes default values.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::AllocationFailed`] if a block, or the block
    /// directory, cannot be allocated. The table is left unchanged on error.
    pub fn try_resize(&mut self, len: usize) -> Result<(), TableError> {
        let block_len = Self::BLOCK_LEN;
        let needed = len.div_ceil(block_len);
        let previous = self.len;

        match len.cmp(&previous) {
            Ordering::Equal => return Ok(()),
            Ordering::Greater => self.grow_blocks(needed)?,
            Ordering::Less => self.blocks.truncate(needed),
        }

        // Only the boundary block changes length: the old last block when
        // growing, the new last block when shrinking. Appended blocks fill up.
        let first_touched = previous.min(len) / block_len;
        for (block, table) in self.blocks.iter_mut().enumerate().skip(first_touched) {
            let live = (len - block * block_len).min(block_len);
            if live < table.len() {
                table.reset(live..table.len());
            }
            table.set_len(live);
        }
        self.len = len;

        log::debug!(
            "Resized blocked table from {previous} to {len} elements ({} blocks of {block_len})",
            self.blocks.len()
        );
        Ok(())
    }

    /// Appends empty blocks until there are `needed`, all or nothing.
    fn grow_blocks(&mut self, needed: usize) -> Result<(), TableError> {
        let existing = self.blocks.len();
        if needed <= existing {
            return Ok(());
        }

        self.blocks
            .try_reserve_exact(needed - existing)
            .map_err(|source| {
                log::warn!("Block directory allocation failed: {needed} blocks: {source}");
                TableError::AllocationFailed {
                    field: std::any::type_name::<Table<R, S>>(),
                    len: needed,
                    source,
                }
            })?;

        while self.blocks.len() < needed {
            match Table::<R, S>::try_allocate(S::LEN, 0) {
                Ok(block) => self.blocks.push(block),
                Err(error) => {
                    self.blocks.truncate(existing);
                    return Err(error);
                }
            }
        }
        Ok(())
    }
}

impl<R: FieldList, S: FixedStorage> Extents for BlockedTable<R, S> {
    type Record = R;
    type Storage = S;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn block_len(&self) -> usize {
        Self::BLOCK_LEN
    }

    #[inline]
    fn extents(&self) -> &[Table<R, S>] {
        &self.blocks
    }

    #[inline]
    fn extent_mut(&mut self, index: usize) -> ExtentMut<'_, R, S> {
        self.block_mut(index)
    }
}

impl<'a, R: FieldList, S: FixedStorage> IntoIterator for &'a BlockedTable<R, S> {
    type Item = R::Ref<'a>;
    type IntoIter = Iter<'a, R, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<R: FieldList, S: FixedStorage> fmt::Debug for BlockedTable<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockedTable")
            .field("record", &std::any::type_name::<R>())
            .field("len", &self.len)
            .field("block_len", &S::LEN)
            .field("block_count", &self.blocks.len())
            .finish()
    }
}

/// A blocked table of exactly `N` elements in inline blocks of `B`.
///
/// Dereferences to the underlying [`BlockedTable`] for reading. Writes go
/// through element and block views only, so the table always holds `N`
/// elements.
pub struct BlockedTableArray<R: FieldList, const B: usize, const N: usize> {
    table: BlockedTable<R, Inline<B>>,
}

impl<R: FieldList, const B: usize, const N: usize> BlockedTableArray<R, B, N> {
    /// Creates a table of `N` default elements in `ceil(N / B)` blocks.
    pub fn new() -> Self {
        let block_len = BlockedTable::<R, Inline<B>>::BLOCK_LEN;
        let blocks = (0..N.div_ceil(block_len))
            .map(|block| {
                let live = (N - block * block_len).min(block_len);
                match Table::<R, Inline<B>>::try_allocate(block_len, live) {
                    Ok(table) => table,
                    Err(never) => match never {},
                }
            })
            .collect();

        Self {
            table: BlockedTable { blocks, len: N },
        }
    }

    /// Returns an exclusive proxy aliasing the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> R::Mut<'_> {
        self.table.at_mut(index)
    }

    /// Writes `value` into its block at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn set(&mut self, index: usize, value: R) {
        self.table.set(index, value);
    }

    /// Returns exclusive access to the elements of block `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block >= block_count()`.
    pub fn block_mut(&mut self, block: usize) -> ExtentMut<'_, R, Inline<B>> {
        self.table.block_mut(block)
    }
}

impl<R: FieldList, const B: usize, const N: usize> Default for BlockedTableArray<R, B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FieldList, const B: usize, const N: usize> Deref for BlockedTableArray<R, B, N> {
    type Target = BlockedTable<R, Inline<B>>;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}


impl<R: FieldList, const B: usize, const N: usize> Extents for BlockedTableArray<R, B, N> {
    type Record = R;
    type Storage = Inline<B>;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn block_len(&self) -> usize {
        self.table.block_len()
    }

    #[inline]
    fn extents(&self) -> &[Table<R, Inline<B>>] {
        self.table.extents()
    }

    #[inline]
    fn extent_mut(&mut self, index: usize) -> ExtentMut<'_, R, Inline<B>> {
        self.table.block_mut(index)
    }
}

impl<'a, R: FieldList, const B: usize, const N: usize> IntoIterator
    for &'a BlockedTableArray<R, B, N>
{
    type Item = R::Ref<'a>;
    type IntoIter = Iter<'a, R, Inline<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl<R: FieldList, const B: usize, const N: usize> fmt::Debug for BlockedTableArray<R, B, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlockedTableArray").field(&self.table).finish()
    }
}

#[cfg(test)]
mod tests;
