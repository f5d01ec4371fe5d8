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

//! Defines the errors reported when table storage cannot be provided.

use std::collections::TryReserveError;
use thiserror::Error;

/// An error raised while allocating or growing the columns of a table.
///
/// Only heap-backed storage can fail. Fixed, inline storage uses
/// [`std::convert::Infallible`] as its error type, so constructing a fixed
/// table never yields a `TableError`.
#[derive(Debug, Error)]
pub enum TableError {
    /// The allocator refused to provide memory for one column.
    ///
    /// No table state is modified when this is returned: columns that were
    /// already allocated for the same request are released again.
    #[error("failed to allocate {len} elements of `{field}`")]
    AllocationFailed {
        /// The type name of the leaf field whose column could not be allocated.
        field: &'static str,
        /// The requested number of elements.
        len: usize,
        /// The underlying reservation error.
        #[source]
        source: TryReserveError,
    },
    /// The requested length does not fit in a `usize`.
    #[error("table length overflow: {len} + {additional} elements")]
    CapacityOverflow {
        /// The current length of the table.
        len: usize,
        /// The number of elements that were requested on top of `len`.
        additional: usize,
    },
}
