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

//! This crate provides the procedural macros declaring SoA records.
//!
//! The generated code refers to `::aosoa_core`, so the crate using the
//! derives must depend on `aosoa-core` directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod field;
mod record;

/// Derives `aosoa_core::FieldList` and `aosoa_core::Record` for a struct with
/// named fields, together with its two proxies `<Name>Ref<'a>` and
/// `<Name>Mut<'a>`.
///
/// Every field must itself be a `FieldList`: a leaf scalar or another record.
/// The first field may be marked `#[record(base)]` to compose the struct on
/// top of a previously declared record. The proxies then dereference to the
/// base's proxies, so base members stay accessible under their own names.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree.
    let input = parse_macro_input!(input as DeriveInput);

    // Composition errors surface as compiler errors at the offending span.
    record::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `aosoa_core::FieldList` for a scalar type, stored as a single
/// leaf column.
///
/// The type must implement `Default` and `Clone`.
#[proc_macro_derive(Field)]
pub fn derive_field(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    field::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests;
