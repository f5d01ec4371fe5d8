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

//! Expansion of `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident};

/// The largest tuple `aosoa_core` implements `FieldList` for.
pub(crate) const MAX_FIELDS: usize = 16;

/// Expands `#[derive(Record)]` for `input`.
pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    // --- 1. Validate the shape of the record ---
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`Record` cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "`Record` requires a struct with named fields",
                ))
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "`Record` can only be derived for structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "`Record` can only be derived for structs",
            ))
        }
    };

    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Record` requires at least one field",
        ));
    }
    if fields.len() > MAX_FIELDS {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!("`Record` supports at most {MAX_FIELDS} fields; group some of them into a nested record"),
        ));
    }

    // --- 2. Locate the base, which must lead the field list ---
    let mut base: Option<&Field> = None;
    for (position, field) in fields.iter().enumerate() {
        if !is_base(field)? {
            continue;
        }
        if base.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "only one field can be marked `#[record(base)]`",
            ));
        }
        if position != 0 {
            return Err(syn::Error::new_spanned(
                field,
                "the `#[record(base)]` field must be the first field",
            ));
        }
        base = Some(field);
    }

    // --- 3. Generate the proxies and the trait implementations ---
    let core = quote!(::aosoa_core);
    let name = &input.ident;
    let vis = &input.vis;
    let ref_name = format_ident!("{}Ref", name);
    let mut_name = format_ident!("{}Mut", name);

    let idents: Vec<&Ident> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let types: Vec<_> = fields.iter().map(|f| &f.ty).collect();
    let field_vis: Vec<_> = fields.iter().map(|f| &f.vis).collect();
    let field_docs: Vec<Vec<&Attribute>> = fields
        .iter()
        .map(|f| f.attrs.iter().filter(|a| a.path().is_ident("doc")).collect())
        .collect();
    // Locals use generated names so field names never shadow parameters.
    let bindings: Vec<Ident> = (0..idents.len())
        .map(|i| format_ident!("__field_{}", i))
        .collect();
    let entries = quote!((#(#types,)*));

    let ref_doc = format!("Shared SoA proxy aliasing one [`{name}`] stored across table columns.");
    let mut_doc =
        format!("Exclusive SoA proxy aliasing one [`{name}`] stored across table columns.");

    let base_impls = base.map(|field| base_impls(&core, vis, &ref_name, &mut_name, field));

    Ok(quote! {
        #[doc = #ref_doc]
        #[derive(Clone, Copy)]
        #vis struct #ref_name<'a> {
            #(
                #(#field_docs)*
                #field_vis #idents: <#types as #core::FieldList>::Ref<'a>,
            )*
        }

        #[doc = #mut_doc]
        #vis struct #mut_name<'a> {
            #(
                #(#field_docs)*
                #field_vis #idents: <#types as #core::FieldList>::Mut<'a>,
            )*
        }

        impl #core::FieldList for #name {
            const LEN: usize = <#entries as #core::FieldList>::LEN;

            type Columns<S: #core::Storage> = <#entries as #core::FieldList>::Columns<S>;
            type Ref<'a> = #ref_name<'a> where Self: 'a;
            type Mut<'a> = #mut_name<'a> where Self: 'a;
            type Slices<'a> = <#entries as #core::FieldList>::Slices<'a> where Self: 'a;
            type SlicesMut<'a> = <#entries as #core::FieldList>::SlicesMut<'a> where Self: 'a;

            #[inline]
            fn try_allocate<S: #core::Storage>(
                len: usize,
            ) -> ::core::result::Result<Self::Columns<S>, <S as #core::Storage>::Error> {
                <#entries as #core::FieldList>::try_allocate::<S>(len)
            }

            #[inline]
            fn try_reserve<S: #core::GrowableStorage>(
                columns: &mut Self::Columns<S>,
                len: usize,
            ) -> ::core::result::Result<(), #core::TableError> {
                <#entries as #core::FieldList>::try_reserve::<S>(columns, len)
            }

            #[inline]
            fn resize<S: #core::GrowableStorage>(columns: &mut Self::Columns<S>, len: usize) {
                <#entries as #core::FieldList>::resize::<S>(columns, len)
            }

            #[inline]
            fn reset<S: #core::Storage>(
                columns: &mut Self::Columns<S>,
                range: ::core::ops::Range<usize>,
            ) {
                <#entries as #core::FieldList>::reset::<S>(columns, range)
            }

            #[inline]
            fn get<'a, S: #core::Storage>(
                columns: &'a Self::Columns<S>,
                index: usize,
            ) -> Self::Ref<'a> {
                let (#(#bindings,)*) = <#entries as #core::FieldList>::get::<S>(columns, index);
                #ref_name { #(#idents: #bindings,)* }
            }

            #[inline]
            fn get_mut<'a, S: #core::Storage>(
                columns: &'a mut Self::Columns<S>,
                index: usize,
            ) -> Self::Mut<'a> {
                let (#(#bindings,)*) =
                    <#entries as #core::FieldList>::get_mut::<S>(columns, index);
                #mut_name { #(#idents: #bindings,)* }
            }

            #[inline]
            fn slices<'a, S: #core::Storage>(
                columns: &'a Self::Columns<S>,
                range: ::core::ops::Range<usize>,
            ) -> Self::Slices<'a> {
                <#entries as #core::FieldList>::slices::<S>(columns, range)
            }

            #[inline]
            fn slices_mut<'a, S: #core::Storage>(
                columns: &'a mut Self::Columns<S>,
                range: ::core::ops::Range<usize>,
            ) -> Self::SlicesMut<'a> {
                <#entries as #core::FieldList>::slices_mut::<S>(columns, range)
            }

            fn load(reference: Self::Ref<'_>) -> Self {
                #name {
                    #(#idents: <#types as #core::FieldList>::load(reference.#idents),)*
                }
            }

            fn store(reference: Self::Mut<'_>, value: Self) {
                let #mut_name { #(#idents: #bindings,)* } = reference;
                #(<#types as #core::FieldList>::store(#bindings, value.#idents);)*
            }

            fn leaves(out: &mut ::std::vec::Vec<#core::LeafField>) {
                <#entries as #core::FieldList>::leaves(out)
            }

            fn describe<S: #core::Storage>(
                columns: &Self::Columns<S>,
                out: &mut ::std::vec::Vec<#core::ColumnInfo>,
            ) {
                <#entries as #core::FieldList>::describe::<S>(columns, out)
            }
        }

        impl #core::Record for #name {}

        #base_impls
    })
}

/// Generates the base views of the proxies: `Deref`/`DerefMut` to the base
/// proxy and `into_base` truncation, plus the check that the base is a record.
fn base_impls(
    core: &TokenStream,
    vis: &syn::Visibility,
    ref_name: &Ident,
    mut_name: &Ident,
    field: &Field,
) -> TokenStream {
    let base = &field.ty;
    let ident = &field.ident;

    quote! {
        const _: fn() = || {
            fn base_must_be_a_record<T: #core::Record>() {}
            base_must_be_a_record::<#base>();
        };

        impl<'a> ::core::ops::Deref for #ref_name<'a> {
            type Target = <#base as #core::FieldList>::Ref<'a>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.#ident
            }
        }

        impl<'a> ::core::ops::Deref for #mut_name<'a> {
            type Target = <#base as #core::FieldList>::Mut<'a>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.#ident
            }
        }

        impl<'a> ::core::ops::DerefMut for #mut_name<'a> {
            #[inline]
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.#ident
            }
        }

        impl<'a> #ref_name<'a> {
            /// Truncates this proxy to its base proxy.
            #[inline]
            #vis fn into_base(self) -> <#base as #core::FieldList>::Ref<'a> {
                self.#ident
            }
        }

        impl<'a> #mut_name<'a> {
            /// Truncates this proxy to its base proxy.
            #[inline]
            #vis fn into_base(self) -> <#base as #core::FieldList>::Mut<'a> {
                self.#ident
            }
        }
    }
}

/// Returns whether `field` carries `#[record(base)]`.
fn is_base(field: &Field) -> syn::Result<bool> {
    let mut base = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                base = true;
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute, expected `base`"))
            }
        })?;
    }
    Ok(base)
}
