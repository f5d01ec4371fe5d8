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

use syn::{parse_quote, DeriveInput};

use crate::{field, record};

fn expand_record(input: DeriveInput) -> String {
    match record::expand(input) {
        Ok(tokens) => tokens.to_string(),
        Err(error) => panic!("unexpected expansion error: {error}"),
    }
}

fn record_error(input: DeriveInput) -> String {
    match record::expand(input) {
        Ok(tokens) => panic!("expected an expansion error, got `{tokens}`"),
        Err(error) => error.to_string(),
    }
}

// --- EXPANSION ---

#[test]
fn test_record_generates_both_proxies() {
    let output = expand_record(parse_quote! {
        pub struct A {
            pub x: f32,
            pub y: f32,
        }
    });

    assert!(output.contains("struct ARef"));
    assert!(output.contains("struct AMut"));
    assert!(output.contains("impl :: aosoa_core :: FieldList for A"));
    assert!(output.contains("impl :: aosoa_core :: Record for A"));
    assert!(!output.contains("Deref"), "A record without a base has no base view");
}

#[test]
fn test_record_delegates_to_field_tuple() {
    let output = expand_record(parse_quote! {
        struct Particle {
            mass: f64,
            charge: i8,
        }
    });

    // The columns of a record are those of the tuple of its field types.
    assert!(output.contains("f64 , i8 ,"));
    assert!(output.contains(":: Columns < S >"));
}

#[test]
fn test_base_record_derefs_to_base_proxy() {
    let output = expand_record(parse_quote! {
        pub struct B {
            #[record(base)]
            pub base: A,
            pub u: f32,
        }
    });

    assert!(output.contains(":: core :: ops :: Deref for BRef"));
    assert!(output.contains(":: core :: ops :: DerefMut for BMut"));
    assert!(output.contains("fn into_base"));
    assert!(output.contains("base_must_be_a_record :: < A >"));
}

#[test]
fn test_field_docs_are_copied_to_proxies() {
    let output = expand_record(parse_quote! {
        struct Doc {
            /// Horizontal position.
            x: f32,
        }
    });

    // Once on each proxy.
    assert_eq!(output.matches("Horizontal position.").count(), 2);
}

#[test]
fn test_field_derive_emits_leaf_impl() {
    let output = match field::expand(parse_quote! {
        struct Meters(f64);
    }) {
        Ok(tokens) => tokens.to_string(),
        Err(error) => panic!("unexpected expansion error: {error}"),
    };

    assert!(output.contains("impl_leaf_field ! (Meters)"));
}

// --- REJECTIONS ---

#[test]
fn test_rejects_base_not_first() {
    let error = record_error(parse_quote! {
        struct Bad {
            u: f32,
            #[record(base)]
            base: A,
        }
    });
    assert!(error.contains("must be the first field"));
}

#[test]
fn test_rejects_multiple_bases() {
    let error = record_error(parse_quote! {
        struct Bad {
            #[record(base)]
            first: A,
            #[record(base)]
            second: A,
        }
    });
    assert!(error.contains("only one field"));
}

#[test]
fn test_rejects_unknown_record_attribute() {
    let error = record_error(parse_quote! {
        struct Bad {
            #[record(parent)]
            base: A,
        }
    });
    assert!(error.contains("unsupported record attribute"));
}

#[test]
fn test_rejects_non_struct_shapes() {
    let tuple = record_error(parse_quote! { struct Bad(f32, f32); });
    assert!(tuple.contains("named fields"));

    let unit = record_error(parse_quote! { struct Bad; });
    assert!(unit.contains("named fields"));

    let enumeration = record_error(parse_quote! { enum Bad { X, Y } });
    assert!(enumeration.contains("only be derived for structs"));

    let union = record_error(parse_quote! { union Bad { x: f32, y: u32 } });
    assert!(union.contains("only be derived for structs"));
}

#[test]
fn test_rejects_empty_and_generic_records() {
    let empty = record_error(parse_quote! { struct Bad {} });
    assert!(empty.contains("at least one field"));

    let generic = record_error(parse_quote! { struct Bad<T> { value: T } });
    assert!(generic.contains("generic"));

    let generic_field = match field::expand(parse_quote! { struct Wrapper<T>(T); }) {
        Ok(tokens) => panic!("expected an expansion error, got `{tokens}`"),
        Err(error) => error.to_string(),
    };
    assert!(generic_field.contains("generic"));
}

#[test]
fn test_rejects_too_many_fields() {
    let error = record_error(parse_quote! {
        struct Wide {
            f0: u8, f1: u8, f2: u8, f3: u8, f4: u8, f5: u8, f6: u8, f7: u8, f8: u8,
            f9: u8, f10: u8, f11: u8, f12: u8, f13: u8, f14: u8, f15: u8, f16: u8,
        }
    });
    assert!(error.contains("at most 16 fields"));
}
