//! Code generation for the `Model` implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::parsing::{FieldInfo, RelationInfo, RelationKind, TableInfo};

const DEFAULT_SOFT_DELETE_COLUMN: &str = "deleted_at";

pub fn generate_model_impl(
    name: &Ident,
    generics: &Generics,
    table_info: &TableInfo,
    field_info: &FieldInfo,
    relations: &[RelationInfo],
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Without an explicit name the trait derives one from the type name
    let table_name_fn = table_info.name.as_ref().map(|table_name| {
        quote! {
            fn table_name() -> String {
                #table_name.to_string()
            }
        }
    });

    let primary_key_fn = field_info.primary_key.as_ref().map(|primary_key| {
        quote! {
            fn primary_key() -> &'static str {
                #primary_key
            }
        }
    });

    let fillable = &field_info.fillable;
    let hidden = &field_info.hidden;

    let soft_delete_column = field_info.soft_delete_field.as_deref().or(if table_info.soft_delete {
        Some(DEFAULT_SOFT_DELETE_COLUMN)
    } else {
        None
    });
    let soft_delete_fn = soft_delete_column.map(|column| {
        quote! {
            fn soft_delete_column() -> Option<&'static str> {
                Some(#column)
            }
        }
    });

    let timestamps = table_info.timestamps;

    let relations_fn = if relations.is_empty() {
        None
    } else {
        let definitions = relations.iter().map(generate_relation_def);
        Some(quote! {
            fn relations() -> &'static [model_object::RelationDef] {
                const RELATIONS: &[model_object::RelationDef] = &[#(#definitions),*];
                RELATIONS
            }
        })
    };

    quote! {
        impl #impl_generics model_object::Model for #name #ty_generics #where_clause {
            #table_name_fn

            #primary_key_fn

            fn fillable() -> &'static [&'static str] {
                &[#(#fillable),*]
            }

            fn hidden() -> &'static [&'static str] {
                &[#(#hidden),*]
            }

            #soft_delete_fn

            fn timestamps() -> bool {
                #timestamps
            }

            #relations_fn
        }
    }
}

fn generate_relation_def(relation: &RelationInfo) -> TokenStream {
    let name = &relation.name;
    let table = &relation.table;
    let foreign_key = &relation.foreign_key;

    let constructor = match relation.kind {
        RelationKind::HasOne => quote!(has_one),
        RelationKind::HasMany => quote!(has_many),
    };

    let mut def = quote! {
        model_object::RelationDef::#constructor(#name, #table, #foreign_key)
    };
    if let Some(local_key) = &relation.local_key {
        def = quote! { #def.local_key(#local_key) };
    }
    if !relation.hidden.is_empty() {
        let hidden = &relation.hidden;
        def = quote! { #def.hidden(&[#(#hidden),*]) };
    }
    def
}
