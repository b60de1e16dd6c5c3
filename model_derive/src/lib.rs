//! Procedural macros for declaring models
//!
//! This crate provides the `#[model]` attribute and the `Model` derive, which
//! generate the `model_object::Model` implementation from struct attributes.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod model_macro;
mod parsing;

use codegen::generate_model_impl;
use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_relation_attributes, parse_table_attributes};

/// Derive macro for the `Model` trait
///
/// ```rust,ignore
/// #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Model)]
/// #[table(name = "posts", soft_delete)]
/// #[has_many(name = "comments", foreign_key = "post_id")]
/// #[has_one(name = "author", table = "users", foreign_key = "user_id", hidden = "password")]
/// pub struct Post {
///     #[primary_key]
///     pub id: i64,
///
///     #[field]
///     pub title: String,
///
///     #[field(fillable, hidden)]
///     pub draft_notes: Option<String>,
///
///     #[field(readonly)]
///     pub created_at: DateTime<Utc>,
/// }
/// ```
///
/// Without `#[table(name = ...)]` the table name is derived from the type
/// name (`BlogPost` becomes `blog_posts`). `#[table(soft_delete)]` uses a
/// `deleted_at` column; `#[soft_delete]` on a field names another one.
#[proc_macro_derive(
    Model,
    attributes(table, primary_key, field, soft_delete, has_one, has_many)
)]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let relations = match parse_relation_attributes(&input.attrs) {
        Ok(relations) => relations,
        Err(e) => return e.to_compile_error().into(),
    };

    generate_model_impl(
        &input.ident,
        &input.generics,
        &table_info,
        &field_info,
        &relations,
    )
    .into()
}

/// Convenience attribute macro that adds the derives a model needs
///
/// ```rust,ignore
/// #[model]
/// #[table(name = "users")]
/// pub struct User {
///     #[primary_key]
///     pub id: i64,
///     #[field]
///     pub name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
