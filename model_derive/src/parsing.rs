//! Parsing utilities for model attributes
//!
//! This module handles `#[table]`, `#[field]`, `#[primary_key]`,
//! `#[soft_delete]`, `#[has_one]` and `#[has_many]`, and validates every
//! identifier that will end up in SQL.

use std::collections::HashMap;
use syn::{parse::Parse, parse::ParseStream, Attribute, Data, Error, Fields, Ident, Meta, Result, Token};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Same rules as `model_object::validation`, applied at compile time
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL", "AND", "ANY", "ARRAY", "AS", "ASC", "BETWEEN", "BOTH", "CASE", "CAST", "CHECK",
        "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DO",
        "DROP", "ELSE", "END", "EXCEPT", "FALSE", "FOR", "FOREIGN", "FROM", "FULL", "GRANT",
        "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEADING",
        "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY",
        "REFERENCES", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE",
        "UNION", "UNIQUE", "UPDATE", "USING", "WHEN", "WHERE", "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

/// `key = "value"` pairs and bare flags of an attribute list
#[derive(Debug, Default)]
struct AttributeArgs {
    values: HashMap<String, String>,
    flags: Vec<String>,
}

/// Walk the tokens of `#[attr(key = "value", flag, ...)]` by hand
fn parse_attribute_args(tokens: &proc_macro2::TokenStream) -> Result<AttributeArgs> {
    let mut args = AttributeArgs::default();
    let mut tokens = tokens.clone().into_iter().peekable();

    while let Some(token) = tokens.next() {
        let key = match token {
            proc_macro2::TokenTree::Ident(key) => key,
            other => {
                return Err(Error::new(
                    other.span(),
                    "expected `key = \"value\"` or a flag",
                ))
            }
        };

        let is_assignment = matches!(
            tokens.peek(),
            Some(proc_macro2::TokenTree::Punct(punct)) if punct.as_char() == '='
        );

        if is_assignment {
            tokens.next(); // consume '='
            match tokens.next() {
                Some(proc_macro2::TokenTree::Literal(lit)) => {
                    let value = lit.to_string().trim_matches('"').to_string();
                    args.values.insert(key.to_string(), value);
                }
                _ => {
                    return Err(Error::new(
                        key.span(),
                        format!("`{}` expects a string literal value", key),
                    ))
                }
            }
        } else {
            args.flags.push(key.to_string());
        }

        // Skip comma if present
        if let Some(proc_macro2::TokenTree::Punct(punct)) = tokens.peek() {
            if punct.as_char() == ',' {
                tokens.next();
            }
        }
    }

    Ok(args)
}

#[derive(Debug)]
struct FieldOptions {
    options: Vec<Ident>,
}

impl Parse for FieldOptions {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut options = Vec::new();

        while !input.is_empty() {
            let option: Ident = input.parse()?;
            options.push(option);

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            }
        }

        Ok(FieldOptions { options })
    }
}

#[derive(Debug, PartialEq)]
pub struct TableInfo {
    /// Explicit table name; derived from the type name when absent
    pub name: Option<String>,
    /// `#[table(soft_delete)]`: conventional `deleted_at` marker
    pub soft_delete: bool,
    pub timestamps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    HasOne,
    HasMany,
}

#[derive(Debug, PartialEq)]
pub struct RelationInfo {
    pub kind: RelationKind,
    pub name: String,
    pub table: String,
    pub foreign_key: String,
    pub local_key: Option<String>,
    /// Related columns never packed into the parent row
    pub hidden: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub struct FieldInfo {
    pub primary_key: Option<String>,
    pub fillable: Vec<String>,
    pub hidden: Vec<String>,
    pub soft_delete_field: Option<String>,
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut info = TableInfo {
        name: None,
        soft_delete: false,
        timestamps: true,
    };

    for attr in attrs {
        if !attr.path().is_ident("table") {
            continue;
        }

        let Meta::List(meta_list) = &attr.meta else {
            return Err(Error::new_spanned(attr, "expected #[table(...)]"));
        };

        let args = parse_attribute_args(&meta_list.tokens)?;
        for (key, value) in args.values {
            match key.as_str() {
                "name" => {
                    validate_table_name_syn(&value, proc_macro2::Span::call_site())?;
                    info.name = Some(value);
                }
                other => {
                    return Err(Error::new_spanned(
                        attr,
                        format!("unknown table option `{}`", other),
                    ))
                }
            }
        }

        for flag in args.flags {
            match flag.as_str() {
                "soft_delete" => info.soft_delete = true,
                "no_timestamps" => info.timestamps = false,
                other => {
                    return Err(Error::new_spanned(
                        attr,
                        format!("unknown table flag `{}`", other),
                    ))
                }
            }
        }
    }

    Ok(info)
}

pub fn parse_relation_attributes(attrs: &[Attribute]) -> Result<Vec<RelationInfo>> {
    let mut relations: Vec<RelationInfo> = Vec::new();

    for attr in attrs {
        let kind = if attr.path().is_ident("has_one") {
            RelationKind::HasOne
        } else if attr.path().is_ident("has_many") {
            RelationKind::HasMany
        } else {
            continue;
        };

        let Meta::List(meta_list) = &attr.meta else {
            return Err(Error::new_spanned(
                attr,
                "expected #[has_one(name = \"...\", foreign_key = \"...\")]",
            ));
        };

        let mut args = parse_attribute_args(&meta_list.tokens)?;
        let name = args
            .values
            .remove("name")
            .ok_or_else(|| Error::new_spanned(attr, "relation requires `name = \"...\"`"))?;
        let foreign_key = args
            .values
            .remove("foreign_key")
            .ok_or_else(|| Error::new_spanned(attr, "relation requires `foreign_key = \"...\"`"))?;
        let table = args.values.remove("table").unwrap_or_else(|| name.clone());
        let local_key = args.values.remove("local_key");
        let hidden: Vec<String> = args
            .values
            .remove("hidden")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|column| !column.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if let Some(unknown) = args.values.keys().chain(args.flags.iter()).next() {
            return Err(Error::new_spanned(
                attr,
                format!("unknown relation option `{}`", unknown),
            ));
        }

        let span = proc_macro2::Span::call_site();
        validate_table_name_syn(&table, span)?;
        validate_column_name_syn(&foreign_key, span)?;
        if let Some(local_key) = &local_key {
            validate_column_name_syn(local_key, span)?;
        }
        for column in &hidden {
            validate_column_name_syn(column, span)?;
        }

        if relations.iter().any(|existing| existing.name == name) {
            return Err(Error::new_spanned(
                attr,
                format!("relation `{}` is declared twice", name),
            ));
        }

        relations.push(RelationInfo {
            kind,
            name,
            table,
            foreign_key,
            local_key,
            hidden,
        });
    }

    Ok(relations)
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Model can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Model can only be derived for structs with named fields",
        ));
    };

    let mut info = FieldInfo {
        primary_key: None,
        fillable: Vec::new(),
        hidden: Vec::new(),
        soft_delete_field: None,
    };

    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let column = field_name.to_string();
        let column = column.strip_prefix("r#").unwrap_or(&column).to_string();

        let is_primary_key = has_attribute(&field.attrs, "primary_key");
        let is_soft_delete = has_attribute(&field.attrs, "soft_delete");
        let options = parse_field_options(&field.attrs)?;

        if is_primary_key || is_soft_delete || options.is_some() {
            validate_column_name_syn(&column, field_name.span())?;
        }

        if is_primary_key {
            if info.primary_key.is_some() {
                return Err(Error::new_spanned(field, "only one #[primary_key] is allowed"));
            }
            info.primary_key = Some(column.clone());
        }

        if is_soft_delete {
            info.soft_delete_field = Some(column.clone());
        }

        if let Some(options) = options {
            if options.iter().any(|o| o == "fillable") {
                info.fillable.push(column.clone());
            }
            if options.iter().any(|o| o == "hidden") {
                info.hidden.push(column);
            }
        }
    }

    Ok(info)
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// `#[field]` alone means fillable; `#[field(fillable, hidden, readonly)]` spells it out.
pub fn parse_field_options(attrs: &[Attribute]) -> Result<Option<Vec<String>>> {
    for attr in attrs {
        if !attr.path().is_ident("field") {
            continue;
        }

        return match &attr.meta {
            Meta::Path(_) => Ok(Some(vec!["fillable".to_string()])),
            Meta::List(meta_list) => {
                let parsed = meta_list.parse_args::<FieldOptions>()?;
                let mut options = Vec::new();
                for ident in parsed.options {
                    match ident.to_string().as_str() {
                        "fillable" => options.push("fillable".to_string()),
                        "hidden" => options.push("hidden".to_string()),
                        // readonly columns are neither written nor hidden
                        "readonly" => {}
                        other => {
                            return Err(Error::new(
                                ident.span(),
                                format!("unknown field option `{}`", other),
                            ))
                        }
                    }
                }
                Ok(Some(options))
            }
            Meta::NameValue(_) => Err(Error::new_spanned(
                attr,
                "expected #[field] or #[field(fillable, hidden)]",
            )),
        };
    }

    Ok(None)
}
