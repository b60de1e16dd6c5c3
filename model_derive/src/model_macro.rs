use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error};

/// Adds `Debug`, `Clone`, serde and `Model` derives to the annotated struct
pub fn model_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, Data::Struct(_)) {
        return Error::new_spanned(&input.ident, "#[model] can only be used on structs")
            .to_compile_error()
            .into();
    }

    let expanded = quote! {
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Model)]
        #input
    };

    TokenStream::from(expanded)
}
