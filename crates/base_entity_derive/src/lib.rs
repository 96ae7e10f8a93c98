//! `#[base_entity]`: adds `id`, `created_at` and `updated_at` to a sea-orm
//! model and implements the DAO base traits for it.
//!
//! ```ignore
//! #[base_entity]
//! #[sea_orm::model]
//! #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
//! #[sea_orm(table_name = "admin_sessions")]
//! pub struct Model { /* ... */ }
//! ```
//!
//! The entity label defaults to the singular table name ("Admin session")
//! and can be overridden with `#[base_entity(label = "Session")]`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Expr, ExprLit, Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta, Token,
    parse_macro_input, parse_quote, punctuated::Punctuated,
};

const TRAITS_PATH: &str = "crate::db::dao::base_traits";

#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut input = parse_macro_input!(item as ItemStruct);

    match expand(args, &mut input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(
    args: Punctuated<Meta, Token![,]>,
    input: &mut ItemStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let explicit_label = parse_label_arg(args)?;
    let label = match explicit_label {
        Some(label) => label,
        None => LitStr::new(&label_from_table(&input.attrs)?, Span::call_site()),
    };

    let Fields::Named(fields) = &mut input.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "base_entity requires a struct with named fields",
        ));
    };

    for reserved in ["id", "created_at", "updated_at"] {
        if let Some(field) = fields
            .named
            .iter()
            .find(|field| field.ident.as_ref().is_some_and(|ident| ident == reserved))
        {
            return Err(syn::Error::new_spanned(
                field,
                format!("`{reserved}` is added by base_entity; remove it from the model"),
            ));
        }
    }

    let base_fields: [Field; 3] = [
        parse_quote! {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: uuid::Uuid
        },
        parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub created_at: sea_orm::entity::prelude::DateTimeWithTimeZone
        },
        parse_quote! {
            #[sea_orm(default_expr = "Expr::current_timestamp()")]
            pub updated_at: sea_orm::entity::prelude::DateTimeWithTimeZone
        },
    ];
    let own_fields = std::mem::take(&mut fields.named);
    fields.named.extend(base_fields);
    fields.named.extend(own_fields);

    let traits: syn::Path = syn::parse_str(TRAITS_PATH)?;
    Ok(quote! {
        #input

        impl #traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl #traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl #traits::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        impl #traits::HasIdColumn for Entity {
            fn id_column() -> Column {
                Column::Id
            }
        }

        impl #traits::EntityLabel for Entity {
            const LABEL: &'static str = #label;
        }
    })
}

fn parse_label_arg(args: Punctuated<Meta, Token![,]>) -> syn::Result<Option<LitStr>> {
    let mut label = None;
    for meta in args {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected `label = \"...\"`",
            ));
        };
        if !name_value.path.is_ident("label") {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "unknown base_entity argument; only `label` is supported",
            ));
        }
        match name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) => label = Some(value),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected a string literal",
                ));
            }
        }
    }
    Ok(label)
}

/// `#[sea_orm(table_name = "password_resets")]` -> "Password reset".
fn label_from_table(attrs: &[Attribute]) -> syn::Result<String> {
    let mut table = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("sea_orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table_name") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(value.value());
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    let Some(table) = table else {
        return Err(syn::Error::new(
            Span::call_site(),
            "base_entity needs `#[sea_orm(table_name = \"...\")]` or an explicit `label`",
        ));
    };
    Ok(humanize(&table))
}

fn humanize(table: &str) -> String {
    let singular = table.strip_suffix('s').unwrap_or(table);
    let spaced = singular.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
