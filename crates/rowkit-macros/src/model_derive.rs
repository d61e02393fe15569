//! Implementation of the Model derive macro.
//!
//! This module turns a struct with `#[rowkit(...)]` attributes into a
//! `rowkit_core::Model` implementation: static field metadata, `to_row` and
//! `set_value`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Lit, LitStr, Result};

/// Parsed model definition from a struct with `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelDef {
    /// The struct name.
    pub name: Ident,
    /// Table name, from `#[rowkit(table = "...")]` or the snake-cased struct name.
    pub table_name: String,
    /// Parsed fields in declaration order.
    pub fields: Vec<ModelFieldDef>,
    /// Generics from the struct.
    pub generics: syn::Generics,
}

/// Parsed attributes of a single field.
#[derive(Debug)]
pub struct ModelFieldDef {
    /// The field name.
    pub name: Ident,
    /// Column name, defaulting to the field name.
    pub column_name: String,
    pub primary_key: bool,
    pub relationship: bool,
    pub ignore: bool,
    pub has_default: bool,
    /// Default value literal.
    pub default: Option<String>,
    pub auto_timestamp: bool,
}

impl ModelFieldDef {
    /// Whether the field is stored in a column.
    fn is_column(&self) -> bool {
        !self.relationship && !self.ignore
    }
}

/// Parse a `DeriveInput` into a `ModelDef`.
pub fn parse_model(input: &DeriveInput) -> Result<ModelDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let mut table_name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("rowkit") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_identifier(&lit)?;
                table_name = Some(lit.value());
                Ok(())
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                Err(meta.error(format!(
                    "unknown struct attribute `{attr_name}`. Valid attributes are: table"
                )))
            }
        })?;
    }

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs, not unions",
            ));
        }
    };

    let primary_keys = fields.iter().filter(|f| f.primary_key).count();
    if primary_keys > 1 {
        return Err(Error::new_spanned(
            &input.ident,
            "Model supports at most one #[rowkit(primary_key)] field",
        ));
    }

    let columns: Vec<&ModelFieldDef> = fields.iter().filter(|f| f.is_column()).collect();
    for (i, field) in columns.iter().enumerate() {
        if let Some(earlier) = columns[..i]
            .iter()
            .find(|f| f.column_name == field.column_name)
        {
            return Err(Error::new_spanned(
                &field.name,
                format!(
                    "column `{}` is already written by field `{}`",
                    field.column_name, earlier.name
                ),
            ));
        }
    }

    Ok(ModelDef {
        table_name: table_name.unwrap_or_else(|| to_snake_case(&name.to_string())),
        name,
        fields,
        generics,
    })
}

fn parse_fields(fields: &Fields) -> Result<Vec<ModelFieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new_spanned(
            fields,
            "Model requires a struct with named fields",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

fn parse_field(field: &Field) -> Result<ModelFieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut def = ModelFieldDef {
        column_name: name.to_string(),
        name,
        primary_key: false,
        relationship: false,
        ignore: false,
        has_default: false,
        default: None,
        auto_timestamp: false,
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("rowkit") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("primary_key") {
                def.primary_key = true;
            } else if path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_identifier(&lit)?;
                def.column_name = lit.value();
            } else if path.is_ident("ignore") {
                def.ignore = true;
            } else if path.is_ident("relationship") {
                def.relationship = true;
            } else if path.is_ident("has_default") {
                def.has_default = true;
            } else if path.is_ident("default") {
                let value: Lit = meta.value()?.parse()?;
                def.default = Some(lit_to_string(&value)?);
                def.has_default = true;
            } else if path.is_ident("auto_timestamp") {
                def.auto_timestamp = true;
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown rowkit attribute `{attr_name}`. \
                         Valid attributes are: primary_key, column, ignore, relationship, \
                         default, has_default, auto_timestamp"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if def.primary_key && !def.is_column() {
        return Err(Error::new_spanned(
            field,
            "a primary key cannot be ignored or a relationship",
        ));
    }

    Ok(def)
}

/// Reject table and column names that are not plain identifiers.
fn validate_identifier(lit: &LitStr) -> Result<()> {
    let value = lit.value();
    let pattern = regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .map_err(|e| Error::new_spanned(lit, format!("internal regex error: {e}")))?;
    if pattern.is_match(&value) {
        Ok(())
    } else {
        Err(Error::new_spanned(
            lit,
            format!("`{value}` is not a valid SQL identifier"),
        ))
    }
}

/// Default literals are stored as text whatever their Rust literal kind.
fn lit_to_string(lit: &Lit) -> Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        _ => Err(Error::new_spanned(
            lit,
            "expected string, integer, float or bool literal for default",
        )),
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Generate the Model trait implementation.
pub fn generate_model_impl(def: &ModelDef) -> TokenStream {
    let name = &def.name;
    let table_name = &def.table_name;
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let field_count = def.fields.len();
    let field_infos = def.fields.iter().map(generate_field_info);

    let row_entries = def.fields.iter().filter(|f| f.is_column()).map(|f| {
        let ident = &f.name;
        let name_str = ident.to_string();
        quote! {
            (#name_str, ::rowkit_core::Value::from(::core::clone::Clone::clone(&self.#ident)))
        }
    });

    let set_arms = def.fields.iter().filter(|f| f.is_column()).map(|f| {
        let ident = &f.name;
        let name_str = ident.to_string();
        quote! {
            #name_str => {
                self.#ident = ::rowkit_core::FromValue::from_value(value)?;
                Ok(())
            }
        }
    });

    quote! {
        impl #impl_generics ::rowkit_core::Model for #name #ty_generics #where_clause {
            const TABLE_NAME: &'static str = #table_name;

            fn fields() -> &'static [::rowkit_core::FieldInfo] {
                static FIELDS: [::rowkit_core::FieldInfo; #field_count] = [
                    #(#field_infos),*
                ];
                &FIELDS
            }

            fn to_row(&self) -> ::std::vec::Vec<(&'static str, ::rowkit_core::Value)> {
                ::std::vec![
                    #(#row_entries),*
                ]
            }

            #[allow(unused_variables)]
            fn set_value(
                &mut self,
                field: &str,
                value: ::rowkit_core::Value,
            ) -> ::rowkit_core::Result<()> {
                match field {
                    #(#set_arms)*
                    other => Err(::rowkit_core::Error::Shape(::std::format!(
                        "{} has no writable field `{}`",
                        #table_name,
                        other
                    ))),
                }
            }
        }
    }
}

fn generate_field_info(field: &ModelFieldDef) -> TokenStream {
    let name_str = field.name.to_string();
    let column = &field.column_name;
    let primary_key = field.primary_key;
    let relationship = field.relationship;
    let ignore = field.ignore;
    let has_default = field.has_default;
    let auto_timestamp = field.auto_timestamp;
    let default = match &field.default {
        Some(literal) => quote! { ::core::option::Option::Some(#literal) },
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        ::rowkit_core::FieldInfo::new(#name_str, #column)
            .primary_key(#primary_key)
            .relationship(#relationship)
            .ignored(#ignore)
            .has_default(#has_default)
            .default_opt(#default)
            .auto_timestamp(#auto_timestamp)
    }
}
