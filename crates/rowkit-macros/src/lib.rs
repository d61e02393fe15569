//! Procedural macros for rowkit.
//!
//! `#[derive(Model)]` implements `rowkit_core::Model` for a struct with named
//! fields.
//!
//! ```ignore
//! use rowkit::prelude::*;
//!
//! #[derive(Model, Default)]
//! #[rowkit(table = "heroes")]
//! struct Hero {
//!     #[rowkit(primary_key)]
//!     id: String,
//!     #[rowkit(column = "hero_name")]
//!     name: String,
//!     #[rowkit(default = "active")]
//!     status: String,
//!     created_at: i64,
//!     #[rowkit(relationship)]
//!     powers: Vec<Power>,
//! }
//! ```
//!
//! Field attributes: `primary_key`, `column = "..."`, `ignore`,
//! `relationship`, `default = ...`, `has_default`, `auto_timestamp`.
//! Column fields must convert into `Value` (`From`) and back (`FromValue`).

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model_derive;

/// Derive `rowkit_core::Model`.
#[proc_macro_derive(Model, attributes(rowkit))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match model_derive::parse_model(&input) {
        Ok(def) => model_derive::generate_model_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
