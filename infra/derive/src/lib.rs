#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Cadenza infrastructure crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! cadenza-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! The expansion refers to `::thiserror`, so every consuming crate must depend on it directly.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a crate error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for every variant that wraps a source error.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Applied to an **enum** whose variants all use named fields.
/// 2. A variant with a `source` field (or a field marked `#[source]`/`#[from]`) must also
///    carry `context: Option<Cow<'static, str>>`.
///
/// Violations are reported as compile errors on the offending span.
///
/// # Example
///
/// ```rust,ignore
/// use cadenza_derive::cadenza_error;
/// use std::borrow::Cow;
///
/// #[cadenza_error]
/// pub enum CatalogError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &str) -> Result<Vec<u8>, CatalogError> {
///     std::fs::read(path).context("Loading catalog snapshot")
/// }
/// ```
#[proc_macro_attribute]
pub fn cadenza_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
