//! Write-conflict options and the options-document framework.
//!
//! Write operations accept an `if_exists` option controlling what happens
//! when the write target already exists. The option supersedes the older
//! `mode` spelling, which is still accepted (with a deprecation warning)
//! until 1.0.0.

mod document;
mod if_exists;

pub use document::{decode_document, decode_toml_document};
pub use if_exists::{CollectionIfExists, FileIfExists, TableIfExists, TopicIfExists};
