//! Tinct Lang - language lexers for the tinct engine.
//!
//! Each language module defines a style table, a packed line state, default
//! keyword lists and a [`tinct_core::Lexer`] implementation:
//! - [`dart`]: nested string interpolation, nested block comments, raw and
//!   triple-quoted strings
//! - [`asymptote`]: C-like syntax with definition and struct heuristics
//! - [`cmake`]: bracket arguments, variable references and generator
//!   expressions
//! - [`fsharp`]: nested comments, verbatim and triple-quoted strings,
//!   interpolation with format specifiers
//! - [`powershell`]: a small table-driven lexer
//! - [`vhdl`]: case-insensitive word lists and context-sensitive fold words
//!
//! [`Language`] selects one of them at run time.

pub mod asymptote;
pub mod cmake;
pub mod dart;
pub mod fsharp;
mod language;
pub mod powershell;
mod shared;
pub mod vhdl;

#[cfg(test)]
mod test_helpers;

pub use language::{Divergence, Language};
