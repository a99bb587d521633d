//! Declarative SPL command grammar.
//!
//! This crate owns the canonical grammar fragment of ~150 SPL commands as
//! inert data, plus the validator that proves every entry structurally
//! sound before the interpreter runs.
//!
//! # Architecture
//!
//! - [`pattern`]: the recursive [`SyntaxPattern`] tree, quantifiers, and
//!   the closed [`ParamType`] set
//! - [`syntax`]: [`CommandSyntax`], one grammar entry per command
//! - [`semantics`]: per-command semantic profiles (implicit field sets,
//!   post-match event shaping)
//! - [`build`]: constructor shorthands the command corpus is written in
//! - [`commands`]: the corpus itself, grouped by category
//! - [`registry`]: the immutable name -> entry [`PatternRegistry`]
//! - [`validate`]: structural soundness checks and registry-wide summary
//! - [`funcs`]: aggregation / eval function name tables

pub mod build;
pub mod commands;
pub mod funcs;
pub mod pattern;
pub mod registry;
pub mod semantics;
pub mod syntax;
pub mod validate;

pub use pattern::{ParamType, Quantifier, SyntaxPattern};
pub use registry::PatternRegistry;
pub use semantics::{ArgShape, CommandSemantics, ImplicitFields};
pub use syntax::CommandSyntax;
pub use validate::{
    summarize, validate_command, validate_registry, ValidationResult, ValidationSummary,
    MAX_PATTERN_DEPTH,
};
