//! Shared leaf types for the SPL analyzer.
//!
//! Everything here is inert data used across the workspace: byte-offset
//! spans, the SPL token vocabulary, the field-effect vocabulary
//! (`FieldEffect`, `DataType`, `Confidence`), and the diagnostic types
//! collected during analysis.

pub mod diag;
pub mod effect;
pub mod span;
pub mod token;

pub use diag::{Diagnostic, DiagnosticKind, Severity};
pub use effect::{Confidence, DataType, FieldEffect};
pub use span::Span;
pub use token::{Token, TokenKind};
