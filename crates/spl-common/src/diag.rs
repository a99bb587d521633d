use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// Severity of a diagnostic collected during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// The analyzer's error taxonomy.
///
/// These are surfaced as collected diagnostics, never as unwinding control
/// flow: a single bad stage degrades that stage and the analysis continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A registry entry failed structural validation. Only produced at
    /// registry construction/validation time, never during analysis.
    RegistryInvalid,
    /// The interpreter could not fully match a stage's arguments.
    /// Events up to the mismatch point are retained.
    PatternMismatch,
    /// A consumes/groups-by event referenced a field not in the live set.
    DanglingReference,
    /// The stage's command name is not in the registry; the stage is
    /// treated as an opaque passthrough.
    UnknownCommand,
    /// Pattern evaluation exceeded the recursion bound; the stage is skipped.
    RecursionLimit,
}

impl DiagnosticKind {
    /// Stable diagnostic code, one per kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::RegistryInvalid => "L0001",
            Self::PatternMismatch => "L0002",
            Self::DanglingReference => "L0003",
            Self::UnknownCommand => "L0004",
            Self::RecursionLimit => "L0005",
        }
    }

    /// The severity this kind is reported at.
    pub fn severity(self) -> Severity {
        match self {
            Self::RegistryInvalid => Severity::Error,
            Self::PatternMismatch => Severity::Warning,
            Self::DanglingReference => Severity::Info,
            Self::UnknownCommand => Severity::Info,
            Self::RecursionLimit => Severity::Warning,
        }
    }
}

/// A single diagnostic: a typed kind, an optional stage, and a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Pipeline stage the diagnostic is attached to, if any.
    pub stage_index: Option<usize>,
    pub message: String,
    /// Source span the diagnostic points at, if one is known.
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            stage_index: None,
            message: message.into(),
            span: None,
        }
    }

    /// Attach a stage index.
    pub fn at_stage(mut self, stage_index: usize) -> Self {
        self.stage_index = Some(stage_index);
        self
    }

    /// Attach a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.code(), self.severity, self.message)?;
        if let Some(stage) = self.stage_index {
            write!(f, " (stage {stage})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_have_unique_codes() {
        let kinds = [
            DiagnosticKind::RegistryInvalid,
            DiagnosticKind::PatternMismatch,
            DiagnosticKind::DanglingReference,
            DiagnosticKind::UnknownCommand,
            DiagnosticKind::RecursionLimit,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn display_includes_code_and_stage() {
        let diag = Diagnostic::new(DiagnosticKind::UnknownCommand, "unknown command `frobnicate`")
            .at_stage(2);
        assert_eq!(
            diag.to_string(),
            "[L0004] info: unknown command `frobnicate` (stage 2)"
        );
    }

    #[test]
    fn default_severities() {
        assert_eq!(DiagnosticKind::PatternMismatch.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::DanglingReference.severity(), Severity::Info);
        assert_eq!(DiagnosticKind::RegistryInvalid.severity(), Severity::Error);
    }
}
