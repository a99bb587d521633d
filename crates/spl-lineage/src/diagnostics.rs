//! Ariadne-based rendering of analysis diagnostics.
//!
//! Renders the typed [`Diagnostic`] values collected during analysis
//! into formatted, labeled reports against the original query text.
//! Output is colorless by default so snapshots and logs stay stable.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use spl_common::{Diagnostic, Severity};

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticOptions {
    pub color: bool,
}

impl DiagnosticOptions {
    /// Colorless output for deterministic test snapshots.
    pub fn colorless() -> Self {
        Self { color: false }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self::colorless()
    }
}

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    }
}

/// Render one diagnostic against the query text.
pub fn render_diagnostic(diag: &Diagnostic, source: &str, options: &DiagnosticOptions) -> String {
    let config = Config::default().with_color(options.color);
    let source_len = source.len();

    // Clamp to source bounds; ariadne needs a non-empty span.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };

    let span = diag
        .span
        .map(|s| clamp(s.start as usize..s.end as usize))
        .unwrap_or(0..source_len.min(1));

    let mut builder = Report::build(report_kind(diag.severity), span.clone())
        .with_code(diag.kind.code())
        .with_message(&diag.message)
        .with_config(config);

    let label_message = match diag.stage_index {
        Some(stage) => format!("stage {stage}"),
        None => "here".to_string(),
    };
    if !span.is_empty() {
        builder.add_label(
            Label::new(span)
                .with_message(label_message)
                .with_color(Color::Red),
        );
    }

    let report = builder.finish();
    let mut buf = Vec::new();
    report
        .write(Source::from(source), &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render every diagnostic of an analysis, in order.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    source: &str,
    options: &DiagnosticOptions,
) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| render_diagnostic(d, source, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_common::{DiagnosticKind, Span};

    #[test]
    fn renders_code_message_and_stage() {
        let source = "index=main | frobnicate x | stats count";
        let diag = Diagnostic::new(
            DiagnosticKind::UnknownCommand,
            "unknown command `frobnicate`",
        )
        .at_stage(1)
        .with_span(Span::new(13, 25));
        let out = render_diagnostic(&diag, source, &DiagnosticOptions::colorless());
        assert!(out.contains("L0004"));
        assert!(out.contains("unknown command `frobnicate`"));
        assert!(out.contains("stage 1"));
    }

    #[test]
    fn renders_without_span() {
        let diag = Diagnostic::new(DiagnosticKind::PatternMismatch, "could not match");
        let out = render_diagnostic(&diag, "index=main", &DiagnosticOptions::colorless());
        assert!(out.contains("L0002"));
        assert!(out.contains("could not match"));
    }
}
