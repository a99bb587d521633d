//! SPL field lineage analysis.
//!
//! This crate ties the grammar registry, the pattern interpreter, and
//! the lineage engine into one public API: feed it SPL source text, get
//! back a queryable [`LineageIndex`] plus collected diagnostics.
//!
//! # Architecture
//!
//! - [`interpret`]: matches a stage's argument tokens against its
//!   command pattern and emits ordered field events
//! - [`engine`]: folds stage events into the lineage index
//! - [`event`]: the field event and stage effect types between the two
//! - [`diagnostics`]: ariadne rendering of collected diagnostics
//!
//! # Example
//!
//! ```
//! use spl_lineage::Analyzer;
//!
//! let analyzer = Analyzer::default();
//! let result = analyzer.analyze("index=main | iplocation clientip");
//! let city = result.lineage.field_lineage("city").unwrap();
//! assert!(city.depends_on.contains("clientip"));
//! ```

pub mod diagnostics;
pub mod engine;
pub mod event;
pub mod interpret;

use spl_common::{Diagnostic, DiagnosticKind};
use spl_grammar::PatternRegistry;
use spl_lexer::split_stages;

pub use engine::{LineageIndex, LineageNode, StageSummary};
pub use event::{FieldEvent, MatchOutcome, StageEffects};
pub use interpret::interpret_stage;

/// The result of analyzing one pipeline.
#[derive(Debug)]
pub struct AnalyzeResult {
    pub lineage: LineageIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// The SPL lineage analyzer.
///
/// Owns the grammar registry it interprets against. The analyzer holds
/// no per-query state: one instance can serve any number of `analyze`
/// calls, concurrently from multiple threads.
#[derive(Debug)]
pub struct Analyzer {
    registry: PatternRegistry,
}

impl Default for Analyzer {
    /// An analyzer over the standard registry.
    fn default() -> Self {
        Self::new(PatternRegistry::standard())
    }
}

impl Analyzer {
    /// An analyzer over an explicit registry.
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    /// The registry this analyzer interprets against.
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Analyze a pipeline: split it into stages, interpret each against
    /// the registry, and fold the events into a lineage index.
    ///
    /// No single stage failure aborts the analysis. Unknown commands
    /// pass through opaquely, mismatches keep their best-effort event
    /// prefix, and everything is reported through the diagnostics list.
    pub fn analyze(&self, source: &str) -> AnalyzeResult {
        let stages = split_stages(source);
        let mut lineage = LineageIndex::new();
        let mut diagnostics = Vec::new();

        for (index, stage) in stages.iter().enumerate() {
            let Some(syntax) = self.registry.get(&stage.command) else {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::UnknownCommand,
                        format!("unknown command `{}`", stage.command),
                    )
                    .at_stage(index)
                    .with_span(stage.command_span),
                );
                lineage.apply_passthrough(index, &stage.command);
                continue;
            };

            let effects = interpret_stage(syntax, stage, index, source);
            match effects.outcome {
                MatchOutcome::Matched => {}
                MatchOutcome::Partial { matched_args } => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::PatternMismatch,
                            format!(
                                "`{}` arguments do not fully match its pattern \
                                 ({matched_args} of {} matched)",
                                stage.command,
                                stage.args.len()
                            ),
                        )
                        .at_stage(index)
                        .with_span(stage.span),
                    );
                }
                MatchOutcome::Skipped => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::RecursionLimit,
                            format!("`{}` exceeded the pattern recursion limit", stage.command),
                        )
                        .at_stage(index)
                        .with_span(stage.span),
                    );
                }
            }
            diagnostics.extend(lineage.apply_stage(&effects));
        }

        AnalyzeResult {
            lineage,
            diagnostics,
        }
    }
}

