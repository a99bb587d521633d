use serde::Serialize;
use spl_common::{Confidence, DataType, FieldEffect, Span};

/// One field effect observed while interpreting a stage.
///
/// Events within a stage are ordered: reads come before the writes that
/// depend on them, and parameters emit left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEvent {
    /// Index of the pipeline stage that produced the event.
    pub stage_index: usize,
    /// Lowercase command name of the stage.
    pub command: String,
    pub effect: FieldEffect,
    /// Field name, verbatim from the source; may contain a `*` wildcard,
    /// which the lineage engine resolves at application time.
    pub field: String,
    pub inferred_type: DataType,
    pub confidence: Confidence,
    /// Names of the fields this event's field is derived from.
    pub sources: Vec<String>,
    /// Source span of the token(s) the event came from, when known.
    pub span: Option<Span>,
}

/// How far the interpreter got matching a stage's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    /// Every argument token was consumed by the pattern.
    Matched,
    /// The pattern did not cover all arguments; `matched_args` tokens
    /// were consumed by the best-effort prefix and its events retained.
    Partial { matched_args: usize },
    /// The stage was not interpreted at all: unknown command passthrough
    /// or a recursion overflow.
    Skipped,
}

/// The interpreter's output for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEffects {
    pub stage_index: usize,
    pub command: String,
    pub outcome: MatchOutcome,
    /// Ordered field events.
    pub events: Vec<FieldEvent>,
    /// Keep-only restriction of the live set, for `fields +` / `table`.
    /// Entries may contain wildcards.
    pub restrict_to: Option<Vec<String>>,
}

impl StageEffects {
    /// An inert effect record for a stage the interpreter skipped.
    pub fn skipped(stage_index: usize, command: &str) -> Self {
        Self {
            stage_index,
            command: command.to_string(),
            outcome: MatchOutcome::Skipped,
            events: Vec::new(),
            restrict_to: None,
        }
    }
}
