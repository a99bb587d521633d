//! The pattern interpreter: matches a stage's argument tokens against its
//! command's syntax pattern and emits ordered field events.
//!
//! Matching is greedy and left-to-right. Quantifiers consume as much as
//! they can and are never reconsidered; backtracking happens only inside
//! alternations, where options are tried in declaration order and the one
//! consuming the most tokens wins (earlier wins ties). A mismatch is not
//! fatal: the interpreter keeps the events of the furthest prefix it
//! matched and reports a partial outcome.

use rustc_hash::FxHashMap;
use spl_common::{Confidence, DataType, FieldEffect, Span, Token, TokenKind};
use spl_grammar::funcs::{agg_output_type, is_agg_func, is_expr_keyword};
use spl_grammar::semantics::ArgShape;
use spl_grammar::{CommandSyntax, ImplicitFields, ParamType, Quantifier, SyntaxPattern};
use spl_grammar::MAX_PATTERN_DEPTH;
use spl_lexer::Stage;

use crate::event::{FieldEvent, MatchOutcome, StageEffects};

/// Words that terminate a field list or expression run; they introduce
/// the next clause of a command rather than naming a field.
const RESERVED_WORDS: &[&str] = &[
    "by", "as", "over", "where", "output", "outputnew", "sortby", "groupby", "with",
];

/// Words that terminate an expression run specifically.
const EXPR_BOUNDARY: &[&str] = &["by", "groupby", "over", "sortby"];

/// Interpret one stage against its command's grammar entry.
pub fn interpret_stage(
    syntax: &CommandSyntax,
    stage: &Stage,
    stage_index: usize,
    source: &str,
) -> StageEffects {
    let mut matcher = Matcher::new(source, &stage.args);
    let mut trace = Vec::new();
    let result = matcher.match_pattern(&syntax.pattern, 0, &mut trace);

    if matcher.overflow {
        return StageEffects::skipped(stage_index, &syntax.name);
    }

    let (outcome, trace) = match result {
        Some(pos) if pos == stage.args.len() => (MatchOutcome::Matched, trace),
        Some(pos) => (MatchOutcome::Partial { matched_args: pos }, trace),
        None => (
            MatchOutcome::Partial {
                matched_args: matcher.best_pos,
            },
            std::mem::take(&mut matcher.best_trace),
        ),
    };

    let mut raws = Vec::new();
    let mut bindings: FxHashMap<String, String> = FxHashMap::default();
    let mut literals: Vec<(usize, String)> = Vec::new();
    let mut values: Vec<(usize, String, Span)> = Vec::new();
    for item in trace {
        match item {
            TraceItem::Event(raw) => raws.push(raw),
            TraceItem::Binding { name, value } => {
                bindings.insert(name, value);
            }
            TraceItem::Literal { arg_index, text } => literals.push((arg_index, text)),
            TraceItem::Value {
                arg_index,
                text,
                span,
            } => values.push((arg_index, text, span)),
        }
    }

    let restrict_to = shape_events(
        syntax.semantics.shape,
        &mut raws,
        &literals,
        &values,
        &bindings,
    );

    if outcome == MatchOutcome::Matched {
        if let Some(implicit) = &syntax.semantics.implicit {
            inject_implicit(implicit, &bindings, &mut raws);
        }
    }

    let events = raws
        .into_iter()
        .map(|raw| FieldEvent {
            stage_index,
            command: syntax.name.clone(),
            effect: raw.effect,
            field: raw.field,
            inferred_type: raw.data_type,
            confidence: raw.confidence,
            sources: raw.sources,
            span: raw.span,
        })
        .collect();

    StageEffects {
        stage_index,
        command: syntax.name.clone(),
        outcome,
        events,
        restrict_to,
    }
}

// ── Raw events and the match trace ─────────────────────────────────────

/// An event before stage/command attribution, carrying the matcher
/// context (parameter type, argument position) the shaping passes need.
#[derive(Debug, Clone)]
struct RawEvent {
    effect: FieldEffect,
    field: String,
    ptype: ParamType,
    data_type: DataType,
    confidence: Confidence,
    sources: Vec<String>,
    span: Option<Span>,
    arg_index: usize,
}

/// Everything the matcher records while walking a pattern. Kept in one
/// buffer so failed branches roll back uniformly.
#[derive(Debug, Clone)]
enum TraceItem {
    Event(RawEvent),
    /// A matched named option: `prefix=src_` records ("prefix", "src_").
    Binding { name: String, value: String },
    /// A matched literal keyword and its argument position.
    Literal { arg_index: usize, text: String },
    /// A matched effectless positional value (e.g. a regex argument).
    Value {
        arg_index: usize,
        text: String,
        span: Span,
    },
}

// ── The matcher ────────────────────────────────────────────────────────

struct Matcher<'a> {
    source: &'a str,
    args: &'a [Token],
    depth: usize,
    overflow: bool,
    /// Furthest argument position any branch reached, and the trace at
    /// that point; this is the best-effort prefix on mismatch.
    best_pos: usize,
    best_trace: Vec<TraceItem>,
}

impl<'a> Matcher<'a> {
    fn new(source: &'a str, args: &'a [Token]) -> Self {
        Self {
            source,
            args,
            depth: 0,
            overflow: false,
            best_pos: 0,
            best_trace: Vec::new(),
        }
    }

    fn text(&self, pos: usize) -> &'a str {
        self.args[pos].text(self.source)
    }

    fn value(&self, pos: usize) -> &'a str {
        self.args[pos].value(self.source)
    }

    /// Match a pattern node, applying its quantifier.
    fn match_pattern(
        &mut self,
        pattern: &SyntaxPattern,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        if self.overflow {
            return None;
        }
        self.depth += 1;
        if self.depth > MAX_PATTERN_DEPTH {
            self.overflow = true;
            self.depth -= 1;
            return None;
        }

        let result = match pattern.quantifier() {
            Quantifier::One => self.match_once(pattern, pos, trace),
            Quantifier::Optional => self.match_once(pattern, pos, trace).or(Some(pos)),
            Quantifier::OneOrMore => {
                let first = self.match_once(pattern, pos, trace);
                first.map(|p| self.match_repeat(pattern, p, trace))
            }
            Quantifier::ZeroOrMore => Some(self.match_repeat(pattern, pos, trace)),
        };
        self.depth -= 1;

        if let Some(p) = result {
            if p > self.best_pos {
                self.best_pos = p;
                self.best_trace = trace.clone();
            }
        }
        result
    }

    /// Greedily repeat a node from `pos`; zero-width matches stop the loop.
    fn match_repeat(
        &mut self,
        pattern: &SyntaxPattern,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> usize {
        let mut cur = pos;
        while let Some(next) = self.match_once(pattern, cur, trace) {
            if next == cur {
                break;
            }
            cur = next;
        }
        cur
    }

    /// Match a single occurrence; on failure the trace is rolled back.
    fn match_once(
        &mut self,
        pattern: &SyntaxPattern,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let mark = trace.len();
        let result = self.match_core(pattern, pos, trace);
        if result.is_none() {
            trace.truncate(mark);
        }
        result
    }

    fn match_core(
        &mut self,
        pattern: &SyntaxPattern,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        match pattern {
            SyntaxPattern::Literal { value, .. } => {
                if pos < self.args.len() && self.text(pos).eq_ignore_ascii_case(value) {
                    trace.push(TraceItem::Literal {
                        arg_index: pos,
                        text: value.clone(),
                    });
                    Some(pos + 1)
                } else {
                    None
                }
            }
            SyntaxPattern::Param {
                param_type,
                name,
                effect,
                ..
            } => self.match_param(*param_type, name.as_deref(), *effect, pos, trace),
            SyntaxPattern::Sequence { patterns, .. } => {
                let mut cur = pos;
                for p in patterns {
                    cur = self.match_pattern(p, cur, trace)?;
                }
                Some(cur)
            }
            SyntaxPattern::Alternation { options } => {
                let mark = trace.len();
                let mut best: Option<(usize, Vec<TraceItem>)> = None;
                for option in options {
                    if let Some(p) = self.match_pattern(option, pos, trace) {
                        let items = trace.split_off(mark);
                        // Strictly-greater keeps the earliest option on ties.
                        if best.as_ref().map(|(bp, _)| p > *bp).unwrap_or(true) {
                            best = Some((p, items));
                        }
                    } else {
                        trace.truncate(mark);
                    }
                }
                let (p, items) = best?;
                trace.extend(items);
                Some(p)
            }
            SyntaxPattern::Group { pattern, .. } => self.match_pattern(pattern, pos, trace),
        }
    }

    // ── Parameter matching ─────────────────────────────────────────────

    fn match_param(
        &mut self,
        param_type: ParamType,
        name: Option<&str>,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        if let Some(name) = name {
            return self.match_named(param_type, name, effect, pos, trace);
        }
        match param_type {
            ParamType::FieldList => self.match_field_list(effect, pos, trace),
            ParamType::EvaledField => self.match_expression(effect, pos, trace),
            ParamType::StatsFunc => self.match_stats_func(effect, pos, trace),
            _ => self.match_scalar(param_type, effect, pos, trace),
        }
    }

    /// `name=value`: three tokens, name matched case-insensitively.
    fn match_named(
        &mut self,
        param_type: ParamType,
        name: &str,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let name_tok = self.args.get(pos)?;
        if name_tok.kind != TokenKind::Word || !self.text(pos).eq_ignore_ascii_case(name) {
            return None;
        }
        if self.args.get(pos + 1)?.kind != TokenKind::Eq {
            return None;
        }
        let value_tok = self.args.get(pos + 2)?;
        let value_text = self.value(pos + 2);
        if !scalar_matches(param_type, value_tok, value_text) {
            return None;
        }
        trace.push(TraceItem::Binding {
            name: name.to_ascii_lowercase(),
            value: value_text.to_string(),
        });
        if let Some(effect) = effect {
            trace.push(TraceItem::Event(RawEvent {
                effect,
                field: field_name(value_text),
                ptype: param_type,
                data_type: scalar_type(param_type),
                confidence: Confidence::Certain,
                sources: Vec::new(),
                span: Some(value_tok.span),
                arg_index: pos + 2,
            }));
        }
        Some(pos + 3)
    }

    /// A single token matching the type predicate.
    fn match_scalar(
        &mut self,
        param_type: ParamType,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let tok = self.args.get(pos)?;
        let text = self.value(pos);
        if !scalar_matches(param_type, tok, text) {
            return None;
        }
        if let Some(effect) = effect {
            trace.push(TraceItem::Event(RawEvent {
                effect,
                field: field_name(text),
                ptype: param_type,
                data_type: scalar_type(param_type),
                confidence: Confidence::Certain,
                sources: Vec::new(),
                span: Some(tok.span),
                arg_index: pos,
            }));
        } else {
            trace.push(TraceItem::Value {
                arg_index: pos,
                text: text.to_string(),
                span: tok.span,
            });
        }
        Some(pos + 1)
    }

    /// An aggregation call: `count`, `avg(duration)`. Emits a read for
    /// every field inside the call, then the creation of the call's
    /// output column.
    fn match_stats_func(
        &mut self,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let tok = self.args.get(pos)?;
        let text = self.text(pos);
        let accepted = match tok.kind {
            TokenKind::Func => true,
            TokenKind::Word => is_agg_func(text),
            _ => false,
        };
        if !accepted {
            return None;
        }

        let (head, inner) = split_call(text);
        let inner_fields = extract_idents(inner);
        match effect {
            Some(FieldEffect::Creates) => {
                for field in &inner_fields {
                    trace.push(TraceItem::Event(RawEvent {
                        effect: FieldEffect::Consumes,
                        field: field.clone(),
                        ptype: ParamType::StatsFunc,
                        data_type: DataType::Unknown,
                        confidence: Confidence::Certain,
                        sources: Vec::new(),
                        span: Some(tok.span),
                        arg_index: pos,
                    }));
                }
                trace.push(TraceItem::Event(RawEvent {
                    effect: FieldEffect::Creates,
                    field: text.to_string(),
                    ptype: ParamType::StatsFunc,
                    data_type: agg_output_type(head),
                    confidence: Confidence::Certain,
                    sources: inner_fields,
                    span: Some(tok.span),
                    arg_index: pos,
                }));
            }
            Some(FieldEffect::Modifies) => {
                // Conversion style (`convert ctime(_time)`): the call
                // rewrites its argument fields in place.
                for field in inner_fields {
                    trace.push(TraceItem::Event(RawEvent {
                        effect: FieldEffect::Modifies,
                        field,
                        ptype: ParamType::StatsFunc,
                        data_type: DataType::Unknown,
                        confidence: Confidence::Certain,
                        sources: Vec::new(),
                        span: Some(tok.span),
                        arg_index: pos,
                    }));
                }
            }
            _ => {}
        }
        Some(pos + 1)
    }

    /// A comma- or whitespace-separated run of field tokens.
    fn match_field_list(
        &mut self,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let mut cur = pos;
        let mut items = 0usize;
        while let Some(tok) = self.args.get(cur) {
            let text = self.value(cur);
            if !is_field_item(tok, text) {
                break;
            }
            // A word followed by `=` starts a named option, not a list item.
            if self
                .args
                .get(cur + 1)
                .map(|t| t.kind == TokenKind::Eq)
                .unwrap_or(false)
            {
                break;
            }
            if let Some(effect) = effect {
                trace.push(TraceItem::Event(RawEvent {
                    effect,
                    field: field_name(text),
                    ptype: ParamType::FieldList,
                    data_type: DataType::Unknown,
                    confidence: Confidence::Certain,
                    sources: Vec::new(),
                    span: Some(tok.span),
                    arg_index: cur,
                }));
            }
            cur += 1;
            items += 1;
            if self
                .args
                .get(cur)
                .map(|t| t.kind == TokenKind::Comma)
                .unwrap_or(false)
            {
                cur += 1;
            }
        }
        if items == 0 {
            None
        } else {
            Some(cur)
        }
    }

    /// An expression run: everything up to a top-level comma or a clause
    /// boundary word. Field references inside the expression surface as
    /// `likely` reads.
    fn match_expression(
        &mut self,
        effect: Option<FieldEffect>,
        pos: usize,
        trace: &mut Vec<TraceItem>,
    ) -> Option<usize> {
        let start = pos;
        let mut cur = pos;
        while let Some(tok) = self.args.get(cur) {
            if tok.kind == TokenKind::Comma {
                break;
            }
            if tok.kind == TokenKind::Word {
                let text = self.text(cur);
                if EXPR_BOUNDARY.iter().any(|w| text.eq_ignore_ascii_case(w)) {
                    break;
                }
            }
            cur += 1;
        }
        if cur == start {
            return None;
        }

        if effect == Some(FieldEffect::Consumes) {
            let span = self.args[start].span.cover(self.args[cur - 1].span);
            for field in self.expression_refs(start, cur) {
                trace.push(TraceItem::Event(RawEvent {
                    effect: FieldEffect::Consumes,
                    field,
                    ptype: ParamType::EvaledField,
                    data_type: DataType::Unknown,
                    confidence: Confidence::Likely,
                    sources: Vec::new(),
                    span: Some(span),
                    arg_index: start,
                }));
            }
        }
        Some(cur)
    }

    /// Field references in an expression token run, deduplicated in
    /// first-appearance order. Double-quoted strings are literals;
    /// single-quoted strings are field references (SPL eval semantics).
    fn expression_refs(&self, start: usize, end: usize) -> Vec<String> {
        let mut refs: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !refs.contains(&name) {
                refs.push(name);
            }
        };
        for i in start..end {
            let tok = &self.args[i];
            match tok.kind {
                TokenKind::Word => {
                    for ident in extract_idents(self.text(i)) {
                        push(ident);
                    }
                }
                TokenKind::Func => {
                    let (_, inner) = split_call(self.text(i));
                    for ident in extract_idents(inner) {
                        push(ident);
                    }
                }
                TokenKind::Quoted => {
                    let text = self.text(i);
                    if text.starts_with('\'') {
                        push(tok.value(self.source).to_string());
                    }
                }
                _ => {}
            }
        }
        refs
    }
}

// ── Token predicates ───────────────────────────────────────────────────

fn is_reserved(text: &str) -> bool {
    RESERVED_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w))
}

fn is_field_item(tok: &Token, text: &str) -> bool {
    tok.is_field_like() && !is_reserved(text) && !matches!(text, "+" | "-")
}

fn is_bool_word(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "true" | "false" | "t" | "f" | "0" | "1"
    )
}

fn is_truthy(text: &str) -> bool {
    matches!(text.to_ascii_lowercase().as_str(), "true" | "t" | "1")
}

const TIME_UNITS: &[&str] = &[
    "s", "sec", "secs", "second", "seconds", "m", "min", "mins", "minute", "minutes", "h", "hr",
    "hrs", "hour", "hours", "d", "day", "days", "w", "week", "weeks", "mon", "month", "months",
    "q", "qtr", "qtrs", "quarter", "quarters", "y", "yr", "yrs", "year", "years",
];

/// Relative time modifier: `5m`, `-7d@d`, `now`, or a bare number.
fn is_time_modifier(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    if lower == "now" || lower == "rt" {
        return true;
    }
    let body = lower.strip_prefix(['-', '+']).unwrap_or(&lower);
    let (main, snap) = match body.split_once('@') {
        Some((main, snap)) => (main, Some(snap)),
        None => (body, None),
    };
    if main.is_empty() {
        return snap.is_some();
    }
    let digits_end = main
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(main.len());
    let (digits, unit) = main.split_at(digits_end);
    if unit.is_empty() {
        return !digits.is_empty();
    }
    TIME_UNITS.contains(&unit)
}

fn scalar_matches(param_type: ParamType, tok: &Token, text: &str) -> bool {
    match param_type {
        ParamType::Field => tok.is_field_like() && !is_reserved(text) && !matches!(text, "+" | "-") && !text.contains('*'),
        ParamType::WcField => is_field_item(tok, text),
        ParamType::Int => tok.kind == TokenKind::Int,
        ParamType::Num => matches!(tok.kind, TokenKind::Int | TokenKind::Num),
        ParamType::Bool => {
            matches!(tok.kind, TokenKind::Word | TokenKind::Int) && is_bool_word(text)
        }
        ParamType::Str => {
            matches!(
                tok.kind,
                TokenKind::Word
                    | TokenKind::Quoted
                    | TokenKind::Int
                    | TokenKind::Num
                    | TokenKind::Func
                    | TokenKind::Subsearch
            ) && !is_reserved(text)
        }
        ParamType::StatsFunc => {
            tok.kind == TokenKind::Func || (tok.kind == TokenKind::Word && is_agg_func(text))
        }
        ParamType::TimeModifier => {
            tok.kind == TokenKind::Int
                || (tok.kind == TokenKind::Word && is_time_modifier(text))
        }
        // Run-consuming types never match as a single named value.
        ParamType::FieldList | ParamType::EvaledField => false,
    }
}

fn scalar_type(param_type: ParamType) -> DataType {
    match param_type {
        ParamType::Int | ParamType::Num => DataType::Number,
        ParamType::Bool => DataType::Bool,
        ParamType::Str | ParamType::TimeModifier => DataType::Str,
        _ => DataType::Unknown,
    }
}

/// Strip one leading sort-direction sign from a field token.
fn field_name(text: &str) -> String {
    let stripped = text.strip_prefix(['+', '-']).unwrap_or(text);
    if stripped.is_empty() {
        text.to_string()
    } else {
        stripped.to_string()
    }
}

/// Split `head(inner)` into its parts; a bare word has an empty inner.
fn split_call(text: &str) -> (&str, &str) {
    match text.split_once('(') {
        Some((head, rest)) => (head, rest.strip_suffix(')').unwrap_or(rest)),
        None => (text, ""),
    }
}

/// Identifiers in an expression fragment that plausibly name fields:
/// skips expression keywords, called function names, numbers, and
/// double-quoted string contents. Single-quoted segments are field
/// references.
fn extract_idents(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '"' {
            // Skip a double-quoted literal.
            i += 1;
            while i < bytes.len() && bytes[i] as char != '"' {
                i += if bytes[i] == b'\\' { 2 } else { 1 };
            }
            i += 1;
        } else if c == '\'' {
            // A single-quoted field reference.
            let start = i + 1;
            let mut j = start;
            while j < bytes.len() && bytes[j] as char != '\'' {
                j += 1;
            }
            if j > start {
                let name = &text[start..j];
                if !out.iter().any(|n| n == name) {
                    out.push(name.to_string());
                }
            }
            i = j + 1;
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() {
                let c = bytes[i] as char;
                if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    i += 1;
                } else {
                    break;
                }
            }
            let ident = &text[start..i];
            let is_call = i < bytes.len() && bytes[i] == b'(';
            if !is_call && !is_expr_keyword(ident) && !out.iter().any(|n| n == ident) {
                out.push(ident.to_string());
            }
        } else {
            i += 1;
        }
    }
    out
}

// ── Event shaping ──────────────────────────────────────────────────────

fn shape_events(
    shape: ArgShape,
    raws: &mut Vec<RawEvent>,
    literals: &[(usize, String)],
    values: &[(usize, String, Span)],
    bindings: &FxHashMap<String, String>,
) -> Option<Vec<String>> {
    match shape {
        ArgShape::Standard => None,
        ArgShape::RenamePairs => {
            rename_pairs(raws);
            None
        }
        ArgShape::Aggregates => {
            alias_fold(raws, literals);
            None
        }
        ArgShape::EvalAssignments => {
            eval_assignments(raws);
            None
        }
        ArgShape::RestrictFields => restrict_fields(raws, literals),
        ArgShape::RexCaptures => {
            rex_captures(raws, values, bindings);
            None
        }
        ArgShape::LookupOutputs => {
            alias_fold(raws, literals);
            lookup_outputs(raws);
            None
        }
        ArgShape::TrailingTarget => {
            trailing_target(raws);
            None
        }
    }
}

/// `old AS new` rename pairs: the created field depends on the field
/// dropped two argument positions before it.
fn rename_pairs(raws: &mut [RawEvent]) {
    let drops: Vec<(usize, String)> = raws
        .iter()
        .filter(|r| r.effect == FieldEffect::Drops)
        .map(|r| (r.arg_index, r.field.clone()))
        .collect();
    for raw in raws.iter_mut() {
        if raw.effect == FieldEffect::Creates {
            if let Some((_, old)) = drops.iter().find(|(i, _)| *i + 2 == raw.arg_index) {
                raw.sources = vec![old.clone()];
            }
        }
    }
}

/// Fold `X as Y` aliases: the created alias absorbs the sources and type
/// of the write event two positions before it, across a matched `as`
/// literal. A folded creation is removed; a folded in-place modification
/// is downgraded to a read.
fn alias_fold(raws: &mut Vec<RawEvent>, literals: &[(usize, String)]) {
    let as_at: Vec<usize> = literals
        .iter()
        .filter(|(_, t)| t.eq_ignore_ascii_case("as"))
        .map(|(i, _)| *i)
        .collect();

    let mut remove = Vec::new();
    for i in 0..raws.len() {
        if raws[i].effect != FieldEffect::Creates || raws[i].ptype != ParamType::Field {
            continue;
        }
        let alias_pos = raws[i].arg_index;
        if alias_pos == 0 || !as_at.contains(&(alias_pos - 1)) {
            continue;
        }
        // The folded event sits two argument positions back. An
        // aggregation token emits both its input reads and its output
        // creation at that position; prefer the write.
        let mut write_j = None;
        let mut read_j = None;
        for (j, r) in raws.iter().enumerate() {
            if j == i || r.arg_index + 2 != alias_pos {
                continue;
            }
            match r.effect {
                FieldEffect::Creates | FieldEffect::Modifies => write_j = Some(j),
                FieldEffect::Consumes => read_j = Some(j),
                _ => {}
            }
        }
        let Some(j) = write_j.or(read_j) else {
            continue;
        };
        let (sources, dtype, effect) = {
            let w = &raws[j];
            let sources = if w.sources.is_empty() {
                vec![w.field.clone()]
            } else {
                w.sources.clone()
            };
            (sources, w.data_type, w.effect)
        };
        raws[i].sources = sources;
        if raws[i].data_type == DataType::Unknown {
            raws[i].data_type = dtype;
        }
        match effect {
            FieldEffect::Creates => remove.push(j),
            FieldEffect::Modifies => raws[j].effect = FieldEffect::Consumes,
            _ => {}
        }
    }
    remove.sort_unstable();
    remove.dedup();
    for j in remove.into_iter().rev() {
        raws.remove(j);
    }
}

/// Each assignment's created field absorbs the expression reads that
/// follow it, up to the next write.
fn eval_assignments(raws: &mut [RawEvent]) {
    let mut write: Option<usize> = None;
    let mut deps: Vec<String> = Vec::new();
    let mut pending: Vec<(usize, Vec<String>)> = Vec::new();
    for (i, raw) in raws.iter().enumerate() {
        match raw.effect {
            FieldEffect::Creates | FieldEffect::Modifies => {
                if let Some(w) = write.take() {
                    pending.push((w, std::mem::take(&mut deps)));
                }
                write = Some(i);
            }
            FieldEffect::Consumes if raw.ptype == ParamType::EvaledField => {
                deps.push(raw.field.clone());
            }
            _ => {}
        }
    }
    if let Some(w) = write {
        pending.push((w, deps));
    }
    for (w, deps) in pending {
        raws[w].sources = deps;
    }
}

/// `fields` / `table`: in `-` mode the listed fields become drops; in
/// keep mode they become the keep-only restriction.
fn restrict_fields(raws: &mut [RawEvent], literals: &[(usize, String)]) -> Option<Vec<String>> {
    let minus = literals.iter().any(|(_, t)| t == "-");
    if minus {
        for raw in raws.iter_mut() {
            if raw.effect == FieldEffect::Consumes && raw.ptype == ParamType::FieldList {
                raw.effect = FieldEffect::Drops;
            }
        }
        None
    } else {
        let keep: Vec<String> = raws
            .iter()
            .filter(|r| r.effect == FieldEffect::Consumes && r.ptype == ParamType::FieldList)
            .map(|r| r.field.clone())
            .collect();
        if keep.is_empty() {
            None
        } else {
            Some(keep)
        }
    }
}

/// Named capture groups in the regex argument become created fields.
fn rex_captures(
    raws: &mut Vec<RawEvent>,
    values: &[(usize, String, Span)],
    bindings: &FxHashMap<String, String>,
) {
    let Some((arg_index, pattern, span)) = values.last() else {
        return;
    };
    let source_field = bindings
        .get("field")
        .map(|f| field_name(f))
        .unwrap_or_else(|| "_raw".to_string());
    for name in capture_group_names(pattern) {
        raws.push(RawEvent {
            effect: FieldEffect::Creates,
            field: name,
            ptype: ParamType::Field,
            data_type: DataType::Str,
            confidence: Confidence::Certain,
            sources: vec![source_field.clone()],
            span: Some(*span),
            arg_index: *arg_index,
        });
    }
}

/// `(?<name>...)` and `(?P<name>...)` group names, in order.
fn capture_group_names(pattern: &str) -> Vec<String> {
    let mut out = Vec::new();
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'(' && bytes[i + 1] == b'?' {
            let mut j = i + 2;
            if j < bytes.len() && bytes[j] == b'P' {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'<' {
                let start = j + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end] != b'>' {
                    end += 1;
                }
                // `(?<=...)` / `(?<!...)` are lookbehinds, not captures.
                if end > start
                    && bytes[start] != b'='
                    && bytes[start] != b'!'
                    && end < bytes.len()
                {
                    out.push(pattern[start..end].to_string());
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// Enrichment outputs depend on the consumed input fields.
fn lookup_outputs(raws: &mut Vec<RawEvent>) {
    let inputs: Vec<String> = raws
        .iter()
        .filter(|r| {
            r.effect == FieldEffect::Consumes
                && r.confidence == Confidence::Certain
                && matches!(r.ptype, ParamType::Field | ParamType::FieldList)
        })
        .map(|r| r.field.clone())
        .collect();
    if inputs.is_empty() {
        return;
    }
    for raw in raws.iter_mut() {
        if raw.effect == FieldEffect::Creates {
            raw.sources = inputs.clone();
        }
    }
}

/// The last consumed field is the destination, built from the rest.
fn trailing_target(raws: &mut [RawEvent]) {
    let Some(last) = raws
        .iter()
        .rposition(|r| r.effect == FieldEffect::Consumes && r.ptype == ParamType::Field)
    else {
        return;
    };
    let sources: Vec<String> = raws[..last]
        .iter()
        .filter(|r| r.effect == FieldEffect::Consumes && r.ptype == ParamType::Field)
        .map(|r| r.field.clone())
        .collect();
    raws[last].effect = FieldEffect::Creates;
    raws[last].data_type = DataType::Str;
    raws[last].sources = sources;
}

/// Documented derived fields, injected after a full match. The prefix
/// parameter (when bound) prefixes every name; an empty prefix produces
/// unprefixed names. Implicit creations depend on the stage's explicitly
/// consumed fields.
fn inject_implicit(
    implicit: &ImplicitFields,
    bindings: &FxHashMap<String, String>,
    raws: &mut Vec<RawEvent>,
) {
    let prefix = implicit
        .prefix_param
        .as_ref()
        .and_then(|p| bindings.get(p))
        .cloned()
        .unwrap_or_default();
    let sources: Vec<String> = raws
        .iter()
        .filter(|r| {
            r.effect == FieldEffect::Consumes
                && r.confidence == Confidence::Certain
                && matches!(r.ptype, ParamType::Field | ParamType::FieldList)
        })
        .map(|r| r.field.clone())
        .collect();

    let mut fields: Vec<(String, DataType)> = implicit.fields.clone();
    if let Some((flag, extended)) = &implicit.extended {
        if bindings.get(flag).map(|v| is_truthy(v)).unwrap_or(false) {
            fields.extend(extended.iter().cloned());
        }
    }
    for (name, dtype) in fields {
        raws.push(RawEvent {
            effect: FieldEffect::Creates,
            field: format!("{prefix}{name}"),
            ptype: ParamType::Field,
            data_type: dtype,
            confidence: Confidence::Certain,
            sources: sources.clone(),
            span: None,
            arg_index: usize::MAX,
        });
    }
}
