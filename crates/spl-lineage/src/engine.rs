//! The lineage engine: folds per-stage field events into an indexed
//! field graph.
//!
//! The engine keeps an append-only archive of every node ever created
//! plus a live map from field name to its current node. Dropped and
//! overwritten nodes stay in the archive so dependency queries can
//! traverse through renamed or discarded fields.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::Serialize;
use spl_common::{Confidence, DataType, Diagnostic, DiagnosticKind, FieldEffect};

use crate::event::{FieldEvent, MatchOutcome, StageEffects};

/// The lineage of one field at one point of the pipeline.
///
/// A node is immutable once the stage that produced it has been applied;
/// a later write to the same name replaces the node's identity instead
/// of mutating it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineageNode {
    pub field: String,
    pub origin_stage: usize,
    pub origin_command: String,
    pub data_type: DataType,
    pub confidence: Confidence,
    pub depends_on: BTreeSet<String>,
    pub effect: FieldEffect,
}

/// Per-stage application summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub index: usize,
    pub command: String,
    pub outcome: MatchOutcome,
    pub created: Vec<String>,
    pub modified: Vec<String>,
    pub dropped: Vec<String>,
    pub consumed: Vec<String>,
    pub group_keys: Vec<String>,
    pub dangling: Vec<String>,
    /// Sorted names of the fields live after this stage.
    pub live_after: Vec<String>,
}

impl StageSummary {
    fn new(index: usize, command: &str, outcome: MatchOutcome) -> Self {
        Self {
            index,
            command: command.to_string(),
            outcome,
            created: Vec::new(),
            modified: Vec::new(),
            dropped: Vec::new(),
            consumed: Vec::new(),
            group_keys: Vec::new(),
            dangling: Vec::new(),
            live_after: Vec::new(),
        }
    }
}

/// The folded lineage of a whole pipeline, with its query API.
#[derive(Debug, Default)]
pub struct LineageIndex {
    /// Every node ever created, in creation order.
    nodes: Vec<LineageNode>,
    /// Live field name -> index into `nodes`.
    live: FxHashMap<String, usize>,
    /// Every node a name has ever had, in creation order.
    history: FxHashMap<String, Vec<usize>>,
    summaries: Vec<StageSummary>,
}

impl LineageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Stage application ──────────────────────────────────────────────

    /// Apply one stage's effects. Returns the diagnostics the stage
    /// raised (dangling references only; match problems are reported by
    /// the analyzer from the stage outcome).
    pub fn apply_stage(&mut self, effects: &StageEffects) -> Vec<Diagnostic> {
        let mut summary =
            StageSummary::new(effects.stage_index, &effects.command, effects.outcome);
        let mut diagnostics = Vec::new();
        // Names dropped earlier in this stage: a rename's creation must
        // still see the family its drop event just removed.
        let mut dropped_here: Vec<String> = Vec::new();

        for event in &effects.events {
            match event.effect {
                FieldEffect::Creates => {
                    self.apply_create(event, &mut summary, &dropped_here);
                }
                FieldEffect::Modifies => {
                    self.apply_modify(event, &mut summary);
                }
                FieldEffect::Consumes => {
                    self.apply_consume(event, &mut summary, &mut diagnostics, false);
                }
                FieldEffect::GroupsBy => {
                    self.apply_consume(event, &mut summary, &mut diagnostics, true);
                }
                FieldEffect::Drops => {
                    for name in self.resolve_names(&event.field) {
                        self.drop_field(&name, &mut summary);
                        dropped_here.push(name);
                    }
                }
            }
        }

        if let Some(keep) = &effects.restrict_to {
            self.restrict_live(keep, &mut summary);
        }

        summary.live_after = self.fields().iter().map(|s| s.to_string()).collect();
        self.summaries.push(summary);
        diagnostics
    }

    /// Record a stage the interpreter skipped or the registry does not
    /// know: nothing is created, dropped, or consumed.
    pub fn apply_passthrough(&mut self, stage_index: usize, command: &str) {
        let mut summary = StageSummary::new(stage_index, command, MatchOutcome::Skipped);
        summary.live_after = self.fields().iter().map(|s| s.to_string()).collect();
        self.summaries.push(summary);
    }

    fn apply_create(
        &mut self,
        event: &FieldEvent,
        summary: &mut StageSummary,
        dropped_here: &[String],
    ) {
        let wildcard_pair = event.field.contains('*')
            && event.sources.len() == 1
            && event.sources[0].contains('*');

        if wildcard_pair {
            // `rename foo_* as bar_*`: every live (or just-dropped)
            // field matching the source pattern maps through the
            // wildcard segment.
            let source_pat = &event.sources[0];
            let mut matches: Vec<String> = self
                .live
                .keys()
                .filter(|name| wc_match(source_pat, name))
                .cloned()
                .collect();
            matches.extend(
                dropped_here
                    .iter()
                    .filter(|name| wc_match(source_pat, name))
                    .cloned(),
            );
            matches.sort_unstable();
            matches.dedup();

            if matches.is_empty() {
                self.insert_node(event, event.field.clone(), event.sources.clone(), true, summary);
                return;
            }
            for name in matches {
                let target = match wc_capture(source_pat, &name) {
                    Some(segment) => event.field.replacen('*', &segment, 1),
                    None => event.field.clone(),
                };
                self.insert_node(event, target, vec![name], false, summary);
            }
            return;
        }

        if event.field.contains('*') {
            // A wildcard creation resolves against the live set; with no
            // match the wildcard literal itself is recorded.
            let matches = self.resolve_names(&event.field);
            if matches.is_empty() {
                self.insert_node(event, event.field.clone(), event.sources.clone(), true, summary);
            } else {
                for name in matches {
                    self.insert_node(event, name, event.sources.clone(), false, summary);
                }
            }
            return;
        }

        let (sources, unresolved) = self.expand_sources(&event.sources);
        self.insert_node(event, event.field.clone(), sources, unresolved, summary);
    }

    fn apply_modify(&mut self, event: &FieldEvent, summary: &mut StageSummary) {
        let names = self.resolve_names(&event.field);
        if names.is_empty() {
            // Modifying an absent field behaves as a creation.
            let (sources, unresolved) = self.expand_sources(&event.sources);
            self.insert_node(event, event.field.clone(), sources, unresolved, summary);
            return;
        }
        for name in names {
            let Some(&idx) = self.live.get(&name) else {
                continue;
            };
            let prior = &self.nodes[idx];
            let mut depends_on = prior.depends_on.clone();
            depends_on.extend(event.sources.iter().cloned());
            let data_type = if event.inferred_type.is_more_specific_than(prior.data_type) {
                event.inferred_type
            } else {
                prior.data_type
            };
            let node = LineageNode {
                field: name.clone(),
                origin_stage: event.stage_index,
                origin_command: event.command.clone(),
                data_type,
                confidence: prior.confidence,
                depends_on,
                effect: FieldEffect::Modifies,
            };
            self.replace_node(name.clone(), node);
            summary.modified.push(name);
        }
    }

    fn apply_consume(
        &mut self,
        event: &FieldEvent,
        summary: &mut StageSummary,
        diagnostics: &mut Vec<Diagnostic>,
        group_key: bool,
    ) {
        let names = self.resolve_names(&event.field);
        if names.is_empty() && !self.live.contains_key(&event.field) {
            summary.dangling.push(event.field.clone());
            let mut diag = Diagnostic::new(
                DiagnosticKind::DanglingReference,
                format!(
                    "`{}` reads field `{}` which is not live at this stage",
                    event.command, event.field
                ),
            )
            .at_stage(event.stage_index);
            if let Some(span) = event.span {
                diag = diag.with_span(span);
            }
            diagnostics.push(diag);
        }
        let recorded = if names.is_empty() {
            vec![event.field.clone()]
        } else {
            names
        };
        for name in recorded {
            summary.consumed.push(name.clone());
            if group_key {
                summary.group_keys.push(name);
            }
        }
    }

    fn drop_field(&mut self, name: &str, summary: &mut StageSummary) {
        if self.live.remove(name).is_some() {
            summary.dropped.push(name.to_string());
        }
    }

    fn restrict_live(&mut self, keep: &[String], summary: &mut StageSummary) {
        let mut doomed: Vec<String> = self
            .live
            .keys()
            .filter(|name| !keep.iter().any(|pat| wc_match(pat, name)))
            .cloned()
            .collect();
        doomed.sort_unstable();
        for name in doomed {
            self.drop_field(&name, summary);
        }
    }

    /// Insert a node for `name`, replacing any live node of that name.
    fn insert_node(
        &mut self,
        event: &FieldEvent,
        name: String,
        sources: Vec<String>,
        unresolved_wildcard: bool,
        summary: &mut StageSummary,
    ) {
        let confidence = if unresolved_wildcard {
            Confidence::Inferred
        } else {
            event.confidence
        };
        let node = LineageNode {
            field: name.clone(),
            origin_stage: event.stage_index,
            origin_command: event.command.clone(),
            data_type: event.inferred_type,
            confidence,
            depends_on: sources.into_iter().collect(),
            effect: event.effect,
        };
        self.replace_node(name.clone(), node);
        summary.created.push(name);
    }

    fn replace_node(&mut self, name: String, node: LineageNode) {
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.history.entry(name.clone()).or_default().push(idx);
        self.live.insert(name, idx);
    }

    /// Live field names matching a literal name or wildcard pattern.
    fn resolve_names(&self, pattern: &str) -> Vec<String> {
        if pattern.contains('*') {
            let mut names: Vec<String> = self
                .live
                .keys()
                .filter(|name| wc_match(pattern, name))
                .cloned()
                .collect();
            names.sort_unstable();
            names
        } else if self.live.contains_key(pattern) {
            vec![pattern.to_string()]
        } else {
            Vec::new()
        }
    }

    /// Expand wildcard source names against the live set. Returns the
    /// expanded set and whether any wildcard failed to resolve.
    fn expand_sources(&self, sources: &[String]) -> (Vec<String>, bool) {
        let mut out = Vec::new();
        let mut unresolved = false;
        for source in sources {
            if source.contains('*') {
                let matches = self.resolve_names(source);
                if matches.is_empty() {
                    unresolved = true;
                    out.push(source.clone());
                } else {
                    out.extend(matches);
                }
            } else {
                out.push(source.clone());
            }
        }
        (out, unresolved)
    }

    // ── Query API ──────────────────────────────────────────────────────

    /// The live node for a field, if the field is live.
    pub fn field_lineage(&self, name: &str) -> Option<&LineageNode> {
        self.live.get(name).map(|&idx| &self.nodes[idx])
    }

    /// Sorted names of the currently live fields.
    pub fn fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.live.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Sorted names of the fields live after the given stage.
    pub fn fields_at(&self, stage_index: usize) -> Option<&[String]> {
        self.summaries
            .get(stage_index)
            .map(|s| s.live_after.as_slice())
    }

    pub fn stage_summary(&self, stage_index: usize) -> Option<&StageSummary> {
        self.summaries.get(stage_index)
    }

    pub fn stages(&self) -> &[StageSummary] {
        &self.summaries
    }

    /// Transitive dependency closure of a field, sorted.
    ///
    /// The walk crosses non-live nodes: after `rename city AS client_city`,
    /// the closure of `client_city` contains `city` and everything `city`
    /// depended on. Names that no stage produced (external input fields)
    /// appear as leaves.
    pub fn transitive_dependencies(&self, name: &str) -> Vec<String> {
        let Some(start) = self.node_for(name, usize::MAX) else {
            return Vec::new();
        };
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut queue: Vec<(String, usize)> = start
            .depends_on
            .iter()
            .map(|dep| (dep.clone(), start.origin_stage))
            .collect();
        while let Some((dep, at_stage)) = queue.pop() {
            if dep == name || !seen.insert(dep.clone()) {
                continue;
            }
            if let Some(node) = self.node_for(&dep, at_stage) {
                for next in &node.depends_on {
                    queue.push((next.clone(), node.origin_stage));
                }
            }
        }
        seen.into_iter().collect()
    }

    /// The most recent node for a name originating at or before a stage.
    fn node_for(&self, name: &str, at_or_before: usize) -> Option<&LineageNode> {
        let indices = self.history.get(name)?;
        indices
            .iter()
            .rev()
            .map(|&idx| &self.nodes[idx])
            .find(|node| node.origin_stage <= at_or_before)
    }

    /// Deterministic JSON export of the live fields and stage summaries.
    pub fn to_json(&self) -> serde_json::Result<String> {
        use std::collections::BTreeMap;

        #[derive(Serialize)]
        struct Export<'a> {
            fields: BTreeMap<&'a str, &'a LineageNode>,
            stages: &'a [StageSummary],
        }

        let fields = self
            .live
            .iter()
            .map(|(name, &idx)| (name.as_str(), &self.nodes[idx]))
            .collect();
        serde_json::to_string_pretty(&Export {
            fields,
            stages: &self.summaries,
        })
    }
}

// ── Wildcard matching ──────────────────────────────────────────────────

/// Glob-style match of a `*` pattern against a field name.
fn wc_match(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == name;
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !name.starts_with(first) {
        return false;
    }
    let mut rest = &name[first.len()..];
    if rest.len() < last.len() || !rest.ends_with(last) {
        return false;
    }
    rest = &rest[..rest.len() - last.len()];
    for mid in &parts[1..parts.len() - 1] {
        if mid.is_empty() {
            continue;
        }
        match rest.find(mid) {
            Some(i) => rest = &rest[i + mid.len()..],
            None => return false,
        }
    }
    true
}

/// The text matched by the single `*` of a pattern, for wildcard-pair
/// renames. Multi-star patterns capture the first star's span greedily
/// up to the final literal part.
fn wc_capture(pattern: &str, name: &str) -> Option<String> {
    if !wc_match(pattern, name) {
        return None;
    }
    let star = pattern.find('*')?;
    let prefix = &pattern[..star];
    let suffix = &pattern[star + 1..];
    let core = &name[prefix.len()..];
    let suffix_literal = suffix.split('*').next_back().unwrap_or("");
    let end = core.len().checked_sub(suffix_literal.len())?;
    Some(core[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wc_match_basics() {
        assert!(wc_match("foo_*", "foo_city"));
        assert!(wc_match("*_ip", "src_ip"));
        assert!(wc_match("*", "anything"));
        assert!(wc_match("a*c*e", "abcde"));
        assert!(!wc_match("foo_*", "bar_city"));
        assert!(!wc_match("plain", "other"));
        assert!(wc_match("plain", "plain"));
    }

    #[test]
    fn wc_capture_extracts_the_star_segment() {
        assert_eq!(wc_capture("foo_*", "foo_city").as_deref(), Some("city"));
        assert_eq!(wc_capture("*_ip", "src_ip").as_deref(), Some("src"));
        assert_eq!(wc_capture("a*z", "abcz").as_deref(), Some("bc"));
        assert_eq!(wc_capture("foo_*", "bar_x"), None);
    }

    #[test]
    fn empty_star_segment_is_captured() {
        assert_eq!(wc_capture("foo*", "foo").as_deref(), Some(""));
    }
}
