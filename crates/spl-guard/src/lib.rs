//! Risky-command detection and removal.
//!
//! A stage is risky when its command's effect leaves the current search
//! context and mutates persistent state: writing to an index, a lookup
//! table, a file, or an external system. The detector reports such
//! top-level stages with exact source spans; the remover deletes them
//! and normalizes the remaining pipe structure.
//!
//! Two detection paths sit behind one interface: the preferred path
//! walks the parsed stage list; the fallback scans the raw text with a
//! line-anchored regex. Both produce identical reports for well-formed
//! pipelines.

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use spl_lexer::split_stages;

/// Command names whose stages leave the search context by default.
const DEFAULT_RISKY: &[&str] = &[
    "collect",
    "outputlookup",
    "outputcsv",
    "mcollect",
    "meventcollect",
    "tscollect",
    "sendemail",
    "sendalert",
    "delete",
];

/// The set of command names treated as risky.
#[derive(Debug, Clone)]
pub struct RiskyPolicy {
    names: FxHashSet<String>,
}

impl RiskyPolicy {
    /// A policy over an explicit name set; names are lowercased.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether a command name is in the policy, case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// The policy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RiskyPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RISKY.iter().copied())
    }
}

/// One detected risky stage. Offsets are byte offsets, inclusive on
/// both ends; lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskySpan {
    pub command: String,
    pub start_offset: u32,
    pub end_offset: u32,
    pub start_line: u32,
    pub end_line: u32,
}

/// The detector's report for one query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RiskyReport {
    pub has_risky: bool,
    /// Detected stages in source order.
    pub commands: Vec<RiskySpan>,
    /// Sorted, deduplicated command names.
    pub unique_names: Vec<String>,
}

impl RiskyReport {
    fn from_spans(commands: Vec<RiskySpan>) -> Self {
        let mut unique_names: Vec<String> =
            commands.iter().map(|c| c.command.clone()).collect();
        unique_names.sort_unstable();
        unique_names.dedup();
        Self {
            has_risky: !commands.is_empty(),
            commands,
            unique_names,
        }
    }
}

/// Detects and removes risky stages.
pub struct RiskyDetector {
    policy: RiskyPolicy,
    line_scan: Regex,
}

impl RiskyDetector {
    pub fn new(policy: RiskyPolicy) -> Self {
        // `| <command>` at a line start, case-insensitive. Policy names
        // are caller-supplied, so each is escaped before joining; the
        // resulting alternation is always a valid pattern.
        let names: Vec<String> = policy
            .names()
            .iter()
            .map(|name| regex::escape(name))
            .collect();
        let pattern = format!(r"(?im)^[ \t]*\|[ \t]*({})\b", names.join("|"));
        let line_scan = Regex::new(&pattern).expect("escaped alternation is a valid pattern");
        Self { policy, line_scan }
    }

    pub fn policy(&self) -> &RiskyPolicy {
        &self.policy
    }

    /// Detect risky stages by walking the parsed stage list. This is
    /// the preferred path: spans come straight from stage nodes.
    pub fn detect(&self, source: &str) -> RiskyReport {
        let mut commands = Vec::new();
        for stage in split_stages(source) {
            if !self.policy.contains(&stage.command) {
                continue;
            }
            let start = stage.command_span.start;
            let end = stage.span.end.saturating_sub(1);
            commands.push(RiskySpan {
                command: stage.command,
                start_offset: start,
                end_offset: end,
                start_line: line_of(source, start),
                end_line: line_of(source, end),
            });
        }
        RiskyReport::from_spans(commands)
    }

    /// Detect risky stages with the regex fallback: `| <command>` at
    /// line starts. A stage runs until the next `|` or end of input,
    /// trailing whitespace excluded.
    pub fn detect_with_regex(&self, source: &str) -> RiskyReport {
        if self.policy.names.is_empty() {
            return RiskyReport::default();
        }
        let mut commands = Vec::new();
        for caps in self.line_scan.captures_iter(source) {
            let Some(m) = caps.get(1) else { continue };
            let name = m.as_str();
            let start = m.start();
            let stage_end = source[start..]
                .find('|')
                .map(|i| start + i)
                .unwrap_or(source.len());
            let trimmed = source[start..stage_end].trim_end();
            if trimmed.is_empty() {
                continue;
            }
            let end = start + trimmed.len() - 1;
            commands.push(RiskySpan {
                command: name.to_ascii_lowercase(),
                start_offset: start as u32,
                end_offset: end as u32,
                start_line: line_of(source, start as u32),
                end_line: line_of(source, end as u32),
            });
        }
        RiskyReport::from_spans(commands)
    }

    /// Delete the listed spans from the source and normalize the result.
    ///
    /// Deletions are applied in descending offset order so earlier
    /// offsets stay valid. With an empty span list the source is
    /// returned unchanged apart from normalization; this never fails.
    pub fn remove(&self, source: &str, commands: &[RiskySpan]) -> String {
        let mut text = source.to_string();
        let mut spans: Vec<&RiskySpan> = commands.iter().collect();
        spans.sort_by(|a, b| b.start_offset.cmp(&a.start_offset));
        for span in spans {
            let start = span.start_offset as usize;
            let end = (span.end_offset as usize + 1).min(text.len());
            if start < end && start <= text.len() {
                text.replace_range(start..end, "");
            }
        }
        normalize(&text)
    }
}

impl Default for RiskyDetector {
    fn default() -> Self {
        Self::new(RiskyPolicy::default())
    }
}

/// 1-based line number containing a byte offset.
///
/// A report touches a handful of offsets per query, so counting the
/// newlines before each one beats building a line table up front.
fn line_of(source: &str, offset: u32) -> u32 {
    let end = (offset as usize).min(source.len());
    let newlines = source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
    newlines as u32 + 1
}

/// Pipe-structure cleanup after span deletion:
/// adjacent pipes separated only by horizontal whitespace collapse to
/// one, every line loses trailing pipes and horizontal whitespace,
/// whitespace-only lines disappear, and the whole string is trimmed at
/// the end. Newlines between surviving stages are preserved.
fn normalize(text: &str) -> String {
    let s = collapse_pipe_runs(text);
    let lines: Vec<&str> = s
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t', '|']))
        .filter(|line| !line.trim().is_empty())
        .collect();
    lines.join("\n").trim_end().to_string()
}

/// Collapse `|<horizontal ws>|` into a single pipe.
fn collapse_pipe_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '|' {
            // Look ahead past horizontal whitespace for another pipe.
            let mut ahead = chars.clone();
            let mut skipped = 0usize;
            while matches!(ahead.peek(), Some(' ') | Some('\t')) {
                ahead.next();
                skipped += 1;
            }
            if skipped > 0 && ahead.peek() == Some(&'|') {
                // Drop this pipe and the whitespace; the surviving pipe
                // is handled on the next loop step, so `|  |  |` runs
                // collapse fully in one pass.
                for _ in 0..skipped {
                    chars.next();
                }
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults_include_the_minimum_set() {
        let policy = RiskyPolicy::default();
        assert!(policy.contains("collect"));
        assert!(policy.contains("OUTPUTLOOKUP"));
        assert!(!policy.contains("stats"));
    }

    #[test]
    fn detects_collect_with_exact_span() {
        let source = "search index=test\n| collect index=summary\n| search index=main";
        let report = RiskyDetector::default().detect(source);
        assert!(report.has_risky);
        assert_eq!(report.unique_names, vec!["collect"]);
        let span = &report.commands[0];
        assert_eq!(span.command, "collect");
        assert_eq!(
            &source[span.start_offset as usize..=span.end_offset as usize],
            "collect index=summary"
        );
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 2);
    }

    #[test]
    fn regex_path_matches_stage_path() {
        let detector = RiskyDetector::default();
        let corpus = [
            "search index=test\n| collect index=summary\n| search index=main",
            "index=web status=500\n| stats count by host\n| outputlookup errors.csv",
            "| makeresults count=5\n| eval x=1\n| mcollect index=metrics\n| sendemail to=ops@example.com",
            "index=a\n| stats count",
        ];
        for source in corpus {
            assert_eq!(
                detector.detect(source),
                detector.detect_with_regex(source),
                "paths disagree for {source:?}"
            );
        }
    }

    #[test]
    fn stage_path_sees_mid_line_stages() {
        let source = "search index=test | collect index=summary | search index=main";
        let report = RiskyDetector::default().detect(source);
        assert_eq!(report.unique_names, vec!["collect"]);
        let cleaned =
            RiskyDetector::default().remove(source, &report.commands);
        assert_eq!(cleaned, "search index=test | search index=main");
    }

    #[test]
    fn removal_collapses_pipes_and_blank_lines() {
        let source = "search index=test\n| collect index=summary\n| search index=main";
        let detector = RiskyDetector::default();
        let report = detector.detect(source);
        let cleaned = detector.remove(source, &report.commands);
        insta::assert_snapshot!(cleaned, @r"
        search index=test
        | search index=main
        ");
        assert!(!detector.detect(&cleaned).has_risky);
    }

    #[test]
    fn removal_is_idempotent() {
        let source = "index=a\n| outputlookup out.csv\n| stats count";
        let detector = RiskyDetector::default();
        let once = detector.remove(source, &detector.detect(source).commands);
        let twice = detector.remove(&once, &detector.detect(&once).commands);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_span_list_only_normalizes() {
        let detector = RiskyDetector::default();
        assert_eq!(detector.remove("index=a | stats count", &[]), "index=a | stats count");
        assert_eq!(detector.remove("", &[]), "");
    }

    #[test]
    fn multiple_risky_stages_removed_in_one_pass() {
        let source = "index=a\n| collect index=s1\n| stats count\n| outputcsv out.csv";
        let detector = RiskyDetector::default();
        let report = detector.detect(source);
        assert_eq!(report.commands.len(), 2);
        assert_eq!(report.unique_names, vec!["collect", "outputcsv"]);
        let cleaned = detector.remove(source, &report.commands);
        assert_eq!(cleaned, "index=a\n| stats count");
    }

    #[test]
    fn custom_policy_overrides_the_default() {
        let detector = RiskyDetector::new(RiskyPolicy::new(["eval"]));
        let report = detector.detect("index=a | eval x=1 | collect index=s");
        assert_eq!(report.unique_names, vec!["eval"]);
    }

    #[test]
    fn policy_names_with_metacharacters_stay_literal() {
        // Construction must not panic, and the dot must not act as a
        // regex wildcard in the fallback scan.
        let detector = RiskyDetector::new(RiskyPolicy::new(["a.b", "send(mail"]));
        assert!(!detector.detect_with_regex("index=x\n| axb y").has_risky);
        let report = detector.detect_with_regex("index=x\n| a.b y");
        assert_eq!(report.unique_names, vec!["a.b"]);
        assert_eq!(detector.detect("index=x | a.b y").unique_names, vec!["a.b"]);
    }

    #[test]
    fn line_numbers_count_newlines_before_the_offset() {
        let source = "index=a\n| stats count\n| collect index=s";
        assert_eq!(line_of(source, 0), 1);
        // The 'c' of "collect".
        assert_eq!(line_of(source, 24), 3);
        // Offsets past the end clamp to the last line.
        assert_eq!(line_of(source, 999), 3);

        let report = RiskyDetector::default().detect(source);
        assert_eq!(report.commands[0].start_line, 3);
        assert_eq!(report.commands[0].end_line, 3);
    }

    #[test]
    fn subsearch_stages_are_not_top_level() {
        // The collect inside the subsearch block must not be reported.
        let source = "index=a\n| join host [search index=b | collect index=s]\n| stats count";
        let report = RiskyDetector::default().detect(source);
        assert!(!report.has_risky);
    }

    #[test]
    fn trailing_risky_stage_without_newline() {
        let source = "index=a | stats count | outputlookup results.csv";
        let detector = RiskyDetector::default();
        let report = detector.detect(source);
        let span = &report.commands[0];
        assert_eq!(
            &source[span.start_offset as usize..=span.end_offset as usize],
            "outputlookup results.csv"
        );
        assert_eq!(detector.remove(source, &report.commands), "index=a | stats count");
    }
}
