//! End-to-end pipeline analysis tests: each exercises a full
//! source -> stages -> events -> lineage run through the public API.

use spl_common::{Confidence, DataType, DiagnosticKind, Severity};
use spl_lineage::{Analyzer, MatchOutcome};

fn analyzer() -> Analyzer {
    Analyzer::default()
}

// ── Scenario: iplocation ───────────────────────────────────────────────

#[test]
fn iplocation_creates_geo_fields_from_the_ip() {
    let result = analyzer().analyze("index=main | iplocation clientip");
    let lineage = &result.lineage;

    for name in ["city", "country", "region", "lat", "lon"] {
        let node = lineage.field_lineage(name).unwrap_or_else(|| panic!("{name} missing"));
        assert!(node.depends_on.contains("clientip"), "{name} deps");
        assert_eq!(node.confidence, Confidence::Certain);
        assert_eq!(node.origin_stage, 1);
        assert_eq!(node.origin_command, "iplocation");
    }
    assert_eq!(lineage.field_lineage("lat").unwrap().data_type, DataType::Number);
    assert_eq!(lineage.field_lineage("lon").unwrap().data_type, DataType::Number);
    assert_eq!(lineage.field_lineage("city").unwrap().data_type, DataType::Str);
    // `clientip` comes from the raw events, so reading it surfaces as an
    // info-level dangling reference and nothing more severe.
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Info));
}

#[test]
fn prefixed_iplocations_stay_separate() {
    let result = analyzer().analyze(
        "index=main | iplocation prefix=src_ src_ip | iplocation prefix=dest_ dest_ip",
    );
    let lineage = &result.lineage;

    assert_eq!(lineage.fields().len(), 10);
    let src_city = lineage.field_lineage("src_city").unwrap();
    assert!(src_city.depends_on.contains("src_ip"));
    assert!(!src_city.depends_on.contains("dest_ip"));
    let dest_city = lineage.field_lineage("dest_city").unwrap();
    assert!(dest_city.depends_on.contains("dest_ip"));
    assert!(!dest_city.depends_on.contains("src_ip"));
}

#[test]
fn second_unprefixed_iplocation_overwrites() {
    let result = analyzer().analyze("index=main | iplocation ip1 | iplocation ip2");
    let city = result.lineage.field_lineage("city").unwrap();
    // The later write wins; the earlier lineage is not chained through.
    assert_eq!(city.depends_on.iter().collect::<Vec<_>>(), vec!["ip2"]);
    assert_eq!(city.origin_stage, 2);
}

#[test]
fn ten_prefixed_iplocations_make_fifty_fields() {
    let mut source = String::from("index=main");
    for n in 0..10 {
        source.push_str(&format!(" | iplocation prefix=ip{n}_ ip{n}"));
    }
    let result = analyzer().analyze(&source);
    assert_eq!(result.lineage.fields().len(), 50);
    let node = result.lineage.field_lineage("ip7_lat").unwrap();
    assert!(node.depends_on.contains("ip7"));
    assert_eq!(node.depends_on.len(), 1);
}

// ── Scenario: rename ───────────────────────────────────────────────────

#[test]
fn rename_moves_the_node_and_chains_dependencies() {
    let result = analyzer().analyze("index=main | iplocation clientip | rename city as client_city");
    let lineage = &result.lineage;

    assert!(lineage.field_lineage("city").is_none(), "city must not be live");
    let node = lineage.field_lineage("client_city").unwrap();
    assert_eq!(node.depends_on.iter().collect::<Vec<_>>(), vec!["city"]);

    let closure = lineage.transitive_dependencies("client_city");
    assert_eq!(closure, vec!["city", "clientip"]);
}

#[test]
fn wildcard_rename_propagates_the_segment() {
    let result = analyzer().analyze(
        "index=main | eval foo_a=1, foo_b=2 | rename foo_* as bar_*",
    );
    let lineage = &result.lineage;
    assert!(lineage.field_lineage("foo_a").is_none());
    assert!(lineage.field_lineage("foo_b").is_none());
    let bar_a = lineage.field_lineage("bar_a").unwrap();
    assert_eq!(bar_a.depends_on.iter().collect::<Vec<_>>(), vec!["foo_a"]);
    let bar_b = lineage.field_lineage("bar_b").unwrap();
    assert_eq!(bar_b.depends_on.iter().collect::<Vec<_>>(), vec!["foo_b"]);
}

#[test]
fn unresolved_wildcard_rename_records_the_literal() {
    let result = analyzer().analyze("index=main | rename foo_* as bar_*");
    let node = result.lineage.field_lineage("bar_*").unwrap();
    assert_eq!(node.confidence, Confidence::Inferred);
}

// ── Scenario: stats ────────────────────────────────────────────────────

#[test]
fn stats_count_by_country() {
    let result = analyzer().analyze("index=main | stats count by country");
    let lineage = &result.lineage;

    let count = lineage.field_lineage("count").unwrap();
    assert!(count.depends_on.is_empty());
    assert_eq!(count.data_type, DataType::Number);

    let summary = lineage.stage_summary(1).unwrap();
    assert_eq!(summary.group_keys, vec!["country"]);
    assert!(summary.consumed.contains(&"country".to_string()));
    assert_eq!(lineage.fields(), vec!["count"]);
}

#[test]
fn stats_alias_depends_on_the_aggregated_field() {
    let result = analyzer().analyze(
        "index=main | eval duration=stop-start | stats avg(duration) as avg_d by host",
    );
    let lineage = &result.lineage;
    let avg = lineage.field_lineage("avg_d").unwrap();
    assert!(avg.depends_on.contains("duration"));
    let closure = lineage.transitive_dependencies("avg_d");
    assert_eq!(closure, vec!["duration", "start", "stop"]);
}

// ── fields restriction ─────────────────────────────────────────────────

#[test]
fn fields_plus_restricts_the_live_set() {
    let result = analyzer().analyze(
        "index=main | eval a=1, b=2, c=3 | fields + a b",
    );
    assert_eq!(result.lineage.fields(), vec!["a", "b"]);
    let summary = result.lineage.stage_summary(2).unwrap();
    assert_eq!(summary.dropped, vec!["c"]);
}

#[test]
fn fields_minus_drops_the_listed_fields() {
    let result = analyzer().analyze(
        "index=main | eval a=1, b=2, c=3 | fields - a b",
    );
    assert_eq!(result.lineage.fields(), vec!["c"]);
}

#[test]
fn fields_wildcard_restriction() {
    let result = analyzer().analyze(
        "index=main | eval foo_a=1, foo_b=2, other=3 | fields + foo_*",
    );
    assert_eq!(result.lineage.fields(), vec!["foo_a", "foo_b"]);
}

// ── Invariants ─────────────────────────────────────────────────────────

#[test]
fn one_live_node_per_name() {
    let result = analyzer().analyze(
        "index=main | eval x=1 | eval x=2 | eval x=3",
    );
    let node = result.lineage.field_lineage("x").unwrap();
    assert_eq!(node.origin_stage, 3);
    assert_eq!(result.lineage.fields(), vec!["x"]);
}

#[test]
fn consumes_never_mutates_the_graph() {
    let result = analyzer().analyze("index=main | eval x=1 | where x>0");
    let node = result.lineage.field_lineage("x").unwrap();
    assert_eq!(node.origin_stage, 1);
    assert_eq!(result.lineage.fields(), vec!["x"]);
}

#[test]
fn dropped_fields_keep_history_for_dependency_walks() {
    let result = analyzer().analyze(
        "index=main | eval raw_ms=stop-start | eval seconds=raw_ms/1000 | fields - raw_ms",
    );
    let lineage = &result.lineage;
    assert!(lineage.field_lineage("raw_ms").is_none());
    let closure = lineage.transitive_dependencies("seconds");
    assert_eq!(closure, vec!["raw_ms", "start", "stop"]);
}

#[test]
fn stage_ordering_is_observable_in_summaries() {
    let result = analyzer().analyze("index=main | eval a=1 | eval b=a+1 | fields - a");
    let lineage = &result.lineage;
    assert_eq!(lineage.fields_at(0).unwrap(), &[] as &[String]);
    assert_eq!(lineage.fields_at(1).unwrap(), &["a".to_string()]);
    assert_eq!(
        lineage.fields_at(2).unwrap(),
        &["a".to_string(), "b".to_string()]
    );
    assert_eq!(lineage.fields_at(3).unwrap(), &["b".to_string()]);
}

// ── Boundary behaviors ─────────────────────────────────────────────────

#[test]
fn empty_source_is_empty_everything() {
    let result = analyzer().analyze("");
    assert!(result.lineage.fields().is_empty());
    assert!(result.lineage.stages().is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn bare_search_expression_is_one_silent_stage() {
    let result = analyzer().analyze("index=main sourcetype=access_combined error");
    assert_eq!(result.lineage.stages().len(), 1);
    assert!(result.lineage.fields().is_empty());
    assert!(result.diagnostics.is_empty());
    assert_eq!(
        result.lineage.stage_summary(0).unwrap().outcome,
        MatchOutcome::Matched
    );
}

#[test]
fn missing_field_list_is_a_mismatch_on_that_stage_only() {
    let result = analyzer().analyze("index=main | table | eval x=1");
    let mismatch: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::PatternMismatch)
        .collect();
    assert_eq!(mismatch.len(), 1);
    assert_eq!(mismatch[0].stage_index, Some(1));
    assert_eq!(mismatch[0].severity, Severity::Warning);
    // Later stages still analyzed.
    assert!(result.lineage.field_lineage("x").is_some());
}

#[test]
fn unknown_command_is_an_opaque_passthrough() {
    let result = analyzer().analyze("index=main | eval x=1 | frobnicate y | eval z=x");
    let unknown: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnknownCommand)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].severity, Severity::Info);
    // The passthrough stage neither created nor dropped anything.
    let summary = result.lineage.stage_summary(2).unwrap();
    assert_eq!(summary.outcome, MatchOutcome::Skipped);
    assert!(summary.created.is_empty());
    assert_eq!(summary.live_after, vec!["x".to_string()]);
    assert!(result.lineage.field_lineage("z").is_some());
}

#[test]
fn dangling_reference_is_reported_as_info() {
    let result = analyzer().analyze("index=main | stats count by country");
    let dangling: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::DanglingReference)
        .collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].severity, Severity::Info);
    assert!(dangling[0].message.contains("country"));
}

#[test]
fn alias_lookup_resolves_to_the_same_grammar() {
    let via_bin = analyzer().analyze("index=main | bin span=5m _time");
    let via_bucket = analyzer().analyze("index=main | bucket span=5m _time");
    assert_eq!(
        via_bin.lineage.fields(),
        via_bucket.lineage.fields()
    );
    assert!(via_bin.diagnostics.is_empty());
    assert!(via_bucket.diagnostics.is_empty());
}

// ── Export ─────────────────────────────────────────────────────────────

#[test]
fn json_export_is_deterministic() {
    let analyzer = analyzer();
    let a = analyzer
        .analyze("index=main | iplocation clientip | rename city as c")
        .lineage
        .to_json()
        .unwrap();
    let b = analyzer
        .analyze("index=main | iplocation clientip | rename city as c")
        .lineage
        .to_json()
        .unwrap();
    assert_eq!(a, b);
    assert!(a.contains("\"c\""));
    assert!(a.contains("\"stages\""));
}

// ── Diagnostics rendering ──────────────────────────────────────────────

#[test]
fn diagnostics_render_against_the_source() {
    use spl_lineage::diagnostics::{render_diagnostics, DiagnosticOptions};

    let source = "index=main | mystery x";
    let result = Analyzer::default().analyze(source);
    let rendered = render_diagnostics(&result.diagnostics, source, &DiagnosticOptions::colorless());
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("mystery"));
    assert!(rendered[0].contains("L0004"));
}
