//! Per-command effect tables: for a syntactically correct invocation of
//! each command, the interpreter must emit exactly the documented field
//! effects.

use spl_common::FieldEffect;
use spl_grammar::PatternRegistry;
use spl_lexer::split_stages;
use spl_lineage::{interpret_stage, MatchOutcome, StageEffects};

fn interpret(source: &str) -> StageEffects {
    let registry = PatternRegistry::standard();
    let stages = split_stages(source);
    let stage = stages.last().expect("at least one stage");
    let syntax = registry
        .get(&stage.command)
        .unwrap_or_else(|| panic!("`{}` not registered", stage.command));
    interpret_stage(syntax, stage, stages.len() - 1, source)
}

fn names(fx: &StageEffects, effect: FieldEffect) -> Vec<&str> {
    let mut out: Vec<&str> = fx
        .events
        .iter()
        .filter(|e| e.effect == effect)
        .map(|e| e.field.as_str())
        .collect();
    out.sort_unstable();
    out
}

/// One row: invocation plus the expected field sets per effect.
struct Expect {
    source: &'static str,
    creates: &'static [&'static str],
    consumes: &'static [&'static str],
    modifies: &'static [&'static str],
    drops: &'static [&'static str],
    groups: &'static [&'static str],
}

const TABLE: &[Expect] = &[
    Expect {
        source: "index=a | transaction clientip host maxspan=30s",
        creates: &["duration", "eventcount"],
        consumes: &["clientip", "host"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | top 5 limit=10 user host by source",
        creates: &["count", "percent"],
        consumes: &["host", "user"],
        modifies: &[],
        drops: &[],
        groups: &["source"],
    },
    Expect {
        source: "index=a | addinfo",
        creates: &[
            "info_max_time",
            "info_min_time",
            "info_search_time",
            "info_sid",
        ],
        consumes: &[],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | eventstats allnum=true avg(x) as ax",
        creates: &["ax"],
        consumes: &["x"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | fillnull value=0 bytes packets",
        creates: &[],
        consumes: &[],
        modifies: &["bytes", "packets"],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | makemv delim=\",\" labels",
        creates: &[],
        consumes: &[],
        modifies: &["labels"],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | spath input=payload output=user path=user.name",
        creates: &["user"],
        consumes: &["payload"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | untable _time series value",
        creates: &["series", "value"],
        consumes: &["_time"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | xyseries status host count",
        creates: &[],
        consumes: &["count", "host"],
        modifies: &[],
        drops: &[],
        groups: &["status"],
    },
    Expect {
        source: "index=a | accum total as running",
        creates: &["running"],
        consumes: &["total"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | outputlookup append=true blocked_ips.csv",
        creates: &[],
        consumes: &[],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | dedup 2 host source sortby -_time",
        creates: &[],
        consumes: &["_time", "host", "source"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | where like(status, \"5%\")",
        creates: &[],
        consumes: &["status"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | mvexpand tags limit=5",
        creates: &[],
        consumes: &[],
        modifies: &["tags"],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | delta bytes as diff p=2",
        creates: &["diff"],
        consumes: &["bytes"],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | rename src_ip as source_ip, dest_ip as destination_ip",
        creates: &["destination_ip", "source_ip"],
        consumes: &[],
        modifies: &[],
        drops: &["dest_ip", "src_ip"],
        groups: &[],
    },
    Expect {
        source: "index=a | cluster t=0.5 showcount=true countfield=cluster_size",
        creates: &["cluster_count", "cluster_label", "cluster_size"],
        consumes: &[],
        modifies: &[],
        drops: &[],
        groups: &[],
    },
    Expect {
        source: "index=a | contingency maxrows=10 host status",
        creates: &[],
        consumes: &[],
        modifies: &[],
        drops: &[],
        groups: &["host", "status"],
    },
];

#[test]
fn documented_effect_sets_hold() {
    for expect in TABLE {
        let fx = interpret(expect.source);
        assert_eq!(
            fx.outcome,
            MatchOutcome::Matched,
            "{} did not fully match",
            expect.source
        );
        assert_eq!(names(&fx, FieldEffect::Creates), expect.creates, "{}", expect.source);
        assert_eq!(names(&fx, FieldEffect::Consumes), expect.consumes, "{}", expect.source);
        assert_eq!(names(&fx, FieldEffect::Modifies), expect.modifies, "{}", expect.source);
        assert_eq!(names(&fx, FieldEffect::Drops), expect.drops, "{}", expect.source);
        assert_eq!(names(&fx, FieldEffect::GroupsBy), expect.groups, "{}", expect.source);
    }
}

#[test]
fn groups_by_also_counts_as_a_read_in_summaries() {
    // `groups-by` is consumes plus group-key recording; the engine side
    // of that contract is covered in analyze_tests, the event side here:
    // a groups-by event never appears as a plain consumes event too.
    let fx = interpret("index=a | stats count by host");
    assert_eq!(names(&fx, FieldEffect::GroupsBy), vec!["host"]);
    assert!(names(&fx, FieldEffect::Consumes).is_empty());
}
