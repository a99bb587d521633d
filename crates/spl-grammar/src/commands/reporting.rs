//! Reporting commands: the stats family and its summary-index variants.

use spl_common::{DataType, FieldEffect};

use super::{agg_term, by_clause};
use crate::build::{alt, eff, lit, many0, many1, named, named_eff, opt, param, seq};
use crate::pattern::{ParamType, SyntaxPattern};
use crate::semantics::ArgShape;
use crate::syntax::CommandSyntax;

const CATEGORY: &str = "reporting";

/// The shared `stats` argument shape: options, aggregation terms, and an
/// optional grouping clause. A single option skips the alternation
/// wrapper.
fn stats_pattern(mut options: Vec<SyntaxPattern>) -> SyntaxPattern {
    let options = if options.len() == 1 {
        options.remove(0)
    } else {
        alt(options)
    };
    seq(vec![many0(options), many1(agg_term()), opt(by_clause())])
}

/// `top`/`rare` both take a count, display options, a field list, and an
/// optional grouping clause.
fn top_like(name: &str, description: &str) -> CommandSyntax {
    CommandSyntax::new(
        name,
        CATEGORY,
        description,
        seq(vec![
            opt(param(ParamType::Int)),
            many0(alt(vec![
                named("limit", ParamType::Int),
                named_eff("countfield", ParamType::Field, FieldEffect::Creates),
                named_eff("percentfield", ParamType::Field, FieldEffect::Creates),
                named("showcount", ParamType::Bool),
                named("showperc", ParamType::Bool),
                named("useother", ParamType::Bool),
                named("otherstr", ParamType::Str),
            ])),
            eff(ParamType::FieldList, FieldEffect::Consumes),
            opt(by_clause()),
        ]),
    )
    .related(&["stats", "chart"])
    .implicit_fields(&[("count", DataType::Number), ("percent", DataType::Number)])
}

pub(crate) fn commands() -> Vec<CommandSyntax> {
    vec![
        CommandSyntax::new(
            "stats",
            CATEGORY,
            "Computes aggregate statistics, optionally grouped by fields.",
            stats_pattern(vec![
                named("partitions", ParamType::Int),
                named("allnum", ParamType::Bool),
                named("delim", ParamType::Str),
            ]),
        )
        .related(&["eventstats", "streamstats", "chart", "timechart"])
        .tags(&["aggregation"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "eventstats",
            CATEGORY,
            "Computes aggregate statistics and adds them to every event.",
            stats_pattern(vec![named("allnum", ParamType::Bool)]),
        )
        .related(&["stats", "streamstats"])
        .tags(&["aggregation"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "streamstats",
            CATEGORY,
            "Computes running aggregate statistics over a sliding window of events.",
            stats_pattern(vec![
                named("current", ParamType::Bool),
                named("window", ParamType::Int),
                named("time_window", ParamType::TimeModifier),
                named("global", ParamType::Bool),
                named("reset_on_change", ParamType::Bool),
                named("allnum", ParamType::Bool),
            ]),
        )
        .related(&["stats", "eventstats", "accum"])
        .tags(&["aggregation"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "chart",
            CATEGORY,
            "Aggregates into a chartable table, split over and by fields.",
            seq(vec![
                many0(alt(vec![
                    named("sep", ParamType::Str),
                    named("format", ParamType::Str),
                    named("cont", ParamType::Bool),
                    named("limit", ParamType::Int),
                    named("useother", ParamType::Bool),
                    named("usenull", ParamType::Bool),
                ])),
                many1(agg_term()),
                opt(alt(vec![
                    seq(vec![
                        lit("over"),
                        eff(ParamType::Field, FieldEffect::GroupsBy),
                        opt(seq(vec![
                            lit("by"),
                            eff(ParamType::Field, FieldEffect::GroupsBy),
                        ])),
                    ]),
                    by_clause(),
                ])),
            ]),
        )
        .related(&["timechart", "stats", "xyseries"])
        .tags(&["aggregation", "visualization"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "timechart",
            CATEGORY,
            "Aggregates into time buckets, one series per split-by value.",
            seq(vec![
                many0(alt(vec![
                    named("span", ParamType::TimeModifier),
                    named("bins", ParamType::Int),
                    named("limit", ParamType::Int),
                    named("cont", ParamType::Bool),
                    named("partial", ParamType::Bool),
                    named("useother", ParamType::Bool),
                    named("usenull", ParamType::Bool),
                ])),
                many1(agg_term()),
                opt(seq(vec![lit("by"), eff(ParamType::Field, FieldEffect::GroupsBy)])),
            ]),
        )
        .related(&["chart", "timewrap", "bin"])
        .tags(&["aggregation", "visualization"])
        .implicit_fields(&[("_time", DataType::Number)])
        .shape(ArgShape::Aggregates),
        top_like("top", "Finds the most frequent values of the listed fields."),
        top_like("rare", "Finds the least frequent values of the listed fields."),
        CommandSyntax::new(
            "contingency",
            CATEGORY,
            "Builds a contingency table of co-occurring values of two fields.",
            seq(vec![
                many0(alt(vec![
                    named("maxrows", ParamType::Int),
                    named("maxcols", ParamType::Int),
                    named("usetotal", ParamType::Bool),
                    named("totalstr", ParamType::Str),
                ])),
                eff(ParamType::Field, FieldEffect::GroupsBy),
                eff(ParamType::Field, FieldEffect::GroupsBy),
            ]),
        )
        .related(&["associate", "cofilter"]),
        CommandSyntax::new(
            "correlate",
            CATEGORY,
            "Calculates the co-occurrence between all field pairs.",
            many0(named("type", ParamType::Str)),
        )
        .related(&["associate", "contingency"])
        .implicit_fields(&[("RowField", DataType::Str)]),
        CommandSyntax::new(
            "associate",
            CATEGORY,
            "Finds associative relationships between field value pairs.",
            seq(vec![
                many0(alt(vec![
                    named("supcnt", ParamType::Int),
                    named("supfreq", ParamType::Num),
                    named("improv", ParamType::Num),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["correlate", "contingency"])
        .implicit_fields(&[
            ("Reference_Key", DataType::Str),
            ("Reference_Value", DataType::Str),
            ("Target_Key", DataType::Str),
            ("Unconditional_Entropy", DataType::Number),
            ("Conditional_Entropy", DataType::Number),
            ("Entropy_Improvement", DataType::Number),
            ("Description", DataType::Str),
            ("Support", DataType::Number),
        ]),
        CommandSyntax::new(
            "analyzefields",
            CATEGORY,
            "Scores how well each numeric field predicts a classification field.",
            named_eff("classfield", ParamType::Field, FieldEffect::Consumes),
        )
        .related(&["fieldsummary"])
        .implicit_fields(&[
            ("field", DataType::Str),
            ("count", DataType::Number),
            ("cocur", DataType::Number),
            ("acc", DataType::Number),
            ("balacc", DataType::Number),
        ]),
        CommandSyntax::new(
            "arules",
            CATEGORY,
            "Finds association rules between field values.",
            seq(vec![
                many0(alt(vec![
                    named("sup", ParamType::Int),
                    named("conf", ParamType::Num),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["associate"])
        .implicit_fields(&[
            ("Given fields", DataType::Str),
            ("Implied fields", DataType::Str),
            ("Strength", DataType::Number),
        ]),
        CommandSyntax::new(
            "geostats",
            CATEGORY,
            "Aggregates statistics into geographic bins for map rendering.",
            seq(vec![
                many0(alt(vec![
                    named_eff("latfield", ParamType::Field, FieldEffect::Consumes),
                    named_eff("longfield", ParamType::Field, FieldEffect::Consumes),
                    named("globallimit", ParamType::Int),
                    named("locallimit", ParamType::Int),
                    named("binspanlat", ParamType::Num),
                    named("binspanlong", ParamType::Num),
                ])),
                many1(agg_term()),
                opt(by_clause()),
            ]),
        )
        .related(&["stats", "iplocation", "geom"])
        .tags(&["aggregation", "visualization"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "tstats",
            CATEGORY,
            "Aggregates over indexed or accelerated data, optionally grouped.",
            seq(vec![
                many0(alt(vec![
                    named("prestats", ParamType::Bool),
                    named("local", ParamType::Bool),
                    named("append", ParamType::Bool),
                    named("summariesonly", ParamType::Bool),
                    named("allow_old_summaries", ParamType::Bool),
                    named("chunk_size", ParamType::Int),
                ])),
                many1(agg_term()),
                opt(seq(vec![lit("from"), param(ParamType::Str)])),
                opt(seq(vec![
                    lit("where"),
                    eff(ParamType::EvaledField, FieldEffect::Consumes),
                ])),
                opt(by_clause()),
            ]),
        )
        .related(&["stats", "datamodel", "tscollect"])
        .tags(&["aggregation"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "mstats",
            CATEGORY,
            "Aggregates metric measures, optionally grouped by dimensions.",
            seq(vec![
                many0(alt(vec![
                    named("prestats", ParamType::Bool),
                    named("append", ParamType::Bool),
                    named("backfill", ParamType::Bool),
                    named("chunk_size", ParamType::Int),
                ])),
                many1(agg_term()),
                opt(seq(vec![
                    lit("where"),
                    eff(ParamType::EvaledField, FieldEffect::Consumes),
                ])),
                opt(by_clause()),
            ]),
        )
        .related(&["tstats", "mcatalog"])
        .tags(&["aggregation"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "mcatalog",
            CATEGORY,
            "Lists metric names and dimension values from metric indexes.",
            seq(vec![
                many1(agg_term()),
                opt(seq(vec![
                    lit("where"),
                    eff(ParamType::EvaledField, FieldEffect::Consumes),
                ])),
                opt(by_clause()),
            ]),
        )
        .related(&["mstats"])
        .shape(ArgShape::Aggregates),
        si_variant("sistats", "stats"),
        si_variant("sichart", "chart"),
        si_variant("sitimechart", "timechart"),
        si_variant("sitop", "top"),
        si_variant("sirare", "rare"),
    ]
}

/// Summary-index variants share the base command's argument shape; the
/// summary encoding itself adds nothing the analyzer can see.
fn si_variant(name: &str, base: &str) -> CommandSyntax {
    CommandSyntax::new(
        name,
        CATEGORY,
        &format!("Summary-index variant of `{base}`."),
        stats_pattern(vec![named("allnum", ParamType::Bool)]),
    )
    .related(&[base, "collect"])
    .tags(&["aggregation", "summary-index"])
    .shape(ArgShape::Aggregates)
}
