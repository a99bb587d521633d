//! Transforming commands: stages that reorder, restrict, reshape, or
//! statistically annotate the result set as a whole.

use spl_common::{DataType, FieldEffect};

use super::any_args;
use crate::build::{
    alt, eff, lit, many0, many1, named, named_eff, named_opt, opt, opt_lit, param, seq,
};
use crate::pattern::ParamType;
use crate::semantics::ArgShape;
use crate::syntax::CommandSyntax;

const CATEGORY: &str = "transforming";

pub(crate) fn commands() -> Vec<CommandSyntax> {
    vec![
        CommandSyntax::new(
            "fields",
            CATEGORY,
            "Keeps (+) or removes (-) the listed fields from results.",
            seq(vec![
                opt(alt(vec![lit("+"), lit("-")])),
                eff(ParamType::FieldList, FieldEffect::Consumes),
            ]),
        )
        .related(&["table", "rename"])
        .shape(ArgShape::RestrictFields),
        CommandSyntax::new(
            "table",
            CATEGORY,
            "Restricts results to a table of the listed fields, in order.",
            eff(ParamType::FieldList, FieldEffect::Consumes),
        )
        .related(&["fields"])
        .shape(ArgShape::RestrictFields),
        CommandSyntax::new(
            "sort",
            CATEGORY,
            "Sorts results by the listed fields, each optionally signed for direction.",
            seq(vec![
                opt(param(ParamType::Int)),
                many1(seq(vec![
                    opt(alt(vec![lit("+"), lit("-")])),
                    eff(ParamType::WcField, FieldEffect::Consumes),
                    opt_lit(","),
                ])),
                opt_lit("desc"),
            ]),
        )
        .related(&["reverse", "dedup"]),
        CommandSyntax::new(
            "dedup",
            CATEGORY,
            "Removes events with duplicate combinations of the listed field values.",
            seq(vec![
                opt(param(ParamType::Int)),
                many1(seq(vec![
                    eff(ParamType::Field, FieldEffect::Consumes),
                    opt_lit(","),
                ])),
                many0(alt(vec![
                    named("keepevents", ParamType::Bool),
                    named("keepempty", ParamType::Bool),
                    named("consecutive", ParamType::Bool),
                ])),
                opt(seq(vec![
                    lit("sortby"),
                    many1(seq(vec![
                        opt(alt(vec![lit("+"), lit("-")])),
                        eff(ParamType::Field, FieldEffect::Consumes),
                    ])),
                ])),
            ]),
        )
        .related(&["uniq", "sort"]),
        CommandSyntax::new(
            "head",
            CATEGORY,
            "Keeps the first N results, or results until a condition fails.",
            seq(vec![
                opt(alt(vec![
                    param(ParamType::Int),
                    eff(ParamType::EvaledField, FieldEffect::Consumes),
                ])),
                many0(alt(vec![
                    named("limit", ParamType::Int),
                    named("null", ParamType::Bool),
                    named("keeplast", ParamType::Bool),
                ])),
            ]),
        )
        .related(&["tail"]),
        CommandSyntax::new(
            "tail",
            CATEGORY,
            "Keeps the last N results.",
            opt(param(ParamType::Int)),
        )
        .related(&["head", "reverse"]),
        CommandSyntax::new("reverse", CATEGORY, "Reverses result order.", any_args())
            .related(&["sort", "tail"]),
        CommandSyntax::new(
            "uniq",
            CATEGORY,
            "Removes consecutive duplicate results.",
            any_args(),
        )
        .related(&["dedup"]),
        CommandSyntax::new(
            "transaction",
            CATEGORY,
            "Groups events into transactions keyed by the listed fields.",
            seq(vec![
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
                many0(alt(vec![
                    named("startswith", ParamType::Str),
                    named("endswith", ParamType::Str),
                    named("maxspan", ParamType::TimeModifier),
                    named("maxpause", ParamType::TimeModifier),
                    named("maxevents", ParamType::Int),
                    named("keepevicted", ParamType::Bool),
                    named("mvlist", ParamType::Bool),
                ])),
            ]),
        )
        .related(&["concurrency", "searchtxn", "stats"])
        .implicit_fields(&[
            ("duration", DataType::Number),
            ("eventcount", DataType::Number),
        ]),
        CommandSyntax::new(
            "transpose",
            CATEGORY,
            "Turns rows into columns, one output column per input row.",
            seq(vec![
                opt(param(ParamType::Int)),
                many0(alt(vec![
                    named_eff("column_name", ParamType::Field, FieldEffect::Creates),
                    named_eff("header_field", ParamType::Field, FieldEffect::Consumes),
                    named("include_empty", ParamType::Bool),
                ])),
            ]),
        )
        .related(&["untable", "xyseries"])
        .implicit_fields(&[("column", DataType::Str)]),
        CommandSyntax::new(
            "untable",
            CATEGORY,
            "Converts a tabular result set back into label/value rows.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Consumes),
                eff(ParamType::Field, FieldEffect::Creates),
                eff(ParamType::Field, FieldEffect::Creates),
            ]),
        )
        .related(&["xyseries", "transpose"]),
        CommandSyntax::new(
            "xyseries",
            CATEGORY,
            "Pivots label/value rows into a tabular series.",
            seq(vec![
                named_opt("grouped", ParamType::Bool),
                eff(ParamType::Field, FieldEffect::GroupsBy),
                eff(ParamType::Field, FieldEffect::Consumes),
                eff(ParamType::Field, FieldEffect::Consumes),
            ]),
        )
        .related(&["untable", "chart"]),
        CommandSyntax::new(
            "timewrap",
            CATEGORY,
            "Overlays timechart series from consecutive periods.",
            seq(vec![
                param(ParamType::TimeModifier),
                many0(alt(vec![
                    named("series", ParamType::Str),
                    named("align", ParamType::Str),
                ])),
            ]),
        )
        .related(&["timechart"]),
        CommandSyntax::new(
            "join",
            CATEGORY,
            "Joins results with a subsearch on the listed fields.",
            seq(vec![
                many0(alt(vec![
                    named("type", ParamType::Str),
                    named("overwrite", ParamType::Bool),
                    named("max", ParamType::Int),
                    named("usetime", ParamType::Bool),
                    named("earlier", ParamType::Bool),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
                param(ParamType::Str),
            ]),
        )
        .related(&["append", "lookup", "selfjoin"]),
        CommandSyntax::new(
            "append",
            CATEGORY,
            "Appends subsearch results after the current results.",
            seq(vec![
                many0(alt(vec![
                    named("extendtimerange", ParamType::Bool),
                    named("maxtime", ParamType::Int),
                    named("maxout", ParamType::Int),
                    named("timeout", ParamType::Int),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["appendcols", "join", "union"]),
        CommandSyntax::new(
            "appendcols",
            CATEGORY,
            "Appends subsearch result columns beside the current results.",
            seq(vec![
                many0(alt(vec![
                    named("override", ParamType::Bool),
                    named("maxtime", ParamType::Int),
                    named("maxout", ParamType::Int),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["append", "join"]),
        CommandSyntax::new(
            "appendpipe",
            CATEGORY,
            "Appends the output of a subpipeline applied to the current results.",
            seq(vec![
                named_opt("run_in_preview", ParamType::Bool),
                param(ParamType::Str),
            ]),
        )
        .related(&["append"]),
        CommandSyntax::new(
            "selfjoin",
            CATEGORY,
            "Joins results with themselves on the listed fields.",
            seq(vec![
                many0(alt(vec![
                    named("overwrite", ParamType::Bool),
                    named("max", ParamType::Int),
                    named("keepsingle", ParamType::Bool),
                ])),
                eff(ParamType::FieldList, FieldEffect::Consumes),
            ]),
        )
        .related(&["join"]),
        CommandSyntax::new(
            "map",
            CATEGORY,
            "Runs a templated search once per input result.",
            seq(vec![
                param(ParamType::Str),
                named_opt("maxsearches", ParamType::Int),
            ]),
        )
        .related(&["foreach"]),
        CommandSyntax::new(
            "foreach",
            CATEGORY,
            "Runs a templated subpipeline for each matching field.",
            seq(vec![
                many1(eff(ParamType::WcField, FieldEffect::Consumes)),
                param(ParamType::Str),
            ]),
        )
        .related(&["map", "eval"]),
        CommandSyntax::new(
            "anomalydetection",
            CATEGORY,
            "Finds anomalous events by probability of their field values.",
            seq(vec![
                many0(alt(vec![
                    named("method", ParamType::Str),
                    named("action", ParamType::Str),
                    named("pthresh", ParamType::Num),
                    named("cutoff", ParamType::Bool),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["anomalies", "anomalousvalue", "outlier"])
        .implicit_fields(&[
            ("log_event_prob", DataType::Number),
            ("probable_cause", DataType::Str),
            ("probable_cause_freq", DataType::Number),
        ]),
        CommandSyntax::new(
            "anomalousvalue",
            CATEGORY,
            "Flags or filters fields with statistically unusual values.",
            seq(vec![
                many0(alt(vec![
                    named("action", ParamType::Str),
                    named("pthresh", ParamType::Num),
                    named("minsupcount", ParamType::Int),
                    named("maxanofreq", ParamType::Num),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["anomalydetection", "outlier"]),
        CommandSyntax::new(
            "anomalies",
            CATEGORY,
            "Scores the unexpectedness of each event against a sliding window.",
            many0(alt(vec![
                named("threshold", ParamType::Num),
                named("labelonly", ParamType::Bool),
                named("normalize", ParamType::Bool),
                named("maxvalues", ParamType::Int),
                named_eff("field", ParamType::Field, FieldEffect::Consumes),
                named("denylist", ParamType::Str),
            ])),
        )
        .related(&["anomalydetection", "cluster"])
        .implicit_fields(&[("unexpectedness", DataType::Number)]),
        CommandSyntax::new(
            "cluster",
            CATEGORY,
            "Clusters similar events together.",
            many0(alt(vec![
                named("t", ParamType::Num),
                named("delims", ParamType::Str),
                named("showcount", ParamType::Bool),
                named_eff("countfield", ParamType::Field, FieldEffect::Creates),
                named_eff("labelfield", ParamType::Field, FieldEffect::Creates),
                named_eff("field", ParamType::Field, FieldEffect::Consumes),
                named("labelonly", ParamType::Bool),
                named("match", ParamType::Str),
            ])),
        )
        .related(&["kmeans", "anomalies", "dedup"])
        .implicit_fields(&[
            ("cluster_count", DataType::Number),
            ("cluster_label", DataType::Number),
        ]),
        CommandSyntax::new(
            "kmeans",
            CATEGORY,
            "Partitions numeric events into k clusters.",
            seq(vec![
                many0(alt(vec![
                    named("k", ParamType::Int),
                    named("maxiters", ParamType::Int),
                    named("reps", ParamType::Int),
                    named_eff("cfield", ParamType::Field, FieldEffect::Creates),
                    named("distype", ParamType::Str),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["cluster"])
        .implicit_fields(&[("CLUSTERNUM", DataType::Number)]),
        CommandSyntax::new(
            "outlier",
            CATEGORY,
            "Removes or truncates outlying numeric values.",
            seq(vec![
                many0(alt(vec![
                    named("action", ParamType::Str),
                    named("param", ParamType::Num),
                    named("uselower", ParamType::Bool),
                    named("mark", ParamType::Bool),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Modifies)),
            ]),
        )
        .related(&["anomalousvalue"]),
        CommandSyntax::new(
            "predict",
            CATEGORY,
            "Forecasts future values of one or more numeric fields.",
            seq(vec![
                many1(seq(vec![
                    eff(ParamType::Field, FieldEffect::Consumes),
                    opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                    opt_lit(","),
                ])),
                many0(alt(vec![
                    named("algorithm", ParamType::Str),
                    named("future_timespan", ParamType::Int),
                    named("holdback", ParamType::Int),
                    named("period", ParamType::Int),
                    named("upper95", ParamType::Str),
                    named("lower95", ParamType::Str),
                ])),
            ]),
        )
        .related(&["trendline", "x11"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "trendline",
            CATEGORY,
            "Computes moving averages of a field, e.g. sma5(count).",
            many1(seq(vec![
                eff(ParamType::StatsFunc, FieldEffect::Creates),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                opt_lit(","),
            ])),
        )
        .related(&["predict", "streamstats"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "x11",
            CATEGORY,
            "Removes seasonal components from a time series, e.g. mult(count).",
            seq(vec![
                eff(ParamType::StatsFunc, FieldEffect::Creates),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
            ]),
        )
        .related(&["trendline", "predict"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "diff",
            CATEGORY,
            "Produces a diff between two results.",
            many0(alt(vec![
                named("position1", ParamType::Int),
                named("position2", ParamType::Int),
                named_eff("attribute", ParamType::Field, FieldEffect::Consumes),
                named("diffheader", ParamType::Bool),
                named("context", ParamType::Bool),
                named("maxlen", ParamType::Int),
            ])),
        ),
        CommandSyntax::new(
            "overlap",
            CATEGORY,
            "Finds overlapping or missing scheduled-search coverage in summary data.",
            any_args(),
        )
        .related(&["collect"]),
        CommandSyntax::new(
            "fieldsummary",
            CATEGORY,
            "Summarizes each field's values, cardinality, and numeric statistics.",
            seq(vec![
                many0(named("maxvals", ParamType::Int)),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["stats", "analyzefields"])
        .implicit_fields(&[
            ("field", DataType::Str),
            ("count", DataType::Number),
            ("distinct_count", DataType::Number),
            ("is_exact", DataType::Bool),
            ("max", DataType::Number),
            ("mean", DataType::Number),
            ("min", DataType::Number),
            ("numeric_count", DataType::Number),
            ("stdev", DataType::Number),
            ("values", DataType::Str),
        ]),
        CommandSyntax::new(
            "findtypes",
            CATEGORY,
            "Suggests candidate eventtypes for the current results.",
            seq(vec![
                many0(named("max", ParamType::Int)),
                opt_lit("notcovered"),
                opt_lit("useraw"),
            ]),
        )
        .related(&["typer", "typelearner"]),
        CommandSyntax::new(
            "folderize",
            CATEGORY,
            "Groups a path-like field into folder-level summary rows.",
            seq(vec![
                named_eff("attr", ParamType::Field, FieldEffect::Consumes),
                many0(alt(vec![
                    named("sep", ParamType::Str),
                    named_eff("size", ParamType::Field, FieldEffect::Consumes),
                    named("minfolders", ParamType::Int),
                    named("maxfolders", ParamType::Int),
                ])),
            ]),
        )
        .related(&["bucketdir"]),
        CommandSyntax::new(
            "typelearner",
            CATEGORY,
            "Learns candidate eventtypes from example events.",
            many0(alt(vec![
                named_eff("grouping-field", ParamType::Field, FieldEffect::Consumes),
                named("grouping-maxlen", ParamType::Int),
            ])),
        )
        .related(&["findtypes", "typer"]),
        CommandSyntax::new(
            "format",
            CATEGORY,
            "Formats subsearch results into a single search-string field.",
            seq(vec![
                many0(alt(vec![
                    named("mvsep", ParamType::Str),
                    named("maxresults", ParamType::Int),
                    named("emptystr", ParamType::Str),
                ])),
                many0(param(ParamType::Str)),
            ]),
        )
        .implicit_fields(&[("search", DataType::Str)]),
    ]
}
