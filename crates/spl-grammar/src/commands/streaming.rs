//! Streaming commands: per-event transforms that create, rewrite, or
//! enrich fields as events flow through the pipeline.

use spl_common::{DataType, FieldEffect};

use super::any_args;
use crate::build::{
    alt, eff, lit, many0, many1, named, named_eff, named_opt, opt, opt_lit, param, seq,
};
use crate::pattern::ParamType;
use crate::semantics::{ArgShape, ImplicitFields};
use crate::syntax::CommandSyntax;

const CATEGORY: &str = "streaming";

/// `field = expression` assignment, optionally comma-separated from the next.
fn assignment(effect: FieldEffect) -> crate::pattern::SyntaxPattern {
    seq(vec![
        eff(ParamType::Field, effect),
        lit("="),
        eff(ParamType::EvaledField, FieldEffect::Consumes),
        opt_lit(","),
    ])
}

pub(crate) fn commands() -> Vec<CommandSyntax> {
    let mut cmds = vec![
        CommandSyntax::new(
            "eval",
            CATEGORY,
            "Calculates an expression and puts the value into a new or existing field.",
            many1(assignment(FieldEffect::Creates)),
        )
        .related(&["where", "fieldformat"])
        .tags(&["calculation"])
        .shape(ArgShape::EvalAssignments),
        CommandSyntax::new(
            "fieldformat",
            CATEGORY,
            "Applies a display format to a field without changing its stored value.",
            many1(assignment(FieldEffect::Modifies)),
        )
        .related(&["eval", "convert"])
        .shape(ArgShape::EvalAssignments),
        CommandSyntax::new(
            "where",
            CATEGORY,
            "Keeps only the events for which the eval expression is true.",
            eff(ParamType::EvaledField, FieldEffect::Consumes),
        )
        .related(&["search", "eval"])
        .tags(&["filter"]),
        CommandSyntax::new(
            "rex",
            CATEGORY,
            "Extracts fields from a source field with named capture groups, or sed-replaces text.",
            seq(vec![
                many0(alt(vec![
                    named_eff("field", ParamType::Field, FieldEffect::Consumes),
                    named("mode", ParamType::Str),
                    named("max_match", ParamType::Int),
                    named("offset_field", ParamType::Str),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["regex", "erex", "extract"])
        .tags(&["extraction"])
        .shape(ArgShape::RexCaptures),
        CommandSyntax::new(
            "regex",
            CATEGORY,
            "Keeps events whose field matches (or does not match) the regular expression.",
            seq(vec![
                opt(seq(vec![
                    eff(ParamType::Field, FieldEffect::Consumes),
                    alt(vec![lit("="), lit("!=")]),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["rex", "search"])
        .tags(&["filter"]),
        CommandSyntax::new(
            "rename",
            CATEGORY,
            "Renames one or more fields; wildcard pairs rename whole families.",
            many1(seq(vec![
                eff(ParamType::WcField, FieldEffect::Drops),
                lit("as"),
                eff(ParamType::WcField, FieldEffect::Creates),
                opt_lit(","),
            ])),
        )
        .related(&["fields", "eval"])
        .shape(ArgShape::RenamePairs),
        CommandSyntax::new(
            "replace",
            CATEGORY,
            "Replaces field values with new values.",
            seq(vec![
                many1(seq(vec![
                    param(ParamType::Str),
                    lit("with"),
                    param(ParamType::Str),
                    opt_lit(","),
                ])),
                opt(seq(vec![
                    lit("in"),
                    eff(ParamType::FieldList, FieldEffect::Modifies),
                ])),
            ]),
        )
        .related(&["eval", "fillnull"]),
        CommandSyntax::new(
            "fillnull",
            CATEGORY,
            "Replaces null values with a default value, in all or the listed fields.",
            seq(vec![
                named_opt("value", ParamType::Str),
                opt(eff(ParamType::FieldList, FieldEffect::Modifies)),
            ]),
        )
        .related(&["filldown"]),
        CommandSyntax::new(
            "filldown",
            CATEGORY,
            "Replaces null values with the last non-null value of the field.",
            opt(eff(ParamType::FieldList, FieldEffect::Modifies)),
        )
        .related(&["fillnull"]),
        CommandSyntax::new(
            "iplocation",
            CATEGORY,
            "Adds location fields derived from an IP address field.",
            seq(vec![
                many0(alt(vec![
                    named("prefix", ParamType::Str),
                    named("allfields", ParamType::Bool),
                    named("lang", ParamType::Str),
                ])),
                eff(ParamType::Field, FieldEffect::Consumes),
            ]),
        )
        .related(&["lookup", "geostats"])
        .tags(&["enrichment"])
        .implicit(
            ImplicitFields::new(&[
                ("city", DataType::Str),
                ("country", DataType::Str),
                ("region", DataType::Str),
                ("lat", DataType::Number),
                ("lon", DataType::Number),
            ])
            .with_prefix_param("prefix")
            .with_extension(
                "allfields",
                &[
                    ("continent", DataType::Str),
                    ("metrocode", DataType::Str),
                    ("timezone", DataType::Str),
                ],
            ),
        ),
        CommandSyntax::new(
            "lookup",
            CATEGORY,
            "Enriches events with fields from a lookup table matched on input fields.",
            seq(vec![
                many0(alt(vec![
                    named("local", ParamType::Bool),
                    named("update", ParamType::Bool),
                ])),
                param(ParamType::Str),
                many1(seq(vec![
                    eff(ParamType::Field, FieldEffect::Consumes),
                    opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Consumes)])),
                    opt_lit(","),
                ])),
                opt(seq(vec![
                    alt(vec![lit("output"), lit("outputnew")]),
                    many1(seq(vec![
                        eff(ParamType::Field, FieldEffect::Creates),
                        opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                        opt_lit(","),
                    ])),
                ])),
            ]),
        )
        .related(&["inputlookup", "iplocation"])
        .tags(&["enrichment"])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "spath",
            CATEGORY,
            "Extracts a value from structured (JSON or XML) event data into a field.",
            seq(vec![
                many0(alt(vec![
                    named_eff("input", ParamType::Field, FieldEffect::Consumes),
                    named_eff("output", ParamType::Field, FieldEffect::Creates),
                    named("path", ParamType::Str),
                ])),
                opt(param(ParamType::Str)),
            ]),
        )
        .related(&["xpath", "rex"])
        .tags(&["extraction"])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "xmlkv",
            CATEGORY,
            "Extracts key-value pairs from XML-formatted event data.",
            many0(named("maxinputs", ParamType::Int)),
        )
        .related(&["spath", "extract"]),
        CommandSyntax::new(
            "extract",
            CATEGORY,
            "Re-runs key-value field extraction on the raw event text.",
            many0(alt(vec![
                named("pairdelim", ParamType::Str),
                named("kvdelim", ParamType::Str),
                named("limit", ParamType::Int),
                named("maxchars", ParamType::Int),
                named("reload", ParamType::Bool),
            ])),
        )
        .related(&["rex", "multikv", "xmlkv"])
        .tags(&["extraction"]),
        CommandSyntax::new(
            "multikv",
            CATEGORY,
            "Extracts fields from tabular events such as command output.",
            many0(alt(vec![
                named("conf", ParamType::Str),
                named("fields", ParamType::Str),
                named("filter", ParamType::Str),
                lit("copyattrs"),
                lit("noheader"),
                lit("forceheader"),
            ])),
        )
        .related(&["extract"]),
        CommandSyntax::new(
            "convert",
            CATEGORY,
            "Converts field values with functions like ctime, mktime, and dur2sec.",
            seq(vec![
                named_opt("timeformat", ParamType::Str),
                many1(seq(vec![
                    eff(ParamType::StatsFunc, FieldEffect::Modifies),
                    opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                    opt_lit(","),
                ])),
            ]),
        )
        .related(&["eval", "fieldformat"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "strcat",
            CATEGORY,
            "Concatenates source field values and string literals into a destination field.",
            seq(vec![
                named_opt("allrequired", ParamType::Bool),
                many1(alt(vec![
                    eff(ParamType::Field, FieldEffect::Consumes),
                    param(ParamType::Str),
                ])),
            ]),
        )
        .related(&["eval"])
        .shape(ArgShape::TrailingTarget),
        CommandSyntax::new(
            "tags",
            CATEGORY,
            "Annotates events with the tags of their field values.",
            seq(vec![
                many0(alt(vec![
                    named_eff("outputfield", ParamType::Field, FieldEffect::Creates),
                    named("inclname", ParamType::Bool),
                    named("inclvalue", ParamType::Bool),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "typer",
            CATEGORY,
            "Calculates the eventtypes that each event matches.",
            any_args(),
        )
        .implicit_fields(&[("eventtype", DataType::Str)]),
        CommandSyntax::new(
            "addinfo",
            CATEGORY,
            "Adds search-wide metadata fields to each event.",
            any_args(),
        )
        .implicit_fields(&[
            ("info_min_time", DataType::Number),
            ("info_max_time", DataType::Number),
            ("info_search_time", DataType::Number),
            ("info_sid", DataType::Str),
        ]),
        CommandSyntax::new(
            "accum",
            CATEGORY,
            "Keeps a running total of a numeric field.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Modifies),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
            ]),
        )
        .related(&["autoregress", "delta", "streamstats"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "autoregress",
            CATEGORY,
            "Copies one or more previous values of a field into each event.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Consumes),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                named_opt("p", ParamType::Str),
            ]),
        )
        .related(&["accum", "delta"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "delta",
            CATEGORY,
            "Computes the difference between the current and a previous value of a field.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Consumes),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
                named_opt("p", ParamType::Int),
            ]),
        )
        .related(&["accum", "autoregress", "trendline"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "reltime",
            CATEGORY,
            "Adds a human-readable relative-time field.",
            any_args(),
        )
        .implicit_fields(&[("reltime", DataType::Str)]),
        CommandSyntax::new(
            "bin",
            CATEGORY,
            "Puts continuous numeric or time values into discrete buckets.",
            seq(vec![
                many0(alt(vec![
                    named("span", ParamType::TimeModifier),
                    named("minspan", ParamType::TimeModifier),
                    named("bins", ParamType::Int),
                    named("start", ParamType::Num),
                    named("end", ParamType::Num),
                    named("aligntime", ParamType::TimeModifier),
                ])),
                eff(ParamType::Field, FieldEffect::Modifies),
                opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
            ]),
        )
        .related(&["timechart", "makecontinuous"])
        .shape(ArgShape::Aggregates),
        CommandSyntax::new(
            "rangemap",
            CATEGORY,
            "Maps a numeric field into named ranges.",
            seq(vec![
                named_eff("field", ParamType::Field, FieldEffect::Consumes),
                many0(alt(vec![
                    named("default", ParamType::Str),
                    seq(vec![param(ParamType::Str), lit("="), param(ParamType::Str)]),
                ])),
            ]),
        )
        .implicit_fields(&[("range", DataType::Str)])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "makemv",
            CATEGORY,
            "Splits a single-value field into a multivalue field.",
            seq(vec![
                many0(alt(vec![
                    named("delim", ParamType::Str),
                    named("tokenizer", ParamType::Str),
                    named("allowempty", ParamType::Bool),
                    named("setsv", ParamType::Bool),
                ])),
                eff(ParamType::Field, FieldEffect::Modifies),
            ]),
        )
        .related(&["mvexpand", "mvcombine", "nomv"]),
        CommandSyntax::new(
            "mvexpand",
            CATEGORY,
            "Expands a multivalue field into one event per value.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Modifies),
                named_opt("limit", ParamType::Int),
            ]),
        )
        .related(&["makemv", "mvcombine"]),
        CommandSyntax::new(
            "mvcombine",
            CATEGORY,
            "Combines events that differ only in one field into a multivalue event.",
            seq(vec![
                named_opt("delim", ParamType::Str),
                eff(ParamType::Field, FieldEffect::Modifies),
            ]),
        )
        .related(&["mvexpand", "nomv"]),
        CommandSyntax::new(
            "nomv",
            CATEGORY,
            "Converts a multivalue field into a single-value field.",
            eff(ParamType::Field, FieldEffect::Modifies),
        )
        .related(&["makemv", "mvcombine"]),
        CommandSyntax::new(
            "setfields",
            CATEGORY,
            "Sets fields to literal values on every event.",
            many1(seq(vec![
                eff(ParamType::Field, FieldEffect::Creates),
                lit("="),
                param(ParamType::Str),
                opt_lit(","),
            ])),
        )
        .related(&["eval"]),
        CommandSyntax::new(
            "bucketdir",
            CATEGORY,
            "Replaces a path field with a rolled-up directory prefix.",
            seq(vec![
                named_eff("pathfield", ParamType::Field, FieldEffect::Consumes),
                many0(alt(vec![
                    named_eff("sizefield", ParamType::Field, FieldEffect::Consumes),
                    named_eff("countfield", ParamType::Field, FieldEffect::Creates),
                    named("maxcount", ParamType::Int),
                    named("sep", ParamType::Str),
                ])),
            ]),
        )
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "iconify",
            CATEGORY,
            "Displays a unique icon per distinct value of the listed fields.",
            eff(ParamType::FieldList, FieldEffect::Consumes),
        )
        .related(&["highlight"]),
        CommandSyntax::new(
            "highlight",
            CATEGORY,
            "Highlights the given terms in the event display.",
            many1(param(ParamType::Str)),
        )
        .related(&["iconify"]),
        CommandSyntax::new(
            "outputtext",
            CATEGORY,
            "Copies each event's text into the _raw field.",
            many0(named("usexml", ParamType::Bool)),
        )
        .implicit_fields(&[("_raw", DataType::Str)]),
        CommandSyntax::new(
            "tojson",
            CATEGORY,
            "Serializes each event into a JSON object in _raw.",
            many0(alt(vec![
                named("fill_null", ParamType::Bool),
                named("include_internal", ParamType::Bool),
                param(ParamType::Str),
            ])),
        )
        .implicit_fields(&[("_raw", DataType::Str)]),
        CommandSyntax::new(
            "erex",
            CATEGORY,
            "Learns a field extraction from example values.",
            seq(vec![
                opt(eff(ParamType::Field, FieldEffect::Creates)),
                named("examples", ParamType::Str),
                many0(alt(vec![
                    named("counterexamples", ParamType::Str),
                    named_eff("fromfield", ParamType::Field, FieldEffect::Consumes),
                    named("maxtrainers", ParamType::Int),
                ])),
            ]),
        )
        .related(&["rex", "extract"])
        .tags(&["extraction"])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "kvform",
            CATEGORY,
            "Extracts fields using a configured form template.",
            many0(alt(vec![
                named("form", ParamType::Str),
                named_eff("field", ParamType::Field, FieldEffect::Consumes),
            ])),
        )
        .related(&["extract"]),
        CommandSyntax::new(
            "xpath",
            CATEGORY,
            "Evaluates an XPath expression over XML event data into a field.",
            seq(vec![
                param(ParamType::Str),
                many0(alt(vec![
                    named_eff("field", ParamType::Field, FieldEffect::Consumes),
                    named_eff("outfield", ParamType::Field, FieldEffect::Creates),
                    named("default", ParamType::Str),
                ])),
            ]),
        )
        .related(&["spath"])
        .tags(&["extraction"])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "scrub",
            CATEGORY,
            "Anonymizes event data using configured dictionaries.",
            many0(alt(vec![
                named("public-terms", ParamType::Str),
                named("private-terms", ParamType::Str),
                named("name-terms", ParamType::Str),
                named("dictionary", ParamType::Str),
                named("timeformat", ParamType::Str),
                named("namespace", ParamType::Str),
            ])),
        ),
        CommandSyntax::new(
            "addtotals",
            CATEGORY,
            "Sums numeric fields into a per-event total, or per-field column totals.",
            seq(vec![
                many0(alt(vec![
                    named("row", ParamType::Bool),
                    named("col", ParamType::Bool),
                    named_eff("fieldname", ParamType::Field, FieldEffect::Creates),
                    named_eff("labelfield", ParamType::Field, FieldEffect::Creates),
                    named("label", ParamType::Str),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["addcoltotals", "stats"])
        .implicit_fields(&[("Total", DataType::Number)]),
        CommandSyntax::new(
            "addcoltotals",
            CATEGORY,
            "Appends a result row with the column sums of numeric fields.",
            seq(vec![
                many0(alt(vec![
                    named_eff("labelfield", ParamType::Field, FieldEffect::Creates),
                    named("label", ParamType::Str),
                ])),
                opt(eff(ParamType::FieldList, FieldEffect::Consumes)),
            ]),
        )
        .related(&["addtotals"]),
        CommandSyntax::new(
            "gauge",
            CATEGORY,
            "Transforms a numeric field into a gauge-chart range result.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Consumes),
                many0(param(ParamType::Num)),
            ]),
        ),
        CommandSyntax::new(
            "geom",
            CATEGORY,
            "Adds geographic feature boundaries for choropleth maps.",
            seq(vec![
                opt(param(ParamType::Str)),
                many0(alt(vec![
                    named_eff("featureIdField", ParamType::Field, FieldEffect::Consumes),
                    named("gen", ParamType::Num),
                    named("min_x", ParamType::Num),
                    named("min_y", ParamType::Num),
                    named("max_x", ParamType::Num),
                    named("max_y", ParamType::Num),
                ])),
            ]),
        )
        .related(&["geomfilter", "geostats"])
        .implicit_fields(&[("geom", DataType::Str)]),
        CommandSyntax::new(
            "geomfilter",
            CATEGORY,
            "Clips choropleth geometry to a bounding box.",
            many0(alt(vec![
                named("min_x", ParamType::Num),
                named("min_y", ParamType::Num),
                named("max_x", ParamType::Num),
                named("max_y", ParamType::Num),
            ])),
        )
        .related(&["geom"]),
        CommandSyntax::new(
            "cofilter",
            CATEGORY,
            "Counts how often pairs of values of two fields occur together.",
            seq(vec![
                eff(ParamType::Field, FieldEffect::Consumes),
                eff(ParamType::Field, FieldEffect::Consumes),
            ]),
        )
        .related(&["associate", "contingency"]),
        CommandSyntax::new(
            "concurrency",
            CATEGORY,
            "Counts events overlapping each event's duration span.",
            seq(vec![
                named_eff("duration", ParamType::Field, FieldEffect::Consumes),
                many0(alt(vec![
                    named_eff("start", ParamType::Field, FieldEffect::Consumes),
                    named_eff("output", ParamType::Field, FieldEffect::Creates),
                ])),
            ]),
        )
        .related(&["transaction"])
        .implicit_fields(&[("concurrency", DataType::Number)])
        .shape(ArgShape::LookupOutputs),
        CommandSyntax::new(
            "localize",
            CATEGORY,
            "Finds time regions around clusters of matching events.",
            many0(alt(vec![
                named("maxpause", ParamType::TimeModifier),
                named("timeafter", ParamType::TimeModifier),
                named("timebefore", ParamType::TimeModifier),
            ])),
        )
        .related(&["transaction"]),
        CommandSyntax::new(
            "localop",
            CATEGORY,
            "Forces the rest of the pipeline to run on the search head.",
            any_args(),
        ),
        CommandSyntax::new(
            "noop",
            CATEGORY,
            "Does nothing; a placeholder for debugging pipelines.",
            any_args(),
        ),
        CommandSyntax::new(
            "redistribute",
            CATEGORY,
            "Redistributes results across indexers for parallel reduce.",
            seq(vec![
                named_opt("num_of_reducers", ParamType::Int),
                opt(super::by_clause()),
            ]),
        ),
        CommandSyntax::new(
            "rtorder",
            CATEGORY,
            "Buffers real-time events to release them in time order.",
            many0(alt(vec![
                named("discard", ParamType::Bool),
                named("buffer_span", ParamType::TimeModifier),
                named("max_buffer_size", ParamType::Int),
            ])),
        ),
        CommandSyntax::new(
            "abstract",
            CATEGORY,
            "Produces an abridged summary of each event's text.",
            many0(alt(vec![
                named("maxterms", ParamType::Int),
                named("maxlines", ParamType::Int),
            ])),
        ),
    ];

    // `makecontinuous` sits between streaming and chart prep; it lives here
    // so `bin` and friends stay in one place.
    cmds.push(
        CommandSyntax::new(
            "makecontinuous",
            CATEGORY,
            "Makes a numeric field continuous by filling gaps in its range.",
            seq(vec![
                many0(alt(vec![
                    named("span", ParamType::TimeModifier),
                    named("bins", ParamType::Int),
                    named("start", ParamType::Num),
                    named("end", ParamType::Num),
                ])),
                opt(eff(ParamType::Field, FieldEffect::Modifies)),
            ]),
        )
        .related(&["bin", "timechart"]),
    );
    cmds
}
