//! Generating commands: stages that produce events or rows rather than
//! transforming an incoming stream. Most appear first in a pipeline,
//! after a leading `|`.

use spl_common::{DataType, FieldEffect};

use super::{any_args, search_expr};
use crate::build::{alt, eff, lit, many0, many1, named, named_opt, opt, param, seq};
use crate::pattern::ParamType;
use crate::syntax::CommandSyntax;

const CATEGORY: &str = "generating";

pub(crate) fn commands() -> Vec<CommandSyntax> {
    vec![
        CommandSyntax::new(
            "search",
            CATEGORY,
            "Filters events with keywords, field comparisons, and boolean operators.",
            search_expr(),
        )
        .related(&["where", "regex"])
        .tags(&["filter"]),
        CommandSyntax::new(
            "metasearch",
            CATEGORY,
            "Retrieves event metadata from indexes matching the search terms.",
            search_expr(),
        )
        .related(&["metadata", "search"]),
        CommandSyntax::new(
            "makeresults",
            CATEGORY,
            "Generates the specified number of empty synthetic results.",
            many0(alt(vec![
                named("count", ParamType::Int),
                named("annotate", ParamType::Bool),
                named("splunk_server", ParamType::Str),
                named("splunk_server_group", ParamType::Str),
            ])),
        )
        .related(&["gentimes"])
        .implicit_fields(&[("_time", DataType::Number)]),
        CommandSyntax::new(
            "inputlookup",
            CATEGORY,
            "Loads search results from a lookup table.",
            seq(vec![
                many0(alt(vec![
                    named("append", ParamType::Bool),
                    named("strict", ParamType::Bool),
                    named("start", ParamType::Int),
                    named("max", ParamType::Int),
                ])),
                param(ParamType::Str),
                opt(seq(vec![
                    lit("where"),
                    eff(ParamType::EvaledField, FieldEffect::Consumes),
                ])),
            ]),
        )
        .related(&["outputlookup", "lookup"])
        .tags(&["lookup"]),
        CommandSyntax::new(
            "inputcsv",
            CATEGORY,
            "Loads search results from the specified CSV file.",
            seq(vec![
                many0(alt(vec![
                    named("dispatch", ParamType::Bool),
                    named("append", ParamType::Bool),
                    named("start", ParamType::Int),
                    named("max", ParamType::Int),
                    named("events", ParamType::Bool),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["outputcsv"]),
        CommandSyntax::new(
            "gentimes",
            CATEGORY,
            "Generates time-range results between a start and end time.",
            seq(vec![
                named("start", ParamType::TimeModifier),
                named_opt("end", ParamType::TimeModifier),
                named_opt("increment", ParamType::TimeModifier),
            ]),
        )
        .related(&["makeresults"])
        .implicit_fields(&[
            ("starttime", DataType::Number),
            ("endtime", DataType::Number),
            ("starthuman", DataType::Str),
            ("endhuman", DataType::Str),
        ]),
        CommandSyntax::new(
            "loadjob",
            CATEGORY,
            "Loads events or results from a previously completed search job.",
            seq(vec![
                param(ParamType::Str),
                many0(alt(vec![
                    named("events", ParamType::Bool),
                    named("job_delegate", ParamType::Str),
                    named("artifact_offset", ParamType::Int),
                    named("ignore_running", ParamType::Bool),
                ])),
            ]),
        )
        .related(&["savedsearch"]),
        CommandSyntax::new(
            "dbinspect",
            CATEGORY,
            "Returns information about the buckets of the specified index.",
            many0(alt(vec![
                named("index", ParamType::Str),
                named("span", ParamType::TimeModifier),
                named("timeformat", ParamType::Str),
            ])),
        )
        .related(&["metadata"]),
        CommandSyntax::new(
            "datamodel",
            CATEGORY,
            "Examines or searches a data model or one of its datasets.",
            seq(vec![
                param(ParamType::Str),
                opt(param(ParamType::Str)),
                opt(param(ParamType::Str)),
            ]),
        )
        .related(&["pivot", "tstats"]),
        CommandSyntax::new(
            "eventcount",
            CATEGORY,
            "Returns the number of events in the specified indexes.",
            many0(alt(vec![
                named("index", ParamType::Str),
                named("summarize", ParamType::Bool),
                named("report_size", ParamType::Bool),
                named("list_vix", ParamType::Bool),
            ])),
        )
        .implicit_fields(&[("count", DataType::Number), ("server", DataType::Str)]),
        CommandSyntax::new(
            "metadata",
            CATEGORY,
            "Returns source, sourcetype, or host metadata from the indexes.",
            seq(vec![
                named("type", ParamType::Str),
                many0(alt(vec![
                    named("index", ParamType::Str),
                    named("splunk_server", ParamType::Str),
                ])),
            ]),
        )
        .related(&["dbinspect"])
        .implicit_fields(&[
            ("firstTime", DataType::Number),
            ("lastTime", DataType::Number),
            ("recentTime", DataType::Number),
            ("totalCount", DataType::Number),
        ]),
        CommandSyntax::new(
            "rest",
            CATEGORY,
            "Reads a Splunk REST API endpoint and returns its resources as results.",
            seq(vec![
                param(ParamType::Str),
                many0(alt(vec![
                    named("count", ParamType::Int),
                    named("splunk_server", ParamType::Str),
                    named("timeout", ParamType::Int),
                ])),
            ]),
        ),
        CommandSyntax::new(
            "savedsearch",
            CATEGORY,
            "Runs a saved search by name.",
            param(ParamType::Str),
        )
        .related(&["loadjob"]),
        CommandSyntax::new(
            "set",
            CATEGORY,
            "Performs a union, diff, or intersect on two subsearches.",
            seq(vec![
                alt(vec![lit("union"), lit("diff"), lit("intersect")]),
                many1(param(ParamType::Str)),
            ]),
        )
        .related(&["append", "multisearch"]),
        CommandSyntax::new(
            "from",
            CATEGORY,
            "Retrieves data from a named dataset: a lookup, data model, or saved search.",
            seq(vec![param(ParamType::Str), opt(param(ParamType::Str))]),
        )
        .related(&["datamodel", "inputlookup"]),
        CommandSyntax::new(
            "multisearch",
            CATEGORY,
            "Runs multiple streaming subsearches and interleaves their results.",
            many1(param(ParamType::Str)),
        )
        .related(&["append", "union"]),
        CommandSyntax::new(
            "union",
            CATEGORY,
            "Merges the results of two or more datasets into one.",
            seq(vec![
                many0(alt(vec![
                    named("maxtime", ParamType::Int),
                    named("maxout", ParamType::Int),
                    named("timeout", ParamType::Int),
                ])),
                many1(param(ParamType::Str)),
            ]),
        )
        .related(&["multisearch", "append"]),
        CommandSyntax::new(
            "pivot",
            CATEGORY,
            "Runs a pivot search against a data model dataset.",
            seq(vec![
                param(ParamType::Str),
                param(ParamType::Str),
                many0(param(ParamType::Str)),
            ]),
        )
        .related(&["datamodel", "tstats"]),
        CommandSyntax::new(
            "typeahead",
            CATEGORY,
            "Returns typeahead completions for a search prefix.",
            seq(vec![
                named("prefix", ParamType::Str),
                named("count", ParamType::Int),
                many0(alt(vec![
                    named("index", ParamType::Str),
                    named("max_time", ParamType::Int),
                ])),
            ]),
        ),
        CommandSyntax::new(
            "walklex",
            CATEGORY,
            "Lists terms or indexed fields from the lexicon of each index bucket.",
            many0(alt(vec![
                named("prefix", ParamType::Str),
                named("pattern", ParamType::Str),
                named("type", ParamType::Str),
                named("index", ParamType::Str),
            ])),
        )
        .implicit_fields(&[("term", DataType::Str)]),
        CommandSyntax::new(
            "history",
            CATEGORY,
            "Returns the search history of the current user.",
            many0(named("events", ParamType::Bool)),
        )
        .implicit_fields(&[
            ("search", DataType::Str),
            ("start_time", DataType::Number),
            ("end_time", DataType::Number),
            ("total_run_time", DataType::Number),
        ]),
        CommandSyntax::new(
            "audit",
            CATEGORY,
            "Returns audit-trail information from the audit index.",
            any_args(),
        ),
        CommandSyntax::new(
            "script",
            CATEGORY,
            "Runs an external scripted search command.",
            seq(vec![param(ParamType::Str), many0(param(ParamType::Str))]),
        ),
        CommandSyntax::new(
            "searchtxn",
            CATEGORY,
            "Retrieves events matching a configured transaction type.",
            seq(vec![param(ParamType::Str), many0(param(ParamType::Str))]),
        )
        .related(&["transaction"]),
    ]
}
