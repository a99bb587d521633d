//! Output commands: stages whose effect leaves the current search
//! context and mutates persistent state. These are the names the
//! risky-command detector's default policy watches for.

use spl_common::DataType;

use super::any_args;
use crate::build::{alt, many0, named, opt, param, seq};
use crate::pattern::ParamType;
use crate::syntax::CommandSyntax;

const CATEGORY: &str = "output";

pub(crate) fn commands() -> Vec<CommandSyntax> {
    vec![
        CommandSyntax::new(
            "collect",
            CATEGORY,
            "Writes results into a summary index.",
            seq(vec![
                named("index", ParamType::Str),
                many0(alt(vec![
                    named("source", ParamType::Str),
                    named("sourcetype", ParamType::Str),
                    named("host", ParamType::Str),
                    named("marker", ParamType::Str),
                    named("testmode", ParamType::Bool),
                    named("addtime", ParamType::Bool),
                    named("file", ParamType::Str),
                    named("spool", ParamType::Bool),
                ])),
            ]),
        )
        .related(&["overlap", "sistats", "tscollect"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "outputlookup",
            CATEGORY,
            "Writes results to a lookup table.",
            seq(vec![
                many0(alt(vec![
                    named("append", ParamType::Bool),
                    named("create_empty", ParamType::Bool),
                    named("createinapp", ParamType::Bool),
                    named("key_field", ParamType::Str),
                    named("max", ParamType::Int),
                    named("output_format", ParamType::Str),
                ])),
                param(ParamType::Str),
            ]),
        )
        .related(&["inputlookup", "lookup", "outputcsv"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "outputcsv",
            CATEGORY,
            "Writes results to a CSV file on the search head.",
            seq(vec![
                many0(alt(vec![
                    named("append", ParamType::Bool),
                    named("create_empty", ParamType::Bool),
                    named("override_if_empty", ParamType::Bool),
                    named("singlefile", ParamType::Bool),
                    named("usexml", ParamType::Bool),
                ])),
                opt(param(ParamType::Str)),
            ]),
        )
        .related(&["inputcsv", "outputlookup"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "mcollect",
            CATEGORY,
            "Converts results into metric data points and writes them to a metric index.",
            seq(vec![
                named("index", ParamType::Str),
                many0(alt(vec![
                    named("file", ParamType::Str),
                    named("split", ParamType::Bool),
                    named("spool", ParamType::Bool),
                    named("prefix_field", ParamType::Str),
                    named("host", ParamType::Str),
                    named("source", ParamType::Str),
                    named("sourcetype", ParamType::Str),
                ])),
            ]),
        )
        .related(&["meventcollect", "mstats"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "meventcollect",
            CATEGORY,
            "Converts streaming events into metric data points in a metric index.",
            seq(vec![
                named("index", ParamType::Str),
                many0(alt(vec![
                    named("split", ParamType::Bool),
                    named("spool", ParamType::Bool),
                    named("prefix_field", ParamType::Str),
                ])),
            ]),
        )
        .related(&["mcollect"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "tscollect",
            CATEGORY,
            "Writes results into a tsidx namespace for accelerated queries.",
            many0(alt(vec![
                named("namespace", ParamType::Str),
                named("squashcase", ParamType::Bool),
                named("keepresults", ParamType::Bool),
            ])),
        )
        .related(&["tstats", "collect"])
        .tags(&["persistent-write"]),
        CommandSyntax::new(
            "sendemail",
            CATEGORY,
            "Emails the search results to the listed recipients.",
            many0(alt(vec![
                named("to", ParamType::Str),
                named("cc", ParamType::Str),
                named("bcc", ParamType::Str),
                named("from", ParamType::Str),
                named("subject", ParamType::Str),
                named("message", ParamType::Str),
                named("server", ParamType::Str),
                named("format", ParamType::Str),
                named("sendresults", ParamType::Bool),
                named("inline", ParamType::Bool),
                named("sendcsv", ParamType::Bool),
                named("sendpdf", ParamType::Bool),
            ])),
        )
        .tags(&["external-write"]),
        CommandSyntax::new(
            "sendalert",
            CATEGORY,
            "Triggers a custom alert action with the current results.",
            seq(vec![
                param(ParamType::Str),
                many0(alt(vec![
                    named("results_link", ParamType::Str),
                    named("results_file", ParamType::Str),
                ])),
            ]),
        )
        .tags(&["external-write"]),
        CommandSyntax::new(
            "delete",
            CATEGORY,
            "Marks matching events as deleted so searches never return them.",
            any_args(),
        )
        .tags(&["persistent-write"])
        .implicit_fields(&[("deleted", DataType::Number), ("errors", DataType::Number)]),
    ]
}
