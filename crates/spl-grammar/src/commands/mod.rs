//! The command grammar corpus, grouped by documentation category.
//!
//! Each module returns the entries for one category; [`all`] concatenates
//! them for registry construction. Shared clause shapes (aggregation
//! terms, `by` clauses, search expressions) live here so the stats family
//! and the search-like commands stay consistent.

mod generating;
mod output;
mod reporting;
mod streaming;
mod transforming;

use spl_common::FieldEffect;

use crate::build::{alt, eff, lit, many0, opt, opt_lit, param, seq};
use crate::pattern::{ParamType, SyntaxPattern};
use crate::syntax::CommandSyntax;

/// Every command entry, in category order.
pub fn all() -> Vec<CommandSyntax> {
    let mut entries = Vec::new();
    entries.extend(generating::commands());
    entries.extend(streaming::commands());
    entries.extend(transforming::commands());
    entries.extend(reporting::commands());
    entries.extend(output::commands());
    entries
}

/// One aggregation term: `count`, `avg(duration)`, optionally aliased
/// with `as name`, optionally comma-separated from the next term.
pub(crate) fn agg_term() -> SyntaxPattern {
    seq(vec![
        eff(ParamType::StatsFunc, FieldEffect::Creates),
        opt(seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)])),
        opt_lit(","),
    ])
}

/// A `by` grouping clause over a field list.
pub(crate) fn by_clause() -> SyntaxPattern {
    seq(vec![
        lit("by"),
        eff(ParamType::FieldList, FieldEffect::GroupsBy),
    ])
}

/// A comparison operator in a search expression.
pub(crate) fn cmp_op() -> SyntaxPattern {
    alt(vec![
        lit("="),
        lit("!="),
        lit("<"),
        lit("<="),
        lit(">"),
        lit(">="),
    ])
}

/// A loose search expression: `key=value` comparisons, boolean keywords,
/// parentheses, and bare terms, in any order. Search filters deliberately
/// carry no field effects; a bare search stage emits no lineage events.
pub(crate) fn search_expr() -> SyntaxPattern {
    many0(alt(vec![
        seq(vec![param(ParamType::Str), cmp_op(), param(ParamType::Str)]),
        lit("("),
        lit(")"),
        lit("and"),
        lit("or"),
        lit("not"),
        param(ParamType::Str),
    ]))
}

/// A lenient catch-all for commands that take no analyzable arguments.
pub(crate) fn any_args() -> SyntaxPattern {
    many0(param(ParamType::Str))
}
