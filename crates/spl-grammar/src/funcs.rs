//! Name tables for aggregation and eval functions.
//!
//! The interpreter needs two pieces of language knowledge that are not
//! part of any single command's pattern: which call heads are aggregation
//! functions (and what type their output has), and which identifiers in
//! an eval expression are function names rather than field references.

use spl_common::DataType;

/// Aggregation functions whose output is numeric.
const NUMERIC_AGGS: &[&str] = &[
    "count", "c", "dc", "distinct_count", "estdc", "estdc_error", "sum", "sumsq", "avg", "mean",
    "median", "stdev", "stdevp", "var", "varp", "range", "rate", "per_second", "per_minute",
    "per_hour", "per_day",
];

/// Aggregation functions whose output type follows the input field.
const OPAQUE_AGGS: &[&str] = &[
    "min", "max", "mode", "first", "last", "earliest", "latest", "earliest_time", "latest_time",
    "values", "list",
];

/// Whether a call head (or bare word) is a known aggregation function.
///
/// Percentile forms (`p95`, `perc99`, `exactperc50`, `upperperc90`) are
/// recognized by prefix.
pub fn is_agg_func(head: &str) -> bool {
    let head = head.to_ascii_lowercase();
    if NUMERIC_AGGS.contains(&head.as_str()) || OPAQUE_AGGS.contains(&head.as_str()) {
        return true;
    }
    is_percentile(&head)
}

/// The statically known output type of an aggregation.
pub fn agg_output_type(head: &str) -> DataType {
    let head = head.to_ascii_lowercase();
    if NUMERIC_AGGS.contains(&head.as_str()) || is_percentile(&head) {
        DataType::Number
    } else {
        DataType::Unknown
    }
}

fn is_percentile(head: &str) -> bool {
    for prefix in ["perc", "exactperc", "upperperc", "p"] {
        if let Some(rest) = head.strip_prefix(prefix) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Bare keywords of eval expressions. A called function (`round(x)`) is
/// recognized by its parenthesis; these are the words that appear bare
/// in an expression without naming a field.
const EXPR_KEYWORDS: &[&str] = &[
    "and", "or", "not", "xor", "like", "in", "true", "false", "null",
];

/// Whether a bare identifier is an expression keyword rather than a
/// field reference.
pub fn is_expr_keyword(name: &str) -> bool {
    EXPR_KEYWORDS.contains(&name.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agg_recognition() {
        assert!(is_agg_func("count"));
        assert!(is_agg_func("AVG"));
        assert!(is_agg_func("p95"));
        assert!(is_agg_func("perc99"));
        assert!(is_agg_func("values"));
        assert!(!is_agg_func("duration"));
        assert!(!is_agg_func("p"));
        assert!(!is_agg_func("p9x"));
    }

    #[test]
    fn agg_output_types() {
        assert_eq!(agg_output_type("count"), DataType::Number);
        assert_eq!(agg_output_type("p50"), DataType::Number);
        assert_eq!(agg_output_type("values"), DataType::Unknown);
        assert_eq!(agg_output_type("first"), DataType::Unknown);
    }

    #[test]
    fn expression_keywords_are_not_fields() {
        assert!(is_expr_keyword("AND"));
        assert!(is_expr_keyword("like"));
        assert!(!is_expr_keyword("clientip"));
        // Function names are only excluded when called; bare they are fields.
        assert!(!is_expr_keyword("time"));
    }
}
