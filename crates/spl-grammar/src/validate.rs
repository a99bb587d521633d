//! Structural validation of registry entries.
//!
//! Every pattern tree is proven sound before the interpreter ever walks
//! it: a broken entry is a registry construction error, never an analysis
//! error. Validation is purely local to each command; the only
//! cross-command artifact is the aggregate summary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::pattern::{Quantifier, SyntaxPattern};
use crate::registry::PatternRegistry;

/// Maximum pattern tree depth the interpreter will tolerate. Checked
/// statically here so analysis never hits it on a registry-authored tree.
pub const MAX_PATTERN_DEPTH: usize = 128;

/// The outcome of validating one command entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Aggregate counts over a whole registry validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationSummary {
    pub commands: usize,
    pub invalid: usize,
    pub with_warnings: usize,
}

/// Validate one command entry.
pub fn validate_command(name: &str, pattern: &SyntaxPattern) -> ValidationResult {
    let mut result = ValidationResult {
        valid: true,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    if name.trim().is_empty() {
        result.errors.push("command name is empty".to_string());
    }
    if pattern.depth() > MAX_PATTERN_DEPTH {
        result.errors.push(format!(
            "pattern depth {} exceeds the limit of {MAX_PATTERN_DEPTH}",
            pattern.depth()
        ));
    }

    walk(pattern, &mut result);
    result.valid = result.errors.is_empty();
    result
}

/// Validate every entry of a registry.
///
/// Returns a deterministic name-ordered map; running it twice over the
/// same registry produces identical results.
pub fn validate_registry(registry: &PatternRegistry) -> BTreeMap<String, ValidationResult> {
    registry
        .iter()
        .map(|(name, entry)| (name.to_string(), validate_command(name, &entry.pattern)))
        .collect()
}

/// Summarize a registry validation.
pub fn summarize(results: &BTreeMap<String, ValidationResult>) -> ValidationSummary {
    ValidationSummary {
        commands: results.len(),
        invalid: results.values().filter(|r| !r.valid).count(),
        with_warnings: results.values().filter(|r| !r.warnings.is_empty()).count(),
    }
}

fn walk(pattern: &SyntaxPattern, result: &mut ValidationResult) {
    match pattern {
        SyntaxPattern::Literal { value, quantifier } => {
            if value.is_empty() {
                result.errors.push("literal with empty value".to_string());
            }
            if matches!(quantifier, Quantifier::OneOrMore | Quantifier::ZeroOrMore) {
                result.warnings.push(format!(
                    "literal \"{value}\" with `{}` quantifier",
                    quantifier.suffix()
                ));
            }
        }
        SyntaxPattern::Param {
            param_type,
            name,
            effect,
            ..
        } => {
            if param_type.is_field_like() && effect.is_none() {
                let slot = name.as_deref().unwrap_or(param_type.name());
                result
                    .warnings
                    .push(format!("field-like parameter `{slot}` has no field effect"));
            }
            if let Some(name) = name {
                if name.is_empty() {
                    result.errors.push("named parameter with empty name".to_string());
                }
            }
        }
        SyntaxPattern::Sequence { patterns, .. } => {
            if patterns.is_empty() {
                result.errors.push("sequence with zero children".to_string());
            } else if patterns.len() == 1 {
                result
                    .warnings
                    .push("sequence with a single child (redundant wrapper)".to_string());
            }
            for p in patterns {
                walk(p, result);
            }
        }
        SyntaxPattern::Alternation { options } => {
            if options.len() < 2 {
                result
                    .warnings
                    .push(format!("alternation with {} option(s)", options.len()));
            }
            for p in options {
                walk(p, result);
            }
        }
        SyntaxPattern::Group {
            pattern,
            quantifier,
        } => {
            if *quantifier == Quantifier::One {
                result
                    .warnings
                    .push("group with no effective quantifier (redundant wrapper)".to_string());
            }
            walk(pattern, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{alt, eff, group, lit, many1, opt, param, seq};
    use crate::pattern::ParamType;
    use spl_common::FieldEffect;

    #[test]
    fn sound_pattern_passes_clean() {
        let p = seq(vec![
            lit("by"),
            eff(ParamType::FieldList, FieldEffect::GroupsBy),
            opt(param(ParamType::Int)),
        ]);
        let result = validate_command("stats", &p);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_literal_is_an_error() {
        let result = validate_command("x", &lit(""));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["literal with empty value"]);
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let result = validate_command("x", &seq(vec![]));
        assert!(!result.valid);
    }

    #[test]
    fn empty_name_is_an_error() {
        let result = validate_command("  ", &lit("x"));
        assert!(!result.valid);
    }

    #[test]
    fn single_child_sequence_warns() {
        let result = validate_command("x", &seq(vec![lit("only")]));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn one_option_alternation_warns() {
        let result = validate_command("x", &alt(vec![lit("a")]));
        assert!(result.valid);
        assert!(result.warnings[0].contains("1 option"));
    }

    #[test]
    fn unquantified_group_warns() {
        let result = validate_command("x", &group(lit("a"), Quantifier::One));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn repeated_literal_warns() {
        let result = validate_command("x", &many1(lit("a")));
        // The group is quantified (fine); the literal itself is One (fine).
        assert!(result.warnings.is_empty());
        let bad = SyntaxPattern::Literal {
            value: "a".to_string(),
            quantifier: Quantifier::ZeroOrMore,
        };
        let result = validate_command("x", &bad);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn effectless_field_param_warns() {
        let result = validate_command("x", &param(ParamType::FieldList));
        assert!(result.valid);
        assert!(result.warnings[0].contains("no field effect"));
    }

    #[test]
    fn whole_standard_registry_is_valid() {
        let registry = PatternRegistry::standard();
        let results = validate_registry(&registry);
        for (name, result) in &results {
            assert!(result.valid, "`{name}` is invalid: {:?}", result.errors);
        }
        let summary = summarize(&results);
        assert_eq!(summary.invalid, 0);
        assert_eq!(summary.commands, registry.len());
    }

    #[test]
    fn validation_is_idempotent() {
        let registry = PatternRegistry::standard();
        assert_eq!(validate_registry(&registry), validate_registry(&registry));
    }
}
