//! Registry-wide coverage checks: the command corpus must exercise the
//! whole pattern vocabulary, carry no duplicate names, and validate clean.

use std::collections::BTreeSet;

use spl_common::FieldEffect;
use spl_grammar::pattern::{ParamType, SyntaxPattern};
use spl_grammar::{validate_registry, PatternRegistry};

fn walk(pattern: &SyntaxPattern, visit: &mut impl FnMut(&SyntaxPattern)) {
    visit(pattern);
    match pattern {
        SyntaxPattern::Sequence { patterns, .. } => {
            for p in patterns {
                walk(p, visit);
            }
        }
        SyntaxPattern::Alternation { options } => {
            for p in options {
                walk(p, visit);
            }
        }
        SyntaxPattern::Group { pattern, .. } => walk(pattern, visit),
        _ => {}
    }
}

fn collect_vocab(
    registry: &PatternRegistry,
) -> (
    BTreeSet<&'static str>,
    BTreeSet<&'static str>,
    BTreeSet<&'static str>,
) {
    let mut effects = BTreeSet::new();
    let mut quantifiers = BTreeSet::new();
    let mut types = BTreeSet::new();
    for (_, entry) in registry.iter() {
        walk(&entry.pattern, &mut |p| {
            quantifiers.insert(p.quantifier().suffix());
            if let SyntaxPattern::Param {
                param_type, effect, ..
            } = p
            {
                types.insert(param_type.name());
                if let Some(effect) = effect {
                    effects.insert(match effect {
                        FieldEffect::Creates => "creates",
                        FieldEffect::Consumes => "consumes",
                        FieldEffect::Modifies => "modifies",
                        FieldEffect::GroupsBy => "groups-by",
                        FieldEffect::Drops => "drops",
                    });
                }
            }
        });
    }
    (effects, quantifiers, types)
}

#[test]
fn every_field_effect_appears() {
    let registry = PatternRegistry::standard();
    let (effects, _, _) = collect_vocab(&registry);
    for effect in ["creates", "consumes", "modifies", "groups-by", "drops"] {
        assert!(effects.contains(effect), "no pattern uses effect `{effect}`");
    }
}

#[test]
fn every_quantifier_appears() {
    let registry = PatternRegistry::standard();
    let (_, quantifiers, _) = collect_vocab(&registry);
    // Suffixes: One renders as "", the rest as their symbols.
    for q in ["", "?", "+", "*"] {
        assert!(
            quantifiers.contains(q),
            "no pattern uses quantifier `{}`",
            if q.is_empty() { "1" } else { q }
        );
    }
}

#[test]
fn every_param_type_appears() {
    let registry = PatternRegistry::standard();
    let (_, _, types) = collect_vocab(&registry);
    for pt in [
        ParamType::Field,
        ParamType::WcField,
        ParamType::EvaledField,
        ParamType::FieldList,
        ParamType::Int,
        ParamType::Num,
        ParamType::Str,
        ParamType::Bool,
        ParamType::StatsFunc,
        ParamType::TimeModifier,
    ] {
        assert!(
            types.contains(pt.name()),
            "no pattern uses param type `{}`",
            pt.name()
        );
    }
}

#[test]
fn corpus_has_no_duplicate_names() {
    let mut seen = BTreeSet::new();
    for entry in spl_grammar::commands::all() {
        assert!(seen.insert(entry.name.clone()), "duplicate entry `{}`", entry.name);
    }
}

#[test]
fn standard_registry_validates_clean() {
    let registry = PatternRegistry::standard();
    for (name, result) in validate_registry(&registry) {
        assert!(result.valid, "`{name}`: {:?}", result.errors);
        assert!(
            result.warnings.is_empty(),
            "`{name}` has warnings: {:?}",
            result.warnings
        );
    }
}

#[test]
fn categories_are_from_the_known_set() {
    let known = ["generating", "streaming", "transforming", "reporting", "output"];
    for entry in spl_grammar::commands::all() {
        assert!(
            known.contains(&entry.category.as_str()),
            "`{}` has unknown category `{}`",
            entry.name,
            entry.category
        );
    }
}
