//! Constructor shorthands for building syntax patterns.
//!
//! The command modules assemble ~150 grammars; these helpers keep each
//! entry to a handful of lines, in the spirit of a type checker's
//! `Ty::fun`/`Scheme::mono` constructors.

use spl_common::FieldEffect;

use crate::pattern::{ParamType, Quantifier, SyntaxPattern};

/// A literal keyword, matched once.
pub fn lit(value: &str) -> SyntaxPattern {
    SyntaxPattern::Literal {
        value: value.to_string(),
        quantifier: Quantifier::One,
    }
}

/// An optional literal keyword.
pub fn opt_lit(value: &str) -> SyntaxPattern {
    SyntaxPattern::Literal {
        value: value.to_string(),
        quantifier: Quantifier::Optional,
    }
}

/// An unnamed parameter with no field effect.
pub fn param(param_type: ParamType) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: None,
        quantifier: Quantifier::One,
        effect: None,
    }
}

/// An unnamed parameter carrying a field effect.
pub fn eff(param_type: ParamType, effect: FieldEffect) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: None,
        quantifier: Quantifier::One,
        effect: Some(effect),
    }
}

/// A required named option, `name=value`.
pub fn named(name: &str, param_type: ParamType) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: Some(name.to_string()),
        quantifier: Quantifier::One,
        effect: None,
    }
}

/// An optional named option.
pub fn named_opt(name: &str, param_type: ParamType) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: Some(name.to_string()),
        quantifier: Quantifier::Optional,
        effect: None,
    }
}

/// A required named option whose value is a field with an effect,
/// e.g. `countfield=my_count` creating the named field.
pub fn named_eff(name: &str, param_type: ParamType, effect: FieldEffect) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: Some(name.to_string()),
        quantifier: Quantifier::One,
        effect: Some(effect),
    }
}

/// An optional named option whose value is a field with an effect.
pub fn named_opt_eff(name: &str, param_type: ParamType, effect: FieldEffect) -> SyntaxPattern {
    SyntaxPattern::Param {
        param_type,
        name: Some(name.to_string()),
        quantifier: Quantifier::Optional,
        effect: Some(effect),
    }
}

/// Ordered concatenation.
pub fn seq(patterns: Vec<SyntaxPattern>) -> SyntaxPattern {
    SyntaxPattern::Sequence {
        patterns,
        quantifier: Quantifier::One,
    }
}

/// Choice between alternatives.
pub fn alt(options: Vec<SyntaxPattern>) -> SyntaxPattern {
    SyntaxPattern::Alternation { options }
}

/// A sub-pattern with an explicit quantifier.
pub fn group(pattern: SyntaxPattern, quantifier: Quantifier) -> SyntaxPattern {
    SyntaxPattern::Group {
        pattern: Box::new(pattern),
        quantifier,
    }
}

/// Zero-or-one occurrences of a sub-pattern.
pub fn opt(pattern: SyntaxPattern) -> SyntaxPattern {
    group(pattern, Quantifier::Optional)
}

/// Zero-or-more occurrences, greedy.
pub fn many0(pattern: SyntaxPattern) -> SyntaxPattern {
    group(pattern, Quantifier::ZeroOrMore)
}

/// One-or-more occurrences, greedy.
pub fn many1(pattern: SyntaxPattern) -> SyntaxPattern {
    group(pattern, Quantifier::OneOrMore)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantifier_shorthands() {
        assert_eq!(opt_lit("by").quantifier(), Quantifier::Optional);
        assert_eq!(many0(lit("x")).quantifier(), Quantifier::ZeroOrMore);
        assert_eq!(many1(lit("x")).quantifier(), Quantifier::OneOrMore);
        assert_eq!(lit("x").quantifier(), Quantifier::One);
    }

    #[test]
    fn named_param_carries_name_and_effect() {
        let p = named_opt_eff("countfield", ParamType::Field, FieldEffect::Creates);
        match p {
            SyntaxPattern::Param {
                name,
                effect,
                quantifier,
                ..
            } => {
                assert_eq!(name.as_deref(), Some("countfield"));
                assert_eq!(effect, Some(FieldEffect::Creates));
                assert_eq!(quantifier, Quantifier::Optional);
            }
            _ => panic!("expected a param"),
        }
    }
}
