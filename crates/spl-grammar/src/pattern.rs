//! Recursive syntax pattern types for SPL command grammars.
//!
//! A command's syntax is described as a small BNF-style tree: literals,
//! typed parameter slots, sequences, alternations, and quantified groups.
//! The tree is inert data, constructed once and never mutated; the
//! interpreter walks it against a stage's argument tokens.

use std::fmt;

use serde::Serialize;
use spl_common::FieldEffect;

/// How many times a pattern node may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Quantifier {
    /// Exactly one occurrence (the default).
    #[default]
    One,
    /// Zero or one occurrence.
    Optional,
    /// One or more occurrences, greedy.
    OneOrMore,
    /// Zero or more occurrences, greedy.
    ZeroOrMore,
}

impl Quantifier {
    /// BNF-style suffix for rendering.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::One => "",
            Self::Optional => "?",
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }
}

/// The closed set of parameter types a pattern slot may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamType {
    /// A plain field name.
    Field,
    /// A field name that may contain a `*` wildcard.
    WcField,
    /// An expression over fields, e.g. an `eval` right-hand side.
    EvaledField,
    /// A comma- or whitespace-separated run of field names.
    FieldList,
    /// An integer literal.
    Int,
    /// An integer or floating-point literal.
    Num,
    /// Any string-ish value: bare word, quoted string, or number.
    Str,
    /// A boolean flag value: `true`/`false`/`t`/`f`/`0`/`1`.
    Bool,
    /// An aggregation or conversion call, e.g. `count` or `avg(duration)`.
    StatsFunc,
    /// A relative time modifier, e.g. `5m`, `-7d@d`, `now`.
    TimeModifier,
}

impl ParamType {
    /// The canonical name of the type, used in validation messages and
    /// pattern rendering.
    pub fn name(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::WcField => "wc-field",
            Self::EvaledField => "evaled-field",
            Self::FieldList => "field-list",
            Self::Int => "int",
            Self::Num => "num",
            Self::Str => "string",
            Self::Bool => "bool",
            Self::StatsFunc => "stats-func",
            Self::TimeModifier => "time-modifier",
        }
    }

    /// Whether a slot of this type names fields, and therefore ought to
    /// carry a field effect.
    pub fn is_field_like(self) -> bool {
        matches!(
            self,
            Self::Field | Self::WcField | Self::EvaledField | Self::FieldList
        )
    }
}

/// A node in a command's syntax pattern tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyntaxPattern {
    /// A fixed keyword, matched case-insensitively against one token.
    Literal {
        value: String,
        quantifier: Quantifier,
    },
    /// A typed parameter slot. A named slot matches `name=value`
    /// (three tokens); an unnamed slot matches by type predicate alone.
    Param {
        param_type: ParamType,
        name: Option<String>,
        quantifier: Quantifier,
        effect: Option<FieldEffect>,
    },
    /// Ordered concatenation of sub-patterns.
    Sequence {
        patterns: Vec<SyntaxPattern>,
        quantifier: Quantifier,
    },
    /// Choice between alternatives, tried in declaration order with
    /// longest-match-wins.
    Alternation { options: Vec<SyntaxPattern> },
    /// A single sub-pattern with its own quantifier.
    Group {
        pattern: Box<SyntaxPattern>,
        quantifier: Quantifier,
    },
}

impl SyntaxPattern {
    /// The quantifier attached to this node. Alternations always match once.
    pub fn quantifier(&self) -> Quantifier {
        match self {
            Self::Literal { quantifier, .. }
            | Self::Param { quantifier, .. }
            | Self::Sequence { quantifier, .. }
            | Self::Group { quantifier, .. } => *quantifier,
            Self::Alternation { .. } => Quantifier::One,
        }
    }

    /// Maximum nesting depth of the pattern tree.
    pub fn depth(&self) -> usize {
        match self {
            Self::Literal { .. } | Self::Param { .. } => 1,
            Self::Sequence { patterns, .. } => {
                1 + patterns.iter().map(SyntaxPattern::depth).max().unwrap_or(0)
            }
            Self::Alternation { options } => {
                1 + options.iter().map(SyntaxPattern::depth).max().unwrap_or(0)
            }
            Self::Group { pattern, .. } => 1 + pattern.depth(),
        }
    }
}

impl fmt::Display for SyntaxPattern {
    /// Render the pattern in a compact BNF-ish notation, e.g.
    /// `("prefix" "=" <string>)? <field:consumes>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, quantifier } => {
                write!(f, "\"{value}\"{}", quantifier.suffix())
            }
            Self::Param {
                param_type,
                name,
                quantifier,
                effect,
            } => {
                if let Some(name) = name {
                    write!(f, "{name}=")?;
                }
                write!(f, "<{}", param_type.name())?;
                if let Some(effect) = effect {
                    write!(f, ":{effect}")?;
                }
                write!(f, ">{}", quantifier.suffix())
            }
            Self::Sequence {
                patterns,
                quantifier,
            } => {
                write!(f, "(")?;
                for (i, p) in patterns.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, "){}", quantifier.suffix())
            }
            Self::Alternation { options } => {
                write!(f, "(")?;
                for (i, p) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            }
            Self::Group {
                pattern,
                quantifier,
            } => {
                write!(f, "({pattern}){}", quantifier.suffix())
            }
        }
    }
}
