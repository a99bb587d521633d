use std::fmt;

use serde::Serialize;

/// How a command parameter changes the live field set.
///
/// This is the semantic annotation carried by effectful pattern parameters
/// and by every field event the interpreter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldEffect {
    /// The stage introduces (or overwrites) a field of this name.
    Creates,
    /// The stage reads the field; the live set is unchanged.
    Consumes,
    /// The stage rewrites an existing field in place, or creates it if absent.
    Modifies,
    /// The stage uses the field as a grouping key (also counts as a read).
    GroupsBy,
    /// The stage removes the field from the live set.
    Drops,
}

impl fmt::Display for FieldEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Creates => "creates",
            Self::Consumes => "consumes",
            Self::Modifies => "modifies",
            Self::GroupsBy => "groups-by",
            Self::Drops => "drops",
        };
        write!(f, "{s}")
    }
}

/// Statically inferred data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum DataType {
    Str,
    Number,
    Bool,
    #[default]
    Unknown,
}

impl DataType {
    /// Whether this type carries more information than `other`.
    ///
    /// Used when a `modifies` event supplies a type for an existing node:
    /// the node's type is only replaced by a more specific one.
    pub fn is_more_specific_than(self, other: DataType) -> bool {
        self != DataType::Unknown && other == DataType::Unknown
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Str => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// How certain the analyzer is about a lineage fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    /// Resolved a wildcard against a non-matching live set, or otherwise
    /// had to guess.
    Inferred,
    /// Derived indirectly, e.g. field references extracted from an
    /// expression body.
    Likely,
    /// Stated by an explicit pattern parameter or a documented
    /// implicit-field set.
    Certain,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Certain => "certain",
            Self::Likely => "likely",
            Self::Inferred => "inferred",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_display() {
        assert_eq!(FieldEffect::GroupsBy.to_string(), "groups-by");
        assert_eq!(FieldEffect::Creates.to_string(), "creates");
    }

    #[test]
    fn type_specificity() {
        assert!(DataType::Number.is_more_specific_than(DataType::Unknown));
        assert!(!DataType::Unknown.is_more_specific_than(DataType::Number));
        assert!(!DataType::Str.is_more_specific_than(DataType::Number));
    }

    #[test]
    fn confidence_orders_certain_highest() {
        assert!(Confidence::Certain > Confidence::Likely);
        assert!(Confidence::Likely > Confidence::Inferred);
    }
}
