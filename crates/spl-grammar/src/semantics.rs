//! Per-command semantic profiles.
//!
//! A pattern describes the *shape* of a command's arguments; the semantic
//! profile describes the parts of its field behavior the shape cannot:
//! documented implicit-field sets (`iplocation` always derives five geo
//! fields) and the post-match event shaping the interpreter applies
//! (`rename` pairs, `X as Y` alias folding, `fields` keep-only mode).

use serde::Serialize;
use spl_common::DataType;

/// A fixed, documented set of fields a command derives on every
/// successful invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImplicitFields {
    /// Base field set, always produced.
    pub fields: Vec<(String, DataType)>,
    /// Named parameter whose value prefixes every implicit field name
    /// (e.g. `iplocation prefix=src_`). An empty value produces
    /// unprefixed names.
    pub prefix_param: Option<String>,
    /// Extension set, produced only when the named boolean parameter is
    /// set truthy (e.g. `iplocation allfields=true`).
    pub extended: Option<(String, Vec<(String, DataType)>)>,
}

impl ImplicitFields {
    pub fn new(fields: &[(&str, DataType)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(n, t)| (n.to_string(), *t))
                .collect(),
            prefix_param: None,
            extended: None,
        }
    }

    pub fn with_prefix_param(mut self, name: &str) -> Self {
        self.prefix_param = Some(name.to_string());
        self
    }

    pub fn with_extension(mut self, flag_param: &str, fields: &[(&str, DataType)]) -> Self {
        self.extended = Some((
            flag_param.to_string(),
            fields.iter().map(|(n, t)| (n.to_string(), *t)).collect(),
        ));
        self
    }
}

/// Post-match shaping the interpreter applies to a command's raw events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ArgShape {
    /// Events pass through as matched.
    #[default]
    Standard,
    /// `rename old AS new` pairs: each dropped field becomes the
    /// dependency of the created field that follows it.
    RenamePairs,
    /// Aggregation lists: `avg(duration) as d` folds the alias onto the
    /// aggregate, carrying the aggregate's input fields as dependencies.
    Aggregates,
    /// `eval`-style assignment lists: each created field absorbs the
    /// field references extracted from its expression.
    EvalAssignments,
    /// `fields` / `table`: the listed fields become a keep-only
    /// restriction of the live set, or drops in `-` mode.
    RestrictFields,
    /// `rex`-style extraction: named capture groups in the regex argument
    /// become created fields depending on the consumed input field.
    RexCaptures,
    /// Enrichment commands (`lookup`, `spath`, `xpath`): created output
    /// fields depend on the consumed input fields.
    LookupOutputs,
    /// `strcat`-style: the final consumed field is actually the
    /// destination, created from all the fields before it.
    TrailingTarget,
}

/// The complete semantic profile of one command.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CommandSemantics {
    pub implicit: Option<ImplicitFields>,
    pub shape: ArgShape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_builder() {
        let imp = ImplicitFields::new(&[("city", DataType::Str), ("lat", DataType::Number)])
            .with_prefix_param("prefix")
            .with_extension("allfields", &[("timezone", DataType::Str)]);
        assert_eq!(imp.fields.len(), 2);
        assert_eq!(imp.prefix_param.as_deref(), Some("prefix"));
        let (flag, ext) = imp.extended.unwrap();
        assert_eq!(flag, "allfields");
        assert_eq!(ext[0].0, "timezone");
    }

    #[test]
    fn default_profile_is_inert() {
        let sem = CommandSemantics::default();
        assert!(sem.implicit.is_none());
        assert_eq!(sem.shape, ArgShape::Standard);
    }
}
