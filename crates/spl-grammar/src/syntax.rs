use serde::Serialize;
use spl_common::DataType;

use crate::pattern::SyntaxPattern;
use crate::semantics::{ArgShape, CommandSemantics, ImplicitFields};

/// The full grammar entry for one SPL command.
///
/// Everything except `pattern` and `semantics` is documentation: the
/// category, description, related commands, and tags carry no semantic
/// weight in the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSyntax {
    /// Lowercase command name.
    pub name: String,
    /// Documentation category, e.g. `streaming` or `reporting`.
    pub category: String,
    /// Human-readable description.
    pub description: String,
    /// Root syntax pattern for the command's arguments.
    pub pattern: SyntaxPattern,
    /// Related command names, for documentation.
    pub related: Vec<String>,
    /// Free-form documentation tags.
    pub tags: Vec<String>,
    /// Semantic profile: implicit field sets and event shaping.
    pub semantics: CommandSemantics,
}

impl CommandSyntax {
    /// Start a new entry. The name is lowercased on construction.
    pub fn new(name: &str, category: &str, description: &str, pattern: SyntaxPattern) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            category: category.to_string(),
            description: description.to_string(),
            pattern,
            related: Vec::new(),
            tags: Vec::new(),
            semantics: CommandSemantics::default(),
        }
    }

    pub fn related(mut self, names: &[&str]) -> Self {
        self.related = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Attach a documented implicit-field set.
    pub fn implicit(mut self, fields: ImplicitFields) -> Self {
        self.semantics.implicit = Some(fields);
        self
    }

    /// Shorthand for a plain implicit set with no prefix or extension.
    pub fn implicit_fields(self, fields: &[(&str, DataType)]) -> Self {
        self.implicit(ImplicitFields::new(fields))
    }

    /// Set the post-match event shaping.
    pub fn shape(mut self, shape: ArgShape) -> Self {
        self.semantics.shape = shape;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{eff, lit, seq};
    use crate::pattern::ParamType;
    use spl_common::FieldEffect;

    #[test]
    fn builder_lowercases_name() {
        let cmd = CommandSyntax::new(
            "Rename",
            "streaming",
            "Renames fields.",
            seq(vec![lit("as"), eff(ParamType::Field, FieldEffect::Creates)]),
        )
        .related(&["fields"])
        .tags(&["fields"])
        .shape(ArgShape::RenamePairs);
        assert_eq!(cmd.name, "rename");
        assert_eq!(cmd.related, vec!["fields"]);
        assert_eq!(cmd.semantics.shape, ArgShape::RenamePairs);
    }
}
