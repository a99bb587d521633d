use serde::Serialize;
use spl_common::{Span, Token, TokenKind};

use crate::Lexer;

/// One top-level stage of an SPL pipeline: a command name plus its
/// argument tokens.
///
/// Stages come from splitting the token stream on top-level `|` tokens.
/// Subsearches were already folded into opaque tokens by the lexer, so no
/// pipe inside a `[...]` block can start a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    /// Lowercased command name. Field and option values keep their case;
    /// command names are matched case-insensitively.
    pub command: String,
    /// Span of the command name token. Empty for an implicit leading search.
    pub command_span: Span,
    /// Argument tokens, in source order.
    pub args: Vec<Token>,
    /// Span covering the whole stage, first token to last.
    pub span: Span,
    /// Whether the command name was written in the source. The first stage
    /// of a pipe-less query is an implicit `search`.
    pub explicit: bool,
}

/// Split SPL source into its top-level pipeline stages.
///
/// The first stage of a query that does not begin with `|` is a search
/// expression: it becomes a `search` stage whose arguments are the whole
/// segment, unless its first word is literally `search`. Empty segments
/// (leading, trailing, or doubled pipes) are skipped.
pub fn split_stages(source: &str) -> Vec<Stage> {
    let tokens = Lexer::tokenize(source);
    let mut stages = Vec::new();
    // A query starting with `|` produces an empty leading segment, which
    // clears the implicit-search rule before any real stage is seen.
    let mut first_segment = true;

    for segment in tokens.split(|t| t.kind == TokenKind::Pipe) {
        if segment.is_empty() {
            first_segment = false;
            continue;
        }
        stages.push(build_stage(source, segment, first_segment));
        first_segment = false;
    }
    stages
}

fn build_stage(source: &str, segment: &[Token], leading_search: bool) -> Stage {
    let span = segment[0].span.cover(segment[segment.len() - 1].span);
    let head = &segment[0];
    let head_is_search =
        head.kind == TokenKind::Word && head.text(source).eq_ignore_ascii_case("search");

    if leading_search && !head_is_search {
        // Implicit search: every token is an argument.
        return Stage {
            command: "search".to_string(),
            command_span: Span::point(span.start),
            args: segment.to_vec(),
            span,
            explicit: false,
        };
    }

    Stage {
        command: head.text(source).to_ascii_lowercase(),
        command_span: head.span,
        args: segment[1..].to_vec(),
        span,
        explicit: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(source: &str) -> Vec<String> {
        split_stages(source).into_iter().map(|s| s.command).collect()
    }

    #[test]
    fn implicit_leading_search() {
        let stages = split_stages("index=main error | stats count");
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].command, "search");
        assert!(!stages[0].explicit);
        assert_eq!(stages[0].args.len(), 4);
        assert_eq!(stages[1].command, "stats");
        assert!(stages[1].explicit);
    }

    #[test]
    fn explicit_leading_search() {
        let stages = split_stages("search index=main | head 5");
        assert_eq!(stages[0].command, "search");
        assert!(stages[0].explicit);
        // "search" itself is the command, not an argument.
        assert_eq!(stages[0].args.len(), 3);
    }

    #[test]
    fn leading_pipe_generating_command() {
        let stages = split_stages("| makeresults count=3 | eval x=1");
        assert_eq!(commands("| makeresults count=3 | eval x=1"), vec!["makeresults", "eval"]);
        assert!(stages[0].explicit);
    }

    #[test]
    fn command_name_is_lowercased() {
        assert_eq!(commands("index=main | STATS count"), vec!["search", "stats"]);
    }

    #[test]
    fn stage_spans_cover_tokens() {
        let src = "index=main | iplocation clientip";
        let stages = split_stages(src);
        assert_eq!(stages[0].span.text(src), "index=main");
        assert_eq!(stages[1].span.text(src), "iplocation clientip");
        assert_eq!(stages[1].command_span.text(src), "iplocation");
    }

    #[test]
    fn subsearch_pipes_do_not_split() {
        let stages = split_stages("index=a | join host [search index=b | dedup host]");
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1].command, "join");
    }

    #[test]
    fn empty_and_doubled_segments_are_skipped() {
        assert!(split_stages("").is_empty());
        assert!(split_stages("   ").is_empty());
        assert_eq!(commands("index=a || stats count |"), vec!["search", "stats"]);
    }

    #[test]
    fn multiline_pipeline() {
        let src = "search index=test\n| collect index=summary\n| search index=main";
        assert_eq!(commands(src), vec!["search", "collect", "search"]);
    }
}
