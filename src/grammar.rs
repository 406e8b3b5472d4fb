//! Lookahead matchers for the filter grammar.
//!
//! Every matcher inspects a token slice and returns how many tokens from its
//! front belong to the production, or `0` when the production does not match.
//! The parser uses these lengths to pick a production and to bound the range
//! of nested sub-filters before building any node.

use crate::ast::{ComparisonOperator, Connective, Token, TokenKind};

/// One element of a sequence pattern.
pub enum Matcher<'m> {
    /// Token with exactly this content
    Content(&'m str),
    /// Token of this kind
    Kind(TokenKind),
    /// Token of this kind and content
    Exact(TokenKind, &'m str),
    /// Operator token naming a comparison operator
    Comparison,
    /// Nested production
    Rule(&'m dyn Fn(&[Token]) -> usize),
}

impl Matcher<'_> {
    fn consume(&self, tokens: &[Token]) -> usize {
        let Some(token) = tokens.first() else {
            return 0;
        };
        let matched = match self {
            Matcher::Content(content) => token.has_content(content),
            Matcher::Kind(kind) => token.is(*kind),
            Matcher::Exact(kind, content) => token.is(*kind) && token.has_content(content),
            Matcher::Comparison => {
                token.is(TokenKind::Operator)
                    && ComparisonOperator::from_code(&token.content).is_some()
            }
            Matcher::Rule(rule) => return rule(tokens),
        };
        usize::from(matched)
    }
}

/// Matches every element of `sequence` in order, returning the total length.
///
/// An empty sequence matches nothing.
pub fn is_sequence(tokens: &[Token], sequence: &[Matcher<'_>]) -> usize {
    let mut end = 0;
    for matcher in sequence {
        if end >= tokens.len() {
            return 0;
        }
        match matcher.consume(&tokens[end..]) {
            0 => return 0,
            len => end += len,
        }
    }
    end
}

/// Returns the length of the first alternative that matches.
pub fn is_one_of(tokens: &[Token], alternatives: &[&dyn Fn(&[Token]) -> usize]) -> usize {
    alternatives
        .iter()
        .map(|alternative| alternative(tokens))
        .find(|len| *len > 0)
        .unwrap_or(0)
}

fn is_connective(token: &Token) -> bool {
    Connective::from_word(&token.content).is_some()
}

/// `"not" "(" filter ")"`
pub fn is_negation(tokens: &[Token]) -> usize {
    is_sequence(
        tokens,
        &[
            Matcher::Exact(TokenKind::Keyword, "not"),
            Matcher::Content("("),
            Matcher::Rule(&|t| is_filter(t, true)),
            Matcher::Content(")"),
        ],
    )
}

/// `"(" filter ")"`
pub fn is_block(tokens: &[Token]) -> usize {
    is_sequence(
        tokens,
        &[
            Matcher::Content("("),
            Matcher::Rule(&|t| is_filter(t, true)),
            Matcher::Content(")"),
        ],
    )
}

/// `"[" filter "]"`
pub fn is_sub_filter(tokens: &[Token]) -> usize {
    is_sequence(
        tokens,
        &[
            Matcher::Content("["),
            Matcher::Rule(&|t| is_filter(t, true)),
            Matcher::Content("]"),
        ],
    )
}

/// `filter = not ( filter ) | ( filter ) | paramExp`
///
/// When `greedy`, a trailing `and filter` and then a trailing `or filter` are
/// absorbed as well. A greedy operand itself absorbs every connective that
/// follows it, so the result is the longest `(connective operand)*` chain.
pub fn is_filter(tokens: &[Token], greedy: bool) -> usize {
    let mut pos = is_one_of(tokens, &[&is_negation, &is_block, &|t| is_param_exp(t, false)]);

    if pos > 0 && greedy {
        while let Some(token) = tokens.get(pos) {
            if !is_connective(token) {
                break;
            }
            let next = is_filter(&tokens[pos + 1..], false);
            if next == 0 {
                break;
            }
            pos += next + 1;
        }
    }

    pos
}

/// `paramExp = paramPath operator compValue`
///
/// With `full`, the match must cover the whole slice.
pub fn is_param_exp(tokens: &[Token], full: bool) -> usize {
    let len = is_sequence(
        tokens,
        &[
            Matcher::Rule(&is_param_path),
            Matcher::Comparison,
            Matcher::Rule(&is_comp_value),
        ],
    );

    if full && len < tokens.len() { 0 } else { len }
}

/// `logExp = filter (("and" | "or") filter)+`
///
/// Only matches when the expression spans the entire slice.
pub fn is_log_exp(tokens: &[Token]) -> usize {
    let pos = is_filter(tokens, false);
    if pos == 0 {
        return 0;
    }

    let mut end = pos;
    while let Some(token) = tokens.get(end) {
        if !is_connective(token) {
            break;
        }
        let next = is_filter(&tokens[end + 1..], true);
        if next == 0 {
            break;
        }
        end += next + 1;
    }

    if end > pos && end == tokens.len() { end } else { 0 }
}

/// `paramPath = identifier ("[" filter "]")? ("." paramPath)?`
pub fn is_param_path(tokens: &[Token]) -> usize {
    let mut len = 0;
    loop {
        if !tokens.get(len).is_some_and(|t| t.is(TokenKind::Identifier)) {
            return len;
        }
        len += 1;
        len += is_sub_filter(&tokens[len..]);

        let dot = tokens
            .get(len)
            .is_some_and(|t| t.is(TokenKind::Punctuator) && t.has_content("."));
        let next_is_field = tokens
            .get(len + 1)
            .is_some_and(|t| t.is(TokenKind::Identifier));
        if !(dot && next_is_field) {
            return len;
        }
        len += 1;
    }
}

/// `compValue = string | number | date | token | quantity`
pub fn is_comp_value(tokens: &[Token]) -> usize {
    usize::from(tokens.first().is_some_and(|t| t.kind.is_comp_value()))
}
