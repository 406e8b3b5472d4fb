// tests/grammar_tests.rs

use fhir_filter::ast::{Token, TokenKind};
use fhir_filter::grammar::{
    Matcher, is_block, is_comp_value, is_filter, is_log_exp, is_negation, is_param_exp,
    is_param_path, is_sequence, is_sub_filter,
};
use fhir_filter::lexer::tokenize;

fn toks(input: &str) -> Vec<Token> {
    tokenize(input).unwrap()
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn test_sequence_of_literals() {
    use Matcher::Content as C;

    let test_cases: Vec<(&str, Vec<Matcher>, usize)> = vec![
        ("a", vec![C("a")], 1),
        ("a b c", vec![C("a"), C("b"), C("c")], 3),
        ("a b c d", vec![C("a"), C("b"), C("c"), C("d")], 4),
        (
            "a[b eq c].d",
            vec![C("a"), C("["), C("b"), C("eq"), C("c"), C("]"), C("."), C("d")],
            8,
        ),
        (
            "a[b eq c].d",
            vec![
                C("a"),
                Matcher::Kind(TokenKind::Punctuator),
                C("b"),
                C("eq"),
                C("c"),
                C("]"),
                C("."),
                C("d"),
            ],
            8,
        ),
        ("a b", vec![C("a"), Matcher::Exact(TokenKind::Identifier, "b")], 2),
        ("a b", vec![C("a"), Matcher::Exact(TokenKind::Identifier, "x")], 0),
        ("a", vec![C("a"), C("b")], 0),
    ];

    for (input, sequence, expected) in test_cases {
        assert_eq!(is_sequence(&toks(input), &sequence), expected, "input {:?}", input);
    }
}

#[test]
fn test_sequence_with_path_rules() {
    use Matcher::{Content as C, Rule};

    let path = &is_param_path;
    let test_cases: Vec<(&str, Vec<Matcher>, usize)> = vec![
        ("a.b", vec![Rule(path)], 3),
        ("a.b c d", vec![Rule(path), C("c"), C("d")], 5),
        ("a.b c.d e f", vec![Rule(path), Rule(path), C("e"), C("f")], 8),
        ("c a.b", vec![C("c"), Rule(path)], 4),
        ("c a.b d", vec![C("c"), Rule(path), C("d")], 5),
        ("a.b eq", vec![Rule(path), C("eq")], 4),
        ("a.b eq 5", vec![Rule(path), C("eq"), C("5")], 5),
        ("a.b eq d", vec![Rule(path), C("eq"), C("c")], 0),
    ];

    for (input, sequence, expected) in test_cases {
        assert_eq!(is_sequence(&toks(input), &sequence), expected, "input {:?}", input);
    }
}

// ============================================================================
// Productions
// ============================================================================

#[test]
fn test_is_comp_value() {
    for input in [r#""abc""#, "123", "true", "false", "null", "2020-01-02", "5mg", "12xy34"] {
        assert_eq!(is_comp_value(&toks(input)), 1, "input {:?}", input);
    }
    for input in ["abc", "eq", "(", ""] {
        assert_eq!(is_comp_value(&toks(input)), 0, "input {:?}", input);
    }
}

#[test]
fn test_is_param_path() {
    let test_cases = vec![
        ("a", 1),
        ("a.b", 3),
        ("a.b.c", 5),
        ("a.b.c eq d", 5),
        ("a[b eq 6]", 6),
        ("a[b eq 6].b.c", 10),
        ("a[b eq 1 and c eq 2].d", 12),
        ("a.", 1),
        ("5", 0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(is_param_path(&toks(input)), expected, "input {:?}", input);
    }
}

#[test]
fn test_is_param_exp_full() {
    let test_cases = vec![
        ("a", 0),
        ("a eq 5", 3),
        (r#"a eq "test""#, 3),
        ("a eq true", 3),
        ("a eq false", 3),
        ("a eq null", 3),
        ("a eq b", 0),
        ("a eq .", 0),
        ("a eq [", 0),
        ("a and 5", 0),
        ("a eq 5 and", 0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(is_param_exp(&toks(input), true), expected, "input {:?}", input);
    }

    assert_eq!(is_param_exp(&toks("a eq 5 and"), false), 3);
}

#[test]
fn test_is_log_exp() {
    let test_cases = vec![
        ("a eq 5", 0),
        ("a eq 5 and b gt 3", 7),
        ("(a eq 5) and b gt 3", 9),
        ("a eq 5 and (b gt 3)", 9),
        ("(a eq 5) and (b gt 3)", 11),
        ("((a eq 5) and (b gt 3))", 0),
        ("a eq 5 and b gt 3 or x lt 4", 11),
        ("a eq 5 and b gt 3 or (x lt 4)", 13),
        ("a eq 5 and b gt 3 extra", 0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(is_log_exp(&toks(input)), expected, "input {:?}", input);
    }
}

#[test]
fn test_is_filter_greedy() {
    let test_cases = vec![
        ("a eq 5", 3),
        ("(a eq 5)", 5),
        ("not(a eq 5)", 6),
        ("a.b eq 5", 5),
        ("a.b[c ne 4].x eq 5", 12),
        ("a eq 5 and b eq 2", 7),
        ("a eq 5 and (b eq 2)", 9),
        ("a eq 5 and b eq 2 or x gt 4", 11),
        ("(a eq 5) and b eq 2", 9),
        ("(a eq 5) and (b eq 2)", 11),
        ("a eq 5 and", 3),
        ("eq 5", 0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(is_filter(&toks(input), true), expected, "input {:?}", input);
    }
}

#[test]
fn test_is_filter_non_greedy_stops_at_connective() {
    assert_eq!(is_filter(&toks("a eq 5 and b eq 2"), false), 3);
    assert_eq!(is_filter(&toks("(a eq 5 and b eq 2) or c eq 1"), false), 9);
}

#[test]
fn test_groups() {
    assert_eq!(is_block(&toks("(a eq 1 or b eq 2) and c eq 3")), 9);
    assert_eq!(is_block(&toks("(a eq 1")), 0);
    assert_eq!(is_negation(&toks("not(a eq 1) or b eq 2")), 6);
    assert_eq!(is_negation(&toks("not a eq 1")), 0);
    assert_eq!(is_sub_filter(&toks("[b eq 2 and c eq 3].d")), 9);
    assert_eq!(is_sub_filter(&toks("[]")), 0);
}
