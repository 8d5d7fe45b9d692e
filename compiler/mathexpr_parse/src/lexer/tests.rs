use super::*;

use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn numbers_and_operators() {
    assert_eq!(
        kinds("2.5 * .5e2 ./ 3"),
        vec![
            TokenKind::Number(2.5),
            TokenKind::Star,
            TokenKind::Number(50.0),
            TokenKind::DotSlash,
            TokenKind::Number(3.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn exponent_needs_digits() {
    assert_eq!(
        kinds("2e"),
        vec![
            TokenKind::Number(2.0),
            TokenKind::Ident("e".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        kinds("a and band to tons"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::And,
            TokenKind::Ident("band".to_owned()),
            TokenKind::To,
            TokenKind::Ident("tons".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn strings_in_both_quote_styles() {
    assert_eq!(
        kinds(r#""a\"b\n" 'it\'s' "é""#),
        vec![
            TokenKind::Str("a\"b\n".to_owned()),
            TokenKind::Str("it's".to_owned()),
            TokenKind::Str("é".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped_and_newlines_kept() {
    assert_eq!(
        kinds("a # first\nb"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::Newline,
            TokenKind::Ident("b".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn optional_chaining_tokens() {
    assert_eq!(
        kinds("a?.b ? c : d"),
        vec![
            TokenKind::Ident("a".to_owned()),
            TokenKind::QuestionDot,
            TokenKind::Ident("b".to_owned()),
            TokenKind::Question,
            TokenKind::Ident("c".to_owned()),
            TokenKind::Colon,
            TokenKind::Ident("d".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_are_byte_ranges() {
    let tokens = lex("ab + 1").unwrap();
    assert_eq!((tokens[0].start, tokens[0].end), (0, 2));
    assert_eq!((tokens[2].start, tokens[2].end), (5, 6));
    assert_eq!(tokens[3].start, 6);
}

#[test]
fn unknown_character() {
    let err = lex("1 @ 2").unwrap_err();
    assert_eq!(err.to_string(), "Syntax error in part \"@\" (char 3)");
}

#[test]
fn unterminated_string() {
    let err = lex("x = \"abc").unwrap_err();
    assert_eq!(err.message, "End of string missing");
    assert_eq!(err.position, 5);
}

#[test]
fn operand_starts() {
    assert!(TokenKind::LParen.starts_operand());
    assert!(TokenKind::Number(1.0).starts_operand());
    assert!(!TokenKind::Plus.starts_operand());
    assert!(!TokenKind::LBracket.starts_operand());
}
