//! Two-stage composition: a small calculator front end.

use std::cell::Cell;
use std::rc::Rc;

use pipeline_core::{
    pipeline, pipeline_reader, Diagnostic, Emitted, LexFn, Lexer, NextFn, ParseFn, Parser,
    TokenType,
};

const T_NUMBER: TokenType = TokenType::user(0);
const T_PLUS: TokenType = TokenType::user(1);
const T_MINUS: TokenType = TokenType::user(2);

#[derive(Debug, Clone, PartialEq)]
enum Calc {
    Value(i64),
    Bad(String),
}

impl Emitted for Calc {
    fn error_message(&self) -> Option<&str> {
        match self {
            Calc::Bad(message) => Some(message),
            _ => None,
        }
    }
}

fn lex_calc(l: &mut Lexer) -> Option<LexFn> {
    let ch = l.peek(1).expect("driver guarantees a peekable char");
    if ch.is_ascii_digit() {
        while l.can_peek(1).expect("can_peek") && l.peek(1).expect("peek").is_ascii_digit() {
            l.next().expect("next");
        }
        l.emit_token(T_NUMBER).expect("emit");
    } else if ch == '+' {
        l.next().expect("next");
        l.emit_token(T_PLUS).expect("emit");
    } else if ch == '-' {
        l.next().expect("next");
        l.emit_token(T_MINUS).expect("emit");
    } else if ch.is_whitespace() {
        l.next().expect("next");
        l.clear().expect("clear");
    } else {
        l.next().expect("next");
        l.emit_error("unexpected character").expect("emit_error");
    }
    Some(NextFn::new(lex_calc))
}

/// Folds `NUMBER ( ('+'|'-') NUMBER )*` left to right. Error tokens from the
/// lexing stage arrive as ordinary tokens and are re-emitted as [`Calc::Bad`].
fn parse_calc(p: &mut Parser<Calc>) -> Option<ParseFn<Calc>> {
    let first = p.next().expect("driver guarantees a peekable token");
    if first.is_error() {
        p.emit(Calc::Bad(first.text().to_string())).expect("emit");
        return Some(NextFn::new(parse_calc));
    }
    let mut total: i64 = first.text().parse().expect("number token");
    while p.can_peek(2).expect("can_peek") {
        let op = p.peek_type(1).expect("peek_type");
        if op != T_PLUS && op != T_MINUS {
            break;
        }
        if p.peek_type(2).expect("peek_type") != T_NUMBER {
            break;
        }
        p.next().expect("next");
        let rhs: i64 = p.next().expect("next").text().parse().expect("number token");
        if op == T_PLUS {
            total += rhs;
        } else {
            total -= rhs;
        }
    }
    p.emit(Calc::Value(total)).expect("emit");
    Some(NextFn::new(parse_calc))
}

#[test]
fn text_flows_through_both_stages() {
    let mut results = pipeline("1 + 2 - 4", NextFn::new(lex_calc), NextFn::new(parse_calc));
    assert_eq!(results.next(), Some(Ok(Calc::Value(-1))));
    assert_eq!(results.next(), None);
    assert_eq!(results.next(), None);
}

#[test]
fn empty_input_yields_an_empty_stream() {
    let mut results = pipeline("", NextFn::new(lex_calc), NextFn::new(parse_calc));
    assert_eq!(results.next(), None);
    assert_eq!(results.next(), None);
}

#[test]
fn lexer_error_tokens_cross_the_stage_boundary() {
    // The '#' becomes an error token; it reaches the parsing stage as a
    // token, is re-emitted, and neither stage's stream ends early.
    let mut results = pipeline("1 # 2", NextFn::new(lex_calc), NextFn::new(parse_calc));
    assert_eq!(results.next(), Some(Ok(Calc::Value(1))));
    assert_eq!(
        results.next(),
        Some(Err(Diagnostic::new("1:4: unexpected character")))
    );
    assert_eq!(results.next(), Some(Ok(Calc::Value(2))));
    assert_eq!(results.next(), None);
}

#[test]
fn reader_input_flows_through_the_pipeline() {
    let reader = std::io::Cursor::new(b"3 + \xff4".to_vec());
    let results: Vec<_> =
        pipeline_reader(reader, NextFn::new(lex_calc), NextFn::new(parse_calc)).collect();
    // The invalid byte is skipped before the lexing stage sees it
    assert_eq!(results, vec![Ok(Calc::Value(7))]);
}

#[test]
fn tokens_are_lexed_on_demand() {
    let lexed = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&lexed);
    let counting_lexer = NextFn::new(move |l: &mut Lexer| {
        counter.set(counter.get() + 1);
        lex_calc(l)
    });

    fn one_per_token(p: &mut Parser<Calc>) -> Option<ParseFn<Calc>> {
        let tok = p.next().expect("next");
        let n = tok.text().parse().expect("number token");
        p.emit(Calc::Value(n)).expect("emit");
        Some(NextFn::new(one_per_token))
    }

    let mut results = pipeline("1 2 3 4 5", counting_lexer, NextFn::new(one_per_token));
    assert_eq!(results.next(), Some(Ok(Calc::Value(1))));
    // Pulling one value only ran the lexing stage far enough for one token
    assert!(lexed.get() <= 2, "lexed {} steps", lexed.get());
    let rest: Vec<_> = results.map(|r| r.expect("ok")).collect();
    assert_eq!(rest.len(), 4);
}
