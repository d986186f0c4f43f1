//! Mark/apply backtracking through the lexer facade.

use std::cell::Cell;
use std::rc::Rc;

use lexer_framework::{lex_str, LexFn, Lexer, NextFn, TokenType};

const T_NUMBER: TokenType = TokenType::user(0);

fn try_digit(l: &mut Lexer) -> bool {
    if l.can_peek(1).expect("can_peek") && l.peek(1).expect("peek").is_ascii_digit() {
        l.next().expect("next");
        return true;
    }
    false
}

fn try_char(l: &mut Lexer, want: char) -> bool {
    if l.can_peek(1).expect("can_peek") && l.peek(1).expect("peek") == want {
        l.next().expect("next");
        return true;
    }
    false
}

/// Matches `[0-9]+ ( '.' [0-9]+ )?`, backtracking over a lone trailing dot.
fn lex_number(l: &mut Lexer) -> Option<LexFn> {
    if try_digit(l) {
        while try_digit(l) {}
        let marker = l.mark();
        if try_char(l, '.') && try_digit(l) {
            while try_digit(l) {}
        } else {
            l.apply(&marker).expect("marker is fresh");
        }
        l.emit_token(T_NUMBER).expect("emit");
    } else {
        l.next().expect("next");
        l.emit_token(TokenType::UNKNOWN).expect("emit");
    }
    Some(NextFn::new(lex_number))
}

fn texts(input: &str) -> Vec<(TokenType, String)> {
    lex_str(input, NextFn::new(lex_number))
        .map(|r| {
            let t = r.expect("ok");
            (t.token_type(), t.text().to_string())
        })
        .collect()
}

#[test]
fn fractional_number_matches_whole() {
    assert_eq!(texts("3.14"), vec![(T_NUMBER, "3.14".to_string())]);
}

#[test]
fn trailing_dot_is_rewound_not_swallowed() {
    assert_eq!(
        texts("3."),
        vec![
            (T_NUMBER, "3".to_string()),
            (TokenType::UNKNOWN, ".".to_string()),
        ]
    );
}

#[test]
fn dot_without_fraction_digits_is_rewound() {
    assert_eq!(
        texts("12.x"),
        vec![
            (T_NUMBER, "12".to_string()),
            (TokenType::UNKNOWN, ".".to_string()),
            (TokenType::UNKNOWN, "x".to_string()),
        ]
    );
}

#[test]
fn apply_rewinds_to_the_first_peeked_char() {
    // Mark, consume three, apply: peek(1) sees the original first char again.
    let checked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&checked);
    let start = NextFn::new(move |l: &mut Lexer| {
        let marker = l.mark();
        let first = l.peek(1).expect("peek");
        l.next().expect("next");
        l.next().expect("next");
        l.next().expect("next");
        l.apply(&marker).expect("marker is fresh");
        assert_eq!(l.peek(1).expect("peek"), first);
        flag.set(true);
        None
    });
    let tokens: Vec<_> = lex_str("abc", start).collect();
    assert!(tokens.is_empty());
    assert!(checked.get());
}

#[test]
fn emit_invalidates_markers() {
    fn check(l: &mut Lexer) -> Option<LexFn> {
        let marker = l.mark();
        l.next().expect("next");
        l.emit_token(T_NUMBER).expect("emit");
        assert!(!l.marker_valid(&marker));
        assert!(l.apply(&marker).is_err());
        None
    }
    let tokens: Vec<_> = lex_str("1", NextFn::new(check)).collect();
    assert_eq!(tokens.len(), 1);
}

#[test]
fn clear_invalidates_markers() {
    fn check(l: &mut Lexer) -> Option<LexFn> {
        let marker = l.mark();
        l.next().expect("next");
        l.clear().expect("clear");
        assert!(!l.marker_valid(&marker));
        None
    }
    let tokens: Vec<_> = lex_str("a", NextFn::new(check)).collect();
    assert!(tokens.is_empty());
}

#[test]
fn marker_resumes_the_function_that_took_it() {
    // First pass consumes greedily and rewinds; the applied continuation is
    // this same function, which then emits one char per call.
    let passes = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&passes);
    let start = NextFn::new(move |l: &mut Lexer| {
        counter.set(counter.get() + 1);
        if counter.get() == 1 {
            let marker = l.mark();
            l.next().expect("next");
            l.next().expect("next");
            return l.apply(&marker).expect("marker is fresh");
        }
        l.next().expect("next");
        l.emit_token(T_NUMBER).expect("emit");
        None
    });
    let tokens: Vec<_> = lex_str("79", start)
        .map(|r| r.expect("ok"))
        .collect();
    assert_eq!(passes.get(), 2);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text(), "7");
}
