//! Calculator demo.
//!
//! Reads expressions from stdin, one per line, and prints the computed
//! values. Grammar:
//!
//! ```text
//! input_exp:   ( id '=' )? general_exp
//! general_exp: operand ( operator operand )?
//! operand:     number | id | '(' general_exp ')'
//! operator:    '+' | '-' | '*' | '/'
//! number:      digit+ ( '.' digit+ )?
//! id:          alpha ( alpha | digit )*
//! ```
//!
//! `*` and `/` bind tighter than `+` and `-`. Assignments store the value in
//! a variable table instead of printing it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::rc::Rc;

use pipeline_core::{pipeline, Emitted, LexFn, Lexer, NextFn, ParseFn, Parser, TokenType};

const T_ID: TokenType = TokenType::user(0);
const T_NUMBER: TokenType = TokenType::user(1);
const T_PLUS: TokenType = TokenType::user(2);
const T_MINUS: TokenType = TokenType::user(3);
const T_MULTIPLY: TokenType = TokenType::user(4);
const T_DIVIDE: TokenType = TokenType::user(5);
const T_EQUALS: TokenType = TokenType::user(6);
const T_OPEN_PAREN: TokenType = TokenType::user(7);
const T_CLOSE_PAREN: TokenType = TokenType::user(8);

const SINGLE_CHARS: [(char, TokenType); 7] = [
    ('+', T_PLUS),
    ('-', T_MINUS),
    ('*', T_MULTIPLY),
    ('/', T_DIVIDE),
    ('=', T_EQUALS),
    ('(', T_OPEN_PAREN),
    (')', T_CLOSE_PAREN),
];

/// A computed expression value.
#[derive(Debug)]
struct Eval(f64);

impl Emitted for Eval {}

/// The variable table, shared between lines.
type Vars = Rc<RefCell<HashMap<String, f64>>>;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let vars: Vars = Rc::new(RefCell::new(HashMap::new()));
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let values = pipeline(line, NextFn::new(lex), parse_start(Rc::clone(&vars)));
        for result in values {
            match result {
                Ok(Eval(value)) => println!("{value}"),
                Err(diagnostic) => println!("{diagnostic}"),
            }
        }
    }
    Ok(())
}

// --- Lexing ---

fn lex(l: &mut Lexer) -> Option<LexFn> {
    let ch = l.peek(1).expect("driver guarantees a peekable char");

    if let Some((_, token_type)) = SINGLE_CHARS.iter().find(|(c, _)| *c == ch) {
        l.next().expect("next");
        l.emit_type(*token_type).expect("emit_type");
    } else if try_whitespace(l) {
        l.clear().expect("clear");
    } else if try_number(l) {
        l.emit_token(T_NUMBER).expect("emit");
    } else if try_id(l) {
        l.emit_token(T_ID).expect("emit");
    } else {
        let unknown = l.next().expect("next");
        l.clear().expect("clear");
        println!("unknown character: '{unknown}'");
    }

    Some(NextFn::new(lex))
}

fn try_whitespace(l: &mut Lexer) -> bool {
    try_pred(l, |c| c == ' ' || c == '\t')
}

fn try_digit(l: &mut Lexer) -> bool {
    try_pred(l, |c| c.is_ascii_digit())
}

fn try_alpha(l: &mut Lexer) -> bool {
    try_pred(l, |c| c.is_ascii_alphabetic())
}

fn try_alphanum(l: &mut Lexer) -> bool {
    try_pred(l, |c| c.is_ascii_alphanumeric())
}

fn try_char(l: &mut Lexer, want: char) -> bool {
    try_pred(l, |c| c == want)
}

fn try_pred(l: &mut Lexer, pred: impl Fn(char) -> bool) -> bool {
    if l.can_peek(1).expect("can_peek") && pred(l.peek(1).expect("peek")) {
        l.next().expect("next");
        return true;
    }
    false
}

/// Matches `[0-9]+ ( '.' [0-9]+ )?`, backtracking over a lone trailing dot.
fn try_number(l: &mut Lexer) -> bool {
    if try_digit(l) {
        while try_digit(l) {}
        let marker = l.mark();
        if try_char(l, '.') && try_digit(l) {
            while try_digit(l) {}
        } else {
            l.apply(&marker).expect("marker is fresh");
        }
        return true;
    }
    false
}

/// Matches `[a-zA-Z] [0-9a-zA-Z]*`.
fn try_id(l: &mut Lexer) -> bool {
    if try_alpha(l) {
        while try_alphanum(l) {}
        return true;
    }
    false
}

// --- Parsing ---

/// One pass per line: an assignment if the input starts `id '='`, otherwise
/// an evaluation whose result is emitted.
fn parse_start(vars: Vars) -> ParseFn<Eval> {
    NextFn::new(move |p: &mut Parser<Eval>| {
        let assignment = p.can_peek(3).expect("can_peek")
            && p.peek_type(1).expect("peek_type") == T_ID
            && p.peek_type(2).expect("peek_type") == T_EQUALS;
        if assignment {
            parse_assignment(p, &vars);
        } else {
            parse_evaluation(p, &vars);
        }
        None
    })
}

fn parse_assignment(p: &mut Parser<Eval>, vars: &Vars) {
    let id = p.next().expect("peek-matched id");
    p.next().expect("peek-matched '='");
    match parse_general_expression(p, vars) {
        Ok(value) => {
            if p.can_peek(1).expect("can_peek") {
                println!("expecting operator");
            } else {
                vars.borrow_mut().insert(id.text().to_string(), value);
            }
        }
        Err(message) => println!("{message}"),
    }
}

fn parse_evaluation(p: &mut Parser<Eval>, vars: &Vars) {
    match parse_general_expression(p, vars) {
        Ok(value) => {
            if p.can_peek(1).expect("can_peek") {
                println!("expecting operator");
            } else {
                p.emit(Eval(value)).expect("emit");
            }
        }
        Err(message) => println!("{message}"),
    }
}

fn parse_general_expression(p: &mut Parser<Eval>, vars: &Vars) -> Result<f64, String> {
    parse_additive_expression(p, vars)
}

/// Parses `expression ( ( '+' | '-' ) expression )?`.
fn parse_additive_expression(p: &mut Parser<Eval>, vars: &Vars) -> Result<f64, String> {
    let mut value = parse_multiplicative_expression(p, vars)?;
    if p.can_peek(1).expect("can_peek") {
        match p.peek_type(1).expect("peek_type") {
            t if t == T_PLUS => {
                p.next().expect("next");
                value += parse_additive_expression(p, vars)?;
            }
            t if t == T_MINUS => {
                p.next().expect("next");
                value -= parse_additive_expression(p, vars)?;
            }
            _ => {}
        }
    }
    Ok(value)
}

/// Parses `expression ( ( '*' | '/' ) expression )?`.
fn parse_multiplicative_expression(p: &mut Parser<Eval>, vars: &Vars) -> Result<f64, String> {
    let mut value = parse_operand(p, vars)?;
    if p.can_peek(1).expect("can_peek") {
        match p.peek_type(1).expect("peek_type") {
            t if t == T_MULTIPLY => {
                p.next().expect("next");
                value *= parse_multiplicative_expression(p, vars)?;
            }
            t if t == T_DIVIDE => {
                p.next().expect("next");
                value /= parse_multiplicative_expression(p, vars)?;
            }
            _ => {}
        }
    }
    Ok(value)
}

/// Parses `id | number | '(' expression ')'`, rewinding on failure so the
/// caller sees an unconsumed window.
fn parse_operand(p: &mut Parser<Eval>, vars: &Vars) -> Result<f64, String> {
    if !p.can_peek(1).expect("can_peek") {
        return Err("unexpected end of input, expecting operand".to_string());
    }

    let marker = p.mark();
    let result = match p.peek_type(1).expect("peek_type") {
        t if t == T_ID => {
            let id = p.next().expect("next");
            match vars.borrow().get(id.text()) {
                Some(value) => Ok(*value),
                None => Err(format!("id '{}' not defined", id.text())),
            }
        }
        t if t == T_NUMBER => {
            let number = p.next().expect("next");
            number
                .text()
                .parse::<f64>()
                .map_err(|err| format!("error parsing number '{}': {err}", number.text()))
        }
        t if t == T_OPEN_PAREN => {
            p.next().expect("next");
            parse_general_expression(p, vars).and_then(|value| {
                if p.can_peek(1).expect("can_peek")
                    && p.peek_type(1).expect("peek_type") == T_CLOSE_PAREN
                {
                    p.next().expect("next");
                    Ok(value)
                } else {
                    Err("unbalanced paren".to_string())
                }
            })
        }
        _ => Err("expecting operand".to_string()),
    };

    if result.is_err() && p.marker_valid(&marker) {
        p.apply(&marker).expect("marker is valid");
    }
    result
}
