//! Word-count example.
//!
//! Tokenizes a file (or stdin) into words, spaces, and newlines, then prints
//! the counts. Run with: `cargo run --example wordcount -- <file>`

use std::env;
use std::fs::File;
use std::io;

use lexer_framework::{lex_reader, LexFn, Lexer, NextFn, TokenType};

const T_SPACE: TokenType = TokenType::user(0);
const T_NEWLINE: TokenType = TokenType::user(1);
const T_WORD: TokenType = TokenType::user(2);

/// Matches three newline styles: "\n", "\r", "\r\n".
fn lex(l: &mut Lexer) -> Option<LexFn> {
    match l.peek(1).expect("driver guarantees a peekable char") {
        '\n' => {
            l.next().expect("next");
            l.emit_token(T_NEWLINE).expect("emit");
        }
        '\r' => {
            l.next().expect("next");
            if l.can_peek(1).expect("can_peek") && l.peek(1).expect("peek") == '\n' {
                l.next().expect("next");
            }
            l.emit_token(T_NEWLINE).expect("emit");
        }
        c if c.is_whitespace() => {
            l.next().expect("next");
            while l.can_peek(1).expect("can_peek") {
                let c = l.peek(1).expect("peek");
                if !c.is_whitespace() || c == '\n' || c == '\r' {
                    break;
                }
                l.next().expect("next");
            }
            l.emit_token(T_SPACE).expect("emit");
        }
        _ => {
            l.next().expect("next");
            while l.can_peek(1).expect("can_peek") && !l.peek(1).expect("peek").is_whitespace() {
                l.next().expect("next");
            }
            l.emit_token(T_WORD).expect("emit");
        }
    }
    Some(NextFn::new(lex))
}

fn main() -> io::Result<()> {
    let tokens = match env::args().nth(1) {
        Some(path) => lex_reader(File::open(path)?, NextFn::new(lex)),
        None => lex_reader(io::stdin(), NextFn::new(lex)),
    };

    let (mut chars, mut words, mut spaces, mut lines) = (0usize, 0usize, 0usize, 0usize);
    // Tracks whether the last line is missing its newline
    let mut empty_line = true;

    for result in tokens {
        let token = match result {
            Ok(token) => token,
            Err(diagnostic) => {
                eprintln!("{diagnostic}");
                continue;
            }
        };
        chars += token.text().chars().count();
        match token.token_type() {
            T_WORD => {
                words += 1;
                empty_line = false;
            }
            T_NEWLINE => {
                lines += 1;
                spaces += token.text().chars().count();
                empty_line = true;
            }
            T_SPACE => {
                spaces += token.text().chars().count();
                empty_line = false;
            }
            _ => unreachable!("lexer only emits word, space, and newline tokens"),
        }
    }
    if !empty_line {
        lines += 1;
    }

    println!("{words} words, {spaces} spaces, {lines} lines, {chars} chars");
    Ok(())
}
