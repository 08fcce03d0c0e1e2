//! Regex-driven tokenization. Every token class is
//! matched at the current offset by trying a fixed, priority-ordered
//! table of compiled patterns; the first to match wins, so longer or
//! more specific alternatives (strings, multi-character operators)
//! must be listed ahead of anything they could be confused with.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::error::Syntax;
use crate::common::source::Source;
use crate::common::span::{Span, Spanned};
use crate::construct::token::{Token, Tokens, KEYWORDS};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[ \t\r\n]+|//[^\n]*)+").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
static STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")"#).unwrap());
static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\*\*|->|>=|<=|[+\-*/&.@=|><])").unwrap());
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[(),;]").unwrap());

/// Un-escapes the body of a string literal: `\n`, `\t`, `\\`, `\"`, `\'`.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

pub struct Lexer {
    source: Rc<Source>,
    offset: usize,
}

impl Lexer {
    pub fn new(source: Rc<Source>) -> Lexer {
        Lexer { source, offset: 0 }
    }

    /// Tokenizes a whole source, returning a spanned token stream
    /// terminated by a single [`Token::End`].
    pub fn lex(source: Rc<Source>) -> Result<Tokens, Syntax> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Tokens::new();

        loop {
            lexer.skip_trivia();
            if lexer.remaining().is_empty() {
                tokens.push(Spanned::new(Token::End, Span::point(&lexer.source, lexer.offset)));
                break;
            }

            let (token, consumed) = lexer.next_token()?;
            let span = Span::new(&lexer.source, lexer.offset, consumed);
            tokens.push(Spanned::new(token, span));
            lexer.offset += consumed;
        }

        Ok(tokens)
    }

    fn remaining(&self) -> &str { &self.source.contents[self.offset..] }

    fn skip_trivia(&mut self) {
        if let Some(m) = WHITESPACE.find(self.remaining()) {
            self.offset += m.end();
        }
    }

    fn next_token(&self) -> Result<(Token, usize), Syntax> {
        let rest = self.remaining();

        if let Some(m) = STRING.find(rest) {
            let inner = &m.as_str()[1..m.as_str().len() - 1];
            return Ok((Token::Str(unescape(inner)), m.end()));
        }
        if let Some(m) = INTEGER.find(rest) {
            return Ok((Token::Integer(m.as_str().to_string()), m.end()));
        }
        if let Some(m) = IDENTIFIER.find(rest) {
            let text = m.as_str().to_string();
            let token = if KEYWORDS.contains(&text.as_str()) {
                Token::Keyword(text)
            } else {
                Token::Identifier(text)
            };
            return Ok((token, m.end()));
        }
        if let Some(m) = OPERATOR.find(rest) {
            return Ok((Token::Operator(m.as_str().to_string()), m.end()));
        }
        if let Some(m) = PUNCTUATION.find(rest) {
            return Ok((Token::Punctuation(m.as_str().to_string()), m.end()));
        }

        let bad = rest.chars().next().unwrap();
        Err(Syntax::lexical(
            format!("unrecognized character '{}'", bad),
            Span::new(&self.source, self.offset, bad.len_utf8()),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        Lexer::lex(Source::source(src)).unwrap().into_iter().map(|s| s.item).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = kinds("let x = 1 in x");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword("let".into()),
                Token::Identifier("x".into()),
                Token::Operator("=".into()),
                Token::Integer("1".into()),
                Token::Keyword("in".into()),
                Token::Identifier("x".into()),
                Token::End,
            ]
        );
    }

    #[test]
    fn string_with_escapes() {
        let tokens = kinds(r#" "a\nb" "#);
        assert_eq!(tokens, vec![Token::Str("a\nb".to_string()), Token::End]);
    }

    #[test]
    fn single_quoted_string() {
        let tokens = kinds("'Hello, World!'");
        assert_eq!(tokens, vec![Token::Str("Hello, World!".to_string()), Token::End]);
    }

    #[test]
    fn comment_is_skipped() {
        let tokens = kinds("x // this is a comment\n+ 1");
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("x".into()),
                Token::Operator("+".into()),
                Token::Integer("1".into()),
                Token::End,
            ]
        );
    }

    #[test]
    fn double_star_is_one_token() {
        let tokens = kinds("2 ** 3");
        assert_eq!(
            tokens,
            vec![
                Token::Integer("2".into()),
                Token::Operator("**".into()),
                Token::Integer("3".into()),
                Token::End,
            ]
        );
    }

    #[test]
    fn unrecognized_character_errors() {
        let result = Lexer::lex(Source::source("x ` y"));
        assert!(result.is_err());
    }
}
