//! Recursive-descent parser: one token of
//! lookahead, no backtracking. Each grammar production below is a
//! method named after its non-terminal; the precedence cascade from
//! `e` down to `rn` mirrors the grammar directly so that a grammar
//! change maps to a one-method change here.

use crate::common::error::Syntax;
use crate::common::span::{Span, Spanned};
use crate::construct::ast::{ArithOp, Binder, Node, RelOp};
use crate::construct::token::{Token, Tokens};

pub struct Parser {
    tokens: Tokens,
    position: usize,
}

type PResult<T> = Result<T, Syntax>;

impl Parser {
    pub fn new(tokens: Tokens) -> Parser {
        Parser { tokens, position: 0 }
    }

    /// Parses a complete program: a single expression followed by
    /// end-of-input.
    pub fn parse(tokens: Tokens) -> PResult<Spanned<Node>> {
        let mut parser = Parser::new(tokens);
        let expression = parser.e()?;
        parser.expect_end()?;
        Ok(expression)
    }

    // --- token-stream plumbing ---

    fn peek(&self) -> &Spanned<Token> {
        &self.tokens[self.position]
    }

    fn advance(&mut self) -> Spanned<Token> {
        let token = self.tokens[self.position].clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> Syntax {
        let found = self.peek();
        Syntax::parse(format!("expected {}, found {}", expected, found.item), found.span.clone())
    }

    fn expect_end(&mut self) -> PResult<()> {
        match self.peek().item {
            Token::End => Ok(()),
            _ => Err(self.unexpected("end of input")),
        }
    }

    fn at_keyword(&self, word: &str) -> bool {
        matches!(&self.peek().item, Token::Keyword(k) if k == word)
    }

    fn at_operator(&self, op: &str) -> bool {
        matches!(&self.peek().item, Token::Operator(o) if o == op)
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(&self.peek().item, Token::Punctuation(p2) if p2 == p)
    }

    fn eat_keyword(&mut self, word: &str) -> PResult<Span> {
        if self.at_keyword(word) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("keyword `{}`", word)))
        }
    }

    fn eat_operator(&mut self, op: &str) -> PResult<Span> {
        if self.at_operator(op) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("operator `{}`", op)))
        }
    }

    fn eat_punct(&mut self, p: &str) -> PResult<Span> {
        if self.at_punct(p) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(&format!("`{}`", p)))
        }
    }

    fn eat_identifier(&mut self) -> PResult<Spanned<String>> {
        match self.peek().item.clone() {
            Token::Identifier(name) => {
                let span = self.advance().span;
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    // --- E: expressions ---

    fn e(&mut self) -> PResult<Spanned<Node>> {
        if self.at_keyword("let") {
            let start = self.eat_keyword("let")?;
            let defs = self.d()?;
            self.eat_keyword("in")?;
            let body = self.e()?;
            let span = Span::combine(&start, &body.span);
            return Ok(Spanned::new(
                Node::Let { defs: Box::new(defs), body: Box::new(body) },
                span,
            ));
        }

        if self.at_keyword("fn") {
            let start = self.eat_keyword("fn")?;
            let mut binders = vec![self.vb()?];
            while self.at_punct("(") || matches!(self.peek().item, Token::Identifier(_)) {
                binders.push(self.vb()?);
            }
            self.eat_operator(".")?;
            let body = self.e()?;
            let span = Span::combine(&start, &body.span);
            return Ok(Spanned::new(Node::Fn { binders, body: Box::new(body) }, span));
        }

        self.ew()
    }

    fn ew(&mut self) -> PResult<Spanned<Node>> {
        let body = self.t()?;
        if self.at_keyword("where") {
            self.eat_keyword("where")?;
            let defs = self.dr()?;
            let span = Span::combine(&body.span, &defs.span);
            return Ok(Spanned::new(Node::Where { body: Box::new(body), defs: Box::new(defs) }, span));
        }
        Ok(body)
    }

    fn t(&mut self) -> PResult<Spanned<Node>> {
        let first = self.ta()?;
        if !self.at_punct(",") {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.at_punct(",") {
            self.eat_punct(",")?;
            items.push(self.ta()?);
        }
        let span = Span::join(items.iter().map(|i| i.span.clone()));
        Ok(Spanned::new(Node::Tau(items), span))
    }

    fn ta(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.tc()?;
        while self.at_keyword("aug") {
            self.eat_keyword("aug")?;
            let right = self.tc()?;
            let span = Span::combine(&left.span, &right.span);
            left = Spanned::new(Node::Aug { left: Box::new(left), right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn tc(&mut self) -> PResult<Spanned<Node>> {
        let guard = self.b()?;
        if self.at_operator("->") {
            self.eat_operator("->")?;
            let then_branch = self.tc()?;
            self.eat_operator("|")?;
            let else_branch = self.tc()?;
            let span = Span::combine(&guard.span, &else_branch.span);
            return Ok(Spanned::new(
                Node::Cond {
                    guard: Box::new(guard),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                span,
            ));
        }
        Ok(guard)
    }

    fn b(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.bt()?;
        while self.at_keyword("or") {
            self.eat_keyword("or")?;
            let right = self.bt()?;
            let span = Span::combine(&left.span, &right.span);
            left = Spanned::new(Node::BoolOr(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn bt(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.bs()?;
        while self.at_operator("&") {
            self.eat_operator("&")?;
            let right = self.bs()?;
            let span = Span::combine(&left.span, &right.span);
            left = Spanned::new(Node::BoolAnd(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn bs(&mut self) -> PResult<Spanned<Node>> {
        if self.at_keyword("not") {
            let start = self.eat_keyword("not")?;
            let inner = self.bp()?;
            let span = Span::combine(&start, &inner.span);
            return Ok(Spanned::new(Node::Not(Box::new(inner)), span));
        }
        self.bp()
    }

    fn relop(&self) -> Option<RelOp> {
        match &self.peek().item {
            Token::Keyword(k) => match k.as_str() {
                "gr" => Some(RelOp::Gr),
                "ge" => Some(RelOp::Ge),
                "ls" => Some(RelOp::Ls),
                "le" => Some(RelOp::Le),
                "eq" => Some(RelOp::Eq),
                "ne" => Some(RelOp::Ne),
                _ => None,
            },
            Token::Operator(o) => match o.as_str() {
                ">" => Some(RelOp::Gr),
                ">=" => Some(RelOp::Ge),
                "<" => Some(RelOp::Ls),
                "<=" => Some(RelOp::Le),
                _ => None,
            },
            _ => None,
        }
    }

    fn bp(&mut self) -> PResult<Spanned<Node>> {
        let left = self.a()?;
        if let Some(op) = self.relop() {
            self.advance();
            let right = self.a()?;
            let span = Span::combine(&left.span, &right.span);
            return Ok(Spanned::new(Node::Rel { op, left: Box::new(left), right: Box::new(right) }, span));
        }
        Ok(left)
    }

    fn a(&mut self) -> PResult<Spanned<Node>> {
        let mut left = if self.at_operator("+") {
            self.eat_operator("+")?;
            self.at_()?
        } else if self.at_operator("-") {
            let start = self.eat_operator("-")?;
            let inner = self.at_()?;
            let span = Span::combine(&start, &inner.span);
            Spanned::new(Node::Neg(Box::new(inner)), span)
        } else {
            self.at_()?
        };

        loop {
            if self.at_operator("+") {
                self.eat_operator("+")?;
                let right = self.at_()?;
                let span = Span::combine(&left.span, &right.span);
                left = Spanned::new(Node::Arith { op: ArithOp::Add, left: Box::new(left), right: Box::new(right) }, span);
            } else if self.at_operator("-") {
                self.eat_operator("-")?;
                let right = self.at_()?;
                let span = Span::combine(&left.span, &right.span);
                left = Spanned::new(Node::Arith { op: ArithOp::Sub, left: Box::new(left), right: Box::new(right) }, span);
            } else {
                break;
            }
        }
        Ok(left)
    }

    /// `At`, named `at_` to avoid clashing with the `@` node (`At`).
    fn at_(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.af()?;
        loop {
            if self.at_operator("*") {
                self.eat_operator("*")?;
                let right = self.af()?;
                let span = Span::combine(&left.span, &right.span);
                left = Spanned::new(Node::Arith { op: ArithOp::Mul, left: Box::new(left), right: Box::new(right) }, span);
            } else if self.at_operator("/") {
                self.eat_operator("/")?;
                let right = self.af()?;
                let span = Span::combine(&left.span, &right.span);
                left = Spanned::new(Node::Arith { op: ArithOp::Div, left: Box::new(left), right: Box::new(right) }, span);
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn af(&mut self) -> PResult<Spanned<Node>> {
        let left = self.ap()?;
        if self.at_operator("**") {
            self.eat_operator("**")?;
            let right = self.af()?;
            let span = Span::combine(&left.span, &right.span);
            return Ok(Spanned::new(Node::Arith { op: ArithOp::Pow, left: Box::new(left), right: Box::new(right) }, span));
        }
        Ok(left)
    }

    fn ap(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.r()?;
        while self.at_operator("@") {
            self.eat_operator("@")?;
            let name = self.eat_identifier()?;
            let right = self.r()?;
            let span = Span::combine(&left.span, &right.span);
            left = Spanned::new(Node::At { left: Box::new(left), op_name: name.item, right: Box::new(right) }, span);
        }
        Ok(left)
    }

    fn r(&mut self) -> PResult<Spanned<Node>> {
        let mut left = self.rn()?;
        while self.starts_rn() {
            let right = self.rn()?;
            let span = Span::combine(&left.span, &right.span);
            left = Spanned::new(Node::Gamma(Box::new(left), Box::new(right)), span);
        }
        Ok(left)
    }

    fn starts_rn(&self) -> bool {
        matches!(
            &self.peek().item,
            Token::Identifier(_) | Token::Integer(_) | Token::Str(_)
        ) || self.at_keyword("true")
            || self.at_keyword("false")
            || self.at_keyword("nil")
            || self.at_keyword("dummy")
            || self.at_punct("(")
    }

    fn rn(&mut self) -> PResult<Spanned<Node>> {
        let token = self.peek().clone();
        match token.item {
            Token::Identifier(name) => {
                self.advance();
                Ok(Spanned::new(Node::Ident(name), token.span))
            }
            Token::Integer(digits) => {
                self.advance();
                let value: i64 = digits.parse().map_err(|_| {
                    Syntax::lexical(format!("integer literal out of range: {}", digits), token.span.clone())
                })?;
                Ok(Spanned::new(Node::Int(value), token.span))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Spanned::new(Node::Str(s), token.span))
            }
            Token::Keyword(ref k) if k == "true" => {
                self.advance();
                Ok(Spanned::new(Node::True, token.span))
            }
            Token::Keyword(ref k) if k == "false" => {
                self.advance();
                Ok(Spanned::new(Node::False, token.span))
            }
            Token::Keyword(ref k) if k == "nil" => {
                self.advance();
                Ok(Spanned::new(Node::Nil, token.span))
            }
            Token::Keyword(ref k) if k == "dummy" => {
                self.advance();
                Ok(Spanned::new(Node::Dummy, token.span))
            }
            Token::Punctuation(ref p) if p == "(" => {
                self.advance();
                let inner = self.e()?;
                self.eat_punct(")")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an identifier, literal, or parenthesized expression")),
        }
    }

    // --- D: definitions ---

    fn d(&mut self) -> PResult<Spanned<Node>> {
        let first = self.da()?;
        if self.at_keyword("within") {
            self.eat_keyword("within")?;
            let second = self.d()?;
            let span = Span::combine(&first.span, &second.span);
            return Ok(Spanned::new(Node::Within { first: Box::new(first), second: Box::new(second) }, span));
        }
        Ok(first)
    }

    fn da(&mut self) -> PResult<Spanned<Node>> {
        let first = self.dr()?;
        if !self.at_keyword("and") {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.at_keyword("and") {
            self.eat_keyword("and")?;
            items.push(self.dr()?);
        }
        let span = Span::join(items.iter().map(|i| i.span.clone()));
        Ok(Spanned::new(Node::DefAnd(items), span))
    }

    fn dr(&mut self) -> PResult<Spanned<Node>> {
        if self.at_keyword("rec") {
            let start = self.eat_keyword("rec")?;
            let inner = self.db()?;
            let span = Span::combine(&start, &inner.span);
            return Ok(Spanned::new(Node::Rec(Box::new(inner)), span));
        }
        if self.at_punct("(") {
            self.eat_punct("(")?;
            let inner = self.d()?;
            self.eat_punct(")")?;
            return Ok(inner);
        }
        self.db()
    }

    fn db(&mut self) -> PResult<Spanned<Node>> {
        let name = self.eat_identifier()?;

        if self.at_punct(",") {
            let mut binders = vec![Binder::Ident(name.item)];
            while self.at_punct(",") {
                self.eat_punct(",")?;
                binders.push(Binder::Ident(self.eat_identifier()?.item));
            }
            self.eat_operator("=")?;
            let value = self.e()?;
            let span = Span::combine(&name.span, &value.span);
            return Ok(Spanned::new(Node::Equation { binder: Binder::Tuple(binders), value: Box::new(value) }, span));
        }

        if self.at_operator("=") {
            self.eat_operator("=")?;
            let value = self.e()?;
            let span = Span::combine(&name.span, &value.span);
            return Ok(Spanned::new(Node::Equation { binder: Binder::Ident(name.item), value: Box::new(value) }, span));
        }

        // Otherwise this is a function_form: IDENT Vb+ '=' E.
        let mut binders = vec![self.vb()?];
        while self.at_punct("(") || matches!(self.peek().item, Token::Identifier(_)) {
            binders.push(self.vb()?);
        }
        self.eat_operator("=")?;
        let body = self.e()?;
        let span = Span::combine(&name.span, &body.span);
        Ok(Spanned::new(Node::FunctionForm { name: name.item, binders, body: Box::new(body) }, span))
    }

    fn vb(&mut self) -> PResult<Binder> {
        if self.at_punct("(") {
            self.eat_punct("(")?;
            if self.at_punct(")") {
                self.eat_punct(")")?;
                return Ok(Binder::Empty);
            }
            let mut binders = vec![Binder::Ident(self.eat_identifier()?.item)];
            while self.at_punct(",") {
                self.eat_punct(",")?;
                binders.push(Binder::Ident(self.eat_identifier()?.item));
            }
            self.eat_punct(")")?;
            if binders.len() == 1 {
                return Ok(binders.remove(0));
            }
            return Ok(Binder::Tuple(binders));
        }
        Ok(Binder::Ident(self.eat_identifier()?.item))
    }
}
