//! The standardizer rewrites the surface AST into the
//! five-node core (`lambda`, `gamma`, `tau`, `Y*`, conditional) by a
//! single post-order walk. Every surface operator -- arithmetic,
//! relational, boolean, `aug`, `@` -- desugars to `gamma` applications
//! of a named built-in, so the core tree never carries an operator
//! node of its own; only [`crate::construct::tree::Standardized`]'s
//! six variants exist past this stage, which is what makes a second
//! standardization pass a type error rather than a silent no-op.

use crate::common::error::Syntax;
use crate::common::span::{Span, Spanned};
use crate::construct::ast::{ArithOp, Binder, Node, RelOp};
use crate::construct::tree::Standardized;

type SResult<T> = Result<T, Syntax>;

fn lambda_chain(binders: Vec<Binder>, body: Spanned<Standardized>, span: Span) -> Spanned<Standardized> {
    let mut body = body;
    for binder in binders.into_iter().rev() {
        body = Spanned::new(Standardized::Lambda { binder, body: Box::new(body) }, span.clone());
    }
    body
}

fn gamma1(name: &str, arg: Spanned<Standardized>, span: Span) -> Spanned<Standardized> {
    let op = Spanned::new(Standardized::Ident(name.to_string()), span.clone());
    Spanned::new(Standardized::Gamma(Box::new(op), Box::new(arg)), span)
}

fn gamma2(name: &str, left: Spanned<Standardized>, right: Spanned<Standardized>, span: Span) -> Spanned<Standardized> {
    let op = Spanned::new(Standardized::Ident(name.to_string()), span.clone());
    let partial = Spanned::new(Standardized::Gamma(Box::new(op), Box::new(left)), span.clone());
    Spanned::new(Standardized::Gamma(Box::new(partial), Box::new(right)), span)
}

/// Standardizes a top-level program.
pub fn standardize(node: Spanned<Node>) -> SResult<Spanned<Standardized>> {
    expr(node)
}

fn expr(node: Spanned<Node>) -> SResult<Spanned<Standardized>> {
    let span = node.span.clone();
    match node.item {
        Node::Ident(name) => Ok(Spanned::new(Standardized::Ident(name), span)),
        Node::Int(n) => Ok(Spanned::new(Standardized::Int(n), span)),
        Node::Str(s) => Ok(Spanned::new(Standardized::Str(s), span)),
        Node::True => Ok(Spanned::new(Standardized::True, span)),
        Node::False => Ok(Spanned::new(Standardized::False, span)),
        Node::Nil => Ok(Spanned::new(Standardized::Nil, span)),
        Node::Dummy => Ok(Spanned::new(Standardized::Dummy, span)),

        Node::Let { defs, body } => {
            let (binder, value) = defs_pair(*defs)?;
            let body = expr(*body)?;
            let lambda = Spanned::new(Standardized::Lambda { binder, body: Box::new(body) }, span.clone());
            Ok(Spanned::new(Standardized::Gamma(Box::new(lambda), Box::new(value)), span))
        }

        Node::Fn { binders, body } => {
            let body = expr(*body)?;
            Ok(lambda_chain(binders, body, span))
        }

        Node::Where { body, defs } => {
            let (binder, value) = defs_pair(*defs)?;
            let body = expr(*body)?;
            let lambda = Spanned::new(Standardized::Lambda { binder, body: Box::new(body) }, span.clone());
            Ok(Spanned::new(Standardized::Gamma(Box::new(lambda), Box::new(value)), span))
        }

        Node::Tau(items) => {
            let items = items.into_iter().map(expr).collect::<SResult<Vec<_>>>()?;
            Ok(Spanned::new(Standardized::Tau(items), span))
        }

        Node::Aug { left, right } => Ok(gamma2("aug", expr(*left)?, expr(*right)?, span)),
        Node::BoolOr(left, right) => Ok(gamma2("or", expr(*left)?, expr(*right)?, span)),
        Node::BoolAnd(left, right) => Ok(gamma2("&", expr(*left)?, expr(*right)?, span)),
        Node::Not(inner) => Ok(gamma1("not", expr(*inner)?, span)),
        Node::Neg(inner) => Ok(gamma1("neg", expr(*inner)?, span)),

        Node::Rel { op, left, right } => Ok(gamma2(relop_name(op), expr(*left)?, expr(*right)?, span)),
        Node::Arith { op, left, right } => Ok(gamma2(arithop_name(op), expr(*left)?, expr(*right)?, span)),
        Node::At { left, op_name, right } => Ok(gamma2(&op_name, expr(*left)?, expr(*right)?, span)),

        Node::Gamma(rator, rand) => {
            Ok(Spanned::new(Standardized::Gamma(Box::new(expr(*rator)?), Box::new(expr(*rand)?)), span))
        }

        Node::Cond { guard, then_branch, else_branch } => Ok(Spanned::new(
            Standardized::Cond {
                guard: Box::new(expr(*guard)?),
                then_branch: Box::new(expr(*then_branch)?),
                else_branch: Box::new(expr(*else_branch)?),
            },
            span,
        )),

        // Definitions only ever appear inside `let`/`where`, handled above.
        Node::Equation { .. } | Node::FunctionForm { .. } | Node::DefAnd(_) | Node::Within { .. } | Node::Rec(_) => {
            Err(Syntax::standardization("a definition can only appear after `let` or before `where`", span))
        }
    }
}

/// Standardizes a `D`-family node into a single (binder, value) pair,
/// following the rewrite rules for `=`, `function_form`, `and`,
/// `within`, and `rec`.
fn defs_pair(node: Spanned<Node>) -> SResult<(Binder, Spanned<Standardized>)> {
    let span = node.span.clone();
    match node.item {
        Node::Equation { binder, value } => Ok((binder, expr(*value)?)),

        Node::FunctionForm { name, binders, body } => {
            let body = expr(*body)?;
            let lambda = lambda_chain(binders, body, span);
            Ok((Binder::Ident(name), lambda))
        }

        Node::DefAnd(items) => {
            let mut binders = Vec::with_capacity(items.len());
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let item_span = item.span.clone();
                let (binder, value) = defs_pair(item)?;
                binders.push(binder);
                values.push(Spanned::new(value.item, item_span));
            }
            Ok((Binder::Tuple(binders), Spanned::new(Standardized::Tau(values), span)))
        }

        Node::Within { first, second } => {
            let (first_binder, first_value) = defs_pair(*first)?;
            let (second_binder, second_value) = defs_pair(*second)?;
            let lambda = Spanned::new(
                Standardized::Lambda { binder: first_binder, body: Box::new(second_value) },
                span.clone(),
            );
            let value = Spanned::new(Standardized::Gamma(Box::new(lambda), Box::new(first_value)), span);
            Ok((second_binder, value))
        }

        Node::Rec(inner) => {
            let (binder, value) = defs_pair(*inner)?;
            let lambda = Spanned::new(
                Standardized::Lambda { binder: binder.clone(), body: Box::new(value) },
                span.clone(),
            );
            let y_star = Spanned::new(Standardized::YStar, span.clone());
            let tied = Spanned::new(Standardized::Gamma(Box::new(y_star), Box::new(lambda)), span);
            Ok((binder, tied))
        }

        _ => Err(Syntax::standardization("expected a definition (`=`, `and`, `within`, or `rec`)", span)),
    }
}

fn relop_name(op: RelOp) -> &'static str { op.lexeme() }
fn arithop_name(op: ArithOp) -> &'static str { op.lexeme() }

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;
    use crate::compiler::parse::Parser;

    fn standardized(src: &str) -> Standardized {
        let tokens = Lexer::lex(Source::source(src)).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        standardize(ast).unwrap().item
    }

    #[test]
    fn let_becomes_gamma_of_lambda() {
        let tree = standardized("let x = 1 in x");
        match tree {
            Standardized::Gamma(rator, rand) => {
                assert!(matches!(rator.item, Standardized::Lambda { .. }));
                assert!(matches!(rand.item, Standardized::Int(1)));
            }
            other => panic!("expected Gamma, got {:?}", other),
        }
    }

    #[test]
    fn curried_fn_becomes_nested_lambdas() {
        let tree = standardized("fn x y . x + y");
        match tree {
            Standardized::Lambda { binder: Binder::Ident(x), body } => {
                assert_eq!(x, "x");
                assert!(matches!(body.item, Standardized::Lambda { .. }));
            }
            other => panic!("expected nested Lambda, got {:?}", other),
        }
    }

    #[test]
    fn arithmetic_becomes_named_gamma() {
        let tree = standardized("1 + 2");
        match tree {
            Standardized::Gamma(rator, rand) => {
                match rator.item {
                    Standardized::Gamma(op, _left) => {
                        assert!(matches!(op.item, Standardized::Ident(ref n) if n == "+"));
                    }
                    other => panic!("expected nested Gamma, got {:?}", other),
                }
                assert!(matches!(rand.item, Standardized::Int(2)));
            }
            other => panic!("expected Gamma, got {:?}", other),
        }
    }

    #[test]
    fn rec_introduces_y_star() {
        let tree = standardized("let rec f x = f x in f");
        match tree {
            Standardized::Gamma(_, rand) => match rand.item {
                Standardized::Gamma(op, _) => assert!(matches!(op.item, Standardized::YStar)),
                other => panic!("expected Y* application, got {:?}", other),
            },
            other => panic!("expected Gamma, got {:?}", other),
        }
    }

    #[test]
    fn idempotence_does_not_typecheck() {
        // `standardize` takes `ast::Node`, not `tree::Standardized` --
        // there is no second call to make, which is the point.
        let _ = standardized("1");
    }
}
