//! # RPAL
//! This crate implements an interpreter for RPAL (Right-reference
//! Pedagogic Algorithmic Language): a recursive-descent parser, a
//! tree standardizer, a control flattener, and a Control-Stack-
//! Environment (CSE) machine.
//!
//! ## Overview of the pipeline
//!
//! Source text is represented as a [`common::source::Source`]. Regions
//! of source are marked with [`common::span::Span`]s, which carry a
//! reference-counted pointer back to the `Source` they came from so
//! errors can recover line/column information on demand.
//!
//! Compilation steps -- lexing, parsing, standardizing -- can raise
//! `Err(common::error::Syntax)`. The first phase is lexing: the
//! `compiler::lex::Lexer` regex-matches the longest token at each
//! offset and produces a spanned token stream.
//!
//! The next phase is parsing: `compiler::parse::Parser` is a
//! recursive-descent parser with one token of lookahead, building a
//! [`construct::ast::Node`] tree over the fixed node alphabet.
//!
//! The AST is then standardized by `compiler::standardize`, which
//! rewrites every surface construct (`let`, `where`, `fn`,
//! `function_form`, `within`, `and`, `rec`, `@`, and every operator)
//! into the five-node core -- `lambda`, `gamma`, `tau`, `Y*`, and the
//! conditional -- represented by [`construct::tree::Standardized`].
//!
//! `compiler::flatten` then compiles the standardized tree into a
//! table of linear control sequences ("deltas"), one per lambda body
//! and one per conditional arm, so the evaluator below never walks a
//! tree at run time.
//!
//! ## Execution
//!
//! The `vm::machine::Machine` can raise `Err(common::error::Trace)` if
//! it encounters a runtime error. It holds a control stack, a value
//! stack, and a pointer into an arena of [`vm::env::Environment`]
//! frames, applying [`builtins`] as it goes.
//!
//! ```
//! use rpal::common::source::Source;
//! use rpal::compiler::{lex, parse, standardize, flatten};
//! use rpal::vm::machine;
//!
//! let tokens = lex::Lexer::lex(Source::source("let x = 1 in x + 1")).unwrap();
//! let ast = parse::Parser::parse(tokens).unwrap();
//! let tree = standardize::standardize(ast).unwrap();
//! let control = flatten::flatten(tree);
//! let mut out = std::io::sink();
//! let result = machine::run(&control, &mut out).unwrap();
//! assert_eq!(result.to_string(), "2");
//! ```

pub mod common;
pub mod construct;
pub mod compiler;
pub mod builtins;
pub mod vm;
pub mod printer;

use std::io::Write;
use std::rc::Rc;

pub use common::error::{Syntax, Trace};
pub use common::source::Source;

/// Runs a complete program end to end: lex, parse, standardize,
/// flatten, evaluate. `Print` output is written to `out` as the
/// machine executes it.
pub fn run(source: Rc<Source>, out: &mut dyn Write) -> Result<common::data::Value, String> {
    let tokens = compiler::lex::Lexer::lex(source).map_err(|e| e.to_string())?;
    let ast = compiler::parse::Parser::parse(tokens).map_err(|e| e.to_string())?;
    let tree = compiler::standardize::standardize(ast).map_err(|e| e.to_string())?;
    let control = compiler::flatten::flatten(tree);
    vm::machine::run(&control, out).map_err(|e| e.to_string())
}
