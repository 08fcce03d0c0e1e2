//! The compilation pipeline, one module per stage:
//!
//! ~> Source (string)
//! -> Tokens             : lex.rs
//! -> AST                : parse.rs
//! -> Standardized tree   : standardize.rs
//! -> Control (deltas)    : flatten.rs
//! ~> Run (result)        : vm::machine

pub mod lex;
pub mod parse;
pub mod standardize;
pub mod flatten;
