//! The CLI driver: `rpal <filename> [-ast | -st]`.
//!
//! - no flag: run the program; `Print` output goes to stdout, the
//!   final value on the stack is never auto-printed.
//! - `-ast`: print the parsed-but-unstandardized AST and exit.
//! - `-st`: print the AST after standardization and exit.
//!
//! Exit codes: `0` success, `1` a `Syntax` error (lex/parse/
//! standardize), `2` a `Trace` error (runtime).

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use structopt::StructOpt;

use rpal::compiler::{flatten, lex, parse, standardize};
use rpal::{printer, vm, Source};

#[derive(StructOpt, Debug)]
#[structopt(name = "rpal", about = "An interpreter for RPAL.")]
struct Opt {
    /// The RPAL source file to interpret.
    file: PathBuf,

    /// `-ast` prints the parse tree and exits; `-st` prints it after
    /// standardization and exits. Omit to run the program.
    #[structopt(allow_hyphen_values = true)]
    mode: Option<String>,
}

fn main() -> ExitCode {
    let opt = Opt::from_args();

    let source = match Source::path(&opt.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: could not read '{}': {}", opt.file.display(), e);
            return ExitCode::from(1);
        }
    };

    let tokens = match lex::Lexer::lex(source) {
        Ok(tokens) => tokens,
        Err(syntax) => {
            eprintln!("{}", syntax);
            return ExitCode::from(1);
        }
    };

    let ast = match parse::Parser::parse(tokens) {
        Ok(ast) => ast,
        Err(syntax) => {
            eprintln!("{}", syntax);
            return ExitCode::from(1);
        }
    };

    if opt.mode.as_deref() == Some("-ast") {
        printer::print_ast(&ast, &mut io::stdout()).expect("could not write to stdout");
        return ExitCode::SUCCESS;
    }

    let standardized = match standardize::standardize(ast) {
        Ok(tree) => tree,
        Err(syntax) => {
            eprintln!("{}", syntax);
            return ExitCode::from(1);
        }
    };

    if opt.mode.as_deref() == Some("-st") {
        printer::print_standardized(&standardized, &mut io::stdout()).expect("could not write to stdout");
        return ExitCode::SUCCESS;
    }

    if let Some(other) = &opt.mode {
        eprintln!("Error: unrecognized flag '{}', expected '-ast' or '-st'", other);
        return ExitCode::from(1);
    }

    let control = flatten::flatten(standardized);
    let mut stdout = io::stdout();
    match vm::machine::run(&control, &mut stdout) {
        Ok(_) => {
            let _ = stdout.flush();
            ExitCode::SUCCESS
        }
        Err(trace) => {
            let _ = stdout.flush();
            eprintln!("{}", trace);
            ExitCode::from(2)
        }
    }
}
