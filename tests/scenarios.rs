//! Snippet tests for the RPAL pipeline as a whole. Each fixture under
//! `tests/fixtures/` opens
//! with a small `-- key: value` heading describing what the snippet
//! should do, mirroring how the rest of the pipeline's unit tests
//! drive whole-pipeline snippets inline.

use std::fs;
use std::path::Path;

use rpal::compiler::{flatten, lex, parse, standardize};
use rpal::{vm, Source};

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Success,
    Syntax,
    Trace,
}

impl Outcome {
    fn parse(value: &str) -> Outcome {
        match value {
            "success" => Outcome::Success,
            "syntax" => Outcome::Syntax,
            "trace" => Outcome::Trace,
            other => panic!("invalid outcome in fixture heading: '{}'", other),
        }
    }
}

struct Heading {
    outcome: Outcome,
    stdout: Option<String>,
}

/// Parses the `-- key: value` lines at the top of a fixture.
fn heading(contents: &str) -> Heading {
    let mut outcome = None;
    let mut stdout = None;

    for line in contents.lines() {
        if !line.starts_with("--") {
            break;
        }
        let body = line[2..].trim();
        let (key, value) = body.split_once(':').expect("missing colon in fixture heading");
        let value = value.trim().to_string();
        match key.trim() {
            "outcome" => outcome = Some(Outcome::parse(&value)),
            "stdout" => stdout = Some(value),
            other => panic!("unknown fixture heading key: '{}'", other),
        }
    }

    Heading { outcome: outcome.expect("fixture is missing an '-- outcome:' heading"), stdout }
}

/// Strips the leading `--`-prefixed heading lines, leaving the
/// program text the lexer should actually see.
fn strip_heading(contents: &str) -> String {
    contents
        .lines()
        .skip_while(|line| line.starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_fixture(path: &Path) {
    let contents = fs::read_to_string(path).expect("could not read fixture");
    let expected = heading(&contents);

    let source = Source::source(&strip_heading(&contents));

    let result = (|| -> Result<Vec<u8>, Outcome> {
        let tokens = lex::Lexer::lex(source).map_err(|_| Outcome::Syntax)?;
        let ast = parse::Parser::parse(tokens).map_err(|_| Outcome::Syntax)?;
        let tree = standardize::standardize(ast).map_err(|_| Outcome::Syntax)?;
        let control = flatten::flatten(tree);
        let mut out = Vec::new();
        vm::machine::run(&control, &mut out).map_err(|_| Outcome::Trace)?;
        Ok(out)
    })();

    match (result, expected.outcome) {
        (Ok(out), Outcome::Success) => {
            if let Some(want) = expected.stdout {
                let got = String::from_utf8(out).expect("non-UTF8 stdout");
                assert_eq!(got.trim_end_matches('\n'), want, "stdout mismatch for {}", path.display());
            }
        }
        (Ok(_), wanted) => panic!("{}: expected {:?}, program ran to completion", path.display(), wanted),
        (Err(got), wanted) => {
            assert_eq!(got, wanted, "{}: wrong failure kind", path.display());
        }
    }
}

#[test]
fn fixtures() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut paths: Vec<_> = fs::read_dir(&dir)
        .expect("could not read tests/fixtures")
        .map(|entry| entry.expect("could not read fixture entry").path())
        .collect();
    paths.sort();

    assert!(!paths.is_empty(), "no fixtures found under {}", dir.display());
    for path in paths {
        run_fixture(&path);
    }
}
