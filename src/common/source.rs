use std::{fs, io, path::PathBuf, rc::Rc};

/// A piece of literal source code: its contents, plus the path it was
/// read from (used only for diagnostics). Sources without a path of
/// their own (e.g. inline test fixtures) point at `<anonymous>`.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
}

impl Source {
    /// Builds a `Source` from an already-loaded string and a path.
    pub fn new(contents: &str, path: &PathBuf) -> Rc<Source> {
        Rc::new(Source { contents: contents.to_string(), path: path.clone() })
    }

    /// Reads a file from disk into a `Source`.
    pub fn path(path: &PathBuf) -> io::Result<Rc<Source>> {
        let contents = fs::read_to_string(path)?;
        Ok(Source::new(&contents, path))
    }

    /// Builds an anonymous `Source` from a literal string, e.g. for
    /// tests and the snippet harness.
    pub fn source(contents: &str) -> Rc<Source> {
        Source::new(contents, &PathBuf::from("<anonymous>"))
    }
}
