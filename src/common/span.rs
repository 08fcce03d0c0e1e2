use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    rc::Rc,
};

use crate::common::source::Source;

/// A region of a [`Source`], given as a byte offset and length. Spans
/// carry a reference to the `Source` they came from so they can never
/// be combined across files by mistake, and so error reporting can
/// recover the actual text and line/column numbers on demand.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Span {
    source: Option<Rc<Source>>,
    offset: usize,
    length: usize,
}

impl Span {
    pub fn new(source: &Rc<Source>, offset: usize, length: usize) -> Span {
        Span { source: Some(Rc::clone(source)), offset, length }
    }

    /// A zero-width span at a single point, e.g. end-of-file.
    pub fn point(source: &Rc<Source>, offset: usize) -> Span {
        Span { source: Some(Rc::clone(source)), offset, length: 0 }
    }

    /// The empty span: carries no source, combines as a no-op.
    pub fn empty() -> Span { Span { source: None, offset: 0, length: 0 } }

    pub fn is_empty(&self) -> bool { self.source.is_none() }

    /// The smallest span containing both `a` and `b`.
    pub fn combine(a: &Span, b: &Span) -> Span {
        if a.is_empty() { return b.clone(); }
        if b.is_empty() { return a.clone(); }

        if a.source != b.source {
            panic!("can not combine spans from two different sources");
        }

        let offset = a.offset.min(b.offset);
        let end = (a.offset + a.length).max(b.offset + b.length);
        Span::new(a.source.as_ref().unwrap(), offset, end - offset)
    }

    /// Folds `combine` over a sequence of spans.
    pub fn join(spans: impl IntoIterator<Item = Span>) -> Span {
        spans.into_iter().fold(Span::empty(), |acc, s| Span::combine(&acc, &s))
    }

    /// The literal text the span points at.
    pub fn contents(&self) -> String {
        let source = self.source.as_ref().expect("empty span has no contents");
        source.contents[self.offset..self.offset + self.length].to_string()
    }

    fn line_col(&self, offset: usize) -> (usize, usize) {
        let source = self.source.as_ref().expect("empty span has no location");
        let prefix = &source.contents[..offset.min(source.contents.len())];
        let line = prefix.matches('\n').count();
        let col = match prefix.rfind('\n') {
            Some(i) => offset - i - 1,
            None => offset,
        };
        (line, col)
    }

    /// Renders this span's location for diagnostics.
    pub fn format(&self) -> Formatted {
        let source = self.source.as_ref().expect("empty span can not be formatted");
        let (start_line, start_col) = self.line_col(self.offset);
        let end_offset = (self.offset + self.length).max(self.offset + 1);
        let (end_line, _) = self.line_col(end_offset.min(source.contents.len()));

        let all_lines: Vec<String> = source.contents.lines().map(str::to_string).collect();
        let clamped_end = end_line.min(all_lines.len().saturating_sub(1));
        let lines = all_lines[start_line.min(clamped_end)..=clamped_end].to_vec();

        Formatted {
            path: source.path.display().to_string(),
            start: start_line,
            start_col,
            end: end_line,
            length: self.length,
            lines,
        }
    }
}

/// A ready-to-print rendering of where a [`Span`] sits in its source.
pub struct Formatted {
    pub path: String,
    pub start: usize,
    pub start_col: usize,
    pub end: usize,
    pub length: usize,
    pub lines: Vec<String>,
}

impl Formatted {
    pub fn is_multiline(&self) -> bool { self.start != self.end }

    pub fn gutter_padding(&self) -> usize { (self.end + 1).to_string().len() }

    /// Number of carets to underline a single-line span with.
    pub fn carrots(&self) -> Option<usize> {
        if self.is_multiline() { None } else { Some(self.length.max(1)) }
    }
}

impl Display for Formatted {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let gutter = self.gutter_padding();
        writeln!(f, "In {}:{}:{}", self.path, self.start + 1, self.start_col + 1)?;
        writeln!(f, "{} |", " ".repeat(gutter))?;
        if let Some(line) = self.lines.first() {
            writeln!(f, "{} | {}", self.start + 1, line)?;
            if let Some(carrots) = self.carrots() {
                writeln!(
                    f,
                    "{} | {}{}",
                    " ".repeat(gutter),
                    " ".repeat(self.start_col),
                    "^".repeat(carrots),
                )?;
            }
        }
        Ok(())
    }
}

/// Wraps some item with the [`Span`] it was produced from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> { Spanned { item, span } }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned::new(f(self.item), self.span)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combination() {
        let source = Source::source("heck, that's awesome");
        let a = Span::new(&source, 0, 5);
        let b = Span::new(&source, 11, 2);
        assert_eq!(Span::combine(&a, &b), Span::new(&source, 0, 13));
    }

    #[test]
    fn span_and_contents() {
        let source = Source::source("hello, this is some text!");
        let spans = vec![
            Span::new(&source, 0, 8),
            Span::new(&source, 7, 5),
            Span::new(&source, 12, 4),
        ];
        let result = Span::new(&source, 0, 16);
        assert_eq!(Span::join(spans).contents(), result.contents());
    }

    #[test]
    fn line_col_tracks_newlines() {
        let source = Source::source("let x = 1\nin Print x");
        let span = Span::new(&source, 10, 2);
        let formatted = span.format();
        assert_eq!(formatted.start, 1);
        assert_eq!(formatted.start_col, 0);
    }
}
