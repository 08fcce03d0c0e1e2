use std::fmt;

use crate::common::span::Span;

/// A compile-time error: lexical, parse, or standardization failure.
/// Carries the reason and the span of the offending text, per the
/// error taxonomy's "Lexical"/"Parse"/"Standardization" kinds.
#[derive(Debug, PartialEq, Eq)]
pub struct Syntax {
    kind: &'static str,
    reason: String,
    span: Span,
}

impl Syntax {
    pub fn lexical(reason: impl Into<String>, span: Span) -> Syntax {
        Syntax { kind: "Lexical", reason: reason.into(), span }
    }

    pub fn parse(reason: impl Into<String>, span: Span) -> Syntax {
        Syntax { kind: "Parse", reason: reason.into(), span }
    }

    pub fn standardization(reason: impl Into<String>, span: Span) -> Syntax {
        Syntax { kind: "Standardization", reason: reason.into(), span }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.span.format())?;
        write!(f, "{} error: {}", self.kind, self.reason)
    }
}

/// A runtime error raised by the CSE machine: unbound identifier,
/// type mismatch, arity mismatch, division by zero, and so on, per
/// the error taxonomy's "Runtime" kind.
#[derive(Debug, PartialEq, Eq)]
pub struct Trace {
    reason: String,
    span: Option<Span>,
}

impl Trace {
    pub fn error(reason: impl Into<String>, span: Option<Span>) -> Trace {
        Trace { reason: reason.into(), span }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            if !span.is_empty() {
                write!(f, "{}", span.format())?;
            }
        }
        write!(f, "Runtime error: {}", self.reason)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;

    #[test]
    fn syntax_message() {
        let source = Source::source("x = \"Hello, world\" -> y + 1");
        let error = Syntax::parse("unexpected token '\"Hello, world\"'", Span::new(&source, 4, 14));
        let rendered = format!("{}", error);
        assert!(rendered.contains("Parse error"));
        assert!(rendered.contains("unexpected token"));
    }

    #[test]
    fn trace_without_span() {
        let error = Trace::error("division by zero", None);
        assert_eq!(format!("{}", error), "Runtime error: division by zero");
    }
}
