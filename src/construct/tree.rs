use std::fmt;

use crate::common::span::Spanned;
use crate::construct::ast::Binder;

/// A node of the standardized core tree: every surface
/// construct reduces to one of lambda, gamma, tau, `Y*`, the
/// conditional, or a terminal. This is a distinct type from
/// [`crate::construct::ast::Node`] so that running the standardizer a
/// second time on its own output does not typecheck -- the rewrite
/// table has nothing left to match.
#[derive(Debug, Clone, PartialEq)]
pub enum Standardized {
    Ident(String),
    Int(i64),
    Str(String),
    True,
    False,
    Nil,
    Dummy,
    /// Function application.
    Gamma(Box<Spanned<Standardized>>, Box<Spanned<Standardized>>),
    /// A single-binder abstraction. Multi-argument `fn`s are curried
    /// into nested `Lambda`s during standardization (§4.3 rule for
    /// `fn`).
    Lambda { binder: Binder, body: Box<Spanned<Standardized>> },
    Tau(Vec<Spanned<Standardized>>),
    /// The fixed-point combinator, introduced by the `rec` rewrite.
    YStar,
    Cond {
        guard: Box<Spanned<Standardized>>,
        then_branch: Box<Spanned<Standardized>>,
        else_branch: Box<Spanned<Standardized>>,
    },
}

impl Standardized {
    pub fn label(&self) -> String {
        match self {
            Standardized::Ident(name) => format!("<IDENT:{}>", name),
            Standardized::Int(n) => format!("<INT:{}>", n),
            Standardized::Str(s) => format!("<STR:{}>", s),
            Standardized::True => "<true>".to_string(),
            Standardized::False => "<false>".to_string(),
            Standardized::Nil => "<nil>".to_string(),
            Standardized::Dummy => "<dummy>".to_string(),
            Standardized::Gamma(..) => "gamma".to_string(),
            Standardized::Lambda { binder, .. } => format!("lambda({})", binder),
            Standardized::Tau(_) => "tau".to_string(),
            Standardized::YStar => "<Y*>".to_string(),
            Standardized::Cond { .. } => "->".to_string(),
        }
    }

    pub fn children(&self) -> Vec<&Spanned<Standardized>> {
        match self {
            Standardized::Ident(_)
            | Standardized::Int(_)
            | Standardized::Str(_)
            | Standardized::True
            | Standardized::False
            | Standardized::Nil
            | Standardized::Dummy
            | Standardized::YStar => vec![],
            Standardized::Gamma(a, b) => vec![a, b],
            Standardized::Lambda { body, .. } => vec![body],
            Standardized::Tau(items) => items.iter().collect(),
            Standardized::Cond { guard, then_branch, else_branch } => vec![guard, then_branch, else_branch],
        }
    }
}

impl fmt::Display for Standardized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
