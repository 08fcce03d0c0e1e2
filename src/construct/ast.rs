use std::fmt;

use crate::common::span::Spanned;

/// A binder spec: the left-hand side of a binding, a lambda parameter,
/// or a `within`/`and` target. Corresponds to the grammar's `Vb` and
/// to the "comma binder" production of `Db`.
/// A binder nests: a comma-binder destructures one tuple value
/// position-by-position against its own sub-binders, which lets the
/// same mechanism serve plain identifiers (`x`), tuple parameters
/// (`(x, y)`), and the combined binder synthesized for simultaneous
/// `and` definitions (`(x, y) = (E1, E2)`, where `x` or `y` might
/// itself be a nested tuple binder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binder {
    /// A single identifier.
    Ident(String),
    /// `(B1, ..., Bk)`, a tuple-destructuring binder, k >= 2.
    Tuple(Vec<Binder>),
    /// `()`, the empty binder.
    Empty,
}

impl fmt::Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binder::Ident(name) => write!(f, "{}", name),
            Binder::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Binder::Empty => write!(f, "()"),
        }
    }
}

#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
}

impl RelOp {
    pub fn lexeme(self) -> &'static str {
        match self {
            RelOp::Gr => "gr",
            RelOp::Ge => "ge",
            RelOp::Ls => "ls",
            RelOp::Le => "le",
            RelOp::Eq => "eq",
            RelOp::Ne => "ne",
        }
    }
}

#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl ArithOp {
    pub fn lexeme(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Pow => "**",
        }
    }
}

/// A node of the pre-standardization Abstract Syntax Tree. Every
/// internal kind's arity matches the grammar it was parsed from;
/// terminal variants have no children by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Terminals
    Ident(String),
    Int(i64),
    Str(String),
    True,
    False,
    Nil,
    Dummy,

    // `'let' D 'in' E`
    Let { defs: Box<Spanned<Node>>, body: Box<Spanned<Node>> },
    // `'fn' Vb+ '.' E`
    Fn { binders: Vec<Binder>, body: Box<Spanned<Node>> },
    // `Ew -> T ('where' Dr)?`
    Where { body: Box<Spanned<Node>>, defs: Box<Spanned<Node>> },
    // `T -> Ta (',' Ta)+`, N >= 2
    Tau(Vec<Spanned<Node>>),
    // `Ta 'aug' Tc`
    Aug { left: Box<Spanned<Node>>, right: Box<Spanned<Node>> },
    // `B '->' Tc '|' Tc`
    Cond {
        guard: Box<Spanned<Node>>,
        then_branch: Box<Spanned<Node>>,
        else_branch: Box<Spanned<Node>>,
    },
    // `B 'or' Bt`
    BoolOr(Box<Spanned<Node>>, Box<Spanned<Node>>),
    // `Bt '&' Bs`
    BoolAnd(Box<Spanned<Node>>, Box<Spanned<Node>>),
    // `'not' Bp`
    Not(Box<Spanned<Node>>),
    // `A relop A`
    Rel { op: RelOp, left: Box<Spanned<Node>>, right: Box<Spanned<Node>> },
    // `+ - * / **`, binary
    Arith { op: ArithOp, left: Box<Spanned<Node>>, right: Box<Spanned<Node>> },
    // unary minus
    Neg(Box<Spanned<Node>>),
    // `R '@' IDENT R`
    At { left: Box<Spanned<Node>>, op_name: String, right: Box<Spanned<Node>> },
    // function application (`gamma`)
    Gamma(Box<Spanned<Node>>, Box<Spanned<Node>>),

    // --- definitions (the `D` family) ---
    /// `IDENT '=' E` or `IDENT (',' IDENT)+ '=' E`.
    Equation { binder: Binder, value: Box<Spanned<Node>> },
    /// `IDENT Vb+ '=' E`.
    FunctionForm { name: String, binders: Vec<Binder>, body: Box<Spanned<Node>> },
    /// `Dr ('and' Dr)+`.
    DefAnd(Vec<Spanned<Node>>),
    /// `Da 'within' D`.
    Within { first: Box<Spanned<Node>>, second: Box<Spanned<Node>> },
    /// `'rec' Db`.
    Rec(Box<Spanned<Node>>),
}

impl Node {
    /// A short label for this node's kind, used by the `-ast`/`-st`
    /// tree printer.
    pub fn label(&self) -> String {
        match self {
            Node::Ident(name) => format!("<IDENT:{}>", name),
            Node::Int(n) => format!("<INT:{}>", n),
            Node::Str(s) => format!("<STR:{}>", s),
            Node::True => "<true>".to_string(),
            Node::False => "<false>".to_string(),
            Node::Nil => "<nil>".to_string(),
            Node::Dummy => "<dummy>".to_string(),
            Node::Let { .. } => "let".to_string(),
            Node::Fn { .. } => "lambda".to_string(),
            Node::Where { .. } => "where".to_string(),
            Node::Tau(_) => "tau".to_string(),
            Node::Aug { .. } => "aug".to_string(),
            Node::Cond { .. } => "->".to_string(),
            Node::BoolOr(..) => "or".to_string(),
            Node::BoolAnd(..) => "&".to_string(),
            Node::Not(_) => "not".to_string(),
            Node::Rel { op, .. } => op.lexeme().to_string(),
            Node::Arith { op, .. } => op.lexeme().to_string(),
            Node::Neg(_) => "neg".to_string(),
            Node::At { op_name, .. } => format!("@{}", op_name),
            Node::Gamma(..) => "gamma".to_string(),
            Node::Equation { binder, .. } => format!("=({})", binder),
            Node::FunctionForm { name, .. } => format!("function_form({})", name),
            Node::DefAnd(_) => "and".to_string(),
            Node::Within { .. } => "within".to_string(),
            Node::Rec(_) => "rec".to_string(),
        }
    }

    /// This node's children, in flattening/printing order.
    pub fn children(&self) -> Vec<&Spanned<Node>> {
        match self {
            Node::Ident(_)
            | Node::Int(_)
            | Node::Str(_)
            | Node::True
            | Node::False
            | Node::Nil
            | Node::Dummy => vec![],
            Node::Let { defs, body } => vec![defs, body],
            Node::Fn { body, .. } => vec![body],
            Node::Where { body, defs } => vec![body, defs],
            Node::Tau(items) => items.iter().collect(),
            Node::Aug { left, right } => vec![left, right],
            Node::Cond { guard, then_branch, else_branch } => vec![guard, then_branch, else_branch],
            Node::BoolOr(a, b) | Node::BoolAnd(a, b) => vec![a, b],
            Node::Not(a) => vec![a],
            Node::Rel { left, right, .. } => vec![left, right],
            Node::Arith { left, right, .. } => vec![left, right],
            Node::Neg(a) => vec![a],
            Node::At { left, right, .. } => vec![left, right],
            Node::Gamma(a, b) => vec![a, b],
            Node::Equation { value, .. } => vec![value],
            Node::FunctionForm { body, .. } => vec![body],
            Node::DefAnd(items) => items.iter().collect(),
            Node::Within { first, second } => vec![first, second],
            Node::Rec(a) => vec![a],
        }
    }
}
