use std::{fmt, rc::Rc};

use crate::construct::ast::Binder;

/// A built-in function, possibly partially applied. `Conc` and
/// friends are curried (§4.5.1): applying one of arity 2 to a single
/// argument yields a new `BuiltIn` with that argument bound, which
/// `Isfunction` can observe as a function.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltIn {
    pub name: &'static str,
    pub arity: usize,
    pub bound: Vec<Value>,
}

impl BuiltIn {
    pub fn new(name: &'static str, arity: usize) -> BuiltIn {
        BuiltIn { name, arity, bound: vec![] }
    }

    pub fn saturated(&self) -> bool { self.bound.len() >= self.arity }

    /// Returns a copy of this built-in with one more argument bound.
    pub fn with_arg(&self, arg: Value) -> BuiltIn {
        let mut bound = self.bound.clone();
        bound.push(arg);
        BuiltIn { name: self.name, arity: self.arity, bound }
    }
}

/// A captured lambda: the frame it closed over, its binder spec, and
/// the index of the delta holding its body (§3 "Closure").
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub frame: usize,
    pub binder: Binder,
    pub body: usize,
}

/// Every value the CSE machine can push onto its stack (§3 "Value").
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Str(String),
    Bool(bool),
    /// The empty tuple.
    Nil,
    /// The distinct unit-like marker produced by the `rec` protocol.
    Dummy,
    Tuple(Rc<Vec<Value>>),
    Closure(Rc<Closure>),
    /// A closure produced by applying `Y*`; applying it re-ties the
    /// knot before proceeding, per §4.5 rule 4's `Y*` case.
    YTied(Rc<Closure>),
    BuiltIn(BuiltIn),
    /// The fixed-point combinator marker, produced only by the `rec`
    /// rewrite (§4.3) and consumed by `gamma`'s `Y*` case.
    YStar,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "truth value",
            Value::Nil => "nil",
            Value::Dummy => "dummy",
            Value::Tuple(_) => "tuple",
            Value::Closure(_) | Value::YTied(_) | Value::BuiltIn(_) => "function",
            Value::YStar => "Y*",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::YTied(_) | Value::BuiltIn(_))
    }

    /// The descriptor `Print` emits for a function value (§9 Open
    /// Question: "pick any stable string and document it").
    pub fn closure_descriptor(closure: &Closure) -> String {
        format!("[closure: {} -> delta {}]", closure.binder, closure.body)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Dummy, Value::Dummy) => true,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::YStar, Value::YStar) => true,
            // Functions are never equal to one another, matching
            // RPAL's lack of closure-equality semantics.
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// Renders a value the way `Print` would (§4.5.2 "Pretty printing").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Nil => write!(f, "nil"),
            Value::Dummy => write!(f, "dummy"),
            Value::Tuple(items) => write!(
                f,
                "({})",
                items.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
            ),
            Value::Closure(c) | Value::YTied(c) => write!(f, "{}", Value::closure_descriptor(c)),
            Value::BuiltIn(b) => write!(f, "[builtin: {}]", b.name),
            Value::YStar => write!(f, "[Y*]"),
        }
    }
}
