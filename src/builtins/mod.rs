//! Built-in functions and operator semantics.
//! Operators desugar to named built-ins during standardization
//! (`compiler::standardize`), so this module is the single place that
//! implements both the library functions (`Print`, `Conc`, ...) and
//! the arithmetic/relational/boolean primitives -- from the CSE
//! machine's point of view they're the same kind of thing, just
//! pre-bound in the root environment frame.

use std::io::Write;
use std::rc::Rc;

use crate::common::data::{BuiltIn, Value};
use crate::common::error::Trace;
use crate::vm::env::Environment;

/// `(name, arity)` for every built-in bound in the root frame.
const TABLE: &[(&str, usize)] = &[
    // library functions (§4.5.1)
    ("Print", 1),
    ("Conc", 2),
    ("Stem", 1),
    ("Stern", 1),
    ("Order", 1),
    ("Null", 1),
    ("Isinteger", 1),
    ("Isstring", 1),
    ("Istuple", 1),
    ("Isdummy", 1),
    ("Istruthvalue", 1),
    ("Isfunction", 1),
    ("ItoS", 1),
    // operators, bound under their standardized names (§4.5.2)
    ("+", 2),
    ("-", 2),
    ("*", 2),
    ("/", 2),
    ("**", 2),
    ("neg", 1),
    ("gr", 2),
    ("ge", 2),
    ("ls", 2),
    ("le", 2),
    ("eq", 2),
    ("ne", 2),
    ("or", 2),
    ("&", 2),
    ("not", 1),
    ("aug", 2),
];

/// Binds every built-in into `env`'s root frame.
pub fn install(env: &mut Environment) {
    let root = env.root();
    for (name, arity) in TABLE {
        env.bind_name(root, name.to_string(), Value::BuiltIn(BuiltIn::new(name, *arity)));
    }
}

fn type_error(op: &str, value: &Value) -> Trace {
    Trace::error(format!("{} does not accept a {}", op, value.type_name()), None)
}

fn as_integer(op: &str, value: &Value) -> Result<i64, Trace> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(type_error(op, other)),
    }
}

fn as_str(op: &str, value: &Value) -> Result<&str, Trace> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(type_error(op, other)),
    }
}

fn as_bool(op: &str, value: &Value) -> Result<bool, Trace> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(type_error(op, other)),
    }
}

/// Dispatches a saturated call to a named built-in. `out` is the
/// stream `Print` writes to; tests pass a `Vec<u8>`, `main` passes
/// stdout.
pub fn call(name: &str, args: &[Value], out: &mut dyn Write) -> Result<Value, Trace> {
    match name {
        "Print" => {
            writeln!(out, "{}", args[0]).map_err(|e| Trace::error(format!("could not write output: {}", e), None))?;
            Ok(Value::Dummy)
        }
        "Conc" => {
            let a = as_str("Conc", &args[0])?;
            let b = as_str("Conc", &args[1])?;
            Ok(Value::Str(format!("{}{}", a, b)))
        }
        "Stem" => {
            let s = as_str("Stem", &args[0])?;
            match s.chars().next() {
                Some(c) => Ok(Value::Str(c.to_string())),
                None => Err(Trace::error("Stem does not accept an empty string", None)),
            }
        }
        "Stern" => {
            let s = as_str("Stern", &args[0])?;
            match s.chars().next() {
                Some(c) => Ok(Value::Str(s[c.len_utf8()..].to_string())),
                None => Err(Trace::error("Stern does not accept an empty string", None)),
            }
        }
        "Order" => match &args[0] {
            Value::Tuple(items) => Ok(Value::Integer(items.len() as i64)),
            other => Err(type_error("Order", other)),
        },
        "Null" => match &args[0] {
            Value::Tuple(items) => Ok(Value::Bool(items.is_empty())),
            Value::Str(s) => Ok(Value::Bool(s.is_empty())),
            Value::Nil => Ok(Value::Bool(true)),
            other => Err(type_error("Null", other)),
        },
        "Isinteger" => Ok(Value::Bool(matches!(args[0], Value::Integer(_)))),
        "Isstring" => Ok(Value::Bool(matches!(args[0], Value::Str(_)))),
        "Istuple" => Ok(Value::Bool(matches!(args[0], Value::Tuple(_)))),
        "Isdummy" => Ok(Value::Bool(matches!(args[0], Value::Dummy))),
        "Istruthvalue" => Ok(Value::Bool(matches!(args[0], Value::Bool(_)))),
        "Isfunction" => Ok(Value::Bool(args[0].is_function())),
        "ItoS" => {
            let n = as_integer("ItoS", &args[0])?;
            Ok(Value::Str(n.to_string()))
        }

        "+" => Ok(Value::Integer(as_integer("+", &args[0])? + as_integer("+", &args[1])?)),
        "-" => Ok(Value::Integer(as_integer("-", &args[0])? - as_integer("-", &args[1])?)),
        "*" => Ok(Value::Integer(as_integer("*", &args[0])? * as_integer("*", &args[1])?)),
        "/" => {
            let a = as_integer("/", &args[0])?;
            let b = as_integer("/", &args[1])?;
            if b == 0 {
                return Err(Trace::error("division by zero", None));
            }
            Ok(Value::Integer(a / b))
        }
        "**" => {
            let a = as_integer("**", &args[0])?;
            let b = as_integer("**", &args[1])?;
            if b < 0 {
                return Err(Trace::error("** does not accept a negative exponent", None));
            }
            Ok(Value::Integer(a.pow(b as u32)))
        }
        "neg" => Ok(Value::Integer(-as_integer("neg", &args[0])?)),

        "gr" => Ok(Value::Bool(compare(&args[0], &args[1], "gr")? == std::cmp::Ordering::Greater)),
        "ge" => Ok(Value::Bool(compare(&args[0], &args[1], "ge")? != std::cmp::Ordering::Less)),
        "ls" => Ok(Value::Bool(compare(&args[0], &args[1], "ls")? == std::cmp::Ordering::Less)),
        "le" => Ok(Value::Bool(compare(&args[0], &args[1], "le")? != std::cmp::Ordering::Greater)),
        "eq" => Ok(Value::Bool(compare(&args[0], &args[1], "eq")? == std::cmp::Ordering::Equal)),
        "ne" => Ok(Value::Bool(compare(&args[0], &args[1], "ne")? != std::cmp::Ordering::Equal)),

        "or" => Ok(Value::Bool(as_bool("or", &args[0])? || as_bool("or", &args[1])?)),
        "&" => Ok(Value::Bool(as_bool("&", &args[0])? && as_bool("&", &args[1])?)),
        "not" => Ok(Value::Bool(!as_bool("not", &args[0])?)),

        "aug" => match &args[0] {
            Value::Nil => Ok(Value::Tuple(Rc::new(vec![args[1].clone()]))),
            Value::Tuple(items) => {
                let mut items = (**items).clone();
                items.push(args[1].clone());
                Ok(Value::Tuple(Rc::new(items)))
            }
            other => Err(type_error("aug", other)),
        },

        other => Err(Trace::error(format!("unknown built-in `{}`", other), None)),
    }
}

fn compare(left: &Value, right: &Value, op: &str) -> Result<std::cmp::Ordering, Trace> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => Err(Trace::error(
            format!("{} expects two integers or two strings, found a {} and a {}", op, left.type_name(), right.type_name()),
            None,
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn call_with(name: &str, args: &[Value]) -> Value {
        let mut out = Vec::new();
        call(name, args, &mut out).unwrap()
    }

    #[test]
    fn conc_joins_strings() {
        assert_eq!(call_with("Conc", &[Value::Str("Hello, ".into()), Value::Str("World!".into())]), Value::Str("Hello, World!".into()));
    }

    #[test]
    fn stem_and_stern_split_first_character() {
        assert_eq!(call_with("Stem", &[Value::Str("cat".into())]), Value::Str("c".into()));
        assert_eq!(call_with("Stern", &[Value::Str("cat".into())]), Value::Str("at".into()));
    }

    #[test]
    fn stem_and_stern_reject_empty_string() {
        let mut out = Vec::new();
        assert!(call("Stem", &[Value::Str(String::new())], &mut out).is_err());
        assert!(call("Stern", &[Value::Str(String::new())], &mut out).is_err());
    }

    #[test]
    fn order_counts_tuple_elements() {
        let tuple = Value::Tuple(Rc::new(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));
        assert_eq!(call_with("Order", &[tuple]), Value::Integer(3));
    }

    #[test]
    fn division_by_zero_is_a_trace_error() {
        let mut out = Vec::new();
        assert!(call("/", &[Value::Integer(1), Value::Integer(0)], &mut out).is_err());
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(call_with("/", &[Value::Integer(-7), Value::Integer(2)]), Value::Integer(-3));
    }

    #[test]
    fn aug_on_nil_builds_a_singleton() {
        let result = call_with("aug", &[Value::Nil, Value::Integer(1)]);
        assert_eq!(result, Value::Tuple(Rc::new(vec![Value::Integer(1)])));
    }

    #[test]
    fn eq_compares_matching_types() {
        assert_eq!(call_with("eq", &[Value::Integer(1), Value::Integer(1)]), Value::Bool(true));
        assert_eq!(call_with("eq", &[Value::Str("a".into()), Value::Str("b".into())]), Value::Bool(false));
    }

    #[test]
    fn eq_on_mismatched_types_fails_closed() {
        let mut out = Vec::new();
        assert!(call("eq", &[Value::Integer(1), Value::Str("1".into())], &mut out).is_err());
    }
}
