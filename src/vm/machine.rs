//! The Control-Stack-Environment machine interprets a
//! flattened [`Control`] table directly, without ever re-walking a
//! tree. `rec`'s fixed point (`Y*`/`YTied`) and ordinary closure
//! application share the same `Gamma` handling by having the `Y*`
//! case synthesize two ordinary applications and splice them onto the
//! live control sequence (see `schedule`), rather than special-casing
//! recursion as a distinct evaluation path.

use std::io::Write;
use std::rc::Rc;

use crate::builtins;
use crate::common::data::{Closure, Value};
use crate::common::error::Trace;
use crate::compiler::flatten::{Control, ControlElement};
use crate::vm::env::Environment;

/// An item on the control stack: either a real control element from a
/// delta, or a machine-synthesized value splice used only to re-tie
/// `Y*`.
enum Item {
    Control(ControlElement),
    /// Pushes a pre-built value straight onto the value stack.
    Const(Value),
    /// Restores the environment after a closure call returns (spec
    /// §4.5 rule 10, "environment markers").
    PopEnv,
}

/// An item on the value stack: either a real value, or the marker
/// recording which frame to restore control to once a call returns.
enum StackItem {
    Value(Value),
    EnvMarker(usize),
}

pub struct Machine<'a> {
    control: &'a Control,
    env: Environment,
    frame: usize,
    items: Vec<Item>,
    stack: Vec<StackItem>,
    out: &'a mut dyn Write,
}

impl<'a> Machine<'a> {
    pub fn new(control: &'a Control, out: &'a mut dyn Write) -> Machine<'a> {
        let mut env = Environment::new();
        builtins::install(&mut env);
        let frame = env.root();
        Machine { control, env, frame, items: vec![], stack: vec![], out }
    }

    /// Runs the machine to completion and returns the single value
    /// left on the stack.
    pub fn run(mut self) -> Result<Value, Trace> {
        self.schedule_delta(self.control.root);

        while let Some(item) = self.items.pop() {
            match item {
                Item::Const(value) => self.stack.push(StackItem::Value(value)),
                Item::PopEnv => self.pop_env(),
                Item::Control(element) => self.step(element)?,
            }
        }

        match self.stack.pop() {
            Some(StackItem::Value(value)) => Ok(value),
            Some(StackItem::EnvMarker(_)) | None => {
                Err(Trace::error("program did not produce a value", None))
            }
        }
    }

    /// Pushes `items` so they execute in the order given (index 0
    /// first), despite both `items` and the control stack being LIFO.
    fn schedule(&mut self, items: Vec<Item>) {
        for item in items.into_iter().rev() {
            self.items.push(item);
        }
    }

    fn schedule_delta(&mut self, delta: usize) {
        let elements = self.control.deltas[delta].elements.clone();
        self.schedule(elements.into_iter().map(Item::Control).collect());
    }

    fn pop_env(&mut self) {
        let result = self.stack.pop().expect("PopEnv with empty stack");
        match self.stack.pop() {
            Some(StackItem::EnvMarker(frame)) => self.frame = frame,
            other => panic!("PopEnv expected an environment marker, found {:?}", other.is_some()),
        }
        self.stack.push(result);
    }

    fn pop_value(&mut self, context: &str) -> Result<Value, Trace> {
        match self.stack.pop() {
            Some(StackItem::Value(v)) => Ok(v),
            Some(StackItem::EnvMarker(_)) | None => {
                Err(Trace::error(format!("internal error: expected a value on the stack ({})", context), None))
            }
        }
    }

    fn step(&mut self, element: ControlElement) -> Result<(), Trace> {
        match element {
            ControlElement::Ident(name) => {
                let value = self
                    .env
                    .lookup(self.frame, &name)
                    .ok_or_else(|| Trace::error(format!("unbound identifier `{}`", name), None))?;
                self.stack.push(StackItem::Value(value));
            }
            ControlElement::Int(n) => self.stack.push(StackItem::Value(Value::Integer(n))),
            ControlElement::Str(s) => self.stack.push(StackItem::Value(Value::Str(s))),
            ControlElement::True => self.stack.push(StackItem::Value(Value::Bool(true))),
            ControlElement::False => self.stack.push(StackItem::Value(Value::Bool(false))),
            ControlElement::Nil => self.stack.push(StackItem::Value(Value::Nil)),
            ControlElement::Dummy => self.stack.push(StackItem::Value(Value::Dummy)),
            ControlElement::YStar => self.stack.push(StackItem::Value(Value::YStar)),

            ControlElement::Lambda { binder, body } => {
                let closure = Closure { frame: self.frame, binder, body };
                self.stack.push(StackItem::Value(Value::Closure(Rc::new(closure))));
            }

            ControlElement::Tau(arity) => {
                let mut items = Vec::with_capacity(arity);
                for _ in 0..arity {
                    items.push(self.pop_value("tau")?);
                }
                items.reverse();
                self.stack.push(StackItem::Value(Value::Tuple(Rc::new(items))));
            }

            ControlElement::Beta { then_delta, else_delta } => {
                let guard = self.pop_value("conditional guard")?;
                match guard {
                    Value::Bool(true) => self.schedule_delta(then_delta),
                    Value::Bool(false) => self.schedule_delta(else_delta),
                    other => {
                        return Err(Trace::error(
                            format!("conditional guard must be a truth value, found a {}", other.type_name()),
                            None,
                        ))
                    }
                }
            }

            ControlElement::Gamma => {
                let rand = self.pop_value("gamma rand")?;
                let rator = self.pop_value("gamma rator")?;
                self.apply(rator, rand)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, rator: Value, rand: Value) -> Result<(), Trace> {
        match rator {
            Value::Closure(closure) => {
                let new_frame = self.env.child(closure.frame);
                self.env.bind_binder(new_frame, &closure.binder, rand)?;
                self.stack.push(StackItem::EnvMarker(self.frame));
                self.frame = new_frame;
                self.items.push(Item::PopEnv);
                self.schedule_delta(closure.body);
            }

            Value::YStar => match rand {
                Value::Closure(closure) => self.stack.push(StackItem::Value(Value::YTied(closure))),
                other => {
                    return Err(Trace::error(
                        format!("Y* expects a function, found a {}", other.type_name()),
                        None,
                    ))
                }
            },

            Value::YTied(closure) => {
                // Re-tie the knot: apply the underlying closure to its
                // own tied self-reference, then apply whatever that
                // produces to the real argument.
                self.schedule(vec![
                    Item::Const(Value::Closure(closure.clone())),
                    Item::Const(Value::YTied(closure)),
                    Item::Control(ControlElement::Gamma),
                    Item::Const(rand),
                    Item::Control(ControlElement::Gamma),
                ]);
            }

            Value::BuiltIn(builtin) => {
                let applied = builtin.with_arg(rand);
                if applied.saturated() {
                    let result = builtins::call(applied.name, &applied.bound, self.out)?;
                    self.stack.push(StackItem::Value(result));
                } else {
                    self.stack.push(StackItem::Value(Value::BuiltIn(applied)));
                }
            }

            Value::Tuple(items) => match rand {
                Value::Integer(n) if n >= 1 && (n as usize) <= items.len() => {
                    self.stack.push(StackItem::Value(items[(n - 1) as usize].clone()));
                }
                Value::Integer(n) => {
                    return Err(Trace::error(format!("tuple index {} out of range (1..={})", n, items.len()), None))
                }
                other => {
                    return Err(Trace::error(
                        format!("a tuple can only be applied to an integer index, found a {}", other.type_name()),
                        None,
                    ))
                }
            },

            other => return Err(Trace::error(format!("cannot apply a {} as a function", other.type_name()), None)),
        }
        Ok(())
    }
}

/// Runs a flattened program to completion, writing any `Print` output
/// to `out`.
pub fn run(control: &Control, out: &mut dyn Write) -> Result<Value, Trace> {
    Machine::new(control, out).run()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::flatten::flatten;
    use crate::compiler::lex::Lexer;
    use crate::compiler::parse::Parser;
    use crate::compiler::standardize::standardize;

    fn eval(src: &str) -> Value {
        let mut out = Vec::new();
        let tokens = Lexer::lex(Source::source(src)).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        let tree = standardize(ast).unwrap();
        let control = flatten(tree);
        run(&control, &mut out).unwrap()
    }

    fn eval_prints(src: &str) -> String {
        let mut out = Vec::new();
        let tokens = Lexer::lex(Source::source(src)).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        let tree = standardize(ast).unwrap();
        let control = flatten(tree);
        run(&control, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("2 + 3 * 4"), Value::Integer(14));
    }

    #[test]
    fn let_binding() {
        assert_eq!(eval("let x = 5 in x + 1"), Value::Integer(6));
    }

    #[test]
    fn curried_application() {
        assert_eq!(eval("let add x y = x + y in add 3 4"), Value::Integer(7));
    }

    #[test]
    fn conditional() {
        assert_eq!(eval("1 gr 0 -> 100 | 200"), Value::Integer(100));
        assert_eq!(eval("1 gr 2 -> 100 | 200"), Value::Integer(200));
    }

    #[test]
    fn tuple_and_indexing() {
        assert_eq!(eval("let t = (10, 20, 30) in t 2"), Value::Integer(20));
    }

    #[test]
    fn tuple_destructuring_binder() {
        assert_eq!(eval("let a, b = (1, 2) in a + b"), Value::Integer(3));
    }

    #[test]
    fn recursive_factorial() {
        let src = "let rec fact n = (n eq 0) -> 1 | n * fact (n - 1) in fact 5";
        assert_eq!(eval(src), Value::Integer(120));
    }

    #[test]
    fn recursive_fibonacci() {
        let src = "let rec fib n = (n ls 2) -> n | fib (n - 1) + fib (n - 2) in fib 10";
        assert_eq!(eval(src), Value::Integer(55));
    }

    #[test]
    fn print_hello_world() {
        assert_eq!(eval_prints("Print 'Hello, World!'"), "Hello, World!\n");
    }

    #[test]
    fn curried_builtin() {
        assert_eq!(eval("Conc \"Hello, \" \"World!\""), Value::Str("Hello, World!".into()));
    }

    #[test]
    fn unbound_identifier_is_a_trace_error() {
        let mut out = Vec::new();
        let tokens = Lexer::lex(Source::source("y")).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        let tree = standardize(ast).unwrap();
        let control = flatten(tree);
        assert!(run(&control, &mut out).is_err());
    }

    #[test]
    fn within_chains_definitions() {
        assert_eq!(eval("let x = 2 within y = x + 1 in y"), Value::Integer(3));
    }

    #[test]
    fn and_binds_simultaneously() {
        assert_eq!(eval("let x = 1 and y = 2 in x + y"), Value::Integer(3));
    }
}
