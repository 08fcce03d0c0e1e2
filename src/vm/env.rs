//! The CSE machine's environment: a arena of binding frames indexed by
//! plain `usize`s rather than linked via `Rc`/`Weak` pointers, so that
//! a closure capturing frame `i` and frame `i` capturing a closure
//! that (transitively) points back at itself never forms an ownership
//! cycle.

use std::collections::HashMap;

use crate::common::data::Value;
use crate::common::error::Trace;
use crate::construct::ast::Binder;

#[derive(Debug)]
struct Frame {
    parent: Option<usize>,
    bindings: HashMap<String, Value>,
}

/// An arena of frames forming the lexical scope chain. Frame `0` is
/// the root frame, pre-populated with the built-in bindings before
/// the program runs.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment { frames: vec![Frame { parent: None, bindings: HashMap::new() }] }
    }

    pub fn root(&self) -> usize { 0 }

    /// Allocates a new frame scoped under `parent`.
    pub fn child(&mut self, parent: usize) -> usize {
        self.frames.push(Frame { parent: Some(parent), bindings: HashMap::new() });
        self.frames.len() - 1
    }

    pub fn bind_name(&mut self, frame: usize, name: String, value: Value) {
        self.frames[frame].bindings.insert(name, value);
    }

    /// Binds `value` against `binder` in `frame`, destructuring tuples
    /// position-by-position for nested binders. This is the single
    /// mechanism behind plain
    /// identifiers, `(x, y)` lambda parameters, comma-binder
    /// definitions, and the combined binder synthesized for `and`.
    pub fn bind_binder(&mut self, frame: usize, binder: &Binder, value: Value) -> Result<(), Trace> {
        match binder {
            Binder::Empty => Ok(()),
            Binder::Ident(name) => {
                self.bind_name(frame, name.clone(), value);
                Ok(())
            }
            Binder::Tuple(items) => match value {
                Value::Tuple(elements) if elements.len() == items.len() => {
                    for (sub_binder, element) in items.iter().zip(elements.iter()) {
                        self.bind_binder(frame, sub_binder, element.clone())?;
                    }
                    Ok(())
                }
                Value::Tuple(elements) => Err(Trace::error(
                    format!("binder expects a tuple of {} elements, found {}", items.len(), elements.len()),
                    None,
                )),
                other => Err(Trace::error(
                    format!("binder expects a tuple, found a {}", other.type_name()),
                    None,
                )),
            },
        }
    }

    pub fn lookup(&self, frame: usize, name: &str) -> Option<Value> {
        let mut current = Some(frame);
        while let Some(index) = current {
            if let Some(value) = self.frames[index].bindings.get(name) {
                return Some(value.clone());
            }
            current = self.frames[index].parent;
        }
        None
    }
}

impl Default for Environment {
    fn default() -> Environment { Environment::new() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_walks_parent_chain() {
        let mut env = Environment::new();
        env.bind_name(env.root(), "x".to_string(), Value::Integer(1));
        let child = env.child(env.root());
        assert_eq!(env.lookup(child, "x"), Some(Value::Integer(1)));
    }

    #[test]
    fn shadowing_prefers_inner_frame() {
        let mut env = Environment::new();
        env.bind_name(env.root(), "x".to_string(), Value::Integer(1));
        let child = env.child(env.root());
        env.bind_name(child, "x".to_string(), Value::Integer(2));
        assert_eq!(env.lookup(child, "x"), Some(Value::Integer(2)));
    }

    #[test]
    fn tuple_binder_destructures_by_position() {
        use std::rc::Rc;
        let mut env = Environment::new();
        let binder = Binder::Tuple(vec![Binder::Ident("a".into()), Binder::Ident("b".into())]);
        let value = Value::Tuple(Rc::new(vec![Value::Integer(10), Value::Integer(20)]));
        env.bind_binder(env.root(), &binder, value).unwrap();
        assert_eq!(env.lookup(env.root(), "a"), Some(Value::Integer(10)));
        assert_eq!(env.lookup(env.root(), "b"), Some(Value::Integer(20)));
    }

    #[test]
    fn tuple_binder_arity_mismatch_errors() {
        use std::rc::Rc;
        let mut env = Environment::new();
        let binder = Binder::Tuple(vec![Binder::Ident("a".into()), Binder::Ident("b".into())]);
        let value = Value::Tuple(Rc::new(vec![Value::Integer(10)]));
        assert!(env.bind_binder(env.root(), &binder, value).is_err());
    }
}
