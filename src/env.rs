// ABOUTME: Environment module implementing forking and forward-reference scoping (§4.2)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::LispError;
use crate::value::Value;

/// A single-assignment cell used so a `letrec` binding's value can be filled
/// in after the environment it lives in has already been captured.
struct ForwardCell {
    name: Rc<str>,
    value: Option<Value>,
}

/// A binding slot. `Forward` cells are wrapped in `Rc<RefCell<_>>` so that
/// forking an environment can share them by identity (§4.2, "Fork sharing").
enum Slot {
    Direct(Value),
    Forward(Rc<RefCell<ForwardCell>>),
}

impl Clone for Slot {
    fn clone(&self) -> Self {
        match self {
            Slot::Direct(v) => Slot::Direct(v.clone()),
            Slot::Forward(cell) => Slot::Forward(Rc::clone(cell)),
        }
    }
}

pub struct Environment {
    bindings: RefCell<HashMap<Rc<str>, Slot>>,
}

impl Environment {
    /// A fresh environment with no bindings.
    pub fn empty() -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// A fresh environment seeded from a name→value table, used to build the
    /// top-level environment from the primitive registry.
    pub fn with_primitives(table: Vec<(&'static str, Value)>) -> Rc<Environment> {
        let env = Environment::empty();
        for (name, value) in table {
            env.update(name, value);
        }
        env
    }

    /// Looks up `name`, resolving a forward reference to its filled value.
    pub fn lookup(&self, name: &str) -> Result<Value, LispError> {
        match self.bindings.borrow().get(name) {
            Some(Slot::Direct(value)) => Ok(value.clone()),
            Some(Slot::Forward(cell)) => {
                let cell = cell.borrow();
                cell.value.clone().ok_or_else(|| {
                    LispError::runtime(format!(
                        "forward reference {} accessed before initialization, do you have a loop?",
                        cell.name
                    ))
                })
            }
            None => Err(LispError::undefined_identifier(name)),
        }
    }

    /// Rebinds (or creates) a direct-value slot in *this* environment only.
    pub fn update(&self, name: impl Into<Rc<str>>, value: Value) {
        self.bindings
            .borrow_mut()
            .insert(name.into(), Slot::Direct(value));
    }

    /// Produces a new environment whose slot map is a shallow copy of this
    /// one: direct-value slots are independent afterwards, while forward
    /// reference slots remain shared by identity with the original.
    pub fn fork(self: &Rc<Self>) -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(self.bindings.borrow().clone()),
        })
    }

    /// Installs an empty forward-reference slot under `name`.
    pub fn allocate_forward_reference(&self, name: impl Into<Rc<str>>) {
        let name = name.into();
        let cell = ForwardCell {
            name: Rc::clone(&name),
            value: None,
        };
        self.bindings
            .borrow_mut()
            .insert(name, Slot::Forward(Rc::new(RefCell::new(cell))));
    }

    /// Fills a previously allocated forward-reference slot. Fails if the
    /// slot is missing, already filled, or is not a forward reference.
    pub fn fill_forward_reference(&self, name: &str, value: Value) -> Result<(), LispError> {
        match self.bindings.borrow().get(name) {
            Some(Slot::Forward(cell)) => {
                let mut cell = cell.borrow_mut();
                if cell.value.is_some() {
                    return Err(LispError::runtime(format!(
                        "forward reference {name} has been filled a second time"
                    )));
                }
                cell.value = Some(value);
                Ok(())
            }
            Some(Slot::Direct(_)) => Err(LispError::runtime(format!(
                "{name} is not a forward reference"
            ))),
            None => Err(LispError::runtime(format!(
                "forward reference {name} has not been declared"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_then_lookup() {
        let env = Environment::empty();
        env.update("x", Value::Integer(42));
        assert_eq!(env.lookup("x").unwrap(), Value::Integer(42));
    }

    #[test]
    fn test_with_primitives_seeds_table() {
        let env = Environment::with_primitives(vec![
            ("true", Value::Boolean(true)),
            ("nil", Value::Nil),
        ]);
        assert_eq!(env.lookup("true").unwrap(), Value::Boolean(true));
        assert_eq!(env.lookup("nil").unwrap(), Value::Nil);
    }

    #[test]
    fn test_undefined_identifier() {
        let env = Environment::empty();
        assert!(matches!(
            env.lookup("missing"),
            Err(LispError::UndefinedIdentifier(_))
        ));
    }

    #[test]
    fn test_fork_independence_of_direct_slots() {
        let e1 = Environment::empty();
        e1.update("x", Value::Integer(1));
        let e2 = e1.fork();
        e1.update("x", Value::Integer(2));
        assert_eq!(e2.lookup("x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_fork_sharing_of_forward_reference() {
        let e1 = Environment::empty();
        e1.allocate_forward_reference("x");
        let e2 = e1.fork();
        e1.fill_forward_reference("x", Value::Integer(7)).unwrap();
        assert_eq!(e2.lookup("x").unwrap(), Value::Integer(7));
    }

    #[test]
    fn test_forward_reference_read_before_fill_fails() {
        let env = Environment::empty();
        env.allocate_forward_reference("x");
        assert!(env.lookup("x").is_err());
    }

    #[test]
    fn test_forward_reference_double_fill_fails() {
        let env = Environment::empty();
        env.allocate_forward_reference("x");
        env.fill_forward_reference("x", Value::Integer(1)).unwrap();
        assert!(env.fill_forward_reference("x", Value::Integer(2)).is_err());
    }

    #[test]
    fn test_fill_forward_reference_on_missing_slot_fails() {
        let env = Environment::empty();
        assert!(env.fill_forward_reference("x", Value::Integer(1)).is_err());
    }

    #[test]
    fn test_fill_forward_reference_on_direct_slot_fails() {
        let env = Environment::empty();
        env.update("x", Value::Integer(1));
        assert!(env.fill_forward_reference("x", Value::Integer(2)).is_err());
    }

    #[test]
    fn test_lookup_determinism() {
        let env = Environment::empty();
        env.update("n", Value::Integer(5));
        assert_eq!(env.lookup("n").unwrap(), Value::Integer(5));
    }
}
