// ABOUTME: Mutable block primitives: alloc!, get!, set! (§4.4)

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::LispError;
use crate::eval::evaluate;
use crate::value::{Arity, Builtin, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![
        (ALLOC.name, Value::Builtin(&ALLOC)),
        (GET.name, Value::Builtin(&GET)),
        (SET.name, Value::Builtin(&SET)),
    ]
}

fn as_index(op: &str, value: &Value) -> Result<usize, LispError> {
    match value {
        Value::Integer(n) if *n >= 0 => Ok(*n as usize),
        Value::Integer(n) => Err(LispError::wrong_operator_usage(
            op,
            format!("index must be non-negative, got {n}"),
        )),
        other => Err(LispError::wrong_operator_usage(
            op,
            format!("index must be an integer, got {}", other.type_name()),
        )),
    }
}

/// `alloc!`'s size argument only rejects non-integers; a negative size
/// yields an empty block, matching `[x] * negative == []` in the ground
/// truth `Block.__init__`.
fn as_size(op: &str, value: &Value) -> Result<usize, LispError> {
    match value {
        Value::Integer(n) => Ok((*n).max(0) as usize),
        other => Err(LispError::wrong_operator_usage(
            op,
            format!("size must be an integer, got {}", other.type_name()),
        )),
    }
}

fn as_block(op: &str, value: &Value) -> Result<Rc<RefCell<Vec<Value>>>, LispError> {
    match value {
        Value::Block(cells) => Ok(Rc::clone(cells)),
        other => Err(LispError::wrong_operator_usage(
            op,
            format!("expected a block, got {}", other.type_name()),
        )),
    }
}

fn bounds_check(op: &str, index: usize, len: usize) -> Result<(), LispError> {
    if index >= len {
        Err(LispError::wrong_operator_usage(
            op,
            format!("index {index} out of bounds for block of size {len}"),
        ))
    } else {
        Ok(())
    }
}

static ALLOC: Builtin = Builtin {
    name: "alloc!",
    arity: Arity::Exact(1),
    doc: "(alloc! n) allocates a fresh mutable block of size n, filled with Nil.",
    handler: |env, args| {
        let size_value = evaluate(&args[0], env)?;
        let size = as_size("alloc!", &size_value)?;
        Ok(Value::Block(Rc::new(RefCell::new(vec![Value::Nil; size]))))
    },
};

static GET: Builtin = Builtin {
    name: "get!",
    arity: Arity::Exact(2),
    doc: "(get! block i) reads the element at index i.",
    handler: |env, args| {
        let block_value = evaluate(&args[0], env)?;
        let index_value = evaluate(&args[1], env)?;
        let cells = as_block("get!", &block_value)?;
        let index = as_index("get!", &index_value)?;
        let cells = cells.borrow();
        bounds_check("get!", index, cells.len())?;
        Ok(cells[index].clone())
    },
};

static SET: Builtin = Builtin {
    name: "set!",
    arity: Arity::Exact(3),
    doc: "(set! block i v) writes v into block at index i, returning Nil.",
    handler: |env, args| {
        let block_value = evaluate(&args[0], env)?;
        let index_value = evaluate(&args[1], env)?;
        let new_value = evaluate(&args[2], env)?;
        let cells = as_block("set!", &block_value)?;
        let index = as_index("set!", &index_value)?;
        let mut cells = cells.borrow_mut();
        bounds_check("set!", index, cells.len())?;
        cells[index] = new_value;
        Ok(Value::Nil)
    },
};
