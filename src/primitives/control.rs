// ABOUTME: Control-flow primitives: if, begin (§4.4)

use std::rc::Rc;

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::evaluate;
use crate::value::{Arity, Builtin, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![(IF.name, Value::Builtin(&IF)), (BEGIN.name, Value::Builtin(&BEGIN))]
}

static IF: Builtin = Builtin {
    name: "if",
    arity: Arity::Exact(3),
    doc: "(if test then else) evaluates test, then evaluates then or else per its truthiness.",
    handler: if_handler,
};

fn if_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let test = evaluate(&args[0], env)?;
    if test.is_truthy() {
        evaluate(&args[1], env)
    } else {
        evaluate(&args[2], env)
    }
}

static BEGIN: Builtin = Builtin {
    name: "begin",
    arity: Arity::Variadic,
    doc: "(begin e1 … ek) evaluates each form left to right, returning the last; () is Nil.",
    handler: begin_handler,
};

fn begin_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let mut result = Value::Nil;
    for arg in args {
        result = evaluate(arg, env)?;
    }
    Ok(result)
}
