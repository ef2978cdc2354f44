// ABOUTME: Function, macro and quote primitives: fun, macro, quote (§4.4)

use std::rc::Rc;

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::symbol_names;
use crate::value::{Arity, Builtin, Closure, Macro, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![
        (FUN.name, Value::Builtin(&FUN)),
        (MACRO.name, Value::Builtin(&MACRO)),
        (QUOTE.name, Value::Builtin(&QUOTE)),
    ]
}

static FUN: Builtin = Builtin {
    name: "fun",
    arity: Arity::Exact(2),
    doc: "(fun (p1 … pk) body) closes over the current environment and returns a Closure.",
    handler: fun_handler,
};

fn fun_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let params = symbol_names(&args[0])
        .map_err(|e| LispError::wrong_operator_usage("fun", e))?;
    Ok(Value::Closure(Rc::new(Closure {
        params,
        body: args[1].clone(),
        env: env.fork(),
    })))
}

static MACRO: Builtin = Builtin {
    name: "macro",
    arity: Arity::Exact(2),
    doc: "(macro (p1 … pk) body) closes over the current environment and returns a Macro.",
    handler: macro_handler,
};

fn macro_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let params = symbol_names(&args[0])
        .map_err(|e| LispError::wrong_operator_usage("macro", e))?;
    Ok(Value::Macro(Rc::new(Macro {
        params,
        body: args[1].clone(),
        env: env.fork(),
    })))
}

static QUOTE: Builtin = Builtin {
    name: "quote",
    arity: Arity::Exact(1),
    doc: "(quote x) returns x unevaluated. 'x desugars to (quote x).",
    handler: quote_handler,
};

fn quote_handler(_env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    Ok(args[0].clone())
}
