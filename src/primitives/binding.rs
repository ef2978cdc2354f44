// ABOUTME: Binding and scoping primitives: let, letrec, define! (§4.4)

use std::rc::Rc;

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::evaluate;
use crate::value::{Arity, Builtin, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![
        (LET.name, Value::Builtin(&LET)),
        (LETREC.name, Value::Builtin(&LETREC)),
        (DEFINE.name, Value::Builtin(&DEFINE)),
    ]
}

static LET: Builtin = Builtin {
    name: "let",
    arity: Arity::Exact(2),
    doc: "(let (x e) body) rewrites to (letrec ((x e)) body).",
    handler: let_handler,
};

fn let_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let pair = single_binding(&args[0])?;
    let bindings = Value::from_vec(vec![Value::from_vec(pair)]);
    letrec_body(env, &bindings, &args[1])
}

fn single_binding(form: &Value) -> Result<Vec<Value>, LispError> {
    let pair = form
        .to_vec()
        .map_err(|_| LispError::wrong_operator_usage("let", "binding must be (name expr)"))?;
    if pair.len() != 2 {
        return Err(LispError::wrong_operator_usage(
            "let",
            "binding must be (name expr)",
        ));
    }
    Ok(pair)
}

static LETREC: Builtin = Builtin {
    name: "letrec",
    arity: Arity::Exact(2),
    doc: "(letrec ((x1 e1) … (xk ek)) body) binds mutually recursive names via forward references.",
    handler: letrec_handler,
};

fn letrec_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    letrec_body(env, &args[0], &args[1])
}

fn letrec_body(env: &Rc<Environment>, bindings: &Value, body: &Value) -> Result<Value, LispError> {
    let bindings = bindings.to_vec().map_err(|_| {
        LispError::wrong_operator_usage("letrec", "bindings must be a proper list")
    })?;

    let mut names: Vec<Rc<str>> = Vec::with_capacity(bindings.len());
    let mut exprs: Vec<Value> = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let pair = binding.to_vec().map_err(|_| {
            LispError::wrong_operator_usage("letrec", "each binding must be (name expr)")
        })?;
        if pair.len() != 2 {
            return Err(LispError::wrong_operator_usage(
                "letrec",
                "each binding must be (name expr)",
            ));
        }
        let name = match &pair[0] {
            Value::Symbol(n) => Rc::clone(n),
            other => {
                return Err(LispError::wrong_operator_usage(
                    "letrec",
                    format!("binding name must be a symbol, got {}", other.type_name()),
                ))
            }
        };
        names.push(name);
        exprs.push(pair[1].clone());
    }

    // Fork first so closures created while evaluating `ei` capture an
    // environment where later siblings are forward references they can
    // see once filled, not the caller's environment.
    let forked = env.fork();
    for name in &names {
        forked.allocate_forward_reference(Rc::clone(name));
    }
    for (name, expr) in names.iter().zip(exprs.iter()) {
        let value = evaluate(expr, &forked)?;
        forked.fill_forward_reference(name, value)?;
    }
    evaluate(body, &forked)
}

static DEFINE: Builtin = Builtin {
    name: "define!",
    arity: Arity::Exact(2),
    doc: "(define! name e) binds name to e's value in the current environment.",
    handler: define_handler,
};

fn define_handler(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    let name = match &args[0] {
        Value::Symbol(n) => Rc::clone(n),
        other => {
            return Err(LispError::wrong_operator_usage(
                "define!",
                format!("name must be a symbol, got {}", other.type_name()),
            ))
        }
    };
    let value = evaluate(&args[1], env)?;
    env.update(name, value);
    Ok(Value::Nil)
}
