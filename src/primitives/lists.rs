// ABOUTME: List and predicate primitives: list, cons, head, tail, int?, str?, list? (§4.4)

use crate::error::LispError;
use crate::eval::evaluate;
use crate::value::{Arity, Builtin, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![
        (LIST.name, Value::Builtin(&LIST)),
        (CONS.name, Value::Builtin(&CONS)),
        (HEAD.name, Value::Builtin(&HEAD)),
        (TAIL.name, Value::Builtin(&TAIL)),
        (IS_INT.name, Value::Builtin(&IS_INT)),
        (IS_STR.name, Value::Builtin(&IS_STR)),
        (IS_LIST.name, Value::Builtin(&IS_LIST)),
    ]
}

static LIST: Builtin = Builtin {
    name: "list",
    arity: Arity::Variadic,
    doc: "(list e1 … ek) evaluates its arguments and collects them into a proper list.",
    handler: |env, args| {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(evaluate(arg, env)?);
        }
        Ok(Value::from_vec(values))
    },
};

static CONS: Builtin = Builtin {
    name: "cons",
    arity: Arity::Exact(2),
    doc: "(cons h t) evaluates both arguments and builds a cons cell from them.",
    handler: |env, args| {
        let head = evaluate(&args[0], env)?;
        let tail = evaluate(&args[1], env)?;
        Ok(Value::cons(head, tail))
    },
};

static HEAD: Builtin = Builtin {
    name: "head",
    arity: Arity::Exact(1),
    doc: "(head p) returns the head of a cons cell.",
    handler: |env, args| {
        let value = evaluate(&args[0], env)?;
        match value {
            Value::Cons(cell) => Ok(cell.head.clone()),
            other => Err(LispError::wrong_operator_usage(
                "head",
                format!("expected a cons cell, got {}", other.type_name()),
            )),
        }
    },
};

static TAIL: Builtin = Builtin {
    name: "tail",
    arity: Arity::Exact(1),
    doc: "(tail p) returns the tail of a cons cell.",
    handler: |env, args| {
        let value = evaluate(&args[0], env)?;
        match value {
            Value::Cons(cell) => Ok(cell.tail.clone()),
            other => Err(LispError::wrong_operator_usage(
                "tail",
                format!("expected a cons cell, got {}", other.type_name()),
            )),
        }
    },
};

static IS_INT: Builtin = Builtin {
    name: "int?",
    arity: Arity::Exact(1),
    doc: "(int? x) is true iff x evaluates to an integer.",
    handler: |env, args| {
        let value = evaluate(&args[0], env)?;
        Ok(Value::Boolean(matches!(value, Value::Integer(_))))
    },
};

static IS_STR: Builtin = Builtin {
    name: "str?",
    arity: Arity::Exact(1),
    doc: "(str? x) is true iff x evaluates to a string.",
    handler: |env, args| {
        let value = evaluate(&args[0], env)?;
        Ok(Value::Boolean(matches!(value, Value::String(_))))
    },
};

static IS_LIST: Builtin = Builtin {
    name: "list?",
    arity: Arity::Exact(1),
    doc: "(list? x) is true iff x evaluates to a proper list (including ()).",
    handler: |env, args| {
        let value = evaluate(&args[0], env)?;
        Ok(Value::Boolean(value.is_proper_list()))
    },
};
