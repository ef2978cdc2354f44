// ABOUTME: The evaluator: self-evaluation, symbol lookup, and combine dispatch (§4.3)

use std::rc::Rc;

use crate::env::Environment;
use crate::error::LispError;
use crate::value::Value;

/// `evaluate(term, env)`: a ConsCell combines, a Symbol looks up, everything
/// else is self-evaluating.
pub fn evaluate(term: &Value, env: &Rc<Environment>) -> Result<Value, LispError> {
    match term {
        Value::Cons(cell) => combine(&cell.head, &cell.tail, env),
        Value::Symbol(name) => env.lookup(name),
        other => Ok(other.clone()),
    }
}

/// Evaluates `op` to find the callee, then dispatches on its tag.
fn combine(op: &Value, args: &Value, env: &Rc<Environment>) -> Result<Value, LispError> {
    let callee = evaluate(op, env)?;
    let raw_args = args.to_vec()?;

    match &callee {
        Value::Builtin(builtin) => {
            if !builtin.arity.matches(raw_args.len()) {
                return Err(LispError::wrong_operator_usage(
                    builtin.name,
                    format!(
                        "expected {} argument(s), got {}",
                        builtin.arity,
                        raw_args.len()
                    ),
                ));
            }
            (builtin.handler)(env, &raw_args).map_err(|e| e.with_frame(builtin.name, &raw_args))
        }
        Value::Macro(mac) => {
            if mac.params.len() != raw_args.len() {
                return Err(LispError::runtime(format!(
                    "macro expected {} argument(s), got {}",
                    mac.params.len(),
                    raw_args.len()
                )));
            }
            let macro_env = mac.env.fork();
            for (param, arg) in mac.params.iter().zip(raw_args.iter()) {
                macro_env.update(Rc::clone(param), arg.clone());
            }
            let expanded = evaluate(&mac.body, &macro_env)?;
            evaluate(&expanded, env)
        }
        Value::Closure(closure) => {
            let mut values = Vec::with_capacity(raw_args.len());
            for raw in &raw_args {
                values.push(evaluate(raw, env)?);
            }
            apply_closure(closure, values)
        }
        other => Err(LispError::cannot_call(other)),
    }
}

/// Forks the closure's captured environment, binds parameters, and
/// evaluates the body there. Per §9: closures fork once at `fun`-evaluation
/// time (closing over the definition site) and again here, on every
/// application, so repeat calls never interfere with each other's bindings.
pub fn apply_closure(closure: &Rc<crate::value::Closure>, args: Vec<Value>) -> Result<Value, LispError> {
    if closure.params.len() != args.len() {
        return Err(LispError::runtime(format!(
            "closure expected {} argument(s), got {}",
            closure.params.len(),
            args.len()
        )));
    }
    let call_env = closure.env.fork();
    for (param, value) in closure.params.iter().zip(args.into_iter()) {
        call_env.update(Rc::clone(param), value);
    }
    evaluate(&closure.body, &call_env)
}

/// Helper used by a handful of primitives (`fun`, `macro`, `letrec`) to
/// validate and extract a parameter-list's Symbol names.
pub fn symbol_names(params: &Value) -> Result<Vec<Rc<str>>, LispError> {
    let items = params
        .to_vec()
        .map_err(|_| LispError::runtime("parameter list must be a proper list"))?;
    items
        .into_iter()
        .map(|p| match p {
            Value::Symbol(name) => Ok(name),
            other => Err(LispError::runtime(format!(
                "parameter must be a symbol, got {}",
                other.type_name()
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;

    fn list(items: Vec<Value>) -> Value {
        Value::from_vec(items)
    }

    #[test]
    fn test_self_evaluation() {
        let env = Environment::empty();
        assert_eq!(evaluate(&Value::Integer(5), &env).unwrap(), Value::Integer(5));
        assert_eq!(evaluate(&Value::Nil, &env).unwrap(), Value::Nil);
        assert_eq!(
            evaluate(&Value::Boolean(true), &env).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_symbol_lookup() {
        let env = Environment::empty();
        env.update("x", Value::Integer(10));
        assert_eq!(
            evaluate(&Value::symbol("x"), &env).unwrap(),
            Value::Integer(10)
        );
    }

    #[test]
    fn test_undefined_symbol_errors() {
        let env = Environment::empty();
        assert!(evaluate(&Value::symbol("missing"), &env).is_err());
    }

    #[test]
    fn test_quote_builtin_returns_unevaluated() {
        let env = crate::primitives::register_primitives();
        let expr = list(vec![Value::symbol("quote"), Value::symbol("a")]);
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::symbol("a"));
    }

    #[test]
    fn test_calling_a_non_callable_fails() {
        let env = Environment::empty();
        let expr = list(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(evaluate(&expr, &env), Err(LispError::CannotCall(_))));
    }

    #[test]
    fn test_improper_argument_list_fails() {
        let env = crate::primitives::register_primitives();
        let expr = Value::cons(Value::symbol("+"), Value::Integer(1));
        assert!(evaluate(&expr, &env).is_err());
    }
}
