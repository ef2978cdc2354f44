// ABOUTME: Arithmetic and comparison primitives: + - * mod / = < <= > >= randint! (§4.4)

use rand::Rng;

use crate::error::LispError;
use crate::eval::evaluate;
use crate::value::{Arity, Builtin, Value};

pub fn table() -> Vec<(&'static str, Value)> {
    vec![
        (ADD.name, Value::Builtin(&ADD)),
        (SUB.name, Value::Builtin(&SUB)),
        (MUL.name, Value::Builtin(&MUL)),
        (MODULO.name, Value::Builtin(&MODULO)),
        (DIV.name, Value::Builtin(&DIV)),
        (EQ.name, Value::Builtin(&EQ)),
        (LT.name, Value::Builtin(&LT)),
        (LE.name, Value::Builtin(&LE)),
        (GT.name, Value::Builtin(&GT)),
        (GE.name, Value::Builtin(&GE)),
        (RANDINT.name, Value::Builtin(&RANDINT)),
    ]
}

fn as_integer(op: &str, value: &Value) -> Result<i64, LispError> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(LispError::wrong_operator_usage(
            op,
            format!("expected an integer, got {}", other.type_name()),
        )),
    }
}

static ADD: Builtin = Builtin {
    name: "+",
    arity: Arity::Variadic,
    doc: "(+ n1 … nk) sums integers; () is 0.",
    handler: |env, args| {
        let mut total: i64 = 0;
        for arg in args {
            total += as_integer("+", &evaluate(arg, env)?)?;
        }
        Ok(Value::Integer(total))
    },
};

static SUB: Builtin = Builtin {
    name: "-",
    arity: Arity::Exact(2),
    doc: "(- a b) subtracts b from a.",
    handler: |env, args| {
        let a = as_integer("-", &evaluate(&args[0], env)?)?;
        let b = as_integer("-", &evaluate(&args[1], env)?)?;
        Ok(Value::Integer(a - b))
    },
};

static MUL: Builtin = Builtin {
    name: "*",
    arity: Arity::Variadic,
    doc: "(* n1 … nk) multiplies integers; () is 1.",
    handler: |env, args| {
        let mut product: i64 = 1;
        for arg in args {
            product *= as_integer("*", &evaluate(arg, env)?)?;
        }
        Ok(Value::Integer(product))
    },
};

static MODULO: Builtin = Builtin {
    name: "mod",
    arity: Arity::Exact(2),
    doc: "(mod a b) is a modulo b, following the dividend's sign.",
    handler: |env, args| {
        let a = as_integer("mod", &evaluate(&args[0], env)?)?;
        let b = as_integer("mod", &evaluate(&args[1], env)?)?;
        if b == 0 {
            return Err(LispError::runtime("Division by 0"));
        }
        Ok(Value::Integer(a % b))
    },
};

static DIV: Builtin = Builtin {
    name: "/",
    arity: Arity::Exact(2),
    doc: "(/ a b) divides a by b, returning a real.",
    handler: |env, args| {
        let a = as_integer("/", &evaluate(&args[0], env)?)?;
        let b = as_integer("/", &evaluate(&args[1], env)?)?;
        if b == 0 {
            return Err(LispError::runtime("Division by 0"));
        }
        Ok(Value::Real(a as f64 / b as f64))
    },
};

static EQ: Builtin = Builtin {
    name: "=",
    arity: Arity::Exact(2),
    doc: "(= a b) compares two integers for equality.",
    handler: |env, args| {
        let a = as_integer("=", &evaluate(&args[0], env)?)?;
        let b = as_integer("=", &evaluate(&args[1], env)?)?;
        Ok(Value::Boolean(a == b))
    },
};

static LT: Builtin = Builtin {
    name: "<",
    arity: Arity::Exact(2),
    doc: "(< a b) is true iff a is strictly less than b.",
    handler: |env, args| {
        let a = as_integer("<", &evaluate(&args[0], env)?)?;
        let b = as_integer("<", &evaluate(&args[1], env)?)?;
        Ok(Value::Boolean(a < b))
    },
};

static LE: Builtin = Builtin {
    name: "<=",
    arity: Arity::Exact(2),
    doc: "(<= a b) is true iff a is less than or equal to b.",
    handler: |env, args| {
        let a = as_integer("<=", &evaluate(&args[0], env)?)?;
        let b = as_integer("<=", &evaluate(&args[1], env)?)?;
        Ok(Value::Boolean(a <= b))
    },
};

static GT: Builtin = Builtin {
    name: ">",
    arity: Arity::Exact(2),
    doc: "(> a b) is true iff a is strictly greater than b.",
    handler: |env, args| {
        let a = as_integer(">", &evaluate(&args[0], env)?)?;
        let b = as_integer(">", &evaluate(&args[1], env)?)?;
        Ok(Value::Boolean(a > b))
    },
};

static GE: Builtin = Builtin {
    name: ">=",
    arity: Arity::Exact(2),
    doc: "(>= a b) is true iff a is greater than or equal to b.",
    handler: |env, args| {
        let a = as_integer(">=", &evaluate(&args[0], env)?)?;
        let b = as_integer(">=", &evaluate(&args[1], env)?)?;
        Ok(Value::Boolean(a >= b))
    },
};

static RANDINT: Builtin = Builtin {
    name: "randint!",
    arity: Arity::Exact(2),
    doc: "(randint! lo hi) returns a uniformly random integer in [lo, hi].",
    handler: |env, args| {
        let lo = as_integer("randint!", &evaluate(&args[0], env)?)?;
        let hi = as_integer("randint!", &evaluate(&args[1], env)?)?;
        if lo > hi {
            return Err(LispError::wrong_operator_usage(
                "randint!",
                format!("lower bound {lo} exceeds upper bound {hi}"),
            ));
        }
        let mut rng = rand::thread_rng();
        Ok(Value::Integer(rng.gen_range(lo..=hi)))
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::primitives::register_primitives;

    fn call(name: &str, args: Vec<Value>) -> Value {
        let env = register_primitives();
        let mut form = vec![Value::symbol(name)];
        form.extend(args);
        evaluate(&Value::from_vec(form), &env).unwrap()
    }

    #[test]
    fn test_add_variadic_and_empty() {
        assert_eq!(
            call("+", vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]),
            Value::Integer(6)
        );
        assert_eq!(call("+", vec![]), Value::Integer(0));
    }

    #[test]
    fn test_sub() {
        assert_eq!(call("-", vec![Value::Integer(5), Value::Integer(3)]), Value::Integer(2));
    }

    #[test]
    fn test_mul_variadic_and_empty() {
        assert_eq!(
            call("*", vec![Value::Integer(2), Value::Integer(3), Value::Integer(4)]),
            Value::Integer(24)
        );
        assert_eq!(call("*", vec![]), Value::Integer(1));
    }

    #[test]
    fn test_mod_follows_dividend_sign() {
        assert_eq!(call("mod", vec![Value::Integer(-7), Value::Integer(3)]), Value::Integer(-1));
        assert_eq!(call("mod", vec![Value::Integer(7), Value::Integer(3)]), Value::Integer(1));
    }

    #[test]
    fn test_div_returns_real() {
        assert_eq!(call("/", vec![Value::Integer(7), Value::Integer(2)]), Value::Real(3.5));
    }

    #[test]
    fn test_div_by_zero_errors() {
        let env = register_primitives();
        let expr = Value::from_vec(vec![Value::symbol("/"), Value::Integer(1), Value::Integer(0)]);
        assert!(evaluate(&expr, &env).is_err());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(call("=", vec![Value::Integer(3), Value::Integer(3)]), Value::Boolean(true));
        assert_eq!(call("<", vec![Value::Integer(2), Value::Integer(3)]), Value::Boolean(true));
        assert_eq!(call("<=", vec![Value::Integer(3), Value::Integer(3)]), Value::Boolean(true));
        assert_eq!(call(">", vec![Value::Integer(3), Value::Integer(2)]), Value::Boolean(true));
        assert_eq!(call(">=", vec![Value::Integer(3), Value::Integer(3)]), Value::Boolean(true));
    }

    #[test]
    fn test_randint_within_bounds() {
        for _ in 0..20 {
            match call("randint!", vec![Value::Integer(1), Value::Integer(1)]) {
                Value::Integer(n) => assert_eq!(n, 1),
                other => panic!("expected integer, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_randint_inverted_bounds_errors() {
        let env = register_primitives();
        let expr = Value::from_vec(vec![
            Value::symbol("randint!"),
            Value::Integer(5),
            Value::Integer(1),
        ]);
        assert!(evaluate(&expr, &env).is_err());
    }
}
