// ABOUTME: The interactive line-oriented shell (§6.3)

use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

use crate::env::Environment;
use crate::error::LispError;
use crate::eval::evaluate;
use crate::highlighter::LispHelper;
use crate::parser::parse_expression;
use crate::primitives::register_primitives;
use crate::reify::reify;

pub const WELCOME_MESSAGE: &str = "corelisp — a small Lisp-family interpreter";
pub const HISTORY_FILE: &str = ".corelisp_history";

/// Parses one expression per line, evaluates it against a shared environment,
/// and prints its pretty form — unless the result is Nil and `debug` is
/// false. A line `:q`, or end-of-input, terminates the loop. Returns the
/// number of unhandled errors seen, so the caller can pick an exit status.
pub fn run(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env = register_primitives();

    let config = Config::builder().auto_add_history(true).build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(LispHelper::new()));
    let _ = rl.load_history(HISTORY_FILE);

    println!("{WELCOME_MESSAGE}");

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if line.trim() == ":q" {
                    break;
                }
                eval_line(&line, &env, debug);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

fn eval_line(line: &str, env: &Rc<Environment>, debug: bool) {
    let ast = match parse_expression(line) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    match evaluate(&reify(&ast), env) {
        Ok(value) => {
            if debug || value != crate::value::Value::Nil {
                println!("{value}");
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}

/// Evaluates a file's forms sequentially under a fresh primitive
/// environment, propagating the first error it encounters (§6.3, §7: "the
/// file interpreter propagates the first error").
pub fn run_file(path: &std::path::Path) -> Result<(), LispError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| LispError::runtime(format!("cannot read {}: {e}", path.display())))?;
    let forms = crate::parser::parse_file(&source)?;
    let env = register_primitives();
    for ast in &forms {
        evaluate(&reify(ast), &env)?;
    }
    Ok(())
}
