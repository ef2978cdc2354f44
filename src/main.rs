mod ast;
mod env;
mod error;
mod eval;
mod highlighter;
mod parser;
mod primitives;
mod reify;
mod repl;
mod value;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// A small Lisp-family interpreter: parser, code-as-data reifier, and
/// lexical evaluator.
#[derive(Parser, Debug)]
#[command(name = "corelisp")]
#[command(version)]
#[command(about = "A small Lisp-family interpreter")]
struct CliArgs {
    /// Program to run; if omitted, launches a REPL
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Print the result of every REPL form, including Nil
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match args.script {
        Some(path) => match repl::run_file(&path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        None => match repl::run(args.debug) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
