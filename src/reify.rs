// ABOUTME: The reifier turning AST nodes into code values (§4.1)

use crate::ast::Ast;
use crate::value::Value;

/// Converts an AST node into a code value by structural recursion. Total and
/// side-effect-free: identifiers become symbols, literals become their host
/// value, and expression lists become proper lists built from cons cells
/// (the empty list reifies to Nil).
pub fn reify(ast: &Ast) -> Value {
    match ast {
        Ast::Identifier(name) => Value::symbol(name.as_str()),
        Ast::IntLiteral(i) => Value::Integer(*i),
        Ast::StringLiteral(s) => Value::string(s.as_str()),
        Ast::ExpressionList(items) => Value::from_vec(items.iter().map(reify).collect()),
    }
}
