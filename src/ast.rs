// ABOUTME: AST node types produced by the tokenizer/parser (§6.1)

/// The surface-syntax tree the parser produces. Kept distinct from `Value`
/// on purpose (§9 Design Notes, "AST vs code value"): the reifier collapses
/// literal variants to host values and identifiers to symbols so macros can
/// operate on code uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Identifier(String),
    IntLiteral(i64),
    StringLiteral(String),
    ExpressionList(Vec<Ast>),
}
