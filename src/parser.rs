// ABOUTME: Tokenizer/parser turning surface syntax into AST nodes (§6.1)

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace1, one_of},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};

use crate::ast::Ast;
use crate::error::LispError;

const IDENT_START: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz+-*/=<>!?_";
const IDENT_CONT_EXTRA: &str = "0123456789";

fn is_ident_start(c: char) -> bool {
    IDENT_START.contains(c)
}

fn is_ident_cont(c: char) -> bool {
    IDENT_START.contains(c) || IDENT_CONT_EXTRA.contains(c)
}

fn ws(input: &str) -> IResult<&str, ()> {
    map(
        many0(alt((
            map(multispace1, |_| ()),
            map(line_comment, |_| ()),
        ))),
        |_| (),
    )
    .parse(input)
}

/// A `;`-to-end-of-line comment. Not part of §6.1's grammar proper, but
/// harmless plumbing every surface syntax of this shape carries.
fn line_comment(input: &str) -> IResult<&str, &str> {
    let (input, _) = char(';')(input)?;
    take_while(|c: char| c != '\n')(input)
}

fn int_literal(input: &str) -> IResult<&str, Ast> {
    map(
        recognize((opt(char('-')), digit1)),
        |s: &str| Ast::IntLiteral(s.parse().expect("digit1 guarantees a parseable integer")),
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Ast> {
    alt((quoted('"'), quoted('\''))).parse(input)
}

fn quoted(delim: char) -> impl Fn(&str) -> IResult<&str, Ast> {
    move |input: &str| {
        let (input, _) = char(delim)(input)?;
        let (input, content) = take_while(|c: char| c != delim && c != '\\')(input)?;
        let (input, _) = char(delim)(input)?;
        Ok((input, Ast::StringLiteral(content.to_string())))
    }
}

fn identifier(input: &str) -> IResult<&str, Ast> {
    let (input, first) = one_of(IDENT_START)(input)?;
    let (input, rest) = take_while(is_ident_cont)(input)?;
    let mut name = String::new();
    name.push(first);
    name.push_str(rest);
    Ok((input, Ast::Identifier(name)))
}

fn quote_prefixed(input: &str) -> IResult<&str, Ast> {
    map(preceded(char('\''), expression), |expr| {
        Ast::ExpressionList(vec![Ast::Identifier("quote".to_string()), expr])
    })
    .parse(input)
}

fn expression_list(input: &str) -> IResult<&str, Ast> {
    let (input, _) = char('(')(input)?;
    let (input, _) = ws(input)?;
    let (input, items) = many0(terminated_expression).parse(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Ast::ExpressionList(items)))
}

fn terminated_expression(input: &str) -> IResult<&str, Ast> {
    let (input, expr) = expression(input)?;
    let (input, _) = ws(input)?;
    Ok((input, expr))
}

fn expression(input: &str) -> IResult<&str, Ast> {
    alt((
        quote_prefixed,
        expression_list,
        int_literal,
        string_literal,
        identifier,
    ))
    .parse(input)
}

fn top_level_expression(input: &str) -> IResult<&str, Ast> {
    let (input, _) = ws(input)?;
    let (input, expr) = expression(input)?;
    let (input, _) = ws(input)?;
    Ok((input, expr))
}

/// Parses a single expression, failing if trailing input remains.
pub fn parse_expression(input: &str) -> Result<Ast, LispError> {
    match top_level_expression(input) {
        Ok((rest, ast)) if rest.is_empty() => Ok(ast),
        Ok((rest, _)) => Err(LispError::Parse(format!(
            "unexpected trailing input: '{rest}'"
        ))),
        Err(e) => Err(LispError::Parse(format!("{e:?}"))),
    }
}

/// A file is a sequence of top-level expressions.
pub fn parse_file(input: &str) -> Result<Vec<Ast>, LispError> {
    let mut remaining = input;
    let mut forms = Vec::new();
    loop {
        let (rest, _) = ws(remaining).map_err(|e| LispError::Parse(format!("{e:?}")))?;
        if rest.is_empty() {
            return Ok(forms);
        }
        let (rest, expr) =
            top_level_expression(rest).map_err(|e| LispError::Parse(format!("{e:?}")))?;
        forms.push(expr);
        remaining = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_expression("42").unwrap(), Ast::IntLiteral(42));
        assert_eq!(parse_expression("-7").unwrap(), Ast::IntLiteral(-7));
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(
            parse_expression("foo-bar?").unwrap(),
            Ast::Identifier("foo-bar?".to_string())
        );
        assert_eq!(parse_expression("+").unwrap(), Ast::Identifier("+".to_string()));
    }

    #[test]
    fn test_parse_string_double_quoted() {
        assert_eq!(
            parse_expression("\"hello world\"").unwrap(),
            Ast::StringLiteral("hello world".to_string())
        );
    }

    #[test]
    fn test_parse_string_single_quoted() {
        assert_eq!(
            parse_expression("'hello'").unwrap(),
            Ast::StringLiteral("hello".to_string())
        );
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(
            parse_expression("()").unwrap(),
            Ast::ExpressionList(vec![])
        );
    }

    #[test]
    fn test_parse_nested_list() {
        let ast = parse_expression("(+ 1 (* 2 3))").unwrap();
        assert_eq!(
            ast,
            Ast::ExpressionList(vec![
                Ast::Identifier("+".to_string()),
                Ast::IntLiteral(1),
                Ast::ExpressionList(vec![
                    Ast::Identifier("*".to_string()),
                    Ast::IntLiteral(2),
                    Ast::IntLiteral(3),
                ]),
            ])
        );
    }

    #[test]
    fn test_quote_prefix_desugars() {
        let ast = parse_expression("'x").unwrap();
        assert_eq!(
            ast,
            Ast::ExpressionList(vec![
                Ast::Identifier("quote".to_string()),
                Ast::Identifier("x".to_string()),
            ])
        );
    }

    #[test]
    fn test_quote_prefix_on_list() {
        let ast = parse_expression("'(1 2 3)").unwrap();
        assert_eq!(
            ast,
            Ast::ExpressionList(vec![
                Ast::Identifier("quote".to_string()),
                Ast::ExpressionList(vec![
                    Ast::IntLiteral(1),
                    Ast::IntLiteral(2),
                    Ast::IntLiteral(3),
                ]),
            ])
        );
    }

    #[test]
    fn test_trailing_input_is_an_error() {
        assert!(parse_expression("1 2").is_err());
    }

    #[test]
    fn test_unclosed_list_is_an_error() {
        assert!(parse_expression("(1 2").is_err());
    }

    #[test]
    fn test_parse_file_multiple_forms() {
        let forms = parse_file("(define! x 1)\n(define! y 2)\n").unwrap();
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn test_parse_file_skips_comments() {
        let forms = parse_file("; a comment\n42 ; trailing\n").unwrap();
        assert_eq!(forms, vec![Ast::IntLiteral(42)]);
    }

    #[test]
    fn test_parse_file_empty_input() {
        assert_eq!(parse_file("   \n  ").unwrap(), Vec::<Ast>::new());
    }
}
