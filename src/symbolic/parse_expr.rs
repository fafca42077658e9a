//! Text to [`Expr`] parser built on nom.
//!
//! Grammar (lowest to highest binding):
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := ('-' | '+') unary | power
//! power      := atom (('^' | '**') unary)?
//! atom       := number | function '(' expression ')' | identifier | '(' expression ')'
//! ```
//! `pi` and `e` are read as constants, `sqrt(u)` becomes `u ^ 0.5`.
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, not, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,
    #[error("cannot parse expression '{input}': unexpected input at '{rest}'")]
    Syntax { input: String, rest: String },
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("expression '{expression}' depends on '{found}', only '{expected}' is allowed")]
    UnexpectedVariable {
        expression: String,
        found: String,
        expected: String,
    },
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Expr> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    map_res(recognize(pair(mantissa, exponent)), |s: &str| {
        s.parse::<f64>().map(Expr::Const)
    })
    .parse(input)
}

fn build_function(name: &str, arg: Expr) -> Option<Expr> {
    let arg = arg.boxed();
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "sqrt" => Expr::Pow(arg, Expr::Const(0.5).boxed()),
        _ => return None,
    };
    Some(expr)
}

/// `name(expression)`; an unknown name is a hard failure carrying the name position
fn call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, arg) = delimited(ws(char('(')), expression, char(')')).parse(rest)?;
    match build_function(name, arg) {
        Some(expr) => Ok((rest, expr)),
        None => Err(nom::Err::Failure(NomError::new(input, ErrorKind::Verify))),
    }
}

fn symbol(input: &str) -> IResult<&str, Expr> {
    map(identifier, |name: &str| match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    })
    .parse(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        number,
        call,
        symbol,
        delimited(char('('), expression, char(')')),
    )))
    .parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    let (input, exponent) =
        opt(preceded(ws(alt((tag("**"), tag("^")))), unary)).parse(input)?;
    let expr = match exponent {
        Some(exponent) => base.pow(exponent),
        None => base,
    };
    Ok((input, expr))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |expr| -expr),
        preceded(ws(char('+')), unary),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        ws(alt((terminated(char('*'), not(char('*'))), char('/')))),
        unary,
    ))
    .parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

fn expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term)).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

impl Expr {
    /// Parses a function text such as `x^3 - 2*x - 5` or `exp(-x) * sin(2*x)`.
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        match all_consuming(ws(expression)).parse(input) {
            Ok((_, expr)) => Ok(expr),
            Err(nom::Err::Failure(e)) => {
                let name: String = e
                    .input
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_')
                    .collect();
                Err(ParseError::UnknownFunction(name))
            }
            Err(nom::Err::Error(e)) => Err(ParseError::Syntax {
                input: input.to_string(),
                rest: e.input.to_string(),
            }),
            Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax {
                input: input.to_string(),
                rest: String::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(text: &str, x: f64) -> f64 {
        Expr::parse_expression(text).unwrap().eval1D(x)
    }

    #[test]
    fn test_parse_polynomial() {
        assert_relative_eq!(eval("x^3 - 2*x - 5", 2.0), -1.0);
        assert_relative_eq!(eval("x**3 - 2*x - 5", 3.0), 16.0);
        assert_relative_eq!(eval("  2.5e1 * x  ", 2.0), 50.0);
        assert_relative_eq!(eval(".5 + x", 1.0), 1.5);
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_relative_eq!(eval("2 + 3 * 4", 0.0), 14.0);
        assert_relative_eq!(eval("10 - 4 - 3", 0.0), 3.0);
        assert_relative_eq!(eval("2 ^ 3 ^ 2", 0.0), 512.0);
        assert_relative_eq!(eval("-x^2", 3.0), -9.0);
        assert_relative_eq!(eval("2^-1", 0.0), 0.5);
        assert_relative_eq!(eval("8 / 2 / 2", 0.0), 2.0);
        assert_relative_eq!(eval("(1 + x) * (1 - x)", 2.0), -3.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_relative_eq!(eval("sin(pi/2)", 0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(eval("ln(e)", 0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(eval("sqrt(x)", 16.0), 4.0);
        assert_relative_eq!(eval("exp(-x) - x", 0.0), 1.0);
        assert_relative_eq!(eval("atan(1)", 0.0), PI / 4.0, epsilon = 1e-15);
        assert_relative_eq!(eval("tan(x) + cos(x)", 0.0), 1.0);
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["x - (x - 2)", "(x + 1) ^ 2 / (x - 3)", "-x^2 + exp(2*x)", "2^3^x"] {
            let expr = Expr::parse_expression(text).unwrap();
            let reparsed = Expr::parse_expression(&expr.to_string()).unwrap();
            for x in [0.3, 1.7, -2.2] {
                assert_relative_eq!(expr.eval1D(x), reparsed.eval1D(x), max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(Expr::parse_expression("   "), Err(ParseError::Empty));
        assert_eq!(
            Expr::parse_expression("x + foo(x)"),
            Err(ParseError::UnknownFunction("foo".to_string()))
        );
        assert!(matches!(
            Expr::parse_expression("2x"),
            Err(ParseError::Syntax { .. })
        ));
        assert!(matches!(
            Expr::parse_expression("(x + 1"),
            Err(ParseError::Syntax { .. })
        ));
        assert!(matches!(
            Expr::parse_expression("x +"),
            Err(ParseError::Syntax { .. })
        ));
    }
}
