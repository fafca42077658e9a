#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use methodlab::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("x^2 + sin(x)").unwrap();
/// let df_dx = expr.diff("x");
/// assert_eq!(df_dx.eval1D(0.0), 1.0);
/// ```
pub mod parse_expr;
/// symbolic expression tree: construction, printing, evaluation and simplification
pub mod symbolic_engine;
/// analytic derivatives of symbolic expressions
pub mod symbolic_engine_derivatives;
