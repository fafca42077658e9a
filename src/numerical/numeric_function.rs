//! Scalar functions of one real variable, with up to two derivatives, as seen by the
//! root-finding engine.
use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::Expr;

/// Trait for representing a scalar function f(x) and, optionally, its first two derivatives
pub trait NumericFunction: Sync {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> f64;

    /// First derivative at x, `None` when the function does not provide one
    fn derivative1(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Second derivative at x, `None` when the function does not provide one
    fn derivative2(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

/// Simple function wrapper for closures
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    func: F,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    pub fn new(func: F, name: String) -> Self {
        Self { func, name }
    }
}

impl<F> NumericFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Function wrapper with analytical first and second derivatives
pub struct FunctionWithDerivatives<F, D1, D2>
where
    F: Fn(f64) -> f64 + Sync,
    D1: Fn(f64) -> f64 + Sync,
    D2: Fn(f64) -> f64 + Sync,
{
    func: F,
    derivative1_func: D1,
    derivative2_func: Option<D2>,
    name: String,
}

impl<F, D1> FunctionWithDerivatives<F, D1, fn(f64) -> f64>
where
    F: Fn(f64) -> f64 + Sync,
    D1: Fn(f64) -> f64 + Sync,
{
    /// function with its first derivative only
    pub fn new(func: F, derivative1_func: D1, name: String) -> Self {
        Self {
            func,
            derivative1_func,
            derivative2_func: None,
            name,
        }
    }
}

impl<F, D1, D2> FunctionWithDerivatives<F, D1, D2>
where
    F: Fn(f64) -> f64 + Sync,
    D1: Fn(f64) -> f64 + Sync,
    D2: Fn(f64) -> f64 + Sync,
{
    pub fn with_second_derivative(
        func: F,
        derivative1_func: D1,
        derivative2_func: D2,
        name: String,
    ) -> Self {
        Self {
            func,
            derivative1_func,
            derivative2_func: Some(derivative2_func),
            name,
        }
    }
}

impl<F, D1, D2> NumericFunction for FunctionWithDerivatives<F, D1, D2>
where
    F: Fn(f64) -> f64 + Sync,
    D1: Fn(f64) -> f64 + Sync,
    D2: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn derivative1(&self, x: f64) -> Option<f64> {
        Some((self.derivative1_func)(x))
    }

    fn derivative2(&self, x: f64) -> Option<f64> {
        self.derivative2_func.as_ref().map(|d2| d2(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

////////////////////////SYMBOLIC FUNCTIONS//////////////////////////////////////////
/// Function given as text. The first two derivatives are derived analytically on
/// construction; explicitly supplied derivative texts replace them.
///
/// # Examples
/// ```
/// use methodlab::numerical::numeric_function::{NumericFunction, SymbolicFunction};
/// let f = SymbolicFunction::from_str("x^3 - 2*x - 5", "x").unwrap();
/// assert_eq!(f.evaluate(2.0), -1.0);
/// assert_eq!(f.derivative1(2.0), Some(10.0));
/// assert_eq!(f.derivative2(2.0), Some(12.0));
/// ```
#[derive(Debug, Clone)]
pub struct SymbolicFunction {
    expr: Expr,
    derivatives: [Expr; 2],
    variable: String,
    name: String,
}

impl SymbolicFunction {
    fn parse_in(text: &str, variable: &str) -> Result<Expr, ParseError> {
        let expr = Expr::parse_expression(text)?;
        if let Some(found) = expr
            .all_arguments_are_variables()
            .into_iter()
            .find(|var| var != variable)
        {
            return Err(ParseError::UnexpectedVariable {
                expression: text.to_string(),
                found,
                expected: variable.to_string(),
            });
        }
        Ok(expr)
    }

    pub fn from_str(text: &str, variable: &str) -> Result<Self, ParseError> {
        let expr = Self::parse_in(text, variable)?;
        let first = expr.n_th_derivative(variable, 1);
        let second = first.n_th_derivative(variable, 1);
        Ok(Self {
            expr,
            derivatives: [first, second],
            variable: variable.to_string(),
            name: text.trim().to_string(),
        })
    }

    /// Replaces the derived first derivative. The second derivative is re-derived from the
    /// supplied text; call [`Self::with_second_derivative`] afterwards to override it too.
    pub fn with_derivative(mut self, text: &str) -> Result<Self, ParseError> {
        let first = Self::parse_in(text, &self.variable)?;
        self.derivatives[1] = first.n_th_derivative(&self.variable, 1);
        self.derivatives[0] = first;
        Ok(self)
    }

    /// replaces the derived second derivative
    pub fn with_second_derivative(mut self, text: &str) -> Result<Self, ParseError> {
        self.derivatives[1] = Self::parse_in(text, &self.variable)?;
        Ok(self)
    }

    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Text of the derivative of the given order (0 is the function itself).
    pub fn derivative_string(&self, order: usize) -> String {
        match order {
            0 => self.expr.to_string(),
            1 | 2 => self.derivatives[order - 1].to_string(),
            n => self.expr.n_th_derivative(&self.variable, n).to_string(),
        }
    }
}

impl NumericFunction for SymbolicFunction {
    fn evaluate(&self, x: f64) -> f64 {
        self.expr.eval1D(x)
    }

    fn derivative1(&self, x: f64) -> Option<f64> {
        Some(self.derivatives[0].eval1D(x))
    }

    fn derivative2(&self, x: f64) -> Option<f64> {
        Some(self.derivatives[1].eval1D(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closure_function_has_no_derivatives() {
        let f = ClosureFunction::new(|x| x * x - 2.0, "x^2 - 2".to_string());
        assert_eq!(f.evaluate(2.0), 2.0);
        assert_eq!(f.derivative1(2.0), None);
        assert_eq!(f.derivative2(2.0), None);
        assert_eq!(f.name(), "x^2 - 2");
    }

    #[test]
    fn test_function_with_derivatives() {
        let f = FunctionWithDerivatives::new(|x| x * x, |x| 2.0 * x, "x^2".to_string());
        assert_eq!(f.derivative1(3.0), Some(6.0));
        assert_eq!(f.derivative2(3.0), None);

        let g = FunctionWithDerivatives::with_second_derivative(
            |x: f64| x.powi(3),
            |x: f64| 3.0 * x * x,
            |x: f64| 6.0 * x,
            "x^3".to_string(),
        );
        assert_eq!(g.derivative2(2.0), Some(12.0));
    }

    #[test]
    fn test_symbolic_function_derives_derivatives() {
        let f = SymbolicFunction::from_str("exp(x) - 3*x^2", "x").unwrap();
        let x: f64 = 0.7;
        assert_relative_eq!(f.evaluate(x), x.exp() - 3.0 * x * x, epsilon = 1e-14);
        assert_relative_eq!(f.derivative1(x).unwrap(), x.exp() - 6.0 * x, epsilon = 1e-14);
        assert_relative_eq!(f.derivative2(x).unwrap(), x.exp() - 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_supplied_derivative_overrides_derived_one() {
        let f = SymbolicFunction::from_str("x^2", "x")
            .unwrap()
            .with_derivative("2*x + 1")
            .unwrap();
        assert_eq!(f.derivative1(1.0), Some(3.0));
        assert_eq!(f.derivative2(1.0), Some(2.0));
    }

    #[test]
    fn test_second_derivative_follows_supplied_first() {
        let f = SymbolicFunction::from_str("x^2", "x")
            .unwrap()
            .with_derivative("3*x^2")
            .unwrap();
        assert_relative_eq!(f.derivative2(1.0).unwrap(), 6.0);
        assert_relative_eq!(f.derivative2(2.0).unwrap(), 12.0);
        let g = f.with_second_derivative("5").unwrap();
        assert_relative_eq!(g.derivative1(1.0).unwrap(), 3.0);
        assert_eq!(g.derivative2(2.0), Some(5.0));
    }

    #[test]
    fn test_unexpected_variable_is_rejected() {
        let err = SymbolicFunction::from_str("x * y + 1", "x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedVariable {
                expression: "x * y + 1".to_string(),
                found: "y".to_string(),
                expected: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_derivative_string() {
        let f = SymbolicFunction::from_str("x^3 - 2*x - 5", "x").unwrap();
        let d1 = Expr::parse_expression(&f.derivative_string(1)).unwrap();
        assert_relative_eq!(d1.eval1D(2.0), 10.0);
        let d3 = Expr::parse_expression(&f.derivative_string(3)).unwrap();
        assert_relative_eq!(d3.eval1D(5.0), 6.0);
        assert_eq!(f.derivative_string(0), f.expression().to_string());
    }
}
