//! # Symbolic Engine Module
//!
//! Symbolic expressions of one real variable. Every function text a user types into a
//! root-finding task (`f(x)`, `g(x)`, derivatives) ends up as an [`Expr`] tree: it is parsed by
//! [`crate::symbolic::parse_expr`], differentiated in
//! [`crate::symbolic::symbolic_engine_derivatives`] and evaluated here.
//!
//! ## Main Structures and Methods
//!
//! - `Expr` - recursive expression tree (variables, constants, arithmetic, elementary functions)
//! - `eval1D(x)` - evaluate an expression of a single variable
//! - `simplify_()` - fold constants and drop neutral elements (`x + 0`, `1 * x`, `x ^ 1`)
//! - `all_arguments_are_variables()` - sorted, deduplicated names of the variables
//! - `Display` - precedence-aware printing that parses back to the same tree value
#![allow(non_camel_case_types)]

use std::fmt;

/// Core symbolic expression enum: an abstract syntax tree of a real function.
///
/// # Examples
/// ```
/// use methodlab::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let f = x.clone() * x - Expr::Const(2.0);
/// assert_eq!(f.eval1D(3.0), 7.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    /// Natural logarithm
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent, mathematical notation 'tg'
    tg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent, mathematical notation 'arctg'
    arctg(Box<Expr>),
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(self.boxed(), exponent.boxed())
    }

    /// precedence used by `Display`: sums 1, products 2, powers 3, atoms 4.
    /// Negative constants print like a unary minus and rank with sums.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Const(val) if *val < 0.0 => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Pow(..) => 3,
            _ => 4,
        }
    }

    fn argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg) => Some(arg),
            _ => None,
        }
    }

    /// rebuilds a one-argument function node around a new argument
    fn with_argument(&self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            other => other.clone(),
        }
    }

    fn apply_function(&self, value: f64) -> f64 {
        match self {
            Expr::Exp(_) => value.exp(),
            Expr::Ln(_) => value.ln(),
            Expr::sin(_) => value.sin(),
            Expr::cos(_) => value.cos(),
            Expr::tg(_) => value.tan(),
            Expr::arcsin(_) => value.asin(),
            Expr::arccos(_) => value.acos(),
            Expr::arctg(_) => value.atan(),
            _ => value,
        }
    }

    /// Evaluates an expression of a single variable: every variable takes the value `x`.
    pub fn eval1D(&self, x: f64) -> f64 {
        match self {
            Expr::Var(_) => x,
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval1D(x) + rhs.eval1D(x),
            Expr::Sub(lhs, rhs) => lhs.eval1D(x) - rhs.eval1D(x),
            Expr::Mul(lhs, rhs) => lhs.eval1D(x) * rhs.eval1D(x),
            Expr::Div(lhs, rhs) => lhs.eval1D(x) / rhs.eval1D(x),
            Expr::Pow(base, exp) => base.eval1D(x).powf(exp.eval1D(x)),
            func => match func.argument() {
                Some(arg) => func.apply_function(arg.eval1D(x)),
                None => f64::NAN,
            },
        }
    }

    pub fn contains_variable(&self, var: &str) -> bool {
        match self {
            Expr::Var(name) => name == var,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_variable(var) || rhs.contains_variable(var),
            func => func.argument().is_some_and(|arg| arg.contains_variable(var)),
        }
    }

    /// names of all variables of the expression, sorted and deduplicated
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            func => {
                if let Some(arg) = func.argument() {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// One bottom-up simplification pass.
    fn simplify_once(&self) -> Expr {
        use Expr::*;
        match self {
            Var(_) | Const(_) => self.clone(),
            Add(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Const(a), Const(b)) => Const(a + b),
                (Const(a), e) | (e, Const(a)) if a == 0.0 => e,
                (l, r) => Add(l.boxed(), r.boxed()),
            },
            Sub(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Const(a), Const(b)) => Const(a - b),
                (e, Const(b)) if b == 0.0 => e,
                (Const(a), e) if a == 0.0 => Mul(Const(-1.0).boxed(), e.boxed()),
                (l, r) if l == r => Const(0.0),
                (l, r) => Sub(l.boxed(), r.boxed()),
            },
            Mul(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Const(a), Const(b)) => Const(a * b),
                (Const(a), _) | (_, Const(a)) if a == 0.0 => Const(0.0),
                (Const(a), e) | (e, Const(a)) if a == 1.0 => e,
                (Const(a), Mul(inner_l, inner_r)) => match *inner_l {
                    Const(b) => Mul(Const(a * b).boxed(), inner_r),
                    other => Mul(Const(a).boxed(), Mul(other.boxed(), inner_r).boxed()),
                },
                (e, Const(a)) => Mul(Const(a).boxed(), e.boxed()),
                (l, r) => Mul(l.boxed(), r.boxed()),
            },
            Div(lhs, rhs) => match (lhs.simplify_once(), rhs.simplify_once()) {
                (Const(a), Const(b)) if b != 0.0 => Const(a / b),
                (Const(a), _) if a == 0.0 => Const(0.0),
                (e, Const(b)) if b == 1.0 => e,
                (l, r) => Div(l.boxed(), r.boxed()),
            },
            Pow(base, exp) => match (base.simplify_once(), exp.simplify_once()) {
                (Const(a), Const(b)) => Const(a.powf(b)),
                (_, Const(b)) if b == 0.0 => Const(1.0),
                (e, Const(b)) if b == 1.0 => e,
                (b, e) => Pow(b.boxed(), e.boxed()),
            },
            func => match func.argument().map(|arg| arg.simplify_once()) {
                Some(Const(value)) => Const(func.apply_function(value)),
                Some(arg) => func.with_argument(arg),
                None => func.clone(),
            },
        }
    }

    /// Simplifies until the tree stops changing.
    pub fn simplify_(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..16 {
            let next = current.simplify_once();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn fmt_operand(f: &mut fmt::Formatter, operand: &Expr, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", operand)
        } else {
            write!(f, "{}", operand)
        }
    }

    fn fmt_binary(
        f: &mut fmt::Formatter,
        lhs: &Expr,
        op: &str,
        rhs: &Expr,
        precedence: u8,
    ) -> fmt::Result {
        // powers are right associative, everything else left associative
        let (left_parens, right_parens) = if precedence == 3 {
            (lhs.precedence() <= 3, rhs.precedence() < 3)
        } else {
            (
                lhs.precedence() < precedence,
                rhs.precedence() < precedence
                    || (rhs.precedence() == precedence && (op == "-" || op == "/")),
            )
        };
        Self::fmt_operand(f, lhs, left_parens)?;
        write!(f, " {} ", op)?;
        Self::fmt_operand(f, rhs, right_parens)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => Self::fmt_binary(f, lhs, "+", rhs, 1),
            Expr::Sub(lhs, rhs) => Self::fmt_binary(f, lhs, "-", rhs, 1),
            Expr::Mul(lhs, rhs) => Self::fmt_binary(f, lhs, "*", rhs, 2),
            Expr::Div(lhs, rhs) => Self::fmt_binary(f, lhs, "/", rhs, 2),
            Expr::Pow(base, exp) => Self::fmt_binary(f, base, "^", exp, 3),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
            Expr::arcsin(expr) => write!(f, "asin({})", expr),
            Expr::arccos(expr) => write!(f, "acos({})", expr),
            Expr::arctg(expr) => write!(f, "atan({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(val) => Expr::Const(-val),
            other => Expr::Mul(Expr::Const(-1.0).boxed(), other.boxed()),
        }
    }
}
