//! Analytic differentiation of [`Expr`] trees.
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Derivative with respect to `var`. The result is not simplified.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => lhs.diff(var) + rhs.diff(var),
            Expr::Sub(lhs, rhs) => lhs.diff(var) - rhs.diff(var),
            Expr::Mul(lhs, rhs) => {
                *lhs.clone() * rhs.diff(var) + lhs.diff(var) * *rhs.clone()
            }
            Expr::Div(lhs, rhs) => {
                (lhs.diff(var) * *rhs.clone() - *lhs.clone() * rhs.diff(var))
                    / (*rhs.clone()).pow(Expr::Const(2.0))
            }
            Expr::Pow(base, exp) => {
                let base = *base.clone();
                let exp = *exp.clone();
                if !exp.contains_variable(var) {
                    // power rule: n * u^(n-1) * u'
                    exp.clone() * base.clone().pow(exp - Expr::Const(1.0)) * base.diff(var)
                } else if !base.contains_variable(var) {
                    // a^v = a^v * ln(a) * v'
                    let d_exp = exp.diff(var);
                    base.clone().pow(exp) * Expr::Ln(base.boxed()) * d_exp
                } else {
                    // u^v * (v' ln(u) + v u'/u)
                    let d_base = base.diff(var);
                    let d_exp = exp.diff(var);
                    base.clone().pow(exp.clone())
                        * (d_exp * Expr::Ln(base.clone().boxed()) + exp * d_base / base)
                }
            }
            Expr::Exp(arg) => Expr::Exp(arg.clone()) * arg.diff(var),
            Expr::Ln(arg) => arg.diff(var) / *arg.clone(),
            Expr::sin(arg) => Expr::cos(arg.clone()) * arg.diff(var),
            Expr::cos(arg) => -Expr::sin(arg.clone()) * arg.diff(var),
            Expr::tg(arg) => arg.diff(var) / Expr::cos(arg.clone()).pow(Expr::Const(2.0)),
            Expr::arcsin(arg) => {
                arg.diff(var)
                    / (Expr::Const(1.0) - (*arg.clone()).pow(Expr::Const(2.0))).pow(Expr::Const(0.5))
            }
            Expr::arccos(arg) => {
                -arg.diff(var)
                    / (Expr::Const(1.0) - (*arg.clone()).pow(Expr::Const(2.0))).pow(Expr::Const(0.5))
            }
            Expr::arctg(arg) => {
                arg.diff(var) / (Expr::Const(1.0) + (*arg.clone()).pow(Expr::Const(2.0)))
            }
        }
    }

    /// n-th derivative, simplified after every step
    pub fn n_th_derivative(&self, var: &str, n: usize) -> Expr {
        let mut derivative = self.simplify_();
        for _ in 0..n {
            derivative = derivative.diff(var).simplify_();
        }
        derivative
    }
}
