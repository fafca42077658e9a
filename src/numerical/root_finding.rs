//! # Root finding
//!
//! Six classical iterations for a scalar equation f(x) = 0, each producing the complete trace
//! of its execution:
//!
//! | method | inputs | update |
//! |---|---|---|
//! | bisection | f, a, b | m = (a + b) / 2 |
//! | false position | f, a, b | m = a - f(a)(b - a) / (f(b) - f(a)) |
//! | fixed point | g, x0 | x_{n+1} = g(x_n) |
//! | Newton-Raphson | f, f', x0 | x_{n+1} = x_n - f(x_n) / f'(x_n) |
//! | secant | f, x0, x1 | x_{n+1} = x_n - f(x_n)(x_n - x_{n-1}) / (f(x_n) - f(x_{n-1})) |
//! | multiple roots | f, f', f'', x0 | x_{n+1} = x_n - f f' / (f'^2 - f f'') |
//!
//! Bad inputs are rejected with a [`RootFindingError`] before anything is recorded. Once a run
//! has started it always returns a [`RootFindingResult`]: converged, out of iterations, or
//! stopped by a numerical breakdown, with the partial trace in every case.
//!
//! Open methods record the initial point as iteration 1 (its error is `n/a`, there is no prior
//! iterate); bracketing methods record each new midpoint together with the bracket it was taken
//! from.
//!
//! # Examples
//! ```
//! use methodlab::numerical::numeric_function::SymbolicFunction;
//! use methodlab::numerical::root_finding::ScalarRootFinder;
//! let f = SymbolicFunction::from_str("x^3 - 2*x - 5", "x").unwrap();
//! let mut solver = ScalarRootFinder::new();
//! solver.set_tolerance(1e-8);
//! let result = solver.newton_raphson(&f, 2.5).unwrap();
//! assert!(result.converged);
//! assert!((result.root.unwrap() - 2.0945514815).abs() < 1e-8);
//! ```
use crate::Utils::logger::{TraceTable, format_error, format_value};
use crate::numerical::convergence::{
    Breakdown, ConvergenceCriterion, DIVERGENCE_GUARD, ErrorKind, FailureKind, RunOutcome,
    ZERO_THRESHOLD,
};
use crate::numerical::numeric_function::NumericFunction;
use log::{debug, info, warn};
use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;

/// Enum to represent the root finding methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RootFindingMethod {
    Bisection,
    FalsePosition,
    FixedPoint,
    NewtonRaphson,
    Secant,
    MultipleRoots,
}

/// identifier -> method; identifiers are compared in lower case
const METHOD_IDENTIFIERS: &[(&str, RootFindingMethod)] = &[
    ("bisection", RootFindingMethod::Bisection),
    ("biseccion", RootFindingMethod::Bisection),
    ("false_position", RootFindingMethod::FalsePosition),
    ("regla_falsa", RootFindingMethod::FalsePosition),
    ("reglafalsa", RootFindingMethod::FalsePosition),
    ("fixed_point", RootFindingMethod::FixedPoint),
    ("punto_fijo", RootFindingMethod::FixedPoint),
    ("puntofijo", RootFindingMethod::FixedPoint),
    ("newton", RootFindingMethod::NewtonRaphson),
    ("newton_raphson", RootFindingMethod::NewtonRaphson),
    ("secant", RootFindingMethod::Secant),
    ("secante", RootFindingMethod::Secant),
    ("multiple_roots", RootFindingMethod::MultipleRoots),
    ("raices_multiples", RootFindingMethod::MultipleRoots),
    ("raicesmultiples", RootFindingMethod::MultipleRoots),
];

impl RootFindingMethod {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim().to_lowercase();
        METHOD_IDENTIFIERS
            .iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, method)| *method)
    }

    /// canonical identifier, the first entry of the identifier table
    pub fn identifier(&self) -> &'static str {
        match self {
            RootFindingMethod::Bisection => "bisection",
            RootFindingMethod::FalsePosition => "false_position",
            RootFindingMethod::FixedPoint => "fixed_point",
            RootFindingMethod::NewtonRaphson => "newton",
            RootFindingMethod::Secant => "secant",
            RootFindingMethod::MultipleRoots => "multiple_roots",
        }
    }
}

impl fmt::Display for RootFindingMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RootFindingMethod::Bisection => "Bisection",
            RootFindingMethod::FalsePosition => "False position",
            RootFindingMethod::FixedPoint => "Fixed point",
            RootFindingMethod::NewtonRaphson => "Newton-Raphson",
            RootFindingMethod::Secant => "Secant",
            RootFindingMethod::MultipleRoots => "Multiple roots",
        };
        write!(f, "{}", name)
    }
}

/// Input validation failures of the root finders
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootFindingError {
    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be greater than zero")]
    InvalidMaxIterations,
    #[error("{name} must be a finite number, got {value}")]
    NonFiniteInput { name: &'static str, value: f64 },
    #[error("the interval is empty: a = b = {0}")]
    EmptyInterval(f64),
    #[error("f(a) and f(b) must have opposite signs: f({a}) = {fa}, f({b}) = {fb}")]
    NoSignChange { a: f64, fa: f64, b: f64, fb: f64 },
    #[error("{method} requires {input}")]
    MissingInput {
        method: RootFindingMethod,
        input: &'static str,
    },
    #[error("{method} requires the derivative of order {order}")]
    MissingDerivative {
        method: RootFindingMethod,
        order: usize,
    },
}

impl RootFindingError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::InputValidation
    }
}

/// One row of a root-finding trace. Fields a method does not compute stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 1-based
    pub iteration: usize,
    /// bracket the point was computed from (bisection, false position)
    pub bracket: Option<(f64, f64)>,
    pub x: f64,
    /// f(x); for fixed point the residual g(x) - x
    pub fx: f64,
    pub gx: Option<f64>,
    pub dfx: Option<f64>,
    pub d2fx: Option<f64>,
    /// `None` for the first record
    pub error: Option<f64>,
}

impl IterationRecord {
    fn point(iteration: usize, x: f64, fx: f64, error: Option<f64>) -> Self {
        Self {
            iteration,
            bracket: None,
            x,
            fx,
            gx: None,
            dfx: None,
            d2fx: None,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootFindingResult {
    pub method: RootFindingMethod,
    pub iterations: Vec<IterationRecord>,
    /// set only when the run converged
    pub root: Option<f64>,
    pub converged: bool,
    pub outcome: RunOutcome,
    pub message: String,
}

impl RootFindingResult {
    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }

    /// error of the last record
    pub fn final_error(&self) -> Option<f64> {
        self.iterations.last().and_then(|record| record.error)
    }

    /// last iterate, whatever the outcome
    pub fn final_estimate(&self) -> Option<f64> {
        self.iterations.last().map(|record| record.x)
    }
}

impl TraceTable for RootFindingResult {
    fn headers(&self) -> Vec<String> {
        let headers: &[&str] = match self.method {
            RootFindingMethod::Bisection | RootFindingMethod::FalsePosition => {
                &["iter", "a", "x_m", "b", "f(x_m)", "error"]
            }
            RootFindingMethod::FixedPoint => &["iter", "x", "g(x)", "g(x) - x", "error"],
            RootFindingMethod::NewtonRaphson => &["iter", "x", "f(x)", "f'(x)", "error"],
            RootFindingMethod::Secant => &["iter", "x", "f(x)", "error"],
            RootFindingMethod::MultipleRoots => {
                &["iter", "x", "f(x)", "f'(x)", "f''(x)", "error"]
            }
        };
        headers.iter().map(|h| h.to_string()).collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let optional = |value: Option<f64>| value.map_or("n/a".to_string(), format_value);
        self.iterations
            .iter()
            .map(|r| {
                let mut row = vec![r.iteration.to_string()];
                match self.method {
                    RootFindingMethod::Bisection | RootFindingMethod::FalsePosition => {
                        let (a, b) = r.bracket.unzip();
                        row.extend([optional(a), format_value(r.x), optional(b)]);
                        row.push(format_value(r.fx));
                    }
                    RootFindingMethod::FixedPoint => {
                        row.extend([format_value(r.x), optional(r.gx), format_value(r.fx)]);
                    }
                    RootFindingMethod::NewtonRaphson => {
                        row.extend([format_value(r.x), format_value(r.fx), optional(r.dfx)]);
                    }
                    RootFindingMethod::Secant => {
                        row.extend([format_value(r.x), format_value(r.fx)]);
                    }
                    RootFindingMethod::MultipleRoots => {
                        row.extend([
                            format_value(r.x),
                            format_value(r.fx),
                            optional(r.dfx),
                            optional(r.d2fx),
                        ]);
                    }
                }
                row.push(format_error(r.error));
                row
            })
            .collect()
    }

    fn summary(&self) -> String {
        format!("{}: {}", self.method, self.message)
    }
}

/// Configuration for root finding methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFindingConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub error_kind: ErrorKind,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            error_kind: ErrorKind::Absolute,
        }
    }
}

impl RootFindingConfig {
    pub fn new(tolerance: f64, max_iterations: usize, error_kind: ErrorKind) -> Self {
        Self {
            tolerance,
            max_iterations,
            error_kind,
        }
    }

    pub fn validate(&self) -> Result<(), RootFindingError> {
        if !ConvergenceCriterion::is_valid_tolerance(self.tolerance) {
            return Err(RootFindingError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(RootFindingError::InvalidMaxIterations);
        }
        Ok(())
    }

    fn criterion(&self) -> ConvergenceCriterion {
        ConvergenceCriterion::new(self.tolerance, self.error_kind)
    }
}

/// Everything a root-finding run may need; each method reads only its own inputs.
#[derive(Clone, Copy, Default)]
pub struct RootFindingInput<'a> {
    pub function: Option<&'a dyn NumericFunction>,
    /// iteration function of the fixed point method
    pub g_function: Option<&'a dyn NumericFunction>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub x0: Option<f64>,
    pub x1: Option<f64>,
}

/// what one step of an open method computed at the current iterate
struct Evaluation {
    fx: f64,
    gx: Option<f64>,
    dfx: Option<f64>,
    d2fx: Option<f64>,
    next: Result<f64, Breakdown>,
}

impl Evaluation {
    fn values(&self) -> [Option<f64>; 4] {
        [Some(self.fx), self.gx, self.dfx, self.d2fx]
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), RootFindingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RootFindingError::NonFiniteInput { name, value })
    }
}

/// strict sign change; zero and NaN never qualify
fn opposite_signs(u: f64, v: f64) -> bool {
    (u < 0.0 && v > 0.0) || (u > 0.0 && v < 0.0)
}

/// Main structure for scalar root finding methods
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    /// Create a new ScalarRootFinder with default configuration
    pub fn new() -> Self {
        Self {
            config: RootFindingConfig::default(),
        }
    }

    /// Create a new ScalarRootFinder with custom configuration
    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RootFindingConfig {
        &self.config
    }

    /// Set tolerance for convergence
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = tolerance;
    }

    /// Set maximum number of iterations
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.config.max_iterations = max_iterations;
    }

    pub fn set_error_kind(&mut self, error_kind: ErrorKind) {
        self.config.error_kind = error_kind;
    }

    /// Solve with specific method, taking the inputs that method needs from `input`
    pub fn solve_with_method(
        &self,
        method: RootFindingMethod,
        input: &RootFindingInput,
    ) -> Result<RootFindingResult, RootFindingError> {
        let missing = |name: &'static str| RootFindingError::MissingInput {
            method,
            input: name,
        };
        let function = || input.function.ok_or_else(|| missing("a function"));
        match method {
            RootFindingMethod::Bisection | RootFindingMethod::FalsePosition => {
                let f = function()?;
                let a = input.a.ok_or_else(|| missing("the interval end a"))?;
                let b = input.b.ok_or_else(|| missing("the interval end b"))?;
                self.bracketing(method, f, a, b)
            }
            RootFindingMethod::FixedPoint => {
                let g = input
                    .g_function
                    .ok_or_else(|| missing("an iteration function g"))?;
                let x0 = input.x0.ok_or_else(|| missing("an initial point x0"))?;
                self.fixed_point(g, x0)
            }
            RootFindingMethod::NewtonRaphson => {
                let f = function()?;
                let x0 = input.x0.ok_or_else(|| missing("an initial point x0"))?;
                self.newton_raphson(f, x0)
            }
            RootFindingMethod::Secant => {
                let f = function()?;
                let x0 = input.x0.ok_or_else(|| missing("an initial point x0"))?;
                let x1 = input.x1.ok_or_else(|| missing("a second point x1"))?;
                self.secant(f, x0, x1)
            }
            RootFindingMethod::MultipleRoots => {
                let f = function()?;
                let x0 = input.x0.ok_or_else(|| missing("an initial point x0"))?;
                self.multiple_roots(f, x0)
            }
        }
    }

    /////////////////////////////////////////METHODS///////////////////////////////////////////

    /// Bisection method. Requires that f(a) and f(b) have opposite signs
    pub fn bisection<F>(&self, function: &F, a: f64, b: f64) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        self.bracketing(RootFindingMethod::Bisection, function, a, b)
    }

    /// Regula falsi. Requires that f(a) and f(b) have opposite signs
    pub fn false_position<F>(
        &self,
        function: &F,
        a: f64,
        b: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        self.bracketing(RootFindingMethod::FalsePosition, function, a, b)
    }

    fn bracketing<F>(
        &self,
        method: RootFindingMethod,
        function: &F,
        a: f64,
        b: f64,
    ) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        self.config.validate()?;
        check_finite("a", a)?;
        check_finite("b", b)?;
        if a == b {
            return Err(RootFindingError::EmptyInterval(a));
        }
        let (mut a, mut b) = if a < b { (a, b) } else { (b, a) };
        let mut fa = function.evaluate(a);
        let mut fb = function.evaluate(b);
        if !opposite_signs(fa, fb) {
            return Err(RootFindingError::NoSignChange { a, fa, b, fb });
        }
        info!(
            "{} on [{}, {}] for {}, tolerance {:e}",
            method,
            a,
            b,
            function.name(),
            self.config.tolerance
        );

        let criterion = self.config.criterion();
        let mut records = Vec::new();
        let mut previous: Option<f64> = None;
        for k in 1..=self.config.max_iterations {
            let m = match method {
                RootFindingMethod::FalsePosition => a - fa * (b - a) / (fb - fa),
                _ => 0.5 * (a + b),
            };
            let fm = function.evaluate(m);
            if !m.is_finite() || !fm.is_finite() {
                let breakdown = Breakdown::NonFiniteValue { iteration: k };
                return Ok(self.finish(method, records, RunOutcome::Breakdown(breakdown), false));
            }
            let error = previous.map(|p| criterion.error(p, m));
            debug!(
                "{} iteration {}: a = {}, m = {}, b = {}, f(m) = {}, error = {}",
                method,
                k,
                a,
                m,
                b,
                fm,
                format_error(error)
            );
            records.push(IterationRecord {
                bracket: Some((a, b)),
                ..IterationRecord::point(k, m, fm, error)
            });
            if fm == 0.0 {
                return Ok(self.finish(method, records, RunOutcome::Converged, true));
            }
            if error.is_some_and(|e| criterion.has_converged(e)) {
                return Ok(self.finish(method, records, RunOutcome::Converged, false));
            }
            if opposite_signs(fa, fm) {
                b = m;
                fb = fm;
            } else {
                a = m;
                fa = fm;
            }
            previous = Some(m);
        }
        Ok(self.finish(method, records, RunOutcome::MaxIterationsReached, false))
    }

    /// Fixed point iteration x_{n+1} = g(x_n)
    pub fn fixed_point<G>(&self, g: &G, x0: f64) -> Result<RootFindingResult, RootFindingError>
    where
        G: NumericFunction + ?Sized,
    {
        self.config.validate()?;
        check_finite("x0", x0)?;
        info!("Fixed point from x0 = {} for g(x) = {}", x0, g.name());
        Ok(self.iterate_open(RootFindingMethod::FixedPoint, x0, |k, x| {
            let gx = g.evaluate(x);
            let next = if gx.abs() > DIVERGENCE_GUARD {
                Err(Breakdown::Divergence {
                    iteration: k,
                    value: gx,
                })
            } else {
                Ok(gx)
            };
            Evaluation {
                fx: gx - x,
                gx: Some(gx),
                dfx: None,
                d2fx: None,
                next,
            }
        }))
    }

    /// Newton-Raphson; the function must provide its first derivative
    pub fn newton_raphson<F>(&self, function: &F, x0: f64) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        let method = RootFindingMethod::NewtonRaphson;
        self.config.validate()?;
        check_finite("x0", x0)?;
        if function.derivative1(x0).is_none() {
            return Err(RootFindingError::MissingDerivative { method, order: 1 });
        }
        info!("{} from x0 = {} for {}", method, x0, function.name());
        Ok(self.iterate_open(method, x0, |k, x| {
            let fx = function.evaluate(x);
            let dfx = function.derivative1(x).unwrap_or(f64::NAN);
            let next = if dfx.abs() < ZERO_THRESHOLD {
                Err(Breakdown::ZeroDerivative {
                    iteration: k,
                    x,
                    value: dfx,
                })
            } else {
                Ok(x - fx / dfx)
            };
            Evaluation {
                fx,
                gx: None,
                dfx: Some(dfx),
                d2fx: None,
                next,
            }
        }))
    }

    /// Secant method started from two points
    pub fn secant<F>(&self, function: &F, x0: f64, x1: f64) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        let method = RootFindingMethod::Secant;
        self.config.validate()?;
        check_finite("x0", x0)?;
        check_finite("x1", x1)?;
        info!("{} from x0 = {}, x1 = {} for {}", method, x0, x1, function.name());
        let mut last: Option<(f64, f64)> = None;
        Ok(self.iterate_open(method, x0, |k, x| {
            let fx = function.evaluate(x);
            let next = match last {
                None => Ok(x1),
                Some((x_prev, f_prev)) => {
                    let denominator = fx - f_prev;
                    if denominator.abs() < ZERO_THRESHOLD {
                        Err(Breakdown::ZeroDenominator {
                            iteration: k,
                            x,
                            value: denominator,
                        })
                    } else {
                        Ok(x - fx * (x - x_prev) / denominator)
                    }
                }
            };
            last = Some((x, fx));
            Evaluation {
                fx,
                gx: None,
                dfx: None,
                d2fx: None,
                next,
            }
        }))
    }

    /// Newton's method modified for roots of multiplicity > 1; needs f' and f''
    pub fn multiple_roots<F>(&self, function: &F, x0: f64) -> Result<RootFindingResult, RootFindingError>
    where
        F: NumericFunction + ?Sized,
    {
        let method = RootFindingMethod::MultipleRoots;
        self.config.validate()?;
        check_finite("x0", x0)?;
        if function.derivative1(x0).is_none() {
            return Err(RootFindingError::MissingDerivative { method, order: 1 });
        }
        if function.derivative2(x0).is_none() {
            return Err(RootFindingError::MissingDerivative { method, order: 2 });
        }
        info!("{} from x0 = {} for {}", method, x0, function.name());
        Ok(self.iterate_open(method, x0, |k, x| {
            let fx = function.evaluate(x);
            let dfx = function.derivative1(x).unwrap_or(f64::NAN);
            let d2fx = function.derivative2(x).unwrap_or(f64::NAN);
            let denominator = dfx * dfx - fx * d2fx;
            let next = if denominator.abs() < ZERO_THRESHOLD {
                Err(Breakdown::ZeroDenominator {
                    iteration: k,
                    x,
                    value: denominator,
                })
            } else {
                Ok(x - fx * dfx / denominator)
            };
            Evaluation {
                fx,
                gx: None,
                dfx: Some(dfx),
                d2fx: Some(d2fx),
                next,
            }
        }))
    }

    /// Shared loop of the open methods: record the current iterate, test it, then move on
    /// to the next one computed by `step`.
    fn iterate_open<S>(&self, method: RootFindingMethod, x0: f64, mut step: S) -> RootFindingResult
    where
        S: FnMut(usize, f64) -> Evaluation,
    {
        let criterion = self.config.criterion();
        let mut records = Vec::new();
        let mut previous: Option<f64> = None;
        let mut x = x0;
        for k in 1..=self.config.max_iterations {
            let evaluation = step(k, x);
            if evaluation.values().iter().flatten().any(|v| !v.is_finite()) {
                let breakdown = Breakdown::NonFiniteValue { iteration: k };
                return self.finish(method, records, RunOutcome::Breakdown(breakdown), false);
            }
            let error = previous.map(|p| criterion.error(p, x));
            debug!(
                "{} iteration {}: x = {}, f = {}, error = {}",
                method,
                k,
                x,
                evaluation.fx,
                format_error(error)
            );
            records.push(IterationRecord {
                gx: evaluation.gx,
                dfx: evaluation.dfx,
                d2fx: evaluation.d2fx,
                ..IterationRecord::point(k, x, evaluation.fx, error)
            });
            if evaluation.fx == 0.0 {
                return self.finish(method, records, RunOutcome::Converged, true);
            }
            if error.is_some_and(|e| criterion.has_converged(e)) {
                return self.finish(method, records, RunOutcome::Converged, false);
            }
            match evaluation.next {
                Ok(next) => {
                    previous = Some(x);
                    x = next;
                }
                Err(breakdown) => {
                    return self.finish(method, records, RunOutcome::Breakdown(breakdown), false);
                }
            }
        }
        self.finish(method, records, RunOutcome::MaxIterationsReached, false)
    }

    fn finish(
        &self,
        method: RootFindingMethod,
        iterations: Vec<IterationRecord>,
        outcome: RunOutcome,
        exact: bool,
    ) -> RootFindingResult {
        let count = iterations.len();
        let last_x = iterations
            .last()
            .map_or("n/a".to_string(), |r| r.x.to_string());
        let last_error = format_error(iterations.last().and_then(|r| r.error));
        let kind = self.config.error_kind;
        let message = match &outcome {
            RunOutcome::Converged if exact && method == RootFindingMethod::FixedPoint => format!(
                "x = {} is an exact fixed point, g(x) = x at iteration {}",
                last_x, count
            ),
            RunOutcome::Converged if exact => {
                format!("x = {} is an exact root, f(x) = 0 at iteration {}", last_x, count)
            }
            RunOutcome::Converged => format!(
                "x = {} approximates a root: converged after {} iterations with {} error {} <= tolerance {:e}",
                last_x, count, kind, last_error, self.config.tolerance
            ),
            RunOutcome::MaxIterationsReached => format!(
                "did not converge after {} iterations (tolerance {:e}); last estimate x = {} with {} error {}",
                count, self.config.tolerance, last_x, kind, last_error
            ),
            RunOutcome::Breakdown(breakdown) => format!(
                "numerical breakdown after {} recorded iterations: {}; last estimate x = {} with {} error {}",
                count, breakdown, last_x, kind, last_error
            ),
        };
        if outcome.is_converged() {
            info!("{}: {}", method, message);
        } else {
            warn!("{}: {}", method, message);
        }
        let converged = outcome.is_converged();
        RootFindingResult {
            method,
            root: if converged {
                iterations.last().map(|r| r.x)
            } else {
                None
            },
            iterations,
            converged,
            outcome,
            message,
        }
    }
}

impl Default for ScalarRootFinder {
    fn default() -> Self {
        Self::new()
    }
}

// Convenience functions for quick usage
pub fn bisection<F>(function: F, a: f64, b: f64, tolerance: f64) -> Result<RootFindingResult, RootFindingError>
where
    F: Fn(f64) -> f64 + Sync,
{
    let func = crate::numerical::numeric_function::ClosureFunction::new(
        function,
        "bisection_function".to_string(),
    );
    let mut solver = ScalarRootFinder::new();
    solver.set_tolerance(tolerance);
    solver.bisection(&func, a, b)
}

pub fn secant<F>(function: F, x0: f64, x1: f64, tolerance: f64) -> Result<RootFindingResult, RootFindingError>
where
    F: Fn(f64) -> f64 + Sync,
{
    let func = crate::numerical::numeric_function::ClosureFunction::new(
        function,
        "secant_function".to_string(),
    );
    let mut solver = ScalarRootFinder::new();
    solver.set_tolerance(tolerance);
    solver.secant(&func, x0, x1)
}
