//! Stopping criteria and run outcomes shared by the iterative engines.
//!
//! The error between two successive iterates is either absolute, `|x_k - x_{k-1}|`, or relative,
//! `|x_k - x_{k-1}| / |x_k|`. A run ends in one of three ways, see [`RunOutcome`]: the error fell
//! below the tolerance, the iteration cap was reached, or the iteration broke down numerically.
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumIter;

/// Absolute threshold below which a derivative or a denominator counts as zero.
pub const ZERO_THRESHOLD: f64 = 1e-14;
/// Iterates larger than this in magnitude are treated as divergent.
pub const DIVERGENCE_GUARD: f64 = 1e12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum ErrorKind {
    #[default]
    Absolute,
    Relative,
}

impl ErrorKind {
    /// Stopping error between two successive iterates. A relative error at `current == 0`
    /// falls back to the absolute one.
    pub fn error(&self, previous: f64, current: f64) -> f64 {
        let absolute = (current - previous).abs();
        match self {
            ErrorKind::Absolute => absolute,
            ErrorKind::Relative if current == 0.0 => absolute,
            ErrorKind::Relative => absolute / current.abs(),
        }
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "absolute" | "abs" | "absoluto" => Ok(ErrorKind::Absolute),
            "relative" | "rel" | "relativo" => Ok(ErrorKind::Relative),
            other => Err(format!(
                "unknown error type '{}', expected 'absolute' or 'relative'",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Absolute => write!(f, "absolute"),
            ErrorKind::Relative => write!(f, "relative"),
        }
    }
}

/// free-function form of [`ErrorKind::error`]
pub fn error(previous: f64, current: f64, kind: ErrorKind) -> f64 {
    kind.error(previous, current)
}

pub fn has_converged(error: f64, tolerance: f64) -> bool {
    error <= tolerance
}

/// Tolerance together with the way the error is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCriterion {
    pub tolerance: f64,
    pub kind: ErrorKind,
}

impl ConvergenceCriterion {
    pub fn new(tolerance: f64, kind: ErrorKind) -> Self {
        Self { tolerance, kind }
    }

    pub fn error(&self, previous: f64, current: f64) -> f64 {
        self.kind.error(previous, current)
    }

    pub fn has_converged(&self, error: f64) -> bool {
        has_converged(error, self.tolerance)
    }

    /// a tolerance must be finite and strictly positive
    pub fn is_valid_tolerance(tolerance: f64) -> bool {
        tolerance.is_finite() && tolerance > 0.0
    }
}

/// Which side of the caller boundary a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// rejected before any iteration ran
    InputValidation,
    /// the computation started and could not continue
    NumericalBreakdown,
}

/// Reason an iterative run stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum Breakdown {
    ZeroDerivative { iteration: usize, x: f64, value: f64 },
    ZeroDenominator { iteration: usize, x: f64, value: f64 },
    NonFiniteValue { iteration: usize },
    Divergence { iteration: usize, value: f64 },
}

impl Breakdown {
    pub fn iteration(&self) -> usize {
        match self {
            Breakdown::ZeroDerivative { iteration, .. }
            | Breakdown::ZeroDenominator { iteration, .. }
            | Breakdown::NonFiniteValue { iteration }
            | Breakdown::Divergence { iteration, .. } => *iteration,
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Breakdown::ZeroDerivative {
                iteration,
                x,
                value,
            } => write!(
                f,
                "derivative is numerically zero at iteration {} (f'({}) = {:e})",
                iteration, x, value
            ),
            Breakdown::ZeroDenominator {
                iteration,
                x,
                value,
            } => write!(
                f,
                "denominator is numerically zero at iteration {} (x = {}, denominator = {:e})",
                iteration, x, value
            ),
            Breakdown::NonFiniteValue { iteration } => write!(
                f,
                "a non-finite value (NaN or infinity) appeared at iteration {}",
                iteration
            ),
            Breakdown::Divergence { iteration, value } => write!(
                f,
                "iterates diverge at iteration {}: |x| = {:e} exceeds {:e}",
                iteration,
                value.abs(),
                DIVERGENCE_GUARD
            ),
        }
    }
}

/// How an iterative run ended. Only `Breakdown` is a failure: reaching the iteration cap is a
/// regular outcome reported with the full trace.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Converged,
    MaxIterationsReached,
    Breakdown(Breakdown),
}

impl RunOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, RunOutcome::Converged)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RunOutcome::Breakdown(_) => Some(FailureKind::NumericalBreakdown),
            _ => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunOutcome::Converged => write!(f, "converged"),
            RunOutcome::MaxIterationsReached => write!(f, "max iterations reached"),
            RunOutcome::Breakdown(_) => write!(f, "numerical breakdown"),
        }
    }
}
