//! # Interpolation
//!
//! Builds the interpolant of a set of (x, y) points with one of five methods:
//!
//! - Vandermonde: solves V c = y with V[i][j] = x_i^j by Gaussian elimination with partial pivoting
//! - Newton: divided-difference table, Newton form and the expanded polynomial
//! - Lagrange: sum of y_i L_i(x), expanded
//! - linear spline: one line per consecutive pair of points
//! - natural cubic spline: second derivatives from a tridiagonal system with S''(x_0) = S''(x_n) = 0
//!
//! The three polynomial methods produce the same unique polynomial of degree n - 1, expressed in
//! ascending coefficients. Spline segments are written in powers of (x - x_i) and are valid only on
//! their own interval.
use crate::Utils::logger::{TraceTable, format_value};
use crate::numerical::convergence::FailureKind;
use crate::numerical::polynomial::{Polynomial, format_sum, power_of, shifted_variable};
use crate::somelinalg::gauss_elimination::{EliminationError, gauss_solve, solve_tridiagonal};
use crate::somelinalg::linear_sys_diagnostics::{condition_number, poorly_conditioned};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;

/// above this number of points a single polynomial risks Runge oscillations
pub const RUNGE_POINT_THRESHOLD: usize = 8;
/// condition number above which a Vandermonde system is reported as ill-conditioned
pub const VANDERMONDE_CONDITION_LIMIT: f64 = 1e12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum InterpolationMethod {
    Vandermonde,
    Newton,
    Lagrange,
    LinearSpline,
    CubicSpline,
}

const METHOD_IDENTIFIERS: &[(&str, InterpolationMethod)] = &[
    ("vandermonde", InterpolationMethod::Vandermonde),
    ("newton_interpolation", InterpolationMethod::Newton),
    ("newton_divided_differences", InterpolationMethod::Newton),
    ("lagrange", InterpolationMethod::Lagrange),
    ("linear_spline", InterpolationMethod::LinearSpline),
    ("spline_lineal", InterpolationMethod::LinearSpline),
    ("cubic_spline", InterpolationMethod::CubicSpline),
    ("spline_cubico", InterpolationMethod::CubicSpline),
];

impl InterpolationMethod {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim().to_lowercase();
        METHOD_IDENTIFIERS
            .iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, method)| *method)
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            InterpolationMethod::Vandermonde => "vandermonde",
            InterpolationMethod::Newton => "newton_interpolation",
            InterpolationMethod::Lagrange => "lagrange",
            InterpolationMethod::LinearSpline => "linear_spline",
            InterpolationMethod::CubicSpline => "cubic_spline",
        }
    }

    pub fn min_points(&self) -> usize {
        match self {
            InterpolationMethod::CubicSpline => 3,
            _ => 2,
        }
    }

    pub fn is_spline(&self) -> bool {
        matches!(
            self,
            InterpolationMethod::LinearSpline | InterpolationMethod::CubicSpline
        )
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            InterpolationMethod::Vandermonde => "Vandermonde",
            InterpolationMethod::Newton => "Newton divided differences",
            InterpolationMethod::Lagrange => "Lagrange",
            InterpolationMethod::LinearSpline => "linear spline",
            InterpolationMethod::CubicSpline => "natural cubic spline",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("{method} needs at least {required} points, got {found}")]
    TooFewPoints {
        method: InterpolationMethod,
        required: usize,
        found: usize,
    },
    #[error("x and y must have the same length, got {x} and {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("x values must be pairwise distinct: x[{first}] = x[{second}] = {value}")]
    DuplicateX {
        value: f64,
        first: usize,
        second: usize,
    },
    #[error("{name}[{index}] is not a finite number")]
    NonFiniteValue { name: &'static str, index: usize },
    #[error("linear solve failed: {0}")]
    Elimination(#[from] EliminationError),
}

impl InterpolationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InterpolationError::Elimination(_) => FailureKind::NumericalBreakdown,
            _ => FailureKind::InputValidation,
        }
    }
}

/// One piece of a spline: sum of coefficients[k] * (x - x_start)^k on [x_start, x_end].
#[derive(Debug, Clone, PartialEq)]
pub struct SplineSegment {
    pub x_start: f64,
    pub x_end: f64,
    pub coefficients: Vec<f64>,
}

impl SplineSegment {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x_start && x <= self.x_end
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let dx = x - self.x_start;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * dx + c)
    }

    pub fn polynomial_string(&self) -> String {
        let base = shifted_variable(self.x_start);
        let terms: Vec<(f64, String)> = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(k, c)| (*c, power_of(&base, k)))
            .collect();
        format_sum(&terms)
    }
}

impl fmt::Display for SplineSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} for {} <= x <= {}",
            self.polynomial_string(),
            self.x_start,
            self.x_end
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    pub method: InterpolationMethod,
    /// points the interpolant was built from, sorted by x for splines
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// interpolating polynomial, absent for splines
    pub polynomial: Option<Polynomial>,
    pub polynomial_string: String,
    /// Newton method only
    pub newton_form: Option<String>,
    /// Newton method only: `divided_differences[i][k]` = f[x_i, ..., x_{i+k}]
    pub divided_differences: Option<Vec<Vec<f64>>>,
    pub segments: Vec<SplineSegment>,
    /// Vandermonde method only
    pub condition_number: Option<f64>,
    pub warning: Option<String>,
}

impl InterpolationResult {
    fn new(method: InterpolationMethod, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            method,
            x,
            y,
            polynomial: None,
            polynomial_string: String::new(),
            newton_form: None,
            divided_differences: None,
            segments: Vec::new(),
            condition_number: None,
            warning: None,
        }
    }

    /// ascending polynomial coefficients
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.polynomial.as_ref().map(|p| p.coefficients())
    }

    /// Value of the interpolant at x. Splines return None outside [x_0, x_n].
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        if let Some(polynomial) = &self.polynomial {
            return Some(polynomial.evaluate(x));
        }
        self.segments
            .iter()
            .find(|segment| segment.contains(x))
            .map(|segment| segment.evaluate(x))
    }

    fn add_warning(&mut self, warning: String) {
        warn!("{}: {}", self.method, warning);
        self.warning = Some(match self.warning.take() {
            Some(previous) => format!("{}; {}", previous, warning),
            None => warning,
        });
    }
}

impl TraceTable for InterpolationResult {
    fn headers(&self) -> Vec<String> {
        if self.method.is_spline() {
            return vec!["segment".into(), "interval".into(), "S_i(x)".into()];
        }
        let mut headers = vec!["i".to_string(), "x_i".to_string(), "y_i".to_string()];
        if let Some(table) = &self.divided_differences {
            headers.extend((1..table.len()).map(|k| format!("order {}", k)));
        }
        headers
    }

    fn rows(&self) -> Vec<Vec<String>> {
        if self.method.is_spline() {
            return self
                .segments
                .iter()
                .enumerate()
                .map(|(i, segment)| {
                    vec![
                        (i + 1).to_string(),
                        format!("[{}, {}]", segment.x_start, segment.x_end),
                        segment.polynomial_string(),
                    ]
                })
                .collect();
        }
        let n = self.x.len();
        (0..n)
            .map(|i| {
                let mut row = vec![
                    i.to_string(),
                    format_value(self.x[i]),
                    format_value(self.y[i]),
                ];
                if let Some(table) = &self.divided_differences {
                    // row i shows f[x_{i-k}, ..., x_i], the usual lower-triangular layout
                    row.extend((1..n).map(|k| {
                        if k <= i {
                            format_value(table[i - k][k])
                        } else {
                            String::new()
                        }
                    }));
                }
                row
            })
            .collect()
    }

    fn summary(&self) -> String {
        let mut summary = format!("{}: P(x) = {}", self.method, self.polynomial_string);
        if let Some(newton_form) = &self.newton_form {
            summary.push_str(&format!("\nNewton form: P(x) = {}", newton_form));
        }
        if let Some(warning) = &self.warning {
            summary.push_str(&format!("\nwarning: {}", warning));
        }
        summary
    }
}

/// Checks lengths, finiteness, distinct x and the minimum number of points.
pub fn validate_points(
    method: InterpolationMethod,
    x: &[f64],
    y: &[f64],
) -> Result<(), InterpolationError> {
    if x.len() != y.len() {
        return Err(InterpolationError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < method.min_points() {
        return Err(InterpolationError::TooFewPoints {
            method,
            required: method.min_points(),
            found: x.len(),
        });
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(InterpolationError::NonFiniteValue { name: "x", index });
    }
    if let Some(index) = y.iter().position(|v| !v.is_finite()) {
        return Err(InterpolationError::NonFiniteValue { name: "y", index });
    }
    for i in 0..x.len() {
        for j in i + 1..x.len() {
            if x[i] == x[j] {
                return Err(InterpolationError::DuplicateX {
                    value: x[i],
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

pub fn interpolate(
    method: InterpolationMethod,
    x: &[f64],
    y: &[f64],
) -> Result<InterpolationResult, InterpolationError> {
    validate_points(method, x, y)?;
    let mut result = match method {
        InterpolationMethod::Vandermonde => vandermonde(x, y)?,
        InterpolationMethod::Newton => newton_divided_differences(x, y),
        InterpolationMethod::Lagrange => lagrange(x, y),
        InterpolationMethod::LinearSpline => {
            let (x, y) = sorted_points(x, y);
            linear_spline(x, y)
        }
        InterpolationMethod::CubicSpline => {
            let (x, y) = sorted_points(x, y);
            cubic_spline(x, y)?
        }
    };
    if !method.is_spline() && x.len() > RUNGE_POINT_THRESHOLD {
        result.add_warning(format!(
            "{} points give a polynomial of degree {}, high-degree interpolation may oscillate \
             between the nodes (Runge's phenomenon), consider a spline",
            x.len(),
            x.len() - 1
        ));
    }
    info!(
        "{} through {} points: P(x) = {}",
        method,
        x.len(),
        result.polynomial_string
    );
    Ok(result)
}

fn sorted_points(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    points.sort_by(|p, q| p.0.total_cmp(&q.0));
    points.into_iter().unzip()
}

fn with_polynomial(
    method: InterpolationMethod,
    x: &[f64],
    y: &[f64],
    polynomial: Polynomial,
) -> InterpolationResult {
    let mut result = InterpolationResult::new(method, x.to_vec(), y.to_vec());
    result.polynomial_string = polynomial.to_string();
    result.polynomial = Some(polynomial);
    result
}

fn vandermonde(x: &[f64], y: &[f64]) -> Result<InterpolationResult, InterpolationError> {
    let n = x.len();
    let V = DMatrix::from_fn(n, n, |i, j| x[i].powi(j as i32));
    let rhs = DVector::from_column_slice(y);
    let cond = condition_number(&V);
    debug!("Vandermonde matrix {}x{}, condition number {:e}", n, n, cond);
    let coefficients = gauss_solve(&V, &rhs)?;
    let mut result = with_polynomial(
        InterpolationMethod::Vandermonde,
        x,
        y,
        Polynomial::new(coefficients.iter().copied().collect()),
    );
    result.condition_number = Some(cond);
    if poorly_conditioned(cond, VANDERMONDE_CONDITION_LIMIT) {
        result.add_warning(format!(
            "the Vandermonde matrix is ill-conditioned (condition number {:.3e}), \
             the coefficients may be inaccurate",
            cond
        ));
    }
    Ok(result)
}

/// Divided-difference table: `table[i][k]` = f[x_i, ..., x_{i+k}], row i holds n - i entries.
pub fn divided_differences(x: &[f64], y: &[f64]) -> Vec<Vec<f64>> {
    let n = x.len();
    let mut table: Vec<Vec<f64>> = y.iter().map(|v| vec![*v]).collect();
    for k in 1..n {
        for i in 0..n - k {
            let value = (table[i + 1][k - 1] - table[i][k - 1]) / (x[i + k] - x[i]);
            table[i].push(value);
        }
    }
    table
}

fn newton_divided_differences(x: &[f64], y: &[f64]) -> InterpolationResult {
    let table = divided_differences(x, y);
    // top diagonal of the table
    let newton_coefficients = &table[0];
    let mut polynomial = Polynomial::zero();
    let mut basis = Polynomial::constant(1.0);
    let mut terms = Vec::with_capacity(x.len());
    let mut factors = String::new();
    for (k, c) in newton_coefficients.iter().enumerate() {
        polynomial = polynomial.add(&basis.scale(*c));
        terms.push((*c, factors.clone()));
        basis = basis.mul_linear(x[k]);
        if !factors.is_empty() {
            factors.push('*');
        }
        factors.push_str(&shifted_variable(x[k]));
    }
    let mut result = with_polynomial(InterpolationMethod::Newton, x, y, polynomial);
    result.newton_form = Some(format_sum(&terms));
    result.divided_differences = Some(table);
    result
}

fn lagrange(x: &[f64], y: &[f64]) -> InterpolationResult {
    let n = x.len();
    let mut polynomial = Polynomial::zero();
    for i in 0..n {
        let mut basis = Polynomial::constant(1.0);
        let mut denominator = 1.0;
        for j in (0..n).filter(|&j| j != i) {
            basis = basis.mul_linear(x[j]);
            denominator *= x[i] - x[j];
        }
        debug!("L_{}(x) = {}", i, basis.scale(1.0 / denominator));
        polynomial = polynomial.add(&basis.scale(y[i] / denominator));
    }
    with_polynomial(InterpolationMethod::Lagrange, x, y, polynomial)
}

fn spline_result(
    method: InterpolationMethod,
    x: Vec<f64>,
    y: Vec<f64>,
    segments: Vec<SplineSegment>,
) -> InterpolationResult {
    let mut result = InterpolationResult::new(method, x, y);
    result.polynomial_string = segments
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    result.segments = segments;
    result
}

fn linear_spline(x: Vec<f64>, y: Vec<f64>) -> InterpolationResult {
    let segments = (0..x.len() - 1)
        .map(|i| {
            let slope = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
            SplineSegment {
                x_start: x[i],
                x_end: x[i + 1],
                coefficients: vec![y[i], slope],
            }
        })
        .collect();
    spline_result(InterpolationMethod::LinearSpline, x, y, segments)
}

fn cubic_spline(x: Vec<f64>, y: Vec<f64>) -> Result<InterpolationResult, InterpolationError> {
    let n = x.len();
    let h: Vec<f64> = (0..n - 1).map(|i| x[i + 1] - x[i]).collect();
    // interior second derivatives M_1..M_{n-2}, M_0 = M_{n-1} = 0
    let m = n - 2;
    let diag: Vec<f64> = (1..n - 1).map(|i| 2.0 * (h[i - 1] + h[i])).collect();
    let off: Vec<f64> = (1..m).map(|i| h[i]).collect();
    let rhs: Vec<f64> = (1..n - 1)
        .map(|i| 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]))
        .collect();
    let interior = solve_tridiagonal(&off, &diag, &off, &rhs)?;
    let mut M = vec![0.0; n];
    M[1..n - 1].copy_from_slice(&interior);
    debug!("natural spline second derivatives: {:?}", M);
    let segments = (0..n - 1)
        .map(|i| {
            let b = (y[i + 1] - y[i]) / h[i] - h[i] * (2.0 * M[i] + M[i + 1]) / 6.0;
            let c = M[i] / 2.0;
            let d = (M[i + 1] - M[i]) / (6.0 * h[i]);
            SplineSegment {
                x_start: x[i],
                x_end: x[i + 1],
                coefficients: vec![y[i], b, c, d],
            }
        })
        .collect();
    Ok(spline_result(InterpolationMethod::CubicSpline, x, y, segments))
}
