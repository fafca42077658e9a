//! # Iterative solvers for linear systems
//!
//! Jacobi, Gauss-Seidel and successive over-relaxation (SOR) for A x = b. With the splitting
//! A = D + L + U (diagonal, strictly lower, strictly upper part) every method is a linear fixed
//! point iteration x_{k+1} = T x_k + C:
//!
//! - Jacobi: T = -D^-1 (L + U), C = D^-1 b
//! - Gauss-Seidel: T = -(D + L)^-1 U, C = (D + L)^-1 b
//! - SOR: T = (D + wL)^-1 ((1 - w) D - wU), C = w (D + wL)^-1 b
//!
//! The spectral radius of T is computed once, before iterating, and reported next to the trace.
//! It decides whether the iteration converges for every initial vector; the trace only shows
//! what happened within the iteration cap. The two verdicts are kept apart in the result.
use crate::Utils::logger::{TraceTable, format_value};
use crate::numerical::convergence::{
    Breakdown, ConvergenceCriterion, FailureKind, RunOutcome, ZERO_THRESHOLD,
};
use crate::somelinalg::linear_sys_diagnostics::{
    is_strictly_diagonally_dominant, spectral_radius,
};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumIter;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum LinearMethod {
    Jacobi,
    GaussSeidel,
    Sor,
}

const METHOD_IDENTIFIERS: &[(&str, LinearMethod)] = &[
    ("jacobi", LinearMethod::Jacobi),
    ("gauss_seidel", LinearMethod::GaussSeidel),
    ("gaussseidel", LinearMethod::GaussSeidel),
    ("sor", LinearMethod::Sor),
];

impl LinearMethod {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim().to_lowercase();
        METHOD_IDENTIFIERS
            .iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, method)| *method)
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            LinearMethod::Jacobi => "jacobi",
            LinearMethod::GaussSeidel => "gauss_seidel",
            LinearMethod::Sor => "sor",
        }
    }
}

impl fmt::Display for LinearMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LinearMethod::Jacobi => "Jacobi",
            LinearMethod::GaussSeidel => "Gauss-Seidel",
            LinearMethod::Sor => "SOR",
        };
        write!(f, "{}", name)
    }
}

/// Vector norm used for the stopping error ||x_k - x_{k-1}||
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum NormType {
    One,
    Two,
    #[default]
    Inf,
}

impl NormType {
    pub fn norm(&self, v: &DVector<f64>) -> f64 {
        match self {
            NormType::One => v.lp_norm(1),
            NormType::Two => v.norm(),
            NormType::Inf => v.amax(),
        }
    }
}

impl FromStr for NormType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "one" => Ok(NormType::One),
            "2" | "two" => Ok(NormType::Two),
            "inf" | "infinity" | "∞" => Ok(NormType::Inf),
            other => Err(format!("unknown norm '{}', expected 1, 2 or inf", other)),
        }
    }
}

impl fmt::Display for NormType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NormType::One => write!(f, "1"),
            NormType::Two => write!(f, "2"),
            NormType::Inf => write!(f, "inf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinearSolverError {
    #[error("the system is empty")]
    EmptySystem,
    #[error("matrix A must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("{name} must have length {expected}, got {found}")]
    DimensionMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{name} contains a non-finite entry")]
    NonFiniteEntry { name: &'static str },
    #[error("diagonal entry a[{index}][{index}] is zero")]
    ZeroDiagonal { index: usize },
    #[error("relaxation factor w must lie in (0, 2), got {0}")]
    InvalidRelaxation(f64),
    #[error("SOR requires a relaxation factor w")]
    MissingRelaxation,
    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be greater than zero")]
    InvalidMaxIterations,
    #[error("the splitting matrix of {0} is singular")]
    SingularSplitting(LinearMethod),
}

impl LinearSolverError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LinearSolverError::SingularSplitting(_) => FailureKind::NumericalBreakdown,
            _ => FailureKind::InputValidation,
        }
    }
}

/// A linear system together with the parameters of an iterative run. Every run works on its
/// own copy of the vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystemInput {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub x0: DVector<f64>,
    pub norm: NormType,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// relaxation factor, SOR only
    pub w: Option<f64>,
}

impl LinearSystemInput {
    pub fn new(
        a: DMatrix<f64>,
        b: DVector<f64>,
        x0: DVector<f64>,
        tolerance: f64,
        max_iterations: usize,
    ) -> Self {
        Self {
            a,
            b,
            x0,
            norm: NormType::default(),
            tolerance,
            max_iterations,
            w: None,
        }
    }

    pub fn with_norm(mut self, norm: NormType) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_relaxation(mut self, w: f64) -> Self {
        self.w = Some(w);
        self
    }

    /// Checks everything that does not depend on the method.
    pub fn validate(&self) -> Result<(), LinearSolverError> {
        let (rows, cols) = self.a.shape();
        if rows == 0 || cols == 0 {
            return Err(LinearSolverError::EmptySystem);
        }
        if rows != cols {
            return Err(LinearSolverError::NotSquare { rows, cols });
        }
        for (name, len) in [("b", self.b.len()), ("x0", self.x0.len())] {
            if len != rows {
                return Err(LinearSolverError::DimensionMismatch {
                    name,
                    expected: rows,
                    found: len,
                });
            }
        }
        if self.a.iter().any(|v| !v.is_finite()) {
            return Err(LinearSolverError::NonFiniteEntry { name: "A" });
        }
        if self.b.iter().any(|v| !v.is_finite()) {
            return Err(LinearSolverError::NonFiniteEntry { name: "b" });
        }
        if self.x0.iter().any(|v| !v.is_finite()) {
            return Err(LinearSolverError::NonFiniteEntry { name: "x0" });
        }
        if let Some(index) = (0..rows).find(|&i| self.a[(i, i)].abs() < ZERO_THRESHOLD) {
            return Err(LinearSolverError::ZeroDiagonal { index });
        }
        if !ConvergenceCriterion::is_valid_tolerance(self.tolerance) {
            return Err(LinearSolverError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(LinearSolverError::InvalidMaxIterations);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearIterationRecord {
    pub iteration: usize,
    /// ||x_k - x_{k-1}|| in the selected norm
    pub error: f64,
    pub x: DVector<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystemResult {
    pub method: LinearMethod,
    pub iterations: Vec<LinearIterationRecord>,
    pub iteration_matrix: DMatrix<f64>,
    pub constant_vector: DVector<f64>,
    pub spectral_radius: f64,
    pub diagonally_dominant: bool,
    pub converged: bool,
    pub outcome: RunOutcome,
    pub message: String,
}

impl LinearSystemResult {
    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }

    /// last computed vector
    pub fn solution(&self) -> Option<&DVector<f64>> {
        self.iterations.last().map(|record| &record.x)
    }

    pub fn final_error(&self) -> Option<f64> {
        self.iterations.last().map(|record| record.error)
    }

    /// spectral radius below one
    pub fn convergence_guaranteed(&self) -> bool {
        self.spectral_radius < 1.0
    }
}

impl TraceTable for LinearSystemResult {
    fn headers(&self) -> Vec<String> {
        let n = self.constant_vector.len();
        let mut headers = vec!["iter".to_string(), "error".to_string()];
        headers.extend((1..=n).map(|i| format!("x_{}", i)));
        headers
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iterations
            .iter()
            .map(|record| {
                let mut row = vec![record.iteration.to_string(), format!("{:.3e}", record.error)];
                row.extend(record.x.iter().map(|&v| format_value(v)));
                row
            })
            .collect()
    }

    fn summary(&self) -> String {
        format!(
            "{}: T = {}C = {}{}",
            self.method, self.iteration_matrix, self.constant_vector, self.message
        )
    }
}

/// Iteration matrix T and constant vector C of a method. `w` is read by SOR only.
pub fn iteration_matrices(
    method: LinearMethod,
    A: &DMatrix<f64>,
    b: &DVector<f64>,
    w: f64,
) -> Result<(DMatrix<f64>, DVector<f64>), LinearSolverError> {
    let D = DMatrix::from_diagonal(&A.diagonal());
    let L = A.lower_triangle() - &D;
    let U = A.upper_triangle() - &D;
    match method {
        LinearMethod::Jacobi => {
            let D_inv = DMatrix::from_diagonal(&A.diagonal().map(|d| 1.0 / d));
            let T = -(&D_inv * (&L + &U));
            let C = &D_inv * b;
            Ok((T, C))
        }
        LinearMethod::GaussSeidel => {
            let M = (&D + &L)
                .try_inverse()
                .ok_or(LinearSolverError::SingularSplitting(method))?;
            let T = -(&M * &U);
            let C = &M * b;
            Ok((T, C))
        }
        LinearMethod::Sor => {
            let M = (&D + &L * w)
                .try_inverse()
                .ok_or(LinearSolverError::SingularSplitting(method))?;
            let T = &M * (&D * (1.0 - w) - &U * w);
            let C = (&M * b) * w;
            Ok((T, C))
        }
    }
}

/// Runs one iterative method on the system described by `input`.
pub fn solve_linear_system(
    method: LinearMethod,
    input: &LinearSystemInput,
) -> Result<LinearSystemResult, LinearSolverError> {
    input.validate()?;
    let w = match (method, input.w) {
        (LinearMethod::Sor, None) => return Err(LinearSolverError::MissingRelaxation),
        (LinearMethod::Sor, Some(w)) if !(w > 0.0 && w < 2.0) => {
            return Err(LinearSolverError::InvalidRelaxation(w));
        }
        (_, w) => w.unwrap_or(1.0),
    };
    let (T, C) = iteration_matrices(method, &input.a, &input.b, w)?;
    let rho = spectral_radius(&T);
    let dominant = is_strictly_diagonally_dominant(&input.a);
    info!(
        "{} on a {}x{} system, spectral radius of T = {:.6}",
        method,
        input.a.nrows(),
        input.a.ncols(),
        rho
    );
    if rho >= 1.0 {
        warn!("{}: spectral radius {:.6} >= 1, convergence is not guaranteed", method, rho);
    }
    if !dominant {
        warn!("{}: A is not strictly diagonally dominant", method);
    }

    let mut records = Vec::new();
    let mut x = input.x0.clone();
    let mut outcome = RunOutcome::MaxIterationsReached;
    for k in 1..=input.max_iterations {
        let next = &T * &x + &C;
        if next.iter().any(|v| !v.is_finite()) {
            outcome = RunOutcome::Breakdown(Breakdown::NonFiniteValue { iteration: k });
            break;
        }
        let error = input.norm.norm(&(&next - &x));
        debug!("{} iteration {}: error = {:e}, x = {}", method, k, error, next.transpose());
        records.push(LinearIterationRecord {
            iteration: k,
            error,
            x: next.clone(),
        });
        x = next;
        if error <= input.tolerance {
            outcome = RunOutcome::Converged;
            break;
        }
    }

    let mut result = LinearSystemResult {
        method,
        converged: outcome.is_converged(),
        iterations: records,
        iteration_matrix: T,
        constant_vector: C,
        spectral_radius: rho,
        diagonally_dominant: dominant,
        outcome,
        message: String::new(),
    };
    result.message = conclusion(&result, input);
    if result.converged {
        info!("{}: {}", method, result.message);
    } else {
        warn!("{}: {}", method, result.message);
    }
    Ok(result)
}

/// trace verdict; spectral verdict; dominance
fn conclusion(result: &LinearSystemResult, input: &LinearSystemInput) -> String {
    let count = result.iteration_count();
    let last_error = result
        .final_error()
        .map_or("n/a".to_string(), |e| format!("{:.3e}", e));
    let trace_verdict = match &result.outcome {
        RunOutcome::Converged => format!(
            "tolerance {:e} reached after {} iterations ({}-norm error {})",
            input.tolerance, count, input.norm, last_error
        ),
        RunOutcome::MaxIterationsReached => format!(
            "tolerance {:e} not reached after {} iterations ({}-norm error {})",
            input.tolerance, count, input.norm, last_error
        ),
        RunOutcome::Breakdown(breakdown) => format!(
            "numerical breakdown after {} recorded iterations: {} ({}-norm error {})",
            count, breakdown, input.norm, last_error
        ),
    };
    let spectral_verdict = if result.convergence_guaranteed() {
        format!(
            "spectral radius of T = {:.6} < 1, the method converges for any initial vector",
            result.spectral_radius
        )
    } else {
        format!(
            "spectral radius of T = {:.6} >= 1, the method is not guaranteed to converge",
            result.spectral_radius
        )
    };
    let dominance = if result.diagonally_dominant {
        "A is strictly diagonally dominant"
    } else {
        "A is not strictly diagonally dominant"
    };
    format!("{}; {}; {}", trace_verdict, spectral_verdict, dominance)
}

pub fn jacobi(input: &LinearSystemInput) -> Result<LinearSystemResult, LinearSolverError> {
    solve_linear_system(LinearMethod::Jacobi, input)
}

pub fn gauss_seidel(input: &LinearSystemInput) -> Result<LinearSystemResult, LinearSolverError> {
    solve_linear_system(LinearMethod::GaussSeidel, input)
}

pub fn sor(input: &LinearSystemInput) -> Result<LinearSystemResult, LinearSolverError> {
    solve_linear_system(LinearMethod::Sor, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn tridiagonal_system() -> LinearSystemInput {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        LinearSystemInput::new(a, b, DVector::zeros(3), 1e-6, 100).with_relaxation(1.2)
    }

    #[test]
    fn test_all_methods_converge_on_tridiagonal_system() {
        let input = tridiagonal_system();
        for method in LinearMethod::iter() {
            let result = solve_linear_system(method, &input).unwrap();
            assert!(result.spectral_radius < 1.0, "{}", method);
            assert!(result.converged, "{}", method);
            assert!(result.iteration_count() <= 100);
            let x = result.solution().unwrap();
            let residual = (&input.a * x - &input.b).norm();
            assert!(residual < 1e-4, "{}: residual {}", method, residual);
            assert!(result.diagonally_dominant);
            assert!(result.message.contains("< 1"));
        }
    }

    #[test]
    fn test_jacobi_matrices() {
        let input = tridiagonal_system();
        let (T, C) = iteration_matrices(LinearMethod::Jacobi, &input.a, &input.b, 1.0).unwrap();
        let expected_T =
            DMatrix::from_row_slice(3, 3, &[0.0, 0.25, 0.0, 0.25, 0.0, 0.25, 0.0, 0.25, 0.0]);
        assert_relative_eq!(T, expected_T, epsilon = 1e-15);
        assert_relative_eq!(C, DVector::from_vec(vec![0.25, 0.5, 0.75]), epsilon = 1e-15);
    }

    #[test]
    fn test_spectral_radii() {
        let input = tridiagonal_system();
        let jacobi = jacobi(&input).unwrap();
        let gauss_seidel = gauss_seidel(&input).unwrap();
        // consistently ordered matrix: rho(GS) = rho(J)^2
        assert_relative_eq!(jacobi.spectral_radius, 2f64.sqrt() / 4.0, epsilon = 1e-10);
        assert_relative_eq!(
            gauss_seidel.spectral_radius,
            jacobi.spectral_radius.powi(2),
            epsilon = 1e-10
        );
        assert!(gauss_seidel.iteration_count() < jacobi.iteration_count());
    }

    #[test]
    fn test_sor_with_unit_relaxation_is_gauss_seidel() {
        let input = tridiagonal_system().with_relaxation(1.0);
        let sor = sor(&input).unwrap();
        let gs = gauss_seidel(&input).unwrap();
        assert_relative_eq!(sor.iteration_matrix, gs.iteration_matrix, epsilon = 1e-14);
        assert_eq!(sor.iteration_count(), gs.iteration_count());
    }

    #[test]
    fn test_records() {
        let input = tridiagonal_system().with_norm(NormType::One);
        let result = jacobi(&input).unwrap();
        let first = &result.iterations[0];
        assert_eq!(first.iteration, 1);
        assert_relative_eq!(first.x, DVector::from_vec(vec![0.25, 0.5, 0.75]), epsilon = 1e-15);
        assert_relative_eq!(first.error, 1.5, epsilon = 1e-15);
        let second = &result.iterations[1];
        assert_relative_eq!(second.error, (&second.x - &first.x).lp_norm(1), epsilon = 1e-15);
    }

    #[test]
    fn test_relaxation_factor_is_checked_at_entry() {
        for w in [0.0, 2.0, 2.5, -0.5, f64::NAN] {
            let input = tridiagonal_system().with_relaxation(w);
            assert!(matches!(
                sor(&input),
                Err(LinearSolverError::InvalidRelaxation(_))
            ));
        }
        let mut input = tridiagonal_system();
        input.w = None;
        assert_eq!(sor(&input).unwrap_err(), LinearSolverError::MissingRelaxation);
        // Jacobi ignores w
        assert!(jacobi(&input).is_ok());
    }

    #[test]
    fn test_preconditions() {
        let base = tridiagonal_system();
        let mut not_square = base.clone();
        not_square.a = DMatrix::zeros(2, 3);
        assert_eq!(
            jacobi(&not_square).unwrap_err(),
            LinearSolverError::NotSquare { rows: 2, cols: 3 }
        );
        let mut short_b = base.clone();
        short_b.b = DVector::zeros(2);
        assert_eq!(
            jacobi(&short_b).unwrap_err(),
            LinearSolverError::DimensionMismatch {
                name: "b",
                expected: 3,
                found: 2
            }
        );
        let mut short_x0 = base.clone();
        short_x0.x0 = DVector::zeros(4);
        assert!(matches!(
            gauss_seidel(&short_x0).unwrap_err(),
            LinearSolverError::DimensionMismatch { name: "x0", .. }
        ));
        let mut zero_diagonal = base.clone();
        zero_diagonal.a[(1, 1)] = 0.0;
        let err = jacobi(&zero_diagonal).unwrap_err();
        assert_eq!(err, LinearSolverError::ZeroDiagonal { index: 1 });
        assert_eq!(err.kind(), FailureKind::InputValidation);
        let mut bad_tolerance = base.clone();
        bad_tolerance.tolerance = 0.0;
        assert!(matches!(
            jacobi(&bad_tolerance).unwrap_err(),
            LinearSolverError::InvalidTolerance(_)
        ));
    }

    #[test]
    fn test_divergent_system_is_reported_not_rejected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let input = LinearSystemInput::new(a, b, DVector::zeros(2), 1e-6, 20);
        let result = jacobi(&input).unwrap();
        assert!(result.spectral_radius > 1.0);
        assert!(!result.converged);
        assert!(!result.diagonally_dominant);
        assert_eq!(result.outcome, RunOutcome::MaxIterationsReached);
        assert_eq!(result.iteration_count(), 20);
        assert!(result.message.contains(">= 1"));
    }

    #[test]
    fn test_overflow_is_a_breakdown() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let input = LinearSystemInput::new(a, b, DVector::zeros(2), 1e-6, 5000);
        let result = jacobi(&input).unwrap();
        assert!(matches!(
            result.outcome,
            RunOutcome::Breakdown(Breakdown::NonFiniteValue { .. })
        ));
        assert!(result.iteration_count() < 5000);
        assert!(result.solution().unwrap().iter().all(|v| v.is_finite()));
        assert!(!result.convergence_guaranteed());
        let last_error = format!("inf-norm error {:.3e}", result.final_error().unwrap());
        assert!(result.message.contains(&format!(
            "numerical breakdown after {} recorded iterations",
            result.iteration_count()
        )));
        assert!(result.message.contains(&last_error));
    }

    #[test]
    fn test_identifiers_and_norms() {
        assert_eq!(LinearMethod::from_identifier("gaussSeidel"), Some(LinearMethod::GaussSeidel));
        assert_eq!(LinearMethod::from_identifier("SOR"), Some(LinearMethod::Sor));
        assert_eq!("inf".parse::<NormType>(), Ok(NormType::Inf));
        assert_eq!("1".parse::<NormType>(), Ok(NormType::One));
        let v = DVector::from_vec(vec![3.0, -4.0]);
        assert_relative_eq!(NormType::One.norm(&v), 7.0);
        assert_relative_eq!(NormType::Two.norm(&v), 5.0);
        assert_relative_eq!(NormType::Inf.norm(&v), 4.0);
    }

    #[test]
    fn test_trace_table() {
        let result = jacobi(&tridiagonal_system()).unwrap();
        assert_eq!(result.headers(), vec!["iter", "error", "x_1", "x_2", "x_3"]);
        assert_eq!(result.rows().len(), result.iteration_count());
        assert!(result.to_table().contains("spectral radius"));
    }
}
