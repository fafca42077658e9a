//! Numerical methods with complete iteration traces.
//!
//! | module | contents |
//! |---|---|
//! | [`convergence`] | stopping errors, outcomes of iterative runs |
//! | [`numeric_function`] | scalar functions and their derivatives |
//! | [`root_finding`] | bisection, false position, fixed point, Newton-Raphson, secant, multiple roots |
//! | [`iterative_linear`] | Jacobi, Gauss-Seidel, SOR |
//! | [`interpolation`] | Vandermonde, Newton, Lagrange, linear and cubic splines |
//! | [`comparison_report`] | every method of a family on one problem |
//! | [`method_lab`] | runs described by a task document |
pub mod convergence;
pub mod numeric_function;

pub mod root_finding;
mod root_finding_tests;

pub mod iterative_linear;

pub mod interpolation;
pub mod polynomial;

pub mod comparison_report;
pub mod method_lab;
