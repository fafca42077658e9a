//! some linear algebra functions used throughout the code
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// Gaussian elimination with partial pivoting and the Thomas algorithm
pub mod gauss_elimination;
/// spectral radius, diagonal dominance, condition number
pub mod linear_sys_diagnostics;
