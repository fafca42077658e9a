use log::warn;
use nalgebra::DMatrix;
use num_complex::Complex;

/// The spectral radius of a square matrix T is the largest modulus among its (complex)
/// eigenvalues. The linear fixed point iteration x_{k+1} = T x_k + c converges for every
/// initial vector if and only if the spectral radius of T is below one.
pub fn spectral_radius(T: &DMatrix<f64>) -> f64 {
    if T.is_empty() {
        return 0.0;
    }
    T.complex_eigenvalues()
        .iter()
        .map(|lambda: &Complex<f64>| lambda.norm())
        .fold(0.0, f64::max)
}

/// A matrix is strictly diagonally dominant by rows if |a_ii| > sum_{j != i} |a_ij| for every
/// row. This is a sufficient condition for the Jacobi and Gauss-Seidel iterations to converge.
pub fn is_strictly_diagonally_dominant(A: &DMatrix<f64>) -> bool {
    A.row_iter().enumerate().all(|(i, row)| {
        let off_diagonal: f64 = row
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, a)| a.abs())
            .sum();
        row[i].abs() > off_diagonal
    })
}

/// The condition number of a matrix is defined as the ratio of the largest singular value
/// of the matrix to the smallest singular value of the matrix. Infinite for a singular matrix.
pub fn condition_number(A: &DMatrix<f64>) -> f64 {
    if A.is_empty() {
        return 1.0;
    }
    let singular_values = A.singular_values();
    let max_sigma = singular_values.max();
    let min_sigma = singular_values.min();
    if min_sigma == 0.0 {
        f64::INFINITY
    } else {
        max_sigma / min_sigma
    }
}

/// A system of linear equations is said to be poorly conditioned if the solution is sensitive
/// to small changes in the input data. Takes the condition number from [`condition_number`].
pub fn poorly_conditioned(condition_number: f64, threshold: f64) -> bool {
    let poorly_conditioned = condition_number > threshold;
    if poorly_conditioned {
        warn!(
            "The system of linear equations is poorly conditioned. Condition number = {:.2e}",
            condition_number
        );
    }
    poorly_conditioned
}
