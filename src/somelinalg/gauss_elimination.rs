//! Direct solvers for the small dense and tridiagonal systems built by the interpolation engine.
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EliminationError {
    #[error("matrix is singular: no usable pivot in column {column}")]
    Singular { column: usize },
    #[error("dimension mismatch: {rows}x{cols} matrix with a right-hand side of length {rhs}")]
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },
}

/// Gaussian elimination with partial pivoting on a copy of `A`. A pivot smaller than
/// `n * eps * max|a_ij|` in magnitude is treated as zero.
pub fn gauss_solve(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, EliminationError> {
    let n = A.nrows();
    if A.ncols() != n || b.len() != n {
        return Err(EliminationError::DimensionMismatch {
            rows: n,
            cols: A.ncols(),
            rhs: b.len(),
        });
    }
    let mut U = A.clone();
    let mut y = b.clone();
    let scale = U.amax();
    let tiny = n as f64 * f64::EPSILON * scale;

    for k in 0..n {
        // Partial pivoting: find the row with the largest element in the current column
        let mut max_row = k;
        for i in (k + 1)..n {
            if U[(i, k)].abs() > U[(max_row, k)].abs() {
                max_row = i;
            }
        }
        if U[(max_row, k)].abs() <= tiny {
            return Err(EliminationError::Singular { column: k });
        }
        if max_row != k {
            U.swap_rows(k, max_row);
            y.swap_rows(k, max_row);
        }
        for i in (k + 1)..n {
            let factor = U[(i, k)] / U[(k, k)];
            U[(i, k)] = 0.0;
            for j in (k + 1)..n {
                U[(i, j)] -= factor * U[(k, j)];
            }
            y[i] -= factor * y[k];
        }
    }

    // Backward substitution Ux = y
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        x[i] = y[i];
        for j in (i + 1)..n {
            x[i] -= U[(i, j)] * x[j];
        }
        x[i] /= U[(i, i)];
    }
    Ok(x)
}

/// Thomas algorithm for a tridiagonal system. `lower[i]` multiplies x[i] in row i + 1,
/// `upper[i]` multiplies x[i + 1] in row i.
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, EliminationError> {
    let n = diag.len();
    if rhs.len() != n || lower.len() + 1 != n.max(1) || upper.len() + 1 != n.max(1) {
        return Err(EliminationError::DimensionMismatch {
            rows: n,
            cols: n,
            rhs: rhs.len(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    let mut pivot = diag[0];
    if pivot == 0.0 {
        return Err(EliminationError::Singular { column: 0 });
    }
    if n > 1 {
        c[0] = upper[0] / pivot;
    }
    d[0] = rhs[0] / pivot;
    for i in 1..n {
        pivot = diag[i] - lower[i - 1] * c[i - 1];
        if pivot == 0.0 {
            return Err(EliminationError::Singular { column: i });
        }
        if i < n - 1 {
            c[i] = upper[i] / pivot;
        }
        d[i] = (rhs[i] - lower[i - 1] * d[i - 1]) / pivot;
    }
    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gauss_solve_needs_pivoting() {
        // zero in the first pivot position
        let A = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![5.0, 6.0, 13.0]);
        let x = gauss_solve(&A, &b).unwrap();
        assert_relative_eq!(x, DVector::from_vec(vec![1.0, 2.0, 3.0]), epsilon = 1e-12);
        assert_relative_eq!(&A * &x, b, epsilon = 1e-12);
    }

    #[test]
    fn test_gauss_solve_singular() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(gauss_solve(&A, &b), Err(EliminationError::Singular { column: 1 }));
        let zero = DMatrix::zeros(2, 2);
        assert!(gauss_solve(&zero, &b).is_err());
    }

    #[test]
    fn test_gauss_solve_dimension_mismatch() {
        let A = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            gauss_solve(&A, &b),
            Err(EliminationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_tridiagonal_against_dense() {
        let lower = [1.0, 2.0, 1.5];
        let diag = [4.0, 5.0, 6.0, 4.5];
        let upper = [1.0, 0.5, 2.0];
        let rhs = [1.0, 2.0, 3.0, 4.0];
        let x = solve_tridiagonal(&lower, &diag, &upper, &rhs).unwrap();
        let mut A = DMatrix::zeros(4, 4);
        for i in 0..4 {
            A[(i, i)] = diag[i];
            if i < 3 {
                A[(i + 1, i)] = lower[i];
                A[(i, i + 1)] = upper[i];
            }
        }
        let dense = gauss_solve(&A, &DVector::from_column_slice(&rhs)).unwrap();
        for i in 0..4 {
            assert_relative_eq!(x[i], dense[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tridiagonal_single_equation() {
        assert_eq!(solve_tridiagonal(&[], &[2.0], &[], &[3.0]).unwrap(), vec![1.5]);
        assert!(solve_tridiagonal(&[], &[0.0], &[], &[3.0]).is_err());
    }
}
