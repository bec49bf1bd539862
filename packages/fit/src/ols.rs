//! Small dense linear algebra for the normal equations.
//!
//! The regression here is four predictors against a few hundred weeks,
//! so a fixed-size Gauss-Jordan inversion is all that is needed.

/// Pivots smaller than this are treated as singular.
const PIVOT_EPS: f64 = 1e-12;

/// Inverts an `N`×`N` matrix by Gauss-Jordan elimination with partial
/// pivoting. Returns `None` when a pivot collapses, i.e. the matrix is
/// singular or numerically indistinguishable from singular.
pub(crate) fn invert<const N: usize>(mut a: [[f64; N]; N]) -> Option<[[f64; N]; N]> {
    let mut inv = [[0.0; N]; N];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..N {
        // Partial pivot: bring the largest remaining entry into place.
        let mut pivot_row = col;
        for row in col + 1..N {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < PIVOT_EPS {
            return None;
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..N {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..N {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Some(inv)
}

/// Multiplies an `N`×`N` matrix by a column vector.
pub(crate) fn mat_vec<const N: usize>(m: &[[f64; N]; N], v: &[f64; N]) -> [f64; N] {
    let mut out = [0.0; N];
    for (row, out_value) in m.iter().zip(out.iter_mut()) {
        *out_value = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    }
    out
}
