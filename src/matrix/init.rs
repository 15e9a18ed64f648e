//! Benchmark input matrices.

/// Fill a rows×cols row-major matrix with `alpha * i + beta * j + gamma`.
///
/// An affine fill gives every element a distinct, exactly-representable
/// value for small coefficients, so a misplaced row or column shows up as a
/// wrong value rather than cancelling out the way constant fills can.
pub fn init_affine(matrix: &mut [f64], rows: usize, cols: usize, alpha: f64, beta: f64, gamma: f64) {
    for i in 0..rows {
        for j in 0..cols {
            matrix[i * cols + j] = alpha * (i as f64) + beta * (j as f64) + gamma;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_of_a_2x3() {
        let mut m = [0.0; 6];
        init_affine(&mut m, 2, 3, 10.0, 1.0, -2.0);
        assert_eq!(m, [-2.0, -1.0, 0.0, 8.0, 9.0, 10.0]);
    }
}
