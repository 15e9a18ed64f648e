//! Scalar reference multiplication.

/// Compute C = A·B with three scalar loops in i-k-j order.
///
/// This is the correctness baseline for the tiled kernels, and it is written
/// to match their numerics exactly: every element is the k-ascending sum of
/// its products with one `mul_add` per term, the same order and the same
/// fused rounding the vector engine applies. Tiled results are compared to
/// this with `==`, not with a tolerance.
///
/// A is m×k, B is k×n, C is m×n, row-major. C is overwritten.
pub fn matmul_reference(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    c[..m * n].fill(0.0);
    for i in 0..m {
        for p in 0..k {
            let t = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            let c_row = &mut c[i * n..(i + 1) * n];
            for (cv, &bv) in c_row.iter_mut().zip(b_row) {
                *cv = t.mul_add(bv, *cv);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_2x3_times_3x2() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
        let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0]; // 3x2
        let mut c = [0.0; 4];
        matmul_reference(&a, &b, &mut c, 2, 2, 3);
        assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn overwrites_stale_output() {
        let a = [1.0];
        let b = [2.0];
        let mut c = [99.0];
        matmul_reference(&a, &b, &mut c, 1, 1, 1);
        assert_eq!(c, [2.0]);
    }
}
