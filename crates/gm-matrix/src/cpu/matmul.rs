/// Naive row-by-column product of `[m x k] @ [k x n]` with wrapping overflow.
///
/// Lengths are assumed to have been checked by the caller.
pub(crate) fn matmul_naive(a: &[i32], b: &[i32], m: usize, k: usize, n: usize) -> Vec<i32> {
    let mut c = vec![0i32; m * n];
    for row in 0..m {
        for col in 0..n {
            let mut sum = 0i32;
            for i in 0..k {
                sum = sum.wrapping_add(a[row * k + i].wrapping_mul(b[i * n + col]));
            }
            c[row * n + col] = sum;
        }
    }
    c
}
