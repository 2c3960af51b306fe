//! Numeric kernels used to load the CPU.
//!
//! The kernels are plain dense implementations; what matters for the
//! benchmark is that each one is CPU-bound and deterministic in the work it
//! performs for a given input size, not that it is the fastest possible.

use rand::Rng;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Upper bound on Jacobi sweeps in [`Matrix::singular_values`]
const MAX_SWEEPS: usize = 8;
const JACOBI_TOLERANCE: f64 = 1e-12;

/// Dense row-major matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), rows * cols, "data length does not match shape");
        Self { rows, cols, data }
    }

    /// Square `n x n` matrix of independent uniform samples in `[0, 1)`
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let data = (0..n * n).map(|_| rng.gen::<f64>()).collect();
        Self {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Bytes held by an `n x n` matrix
    pub fn bytes_for(n: usize) -> u64 {
        (n as u64)
            .saturating_mul(n as u64)
            .saturating_mul(std::mem::size_of::<f64>() as u64)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Matrix product `self * other`
    pub fn matmul(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.cols, other.rows, "inner dimensions must agree");
        // Transposing keeps the inner loop on contiguous memory for both sides
        let other_t = other.transpose();
        let inner = self.cols;
        let mut out = Matrix::zeros(self.rows, other.cols);
        if other.cols == 0 {
            return out;
        }

        out.data
            .par_chunks_mut(other.cols)
            .enumerate()
            .for_each(|(r, out_row)| {
                let lhs = &self.data[r * inner..(r + 1) * inner];
                for (c, cell) in out_row.iter_mut().enumerate() {
                    let rhs = &other_t.data[c * inner..(c + 1) * inner];
                    *cell = lhs.iter().zip(rhs).map(|(a, b)| a * b).sum();
                }
            });
        out
    }

    /// Singular values in descending order (one-sided Jacobi).
    ///
    /// Stops after [`MAX_SWEEPS`] sweeps even if not fully converged. Each
    /// sweep visits every column pair on one thread, about `3 * n^3` flops,
    /// so an `n = 1000` matrix costs on the order of 10^10 flops and does
    /// not converge in that budget. It is a CPU load, not a substitute for a
    /// LAPACK SVD, and its timings are not comparable to one.
    pub fn singular_values(&self) -> Vec<f64> {
        // Columns of `self` become contiguous rows here
        let mut cols = self.transpose();
        let n = cols.rows;
        let len = cols.cols;

        for _ in 0..MAX_SWEEPS {
            let mut rotated = false;
            for p in 0..n {
                for q in (p + 1)..n {
                    let (head, tail) = cols.data.split_at_mut(q * len);
                    let up = &mut head[p * len..(p + 1) * len];
                    let uq = &mut tail[..len];

                    let alpha: f64 = up.iter().map(|x| x * x).sum();
                    let beta: f64 = uq.iter().map(|x| x * x).sum();
                    let gamma: f64 = up.iter().zip(uq.iter()).map(|(a, b)| a * b).sum();

                    if gamma.abs() <= JACOBI_TOLERANCE * (alpha * beta).sqrt() {
                        continue;
                    }
                    rotated = true;

                    let zeta = (beta - alpha) / (2.0 * gamma);
                    let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = c * t;

                    for (a, b) in up.iter_mut().zip(uq.iter_mut()) {
                        let x = *a;
                        *a = c * x - s * *b;
                        *b = s * x + c * *b;
                    }
                }
            }
            if !rotated {
                break;
            }
        }

        let mut values: Vec<f64> = cols
            .data
            .chunks(len.max(1))
            .take(n)
            .map(|col| col.iter().map(|x| x * x).sum::<f64>().sqrt())
            .collect();
        values.sort_by(|a, b| b.total_cmp(a));
        values
    }

    /// Magnitudes of the 2D discrete Fourier transform, same shape as `self`
    pub fn dft2(&self) -> Matrix {
        let (re, im) = dft_rows(&self.data, None, self.rows, self.cols);

        // Columns pass: transpose, transform rows, transpose back
        let re_t = Matrix::from_vec(self.rows, self.cols, re).transpose();
        let im_t = Matrix::from_vec(self.rows, self.cols, im).transpose();
        let (re, im) = dft_rows(&re_t.data, Some(&im_t.data), self.cols, self.rows);

        let magnitudes = re
            .iter()
            .zip(im.iter())
            .map(|(r, i)| (r * r + i * i).sqrt())
            .collect();
        Matrix::from_vec(self.cols, self.rows, magnitudes).transpose()
    }

    /// Element-wise `e^x`
    pub fn exp(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.par_iter().map(|x| x.exp()).collect(),
        }
    }
}

/// Naive DFT of every row of a `rows x cols` complex matrix
fn dft_rows(re: &[f64], im: Option<&[f64]>, rows: usize, cols: usize) -> (Vec<f64>, Vec<f64>) {
    let mut out_re = vec![0.0; rows * cols];
    let mut out_im = vec![0.0; rows * cols];
    if cols == 0 {
        return (out_re, out_im);
    }

    let twiddles: Vec<(f64, f64)> = (0..cols)
        .map(|k| {
            let angle = -2.0 * PI * k as f64 / cols as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    out_re
        .par_chunks_mut(cols)
        .zip(out_im.par_chunks_mut(cols))
        .enumerate()
        .for_each(|(r, (row_re, row_im))| {
            let in_re = &re[r * cols..(r + 1) * cols];
            let in_im = im.map(|im| &im[r * cols..(r + 1) * cols]);
            for k in 0..cols {
                let mut acc_re = 0.0;
                let mut acc_im = 0.0;
                for j in 0..cols {
                    let (w_re, w_im) = twiddles[(j * k) % cols];
                    let x_re = in_re[j];
                    let x_im = in_im.map_or(0.0, |v| v[j]);
                    acc_re += x_re * w_re - x_im * w_im;
                    acc_im += x_re * w_im + x_im * w_re;
                }
                row_re[k] = acc_re;
                row_im[k] = acc_im;
            }
        });

    (out_re, out_im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_random_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(20, &mut rng);
        assert_eq!((m.rows(), m.cols()), (20, 20));
        assert!(m.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.matmul(&b);
        assert_eq!(c, Matrix::from_vec(2, 2, vec![58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn test_singular_values_diagonal() {
        let m = Matrix::from_vec(3, 3, vec![3.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
        let sv = m.singular_values();
        assert_eq!(sv.len(), 3);
        assert!(approx(sv[0], 3.0) && approx(sv[1], 2.0) && approx(sv[2], 1.0), "{sv:?}");
    }

    #[test]
    fn test_singular_values_dense() {
        // A^T A = [[25, 20], [20, 25]] has eigenvalues 45 and 5
        let m = Matrix::from_vec(2, 2, vec![3.0, 0.0, 4.0, 5.0]);
        let sv = m.singular_values();
        assert!(approx(sv[0], 45f64.sqrt()), "{sv:?}");
        assert!(approx(sv[1], 5f64.sqrt()), "{sv:?}");
    }

    #[test]
    fn test_dft2_constant_input() {
        let m = Matrix::from_vec(2, 2, vec![1.0; 4]);
        let f = m.dft2();
        assert!(approx(f.get(0, 0), 4.0));
        assert!(approx(f.get(0, 1), 0.0));
        assert!(approx(f.get(1, 0), 0.0));
        assert!(approx(f.get(1, 1), 0.0));
    }

    #[test]
    fn test_dft2_impulse_is_flat() {
        let mut data = vec![0.0; 12];
        data[0] = 1.0;
        let f = Matrix::from_vec(3, 4, data).dft2();
        assert_eq!((f.rows(), f.cols()), (3, 4));
        assert!(f.as_slice().iter().all(|&x| approx(x, 1.0)));
    }

    #[test]
    fn test_exp() {
        let m = Matrix::from_vec(1, 3, vec![0.0, 1.0, -1.0]);
        let e = m.exp();
        assert!(approx(e.get(0, 0), 1.0));
        assert!(approx(e.get(0, 1), std::f64::consts::E));
        assert!(approx(e.get(0, 2), 1.0 / std::f64::consts::E));
    }

    #[test]
    fn test_bytes_for() {
        assert_eq!(Matrix::bytes_for(1000), 8_000_000);
        assert_eq!(Matrix::bytes_for(usize::MAX), u64::MAX);
    }
}
