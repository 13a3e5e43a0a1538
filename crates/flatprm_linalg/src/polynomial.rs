//! Vector-valued polynomials.
//!
//! One [`Polynomial`] represents a multi-dimensional trajectory: each
//! coefficient `c_i` multiplies `t^i` and is itself a `flat_dimension`-wide
//! vector, so `p.eval(t)` produces a full flat-output sample, not a scalar.

use wide::f64x4;

use crate::{Float, Vector, RAKE};

/// A dense polynomial with vector-valued coefficients.
///
/// `coeffs[i]` is the coefficient of `t^i`; `coeffs.len() == order + 1`
/// always holds — [`Polynomial::new`] panics otherwise, since a length
/// mismatch can only arise from a caller bug, not from a value that flows
/// in from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    order: usize,
    coeffs: Vec<Vector<Float>>,
}

impl Polynomial {
    /// Construct a polynomial of the given `order` from its coefficients.
    ///
    /// # Panics
    /// Panics if `coeffs.len() != order + 1`, or if the coefficient vectors
    /// do not all share the same dimension.
    #[must_use]
    pub fn new(order: usize, coeffs: Vec<Vector<Float>>) -> Self {
        assert_eq!(
            coeffs.len(),
            order + 1,
            "Polynomial of order {order} requires exactly {} coefficients, got {}",
            order + 1,
            coeffs.len()
        );
        if let Some(dim) = coeffs.first().map(Vector::len) {
            assert!(
                coeffs.iter().all(|c| c.len() == dim),
                "all coefficients of a Polynomial must share the same dimension"
            );
        }
        Self { order, coeffs }
    }

    /// Construct the zero polynomial of order 0 in the given dimension.
    #[must_use]
    pub fn zero(flat_dimension: usize) -> Self {
        Self::new(0, vec![Vector::zeros(flat_dimension)])
    }

    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    #[must_use]
    pub fn coeffs(&self) -> &[Vector<Float>] {
        &self.coeffs
    }

    /// Dimension of the flat output this polynomial's values live in.
    #[must_use]
    pub fn flat_dimension(&self) -> usize {
        self.coeffs.first().map_or(0, Vector::len)
    }

    /// Evaluate `p(t) = Σ c_i * t^i` for all flat-output dimensions at once.
    ///
    /// Defined for every real `t`; the horizon `T` over which a trajectory
    /// is *valid* is a concern of the motion validator, not of the
    /// polynomial itself.
    #[must_use]
    pub fn eval(&self, t: Float) -> Vector<Float> {
        let dim = self.flat_dimension();
        let mut acc = Vector::zeros(dim);
        let mut t_pow = 1.0;
        for c in &self.coeffs {
            acc = acc + c * t_pow;
            t_pow *= t;
        }
        acc
    }

    /// Evaluate the `j`-th scalar component of the polynomial at four times
    /// simultaneously, using a single SIMD lane (the "rake").
    #[must_use]
    pub fn eval_rake(&self, j: usize, t_vec: [Float; RAKE]) -> [Float; RAKE] {
        let mut acc = f64x4::splat(0.0);
        let mut t_pow = f64x4::splat(1.0);
        let t_vec = f64x4::from(t_vec);
        for c in &self.coeffs {
            let cj = f64x4::splat(c[j]);
            acc += cj * t_pow;
            t_pow *= t_vec;
        }
        acc.to_array()
    }

    /// The differentiated polynomial. `order` becomes `max(order - 1, 0)`;
    /// differentiating an order-0 polynomial yields the order-0 zero
    /// polynomial.
    #[must_use]
    pub fn derivative(&self) -> Self {
        if self.order == 0 {
            return Self::zero(self.flat_dimension());
        }
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * (i as Float))
            .collect();
        Self::new(self.order - 1, coeffs)
    }

    /// An antiderivative with zero constant term. `order` becomes
    /// `order + 1`.
    #[must_use]
    pub fn integral(&self) -> Self {
        let dim = self.flat_dimension();
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(Vector::zeros(dim));
        for (i, c) in self.coeffs.iter().enumerate() {
            coeffs.push(c / ((i + 1) as Float));
        }
        Self::new(self.order + 1, coeffs)
    }

    /// Discrete convolution: `(p * q)` has order `p.order + q.order` and
    /// coefficient `k` equal to `Σ_{i+j=k} p_i ⊙ q_j` (component-wise
    /// product of the vector coefficients).
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let dim = self.flat_dimension();
        let result_order = self.order + other.order;
        let mut coeffs = vec![Vector::zeros(dim); result_order + 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = &coeffs[i + j] + a * b;
            }
        }
        Self::new(result_order, coeffs)
    }

    /// Sample the trajectory at `⌊T · resolution⌋` uniform steps of
    /// `1 / resolution`, starting at `t = 0`.
    #[must_use]
    pub fn to_path(&self, horizon: Float, resolution: Float) -> Vec<Vector<Float>> {
        let n = (horizon * resolution).floor() as usize;
        (0..n).map(|i| self.eval(i as Float / resolution)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn scalar_poly(coeffs: &[Float]) -> Polynomial {
        Polynomial::new(
            coeffs.len() - 1,
            coeffs.iter().map(|&c| array![c]).collect(),
        )
    }

    #[test]
    #[should_panic(expected = "requires exactly")]
    fn construction_panics_on_length_mismatch() {
        let _ = Polynomial::new(2, vec![array![0.0], array![1.0]]);
    }

    #[test]
    fn eval_sums_coefficients_times_powers() {
        // p(t) = 0 + 1*t + 0*t^2
        let p = scalar_poly(&[0.0, 1.0, 0.0]);
        assert_relative_eq!(p.eval(1.0)[0], 1.0);
    }

    #[test]
    fn derivative_then_eval_matches_scenario_3() {
        let p = scalar_poly(&[0.0, 1.0, 0.0]);
        assert_relative_eq!(p.derivative().eval(1.0)[0], 1.0);
    }

    #[test]
    fn integral_then_eval_matches_scenario_3() {
        let p = scalar_poly(&[0.0, 1.0, 0.0]);
        assert_relative_eq!(p.integral().eval(1.0)[0], 0.5);
    }

    #[test]
    fn derivative_order_is_max_order_minus_one_zero() {
        let p = scalar_poly(&[1.0, 2.0, 3.0]);
        assert_eq!(p.derivative().order(), 1);
        let constant = scalar_poly(&[5.0]);
        assert_eq!(constant.derivative().order(), 0);
        assert_relative_eq!(constant.derivative().eval(3.0)[0], 0.0);
    }

    #[test]
    fn integral_order_is_order_plus_one() {
        let p = scalar_poly(&[1.0, 2.0, 3.0]);
        assert_eq!(p.integral().order(), 4);
    }

    #[test]
    fn integral_has_zero_constant_term_invariant() {
        // ∀ p: p.derivative().integral().eval(t) - p.eval(t) == -p.coeffs[0]
        let p = scalar_poly(&[2.0, 3.0, -1.0, 0.5]);
        for &t in &[0.0, 0.5, 1.0, 3.7, -2.0] {
            let lhs = p.derivative().integral().eval(t)[0] - p.eval(t)[0];
            assert_relative_eq!(lhs, -p.coeffs()[0][0], epsilon = 1e-9);
        }
    }

    #[test]
    fn multiply_matches_pointwise_product_of_values() {
        let p = scalar_poly(&[1.0, 2.0]); // 1 + 2t
        let q = scalar_poly(&[3.0, -1.0]); // 3 - t
        let pq = p.multiply(&q);
        assert_eq!(pq.order(), 2);
        for &t in &[0.0, 1.0, -2.5, 10.0] {
            assert_relative_eq!(pq.eval(t)[0], p.eval(t)[0] * q.eval(t)[0], epsilon = 1e-9);
        }
    }

    #[test]
    fn eval_rake_matches_scalar_eval() {
        let p = scalar_poly(&[1.0, -2.0, 0.5]);
        let ts = [0.0, 0.25, 0.5, 0.75];
        let rake = p.eval_rake(0, ts);
        for (t, r) in ts.iter().zip(rake.iter()) {
            assert_relative_eq!(*r, p.eval(*t)[0], epsilon = 1e-12);
        }
    }

    #[test]
    fn to_path_produces_floor_t_times_resolution_samples() {
        let p = scalar_poly(&[0.0, 1.0]);
        let path = p.to_path(1.5, 10.0);
        assert_eq!(path.len(), 15);
        assert_relative_eq!(path[0][0], 0.0);
        assert_relative_eq!(path[1][0], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let p = scalar_poly(&[1.0, 2.0]);
        let before = p.clone();
        let _ = p.derivative();
        let _ = p.integral();
        let _ = p.multiply(&before);
        assert_eq!(p, before);
    }
}
