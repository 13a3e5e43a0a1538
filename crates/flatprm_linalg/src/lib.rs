//! Dense, vector-valued polynomial algebra.
//!
//! A [`Polynomial`] represents a multi-dimensional trajectory: each
//! coefficient is itself a `flat_dimension`-wide vector, so one polynomial
//! encodes every flat-output axis at once. All arithmetic here is total —
//! the only failure mode in this crate is the `coeffs.len() == order + 1`
//! construction invariant, which is a programmer error and panics.

pub mod pretty_print;
pub mod polynomial;

pub use polynomial::Polynomial;

pub mod prelude {
    pub use super::{
        broadcast_rake,
        polynomial::Polynomial,
        pretty_print::{PrettyPrintMatrix, PrettyPrintVector},
        pretty_print_matrix, pretty_print_vector, Float, Matrix, MatrixView, NdarrayVectorExt,
        PlannerFloat, RakeBlock, Vector, VectorNorm, VectorView, RAKE,
    };
}

/// Marker trait for the floating point types usable throughout the planner.
///
/// `ndarray::NdFloat` gives us the arithmetic + `Copy` bound `Array1`/`Array2`
/// need; `std::iter::Sum` is additionally required by a few reduction
/// operations (norms, the polynomial product).
pub trait PlannerFloat: ndarray::NdFloat + Copy + std::iter::Sum {}

impl PlannerFloat for f32 {}
impl PlannerFloat for f64 {}

/// The floating point precision used by the planner core.
pub type Float = f64;

pub type Vector<T> = ndarray::Array1<T>;
pub type Matrix<T> = ndarray::Array2<T>;
pub type VectorView<'a, T> = ndarray::ArrayView1<'a, T>;
pub type MatrixView<'a, T> = ndarray::ArrayView2<'a, T>;

/// SIMD lane width ("rake") used by [`polynomial::Polynomial::eval_rake`] and
/// by `flatprm_validate`. Fixed at compile time.
pub const RAKE: usize = 4;

/// A rake-wide block of configurations: one `[Float; RAKE]` lane group per
/// flat-output dimension. Passed to `Robot::fkcc`/`fkcc_attach`.
pub type RakeBlock = Vec<[Float; RAKE]>;

/// Broadcast a single configuration into a rake-wide block (every lane holds
/// the same value), used when rejecting a single sampled configuration
/// rather than validating a trajectory.
#[must_use]
pub fn broadcast_rake(configuration: &Vector<Float>) -> RakeBlock {
    configuration.iter().map(|&x| [x; RAKE]).collect()
}

pub trait VectorNorm {
    type Scalar: PlannerFloat;
    fn euclidean_norm(&self) -> Self::Scalar;
    fn l1_norm(&self) -> Self::Scalar;

    #[inline(always)]
    fn l2_norm(&self) -> Self::Scalar {
        self.euclidean_norm()
    }
}

macro_rules! vector_norm_trait_impl {
    ($float:ty) => {
        impl VectorNorm for Vector<$float> {
            type Scalar = $float;
            fn euclidean_norm(&self) -> Self::Scalar {
                <$float>::sqrt(self.fold(0.0, |acc, x| acc + x * x))
            }
            #[inline(always)]
            fn l1_norm(&self) -> Self::Scalar {
                self.fold(0.0, |acc, x| acc + x.abs())
            }
        }
    };
}

vector_norm_trait_impl!(f32);
vector_norm_trait_impl!(f64);

pub trait NdarrayVectorExt: Clone + VectorNorm {
    type Scalar: PlannerFloat;
    fn normalize(&mut self);
    fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }
}

macro_rules! ndarray_vector_ext_trait_impl {
    ($float:ty) => {
        impl NdarrayVectorExt for Vector<$float> {
            type Scalar = $float;
            fn normalize(&mut self) {
                let mag = self.euclidean_norm();
                if mag == 0.0 || mag.is_infinite() {
                    return;
                }
                for i in 0..self.len() {
                    self[i] /= mag;
                }
            }
        }
    };
}

ndarray_vector_ext_trait_impl!(f32);
ndarray_vector_ext_trait_impl!(f64);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn euclidean_norm_matches_definition() {
        let v: Vector<f64> = array![3.0, 4.0];
        assert_eq!(v.euclidean_norm(), 5.0);
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let v: Vector<f64> = array![3.0, 4.0];
        let n = v.normalized();
        assert_relative_eq!(n.euclidean_norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_of_zero_vector_is_noop() {
        let v: Vector<f64> = array![0.0, 0.0];
        let n = v.normalized();
        assert_eq!(n, v);
    }
}
