//! A flat state: the flat output and its first `flat_order - 1` time
//! derivatives, concatenated into one fixed-size vector.

use flatprm_linalg::{Float, Vector};

/// A fixed-size vector of `flat_dimension * flat_order` scalars, partitioned
/// into `flat_order` contiguous segments of length `flat_dimension`: segment
/// 0 is the configuration, segment 1 its first derivative, and so on.
#[derive(Debug, Clone, PartialEq, derive_more::Index, derive_more::IndexMut)]
pub struct FlatState(pub Vector<Float>);

impl FlatState {
    #[must_use]
    pub fn new(values: Vector<Float>) -> Self {
        Self(values)
    }

    /// Total dimension `flat_dimension * flat_order` of this flat state.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// The `order_index`-th derivative segment (0 = configuration, 1 =
    /// velocity, ...), given the robot's `flat_dimension`.
    ///
    /// # Panics
    /// Panics if the requested segment would run past the end of the
    /// backing vector — a mismatched `flat_dimension`/`flat_order` pair is
    /// a caller bug.
    #[must_use]
    pub fn segment(&self, flat_dimension: usize, order_index: usize) -> Vector<Float> {
        let start = order_index * flat_dimension;
        let end = start + flat_dimension;
        assert!(
            end <= self.0.len(),
            "flat state segment {order_index} out of range for dimension {flat_dimension}"
        );
        self.0.slice(ndarray::s![start..end]).to_owned()
    }

    /// L2 distance between two flat states, used by the roadmap edge cost
    /// and by the nearest-neighbor index's metric.
    #[must_use]
    pub fn distance(&self, other: &Self) -> Float {
        let diff = &self.0 - &other.0;
        diff.dot(&diff).sqrt()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Float] {
        self.0
            .as_slice()
            .expect("FlatState is always stored in contiguous, standard layout")
    }
}
