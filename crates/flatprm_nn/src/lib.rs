//! Batched KD-tree nearest-neighbor index.
//!
//! Keys are *handles* — plain `usize` indices into a caller-owned states
//! buffer — never copies of the coordinates themselves. The tree is
//! append-only: leaves hold up to [`LEAF_CAPACITY`] entries scanned
//! linearly, and split on first overflow along the widest-extent axis.

use flatprm_linalg::Float;

/// Leaf capacity before a split is attempted.
pub const LEAF_CAPACITY: usize = 128;

/// Read-only access to the coordinates a handle denotes. Implemented by
/// whatever owns the states buffer (the planner's roadmap); the tree itself
/// never stores or copies coordinate data outside of per-node bounding
/// boxes.
pub trait CoordinateSource {
    fn coordinates(&self, handle: usize) -> &[Float];
}

#[derive(Debug, Clone)]
struct BoundingBox {
    min: Vec<Float>,
    max: Vec<Float>,
}

impl BoundingBox {
    fn singleton(point: &[Float]) -> Self {
        Self {
            min: point.to_vec(),
            max: point.to_vec(),
        }
    }

    fn expand(&mut self, point: &[Float]) {
        for (d, &x) in point.iter().enumerate() {
            self.min[d] = self.min[d].min(x);
            self.max[d] = self.max[d].max(x);
        }
    }

    /// Squared distance from `query` to the closest point inside the box
    /// (zero if `query` is inside or on the boundary).
    fn min_dist_squared(&self, query: &[Float]) -> Float {
        let mut acc = 0.0;
        for (d, &q) in query.iter().enumerate() {
            let gap = if q < self.min[d] {
                self.min[d] - q
            } else if q > self.max[d] {
                q - self.max[d]
            } else {
                0.0
            };
            acc += gap * gap;
        }
        acc
    }

    fn widest_axis(&self) -> usize {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| hi - lo)
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("extents are never NaN"))
            .map_or(0, |(axis, _)| axis)
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        handles: Vec<usize>,
        bbox: BoundingBox,
    },
    Branch {
        axis: usize,
        threshold: Float,
        left: Box<Node>,
        right: Box<Node>,
        bbox: BoundingBox,
    },
}

impl Node {
    fn bbox(&self) -> &BoundingBox {
        match self {
            Self::Leaf { bbox, .. } | Self::Branch { bbox, .. } => bbox,
        }
    }
}

/// A batched KD-tree over `dimension`-dimensional points, keyed by opaque
/// `usize` handles.
#[derive(Debug)]
pub struct KdTree {
    dimension: usize,
    root: Option<Node>,
    len: usize,
}

impl KdTree {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            root: None,
            len: 0,
        }
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `handle`, looking up its coordinates via `source`. Never
    /// fails; amortized logarithmic in tree size.
    pub fn insert(&mut self, handle: usize, source: &impl CoordinateSource) {
        let point = source.coordinates(handle);
        debug_assert_eq!(point.len(), self.dimension);
        self.len += 1;
        match &mut self.root {
            None => {
                self.root = Some(Node::Leaf {
                    handles: vec![handle],
                    bbox: BoundingBox::singleton(point),
                });
            }
            Some(root) => Self::insert_with_split(root, handle, point, source),
        }
    }

    /// Inserts into `node`, re-splitting overflowing leaves with full
    /// coordinate access (unlike [`Node::split`], which cannot see
    /// coordinates on its own).
    fn insert_with_split(
        node: &mut Node,
        handle: usize,
        point: &[Float],
        source: &impl CoordinateSource,
    ) {
        match node {
            Node::Leaf { handles, bbox } => {
                bbox.expand(point);
                handles.push(handle);
                if handles.len() > LEAF_CAPACITY {
                    let axis = bbox.widest_axis();
                    let threshold = (bbox.min[axis] + bbox.max[axis]) / 2.0;
                    let mut left_handles = Vec::new();
                    let mut right_handles = Vec::new();
                    for &h in handles.iter() {
                        if source.coordinates(h)[axis] < threshold {
                            left_handles.push(h);
                        } else {
                            right_handles.push(h);
                        }
                    }
                    if left_handles.is_empty() || right_handles.is_empty() {
                        // every point coincides on this axis; stay a leaf.
                        return;
                    }
                    let left_bbox = Self::bbox_of(&left_handles, source);
                    let right_bbox = Self::bbox_of(&right_handles, source);
                    *node = Node::Branch {
                        axis,
                        threshold,
                        left: Box::new(Node::Leaf {
                            handles: left_handles,
                            bbox: left_bbox,
                        }),
                        right: Box::new(Node::Leaf {
                            handles: right_handles,
                            bbox: right_bbox,
                        }),
                        bbox: bbox.clone(),
                    };
                }
            }
            Node::Branch {
                axis,
                threshold,
                left,
                right,
                bbox,
            } => {
                bbox.expand(point);
                if point[*axis] < *threshold {
                    Self::insert_with_split(left, handle, point, source);
                } else {
                    Self::insert_with_split(right, handle, point, source);
                }
            }
        }
    }

    fn bbox_of(handles: &[usize], source: &impl CoordinateSource) -> BoundingBox {
        let mut iter = handles.iter();
        let first = source.coordinates(*iter.next().expect("non-empty split side"));
        let mut bbox = BoundingBox::singleton(first);
        for &h in iter {
            bbox.expand(source.coordinates(h));
        }
        bbox
    }

    /// Populate `out` with up to `k` handles within radius `r` of `query`,
    /// sorted by increasing distance. `out` is cleared first.
    pub fn nearest(
        &self,
        out: &mut Vec<(usize, Float)>,
        query: &[Float],
        k: usize,
        r: Float,
        source: &impl CoordinateSource,
    ) {
        out.clear();
        if k == 0 {
            return;
        }
        let r_squared = r * r;
        let mut candidates: Vec<(usize, Float)> = Vec::new();
        if let Some(root) = &self.root {
            Self::search(root, query, r_squared, k, &mut candidates, source);
        }
        candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("distances are never NaN"));
        candidates.truncate(k);
        for (handle, dist_squared) in candidates {
            out.push((handle, dist_squared.sqrt()));
        }
    }

    fn search(
        node: &Node,
        query: &[Float],
        r_squared: Float,
        k: usize,
        candidates: &mut Vec<(usize, Float)>,
        source: &impl CoordinateSource,
    ) {
        if node.bbox().min_dist_squared(query) > Self::current_bound(candidates, k, r_squared) {
            return;
        }
        match node {
            Node::Leaf { handles, .. } => {
                for &h in handles {
                    let point = source.coordinates(h);
                    let dist_squared = squared_distance(query, point);
                    if dist_squared <= r_squared {
                        candidates.push((h, dist_squared));
                    }
                }
            }
            Node::Branch { left, right, .. } => {
                Self::search(left, query, r_squared, k, candidates, source);
                Self::search(right, query, r_squared, k, candidates, source);
            }
        }
    }

    /// The current pruning radius: `r` until we have `k` candidates, after
    /// which it tightens to the `k`-th smallest distance found so far.
    fn current_bound(candidates: &[(usize, Float)], k: usize, r_squared: Float) -> Float {
        if candidates.len() < k {
            return r_squared;
        }
        let mut sorted: Vec<Float> = candidates.iter().map(|&(_, d)| d).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("distances are never NaN"));
        sorted[k - 1].min(r_squared)
    }
}

fn squared_distance(a: &[Float], b: &[Float]) -> Float {
    a.iter().zip(b).map(|(&x, &y)| (x - y) * (x - y)).sum()
}
