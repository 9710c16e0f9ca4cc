use super::*;
use std::fmt;

/// Maximum number of axes a tensor can have.
pub const MAX_RANK: usize = 8;

/// Multi-dimensional coordinates (or any other per-axis tuple) of at most [`MAX_RANK`] entries.
pub type Coords = SmallVec<usize, MAX_RANK>;

/// Dimensionality and per-axis extents of a tensor.
///
/// Shapes are small `Copy` values. Builders accept any extents; [`Shape::validate`] is what
/// enforces the rank bounds and non-zero extents required for an allocated tensor.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Coords,
}

impl Shape {
    /// Builds a shape of arbitrary rank, failing when it exceeds [`MAX_RANK`].
    pub fn new(dims: &[usize]) -> Result<Shape> {
        let dims = Coords::try_from_slice(dims)
            .map_err(|err| TensorError::InvalidRank { rank: err.requested })?;
        Ok(Shape { dims })
    }

    pub fn d1(d0: usize) -> Shape {
        Shape { dims: small_vec![d0] }
    }

    pub fn d2(d0: usize, d1: usize) -> Shape {
        Shape {
            dims: small_vec![d0, d1],
        }
    }

    pub fn d3(d0: usize, d1: usize, d2: usize) -> Shape {
        Shape {
            dims: small_vec![d0, d1, d2],
        }
    }

    /// The rank-0 shape carried by released tensors.
    pub(crate) fn empty() -> Shape {
        Shape::default()
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Extent of axis `i`, or 0 when the axis does not exist.
    pub fn dim(&self, i: usize) -> usize {
        self.dims.get(i).copied().unwrap_or(0)
    }

    /// Total number of elements described by this shape, saturating at `usize::MAX`.
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    /// Same as [`Shape::numel`], but returns `None` on overflow.
    pub fn checked_numel(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Checks that the shape can back an allocated tensor.
    pub fn validate(&self) -> Result<()> {
        if self.dims.is_empty() || self.dims.len() > MAX_RANK {
            return Err(TensorError::InvalidRank { rank: self.rank() });
        }

        match self.dims.iter().position(|&d| d == 0) {
            Some(axis) => Err(TensorError::ZeroExtent { axis }),
            None => Ok(()),
        }
    }

    /// Maps coordinates to a row-major linear index.
    ///
    /// Coordinates are not checked against the extents: an out of range coordinate yields an
    /// index which does not address the intended element.
    pub fn linearize(&self, coords: &[usize]) -> usize {
        debug_assert_eq!(coords.len(), self.rank(), "coordinate count must match rank");
        debug_assert!(
            coords.iter().zip(self.dims.iter()).all(|(c, d)| c < d),
            "coordinates {coords:?} out of bounds for {self}"
        );

        self.dims
            .iter()
            .zip(coords)
            .fold(0, |index, (&extent, &coord)| index * extent + coord)
    }

    /// Inverse of [`Shape::linearize`].
    pub fn delinearize(&self, mut index: usize) -> Coords {
        let mut coords = self.dims;
        for axis in (0..self.rank()).rev() {
            coords[axis] = index % self.dims[axis];
            index /= self.dims[axis];
        }
        coords
    }

    /// Resolves the shape two operands broadcast to.
    ///
    /// Shapes are right-aligned and the shorter one is padded with leading 1s. Each aligned pair of
    /// extents must be equal or contain a 1; the result takes the larger of the two.
    pub fn broadcast(lhs: &Shape, rhs: &Shape) -> Result<Shape> {
        let rank = lhs.rank().max(rhs.rank());
        let mut dims = if lhs.rank() >= rhs.rank() { lhs.dims } else { rhs.dims };

        for i in 0..rank {
            let l = lhs.padded_dim(i, rank);
            let r = rhs.padded_dim(i, rank);

            dims[i] = match (l, r) {
                _ if l == r => l,
                (1, _) => r,
                (_, 1) => l,
                _ => {
                    return Err(TensorError::BroadcastIncompatible {
                        lhs: *lhs,
                        rhs: *rhs,
                    });
                }
            };
        }

        Ok(Shape { dims })
    }

    /// Extent of axis `i` once the shape is left-padded with 1s up to `rank` axes.
    fn padded_dim(&self, i: usize, rank: usize) -> usize {
        let pad = rank - self.rank();
        if i < pad { 1 } else { self.dims[i - pad] }
    }

    /// Returns a copy with the extent of `axis` replaced, or `None` when the axis does not exist.
    pub fn with_dim(&self, axis: usize, extent: usize) -> Option<Shape> {
        let mut dims = self.dims;
        *dims.get_mut(axis)? = extent;
        Some(Shape { dims })
    }

    /// Returns the shape whose axis `j` is axis `perm[j]` of this shape.
    pub fn permuted(&self, perm: &[usize]) -> Result<Shape> {
        validate_permutation(perm, self.rank())?;

        let mut dims = self.dims;
        for (j, &p) in perm.iter().enumerate() {
            dims[j] = self.dims[p];
        }

        Ok(Shape { dims })
    }
}

/// Checks that `perm` lists every axis in `0..rank` exactly once.
pub(crate) fn validate_permutation(perm: &[usize], rank: usize) -> Result<()> {
    let mut seen = [false; MAX_RANK];
    let is_valid = perm.len() == rank
        && perm.iter().all(|&p| {
            let fresh = p < rank && !seen[p];
            if fresh {
                seen[p] = true;
            }
            fresh
        });

    if is_valid {
        Ok(())
    } else {
        Err(TensorError::InvalidPermutation {
            perm: perm.to_vec(),
            rank,
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape{self}")
    }
}
