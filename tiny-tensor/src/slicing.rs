use super::*;
use std::ops::Range;

impl Tensor {
    /// Copies the window `range` of this tensor along `axis` into `dst`.
    ///
    /// `dst` must have the same rank and element type as the source, the same extents on every
    /// other axis, and an extent of `range.len()` on the sliced axis.
    pub fn slice_into(&self, dst: &mut Tensor, axis: usize, range: Range<usize>) -> Result<()> {
        self.ensure_live()?;
        dst.ensure_live()?;

        if dst.rank() != self.rank() {
            return Err(TensorError::RankMismatch {
                op: "slice",
                expected: self.rank(),
                got: dst.rank(),
            });
        }

        if axis >= self.rank() {
            return Err(TensorError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }

        let Range { start, end } = range;
        let extent = self.dim(axis);
        if start > end || end > extent {
            return Err(TensorError::SliceOutOfRange { start, end, extent });
        }

        if dst.dim(axis) != end - start {
            return Err(TensorError::SliceExtentMismatch {
                axis,
                expected: end - start,
                got: dst.dim(axis),
            });
        }

        let other_axes_match = (0..self.rank())
            .filter(|&i| i != axis)
            .all(|i| self.dim(i) == dst.dim(i));
        if !other_axes_match {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape,
                got: dst.shape,
            });
        }

        dst.ensure_dtype(self.dtype())?;

        trace!("slice {}[{axis}: {start}..{end}] -> {}", self.shape, dst.shape);

        let src_shape = self.shape;
        let dst_shape = dst.shape;
        dst.storage.gather_from(&self.storage, |i| {
            let mut coords = dst_shape.delinearize(i);
            coords[axis] += start;
            src_shape.linearize(&coords)
        })
    }

    /// Allocates a tensor holding the window `range` of this tensor along `axis`.
    pub fn slice(&self, axis: usize, range: Range<usize>) -> Result<Tensor> {
        self.ensure_live()?;

        let extent = self.dim(axis);
        let shape = self
            .shape
            .with_dim(axis, range.end.saturating_sub(range.start))
            .ok_or(TensorError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            })?;

        // an empty window cannot back an allocated tensor
        if range.start >= range.end || range.end > extent {
            return Err(TensorError::SliceOutOfRange {
                start: range.start,
                end: range.end,
                extent,
            });
        }

        let mut dst = Tensor::alloc(shape, self.dtype())?;
        self.slice_into(&mut dst, axis, range)?;

        Ok(dst)
    }
}
