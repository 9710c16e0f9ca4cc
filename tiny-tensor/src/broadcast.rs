use super::*;

impl Tensor {
    /// Fills `dst` by broadcasting this tensor to the destination shape.
    ///
    /// The destination is never resized: broadcasting the two shapes must yield exactly
    /// `dst.shape()`. Axes where the source extent is 1, including the leading axes the source
    /// lacks, repeat the same source element.
    pub fn expand_into(&self, dst: &mut Tensor) -> Result<()> {
        self.ensure_live()?;
        dst.ensure_live()?;
        dst.ensure_dtype(self.dtype())?;

        let src_shape = self.shape;
        let dst_shape = dst.shape;
        let resolved = Shape::broadcast(&src_shape, &dst_shape)?;
        if resolved != dst_shape {
            return Err(TensorError::ShapeMismatch {
                expected: resolved,
                got: dst_shape,
            });
        }

        debug!("expand {src_shape} -> {dst_shape}");

        let pad = dst_shape.rank() - src_shape.rank();
        dst.storage.gather_from(&self.storage, |i| {
            let coords = dst_shape.delinearize(i);
            // zeroes, one per source axis
            let mut src_coords = src_shape.delinearize(0);
            for (axis, coord) in src_coords.iter_mut().enumerate() {
                if src_shape.dims()[axis] != 1 {
                    *coord = coords[axis + pad];
                }
            }
            src_shape.linearize(&src_coords)
        })
    }

    /// Allocates a tensor of `shape` holding this tensor broadcast to it.
    pub fn expand(&self, shape: Shape) -> Result<Tensor> {
        let mut dst = Tensor::alloc(shape, self.dtype())?;
        self.expand_into(&mut dst)?;
        Ok(dst)
    }
}
