use super::*;

impl Tensor {
    /// Reorders the axes in place: axis `j` of the result is axis `perm[j]` of the input.
    ///
    /// Elements are relocated through one full-size scratch copy of the buffer: every element at
    /// linear index `i` of the old layout is written to the index its permuted coordinates map to
    /// in the new layout.
    pub fn permute(&mut self, perm: &[usize]) -> Result<()> {
        self.ensure_live()?;

        let old_shape = self.shape;
        let new_shape = old_shape.permuted(perm)?;

        debug!("permute {old_shape} by {perm:?} -> {new_shape}");

        let scratch = self.storage.try_clone()?;
        self.storage.scatter_from(&scratch, |i| {
            let coords = old_shape.delinearize(i);
            let mut permuted = coords;
            for (j, &p) in perm.iter().enumerate() {
                permuted[j] = coords[p];
            }
            new_shape.linearize(&permuted)
        })?;

        self.shape = new_shape;

        Ok(())
    }

    /// Swaps two axes.
    pub fn transpose(&mut self, dim0: usize, dim1: usize) -> Result<()> {
        self.ensure_live()?;

        let rank = self.rank();
        if let Some(&axis) = [dim0, dim1].iter().find(|&&axis| axis >= rank) {
            return Err(TensorError::AxisOutOfRange { axis, rank });
        }

        let mut perm: [usize; MAX_RANK] = std::array::from_fn(|axis| axis);
        perm.swap(dim0, dim1);

        self.permute(&perm[..rank])
    }
}
