use super::*;

impl Tensor {
    /// Reinterprets the buffer with a new shape, without touching its content.
    ///
    /// Fails, leaving the tensor unchanged, when the new shape describes a different number of
    /// elements.
    pub fn reshape(&mut self, shape: Shape) -> Result<()> {
        self.ensure_live()?;
        shape.validate()?;

        if shape.checked_numel() != Some(self.size()) {
            return Err(TensorError::ReshapeMismatch {
                size: self.size(),
                to: shape,
            });
        }

        trace!("reshape {} -> {shape}", self.shape);
        self.shape = shape;

        Ok(())
    }

    /// Returns the element buffer in row-major order.
    pub fn data<T: Element>(&self) -> Result<&[T]> {
        self.ensure_live()?;
        T::buffer(&self.storage).ok_or(TensorError::DTypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })
    }

    /// Returns the mutable element buffer in row-major order.
    pub fn data_mut<T: Element>(&mut self) -> Result<&mut [T]> {
        self.ensure_live()?;
        let got = self.dtype();
        T::buffer_mut(&mut self.storage).ok_or(TensorError::DTypeMismatch {
            expected: T::DTYPE,
            got,
        })
    }

    /// Element at a linear index.
    pub fn get<T: Element>(&self, index: usize) -> Result<T> {
        let extent = self.size();
        self.data::<T>()?
            .get(index)
            .copied()
            .ok_or(TensorError::IndexOutOfRange { index, extent })
    }

    /// Element at multi-dimensional coordinates.
    pub fn get_at<T: Element>(&self, coords: &[usize]) -> Result<T> {
        if coords.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                op: "get_at",
                expected: self.rank(),
                got: coords.len(),
            });
        }

        if let Some(axis) = coords.iter().zip(self.dims()).position(|(c, d)| c >= d) {
            return Err(TensorError::IndexOutOfRange {
                index: coords[axis],
                extent: self.dim(axis),
            });
        }

        self.get(self.shape.linearize(coords))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Extent of axis `i`, or 0 when the axis does not exist.
    pub fn dim(&self, i: usize) -> usize {
        self.shape.dim(i)
    }

    /// Number of elements in the buffer.
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// Length of the buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.size() * self.dtype().size_in_bytes()
    }

    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    pub fn same_shape(&self, other: &Tensor) -> bool {
        self.shape == other.shape
    }
}
